// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::blocks::Error as BlkErr;
use crate::shim::clock::ChainEpoch;
use thiserror::Error;

/// Chain error
#[derive(Debug, Error)]
pub enum Error {
    /// Key was not found
    #[error("Invalid tipset: {0}")]
    UndefinedKey(String),
    /// Key not found in database
    #[error("{0} not found")]
    NotFound(String),
    /// Error originating from constructing blockchain structures, including
    /// tipsets whose headers disagree on their height
    #[error(transparent)]
    Blockchain(BlkErr),
    /// Error originating from the key-value store
    #[error(transparent)]
    Db(#[from] anyhow::Error),
    /// Ancestor collection was asked for an empty randomness lookback
    #[error("lookback must be greater than 0")]
    ZeroLookback,
    /// The tipset that ancestor collection starts from is already older than
    /// the proving window
    #[error("base tipset at epoch {base} is below the earliest ancestor epoch {earliest}")]
    BaseBelowProvingWindow {
        base: ChainEpoch,
        earliest: ChainEpoch,
    },
    /// Two chains were walked back to their roots without meeting
    #[error("no common ancestor")]
    NoCommonAncestor,
    /// The traversal was cancelled by the caller
    #[error("chain traversal cancelled")]
    Cancelled,
}

impl From<BlkErr> for Error {
    fn from(e: BlkErr) -> Self {
        match e {
            BlkErr::Store(e) => Error::Db(e),
            e => Error::Blockchain(e),
        }
    }
}
