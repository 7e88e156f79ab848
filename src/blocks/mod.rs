// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

mod header;
mod tipset;

pub use header::{BlockHeader, RawBlockHeader};
pub use tipset::{Tipset, TipsetKey};

/// Blockchain blocks error
#[derive(Debug, Error)]
pub enum Error {
    /// Tipset contains invalid data, as described by the string parameter.
    #[error("Invalid tipset: {0}")]
    InvalidTipset(String),
    /// The given tipset has no blocks
    #[error("No blocks for tipset")]
    NoBlocks,
    /// Headers could not be read from the block store
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
