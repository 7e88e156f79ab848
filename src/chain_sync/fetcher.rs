// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use crate::blocks::{BlockHeader, RawBlockHeader};
use auto_impl::auto_impl;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("block {0} not found")]
    NotFound(Cid),
    #[error("entry {cid} is not a block header: {reason}")]
    NotABlock { cid: Cid, reason: String },
    #[error("requested block {requested} but received {received}")]
    CidMismatch { requested: Cid, received: Cid },
    #[error("block fetch cancelled")]
    Cancelled,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Retrieves block headers by CID.
#[auto_impl(&, Arc)]
pub trait BlockFetcher {
    /// Returns the headers for `cids` in request order. Either every header
    /// is returned or none is.
    fn get_blocks(
        &self,
        cids: &[Cid],
        cancel: &CancellationToken,
    ) -> Result<Vec<BlockHeader>, FetchError>;
}

/// A [`BlockFetcher`] answering from a local block store, without touching
/// the network.
pub struct BlockstoreFetcher<DB> {
    db: Arc<DB>,
}

impl<DB> BlockstoreFetcher<DB> {
    pub fn new(db: Arc<DB>) -> Self {
        Self { db }
    }
}

impl<DB: Blockstore> BlockstoreFetcher<DB> {
    fn get_block(&self, cid: &Cid) -> Result<BlockHeader, FetchError> {
        let bytes = self.db.get(cid)?.ok_or(FetchError::NotFound(*cid))?;
        let raw: RawBlockHeader =
            fvm_ipld_encoding::from_slice(&bytes).map_err(|e| FetchError::NotABlock {
                cid: *cid,
                reason: e.to_string(),
            })?;
        let header = BlockHeader::new(raw);
        if header.cid() != cid {
            return Err(FetchError::CidMismatch {
                requested: *cid,
                received: *header.cid(),
            });
        }
        Ok(header)
    }
}

impl<DB: Blockstore> BlockFetcher for BlockstoreFetcher<DB> {
    #[tracing::instrument(skip_all, fields(count = cids.len()))]
    fn get_blocks(
        &self,
        cids: &[Cid],
        cancel: &CancellationToken,
    ) -> Result<Vec<BlockHeader>, FetchError> {
        let headers = cids
            .iter()
            .map(|cid| {
                if cancel.is_cancelled() {
                    return Err(FetchError::Cancelled);
                }
                trace!(%cid, "fetching block");
                self.get_block(cid)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!("fetched {} blocks", headers.len());
        Ok(headers)
    }
}
