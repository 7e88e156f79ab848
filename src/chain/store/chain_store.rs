// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use crate::blocks::{BlockHeader, Tipset, TipsetKey};
use crate::db::setting_keys::HEAD_KEY;
use crate::db::{SettingsStore, SettingsStoreExt};
use crate::networks::ChainConfig;
use crate::utils::db::CborStoreExt as _;
use anyhow::Result;
use fvm_ipld_blockstore::Blockstore;
use serde::Serialize;
use tracing::info;

use super::{ChainReader, Error, index::ChainIndex};

/// Stores chain data such as the heaviest tipset and cached tipsets. This
/// structure is thread-safe, and all caches are wrapped in a mutex to allow a
/// consistent `ChainStore` to be shared across tasks.
pub struct ChainStore<DB> {
    /// key-value `datastore`.
    db: Arc<DB>,

    /// Settings store
    settings: Arc<dyn SettingsStore + Sync + Send>,

    /// Used as a cache for tipset lookups.
    chain_index: ChainIndex<Arc<DB>>,

    genesis_block_header: BlockHeader,
}

impl<DB> ChainStore<DB>
where
    DB: Blockstore,
{
    pub fn new(
        db: Arc<DB>,
        settings: Arc<dyn SettingsStore + Sync + Send>,
        chain_config: &ChainConfig,
        genesis_block_header: BlockHeader,
    ) -> Result<Self> {
        let chain_index = ChainIndex::new(Arc::clone(&db), chain_config.tipset_cache_size);
        persist_objects(db.as_ref(), std::slice::from_ref(&genesis_block_header))?;

        if !settings
            .read_obj::<TipsetKey>(HEAD_KEY)?
            .is_some_and(|tipset_keys| chain_index.load_tipset(&tipset_keys).is_ok())
        {
            let genesis = Tipset::from(genesis_block_header.clone());
            settings.write_obj(HEAD_KEY, genesis.key())?;
        }

        Ok(Self {
            db,
            settings,
            chain_index,
            genesis_block_header,
        })
    }

    /// Sets heaviest tipset within `ChainStore` and store its tipset keys in
    /// the settings store under the [`crate::db::setting_keys::HEAD_KEY`] key.
    pub fn set_heaviest_tipset(&self, ts: &Tipset) -> Result<(), Error> {
        self.settings.write_obj(HEAD_KEY, ts.key())?;
        info!("New heaviest tipset! {} (EPOCH = {})", ts.key(), ts.epoch());
        Ok(())
    }

    /// Writes tipset block headers to data store.
    pub fn put_tipset(&self, ts: &Tipset) -> Result<(), Error> {
        persist_objects(self.blockstore(), ts.block_headers())?;
        Ok(())
    }

    /// Returns genesis [`BlockHeader`].
    pub fn genesis(&self) -> &BlockHeader {
        &self.genesis_block_header
    }

    /// Returns the currently tracked heaviest tipset.
    pub fn heaviest_tipset(&self) -> Result<Arc<Tipset>, Error> {
        self.chain_index.load_tipset(&self.heaviest_tipset_key()?)
    }

    /// Returns key-value store instance.
    pub fn blockstore(&self) -> &DB {
        &self.db
    }
}

impl<DB> ChainReader for ChainStore<DB>
where
    DB: Blockstore,
{
    fn heaviest_tipset_key(&self) -> Result<TipsetKey, Error> {
        Ok(self.settings.require_obj::<TipsetKey>(HEAD_KEY)?)
    }

    #[tracing::instrument(skip_all)]
    fn load_tipset(&self, tsk: &TipsetKey) -> Result<Arc<Tipset>, Error> {
        self.chain_index.load_tipset(tsk)
    }
}

/// Persists slice of `serializable` objects to `blockstore`.
pub fn persist_objects<DB, C>(db: &DB, objects: &[C]) -> Result<()>
where
    DB: Blockstore,
    C: Serialize,
{
    for obj in objects {
        db.put_cbor_default(obj)?;
    }
    Ok(())
}
