// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::{num::NonZeroUsize, sync::Arc};

use crate::blocks::{Tipset, TipsetKey};
use fvm_ipld_blockstore::Blockstore;
use hashlink::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::chain::Error;

type TipsetCache = Mutex<LruCache<TipsetKey, Arc<Tipset>>>;

/// Keeps recently loaded tipsets in cache so that repeated backward walks over
/// the same stretch of chain do not hit cold storage.
pub struct ChainIndex<DB> {
    /// `Arc` reference tipset cache.
    ts_cache: TipsetCache,

    /// `Blockstore` pointer needed to load tipsets from cold storage.
    db: DB,
}

impl<DB: Blockstore> ChainIndex<DB> {
    pub fn new(db: DB, cache_size: NonZeroUsize) -> Self {
        let ts_cache = Mutex::new(LruCache::new(cache_size.get()));
        Self { ts_cache, db }
    }

    /// Loads a tipset from memory given the tipset keys and cache. Semantically
    /// identical to [`Tipset::load`] but the result is cached and a missing
    /// tipset is an error.
    pub fn load_tipset(&self, tsk: &TipsetKey) -> Result<Arc<Tipset>, Error> {
        if tsk.is_empty() {
            return Err(Error::UndefinedKey("empty tipset key".to_string()));
        }
        if let Some(ts) = self.ts_cache.lock().get(tsk) {
            trace!(%tsk, "tipset cache hit");
            return Ok(ts.clone());
        }

        let ts = Arc::new(
            Tipset::load(&self.db, tsk)?.ok_or_else(|| Error::NotFound(format!("Tipset {tsk}")))?,
        );
        self.ts_cache.lock().insert(tsk.clone(), ts.clone());
        Ok(ts)
    }

    /// Number of tipsets currently cached.
    pub fn cached(&self) -> usize {
        self.ts_cache.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use nonzero_ext::nonzero;

    use super::*;
    use crate::db::MemoryDB;
    use crate::test_utils::{genesis_tipset, persist_tipset, tipset_child};

    #[test]
    fn load_is_cached() {
        let db = Arc::new(MemoryDB::default());
        let genesis = genesis_tipset();
        let epoch1 = tipset_child(&genesis, 1);
        persist_tipset(&genesis, &db);
        persist_tipset(&epoch1, &db);

        let index = ChainIndex::new(db, nonzero!(1usize));
        assert_eq!(index.cached(), 0);
        let loaded = index.load_tipset(epoch1.key()).unwrap();
        assert_eq!(loaded.as_ref(), &epoch1);
        assert_eq!(index.cached(), 1);

        // Capacity of one: loading genesis evicts epoch 1.
        index.load_tipset(genesis.key()).unwrap();
        assert_eq!(index.cached(), 1);
        assert_eq!(index.load_tipset(epoch1.key()).unwrap().as_ref(), &epoch1);
    }

    #[test]
    fn missing_tipset() {
        let db = Arc::new(MemoryDB::default());
        let genesis = genesis_tipset();
        let index = ChainIndex::new(db, nonzero!(8usize));
        assert!(matches!(
            index.load_tipset(genesis.key()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            index.load_tipset(&TipsetKey::default()),
            Err(Error::UndefinedKey(_))
        ));
    }
}
