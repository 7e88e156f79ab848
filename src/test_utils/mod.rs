// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::{
    Arc,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};

use crate::blocks::{BlockHeader, RawBlockHeader, Tipset, TipsetKey};
use crate::chain::{ChainReader, ChainStore, Error};
use crate::db::MemoryDB;
use crate::networks::ChainConfig;
use crate::shim::{address::Address, bigint::BigInt, clock::ChainEpoch};
use crate::utils::cid::CidCborExt as _;
use crate::utils::db::CborStoreExt as _;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use tokio_util::sync::CancellationToken;

/// Builds a header with a unique timestamp, so that every header (and every
/// tipset made from it) gets a distinct CID.
pub fn header(parents: TipsetKey, epoch: ChainEpoch) -> BlockHeader {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    BlockHeader::new(RawBlockHeader {
        miner_address: Address::new_id(1000),
        parents,
        weight: BigInt::from(epoch),
        epoch,
        state_root: Cid::from_cbor_blake2b256(&"state root").unwrap(),
        timestamp: n,
    })
}

pub fn genesis_tipset() -> Tipset {
    Tipset::from(header(TipsetKey::default(), 0))
}

pub fn tipset_child(parent: &Tipset, epoch: ChainEpoch) -> Tipset {
    Tipset::from(header(parent.key().clone(), epoch))
}

pub fn persist_tipset(tipset: &Tipset, db: &impl Blockstore) {
    for block in tipset.block_headers() {
        db.put_cbor_default(block).unwrap();
    }
}

/// A [`ChainStore`] over a [`MemoryDB`] with its own genesis.
pub struct TestChain {
    pub db: Arc<MemoryDB>,
    pub store: ChainStore<MemoryDB>,
    genesis: Arc<Tipset>,
}

impl TestChain {
    pub fn new() -> Self {
        let db = Arc::new(MemoryDB::default());
        let genesis = genesis_tipset();
        let store = ChainStore::new(
            db.clone(),
            db.clone(),
            &ChainConfig::default(),
            genesis.block_headers()[0].clone(),
        )
        .unwrap();
        Self {
            db,
            store,
            genesis: Arc::new(genesis),
        }
    }

    pub fn genesis(&self) -> &Arc<Tipset> {
        &self.genesis
    }

    /// Persists one single-block tipset per epoch, each the child of the
    /// previous one, starting from `parent`. Epochs left out are null rounds.
    /// Returns the new tipsets from oldest to newest.
    pub fn extend(
        &self,
        parent: &Tipset,
        epochs: impl IntoIterator<Item = ChainEpoch>,
    ) -> Vec<Arc<Tipset>> {
        let mut parent = parent.clone();
        epochs
            .into_iter()
            .map(|epoch| {
                let child = tipset_child(&parent, epoch);
                self.store.put_tipset(&child).unwrap();
                parent = child.clone();
                Arc::new(child)
            })
            .collect()
    }

    /// Persists a parentless tipset at `epoch`, the root of a chain that
    /// shares nothing with this one.
    pub fn new_root(&self, epoch: ChainEpoch) -> Arc<Tipset> {
        let root = Tipset::from(header(TipsetKey::default(), epoch));
        self.store.put_tipset(&root).unwrap();
        Arc::new(root)
    }

    /// Extends genesis with a tipset at each of `1..=tip` except `nulls` and
    /// makes the last one the heaviest tipset. Returns every tipset including
    /// genesis, from oldest to newest.
    pub fn linear(&self, tip: ChainEpoch, nulls: &[ChainEpoch]) -> Vec<Arc<Tipset>> {
        let tipsets = std::iter::once(self.genesis.clone())
            .chain(self.extend(
                &self.genesis,
                (1..=tip).filter(|epoch| !nulls.contains(epoch)),
            ))
            .collect::<Vec<_>>();
        if let Some(head) = tipsets.last() {
            self.store.set_heaviest_tipset(head).unwrap();
        }
        tipsets
    }
}

/// Fails every load of `poisoned`, as a store that lost an entry would.
pub struct FailingReader<R> {
    pub inner: R,
    pub poisoned: TipsetKey,
}

impl<R: ChainReader> ChainReader for FailingReader<R> {
    fn heaviest_tipset_key(&self) -> Result<TipsetKey, Error> {
        self.inner.heaviest_tipset_key()
    }

    fn load_tipset(&self, tsk: &TipsetKey) -> Result<Arc<Tipset>, Error> {
        if tsk == &self.poisoned {
            return Err(Error::Db(anyhow::anyhow!("disk on fire")));
        }
        self.inner.load_tipset(tsk)
    }
}

/// Cancels `cancel` once `reads` tipsets have been loaded.
pub struct CancelAfterReads<R> {
    pub inner: R,
    pub cancel: CancellationToken,
    pub reads: AtomicUsize,
}

impl<R: ChainReader> CancelAfterReads<R> {
    pub fn new(inner: R, reads: usize) -> Self {
        Self {
            inner,
            cancel: CancellationToken::new(),
            reads: AtomicUsize::new(reads),
        }
    }
}

impl<R: ChainReader> ChainReader for CancelAfterReads<R> {
    fn heaviest_tipset_key(&self) -> Result<TipsetKey, Error> {
        self.inner.heaviest_tipset_key()
    }

    fn load_tipset(&self, tsk: &TipsetKey) -> Result<Arc<Tipset>, Error> {
        if self.reads.fetch_sub(1, Ordering::Relaxed) <= 1 {
            self.cancel.cancel();
        }
        self.inner.load_tipset(tsk)
    }
}
