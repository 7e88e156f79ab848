// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Read-only views of the storage power table encoded in a state tree.

use std::sync::Arc;

use crate::shim::{address::Address, bigint::BigInt};
use crate::utils::db::CborStoreExt as _;
use ahash::HashMap;
use anyhow::Context as _;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::tuple::*;
use serde::{Serialize, de::DeserializeOwned};

/// Address of the storage market actor, `f05`.
pub const STORAGE_MARKET_ACTOR_ADDR: Address = Address::new_id(5);

/// Access to the state of the actors at one point of the chain.
pub trait StateTree {
    /// Loads and decodes the state of the actor at `addr`. Fails if the actor
    /// or its state is missing.
    fn get_actor_state<T: DeserializeOwned>(&self, addr: &Address) -> anyhow::Result<T>;
}

/// A [`StateTree`] mapping actor addresses to state heads in a block store.
pub struct BlockstoreStateTree<DB> {
    db: Arc<DB>,
    heads: HashMap<Address, Cid>,
}

impl<DB: Blockstore> BlockstoreStateTree<DB> {
    pub fn new(db: Arc<DB>) -> Self {
        Self {
            db,
            heads: HashMap::default(),
        }
    }

    /// Stores `state` and makes it the head of the actor at `addr`.
    pub fn set_actor_state<T: Serialize>(
        &mut self,
        addr: Address,
        state: &T,
    ) -> anyhow::Result<Cid> {
        let head = self.db.put_cbor_default(state)?;
        self.heads.insert(addr, head);
        Ok(head)
    }
}

impl<DB: Blockstore> StateTree for BlockstoreStateTree<DB> {
    fn get_actor_state<T: DeserializeOwned>(&self, addr: &Address) -> anyhow::Result<T> {
        let head = self
            .heads
            .get(addr)
            .with_context(|| format!("Failed to get actor for address {addr}"))?;
        self.db
            .get_cbor_required(head)
            .with_context(|| format!("Failed to load state of actor {addr}"))
    }
}

/// State of the storage market actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct MarketStorage {
    pub total_committed_storage: BigInt,
}

/// State of a miner actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct MinerStorage {
    pub power: BigInt,
}

/// Storage power as seen by the chain manager.
pub trait PowerTableView<S: StateTree> {
    /// Total bytes stored by all miners.
    fn total(&self, state: &S) -> anyhow::Result<u64>;

    /// Bytes stored by the miner at `miner`.
    fn miner(&self, state: &S, miner: &Address) -> anyhow::Result<u64>;

    /// Returns `true` if `miner` is a miner with non-zero power. A miner
    /// whose power cannot be read has none.
    fn has_power(&self, state: &S, miner: &Address) -> bool {
        matches!(self.miner(state, miner), Ok(power) if power > 0)
    }
}

/// Reads power from the storage market and miner actor states.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarketView;

impl<S: StateTree> PowerTableView<S> for MarketView {
    fn total(&self, state: &S) -> anyhow::Result<u64> {
        let storage: MarketStorage = state.get_actor_state(&STORAGE_MARKET_ACTOR_ADDR)?;
        storage
            .total_committed_storage
            .try_to_u64()
            .context("invalid total committed storage")
    }

    fn miner(&self, state: &S, miner: &Address) -> anyhow::Result<u64> {
        let storage: MinerStorage = state.get_actor_state(miner)?;
        storage
            .power
            .try_to_u64()
            .with_context(|| format!("invalid power for miner {miner}"))
    }
}
