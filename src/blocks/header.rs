// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::ops::Deref;
use std::sync::OnceLock;

use super::TipsetKey;
use crate::shim::{address::Address, bigint::BigInt, clock::ChainEpoch};
use crate::utils::cid::CidCborExt as _;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::CborStore as _;
use fvm_ipld_encoding::tuple::*;
use serde::{Deserialize, Serialize};

#[derive(Deserialize_tuple, Serialize_tuple, Clone, Eq, PartialEq, Debug)]
pub struct RawBlockHeader {
    /// The address of the miner actor that mined this block
    pub miner_address: Address,
    /// The set of parents this block was based on.
    /// Typically one, but can be several in the case where there were multiple
    /// winning ticket-holders for an epoch. Empty for genesis.
    pub parents: TipsetKey,
    /// The aggregate chain weight of the parent set
    pub weight: BigInt,
    /// The round in which this block was produced.
    pub epoch: ChainEpoch,
    /// The CID of the parent state root after calculating parent tipset.
    pub state_root: Cid,
    /// Block creation time, in seconds since the Unix epoch
    pub timestamp: u64,
}

impl RawBlockHeader {
    pub fn cid(&self) -> Cid {
        Cid::from_cbor_blake2b256(self).expect("block serialization cannot fail")
    }
}

/// A [`RawBlockHeader`] which caches its [`Cid`].
#[derive(Debug, Clone)]
pub struct BlockHeader {
    uncached: RawBlockHeader,
    cid: OnceLock<Cid>,
}

impl PartialEq for BlockHeader {
    fn eq(&self, other: &Self) -> bool {
        self.cid() == other.cid()
    }
}

impl Eq for BlockHeader {}

impl Deref for BlockHeader {
    type Target = RawBlockHeader;

    fn deref(&self) -> &Self::Target {
        &self.uncached
    }
}

impl From<RawBlockHeader> for BlockHeader {
    fn from(uncached: RawBlockHeader) -> Self {
        Self::new(uncached)
    }
}

impl BlockHeader {
    pub fn new(uncached: RawBlockHeader) -> Self {
        Self {
            uncached,
            cid: OnceLock::new(),
        }
    }

    /// Returns [`None`] if the blockstore doesn't contain the CID.
    pub fn load(store: &impl Blockstore, cid: Cid) -> anyhow::Result<Option<Self>> {
        if let Some(uncached) = store.get_cbor::<RawBlockHeader>(&cid)? {
            Ok(Some(Self {
                uncached,
                cid: OnceLock::from(cid),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn cid(&self) -> &Cid {
        self.cid.get_or_init(|| self.uncached.cid())
    }
}

impl Serialize for BlockHeader {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.uncached.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BlockHeader {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawBlockHeader::deserialize(deserializer).map(Self::new)
    }
}
