// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt;

use super::{BlockHeader, Error};
use crate::shim::clock::ChainEpoch;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use itertools::Itertools as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A set of CIDs forming a unique key for a [`Tipset`].
///
/// The CIDs are kept sorted and deduplicated, so keys built from the same
/// CIDs compare and hash equal regardless of insertion order. An empty key is
/// the parent key of a genesis tipset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TipsetKey(Vec<Cid>);

impl TipsetKey {
    pub fn cids(&self) -> &[Cid] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.0.binary_search(cid).is_ok()
    }
}

impl FromIterator<Cid> for TipsetKey {
    fn from_iter<T: IntoIterator<Item = Cid>>(iter: T) -> Self {
        Self(iter.into_iter().sorted().dedup().collect())
    }
}

impl From<Vec<Cid>> for TipsetKey {
    fn from(cids: Vec<Cid>) -> Self {
        Self::from_iter(cids)
    }
}

impl fmt::Display for TipsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

impl Serialize for TipsetKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TipsetKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Cid>::deserialize(deserializer).map(Self::from)
    }
}

/// An immutable set of blocks at the same height with the same parent set.
/// Blocks in a tipset are canonically ordered by CID.
#[derive(Clone, Debug)]
pub struct Tipset {
    headers: Vec<BlockHeader>,
    key: TipsetKey,
}

impl PartialEq for Tipset {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Tipset {}

impl From<BlockHeader> for Tipset {
    fn from(header: BlockHeader) -> Self {
        let key = TipsetKey(vec![*header.cid()]);
        Self {
            headers: vec![header],
            key,
        }
    }
}

impl Tipset {
    /// Builds a new tipset from a collection of headers.
    /// The headers must share the same epoch and the same parent set.
    /// Duplicate headers are collapsed.
    pub fn new(headers: impl IntoIterator<Item = BlockHeader>) -> Result<Self, Error> {
        let headers = headers
            .into_iter()
            .sorted_by_key(|h| *h.cid())
            .dedup_by(|a, b| a.cid() == b.cid())
            .collect_vec();

        let first = headers.first().ok_or(Error::NoBlocks)?;
        for header in headers.iter().skip(1) {
            if header.epoch != first.epoch {
                return Err(Error::InvalidTipset(format!(
                    "epochs are not equal: {} != {}",
                    header.epoch, first.epoch
                )));
            }
            if header.parents != first.parents {
                return Err(Error::InvalidTipset(format!(
                    "parent cids are not equal: {} != {}",
                    header.parents, first.parents
                )));
            }
        }

        let key = TipsetKey(headers.iter().map(|h| *h.cid()).collect());
        Ok(Self { headers, key })
    }

    /// Loads a tipset from the block store. Returns [`None`] if any of the
    /// headers named by `tsk` is missing.
    pub fn load(store: &impl Blockstore, tsk: &TipsetKey) -> Result<Option<Tipset>, Error> {
        let headers = tsk
            .cids()
            .iter()
            .map(|cid| BlockHeader::load(store, *cid))
            .collect::<anyhow::Result<Option<Vec<_>>>>()?;
        headers.map(Tipset::new).transpose()
    }

    /// Returns all block headers in the tipset.
    pub fn block_headers(&self) -> &[BlockHeader] {
        &self.headers
    }

    /// Returns the height shared by all blocks in the tipset.
    pub fn epoch(&self) -> ChainEpoch {
        self.min_header().epoch
    }

    /// Returns the key of the parent tipset. Empty for genesis.
    pub fn parents(&self) -> &TipsetKey {
        &self.min_header().parents
    }

    pub fn key(&self) -> &TipsetKey {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns `true` if the tipset has no parents.
    pub fn is_genesis(&self) -> bool {
        self.parents().is_empty()
    }

    /// Returns the smallest timestamp of all blocks in the tipset.
    pub fn min_timestamp(&self) -> u64 {
        self.headers
            .iter()
            .map(|h| h.timestamp)
            .min()
            .unwrap_or_default()
    }

    fn min_header(&self) -> &BlockHeader {
        // `Tipset::new` and `From<BlockHeader>` both guarantee at least one header.
        &self.headers[0]
    }
}
