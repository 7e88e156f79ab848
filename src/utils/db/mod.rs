// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::utils::cid::CidCborExt as _;
use anyhow::Context as _;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::CborStore as _;
use serde::{Serialize, de::DeserializeOwned};

/// Extension methods for storing and loading `dag-cbor` objects.
pub trait CborStoreExt: Blockstore + Sized {
    /// Encodes `obj` as `dag-cbor` and stores it under its 256 bit BLAKE2b
    /// [`Cid`].
    fn put_cbor_default<S: Serialize>(&self, obj: &S) -> anyhow::Result<Cid> {
        let bytes = fvm_ipld_encoding::to_vec(obj)?;
        let cid = Cid::from_cbor_bytes_blake2b256(&bytes);
        self.put_keyed(&cid, &bytes)?;
        Ok(cid)
    }

    /// Same as [`fvm_ipld_encoding::CborStore::get_cbor`], but a missing entry
    /// is an error.
    fn get_cbor_required<T: DeserializeOwned>(&self, cid: &Cid) -> anyhow::Result<T> {
        self.get_cbor(cid)?
            .with_context(|| format!("Entry not found in block store: cid={cid}"))
    }
}

impl<T: Blockstore> CborStoreExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDB;

    #[test]
    fn put_then_get() {
        let db = MemoryDB::default();
        let cid = db.put_cbor_default(&(1_u64, "forest")).unwrap();
        assert_eq!(cid, Cid::from_cbor_blake2b256(&(1_u64, "forest")).unwrap());

        let (n, s): (u64, String) = db.get_cbor_required(&cid).unwrap();
        assert_eq!((n, s.as_str()), (1, "forest"));
    }

    #[test]
    fn missing_entry_is_an_error() {
        let db = MemoryDB::default();
        let cid = Cid::from_cbor_blake2b256(&"absent").unwrap();
        assert!(db.get_cbor_required::<String>(&cid).is_err());
    }
}
