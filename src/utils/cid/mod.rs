// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use multihash_codetable::{Code, MultihashDigest as _};

/// Extension methods for constructing `dag-cbor` [Cid]
pub trait CidCborExt {
    /// Default CID builder for Filecoin
    ///
    /// - The default codec is [`fvm_ipld_encoding::DAG_CBOR`]
    /// - The default hash function is 256 bit BLAKE2b
    fn from_cbor_blake2b256<S: serde::ser::Serialize>(obj: &S) -> anyhow::Result<Cid> {
        let bytes = fvm_ipld_encoding::to_vec(obj)?;
        Ok(Cid::from_cbor_bytes_blake2b256(&bytes))
    }

    /// Same as [`CidCborExt::from_cbor_blake2b256`] for bytes that are
    /// already encoded.
    fn from_cbor_bytes_blake2b256(bytes: &[u8]) -> Cid {
        Cid::new_v1(fvm_ipld_encoding::DAG_CBOR, Code::Blake2b256.digest(bytes))
    }
}

impl CidCborExt for Cid {}
