// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::fvm_shared_latest::bigint::bigint_ser;
use anyhow::Context as _;
use num_traits::ToPrimitive as _;
use serde::{Deserialize, Serialize};

#[derive(
    Default,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Deref,
    derive_more::DerefMut,
    derive_more::From,
)]
#[serde(transparent)]
pub struct BigInt(#[serde(with = "bigint_ser")] num_bigint::BigInt);

impl BigInt {
    /// Narrows the value to a `u64`. Negative values and values wider than
    /// 64 bits are rejected rather than truncated.
    pub fn try_to_u64(&self) -> anyhow::Result<u64> {
        self.0
            .to_u64()
            .with_context(|| format!("{} does not fit in a u64", self.0))
    }
}

impl From<u64> for BigInt {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}
