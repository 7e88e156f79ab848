// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::num::NonZeroUsize;

use crate::chain::Error;
use crate::shim::clock::ChainEpochDelta;
use crate::utils::io::read_toml;
use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Rounds in a proving period.
pub const PROVING_PERIOD: ChainEpochDelta = 20_000;

/// Extra rounds of history kept to resist generation attacks.
pub const GENERATION_ATTACK_THRESHOLD: ChainEpochDelta = 100;

/// Tipsets preceding the proving window that randomness is sampled from.
pub const RANDOMNESS_LOOKBACK: usize = 3;

const DEFAULT_TIPSET_CACHE_SIZE: NonZeroUsize = nonzero!(8192usize);

/// Protocol constants governing how much chain history validation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Policy {
    /// Rounds before a child tipset whose ancestors are still needed.
    #[default(PROVING_PERIOD + GENERATION_ATTACK_THRESHOLD)]
    pub ancestor_rounds_needed: ChainEpochDelta,
    /// Tipsets collected below the proving window for randomness.
    #[default(RANDOMNESS_LOOKBACK)]
    pub randomness_lookback: usize,
}

impl Policy {
    pub fn mainnet() -> Self {
        Self::default()
    }

    /// Short proving periods for local networks.
    pub fn devnet() -> Self {
        Self {
            ancestor_rounds_needed: 20,
            randomness_lookback: 1,
        }
    }
}

/// Defines all chain configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ChainConfig {
    pub policy: Policy,
    /// Number of tipsets kept in the chain index cache.
    #[default(DEFAULT_TIPSET_CACHE_SIZE)]
    pub tipset_cache_size: NonZeroUsize,
}

impl ChainConfig {
    pub fn mainnet() -> Self {
        Self::default()
    }

    pub fn devnet() -> Self {
        Self {
            policy: Policy::devnet(),
            ..Self::default()
        }
    }

    /// Parses a TOML configuration. Missing fields take their mainnet value.
    pub fn load(toml: &str) -> anyhow::Result<Self> {
        let config: Self = read_toml(toml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.policy.randomness_lookback == 0 {
            return Err(Error::ZeroLookback);
        }
        Ok(())
    }
}
