// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

/// Height of a tipset in the chain. Heights advance every round, whether or
/// not a block was produced in it.
pub type ChainEpoch = u64;

/// Disambiguate the type to signify that we are expecting a delta and not an
/// actual epoch/height while maintaining the same type.
pub type ChainEpochDelta = ChainEpoch;
