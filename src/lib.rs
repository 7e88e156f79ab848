// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Chain ancestry for Filecoin nodes.
//!
//! Walks a chain of tipsets backwards from a base tipset to collect the
//! ancestors needed to validate time-bound proofs ([`chain::get_recent_ancestors`])
//! and to find where two competing chains diverge
//! ([`chain::find_common_ancestor`]).

pub mod blocks;
pub mod chain;
pub mod chain_sync;
pub mod db;
pub mod networks;
pub mod power;
pub mod shim;
pub mod utils;

#[cfg(test)]
mod test_utils;
