// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Backward traversal of the chain: collecting the ancestors needed to
//! validate proofs and sample their randomness, and locating the fork point
//! of two competing chains.
//!
//! Null rounds advance the chain height without producing a tipset, so every
//! operation here reasons about "the first tipset at or below a height"
//! rather than "the tipset at a height".

mod collect;
mod common;
mod iter;

pub use self::{collect::*, common::*, iter::*};
