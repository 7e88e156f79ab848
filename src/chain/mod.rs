// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT
pub mod ancestors;
pub mod store;

pub use self::{ancestors::*, store::*};
