// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod address;
pub mod bigint;
pub mod clock;

mod fvm_shared_latest {
    pub use fvm_shared4::*;
}
