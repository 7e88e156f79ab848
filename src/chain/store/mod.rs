// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod chain_store;
mod errors;
pub mod index;

use std::sync::Arc;

use crate::blocks::{Tipset, TipsetKey};
use auto_impl::auto_impl;

pub use self::{chain_store::*, errors::*};

/// Read access to a chain of tipsets.
///
/// Implementations must be read-consistent for the duration of a single
/// traversal and safe to share between concurrent traversals.
#[auto_impl(&, Arc)]
pub trait ChainReader {
    /// Returns the key of the current heaviest tipset.
    fn heaviest_tipset_key(&self) -> Result<TipsetKey, Error>;

    /// Resolves a tipset key to its tipset.
    fn load_tipset(&self, tsk: &TipsetKey) -> Result<Arc<Tipset>, Error>;
}
