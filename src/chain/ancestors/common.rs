// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use super::iter::AncestorIter;
use crate::blocks::Tipset;
use crate::chain::{ChainReader, Error};
use crate::shim::clock::ChainEpoch;
use tracing::debug;

/// Returns the most recent tipset shared by the chains behind `old` and
/// `new`.
///
/// ```text
///                       ┌────────┐  ┌────────┐
///                   ┌───┤Epoch 3A◄──┤Epoch 4A│ ◄── old
///           ┌───────▼┐  └────────┘  └────────┘
/// Genesis◄──┤Epoch 2 │
///           └───────▲┘     Null     ┌────────┐
///                   └───────────────┤Epoch 4B│ ◄── new
///                                   └────────┘
/// ```
///
/// Each round moves the iterator at the higher epoch down to the first
/// tipset at or below the other's epoch. When both sit at the same epoch on
/// different tipsets, both move strictly below it. Above, the walk visits
/// (4A, 4B), (3A, 2), (2, 2) and returns epoch 2.
///
/// Returns [`Error::NoCommonAncestor`] when either chain runs out first.
#[tracing::instrument(skip_all)]
pub fn find_common_ancestor<R>(
    mut old: AncestorIter<'_, R>,
    mut new: AncestorIter<'_, R>,
) -> Result<Arc<Tipset>, Error>
where
    R: ChainReader + ?Sized,
{
    loop {
        let old_epoch = old.value().epoch();
        let new_epoch = new.value().epoch();

        if old.value() == new.value() {
            debug!(epoch = old_epoch, key = %old.value().key(), "found common ancestor");
            return Ok(old.value().clone());
        }

        if old_epoch < new_epoch {
            step_to_epoch_or_lower(&mut new, old_epoch)?;
        } else if new_epoch < old_epoch {
            step_to_epoch_or_lower(&mut old, new_epoch)?;
        } else {
            // Distinct tipsets at the same epoch: a fork at this height.
            let below = old_epoch.checked_sub(1).ok_or(Error::NoCommonAncestor)?;
            step_to_epoch_or_lower(&mut old, below)?;
            step_to_epoch_or_lower(&mut new, below)?;
        }
    }
}

/// Steps `iter` back until it points at the first tipset with an epoch at or
/// below `end`. Null rounds at `end` are skipped past to the next older
/// tipset.
fn step_to_epoch_or_lower<R>(iter: &mut AncestorIter<'_, R>, end: ChainEpoch) -> Result<(), Error>
where
    R: ChainReader + ?Sized,
{
    loop {
        if iter.is_complete() {
            return Err(Error::NoCommonAncestor);
        }
        if iter.value().epoch() <= end {
            return Ok(());
        }
        iter.step()?;
    }
}
