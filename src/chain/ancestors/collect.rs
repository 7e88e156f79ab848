// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use super::iter::{AncestorIter, load_tipset_checked};
use crate::blocks::Tipset;
use crate::chain::{ChainReader, Error};
use crate::networks::Policy;
use crate::shim::clock::{ChainEpoch, ChainEpochDelta};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Collects the tipsets from the iterator's position downwards while their
/// epoch is at least `min_epoch`. The result is ordered from the highest
/// epoch to the lowest and is empty only if the starting tipset is already
/// below `min_epoch`.
pub fn collect_tipsets_of_height_at_least<R>(
    iter: &mut AncestorIter<'_, R>,
    min_epoch: ChainEpoch,
) -> Result<Vec<Arc<Tipset>>, Error>
where
    R: ChainReader + ?Sized,
{
    let mut collected = vec![];
    while !iter.is_complete() {
        let ts = iter.value();
        if ts.epoch() < min_epoch {
            break;
        }
        collected.push(ts.clone());
        iter.step()?;
    }
    Ok(collected)
}

/// Collects up to `n` tipsets starting at the iterator's position, stepping
/// after each one. Fewer are returned when genesis is reached first. On
/// success the iterator is left on the tipset following the last one
/// collected.
pub fn collect_at_most_n_tipsets<R>(
    iter: &mut AncestorIter<'_, R>,
    n: usize,
) -> Result<Vec<Arc<Tipset>>, Error>
where
    R: ChainReader + ?Sized,
{
    let mut collected = Vec::with_capacity(n);
    while collected.len() < n && !iter.is_complete() {
        collected.push(iter.value().clone());
        iter.step()?;
    }
    Ok(collected)
}

/// Returns the ancestors of `base` needed to process a child tipset at
/// `child_epoch`.
///
/// The result is the concatenation of two runs, ordered from the highest
/// epoch to the lowest:
/// - the proving period ancestors: every tipset from `base` down with an
///   epoch of at least `child_epoch - ancestor_rounds_needed`. The oldest of
///   them is the earliest tipset that may still begin a live proving period.
/// - the randomness ancestors: the `lookback` tipsets directly preceding the
///   proving period ancestors. The oldest of them is where randomness is
///   sampled for proofs whose proving period begins at the oldest proving
///   period ancestor.
///
/// Null rounds make the length of the first run vary with the number of
/// skipped rounds, while the second run always holds `lookback` tipsets
/// unless genesis is reached first. If genesis is within the proving period
/// only the first run is returned.
#[tracing::instrument(skip_all, fields(child_epoch = child_epoch, lookback = lookback))]
pub fn get_recent_ancestors<R>(
    base: Arc<Tipset>,
    reader: &R,
    child_epoch: ChainEpoch,
    ancestor_rounds_needed: ChainEpochDelta,
    lookback: usize,
    cancel: &CancellationToken,
) -> Result<Vec<Arc<Tipset>>, Error>
where
    R: ChainReader + ?Sized,
{
    if lookback == 0 {
        return Err(Error::ZeroLookback);
    }
    let earliest = child_epoch.saturating_sub(ancestor_rounds_needed);
    let base_epoch = base.epoch();
    if base_epoch < earliest {
        return Err(Error::BaseBelowProvingWindow {
            base: base_epoch,
            earliest,
        });
    }

    let mut iter = AncestorIter::new(reader, base, cancel);
    let mut ancestors = collect_tipsets_of_height_at_least(&mut iter, earliest)?;
    let oldest = ancestors.last().ok_or(Error::BaseBelowProvingWindow {
        base: base_epoch,
        earliest,
    })?;
    debug!(
        proving_period_ancestors = ancestors.len(),
        oldest_epoch = oldest.epoch(),
        "collected proving period ancestors"
    );

    // No parents means genesis is within the proving period.
    if oldest.is_genesis() {
        return Ok(ancestors);
    }

    let lookback_base = load_tipset_checked(reader, oldest.parents(), cancel)?;
    let mut iter = AncestorIter::new(reader, lookback_base, cancel);
    let randomness_ancestors = collect_at_most_n_tipsets(&mut iter, lookback)?;
    debug!(
        randomness_ancestors = randomness_ancestors.len(),
        "collected randomness ancestors"
    );

    ancestors.extend(randomness_ancestors);
    Ok(ancestors)
}

/// Same as [`get_recent_ancestors`], starting at the heaviest tipset and
/// using the proving window and randomness lookback of `policy`.
pub fn get_recent_ancestors_of_heaviest_chain<R>(
    reader: &R,
    child_epoch: ChainEpoch,
    policy: &Policy,
    cancel: &CancellationToken,
) -> Result<Vec<Arc<Tipset>>, Error>
where
    R: ChainReader + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    let head = load_tipset_checked(reader, &reader.heaviest_tipset_key()?, cancel)?;
    get_recent_ancestors(
        head,
        reader,
        child_epoch,
        policy.ancestor_rounds_needed,
        policy.randomness_lookback,
        cancel,
    )
}
