// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use crate::blocks::{Error as BlkErr, Tipset, TipsetKey};
use crate::chain::{ChainReader, Error};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// A cursor walking a chain from a starting tipset towards genesis, one
/// tipset per [`AncestorIter::step`].
///
/// ```text
///           ┌───────┐          ┌───────┐  ┌───────┐
/// Genesis◄──┤Epoch 1│   Null   │Epoch 3◄──┤Epoch 4│ ◄── start
///           └───▲───┘          └───┬───┘  └───────┘
///               │                  │
///               └──────────────────┘
/// ```
///
/// Starting at epoch 4, successive values are epoch 4, 3, 1 and genesis.
/// Stepping from genesis marks the iterator complete; its value stays at
/// genesis.
pub struct AncestorIter<'a, R: ?Sized> {
    reader: &'a R,
    current: Arc<Tipset>,
    complete: bool,
    cancel: &'a CancellationToken,
}

impl<'a, R> AncestorIter<'a, R>
where
    R: ChainReader + ?Sized,
{
    pub fn new(reader: &'a R, start: Arc<Tipset>, cancel: &'a CancellationToken) -> Self {
        Self {
            reader,
            current: start,
            complete: false,
            cancel,
        }
    }

    /// The tipset the iterator currently points at.
    pub fn value(&self) -> &Arc<Tipset> {
        &self.current
    }

    /// Returns `true` once the iterator has stepped past genesis.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Moves to the parent of the current tipset.
    ///
    /// On error the iterator must be abandoned.
    pub fn step(&mut self) -> Result<(), Error> {
        let parents = self.current.parents();
        if parents.is_empty() {
            self.complete = true;
            return Ok(());
        }

        let parent = load_tipset_checked(self.reader, parents, self.cancel)?;
        if parent.epoch() >= self.current.epoch() {
            return Err(Error::Blockchain(BlkErr::InvalidTipset(format!(
                "parent {} at epoch {} is not below child {} at epoch {}",
                parent.key(),
                parent.epoch(),
                self.current.key(),
                self.current.epoch()
            ))));
        }
        trace!(epoch = parent.epoch(), "stepped to parent tipset");
        self.current = parent;
        Ok(())
    }
}

/// Loads a tipset unless the traversal has been cancelled.
pub(super) fn load_tipset_checked<R>(
    reader: &R,
    tsk: &TipsetKey,
    cancel: &CancellationToken,
) -> Result<Arc<Tipset>, Error>
where
    R: ChainReader + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    reader.load_tipset(tsk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestChain, tipset_child};

    #[test]
    fn walks_to_genesis_across_null_rounds() {
        let chain = TestChain::new();
        let tipsets = chain.extend(chain.genesis(), [1, 3, 4]);
        let cancel = CancellationToken::new();

        let mut iter = AncestorIter::new(&chain.store, tipsets[2].clone(), &cancel);
        let mut epochs = vec![];
        while !iter.is_complete() {
            epochs.push(iter.value().epoch());
            iter.step().unwrap();
        }
        assert_eq!(epochs, vec![4, 3, 1, 0]);
        assert_eq!(iter.value().as_ref(), chain.genesis().as_ref());

        // Stepping a complete iterator is a no-op.
        iter.step().unwrap();
        assert!(iter.is_complete());
        assert!(iter.value().is_genesis());
    }

    #[test]
    fn missing_parent_is_a_store_error() {
        let chain = TestChain::new();
        let orphan = tipset_child(chain.genesis(), 1);
        let child = Arc::new(tipset_child(&orphan, 2));
        chain.store.put_tipset(&child).unwrap();
        let cancel = CancellationToken::new();

        let mut iter = AncestorIter::new(&chain.store, child, &cancel);
        assert!(matches!(iter.step(), Err(Error::NotFound(_))));
    }

    #[test]
    fn cancelled_before_read() {
        let chain = TestChain::new();
        let tipsets = chain.extend(chain.genesis(), [1, 2]);
        let cancel = CancellationToken::new();
        let mut iter = AncestorIter::new(&chain.store, tipsets[1].clone(), &cancel);
        iter.step().unwrap();
        cancel.cancel();
        assert!(matches!(iter.step(), Err(Error::Cancelled)));
    }

    #[test]
    fn parent_must_be_older() {
        let chain = TestChain::new();
        let parent = chain.extend(chain.genesis(), [5]);
        let bad_child = Arc::new(tipset_child(&parent[0], 5));
        chain.store.put_tipset(&bad_child).unwrap();
        let cancel = CancellationToken::new();

        let mut iter = AncestorIter::new(&chain.store, bad_child, &cancel);
        assert!(matches!(
            iter.step(),
            Err(Error::Blockchain(BlkErr::InvalidTipset(_)))
        ));
    }
}
