//! Lifecycle notifications from an [`ElementStateTree`](super::ElementStateTree).

use trellis_core::{ElementIdentifier, Size, SizeConstraint};

use super::StateId;

/// Whether a request was answered from a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
    /// Answered from a cache without running the element's content.
    Cached,
    /// The element's content ran.
    Performed,
}

/// Why a state's caches were dropped during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidationReason {
    /// The new element is not equivalent to the previous one.
    ElementChanged,
    /// An environment value read during measurement changed.
    EnvironmentChanged,
}

/// Receives lifecycle events from a state tree.
///
/// Every method has an empty default, so observers implement only what they
/// need. Observers must not reach back into the tree they observe.
#[allow(unused_variables)]
pub trait StateTreeObserver {
    /// A root state was created in an empty tree.
    fn did_set_up_root(&self, root: StateId, identifier: &ElementIdentifier) {}

    /// The root was updated in place.
    fn did_update_root(&self, root: StateId, identifier: &ElementIdentifier) {}

    /// The root's identifier changed, so the old root was torn down and a
    /// new one created.
    fn did_replace_root(&self, old: StateId, new: StateId, identifier: &ElementIdentifier) {}

    /// The whole tree was torn down.
    fn did_tear_down_root(&self, root: StateId) {}

    /// A state was created.
    fn did_create_state(&self, state: StateId, identifier: &ElementIdentifier) {}

    /// A state was torn down.
    fn did_remove_state(&self, state: StateId, identifier: &ElementIdentifier) {}

    /// A state's measurement and layout caches were dropped.
    fn did_invalidate_state(&self, state: StateId, reason: InvalidationReason) {}

    /// A state was measured.
    fn did_measure(
        &self,
        state: StateId,
        constraint: SizeConstraint,
        size: Size,
        outcome: CacheOutcome,
    ) {
    }

    /// A state's children were placed.
    fn did_layout(&self, state: StateId, size: Size, outcome: CacheOutcome) {}
}
