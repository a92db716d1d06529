//! Persistent element state.
//!
//! An [`ElementStateTree`] shadows the immutable element tree across
//! updates. Each retained position holds an [`ElementState`] that remembers
//! the element, its derived content, its children by identifier, and the
//! sizes and child frames computed for it. Updating the tree with a new
//! element value reuses states whose identifiers recur and tears down the
//! rest, so unchanged subtrees keep their caches from one pass to the next.

mod arena;
mod observer;
mod tree;

use std::{collections::HashMap, rc::Rc};

use trellis_core::{
    AnyElement, ElementContent, ElementIdentifier, Environment, EquivalencyContext, KeySet,
    LayoutAttributes, LayoutOptions, Size,
};

pub use arena::StateId;
pub use observer::{CacheOutcome, InvalidationReason, StateTreeObserver};
pub use tree::ElementStateTree;

use crate::cache::{CacheStats, HintingSizeCache};

/// Layout cache key: the exact bits of a final size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SizeKey(u32, u32);

impl SizeKey {
    fn of(size: Size) -> Self {
        // Adding zero folds -0.0 into 0.0.
        Self((size.width + 0.0).to_bits(), (size.height + 0.0).to_bits())
    }
}

/// The retained state of one element position.
pub struct ElementState {
    identifier: ElementIdentifier,
    element: AnyElement,
    parent: Option<StateId>,
    depth: usize,
    content: ElementContent,
    environment: Environment,
    child_environment: Environment,
    adapter_dependencies: KeySet,
    children: Vec<StateId>,
    child_index: HashMap<ElementIdentifier, StateId>,
    measurables: Option<Rc<[StateId]>>,
    sizes: HintingSizeCache,
    layouts: HashMap<SizeKey, Rc<[LayoutAttributes]>>,
    dependencies: KeySet,
}

impl core::fmt::Debug for ElementState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElementState")
            .field("identifier", &self.identifier)
            .field("parent", &self.parent)
            .field("depth", &self.depth)
            .field("children", &self.children)
            .field("cached_sizes", &self.sizes.len())
            .field("cached_layouts", &self.layouts.len())
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

impl ElementState {
    fn new(
        identifier: ElementIdentifier,
        element: AnyElement,
        parent: Option<StateId>,
        depth: usize,
        environment: &Environment,
        options: LayoutOptions,
    ) -> Self {
        let content = element.content();
        let environment = environment.detached();
        let (child_environment, adapter_dependencies) =
            derive_child_environment(&content, &environment);
        Self {
            identifier,
            element,
            parent,
            depth,
            content,
            environment,
            child_environment,
            adapter_dependencies,
            children: Vec::new(),
            child_index: HashMap::new(),
            measurables: None,
            sizes: HintingSizeCache::new(options),
            layouts: HashMap::new(),
            dependencies: KeySet::new(),
        }
    }

    /// The element's identifier among its siblings.
    #[must_use]
    pub const fn identifier(&self) -> &ElementIdentifier {
        &self.identifier
    }

    /// The element most recently supplied for this position.
    #[must_use]
    pub const fn element(&self) -> &AnyElement {
        &self.element
    }

    /// The parent state, or `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Distance from the root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Child states, in layout order.
    #[must_use]
    pub fn children(&self) -> &[StateId] {
        &self.children
    }

    /// The environment this state was last updated in.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Environment keys read while measuring or laying out this subtree.
    #[must_use]
    pub const fn dependencies(&self) -> &KeySet {
        &self.dependencies
    }

    /// Number of constraint keys in the size cache.
    #[must_use]
    pub fn cached_sizes(&self) -> usize {
        self.sizes.len()
    }

    /// Number of final sizes with cached child frames.
    #[must_use]
    pub fn cached_layouts(&self) -> usize {
        self.layouts.len()
    }

    /// Size cache counters.
    #[must_use]
    pub const fn size_cache_stats(&self) -> CacheStats {
        self.sizes.stats()
    }

    fn invalidate(&mut self) {
        self.sizes.invalidate();
        self.layouts.clear();
        self.dependencies = KeySet::new();
    }

    /// Takes a new element and environment. Returns why the caches were
    /// dropped, if they were.
    fn replace(
        &mut self,
        element: AnyElement,
        environment: &Environment,
    ) -> Option<InvalidationReason> {
        let environment = environment.detached();
        let same_element = self.element.is_equivalent(&element);
        let reason = if !same_element {
            Some(InvalidationReason::ElementChanged)
        } else if !self.environment.is_equivalent_for(
            &environment,
            EquivalencyContext::Sizing,
            &self.dependencies,
        ) {
            Some(InvalidationReason::EnvironmentChanged)
        } else {
            None
        };

        if !same_element {
            self.content = element.content();
        }
        self.element = element;
        (self.child_environment, self.adapter_dependencies) =
            derive_child_environment(&self.content, &environment);
        self.environment = environment;

        if reason.is_some() {
            self.invalidate();
        }
        reason
    }

    /// The children to hand to this state's content, in content order.
    fn measurables(&mut self, options: LayoutOptions) -> Rc<[StateId]> {
        if !options.measureable_storage_cache() {
            return self.resolve_measurables();
        }
        if let Some(measurables) = &self.measurables {
            return measurables.clone();
        }
        let measurables = self.resolve_measurables();
        self.measurables = Some(measurables.clone());
        measurables
    }

    fn resolve_measurables(&self) -> Rc<[StateId]> {
        self.content
            .children()
            .iter()
            .filter_map(|child| self.child_index.get(&child.identifier).copied())
            .collect()
    }
}

/// The environment children see, and the keys the content read to derive it.
fn derive_child_environment(
    content: &ElementContent,
    environment: &Environment,
) -> (Environment, KeySet) {
    let observing = environment.observing();
    let child_environment = content.child_environment(&observing).detached();
    (child_environment, observing.observed_keys())
}
