use core::{
    cell::{Ref, RefCell},
    fmt,
};
use std::{collections::HashMap, mem, rc::Rc};

use tracing::{debug, debug_span, trace_span, warn};
use trellis_core::{
    AnyElement, ElementContent, ElementIdentifier, Environment, LayoutAttributes, LayoutOptions,
    Measurable, Rect, Size, SizeConstraint,
};

use super::{CacheOutcome, ElementState, SizeKey, StateId, StateTreeObserver, arena::Arena};
use crate::LayoutResultNode;

/// A persistent shadow of an element tree.
///
/// The tree is single-threaded and not re-entrant: measurement and layout
/// closures must not update the tree they are being measured by.
///
/// ```ignore
/// let mut tree = ElementStateTree::new(LayoutOptions::default());
/// tree.update(Row::new().child(title).child(badge), &environment);
/// let node = tree.layout(Rect::from_size(Size::new(320.0, 44.0)));
///
/// // A second update with an equivalent tree keeps every cached size.
/// tree.update(Row::new().child(title).child(badge), &environment);
/// ```
pub struct ElementStateTree {
    options: LayoutOptions,
    arena: RefCell<Arena<ElementState>>,
    root: Option<StateId>,
    observer: Option<Rc<dyn StateTreeObserver>>,
}

impl fmt::Debug for ElementStateTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementStateTree")
            .field("options", &self.options)
            .field("root", &self.root)
            .field("len", &self.len())
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl Default for ElementStateTree {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl ElementStateTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            arena: RefCell::new(Arena::default()),
            root: None,
            observer: None,
        }
    }

    /// Attaches an observer for lifecycle events.
    #[must_use]
    pub fn with_observer(mut self, observer: Rc<dyn StateTreeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The options the caches were created with.
    #[must_use]
    pub const fn options(&self) -> LayoutOptions {
        self.options
    }

    /// The root state, if the tree has been updated.
    #[must_use]
    pub const fn root(&self) -> Option<StateId> {
        self.root
    }

    /// Number of live states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.borrow().len()
    }

    /// Returns true if the tree holds no state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows a state.
    ///
    /// # Panics
    ///
    /// Panics if called while the tree is measuring or laying out, for
    /// example from inside a measurement closure.
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<Ref<'_, ElementState>> {
        Ref::filter_map(self.arena.borrow(), |arena| arena.get(id)).ok()
    }

    /// The child of `parent` with the given identifier.
    #[must_use]
    pub fn child(&self, parent: StateId, identifier: &ElementIdentifier) -> Option<StateId> {
        self.arena
            .borrow()
            .get(parent)?
            .child_index
            .get(identifier)
            .copied()
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Brings the tree in line with `element`.
    ///
    /// The root is updated in place if its identifier matches the current
    /// root's. Otherwise the old tree is torn down and a new one created.
    pub fn update(&mut self, element: impl Into<AnyElement>, environment: &Environment) -> StateId {
        let element = element.into();
        let identifier = ElementIdentifier::root(&element);
        let _span = debug_span!("update", root = %identifier).entered();

        let mut updater = Updater {
            arena: self.arena.get_mut(),
            observer: self.observer.as_deref(),
            options: self.options,
        };
        let matching = self.root.filter(|root| {
            updater
                .arena
                .get(*root)
                .is_some_and(|state| state.identifier == identifier)
        });

        let root = match (self.root, matching) {
            (Some(root), Some(_)) => {
                updater.update(root, element, environment);
                updater.notify(|observer| observer.did_update_root(root, &identifier));
                root
            }
            (Some(old), None) => {
                debug!(%identifier, "replacing root");
                updater.remove_subtree(old);
                let new = updater.create(None, 0, identifier.clone(), element, environment);
                updater.notify(|observer| observer.did_replace_root(old, new, &identifier));
                new
            }
            (None, _) => {
                let root = updater.create(None, 0, identifier.clone(), element, environment);
                updater.notify(|observer| observer.did_set_up_root(root, &identifier));
                root
            }
        };
        self.root = Some(root);
        root
    }

    /// Tears down every state.
    pub fn teardown(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        let mut updater = Updater {
            arena: self.arena.get_mut(),
            observer: self.observer.as_deref(),
            options: self.options,
        };
        updater.remove_subtree(root);
        updater.notify(|observer| observer.did_tear_down_root(root));
        debug!("tore down state tree");
    }

    // ========================================================================
    // Measurement and layout
    // ========================================================================

    /// Measures the root element, or returns `None` for an empty tree.
    #[must_use]
    pub fn measure(&self, constraint: SizeConstraint) -> Option<Size> {
        let root = self.root?;
        Some(self.measure_state(root, constraint, None))
    }

    /// Lays the root element out in `frame`, or returns `None` for an empty
    /// tree.
    #[must_use]
    pub fn layout(&self, frame: Rect) -> Option<LayoutResultNode> {
        let root = self.root?;
        self.layout_state(root, LayoutAttributes::new(frame))
    }

    fn notify(&self, event: impl FnOnce(&dyn StateTreeObserver)) {
        if let Some(observer) = &self.observer {
            event(&**observer);
        }
    }

    /// Takes what a measurement or layout of `state` needs out of the arena,
    /// so the arena is not borrowed while children are measured.
    fn begin(&self, state: &mut ElementState) -> Pass {
        let environment = state.environment.observing();
        environment.record_reads(&state.adapter_dependencies);
        Pass {
            identifier: state.identifier.clone(),
            depth: state.depth,
            content: state.content.clone(),
            environment,
            children: state.measurables(self.options),
        }
    }

    fn measure_state(
        &self,
        id: StateId,
        constraint: SizeConstraint,
        reads: Option<&Environment>,
    ) -> Size {
        let pass = {
            let mut arena = self.arena.borrow_mut();
            let Some(state) = arena.get_mut(id) else {
                warn!(state = ?id, "measured a state that was torn down");
                return Size::zero();
            };
            if let Some(size) = state.sizes.lookup(constraint) {
                if let Some(reads) = reads {
                    reads.record_reads(&state.dependencies);
                }
                drop(arena);
                self.notify(|observer| {
                    observer.did_measure(id, constraint, size, CacheOutcome::Cached);
                });
                return size;
            }
            self.begin(state)
        };

        let _span =
            trace_span!("measure", element = %pass.identifier, depth = pass.depth).entered();
        let size = pass.run(self, |content, environment, measurables| {
            content.measure_with(constraint, environment, measurables)
        });
        assert!(
            is_measurable_size(size),
            "{} measured to {size:?} under {constraint:?}",
            pass.identifier
        );

        let observed = pass.environment.observed_keys();
        if let Some(reads) = reads {
            reads.record_reads(&observed);
        }
        if let Some(state) = self.arena.borrow_mut().get_mut(id) {
            state.sizes.insert(constraint, size);
            state.dependencies.extend(&observed);
        }
        self.notify(|observer| observer.did_measure(id, constraint, size, CacheOutcome::Performed));
        size
    }

    fn layout_state(&self, id: StateId, attributes: LayoutAttributes) -> Option<LayoutResultNode> {
        let size = attributes.bounds.size();
        let key = SizeKey::of(size);
        let (element, cached, pass) = {
            let mut arena = self.arena.borrow_mut();
            let state = arena.get_mut(id)?;
            let cached = state.layouts.get(&key).cloned();
            (state.element.clone(), cached, self.begin(state))
        };

        let frames = if let Some(frames) = cached {
            self.notify(|observer| observer.did_layout(id, size, CacheOutcome::Cached));
            frames
        } else {
            let _span =
                trace_span!("layout", element = %pass.identifier, depth = pass.depth).entered();
            let frames: Rc<[LayoutAttributes]> = pass
                .run(self, |content, _, measurables| content.layout_with(size, measurables))
                .into();
            let observed = pass.environment.observed_keys();
            if let Some(state) = self.arena.borrow_mut().get_mut(id) {
                state.layouts.insert(key, frames.clone());
                state.dependencies.extend(&observed);
            }
            self.notify(|observer| observer.did_layout(id, size, CacheOutcome::Performed));
            frames
        };

        let children = pass
            .children
            .iter()
            .zip(frames.iter())
            .filter_map(|(child, attributes)| self.layout_state(*child, *attributes))
            .collect();

        Some(LayoutResultNode {
            identifier: pass.identifier,
            element,
            attributes,
            children,
        })
    }
}

fn is_measurable_size(size: Size) -> bool {
    !size.width.is_nan() && !size.height.is_nan() && size.width >= 0.0 && size.height >= 0.0
}

// ============================================================================
// Passes
// ============================================================================

struct Pass {
    identifier: ElementIdentifier,
    depth: usize,
    content: ElementContent,
    environment: Environment,
    children: Rc<[StateId]>,
}

impl Pass {
    fn run<R>(
        &self,
        tree: &ElementStateTree,
        body: impl FnOnce(&ElementContent, &Environment, &[&dyn Measurable]) -> R,
    ) -> R {
        let proxies: Vec<StateProxy<'_>> = self
            .children
            .iter()
            .map(|child| StateProxy {
                tree,
                id: *child,
                reads: &self.environment,
            })
            .collect();
        let measurables: Vec<&dyn Measurable> = proxies
            .iter()
            .map(|proxy| proxy as &dyn Measurable)
            .collect();
        body(&self.content, &self.environment, &measurables)
    }
}

/// A child state seen through its parent's measurement.
struct StateProxy<'a> {
    tree: &'a ElementStateTree,
    id: StateId,
    reads: &'a Environment,
}

impl Measurable for StateProxy<'_> {
    fn measure(&self, constraint: SizeConstraint) -> Size {
        self.tree.measure_state(self.id, constraint, Some(self.reads))
    }
}

// ============================================================================
// Updater
// ============================================================================

struct Updater<'a> {
    arena: &'a mut Arena<ElementState>,
    observer: Option<&'a dyn StateTreeObserver>,
    options: LayoutOptions,
}

impl Updater<'_> {
    fn notify(&self, event: impl FnOnce(&dyn StateTreeObserver)) {
        if let Some(observer) = self.observer {
            event(observer);
        }
    }

    fn create(
        &mut self,
        parent: Option<StateId>,
        depth: usize,
        identifier: ElementIdentifier,
        element: AnyElement,
        environment: &Environment,
    ) -> StateId {
        let state = ElementState::new(
            identifier.clone(),
            element,
            parent,
            depth,
            environment,
            self.options,
        );
        let id = self.arena.insert(state);
        debug!(state = ?id, element = %identifier, depth, "created element state");
        self.notify(|observer| observer.did_create_state(id, &identifier));
        self.sync_children(id);
        id
    }

    fn update(&mut self, id: StateId, element: AnyElement, environment: &Environment) {
        let Some(state) = self.arena.get_mut(id) else {
            return;
        };
        if let Some(reason) = state.replace(element, environment) {
            debug!(state = ?id, element = %state.identifier, ?reason, "invalidated element state");
            self.notify(|observer| observer.did_invalidate_state(id, reason));
        }
        self.sync_children(id);
    }

    /// Matches the content's children against the existing child states by
    /// identifier. Unmatched old states are torn down.
    fn sync_children(&mut self, id: StateId) {
        let Some(state) = self.arena.get_mut(id) else {
            return;
        };
        let content = state.content.clone();
        let environment = state.child_environment.clone();
        let depth = state.depth + 1;
        let mut previous = mem::take(&mut state.child_index);
        state.measurables = None;

        let mut children = Vec::with_capacity(content.children().len());
        let mut index = HashMap::with_capacity(content.children().len());
        for child in content.children() {
            let child_id = if let Some(existing) = previous.remove(&child.identifier) {
                self.update(existing, child.element.clone(), &environment);
                existing
            } else {
                self.create(
                    Some(id),
                    depth,
                    child.identifier.clone(),
                    child.element.clone(),
                    &environment,
                )
            };
            let duplicate = index.insert(child.identifier.clone(), child_id);
            assert!(
                duplicate.is_none(),
                "duplicate element identifier {} among siblings",
                child.identifier
            );
            children.push(child_id);
        }

        for stale in previous.into_values() {
            self.remove_subtree(stale);
        }

        if let Some(state) = self.arena.get_mut(id) {
            state.children = children;
            state.child_index = index;
        }
    }

    fn remove_subtree(&mut self, id: StateId) {
        let Some(state) = self.arena.remove(id) else {
            return;
        };
        for child in &state.children {
            self.remove_subtree(*child);
        }
        debug!(state = ?id, element = %state.identifier, "removed element state");
        self.notify(|observer| observer.did_remove_state(id, &state.identifier));
    }
}
