//! Single-pass measurement without persistent state.
//!
//! A [`RenderPassCache`] mirrors the element tree for the duration of one
//! pass. Each node owns a [`HintingSizeCache`] and lazily creates child nodes
//! keyed by [`ElementIdentifier`], so a container that measures a child at many
//! candidate constraints only pays for each distinct answer once. Everything
//! is dropped when the pass ends.

use core::{
    cell::{OnceCell, RefCell},
    fmt::{self, Debug},
};
use std::{collections::HashMap, rc::Rc};

use tracing::{debug, trace_span};
use trellis_core::{
    AnyElement, ContentChild, ElementContent, ElementIdentifier, Environment, LayoutAttributes,
    LayoutOptions, Measurable, Rect, Size, SizeConstraint,
};

use super::HintingSizeCache;
use crate::LayoutResultNode;

/// The measurement cache for one element during one pass.
pub struct RenderPassCache {
    identifier: ElementIdentifier,
    element: AnyElement,
    environment: Environment,
    options: LayoutOptions,
    content: OnceCell<ElementContent>,
    child_environment: OnceCell<Environment>,
    sizes: RefCell<HintingSizeCache>,
    children: RefCell<HashMap<ElementIdentifier, Rc<RenderPassCache>>>,
    ordered: OnceCell<Vec<Rc<RenderPassCache>>>,
}

impl Debug for RenderPassCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPassCache")
            .field("identifier", &self.identifier)
            .field("sizes", &self.sizes.borrow().len())
            .field("children", &self.children.borrow().len())
            .finish_non_exhaustive()
    }
}

impl RenderPassCache {
    /// Creates the cache for a root element.
    pub fn new(
        element: impl Into<AnyElement>,
        environment: &Environment,
        options: LayoutOptions,
    ) -> Self {
        let element = element.into();
        Self::with_identifier(ElementIdentifier::root(&element), element, environment, options)
    }

    fn with_identifier(
        identifier: ElementIdentifier,
        element: AnyElement,
        environment: &Environment,
        options: LayoutOptions,
    ) -> Self {
        Self {
            identifier,
            element,
            environment: environment.detached(),
            options,
            content: OnceCell::new(),
            child_environment: OnceCell::new(),
            sizes: RefCell::new(HintingSizeCache::new(options)),
            children: RefCell::new(HashMap::new()),
            ordered: OnceCell::new(),
        }
    }

    /// The element this cache measures.
    #[must_use]
    pub const fn element(&self) -> &AnyElement {
        &self.element
    }

    /// The element's identifier among its siblings.
    #[must_use]
    pub const fn identifier(&self) -> &ElementIdentifier {
        &self.identifier
    }

    /// Number of distinct sizes recorded for this element.
    #[must_use]
    pub fn cached_sizes(&self) -> usize {
        self.sizes.borrow().len()
    }

    fn content(&self) -> &ElementContent {
        self.content.get_or_init(|| self.element.content())
    }

    fn child_environment(&self) -> &Environment {
        self.child_environment
            .get_or_init(|| self.content().child_environment(&self.environment))
    }

    /// The cache for one of this element's children, created on first use.
    #[must_use]
    pub fn child(&self, child: &ContentChild) -> Rc<Self> {
        self.children
            .borrow_mut()
            .entry(child.identifier.clone())
            .or_insert_with(|| {
                Rc::new(Self::with_identifier(
                    child.identifier.clone(),
                    child.element.clone(),
                    self.child_environment(),
                    self.options,
                ))
            })
            .clone()
    }

    fn resolve_children(&self) -> Vec<Rc<Self>> {
        self.content()
            .children()
            .iter()
            .map(|child| self.child(child))
            .collect()
    }

    fn with_children<R>(&self, body: impl FnOnce(&[&dyn Measurable]) -> R) -> R {
        let resolved;
        let children = if self.options.measureable_storage_cache() {
            self.ordered.get_or_init(|| self.resolve_children())
        } else {
            resolved = self.resolve_children();
            &resolved
        };
        let measurables: Vec<&dyn Measurable> = children
            .iter()
            .map(|child| &**child as &dyn Measurable)
            .collect();
        body(&measurables)
    }

    /// Lays this element out in `frame`, relative to its parent.
    #[must_use]
    pub fn layout(&self, frame: Rect) -> LayoutResultNode {
        self.layout_with_attributes(LayoutAttributes::new(frame))
    }

    fn layout_with_attributes(&self, attributes: LayoutAttributes) -> LayoutResultNode {
        let size = attributes.bounds.size();
        let _span = trace_span!("layout", element = %self.identifier).entered();

        let child_attributes = self.with_children(|measurables| {
            self.content().layout_with(size, measurables)
        });
        let children = self
            .content()
            .children()
            .iter()
            .zip(child_attributes)
            .map(|(child, attributes)| self.child(child).layout_with_attributes(attributes))
            .collect();

        LayoutResultNode {
            identifier: self.identifier.clone(),
            element: self.element.clone(),
            attributes,
            children,
        }
    }
}

impl Measurable for RenderPassCache {
    fn measure(&self, constraint: SizeConstraint) -> Size {
        let cached = self.sizes.borrow_mut().lookup(constraint);
        if let Some(size) = cached {
            return size;
        }

        let _span = trace_span!("measure", element = %self.identifier, ?constraint).entered();
        let size = self.with_children(|measurables| {
            self.content()
                .measure_with(constraint, &self.environment, measurables)
        });
        self.sizes.borrow_mut().insert(constraint, size);
        size
    }
}

/// Measures `element` in a fresh single-pass cache.
pub fn measure_element(
    element: impl Into<AnyElement>,
    constraint: SizeConstraint,
    environment: &Environment,
    options: LayoutOptions,
) -> Size {
    let cache = RenderPassCache::new(element, environment, options);
    let size = cache.measure(constraint);
    debug!(element = %cache.identifier(), ?constraint, ?size, "measured element");
    size
}

/// Lays `element` out in `frame` using a fresh single-pass cache.
pub fn layout_element(
    element: impl Into<AnyElement>,
    frame: Rect,
    environment: &Environment,
    options: LayoutOptions,
) -> LayoutResultNode {
    let cache = RenderPassCache::new(element, environment, options);
    let node = cache.layout(frame);
    debug!(element = %cache.identifier(), ?frame, "laid out element");
    node
}
