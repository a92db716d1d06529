//! Elements: immutable descriptions of what to lay out.
//!
//! An [`Element`] is a plain value. The engine never inspects it beyond
//! asking for its [`ElementContent`], which is one of a closed set of shapes:
//! a fixed size, a measurement closure, a single passthrough child, a
//! [`Layout`]-driven container, or a child seen through a modified
//! [`Environment`].

use core::{
    any::Any,
    fmt::{self, Debug},
    slice,
};
use std::rc::Rc;

use crate::{
    Environment, Layout, LayoutAttributes, LayoutItem, Measurable, Rect, Size, SizeConstraint,
    identifier::{ElementIdentifier, ElementKey, ElementType, IdentifierFactory},
};

// ============================================================================
// Element
// ============================================================================

/// Type-erased access to an element's concrete type.
///
/// Implemented for every `'static` type; there is no need to implement it by
/// hand.
pub trait AsAny: Any {
    /// The element as [`Any`], for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// The element's concrete type.
    fn element_type(&self) -> ElementType;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn element_type(&self) -> ElementType {
        ElementType::of::<T>()
    }
}

/// An immutable, value-typed description of layout intent.
pub trait Element: AsAny + Debug {
    /// How this element is measured and laid out.
    fn content(&self) -> ElementContent;

    /// Returns true if `other` is provably identical in effect to `self`.
    ///
    /// The state tree skips re-deriving content, and keeps every cached
    /// measurement, when an updated element is equivalent to the previous
    /// one. The default never claims equivalence; value types can opt in
    /// with [`equivalent_by_value`].
    fn is_equivalent(&self, other: &dyn Element) -> bool {
        let _ = other;
        false
    }
}

/// Structural equality between an element and a type-erased one.
#[must_use]
pub fn equivalent_by_value<T>(this: &T, other: &dyn Element) -> bool
where
    T: Element + PartialEq,
{
    other
        .as_any()
        .downcast_ref::<T>()
        .is_some_and(|other| this == other)
}

/// A shared, type-erased element.
#[derive(Clone)]
pub struct AnyElement(Rc<dyn Element>);

impl AnyElement {
    /// Erases an element.
    pub fn new<E: Element>(element: E) -> Self {
        Self(Rc::new(element))
    }

    /// The concrete type of the wrapped element.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        (*self.0).element_type()
    }

    /// The wrapped element's content.
    #[must_use]
    pub fn content(&self) -> ElementContent {
        self.0.content()
    }

    /// Returns true if both handles share one allocation or the elements
    /// report themselves equivalent.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.is_equivalent(&*other.0)
    }

    /// Downcasts to the concrete element type.
    #[must_use]
    pub fn downcast_ref<T: Element>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// The wrapped element.
    #[must_use]
    pub fn as_element(&self) -> &dyn Element {
        &*self.0
    }
}

impl<E: Element> From<E> for AnyElement {
    fn from(element: E) -> Self {
        Self::new(element)
    }
}

impl PartialEq for AnyElement {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent(other)
    }
}

impl Debug for AnyElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

// ============================================================================
// ElementContent
// ============================================================================

/// A measurement closure for leaf elements.
pub type MeasureFn = Rc<dyn Fn(SizeConstraint, &Environment) -> Size>;

/// A function deriving a child's environment from its parent's.
pub type EnvironmentAdapter = Rc<dyn Fn(&mut Environment)>;

/// A child element together with its identity among its siblings.
#[derive(Debug, Clone)]
pub struct ContentChild {
    /// The child's identifier.
    pub identifier: ElementIdentifier,
    /// The child element.
    pub element: AnyElement,
}

impl ContentChild {
    /// A lone child, identified as `(type, None, 0)`.
    #[must_use]
    pub fn single(element: AnyElement) -> Self {
        Self {
            identifier: ElementIdentifier::root(&element),
            element,
        }
    }
}

/// How an element is measured and laid out.
#[derive(Clone)]
pub enum ElementContent {
    /// An intrinsic size, independent of the constraint.
    Fixed(Size),
    /// A custom measurement closure.
    Measure(MeasureFn),
    /// A single child filling this element's bounds.
    Child(ContentChild),
    /// Children arranged by a [`Layout`].
    Layout(LayoutContent),
    /// A single child measured in a modified environment.
    Adapted {
        /// Applied to a copy of the parent environment.
        adapter: EnvironmentAdapter,
        /// The child.
        child: ContentChild,
    },
}

impl Debug for ElementContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(size) => f.debug_tuple("Fixed").field(size).finish(),
            Self::Measure(_) => f.write_str("Measure(..)"),
            Self::Child(child) => f.debug_tuple("Child").field(child).finish(),
            Self::Layout(content) => f.debug_tuple("Layout").field(content).finish(),
            Self::Adapted { child, .. } => f
                .debug_struct("Adapted")
                .field("child", child)
                .finish_non_exhaustive(),
        }
    }
}

impl ElementContent {
    /// A leaf with a fixed intrinsic size.
    #[must_use]
    pub const fn fixed(size: Size) -> Self {
        Self::Fixed(size)
    }

    /// A leaf measured by `measure`.
    pub fn measure(measure: impl Fn(SizeConstraint, &Environment) -> Size + 'static) -> Self {
        Self::Measure(Rc::new(measure))
    }

    /// A passthrough to a single child.
    pub fn child(element: impl Into<AnyElement>) -> Self {
        Self::Child(ContentChild::single(element.into()))
    }

    /// A single child measured in an environment modified by `adapter`.
    pub fn adapted(
        adapter: impl Fn(&mut Environment) + 'static,
        element: impl Into<AnyElement>,
    ) -> Self {
        Self::Adapted {
            adapter: Rc::new(adapter),
            child: ContentChild::single(element.into()),
        }
    }

    /// The content's children, in layout order.
    #[must_use]
    pub fn children(&self) -> &[ContentChild] {
        match self {
            Self::Fixed(_) | Self::Measure(_) => &[],
            Self::Child(child) | Self::Adapted { child, .. } => slice::from_ref(child),
            Self::Layout(content) => &content.children,
        }
    }

    /// The environment children of this content are measured in.
    #[must_use]
    pub fn child_environment(&self, environment: &Environment) -> Environment {
        match self {
            Self::Adapted { adapter, .. } => {
                let mut environment = environment.clone();
                adapter(&mut environment);
                environment
            }
            _ => environment.clone(),
        }
    }

    /// Measures the content. `children` must line up with [`children`].
    ///
    /// [`children`]: ElementContent::children
    #[must_use]
    pub fn measure_with(
        &self,
        constraint: SizeConstraint,
        environment: &Environment,
        children: &[&dyn Measurable],
    ) -> Size {
        match self {
            Self::Fixed(size) => *size,
            Self::Measure(measure) => measure(constraint, environment),
            Self::Child(_) | Self::Adapted { .. } => children
                .first()
                .map_or_else(Size::zero, |child| child.measure(constraint)),
            Self::Layout(content) => content.storage.measure(constraint, children),
        }
    }

    /// Places the content's children within `size`.
    ///
    /// Returns one attribute set per child.
    #[must_use]
    pub fn layout_with(&self, size: Size, children: &[&dyn Measurable]) -> Vec<LayoutAttributes> {
        match self {
            Self::Fixed(_) | Self::Measure(_) => Vec::new(),
            Self::Child(_) | Self::Adapted { .. } => {
                vec![LayoutAttributes::new(Rect::from_size(size))]
            }
            Self::Layout(content) => content.storage.layout(size, children),
        }
    }
}

// ============================================================================
// LayoutContent
// ============================================================================

trait LayoutStorage: Debug {
    fn measure(&self, constraint: SizeConstraint, children: &[&dyn Measurable]) -> Size;
    fn layout(&self, size: Size, children: &[&dyn Measurable]) -> Vec<LayoutAttributes>;
}

#[derive(Debug)]
struct TypedStorage<L: Layout> {
    layout: L,
    traits: Vec<L::Traits>,
}

impl<L: Layout> TypedStorage<L> {
    fn items<'a>(&'a self, children: &'a [&'a dyn Measurable]) -> Vec<LayoutItem<'a, L::Traits>> {
        debug_assert_eq!(self.traits.len(), children.len());
        self.traits
            .iter()
            .zip(children)
            .map(|(traits, child)| LayoutItem::new(traits, *child))
            .collect()
    }
}

impl<L: Layout> LayoutStorage for TypedStorage<L> {
    fn measure(&self, constraint: SizeConstraint, children: &[&dyn Measurable]) -> Size {
        self.layout.measure(constraint, &self.items(children))
    }

    fn layout(&self, size: Size, children: &[&dyn Measurable]) -> Vec<LayoutAttributes> {
        let attributes = self.layout.layout(size, &self.items(children));
        assert_eq!(
            attributes.len(),
            children.len(),
            "{:?} returned {} attributes for {} children",
            self.layout,
            attributes.len(),
            children.len()
        );
        attributes
    }
}

/// Children arranged by a type-erased [`Layout`].
#[derive(Clone)]
pub struct LayoutContent {
    storage: Rc<dyn LayoutStorage>,
    children: Vec<ContentChild>,
}

impl Debug for LayoutContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContent")
            .field("layout", &self.storage)
            .field("children", &self.children)
            .finish()
    }
}

impl LayoutContent {
    /// Starts building content for `layout`.
    pub fn builder<L: Layout>(layout: L) -> LayoutContentBuilder<L> {
        LayoutContentBuilder::new(layout)
    }

    /// The children, in layout order.
    #[must_use]
    pub fn children(&self) -> &[ContentChild] {
        &self.children
    }
}

impl From<LayoutContent> for ElementContent {
    fn from(content: LayoutContent) -> Self {
        Self::Layout(content)
    }
}

/// Collects children for a [`Layout`], assigning their identifiers.
#[derive(Debug)]
pub struct LayoutContentBuilder<L: Layout> {
    layout: L,
    traits: Vec<L::Traits>,
    children: Vec<ContentChild>,
    identifiers: IdentifierFactory,
}

impl<L: Layout> LayoutContentBuilder<L> {
    /// Creates an empty builder.
    pub fn new(layout: L) -> Self {
        Self {
            layout,
            traits: Vec::new(),
            children: Vec::new(),
            identifiers: IdentifierFactory::new(),
        }
    }

    /// Adds an unkeyed child with default traits.
    pub fn add(&mut self, element: impl Into<AnyElement>) -> &mut Self {
        self.add_with(L::Traits::default(), None, element)
    }

    /// Adds a child with explicit traits and an optional key.
    pub fn add_with(
        &mut self,
        traits: L::Traits,
        key: Option<ElementKey>,
        element: impl Into<AnyElement>,
    ) -> &mut Self {
        let element = element.into();
        let identifier = self.identifiers.next(element.element_type(), key);
        self.traits.push(traits);
        self.children.push(ContentChild {
            identifier,
            element,
        });
        self
    }

    /// Adds a child under an identifier chosen by the caller.
    ///
    /// Used when forwarding children that already carry identifiers. The
    /// identifier is not counted by the builder, so mixing this with
    /// [`add`](Self::add) can produce duplicates, which the state tree
    /// rejects.
    pub fn add_identified(
        &mut self,
        traits: L::Traits,
        identifier: ElementIdentifier,
        element: impl Into<AnyElement>,
    ) -> &mut Self {
        self.traits.push(traits);
        self.children.push(ContentChild {
            identifier,
            element: element.into(),
        });
        self
    }

    /// Number of children added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if no child has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Finishes the content.
    #[must_use]
    pub fn build(self) -> LayoutContent {
        LayoutContent {
            storage: Rc::new(TypedStorage {
                layout: self.layout,
                traits: self.traits,
            }),
            children: self.children,
        }
    }
}
