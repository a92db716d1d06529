//! Vertical stack element.

use alloc::vec::Vec;

use trellis_core::{AnyElement, Element, ElementContent, ElementKey, equivalent_by_value};

use super::{
    CrossAlignment, OverflowDistribution, StackAxis, StackChild, StackLayout, StackTraits,
    UnderflowDistribution, stack_content,
};

/// Arranges its children top to bottom.
///
/// ```ignore
/// let sidebar = Column::new()
///     .underflow(UnderflowDistribution::JustifyToStart)
///     .alignment(CrossAlignment::Fill)
///     .spacing(12.0)
///     .child(header)
///     .child_with(list, StackTraits::GROWS);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    layout: StackLayout,
    children: Vec<StackChild>,
}

impl Default for Column {
    fn default() -> Self {
        Self::new()
    }
}

impl Column {
    /// An empty column.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: StackLayout::new(StackAxis::Vertical),
            children: Vec::new(),
        }
    }

    /// Sets how leftover height is distributed.
    #[must_use]
    pub const fn underflow(mut self, underflow: UnderflowDistribution) -> Self {
        self.layout.underflow = underflow;
        self
    }

    /// Sets how insufficient height is distributed.
    #[must_use]
    pub const fn overflow(mut self, overflow: OverflowDistribution) -> Self {
        self.layout.overflow = overflow;
        self
    }

    /// Sets the horizontal alignment of children.
    #[must_use]
    pub const fn alignment(mut self, alignment: CrossAlignment) -> Self {
        self.layout.alignment = alignment;
        self
    }

    /// Sets the fixed space between children.
    ///
    /// # Panics
    ///
    /// Panics if `spacing` is negative, NaN, or infinite.
    #[must_use]
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.layout.spacing = crate::checked_spacing(spacing);
        self
    }

    /// Appends a child with default priorities.
    #[must_use]
    pub fn child(self, element: impl Into<AnyElement>) -> Self {
        self.child_with(element, StackTraits::default())
    }

    /// Appends a child with explicit priorities.
    #[must_use]
    pub fn child_with(mut self, element: impl Into<AnyElement>, traits: StackTraits) -> Self {
        self.push(StackChild {
            element: element.into(),
            traits,
            key: None,
        });
        self
    }

    /// Appends a keyed child with explicit priorities.
    #[must_use]
    pub fn keyed_child(
        mut self,
        key: impl Into<ElementKey>,
        element: impl Into<AnyElement>,
        traits: StackTraits,
    ) -> Self {
        self.push(StackChild {
            element: element.into(),
            traits,
            key: Some(key.into()),
        });
        self
    }

    /// Appends a child in place.
    pub fn push(&mut self, child: StackChild) {
        self.children.push(child);
    }

    /// The stack configuration.
    #[must_use]
    pub const fn layout(&self) -> &StackLayout {
        &self.layout
    }

    /// The children, in order.
    #[must_use]
    pub fn children(&self) -> &[StackChild] {
        &self.children
    }
}

impl Element for Column {
    fn content(&self) -> ElementContent {
        stack_content(self.layout, &self.children)
    }

    fn is_equivalent(&self, other: &dyn Element) -> bool {
        equivalent_by_value(self, other)
    }
}
