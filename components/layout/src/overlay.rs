//! Layering children on top of one another.
//!
//! An [`Overlay`] is as large as its largest child, and every child is
//! stretched to fill that size. It is the usual way to put a background or a
//! decoration behind or over some content.

use alloc::{vec, vec::Vec};

use trellis_core::{
    AnyElement, Element, ElementContent, Layout, LayoutAttributes, LayoutContent, LayoutItem,
    Rect, Size, SizeConstraint, equivalent_by_value,
};

/// Layout used by [`Overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayLayout;

impl Layout for OverlayLayout {
    type Traits = ();

    fn measure(&self, constraint: SizeConstraint, items: &[LayoutItem<'_, ()>]) -> Size {
        items
            .iter()
            .map(|item| item.measure(constraint))
            .fold(Size::zero(), Size::max)
    }

    fn layout(&self, size: Size, items: &[LayoutItem<'_, ()>]) -> Vec<LayoutAttributes> {
        vec![LayoutAttributes::new(Rect::from_size(size)); items.len()]
    }
}

/// Children drawn in order, each filling the overlay's bounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    children: Vec<AnyElement>,
}

impl Overlay {
    /// An empty overlay.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Adds a layer above the existing ones.
    #[must_use]
    pub fn child(mut self, element: impl Into<AnyElement>) -> Self {
        self.children.push(element.into());
        self
    }
}

impl Element for Overlay {
    fn content(&self) -> ElementContent {
        let mut builder = LayoutContent::builder(OverlayLayout);
        for child in &self.children {
            builder.add(child.clone());
        }
        builder.build().into()
    }

    fn is_equivalent(&self, other: &dyn Element) -> bool {
        equivalent_by_value(self, other)
    }
}
