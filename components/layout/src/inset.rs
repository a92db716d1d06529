//! Padding around a single child.

use alloc::vec::Vec;

use trellis_core::{
    AnyElement, EdgeInsets, Element, ElementContent, Layout, LayoutAttributes, LayoutContent,
    LayoutItem, Rect, Size, SizeConstraint, equivalent_by_value,
};

/// Layout that insets its single child by the configured edge values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsetLayout {
    /// Distances from each edge.
    pub insets: EdgeInsets,
}

impl Layout for InsetLayout {
    type Traits = ();

    fn measure(&self, constraint: SizeConstraint, items: &[LayoutItem<'_, ()>]) -> Size {
        // The horizontal and vertical space consumed by the insets.
        let horizontal = self.insets.horizontal();
        let vertical = self.insets.vertical();

        let child = items
            .first()
            .map_or(Size::zero(), |item| item.measure(constraint.inset(horizontal, vertical)));

        Size::new(child.width + horizontal, child.height + vertical)
    }

    fn layout(&self, size: Size, items: &[LayoutItem<'_, ()>]) -> Vec<LayoutAttributes> {
        let frame = Rect::from_size(size).inset(self.insets);
        items.iter().map(|_| LayoutAttributes::new(frame)).collect()
    }
}

/// Pads a wrapped element.
#[derive(Debug, Clone, PartialEq)]
pub struct Inset {
    insets: EdgeInsets,
    wrapped: AnyElement,
}

impl Inset {
    /// Pads `wrapped` by `insets`.
    pub fn new(insets: EdgeInsets, wrapped: impl Into<AnyElement>) -> Self {
        Self {
            insets,
            wrapped: wrapped.into(),
        }
    }

    /// Pads every edge of `wrapped` by `amount`.
    pub fn uniform(amount: f32, wrapped: impl Into<AnyElement>) -> Self {
        Self::new(EdgeInsets::uniform(amount), wrapped)
    }

    /// The padding.
    #[must_use]
    pub const fn insets(&self) -> EdgeInsets {
        self.insets
    }
}

impl Element for Inset {
    fn content(&self) -> ElementContent {
        let mut builder = LayoutContent::builder(InsetLayout {
            insets: self.insets,
        });
        builder.add(self.wrapped.clone());
        builder.build().into()
    }

    fn is_equivalent(&self, other: &dyn Element) -> bool {
        equivalent_by_value(self, other)
    }
}
