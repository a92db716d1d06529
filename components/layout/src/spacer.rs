//! Fixed-size leaves: [`Spacer`] and [`Empty`].

use trellis_core::{Element, ElementContent, Size, equivalent_by_value};

/// Empty space of a fixed intrinsic size.
///
/// Inside a stack a spacer behaves like any other child: with the default
/// [`StackTraits`](crate::stack::StackTraits) it takes a share of leftover
/// space under the grow distributions, and gives up length under overflow.
/// Use [`StackTraits::FIXED`](crate::stack::StackTraits::FIXED) for a rigid
/// gap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spacer {
    size: Size,
}

impl Spacer {
    /// A spacer of the given size.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self { size }
    }

    /// A spacer with the same length in both dimensions.
    #[must_use]
    pub const fn uniform(length: f32) -> Self {
        Self::new(Size::new(length, length))
    }

    /// A spacer that is `width` wide and has no height.
    #[must_use]
    pub const fn width(width: f32) -> Self {
        Self::new(Size::new(width, 0.0))
    }

    /// A spacer that is `height` tall and has no width.
    #[must_use]
    pub const fn height(height: f32) -> Self {
        Self::new(Size::new(0.0, height))
    }

    /// The intrinsic size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }
}

impl Element for Spacer {
    fn content(&self) -> ElementContent {
        ElementContent::fixed(self.size)
    }

    fn is_equivalent(&self, other: &dyn Element) -> bool {
        equivalent_by_value(self, other)
    }
}

/// An element with no content and zero size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Empty;

impl Element for Empty {
    fn content(&self) -> ElementContent {
        ElementContent::fixed(Size::zero())
    }

    fn is_equivalent(&self, other: &dyn Element) -> bool {
        equivalent_by_value(self, other)
    }
}
