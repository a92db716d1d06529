//! Per-axis size limits applied to a single child.

use alloc::vec::Vec;

use trellis_core::{
    AnyElement, Axis, Element, ElementContent, Layout, LayoutAttributes, LayoutContent,
    LayoutItem, Rect, Size, SizeConstraint, equivalent_by_value,
};

/// A limit on one dimension of a [`ConstrainedSize`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeLimit {
    /// The child's size is used as-is.
    #[default]
    Unconstrained,
    /// No larger than the value.
    AtMost(f32),
    /// No smaller than the value.
    AtLeast(f32),
    /// Between the two values, inclusive.
    Within(f32, f32),
    /// Exactly the value.
    Absolute(f32),
}

impl SizeLimit {
    /// The constraint passed to the child along this dimension.
    fn child_axis(self, incoming: Axis) -> Axis {
        match self {
            Self::Unconstrained | Self::AtLeast(_) => incoming,
            Self::AtMost(max) | Self::Within(_, max) => {
                Axis::at_most(incoming.maximum().min(max))
            }
            Self::Absolute(value) => Axis::at_most(value),
        }
    }

    /// Applies the limit to a measured dimension.
    fn clamp(self, value: f32) -> f32 {
        match self {
            Self::Unconstrained => value,
            Self::AtMost(max) => value.min(max),
            Self::AtLeast(min) => value.max(min),
            Self::Within(min, max) => value.max(min).min(max),
            Self::Absolute(value) => value,
        }
    }

    fn validate(self) {
        let valid = |value: f32| !value.is_nan() && value >= 0.0;
        let ok = match self {
            Self::Unconstrained => true,
            Self::AtMost(value) | Self::AtLeast(value) | Self::Absolute(value) => valid(value),
            Self::Within(min, max) => valid(min) && valid(max) && min <= max,
        };
        assert!(ok, "invalid size limit {self:?}");
    }
}

/// Layout used by [`ConstrainedSize`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstrainedSizeLayout {
    /// The width limit.
    pub width: SizeLimit,
    /// The height limit.
    pub height: SizeLimit,
}

impl Layout for ConstrainedSizeLayout {
    type Traits = ();

    fn measure(&self, constraint: SizeConstraint, items: &[LayoutItem<'_, ()>]) -> Size {
        let child_constraint = SizeConstraint::new(
            self.width.child_axis(constraint.width),
            self.height.child_axis(constraint.height),
        );
        let child = items
            .first()
            .map_or(Size::zero(), |item| item.measure(child_constraint));
        Size::new(self.width.clamp(child.width), self.height.clamp(child.height))
    }

    fn layout(&self, size: Size, items: &[LayoutItem<'_, ()>]) -> Vec<LayoutAttributes> {
        items
            .iter()
            .map(|_| LayoutAttributes::new(Rect::from_size(size)))
            .collect()
    }
}

/// Limits the size of a wrapped element.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedSize {
    layout: ConstrainedSizeLayout,
    wrapped: AnyElement,
}

impl ConstrainedSize {
    /// Wraps an element with no limits.
    pub fn new(wrapped: impl Into<AnyElement>) -> Self {
        Self {
            layout: ConstrainedSizeLayout::default(),
            wrapped: wrapped.into(),
        }
    }

    /// Sets the width limit.
    ///
    /// # Panics
    ///
    /// Panics if the limit contains a negative or NaN value, or a `Within`
    /// range whose lower bound exceeds its upper bound.
    #[must_use]
    pub fn width(mut self, limit: SizeLimit) -> Self {
        limit.validate();
        self.layout.width = limit;
        self
    }

    /// Sets the height limit.
    ///
    /// # Panics
    ///
    /// Same as [`width`](Self::width).
    #[must_use]
    pub fn height(mut self, limit: SizeLimit) -> Self {
        limit.validate();
        self.layout.height = limit;
        self
    }

    /// Fixes both dimensions.
    #[must_use]
    pub fn absolute(self, size: Size) -> Self {
        self.width(SizeLimit::Absolute(size.width))
            .height(SizeLimit::Absolute(size.height))
    }
}

impl Element for ConstrainedSize {
    fn content(&self) -> ElementContent {
        let mut builder = LayoutContent::builder(self.layout);
        builder.add(self.wrapped.clone());
        builder.build().into()
    }

    fn is_equivalent(&self, other: &dyn Element) -> bool {
        equivalent_by_value(self, other)
    }
}
