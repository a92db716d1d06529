//! Linear stacks: [`Row`] and [`Column`].
//!
//! Both are driven by [`StackLayout`], which measures every child at its
//! natural length along the stack axis and then resolves any difference
//! between the total and the container's final length:
//!
//! - **underflow** (space left over) is handled by an [`UnderflowDistribution`],
//! - **overflow** (not enough space) by an [`OverflowDistribution`].
//!
//! Each child's share of growth or shrinkage is weighted by its
//! [`StackTraits`]. A priority of zero opts the child out entirely.

use alloc::vec::Vec;

use trellis_core::{
    AnyElement, Axis, ElementContent, ElementKey, Layout, LayoutAttributes, LayoutContent,
    LayoutItem, Point, Rect, Size, SizeConstraint,
};

mod column;
mod distribution;
mod row;

pub use column::Column;
pub use row::Row;

// ============================================================================
// Configuration
// ============================================================================

/// The axis a stack lays its children out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackAxis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl StackAxis {
    /// The component of `size` along this axis.
    #[must_use]
    pub const fn main(self, size: Size) -> f32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// The component of `size` across this axis.
    #[must_use]
    pub const fn cross(self, size: Size) -> f32 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Builds a size from main and cross components.
    #[must_use]
    pub const fn size(self, main: f32, cross: f32) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// Builds a point from main and cross components.
    #[must_use]
    pub const fn point(self, main: f32, cross: f32) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }

    /// Builds a constraint from main and cross axes.
    #[must_use]
    pub fn constraint(self, main: Axis, cross: Axis) -> SizeConstraint {
        match self {
            Self::Horizontal => SizeConstraint::new(main, cross),
            Self::Vertical => SizeConstraint::new(cross, main),
        }
    }

    /// The constraint along this axis.
    #[must_use]
    pub const fn main_constraint(self, constraint: SizeConstraint) -> Axis {
        match self {
            Self::Horizontal => constraint.width,
            Self::Vertical => constraint.height,
        }
    }

    /// The constraint across this axis.
    #[must_use]
    pub const fn cross_constraint(self, constraint: SizeConstraint) -> Axis {
        match self {
            Self::Horizontal => constraint.height,
            Self::Vertical => constraint.width,
        }
    }
}

/// What a stack does with space left over after every child has its
/// natural length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnderflowDistribution {
    /// Children keep their natural length; the slack is added to the gaps.
    ///
    /// A single child is packed at the start.
    #[default]
    SpaceEvenly,
    /// The slack is split equally, weighted by grow priority.
    GrowUniformly,
    /// The slack is split in proportion to natural length times grow priority.
    GrowProportionally,
    /// Children keep their natural length and are packed at the start.
    JustifyToStart,
    /// Children keep their natural length and are packed in the middle.
    JustifyToCenter,
    /// Children keep their natural length and are packed at the end.
    JustifyToEnd,
}

/// What a stack does when its children's natural lengths exceed its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverflowDistribution {
    /// The shortfall is split equally, weighted by shrink priority.
    CondenseUniformly,
    /// The shortfall is split in proportion to natural length times shrink
    /// priority.
    #[default]
    CondenseProportionally,
}

/// Placement of children across the stack axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossAlignment {
    /// Top of a row, leading edge of a column.
    #[default]
    Leading,
    /// Centred.
    Center,
    /// Bottom of a row, trailing edge of a column.
    Trailing,
    /// Stretched to the stack's full cross length.
    Fill,
}

/// Per-child weights for growing and shrinking.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackTraits {
    grow_priority: f32,
    shrink_priority: f32,
}

impl Default for StackTraits {
    fn default() -> Self {
        Self::FLEXIBLE
    }
}

impl StackTraits {
    /// Neither grows nor shrinks.
    pub const FIXED: Self = Self {
        grow_priority: 0.0,
        shrink_priority: 0.0,
    };

    /// Grows and shrinks with unit weight.
    pub const FLEXIBLE: Self = Self {
        grow_priority: 1.0,
        shrink_priority: 1.0,
    };

    /// Grows but never shrinks.
    pub const GROWS: Self = Self {
        grow_priority: 1.0,
        shrink_priority: 0.0,
    };

    /// Shrinks but never grows.
    pub const SHRINKS: Self = Self {
        grow_priority: 0.0,
        shrink_priority: 1.0,
    };

    /// Creates traits with explicit priorities.
    ///
    /// # Panics
    ///
    /// Panics if either priority is negative, NaN, or infinite.
    #[must_use]
    pub fn new(grow_priority: f32, shrink_priority: f32) -> Self {
        assert!(
            grow_priority.is_finite() && grow_priority >= 0.0,
            "grow priority must be finite and non-negative, got {grow_priority}"
        );
        assert!(
            shrink_priority.is_finite() && shrink_priority >= 0.0,
            "shrink priority must be finite and non-negative, got {shrink_priority}"
        );
        Self {
            grow_priority,
            shrink_priority,
        }
    }

    /// Weight when distributing slack.
    #[must_use]
    pub const fn grow_priority(&self) -> f32 {
        self.grow_priority
    }

    /// Weight when distributing a shortfall.
    #[must_use]
    pub const fn shrink_priority(&self) -> f32 {
        self.shrink_priority
    }
}

// ============================================================================
// StackLayout
// ============================================================================

/// The layout shared by [`Row`] and [`Column`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackLayout {
    /// The stack axis.
    pub axis: StackAxis,
    /// Handling of leftover space.
    pub underflow: UnderflowDistribution,
    /// Handling of insufficient space.
    pub overflow: OverflowDistribution,
    /// Cross-axis placement.
    pub alignment: CrossAlignment,
    /// Fixed space between adjacent children.
    pub spacing: f32,
}

impl StackLayout {
    /// A stack along `axis` with default distributions and no spacing.
    #[must_use]
    pub fn new(axis: StackAxis) -> Self {
        Self {
            axis,
            underflow: UnderflowDistribution::default(),
            overflow: OverflowDistribution::default(),
            alignment: CrossAlignment::default(),
            spacing: 0.0,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn total_spacing(&self, count: usize) -> f32 {
        self.spacing * count.saturating_sub(1) as f32
    }

    fn traits_of(items: &[LayoutItem<'_, StackTraits>]) -> Vec<StackTraits> {
        items.iter().map(|item| *item.traits).collect()
    }

    fn cross_extent(&self, items: &[LayoutItem<'_, StackTraits>], main: &[f32], cross: Axis) -> f32 {
        items
            .iter()
            .zip(main)
            .map(|(item, length)| {
                let constraint = self.axis.constraint(Axis::at_most(*length), cross);
                self.axis.cross(item.measure(constraint))
            })
            .fold(0.0, f32::max)
    }
}

impl Layout for StackLayout {
    type Traits = StackTraits;

    fn measure(&self, constraint: SizeConstraint, items: &[LayoutItem<'_, StackTraits>]) -> Size {
        if items.is_empty() {
            return Size::zero();
        }

        let main_limit = self.axis.main_constraint(constraint);
        let cross_limit = self.axis.cross_constraint(constraint);

        let natural_constraint = self.axis.constraint(Axis::Unconstrained, cross_limit);
        let natural: Vec<Size> = items
            .iter()
            .map(|item| item.measure(natural_constraint))
            .collect();
        let lengths: Vec<f32> = natural.iter().map(|size| self.axis.main(*size)).collect();
        let content = lengths.iter().sum::<f32>() + self.total_spacing(items.len());

        // Every alignment, including `Fill`, measures to the widest child:
        // reporting the cross limit would grow a stack that already fits a
        // looser constraint. `Fill` stretches children during layout.
        let (main, cross) = match main_limit.constrained_value() {
            Some(limit) if content > limit => {
                // Children are condensed, so their cross extent is re-measured
                // at the lengths they will actually get.
                let ranges = self.axis_ranges(&lengths, &Self::traits_of(items), limit);
                let condensed: Vec<f32> = ranges
                    .iter()
                    .map(|range| (range.end - range.start).max(0.0))
                    .collect();
                let main = ranges.last().map_or(0.0, |range| range.end);
                (main, self.cross_extent(items, &condensed, cross_limit))
            }
            _ => {
                let cross = natural
                    .iter()
                    .map(|size| self.axis.cross(*size))
                    .fold(0.0, f32::max);
                (content, cross)
            }
        };

        self.axis.size(main, cross)
    }

    fn layout(&self, size: Size, items: &[LayoutItem<'_, StackTraits>]) -> Vec<LayoutAttributes> {
        if items.is_empty() {
            return Vec::new();
        }

        let length = self.axis.main(size);
        let cross = self.axis.cross(size);
        let cross_limit = Axis::at_most(cross);

        let natural_constraint = self.axis.constraint(Axis::Unconstrained, cross_limit);
        let lengths: Vec<f32> = items
            .iter()
            .map(|item| self.axis.main(item.measure(natural_constraint)))
            .collect();
        let ranges = self.axis_ranges(&lengths, &Self::traits_of(items), length);

        items
            .iter()
            .zip(ranges)
            .map(|(item, range)| {
                let main_length = (range.end - range.start).max(0.0);
                let child_cross = match self.alignment {
                    CrossAlignment::Fill => cross,
                    _ => {
                        let constraint = self.axis.constraint(Axis::at_most(main_length), cross_limit);
                        self.axis.cross(item.measure(constraint)).min(cross)
                    }
                };
                let cross_origin = match self.alignment {
                    CrossAlignment::Leading | CrossAlignment::Fill => 0.0,
                    CrossAlignment::Center => (cross - child_cross) / 2.0,
                    CrossAlignment::Trailing => cross - child_cross,
                };
                LayoutAttributes::new(Rect::new(
                    self.axis.point(range.start, cross_origin),
                    self.axis.size(main_length, child_cross),
                ))
            })
            .collect()
    }
}

// ============================================================================
// Stack children
// ============================================================================

/// One child of a [`Row`] or [`Column`].
#[derive(Debug, Clone, PartialEq)]
pub struct StackChild {
    /// The child element.
    pub element: AnyElement,
    /// Grow and shrink priorities.
    pub traits: StackTraits,
    /// Optional identity key.
    pub key: Option<ElementKey>,
}

impl StackChild {
    /// A child with default traits and no key.
    pub fn new(element: impl Into<AnyElement>) -> Self {
        Self {
            element: element.into(),
            traits: StackTraits::default(),
            key: None,
        }
    }
}

pub(crate) fn stack_content(layout: StackLayout, children: &[StackChild]) -> ElementContent {
    let mut builder = LayoutContent::builder(layout);
    for child in children {
        builder.add_with(child.traits, child.key.clone(), child.element.clone());
    }
    builder.build().into()
}
