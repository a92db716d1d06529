//! The layout protocol shared by every container element.
//!
//! Layout runs in two phases:
//!
//! 1. **Measurement** ([`Layout::measure`]): given a [`SizeConstraint`], how
//!    big does the container want to be? Children may be measured any number
//!    of times, at any constraint, through [`Measurable`].
//! 2. **Placement** ([`Layout::layout`]): given the container's final size,
//!    return one [`LayoutAttributes`] per child.
//!
//! All values are logical points. Conversion to device pixels happens once,
//! at the end of a pass, through [`RoundingScale`](crate::RoundingScale).

use core::fmt::Debug;

use crate::{Point, Rect, Size, SizeConstraint, Transform};

// ============================================================================
// Measurable - Child Proxy
// ============================================================================

/// A child that can be asked for its size under a constraint.
///
/// Implementations are expected to honour the layout contract described in
/// [`constraint`](crate::constraint): repeated queries at the same
/// constraint return the same size, and sizes are monotonic in the
/// constraint.
pub trait Measurable {
    /// The size this child wants within `constraint`.
    fn measure(&self, constraint: SizeConstraint) -> Size;
}

impl<F> Measurable for F
where
    F: Fn(SizeConstraint) -> Size,
{
    fn measure(&self, constraint: SizeConstraint) -> Size {
        self(constraint)
    }
}

/// A child paired with the per-child traits its container assigned it.
#[derive(Clone, Copy)]
pub struct LayoutItem<'a, T> {
    /// Container-specific configuration for this child.
    pub traits: &'a T,
    /// The child itself.
    pub content: &'a dyn Measurable,
}

impl<'a, T> LayoutItem<'a, T> {
    /// Pairs a child with its traits.
    #[must_use]
    pub const fn new(traits: &'a T, content: &'a dyn Measurable) -> Self {
        Self { traits, content }
    }

    /// Measures the child.
    #[must_use]
    pub fn measure(&self, constraint: SizeConstraint) -> Size {
        self.content.measure(constraint)
    }
}

impl<T: Debug> Debug for LayoutItem<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutItem")
            .field("traits", self.traits)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Layout Trait - Container Layout
// ============================================================================

/// A layout algorithm for arranging child elements.
///
/// Both methods must be pure: the same inputs always produce the same
/// output. Caches above this trait rely on it.
pub trait Layout: Debug + 'static {
    /// Per-child configuration, such as stack priorities.
    type Traits: Clone + Debug + Default + 'static;

    /// The size this container wants within `constraint`.
    fn measure(&self, constraint: SizeConstraint, items: &[LayoutItem<'_, Self::Traits>]) -> Size;

    /// Places each item within a container of the given `size`.
    ///
    /// Must return exactly one attribute set per item, in item order. Frames
    /// are relative to the container's origin.
    fn layout(&self, size: Size, items: &[LayoutItem<'_, Self::Traits>]) -> Vec<LayoutAttributes>;
}

// ============================================================================
// Layout Attributes
// ============================================================================

/// How a view's tint colour reacts to modal presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TintAdjustmentMode {
    /// Inherit the parent's behaviour.
    #[default]
    Automatic,
    /// Always draw the tint as-is.
    Normal,
    /// Always draw the tint desaturated.
    Dimmed,
}

/// The resolved placement and presentation of one child.
///
/// Position is stored as a `center` plus `bounds`, so that a non-identity
/// [`Transform`] rotates or scales around the child's centre. [`frame`]
/// is only meaningful while the transform is the identity.
///
/// [`frame`]: LayoutAttributes::frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutAttributes {
    /// Centre of the child in its parent's coordinate space.
    pub center: Point,
    /// The child's own bounds; the origin is normally zero.
    pub bounds: Rect,
    /// Affine transform applied around `center`.
    pub transform: Transform,
    /// Opacity between 0 and 1.
    pub alpha: f32,
    /// Whether the child receives input.
    pub is_user_interaction_enabled: bool,
    /// Whether the child is hidden.
    pub is_hidden: bool,
    /// Tint behaviour.
    pub tint_adjustment_mode: TintAdjustmentMode,
}

impl Default for LayoutAttributes {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

impl LayoutAttributes {
    /// Attributes placing a fully opaque, interactive child at `frame`.
    #[must_use]
    pub fn new(frame: Rect) -> Self {
        Self {
            center: frame.center(),
            bounds: Rect::from_size(frame.size()),
            transform: Transform::IDENTITY,
            alpha: 1.0,
            is_user_interaction_enabled: true,
            is_hidden: false,
            tint_adjustment_mode: TintAdjustmentMode::Automatic,
        }
    }

    /// The child's frame in its parent's coordinate space.
    #[must_use]
    pub fn frame(&self) -> Rect {
        let size = self.bounds.size();
        Rect::new(
            Point::new(
                self.center.x - size.width / 2.0,
                self.center.y - size.height / 2.0,
            ),
            size,
        )
    }

    /// Moves and resizes the child, keeping its bounds origin.
    pub fn set_frame(&mut self, frame: Rect) {
        self.center = frame.center();
        self.bounds = Rect::new(self.bounds.origin(), frame.size());
    }

    /// Returns a copy with the given frame.
    #[must_use]
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.set_frame(frame);
        self
    }
}

impl From<Rect> for LayoutAttributes {
    fn from(frame: Rect) -> Self {
        Self::new(frame)
    }
}
