//! Geometry types for the trellis layout system.
//!
//! All values are expressed in logical points. Conversion to physical pixels is
//! the job of [`RoundingScale`](crate::RoundingScale) at the end of a layout
//! pass, and of whatever view layer finally consumes the frames.

use core::ops::{Add, Sub};

use crate::error::GeometryError;

// ============================================================================
// Size
// ============================================================================

/// Two-dimensional size expressed in points.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// The width in points.
    pub width: f32,
    /// The height in points.
    pub height: f32,
}

impl Size {
    /// Constructs a [`Size`] with the given `width` and `height`.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Constructs a [`Size`], rejecting NaN, negative and infinite components.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] naming the first invalid component.
    pub fn try_new(width: f32, height: f32) -> Result<Self, GeometryError> {
        GeometryError::check_finite(width)?;
        GeometryError::check_finite(height)?;
        Ok(Self { width, height })
    }

    /// Creates a [`Size`] with zero width and height.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// Returns true if both dimensions are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Returns true if both dimensions are finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    /// Component-wise maximum of two sizes.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum of two sizes.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }
}

// ============================================================================
// Point
// ============================================================================

/// Coordinate relative to a parent layout's origin.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// The x-coordinate in points.
    pub x: f32,
    /// The y-coordinate in points.
    pub y: f32,
}

impl Point {
    /// Constructs a [`Point`] at the given `x` and `y`.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a [`Point`] at the origin (0, 0).
    #[must_use]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ============================================================================
// Rect
// ============================================================================

/// Axis-aligned rectangle relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    origin: Point,
    size: Size,
}

impl Rect {
    /// Creates a new [`Rect`] with the provided `origin` and `size`.
    #[must_use]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle from origin (0, 0) with the given size.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::zero(),
            size,
        }
    }

    /// Creates a rectangle from its minimum and maximum edges.
    #[must_use]
    pub fn from_edges(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self::new(
            Point::new(min_x, min_y),
            Size::new(max_x - min_x, max_y - min_y),
        )
    }

    /// Returns the rectangle's origin (top-left corner).
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Returns the rectangle's size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Returns the rectangle's x-coordinate (left edge).
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.origin.x
    }

    /// Returns the rectangle's y-coordinate (top edge).
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.origin.y
    }

    /// Returns the rectangle's width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.size.width
    }

    /// Returns the rectangle's height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.size.height
    }

    /// Returns the minimum x-coordinate (left edge).
    #[must_use]
    pub const fn min_x(&self) -> f32 {
        self.origin.x
    }

    /// Returns the minimum y-coordinate (top edge).
    #[must_use]
    pub const fn min_y(&self) -> f32 {
        self.origin.y
    }

    /// Returns the maximum x-coordinate (right edge).
    #[must_use]
    pub const fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Returns the maximum y-coordinate (bottom edge).
    #[must_use]
    pub const fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Returns the midpoint x-coordinate.
    #[must_use]
    pub const fn mid_x(&self) -> f32 {
        self.origin.x + self.size.width / 2.0
    }

    /// Returns the midpoint y-coordinate.
    #[must_use]
    pub const fn mid_y(&self) -> f32 {
        self.origin.y + self.size.height / 2.0
    }

    /// Returns the center point of the rectangle.
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Returns the rectangle moved by `offset`.
    #[must_use]
    pub fn offset_by(&self, offset: Point) -> Self {
        Self::new(self.origin + offset, self.size)
    }

    /// Inset the rectangle by the given edge insets, clamping the size at zero.
    #[must_use]
    pub fn inset(&self, insets: EdgeInsets) -> Self {
        Self::new(
            Point::new(self.origin.x + insets.leading, self.origin.y + insets.top),
            Size::new(
                (self.size.width - insets.horizontal()).max(0.0),
                (self.size.height - insets.vertical()).max(0.0),
            ),
        )
    }

    /// Smallest rectangle containing both rectangles.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            self.min_x().min(other.min_x()),
            self.min_y().min(other.min_y()),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }
}

// ============================================================================
// EdgeInsets
// ============================================================================

/// Distances inset from each edge of a rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeInsets {
    /// Top inset in points
    pub top: f32,
    /// Bottom inset in points
    pub bottom: f32,
    /// Leading inset in points (left in LTR)
    pub leading: f32,
    /// Trailing inset in points (right in LTR)
    pub trailing: f32,
}

impl EdgeInsets {
    /// Zero insets
    pub const ZERO: Self = Self {
        top: 0.0,
        bottom: 0.0,
        leading: 0.0,
        trailing: 0.0,
    };

    /// Creates new edge insets
    #[must_use]
    pub const fn new(top: f32, bottom: f32, leading: f32, trailing: f32) -> Self {
        Self {
            top,
            bottom,
            leading,
            trailing,
        }
    }

    /// The same inset on every edge.
    #[must_use]
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Horizontal and vertical insets applied symmetrically.
    #[must_use]
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(vertical, vertical, horizontal, horizontal)
    }

    /// Sum of leading and trailing insets.
    #[must_use]
    pub const fn horizontal(&self) -> f32 {
        self.leading + self.trailing
    }

    /// Sum of top and bottom insets.
    #[must_use]
    pub const fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

// ============================================================================
// Transform
// ============================================================================

/// A 2D affine transform applied around an element's center.
///
/// Stored as the matrix `[a b 0; c d 0; tx ty 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// A translation by `(tx, ty)`.
    #[must_use]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// A scale by `(sx, sy)`.
    #[must_use]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// A rotation by `radians`.
    #[must_use]
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Returns `self` followed by `other`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.tx * other.a + self.ty * other.c + other.tx,
            ty: self.tx * other.b + self.ty * other.d + other.ty,
        }
    }

    /// Returns true if this is the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Applies the transform to a point.
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.tx,
            self.b * point.x + self.d * point.y + self.ty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Rect::new(Point::new(5.0, 20.0), Size::new(10.0, 5.0));
        let union = a.union(&b);
        assert_eq!(union, Rect::from_edges(0.0, 0.0, 15.0, 25.0));
    }

    #[test]
    fn inset_clamps_at_zero() {
        let rect = Rect::from_size(Size::new(10.0, 10.0));
        let inset = rect.inset(EdgeInsets::uniform(8.0));
        assert_eq!(inset.origin(), Point::new(8.0, 8.0));
        assert_eq!(inset.size(), Size::zero());
    }

    #[test]
    fn transform_concat_applies_in_order() {
        let scale_then_move = Transform::scale(2.0, 2.0).concat(&Transform::translation(5.0, 0.0));
        assert_eq!(scale_then_move.apply(Point::new(1.0, 1.0)), Point::new(7.0, 2.0));
        assert!(Transform::IDENTITY.concat(&Transform::IDENTITY).is_identity());
    }

    #[test]
    fn size_try_new_rejects_invalid() {
        assert!(Size::try_new(1.0, 2.0).is_ok());
        assert_eq!(Size::try_new(f32::NAN, 2.0), Err(GeometryError::NotANumber));
        assert_eq!(Size::try_new(1.0, -2.0), Err(GeometryError::Negative(-2.0)));
        assert_eq!(Size::try_new(f32::INFINITY, 2.0), Err(GeometryError::Infinite));
    }
}
