//! The size constraint algebra.
//!
//! A [`SizeConstraint`] is the input to every measurement and the key of every
//! measurement cache. Each of its two [`Axis`] values is either
//! [`Axis::Unconstrained`] or [`Axis::AtMost`] a non-negative limit.
//!
//! # The layout contract
//!
//! Measurers are expected to be *monotonic*: for a fixed width, the measured
//! height never decreases as the height constraint grows, and once a
//! measurement at some constraint `H2` returns a height that fits within a
//! smaller constraint `H1`, measuring at `H1` returns exactly the same size.
//! The same holds for width. The caches in the `trellis` crate deduce results
//! from this rule, so a measurer that breaks it gets wrong answers back.

use core::{
    hash::{Hash, Hasher},
    ops::{Add, Div, Mul, Sub},
};

use crate::{Size, error::GeometryError};

/// A constraint along a single axis.
///
/// `AtMost` values at or above [`f32::MAX`] (including infinity) are treated
/// as [`Axis::Unconstrained`] by equality, hashing, and [`Axis::maximum`], so
/// two different "very large" sentinels always land on the same cache key.
#[derive(Clone, Copy, Debug)]
pub enum Axis {
    /// No limit along this axis.
    Unconstrained,
    /// No larger than the given value along this axis.
    AtMost(f32),
}

impl Axis {
    /// Creates an `AtMost` axis, normalizing oversized limits to `Unconstrained`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is NaN or negative.
    #[must_use]
    pub fn at_most(value: f32) -> Self {
        match Self::try_at_most(value) {
            Ok(axis) => axis,
            Err(error) => panic!("invalid axis constraint: {error}"),
        }
    }

    /// Creates an `AtMost` axis, rejecting NaN and negative limits.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotANumber`] or [`GeometryError::Negative`].
    pub fn try_at_most(value: f32) -> Result<Self, GeometryError> {
        let value = GeometryError::check_non_negative(value)?;
        Ok(Self::AtMost(value).normalized())
    }

    /// Canonical form: oversized limits become `Unconstrained`, `-0.0` becomes `0.0`.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::AtMost(value) if value >= f32::MAX => Self::Unconstrained,
            Self::AtMost(value) if value == 0.0 => Self::AtMost(0.0),
            other => other,
        }
    }

    /// The largest value this axis admits; `+inf` when unconstrained.
    #[must_use]
    pub fn maximum(self) -> f32 {
        match self.normalized() {
            Self::Unconstrained => f32::INFINITY,
            Self::AtMost(value) => value,
        }
    }

    /// The smallest value this axis admits, which is always zero.
    #[must_use]
    pub const fn minimum(self) -> f32 {
        0.0
    }

    /// The limit if there is one.
    #[must_use]
    pub fn constrained_value(self) -> Option<f32> {
        match self.normalized() {
            Self::Unconstrained => None,
            Self::AtMost(value) => Some(value),
        }
    }

    /// Returns true if this axis has no limit.
    #[must_use]
    pub fn is_unconstrained(self) -> bool {
        matches!(self.normalized(), Self::Unconstrained)
    }

    /// Returns true if `value` does not exceed the limit.
    #[must_use]
    pub fn fits(self, value: f32) -> bool {
        value <= self.maximum()
    }

    fn key_bits(self) -> Option<u32> {
        self.constrained_value().map(f32::to_bits)
    }
}

impl PartialEq for Axis {
    fn eq(&self, other: &Self) -> bool {
        self.key_bits() == other.key_bits()
    }
}

impl Eq for Axis {}

impl Hash for Axis {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_bits().hash(state);
    }
}

impl From<f32> for Axis {
    fn from(value: f32) -> Self {
        Self::at_most(value)
    }
}

impl Add<f32> for Axis {
    type Output = Self;

    fn add(self, rhs: f32) -> Self {
        match self.normalized() {
            Self::Unconstrained => Self::Unconstrained,
            Self::AtMost(value) => Self::at_most((value + rhs).max(0.0)),
        }
    }
}

impl Sub<f32> for Axis {
    type Output = Self;

    fn sub(self, rhs: f32) -> Self {
        match self.normalized() {
            Self::Unconstrained => Self::Unconstrained,
            Self::AtMost(value) => Self::at_most((value - rhs).max(0.0)),
        }
    }
}

impl Mul<f32> for Axis {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        match self.normalized() {
            Self::Unconstrained => Self::Unconstrained,
            Self::AtMost(value) => Self::at_most(value * rhs),
        }
    }
}

impl Div<f32> for Axis {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        match self.normalized() {
            Self::Unconstrained => Self::Unconstrained,
            Self::AtMost(value) => Self::at_most(value / rhs),
        }
    }
}

/// Per-axis upper bounds used as measurement input and cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SizeConstraint {
    /// The width constraint.
    pub width: Axis,
    /// The height constraint.
    pub height: Axis,
}

impl Default for SizeConstraint {
    fn default() -> Self {
        Self::UNCONSTRAINED
    }
}

impl SizeConstraint {
    /// No limit on either axis.
    pub const UNCONSTRAINED: Self = Self {
        width: Axis::Unconstrained,
        height: Axis::Unconstrained,
    };

    /// Creates a constraint from two axes.
    #[must_use]
    pub fn new(width: Axis, height: Axis) -> Self {
        Self {
            width: width.normalized(),
            height: height.normalized(),
        }
    }

    /// Creates an `AtMost` constraint on both axes.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if either value is NaN or negative.
    pub fn try_new(width: f32, height: f32) -> Result<Self, GeometryError> {
        Ok(Self::new(Axis::try_at_most(width)?, Axis::try_at_most(height)?))
    }

    /// Constrains the width only.
    #[must_use]
    pub fn width_at_most(width: f32) -> Self {
        Self::new(Axis::at_most(width), Axis::Unconstrained)
    }

    /// Constrains the height only.
    #[must_use]
    pub fn height_at_most(height: f32) -> Self {
        Self::new(Axis::Unconstrained, Axis::at_most(height))
    }

    /// The largest size this constraint admits; unconstrained axes are `+inf`.
    #[must_use]
    pub fn maximum(&self) -> Size {
        Size::new(self.width.maximum(), self.height.maximum())
    }

    /// The smallest size this constraint admits.
    #[must_use]
    pub const fn minimum(&self) -> Size {
        Size::zero()
    }

    /// Shrinks each axis by the given amount, clamping at zero.
    #[must_use]
    pub fn inset(&self, width: f32, height: f32) -> Self {
        Self::new(self.width - width, self.height - height)
    }

    /// Returns true if `size` lies within the constraint on both axes.
    #[must_use]
    pub fn fits(&self, size: Size) -> bool {
        self.width.fits(size.width) && self.height.fits(size.height)
    }

    /// Returns true if both axes are unconstrained.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.width.is_unconstrained() && self.height.is_unconstrained()
    }
}

impl From<Size> for SizeConstraint {
    /// # Panics
    ///
    /// Panics if either dimension is NaN or negative.
    fn from(size: Size) -> Self {
        Self::new(Axis::at_most(size.width), Axis::at_most(size.height))
    }
}
