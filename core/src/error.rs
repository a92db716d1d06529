//! Errors raised when geometric inputs violate the layout contract.

use thiserror::Error;

/// A constraint, size, or scale value that cannot take part in layout.
///
/// Invalid values are programmer errors: the infallible constructors assert
/// against them, and the `try_` constructors surface them as this type.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    /// The value was NaN.
    #[error("layout value is NaN")]
    NotANumber,
    /// The value was below zero.
    #[error("layout value {0} is negative")]
    Negative(f32),
    /// The value was infinite where a finite value is required.
    #[error("layout value is infinite")]
    Infinite,
    /// A rounding scale was zero.
    #[error("rounding scale must be greater than zero")]
    ZeroScale,
}

impl GeometryError {
    /// Accepts any non-negative value, including `+inf`.
    pub(crate) fn check_non_negative(value: f32) -> Result<f32, Self> {
        if value.is_nan() {
            Err(Self::NotANumber)
        } else if value < 0.0 {
            Err(Self::Negative(value))
        } else {
            Ok(value)
        }
    }

    /// Accepts finite, non-negative values only.
    pub(crate) fn check_finite(value: f32) -> Result<f32, Self> {
        let value = Self::check_non_negative(value)?;
        if value.is_infinite() {
            Err(Self::Infinite)
        } else {
            Ok(value)
        }
    }
}
