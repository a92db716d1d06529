#![no_std]
//! Layout elements for trellis.
//!
//! This crate implements the [`Layout`](trellis_core::Layout) protocol for the
//! standard containers and supplies the elements that use them:
//!
//! - linear stacks ([`Row`], [`Column`]) with grow and shrink priorities,
//! - a fixed-column [`Grid`],
//! - [`Overlay`] for layering,
//! - single-child modifiers ([`Inset`], [`ConstrainedSize`],
//!   [`AdaptedEnvironment`]),
//! - leaves ([`Spacer`], [`Empty`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_layout::{Row, Spacer, stack::{StackTraits, UnderflowDistribution}};
//!
//! let toolbar = Row::new()
//!     .underflow(UnderflowDistribution::GrowUniformly)
//!     .spacing(8.0)
//!     .child_with(title, StackTraits::FIXED)
//!     .child(Spacer::width(0.0))
//!     .child_with(done_button, StackTraits::FIXED);
//! ```
//!
//! All values are logical points.

extern crate alloc;
#[cfg(test)]
#[macro_use]
extern crate std;

pub use trellis_core::layout::*;
pub use trellis_core::{Axis, EdgeInsets, Point, Rect, Size, SizeConstraint};

pub mod adapted;
pub mod constrained;
pub mod grid;
pub mod inset;
pub mod overlay;
pub mod spacer;
pub mod stack;

pub use adapted::AdaptedEnvironment;
pub use constrained::{ConstrainedSize, ConstrainedSizeLayout, SizeLimit};
pub use grid::{Grid, GridLayout, HorizontalAlignment, VerticalAlignment};
pub use inset::{Inset, InsetLayout};
pub use overlay::{Overlay, OverlayLayout};
pub use spacer::{Empty, Spacer};
pub use stack::{Column, Row, StackLayout, StackTraits};

/// Validates a gap between children.
fn checked_spacing(spacing: f32) -> f32 {
    assert!(
        spacing.is_finite() && spacing >= 0.0,
        "spacing must be finite and non-negative, got {spacing}"
    );
    spacing
}
