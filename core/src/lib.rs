//! Core primitives for the trellis layout engine.
//!
//! This crate defines the vocabulary shared by layout elements and the
//! engine that measures them:
//!
//! - geometry values ([`Size`], [`Point`], [`Rect`], [`EdgeInsets`], [`Transform`]),
//! - the constraint algebra ([`SizeConstraint`], [`Axis`]) and its layout contract,
//! - the [`Element`] model and [`ElementContent`] shapes,
//! - structural identity ([`ElementIdentifier`], [`ElementPath`]),
//! - the [`Layout`] protocol and [`LayoutAttributes`],
//! - the copy-on-write [`Environment`],
//! - tunables ([`LayoutOptions`]) and pixel snapping ([`RoundingScale`]).
//!
//! All values are logical points.

pub mod constraint;
pub mod element;
pub mod env;
pub mod error;
pub mod geometry;
pub mod identifier;
pub mod layout;
pub mod options;
pub mod rounding;

pub use constraint::{Axis, SizeConstraint};
pub use element::{
    AnyElement, ContentChild, Element, ElementContent, LayoutContent, LayoutContentBuilder,
    equivalent_by_value,
};
pub use env::{EnvironmentKey, Environment, EquivalencyContext, KeyDescriptor, KeySet};
pub use error::GeometryError;
pub use geometry::{EdgeInsets, Point, Rect, Size, Transform};
pub use identifier::{ElementIdentifier, ElementKey, ElementPath, ElementType, IdentifierFactory};
pub use layout::{Layout, LayoutAttributes, LayoutItem, Measurable, TintAdjustmentMode};
pub use options::LayoutOptions;
pub use rounding::{RoundingContext, RoundingRule, RoundingScale};
