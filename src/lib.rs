#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub use trellis_core::*;
pub use trellis_layout::{
    AdaptedEnvironment, Column, ConstrainedSize, Empty, Grid, Inset, Overlay, Row, SizeLimit,
    Spacer, StackTraits, adapted, constrained, grid, inset, overlay, spacer, stack,
};

pub mod cache;
pub mod logging;
pub mod result;
pub mod state;

#[doc(inline)]
pub use cache::{HintingSizeCache, RenderPassCache, layout_element, measure_element};
#[doc(inline)]
pub use result::LayoutResultNode;
#[doc(inline)]
pub use state::{ElementState, ElementStateTree, StateId, StateTreeObserver};

pub mod prelude {
    //! The types most programs need, for glob import.
    //!
    //! ```rust,ignore
    //! use trellis::prelude::*;
    //!
    //! let mut tree = ElementStateTree::new(LayoutOptions::default());
    //! tree.update(Row::new().child(Spacer::width(8.0)), &Environment::new());
    //! ```
    pub use crate::{
        AnyElement, Column, Element, ElementContent, ElementStateTree, Environment,
        EnvironmentKey, Grid, LayoutOptions, LayoutResultNode, Overlay, Rect, RoundingScale, Row,
        Size, SizeConstraint, Spacer, StackTraits,
    };
    pub use crate::stack::{CrossAlignment, OverflowDistribution, UnderflowDistribution};
}

#[cfg(test)]
mod tests;
