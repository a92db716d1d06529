//! Measurement memoization.
//!
//! [`HintingSizeCache`] is the per-element `constraint -> size` table used by
//! both the single-pass [`RenderPassCache`] and the persistent
//! [`ElementStateTree`](crate::state::ElementStateTree).

mod hinting;
mod render_pass;

pub use hinting::{CacheStats, HintingSizeCache};
pub use render_pass::{RenderPassCache, layout_element, measure_element};
