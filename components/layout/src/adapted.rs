//! Environment overrides for a subtree.

use core::fmt;

use alloc::rc::Rc;

use trellis_core::{
    AnyElement, ContentChild, Element, ElementContent, Environment, EnvironmentKey,
};

/// Measures and lays out a wrapped element in a modified environment.
///
/// ```ignore
/// let large = AdaptedEnvironment::with::<FontScale>(1.5, body);
/// ```
#[derive(Clone)]
pub struct AdaptedEnvironment {
    adapter: Rc<dyn Fn(&mut Environment)>,
    wrapped: AnyElement,
}

impl AdaptedEnvironment {
    /// Wraps `wrapped`, applying `adapter` to the environment it sees.
    pub fn new(adapter: impl Fn(&mut Environment) + 'static, wrapped: impl Into<AnyElement>) -> Self {
        Self {
            adapter: Rc::new(adapter),
            wrapped: wrapped.into(),
        }
    }

    /// Wraps `wrapped`, setting key `K` to `value`.
    pub fn with<K: EnvironmentKey>(value: K::Value, wrapped: impl Into<AnyElement>) -> Self {
        Self::new(move |environment| environment.set::<K>(value.clone()), wrapped)
    }

    /// The wrapped element.
    #[must_use]
    pub const fn wrapped(&self) -> &AnyElement {
        &self.wrapped
    }
}

impl fmt::Debug for AdaptedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptedEnvironment")
            .field("wrapped", &self.wrapped)
            .finish_non_exhaustive()
    }
}

impl Element for AdaptedEnvironment {
    fn content(&self) -> ElementContent {
        ElementContent::Adapted {
            adapter: Rc::clone(&self.adapter),
            child: ContentChild::single(self.wrapped.clone()),
        }
    }
}
