//! Structural identity of elements across successive tree versions.

use core::{
    any::TypeId,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
};
use std::{collections::HashMap, rc::Rc};

use crate::element::AnyElement;

/// The concrete type of an element.
#[derive(Clone, Copy)]
pub struct ElementType {
    id: TypeId,
    name: &'static str,
}

impl ElementType {
    /// The element type of `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// The fully qualified type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The type name without its module path or generic arguments.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ElementType {}

impl Hash for ElementType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// An optional caller-supplied key distinguishing siblings of the same type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ElementKey(Rc<str>);

impl ElementKey {
    /// Creates a key.
    #[must_use]
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Rc::from(key.as_ref()))
    }

    /// The key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

impl From<&str> for ElementKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ElementKey {
    fn from(value: String) -> Self {
        Self(Rc::from(value))
    }
}

/// Identity of an element among its siblings: `(type, key, occurrence)`.
///
/// Siblings with the same type and key are told apart by `count`, the number
/// of earlier siblings with that same type and key. Reordering two unkeyed
/// siblings of the same type is therefore indistinguishable from changing
/// both in place; callers that need identity to follow reordering must key
/// their elements.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ElementIdentifier {
    element_type: ElementType,
    key: Option<ElementKey>,
    count: usize,
}

impl ElementIdentifier {
    /// Creates an identifier.
    #[must_use]
    pub const fn new(element_type: ElementType, key: Option<ElementKey>, count: usize) -> Self {
        Self {
            element_type,
            key,
            count,
        }
    }

    /// The identifier given to the root element of a tree.
    #[must_use]
    pub fn root(element: &AnyElement) -> Self {
        Self::new(element.element_type(), None, 0)
    }

    /// The element's type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// The explicit key, if any.
    #[must_use]
    pub const fn key(&self) -> Option<&ElementKey> {
        self.key.as_ref()
    }

    /// Occurrence index among siblings with the same type and key.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

impl Debug for ElementIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for ElementIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_type.short_name())?;
        if let Some(key) = &self.key {
            write!(f, ".{key:?}")?;
        }
        write!(f, ".{}", self.count)
    }
}

/// Hands out identifiers for one sibling group, in order of appearance.
#[derive(Debug, Default)]
pub struct IdentifierFactory {
    counts: HashMap<(ElementType, Option<ElementKey>), usize>,
}

impl IdentifierFactory {
    /// Creates a factory for a new sibling group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The identifier of the next sibling with this type and key.
    pub fn next(&mut self, element_type: ElementType, key: Option<ElementKey>) -> ElementIdentifier {
        let count = self
            .counts
            .entry((element_type, key.clone()))
            .or_insert(0);
        let identifier = ElementIdentifier::new(element_type, key, *count);
        *count += 1;
        identifier
    }
}

/// The identifiers from a tree's root down to one node.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementPath(Vec<ElementIdentifier>);

impl ElementPath {
    /// The empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns this path extended by one identifier.
    #[must_use]
    pub fn appending(&self, identifier: ElementIdentifier) -> Self {
        let mut components = self.0.clone();
        components.push(identifier);
        Self(components)
    }

    /// The path's components, root first.
    #[must_use]
    pub fn components(&self) -> &[ElementIdentifier] {
        &self.0
    }

    /// The last component.
    #[must_use]
    pub fn last(&self) -> Option<&ElementIdentifier> {
        self.0.last()
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, component) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            Display::fmt(component, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label;
    struct Image;

    #[test]
    fn counts_are_per_type_and_key() {
        let mut factory = IdentifierFactory::new();
        let label = ElementType::of::<Label>();
        let image = ElementType::of::<Image>();

        assert_eq!(factory.next(label, None).count(), 0);
        assert_eq!(factory.next(image, None).count(), 0);
        assert_eq!(factory.next(label, None).count(), 1);
        assert_eq!(factory.next(label, Some("title".into())).count(), 0);
        assert_eq!(factory.next(label, Some("title".into())).count(), 1);
        assert_eq!(factory.next(label, None).count(), 2);
    }

    #[test]
    fn path_display() {
        let mut factory = IdentifierFactory::new();
        let label = ElementType::of::<Label>();
        let path = ElementPath::new()
            .appending(factory.next(label, None))
            .appending(factory.next(label, Some("body".into())));
        assert_eq!(path.to_string(), "Label.0/Label.\"body\".0");
        assert_eq!(path.len(), 2);
    }
}
