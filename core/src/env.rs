//! The environment: a typed, copy-on-write value bag passed down the tree.
//!
//! Values are keyed by [`EnvironmentKey`] types. Cloning an [`Environment`] is
//! cheap; writing to a clone copies the underlying map once. Each environment
//! carries a lazily assigned fingerprint, so two clones of an unmodified
//! environment compare equal without looking at any value.
//!
//! Measurement caches need to know which keys a measurement actually read.
//! [`Environment::observing`] returns an environment that records every read
//! into an access log chained to the enclosing one, so a container's recorded
//! keys include everything its descendants read while it was measured.

use core::{
    any::{Any, TypeId},
    cell::{Cell, RefCell},
    fmt::{self, Debug},
    sync::atomic::{AtomicU64, Ordering},
};
use std::{collections::BTreeMap, rc::Rc};

/// A typed key into the [`Environment`].
///
/// ```ignore
/// enum FontScale {}
///
/// impl EnvironmentKey for FontScale {
///     type Value = f32;
///     fn default_value() -> f32 { 1.0 }
/// }
/// ```
pub trait EnvironmentKey: 'static {
    /// The type of value stored under this key.
    type Value: Clone + Debug + PartialEq + 'static;

    /// The value read when the key has not been set.
    fn default_value() -> Self::Value;

    /// Whether two values are interchangeable in the given context.
    ///
    /// Keys that never influence measurement should return `true` for
    /// [`EquivalencyContext::Sizing`], so changing them does not invalidate
    /// cached sizes.
    fn is_equivalent(lhs: &Self::Value, rhs: &Self::Value, context: EquivalencyContext) -> bool {
        let _ = context;
        lhs == rhs
    }
}

/// The purpose two environments are being compared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquivalencyContext {
    /// Every observable difference counts.
    All,
    /// Only differences that can change a measured size count.
    Sizing,
}

type ErasedEquivalence = fn(Option<&dyn Any>, Option<&dyn Any>, EquivalencyContext) -> bool;

/// A type-erased handle on an [`EnvironmentKey`].
#[derive(Clone, Copy)]
pub struct KeyDescriptor {
    id: TypeId,
    name: &'static str,
    equivalent: ErasedEquivalence,
}

impl KeyDescriptor {
    /// The descriptor of key `K`.
    #[must_use]
    pub fn of<K: EnvironmentKey>() -> Self {
        Self {
            id: TypeId::of::<K>(),
            name: core::any::type_name::<K>(),
            equivalent: erased_equivalent::<K>,
        }
    }

    /// The key's type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    fn compare(
        &self,
        lhs: Option<&dyn Any>,
        rhs: Option<&dyn Any>,
        context: EquivalencyContext,
    ) -> bool {
        (self.equivalent)(lhs, rhs, context)
    }
}

impl Debug for KeyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq for KeyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for KeyDescriptor {}

fn erased_equivalent<K: EnvironmentKey>(
    lhs: Option<&dyn Any>,
    rhs: Option<&dyn Any>,
    context: EquivalencyContext,
) -> bool {
    let resolve = |value: Option<&dyn Any>| {
        value
            .and_then(|value| value.downcast_ref::<K::Value>())
            .cloned()
            .unwrap_or_else(K::default_value)
    };
    K::is_equivalent(&resolve(lhs), &resolve(rhs), context)
}

/// A set of environment keys, typically the keys read during a measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet(BTreeMap<TypeId, KeyDescriptor>);

impl KeySet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a key.
    pub fn insert(&mut self, key: KeyDescriptor) {
        self.0.insert(key.id, key);
    }

    /// Adds every key of `other`.
    pub fn extend(&mut self, other: &Self) {
        self.0.extend(other.0.iter().map(|(id, key)| (*id, *key)));
    }

    /// Returns true if key `K` is in the set.
    #[must_use]
    pub fn contains<K: EnvironmentKey>(&self) -> bool {
        self.0.contains_key(&TypeId::of::<K>())
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the keys.
    pub fn iter(&self) -> impl Iterator<Item = &KeyDescriptor> {
        self.0.values()
    }
}

#[derive(Debug, Default)]
struct AccessLog {
    keys: RefCell<KeySet>,
    parent: Option<Rc<AccessLog>>,
}

impl AccessLog {
    fn record(&self, key: KeyDescriptor) {
        let mut log = Some(self);
        while let Some(current) = log {
            current.keys.borrow_mut().insert(key);
            log = current.parent.as_deref();
        }
    }
}

#[derive(Clone)]
struct Entry {
    key: KeyDescriptor,
    value: Rc<dyn Any>,
}

static NEXT_FINGERPRINT: AtomicU64 = AtomicU64::new(1);

/// An immutable, copy-on-write bag of typed values.
#[derive(Clone, Default)]
pub struct Environment {
    values: Rc<BTreeMap<TypeId, Entry>>,
    fingerprint: Cell<Option<u64>>,
    access: Option<Rc<AccessLog>>,
}

impl Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("keys", &self.values.values().map(|entry| entry.key).collect::<Vec<_>>())
            .field("fingerprint", &self.fingerprint.get())
            .field("observing", &self.access.is_some())
            .finish()
    }
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the value for `K`, falling back to its default.
    ///
    /// The read is recorded if this environment is being observed.
    #[must_use]
    pub fn get<K: EnvironmentKey>(&self) -> K::Value {
        if let Some(access) = &self.access {
            access.record(KeyDescriptor::of::<K>());
        }
        self.values
            .get(&TypeId::of::<K>())
            .and_then(|entry| entry.value.downcast_ref::<K::Value>())
            .cloned()
            .unwrap_or_else(K::default_value)
    }

    /// Stores a value for `K`, copying the map if it is shared.
    pub fn set<K: EnvironmentKey>(&mut self, value: K::Value) {
        let entry = Entry {
            key: KeyDescriptor::of::<K>(),
            value: Rc::new(value),
        };
        Rc::make_mut(&mut self.values).insert(TypeId::of::<K>(), entry);
        self.fingerprint.set(None);
    }

    /// Returns a copy with `K` set to `value`.
    #[must_use]
    pub fn with<K: EnvironmentKey>(mut self, value: K::Value) -> Self {
        self.set::<K>(value);
        self
    }

    /// Returns true if `K` has been set explicitly.
    #[must_use]
    pub fn contains<K: EnvironmentKey>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<K>())
    }

    /// Number of explicitly set keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no key has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A token that is equal for two environments only if neither has been
    /// modified since one was cloned from the other.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        if let Some(fingerprint) = self.fingerprint.get() {
            return fingerprint;
        }
        let fingerprint = NEXT_FINGERPRINT.fetch_add(1, Ordering::Relaxed);
        self.fingerprint.set(Some(fingerprint));
        fingerprint
    }

    /// Returns a copy that records every key read through it, and through
    /// copies derived from it, until the copies are dropped.
    #[must_use]
    pub fn observing(&self) -> Self {
        let log = AccessLog {
            keys: RefCell::new(KeySet::new()),
            parent: self.access.clone(),
        };
        Self {
            values: self.values.clone(),
            fingerprint: self.fingerprint.clone(),
            access: Some(Rc::new(log)),
        }
    }

    /// Keys read so far through this observing environment.
    #[must_use]
    pub fn observed_keys(&self) -> KeySet {
        self.access
            .as_ref()
            .map(|log| log.keys.borrow().clone())
            .unwrap_or_default()
    }

    /// Records `keys` as read, as if they had been read through this environment.
    pub fn record_reads(&self, keys: &KeySet) {
        if let Some(access) = &self.access {
            for key in keys.iter() {
                access.record(*key);
            }
        }
    }

    /// Returns a copy that does not record reads.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            values: self.values.clone(),
            fingerprint: self.fingerprint.clone(),
            access: None,
        }
    }

    fn raw(&self, id: TypeId) -> Option<&dyn Any> {
        self.values.get(&id).map(|entry| &*entry.value)
    }

    fn same_fingerprint(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.values, &other.values) || self.fingerprint() == other.fingerprint()
    }

    /// Compares every key set in either environment.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self, context: EquivalencyContext) -> bool {
        if self.same_fingerprint(other) {
            return true;
        }
        self.values
            .values()
            .chain(other.values.values())
            .all(|entry| entry.key.compare(self.raw(entry.key.id), other.raw(entry.key.id), context))
    }

    /// Compares only the given keys.
    #[must_use]
    pub fn is_equivalent_for(
        &self,
        other: &Self,
        context: EquivalencyContext,
        keys: &KeySet,
    ) -> bool {
        if keys.is_empty() || self.same_fingerprint(other) {
            return true;
        }
        keys.iter()
            .all(|key| key.compare(self.raw(key.id), other.raw(key.id), context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum FontScale {}

    impl EnvironmentKey for FontScale {
        type Value = f32;

        fn default_value() -> f32 {
            1.0
        }
    }

    enum Accent {}

    impl EnvironmentKey for Accent {
        type Value = u32;

        fn default_value() -> u32 {
            0
        }

        fn is_equivalent(lhs: &u32, rhs: &u32, context: EquivalencyContext) -> bool {
            context == EquivalencyContext::Sizing || lhs == rhs
        }
    }

    #[test]
    fn reads_default_when_unset() {
        let env = Environment::new();
        assert_eq!(env.get::<FontScale>(), 1.0);
        let env = env.with::<FontScale>(2.0);
        assert_eq!(env.get::<FontScale>(), 2.0);
    }

    #[test]
    fn copy_on_write_leaves_original_untouched() {
        let original = Environment::new().with::<FontScale>(1.5);
        let mut copy = original.clone();
        copy.set::<FontScale>(3.0);
        assert_eq!(original.get::<FontScale>(), 1.5);
        assert_eq!(copy.get::<FontScale>(), 3.0);
    }

    #[test]
    fn fingerprint_is_shared_by_clones_and_reset_by_writes() {
        let env = Environment::new().with::<FontScale>(1.5);
        let fingerprint = env.fingerprint();
        let clone = env.clone();
        assert_eq!(clone.fingerprint(), fingerprint);

        let modified = clone.with::<Accent>(3);
        assert_ne!(modified.fingerprint(), fingerprint);
    }

    #[test]
    fn equivalence_respects_context() {
        let a = Environment::new().with::<Accent>(1);
        let b = Environment::new().with::<Accent>(2);
        assert!(!a.is_equivalent(&b, EquivalencyContext::All));
        assert!(a.is_equivalent(&b, EquivalencyContext::Sizing));
    }

    #[test]
    fn explicit_default_matches_unset() {
        let a = Environment::new().with::<FontScale>(1.0);
        let b = Environment::new();
        assert!(a.is_equivalent(&b, EquivalencyContext::All));
    }

    #[test]
    fn observing_records_reads_up_the_chain() {
        let env = Environment::new().with::<FontScale>(2.0);
        let outer = env.observing();
        let inner = outer.observing();
        let _ = inner.get::<FontScale>();

        assert!(inner.observed_keys().contains::<FontScale>());
        assert!(outer.observed_keys().contains::<FontScale>());
        assert!(env.observed_keys().is_empty());

        let detached = inner.detached();
        let _ = detached.get::<Accent>();
        assert!(!outer.observed_keys().contains::<Accent>());
    }

    #[test]
    fn subset_comparison_ignores_unread_keys() {
        let a = Environment::new().with::<FontScale>(1.0).with::<Accent>(1);
        let b = Environment::new().with::<FontScale>(1.0).with::<Accent>(9);

        let mut keys = KeySet::new();
        keys.insert(KeyDescriptor::of::<FontScale>());
        assert!(a.is_equivalent_for(&b, EquivalencyContext::All, &keys));

        keys.insert(KeyDescriptor::of::<Accent>());
        assert!(!a.is_equivalent_for(&b, EquivalencyContext::All, &keys));
    }
}
