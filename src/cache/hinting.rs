//! Constraint-to-size memoization that exploits the layout contract.
//!
//! A measurement at constraint `C` returning size `S` tells us more than the
//! answer at `C`: on every axis where `S` fits inside `C`, any constraint
//! between `S` and `C` must produce `S` again. The cache records that
//! deduction as a hint range and as synthetic exact keys at the tightest
//! provably-equal points, so later queries inside the range never reach the
//! measurer.

use std::collections::HashMap;

use tracing::trace;
use trellis_core::{Axis, LayoutOptions, Size, SizeConstraint};

/// Hit and miss counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered by an exact key.
    pub exact_hits: u64,
    /// Lookups answered by a recorded hint range.
    pub hinted_hits: u64,
    /// Lookups answered by a looser unconstrained entry.
    pub unconstrained_hits: u64,
    /// Lookups that fell through to the measurer.
    pub misses: u64,
}

impl CacheStats {
    /// All lookups that did not call the measurer.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.exact_hits + self.hinted_hits + self.unconstrained_hits
    }
}

/// The closed interval of axis constraints known to produce one result.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisRange {
    lower: f32,
    upper: f32,
}

impl AxisRange {
    /// `constraint` produced `measured` on this axis.
    fn deduce(constraint: Axis, measured: f32) -> Self {
        let upper = constraint.maximum();
        if constraint.fits(measured) {
            Self {
                lower: measured,
                upper,
            }
        } else {
            Self {
                lower: upper,
                upper,
            }
        }
    }

    fn contains(self, axis: Axis) -> bool {
        let value = axis.maximum();
        self.lower <= value && value <= self.upper
    }

    /// The tightest constraint inside the range.
    fn lower_bound(self) -> Axis {
        Axis::at_most(self.lower)
    }

    fn is_degenerate(self) -> bool {
        self.lower >= self.upper
    }

    fn covers(self, other: Self) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }
}

/// A rectangle of constraints that all measure to `size`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HintRange {
    width: AxisRange,
    height: AxisRange,
    size: Size,
}

impl HintRange {
    fn contains(&self, constraint: SizeConstraint) -> bool {
        self.width.contains(constraint.width) && self.height.contains(constraint.height)
    }
    fn covers(&self, other: &Self) -> bool {
        self.size == other.size && self.width.covers(other.width) && self.height.covers(other.height)
    }
}

/// Memoizes `constraint -> size` for a single element.
///
/// Lookups try, in order:
///
/// 1. the exact key,
/// 2. recorded hint ranges (with [`LayoutOptions::HINT_RANGE_BOUNDARIES`]),
/// 3. previously measured looser keys whose result already fits the query
///    (with [`LayoutOptions::SEARCH_UNCONSTRAINED_KEYS`]).
///
/// Every answer the cache gives is one the measurer would have given, as
/// long as the measurer honours the layout contract. Only the number of
/// measurer calls depends on the options.
#[derive(Debug, Clone, Default)]
pub struct HintingSizeCache {
    options: LayoutOptions,
    entries: HashMap<SizeConstraint, Size>,
    hints: Vec<HintRange>,
    stats: CacheStats,
}

impl HintingSizeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            entries: HashMap::new(),
            hints: Vec::new(),
            stats: CacheStats::default(),
        }
    }

    /// The options this cache was created with.
    #[must_use]
    pub const fn options(&self) -> LayoutOptions {
        self.options
    }

    /// Returns the cached size for `constraint`, measuring on a miss.
    pub fn get(
        &mut self,
        constraint: SizeConstraint,
        measure: impl FnOnce(SizeConstraint) -> Size,
    ) -> Size {
        if let Some(size) = self.lookup(constraint) {
            return size;
        }
        let size = measure(constraint);
        self.insert(constraint, size);
        size
    }

    /// Returns a cached or deducible size without measuring.
    pub fn lookup(&mut self, constraint: SizeConstraint) -> Option<Size> {
        let constraint = normalize(constraint);

        if let Some(size) = self.entries.get(&constraint) {
            self.stats.exact_hits += 1;
            trace!(?constraint, ?size, "size cache hit");
            return Some(*size);
        }

        if self.options.hint_range_boundaries()
            && let Some(hint) = self.hints.iter().find(|hint| hint.contains(constraint))
        {
            let size = hint.size;
            self.stats.hinted_hits += 1;
            trace!(?constraint, ?size, "size cache hit from hint range");
            return Some(size);
        }

        if self.options.search_unconstrained_keys()
            && let Some(size) = self.search_unconstrained(constraint)
        {
            self.stats.unconstrained_hits += 1;
            trace!(?constraint, ?size, "size cache hit from unconstrained key");
            return Some(size);
        }

        self.stats.misses += 1;
        trace!(?constraint, "size cache miss");
        None
    }

    /// Records that measuring at `constraint` produced `size`.
    ///
    /// With [`LayoutOptions::HINT_RANGE_BOUNDARIES`] the deduced range and
    /// its boundary keys are recorded as well.
    pub fn insert(&mut self, constraint: SizeConstraint, size: Size) {
        let constraint = normalize(constraint);
        self.entries.insert(constraint, size);

        if !self.options.hint_range_boundaries() {
            return;
        }

        let width = AxisRange::deduce(constraint.width, size.width);
        let height = AxisRange::deduce(constraint.height, size.height);
        if width.is_degenerate() && height.is_degenerate() {
            return;
        }

        let boundaries = [
            SizeConstraint::new(width.lower_bound(), height.lower_bound()),
            SizeConstraint::new(width.lower_bound(), constraint.height),
            SizeConstraint::new(constraint.width, height.lower_bound()),
        ];
        for boundary in boundaries {
            self.entries.entry(boundary).or_insert(size);
        }
        let hint = HintRange {
            width,
            height,
            size,
        };
        if self.hints.iter().any(|existing| existing.covers(&hint)) {
            return;
        }
        self.hints.retain(|existing| !hint.covers(existing));
        trace!(?constraint, ?size, ?width, ?height, "recorded size hint");
        self.hints.push(hint);
    }

    /// Drops every entry.
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            trace!(entries = self.entries.len(), "size cache invalidated");
        }
        self.entries.clear();
        self.hints.clear();
    }

    /// Number of exact keys, literal and synthetic.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup counters since creation.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Finds an entry measured with fewer constraints whose result already
    /// satisfies every constrained axis of `constraint`.
    fn search_unconstrained(&self, constraint: SizeConstraint) -> Option<Size> {
        let SizeConstraint { width, height } = constraint;
        let loosened = [
            SizeConstraint::new(Axis::Unconstrained, height),
            SizeConstraint::new(width, Axis::Unconstrained),
            SizeConstraint::UNCONSTRAINED,
        ];
        let candidates = match (width.is_unconstrained(), height.is_unconstrained()) {
            (true, true) => return None,
            (false, false) => &loosened[..],
            _ => &loosened[2..],
        };
        candidates
            .iter()
            .filter_map(|key| self.entries.get(key))
            .find(|size| constraint.fits(**size))
            .copied()
    }
}

fn normalize(constraint: SizeConstraint) -> SizeConstraint {
    SizeConstraint::new(constraint.width.normalized(), constraint.height.normalized())
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    /// Text-like content: 10pt characters wrapped onto 20pt lines.
    fn wrapping(characters: u16) -> impl Fn(SizeConstraint) -> Size {
        move |constraint| {
            let characters = f32::from(characters);
            let per_line = (constraint.width.maximum() / 10.0).floor().max(1.0);
            let lines = (characters / per_line).ceil().max(1.0);
            Size::new(characters.min(per_line) * 10.0, lines * 20.0)
        }
    }

    fn counted<'a>(
        calls: &'a Cell<usize>,
        measure: &'a impl Fn(SizeConstraint) -> Size,
    ) -> impl FnOnce(SizeConstraint) -> Size + 'a {
        move |constraint| {
            calls.set(calls.get() + 1);
            measure(constraint)
        }
    }

    fn at_most(width: f32, height: f32) -> SizeConstraint {
        SizeConstraint::new(Axis::at_most(width), Axis::at_most(height))
    }

    #[test]
    fn exact_keys_miss_once() {
        let measure = wrapping(12);
        let calls = Cell::new(0);
        let mut cache = HintingSizeCache::new(LayoutOptions::empty());

        let keys = [
            at_most(120.0, 20.0),
            at_most(200.0, 20.0),
            at_most(120.0, 50.0),
            at_most(200.0, 50.0),
        ];
        for key in keys {
            cache.get(key, counted(&calls, &measure));
        }
        assert_eq!(calls.get(), 4);

        for key in keys {
            cache.get(key, counted(&calls, &measure));
        }
        assert_eq!(calls.get(), 4);
        assert_eq!(cache.stats().exact_hits, 4);
    }

    #[test]
    fn hint_range_covers_everything_between_result_and_query() {
        let measure = wrapping(12);
        let calls = Cell::new(0);
        let mut cache = HintingSizeCache::new(LayoutOptions::HINT_RANGE_BOUNDARIES);

        let size = cache.get(at_most(200.0, 50.0), counted(&calls, &measure));
        assert_eq!(size, Size::new(120.0, 20.0));

        for key in [
            at_most(120.0, 20.0),
            at_most(150.0, 20.0),
            at_most(120.0, 35.0),
            at_most(199.5, 49.0),
        ] {
            assert_eq!(cache.get(key, counted(&calls, &measure)), size);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn overflowing_axis_is_not_hinted() {
        let measure = wrapping(12);
        let calls = Cell::new(0);
        let mut cache = HintingSizeCache::new(LayoutOptions::HINT_RANGE_BOUNDARIES);

        // Three lines of 40pt overflow a 30pt height.
        let size = cache.get(at_most(40.0, 30.0), counted(&calls, &measure));
        assert_eq!(size, Size::new(40.0, 60.0));

        assert_eq!(cache.get(at_most(40.0, 20.0), counted(&calls, &measure)), size);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn narrower_query_is_never_answered_by_hint() {
        let measure = wrapping(12);
        let calls = Cell::new(0);
        let mut cache = HintingSizeCache::new(LayoutOptions::all());

        cache.get(SizeConstraint::UNCONSTRAINED, counted(&calls, &measure));
        let narrow = cache.get(at_most(60.0, 100.0), counted(&calls, &measure));
        assert_eq!(narrow, measure(at_most(60.0, 100.0)));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn unconstrained_result_answers_looser_queries() {
        let measure = wrapping(5);
        let calls = Cell::new(0);
        let mut cache = HintingSizeCache::new(LayoutOptions::SEARCH_UNCONSTRAINED_KEYS);

        let natural = cache.get(SizeConstraint::UNCONSTRAINED, counted(&calls, &measure));
        assert_eq!(natural, Size::new(50.0, 20.0));

        assert_eq!(cache.get(SizeConstraint::width_at_most(80.0), counted(&calls, &measure)), natural);
        assert_eq!(cache.get(at_most(50.0, 20.0), counted(&calls, &measure)), natural);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats().unconstrained_hits, 2);

        // The natural size does not fit, so the measurer must run.
        cache.get(SizeConstraint::width_at_most(30.0), counted(&calls, &measure));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn disabled_search_measures_again() {
        let measure = wrapping(5);
        let calls = Cell::new(0);
        let mut cache = HintingSizeCache::new(LayoutOptions::empty());

        cache.get(SizeConstraint::UNCONSTRAINED, counted(&calls, &measure));
        cache.get(SizeConstraint::width_at_most(80.0), counted(&calls, &measure));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn infinite_and_unconstrained_share_a_key() {
        let measure = wrapping(5);
        let calls = Cell::new(0);
        let mut cache = HintingSizeCache::new(LayoutOptions::empty());

        cache.get(SizeConstraint::UNCONSTRAINED, counted(&calls, &measure));
        cache.get(
            SizeConstraint::new(Axis::AtMost(f32::INFINITY), Axis::AtMost(f32::MAX)),
            counted(&calls, &measure),
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn repeated_inserts_keep_one_hint() {
        let mut cache = HintingSizeCache::new(LayoutOptions::HINT_RANGE_BOUNDARIES);
        let size = Size::new(120.0, 20.0);

        for _ in 0..5 {
            cache.insert(at_most(200.0, 50.0), size);
        }
        assert_eq!(cache.hints.len(), 1);

        // A range inside the recorded one adds nothing.
        cache.insert(at_most(150.0, 40.0), size);
        assert_eq!(cache.hints.len(), 1);

        // A wider range replaces the one it covers.
        cache.insert(at_most(300.0, 50.0), size);
        assert_eq!(cache.hints.len(), 1);
        assert_eq!(cache.lookup(at_most(250.0, 30.0)), Some(size));

        // A different size at an overlapping range is kept alongside.
        cache.insert(at_most(100.0, 50.0), Size::new(100.0, 40.0));
        assert_eq!(cache.hints.len(), 2);
    }

    #[test]
    fn invalidate_clears_hints() {
        let measure = wrapping(5);
        let calls = Cell::new(0);
        let mut cache = HintingSizeCache::new(LayoutOptions::all());

        cache.get(at_most(100.0, 100.0), counted(&calls, &measure));
        assert!(!cache.is_empty());
        cache.invalidate();
        assert!(cache.is_empty());

        cache.get(at_most(60.0, 30.0), counted(&calls, &measure));
        assert_eq!(calls.get(), 2);
    }
}
