//! Tunables for the measurement caches.

bitflags::bitflags! {
    /// Independently toggleable measurement-cache optimizations.
    ///
    /// None of these change the sizes a layout pass produces for measurers
    /// that honour the layout contract; they only change how often the
    /// measurers run. [`LayoutOptions::default`] enables all of them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayoutOptions: u8 {
        /// Record the range of constraints a result is provably valid for.
        const HINT_RANGE_BOUNDARIES = 0b001;
        /// Reuse a looser (unconstrained) result when it already fits a tighter query.
        const SEARCH_UNCONSTRAINED_KEYS = 0b010;
        /// Keep the per-node child lookup tables between measurements.
        const MEASUREABLE_STORAGE_CACHE = 0b100;
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl LayoutOptions {
    /// Returns true if range-boundary hints are enabled.
    #[must_use]
    pub const fn hint_range_boundaries(self) -> bool {
        self.contains(Self::HINT_RANGE_BOUNDARIES)
    }

    /// Returns true if the unconstrained-key fallback is enabled.
    #[must_use]
    pub const fn search_unconstrained_keys(self) -> bool {
        self.contains(Self::SEARCH_UNCONSTRAINED_KEYS)
    }

    /// Returns true if child lookup tables are retained.
    #[must_use]
    pub const fn measureable_storage_cache(self) -> bool {
        self.contains(Self::MEASUREABLE_STORAGE_CACHE)
    }
}
