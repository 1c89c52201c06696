//! Current-band navigation.

/// Tracks which band is displayed.
///
/// The index always stays within `[0, band_count)`. Requests that would
/// leave that range are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    current: usize,
    band_count: usize,
}

impl NavigationState {
    /// Start at band 0 of a cube with `band_count` bands.
    ///
    /// A count of 0 is treated as 1.
    #[must_use]
    pub fn new(band_count: usize) -> Self {
        Self {
            current: 0,
            band_count: band_count.max(1),
        }
    }

    /// Reset to band 0 for a newly loaded cube.
    pub fn reset(&mut self, band_count: usize) {
        *self = Self::new(band_count);
    }

    /// Zero-based index of the displayed band.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// One-based index, as shown to the operator.
    #[must_use]
    pub fn display_index(&self) -> usize {
        self.current + 1
    }

    #[must_use]
    pub fn band_count(&self) -> usize {
        self.band_count
    }

    /// Step back one band. Returns `true` if the index changed.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Step forward one band. Returns `true` if the index changed.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if self.current + 1 >= self.band_count {
            return false;
        }
        self.current += 1;
        true
    }

    /// Jump to a one-based band number.
    ///
    /// Valid for `1 <= n <= band_count`; anything else is ignored.
    /// Returns `true` if the request was in range.
    pub fn goto(&mut self, n: usize) -> bool {
        if n == 0 || n > self.band_count {
            return false;
        }
        self.current = n - 1;
        true
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_band_walk() {
        let mut nav = NavigationState::new(5);
        assert!(!nav.previous());
        assert_eq!(nav.current(), 0);

        for _ in 0..4 {
            assert!(nav.next());
        }
        assert_eq!(nav.current(), 4);
        assert!(!nav.next());
        assert_eq!(nav.current(), 4);

        assert!(nav.goto(3));
        assert_eq!(nav.current(), 2);
        assert_eq!(nav.display_index(), 3);
    }

    #[test]
    fn test_goto_out_of_range() {
        let mut nav = NavigationState::new(5);
        nav.goto(4);
        assert!(!nav.goto(0));
        assert!(!nav.goto(6));
        assert_eq!(nav.current(), 3);
        assert!(nav.goto(5));
        assert_eq!(nav.current(), 4);
    }

    #[test]
    fn test_reset() {
        let mut nav = NavigationState::new(5);
        nav.goto(5);
        nav.reset(2);
        assert_eq!(nav.current(), 0);
        assert_eq!(nav.band_count(), 2);
        assert!(!nav.goto(3));
    }

    #[test]
    fn test_single_band() {
        let mut nav = NavigationState::new(1);
        assert!(!nav.next());
        assert!(!nav.previous());
        assert!(nav.goto(1));
        assert_eq!(nav.current(), 0);
    }
}
