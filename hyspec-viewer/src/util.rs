//! Numeric conversion utilities for hyspec-viewer.

/// Integer percentage `floor(completed * 100 / total)`, capped at 100.
///
/// A `total` of 0 counts as finished.
#[must_use]
pub fn percent_complete(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = completed.saturating_mul(100) / total;
    u8::try_from(percent.min(100)).unwrap_or(100)
}

/// Convert a percentage to a `0.0..=1.0` fraction.
#[must_use]
pub fn percent_to_fraction(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_complete() {
        assert_eq!(percent_complete(0, 3), 0);
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 66);
        assert_eq!(percent_complete(3, 3), 100);
        assert_eq!(percent_complete(5, 3), 100);
        assert_eq!(percent_complete(0, 0), 100);
    }

    #[test]
    fn test_fraction() {
        assert!((percent_to_fraction(50) - 0.5).abs() < f32::EPSILON);
        assert!((percent_to_fraction(200) - 1.0).abs() < f32::EPSILON);
    }
}
