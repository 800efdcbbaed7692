//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert i64 to f32 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f32(value: i64) -> f32 {
    cast::<i64, f32>(value).unwrap_or(0.0)
}

/// Convert a count to f32, saturating at `f32::MAX` for absurd sizes.
#[must_use]
pub fn usize_to_f32(value: usize) -> f32 {
    cast::<usize, f32>(value).unwrap_or(f32::MAX)
}

/// Divide and clamp into `[0, 1]`. A non-positive target counts as already met.
#[must_use]
pub fn progress_ratio(current: f32, target: f32) -> f32 {
    if target <= 0.0 {
        return 1.0;
    }
    let ratio = current / target;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_cover_ranges() {
        assert!((i64_to_f32(1_500) - 1_500.0).abs() < f32::EPSILON);
        assert!((usize_to_f32(3) - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn progress_ratio_clamps_and_guards_zero_targets() {
        assert!((progress_ratio(50.0, 100.0) - 0.5).abs() < f32::EPSILON);
        assert!((progress_ratio(500.0, 100.0) - 1.0).abs() < f32::EPSILON);
        assert!((progress_ratio(-10.0, 100.0) - 0.0).abs() < f32::EPSILON);
        assert!((progress_ratio(3.0, 0.0) - 1.0).abs() < f32::EPSILON);
    }
}
