//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to the u32 range, returning 0 for NaN or negative values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    cast::<f64, u32>(value.min(max).floor()).unwrap_or(0)
}

/// Floor a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn floor_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Round a f64 and clamp it to the u32 range, returning 0 for NaN or negative values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    floor_f64_to_u32(value.round())
}

/// Ceil a f64 and clamp it to the u32 range, returning 0 for non-finite values.
#[must_use]
pub fn ceil_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    floor_f64_to_u32(value.ceil())
}

/// Convert a collection length to f64 in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert a count to u32, saturating on overflow.
#[must_use]
pub fn usize_to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
