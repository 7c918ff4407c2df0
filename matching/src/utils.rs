use crate::{Vec3, settings::ZERO_VECTOR_SQ};

/// Clamp `value` into `[lo, hi]` without panicking.
///
/// - An inverted range (`hi < lo`) pins the result at `lo`.
/// - NaN maps to `lo`, so NaN never reaches a marker.
#[inline]
pub fn clamp_range(value: f32, lo: f32, hi: f32) -> f32 {
    let hi = hi.max(lo);
    if value.is_nan() || value < lo {
        lo
    } else if value < hi {
        value
    } else {
        hi
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, alpha: f32) -> f32 {
    a + (b - a) * alpha
}

/// Unit vector along `v`, or zero when `v` is too short to normalize.
#[inline]
pub fn safe_normal(v: Vec3) -> Vec3 {
    if v.norm_squared() <= ZERO_VECTOR_SQ {
        return Vec3::zeros();
    }
    v.normalize()
}
