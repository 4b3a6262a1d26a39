use cgmath::{InnerSpace, Vector3};

/// Rescale `v` to the given length, preserving its direction.
#[inline]
pub fn with_length(v: Vector3<f64>, length: f64) -> Vector3<f64> {
    v * (length / v.magnitude())
}

/// Element-wise absolute value.
#[inline]
pub fn abs(v: Vector3<f64>) -> Vector3<f64> {
    v.map(f64::abs)
}
