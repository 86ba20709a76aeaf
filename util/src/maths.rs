//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics if `min > max`, the upper bound wins
/// in that case.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret < *min {
        ret = *min
    }
    if ret > *max {
        ret = *max
    }

    ret
}

/// Clamp a normalised output demand into `[-1, 1]`.
///
/// Non-finite NaN demands become zero, infinities saturate.
pub fn clamp_norm<T>(value: T) -> T
where
    T: Float
{
    if value.is_nan() {
        return T::zero();
    }

    clamp(&value, &-T::one(), &T::one())
}

/// Snap values whose magnitude is within the deadband to exactly zero.
///
/// Values outside the deadband are passed through unscaled.
pub fn apply_deadband<T>(value: T, deadband: T) -> T
where
    T: Float
{
    if value.abs() > deadband {
        value
    }
    else {
        T::zero()
    }
}

/// Wrap a number of rotations into the half-open range `(-0.5, 0.5]`.
pub fn wrap_half_rotation<T>(value: T) -> T
where
    T: Float
{
    let one = T::one();
    let half = one / (one + one);

    let r = rem_euclid(value + half, one) - half;

    if r <= -half {
        r + one
    }
    else {
        r
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp_norm() {
        assert_eq!(clamp_norm(0.3f64), 0.3);
        assert_eq!(clamp_norm(1.5f64), 1.0);
        assert_eq!(clamp_norm(-7.0f64), -1.0);
        assert_eq!(clamp_norm(f64::INFINITY), 1.0);
        assert_eq!(clamp_norm(f64::NEG_INFINITY), -1.0);
        assert_eq!(clamp_norm(f64::NAN), 0.0);

        // Clamping is idempotent
        for v in [-3.0f64, -1.0, -0.25, 0.0, 0.9, 1.0, 42.0].iter() {
            let once = clamp_norm(*v);
            assert!(once >= -1.0 && once <= 1.0);
            assert_eq!(clamp_norm(once), once);
        }
    }

    #[test]
    fn test_deadband_then_clamp() {
        assert_eq!(clamp_norm(apply_deadband(0.05f64, 0.1)), 0.0);
        assert_eq!(clamp_norm(apply_deadband(-0.1f64, 0.1)), 0.0);
        assert_eq!(clamp_norm(apply_deadband(1.5f64, 0.1)), 1.0);
        assert_eq!(clamp_norm(apply_deadband(-0.4f64, 0.1)), -0.4);
    }

    #[test]
    fn test_wrap_half_rotation() {
        assert_eq!(wrap_half_rotation(0.25f64), 0.25);
        assert_eq!(wrap_half_rotation(0.5f64), 0.5);
        assert_eq!(wrap_half_rotation(0.75f64), -0.25);
        assert_eq!(wrap_half_rotation(-0.5f64), 0.5);
        assert_eq!(wrap_half_rotation(-0.25f64), -0.25);
    }

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 10f64), (0f64, 1f64), 5f64), 0.5);
        assert_eq!(lin_map((-1f64, 1f64), (0f64, 100f64), 0f64), 50f64);
    }
}
