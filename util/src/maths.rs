//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Normalise an angle into the range `[0, 2*pi)`.
///
/// Accepts any finite input, including negatives and values many revolutions
/// out of range. Generic so that `f64` callers do not lose precision on
/// inputs just below zero.
pub fn mod_2pi<T>(angle_rad: T) -> T
where
    T: Float,
{
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let val = rem_euclid(angle_rad, tau_t);

    // rem_euclid can round up to exactly 2*pi for inputs just below zero,
    // which is outside the codomain.
    if val >= tau_t {
        T::from(0).unwrap()
    } else {
        val
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() {
        r + rhs.abs()
    } else {
        r
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TAU: f64 = std::f64::consts::TAU;
    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_mod_2pi() {
        assert_eq!(mod_2pi(0f64), 0f64);
        assert_eq!(mod_2pi(PI), PI);
        assert_eq!(mod_2pi(TAU), 0f64);
        assert!((mod_2pi(-PI) - PI).abs() < 1e-12);
        assert!((mod_2pi(3.0 * PI) - PI).abs() < 1e-12);
        assert!((mod_2pi(-5.0 * TAU - 1.0) - (TAU - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_mod_2pi_in_codomain() {
        // A sweep of awkward inputs, all must land in [0, 2*pi)
        for x in [
            -1e-20f64,
            -1e-9,
            -0.0,
            1e-20,
            -1234.5678,
            1234.5678,
            f64::MIN_POSITIVE,
        ] {
            let m = mod_2pi(x);
            assert!((0.0..TAU).contains(&m), "mod_2pi({}) = {}", x, m);
        }

        let m = mod_2pi(-1e-7f32);
        assert!((0.0..std::f32::consts::TAU).contains(&m));
    }
}
