//! # Exponential Soft Clipper
//!
//! The repeats of the echo are pushed through a saturating curve before
//! they are filtered and fed back, which is what gives worn tape its
//! thick, compressed echoes. The dry signal is never shaped.
//!
//! ## The Transfer Curve
//!
//! For a curvature constant `a > 1`:
//!
//! ```text
//! x > 0:  y = a/(a-1) * (1 - a^(-x))
//! x ≤ 0:  y = a/(a-1) * (a^x - 1)
//! ```
//!
//! Both halves meet at `y = 0` for `x = 0` and flatten out towards
//! `±a/(a-1)`. Near zero the slope is `a/(a-1) * ln(a)`, so a large
//! curvature also means a lot of gain for quiet repeats: with `a = 10000`
//! small signals are boosted roughly 9×, while anything loud lands close
//! to the ceiling of `1.0001`.
//!
//! ```text
//!   y
//!  1.0 ┤            ╭──────────────
//!      │          ╭─╯
//!    0 ┼────────╭─╯────────────── x
//!      │      ╭─╯
//! -1.0 ┤──────╯
//! ```

/// Curvature used on the repeats. Large on purpose: the echoes are meant
/// to be heavily saturated.
pub const REPEAT_CURVATURE: f32 = 10_000.0;

// The curve divides by `a - 1` and only saturates in the right direction
// for `a > 1`.
const _: () = assert!(REPEAT_CURVATURE > 1.0);

/// Shape one sample with the exponential soft clipper.
///
/// `curvature` must be greater than 1.
#[inline]
pub fn soft_clip(x: f32, curvature: f32) -> f32 {
    let ceiling = ceiling(curvature);

    if x > 0.0 {
        ceiling * (1.0 - curvature.powf(-x))
    } else {
        ceiling * (-1.0 + curvature.powf(x))
    }
}

/// The level the curve approaches for very large inputs, `a/(a-1)`.
pub fn ceiling(curvature: f32) -> f32 {
    curvature / (curvature - 1.0)
}

/// Small-signal gain of the curve, i.e. its slope at `x = 0`.
pub fn slope_at_zero(curvature: f32) -> f32 {
    ceiling(curvature) * curvature.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_maps_to_zero() {
        assert_eq!(soft_clip(0.0, REPEAT_CURVATURE), 0.0);
        assert_eq!(soft_clip(-0.0, REPEAT_CURVATURE), 0.0);
        assert_eq!(soft_clip(0.0, 2.0), 0.0);
    }

    /// Both branches agree as x approaches zero from either side.
    #[test]
    fn test_continuous_at_zero() {
        let above = soft_clip(1e-6, REPEAT_CURVATURE);
        let below = soft_clip(-1e-6, REPEAT_CURVATURE);

        assert!(above > 0.0 && below < 0.0);
        assert!(
            (above - below).abs() < 1e-4,
            "Jump at zero: {below} -> {above}"
        );
    }

    /// The curve is point-symmetric: y(-x) = -y(x).
    #[test]
    fn test_odd_symmetry() {
        for x in [0.01, 0.1, 0.3, 1.0, 4.0] {
            let pos = soft_clip(x, REPEAT_CURVATURE);
            let neg = soft_clip(-x, REPEAT_CURVATURE);
            assert!((pos + neg).abs() < 1e-6, "y({x}) = {pos}, y(-{x}) = {neg}");
        }
    }

    /// For a gentle curvature of 2 the curve is easy to check by hand:
    /// y(1) = 2 * (1 - 1/2) = 1.
    #[test]
    fn test_known_values() {
        assert!((soft_clip(1.0, 2.0) - 1.0).abs() < 1e-6);
        assert!((soft_clip(-1.0, 2.0) + 1.0).abs() < 1e-6);
        assert!((soft_clip(2.0, 2.0) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_slope_at_zero_matches_curve() {
        let slope = slope_at_zero(REPEAT_CURVATURE);
        let measured = soft_clip(1e-4, REPEAT_CURVATURE) / 1e-4;

        assert!((slope - 9.2112).abs() < 1e-3, "Unexpected slope {slope}");
        assert!(
            (measured - slope).abs() / slope < 1e-2,
            "Measured slope {measured} vs analytic {slope}"
        );
    }

    proptest! {
        /// Output never leaves the ceiling, and stays strictly inside it
        /// while the exponential is still representable.
        #[test]
        fn bounded_by_ceiling(x in -1.0e4f32..1.0e4f32) {
            let y = soft_clip(x, REPEAT_CURVATURE);
            let limit = ceiling(REPEAT_CURVATURE);

            prop_assert!(y.is_finite());
            prop_assert!(y.abs() <= limit, "|y({})| = {} exceeds {}", x, y.abs(), limit);
            if x.abs() <= 1.0 {
                prop_assert!(y.abs() < limit, "|y({})| = {} reached {}", x, y.abs(), limit);
            }
        }

        /// A larger input never gives a smaller output.
        #[test]
        fn monotonically_increasing(x in -50.0f32..50.0f32, step in 1.0e-3f32..10.0f32) {
            let lower = soft_clip(x, REPEAT_CURVATURE);
            let upper = soft_clip(x + step, REPEAT_CURVATURE);

            prop_assert!(lower <= upper, "y({}) = {} > y({}) = {}", x, lower, x + step, upper);
        }
    }
}
