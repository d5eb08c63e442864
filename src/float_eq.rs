//! Utilities to compare floating-point coordinates.

use float_cmp::ApproxEq;

/// Absolute tolerance below which two coordinates are considered the same point.
///
/// Path coordinates come from user input and go through a handful of arithmetic
/// operations (relative offsets, transforms), so exact comparisons are too strict,
/// but anything visible at plotter resolution must still count as a difference.
const GEOM_EPSILON: f64 = 1e-9;

/// Maximum distance in units-in-the-last-place for values too large for `GEOM_EPSILON`.
const GEOM_ULPS: i64 = 4;

/// Checks whether two floating-point numbers are approximately equal as coordinates.
///
/// Two numbers are "close enough to equal" if their absolute difference is below
/// `GEOM_EPSILON`, or, for very large magnitudes where that is smaller than the
/// spacing between doubles, if they are at most `GEOM_ULPS` ULPs apart.
pub trait ApproxEqGeom: ApproxEq {
    fn approx_eq_geom(self, other: Self) -> bool;
}

impl ApproxEqGeom for f64 {
    fn approx_eq_geom(self, other: f64) -> bool {
        self.approx_eq(other, (GEOM_EPSILON, GEOM_ULPS))
    }
}

/// Whether two points coincide, per [`ApproxEqGeom`] on each axis.
pub fn points_approx_eq(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0.approx_eq_geom(b.0) && a.1.approx_eq_geom(b.1)
}

// Macro for usage in unit tests
#[doc(hidden)]
#[macro_export]
macro_rules! assert_approx_eq_geom {
    ($left:expr, $right:expr) => {{
        match ($left, $right) {
            (l, r) => {
                if !$crate::float_eq::ApproxEqGeom::approx_eq_geom(l, r) {
                    panic!(
                        r#"assertion failed: `(left ≈ right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        l, r
                    )
                }
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_approx_equal() {
        assert!(0.0_f64.approx_eq_geom(1e-10));
        assert!(0.0_f64.approx_eq_geom(-1e-10));
        assert!(!0.0_f64.approx_eq_geom(1e-6));
        assert!(10.0_f64.approx_eq_geom(10.0 + 5e-10));
        assert!(!10.0_f64.approx_eq_geom(10.001));

        // 2^53 and the next two doubles above it; the epsilon is useless at
        // this magnitude, so the ULP distance decides.
        assert!(9_007_199_254_740_992.0.approx_eq_geom(9_007_199_254_740_994.0));
        assert!(!9_007_199_254_740_992.0.approx_eq_geom(9_007_199_254_741_008.0));
    }

    #[test]
    fn points() {
        assert!(points_approx_eq((1.0, 2.0), (1.0 + 1e-12, 2.0 - 1e-12)));
        assert!(!points_approx_eq((1.0, 2.0), (1.0, 2.5)));
    }

    #[test]
    fn assert_approx_eq_geom_should_not_panic() {
        assert_approx_eq_geom!(42_f64, 42_f64);
    }

    #[test]
    #[should_panic]
    fn assert_approx_eq_geom_should_panic() {
        assert_approx_eq_geom!(3_f64, 42_f64);
    }
}
