//! Cubic Bézier curves and their adaptive flattening into line segments.

use crate::transform::Transform;

/// Default for the `max_depth` argument of [`flatten`].
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// A cubic Bézier segment, including its start point.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CubicBezierCurve {
    /// The (x, y) coordinates of the start point.
    pub from: (f64, f64),
    /// The (x, y) coordinates of the first control point.
    pub pt1: (f64, f64),
    /// The (x, y) coordinates of the second control point.
    pub pt2: (f64, f64),
    /// The (x, y) coordinates of the end point.
    pub to: (f64, f64),
}

fn lerp(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    (u * a.0 + t * b.0, u * a.1 + t * b.1)
}

impl CubicBezierCurve {
    pub fn new(from: (f64, f64), pt1: (f64, f64), pt2: (f64, f64), to: (f64, f64)) -> Self {
        CubicBezierCurve { from, pt1, pt2, to }
    }

    /// Evaluates the curve at parameter `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> (f64, f64) {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;

        (
            b0 * self.from.0 + b1 * self.pt1.0 + b2 * self.pt2.0 + b3 * self.to.0,
            b0 * self.from.1 + b1 * self.pt1.1 + b2 * self.pt2.1 + b3 * self.to.1,
        )
    }

    /// Splits the curve at `t` with de Casteljau's algorithm.
    ///
    /// Returns the left and right parts; they share the point at `t`.
    pub fn subdivide(&self, t: f64) -> (CubicBezierCurve, CubicBezierCurve) {
        let p01 = lerp(self.from, self.pt1, t);
        let p12 = lerp(self.pt1, self.pt2, t);
        let p23 = lerp(self.pt2, self.to, t);

        let p012 = lerp(p01, p12, t);
        let p123 = lerp(p12, p23, t);

        let mid = lerp(p012, p123, t);

        (
            CubicBezierCurve::new(self.from, p01, p012, mid),
            CubicBezierCurve::new(mid, p123, p23, self.to),
        )
    }

    /// Whether the straight line from `from` to `to` stays within `max_error` of the curve.
    ///
    /// This is the flatness criterion from Roger Willcocks, as used by paper.js; it
    /// is conservative, so a curve may be flat enough and still fail the test.
    pub fn is_flat_enough(&self, max_error: f64) -> bool {
        let (x0, y0) = self.from;
        let (x1, y1) = self.pt1;
        let (x2, y2) = self.pt2;
        let (x3, y3) = self.to;

        let ux = 3.0 * x1 - 2.0 * x0 - x3;
        let uy = 3.0 * y1 - 2.0 * y0 - y3;
        let vx = 3.0 * x2 - 2.0 * x3 - x0;
        let vy = 3.0 * y2 - 2.0 * y3 - y0;

        (ux * ux).max(vx * vx) + (uy * uy).max(vy * vy) <= 16.0 * max_error * max_error
    }

    /// Maps all four points through `transform`.
    ///
    /// Affine maps preserve Bézier curves, so this is exact.
    pub fn transform(&self, transform: &Transform) -> CubicBezierCurve {
        let p = |(x, y): (f64, f64)| transform.transform_point(x, y);

        CubicBezierCurve::new(p(self.from), p(self.pt1), p(self.pt2), p(self.to))
    }

    /// Distance between the start and end points.
    pub fn chord_length(&self) -> f64 {
        let dx = self.to.0 - self.from.0;
        let dy = self.to.1 - self.from.1;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Subdivides `curve` into pieces that are each flat enough for `max_error`.
///
/// The pieces are returned in order from the start of the curve to its end, so their
/// `to` points, after the curve's `from`, form a polyline that approximates the curve.
/// Pieces of zero length are dropped.
///
/// Subdivision stops at a parameter span of `1 / max_depth`, flat or not, so at most
/// `max_depth` pieces (rounded up to a power of two) are produced.
pub fn flatten(curve: &CubicBezierCurve, max_error: f64, max_depth: u32) -> Vec<CubicBezierCurve> {
    let min_span = 1.0 / f64::from(max_depth.max(1));

    let mut parts = Vec::new();

    // Right halves wait here while their left siblings are processed, so the
    // stack holds at most one entry per level of subdivision.
    let mut pending = vec![(*curve, 0.0, 1.0)];

    while let Some((piece, t1, t2)) = pending.pop() {
        if t2 - t1 > min_span && !piece.is_flat_enough(max_error) {
            let (left, right) = piece.subdivide(0.5);
            let t_mid = (t1 + t2) / 2.0;

            pending.push((right, t_mid, t2));
            pending.push((left, t1, t_mid));
        } else if piece.chord_length() > 0.0 {
            parts.push(piece);
        }
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_eq::points_approx_eq;

    fn bulge() -> CubicBezierCurve {
        CubicBezierCurve::new((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0))
    }

    fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len2 = dx * dx + dy * dy;
        let t = if len2 == 0.0 {
            0.0
        } else {
            (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
        };
        let (qx, qy) = (a.0 + t * dx, a.1 + t * dy);
        ((p.0 - qx).powi(2) + (p.1 - qy).powi(2)).sqrt()
    }

    #[test]
    fn point_at_ends_and_middle() {
        let c = bulge();
        assert_eq!(c.point_at(0.0), (0.0, 0.0));
        assert_eq!(c.point_at(1.0), (10.0, 0.0));
        assert!(points_approx_eq(c.point_at(0.5), (5.0, 7.5)));
    }

    #[test]
    fn subdivide_shares_the_split_point() {
        let c = bulge();
        let (left, right) = c.subdivide(0.5);

        assert_eq!(left.from, c.from);
        assert_eq!(right.to, c.to);
        assert_eq!(left.to, right.from);
        assert!(points_approx_eq(left.to, c.point_at(0.5)));

        // Each half traces its part of the original curve.
        assert!(points_approx_eq(left.point_at(0.5), c.point_at(0.25)));
        assert!(points_approx_eq(right.point_at(0.5), c.point_at(0.75)));
    }

    #[test]
    fn subdivide_at_other_parameters() {
        let c = bulge();
        let (left, right) = c.subdivide(0.3);
        assert!(points_approx_eq(left.to, c.point_at(0.3)));
        assert!(points_approx_eq(right.point_at(0.5), c.point_at(0.65)));
    }

    #[test]
    fn straight_curve_is_flat() {
        let c = CubicBezierCurve::new((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0));
        assert!(c.is_flat_enough(0.001));
        assert!(!bulge().is_flat_enough(0.1));
        assert!(bulge().is_flat_enough(10.0));
    }

    #[test]
    fn straight_curve_flattens_to_one_piece() {
        let c = CubicBezierCurve::new((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0));
        assert_eq!(flatten(&c, 0.1, DEFAULT_MAX_DEPTH), vec![c]);
    }

    #[test]
    fn zero_length_curve_yields_nothing() {
        let c = CubicBezierCurve::new((1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0));
        assert!(flatten(&c, 0.1, DEFAULT_MAX_DEPTH).is_empty());
    }

    #[test]
    fn pieces_are_chained_in_order() {
        let c = bulge();
        let parts = flatten(&c, 0.1, DEFAULT_MAX_DEPTH);

        assert!(parts.len() > 1);
        assert_eq!(parts[0].from, c.from);
        assert_eq!(parts[parts.len() - 1].to, c.to);

        for pair in parts.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn stays_within_error_bound() {
        let c = bulge();
        let max_error = 0.1;
        let parts = flatten(&c, max_error, DEFAULT_MAX_DEPTH);

        let mut polyline = vec![c.from];
        polyline.extend(parts.iter().map(|p| p.to));

        for i in 0..=1000 {
            let p = c.point_at(f64::from(i) / 1000.0);
            let d = polyline
                .windows(2)
                .map(|s| distance_to_segment(p, s[0], s[1]))
                .fold(f64::INFINITY, f64::min);
            assert!(d <= max_error, "point {:?} is {} away from the polyline", p, d);
        }
    }

    #[test]
    fn depth_limits_number_of_pieces() {
        let c = bulge();

        assert_eq!(flatten(&c, 1e-9, 1).len(), 1);
        assert_eq!(flatten(&c, 1e-9, 4).len(), 4);
        assert_eq!(flatten(&c, 1e-9, DEFAULT_MAX_DEPTH).len(), 32);
    }

    #[test]
    fn transform_maps_all_points() {
        let c = bulge().transform(&Transform::new_translate(1.0, 2.0).pre_scale(2.0, 2.0));
        assert_eq!(
            c,
            CubicBezierCurve::new((1.0, 2.0), (1.0, 22.0), (21.0, 22.0), (21.0, 2.0))
        );
    }
}
