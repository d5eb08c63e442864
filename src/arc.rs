//! Elliptical arcs.
//!
//! There are two ways to turn an SVG arc into straight segments:
//!
//! * [`arc_to_cubics`] approximates the arc with cubic Béziers, which can then be
//!   flattened like any other curve.  This is what path normalization does.
//!
//! * [`sample_arc`] computes points directly on the ellipse, with a point count chosen
//!   from the tolerance.  This is used when arcs are kept as arcs until the very end,
//!   after they have been mapped into their final coordinate space with
//!   [`EllipticalArc::transformed`].

use std::f64::consts::PI;

use tinyvec::ArrayVec;

use crate::bezier::CubicBezierCurve;
use crate::error::FlattenError;
use crate::transform::Transform;

/// Whether an arc's sweep should be >= 180 degrees, or smaller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LargeArc(pub bool);

/// Angular direction in which an arc is drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sweep {
    Negative,
    Positive,
}

impl Sweep {
    /// Maps the SVG `sweep-flag`, where 1 is the positive-angle direction.
    pub fn from_flag(flag: bool) -> Sweep {
        if flag {
            Sweep::Positive
        } else {
            Sweep::Negative
        }
    }

    pub fn is_positive(self) -> bool {
        self == Sweep::Positive
    }

    fn reversed(self) -> Sweep {
        match self {
            Sweep::Negative => Sweep::Positive,
            Sweep::Positive => Sweep::Negative,
        }
    }
}

/// Largest angle spanned by a single cubic in [`arc_to_cubics`].
const MAX_PIECE_ANGLE: f64 = PI * 120.0 / 180.0;

/// Upper bound on the number of cubics for one arc.
///
/// A span is always less than 360°, so three 120° pieces are enough; the extra slot
/// only matters if rounding pushes a span over a piece boundary.
const MAX_ARC_PIECES: usize = 4;

/// Upper bound on the number of points that [`sample_arc`] emits for one arc.
const MAX_ARC_SAMPLES: usize = 1 << 16;

/// Below this, the center computation's radicand is taken to be zero.
const RADICAND_SNAP: f64 = 1e-4;

/// Conversion from endpoint parameterization to center parameterization.
///
/// SVG path data specifies elliptical arcs in terms of their endpoints, but
/// they are easier to process if they are converted to a center parameterization.
///
/// When attempting to compute the center parameterization of the arc,
/// out of range parameters may see an arc omitted or treated as a line.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ArcParameterization {
    /// Center parameterization of the arc.
    CenterParameters {
        /// Center of the ellipse.
        center: (f64, f64),
        /// Radii of the ellipse (corrected).
        radii: (f64, f64),
        /// Angle of the start point.
        theta1: f64,
        /// Delta angle to the end point.
        delta_theta: f64,
    },
    /// Treat the arc as a line to the end point.
    LineTo,
    /// Omit the arc.
    Omit,
}

/// "a" command for paths; describes an elliptical arc in terms of its endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalArc {
    /// The (x-axis, y-axis) radii for the ellipse.
    pub r: (f64, f64),
    /// The rotation angle in degrees for the ellipse's x-axis
    /// relative to the x-axis of the user coordinate system.
    pub x_axis_rotation: f64,
    /// Flag indicating whether the arc sweep should be
    /// greater than or equal to 180 degrees, or smaller than 180 degrees.
    pub large_arc: LargeArc,
    /// Flag indicating the angular direction in which the arc is drawn.
    pub sweep: Sweep,
    /// The (x, y) coordinates for the start point of this path segment.
    pub from: (f64, f64),
    /// The (x, y) coordinates for the end point of this path segment.
    pub to: (f64, f64),
}

fn is_zero_radius(r: f64) -> bool {
    // Same test as for the divisions by the squared radii further down.
    r * r < f64::EPSILON
}

impl EllipticalArc {
    /// Whether either radius is too small to divide by.
    pub fn has_zero_radius(&self) -> bool {
        is_zero_radius(self.r.0) || is_zero_radius(self.r.1)
    }

    /// Calculates a center parameterization from the endpoint parameterization.
    ///
    /// Radii may be adjusted if there is no solution.
    ///
    /// See section [B.2.4. Conversion from endpoint to center
    /// parameterization](https://www.w3.org/TR/SVG2/implnote.html#ArcConversionEndpointToCenter)
    pub fn center_parameterization(&self) -> Result<ArcParameterization, FlattenError> {
        let Self {
            r: (rx, ry),
            x_axis_rotation,
            large_arc,
            sweep,
            from: (x1, y1),
            to: (x2, y2),
        } = *self;

        // A zero radius means the arc is treated as a line segment joining the end points.
        if self.has_zero_radius() {
            return Ok(ArcParameterization::LineTo);
        }

        let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();

        let mut rx = rx.abs();
        let mut ry = ry.abs();

        // Translate the origin to the midpoint of the chord and rotate the axes to
        // line up with the ellipse's; primed values are in that frame.
        let mid_x = (x1 - x2) / 2.0;
        let mid_y = (y1 - y2) / 2.0;
        let x1_ = cos_phi * mid_x + sin_phi * mid_y;
        let y1_ = -sin_phi * mid_x + cos_phi * mid_y;

        if x1_ == 0.0 && y1_ == 0.0 {
            return Ok(ArcParameterization::Omit);
        }

        // Ensure radii are large enough.
        let lambda = (x1_ / rx).powi(2) + (y1_ / ry).powi(2);
        if lambda > 1.0 {
            // If not, scale up the ellipse uniformly
            // until there is exactly one solution.
            rx *= lambda.sqrt();
            ry *= lambda.sqrt();
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let x1_2 = x1_ * x1_;
        let y1_2 = y1_ * y1_;

        let mut radicand = (rx2 * ry2 - rx2 * y1_2 - ry2 * x1_2) / (rx2 * y1_2 + ry2 * x1_2);
        if radicand.abs() < RADICAND_SNAP {
            radicand = 0.0;
        }

        // Negated so that NaN is caught too.
        if !(radicand >= 0.0) {
            return Err(FlattenError::MalformedArc {
                from: self.from,
                to: self.to,
                radii: self.r,
                x_axis_rotation,
                radicand,
            });
        }

        let k = if large_arc.0 == sweep.is_positive() {
            -radicand.sqrt()
        } else {
            radicand.sqrt()
        };

        // Compute the transformed center (cx', cy').
        let cx_ = k * rx * y1_ / ry;
        let cy_ = -k * ry * x1_ / rx;

        // Compute the center (cx, cy).
        let cx = cos_phi * cx_ - sin_phi * cy_ + (x1 + x2) / 2.0;
        let cy = sin_phi * cx_ + cos_phi * cy_ + (y1 + y2) / 2.0;

        let (ux, uy) = ((x1_ - cx_) / rx, (y1_ - cy_) / ry);
        let (vx, vy) = ((-x1_ - cx_) / rx, (-y1_ - cy_) / ry);

        let theta1 = uy.atan2(ux);

        let delta_theta = {
            let mut delta_theta = (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
            if sweep.is_positive() && delta_theta < 0.0 {
                delta_theta += PI * 2.0;
            } else if !sweep.is_positive() && delta_theta > 0.0 {
                delta_theta -= PI * 2.0;
            }
            delta_theta
        };

        Ok(ArcParameterization::CenterParameters {
            center: (cx, cy),
            radii: (rx, ry),
            theta1,
            delta_theta,
        })
    }

    /// Maps the arc into another coordinate space.
    ///
    /// The image of an ellipse under an affine map is another ellipse.  Its radii and
    /// rotation come from the singular value decomposition of `L·R(φ)·diag(rx, ry)`,
    /// where `L` is the linear part of `transform`; a reflection reverses the sweep.
    pub fn transformed(&self, transform: &Transform) -> EllipticalArc {
        let (rx, ry) = (self.r.0.abs(), self.r.1.abs());
        let (s, c) = self.x_axis_rotation.to_radians().sin_cos();

        let m00 = (transform.xx * c + transform.xy * s) * rx;
        let m01 = (transform.xy * c - transform.xx * s) * ry;
        let m10 = (transform.yx * c + transform.yy * s) * rx;
        let m11 = (transform.yy * c - transform.yx * s) * ry;

        // Eigenvalues of the symmetric matrix M·Mᵀ = [a b; b d] are the squared radii.
        let a = m00 * m00 + m01 * m01;
        let b = m00 * m10 + m01 * m11;
        let d = m10 * m10 + m11 * m11;

        let mean = (a + d) / 2.0;
        let dev = (((a - d) / 2.0).powi(2) + b * b).sqrt();

        let new_rx = (mean + dev).sqrt();
        let new_ry = (mean - dev).max(0.0).sqrt();
        let rotation = 0.5 * (2.0 * b).atan2(a - d);

        let sweep = if transform.determinant() < 0.0 {
            self.sweep.reversed()
        } else {
            self.sweep
        };

        EllipticalArc {
            r: (new_rx, new_ry),
            x_axis_rotation: rotation.to_degrees(),
            large_arc: self.large_arc,
            sweep,
            from: transform.transform_point(self.from.0, self.from.1),
            to: transform.transform_point(self.to.0, self.to.1),
        }
    }

    /// Approximates the arc with cubic Béziers; see [`arc_to_cubics`].
    pub fn to_cubics(&self) -> Vec<CubicBezierCurve> {
        arc_to_cubics(
            self.from,
            self.to,
            self.r,
            self.x_axis_rotation,
            self.large_arc,
            self.sweep,
        )
    }

    /// Samples points on the arc; see [`sample_arc`].
    pub fn sample(&self, max_error: f64) -> Result<Vec<(f64, f64)>, FlattenError> {
        let (rx, ry, cx, cy, theta1, delta_theta) = match self.center_parameterization()? {
            ArcParameterization::CenterParameters {
                center: (cx, cy),
                radii: (rx, ry),
                theta1,
                delta_theta,
            } => (rx, ry, cx, cy, theta1, delta_theta),

            ArcParameterization::LineTo => return Ok(vec![self.to]),

            ArcParameterization::Omit => return Ok(Vec::new()),
        };

        // Step count from the corrected x radius. Arcs that went through
        // `transformed` have rx as their larger radius.
        let step = (1.0 - max_error / rx).clamp(-1.0, 1.0).acos();
        let n = (delta_theta.abs() / step).ceil();
        let n = if n.is_nan() {
            1
        } else {
            (n.min(MAX_ARC_SAMPLES as f64) as usize).max(1)
        };

        let (sin_phi, cos_phi) = self.x_axis_rotation.to_radians().sin_cos();

        let mut points = Vec::with_capacity(n);
        for i in 1..n {
            let theta = theta1 + delta_theta * (i as f64) / (n as f64);
            let (sin_t, cos_t) = theta.sin_cos();

            points.push((
                cos_phi * rx * cos_t - sin_phi * ry * sin_t + cx,
                sin_phi * rx * cos_t + cos_phi * ry * sin_t + cy,
            ));
        }
        points.push(self.to);

        Ok(points)
    }
}

fn rotate((x, y): (f64, f64), sin: f64, cos: f64) -> (f64, f64) {
    (x * cos - y * sin, x * sin + y * cos)
}

/// Rounds to 9 decimals, so that values a hair outside [-1, 1] land on the boundary.
fn round_9(v: f64) -> f64 {
    (v * 1e9).round() / 1e9
}

/// Angle of a point on an axis-aligned ellipse, in [0, 2π).
fn angle_on_ellipse(x: f64, y: f64, cx: f64, cy: f64, ry: f64) -> f64 {
    let mut f = round_9((y - cy) / ry).clamp(-1.0, 1.0).asin();

    if x < cx {
        f = PI - f;
    }

    if f < 0.0 {
        f += PI * 2.0;
    }

    f
}

/// Cuts the angle span from `f1` to `f2` into consecutive pieces of at most 120°.
pub fn split_span(f1: f64, f2: f64) -> ArrayVec<[(f64, f64); MAX_ARC_PIECES]> {
    let direction = if f2 >= f1 { 1.0 } else { -1.0 };

    let mut pieces = ArrayVec::new();
    let mut start = f1;

    while pieces.len() < MAX_ARC_PIECES - 1 && (f2 - start).abs() > MAX_PIECE_ANGLE {
        let end = start + MAX_PIECE_ANGLE * direction;
        pieces.push((start, end));
        start = end;
    }

    pieces.push((start, f2));
    pieces
}

/// One cubic for an arc piece of at most 120°, in the ellipse's own axis-aligned frame.
fn arc_piece(
    from: (f64, f64),
    to: (f64, f64),
    (rx, ry): (f64, f64),
    f1: f64,
    f2: f64,
) -> CubicBezierCurve {
    let t = ((f2 - f1) / 4.0).tan();
    let hx = 4.0 / 3.0 * rx * t;
    let hy = 4.0 / 3.0 * ry * t;

    let (s1, c1) = f1.sin_cos();
    let (s2, c2) = f2.sin_cos();

    CubicBezierCurve {
        from,
        pt1: (from.0 - hx * s1, from.1 + hy * c1),
        pt2: (to.0 + hx * s2, to.1 - hy * c2),
        to,
    }
}

/// Approximates an elliptical arc with cubic Béziers.
///
/// The arc goes from `from` to `to` on an ellipse with the given radii, whose x axis is
/// rotated by `x_axis_rotation` degrees.  Radii that are too small to reach from one
/// endpoint to the other are scaled up uniformly.  Each cubic covers at most 120° of
/// the ellipse.
///
/// The first curve starts exactly at `from`, and the last one ends exactly at `to`.
///
/// The radii must be non-zero and the endpoints distinct; path normalization checks for
/// both before calling this.
pub fn arc_to_cubics(
    from: (f64, f64),
    to: (f64, f64),
    radii: (f64, f64),
    x_axis_rotation: f64,
    large_arc: LargeArc,
    sweep: Sweep,
) -> Vec<CubicBezierCurve> {
    let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();

    // Work in a frame where the ellipse is axis-aligned.
    let (x1, y1) = rotate(from, -sin_phi, cos_phi);
    let (x2, y2) = rotate(to, -sin_phi, cos_phi);

    let mut rx = radii.0.abs();
    let mut ry = radii.1.abs();

    let x = (x1 - x2) / 2.0;
    let y = (y1 - y2) / 2.0;

    let h = (x * x) / (rx * rx) + (y * y) / (ry * ry);
    if h > 1.0 {
        let h = h.sqrt();
        rx *= h;
        ry *= h;
    }

    let sign = if large_arc.0 == sweep.is_positive() {
        -1.0
    } else {
        1.0
    };

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let left = rx2 * ry2 - rx2 * y * y - ry2 * x * x;
    let right = rx2 * y * y + ry2 * x * x;
    let k = sign * (left / right).abs().sqrt();

    let cx = k * rx * y / ry + (x1 + x2) / 2.0;
    let cy = k * -ry * x / rx + (y1 + y2) / 2.0;

    let mut f1 = angle_on_ellipse(x1, y1, cx, cy, ry);
    let mut f2 = angle_on_ellipse(x2, y2, cx, cy, ry);

    if sweep.is_positive() && f1 > f2 {
        f1 -= PI * 2.0;
    }
    if !sweep.is_positive() && f2 > f1 {
        f2 -= PI * 2.0;
    }

    let pieces = split_span(f1, f2);
    let last = pieces.len() - 1;

    let mut curves = Vec::with_capacity(pieces.len());
    let mut start = (x1, y1);

    for (i, &(fa, fb)) in pieces.iter().enumerate() {
        let end = if i == last {
            (x2, y2)
        } else {
            (cx + rx * fb.cos(), cy + ry * fb.sin())
        };

        let piece = arc_piece(start, end, (rx, ry), fa, fb);

        curves.push(CubicBezierCurve {
            from: rotate(piece.from, sin_phi, cos_phi),
            pt1: rotate(piece.pt1, sin_phi, cos_phi),
            pt2: rotate(piece.pt2, sin_phi, cos_phi),
            to: rotate(piece.to, sin_phi, cos_phi),
        });

        start = end;
    }

    // Rotating back and forth is not exact; make the ends match the input.
    if let Some(first) = curves.first_mut() {
        first.from = from;
    }
    if let Some(last) = curves.last_mut() {
        last.to = to;
    }

    curves
}

/// Flattens an elliptical arc by sampling points on it.
///
/// Returns the points after `from`, ending exactly at `to`.  The number of points is
/// chosen so that no chord deviates from the arc by more than about `max_error`.
///
/// An arc with a zero radius yields just `to`, and one whose endpoints coincide yields
/// nothing.  Parameters for which no center can be computed, such as NaN or infinite
/// values, are an error.
#[allow(clippy::too_many_arguments)]
pub fn sample_arc(
    from: (f64, f64),
    radii: (f64, f64),
    x_axis_rotation: f64,
    large_arc: LargeArc,
    sweep: Sweep,
    to: (f64, f64),
    max_error: f64,
) -> Result<Vec<(f64, f64)>, FlattenError> {
    EllipticalArc {
        r: radii,
        x_axis_rotation,
        large_arc,
        sweep,
        from,
        to,
    }
    .sample(max_error)
}
