//! Rewriting of path data into a minimal, absolute command set.
//!
//! Flattening only needs to deal with four kinds of commands: moveto, lineto, cubic
//! curveto and closepath, all with absolute coordinates.  This module gets arbitrary
//! path data into that form in two steps:
//!
//! * [`absolutize`] turns relative coordinates into absolute ones.
//!
//! * [`reduce`] turns horizontal and vertical lines into plain lines, and shorthand,
//!   quadratic and arc commands into cubic curves.
//!
//! [`normalize`] does both.

use tinyvec::ArrayVec;

use crate::arc::{EllipticalArc, LargeArc, Sweep};
use crate::bezier::CubicBezierCurve;
use crate::path_data::{CommandKind, PathBuilder, PathData, PathSegment, Position};

/// What [`reduce_with`] does with elliptical arcs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ArcFlattening {
    /// Convert arcs to cubic Béziers, which are later flattened like any other curve.
    #[default]
    Cubic,
    /// Keep arcs as absolute arc segments, to be sampled after transformation.
    Sample,
}

/// Current point and start of the current subpath while walking a path.
#[derive(Debug, Default, Copy, Clone)]
struct Pen {
    current: (f64, f64),
    subpath_start: (f64, f64),
}

impl Pen {
    /// Returns an absolute version of `segment`, relative to the current point.
    fn to_absolute(self, segment: &PathSegment) -> PathSegment {
        if segment.is_absolute() {
            return segment.clone();
        }

        let (cx, cy) = self.current;
        let v = segment.values();
        let mut values = ArrayVec::<[f64; 7]>::new();

        match segment.kind() {
            CommandKind::ClosePath => (),

            CommandKind::HorizontalLineTo => values.push(v[0] + cx),

            CommandKind::VerticalLineTo => values.push(v[0] + cy),

            // Only the endpoint of an arc is a coordinate.
            CommandKind::Arc => {
                values.extend_from_slice(&v[..5]);
                values.push(v[5] + cx);
                values.push(v[6] + cy);
            }

            _ => {
                for (i, &n) in v.iter().enumerate() {
                    values.push(if i % 2 == 0 { n + cx } else { n + cy });
                }
            }
        }

        PathSegment::from_parts(segment.kind(), Position::Absolute, &values)
    }

    /// Moves the pen to the end of an absolute segment.
    fn advance(&mut self, segment: &PathSegment) {
        let v = segment.values();

        match segment.kind() {
            CommandKind::MoveTo => {
                self.current = (v[0], v[1]);
                self.subpath_start = self.current;
            }

            CommandKind::ClosePath => self.current = self.subpath_start,

            CommandKind::HorizontalLineTo => self.current.0 = v[0],

            CommandKind::VerticalLineTo => self.current.1 = v[0],

            _ => self.current = (v[v.len() - 2], v[v.len() - 1]),
        }
    }
}

/// Rewrites every relative segment as an absolute one.
///
/// The number and order of segments does not change.  The current point starts out at
/// (0, 0), so a relative moveto at the start of the path is the same as an absolute one.
pub fn absolutize(path: &PathData) -> PathData {
    let mut pen = Pen::default();

    path.iter()
        .map(|segment| {
            let absolute = pen.to_absolute(segment);
            pen.advance(&absolute);
            absolute
        })
        .collect()
}

/// Reduces path data to moveto, lineto, cubic curveto and closepath segments.
///
/// The input should be absolute, but relative segments are absolutized on the way, so
/// the output is always absolute.  Arcs become cubic curves; see [`reduce_with`] to
/// keep them.
pub fn reduce(path: &PathData) -> PathData {
    reduce_with(path, ArcFlattening::Cubic)
}

/// Like [`reduce`], but lets the caller choose what happens to arcs.
///
/// With [`ArcFlattening::Sample`], arcs that do not degenerate into a line or into
/// nothing are kept as absolute arc segments with non-negative radii.
pub fn reduce_with(path: &PathData, arcs: ArcFlattening) -> PathData {
    let mut reducer = Reducer::new(arcs);

    for segment in path.iter() {
        reducer.push(segment);
    }

    reducer.builder.into_path_data()
}

/// Shorthand for `reduce(&absolutize(path))`.
pub fn normalize(path: &PathData) -> PathData {
    reduce(&absolutize(path))
}

/// Shorthand for `reduce_with(&absolutize(path), arcs)`.
pub fn normalize_with(path: &PathData, arcs: ArcFlattening) -> PathData {
    reduce_with(&absolutize(path), arcs)
}

fn reflect((x, y): (f64, f64), (cx, cy): (f64, f64)) -> (f64, f64) {
    (cx + (cx - x), cy + (cy - y))
}

struct Reducer {
    arcs: ArcFlattening,
    pen: Pen,

    /// Last control point of a cubic or quadratic segment, for reflection by S and T.
    last_control: (f64, f64),

    /// Kind of the previous input segment.
    last_kind: Option<CommandKind>,

    builder: PathBuilder,
}

impl Reducer {
    fn new(arcs: ArcFlattening) -> Reducer {
        Reducer {
            arcs,
            pen: Pen::default(),
            last_control: (0.0, 0.0),
            last_kind: None,
            builder: PathBuilder::default(),
        }
    }

    fn quadratic_to(&mut self, (qx, qy): (f64, f64), (x, y): (f64, f64)) {
        // raise quadratic Bézier to cubic
        let (x0, y0) = self.pen.current;
        let x1 = x0 + 2.0 * (qx - x0) / 3.0;
        let y1 = y0 + 2.0 * (qy - y0) / 3.0;
        let x2 = x + 2.0 * (qx - x) / 3.0;
        let y2 = y + 2.0 * (qy - y) / 3.0;

        self.builder.curve_to(x1, y1, x2, y2, x, y);
        self.last_control = (qx, qy);
    }

    fn arc_to(&mut self, segment: &PathSegment) {
        let [rx, ry, x_axis_rotation, large_arc, sweep, x, y] = segment.operands::<7>();

        let arc = EllipticalArc {
            r: (rx.abs(), ry.abs()),
            x_axis_rotation,
            large_arc: LargeArc(large_arc != 0.0),
            sweep: Sweep::from_flag(sweep != 0.0),
            from: self.pen.current,
            to: (x, y),
        };

        if arc.has_zero_radius() {
            flat_log!(
                "arc from {:?} to {:?} has a zero radius; drawing it as a line",
                arc.from,
                arc.to
            );

            let (x0, y0) = arc.from;
            self.builder.curve_to(x0, y0, x, y, x, y);
            return;
        }

        if arc.from == arc.to {
            return;
        }

        match self.arcs {
            ArcFlattening::Cubic => {
                for curve in arc.to_cubics() {
                    let CubicBezierCurve { pt1, pt2, to, .. } = curve;
                    self.builder.curve_to(pt1.0, pt1.1, pt2.0, pt2.1, to.0, to.1);
                }
            }

            ArcFlattening::Sample => self.builder.push(PathSegment::arc(
                arc.r.0,
                arc.r.1,
                x_axis_rotation,
                arc.large_arc.0,
                arc.sweep.is_positive(),
                x,
                y,
            )),
        }
    }

    fn push(&mut self, segment: &PathSegment) {
        let segment = self.pen.to_absolute(segment);
        let kind = segment.kind();
        let (cx, cy) = self.pen.current;

        match kind {
            CommandKind::MoveTo | CommandKind::LineTo | CommandKind::ClosePath => {
                self.builder.push(segment.clone());
            }

            CommandKind::HorizontalLineTo => {
                let [x] = segment.operands::<1>();
                self.builder.line_to(x, cy);
            }

            CommandKind::VerticalLineTo => {
                let [y] = segment.operands::<1>();
                self.builder.line_to(cx, y);
            }

            CommandKind::CurveTo => {
                let [x1, y1, x2, y2, x, y] = segment.operands::<6>();
                self.builder.curve_to(x1, y1, x2, y2, x, y);
                self.last_control = (x2, y2);
            }

            CommandKind::SmoothCurveTo => {
                let [x2, y2, x, y] = segment.operands::<4>();

                let (x1, y1) = match self.last_kind {
                    Some(CommandKind::CurveTo | CommandKind::SmoothCurveTo) => {
                        reflect(self.last_control, (cx, cy))
                    }
                    _ => (cx, cy),
                };

                self.builder.curve_to(x1, y1, x2, y2, x, y);
                self.last_control = (x2, y2);
            }

            CommandKind::QuadraticCurveTo => {
                let [qx, qy, x, y] = segment.operands::<4>();
                self.quadratic_to((qx, qy), (x, y));
            }

            CommandKind::SmoothQuadraticCurveTo => {
                let [x, y] = segment.operands::<2>();

                let q = match self.last_kind {
                    Some(CommandKind::QuadraticCurveTo | CommandKind::SmoothQuadraticCurveTo) => {
                        reflect(self.last_control, (cx, cy))
                    }
                    _ => (cx, cy),
                };

                self.quadratic_to(q, (x, y));
            }

            CommandKind::Arc => self.arc_to(&segment),
        }

        self.pen.advance(&segment);
        self.last_kind = Some(kind);
    }
}
