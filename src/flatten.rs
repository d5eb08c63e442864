//! Turning normalized path data into polylines.
//!
//! This is the last step of the pipeline: it takes path data that has gone through
//! [`crate::normalize`], maps it into the output coordinate space with a [`Transform`],
//! and approximates every curve with straight segments.

use serde::{Serialize, Serializer};

use crate::arc::{EllipticalArc, LargeArc, Sweep};
use crate::bezier::{self, CubicBezierCurve, DEFAULT_MAX_DEPTH};
use crate::error::FlattenError;
use crate::float_eq::points_approx_eq;
use crate::normalize::{normalize_with, ArcFlattening};
use crate::path_data::{CommandKind, PathData, PathSegment};
use crate::transform::Transform;

/// Default for [`FlattenOptions::with_max_error`].
pub const DEFAULT_MAX_ERROR: f64 = 0.1;

/// Options for flattening.
///
/// ```
/// use svgflat::{ArcFlattening, FlattenOptions};
///
/// let options = FlattenOptions::default()
///     .with_max_error(0.01)
///     .with_arc_flattening(ArcFlattening::Sample);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlattenOptions {
    max_error: f64,
    max_depth: u32,
    arc_flattening: ArcFlattening,
}

impl Default for FlattenOptions {
    fn default() -> FlattenOptions {
        FlattenOptions {
            max_error: DEFAULT_MAX_ERROR,
            max_depth: DEFAULT_MAX_DEPTH,
            arc_flattening: ArcFlattening::default(),
        }
    }
}

impl FlattenOptions {
    /// Maximum distance between a curve and the segments that replace it.
    ///
    /// This is in output units, i.e. after the transform has been applied.
    #[must_use]
    pub fn with_max_error(mut self, max_error: f64) -> FlattenOptions {
        self.max_error = max_error;
        self
    }

    /// Bounds the subdivision of each cubic curve.
    ///
    /// A curve is never split into pieces that span less than `1 / max_depth` of its
    /// parameter range, even if that means exceeding the maximum error.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> FlattenOptions {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_arc_flattening(mut self, arc_flattening: ArcFlattening) -> FlattenOptions {
        self.arc_flattening = arc_flattening;
        self
    }

    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn arc_flattening(&self) -> ArcFlattening {
        self.arc_flattening
    }

    /// Checks that the options are usable.
    pub fn validate(&self) -> Result<(), FlattenError> {
        if !(self.max_error.is_finite() && self.max_error > 0.0) {
            return Err(FlattenError::InvalidOption(format!(
                "max_error must be a positive number, not {}",
                self.max_error
            )));
        }

        if self.max_depth == 0 {
            return Err(FlattenError::InvalidOption(
                "max_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Name/value pairs carried from a drawable to its polylines.
///
/// These are never interpreted; they are for callers who need to know which element
/// (stroke color, id, and so on) a polyline came from.  They serialize as a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Attributes {
        Attributes::default()
    }

    /// Appends an attribute; names are not deduplicated.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Value of the first attribute called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Attributes(
            iter.into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// A sequence of points joined by straight segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Polyline {
    /// Points in the output coordinate space.
    pub points: Vec<(f64, f64)>,

    /// Whether the subpath was closed with a closepath command.  When it is, the last
    /// point is the same as the first.
    pub closed: bool,

    /// Attributes of the drawable this came from.
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Polyline {
    fn starting_at(point: (f64, f64)) -> Polyline {
        Polyline {
            points: vec![point],
            ..Polyline::default()
        }
    }
}

/// Geometry to flatten, with its transform and pass-through attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drawable {
    /// Path data in any form; it is normalized before flattening.
    pub path: PathData,
    /// Maps the path's coordinates to output coordinates.
    pub transform: Transform,
    pub attributes: Attributes,
}

impl Drawable {
    pub fn new(path: PathData) -> Drawable {
        Drawable {
            path,
            ..Drawable::default()
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Drawable {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Drawable {
        self.attributes = attributes;
        self
    }
}

struct Flattener<'a> {
    transform: &'a Transform,
    options: &'a FlattenOptions,

    polylines: Vec<Polyline>,

    /// Whether the last polyline takes more points; false after a closepath.
    open: bool,

    /// Current point, in path coordinates and in output coordinates.
    cursor: (f64, f64),
    current: (f64, f64),

    /// Start of the subpath, in path coordinates and in output coordinates.
    subpath_start: (f64, f64),
    start: (f64, f64),
}

impl<'a> Flattener<'a> {
    fn new(transform: &'a Transform, options: &'a FlattenOptions) -> Flattener<'a> {
        Flattener {
            transform,
            options,
            polylines: Vec::new(),
            open: false,
            cursor: (0.0, 0.0),
            current: (0.0, 0.0),
            subpath_start: (0.0, 0.0),
            start: (0.0, 0.0),
        }
    }

    fn xf(&self, (x, y): (f64, f64)) -> (f64, f64) {
        self.transform.transform_point(x, y)
    }

    fn move_to(&mut self, to: (f64, f64)) {
        self.cursor = to;
        self.subpath_start = to;
        self.current = self.xf(to);
        self.start = self.current;

        self.polylines.push(Polyline::starting_at(self.current));
        self.open = true;
    }

    /// Returns the polyline that drawing commands add to, opening a new one at the
    /// current point after a closepath.
    fn open_polyline(&mut self) -> &mut Polyline {
        if !self.open || self.polylines.is_empty() {
            self.polylines.push(Polyline::starting_at(self.current));
            self.open = true;
        }

        let last = self.polylines.len() - 1;
        &mut self.polylines[last]
    }

    fn line_to(&mut self, to: (f64, f64)) {
        let point = self.xf(to);
        self.open_polyline().points.push(point);

        self.cursor = to;
        self.current = point;
    }

    fn curve_to(&mut self, pt1: (f64, f64), pt2: (f64, f64), to: (f64, f64)) {
        let curve = CubicBezierCurve::new(self.current, self.xf(pt1), self.xf(pt2), self.xf(to));
        let parts = bezier::flatten(&curve, self.options.max_error, self.options.max_depth);

        self.open_polyline()
            .points
            .extend(parts.iter().map(|part| part.to));

        self.cursor = to;
        self.current = curve.to;
    }

    fn arc_to(&mut self, arc: EllipticalArc) -> Result<(), FlattenError> {
        let to = arc.to;
        let arc = arc.transformed(self.transform);

        if arc.has_zero_radius() {
            flat_log!(
                "arc from {:?} to {:?} is degenerate after transformation; drawing it as a line",
                arc.from,
                arc.to
            );
        }

        let points = arc.sample(self.options.max_error)?;
        self.open_polyline().points.extend(points);

        self.cursor = to;
        self.current = arc.to;

        Ok(())
    }

    fn close_path(&mut self) {
        if self.open {
            let start = self.start;
            let polyline = self.open_polyline();

            if polyline.points.last().map_or(true, |&p| !points_approx_eq(p, start)) {
                polyline.points.push(start);
            }

            polyline.closed = true;
            self.open = false;
        }

        self.cursor = self.subpath_start;
        self.current = self.start;
    }

    fn segment(&mut self, index: usize, segment: &PathSegment) -> Result<(), FlattenError> {
        let unexpected = || FlattenError::UnexpectedCommand {
            index,
            kind: segment.kind(),
            position: segment.position(),
        };

        if !segment.is_absolute() {
            return Err(unexpected());
        }

        match segment.kind() {
            CommandKind::MoveTo => {
                let [x, y] = segment.operands::<2>();
                self.move_to((x, y));
            }

            CommandKind::LineTo => {
                let [x, y] = segment.operands::<2>();
                self.line_to((x, y));
            }

            CommandKind::CurveTo => {
                let [x1, y1, x2, y2, x, y] = segment.operands::<6>();
                self.curve_to((x1, y1), (x2, y2), (x, y));
            }

            CommandKind::Arc if self.options.arc_flattening == ArcFlattening::Sample => {
                let [rx, ry, x_axis_rotation, large_arc, sweep, x, y] = segment.operands::<7>();

                self.arc_to(EllipticalArc {
                    r: (rx, ry),
                    x_axis_rotation,
                    large_arc: LargeArc(large_arc != 0.0),
                    sweep: Sweep::from_flag(sweep != 0.0),
                    from: self.cursor,
                    to: (x, y),
                })?;
            }

            CommandKind::ClosePath => self.close_path(),

            _ => return Err(unexpected()),
        }

        Ok(())
    }
}

/// Flattens normalized path data into polylines in output coordinates.
///
/// `path` must only contain absolute moveto, lineto, curveto and closepath segments, as
/// produced by [`crate::normalize()`]; arc segments are also accepted when `options` ask
/// for arcs to be sampled.  Anything else is an [`FlattenError::UnexpectedCommand`].
///
/// Every moveto starts a new polyline.  A closepath adds the subpath's start point
/// (unless the polyline already ends there) and marks the polyline as closed; drawing
/// after it without a moveto starts a new polyline at the subpath's start.
///
/// Path data that does not start with a moveto produces no polylines.
pub fn flatten_path(
    path: &PathData,
    transform: &Transform,
    options: &FlattenOptions,
) -> Result<Vec<Polyline>, FlattenError> {
    options.validate()?;

    match path.segments().first() {
        None => return Ok(Vec::new()),

        Some(first) if first.kind() != CommandKind::MoveTo => {
            flat_log!(
                "skipping path data that starts with {} instead of a moveto",
                first.letter()
            );
            return Ok(Vec::new());
        }

        Some(_) => (),
    }

    let mut flattener = Flattener::new(transform, options);

    for (index, segment) in path.iter().enumerate() {
        flattener.segment(index, segment)?;
    }

    Ok(flattener.polylines)
}

/// Normalizes and flattens a drawable.
///
/// The resulting polylines carry a copy of the drawable's attributes.
pub fn flatten_drawable(
    drawable: &Drawable,
    options: &FlattenOptions,
) -> Result<Vec<Polyline>, FlattenError> {
    let normalized = normalize_with(&drawable.path, options.arc_flattening);

    let mut polylines = flatten_path(&normalized, &drawable.transform, options)?;

    if !drawable.attributes.is_empty() {
        for polyline in &mut polylines {
            polyline.attributes = drawable.attributes.clone();
        }
    }

    Ok(polylines)
}
