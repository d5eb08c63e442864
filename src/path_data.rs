//! Representation of SVG path data as typed segments.
//!
//! The path parser pushes segments into a [`PathBuilder`], which is mutable, temporary
//! storage.  Once finished, the builder is turned into an immutable [`PathData`].
//!
//! The builder keeps up to 32 segments inline in a [`TinyVec`]; most paths in the wild
//! have fewer than that, so building them does not touch the allocator until they are
//! frozen.  Each segment keeps its operands in an [`ArrayVec`] sized for the largest
//! command (an elliptical arc, with 7 operands).

use std::fmt;
use std::slice;

use tinyvec::{ArrayVec, TinyVec};

use crate::path_parser::{self, ParseError};

/// The kind of a path command, independent of whether it is absolute or relative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum CommandKind {
    /// `M x y`
    MoveTo,
    /// `L x y`
    LineTo,
    /// `H x`
    HorizontalLineTo,
    /// `V y`
    VerticalLineTo,
    /// `C x1 y1 x2 y2 x y`
    CurveTo,
    /// `S x2 y2 x y`
    SmoothCurveTo,
    /// `Q x1 y1 x y`
    QuadraticCurveTo,
    /// `T x y`
    SmoothQuadraticCurveTo,
    /// `A rx ry x-axis-rotation large-arc-flag sweep-flag x y`
    Arc,
    /// `Z`
    #[default]
    ClosePath,
}

impl CommandKind {
    /// Number of operands that a command of this kind takes.
    pub fn arity(self) -> usize {
        match self {
            CommandKind::ClosePath => 0,
            CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo => 1,
            CommandKind::MoveTo | CommandKind::LineTo | CommandKind::SmoothQuadraticCurveTo => 2,
            CommandKind::SmoothCurveTo | CommandKind::QuadraticCurveTo => 4,
            CommandKind::CurveTo => 6,
            CommandKind::Arc => 7,
        }
    }

    /// Maps a path-data command letter to its kind and position.
    ///
    /// Upper-case letters are absolute commands, lower-case ones are relative.
    pub fn from_letter(c: u8) -> Option<(CommandKind, Position)> {
        let kind = match c.to_ascii_uppercase() {
            b'M' => CommandKind::MoveTo,
            b'L' => CommandKind::LineTo,
            b'H' => CommandKind::HorizontalLineTo,
            b'V' => CommandKind::VerticalLineTo,
            b'C' => CommandKind::CurveTo,
            b'S' => CommandKind::SmoothCurveTo,
            b'Q' => CommandKind::QuadraticCurveTo,
            b'T' => CommandKind::SmoothQuadraticCurveTo,
            b'A' => CommandKind::Arc,
            b'Z' => CommandKind::ClosePath,
            _ => return None,
        };

        let position = if c.is_ascii_uppercase() {
            Position::Absolute
        } else {
            Position::Relative
        };

        Some((kind, position))
    }

    /// The command letter for this kind, in the case that corresponds to `position`.
    pub fn letter(self, position: Position) -> char {
        let c = match self {
            CommandKind::MoveTo => 'M',
            CommandKind::LineTo => 'L',
            CommandKind::HorizontalLineTo => 'H',
            CommandKind::VerticalLineTo => 'V',
            CommandKind::CurveTo => 'C',
            CommandKind::SmoothCurveTo => 'S',
            CommandKind::QuadraticCurveTo => 'Q',
            CommandKind::SmoothQuadraticCurveTo => 'T',
            CommandKind::Arc => 'A',
            CommandKind::ClosePath => 'Z',
        };

        match position {
            Position::Absolute => c,
            Position::Relative => c.to_ascii_lowercase(),
        }
    }
}

/// Whether a command's coordinates are absolute or relative to the current point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Position {
    #[default]
    Absolute,
    Relative,
}

/// A single path command with its operands.
///
/// The number of operands always matches [`CommandKind::arity`]; for arcs, the
/// large-arc and sweep flags (operands 3 and 4) are always exactly 0.0 or 1.0.
#[derive(Clone, PartialEq, Default)]
pub struct PathSegment {
    kind: CommandKind,
    position: Position,
    values: ArrayVec<[f64; 7]>,
}

// This is just so we can use TinyVec, whose type parameter requires T: Default.
// A default segment is a ClosePath, which has no operands and so is always valid.

impl PathSegment {
    /// Creates a segment, or returns `None` if `values` does not have exactly the
    /// number of operands that `kind` requires, or if an arc flag is not 0 or 1.
    pub fn new(kind: CommandKind, position: Position, values: &[f64]) -> Option<PathSegment> {
        if values.len() != kind.arity() {
            return None;
        }

        if kind == CommandKind::Arc && !(is_flag(values[3]) && is_flag(values[4])) {
            return None;
        }

        Some(PathSegment::from_parts(kind, position, values))
    }

    /// Creates a segment whose operand count is known to be correct.
    pub(crate) fn from_parts(kind: CommandKind, position: Position, values: &[f64]) -> PathSegment {
        debug_assert_eq!(values.len(), kind.arity());

        let mut v = ArrayVec::new();
        v.extend_from_slice(values);

        PathSegment {
            kind,
            position,
            values: v,
        }
    }

    pub fn move_to(x: f64, y: f64) -> PathSegment {
        PathSegment::from_parts(CommandKind::MoveTo, Position::Absolute, &[x, y])
    }

    pub fn line_to(x: f64, y: f64) -> PathSegment {
        PathSegment::from_parts(CommandKind::LineTo, Position::Absolute, &[x, y])
    }

    pub fn horizontal_line_to(x: f64) -> PathSegment {
        PathSegment::from_parts(CommandKind::HorizontalLineTo, Position::Absolute, &[x])
    }

    pub fn vertical_line_to(y: f64) -> PathSegment {
        PathSegment::from_parts(CommandKind::VerticalLineTo, Position::Absolute, &[y])
    }

    pub fn curve_to(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> PathSegment {
        PathSegment::from_parts(
            CommandKind::CurveTo,
            Position::Absolute,
            &[x1, y1, x2, y2, x, y],
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    ) -> PathSegment {
        PathSegment::from_parts(
            CommandKind::Arc,
            Position::Absolute,
            &[
                rx,
                ry,
                x_axis_rotation,
                f64::from(u8::from(large_arc)),
                f64::from(u8::from(sweep)),
                x,
                y,
            ],
        )
    }

    pub fn close_path() -> PathSegment {
        PathSegment::from_parts(CommandKind::ClosePath, Position::Absolute, &[])
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_absolute(&self) -> bool {
        self.position == Position::Absolute
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The command letter, in upper case for absolute segments.
    pub fn letter(&self) -> char {
        self.kind.letter(self.position)
    }

    /// Copies the operands into a fixed-size array.
    ///
    /// Callers match on the kind first, so `N` is always the kind's arity.
    pub(crate) fn operands<const N: usize>(&self) -> [f64; N] {
        let mut out = [0.0; N];
        out.copy_from_slice(&self.values);
        out
    }
}

fn is_flag(v: f64) -> bool {
    v == 0.0 || v == 1.0
}

impl fmt::Debug for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.letter(), self.values.as_slice())
    }
}

/// Constructs path data out of segments.
///
/// Create this with `PathBuilder::default`; you can then push segments to it or call the
/// `parse` method.  When you are finished, turn it into a [`PathData`] with
/// `into_path_data`.
#[derive(Default)]
pub struct PathBuilder {
    segments: TinyVec<[PathSegment; 32]>,
}

impl PathBuilder {
    /// Parses `path_str` and appends its segments.
    ///
    /// On a syntax error, the segments parsed before the offending command are kept
    /// and the error is returned.
    pub fn parse(&mut self, path_str: &str) -> Result<(), ParseError> {
        path_parser::parse_into(self, path_str)
    }

    /// Consumes the builder and returns an immutable [`PathData`].
    pub fn into_path_data(self) -> PathData {
        PathData {
            segments: self.segments.into_iter().collect::<Vec<_>>().into_boxed_slice(),
        }
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.push(PathSegment::move_to(x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.push(PathSegment::line_to(x, y));
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.push(PathSegment::curve_to(x1, y1, x2, y2, x, y));
    }

    pub fn close_path(&mut self) {
        self.push(PathSegment::close_path());
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// An immutable sequence of path segments.
///
/// This struct implements `Default`, and it yields an empty path.
#[derive(Clone, Default, PartialEq)]
pub struct PathData {
    segments: Box<[PathSegment]>,
}

impl PathData {
    /// Parses path data, stopping at the first syntax error.
    ///
    /// See [`crate::parse_path`].
    pub fn parse(path_str: &str) -> PathData {
        path_parser::parse_path(path_str)
    }

    pub fn iter(&self) -> slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether every segment uses absolute coordinates.
    pub fn is_absolute(&self) -> bool {
        self.segments.iter().all(PathSegment::is_absolute)
    }

    /// Whether the path only contains the given kinds of commands.
    pub fn only_contains(&self, kinds: &[CommandKind]) -> bool {
        self.segments.iter().all(|s| kinds.contains(&s.kind))
    }
}

impl fmt::Debug for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.segments.iter()).finish()
    }
}

impl FromIterator<PathSegment> for PathData {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        PathData {
            segments: iter.into_iter().collect::<Vec<_>>().into_boxed_slice(),
        }
    }
}

impl<'a> IntoIterator for &'a PathData {
    type Item = &'a PathSegment;
    type IntoIter = slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
