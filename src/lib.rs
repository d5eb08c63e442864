//! Turn SVG path data into polylines.
//!
//! This crate parses the [path data] mini-language of SVG 1.1 and approximates the
//! resulting shapes with sequences of straight line segments, within a caller-given
//! error bound.  It is meant for tools that can only deal with polygons: plotters,
//! laser cutters, collision meshes and the like.
//!
//! The work happens in a pipeline of independent steps, each of which can be used on
//! its own:
//!
//! 1. [`parse_path`] turns a `d` string into [`PathData`].  Syntax errors never make it
//!    fail; as in browsers, the path is truncated at the first error.
//!
//! 2. [`normalize`] rewrites the path with only four absolute commands: moveto, lineto,
//!    cubic curveto and closepath.  Elliptical arcs are converted to cubic Béziers;
//!    alternatively, [`normalize_with`] can keep them so that they get sampled directly.
//!
//! 3. [`flatten_path`] applies a [`Transform`] and subdivides every curve until it is
//!    within `max_error` of its chord, producing a list of [`Polyline`]s.
//!
//! [`flatten_drawable`] runs steps 2 and 3 on a [`Drawable`], which bundles path data
//! with its transform and with attributes that are passed through to the output.
//! The basic SVG shapes can be turned into path data with [`Shape`].
//!
//! # Example
//!
//! ```
//! use svgflat::{flatten_drawable, parse_path, Drawable, FlattenOptions, Transform};
//!
//! let path = parse_path("M0 0 L10 0 L10 10 Z");
//! let drawable = Drawable::new(path).with_transform(Transform::new_scale(2.0, 2.0));
//!
//! let polylines = flatten_drawable(&drawable, &FlattenOptions::default()).unwrap();
//!
//! assert_eq!(polylines.len(), 1);
//! assert_eq!(
//!     polylines[0].points,
//!     vec![(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 0.0)]
//! );
//! assert!(polylines[0].closed);
//! ```
//!
//! # Logging
//!
//! Set the `SVGFLAT_LOG` environment variable to get messages on stdout about paths
//! that were truncated or skipped and about degenerate arcs.
//!
//! [path data]: https://www.w3.org/TR/SVG11/paths.html#PathData

#![allow(clippy::too_many_arguments)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(nonstandard_style, rust_2018_idioms, unused)]
#![warn(trivial_casts, trivial_numeric_casts)]

#[macro_use]
#[doc(hidden)]
pub mod log;

#[macro_use]
mod float_eq;

mod arc;
mod bezier;
mod cache;
mod error;
mod flatten;
mod normalize;
mod path_data;
mod path_parser;
mod shapes;
mod transform;

pub use crate::arc::{
    arc_to_cubics, sample_arc, ArcParameterization, EllipticalArc, LargeArc, Sweep,
};
pub use crate::bezier::{flatten as flatten_curve, CubicBezierCurve, DEFAULT_MAX_DEPTH};
pub use crate::cache::PathCache;
pub use crate::error::FlattenError;
pub use crate::flatten::{
    flatten_drawable, flatten_path, Attributes, Drawable, FlattenOptions, Polyline,
    DEFAULT_MAX_ERROR,
};
pub use crate::normalize::{
    absolutize, normalize, normalize_with, reduce, reduce_with, ArcFlattening,
};
pub use crate::path_data::{CommandKind, PathBuilder, PathData, PathSegment, Position};
pub use crate::path_parser::{parse_path, ErrorKind, ParseError};
pub use crate::shapes::Shape;
pub use crate::transform::Transform;

#[doc(hidden)]
pub mod bench_only {
    pub use crate::arc::split_span;
    pub use crate::path_data::PathBuilder;
}
