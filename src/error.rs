//! Error types.
//!
//! Syntax errors in path data never show up here: the parser recovers from them by
//! truncating the path (see [`crate::path_parser::ParseError`] for the details it can
//! report).  The errors in this module are the fatal ones that stop flattening.

use thiserror::Error;

use crate::path_data::{CommandKind, Position};

/// Errors that can happen while flattening path data into polylines.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlattenError {
    /// The center of an elliptical arc could not be computed.
    ///
    /// This happens when the radicand in the center computation is negative beyond
    /// rounding tolerance, which means the arc parameters are mathematically
    /// inconsistent (typically because they contain NaN or infinite values).
    #[error(
        "malformed arc from {from:?} to {to:?} with radii {radii:?}, rotation {x_axis_rotation}: \
         negative radicand {radicand}"
    )]
    MalformedArc {
        from: (f64, f64),
        to: (f64, f64),
        radii: (f64, f64),
        x_axis_rotation: f64,
        radicand: f64,
    },

    /// A command that normalization should have removed reached the flattener.
    #[error("unexpected {position:?} {kind:?} command at index {index} while flattening")]
    UnexpectedCommand {
        index: usize,
        kind: CommandKind,
        position: Position,
    },

    /// A flattening option is out of range.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}
