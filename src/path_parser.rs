//! Parser for SVG path data.
//!
//! This is a scanner that works directly on the bytes of the input; there is no separate
//! tokenizer.  The state of the scan is a [`Cursor`], a small `Copy` value that each
//! sub-parser takes and returns advanced, so that a failed sub-parse leaves the caller's
//! cursor untouched.
//!
//! Parsing stops at the first syntax error.  Segments that were completely parsed before
//! the error are kept in the [`PathBuilder`]; this matches how SVG user agents render
//! path data "up to the first error".

use std::error::Error;
use std::fmt;

use tinyvec::ArrayVec;

use crate::path_data::{CommandKind, PathBuilder, PathData, PathSegment, Position};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    /// A byte that is neither a command letter nor the start of a number.
    UnexpectedByte(u8),
    /// The input ended in the middle of a command's operands.
    UnexpectedEof,
    /// Something that starts like a number but is not one, like `-.` or `1e+`.
    InvalidNumber,
    /// An arc flag that is not the character `0` or `1`.
    InvalidFlag(u8),
    /// The first command in non-empty path data is not `M` or `m`.
    InitialCommandNotMoveTo,
    /// Operands right after a `Z`, without a command letter.
    NoImplicitCommandAfterClosePath,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ParseError {
    /// Byte offset into the input where the error was found.
    pub position: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    fn new(position: usize, kind: ErrorKind) -> ParseError {
        ParseError { position, kind }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self.kind {
            ErrorKind::UnexpectedByte(_) => "unexpected character",
            ErrorKind::UnexpectedEof => "unexpected end of data",
            ErrorKind::InvalidNumber => "invalid number",
            ErrorKind::InvalidFlag(_) => "arc flag must be 0 or 1",
            ErrorKind::InitialCommandNotMoveTo => "path data must start with a moveto",
            ErrorKind::NoImplicitCommandAfterClosePath => "closepath takes no arguments",
        };
        write!(f, "error at position {}: {}", self.position, description)
    }
}

impl Error for ParseError {}

/// Position of the scanner in the input, plus the last command that was read.
///
/// The last command is needed to resolve implicit commands, as in `M 0 0 10 10`, where
/// the second coordinate pair is an implicit lineto.
#[derive(Debug, Copy, Clone)]
struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    prev_command: Option<(CommandKind, Position)>,
}

fn is_space(b: u8) -> bool {
    // Same set as the SVG grammar's "wsp": space, tab, LF, FF, CR.
    b.is_ascii_whitespace()
}

fn starts_number(b: u8) -> bool {
    matches!(b, b'+' | b'-' | b'.' | b'0'..=b'9')
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            input: input.as_bytes(),
            pos: 0,
            prev_command: None,
        }
    }

    fn has_more(&self) -> bool {
        self.pos < self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_digit(&self) -> Option<u8> {
        self.peek().filter(u8::is_ascii_digit)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(self, n: usize) -> Cursor<'a> {
        Cursor {
            pos: self.pos + n,
            ..self
        }
    }

    fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::new(self.pos, kind)
    }

    fn skip_spaces(mut self) -> Cursor<'a> {
        while self.peek().map_or(false, is_space) {
            self.pos += 1;
        }
        self
    }

    /// Skips whitespace with at most one comma somewhere in it.
    fn skip_spaces_or_delimiter(self) -> Cursor<'a> {
        match self.peek() {
            Some(b) if is_space(b) || b == b',' => (),
            _ => return self,
        }

        let c = self.skip_spaces();
        if c.peek() == Some(b',') {
            c.advance(1).skip_spaces()
        } else {
            c
        }
    }

    fn initial_command_is_moveto(&self) -> bool {
        match self.peek() {
            None => true,
            Some(b) => matches!(
                CommandKind::from_letter(b),
                Some((CommandKind::MoveTo, _))
            ),
        }
    }

    fn number(self) -> Result<(f64, Cursor<'a>), ParseError> {
        let mut c = self.skip_spaces();

        let mut sign = 1.0;
        match c.peek() {
            Some(b'+') => c.pos += 1,
            Some(b'-') => {
                c.pos += 1;
                sign = -1.0;
            }
            _ => (),
        }

        match c.peek() {
            None => return Err(c.error(ErrorKind::UnexpectedEof)),
            Some(b) if !b.is_ascii_digit() && b != b'.' => {
                return Err(c.error(ErrorKind::InvalidNumber))
            }
            _ => (),
        }

        // Integer part, accumulated right-to-left.
        let int_start = c.pos;
        while c.peek_digit().is_some() {
            c.pos += 1;
        }

        let mut integer = 0.0;
        let mut multiplier = 1.0;
        for &d in c.input[int_start..c.pos].iter().rev() {
            integer += multiplier * f64::from(d - b'0');
            multiplier *= 10.0;
        }

        let mut decimal = 0.0;
        if c.peek() == Some(b'.') {
            c.pos += 1;

            if c.peek_digit().is_none() {
                return Err(c.error(ErrorKind::InvalidNumber));
            }

            let mut frac = 1.0;
            while let Some(d) = c.peek_digit() {
                frac *= 10.0;
                decimal += f64::from(d - b'0') / frac;
                c.pos += 1;
            }
        }

        let mut number = (integer + decimal) * sign;

        // An 'e' right before an 'x' or 'm' is the start of a unit like "em" or "ex",
        // not an exponent.  Those are not valid in path data, so the 'e' is left for
        // the caller to report.
        let has_exponent = matches!(c.peek(), Some(b'e' | b'E'))
            && c.pos + 1 < c.input.len()
            && !matches!(c.peek_at(1), Some(b'x' | b'm'));

        if has_exponent {
            c.pos += 1;

            let mut exp_sign = 1.0;
            match c.peek() {
                Some(b'+') => c.pos += 1,
                Some(b'-') => {
                    c.pos += 1;
                    exp_sign = -1.0;
                }
                _ => (),
            }

            if c.peek_digit().is_none() {
                return Err(c.error(ErrorKind::InvalidNumber));
            }

            let mut exponent = 0.0;
            while let Some(d) = c.peek_digit() {
                exponent = exponent * 10.0 + f64::from(d - b'0');
                c.pos += 1;
            }

            if exponent != 0.0 {
                number *= 10f64.powf(exp_sign * exponent);
            }
        }

        Ok((number, c.skip_spaces_or_delimiter()))
    }

    fn flag(self) -> Result<(bool, Cursor<'a>), ParseError> {
        let flag = match self.peek() {
            None => return Err(self.error(ErrorKind::UnexpectedEof)),
            Some(b'0') => false,
            Some(b'1') => true,
            Some(b) => return Err(self.error(ErrorKind::InvalidFlag(b))),
        };

        Ok((flag, self.advance(1).skip_spaces_or_delimiter()))
    }

    /// Works out the command for operands that appear without a command letter.
    fn implicit_command(&self, b: u8) -> Result<(CommandKind, Position), ParseError> {
        match self.prev_command {
            Some(_) if !starts_number(b) => Err(self.error(ErrorKind::UnexpectedByte(b))),

            None => Err(self.error(ErrorKind::UnexpectedByte(b))),

            Some((CommandKind::ClosePath, _)) => {
                Err(self.error(ErrorKind::NoImplicitCommandAfterClosePath))
            }

            // Coordinate pairs after a moveto are implicit linetos.
            Some((CommandKind::MoveTo, position)) => Ok((CommandKind::LineTo, position)),

            Some(prev) => Ok(prev),
        }
    }

    fn segment(self) -> Result<(PathSegment, Cursor<'a>), ParseError> {
        let b = match self.peek() {
            Some(b) => b,
            None => return Err(self.error(ErrorKind::UnexpectedEof)),
        };

        let (kind, position, mut c) = match CommandKind::from_letter(b) {
            // "z" and "Z" mean the same thing, so closepath is always absolute.
            Some((CommandKind::ClosePath, _)) => {
                (CommandKind::ClosePath, Position::Absolute, self.advance(1))
            }
            Some((kind, position)) => (kind, position, self.advance(1)),
            None => {
                let (kind, position) = self.implicit_command(b)?;
                (kind, position, self)
            }
        };

        c.prev_command = Some((kind, position));

        let mut values = ArrayVec::<[f64; 7]>::new();

        match kind {
            CommandKind::ClosePath => c = c.skip_spaces(),

            CommandKind::Arc => {
                for i in 0..7 {
                    let (v, next) = if i == 3 || i == 4 {
                        let (flag, next) = c.flag()?;
                        (f64::from(u8::from(flag)), next)
                    } else {
                        c.number()?
                    };
                    values.push(v);
                    c = next;
                }
            }

            _ => {
                for _ in 0..kind.arity() {
                    let (v, next) = c.number()?;
                    values.push(v);
                    c = next;
                }
            }
        }

        Ok((PathSegment::from_parts(kind, position, &values), c))
    }
}

/// Parses `path_str` and appends the resulting segments to `builder`.
pub(crate) fn parse_into(builder: &mut PathBuilder, path_str: &str) -> Result<(), ParseError> {
    let mut cursor = Cursor::new(path_str).skip_spaces();

    if !cursor.initial_command_is_moveto() {
        return Err(cursor.error(ErrorKind::InitialCommandNotMoveTo));
    }

    while cursor.has_more() {
        let (segment, next) = cursor.segment()?;
        builder.push(segment);
        cursor = next;
    }

    Ok(())
}

/// Parses SVG path data into a sequence of segments.
///
/// This never fails: on a syntax error, the result holds the segments that were parsed
/// before the error, and the error is logged.  Use [`PathBuilder::parse`] to find out
/// about errors.
///
/// Path data that does not start with a moveto yields an empty path.
pub fn parse_path(path_str: &str) -> PathData {
    let mut builder = PathBuilder::default();

    if let Err(e) = builder.parse(path_str) {
        flat_log!("truncating path data {:?}: {}", path_str, e);
    }

    builder.into_path_data()
}
