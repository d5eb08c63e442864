//! Path data for the basic SVG shapes.
//!
//! Each [`Shape`] converts to the same absolute path data a browser would
//! use for the equivalent `<path>`; the result can go through the usual
//! normalize-then-flatten pipeline.

use crate::path_data::{PathBuilder, PathData, PathSegment};

/// One of the basic shapes, in user-space units.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A rectangle, optionally with rounded corners.
    ///
    /// A missing radius takes the value of the other one.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: Option<f64>,
        ry: Option<f64>,
    },

    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },

    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },

    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },

    /// An open sequence of points.
    Polyline(Vec<(f64, f64)>),

    /// A closed sequence of points.
    Polygon(Vec<(f64, f64)>),
}

impl Shape {
    /// Builds the path data that traces this shape.
    pub fn to_path_data(&self) -> PathData {
        match *self {
            Shape::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => make_rect(x, y, width, height, rx, ry),

            Shape::Circle { cx, cy, r } => make_ellipse(cx, cy, r, r),

            Shape::Ellipse { cx, cy, rx, ry } => make_ellipse(cx, cy, rx, ry),

            Shape::Line { x1, y1, x2, y2 } => {
                let mut builder = PathBuilder::default();
                builder.move_to(x1, y1);
                builder.line_to(x2, y2);
                builder.into_path_data()
            }

            Shape::Polyline(ref points) => make_poly(points, false),

            Shape::Polygon(ref points) => make_poly(points, true),
        }
    }
}

fn make_rect(x: f64, y: f64, w: f64, h: f64, rx: Option<f64>, ry: Option<f64>) -> PathData {
    let (rx, ry) = match (rx, ry) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => (rx, rx),
        (None, Some(ry)) => (ry, ry),
        (Some(rx), Some(ry)) => (rx, ry),
    };

    let rx = rx.min(w / 2.0);
    let ry = ry.min(h / 2.0);

    /*
     *      (top_x1, top_y)          (top_x2, top_y)
     *     *-------------------------*
     *    /                           \
     *   * (left_x, left_y1)           * (right_x, right_y1)
     *   |                             |
     *   * (left_x, left_y2)           * (right_x, right_y2)
     *    \                           /
     *     *-------------------------*
     *      (top_x1, bottom_y)       (top_x2, bottom_y)
     */
    let top_x1 = x + rx;
    let top_x2 = x + w - rx;
    let top_y = y;
    let bottom_y = y + h;
    let left_x = x;
    let left_y1 = y + ry;
    let left_y2 = y + h - ry;
    let right_x = x + w;

    let rounded = rx != 0.0 && ry != 0.0;

    let mut builder = PathBuilder::default();

    builder.move_to(top_x1, top_y);

    builder.push(PathSegment::horizontal_line_to(top_x2));
    if rounded {
        builder.push(PathSegment::arc(rx, ry, 0.0, false, true, right_x, left_y1));
    }

    builder.push(PathSegment::vertical_line_to(left_y2));
    if rounded {
        builder.push(PathSegment::arc(rx, ry, 0.0, false, true, top_x2, bottom_y));
    }

    builder.push(PathSegment::horizontal_line_to(top_x1));
    if rounded {
        builder.push(PathSegment::arc(rx, ry, 0.0, false, true, left_x, left_y2));
    }

    builder.push(PathSegment::vertical_line_to(left_y1));
    if rounded {
        builder.push(PathSegment::arc(rx, ry, 0.0, false, true, top_x1, top_y));
    }

    builder.close_path();

    builder.into_path_data()
}

fn make_ellipse(cx: f64, cy: f64, rx: f64, ry: f64) -> PathData {
    let mut builder = PathBuilder::default();

    builder.move_to(cx + rx, cy);

    // four quarter arcs, clockwise in a y-down coordinate system
    for &(x, y) in &[
        (cx, cy + ry),
        (cx - rx, cy),
        (cx, cy - ry),
        (cx + rx, cy),
    ] {
        builder.push(PathSegment::arc(rx, ry, 0.0, false, true, x, y));
    }

    builder.close_path();

    builder.into_path_data()
}

fn make_poly(points: &[(f64, f64)], closed: bool) -> PathData {
    let mut builder = PathBuilder::default();

    for (i, &(x, y)) in points.iter().enumerate() {
        if i == 0 {
            builder.move_to(x, y);
        } else {
            builder.line_to(x, y);
        }
    }

    if closed && !points.is_empty() {
        builder.close_path();
    }

    builder.into_path_data()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{flatten_drawable, Drawable, FlattenOptions};
    use crate::path_data::CommandKind;

    fn letters(data: &PathData) -> String {
        data.iter().map(|s| s.letter()).collect()
    }

    #[test]
    fn square_rect_has_no_arcs() {
        let data = Shape::Rect {
            x: 1.0,
            y: 2.0,
            width: 10.0,
            height: 20.0,
            rx: None,
            ry: None,
        }
        .to_path_data();

        assert_eq!(letters(&data), "MHVHVZ");
        assert_eq!(data.segments()[0], PathSegment::move_to(1.0, 2.0));
        assert_eq!(data.segments()[1], PathSegment::horizontal_line_to(11.0));
        assert_eq!(data.segments()[2], PathSegment::vertical_line_to(22.0));
        assert_eq!(data.segments()[3], PathSegment::horizontal_line_to(1.0));
        assert_eq!(data.segments()[4], PathSegment::vertical_line_to(2.0));
    }

    #[test]
    fn rounded_rect_has_four_arcs() {
        let data = Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            rx: Some(2.0),
            ry: None,
        }
        .to_path_data();

        assert_eq!(letters(&data), "MHAVAHAVAZ");
        assert_eq!(data.segments()[0], PathSegment::move_to(2.0, 0.0));
        assert_eq!(
            data.segments()[2],
            PathSegment::arc(2.0, 2.0, 0.0, false, true, 10.0, 2.0)
        );
        assert_eq!(
            data.segments()[8],
            PathSegment::arc(2.0, 2.0, 0.0, false, true, 2.0, 0.0)
        );
    }

    #[test]
    fn missing_rx_takes_ry() {
        let data = Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            rx: None,
            ry: Some(3.0),
        }
        .to_path_data();

        assert_eq!(
            data.segments()[2],
            PathSegment::arc(3.0, 3.0, 0.0, false, true, 10.0, 3.0)
        );
    }

    #[test]
    fn rect_radii_are_clamped() {
        let data = Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 4.0,
            rx: Some(8.0),
            ry: Some(8.0),
        }
        .to_path_data();

        assert_eq!(
            data.segments()[2],
            PathSegment::arc(5.0, 2.0, 0.0, false, true, 10.0, 2.0)
        );
    }

    #[test]
    fn rect_with_one_zero_radius_drops_arcs() {
        let data = Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            rx: Some(0.0),
            ry: Some(3.0),
        }
        .to_path_data();

        assert!(!data.iter().any(|s| s.kind() == CommandKind::Arc));
    }

    #[test]
    fn circle_is_four_quarter_arcs() {
        let data = Shape::Circle {
            cx: 5.0,
            cy: 5.0,
            r: 5.0,
        }
        .to_path_data();

        assert_eq!(letters(&data), "MAAAAZ");
        assert_eq!(data.segments()[0], PathSegment::move_to(10.0, 5.0));
        assert_eq!(
            data.segments()[1],
            PathSegment::arc(5.0, 5.0, 0.0, false, true, 5.0, 10.0)
        );
        assert_eq!(
            data.segments()[4],
            PathSegment::arc(5.0, 5.0, 0.0, false, true, 10.0, 5.0)
        );
    }

    #[test]
    fn ellipse_uses_both_radii() {
        let data = Shape::Ellipse {
            cx: 0.0,
            cy: 0.0,
            rx: 4.0,
            ry: 2.0,
        }
        .to_path_data();

        assert_eq!(
            data.segments()[2],
            PathSegment::arc(4.0, 2.0, 0.0, false, true, -4.0, 0.0)
        );
    }

    #[test]
    fn line_is_move_and_line() {
        let data = Shape::Line {
            x1: 1.0,
            y1: 2.0,
            x2: 3.0,
            y2: 4.0,
        }
        .to_path_data();

        assert_eq!(
            data.segments(),
            &[PathSegment::move_to(1.0, 2.0), PathSegment::line_to(3.0, 4.0)]
        );
    }

    #[test]
    fn polyline_and_polygon() {
        let points = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];

        assert_eq!(letters(&Shape::Polyline(points.clone()).to_path_data()), "MLL");
        assert_eq!(letters(&Shape::Polygon(points).to_path_data()), "MLLZ");
    }

    #[test]
    fn empty_point_lists_give_empty_paths() {
        assert!(Shape::Polyline(Vec::new()).to_path_data().is_empty());
        assert!(Shape::Polygon(Vec::new()).to_path_data().is_empty());
    }

    #[test]
    fn circle_flattens_to_a_closed_ring() {
        let drawable = Drawable::new(
            Shape::Circle {
                cx: 0.0,
                cy: 0.0,
                r: 10.0,
            }
            .to_path_data(),
        );

        let polylines = flatten_drawable(&drawable, &FlattenOptions::default()).unwrap();
        assert_eq!(polylines.len(), 1);
        assert!(polylines[0].closed);

        for &(x, y) in &polylines[0].points {
            let r = (x * x + y * y).sqrt();
            assert!((r - 10.0).abs() < 0.2, "({}, {}) is off the circle", x, y);
        }
    }
}
