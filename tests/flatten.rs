use svgflat::{
    absolutize, arc_to_cubics, flatten_drawable, flatten_path, normalize, parse_path,
    ArcFlattening, Attributes, CommandKind, CubicBezierCurve, Drawable, FlattenOptions,
    LargeArc, PathSegment, Shape, Sweep, Transform,
};

fn distance_to_polyline(p: (f64, f64), points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|s| {
            let (a, b) = (s[0], s[1]);
            let (dx, dy) = (b.0 - a.0, b.1 - a.1);
            let len2 = dx * dx + dy * dy;
            let t = if len2 == 0.0 {
                0.0
            } else {
                (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
            };
            ((p.0 - a.0 - t * dx).powi(2) + (p.1 - a.1 - t * dy).powi(2)).sqrt()
        })
        .fold(f64::INFINITY, f64::min)
}

#[test]
fn closed_triangle() {
    let path = parse_path("M0 0 L10 0 L10 10 Z");

    assert_eq!(
        path.segments(),
        &[
            PathSegment::move_to(0.0, 0.0),
            PathSegment::line_to(10.0, 0.0),
            PathSegment::line_to(10.0, 10.0),
            PathSegment::close_path(),
        ]
    );

    let polylines = flatten_path(&path, &Transform::identity(), &FlattenOptions::default()).unwrap();
    assert_eq!(polylines.len(), 1);
    assert_eq!(
        polylines[0].points,
        vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)]
    );
    assert!(polylines[0].closed);
}

#[test]
fn relative_commands_are_absolutized() {
    let path = absolutize(&parse_path("m5 5 l5 0"));

    assert_eq!(
        path.segments(),
        &[PathSegment::move_to(5.0, 5.0), PathSegment::line_to(10.0, 5.0)]
    );
}

#[test]
fn cubic_stays_within_max_error() {
    let max_error = 0.1;
    let path = parse_path("M0 0 C0 10 10 10 10 0");
    let polylines =
        flatten_path(&path, &Transform::identity(), &FlattenOptions::default()).unwrap();

    assert_eq!(polylines.len(), 1);
    let points = &polylines[0].points;
    assert!(points.len() >= 2);
    assert_eq!(points[0], (0.0, 0.0));
    assert_eq!(points[points.len() - 1], (10.0, 0.0));

    let curve = CubicBezierCurve::new((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0));

    // every vertex lies on the curve, and every point of the curve is near the polyline
    for i in 0..=2000 {
        let p = curve.point_at(f64::from(i) / 2000.0);
        assert!(distance_to_polyline(p, points) <= max_error);
    }
}

#[test]
fn arc_converts_to_cubics_with_exact_endpoints() {
    let path = normalize(&parse_path("M0 0 A5 5 0 0 1 10 0"));

    assert_eq!(path.segments()[0], PathSegment::move_to(0.0, 0.0));
    assert!(path.len() >= 2);
    assert!(path.iter().skip(1).all(|s| s.kind() == CommandKind::CurveTo));

    let last = path.segments()[path.len() - 1].values();
    assert_eq!((last[4], last[5]), (10.0, 0.0));

    let curves = arc_to_cubics(
        (0.0, 0.0),
        (10.0, 0.0),
        (5.0, 5.0),
        0.0,
        LargeArc(false),
        Sweep::Positive,
    );
    assert_eq!(curves[0].from, (0.0, 0.0));
    assert_eq!(curves[curves.len() - 1].to, (10.0, 0.0));
}

#[test]
fn syntax_error_truncates_path() {
    let path = parse_path("M0 0 L1 x");
    assert_eq!(path.segments(), &[PathSegment::move_to(0.0, 0.0)]);
}

#[test]
fn zero_radius_arc_becomes_line() {
    let path = normalize(&parse_path("M0 0 A0 5 0 0 1 10 0"));

    assert_eq!(
        path.segments(),
        &[
            PathSegment::move_to(0.0, 0.0),
            PathSegment::curve_to(0.0, 0.0, 10.0, 0.0, 10.0, 0.0),
        ]
    );
}

#[test]
fn rotated_ellipse_stays_within_max_error() {
    let max_error = 0.05;
    let options = FlattenOptions::default().with_max_error(max_error);
    let transform = Transform::new_rotate(30.0).pre_scale(2.0, 1.0);

    let drawable = Drawable::new(
        Shape::Ellipse {
            cx: 0.0,
            cy: 0.0,
            rx: 10.0,
            ry: 4.0,
        }
        .to_path_data(),
    )
    .with_transform(transform);

    let polylines = flatten_drawable(&drawable, &options).unwrap();
    assert_eq!(polylines.len(), 1);

    for i in 0..720 {
        let t = f64::from(i).to_radians() / 2.0;
        let p = transform.transform_point(10.0 * t.cos(), 4.0 * t.sin());

        // arc-to-cubic conversion adds its own small error on top of flattening
        assert!(distance_to_polyline(p, &polylines[0].points) <= max_error + 0.01);
    }
}

#[test]
fn sampled_and_cubic_arcs_agree() {
    let path = parse_path("M10 10 a20 10 45 1 1 30 -5");
    let transform = Transform::new_scale(1.5, -1.5);

    let cubic = flatten_drawable(
        &Drawable::new(path.clone()).with_transform(transform),
        &FlattenOptions::default(),
    )
    .unwrap();

    let sampled = flatten_drawable(
        &Drawable::new(path).with_transform(transform),
        &FlattenOptions::default().with_arc_flattening(ArcFlattening::Sample),
    )
    .unwrap();

    assert_eq!(cubic.len(), 1);
    assert_eq!(sampled.len(), 1);
    assert_eq!(cubic[0].points.first(), sampled[0].points.first());

    let (a, b) = (cubic[0].points.last().unwrap(), sampled[0].points.last().unwrap());
    assert!((a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9);

    for &p in &sampled[0].points {
        assert!(distance_to_polyline(p, &cubic[0].points) < 0.25);
    }
}

#[test]
fn attributes_reach_every_polyline() {
    let attributes: Attributes = vec![("id", "shape"), ("stroke", "red")].into_iter().collect();

    let drawable = Drawable::new(parse_path("M0 0 L1 1 M5 5 L6 6 Z")).with_attributes(attributes);
    let polylines = flatten_drawable(&drawable, &FlattenOptions::default()).unwrap();

    assert_eq!(polylines.len(), 2);
    for polyline in &polylines {
        assert_eq!(polyline.attributes.get("id"), Some("shape"));
        assert_eq!(polyline.attributes.get("stroke"), Some("red"));
    }
}

#[test]
fn independent_calls_can_run_on_threads() {
    let path = normalize(&parse_path("M0 0 Q50 100 100 0 T200 0"));
    let options = FlattenOptions::default();

    let handles: Vec<_> = (1..=4)
        .map(|i| {
            let path = path.clone();
            std::thread::spawn(move || {
                let transform = Transform::new_scale(f64::from(i), f64::from(i));
                flatten_path(&path, &transform, &options).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let polylines = handle.join().unwrap();
        let scale = (i + 1) as f64;
        assert_eq!(polylines[0].points.last(), Some(&(200.0 * scale, 0.0)));
    }
}
