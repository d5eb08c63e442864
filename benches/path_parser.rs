use criterion::{black_box, criterion_group, criterion_main, Criterion};

use svgflat::bench_only::{split_span, PathBuilder};
use svgflat::{flatten_path, normalize, parse_path, FlattenOptions, Transform};

static INPUT: &str = "M10 20 C 30,40 50 60-70,80,90 100,110 120,130,140";

static MIXED: &str = "M10,20 l30.5-40 h12 v-8 q5 5 10 0 t10 0 s5 5 10 0 \
                      a25 15 30 1 0 40 40 z m5.5.5 c1e1 2E1 .5-.5 3 4";

fn path_parser(c: &mut Criterion) {
    c.bench_function("parse path into builder", |b| {
        let input = black_box(INPUT);

        b.iter(|| {
            let mut builder = PathBuilder::default();
            let _ = builder.parse(input);
        });
    });

    c.bench_function("parse mixed commands", |b| {
        let input = black_box(MIXED);

        b.iter(|| parse_path(input));
    });

    c.bench_function("normalize mixed commands", |b| {
        let path = parse_path(MIXED);

        b.iter(|| normalize(black_box(&path)));
    });

    c.bench_function("flatten mixed commands", |b| {
        let path = normalize(&parse_path(MIXED));
        let transform = Transform::new_scale(3.0, 3.0);
        let options = FlattenOptions::default().with_max_error(0.01);

        b.iter(|| flatten_path(black_box(&path), &transform, &options));
    });

    c.bench_function("split arc span", |b| {
        b.iter(|| split_span(black_box(0.25), black_box(5.5)));
    });
}

criterion_group!(benches, path_parser);
criterion_main!(benches);
