use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mapproj::{utm, Ellipsoid, MapProjection, MathTransform2D, ParameterSet, ProjectionKind};

fn wgs84() -> ParameterSet {
    let e = Ellipsoid::wgs84();
    ParameterSet::new()
        .with("semi_major", e.a)
        .with("semi_minor", e.b)
}

fn geographic_grid(n: usize, lon: (f64, f64), lat: (f64, f64)) -> Vec<f64> {
    (0..n)
        .flat_map(|i| {
            let t = i as f64 / n as f64;
            [lon.0 + t * (lon.1 - lon.0), lat.0 + t * (lat.1 - lat.0)]
        })
        .collect()
}

fn projections() -> Vec<(&'static str, MapProjection, Vec<f64>)> {
    let n = 100_000;
    vec![
        (
            "utm33",
            utm(33, true, Ellipsoid::wgs84()).unwrap(),
            geographic_grid(n, (12.0, 18.0), (40.0, 70.0)),
        ),
        (
            "mercator",
            ProjectionKind::Mercator1SP.create(&wgs84()).unwrap(),
            geographic_grid(n, (-180.0, 180.0), (-80.0, 80.0)),
        ),
        (
            "lambert_2sp",
            ProjectionKind::LambertConformal2SP
                .create(
                    &wgs84()
                        .with("central_meridian", 3.0)
                        .with("latitude_of_origin", 46.5)
                        .with("standard_parallel_1", 49.0)
                        .with("standard_parallel_2", 44.0),
                )
                .unwrap(),
            geographic_grid(n, (-5.0, 10.0), (41.0, 52.0)),
        ),
        (
            "albers",
            ProjectionKind::AlbersEqualArea
                .create(
                    &wgs84()
                        .with("central_meridian", -96.0)
                        .with("latitude_of_origin", 23.0)
                        .with("standard_parallel_1", 29.5)
                        .with("standard_parallel_2", 45.5),
                )
                .unwrap(),
            geographic_grid(n, (-125.0, -65.0), (25.0, 50.0)),
        ),
        (
            "oblique_stereographic",
            ProjectionKind::ObliqueStereographic
                .create(&wgs84().with("central_meridian", 5.4).with("latitude_of_origin", 52.2))
                .unwrap(),
            geographic_grid(n, (3.0, 7.5), (50.5, 54.0)),
        ),
    ]
}

fn bench_forward_throughput(c: &mut Criterion) {
    for (name, projection, src) in projections() {
        let mut dst = vec![0.0; src.len()];
        c.bench_function(&format!("forward_{name}_100k"), |b| {
            b.iter(|| {
                projection.transform_slice(black_box(&src), &mut dst).unwrap();
            });
        });
    }
}

fn bench_inverse_throughput(c: &mut Criterion) {
    for (name, projection, src) in projections() {
        let mut projected = vec![0.0; src.len()];
        projection.transform_slice(&src, &mut projected).unwrap();
        let mut dst = vec![0.0; src.len()];
        c.bench_function(&format!("inverse_{name}_100k"), |b| {
            b.iter(|| {
                projection
                    .inverse_view()
                    .transform_slice(black_box(&projected), &mut dst)
                    .unwrap();
            });
        });
    }
}

fn bench_in_place_shifted(c: &mut Criterion) {
    let projection = utm(33, true, Ellipsoid::wgs84()).unwrap();
    let src = geographic_grid(100_000, (12.0, 18.0), (40.0, 70.0));
    let mut buffer = src.clone();
    buffer.extend([0.0, 0.0]);
    c.bench_function("in_place_shifted_utm33_100k", |b| {
        b.iter(|| {
            buffer[..src.len()].copy_from_slice(&src);
            projection
                .transform_in_place(black_box(&mut buffer), 0, 2, 100_000)
                .unwrap();
        });
    });
}

fn bench_construction(c: &mut Criterion) {
    let values = wgs84()
        .with("central_meridian", 5.4)
        .with("latitude_of_origin", 52.2);
    c.bench_function("create_oblique_stereographic", |b| {
        b.iter(|| black_box(ProjectionKind::ObliqueStereographic.create(black_box(&values)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_forward_throughput,
    bench_inverse_throughput,
    bench_in_place_shifted,
    bench_construction
);
criterion_main!(benches);
