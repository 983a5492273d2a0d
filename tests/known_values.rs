//! Published test points (EPSG guidance note 7-2, Snyder 1987) for every
//! supported method.

use approx::assert_relative_eq;
use mapproj::{utm, Ellipsoid, ParameterSet, ProjectionKind};

/// Semi-axes from semi-major axis and inverse flattening.
fn ellipsoid(a: f64, inverse_flattening: f64) -> ParameterSet {
    ParameterSet::new()
        .with("semi_major", a)
        .with("semi_minor", a * (1.0 - 1.0 / inverse_flattening))
}

fn wgs84() -> ParameterSet {
    ellipsoid(6_378_137.0, 298.257_223_563)
}

fn bessel() -> ParameterSet {
    ellipsoid(6_377_397.155, 299.152_812_8)
}

fn clarke_1866() -> ParameterSet {
    ellipsoid(6_378_206.4, 294.978_698_2)
}

fn check(kind: ProjectionKind, values: ParameterSet, lon: f64, lat: f64, expected: (f64, f64)) {
    let p = kind.create(&values).unwrap();
    let (x, y) = p.forward(lon, lat).unwrap();
    assert_relative_eq!(x, expected.0, epsilon = 1e-3);
    assert_relative_eq!(y, expected.1, epsilon = 1e-3);
    let (lon2, lat2) = p.inverse(x, y).unwrap();
    assert_relative_eq!(lon2, lon, epsilon = 1e-8);
    assert_relative_eq!(lat2, lat, epsilon = 1e-8);
}

#[test]
fn mercator_wgs84() {
    let p = ProjectionKind::Mercator1SP.create(&wgs84()).unwrap();
    let (x, y) = p.forward(0.0, 0.0).unwrap();
    assert_eq!((x, y), (0.0, 0.0));
    let (x, y) = p.forward(2.0, 0.0).unwrap();
    assert_relative_eq!(x, 222_638.98, epsilon = 0.01);
    assert_relative_eq!(y, 0.0, epsilon = 0.01);
}

#[test]
fn mercator_1sp_makassar() {
    check(
        ProjectionKind::Mercator1SP,
        bessel()
            .with("central_meridian", 110.0)
            .with("scale_factor", 0.997)
            .with("false_easting", 3_900_000.0)
            .with("false_northing", 900_000.0),
        120.0,
        -3.0,
        (5_009_726.583, 569_150.819),
    );
}

#[test]
fn mercator_2sp_pulkovo() {
    check(
        ProjectionKind::Mercator2SP,
        ellipsoid(6_378_245.0, 298.3)
            .with("central_meridian", 51.0)
            .with("standard_parallel_1", 42.0),
        53.0,
        53.0,
        (165_704.293, 5_171_848.073),
    );
}

#[test]
fn lambert_1sp_jamaica() {
    check(
        ProjectionKind::LambertConformal1SP,
        clarke_1866()
            .with("central_meridian", -77.0)
            .with("latitude_of_origin", 18.0)
            .with("false_easting", 250_000.0)
            .with("false_northing", 150_000.0),
        -76.943_683_333,
        17.932_166_667,
        (255_966.582, 142_493.511),
    );
}

#[test]
fn lambert_2sp_belgium() {
    check(
        ProjectionKind::LambertConformal2SPBelgium,
        ellipsoid(6_378_388.0, 297.0)
            .with("central_meridian", 4.356_939_722)
            .with("latitude_of_origin", 90.0)
            .with("standard_parallel_1", 49.833_333_3)
            .with("standard_parallel_2", 51.166_666_7)
            .with("false_easting", 150_000.01)
            .with("false_northing", 5_400_088.44),
        5.807_370_278,
        50.679_572_5,
        (251_763.202, 153_034.135),
    );
}

#[test]
fn albers_conus() {
    check(
        ProjectionKind::AlbersEqualArea,
        clarke_1866()
            .with("central_meridian", -96.0)
            .with("latitude_of_origin", 23.0)
            .with("standard_parallel_1", 29.5)
            .with("standard_parallel_2", 45.5),
        -75.0,
        35.0,
        (1_885_472.726, 1_535_925.005),
    );
}

#[test]
fn transverse_mercator_osgb() {
    check(
        ProjectionKind::TransverseMercator,
        ellipsoid(6_377_563.396, 299.324_964_6)
            .with("central_meridian", -2.0)
            .with("latitude_of_origin", 49.0)
            .with("scale_factor", 0.999_601_271_7)
            .with("false_easting", 400_000.0)
            .with("false_northing", -100_000.0),
        0.5,
        50.5,
        (577_274.984, 69_740.492),
    );
}

#[test]
fn oblique_stereographic_rd() {
    check(
        ProjectionKind::ObliqueStereographic,
        bessel()
            .with("central_meridian", 5.387_638_889)
            .with("latitude_of_origin", 52.156_160_556)
            .with("scale_factor", 0.999_907_9)
            .with("false_easting", 155_000.0)
            .with("false_northing", 463_000.0),
        6.0,
        53.0,
        (196_105.283, 557_057.739),
    );
}

#[test]
fn polar_stereographic_ups_north() {
    check(
        ProjectionKind::PolarStereographic,
        wgs84()
            .with("latitude_of_origin", 90.0)
            .with("scale_factor", 0.994)
            .with("false_easting", 2_000_000.0)
            .with("false_northing", 2_000_000.0),
        44.0,
        73.0,
        (3_320_416.747, 632_668.431),
    );
}

#[test]
fn polar_stereographic_variant_b() {
    check(
        ProjectionKind::PolarStereographicVariantB,
        wgs84()
            .with("central_meridian", 70.0)
            .with("standard_parallel_1", -71.0)
            .with("false_easting", 6_000_000.0)
            .with("false_northing", 6_000_000.0),
        120.0,
        -75.0,
        (7_255_380.793, 7_053_389.561),
    );
}

#[test]
fn stereographic_usgs_oblique() {
    check(
        ProjectionKind::Stereographic,
        clarke_1866()
            .with("central_meridian", -100.0)
            .with("latitude_of_origin", 40.0)
            .with("scale_factor", 0.9999),
        -90.0,
        30.0,
        (971_630.795, -1_063_049.268),
    );
}

#[test]
fn utm_zone_10() {
    let p = utm(10, true, Ellipsoid::wgs84()).unwrap();
    assert_eq!(p.zone().unwrap(), 10);
    let (x, y) = p.forward(-122.0, 45.0).unwrap();
    assert_relative_eq!(x, 578_815.303, epsilon = 1e-3);
    assert_relative_eq!(y, 4_983_436.768, epsilon = 1e-3);
}

#[test]
fn utm_zone_from_central_meridian() {
    let values = wgs84()
        .with("central_meridian", -123.0)
        .with("scale_factor", 0.9996)
        .with("false_easting", 500_000.0);
    let p = ProjectionKind::TransverseMercator.create(&values).unwrap();
    assert_eq!(p.zone().unwrap(), 10);
}

#[test]
fn transverse_mercator_sphere() {
    let values = ParameterSet::new()
        .with("semi_major", 6_371_000.0)
        .with("semi_minor", 6_371_000.0);
    check(
        ProjectionKind::TransverseMercator,
        values,
        10.0,
        40.0,
        (852_537.046, 4_495_884.545),
    );
}
