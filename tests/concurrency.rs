use std::sync::Arc;

use mapproj::{utm, Ellipsoid, MathTransform2D, ParameterSet, ProjectionKind};
use rayon::prelude::*;

#[test]
fn shared_projection_across_threads() {
    let p = Arc::new(utm(33, true, Ellipsoid::wgs84()).unwrap());
    let inputs: Vec<(f64, f64)> = (0..10_000)
        .map(|i| (12.0 + (i % 600) as f64 * 0.01, 40.0 + (i / 600) as f64))
        .collect();

    let sequential: Vec<(f64, f64)> = inputs.iter().map(|&(lon, lat)| p.forward(lon, lat).unwrap()).collect();
    let parallel: Vec<(f64, f64)> = inputs
        .par_iter()
        .map(|&(lon, lat)| p.forward(lon, lat).unwrap())
        .collect();
    assert_eq!(sequential, parallel);
}

#[test]
fn inverse_view_built_once_under_contention() {
    let values = ParameterSet::new()
        .with("semi_major", 6_378_137.0)
        .with("semi_minor", 6_356_752.314_245_179)
        .with("latitude_of_origin", 90.0)
        .with("scale_factor", 0.994)
        .with("false_easting", 2_000_000.0)
        .with("false_northing", 2_000_000.0);
    let p = ProjectionKind::PolarStereographic.create(&values).unwrap();

    let addresses: Vec<usize> = (0..64)
        .into_par_iter()
        .map(|_| p.inverse_view() as *const _ as usize)
        .collect();
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn parallel_batches_on_clones() {
    let p = utm(31, true, Ellipsoid::wgs84()).unwrap();
    let mut chunks: Vec<Vec<f64>> = (0..8)
        .map(|k| vec![3.0, 45.0 + k as f64, 2.5, 46.0 + k as f64])
        .collect();
    chunks.par_iter_mut().for_each(|chunk| {
        let local = p.clone();
        local.transform_in_place(chunk, 0, 0, 2).unwrap();
        local.inverse_view().transform_in_place(chunk, 0, 0, 2).unwrap();
    });
    for (k, chunk) in chunks.iter().enumerate() {
        assert!((chunk[1] - (45.0 + k as f64)).abs() < 1e-8);
        assert!((chunk[2] - 2.5).abs() < 1e-8);
    }
}
