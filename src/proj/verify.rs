//! Consistency checks between the two directions of a projection and
//! between its spherical and ellipsoidal formulas.
//!
//! Nothing in the transform path calls into this module.

use tracing::debug;

use crate::error::ProjError;
use crate::parameter::ParameterSet;
use crate::proj::kernel::MapProjection;
use crate::proj::provider::ProjectionKind;
use crate::proj::Branch;

/// Normalized agreement required between the two branches.
const BRANCH_TOLERANCE: f64 = 1e-6;

/// Tolerance multiplier close to the poles, the antimeridian and 90° from
/// the central meridian, where the formulas lose conditioning.
const WIDENING: f64 = 1e3;

/// Project (lon, lat), unproject the result and require the point back
/// within `tolerance` degrees. Returns the projected coordinates.
pub fn round_trip(
    projection: &MapProjection,
    lon: f64,
    lat: f64,
    tolerance: f64,
) -> Result<(f64, f64), ProjError> {
    let (x, y) = projection.forward(lon, lat)?;
    let (lon2, lat2) = projection.inverse(x, y)?;
    let dlon = if lat.abs() >= 90.0 - 1e-9 {
        0.0
    } else {
        longitude_difference(lon, lon2)
    };
    if dlon.abs() > tolerance || (lat - lat2).abs() > tolerance {
        return Err(ProjError::ConsistencyCheck(format!(
            "{}: ({lon}, {lat}) came back as ({lon2}, {lat2}) through ({x}, {y})",
            projection.kind().name()
        )));
    }
    Ok((x, y))
}

/// Compare the spherical formulas of `kind` against its ellipsoidal ones
/// evaluated on the same sphere, forward and inverse, at every point.
///
/// Points outside the domain of the spherical formulas are skipped.
/// Returns how many points were compared.
pub fn branch_agreement(
    kind: ProjectionKind,
    values: &ParameterSet,
    points: &[(f64, f64)],
) -> Result<usize, ProjError> {
    let spherical = kind.create_with_branch(values, Branch::Spherical)?;
    let ellipsoidal = kind.create_with_branch(values, Branch::Ellipsoidal)?;
    let scale = spherical.global_scale();
    let central_meridian = spherical.parameters().central_meridian.to_degrees();

    let mut compared = 0;
    for &(lon, lat) in points {
        let Ok((xs, ys)) = spherical.forward(lon, lat) else {
            continue;
        };
        let widen = if is_ill_conditioned(lon - central_meridian, lat) {
            WIDENING
        } else {
            1.0
        };

        let (xe, ye) = ellipsoidal.forward(lon, lat).map_err(|e| {
            disagreement(kind, lon, lat, format!("ellipsoidal forward failed: {e}"))
        })?;
        let linear = BRANCH_TOLERANCE * scale * widen;
        if (xs - xe).abs() > linear || (ys - ye).abs() > linear {
            return Err(disagreement(
                kind,
                lon,
                lat,
                format!("forward ({xs}, {ys}) against ({xe}, {ye})"),
            ));
        }

        let (lon_s, lat_s) = spherical.inverse(xs, ys)?;
        let (lon_e, lat_e) = ellipsoidal.inverse(xs, ys).map_err(|e| {
            disagreement(kind, lon, lat, format!("ellipsoidal inverse failed: {e}"))
        })?;
        let angular = BRANCH_TOLERANCE.to_degrees() * widen;
        let dlon = if lat_s.abs() >= 90.0 - 1e-9 {
            0.0
        } else {
            longitude_difference(lon_s, lon_e)
        };
        if dlon.abs() > angular || (lat_s - lat_e).abs() > angular {
            return Err(disagreement(
                kind,
                lon,
                lat,
                format!("inverse ({lon_s}, {lat_s}) against ({lon_e}, {lat_e})"),
            ));
        }
        compared += 1;
    }
    debug!(kind = kind.name(), compared, total = points.len(), "branches agree");
    Ok(compared)
}

fn is_ill_conditioned(dlon: f64, lat: f64) -> bool {
    let dlon = longitude_difference(dlon, 0.0).abs();
    lat.abs() > 89.0 || (dlon - 90.0).abs() < 1.0 || dlon > 179.0
}

/// a - b in degrees, wrapped into [-180, 180).
fn longitude_difference(a: f64, b: f64) -> f64 {
    (a - b + 180.0).rem_euclid(360.0) - 180.0
}

fn disagreement(kind: ProjectionKind, lon: f64, lat: f64, detail: String) -> ProjError {
    ProjError::ConsistencyCheck(format!(
        "{} branches disagree at ({lon}, {lat}): {detail}",
        kind.name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::ellipsoid::Ellipsoid;
    use crate::proj::provider::utm;

    fn sphere() -> ParameterSet {
        ParameterSet::new()
            .with("semi_major", 6_371_000.0)
            .with("semi_minor", 6_371_000.0)
    }

    #[test]
    fn test_round_trip_utm() {
        let p = utm(33, true, Ellipsoid::wgs84()).unwrap();
        let (x, y) = round_trip(&p, 16.0, 47.5, 1e-8).unwrap();
        assert!(x > 500_000.0 && y > 5_000_000.0);
        // Poles compare latitude only.
        round_trip(&p, 15.0, 90.0, 1e-8).unwrap();
    }

    #[test]
    fn test_round_trip_detects_series_breakdown() {
        let p = utm(33, true, Ellipsoid::wgs84()).unwrap();
        assert!(matches!(
            round_trip(&p, 55.0, 30.0, 1e-6),
            Err(ProjError::ConsistencyCheck(_))
        ));
    }

    #[test]
    fn test_round_trip_propagates_projection_errors() {
        let p = ProjectionKind::Mercator1SP.create(&sphere()).unwrap();
        assert!(matches!(
            round_trip(&p, 0.0, 90.0, 1e-8),
            Err(ProjError::PointOutsideEnvelope { .. })
        ));
    }

    #[test]
    fn test_branch_agreement_needs_sphere() {
        let e = Ellipsoid::wgs84();
        let values = ParameterSet::new()
            .with("semi_major", e.a)
            .with("semi_minor", e.b);
        assert!(matches!(
            branch_agreement(ProjectionKind::Mercator1SP, &values, &[(0.0, 0.0)]),
            Err(ProjError::IllegalState(_))
        ));
    }

    #[test]
    fn test_branch_agreement_mercator_and_tm() {
        let points = [(0.0, 0.0), (3.0, 40.0), (-4.0, -30.0), (2.0, 70.0), (1.0, -85.0)];
        assert_eq!(
            branch_agreement(ProjectionKind::Mercator1SP, &sphere(), &points).unwrap(),
            points.len()
        );
        assert_eq!(
            branch_agreement(ProjectionKind::TransverseMercator, &sphere(), &points).unwrap(),
            points.len()
        );
    }

    #[test]
    fn test_branch_agreement_skips_spherical_domain_errors() {
        // The pole is at infinity on the Mercator.
        let n = branch_agreement(ProjectionKind::Mercator1SP, &sphere(), &[(0.0, 90.0), (0.0, 10.0)])
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn test_longitude_difference() {
        assert_eq!(longitude_difference(179.0, -179.0), -2.0);
        assert_eq!(longitude_difference(-179.0, 179.0), 2.0);
        assert_eq!(longitude_difference(10.0, 4.0), 6.0);
    }
}
