//! Projection kernel: the shared forward/inverse pipeline around a
//! family's normalized formulas, plus the batch transform API.
//!
//! forward: degrees -> range check -> radians, λ - λ₀ -> normalized
//!          family formula -> × a·k₀ -> + false origin
//! inverse: the same steps in reverse order.

use std::f64::consts::PI;
use std::sync::{Arc, OnceLock};

use num_traits::{Float, NumCast};
use tracing::{debug, trace};

use crate::error::ProjError;
use crate::parameter::{self, ParameterSet};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::provider::ProjectionKind;
use crate::proj::{Branch, Family, NormalizedProjection};

/// Tolerance (degrees) on the geographic range check at the public boundary.
const ANGLE_TOLERANCE: f64 = 1e-6;

const UTM_SCALE_FACTOR: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const MTM_SCALE_FACTOR: f64 = 0.9999;
const MTM_FALSE_EASTING: f64 = 304_800.0;

/// Central meridians of MTM zones 1 to 17, degrees west.
const MTM_CENTRAL_MERIDIANS: [f64; 17] = [
    53.0, 56.0, 58.5, 61.5, 64.5, 67.5, 70.5, 73.5, 76.5, 79.5, 82.5, 81.0, 84.0, 87.0, 90.0,
    93.0, 96.0,
];

/// Parameters shared by every family. Angles in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionParameters {
    pub ellipsoid: Ellipsoid,
    pub central_meridian: f64,
    pub latitude_of_origin: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl ProjectionParameters {
    /// a · k₀, the factor between normalized and projected coordinates.
    pub fn global_scale(&self) -> f64 {
        self.ellipsoid.a * self.scale_factor
    }

    pub fn is_spherical(&self) -> bool {
        self.ellipsoid.is_spherical()
    }
}

#[derive(Debug)]
struct ProjectionCore {
    kind: ProjectionKind,
    parameters: ProjectionParameters,
    family: Family,
    global_scale: f64,
    /// Family-specific values (standard parallels and the like) reported by
    /// [`MapProjection::parameter_values`], already in internal units.
    extra: Vec<(&'static parameter::ParameterDescriptor, f64)>,
}

impl ProjectionCore {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        check_geographic(lon, lat)?;
        let p = &self.parameters;
        let lambda = self.roll(lon.to_radians() - p.central_meridian);
        let (x, y) = self.family.transform_normalized(lambda, lat.to_radians())?;
        Ok((
            x * self.global_scale + p.false_easting,
            y * self.global_scale + p.false_northing,
        ))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let p = &self.parameters;
        let (lambda, phi) = self.family.inverse_transform_normalized(
            (x - p.false_easting) / self.global_scale,
            (y - p.false_northing) / self.global_scale,
        )?;
        let lon = self.roll(lambda + p.central_meridian).to_degrees();
        let lat = phi.to_degrees();
        check_geographic(lon, lat)?;
        Ok((lon, lat))
    }

    /// Longitudes are only rolled into [-π, π) when a central meridian
    /// was subtracted, so λ = ±π stays as given otherwise.
    fn roll(&self, lambda: f64) -> f64 {
        if self.parameters.central_meridian == 0.0 {
            lambda
        } else {
            lambda - 2.0 * PI * (lambda / (2.0 * PI) + 0.5).floor()
        }
    }
}

/// A fully constructed map projection. Immutable; clones share the same
/// precomputed constants.
#[derive(Clone, Debug)]
pub struct MapProjection {
    core: Arc<ProjectionCore>,
    inverse: OnceLock<InverseProjection>,
}

impl MapProjection {
    pub(crate) fn new(
        kind: ProjectionKind,
        parameters: ProjectionParameters,
        family: Family,
        extra: Vec<(&'static parameter::ParameterDescriptor, f64)>,
    ) -> Self {
        debug!(
            kind = kind.name(),
            spherical = parameters.is_spherical(),
            branch = ?family.branch(),
            "created map projection"
        );
        Self {
            core: Arc::new(ProjectionCore {
                kind,
                parameters,
                global_scale: parameters.global_scale(),
                family,
                extra,
            }),
            inverse: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.core.kind
    }

    pub fn parameters(&self) -> &ProjectionParameters {
        &self.core.parameters
    }

    pub fn family(&self) -> &Family {
        &self.core.family
    }

    pub fn branch(&self) -> Branch {
        self.core.family.branch()
    }

    pub fn global_scale(&self) -> f64 {
        self.core.global_scale
    }

    /// The effective parameters of this instance, in public units.
    ///
    /// Values derived at construction (Mercator 2SP scale factor, polar
    /// stereographic variant B origin) are reported as used.
    pub fn parameter_values(&self) -> ParameterSet {
        let p = &self.core.parameters;
        let mut values = ParameterSet::new();
        parameter::SEMI_MAJOR.store(&mut values, p.ellipsoid.a);
        parameter::SEMI_MINOR.store(&mut values, p.ellipsoid.b);
        parameter::CENTRAL_MERIDIAN.store(&mut values, p.central_meridian);
        parameter::LATITUDE_OF_ORIGIN.store(&mut values, p.latitude_of_origin);
        parameter::SCALE_FACTOR.store(&mut values, p.scale_factor);
        parameter::FALSE_EASTING.store(&mut values, p.false_easting);
        parameter::FALSE_NORTHING.store(&mut values, p.false_northing);
        for (descriptor, value) in &self.core.extra {
            descriptor.store(&mut values, *value);
        }
        values
    }

    /// Project geographic (lon, lat) in degrees to (easting, northing).
    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        self.core.forward(lon, lat)
    }

    /// Unproject (easting, northing) to geographic (lon, lat) in degrees.
    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        self.core.inverse(x, y)
    }

    /// The inverse transform as a [`MathTransform2D`], built on first use.
    pub fn inverse_view(&self) -> &InverseProjection {
        self.inverse.get_or_init(|| InverseProjection {
            core: Arc::clone(&self.core),
        })
    }

    fn zone_system(&self) -> Result<ZoneSystem, ProjError> {
        let p = &self.core.parameters;
        if self.core.kind == ProjectionKind::TransverseMercator {
            if p.scale_factor == UTM_SCALE_FACTOR && p.false_easting == UTM_FALSE_EASTING {
                return Ok(ZoneSystem::Utm);
            }
            if p.scale_factor == MTM_SCALE_FACTOR && p.false_easting == MTM_FALSE_EASTING {
                return Ok(ZoneSystem::Mtm);
            }
        }
        Err(ProjError::IllegalState(format!(
            "{} with scale factor {} and false easting {} is not a UTM or MTM zone",
            self.core.kind.name(),
            p.scale_factor,
            p.false_easting
        )))
    }

    /// Zone number of a UTM or MTM projection, from its central meridian.
    pub fn zone(&self) -> Result<u32, ProjError> {
        let cm = self.core.parameters.central_meridian.to_degrees();
        match self.zone_system()? {
            ZoneSystem::Utm => Ok((((cm + 180.0) / 6.0).floor() as i64).rem_euclid(60) as u32 + 1),
            ZoneSystem::Mtm => MTM_CENTRAL_MERIDIANS
                .iter()
                .position(|west| (cm + west).abs() < 1e-9)
                .map(|i| i as u32 + 1)
                .ok_or_else(|| {
                    ProjError::IllegalState(format!("{cm}° is not the central meridian of an MTM zone"))
                }),
        }
    }

    /// Central meridian (degrees) of `zone` in the grid system of this projection.
    pub fn central_meridian_of_zone(&self, zone: u32) -> Result<f64, ProjError> {
        match self.zone_system()? {
            ZoneSystem::Utm if (1..=60).contains(&zone) => Ok(6.0 * zone as f64 - 183.0),
            ZoneSystem::Mtm if (1..=17).contains(&zone) => {
                Ok(-MTM_CENTRAL_MERIDIANS[zone as usize - 1])
            }
            _ => Err(ProjError::invalid("zone", zone as f64, "no such zone")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ZoneSystem {
    Utm,
    Mtm,
}

fn check_geographic(lon: f64, lat: f64) -> Result<(), ProjError> {
    if lon.abs() > 180.0 + ANGLE_TOLERANCE {
        return Err(ProjError::outside(lon, lat, "longitude out of range"));
    }
    if lat.abs() > 90.0 + ANGLE_TOLERANCE {
        return Err(ProjError::outside(lon, lat, "latitude out of range"));
    }
    Ok(())
}

/// The inverse direction of a [`MapProjection`], sharing its constants.
#[derive(Clone, Debug)]
pub struct InverseProjection {
    core: Arc<ProjectionCore>,
}

impl InverseProjection {
    /// The forward projection again.
    pub fn projection(&self) -> MapProjection {
        MapProjection {
            core: Arc::clone(&self.core),
            inverse: OnceLock::new(),
        }
    }
}

/// A two-dimensional point transform with batch variants over interleaved
/// `[x0, y0, x1, y1, ...]` buffers.
///
/// Batch methods keep going after a failing point: its output pair is set
/// to NaN and the first error is returned once every point was processed.
/// Points with a NaN coordinate come out as NaN without counting as failures.
pub trait MathTransform2D: Send + Sync {
    fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;

    /// Transform `src` into `dst`, which must be at least as long.
    fn transform_slice<T: Float>(&self, src: &[T], dst: &mut [T]) -> Result<(), ProjError>
    where
        Self: Sized,
    {
        if src.len() % 2 != 0 {
            return Err(ProjError::BufferLength {
                needed: src.len() + 1,
                actual: src.len(),
            });
        }
        if dst.len() < src.len() {
            return Err(ProjError::BufferLength {
                needed: src.len(),
                actual: dst.len(),
            });
        }
        let mut batch = Batch::default();
        for (from, to) in src.chunks_exact(2).zip(dst.chunks_exact_mut(2)) {
            let (x, y) = batch.apply(self, from[0], from[1]);
            to[0] = x;
            to[1] = y;
        }
        batch.finish(src.len() / 2)
    }

    /// Transform `num_points` points of `buffer` starting at value index
    /// `src_offset`, writing them starting at `dst_offset`.
    ///
    /// Overlapping ranges are handled: when the destination starts inside
    /// the source range, points are processed from last to first.
    fn transform_in_place<T: Float>(
        &self,
        buffer: &mut [T],
        src_offset: usize,
        dst_offset: usize,
        num_points: usize,
    ) -> Result<(), ProjError>
    where
        Self: Sized,
    {
        let start = src_offset.max(dst_offset);
        let span = match num_points.checked_mul(2).and_then(|n| n.checked_add(start)) {
            Some(needed) if needed <= buffer.len() => needed - start,
            needed => {
                return Err(ProjError::BufferLength {
                    needed: needed.unwrap_or(usize::MAX),
                    actual: buffer.len(),
                })
            }
        };
        let backward = src_offset < dst_offset && dst_offset < src_offset + span;
        let mut batch = Batch::default();
        let mut step = |i: usize| {
            let from = src_offset + 2 * i;
            let (x, y) = batch.apply(self, buffer[from], buffer[from + 1]);
            let to = dst_offset + 2 * i;
            buffer[to] = x;
            buffer[to + 1] = y;
        };
        if backward {
            (0..num_points).rev().for_each(&mut step);
        } else {
            (0..num_points).for_each(&mut step);
        }
        batch.finish(num_points)
    }

    /// Transform coordinate pairs in place.
    fn transform_tuples(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError>
    where
        Self: Sized,
    {
        let mut batch = Batch::default();
        for c in coords.iter_mut() {
            *c = batch.apply(self, c.0, c.1);
        }
        batch.finish(coords.len())
    }
}

/// Failure bookkeeping for one batch call.
#[derive(Default)]
struct Batch {
    failures: usize,
    first_error: Option<ProjError>,
}

impl Batch {
    fn apply<M, T>(&mut self, transform: &M, x: T, y: T) -> (T, T)
    where
        M: MathTransform2D + ?Sized,
        T: Float,
    {
        if x.is_nan() || y.is_nan() {
            return (T::nan(), T::nan());
        }
        let (Some(xf), Some(yf)) = (x.to_f64(), y.to_f64()) else {
            return (T::nan(), T::nan());
        };
        match transform.transform_point(xf, yf) {
            Ok((u, v)) => (
                <T as NumCast>::from(u).unwrap_or_else(T::nan),
                <T as NumCast>::from(v).unwrap_or_else(T::nan),
            ),
            Err(e) => {
                self.failures += 1;
                self.first_error.get_or_insert(e);
                (T::nan(), T::nan())
            }
        }
    }

    fn finish(self, total: usize) -> Result<(), ProjError> {
        match self.first_error {
            None => Ok(()),
            Some(e) => {
                trace!(failures = self.failures, total, error = %e, "batch transform had failures");
                Err(e)
            }
        }
    }
}

impl MathTransform2D for MapProjection {
    fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        self.forward(x, y)
    }
}

impl MathTransform2D for InverseProjection {
    fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        self.core.inverse(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn utm(zone: u32) -> MapProjection {
        crate::proj::provider::utm(zone, true, Ellipsoid::wgs84()).unwrap()
    }

    #[test]
    fn test_forward_rejects_out_of_range() {
        let merc = ProjectionKind::Mercator1SP
            .create(&ParameterSet::new().with("semi_major", 6_378_137.0).with("semi_minor", 6_378_137.0))
            .unwrap();
        assert!(merc.forward(180.0, 10.0).is_ok());
        assert!(merc.forward(180.000_000_5, 10.0).is_ok());
        assert!(matches!(
            merc.forward(181.0, 10.0),
            Err(ProjError::PointOutsideEnvelope { .. })
        ));
        assert!(matches!(
            merc.forward(0.0, -90.5),
            Err(ProjError::PointOutsideEnvelope { .. })
        ));
    }

    #[test]
    fn test_inverse_view_is_shared() {
        let p = utm(31);
        let a = p.inverse_view() as *const InverseProjection;
        let b = p.inverse_view() as *const InverseProjection;
        assert_eq!(a, b);
        let (x, y) = p.forward(3.5, 48.0).unwrap();
        let (lon, lat) = p.inverse_view().transform_point(x, y).unwrap();
        assert_relative_eq!(lon, 3.5, epsilon = 1e-9);
        assert_relative_eq!(lat, 48.0, epsilon = 1e-9);
        assert_eq!(p.inverse_view().projection().kind(), ProjectionKind::TransverseMercator);
    }

    #[test]
    fn test_central_meridian_roll() {
        // 179°E seen from zone 1 (177°W) is 4° west of the central meridian.
        let p = utm(1);
        let (x, _) = p.forward(179.0, 10.0).unwrap();
        assert!(x < 500_000.0);
        let (lon, _) = p.inverse(x, 1_000_000.0).unwrap();
        assert!(lon > 170.0, "{lon}");
    }

    #[test]
    fn test_utm_zone() {
        assert_eq!(utm(10).zone().unwrap(), 10);
        assert_eq!(utm(1).zone().unwrap(), 1);
        assert_eq!(utm(60).zone().unwrap(), 60);
        assert_relative_eq!(utm(10).central_meridian_of_zone(10).unwrap(), -123.0);
        assert_relative_eq!(utm(10).central_meridian_of_zone(31).unwrap(), 3.0);
        assert!(utm(10).central_meridian_of_zone(61).is_err());
    }

    #[test]
    fn test_mtm_zone() {
        let values = ParameterSet::new()
            .with("semi_major", 6_378_137.0)
            .with("semi_minor", 6_356_752.314_140_356)
            .with("central_meridian", -76.5)
            .with("scale_factor", 0.9999)
            .with("false_easting", 304_800.0);
        let mtm = ProjectionKind::TransverseMercator.create(&values).unwrap();
        assert_eq!(mtm.zone().unwrap(), 9);
        assert_relative_eq!(mtm.central_meridian_of_zone(3).unwrap(), -58.5);

        let odd = ProjectionKind::TransverseMercator
            .create(&values.clone().with("central_meridian", -75.0))
            .unwrap();
        assert!(matches!(odd.zone(), Err(ProjError::IllegalState(_))));
    }

    #[test]
    fn test_zone_of_other_presets_is_illegal_state() {
        let values = ParameterSet::new()
            .with("semi_major", 6_378_137.0)
            .with("semi_minor", 6_378_137.0);
        let tm = ProjectionKind::TransverseMercator.create(&values).unwrap();
        assert!(matches!(tm.zone(), Err(ProjError::IllegalState(_))));
        let merc = ProjectionKind::Mercator1SP.create(&values).unwrap();
        assert!(matches!(merc.central_meridian_of_zone(1), Err(ProjError::IllegalState(_))));
    }

    #[test]
    fn test_parameter_values_round_trip() {
        let values = ParameterSet::new()
            .with("semi_major", 6_378_137.0)
            .with("semi_minor", 6_356_752.314_245_179)
            .with("central_meridian", -123.0)
            .with("latitude_of_origin", 46.8)
            .with("scale_factor", 0.9996)
            .with("false_easting", 500_000.0);
        let p = ProjectionKind::TransverseMercator.create(&values).unwrap();
        let out = p.parameter_values();
        assert_eq!(out.get("central_meridian"), Some(-123.0));
        assert_eq!(out.get("latitude_of_origin"), Some(46.8));
        assert_eq!(out.get("scale_factor"), Some(0.9996));
        assert_eq!(out.get("false_northing"), Some(0.0));
    }
}
