//! Common helpers for projection math (meridional arc, latitude conversions, etc.).
//!
//! All functions work on a unit semi-major axis.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::ProjError;

/// Maximum number of iterations for every iterative latitude solver.
pub const MAXIMUM_ITERATIONS: usize = 15;

/// Convergence threshold for the conic and polar latitude solvers (radians).
pub const ITERATION_TOLERANCE: f64 = 1e-10;

/// Convergence threshold for the meridian-arc and conformal-sphere solvers (radians).
pub const FINE_ITERATION_TOLERANCE: f64 = 1e-11;

/// Tolerance for comparing angles to special values (poles, equator).
pub const EPSILON: f64 = 1e-10;

/// Snyder (1987) eq. 14-15: m = cos φ / sqrt(1 - e² sin² φ).
pub fn msfn(sin_phi: f64, cos_phi: f64, e2: f64) -> f64 {
    cos_phi / (1.0 - e2 * sin_phi * sin_phi).sqrt()
}

/// Snyder (1987) eq. 15-9: t = tan(π/4 - φ/2) / ((1 - e sin φ) / (1 + e sin φ))^(e/2).
pub fn tsfn(phi: f64, sin_phi: f64, e: f64) -> f64 {
    let con = e * sin_phi;
    (FRAC_PI_4 - 0.5 * phi).tan() / ((1.0 - con) / (1.0 + con)).powf(0.5 * e)
}

/// Inverse of [`tsfn`] by fixed-point iteration (Snyder eq. 7-9).
pub fn phi_from_ts(ts: f64, e: f64) -> Result<f64, ProjError> {
    let half_e = 0.5 * e;
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();
    if e == 0.0 {
        return Ok(phi);
    }
    for _ in 0..MAXIMUM_ITERATIONS {
        let con = e * phi.sin();
        let dphi = FRAC_PI_2 - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(half_e)).atan() - phi;
        phi += dphi;
        if dphi.abs() <= ITERATION_TOLERANCE {
            return Ok(phi);
        }
    }
    Err(ProjError::no_convergence("latitude from isometric function", MAXIMUM_ITERATIONS))
}

/// Snyder (1987) eq. 3-12: q = (1 - e²)(sin φ / (1 - e² sin² φ) - ln((1 - e sin φ)/(1 + e sin φ)) / 2e).
pub fn qsfn(sin_phi: f64, e: f64) -> f64 {
    if e < 1e-7 {
        return 2.0 * sin_phi;
    }
    let con = e * sin_phi;
    (1.0 - e * e) * (sin_phi / (1.0 - con * con) - (0.5 / e) * ((1.0 - con) / (1.0 + con)).ln())
}

/// Inverse of [`qsfn`], Snyder (1987) eq. 3-16.
///
/// `q` must lie strictly inside the range reached at the poles; callers
/// handle the polar limit themselves.
pub fn phi_from_q(q: f64, e: f64) -> Result<f64, ProjError> {
    let mut phi = (0.5 * q).clamp(-1.0, 1.0).asin();
    if e < 1e-7 {
        return Ok(phi);
    }
    let e2 = e * e;
    for _ in 0..MAXIMUM_ITERATIONS {
        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let con = e * sin_phi;
        let com = 1.0 - con * con;
        let dphi = 0.5 * com * com / cos_phi
            * (q / (1.0 - e2) - sin_phi / com + 0.5 / e * ((1.0 - con) / (1.0 + con)).ln());
        phi += dphi;
        if dphi.abs() <= ITERATION_TOLERANCE {
            return Ok(phi);
        }
    }
    Err(ProjError::no_convergence("authalic latitude inverse", MAXIMUM_ITERATIONS))
}

/// Conformal latitude of a geodetic latitude:
/// χ = 2 atan(tan(π/4 + φ/2) ((1 - e sin φ)/(1 + e sin φ))^(e/2)) - π/2.
pub fn conformal_latitude(phi: f64, e: f64) -> f64 {
    let con = e * phi.sin();
    2.0 * ((FRAC_PI_4 + 0.5 * phi).tan() * ((1.0 - con) / (1.0 + con)).powf(0.5 * e)).atan()
        - FRAC_PI_2
}

/// Closed-form series from conformal latitude χ back to geodetic latitude φ
/// (EPSG guidance note 7-2, Mercator and polar stereographic inverses).
#[derive(Clone, Copy, Debug)]
pub struct ConformalSeries {
    c2: f64,
    c4: f64,
    c6: f64,
    c8: f64,
}

impl ConformalSeries {
    pub fn new(e2: f64) -> Self {
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e6 * e2;
        Self {
            c2: e2 / 2.0 + 5.0 * e4 / 24.0 + e6 / 12.0 + 13.0 * e8 / 360.0,
            c4: 7.0 * e4 / 48.0 + 29.0 * e6 / 240.0 + 811.0 * e8 / 11520.0,
            c6: 7.0 * e6 / 120.0 + 81.0 * e8 / 1120.0,
            c8: 4279.0 * e8 / 161280.0,
        }
    }

    pub fn latitude(&self, chi: f64) -> f64 {
        chi + self.c2 * (2.0 * chi).sin()
            + self.c4 * (4.0 * chi).sin()
            + self.c6 * (6.0 * chi).sin()
            + self.c8 * (8.0 * chi).sin()
    }
}

/// Meridional arc from the equator, series expansion in powers of the
/// third flattening n (Helmert), on a unit semi-major axis.
#[derive(Clone, Copy, Debug)]
pub struct MeridianArc {
    e2: f64,
    /// Rectifying radius A = 1/(1+n) · (1 + n²/4 + n⁴/64)
    a_hat: f64,
    a2: f64,
    a4: f64,
    a6: f64,
    a8: f64,
}

impl MeridianArc {
    pub fn new(e2: f64, n: f64) -> Self {
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        Self {
            e2,
            a_hat: 1.0 / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0),
            a2: -3.0 / 2.0 * n + 9.0 / 16.0 * n3,
            a4: 15.0 / 16.0 * n2 - 15.0 / 32.0 * n4,
            a6: -35.0 / 48.0 * n3,
            a8: 315.0 / 512.0 * n4,
        }
    }

    /// Meridian distance from the equator to latitude `phi`.
    pub fn distance(&self, phi: f64) -> f64 {
        self.a_hat
            * (phi
                + self.a2 * (2.0 * phi).sin()
                + self.a4 * (4.0 * phi).sin()
                + self.a6 * (6.0 * phi).sin()
                + self.a8 * (8.0 * phi).sin())
    }

    /// Latitude whose meridian distance is `m`, by Newton iteration
    /// on dM/dφ = (1 - e²) / (1 - e² sin² φ)^(3/2).
    pub fn latitude(&self, m: f64) -> Result<f64, ProjError> {
        let mut phi = m / self.a_hat;
        for _ in 0..MAXIMUM_ITERATIONS {
            let s = phi.sin();
            let w = 1.0 - self.e2 * s * s;
            let dphi = (self.distance(phi) - m) * w * w.sqrt() / (1.0 - self.e2);
            phi -= dphi;
            if dphi.abs() < FINE_ITERATION_TOLERANCE {
                return Ok(phi);
            }
        }
        Err(ProjError::no_convergence("meridian distance inverse", MAXIMUM_ITERATIONS))
    }
}
