//! Stereographic projection: polar, oblique and equatorial aspects.
//!
//! * [`PolarStereographic`]: EPSG variants A and B, and the USGS polar
//!   aspect. The inverse uses either the conformal latitude series (EPSG)
//!   or fixed-point iteration (USGS).
//! * [`ObliqueStereographic`]: USGS oblique/equatorial aspects, mapping
//!   geodetic to conformal latitude (Snyder 21-2 .. 21-4, PROJ `stere`).
//! * [`DoubleStereographic`]: EPSG oblique stereographic, a stereographic
//!   projection of the Gauss conformal sphere (PROJ `sterea`).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::ProjError;
use crate::proj::common::{
    conformal_latitude, msfn, phi_from_ts, tsfn, ConformalSeries, EPSILON,
    FINE_ITERATION_TOLERANCE, ITERATION_TOLERANCE, MAXIMUM_ITERATIONS,
};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::{Branch, NormalizedProjection};

#[derive(Clone, Debug)]
pub enum Stereographic {
    Polar(PolarStereographic),
    Oblique(ObliqueStereographic),
    Double(DoubleStereographic),
}

impl Stereographic {
    pub fn branch(&self) -> Branch {
        match self {
            Stereographic::Polar(p) => p.branch,
            Stereographic::Oblique(p) => p.branch,
            Stereographic::Double(p) => p.branch,
        }
    }
}

impl NormalizedProjection for Stereographic {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        match self {
            Stereographic::Polar(p) => p.transform_normalized(lambda, phi),
            Stereographic::Oblique(p) => p.transform_normalized(lambda, phi),
            Stereographic::Double(p) => p.transform_normalized(lambda, phi),
        }
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        match self {
            Stereographic::Polar(p) => p.inverse_transform_normalized(x, y),
            Stereographic::Oblique(p) => p.inverse_transform_normalized(x, y),
            Stereographic::Double(p) => p.inverse_transform_normalized(x, y),
        }
    }
}

/// How the polar inverse recovers latitude from the isometric function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolarInverse {
    /// Closed-form conformal latitude series (EPSG guidance note 7-2).
    Series,
    /// Fixed-point iteration (Snyder 7-9).
    Iterative,
}

/// Polar Stereographic projection.
#[derive(Clone, Debug)]
pub struct PolarStereographic {
    e: f64,
    south: bool,
    /// ρ = k · t; m_c / t_c for a latitude of true scale, otherwise
    /// 2 / sqrt((1+e)^(1+e) · (1-e)^(1-e)).
    k: f64,
    inverse: PolarInverse,
    series: ConformalSeries,
    branch: Branch,
}

impl PolarStereographic {
    /// `true_scale` is the standard parallel of variant B, in radians; its
    /// magnitude is used, the hemisphere comes from `south`.
    pub fn new(
        ellipsoid: &Ellipsoid,
        south: bool,
        true_scale: Option<f64>,
        inverse: PolarInverse,
        branch: Branch,
    ) -> Self {
        let e = ellipsoid.e;
        let k = match true_scale.map(f64::abs) {
            Some(phi_c) if (phi_c - FRAC_PI_2).abs() >= EPSILON => {
                let (sin_c, cos_c) = phi_c.sin_cos();
                msfn(sin_c, cos_c, ellipsoid.e2) / tsfn(phi_c, sin_c, e)
            }
            _ => 2.0 / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt(),
        };
        Self {
            e,
            south,
            k,
            inverse,
            series: ConformalSeries::new(ellipsoid.e2),
            branch,
        }
    }

    pub fn is_south(&self) -> bool {
        self.south
    }

    pub fn inverse_method(&self) -> PolarInverse {
        self.inverse
    }
}

impl NormalizedProjection for PolarStereographic {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        // Mirror the southern aspect onto the northern one.
        let phi_n = if self.south { -phi } else { phi };
        if (phi_n + FRAC_PI_2).abs() < EPSILON {
            return Err(ProjError::outside(
                lambda.to_degrees(),
                phi.to_degrees(),
                "pole opposite to the projection centre",
            ));
        }
        let rho = if (phi_n - FRAC_PI_2).abs() < EPSILON {
            0.0
        } else {
            self.k * tsfn(phi_n, phi_n.sin(), self.e)
        };
        let (sin_l, cos_l) = lambda.sin_cos();
        if self.south {
            Ok((rho * sin_l, rho * cos_l))
        } else {
            Ok((rho * sin_l, -rho * cos_l))
        }
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rho = x.hypot(y);
        let pole = if self.south { -FRAC_PI_2 } else { FRAC_PI_2 };
        if rho < EPSILON {
            return Ok((0.0, pole));
        }
        let t = rho / self.k;
        let phi_n = match (self.branch, self.inverse) {
            (Branch::Spherical, _) => FRAC_PI_2 - 2.0 * t.atan(),
            (Branch::Ellipsoidal, PolarInverse::Series) => {
                self.series.latitude(FRAC_PI_2 - 2.0 * t.atan())
            }
            (Branch::Ellipsoidal, PolarInverse::Iterative) => phi_from_ts(t, self.e)?,
        };
        if self.south {
            Ok((x.atan2(y), -phi_n))
        } else {
            Ok((x.atan2(-y), phi_n))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Aspect {
    Equatorial,
    Oblique,
}

/// USGS oblique and equatorial stereographic.
#[derive(Clone, Debug)]
pub struct ObliqueStereographic {
    e: f64,
    aspect: Aspect,
    /// Conformal latitude of origin on the ellipsoid, geodetic on the sphere.
    sin_x1: f64,
    cos_x1: f64,
    /// 2 · m(φ₀)
    akm1: f64,
    branch: Branch,
}

impl ObliqueStereographic {
    pub fn new(ellipsoid: &Ellipsoid, lat0: f64, branch: Branch) -> Self {
        let aspect = if lat0.abs() < EPSILON {
            Aspect::Equatorial
        } else {
            Aspect::Oblique
        };
        let x1 = match branch {
            Branch::Spherical => lat0,
            Branch::Ellipsoidal => conformal_latitude(lat0, ellipsoid.e),
        };
        let (sin_x1, cos_x1) = x1.sin_cos();
        let (sin0, cos0) = lat0.sin_cos();
        Self {
            e: ellipsoid.e,
            aspect,
            sin_x1,
            cos_x1,
            akm1: 2.0 * msfn(sin0, cos0, ellipsoid.e2),
            branch,
        }
    }

    pub fn aspect(&self) -> Aspect {
        self.aspect
    }

    fn forward_sphere(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_l, cos_l) = lambda.sin_cos();
        let (denom, y) = match self.aspect {
            Aspect::Equatorial => (1.0 + cos_phi * cos_l, sin_phi),
            Aspect::Oblique => (
                1.0 + self.sin_x1 * sin_phi + self.cos_x1 * cos_phi * cos_l,
                self.cos_x1 * sin_phi - self.sin_x1 * cos_phi * cos_l,
            ),
        };
        if denom < EPSILON {
            return Err(antipode(lambda, phi));
        }
        let k = 2.0 / denom;
        Ok((k * cos_phi * sin_l, k * y))
    }

    fn inverse_sphere(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = x.hypot(y);
        if rho < EPSILON {
            return (0.0, self.sin_x1.asin());
        }
        let c = 2.0 * (0.5 * rho).atan();
        let (sin_c, cos_c) = c.sin_cos();
        match self.aspect {
            Aspect::Equatorial => (
                (x * sin_c).atan2(rho * cos_c),
                (y * sin_c / rho).clamp(-1.0, 1.0).asin(),
            ),
            Aspect::Oblique => (
                (x * sin_c).atan2(rho * self.cos_x1 * cos_c - y * self.sin_x1 * sin_c),
                (cos_c * self.sin_x1 + y * sin_c * self.cos_x1 / rho)
                    .clamp(-1.0, 1.0)
                    .asin(),
            ),
        }
    }

    fn forward_ellipsoid(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let chi = conformal_latitude(phi, self.e);
        let (sin_x, cos_x) = chi.sin_cos();
        let (sin_l, cos_l) = lambda.sin_cos();
        let denom = 1.0 + self.sin_x1 * sin_x + self.cos_x1 * cos_x * cos_l;
        if denom < EPSILON {
            return Err(antipode(lambda, phi));
        }
        let a = self.akm1 / (self.cos_x1 * denom);
        Ok((
            a * cos_x * sin_l,
            a * (self.cos_x1 * sin_x - self.sin_x1 * cos_x * cos_l),
        ))
    }

    fn inverse_ellipsoid(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rho = x.hypot(y);
        let tp = 2.0 * (rho * self.cos_x1).atan2(self.akm1);
        let (sin_tp, cos_tp) = tp.sin_cos();
        let mut phi_l = if rho == 0.0 {
            (cos_tp * self.sin_x1).asin()
        } else {
            (cos_tp * self.sin_x1 + y * sin_tp * self.cos_x1 / rho)
                .clamp(-1.0, 1.0)
                .asin()
        };
        let t = (0.5 * (FRAC_PI_2 + phi_l)).tan();
        let xs = x * sin_tp;
        let ys = rho * self.cos_x1 * cos_tp - y * self.sin_x1 * sin_tp;
        let half_e = 0.5 * self.e;
        for _ in 0..MAXIMUM_ITERATIONS {
            let es = self.e * phi_l.sin();
            let phi = 2.0 * (t * ((1.0 + es) / (1.0 - es)).powf(half_e)).atan() - FRAC_PI_2;
            if (phi_l - phi).abs() < ITERATION_TOLERANCE {
                let lambda = if xs == 0.0 && ys == 0.0 {
                    0.0
                } else {
                    xs.atan2(ys)
                };
                return Ok((lambda, phi));
            }
            phi_l = phi;
        }
        Err(ProjError::no_convergence(
            "oblique stereographic inverse",
            MAXIMUM_ITERATIONS,
        ))
    }
}

impl NormalizedProjection for ObliqueStereographic {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        match self.branch {
            Branch::Spherical => self.forward_sphere(lambda, phi),
            Branch::Ellipsoidal => self.forward_ellipsoid(lambda, phi),
        }
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        match self.branch {
            Branch::Spherical => Ok(self.inverse_sphere(x, y)),
            Branch::Ellipsoidal => self.inverse_ellipsoid(x, y),
        }
    }
}

/// Oblique Stereographic (double projection through the Gauss conformal sphere).
#[derive(Clone, Debug)]
pub struct DoubleStereographic {
    e: f64,
    /// Gauss sphere exponent C = sqrt(1 + e² cos⁴φ₀ / (1 - e²))
    c: f64,
    /// Gauss sphere constant K
    k: f64,
    ratexp: f64,
    /// Twice the conformal sphere radius, on a unit semi-major axis.
    r2: f64,
    phic0: f64,
    sin_c0: f64,
    cos_c0: f64,
    branch: Branch,
}

fn srat(esinp: f64, exp: f64) -> f64 {
    ((1.0 - esinp) / (1.0 + esinp)).powf(exp)
}

impl DoubleStereographic {
    pub fn new(ellipsoid: &Ellipsoid, lat0: f64, branch: Branch) -> Self {
        let (e, es) = match branch {
            Branch::Spherical => (0.0, 0.0),
            Branch::Ellipsoidal => (ellipsoid.e, ellipsoid.e2),
        };
        let (sin0, cos0) = lat0.sin_cos();
        let cos2 = cos0 * cos0;
        let c = (1.0 + es * cos2 * cos2 / (1.0 - es)).sqrt();
        let phic0 = (sin0 / c).asin();
        let ratexp = 0.5 * c * e;
        let k = (0.5 * phic0 + FRAC_PI_4).tan()
            / ((0.5 * lat0 + FRAC_PI_4).tan().powf(c) * srat(e * sin0, ratexp));
        let r2 = 2.0 * (1.0 - es).sqrt() / (1.0 - es * sin0 * sin0);
        let (sin_c0, cos_c0) = phic0.sin_cos();
        Self {
            e,
            c,
            k,
            ratexp,
            r2,
            phic0,
            sin_c0,
            cos_c0,
            branch,
        }
    }

    /// Geodetic to Gauss sphere.
    fn gauss(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let chi = 2.0
            * (self.k
                * (0.5 * phi + FRAC_PI_4).tan().powf(self.c)
                * srat(self.e * phi.sin(), self.ratexp))
            .atan()
            - FRAC_PI_2;
        (self.c * lambda, chi)
    }

    /// Gauss sphere back to geodetic.
    fn inverse_gauss(&self, lambda: f64, chi: f64) -> Result<(f64, f64), ProjError> {
        let lambda = lambda / self.c;
        let num = ((0.5 * chi + FRAC_PI_4).tan() / self.k).powf(1.0 / self.c);
        let mut phi = chi;
        for _ in 0..MAXIMUM_ITERATIONS {
            let next =
                2.0 * (num * srat(self.e * phi.sin(), -0.5 * self.e)).atan() - FRAC_PI_2;
            if (next - phi).abs() < FINE_ITERATION_TOLERANCE {
                return Ok((lambda, next));
            }
            phi = next;
        }
        Err(ProjError::no_convergence(
            "Gauss conformal sphere inverse",
            MAXIMUM_ITERATIONS,
        ))
    }
}

impl NormalizedProjection for DoubleStereographic {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (lambda_c, chi) = self.gauss(lambda, phi);
        let (sin_c, cos_c) = chi.sin_cos();
        let cos_l = lambda_c.cos();
        let denom = 1.0 + self.sin_c0 * sin_c + self.cos_c0 * cos_c * cos_l;
        if denom < EPSILON {
            return Err(antipode(lambda, phi));
        }
        let k = self.r2 / denom;
        Ok((
            k * cos_c * lambda_c.sin(),
            k * (self.cos_c0 * sin_c - self.sin_c0 * cos_c * cos_l),
        ))
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rho = x.hypot(y);
        let (lambda_c, chi) = if rho == 0.0 {
            (0.0, self.phic0)
        } else {
            let c = 2.0 * rho.atan2(self.r2);
            let (sin_c, cos_c) = c.sin_cos();
            (
                (x * sin_c).atan2(rho * self.cos_c0 * cos_c - y * self.sin_c0 * sin_c),
                (cos_c * self.sin_c0 + y * sin_c * self.cos_c0 / rho)
                    .clamp(-1.0, 1.0)
                    .asin(),
            )
        };
        self.inverse_gauss(lambda_c, chi)
    }
}

fn antipode(lambda: f64, phi: f64) -> ProjError {
    ProjError::outside(
        lambda.to_degrees(),
        phi.to_degrees(),
        "antipode of the projection centre",
    )
}
