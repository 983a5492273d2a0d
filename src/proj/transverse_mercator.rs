//! Transverse Mercator projection.
//!
//! Ellipsoid: Snyder (1987) series 8-9, 8-10 forward and 8-17, 8-18
//! inverse, with the foot-point latitude found by Newton iteration on the
//! meridian arc. Accuracy is sub-millimetre within a UTM zone and degrades
//! beyond about 15° from the central meridian.
//!
//! Sphere: the exact formulas (Snyder 8-1 .. 8-7).
//!
//! This is the projection underlying all UTM and MTM zones.

use std::f64::consts::FRAC_PI_2;

use crate::error::ProjError;
use crate::proj::common::{MeridianArc, EPSILON};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::{Branch, NormalizedProjection};

#[derive(Clone, Debug)]
pub struct TransverseMercator {
    e2: f64,
    ep2: f64,
    lat0: f64,
    arc: MeridianArc,
    /// Meridian distance to the latitude of origin.
    ml0: f64,
    branch: Branch,
}

impl TransverseMercator {
    pub fn new(ellipsoid: &Ellipsoid, lat0: f64, branch: Branch) -> Self {
        let arc = MeridianArc::new(ellipsoid.e2, ellipsoid.n);
        Self {
            e2: ellipsoid.e2,
            ep2: ellipsoid.ep2,
            lat0,
            arc,
            ml0: arc.distance(lat0),
            branch,
        }
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    fn forward_sphere(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let b = cos_phi * lambda.sin();
        if (b.abs() - 1.0).abs() < EPSILON {
            return Err(ProjError::outside(
                lambda.to_degrees(),
                phi.to_degrees(),
                "90° away from the central meridian on the equator",
            ));
        }
        let x = b.atanh();
        let y = sin_phi.atan2(cos_phi * lambda.cos()) - self.lat0;
        Ok((x, y))
    }

    fn inverse_sphere(&self, x: f64, y: f64) -> (f64, f64) {
        let d = y + self.lat0;
        let phi = (d.sin() / x.cosh()).clamp(-1.0, 1.0).asin();
        let lambda = x.sinh().atan2(d.cos());
        (lambda, phi)
    }

    fn forward_ellipsoid(&self, lambda: f64, phi: f64) -> (f64, f64) {
        if (phi.abs() - FRAC_PI_2).abs() < EPSILON {
            return (0.0, self.arc.distance(phi) - self.ml0);
        }
        let (sin_phi, cos_phi) = phi.sin_cos();
        let t = sin_phi / cos_phi;
        let tt = t * t;
        let c = self.ep2 * cos_phi * cos_phi;
        let n = 1.0 / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        let al = cos_phi * lambda;
        let als = al * al;

        let x = n
            * al
            * (1.0
                + als / 6.0
                    * (1.0 - tt + c
                        + als / 20.0 * (5.0 - 18.0 * tt + tt * tt + 72.0 * c - 58.0 * self.ep2)));
        let y = self.arc.distance(phi) - self.ml0
            + n * t
                * als
                * (0.5
                    + als / 24.0
                        * (5.0 - tt
                            + 9.0 * c
                            + 4.0 * c * c
                            + als / 30.0
                                * (61.0 - 58.0 * tt + tt * tt + 600.0 * c - 330.0 * self.ep2)));
        (x, y)
    }

    fn inverse_ellipsoid(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let phi1 = self.arc.latitude(self.ml0 + y)?;
        if phi1.abs() >= FRAC_PI_2 - EPSILON {
            return Ok((0.0, FRAC_PI_2.copysign(phi1)));
        }
        let (sin_phi, cos_phi) = phi1.sin_cos();
        let t = sin_phi / cos_phi;
        let tt = t * t;
        let c = self.ep2 * cos_phi * cos_phi;
        let w = 1.0 - self.e2 * sin_phi * sin_phi;
        let n = 1.0 / w.sqrt();
        let r = (1.0 - self.e2) / (w * w.sqrt());
        let d = x / n;
        let ds = d * d;

        let phi = phi1
            - (n * t / r)
                * ds
                * (0.5
                    - ds / 24.0
                        * (5.0 + 3.0 * tt + 10.0 * c - 4.0 * c * c - 9.0 * self.ep2
                            - ds / 30.0
                                * (61.0 + 90.0 * tt + 298.0 * c + 45.0 * tt * tt
                                    - 252.0 * self.ep2
                                    - 3.0 * c * c)));
        let lambda = d
            * (1.0
                - ds / 6.0
                    * (1.0 + 2.0 * tt + c
                        - ds / 20.0
                            * (5.0 - 2.0 * c + 28.0 * tt - 3.0 * c * c
                                + 8.0 * self.ep2
                                + 24.0 * tt * tt)))
            / cos_phi;
        Ok((lambda, phi))
    }
}

impl NormalizedProjection for TransverseMercator {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        match self.branch {
            Branch::Spherical => self.forward_sphere(lambda, phi),
            Branch::Ellipsoidal => Ok(self.forward_ellipsoid(lambda, phi)),
        }
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        match self.branch {
            Branch::Spherical => Ok(self.inverse_sphere(x, y)),
            Branch::Ellipsoidal => self.inverse_ellipsoid(x, y),
        }
    }
}
