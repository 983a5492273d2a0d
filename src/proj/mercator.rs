//! Mercator projection, 1SP and 2SP.
//!
//!   forward: x = λ, y = asinh(tan φ) - e·atanh(e·sin φ)   (sphere: asinh(tan φ))
//!   inverse: λ = x, φ = series(χ), χ = π/2 - 2·atan(exp(-y))
//!
//! The 2SP variant only differs by its scale factor, msfn(φ₁), which the
//! provider folds into the kernel's global scale.

use std::f64::consts::FRAC_PI_2;

use crate::error::ProjError;
use crate::proj::common::{ConformalSeries, EPSILON};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::{Branch, NormalizedProjection};

#[derive(Clone, Debug)]
pub struct Mercator {
    e: f64,
    series: ConformalSeries,
    branch: Branch,
}

impl Mercator {
    pub fn new(ellipsoid: &Ellipsoid, branch: Branch) -> Self {
        Self {
            e: ellipsoid.e,
            series: ConformalSeries::new(ellipsoid.e2),
            branch,
        }
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }
}

impl NormalizedProjection for Mercator {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        if phi.abs() > FRAC_PI_2 - EPSILON {
            return Err(ProjError::outside(
                lambda.to_degrees(),
                phi.to_degrees(),
                "poles are at infinity",
            ));
        }
        // Isometric latitude, exact zero on the equator.
        let (sin_phi, cos_phi) = phi.sin_cos();
        let y = match self.branch {
            Branch::Spherical => (sin_phi / cos_phi).asinh(),
            Branch::Ellipsoidal => (sin_phi / cos_phi).asinh() - self.e * (self.e * sin_phi).atanh(),
        };
        Ok((lambda, y))
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let chi = FRAC_PI_2 - 2.0 * (-y).exp().atan();
        let phi = match self.branch {
            Branch::Spherical => chi,
            Branch::Ellipsoidal => self.series.latitude(chi),
        };
        Ok((x, phi))
    }
}
