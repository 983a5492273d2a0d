//! Orthographic projection (Snyder 20-3 .. 20-19), spherical formulas only.
//!
//! Only the hemisphere facing the projection centre is visible; points
//! behind it have no image.

use std::f64::consts::FRAC_PI_2;

use crate::error::ProjError;
use crate::proj::common::EPSILON;
use crate::proj::NormalizedProjection;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Aspect {
    NorthPole,
    SouthPole,
    Equatorial,
    Oblique { sin0: f64, cos0: f64 },
}

#[derive(Clone, Debug)]
pub struct Orthographic {
    lat0: f64,
    aspect: Aspect,
}

impl Orthographic {
    pub fn new(lat0: f64) -> Self {
        let aspect = if (lat0 - FRAC_PI_2).abs() < EPSILON {
            Aspect::NorthPole
        } else if (lat0 + FRAC_PI_2).abs() < EPSILON {
            Aspect::SouthPole
        } else if lat0.abs() < EPSILON {
            Aspect::Equatorial
        } else {
            let (sin0, cos0) = lat0.sin_cos();
            Aspect::Oblique { sin0, cos0 }
        };
        Self { lat0, aspect }
    }

    pub fn aspect(&self) -> Aspect {
        self.aspect
    }
}

impl NormalizedProjection for Orthographic {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_l, cos_l) = lambda.sin_cos();
        // cos c: cosine of the angular distance from the centre
        let (cos_c, y) = match self.aspect {
            Aspect::NorthPole => (sin_phi, -cos_phi * cos_l),
            Aspect::SouthPole => (-sin_phi, cos_phi * cos_l),
            Aspect::Equatorial => (cos_phi * cos_l, sin_phi),
            Aspect::Oblique { sin0, cos0 } => (
                sin0 * sin_phi + cos0 * cos_phi * cos_l,
                cos0 * sin_phi - sin0 * cos_phi * cos_l,
            ),
        };
        if cos_c < -EPSILON {
            return Err(ProjError::outside(
                lambda.to_degrees(),
                phi.to_degrees(),
                "on the far side of the globe",
            ));
        }
        Ok((cos_phi * sin_l, y))
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let mut rho = x.hypot(y);
        if rho > 1.0 + EPSILON {
            return Err(ProjError::outside(x, y, "outside the visible disc"));
        }
        if rho < EPSILON {
            return Ok((0.0, self.lat0));
        }
        if rho > 1.0 {
            rho = 1.0;
        }
        let sin_c = rho;
        let cos_c = (1.0 - rho * rho).sqrt();
        let (lambda, phi) = match self.aspect {
            Aspect::NorthPole => (x.atan2(-y), rho.acos()),
            Aspect::SouthPole => (x.atan2(y), -rho.acos()),
            Aspect::Equatorial => ((x * sin_c).atan2(rho * cos_c), y.clamp(-1.0, 1.0).asin()),
            Aspect::Oblique { sin0, cos0 } => (
                (x * sin_c).atan2(rho * cos0 * cos_c - y * sin0 * sin_c),
                (cos_c * sin0 + y * cos0).clamp(-1.0, 1.0).asin(),
            ),
        };
        Ok((lambda, phi))
    }
}
