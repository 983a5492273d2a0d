//! Lambert Conformal Conic projection: 1SP, 2SP and the Belgian 2SP variant.
//!
//! Uses `tsfn`, `msfn`, `phi_from_ts` from common.rs (Snyder 15-1 .. 15-11).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::ProjError;
use crate::proj::common::{msfn, phi_from_ts, tsfn, EPSILON};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::{Branch, NormalizedProjection};

/// Belgian Lambert 1972 rotation of 29.2985″, in radians.
const BELGIUM_OFFSET: f64 = 0.000_142_043_136_359_877;

#[derive(Clone, Debug)]
pub struct LambertConformal {
    e: f64,
    n: f64,     // cone constant
    f_val: f64, // F = m₁/(n·t₁ⁿ)
    rho0: f64,  // ρ₀ = F·t₀ⁿ
    belgium: bool,
    branch: Branch,
}

impl LambertConformal {
    /// Equal standard parallels give the one-parallel form (n = sin φ₁),
    /// the scale factor being applied by the kernel.
    pub fn new(
        ellipsoid: &Ellipsoid,
        lat0: f64,
        lat1: f64,
        lat2: f64,
        belgium: bool,
        branch: Branch,
    ) -> Result<Self, ProjError> {
        if (lat1 + lat2).abs() < EPSILON {
            return Err(ProjError::invalid(
                "standard_parallel_2",
                lat2.to_degrees(),
                "standard parallels are antipodal",
            ));
        }
        let e = ellipsoid.e;
        let e2 = ellipsoid.e2;

        let (sin1, cos1) = lat1.sin_cos();
        let m1 = msfn(sin1, cos1, e2);
        let t1 = tsfn(lat1, sin1, e);

        let n = if (lat1 - lat2).abs() >= EPSILON {
            let (sin2, cos2) = lat2.sin_cos();
            let m2 = msfn(sin2, cos2, e2);
            let t2 = tsfn(lat2, sin2, e);
            (m1 / m2).ln() / (t1 / t2).ln()
        } else {
            sin1
        };

        let f_val = m1 * t1.powf(-n) / n;
        let rho0 = if (lat0.abs() - FRAC_PI_2).abs() < EPSILON {
            0.0
        } else {
            f_val * tsfn(lat0, lat0.sin(), e).powf(n)
        };

        Ok(Self {
            e,
            n,
            f_val,
            rho0,
            belgium,
            branch,
        })
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    pub fn n(&self) -> f64 {
        self.n
    }
}

impl NormalizedProjection for LambertConformal {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let rho = if (phi.abs() - FRAC_PI_2).abs() < EPSILON {
            if phi * self.n <= 0.0 {
                return Err(ProjError::outside(
                    lambda.to_degrees(),
                    phi.to_degrees(),
                    "pole opposite to the apex of the cone",
                ));
            }
            0.0
        } else {
            let t = match self.branch {
                Branch::Spherical => (FRAC_PI_4 + 0.5 * phi).tan().powf(-self.n),
                Branch::Ellipsoidal => tsfn(phi, phi.sin(), self.e).powf(self.n),
            };
            self.f_val * t
        };
        let mut theta = self.n * lambda;
        if self.belgium {
            theta -= BELGIUM_OFFSET;
        }
        Ok((rho * theta.sin(), self.rho0 - rho * theta.cos()))
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (mut x, mut y) = (x, self.rho0 - y);
        let mut rho = x.hypot(y);
        if rho == 0.0 {
            return Ok((0.0, FRAC_PI_2.copysign(self.n)));
        }
        // For n < 0, flip signs before computing angle and radius
        if self.n < 0.0 {
            rho = -rho;
            x = -x;
            y = -y;
        }
        let ts = (rho / self.f_val).powf(1.0 / self.n);
        let phi = match self.branch {
            Branch::Spherical => FRAC_PI_2 - 2.0 * ts.atan(),
            Branch::Ellipsoidal => phi_from_ts(ts, self.e)?,
        };
        let mut theta = x.atan2(y);
        if self.belgium {
            theta += BELGIUM_OFFSET;
        }
        Ok((theta / self.n, phi))
    }
}
