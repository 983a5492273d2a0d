//! Albers Equal Area Conic projection.
//!
//! Area-preserving conic (Snyder 14-1 .. 14-6, 14-18) using `qsfn` from
//! common.rs. The inverse is closed-form on the sphere and iterates on the
//! authalic function otherwise.

use std::f64::consts::FRAC_PI_2;

use crate::error::ProjError;
use crate::proj::common::{msfn, phi_from_q, qsfn, EPSILON};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::{Branch, NormalizedProjection};

#[derive(Clone, Debug)]
pub struct AlbersEqualArea {
    e: f64,
    n: f64,
    c: f64,
    rho0: f64,
    /// q at the pole: 1 - (1-e²)/(2e) · ln((1-e)/(1+e))
    ec: f64,
    branch: Branch,
}

impl AlbersEqualArea {
    /// `lat0`, `lat1` and `lat2` in radians. Equal standard parallels give
    /// the one-parallel form with n = sin φ₁.
    pub fn new(
        ellipsoid: &Ellipsoid,
        lat0: f64,
        lat1: f64,
        lat2: f64,
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
        let q1 = qsfn(sin1, e);

        let n = if (lat1 - lat2).abs() >= EPSILON {
            let (sin2, cos2) = lat2.sin_cos();
            let m2 = msfn(sin2, cos2, e2);
            let q2 = qsfn(sin2, e);
            (m1 * m1 - m2 * m2) / (q2 - q1)
        } else {
            sin1
        };

        let c = m1 * m1 + n * q1;
        let rho0 = (c - n * qsfn(lat0.sin(), e)).max(0.0).sqrt() / n;
        let ec = if e < 1e-7 {
            2.0
        } else {
            1.0 - 0.5 * (1.0 - e2) / e * ((1.0 - e) / (1.0 + e)).ln()
        };

        Ok(Self {
            e,
            n,
            c,
            rho0,
            ec,
            branch,
        })
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    /// Cone constant.
    pub fn n(&self) -> f64 {
        self.n
    }

    fn q(&self, phi: f64) -> f64 {
        match self.branch {
            Branch::Spherical => 2.0 * phi.sin(),
            Branch::Ellipsoidal => qsfn(phi.sin(), self.e),
        }
    }
}

impl NormalizedProjection for AlbersEqualArea {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let mut rho2 = self.c - self.n * self.q(phi);
        if rho2 < 0.0 {
            // Rounding at the pole opposite to the apex.
            if rho2 > -EPSILON {
                rho2 = 0.0;
            } else {
                return Err(ProjError::outside(
                    lambda.to_degrees(),
                    phi.to_degrees(),
                    "beyond the pole of the cone",
                ));
            }
        }
        let rho = rho2.sqrt() / self.n;
        let theta = self.n * lambda;
        Ok((rho * theta.sin(), self.rho0 - rho * theta.cos()))
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (mut x, mut y) = (x, self.rho0 - y);
        let mut rho = x.hypot(y);
        if rho == 0.0 {
            return Ok((0.0, FRAC_PI_2.copysign(self.n)));
        }
        if self.n < 0.0 {
            rho = -rho;
            x = -x;
            y = -y;
        }
        let q = (self.c - rho * rho * self.n * self.n) / self.n;
        let phi = match self.branch {
            Branch::Spherical => {
                let s = 0.5 * q;
                if s.abs() >= 1.0 {
                    FRAC_PI_2.copysign(s)
                } else {
                    s.asin()
                }
            }
            Branch::Ellipsoidal => {
                if q.abs() >= self.ec - EPSILON {
                    FRAC_PI_2.copysign(q)
                } else {
                    phi_from_q(q, self.e)?
                }
            }
        };
        Ok((x.atan2(y) / self.n, phi))
    }
}
