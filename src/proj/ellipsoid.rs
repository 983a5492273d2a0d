use crate::error::ProjError;

/// Reference ellipsoid parameters, with the derived shape constants
/// every projection family reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Semi-minor axis (metres)
    pub b: f64,
    /// Flattening: (a - b) / a
    pub f: f64,
    /// First eccentricity
    pub e: f64,
    /// First eccentricity squared: 1 - b²/a²
    pub e2: f64,
    /// Second eccentricity squared: e² / (1 - e²)
    pub ep2: f64,
    /// Third flattening: (a - b) / (a + b)
    pub n: f64,
}

impl Ellipsoid {
    /// Build from semi-major and semi-minor axes, `a >= b > 0`.
    pub fn from_axes(a: f64, b: f64) -> Result<Self, ProjError> {
        if !(a.is_finite() && a > 0.0) {
            return Err(ProjError::invalid("semi_major", a, "must be positive"));
        }
        if !(b.is_finite() && b > 0.0) {
            return Err(ProjError::invalid("semi_minor", b, "must be positive"));
        }
        if b > a {
            return Err(ProjError::invalid(
                "semi_minor",
                b,
                format!("must not exceed the semi-major axis {a}"),
            ));
        }
        Ok(Self::from_axes_unchecked(a, b))
    }

    /// Build from semi-major axis and inverse flattening.
    pub fn from_inverse_flattening(a: f64, inv_f: f64) -> Result<Self, ProjError> {
        if inv_f.is_infinite() {
            return Self::from_axes(a, a);
        }
        if inv_f.is_nan() || inv_f <= 1.0 {
            return Err(ProjError::invalid(
                "inverse_flattening",
                inv_f,
                "must be greater than 1",
            ));
        }
        Self::from_axes(a, a * (1.0 - 1.0 / inv_f))
    }

    /// A sphere of the given radius.
    pub fn sphere(radius: f64) -> Result<Self, ProjError> {
        Self::from_axes(radius, radius)
    }

    fn from_axes_unchecked(a: f64, b: f64) -> Self {
        let f = (a - b) / a;
        let e2 = 1.0 - (b * b) / (a * a);
        Self {
            a,
            b,
            f,
            e: e2.sqrt(),
            e2,
            ep2: e2 / (1.0 - e2),
            n: (a - b) / (a + b),
        }
    }

    pub fn wgs84() -> Self {
        Self::from_axes_unchecked(6_378_137.0, 6_378_137.0 * (1.0 - 1.0 / 298.257_223_563))
    }

    pub fn grs80() -> Self {
        Self::from_axes_unchecked(6_378_137.0, 6_378_137.0 * (1.0 - 1.0 / 298.257_222_101))
    }

    /// `a == b`.
    pub fn is_spherical(&self) -> bool {
        self.a == self.b
    }

    pub fn eccentricity(&self) -> f64 {
        self.e
    }
}
