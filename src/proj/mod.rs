pub mod albers_equal_area;
pub mod common;
pub mod ellipsoid;
pub mod kernel;
pub mod lambert_conformal;
pub mod mercator;
pub mod orthographic;
pub mod provider;
pub mod stereographic;
pub mod transverse_mercator;
pub mod verify;

use crate::error::ProjError;

use self::albers_equal_area::AlbersEqualArea;
use self::ellipsoid::Ellipsoid;
use self::lambert_conformal::LambertConformal;
use self::mercator::Mercator;
use self::orthographic::Orthographic;
use self::stereographic::Stereographic;
use self::transverse_mercator::TransverseMercator;

/// The per-family half of a map projection, working on normalized
/// coordinates: radians, central meridian removed, unit semi-major axis,
/// before scale and false origin are applied.
pub trait NormalizedProjection: Send + Sync {
    /// Forward: (λ, φ) -> (x, y)
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError>;

    /// Inverse: (x, y) -> (λ, φ)
    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;
}

/// Which formula set a family evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    /// Closed spherical formulas, only valid when e = 0.
    Spherical,
    /// General ellipsoidal formulas, valid for any e including 0.
    Ellipsoidal,
}

impl Branch {
    pub fn for_ellipsoid(ellipsoid: &Ellipsoid) -> Self {
        if ellipsoid.is_spherical() {
            Branch::Spherical
        } else {
            Branch::Ellipsoidal
        }
    }
}

/// Closed set of projection families with their precomputed constants.
#[derive(Clone, Debug)]
pub enum Family {
    AlbersEqualArea(AlbersEqualArea),
    LambertConformal(LambertConformal),
    Mercator(Mercator),
    TransverseMercator(TransverseMercator),
    Orthographic(Orthographic),
    Stereographic(Stereographic),
}

impl Family {
    pub fn branch(&self) -> Branch {
        match self {
            Family::AlbersEqualArea(p) => p.branch(),
            Family::LambertConformal(p) => p.branch(),
            Family::Mercator(p) => p.branch(),
            Family::TransverseMercator(p) => p.branch(),
            Family::Orthographic(_) => Branch::Spherical,
            Family::Stereographic(p) => p.branch(),
        }
    }
}

impl NormalizedProjection for Family {
    fn transform_normalized(&self, lambda: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        match self {
            Family::AlbersEqualArea(p) => p.transform_normalized(lambda, phi),
            Family::LambertConformal(p) => p.transform_normalized(lambda, phi),
            Family::Mercator(p) => p.transform_normalized(lambda, phi),
            Family::TransverseMercator(p) => p.transform_normalized(lambda, phi),
            Family::Orthographic(p) => p.transform_normalized(lambda, phi),
            Family::Stereographic(p) => p.transform_normalized(lambda, phi),
        }
    }

    fn inverse_transform_normalized(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        match self {
            Family::AlbersEqualArea(p) => p.inverse_transform_normalized(x, y),
            Family::LambertConformal(p) => p.inverse_transform_normalized(x, y),
            Family::Mercator(p) => p.inverse_transform_normalized(x, y),
            Family::TransverseMercator(p) => p.inverse_transform_normalized(x, y),
            Family::Orthographic(p) => p.inverse_transform_normalized(x, y),
            Family::Stereographic(p) => p.inverse_transform_normalized(x, y),
        }
    }
}
