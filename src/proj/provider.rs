//! Projection providers: the named projection methods, the parameters each
//! one accepts, and the factory turning a parameter set into a
//! [`MapProjection`].

use std::f64::consts::FRAC_PI_2;

use tracing::{debug, warn};

use crate::error::ProjError;
use crate::parameter::{
    ParameterDescriptor, ParameterSet, CENTRAL_MERIDIAN, FALSE_EASTING, FALSE_NORTHING,
    LATITUDE_OF_ORIGIN, POLAR_LATITUDE_OF_ORIGIN, SCALE_FACTOR, SEMI_MAJOR, SEMI_MINOR,
    STANDARD_PARALLEL_1, STANDARD_PARALLEL_1_OR_EQUATOR, STANDARD_PARALLEL_2,
};
use crate::proj::albers_equal_area::AlbersEqualArea;
use crate::proj::common::{msfn, EPSILON};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::kernel::{MapProjection, ProjectionParameters};
use crate::proj::lambert_conformal::LambertConformal;
use crate::proj::mercator::Mercator;
use crate::proj::orthographic::Orthographic;
use crate::proj::stereographic::{
    DoubleStereographic, ObliqueStereographic, PolarInverse, PolarStereographic, Stereographic,
};
use crate::proj::transverse_mercator::TransverseMercator;
use crate::proj::{Branch, Family};

/// The supported projection methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjectionKind {
    AlbersEqualArea,
    LambertConformal1SP,
    LambertConformal2SP,
    LambertConformal2SPBelgium,
    Mercator1SP,
    Mercator2SP,
    TransverseMercator,
    Orthographic,
    /// USGS stereographic: polar, oblique or equatorial depending on the
    /// latitude of origin.
    Stereographic,
    /// EPSG oblique stereographic through the Gauss conformal sphere.
    ObliqueStereographic,
    /// EPSG polar stereographic variant A (origin at a pole).
    PolarStereographic,
    /// EPSG polar stereographic variant B (latitude of true scale).
    PolarStereographicVariantB,
}

const ALBERS_PARAMETERS: &[ParameterDescriptor] = &[
    SEMI_MAJOR,
    SEMI_MINOR,
    CENTRAL_MERIDIAN,
    LATITUDE_OF_ORIGIN,
    STANDARD_PARALLEL_1,
    STANDARD_PARALLEL_2,
    FALSE_EASTING,
    FALSE_NORTHING,
];

const ONE_PARALLEL_PARAMETERS: &[ParameterDescriptor] = &[
    SEMI_MAJOR,
    SEMI_MINOR,
    CENTRAL_MERIDIAN,
    LATITUDE_OF_ORIGIN,
    SCALE_FACTOR,
    FALSE_EASTING,
    FALSE_NORTHING,
];

const MERCATOR_1SP_PARAMETERS: &[ParameterDescriptor] = &[
    SEMI_MAJOR,
    SEMI_MINOR,
    CENTRAL_MERIDIAN,
    SCALE_FACTOR,
    FALSE_EASTING,
    FALSE_NORTHING,
];

const MERCATOR_2SP_PARAMETERS: &[ParameterDescriptor] = &[
    SEMI_MAJOR,
    SEMI_MINOR,
    CENTRAL_MERIDIAN,
    STANDARD_PARALLEL_1_OR_EQUATOR,
    FALSE_EASTING,
    FALSE_NORTHING,
];

const POLAR_A_PARAMETERS: &[ParameterDescriptor] = &[
    SEMI_MAJOR,
    SEMI_MINOR,
    CENTRAL_MERIDIAN,
    POLAR_LATITUDE_OF_ORIGIN,
    SCALE_FACTOR,
    FALSE_EASTING,
    FALSE_NORTHING,
];

const POLAR_B_PARAMETERS: &[ParameterDescriptor] = &[
    SEMI_MAJOR,
    SEMI_MINOR,
    CENTRAL_MERIDIAN,
    STANDARD_PARALLEL_1,
    FALSE_EASTING,
    FALSE_NORTHING,
];

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 12] = [
        ProjectionKind::AlbersEqualArea,
        ProjectionKind::LambertConformal1SP,
        ProjectionKind::LambertConformal2SP,
        ProjectionKind::LambertConformal2SPBelgium,
        ProjectionKind::Mercator1SP,
        ProjectionKind::Mercator2SP,
        ProjectionKind::TransverseMercator,
        ProjectionKind::Orthographic,
        ProjectionKind::Stereographic,
        ProjectionKind::ObliqueStereographic,
        ProjectionKind::PolarStereographic,
        ProjectionKind::PolarStereographicVariantB,
    ];

    /// OGC name of the method.
    pub fn name(self) -> &'static str {
        match self {
            ProjectionKind::AlbersEqualArea => "Albers_Conic_Equal_Area",
            ProjectionKind::LambertConformal1SP => "Lambert_Conformal_Conic_1SP",
            ProjectionKind::LambertConformal2SP => "Lambert_Conformal_Conic_2SP",
            ProjectionKind::LambertConformal2SPBelgium => "Lambert_Conformal_Conic_2SP_Belgium",
            ProjectionKind::Mercator1SP => "Mercator_1SP",
            ProjectionKind::Mercator2SP => "Mercator_2SP",
            ProjectionKind::TransverseMercator => "Transverse_Mercator",
            ProjectionKind::Orthographic => "Orthographic",
            ProjectionKind::Stereographic => "Stereographic",
            ProjectionKind::ObliqueStereographic => "Oblique_Stereographic",
            ProjectionKind::PolarStereographic => "Polar_Stereographic",
            ProjectionKind::PolarStereographicVariantB => "Polar_Stereographic_Variant_B",
        }
    }

    /// EPSG names and PROJ short names accepted by [`from_name`](Self::from_name).
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ProjectionKind::AlbersEqualArea => &["Albers Equal Area", "albers", "aea"],
            ProjectionKind::LambertConformal1SP => &["Lambert Conic Conformal (1SP)"],
            ProjectionKind::LambertConformal2SP => {
                &["Lambert Conic Conformal (2SP)", "Lambert_Conformal_Conic", "lcc"]
            }
            ProjectionKind::LambertConformal2SPBelgium => &["Lambert Conic Conformal (2SP Belgium)"],
            ProjectionKind::Mercator1SP => &["Mercator (variant A)", "Mercator", "merc"],
            ProjectionKind::Mercator2SP => &["Mercator (variant B)"],
            ProjectionKind::TransverseMercator => &["Transverse Mercator", "tmerc"],
            ProjectionKind::Orthographic => &["ortho"],
            ProjectionKind::Stereographic => &["stere"],
            ProjectionKind::ObliqueStereographic => {
                &["Oblique Stereographic", "Double_Stereographic", "sterea"]
            }
            ProjectionKind::PolarStereographic => &["Polar Stereographic (variant A)"],
            ProjectionKind::PolarStereographicVariantB => &["Polar Stereographic (variant B)"],
        }
    }

    /// Look a method up by OGC name or alias, ignoring case.
    pub fn from_name(name: &str) -> Result<Self, ProjError> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.name().eq_ignore_ascii_case(name)
                    || kind.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| ProjError::UnknownProjection(name.to_string()))
    }

    /// The parameters this method reads, in order.
    pub fn descriptors(self) -> &'static [ParameterDescriptor] {
        match self {
            ProjectionKind::AlbersEqualArea
            | ProjectionKind::LambertConformal2SP
            | ProjectionKind::LambertConformal2SPBelgium => ALBERS_PARAMETERS,
            ProjectionKind::LambertConformal1SP
            | ProjectionKind::TransverseMercator
            | ProjectionKind::Orthographic
            | ProjectionKind::Stereographic
            | ProjectionKind::ObliqueStereographic => ONE_PARALLEL_PARAMETERS,
            ProjectionKind::Mercator1SP => MERCATOR_1SP_PARAMETERS,
            ProjectionKind::Mercator2SP => MERCATOR_2SP_PARAMETERS,
            ProjectionKind::PolarStereographic => POLAR_A_PARAMETERS,
            ProjectionKind::PolarStereographicVariantB => POLAR_B_PARAMETERS,
        }
    }

    /// Build a projection, choosing spherical formulas when the
    /// ellipsoid is a sphere.
    pub fn create(self, values: &ParameterSet) -> Result<MapProjection, ProjError> {
        self.build(values, None)
    }

    /// Build a projection evaluating the given formula set. The spherical
    /// branch is only valid on a sphere.
    pub fn create_with_branch(
        self,
        values: &ParameterSet,
        branch: Branch,
    ) -> Result<MapProjection, ProjError> {
        self.build(values, Some(branch))
    }

    fn build(self, values: &ParameterSet, branch: Option<Branch>) -> Result<MapProjection, ProjError> {
        let ellipsoid = Ellipsoid::from_axes(SEMI_MAJOR.required(values)?, SEMI_MINOR.required(values)?)?;
        if branch == Some(Branch::Spherical) && !ellipsoid.is_spherical() {
            return Err(ProjError::IllegalState(format!(
                "spherical formulas requested for {} on an ellipsoid",
                self.name()
            )));
        }
        let branch = branch.unwrap_or_else(|| Branch::for_ellipsoid(&ellipsoid));
        // Parameters the method does not accept keep their neutral value.
        let descriptors = self.descriptors();
        let resolve = |name: &str, neutral: f64| -> Result<f64, ProjError> {
            descriptors
                .iter()
                .find(|d| d.name == name)
                .map_or(Ok(neutral), |d| d.value(values))
        };

        let mut parameters = ProjectionParameters {
            ellipsoid,
            central_meridian: CENTRAL_MERIDIAN.value(values)?,
            latitude_of_origin: resolve(LATITUDE_OF_ORIGIN.name, 0.0)?,
            scale_factor: resolve(SCALE_FACTOR.name, 1.0)?,
            false_easting: FALSE_EASTING.value(values)?,
            false_northing: FALSE_NORTHING.value(values)?,
        };
        let lat0 = parameters.latitude_of_origin;
        let mut extra: Vec<(&'static ParameterDescriptor, f64)> = Vec::new();

        let family = match self {
            ProjectionKind::AlbersEqualArea => {
                let (sp1, sp2) = standard_parallels(values)?;
                extra.extend([(&STANDARD_PARALLEL_1, sp1), (&STANDARD_PARALLEL_2, sp2)]);
                Family::AlbersEqualArea(AlbersEqualArea::new(&ellipsoid, lat0, sp1, sp2, branch)?)
            }
            ProjectionKind::LambertConformal1SP => {
                if lat0.abs() < EPSILON {
                    return Err(ProjError::invalid(
                        LATITUDE_OF_ORIGIN.name,
                        0.0,
                        "a conic with its origin on the equator is degenerate",
                    ));
                }
                Family::LambertConformal(LambertConformal::new(
                    &ellipsoid, lat0, lat0, lat0, false, branch,
                )?)
            }
            ProjectionKind::LambertConformal2SP | ProjectionKind::LambertConformal2SPBelgium => {
                let (sp1, sp2) = standard_parallels(values)?;
                extra.extend([(&STANDARD_PARALLEL_1, sp1), (&STANDARD_PARALLEL_2, sp2)]);
                let belgium = self == ProjectionKind::LambertConformal2SPBelgium;
                Family::LambertConformal(LambertConformal::new(
                    &ellipsoid, lat0, sp1, sp2, belgium, branch,
                )?)
            }
            ProjectionKind::Mercator1SP => Family::Mercator(Mercator::new(&ellipsoid, branch)),
            ProjectionKind::Mercator2SP => {
                let sp1 = STANDARD_PARALLEL_1_OR_EQUATOR.value(values)?;
                if sp1.abs() >= FRAC_PI_2 - EPSILON {
                    return Err(ProjError::invalid(
                        STANDARD_PARALLEL_1.name,
                        sp1.to_degrees(),
                        "a pole can not be the standard parallel of a cylinder",
                    ));
                }
                let (sin1, cos1) = sp1.sin_cos();
                parameters.scale_factor = msfn(sin1, cos1, ellipsoid.e2);
                extra.push((&STANDARD_PARALLEL_1, sp1));
                Family::Mercator(Mercator::new(&ellipsoid, branch))
            }
            ProjectionKind::TransverseMercator => {
                Family::TransverseMercator(TransverseMercator::new(&ellipsoid, lat0, branch))
            }
            ProjectionKind::Orthographic => {
                if !ellipsoid.is_spherical() {
                    warn!(
                        semi_major = ellipsoid.a,
                        semi_minor = ellipsoid.b,
                        "orthographic projection uses spherical formulas on the semi-major axis"
                    );
                }
                Family::Orthographic(Orthographic::new(lat0))
            }
            ProjectionKind::Stereographic => Family::Stereographic(if is_pole(lat0) {
                Stereographic::Polar(PolarStereographic::new(
                    &ellipsoid,
                    lat0 < 0.0,
                    None,
                    PolarInverse::Iterative,
                    branch,
                ))
            } else {
                Stereographic::Oblique(ObliqueStereographic::new(&ellipsoid, lat0, branch))
            }),
            ProjectionKind::ObliqueStereographic => Family::Stereographic(if is_pole(lat0) {
                debug!("oblique stereographic centred on a pole, using the polar formulas");
                Stereographic::Polar(PolarStereographic::new(
                    &ellipsoid,
                    lat0 < 0.0,
                    None,
                    PolarInverse::Series,
                    branch,
                ))
            } else {
                Stereographic::Double(DoubleStereographic::new(&ellipsoid, lat0, branch))
            }),
            ProjectionKind::PolarStereographic => {
                if !is_pole(lat0) {
                    return Err(ProjError::invalid(
                        LATITUDE_OF_ORIGIN.name,
                        lat0.to_degrees(),
                        "polar stereographic variant A is centred on a pole",
                    ));
                }
                Family::Stereographic(Stereographic::Polar(PolarStereographic::new(
                    &ellipsoid,
                    lat0 < 0.0,
                    None,
                    PolarInverse::Series,
                    branch,
                )))
            }
            ProjectionKind::PolarStereographicVariantB => {
                let sp1 = STANDARD_PARALLEL_1.required(values)?;
                if sp1.abs() < EPSILON {
                    return Err(ProjError::invalid(
                        STANDARD_PARALLEL_1.name,
                        0.0,
                        "the latitude of true scale selects the hemisphere and can not be 0",
                    ));
                }
                let south = sp1 < 0.0;
                parameters.latitude_of_origin = if south { -FRAC_PI_2 } else { FRAC_PI_2 };
                extra.push((&STANDARD_PARALLEL_1, sp1));
                Family::Stereographic(Stereographic::Polar(PolarStereographic::new(
                    &ellipsoid,
                    south,
                    Some(sp1),
                    PolarInverse::Series,
                    branch,
                )))
            }
        };

        Ok(MapProjection::new(self, parameters, family, extra))
    }
}

/// First standard parallel (required) and second (defaults to the first).
fn standard_parallels(values: &ParameterSet) -> Result<(f64, f64), ProjError> {
    let sp1 = STANDARD_PARALLEL_1.required(values)?;
    let sp2 = STANDARD_PARALLEL_2.value(values)?;
    Ok((sp1, if sp2.is_nan() { sp1 } else { sp2 }))
}

fn is_pole(lat: f64) -> bool {
    (lat.abs() - FRAC_PI_2).abs() < EPSILON
}

/// Transverse Mercator for a UTM zone (1 to 60).
pub fn utm(zone: u32, north: bool, ellipsoid: Ellipsoid) -> Result<MapProjection, ProjError> {
    if !(1..=60).contains(&zone) {
        return Err(ProjError::invalid("zone", zone as f64, "UTM zones are 1 to 60"));
    }
    let values = ParameterSet::new()
        .with(SEMI_MAJOR.name, ellipsoid.a)
        .with(SEMI_MINOR.name, ellipsoid.b)
        .with(CENTRAL_MERIDIAN.name, 6.0 * zone as f64 - 183.0)
        .with(SCALE_FACTOR.name, 0.9996)
        .with(FALSE_EASTING.name, 500_000.0)
        .with(FALSE_NORTHING.name, if north { 0.0 } else { 10_000_000.0 });
    ProjectionKind::TransverseMercator.create(&values)
}
