//! Named projection parameters: descriptors, value sets, and the resolver
//! turning public values (degrees, metres) into internal ones (radians).

use std::collections::BTreeMap;

use crate::error::ProjError;

/// Unit a parameter is expressed in at the public boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// Decimal degrees publicly, radians internally.
    Degree,
    /// The ellipsoid's linear unit.
    Metre,
    /// Dimensionless.
    Unity,
}

impl Unit {
    fn to_internal(self, value: f64) -> f64 {
        match self {
            Unit::Degree => value.to_radians(),
            Unit::Metre | Unit::Unity => value,
        }
    }

    fn to_public(self, value: f64) -> f64 {
        match self {
            Unit::Degree => fix_rounding_error(value.to_degrees()),
            Unit::Metre | Unit::Unity => value,
        }
    }
}

/// Describes one named parameter: its unit, default, and valid range
/// (inclusive, in public units).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub unit: Unit,
    pub default: Option<f64>,
    pub minimum: f64,
    pub maximum: f64,
}

pub const SEMI_MAJOR: ParameterDescriptor = ParameterDescriptor {
    name: "semi_major",
    aliases: &["semi_major_axis", "a"],
    unit: Unit::Metre,
    default: None,
    minimum: f64::MIN_POSITIVE,
    maximum: f64::INFINITY,
};

pub const SEMI_MINOR: ParameterDescriptor = ParameterDescriptor {
    name: "semi_minor",
    aliases: &["semi_minor_axis", "b"],
    unit: Unit::Metre,
    default: None,
    minimum: f64::MIN_POSITIVE,
    maximum: f64::INFINITY,
};

pub const CENTRAL_MERIDIAN: ParameterDescriptor = ParameterDescriptor {
    name: "central_meridian",
    aliases: &["longitude_of_origin", "longitude_of_center", "longitude_of_natural_origin"],
    unit: Unit::Degree,
    default: Some(0.0),
    minimum: -180.0,
    maximum: 180.0,
};

pub const LATITUDE_OF_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    name: "latitude_of_origin",
    aliases: &["latitude_of_center", "latitude_of_natural_origin"],
    unit: Unit::Degree,
    default: Some(0.0),
    minimum: -90.0,
    maximum: 90.0,
};

pub const SCALE_FACTOR: ParameterDescriptor = ParameterDescriptor {
    name: "scale_factor",
    aliases: &["scale_factor_at_natural_origin", "k0"],
    unit: Unit::Unity,
    default: Some(1.0),
    minimum: f64::MIN_POSITIVE,
    maximum: f64::INFINITY,
};

pub const FALSE_EASTING: ParameterDescriptor = ParameterDescriptor {
    name: "false_easting",
    aliases: &["easting_at_false_origin"],
    unit: Unit::Metre,
    default: Some(0.0),
    minimum: f64::NEG_INFINITY,
    maximum: f64::INFINITY,
};

pub const FALSE_NORTHING: ParameterDescriptor = ParameterDescriptor {
    name: "false_northing",
    aliases: &["northing_at_false_origin"],
    unit: Unit::Metre,
    default: Some(0.0),
    minimum: f64::NEG_INFINITY,
    maximum: f64::INFINITY,
};

pub const STANDARD_PARALLEL_1: ParameterDescriptor = ParameterDescriptor {
    name: "standard_parallel_1",
    aliases: &["latitude_of_1st_standard_parallel", "latitude_of_standard_parallel"],
    unit: Unit::Degree,
    default: None,
    minimum: -90.0,
    maximum: 90.0,
};

pub const STANDARD_PARALLEL_2: ParameterDescriptor = ParameterDescriptor {
    name: "standard_parallel_2",
    aliases: &["latitude_of_2nd_standard_parallel"],
    unit: Unit::Degree,
    default: None,
    minimum: -90.0,
    maximum: 90.0,
};

/// Mercator 2SP allows the equator as its standard parallel.
pub const STANDARD_PARALLEL_1_OR_EQUATOR: ParameterDescriptor = ParameterDescriptor {
    default: Some(0.0),
    ..STANDARD_PARALLEL_1
};

/// Polar stereographic variant A: the origin is one of the poles.
pub const POLAR_LATITUDE_OF_ORIGIN: ParameterDescriptor = ParameterDescriptor {
    default: Some(90.0),
    ..LATITUDE_OF_ORIGIN
};

impl ParameterDescriptor {
    /// Value supplied for this parameter (by name or alias), in public units.
    pub fn lookup(&self, values: &ParameterSet) -> Option<f64> {
        values
            .get(self.name)
            .or_else(|| self.aliases.iter().find_map(|alias| values.get(alias)))
    }

    /// Resolve to an internal value (radians for angles).
    ///
    /// Falls back to the default when absent, and to NaN when there is no
    /// default either.
    pub fn value(&self, values: &ParameterSet) -> Result<f64, ProjError> {
        match self.lookup(values) {
            Some(v) => {
                self.validate(v)?;
                Ok(self.unit.to_internal(v))
            }
            None => Ok(self.default.map_or(f64::NAN, |d| self.unit.to_internal(d))),
        }
    }

    /// Like [`value`](Self::value), but an absent parameter without default
    /// is an error.
    pub fn required(&self, values: &ParameterSet) -> Result<f64, ProjError> {
        let v = self.value(values)?;
        if v.is_nan() {
            return Err(ProjError::ParameterNotFound(self.name.to_string()));
        }
        Ok(v)
    }

    /// Write an internal value back, converting to public units.
    ///
    /// Angles get a rounding correction so that a literal like `46.8` or
    /// `2/3°` read in and written out again comes back unchanged.
    pub fn store(&self, values: &mut ParameterSet, value: f64) {
        values.insert(self.name, self.unit.to_public(value));
    }

    fn validate(&self, value: f64) -> Result<(), ProjError> {
        if value.is_nan() || value < self.minimum || value > self.maximum {
            return Err(ProjError::invalid(
                self.name,
                value,
                format!("expected a value in [{}, {}]", self.minimum, self.maximum),
            ));
        }
        Ok(())
    }
}

/// Rounds to 12 significant digits, then snaps to the nearest multiple
/// of 1/3 when within the error that rounding could have introduced.
pub fn fix_rounding_error(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10f64.powi(11 - magnitude);
    let rounded = (value * scale).round() / scale;
    if !rounded.is_finite() {
        return value;
    }
    // Three half-steps of the 12-digit grid, once tripled.
    let thirds = rounded * 3.0;
    let nearest = thirds.round();
    if (thirds - nearest).abs() <= 1.5 / scale {
        nearest / 3.0
    } else {
        rounded
    }
}

/// A named set of parameter values in public units.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")
)]
pub struct ParameterSet {
    values: BTreeMap<String, f64>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value. Names are case-insensitive.
    pub fn insert(&mut self, name: &str, value: f64) -> Option<f64> {
        self.values.insert(name.to_ascii_lowercase(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.values.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<BTreeMap<String, f64>> for ParameterSet {
    fn from(values: BTreeMap<String, f64>) -> Self {
        values.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }
}

impl From<ParameterSet> for BTreeMap<String, f64> {
    fn from(set: ParameterSet) -> Self {
        set.values
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_converted_to_radians() {
        let set = ParameterSet::new().with("central_meridian", -96.0);
        assert_relative_eq!(
            CENTRAL_MERIDIAN.value(&set).unwrap(),
            (-96.0_f64).to_radians()
        );
    }

    #[test]
    fn test_alias_and_case() {
        let set = ParameterSet::new().with("Longitude_Of_Center", 12.5);
        assert_relative_eq!(CENTRAL_MERIDIAN.value(&set).unwrap(), 12.5_f64.to_radians());
    }

    #[test]
    fn test_default_and_missing() {
        let set = ParameterSet::new();
        assert_eq!(SCALE_FACTOR.value(&set).unwrap(), 1.0);
        assert_eq!(FALSE_EASTING.value(&set).unwrap(), 0.0);
        assert!(STANDARD_PARALLEL_1.value(&set).unwrap().is_nan());
        assert_eq!(
            STANDARD_PARALLEL_1.required(&set),
            Err(ProjError::ParameterNotFound("standard_parallel_1".into()))
        );
        assert!(matches!(
            SEMI_MAJOR.required(&set),
            Err(ProjError::ParameterNotFound(_))
        ));
    }

    #[test]
    fn test_out_of_range() {
        let set = ParameterSet::new().with("latitude_of_origin", 91.0);
        assert!(matches!(
            LATITUDE_OF_ORIGIN.value(&set),
            Err(ProjError::InvalidParameterValue { .. })
        ));
        let set = ParameterSet::new().with("scale_factor", 0.0);
        assert!(SCALE_FACTOR.value(&set).is_err());
        let set = ParameterSet::new().with("central_meridian", f64::NAN);
        assert!(CENTRAL_MERIDIAN.value(&set).is_err());
    }

    #[test]
    fn test_store_recovers_literal_degrees() {
        let mut set = ParameterSet::new();
        for literal in [46.8, -123.0, 29.5, 0.1, 4.356_939_722_22, 52.156_160_555_6] {
            CENTRAL_MERIDIAN.store(&mut set, f64::to_radians(literal));
            assert_eq!(set.get("central_meridian"), Some(literal));
        }
    }

    #[test]
    fn test_store_snaps_thirds() {
        let mut set = ParameterSet::new();
        LATITUDE_OF_ORIGIN.store(&mut set, (2.0_f64 / 3.0).to_radians());
        assert_eq!(set.get("latitude_of_origin"), Some(2.0 / 3.0));
        LATITUDE_OF_ORIGIN.store(&mut set, (49.0 + 40.0 / 60.0_f64).to_radians());
        assert_eq!(set.get("latitude_of_origin"), Some(149.0 / 3.0));
    }

    #[test]
    fn test_store_keeps_twelve_digit_literals() {
        assert_eq!(fix_rounding_error(10.000_000_000_1), 10.000_000_000_1);
        assert_eq!(fix_rounding_error(-0.333_333_333_3), -0.333_333_333_3);
        let mut set = ParameterSet::new();
        LATITUDE_OF_ORIGIN.store(&mut set, 10.000_000_000_1_f64.to_radians());
        assert_eq!(set.get("latitude_of_origin"), Some(10.000_000_000_1));
    }

    #[test]
    fn test_store_linear_untouched() {
        let mut set = ParameterSet::new();
        FALSE_NORTHING.store(&mut set, 5_400_088.438);
        assert_eq!(set.get("false_northing"), Some(5_400_088.438));
    }

    #[test]
    fn test_fix_rounding_error() {
        assert_eq!(fix_rounding_error(0.0), 0.0);
        assert_eq!(fix_rounding_error(45.000_000_000_000_01), 45.0);
        assert_eq!(fix_rounding_error(-0.333_333_333_333_333_3), -1.0 / 3.0);
        assert!(fix_rounding_error(f64::NAN).is_nan());
    }
}
