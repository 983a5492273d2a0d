//! Forward and inverse map projections: conic, cylindrical and azimuthal
//! families on the sphere and the ellipsoid.

pub mod error;
pub mod parameter;
pub mod proj;

pub use error::ProjError;
pub use parameter::{ParameterDescriptor, ParameterSet, Unit};
pub use proj::ellipsoid::Ellipsoid;
pub use proj::kernel::{InverseProjection, MapProjection, MathTransform2D, ProjectionParameters};
pub use proj::provider::{utm, ProjectionKind};
pub use proj::Branch;
