//! The coordinate dimensionality classifier shared by positions, boxes and
//! position series.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{GeoScalarError, GeoScalarResult};

/// The coordinate type of a position, box or series.
///
/// Exactly one variant describes any instance at a time. All derived
/// properties (dimension count, presence of z/m, index of the m axis) are
/// pure functions of the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordType {
    /// Two-dimensional.
    XY,

    /// Three-dimensional.
    XYZ,

    /// XYM (2D with measure).
    XYM,

    /// XYZM (3D with measure).
    XYZM,
}

impl CoordType {
    /// Returns true if the type carries a z axis.
    pub fn is_3d(&self) -> bool {
        matches!(self, CoordType::XYZ | CoordType::XYZM)
    }

    /// Returns true if the type carries an m axis.
    pub fn is_measured(&self) -> bool {
        matches!(self, CoordType::XYM | CoordType::XYZM)
    }

    /// Returns the number of coordinate values per position.
    pub fn dim(&self) -> usize {
        match self {
            CoordType::XY => 2,
            CoordType::XYZ => 3,
            CoordType::XYM => 3,
            CoordType::XYZM => 4,
        }
    }

    /// Returns the index of the m axis within a flat coordinate tuple, if
    /// the type is measured.
    pub fn index_for_m(&self) -> Option<usize> {
        match self {
            CoordType::XY | CoordType::XYZ => None,
            CoordType::XYM => Some(2),
            CoordType::XYZM => Some(3),
        }
    }

    /// Selects the coordinate type carrying the given axes.
    pub fn select(is_3d: bool, is_measured: bool) -> Self {
        match (is_3d, is_measured) {
            (false, false) => CoordType::XY,
            (true, false) => CoordType::XYZ,
            (false, true) => CoordType::XYM,
            (true, true) => CoordType::XYZM,
        }
    }

    /// The coordinate type for a flat tuple of `dim` values.
    ///
    /// Three values resolve to [CoordType::XYZ], never [CoordType::XYM]; a
    /// measured 3-value tuple must be requested explicitly. This default
    /// keeps compatibility with data encoded under the same convention.
    pub fn from_dim(dim: usize) -> GeoScalarResult<Self> {
        match dim {
            2 => Ok(CoordType::XY),
            3 => Ok(CoordType::XYZ),
            4 => Ok(CoordType::XYZM),
            _ => Err(GeoScalarError::MalformedCoordinates(format!(
                "no coordinate type has dimension {dim}"
            ))),
        }
    }

    /// This type widened to carry a z axis.
    pub fn with_z(self) -> Self {
        Self::select(true, self.is_measured())
    }

    /// This type widened to carry an m axis.
    pub fn with_m(self) -> Self {
        Self::select(self.is_3d(), true)
    }

    /// The WKT tag suffix for this type (`""`, `" Z"`, `" M"` or `" ZM"`).
    pub fn wkt_suffix(&self) -> &'static str {
        match self {
            CoordType::XY => "",
            CoordType::XYZ => " Z",
            CoordType::XYM => " M",
            CoordType::XYZM => " ZM",
        }
    }
}

impl Display for CoordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordType::XY => write!(f, "XY"),
            CoordType::XYZ => write!(f, "XYZ"),
            CoordType::XYM => write!(f, "XYM"),
            CoordType::XYZM => write!(f, "XYZM"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derived_properties() {
        assert!(!CoordType::XY.is_3d());
        assert!(!CoordType::XY.is_measured());
        assert!(CoordType::XYZ.is_3d());
        assert!(!CoordType::XYZ.is_measured());
        assert!(!CoordType::XYM.is_3d());
        assert!(CoordType::XYM.is_measured());
        assert!(CoordType::XYZM.is_3d());
        assert!(CoordType::XYZM.is_measured());

        assert_eq!(CoordType::XY.dim(), 2);
        assert_eq!(CoordType::XYZ.dim(), 3);
        assert_eq!(CoordType::XYM.dim(), 3);
        assert_eq!(CoordType::XYZM.dim(), 4);

        assert_eq!(CoordType::XY.index_for_m(), None);
        assert_eq!(CoordType::XYZ.index_for_m(), None);
        assert_eq!(CoordType::XYM.index_for_m(), Some(2));
        assert_eq!(CoordType::XYZM.index_for_m(), Some(3));
    }

    #[test]
    fn select_round_trips() {
        for coord_type in [
            CoordType::XY,
            CoordType::XYZ,
            CoordType::XYM,
            CoordType::XYZM,
        ] {
            assert_eq!(
                CoordType::select(coord_type.is_3d(), coord_type.is_measured()),
                coord_type
            );
        }
    }

    #[test]
    fn from_dim_defaults_to_xyz() {
        assert_eq!(CoordType::from_dim(2).unwrap(), CoordType::XY);
        assert_eq!(CoordType::from_dim(3).unwrap(), CoordType::XYZ);
        assert_eq!(CoordType::from_dim(4).unwrap(), CoordType::XYZM);
        assert!(CoordType::from_dim(1).is_err());
        assert!(CoordType::from_dim(5).is_err());
    }

    #[test]
    fn widening() {
        assert_eq!(CoordType::XY.with_z(), CoordType::XYZ);
        assert_eq!(CoordType::XY.with_m(), CoordType::XYM);
        assert_eq!(CoordType::XYM.with_z(), CoordType::XYZM);
        assert_eq!(CoordType::XYZ.with_m(), CoordType::XYZM);
        assert_eq!(CoordType::XYZM.with_z(), CoordType::XYZM);
    }
}
