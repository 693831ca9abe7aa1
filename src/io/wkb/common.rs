//! The WKB geometry type registry and byte-order flag.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::coord_type::CoordType;
use crate::error::{GeoScalarError, GeoScalarResult};
use crate::geometry::GeometryKind;

/// WKB byte order flag, the first byte of every geometry header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Endianness {
    /// Network byte order (XDR).
    BigEndian = 0,
    /// Little-endian (NDR), the common default.
    LittleEndian = 1,
}

// EWKB flag bits (PostGIS convention).
const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// A decomposed WKB geometry type code.
///
/// ISO SQL/MM encodes dimensionality as offsets of 1000/2000/3000 over the
/// base 2D codes 1..=7 (Z/M/ZM respectively); EWKB instead sets high flag
/// bits, plus one more announcing a trailing SRID field. Decoding accepts
/// either convention (and mixtures); encoding picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WkbType {
    /// The geometry kind.
    pub kind: GeometryKind,
    /// The coordinate type signaled by the code.
    pub coord_type: CoordType,
    /// True when an EWKB SRID field follows the type code.
    pub has_srid: bool,
}

impl WkbType {
    /// Decomposes a raw type code.
    pub fn from_code(code: u32) -> GeoScalarResult<Self> {
        let has_srid = code & EWKB_SRID != 0;
        let ewkb_z = code & EWKB_Z != 0;
        let ewkb_m = code & EWKB_M != 0;
        let code = code & !(EWKB_Z | EWKB_M | EWKB_SRID);
        let (base, iso_z, iso_m) = match code / 1000 {
            0 => (code, false, false),
            1 => (code % 1000, true, false),
            2 => (code % 1000, false, true),
            3 => (code % 1000, true, true),
            _ => {
                return Err(GeoScalarError::UnsupportedType(format!(
                    "WKB geometry type code {code}"
                )))
            }
        };
        let kind = match base {
            1 => GeometryKind::Point,
            2 => GeometryKind::LineString,
            3 => GeometryKind::Polygon,
            4 => GeometryKind::MultiPoint,
            5 => GeometryKind::MultiLineString,
            6 => GeometryKind::MultiPolygon,
            7 => GeometryKind::GeometryCollection,
            _ => {
                return Err(GeoScalarError::UnsupportedType(format!(
                    "WKB geometry type code {code}"
                )))
            }
        };
        Ok(Self {
            kind,
            coord_type: CoordType::select(iso_z || ewkb_z, iso_m || ewkb_m),
            has_srid,
        })
    }

    /// The raw type code, in ISO offset form or EWKB flag form.
    pub fn code(&self, extended: bool) -> u32 {
        let base = match self.kind {
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
            GeometryKind::MultiPoint => 4,
            GeometryKind::MultiLineString => 5,
            GeometryKind::MultiPolygon => 6,
            GeometryKind::GeometryCollection => 7,
        };
        if extended {
            let mut code = base;
            if self.coord_type.is_3d() {
                code |= EWKB_Z;
            }
            if self.coord_type.is_measured() {
                code |= EWKB_M;
            }
            if self.has_srid {
                code |= EWKB_SRID;
            }
            code
        } else {
            let offset = match (self.coord_type.is_3d(), self.coord_type.is_measured()) {
                (false, false) => 0,
                (true, false) => 1000,
                (false, true) => 2000,
                (true, true) => 3000,
            };
            base + offset
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn iso_codes() {
        let t = WkbType::from_code(1).unwrap();
        assert_eq!(t.kind, GeometryKind::Point);
        assert_eq!(t.coord_type, CoordType::XY);
        assert!(!t.has_srid);

        let t = WkbType::from_code(1003).unwrap();
        assert_eq!(t.kind, GeometryKind::Polygon);
        assert_eq!(t.coord_type, CoordType::XYZ);

        let t = WkbType::from_code(2002).unwrap();
        assert_eq!(t.kind, GeometryKind::LineString);
        assert_eq!(t.coord_type, CoordType::XYM);

        let t = WkbType::from_code(3007).unwrap();
        assert_eq!(t.kind, GeometryKind::GeometryCollection);
        assert_eq!(t.coord_type, CoordType::XYZM);

        assert!(WkbType::from_code(0).is_err());
        assert!(WkbType::from_code(8).is_err());
        assert!(WkbType::from_code(4001).is_err());
    }

    #[test]
    fn ewkb_flag_codes() {
        let t = WkbType::from_code(1 | 0x8000_0000 | 0x4000_0000).unwrap();
        assert_eq!(t.kind, GeometryKind::Point);
        assert_eq!(t.coord_type, CoordType::XYZM);

        let t = WkbType::from_code(2 | 0x2000_0000).unwrap();
        assert_eq!(t.kind, GeometryKind::LineString);
        assert!(t.has_srid);
    }

    #[test]
    fn code_round_trips_both_flavors() {
        for kind in [
            GeometryKind::Point,
            GeometryKind::LineString,
            GeometryKind::Polygon,
            GeometryKind::MultiPoint,
            GeometryKind::MultiLineString,
            GeometryKind::MultiPolygon,
            GeometryKind::GeometryCollection,
        ] {
            for coord_type in [
                CoordType::XY,
                CoordType::XYZ,
                CoordType::XYM,
                CoordType::XYZM,
            ] {
                let t = WkbType {
                    kind,
                    coord_type,
                    has_srid: false,
                };
                assert_eq!(WkbType::from_code(t.code(false)).unwrap(), t);
                assert_eq!(WkbType::from_code(t.code(true)).unwrap(), t);
            }
        }
    }

    #[test]
    fn endianness_bytes() {
        assert_eq!(u8::from(Endianness::LittleEndian), 1);
        assert_eq!(u8::from(Endianness::BigEndian), 0);
        assert!(Endianness::try_from(2u8).is_err());
    }
}
