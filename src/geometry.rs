//! Owned geometry objects materialized from decoders or built by hand.

use serde::{Deserialize, Serialize};

use crate::coord_type::CoordType;
use crate::error::GeoScalarResult;
use crate::io::builder::GeometryBuilder;
use crate::io::geojson::{read_geojson, GeoJsonOptions, GeoJsonWriter};
use crate::io::wkb::{read_wkb, WkbOptions, WkbWriter};
use crate::io::wkt::{read_wkt, WktOptions, WktWriter};
use crate::io::writer::GeometryWriter;
use crate::position::Position;
use crate::series::PositionSeries;

/// The closed set of geometry kinds all three formats agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// A single position.
    Point,
    /// A position series.
    LineString,
    /// An outer ring with optional holes.
    Polygon,
    /// Zero or more points.
    MultiPoint,
    /// Zero or more line strings.
    MultiLineString,
    /// Zero or more polygons.
    MultiPolygon,
    /// Zero or more geometries of any kind.
    GeometryCollection,
}

impl GeometryKind {
    /// The WKT tag for this kind.
    pub fn wkt_tag(&self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
            GeometryKind::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// The GeoJSON `type` member for this kind.
    pub fn geojson_type(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }
}

/// An owned geometry object.
///
/// Decoders produce these through [GeometryBuilder]; encoders consume them
/// through [`Geometry::write_to`], which replays the geometry onto any
/// [GeometryWriter]. Equality follows
/// [`PositionSeries::equals_coords`]-style exact coordinate comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single position. The NaN sentinel position marks an empty point.
    Point(Position<'static>),
    /// A position series.
    LineString(PositionSeries<'static>),
    /// Rings: the first is the outer boundary, the rest are holes.
    Polygon(Vec<PositionSeries<'static>>),
    /// Zero or more points.
    MultiPoint(Vec<Position<'static>>),
    /// Zero or more line strings.
    MultiLineString(Vec<PositionSeries<'static>>),
    /// Zero or more polygons, each a list of rings.
    MultiPolygon(Vec<Vec<PositionSeries<'static>>>),
    /// Zero or more geometries of any kind.
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// The kind of this geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// The coordinate type of this geometry, taken from its first
    /// coordinate-bearing part (XY for empty aggregates).
    pub fn coord_type(&self) -> CoordType {
        match self {
            Geometry::Point(p) => p.coord_type(),
            Geometry::LineString(s) => s.coord_type(),
            Geometry::Polygon(rings) => rings
                .first()
                .map(|r| r.coord_type())
                .unwrap_or(CoordType::XY),
            Geometry::MultiPoint(points) => points
                .first()
                .map(|p| p.coord_type())
                .unwrap_or(CoordType::XY),
            Geometry::MultiLineString(lines) => lines
                .first()
                .map(|l| l.coord_type())
                .unwrap_or(CoordType::XY),
            Geometry::MultiPolygon(polygons) => polygons
                .first()
                .and_then(|rings| rings.first())
                .map(|r| r.coord_type())
                .unwrap_or(CoordType::XY),
            Geometry::GeometryCollection(geometries) => geometries
                .first()
                .map(|g| g.coord_type())
                .unwrap_or(CoordType::XY),
        }
    }

    /// True if this geometry holds no coordinate data. An empty point is
    /// the NaN sentinel; aggregates are empty when they hold no parts.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(p) => p.is_empty(),
            Geometry::LineString(s) => s.is_empty(),
            Geometry::Polygon(rings) => rings.is_empty(),
            Geometry::MultiPoint(points) => points.is_empty(),
            Geometry::MultiLineString(lines) => lines.is_empty(),
            Geometry::MultiPolygon(polygons) => polygons.is_empty(),
            Geometry::GeometryCollection(geometries) => geometries.is_empty(),
        }
    }

    /// Replays this geometry as a sequence of writer calls.
    pub fn write_to<W: GeometryWriter>(&self, writer: &mut W) -> GeoScalarResult<()> {
        match self {
            Geometry::Point(p) => writer.point(p),
            Geometry::LineString(s) => writer.line_string(s),
            Geometry::Polygon(rings) => writer.polygon(rings),
            Geometry::MultiPoint(points) => writer.multi_point(points),
            Geometry::MultiLineString(lines) => writer.multi_line_string(lines),
            Geometry::MultiPolygon(polygons) => writer.multi_polygon(polygons),
            Geometry::GeometryCollection(geometries) => {
                writer.geometry_collection_begin(geometries.len())?;
                for geometry in geometries {
                    geometry.write_to(writer)?;
                }
                writer.geometry_collection_end()
            }
        }
    }

    /// Parses a geometry from WKT (or EWKT) text.
    pub fn from_wkt(text: &str) -> GeoScalarResult<Geometry> {
        let mut builder = GeometryBuilder::new();
        read_wkt(text, &mut builder)?;
        builder.finish()
    }

    /// Encodes this geometry as WKT text with default options.
    pub fn to_wkt(&self) -> GeoScalarResult<String> {
        self.to_wkt_with(&WktOptions::default())
    }

    /// Encodes this geometry as WKT text.
    pub fn to_wkt_with(&self, options: &WktOptions) -> GeoScalarResult<String> {
        let mut writer = WktWriter::with_options(options.clone());
        self.write_to(&mut writer)?;
        Ok(writer.finish())
    }

    /// Parses a geometry from WKB (or EWKB) bytes.
    pub fn from_wkb(buf: &[u8]) -> GeoScalarResult<Geometry> {
        let mut builder = GeometryBuilder::new();
        read_wkb(buf, &mut builder)?;
        builder.finish()
    }

    /// Encodes this geometry as little-endian ISO WKB.
    pub fn to_wkb(&self) -> GeoScalarResult<Vec<u8>> {
        self.to_wkb_with(&WkbOptions::default())
    }

    /// Encodes this geometry as WKB bytes.
    pub fn to_wkb_with(&self, options: &WkbOptions) -> GeoScalarResult<Vec<u8>> {
        let mut writer = WkbWriter::with_options(options.clone());
        self.write_to(&mut writer)?;
        Ok(writer.finish())
    }

    /// Parses a geometry from GeoJSON text with default (strict) options.
    pub fn from_geojson(text: &str) -> GeoScalarResult<Geometry> {
        let mut builder = GeometryBuilder::new();
        read_geojson(text, &mut builder)?;
        builder.finish()
    }

    /// Encodes this geometry as GeoJSON text with default (strict)
    /// options.
    pub fn to_geojson(&self) -> GeoScalarResult<String> {
        self.to_geojson_with(&GeoJsonOptions::default())
    }

    /// Encodes this geometry as GeoJSON text.
    pub fn to_geojson_with(&self, options: &GeoJsonOptions) -> GeoScalarResult<String> {
        let mut writer = GeoJsonWriter::with_options(options.clone());
        self.write_to(&mut writer)?;
        Ok(writer.finish())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord_type::CoordType;

    #[test]
    fn kind_and_emptiness() {
        let point = Geometry::Point(Position::xy(1.0, 2.0));
        assert_eq!(point.kind(), GeometryKind::Point);
        assert!(!point.is_empty());

        let empty_point = Geometry::Point(Position::empty(CoordType::XY));
        assert!(empty_point.is_empty());

        let empty_polygon = Geometry::Polygon(vec![]);
        assert!(empty_polygon.is_empty());
        assert_eq!(empty_polygon.coord_type(), CoordType::XY);

        let collection = Geometry::GeometryCollection(vec![Geometry::Point(Position::xyzm(
            1.0, 2.0, 3.0, 4.0,
        ))]);
        assert!(!collection.is_empty());
        assert_eq!(collection.coord_type(), CoordType::XYZM);
    }
}
