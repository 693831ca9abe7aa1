//! Renders writer calls as WKB bytes.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::bbox::BBox;
use crate::coord_type::CoordType;
use crate::error::GeoScalarResult;
use crate::geometry::GeometryKind;
use crate::io::wkb::common::{Endianness, WkbType};
use crate::io::writer::GeometryWriter;
use crate::position::Position;
use crate::series::PositionSeries;

// Negative quiet NaN, the empty-point coordinate bit pattern shared with
// other WKB implementations.
const EMPTY_COORD_BITS: u64 = 0xFFF8_0000_0000_0000;

/// Options for the WKB encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct WkbOptions {
    /// Byte order of every numeric field.
    pub endianness: Endianness,
    /// Encode type codes in EWKB flag form instead of ISO offset form.
    pub extended: bool,
    /// Write an EWKB SRID field in the top-level geometry header (implies
    /// the EWKB flag form for that header).
    pub srid: Option<i32>,
}

impl Default for WkbOptions {
    fn default() -> Self {
        Self {
            endianness: Endianness::LittleEndian,
            extended: false,
            srid: None,
        }
    }
}

/// A [GeometryWriter] accumulating WKB bytes.
///
/// Encoders are single-use: write one geometry, then take the bytes with
/// [finish](Self::finish).
#[derive(Debug)]
pub struct WkbWriter {
    buf: Vec<u8>,
    options: WkbOptions,
    depth: usize,
}

impl WkbWriter {
    /// Creates a writer producing little-endian ISO WKB.
    pub fn new() -> Self {
        Self::with_options(WkbOptions::default())
    }

    /// Creates a writer with the given options.
    pub fn with_options(options: WkbOptions) -> Self {
        Self {
            buf: Vec::new(),
            options,
            depth: 0,
        }
    }

    /// Returns the accumulated WKB bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn put_u32(&mut self, value: u32) -> GeoScalarResult<()> {
        match self.options.endianness {
            Endianness::BigEndian => self.buf.write_u32::<BigEndian>(value)?,
            Endianness::LittleEndian => self.buf.write_u32::<LittleEndian>(value)?,
        }
        Ok(())
    }

    fn put_f64(&mut self, value: f64) -> GeoScalarResult<()> {
        match self.options.endianness {
            Endianness::BigEndian => self.buf.write_f64::<BigEndian>(value)?,
            Endianness::LittleEndian => self.buf.write_f64::<LittleEndian>(value)?,
        }
        Ok(())
    }

    // Every geometry, nested ones included, carries its own byte order and
    // type code. The SRID field is written on the outermost header only.
    fn write_header(&mut self, kind: GeometryKind, coord_type: CoordType) -> GeoScalarResult<()> {
        self.buf.write_u8(self.options.endianness.into())?;
        let srid = (self.depth == 0).then_some(self.options.srid).flatten();
        let wkb_type = WkbType {
            kind,
            coord_type,
            has_srid: srid.is_some(),
        };
        self.put_u32(wkb_type.code(self.options.extended || srid.is_some()))?;
        if let Some(srid) = srid {
            self.put_u32(srid as u32)?;
        }
        Ok(())
    }

    fn write_position(&mut self, position: &Position<'_>) -> GeoScalarResult<()> {
        for value in position.as_slice() {
            self.put_f64(*value)?;
        }
        Ok(())
    }

    fn write_series(&mut self, positions: &PositionSeries<'_>) -> GeoScalarResult<()> {
        self.put_u32(positions.len() as u32)?;
        for value in positions.values().iter() {
            self.put_f64(*value)?;
        }
        Ok(())
    }

    fn write_point(&mut self, position: &Position<'_>) -> GeoScalarResult<()> {
        if position.is_empty() {
            // no dedicated empty tag in WKB: a 2D point of NaNs stands in
            self.write_header(GeometryKind::Point, CoordType::XY)?;
            self.put_f64(f64::from_bits(EMPTY_COORD_BITS))?;
            self.put_f64(f64::from_bits(EMPTY_COORD_BITS))?;
        } else {
            self.write_header(GeometryKind::Point, position.coord_type())?;
            self.write_position(position)?;
        }
        Ok(())
    }

    fn write_line_string(&mut self, positions: &PositionSeries<'_>) -> GeoScalarResult<()> {
        self.write_header(GeometryKind::LineString, positions.coord_type())?;
        self.write_series(positions)
    }

    fn write_polygon(&mut self, rings: &[PositionSeries<'_>]) -> GeoScalarResult<()> {
        let coord_type = rings
            .first()
            .map(|r| r.coord_type())
            .unwrap_or(CoordType::XY);
        self.write_header(GeometryKind::Polygon, coord_type)?;
        self.put_u32(rings.len() as u32)?;
        for ring in rings {
            self.write_series(ring)?;
        }
        Ok(())
    }
}

impl Default for WkbWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryWriter for WkbWriter {
    fn point(&mut self, position: &Position<'_>) -> GeoScalarResult<()> {
        self.write_point(position)
    }

    fn line_string(&mut self, positions: &PositionSeries<'_>) -> GeoScalarResult<()> {
        self.write_line_string(positions)
    }

    fn polygon(&mut self, rings: &[PositionSeries<'_>]) -> GeoScalarResult<()> {
        self.write_polygon(rings)
    }

    fn multi_point(&mut self, points: &[Position<'_>]) -> GeoScalarResult<()> {
        let coord_type = points
            .first()
            .map(|p| p.coord_type())
            .unwrap_or(CoordType::XY);
        self.write_header(GeometryKind::MultiPoint, coord_type)?;
        self.put_u32(points.len() as u32)?;
        self.depth += 1;
        for point in points {
            self.write_point(point)?;
        }
        self.depth -= 1;
        Ok(())
    }

    fn multi_line_string(&mut self, lines: &[PositionSeries<'_>]) -> GeoScalarResult<()> {
        let coord_type = lines
            .first()
            .map(|l| l.coord_type())
            .unwrap_or(CoordType::XY);
        self.write_header(GeometryKind::MultiLineString, coord_type)?;
        self.put_u32(lines.len() as u32)?;
        self.depth += 1;
        for line in lines {
            self.write_line_string(line)?;
        }
        self.depth -= 1;
        Ok(())
    }

    fn multi_polygon(&mut self, polygons: &[Vec<PositionSeries<'_>>]) -> GeoScalarResult<()> {
        let coord_type = polygons
            .first()
            .and_then(|rings| rings.first())
            .map(|r| r.coord_type())
            .unwrap_or(CoordType::XY);
        self.write_header(GeometryKind::MultiPolygon, coord_type)?;
        self.put_u32(polygons.len() as u32)?;
        self.depth += 1;
        for rings in polygons {
            self.write_polygon(rings)?;
        }
        self.depth -= 1;
        Ok(())
    }

    fn geometry_collection_begin(&mut self, count: usize) -> GeoScalarResult<()> {
        self.write_header(GeometryKind::GeometryCollection, CoordType::XY)?;
        self.put_u32(count as u32)?;
        self.depth += 1;
        Ok(())
    }

    fn geometry_collection_end(&mut self) -> GeoScalarResult<()> {
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn bbox(&mut self, bbox: &BBox<'_>) -> GeoScalarResult<()> {
        self.polygon(&[bbox.to_ring()])
    }
}
