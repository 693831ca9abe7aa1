//! Single-pass WKB decoder, generic over any [GeometryWriter].

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::coord_type::CoordType;
use crate::error::{GeoScalarError, GeoScalarResult};
use crate::geometry::GeometryKind;
use crate::io::wkb::common::{Endianness, WkbType};
use crate::io::writer::GeometryWriter;
use crate::position::Position;
use crate::series::PositionSeries;

/// Parses WKB (or EWKB) bytes and replays them as writer calls.
///
/// The byte order flag is read once per geometry header and applied to
/// every subsequent numeric field of that geometry; nested sub-geometries
/// carry (and may change) their own byte order. An EWKB SRID field is
/// accepted and validated but not forwarded, since writers carry no
/// reference-system state. A 2D point whose coordinates are both NaN is
/// surfaced as the empty-point sentinel, not as a point at NaN.
pub fn read_wkb<W: GeometryWriter>(buf: &[u8], writer: &mut W) -> GeoScalarResult<()> {
    let mut reader = Cursor::new(buf);
    read_geometry(&mut reader, writer)?;
    if reader.position() != buf.len() as u64 {
        return Err(GeoScalarError::Wkb(format!(
            "{} trailing bytes after geometry",
            buf.len() as u64 - reader.position()
        )));
    }
    Ok(())
}

fn truncated() -> GeoScalarError {
    GeoScalarError::TruncatedInput("WKB stream ends mid-structure".to_string())
}

fn read_u32(reader: &mut Cursor<&[u8]>, byte_order: Endianness) -> GeoScalarResult<u32> {
    match byte_order {
        Endianness::BigEndian => reader.read_u32::<BigEndian>(),
        Endianness::LittleEndian => reader.read_u32::<LittleEndian>(),
    }
    .map_err(|_| truncated())
}

fn read_f64(reader: &mut Cursor<&[u8]>, byte_order: Endianness) -> GeoScalarResult<f64> {
    match byte_order {
        Endianness::BigEndian => reader.read_f64::<BigEndian>(),
        Endianness::LittleEndian => reader.read_f64::<LittleEndian>(),
    }
    .map_err(|_| truncated())
}

// Reads one geometry header: byte order, type code and (EWKB) SRID field.
fn read_header(reader: &mut Cursor<&[u8]>) -> GeoScalarResult<(Endianness, WkbType)> {
    let byte_order_byte = reader.read_u8().map_err(|_| truncated())?;
    let byte_order = Endianness::try_from(byte_order_byte).map_err(|_| {
        GeoScalarError::Wkb(format!("invalid byte order flag {byte_order_byte}"))
    })?;
    let wkb_type = WkbType::from_code(read_u32(reader, byte_order)?)?;
    if wkb_type.has_srid {
        let _srid = read_u32(reader, byte_order)?;
    }
    Ok((byte_order, wkb_type))
}

// Reads a nested sub-geometry header, checking it announces the expected
// kind (e.g. a Point inside a MultiPoint).
fn read_nested_header(
    reader: &mut Cursor<&[u8]>,
    expected: GeometryKind,
) -> GeoScalarResult<(Endianness, WkbType)> {
    let (byte_order, wkb_type) = read_header(reader)?;
    if wkb_type.kind != expected {
        return Err(GeoScalarError::UnsupportedType(format!(
            "nested geometry declares {:?} where {:?} was expected",
            wkb_type.kind, expected
        )));
    }
    Ok((byte_order, wkb_type))
}

// Reads an element count and rejects counts the remaining bytes cannot
// possibly satisfy, so corrupt streams fail before any large allocation.
fn read_count(
    reader: &mut Cursor<&[u8]>,
    byte_order: Endianness,
    min_bytes_each: u64,
) -> GeoScalarResult<usize> {
    let count = read_u32(reader, byte_order)? as u64;
    let remaining = reader.get_ref().len() as u64 - reader.position();
    if count * min_bytes_each > remaining {
        return Err(truncated());
    }
    Ok(count as usize)
}

fn read_position(
    reader: &mut Cursor<&[u8]>,
    byte_order: Endianness,
    coord_type: CoordType,
) -> GeoScalarResult<Position<'static>> {
    let mut values = [0.0_f64; 4];
    for value in values.iter_mut().take(coord_type.dim()) {
        *value = read_f64(reader, byte_order)?;
    }
    if values[0].is_nan() && values[1].is_nan() {
        return Ok(Position::empty(coord_type));
    }
    Position::from_slice_by_type(&values[..coord_type.dim()], coord_type)
}

fn read_series(
    reader: &mut Cursor<&[u8]>,
    byte_order: Endianness,
    coord_type: CoordType,
) -> GeoScalarResult<PositionSeries<'static>> {
    let count = read_count(reader, byte_order, coord_type.dim() as u64 * 8)?;
    let mut coords = Vec::with_capacity(count * coord_type.dim());
    for _ in 0..count * coord_type.dim() {
        coords.push(read_f64(reader, byte_order)?);
    }
    PositionSeries::from_coords(coords, coord_type)
}

fn read_rings(
    reader: &mut Cursor<&[u8]>,
    byte_order: Endianness,
    coord_type: CoordType,
) -> GeoScalarResult<Vec<PositionSeries<'static>>> {
    let ring_count = read_count(reader, byte_order, 4)?;
    let mut rings = Vec::with_capacity(ring_count);
    for _ in 0..ring_count {
        rings.push(read_series(reader, byte_order, coord_type)?);
    }
    Ok(rings)
}

fn read_geometry<W: GeometryWriter>(
    reader: &mut Cursor<&[u8]>,
    writer: &mut W,
) -> GeoScalarResult<()> {
    let (byte_order, wkb_type) = read_header(reader)?;
    let coord_type = wkb_type.coord_type;
    match wkb_type.kind {
        GeometryKind::Point => {
            let position = read_position(reader, byte_order, coord_type)?;
            writer.point(&position)
        }
        GeometryKind::LineString => {
            let series = read_series(reader, byte_order, coord_type)?;
            writer.line_string(&series)
        }
        GeometryKind::Polygon => {
            let rings = read_rings(reader, byte_order, coord_type)?;
            writer.polygon(&rings)
        }
        GeometryKind::MultiPoint => {
            let count = read_count(reader, byte_order, 5)?;
            let mut points = Vec::with_capacity(count);
            for _ in 0..count {
                let (nested_order, nested_type) =
                    read_nested_header(reader, GeometryKind::Point)?;
                points.push(read_position(reader, nested_order, nested_type.coord_type)?);
            }
            writer.multi_point(&points)
        }
        GeometryKind::MultiLineString => {
            let count = read_count(reader, byte_order, 5)?;
            let mut lines = Vec::with_capacity(count);
            for _ in 0..count {
                let (nested_order, nested_type) =
                    read_nested_header(reader, GeometryKind::LineString)?;
                lines.push(read_series(reader, nested_order, nested_type.coord_type)?);
            }
            writer.multi_line_string(&lines)
        }
        GeometryKind::MultiPolygon => {
            let count = read_count(reader, byte_order, 5)?;
            let mut polygons = Vec::with_capacity(count);
            for _ in 0..count {
                let (nested_order, nested_type) =
                    read_nested_header(reader, GeometryKind::Polygon)?;
                polygons.push(read_rings(reader, nested_order, nested_type.coord_type)?);
            }
            writer.multi_polygon(&polygons)
        }
        GeometryKind::GeometryCollection => {
            let count = read_count(reader, byte_order, 5)?;
            writer.geometry_collection_begin(count)?;
            for _ in 0..count {
                read_geometry(reader, writer)?;
            }
            writer.geometry_collection_end()
        }
    }
}
