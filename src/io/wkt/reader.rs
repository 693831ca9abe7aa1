//! Streaming WKT decoder, generic over any [GeometryWriter].

use crate::coord_type::CoordType;
use crate::error::{GeoScalarError, GeoScalarResult};
use crate::geometry::GeometryKind;
use crate::io::wkt::writer::WktOptions;
use crate::io::writer::GeometryWriter;
use crate::position::Position;
use crate::series::PositionSeries;

/// Parses WKT (or EWKT) text and replays it as writer calls.
///
/// Dimensionality is resolved from the tag suffix (`Z`, `M`, `ZM`) when
/// present, otherwise from the number count of the first coordinate tuple;
/// a 3-number tuple resolves to XYZ, never XYM. An EWKT `SRID=n;` prefix
/// is accepted and validated but not forwarded, since writers carry no
/// reference-system state.
pub fn read_wkt<W: GeometryWriter>(text: &str, writer: &mut W) -> GeoScalarResult<()> {
    read_wkt_with(text, writer, &WktOptions::default())
}

/// Like [read_wkt], honoring the `swap_xy` axis-order option.
pub fn read_wkt_with<W: GeometryWriter>(
    text: &str,
    writer: &mut W,
    options: &WktOptions,
) -> GeoScalarResult<()> {
    let mut parser = WktParser {
        text,
        pos: 0,
        swap_xy: options.swap_xy,
    };
    parser.parse_srid_prefix()?;
    parser.parse_geometry(writer)?;
    parser.skip_ws();
    if parser.pos != text.len() {
        return Err(GeoScalarError::Wkt(format!(
            "unexpected trailing content at offset {}",
            parser.pos
        )));
    }
    Ok(())
}

struct WktParser<'s> {
    text: &'s str,
    pos: usize,
    swap_xy: bool,
}

impl<'s> WktParser<'s> {
    fn bytes(&self) -> &'s [u8] {
        self.text.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn truncated(&self) -> GeoScalarError {
        GeoScalarError::TruncatedInput("WKT text ends mid-structure".to_string())
    }

    fn unexpected(&self) -> GeoScalarError {
        match self.peek() {
            Some(b) => GeoScalarError::Wkt(format!(
                "unexpected character {:?} at offset {}",
                b as char, self.pos
            )),
            None => self.truncated(),
        }
    }

    fn expect(&mut self, byte: u8) -> GeoScalarResult<()> {
        self.skip_ws();
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // Consumes an alphabetic run; empty if the next character is not a
    // letter.
    fn take_word(&mut self) -> &'s str {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    fn try_word(&mut self, expected: &str) -> bool {
        let save = self.pos;
        self.skip_ws();
        if self.take_word().eq_ignore_ascii_case(expected) {
            true
        } else {
            self.pos = save;
            false
        }
    }

    fn parse_number(&mut self) -> GeoScalarResult<f64> {
        self.skip_ws();
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')
        ) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.unexpected());
        }
        self.text[start..self.pos]
            .parse::<f64>()
            .map_err(|_| {
                GeoScalarError::Wkt(format!(
                    "invalid number {:?} at offset {start}",
                    &self.text[start..self.pos]
                ))
            })
    }

    fn parse_srid_prefix(&mut self) -> GeoScalarResult<()> {
        if !self.try_word("SRID") {
            return Ok(());
        }
        self.expect(b'=')?;
        let srid = self.parse_number()?;
        if srid.fract() != 0.0 {
            return Err(GeoScalarError::Wkt(format!("invalid SRID {srid}")));
        }
        self.expect(b';')
    }

    // Reads one coordinate tuple into `out` and resolves its type. With an
    // expected type, the number count must match its dimension.
    fn parse_tuple(
        &mut self,
        expected: Option<CoordType>,
        out: &mut Vec<f64>,
    ) -> GeoScalarResult<CoordType> {
        let mut values = [0.0_f64; 4];
        let mut count = 0usize;
        loop {
            let value = self.parse_number()?;
            if count == 4 {
                return Err(GeoScalarError::MalformedCoordinates(format!(
                    "too many values in coordinate tuple at offset {}",
                    self.pos
                )));
            }
            values[count] = value;
            count += 1;
            self.skip_ws();
            match self.peek() {
                Some(b',') | Some(b')') | None => break,
                _ => {}
            }
        }
        let coord_type = match expected {
            Some(coord_type) if coord_type.dim() == count => coord_type,
            Some(coord_type) => {
                return Err(GeoScalarError::MalformedCoordinates(format!(
                    "expected {} values per {} coordinate, got {}",
                    coord_type.dim(),
                    coord_type,
                    count
                )))
            }
            None => CoordType::from_dim(count)?,
        };
        if self.swap_xy {
            values.swap(0, 1);
        }
        out.extend_from_slice(&values[..count]);
        Ok(coord_type)
    }

    fn parse_series(
        &mut self,
        mut expected: Option<CoordType>,
    ) -> GeoScalarResult<PositionSeries<'static>> {
        self.expect(b'(')?;
        let mut coords = Vec::new();
        loop {
            expected = Some(self.parse_tuple(expected, &mut coords)?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        // expected is always set after at least one tuple
        PositionSeries::from_coords(coords, expected.unwrap_or(CoordType::XY))
    }

    fn parse_ring_list(
        &mut self,
        mut expected: Option<CoordType>,
    ) -> GeoScalarResult<Vec<PositionSeries<'static>>> {
        self.expect(b'(')?;
        let mut rings = Vec::new();
        loop {
            let ring = self.parse_series(expected)?;
            expected = Some(ring.coord_type());
            rings.push(ring);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        Ok(rings)
    }

    // Counts the top-level members of the parenthesized group starting at
    // the next '(' without consuming input. WKB-style writers need the
    // member count before any member is replayed.
    fn count_collection_members(&self) -> GeoScalarResult<usize> {
        let mut depth = 0usize;
        let mut commas = 0usize;
        let mut any = false;
        for &byte in &self.bytes()[self.pos..] {
            match byte {
                b'(' => {
                    if depth > 0 {
                        any = true;
                    }
                    depth += 1;
                }
                b')' => {
                    if depth == 0 {
                        return Err(GeoScalarError::Wkt(format!(
                            "unbalanced parentheses at offset {}",
                            self.pos
                        )));
                    }
                    depth -= 1;
                    if depth == 0 {
                        return Ok(commas + usize::from(any));
                    }
                }
                b',' if depth == 1 => {
                    commas += 1;
                    any = true;
                }
                b if depth >= 1 && !b.is_ascii_whitespace() => any = true,
                _ => {}
            }
        }
        Err(self.truncated())
    }

    fn parse_geometry<W: GeometryWriter>(&mut self, writer: &mut W) -> GeoScalarResult<()> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(self.truncated());
        }
        let word = self.take_word().to_ascii_uppercase();
        let (kind, mut tagged) = resolve_tag(&word, self.pos)?;
        if tagged.is_none() {
            tagged = if self.try_word("ZM") {
                Some(CoordType::XYZM)
            } else if self.try_word("Z") {
                Some(CoordType::XYZ)
            } else if self.try_word("M") {
                Some(CoordType::XYM)
            } else {
                None
            };
        }
        if self.try_word("EMPTY") {
            return self.emit_empty(kind, tagged.unwrap_or(CoordType::XY), writer);
        }
        match kind {
            GeometryKind::Point => {
                self.expect(b'(')?;
                let mut values = Vec::with_capacity(4);
                let coord_type = self.parse_tuple(tagged, &mut values)?;
                self.expect(b')')?;
                writer.point(&Position::from_slice_by_type(&values, coord_type)?)
            }
            GeometryKind::LineString => {
                let series = self.parse_series(tagged)?;
                writer.line_string(&series)
            }
            GeometryKind::Polygon => {
                let rings = self.parse_ring_list(tagged)?;
                writer.polygon(&rings)
            }
            GeometryKind::MultiPoint => {
                self.expect(b'(')?;
                let mut points = Vec::new();
                loop {
                    self.skip_ws();
                    let parenthesized = self.peek() == Some(b'(');
                    if parenthesized {
                        self.pos += 1;
                    }
                    let mut values = Vec::with_capacity(4);
                    let coord_type = self.parse_tuple(tagged, &mut values)?;
                    tagged = Some(coord_type);
                    if parenthesized {
                        self.expect(b')')?;
                    }
                    points.push(Position::from_slice_by_type(&values, coord_type)?);
                    self.skip_ws();
                    match self.peek() {
                        Some(b',') => self.pos += 1,
                        Some(b')') => {
                            self.pos += 1;
                            break;
                        }
                        _ => return Err(self.unexpected()),
                    }
                }
                writer.multi_point(&points)
            }
            GeometryKind::MultiLineString => {
                let lines = self.parse_ring_list(tagged)?;
                writer.multi_line_string(&lines)
            }
            GeometryKind::MultiPolygon => {
                self.expect(b'(')?;
                let mut polygons = Vec::new();
                loop {
                    let rings = self.parse_ring_list(tagged)?;
                    if let Some(first) = rings.first() {
                        tagged = Some(first.coord_type());
                    }
                    polygons.push(rings);
                    self.skip_ws();
                    match self.peek() {
                        Some(b',') => self.pos += 1,
                        Some(b')') => {
                            self.pos += 1;
                            break;
                        }
                        _ => return Err(self.unexpected()),
                    }
                }
                writer.multi_polygon(&polygons)
            }
            GeometryKind::GeometryCollection => {
                let count = self.count_collection_members()?;
                self.expect(b'(')?;
                writer.geometry_collection_begin(count)?;
                if count == 0 {
                    self.skip_ws();
                } else {
                    loop {
                        self.parse_geometry(writer)?;
                        self.skip_ws();
                        match self.peek() {
                            Some(b',') => self.pos += 1,
                            Some(b')') => break,
                            _ => return Err(self.unexpected()),
                        }
                    }
                }
                self.expect(b')')?;
                writer.geometry_collection_end()
            }
        }
    }

    fn emit_empty<W: GeometryWriter>(
        &mut self,
        kind: GeometryKind,
        coord_type: CoordType,
        writer: &mut W,
    ) -> GeoScalarResult<()> {
        match kind {
            GeometryKind::Point => writer.point(&Position::empty(coord_type)),
            GeometryKind::LineString => {
                writer.line_string(&PositionSeries::from_coords(Vec::new(), coord_type)?)
            }
            GeometryKind::Polygon => writer.polygon(&[]),
            GeometryKind::MultiPoint => writer.multi_point(&[]),
            GeometryKind::MultiLineString => writer.multi_line_string(&[]),
            GeometryKind::MultiPolygon => writer.multi_polygon(&[]),
            GeometryKind::GeometryCollection => {
                writer.geometry_collection_begin(0)?;
                writer.geometry_collection_end()
            }
        }
    }
}

fn kind_for(tag: &str) -> Option<GeometryKind> {
    match tag {
        "POINT" => Some(GeometryKind::Point),
        "LINESTRING" => Some(GeometryKind::LineString),
        "POLYGON" => Some(GeometryKind::Polygon),
        "MULTIPOINT" => Some(GeometryKind::MultiPoint),
        "MULTILINESTRING" => Some(GeometryKind::MultiLineString),
        "MULTIPOLYGON" => Some(GeometryKind::MultiPolygon),
        "GEOMETRYCOLLECTION" => Some(GeometryKind::GeometryCollection),
        _ => None,
    }
}

// Resolves a tag word, accepting attached dimension suffixes ("POINTZ",
// "POINTZM") alongside the separated form handled by the caller.
fn resolve_tag(word: &str, pos: usize) -> GeoScalarResult<(GeometryKind, Option<CoordType>)> {
    if let Some(kind) = kind_for(word) {
        return Ok((kind, None));
    }
    for (suffix, coord_type) in [
        ("ZM", CoordType::XYZM),
        ("Z", CoordType::XYZ),
        ("M", CoordType::XYM),
    ] {
        if let Some(stripped) = word.strip_suffix(suffix) {
            if let Some(kind) = kind_for(stripped) {
                return Ok((kind, Some(coord_type)));
            }
        }
    }
    Err(GeoScalarError::UnsupportedType(format!(
        "unknown WKT tag {word:?} before offset {pos}"
    )))
}
