//! Renders writer calls as WKT text.

use std::fmt::Write;

use crate::bbox::BBox;
use crate::coord_type::CoordType;
use crate::error::GeoScalarResult;
use crate::geometry::GeometryKind;
use crate::io::numeric::write_coord;
use crate::io::writer::GeometryWriter;
use crate::position::Position;
use crate::series::PositionSeries;

/// Options for the WKT encoder and decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct WktOptions {
    /// Fixed number of fraction digits per coordinate; `None` uses the
    /// shortest representation that round-trips the double.
    pub decimals: Option<usize>,
    /// Strip the trailing `.0` from integral values (only meaningful when
    /// `decimals` is unset).
    pub compact: bool,
    /// Write (and read) the y axis before the x axis, for CRS conventions
    /// that list latitude first.
    pub swap_xy: bool,
    /// Prefix the output with an EWKT `SRID=n;` clause.
    pub srid: Option<i32>,
}

impl Default for WktOptions {
    fn default() -> Self {
        Self {
            decimals: None,
            compact: false,
            swap_xy: false,
            srid: None,
        }
    }
}

/// A [GeometryWriter] accumulating WKT text.
///
/// Encoders are single-use: write one geometry (or one geometry
/// collection), then take the text with [finish](Self::finish).
#[derive(Debug)]
pub struct WktWriter {
    out: String,
    options: WktOptions,
    // true after any completed geometry, so collection members separate
    needs_separator: bool,
    srid_written: bool,
    open_collections: Vec<bool>,
}

impl WktWriter {
    /// Creates a writer with default options.
    pub fn new() -> Self {
        Self::with_options(WktOptions::default())
    }

    /// Creates a writer with the given options.
    pub fn with_options(options: WktOptions) -> Self {
        Self {
            out: String::new(),
            options,
            needs_separator: false,
            srid_written: false,
            open_collections: Vec::new(),
        }
    }

    /// Returns the accumulated WKT text.
    pub fn finish(self) -> String {
        self.out
    }

    fn begin_geometry(&mut self, tag: &str, coord_type: CoordType) {
        if self.needs_separator {
            self.out.push(',');
        }
        self.needs_separator = false;
        if !self.srid_written {
            self.srid_written = true;
            if let Some(srid) = self.options.srid {
                let _ = write!(self.out, "SRID={srid};");
            }
        }
        self.out.push_str(tag);
        self.out.push_str(coord_type.wkt_suffix());
    }

    fn end_geometry(&mut self) {
        self.needs_separator = true;
    }

    fn write_value(&mut self, value: f64) {
        write_coord(
            &mut self.out,
            value,
            self.options.decimals,
            self.options.compact,
        );
    }

    fn write_position(&mut self, position: &Position<'_>) {
        let (first, second) = if self.options.swap_xy {
            (position.y(), position.x())
        } else {
            (position.x(), position.y())
        };
        self.write_value(first);
        self.out.push(' ');
        self.write_value(second);
        if let Some(z) = position.opt_z() {
            self.out.push(' ');
            self.write_value(z);
        }
        if let Some(m) = position.opt_m() {
            self.out.push(' ');
            self.write_value(m);
        }
    }

    fn write_series(&mut self, positions: &PositionSeries<'_>) {
        self.out.push('(');
        for i in 0..positions.len() {
            if i > 0 {
                self.out.push(',');
            }
            self.write_position(&positions.get(i));
        }
        self.out.push(')');
    }

    fn write_rings(&mut self, rings: &[PositionSeries<'_>]) {
        self.out.push('(');
        for (i, ring) in rings.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.write_series(ring);
        }
        self.out.push(')');
    }
}

impl Default for WktWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryWriter for WktWriter {
    fn point(&mut self, position: &Position<'_>) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::Point.wkt_tag(), position.coord_type());
        if position.is_empty() {
            self.out.push_str(" EMPTY");
        } else {
            self.out.push('(');
            self.write_position(position);
            self.out.push(')');
        }
        self.end_geometry();
        Ok(())
    }

    fn line_string(&mut self, positions: &PositionSeries<'_>) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::LineString.wkt_tag(), positions.coord_type());
        if positions.is_empty() {
            self.out.push_str(" EMPTY");
        } else {
            self.write_series(positions);
        }
        self.end_geometry();
        Ok(())
    }

    fn polygon(&mut self, rings: &[PositionSeries<'_>]) -> GeoScalarResult<()> {
        let coord_type = rings
            .first()
            .map(|r| r.coord_type())
            .unwrap_or(CoordType::XY);
        self.begin_geometry(GeometryKind::Polygon.wkt_tag(), coord_type);
        if rings.is_empty() {
            self.out.push_str(" EMPTY");
        } else {
            self.write_rings(rings);
        }
        self.end_geometry();
        Ok(())
    }

    fn multi_point(&mut self, points: &[Position<'_>]) -> GeoScalarResult<()> {
        let coord_type = points
            .first()
            .map(|p| p.coord_type())
            .unwrap_or(CoordType::XY);
        self.begin_geometry(GeometryKind::MultiPoint.wkt_tag(), coord_type);
        if points.is_empty() {
            self.out.push_str(" EMPTY");
        } else {
            self.out.push('(');
            for (i, point) in points.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.write_position(point);
            }
            self.out.push(')');
        }
        self.end_geometry();
        Ok(())
    }

    fn multi_line_string(&mut self, lines: &[PositionSeries<'_>]) -> GeoScalarResult<()> {
        let coord_type = lines
            .first()
            .map(|l| l.coord_type())
            .unwrap_or(CoordType::XY);
        self.begin_geometry(GeometryKind::MultiLineString.wkt_tag(), coord_type);
        if lines.is_empty() {
            self.out.push_str(" EMPTY");
        } else {
            self.write_rings(lines);
        }
        self.end_geometry();
        Ok(())
    }

    fn multi_polygon(&mut self, polygons: &[Vec<PositionSeries<'_>>]) -> GeoScalarResult<()> {
        let coord_type = polygons
            .first()
            .and_then(|rings| rings.first())
            .map(|r| r.coord_type())
            .unwrap_or(CoordType::XY);
        self.begin_geometry(GeometryKind::MultiPolygon.wkt_tag(), coord_type);
        if polygons.is_empty() {
            self.out.push_str(" EMPTY");
        } else {
            self.out.push('(');
            for (i, rings) in polygons.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.write_rings(rings);
            }
            self.out.push(')');
        }
        self.end_geometry();
        Ok(())
    }

    fn geometry_collection_begin(&mut self, count: usize) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::GeometryCollection.wkt_tag(), CoordType::XY);
        // the XY suffix is empty, so the tag never carries a dimension
        if count == 0 {
            self.out.push_str(" EMPTY");
            self.open_collections.push(false);
        } else {
            self.out.push('(');
            self.open_collections.push(true);
        }
        Ok(())
    }

    fn geometry_collection_end(&mut self) -> GeoScalarResult<()> {
        if self.open_collections.pop().unwrap_or(false) {
            self.out.push(')');
        }
        self.end_geometry();
        Ok(())
    }

    fn bbox(&mut self, bbox: &BBox<'_>) -> GeoScalarResult<()> {
        self.polygon(&[bbox.to_ring()])
    }
}
