//! Renders writer calls as GeoJSON text.

use crate::bbox::BBox;
use crate::error::GeoScalarResult;
use crate::feature::{Feature, FeatureCollection};
use crate::geometry::GeometryKind;
use crate::io::numeric::write_coord;
use crate::io::writer::GeometryWriter;
use crate::position::Position;
use crate::series::PositionSeries;

/// Options for the GeoJSON encoder and decoder.
///
/// GeoJSON has no native m-value convention. In strict (RFC 7946)
/// mode measured values are dropped on encode and never inferred on
/// decode. Lenient mode writes measured positions as non-standard
/// 4-element arrays `[x, y, z, m]` (z is 0.0 for XYM data) and reads
/// 4-element arrays back as XYZM, so plain XYM does not survive a GeoJSON
/// round trip even leniently.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonOptions {
    /// Fixed number of fraction digits per coordinate; `None` uses the
    /// shortest representation that round-trips the double.
    pub decimals: Option<usize>,
    /// Strip the trailing `.0` from integral values (the JSON-typical
    /// default).
    pub compact: bool,
    /// RFC 7946 mode: measured values are dropped rather than preserved
    /// through a non-standard extension.
    pub strict: bool,
}

impl Default for GeoJsonOptions {
    fn default() -> Self {
        Self {
            decimals: None,
            compact: true,
            strict: true,
        }
    }
}

/// A [GeometryWriter] accumulating GeoJSON geometry text.
///
/// Encoders are single-use: write one geometry (or one geometry
/// collection), then take the text with [finish](Self::finish).
#[derive(Debug)]
pub struct GeoJsonWriter {
    out: String,
    options: GeoJsonOptions,
    needs_separator: bool,
}

impl GeoJsonWriter {
    /// Creates a writer with default (strict) options.
    pub fn new() -> Self {
        Self::with_options(GeoJsonOptions::default())
    }

    /// Creates a writer with the given options.
    pub fn with_options(options: GeoJsonOptions) -> Self {
        Self {
            out: String::new(),
            options,
            needs_separator: false,
        }
    }

    /// Returns the accumulated GeoJSON text.
    pub fn finish(self) -> String {
        self.out
    }

    fn begin_geometry(&mut self, geojson_type: &str) {
        if self.needs_separator {
            self.out.push(',');
        }
        self.needs_separator = false;
        self.out.push_str("{\"type\":\"");
        self.out.push_str(geojson_type);
        self.out.push_str("\",");
    }

    fn end_geometry(&mut self) {
        self.out.push('}');
        self.needs_separator = true;
    }

    fn push_value(&mut self, value: f64) {
        write_coord(
            &mut self.out,
            value,
            self.options.decimals,
            self.options.compact,
        );
    }

    fn push_position(&mut self, position: &Position<'_>) {
        self.out.push('[');
        if !position.is_empty() {
            self.push_value(position.x());
            self.out.push(',');
            self.push_value(position.y());
            if self.options.strict {
                if let Some(z) = position.opt_z() {
                    self.out.push(',');
                    self.push_value(z);
                }
            } else {
                match (position.opt_z(), position.opt_m()) {
                    (Some(z), Some(m)) => {
                        self.out.push(',');
                        self.push_value(z);
                        self.out.push(',');
                        self.push_value(m);
                    }
                    (None, Some(m)) => {
                        self.out.push(',');
                        self.push_value(0.0);
                        self.out.push(',');
                        self.push_value(m);
                    }
                    (Some(z), None) => {
                        self.out.push(',');
                        self.push_value(z);
                    }
                    (None, None) => {}
                }
            }
        }
        self.out.push(']');
    }

    fn push_series(&mut self, positions: &PositionSeries<'_>) {
        self.out.push('[');
        for i in 0..positions.len() {
            if i > 0 {
                self.out.push(',');
            }
            self.push_position(&positions.get(i));
        }
        self.out.push(']');
    }

    fn push_rings(&mut self, rings: &[PositionSeries<'_>]) {
        self.out.push('[');
        for (i, ring) in rings.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.push_series(ring);
        }
        self.out.push(']');
    }
}

impl Default for GeoJsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryWriter for GeoJsonWriter {
    fn point(&mut self, position: &Position<'_>) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::Point.geojson_type());
        self.out.push_str("\"coordinates\":");
        self.push_position(position);
        self.end_geometry();
        Ok(())
    }

    fn line_string(&mut self, positions: &PositionSeries<'_>) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::LineString.geojson_type());
        self.out.push_str("\"coordinates\":");
        self.push_series(positions);
        self.end_geometry();
        Ok(())
    }

    fn polygon(&mut self, rings: &[PositionSeries<'_>]) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::Polygon.geojson_type());
        self.out.push_str("\"coordinates\":");
        self.push_rings(rings);
        self.end_geometry();
        Ok(())
    }

    fn multi_point(&mut self, points: &[Position<'_>]) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::MultiPoint.geojson_type());
        self.out.push_str("\"coordinates\":[");
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.push_position(point);
        }
        self.out.push(']');
        self.end_geometry();
        Ok(())
    }

    fn multi_line_string(&mut self, lines: &[PositionSeries<'_>]) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::MultiLineString.geojson_type());
        self.out.push_str("\"coordinates\":");
        self.push_rings(lines);
        self.end_geometry();
        Ok(())
    }

    fn multi_polygon(&mut self, polygons: &[Vec<PositionSeries<'_>>]) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::MultiPolygon.geojson_type());
        self.out.push_str("\"coordinates\":[");
        for (i, rings) in polygons.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.push_rings(rings);
        }
        self.out.push(']');
        self.end_geometry();
        Ok(())
    }

    fn geometry_collection_begin(&mut self, _count: usize) -> GeoScalarResult<()> {
        self.begin_geometry(GeometryKind::GeometryCollection.geojson_type());
        self.out.push_str("\"geometries\":[");
        Ok(())
    }

    fn geometry_collection_end(&mut self) -> GeoScalarResult<()> {
        self.out.push(']');
        self.end_geometry();
        Ok(())
    }

    fn bbox(&mut self, bbox: &BBox<'_>) -> GeoScalarResult<()> {
        self.polygon(&[bbox.to_ring()])
    }
}

// The RFC 7946 bbox member: [min..., max...] over x, y and (when present)
// z. The m range has no standard form and is never written.
fn push_bbox(out: &mut String, bbox: &BBox<'_>, options: &GeoJsonOptions) {
    let mut values = vec![bbox.min_x(), bbox.min_y()];
    if let Some(min_z) = bbox.opt_min_z() {
        values.push(min_z);
    }
    values.push(bbox.max_x());
    values.push(bbox.max_y());
    if let Some(max_z) = bbox.opt_max_z() {
        values.push(max_z);
    }
    out.push('[');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_coord(out, *value, options.decimals, options.compact);
    }
    out.push(']');
}

/// Encodes a feature as GeoJSON text.
pub fn write_feature(feature: &Feature, options: &GeoJsonOptions) -> GeoScalarResult<String> {
    let mut out = String::from("{\"type\":\"Feature\"");
    if let Some(id) = &feature.id {
        out.push_str(",\"id\":");
        out.push_str(&serde_json::to_string(id)?);
    }
    if let Some(bbox) = &feature.bbox {
        out.push_str(",\"bbox\":");
        push_bbox(&mut out, bbox, options);
    }
    out.push_str(",\"geometry\":");
    match &feature.geometry {
        Some(geometry) => {
            let mut writer = GeoJsonWriter::with_options(options.clone());
            geometry.write_to(&mut writer)?;
            out.push_str(&writer.finish());
        }
        None => out.push_str("null"),
    }
    out.push_str(",\"properties\":");
    out.push_str(&serde_json::to_string(&feature.properties)?);
    out.push('}');
    Ok(out)
}

/// Encodes a feature collection as GeoJSON text.
pub fn write_feature_collection(
    collection: &FeatureCollection,
    options: &GeoJsonOptions,
) -> GeoScalarResult<String> {
    let mut out = String::from("{\"type\":\"FeatureCollection\"");
    if let Some(bbox) = &collection.bbox {
        out.push_str(",\"bbox\":");
        push_bbox(&mut out, bbox, options);
    }
    out.push_str(",\"features\":[");
    for (i, feature) in collection.features.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&write_feature(feature, options)?);
    }
    out.push_str("]}");
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord_type::CoordType;

    fn encode(write: impl FnOnce(&mut GeoJsonWriter) -> GeoScalarResult<()>) -> String {
        encode_with(GeoJsonOptions::default(), write)
    }

    fn encode_with(
        options: GeoJsonOptions,
        write: impl FnOnce(&mut GeoJsonWriter) -> GeoScalarResult<()>,
    ) -> String {
        let mut writer = GeoJsonWriter::with_options(options);
        write(&mut writer).unwrap();
        writer.finish()
    }

    #[test]
    fn point_variants() {
        assert_eq!(
            encode(|w| w.point(&Position::xy(10.0, 20.5))),
            r#"{"type":"Point","coordinates":[10,20.5]}"#
        );
        assert_eq!(
            encode(|w| w.point(&Position::xyz(1.0, 2.0, 3.0))),
            r#"{"type":"Point","coordinates":[1,2,3]}"#
        );
        assert_eq!(
            encode(|w| w.point(&Position::empty(CoordType::XY))),
            r#"{"type":"Point","coordinates":[]}"#
        );
    }

    #[test]
    fn strict_mode_drops_measures() {
        assert_eq!(
            encode(|w| w.point(&Position::xyzm(1.0, 2.0, 3.0, 4.0))),
            r#"{"type":"Point","coordinates":[1,2,3]}"#
        );
        assert_eq!(
            encode(|w| w.point(&Position::xym(1.0, 2.0, 4.0))),
            r#"{"type":"Point","coordinates":[1,2]}"#
        );
    }

    #[test]
    fn lenient_mode_preserves_measures() {
        let lenient = GeoJsonOptions {
            strict: false,
            ..Default::default()
        };
        assert_eq!(
            encode_with(lenient.clone(), |w| w
                .point(&Position::xyzm(1.0, 2.0, 3.0, 4.0))),
            r#"{"type":"Point","coordinates":[1,2,3,4]}"#
        );
        // XYM gains a zero z to stay 4 elements wide
        assert_eq!(
            encode_with(lenient, |w| w.point(&Position::xym(1.0, 2.0, 4.0))),
            r#"{"type":"Point","coordinates":[1,2,0,4]}"#
        );
    }

    #[test]
    fn aggregates() {
        let line = PositionSeries::from_coords(vec![1.0, 2.0, 3.0, 4.0], CoordType::XY).unwrap();
        assert_eq!(
            encode(|w| w.line_string(&line)),
            r#"{"type":"LineString","coordinates":[[1,2],[3,4]]}"#
        );

        let ring = PositionSeries::from_coords(
            vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            CoordType::XY,
        )
        .unwrap();
        assert_eq!(
            encode(|w| w.polygon(&[ring.clone()])),
            r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#
        );
        assert_eq!(
            encode(|w| w.multi_polygon(&[vec![ring]])),
            r#"{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1],[0,0]]]]}"#
        );
        assert_eq!(
            encode(|w| w.multi_point(&[Position::xy(10.0, 40.0), Position::xy(40.0, 30.0)])),
            r#"{"type":"MultiPoint","coordinates":[[10,40],[40,30]]}"#
        );
        assert_eq!(
            encode(|w| w.line_string(PositionSeries::empty())),
            r#"{"type":"LineString","coordinates":[]}"#
        );
    }

    #[test]
    fn geometry_collection() {
        let text = encode(|w| {
            w.geometry_collection_begin(2)?;
            w.point(&Position::xy(2.0, 3.0))?;
            let line =
                PositionSeries::from_coords(vec![2.0, 3.0, 3.0, 4.0], CoordType::XY).unwrap();
            w.line_string(&line)?;
            w.geometry_collection_end()
        });
        assert_eq!(
            text,
            concat!(
                r#"{"type":"GeometryCollection","geometries":["#,
                r#"{"type":"Point","coordinates":[2,3]},"#,
                r#"{"type":"LineString","coordinates":[[2,3],[3,4]]}]}"#,
            )
        );
    }

    #[test]
    fn fixed_decimals() {
        assert_eq!(
            encode_with(
                GeoJsonOptions {
                    decimals: Some(2),
                    ..Default::default()
                },
                |w| w.point(&Position::xy(1.0, 2.25))
            ),
            r#"{"type":"Point","coordinates":[1.00,2.25]}"#
        );
    }
}
