//! GeoJSON decoding: parse with the `geojson` crate, replay writer calls.

use geojson::GeoJson;

use crate::bbox::BBox;
use crate::coord_type::CoordType;
use crate::error::{GeoScalarError, GeoScalarResult};
use crate::feature::{Feature, FeatureCollection};
use crate::io::builder::GeometryBuilder;
use crate::io::geojson::writer::GeoJsonOptions;
use crate::io::writer::GeometryWriter;
use crate::position::Position;
use crate::series::PositionSeries;

/// Parses a GeoJSON geometry and replays it as writer calls, using
/// default (strict) options.
pub fn read_geojson<W: GeometryWriter>(text: &str, writer: &mut W) -> GeoScalarResult<()> {
    read_geojson_with(text, writer, &GeoJsonOptions::default())
}

/// Like [read_geojson], with explicit options.
///
/// Position arity resolves 2 elements to XY and 3 to XYZ (the GeoJSON
/// convention). A 4th element is read as an m value only in lenient mode;
/// strict mode drops it.
pub fn read_geojson_with<W: GeometryWriter>(
    text: &str,
    writer: &mut W,
    options: &GeoJsonOptions,
) -> GeoScalarResult<()> {
    match text.parse::<GeoJson>()? {
        GeoJson::Geometry(geometry) => process_geometry(&geometry, writer, options),
        GeoJson::Feature(_) | GeoJson::FeatureCollection(_) => Err(GeoScalarError::GeoJson(
            "expected a bare geometry; use read_feature or read_feature_collection".to_string(),
        )),
    }
}

/// Parses a GeoJSON feature with default (strict) options.
pub fn read_feature(text: &str) -> GeoScalarResult<Feature> {
    match text.parse::<GeoJson>()? {
        GeoJson::Feature(feature) => feature_from(feature, &GeoJsonOptions::default()),
        _ => Err(GeoScalarError::GeoJson("expected a feature".to_string())),
    }
}

/// Parses a GeoJSON feature collection with default (strict) options.
pub fn read_feature_collection(text: &str) -> GeoScalarResult<FeatureCollection> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => {
            let options = GeoJsonOptions::default();
            let features = collection
                .features
                .into_iter()
                .map(|feature| feature_from(feature, &options))
                .collect::<GeoScalarResult<Vec<_>>>()?;
            let bbox = collection
                .bbox
                .map(|values| BBox::from_coords(values, None))
                .transpose()?;
            Ok(FeatureCollection { features, bbox })
        }
        _ => Err(GeoScalarError::GeoJson(
            "expected a feature collection".to_string(),
        )),
    }
}

fn feature_from(feature: geojson::Feature, options: &GeoJsonOptions) -> GeoScalarResult<Feature> {
    let geometry = feature
        .geometry
        .map(|geometry| {
            let mut builder = GeometryBuilder::new();
            process_geometry(&geometry, &mut builder, options)?;
            builder.finish()
        })
        .transpose()?;
    let id = feature.id.map(|id| match id {
        geojson::feature::Id::String(s) => serde_json::Value::String(s),
        geojson::feature::Id::Number(n) => serde_json::Value::Number(n),
    });
    let bbox = feature
        .bbox
        .map(|values| BBox::from_coords(values, None))
        .transpose()?;
    Ok(Feature {
        id,
        geometry,
        properties: feature.properties.unwrap_or_default(),
        bbox,
    })
}

fn process_geometry<W: GeometryWriter>(
    geometry: &geojson::Geometry,
    writer: &mut W,
    options: &GeoJsonOptions,
) -> GeoScalarResult<()> {
    use geojson::Value;
    match &geometry.value {
        Value::Point(position) => writer.point(&position_from(position, options)?),
        Value::MultiPoint(positions) => {
            let points = positions
                .iter()
                .map(|position| position_from(position, options))
                .collect::<GeoScalarResult<Vec<_>>>()?;
            writer.multi_point(&points)
        }
        Value::LineString(positions) => writer.line_string(&series_from(positions, options)?),
        Value::MultiLineString(lines) => {
            let lines = lines
                .iter()
                .map(|line| series_from(line, options))
                .collect::<GeoScalarResult<Vec<_>>>()?;
            writer.multi_line_string(&lines)
        }
        Value::Polygon(rings) => {
            let rings = rings
                .iter()
                .map(|ring| series_from(ring, options))
                .collect::<GeoScalarResult<Vec<_>>>()?;
            writer.polygon(&rings)
        }
        Value::MultiPolygon(polygons) => {
            let polygons = polygons
                .iter()
                .map(|rings| {
                    rings
                        .iter()
                        .map(|ring| series_from(ring, options))
                        .collect::<GeoScalarResult<Vec<_>>>()
                })
                .collect::<GeoScalarResult<Vec<_>>>()?;
            writer.multi_polygon(&polygons)
        }
        Value::GeometryCollection(geometries) => {
            writer.geometry_collection_begin(geometries.len())?;
            for geometry in geometries {
                process_geometry(geometry, writer, options)?;
            }
            writer.geometry_collection_end()
        }
    }
}

fn position_from(coords: &[f64], options: &GeoJsonOptions) -> GeoScalarResult<Position<'static>> {
    match coords.len() {
        0 => Ok(Position::empty(CoordType::XY)),
        2 => Ok(Position::xy(coords[0], coords[1])),
        3 => Ok(Position::xyz(coords[0], coords[1], coords[2])),
        4 if options.strict => Ok(Position::xyz(coords[0], coords[1], coords[2])),
        4 => Ok(Position::xyzm(coords[0], coords[1], coords[2], coords[3])),
        len => Err(GeoScalarError::MalformedCoordinates(format!(
            "a GeoJSON position needs 2 to 4 elements, got {len}"
        ))),
    }
}

fn series_from(
    positions: &[Vec<f64>],
    options: &GeoJsonOptions,
) -> GeoScalarResult<PositionSeries<'static>> {
    let first = match positions.first() {
        Some(first) => position_from(first, options)?,
        None => return PositionSeries::from_coords(Vec::new(), CoordType::XY),
    };
    let coord_type = first.coord_type();
    let mut coords = Vec::with_capacity(positions.len() * coord_type.dim());
    first.push_by_type(&mut coords, coord_type);
    for position in &positions[1..] {
        position_from(position, options)?.push_by_type(&mut coords, coord_type);
    }
    PositionSeries::from_coords(coords, coord_type)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Geometry;
    use crate::io::geojson::writer::{write_feature, write_feature_collection};

    #[test]
    fn geometry_round_trips() {
        for text in [
            r#"{"type":"Point","coordinates":[10,20.5]}"#,
            r#"{"type":"Point","coordinates":[1,2,3]}"#,
            r#"{"type":"Point","coordinates":[]}"#,
            r#"{"type":"LineString","coordinates":[[1,2],[3,4]]}"#,
            r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#,
            r#"{"type":"MultiPoint","coordinates":[[10,40],[40,30]]}"#,
            r#"{"type":"MultiLineString","coordinates":[[[1,1],[2,2]],[[3,3],[4,4]]]}"#,
            r#"{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1],[0,0]]]]}"#,
            r#"{"type":"GeometryCollection","geometries":[{"type":"Point","coordinates":[2,3]}]}"#,
        ] {
            let geometry = Geometry::from_geojson(text).unwrap();
            assert_eq!(geometry.to_geojson().unwrap(), text, "{text}");
        }
    }

    #[test]
    fn three_element_positions_are_xyz() {
        let geometry =
            Geometry::from_geojson(r#"{"type":"Point","coordinates":[1,2,3]}"#).unwrap();
        assert_eq!(geometry.coord_type(), CoordType::XYZ);
    }

    #[test]
    fn strict_mode_drops_fourth_element() {
        let text = r#"{"type":"Point","coordinates":[1,2,3,4]}"#;
        let strict = Geometry::from_geojson(text).unwrap();
        assert_eq!(strict.coord_type(), CoordType::XYZ);

        let mut builder = GeometryBuilder::new();
        read_geojson_with(
            text,
            &mut builder,
            &GeoJsonOptions {
                strict: false,
                ..Default::default()
            },
        )
        .unwrap();
        let lenient = builder.finish().unwrap();
        assert_eq!(lenient.coord_type(), CoordType::XYZM);
        assert_eq!(
            lenient,
            Geometry::Point(Position::xyzm(1.0, 2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn empty_point_surfaces_as_empty() {
        let geometry =
            Geometry::from_geojson(r#"{"type":"Point","coordinates":[]}"#).unwrap();
        assert!(geometry.is_empty());
    }

    #[test]
    fn malformed_positions_fail() {
        assert!(Geometry::from_geojson(r#"{"type":"Point","coordinates":[1]}"#).is_err());
        assert!(Geometry::from_geojson(
            r#"{"type":"Point","coordinates":[1,2,3,4,5]}"#
        )
        .is_err());
        assert!(Geometry::from_geojson(r#"{"type":"Point"}"#).is_err());
        assert!(Geometry::from_geojson("not json").is_err());
        assert!(Geometry::from_geojson(
            r#"{"type":"Feature","geometry":null,"properties":null}"#
        )
        .is_err());
    }

    #[test]
    fn feature_round_trip() {
        let text = concat!(
            r#"{"type":"Feature","id":7,"bbox":[0,0,2,3],"#,
            r#""geometry":{"type":"Point","coordinates":[1,2]},"#,
            r#""properties":{"name":"summit"}}"#,
        );
        let feature = read_feature(text).unwrap();
        assert_eq!(feature.id, Some(serde_json::json!(7)));
        assert_eq!(
            feature.geometry,
            Some(Geometry::Point(Position::xy(1.0, 2.0)))
        );
        assert_eq!(
            feature.properties.get("name"),
            Some(&serde_json::json!("summit"))
        );
        assert_eq!(feature.bbox, Some(BBox::new_2d(0.0, 0.0, 2.0, 3.0)));
        assert_eq!(
            write_feature(&feature, &GeoJsonOptions::default()).unwrap(),
            text
        );
    }

    #[test]
    fn feature_collection_round_trip() {
        let text = concat!(
            r#"{"type":"FeatureCollection","features":["#,
            r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]},"properties":{}},"#,
            r#"{"type":"Feature","geometry":null,"properties":{"empty":true}}"#,
            r#"]}"#,
        );
        let collection = read_feature_collection(text).unwrap();
        assert_eq!(collection.features.len(), 2);
        assert!(collection.features[1].geometry.is_none());
        assert_eq!(
            write_feature_collection(&collection, &GeoJsonOptions::default()).unwrap(),
            text
        );
    }
}
