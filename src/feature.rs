//! GeoJSON features: geometries with identity and free-form properties.

use serde_json::{Map, Value};

use crate::bbox::BBox;
use crate::error::GeoScalarResult;
use crate::geometry::Geometry;
use crate::io::geojson::{
    read_feature, read_feature_collection, write_feature, write_feature_collection,
    GeoJsonOptions,
};

/// A GeoJSON feature: an optional geometry, an optional id and a property
/// map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    /// The `id` member, a JSON string or number when present.
    pub id: Option<Value>,
    /// The feature's geometry, if any.
    pub geometry: Option<Geometry>,
    /// Free-form properties.
    pub properties: Map<String, Value>,
    /// The `bbox` member, if present.
    pub bbox: Option<BBox<'static>>,
}

impl Feature {
    /// Creates a feature wrapping a geometry, with no id or properties.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Default::default()
        }
    }

    /// Parses a feature from GeoJSON text (strict options).
    pub fn from_geojson(text: &str) -> GeoScalarResult<Self> {
        read_feature(text)
    }

    /// Encodes this feature as GeoJSON text with default (strict) options.
    pub fn to_geojson(&self) -> GeoScalarResult<String> {
        self.to_geojson_with(&GeoJsonOptions::default())
    }

    /// Encodes this feature as GeoJSON text.
    pub fn to_geojson_with(&self, options: &GeoJsonOptions) -> GeoScalarResult<String> {
        write_feature(self, options)
    }
}

/// An ordered collection of features.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    /// The member features.
    pub features: Vec<Feature>,
    /// The collection-level `bbox` member, if present.
    pub bbox: Option<BBox<'static>>,
}

impl FeatureCollection {
    /// Creates a collection from features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            bbox: None,
        }
    }

    /// Parses a feature collection from GeoJSON text (strict options).
    pub fn from_geojson(text: &str) -> GeoScalarResult<Self> {
        read_feature_collection(text)
    }

    /// Encodes this collection as GeoJSON text with default (strict)
    /// options.
    pub fn to_geojson(&self) -> GeoScalarResult<String> {
        self.to_geojson_with(&GeoJsonOptions::default())
    }

    /// Encodes this collection as GeoJSON text.
    pub fn to_geojson_with(&self, options: &GeoJsonOptions) -> GeoScalarResult<String> {
        write_feature_collection(self, options)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::position::Position;

    #[test]
    fn convenience_round_trip() {
        let mut feature = Feature::new(Geometry::Point(Position::xy(1.5, 2.5)));
        feature
            .properties
            .insert("name".to_string(), Value::String("pier".to_string()));
        let text = feature.to_geojson().unwrap();
        assert_eq!(Feature::from_geojson(&text).unwrap(), feature);

        let collection = FeatureCollection::new(vec![feature]);
        let text = collection.to_geojson().unwrap();
        assert_eq!(FeatureCollection::from_geojson(&text).unwrap(), collection);
    }
}
