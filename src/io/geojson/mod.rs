//! GeoJSON (RFC 7946) encoding and decoding.

mod reader;
mod writer;

pub use reader::{read_feature, read_feature_collection, read_geojson, read_geojson_with};
pub use writer::{write_feature, write_feature_collection, GeoJsonOptions, GeoJsonWriter};
