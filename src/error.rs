//! Defines [`GeoScalarError`], representing all errors returned by this crate.

use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoScalarError {
    /// Coordinate data whose element count does not match the declared or
    /// inferred coordinate type.
    #[error("Malformed coordinate data: {0}")]
    MalformedCoordinates(String),

    /// A geometry type tag or code a decoder cannot map to a supported
    /// geometry kind or dimensionality.
    #[error("Unsupported or ambiguous geometry type: {0}")]
    UnsupportedType(String),

    /// A binary or text stream that ends mid-structure.
    #[error("Truncated input: {0}")]
    TruncatedInput(String),

    /// A negative tolerance passed to an equality or intersection test.
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(f64),

    /// WKT error
    #[error("WKT error: {0}")]
    Wkt(String),

    /// WKB error
    #[error("WKB error: {0}")]
    Wkb(String),

    /// GeoJSON error
    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl From<geojson::Error> for GeoScalarError {
    fn from(err: geojson::Error) -> Self {
        GeoScalarError::GeoJson(err.to_string())
    }
}

/// Crate-specific result type.
pub type GeoScalarResult<T> = std::result::Result<T, GeoScalarError>;
