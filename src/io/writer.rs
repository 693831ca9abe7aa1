//! The content-writer interface decoders replay onto and encoders
//! implement.

use crate::bbox::BBox;
use crate::error::GeoScalarResult;
use crate::position::Position;
use crate::series::PositionSeries;

/// Receiver for geometry content, one method per primitive.
///
/// Every format encoder implements this trait to render its own output,
/// and every format decoder is generic over *any* implementation of it.
/// That indirection is what makes direct transcoding possible: feeding a
/// WKB decoder's calls straight into a WKT encoder converts formats
/// without building an intermediate geometry object graph.
///
/// Empty geometries ride the normal methods: an empty point is the NaN
/// sentinel position, and empty aggregates are zero-length series or
/// slices. Geometry collections nest through the begin/end pair, with the
/// contained geometries written in between.
pub trait GeometryWriter {
    /// Writes a single point.
    fn point(&mut self, position: &Position<'_>) -> GeoScalarResult<()>;

    /// Writes a line string from a position series.
    fn line_string(&mut self, positions: &PositionSeries<'_>) -> GeoScalarResult<()>;

    /// Writes a polygon from its rings (outer first, then holes).
    fn polygon(&mut self, rings: &[PositionSeries<'_>]) -> GeoScalarResult<()>;

    /// Writes a multi-point.
    fn multi_point(&mut self, points: &[Position<'_>]) -> GeoScalarResult<()>;

    /// Writes a multi-line-string.
    fn multi_line_string(&mut self, lines: &[PositionSeries<'_>]) -> GeoScalarResult<()>;

    /// Writes a multi-polygon (each element is one polygon's rings).
    fn multi_polygon(&mut self, polygons: &[Vec<PositionSeries<'_>>]) -> GeoScalarResult<()>;

    /// Opens a geometry collection of `count` members. The members follow
    /// as ordinary writer calls, then [geometry_collection_end](Self::geometry_collection_end).
    fn geometry_collection_begin(&mut self, count: usize) -> GeoScalarResult<()>;

    /// Closes the innermost open geometry collection.
    fn geometry_collection_end(&mut self) -> GeoScalarResult<()>;

    /// Writes a bounding box. Formats without a native box geometry render
    /// it as the equivalent closed polygon outline.
    fn bbox(&mut self, bbox: &BBox<'_>) -> GeoScalarResult<()>;
}
