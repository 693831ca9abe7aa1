//! A [GeometryWriter] that materializes decoded content as [Geometry]
//! values.

use crate::bbox::BBox;
use crate::error::{GeoScalarError, GeoScalarResult};
use crate::geometry::Geometry;
use crate::io::writer::GeometryWriter;
use crate::position::Position;
use crate::scheme::PositionScheme;
use crate::series::PositionSeries;

/// Collects writer calls into an owned [Geometry].
///
/// Positions are rebuilt through a [PositionScheme], so decoders stay
/// agnostic of the caller's concrete coordinate family. Collections nest
/// through an explicit stack.
#[derive(Debug)]
pub struct GeometryBuilder {
    scheme: PositionScheme,
    stack: Vec<Vec<Geometry>>,
    result: Option<Geometry>,
}

impl GeometryBuilder {
    /// Creates a builder using the basic scheme.
    pub fn new() -> Self {
        Self::with_scheme(PositionScheme::BASIC)
    }

    /// Creates a builder constructing positions through the given scheme.
    pub fn with_scheme(scheme: PositionScheme) -> Self {
        Self {
            scheme,
            stack: Vec::new(),
            result: None,
        }
    }

    fn make_position(&self, position: &Position<'_>) -> Position<'static> {
        self.scheme
            .make_position(position.x(), position.y(), position.opt_z(), position.opt_m())
    }

    fn push(&mut self, geometry: Geometry) {
        if let Some(members) = self.stack.last_mut() {
            members.push(geometry);
        } else {
            self.result = Some(geometry);
        }
    }

    /// Returns the built geometry. Fails if no geometry was written or a
    /// collection was left open.
    pub fn finish(self) -> GeoScalarResult<Geometry> {
        if !self.stack.is_empty() {
            return Err(GeoScalarError::MalformedCoordinates(
                "geometry collection was not closed".to_string(),
            ));
        }
        self.result.ok_or_else(|| {
            GeoScalarError::MalformedCoordinates("no geometry was written".to_string())
        })
    }
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryWriter for GeometryBuilder {
    fn point(&mut self, position: &Position<'_>) -> GeoScalarResult<()> {
        let position = self.make_position(position);
        self.push(Geometry::Point(position));
        Ok(())
    }

    fn line_string(&mut self, positions: &PositionSeries<'_>) -> GeoScalarResult<()> {
        self.push(Geometry::LineString(
            positions.copy_by_type(positions.coord_type()),
        ));
        Ok(())
    }

    fn polygon(&mut self, rings: &[PositionSeries<'_>]) -> GeoScalarResult<()> {
        self.push(Geometry::Polygon(
            rings
                .iter()
                .map(|ring| ring.copy_by_type(ring.coord_type()))
                .collect(),
        ));
        Ok(())
    }

    fn multi_point(&mut self, points: &[Position<'_>]) -> GeoScalarResult<()> {
        let points = points.iter().map(|p| self.make_position(p)).collect();
        self.push(Geometry::MultiPoint(points));
        Ok(())
    }

    fn multi_line_string(&mut self, lines: &[PositionSeries<'_>]) -> GeoScalarResult<()> {
        self.push(Geometry::MultiLineString(
            lines
                .iter()
                .map(|line| line.copy_by_type(line.coord_type()))
                .collect(),
        ));
        Ok(())
    }

    fn multi_polygon(&mut self, polygons: &[Vec<PositionSeries<'_>>]) -> GeoScalarResult<()> {
        self.push(Geometry::MultiPolygon(
            polygons
                .iter()
                .map(|rings| {
                    rings
                        .iter()
                        .map(|ring| ring.copy_by_type(ring.coord_type()))
                        .collect()
                })
                .collect(),
        ));
        Ok(())
    }

    fn geometry_collection_begin(&mut self, count: usize) -> GeoScalarResult<()> {
        self.stack.push(Vec::with_capacity(count));
        Ok(())
    }

    fn geometry_collection_end(&mut self) -> GeoScalarResult<()> {
        let members = self.stack.pop().ok_or_else(|| {
            GeoScalarError::MalformedCoordinates(
                "geometry collection end without begin".to_string(),
            )
        })?;
        self.push(Geometry::GeometryCollection(members));
        Ok(())
    }

    fn bbox(&mut self, bbox: &BBox<'_>) -> GeoScalarResult<()> {
        self.polygon(&[bbox.to_ring()])
    }
}
