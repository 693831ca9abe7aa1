//! Shared geometry fixtures for the codec tests.

use crate::coord_type::CoordType;
use crate::geometry::Geometry;
use crate::position::Position;
use crate::series::PositionSeries;

/// `POINT ZM(2.1 -3.4 34.2 0.2)`, the canonical four-axis fixture.
pub(crate) fn point_zm_fixture() -> Geometry {
    Geometry::Point(Position::xyzm(2.1, -3.4, 34.2, 0.2))
}

/// The two-ring polygon fixture shared by the WKB hex tests.
pub(crate) fn two_ring_polygon_fixture() -> Geometry {
    let outer = PositionSeries::from_coords(
        vec![35.0, 10.0, 45.0, 45.0, 15.0, 40.0, 10.0, 20.0, 35.0, 10.0],
        CoordType::XY,
    )
    .unwrap();
    let hole = PositionSeries::from_coords(
        vec![20.0, 30.0, 35.0, 35.0, 30.0, 20.0, 20.0, 30.0],
        CoordType::XY,
    )
    .unwrap();
    Geometry::Polygon(vec![outer, hole])
}

/// A small mixed geometry collection (2D members only).
pub(crate) fn collection_fixture() -> Geometry {
    Geometry::GeometryCollection(vec![
        Geometry::Point(Position::xy(2.0, 3.0)),
        Geometry::LineString(
            PositionSeries::from_coords(vec![2.0, 3.0, 3.0, 4.0], CoordType::XY).unwrap(),
        ),
    ])
}
