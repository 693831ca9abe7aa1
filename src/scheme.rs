//! Factory pairs letting generic algorithms construct positions and boxes
//! in the caller's preferred concrete coordinate family.

use crate::bbox::BBox;
use crate::position::Position;

/// An immutable pair of factory functions for positions and boxes.
///
/// Generic algorithms (bounding-box computation, decode-side geometry
/// building) construct their results through a scheme instead of
/// hardcoding a concrete family. Schemes are plain `Copy` values;
/// construct one once and pass it by value or reference thereafter.
#[derive(Debug, Clone, Copy)]
pub struct PositionScheme {
    position: fn(f64, f64, Option<f64>, Option<f64>) -> Position<'static>,
    bbox: fn(&Position<'_>, &Position<'_>) -> BBox<'static>,
}

impl PositionScheme {
    /// The scheme producing plain [Position] and [BBox] values.
    pub const BASIC: PositionScheme = PositionScheme {
        position: basic_position,
        bbox: basic_bbox,
    };

    /// Creates a scheme from explicit factories.
    pub const fn new(
        position: fn(f64, f64, Option<f64>, Option<f64>) -> Position<'static>,
        bbox: fn(&Position<'_>, &Position<'_>) -> BBox<'static>,
    ) -> Self {
        Self { position, bbox }
    }

    /// Builds a position through this scheme's position factory.
    pub fn make_position(
        &self,
        x: f64,
        y: f64,
        z: Option<f64>,
        m: Option<f64>,
    ) -> Position<'static> {
        (self.position)(x, y, z, m)
    }

    /// Builds a box through this scheme's box factory.
    pub fn make_bbox(&self, min: &Position<'_>, max: &Position<'_>) -> BBox<'static> {
        (self.bbox)(min, max)
    }
}

impl Default for PositionScheme {
    fn default() -> Self {
        Self::BASIC
    }
}

fn basic_position(x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Position<'static> {
    Position::new(x, y, z, m)
}

fn basic_bbox(min: &Position<'_>, max: &Position<'_>) -> BBox<'static> {
    BBox::from_positions(min, max)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord_type::CoordType;

    #[test]
    fn basic_scheme_builds_plain_values() {
        let scheme = PositionScheme::BASIC;
        let p = scheme.make_position(1.0, 2.0, Some(3.0), None);
        assert_eq!(p, Position::xyz(1.0, 2.0, 3.0));

        let b = scheme.make_bbox(&Position::xy(0.0, 0.0), &Position::xy(1.0, 1.0));
        assert_eq!(b, BBox::new_2d(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn custom_factories_take_over() {
        fn always_measured(x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Position<'static> {
            Position::new(x, y, z, Some(m.unwrap_or(0.0)))
        }
        let scheme = PositionScheme::new(always_measured, BBox::from_positions);
        let p = scheme.make_position(1.0, 2.0, None, None);
        assert_eq!(p.coord_type(), CoordType::XYM);
    }
}
