//! Axis-aligned bounding boxes with owned or borrowed coordinate storage.

use std::borrow::Cow;
use std::fmt::Display;

use crate::coord_type::CoordType;
use crate::error::{GeoScalarError, GeoScalarResult};
use crate::position::Position;
use crate::series::PositionSeries;
use crate::util::check_tolerance;

/// A 2D anchor inside (or on the edge of) a box, as a pair of fractions in
/// `[-1, 1]` per axis: -1 is the min edge, 0 the center, 1 the max edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// Horizontal fraction.
    pub x: f64,
    /// Vertical fraction.
    pub y: f64,
}

impl Alignment {
    /// Creates an alignment from per-axis fractions.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The center of the box.
    pub const CENTER: Self = Self::new(0.0, 0.0);
    /// The middle of the max-y edge.
    pub const NORTH: Self = Self::new(0.0, 1.0);
    /// The max-x/max-y corner.
    pub const NORTH_EAST: Self = Self::new(1.0, 1.0);
    /// The middle of the max-x edge.
    pub const EAST: Self = Self::new(1.0, 0.0);
    /// The max-x/min-y corner.
    pub const SOUTH_EAST: Self = Self::new(1.0, -1.0);
    /// The middle of the min-y edge.
    pub const SOUTH: Self = Self::new(0.0, -1.0);
    /// The min-x/min-y corner.
    pub const SOUTH_WEST: Self = Self::new(-1.0, -1.0);
    /// The middle of the min-x edge.
    pub const WEST: Self = Self::new(-1.0, 0.0);
    /// The min-x/max-y corner.
    pub const NORTH_WEST: Self = Self::new(-1.0, 1.0);
}

/// An axis-aligned bounding volume: min/max per axis, optionally extended
/// with z and m ranges.
///
/// Storage is a flat buffer `[min..., max...]` of `2 * dim` values, either
/// owned or borrowed from a caller-owned slice. `min <= max` is NOT
/// enforced per axis: inverted boxes (e.g. geographic boxes spanning the
/// antimeridian) are valid and meaningful, so widths and heights are
/// signed and never clamped.
#[derive(Debug, Clone)]
pub struct BBox<'a> {
    coords: Cow<'a, [f64]>,
    coord_type: CoordType,
}

impl BBox<'static> {
    /// Creates a 2D box with owned storage.
    pub fn new_2d(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            coords: Cow::Owned(vec![min_x, min_y, max_x, max_y]),
            coord_type: CoordType::XY,
        }
    }

    /// Creates a 3D box with owned storage.
    pub fn new_3d(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self {
            coords: Cow::Owned(vec![min_x, min_y, min_z, max_x, max_y, max_z]),
            coord_type: CoordType::XYZ,
        }
    }

    /// Creates a box from its min and max positions, on the axes both
    /// positions carry.
    pub fn from_positions(min: &Position<'_>, max: &Position<'_>) -> Self {
        let coord_type = CoordType::select(
            min.coord_type().is_3d() && max.coord_type().is_3d(),
            min.coord_type().is_measured() && max.coord_type().is_measured(),
        );
        let mut coords = Vec::with_capacity(2 * coord_type.dim());
        for p in [min, max] {
            coords.push(p.x());
            coords.push(p.y());
            if coord_type.is_3d() {
                coords.push(p.z());
            }
            if coord_type.is_measured() {
                coords.push(p.m());
            }
        }
        Self {
            coords: Cow::Owned(coords),
            coord_type,
        }
    }

    /// Creates an owned box from a flat array of 4, 6 or 8 values laid out
    /// `[min..., max...]`.
    ///
    /// Six values resolve to XYZ unless an explicit type says otherwise;
    /// XYM boxes must be requested via `coord_type`. A box needs at least
    /// 4 values.
    pub fn from_coords(values: Vec<f64>, coord_type: Option<CoordType>) -> GeoScalarResult<Self> {
        let coord_type = resolve_box_type(values.len(), coord_type)?;
        Ok(Self {
            coords: Cow::Owned(values),
            coord_type,
        })
    }
}

fn resolve_box_type(len: usize, coord_type: Option<CoordType>) -> GeoScalarResult<CoordType> {
    let coord_type = match coord_type {
        Some(coord_type) => coord_type,
        None => match len {
            4 => CoordType::XY,
            6 => CoordType::XYZ,
            8 => CoordType::XYZM,
            _ => {
                return Err(GeoScalarError::MalformedCoordinates(format!(
                    "a box needs 4, 6 or 8 coordinate values, got {len}"
                )))
            }
        },
    };
    if len != 2 * coord_type.dim() {
        return Err(GeoScalarError::MalformedCoordinates(format!(
            "expected {} values for a {} box, got {}",
            2 * coord_type.dim(),
            coord_type,
            len
        )));
    }
    Ok(coord_type)
}

impl<'a> BBox<'a> {
    /// Creates a zero-copy view over a caller-owned flat buffer laid out
    /// `[min..., max...]`. The buffer length must be exactly `2 * dim` for
    /// the resolved coordinate type (6 values resolve to XYZ by default).
    pub fn view(buf: &'a [f64], coord_type: Option<CoordType>) -> GeoScalarResult<Self> {
        let coord_type = resolve_box_type(buf.len(), coord_type)?;
        Ok(Self {
            coords: Cow::Borrowed(buf),
            coord_type,
        })
    }

    /// The coordinate type of this box.
    pub fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    fn dim(&self) -> usize {
        self.coord_type.dim()
    }

    /// The minimum x value.
    pub fn min_x(&self) -> f64 {
        self.coords[0]
    }

    /// The minimum y value.
    pub fn min_y(&self) -> f64 {
        self.coords[1]
    }

    /// The minimum z value, or 0.0 if the box is not 3D.
    pub fn min_z(&self) -> f64 {
        self.opt_min_z().unwrap_or(0.0)
    }

    /// The minimum z value, if the box is 3D.
    pub fn opt_min_z(&self) -> Option<f64> {
        self.coord_type.is_3d().then(|| self.coords[2])
    }

    /// The minimum m value, or 0.0 if the box is not measured.
    pub fn min_m(&self) -> f64 {
        self.opt_min_m().unwrap_or(0.0)
    }

    /// The minimum m value, if the box is measured.
    pub fn opt_min_m(&self) -> Option<f64> {
        self.coord_type.index_for_m().map(|i| self.coords[i])
    }

    /// The maximum x value.
    pub fn max_x(&self) -> f64 {
        self.coords[self.dim()]
    }

    /// The maximum y value.
    pub fn max_y(&self) -> f64 {
        self.coords[self.dim() + 1]
    }

    /// The maximum z value, or 0.0 if the box is not 3D.
    pub fn max_z(&self) -> f64 {
        self.opt_max_z().unwrap_or(0.0)
    }

    /// The maximum z value, if the box is 3D.
    pub fn opt_max_z(&self) -> Option<f64> {
        self.coord_type.is_3d().then(|| self.coords[self.dim() + 2])
    }

    /// The maximum m value, or 0.0 if the box is not measured.
    pub fn max_m(&self) -> f64 {
        self.opt_max_m().unwrap_or(0.0)
    }

    /// The maximum m value, if the box is measured.
    pub fn opt_max_m(&self) -> Option<f64> {
        self.coord_type
            .index_for_m()
            .map(|i| self.coords[self.dim() + i])
    }

    /// The minimum corner as a zero-copy view into this box's storage.
    pub fn min(&self) -> Position<'_> {
        Position::view_unchecked(&self.coords, self.coord_type, 0)
    }

    /// The maximum corner as a zero-copy view into this box's storage.
    pub fn max(&self) -> Position<'_> {
        Position::view_unchecked(&self.coords, self.coord_type, self.dim())
    }

    /// The coordinate values of this box as a flat `[min..., max...]`
    /// slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }

    /// Signed width (`max_x - min_x`); negative for inverted boxes.
    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    /// Signed height (`max_y - min_y`); negative for inverted boxes.
    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// The distinct 2D corners of this box.
    ///
    /// Returns 1 position when min equals max in 2D, 2 positions when the
    /// corners share exactly one 2D axis value, and otherwise 4 positions
    /// in the order min, (max_x, min_y), max, (min_x, max_y). Synthesized
    /// corners carry the midpoint of the box's z and m ranges.
    pub fn corners_2d(&self) -> Vec<Position<'static>> {
        let same_x = self.min_x() == self.max_x();
        let same_y = self.min_y() == self.max_y();
        if same_x && same_y {
            return vec![self.min().into_owned()];
        }
        if same_x || same_y {
            return vec![self.min().into_owned(), self.max().into_owned()];
        }
        let mid_z = self
            .opt_min_z()
            .zip(self.opt_max_z())
            .map(|(a, b)| (a + b) / 2.0);
        let mid_m = self
            .opt_min_m()
            .zip(self.opt_max_m())
            .map(|(a, b)| (a + b) / 2.0);
        vec![
            self.min().into_owned(),
            Position::new(self.max_x(), self.min_y(), mid_z, mid_m),
            self.max().into_owned(),
            Position::new(self.min_x(), self.max_y(), mid_z, mid_m),
        ]
    }

    /// The 2D position at the given alignment within this box:
    /// `min + size * (1 + fraction) / 2` per axis.
    pub fn aligned_2d(&self, alignment: Alignment) -> Position<'static> {
        Position::xy(
            self.min_x() + self.width() * (1.0 + alignment.x) / 2.0,
            self.min_y() + self.height() * (1.0 + alignment.y) / 2.0,
        )
    }

    /// The minimum box containing both this box and `other`. The z and m
    /// ranges are present in the result only when present in both inputs.
    pub fn merge(&self, other: &BBox<'_>) -> BBox<'static> {
        let coord_type = CoordType::select(
            self.coord_type.is_3d() && other.coord_type().is_3d(),
            self.coord_type.is_measured() && other.coord_type().is_measured(),
        );
        let mut coords = Vec::with_capacity(2 * coord_type.dim());
        coords.push(self.min_x().min(other.min_x()));
        coords.push(self.min_y().min(other.min_y()));
        if coord_type.is_3d() {
            coords.push(self.min_z().min(other.min_z()));
        }
        if coord_type.is_measured() {
            coords.push(self.min_m().min(other.min_m()));
        }
        coords.push(self.max_x().max(other.max_x()));
        coords.push(self.max_y().max(other.max_y()));
        if coord_type.is_3d() {
            coords.push(self.max_z().max(other.max_z()));
        }
        if coord_type.is_measured() {
            coords.push(self.max_m().max(other.max_m()));
        }
        BBox {
            coords: Cow::Owned(coords),
            coord_type,
        }
    }

    /// 2D interval-overlap test against another box.
    pub fn intersects_2d(&self, other: &BBox<'_>) -> bool {
        !(self.min_x() > other.max_x()
            || self.max_x() < other.min_x()
            || self.min_y() > other.max_y()
            || self.max_y() < other.min_y())
    }

    /// Interval-overlap test on every present axis. Returns false when the
    /// operands disagree on which axes are present.
    pub fn intersects(&self, other: &BBox<'_>) -> bool {
        if self.coord_type.is_3d() != other.coord_type().is_3d()
            || self.coord_type.is_measured() != other.coord_type().is_measured()
        {
            return false;
        }
        if !self.intersects_2d(other) {
            return false;
        }
        if self.coord_type.is_3d()
            && (self.min_z() > other.max_z() || self.max_z() < other.min_z())
        {
            return false;
        }
        if self.coord_type.is_measured()
            && (self.min_m() > other.max_m() || self.max_m() < other.min_m())
        {
            return false;
        }
        true
    }

    /// 2D containment test for a position.
    pub fn intersects_point_2d(&self, position: &Position<'_>) -> bool {
        self.min_x() <= position.x()
            && position.x() <= self.max_x()
            && self.min_y() <= position.y()
            && position.y() <= self.max_y()
    }

    /// Containment test on every present axis. Returns false when the box
    /// and the position disagree on which axes are present.
    pub fn intersects_point(&self, position: &Position<'_>) -> bool {
        if self.coord_type.is_3d() != position.coord_type().is_3d()
            || self.coord_type.is_measured() != position.coord_type().is_measured()
        {
            return false;
        }
        if !self.intersects_point_2d(position) {
            return false;
        }
        if self.coord_type.is_3d()
            && !(self.min_z() <= position.z() && position.z() <= self.max_z())
        {
            return false;
        }
        if self.coord_type.is_measured()
            && !(self.min_m() <= position.m() && position.m() <= self.max_m())
        {
            return false;
        }
        true
    }

    /// Compares the 2D min/max pairs within an absolute per-axis
    /// tolerance.
    pub fn equals_2d(&self, other: &BBox<'_>, tolerance: f64) -> GeoScalarResult<bool> {
        check_tolerance(tolerance)?;
        Ok((self.min_x() - other.min_x()).abs() <= tolerance
            && (self.min_y() - other.min_y()).abs() <= tolerance
            && (self.max_x() - other.max_x()).abs() <= tolerance
            && (self.max_y() - other.max_y()).abs() <= tolerance)
    }

    /// Compares min/max pairs within horizontal and vertical tolerances.
    /// Returns false if either box lacks a z range.
    pub fn equals_3d(
        &self,
        other: &BBox<'_>,
        tolerance_horiz: f64,
        tolerance_vert: f64,
    ) -> GeoScalarResult<bool> {
        check_tolerance(tolerance_horiz)?;
        check_tolerance(tolerance_vert)?;
        if !self.coord_type.is_3d() || !other.coord_type().is_3d() {
            return Ok(false);
        }
        Ok(self.equals_2d(other, tolerance_horiz)?
            && (self.min_z() - other.min_z()).abs() <= tolerance_vert
            && (self.max_z() - other.max_z()).abs() <= tolerance_vert)
    }

    /// The box outline as a closed 2D polygon ring of 5 positions.
    /// Synthesized corners carry the midpoint of the z and m ranges.
    pub fn to_ring(&self) -> PositionSeries<'static> {
        let mid_z = self
            .opt_min_z()
            .zip(self.opt_max_z())
            .map(|(a, b)| (a + b) / 2.0);
        let mid_m = self
            .opt_min_m()
            .zip(self.opt_max_m())
            .map(|(a, b)| (a + b) / 2.0);
        PositionSeries::from_positions(
            vec![
                self.min().into_owned(),
                Position::new(self.max_x(), self.min_y(), mid_z, mid_m),
                self.max().into_owned(),
                Position::new(self.min_x(), self.max_y(), mid_z, mid_m),
                self.min().into_owned(),
            ],
            Some(self.coord_type),
        )
    }

    /// Copies this box into owned storage, ending any borrow.
    pub fn into_owned(self) -> BBox<'static> {
        BBox {
            coords: Cow::Owned(self.coords.into_owned()),
            coord_type: self.coord_type,
        }
    }
}

/// Exact equality: same coordinate type and bit-equal min/max values.
impl PartialEq for BBox<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.coord_type == other.coord_type && self.as_slice() == other.as_slice()
    }
}

impl Display for BBox<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for value in self.as_slice() {
            if !first {
                write!(f, ",")?;
            }
            first = false;
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accessors_and_size() {
        let b = BBox::new_3d(1.0, 2.0, 3.0, 11.0, 22.0, 33.0);
        assert_eq!(b.coord_type(), CoordType::XYZ);
        assert_eq!(b.min_x(), 1.0);
        assert_eq!(b.min_y(), 2.0);
        assert_eq!(b.opt_min_z(), Some(3.0));
        assert_eq!(b.max_x(), 11.0);
        assert_eq!(b.max_y(), 22.0);
        assert_eq!(b.opt_max_z(), Some(33.0));
        assert_eq!(b.width(), 10.0);
        assert_eq!(b.height(), 20.0);
        assert_eq!(b.min(), Position::xyz(1.0, 2.0, 3.0));
        assert_eq!(b.max(), Position::xyz(11.0, 22.0, 33.0));
    }

    #[test]
    fn inverted_boxes_are_not_clamped() {
        let b = BBox::new_2d(170.0, -10.0, -170.0, 10.0);
        assert_eq!(b.width(), -340.0);
        assert_eq!(b.height(), 20.0);
    }

    #[test]
    fn six_values_default_to_xyz() {
        let b = BBox::from_coords(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], None).unwrap();
        assert_eq!(b.coord_type(), CoordType::XYZ);

        let measured =
            BBox::from_coords(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], Some(CoordType::XYM)).unwrap();
        assert_eq!(measured.coord_type(), CoordType::XYM);
        assert_eq!(measured.opt_min_m(), Some(3.0));

        assert!(BBox::from_coords(vec![1.0, 2.0, 3.0], None).is_err());
        assert!(BBox::from_coords(vec![1.0, 2.0, 3.0, 4.0], Some(CoordType::XYZ)).is_err());
    }

    #[test]
    fn view_is_zero_copy() {
        let buf = [1.0, 2.0, 3.0, 4.0];
        let b = BBox::view(&buf, None).unwrap();
        assert!(std::ptr::eq(b.as_slice().as_ptr(), buf.as_ptr()));
        assert_eq!(b.min_x(), 1.0);
        assert_eq!(b.max_y(), 4.0);
    }

    #[test]
    fn corner_counts() {
        let degenerate = BBox::new_2d(5.0, 6.0, 5.0, 6.0);
        assert_eq!(degenerate.corners_2d().len(), 1);

        let vertical = BBox::new_2d(5.0, 0.0, 5.0, 6.0);
        assert_eq!(vertical.corners_2d().len(), 2);

        let full = BBox::new_2d(0.0, 0.0, 4.0, 6.0);
        let corners = full.corners_2d();
        assert_eq!(corners.len(), 4);
        assert_eq!(corners[0], Position::xy(0.0, 0.0));
        assert_eq!(corners[1], Position::xy(4.0, 0.0));
        assert_eq!(corners[2], Position::xy(4.0, 6.0));
        assert_eq!(corners[3], Position::xy(0.0, 6.0));
    }

    #[test]
    fn synthesized_corners_use_mid_z() {
        let b = BBox::new_3d(0.0, 0.0, 10.0, 4.0, 6.0, 30.0);
        let corners = b.corners_2d();
        assert_eq!(corners[1].z(), 20.0);
        assert_eq!(corners[3].z(), 20.0);
        // the min/max corners keep their own z
        assert_eq!(corners[0].z(), 10.0);
        assert_eq!(corners[2].z(), 30.0);
    }

    #[test]
    fn aligned_2d() {
        let b = BBox::new_2d(0.0, 0.0, 10.0, 20.0);
        assert_eq!(b.aligned_2d(Alignment::CENTER), Position::xy(5.0, 10.0));
        assert_eq!(b.aligned_2d(Alignment::SOUTH_WEST), Position::xy(0.0, 0.0));
        assert_eq!(b.aligned_2d(Alignment::NORTH_EAST), Position::xy(10.0, 20.0));
        assert_eq!(b.aligned_2d(Alignment::EAST), Position::xy(10.0, 10.0));
        assert_eq!(
            b.aligned_2d(Alignment::new(0.5, -0.5)),
            Position::xy(7.5, 5.0)
        );
    }

    #[test]
    fn merge_keeps_common_axes() {
        let a = BBox::new_3d(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let b = BBox::new_3d(2.0, -1.0, 0.5, 3.0, 0.5, 2.0);
        let merged = a.merge(&b);
        assert_eq!(merged.coord_type(), CoordType::XYZ);
        assert_eq!(merged.as_slice(), &[0.0, -1.0, 0.0, 3.0, 1.0, 2.0]);

        let flat = BBox::new_2d(2.0, 2.0, 3.0, 3.0);
        let merged = a.merge(&flat);
        assert_eq!(merged.coord_type(), CoordType::XY);
        assert_eq!(merged.as_slice(), &[0.0, 0.0, 3.0, 3.0]);
    }

    #[test]
    fn intersection_tests() {
        let a = BBox::new_2d(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new_2d(5.0, 5.0, 15.0, 15.0);
        let c = BBox::new_2d(11.0, 11.0, 12.0, 12.0);
        assert!(a.intersects_2d(&b));
        assert!(!a.intersects_2d(&c));
        assert!(a.intersects(&b));

        // mismatched axes never intersect in the 3D-aware test
        let z = BBox::new_3d(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&z));
        assert!(a.intersects_2d(&z));

        assert!(a.intersects_point_2d(&Position::xy(10.0, 0.0)));
        assert!(!a.intersects_point_2d(&Position::xy(10.1, 0.0)));
        assert!(!a.intersects_point(&Position::xyz(5.0, 5.0, 5.0)));
        assert!(z.intersects_point(&Position::xyz(5.0, 5.0, 5.0)));
        assert!(!z.intersects_point(&Position::xyz(5.0, 5.0, 11.0)));
    }

    #[test]
    fn tolerance_equality() {
        let a = BBox::new_2d(0.0, 0.0, 1.0, 1.0);
        let b = BBox::new_2d(0.01, 0.0, 1.0, 0.99);
        assert!(a.equals_2d(&b, 0.05).unwrap());
        assert!(!a.equals_2d(&b, 0.001).unwrap());
        assert!(a.equals_2d(&b, -1.0).is_err());

        let za = BBox::new_3d(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let zb = BBox::new_3d(0.0, 0.0, 0.001, 1.0, 1.0, 1.0);
        assert!(za.equals_3d(&zb, 0.01, 0.01).unwrap());
        assert!(!za.equals_3d(&a, 0.01, 0.01).unwrap());
    }

    #[test]
    fn to_ring_is_closed() {
        let b = BBox::new_2d(0.0, 0.0, 4.0, 6.0);
        let ring = b.to_ring();
        assert_eq!(ring.len(), 5);
        assert!(ring.is_closed());
    }
}
