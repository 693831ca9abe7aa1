//! A single geospatial point with owned or borrowed coordinate storage.

use std::borrow::Cow;
use std::fmt::Display;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use crate::coord_type::CoordType;
use crate::error::{GeoScalarError, GeoScalarResult};
use crate::projection::Projection;
use crate::util::check_tolerance;

/// A single geospatial point exposing x, y and optionally z and m axes.
///
/// A position either owns its coordinate values or borrows them from a
/// caller-owned flat buffer (a *view*), optionally at a `start` offset into
/// a larger shared buffer such as the backing array of a
/// [`PositionSeries`](crate::series::PositionSeries). Views never copy; a
/// view reads through to the buffer it was created over, and the borrow
/// checker guarantees the buffer cannot be mutated or dropped while any
/// view over it is alive.
///
/// ```
/// use geoscalar::{CoordType, Position};
///
/// let owned = Position::xyz(10.0, 20.0, 30.0);
/// assert_eq!(owned.z(), 30.0);
///
/// let buffer = [1.0, 2.0, 3.0, 4.0];
/// let view = Position::view(&buffer, CoordType::XY, 2).unwrap();
/// assert_eq!((view.x(), view.y()), (3.0, 4.0));
/// ```
#[derive(Debug, Clone)]
pub struct Position<'a> {
    coords: Cow<'a, [f64]>,
    start: usize,
    coord_type: CoordType,
}

impl Position<'static> {
    /// Creates a 2D position with owned storage.
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            coords: Cow::Owned(vec![x, y]),
            start: 0,
            coord_type: CoordType::XY,
        }
    }

    /// Creates a 3D position with owned storage.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            coords: Cow::Owned(vec![x, y, z]),
            start: 0,
            coord_type: CoordType::XYZ,
        }
    }

    /// Creates a measured 2D position with owned storage.
    pub fn xym(x: f64, y: f64, m: f64) -> Self {
        Self {
            coords: Cow::Owned(vec![x, y, m]),
            start: 0,
            coord_type: CoordType::XYM,
        }
    }

    /// Creates a measured 3D position with owned storage.
    pub fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            coords: Cow::Owned(vec![x, y, z, m]),
            start: 0,
            coord_type: CoordType::XYZM,
        }
    }

    /// Creates an owned position whose coordinate type is derived from the
    /// presence of the optional axes.
    pub fn new(x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Self {
        match (z, m) {
            (None, None) => Self::xy(x, y),
            (Some(z), None) => Self::xyz(x, y, z),
            (None, Some(m)) => Self::xym(x, y, m),
            (Some(z), Some(m)) => Self::xyzm(x, y, z, m),
        }
    }

    /// The reserved empty-point sentinel: every axis is NaN.
    ///
    /// WKB has no dedicated tag for an empty point, so the sentinel doubles
    /// as its wire representation. See [`Position::is_empty`].
    pub fn empty(coord_type: CoordType) -> Self {
        Self {
            coords: Cow::Owned(vec![f64::NAN; coord_type.dim()]),
            start: 0,
            coord_type,
        }
    }

    /// Creates an owned position from a flat slice of 2, 3 or 4 values.
    ///
    /// Three values resolve to XYZ; pass an explicit type to
    /// [`Position::from_slice_by_type`] for XYM data.
    pub fn from_slice(values: &[f64]) -> GeoScalarResult<Self> {
        Self::from_slice_by_type(values, CoordType::from_dim(values.len())?)
    }

    /// Creates an owned position from a flat slice interpreted as the given
    /// coordinate type.
    pub fn from_slice_by_type(values: &[f64], coord_type: CoordType) -> GeoScalarResult<Self> {
        if values.len() != coord_type.dim() {
            return Err(GeoScalarError::MalformedCoordinates(format!(
                "expected {} values for a {} position, got {}",
                coord_type.dim(),
                coord_type,
                values.len()
            )));
        }
        Ok(Self {
            coords: Cow::Owned(values.to_vec()),
            start: 0,
            coord_type,
        })
    }
}

impl<'a> Position<'a> {
    /// Creates a zero-copy view over a caller-owned flat buffer.
    ///
    /// The buffer must contain at least `start + coord_type.dim()` values.
    /// This is checked once here and never re-validated.
    pub fn view(buf: &'a [f64], coord_type: CoordType, start: usize) -> GeoScalarResult<Self> {
        if buf.len() < start + coord_type.dim() {
            return Err(GeoScalarError::MalformedCoordinates(format!(
                "buffer of {} values cannot hold a {} position starting at {}",
                buf.len(),
                coord_type,
                start
            )));
        }
        Ok(Self {
            coords: Cow::Borrowed(buf),
            start,
            coord_type,
        })
    }

    // Callers must uphold the `view` length precondition themselves.
    pub(crate) fn view_unchecked(buf: &'a [f64], coord_type: CoordType, start: usize) -> Self {
        Self {
            coords: Cow::Borrowed(buf),
            start,
            coord_type,
        }
    }

    /// The coordinate type of this position.
    pub fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    fn raw(&self, i: usize) -> f64 {
        self.coords[self.start + i]
    }

    /// The x coordinate.
    pub fn x(&self) -> f64 {
        self.raw(0)
    }

    /// The y coordinate.
    pub fn y(&self) -> f64 {
        self.raw(1)
    }

    /// The z coordinate, or 0.0 if the position is not 3D.
    pub fn z(&self) -> f64 {
        self.opt_z().unwrap_or(0.0)
    }

    /// The z coordinate, if the position is 3D.
    pub fn opt_z(&self) -> Option<f64> {
        self.coord_type.is_3d().then(|| self.raw(2))
    }

    /// The m value, or 0.0 if the position is not measured.
    pub fn m(&self) -> f64 {
        self.opt_m().unwrap_or(0.0)
    }

    /// The m value, if the position is measured.
    pub fn opt_m(&self) -> Option<f64> {
        self.coord_type.index_for_m().map(|i| self.raw(i))
    }

    /// Coordinate value by positional axis index.
    ///
    /// The index follows the flat layout of the coordinate type, so for a
    /// measured 2D position index 2 is m (not z), while for 3D positions
    /// index 2 is z and index 3 is m. An out-of-range index returns 0.0
    /// rather than failing; callers rely on this lenient behavior.
    pub fn value_at(&self, index: usize) -> f64 {
        if index < self.coord_type.dim() {
            self.raw(index)
        } else {
            0.0
        }
    }

    /// The coordinate values of this position as a flat slice of
    /// `coord_type().dim()` values.
    pub fn as_slice(&self) -> &[f64] {
        &self.coords[self.start..self.start + self.coord_type.dim()]
    }

    // Appends this position's values to `out`, widening or narrowing to the
    // requested type with missing axes read as 0.0.
    pub(crate) fn push_by_type(&self, out: &mut Vec<f64>, coord_type: CoordType) {
        out.push(self.x());
        out.push(self.y());
        if coord_type.is_3d() {
            out.push(self.z());
        }
        if coord_type.is_measured() {
            out.push(self.m());
        }
    }

    /// True if this position is the reserved empty-point sentinel.
    pub fn is_empty(&self) -> bool {
        self.x().is_nan() && self.y().is_nan()
    }

    /// Returns a copy with any supplied axes replaced.
    ///
    /// Supplying z or m on a position that previously lacked that axis
    /// widens the result's coordinate type to include it. Axes that are
    /// not supplied keep their previous value (or stay absent).
    pub fn copy_with(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        m: Option<f64>,
    ) -> Position<'static> {
        Position::new(
            x.unwrap_or_else(|| self.x()),
            y.unwrap_or_else(|| self.y()),
            z.or_else(|| self.opt_z()),
            m.or_else(|| self.opt_m()),
        )
    }

    /// Rebuilds this position as the given coordinate type, dropping axes
    /// absent from the target and defaulting newly required axes to 0.0.
    pub fn copy_by_type(&self, coord_type: CoordType) -> Position<'static> {
        Position::new(
            self.x(),
            self.y(),
            coord_type.is_3d().then(|| self.z()),
            coord_type.is_measured().then(|| self.m()),
        )
    }

    /// Detaches this position from any larger shared buffer.
    ///
    /// If the position is a sub-view (non-zero start, or a buffer longer
    /// than one position), returns a new position with tightly-sized owned
    /// storage; otherwise returns `self` unchanged. Use this when keeping a
    /// single position from a series long-term, so the series' buffer can
    /// be released.
    pub fn packed(self) -> Position<'a> {
        let dim = self.coord_type.dim();
        if self.start == 0 && self.coords.len() == dim {
            return self;
        }
        Position {
            coords: Cow::Owned(self.as_slice().to_vec()),
            start: 0,
            coord_type: self.coord_type,
        }
    }

    /// Copies this position into owned storage, ending any borrow.
    pub fn into_owned(self) -> Position<'static> {
        Position {
            coords: Cow::Owned(self.as_slice().to_vec()),
            start: 0,
            coord_type: self.coord_type,
        }
    }

    fn map_axes(&self, f: impl Fn(f64) -> f64) -> Position<'static> {
        Position::new(
            f(self.x()),
            f(self.y()),
            self.opt_z().map(&f),
            self.opt_m().map(&f),
        )
    }

    /// The planar distance to `other`, ignoring z.
    pub fn distance_to_2d(&self, other: &Position<'_>) -> f64 {
        (other.x() - self.x()).hypot(other.y() - self.y())
    }

    /// The planar distance to `other` including z. Positions without a z
    /// axis contribute 0.0.
    pub fn distance_to_3d(&self, other: &Position<'_>) -> f64 {
        let dx = other.x() - self.x();
        let dy = other.y() - self.y();
        let dz = other.z() - self.z();
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// The planar bearing to `other` in degrees, where 0° points along +Y
    /// and 90° along +X (clockwise).
    pub fn bearing_to_2d(&self, other: &Position<'_>) -> f64 {
        let dx = other.x() - self.x();
        let dy = other.y() - self.y();
        let degrees = dx.atan2(dy).to_degrees();
        (degrees + 360.0) % 360.0
    }

    /// The midpoint between this position and `other`, axis-wise on the
    /// axes both positions carry.
    pub fn mid_point_to(&self, other: &Position<'_>) -> Position<'static> {
        self.intermediate_point_to(other, 0.5)
    }

    /// A point `fraction` of the way from this position to `other`,
    /// interpolated linearly per axis on the axes both positions carry.
    pub fn intermediate_point_to(&self, other: &Position<'_>, fraction: f64) -> Position<'static> {
        zip_axes(self, other, |a, b| a + (b - a) * fraction)
    }

    /// The planar destination `distance` away along `bearing` degrees
    /// (0° = +Y, clockwise). Any z or m value is carried over unchanged.
    pub fn destination_point_2d(&self, distance: f64, bearing: f64) -> Position<'static> {
        let radians = bearing.to_radians();
        self.copy_with(
            Some(self.x() + distance * radians.sin()),
            Some(self.y() + distance * radians.cos()),
            None,
            None,
        )
    }

    /// Projects the x/y axes through `projection`, keeping z and m.
    pub fn project(&self, projection: &impl Projection) -> Position<'static> {
        let (x, y) = projection.project_coord(self.x(), self.y());
        self.copy_with(Some(x), Some(y), None, None)
    }

    /// Compares x and y within an absolute per-axis tolerance.
    ///
    /// Fails with [`GeoScalarError::InvalidTolerance`] for a negative
    /// tolerance.
    pub fn equals_2d(&self, other: &Position<'_>, tolerance: f64) -> GeoScalarResult<bool> {
        check_tolerance(tolerance)?;
        Ok((self.x() - other.x()).abs() <= tolerance
            && (self.y() - other.y()).abs() <= tolerance)
    }

    /// Compares x/y within `tolerance_horiz` and z within `tolerance_vert`.
    /// Returns false if either position lacks a z axis.
    pub fn equals_3d(
        &self,
        other: &Position<'_>,
        tolerance_horiz: f64,
        tolerance_vert: f64,
    ) -> GeoScalarResult<bool> {
        check_tolerance(tolerance_horiz)?;
        check_tolerance(tolerance_vert)?;
        if !self.coord_type.is_3d() || !other.coord_type().is_3d() {
            return Ok(false);
        }
        Ok(self.equals_2d(other, tolerance_horiz)?
            && (self.z() - other.z()).abs() <= tolerance_vert)
    }
}

// Axis-wise combination on the axes both operands carry (z iff both are 3D,
// m iff both are measured).
fn zip_axes(a: &Position<'_>, b: &Position<'_>, f: impl Fn(f64, f64) -> f64) -> Position<'static> {
    let coord_type = CoordType::select(
        a.coord_type().is_3d() && b.coord_type().is_3d(),
        a.coord_type().is_measured() && b.coord_type().is_measured(),
    );
    Position::new(
        f(a.x(), b.x()),
        f(a.y(), b.y()),
        coord_type.is_3d().then(|| f(a.z(), b.z())),
        coord_type.is_measured().then(|| f(a.m(), b.m())),
    )
}

/// Exact equality: same coordinate type and bit-equal coordinate values.
/// NaN is never equal to itself, so the empty-point sentinel does not
/// compare equal to anything, including another empty point.
impl PartialEq for Position<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.coord_type == other.coord_type && self.as_slice() == other.as_slice()
    }
}

impl Display for Position<'_> {
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

macro_rules! impl_position_op {
    ($trait:ident, $method:ident) => {
        impl $trait<&Position<'_>> for &Position<'_> {
            type Output = Position<'static>;

            fn $method(self, rhs: &Position<'_>) -> Position<'static> {
                zip_axes(self, rhs, |a, b| $trait::$method(a, b))
            }
        }

        impl $trait<f64> for &Position<'_> {
            type Output = Position<'static>;

            fn $method(self, rhs: f64) -> Position<'static> {
                self.map_axes(|a| $trait::$method(a, rhs))
            }
        }

        impl $trait<Position<'_>> for Position<'_> {
            type Output = Position<'static>;

            fn $method(self, rhs: Position<'_>) -> Position<'static> {
                $trait::$method(&self, &rhs)
            }
        }

        impl $trait<f64> for Position<'_> {
            type Output = Position<'static>;

            fn $method(self, rhs: f64) -> Position<'static> {
                $trait::$method(&self, rhs)
            }
        }
    };
}

impl_position_op!(Add, add);
impl_position_op!(Sub, sub);
impl_position_op!(Mul, mul);
impl_position_op!(Div, div);
impl_position_op!(Rem, rem);

impl Neg for &Position<'_> {
    type Output = Position<'static>;

    fn neg(self) -> Position<'static> {
        self.map_axes(|a| -a)
    }
}

impl Neg for Position<'_> {
    type Output = Position<'static>;

    fn neg(self) -> Position<'static> {
        -&self
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn owned_accessors() {
        let p = Position::xyzm(1.0, 2.0, 3.0, 4.0);
        assert_eq!(p.coord_type(), CoordType::XYZM);
        assert_eq!(p.x(), 1.0);
        assert_eq!(p.y(), 2.0);
        assert_eq!(p.z(), 3.0);
        assert_eq!(p.m(), 4.0);
        assert_eq!(p.opt_z(), Some(3.0));
        assert_eq!(p.opt_m(), Some(4.0));

        let p = Position::xy(1.0, 2.0);
        assert_eq!(p.z(), 0.0);
        assert_eq!(p.m(), 0.0);
        assert_eq!(p.opt_z(), None);
        assert_eq!(p.opt_m(), None);
    }

    #[test]
    fn view_reads_through_buffer() {
        let buf = [0.0, 1.0, 10.0, 20.0, 30.0];
        let view = Position::view(&buf, CoordType::XYZ, 2).unwrap();
        assert_eq!(view.x(), 10.0);
        assert_eq!(view.y(), 20.0);
        assert_eq!(view.z(), 30.0);
        // no copy: the slice window aliases the original buffer
        assert!(std::ptr::eq(view.as_slice().as_ptr(), &buf[2]));
    }

    #[test]
    fn view_validates_length_once() {
        let buf = [1.0, 2.0, 3.0];
        assert!(Position::view(&buf, CoordType::XY, 0).is_ok());
        assert!(Position::view(&buf, CoordType::XY, 1).is_ok());
        assert!(Position::view(&buf, CoordType::XY, 2).is_err());
        assert!(Position::view(&buf, CoordType::XYZM, 0).is_err());
    }

    #[test]
    fn value_at_is_lenient() {
        let xym = Position::xym(1.0, 2.0, 9.0);
        assert_eq!(xym.value_at(2), 9.0); // m, not z, for measured 2D
        assert_eq!(xym.value_at(3), 0.0);

        let xyzm = Position::xyzm(1.0, 2.0, 3.0, 4.0);
        assert_eq!(xyzm.value_at(2), 3.0);
        assert_eq!(xyzm.value_at(3), 4.0);
        assert_eq!(xyzm.value_at(17), 0.0);

        let xy = Position::xy(1.0, 2.0);
        assert_eq!(xy.value_at(2), 0.0);
    }

    #[test]
    fn copy_with_widens() {
        let p = Position::xy(1.0, 2.0);
        let widened = p.copy_with(None, None, Some(5.0), None);
        assert_eq!(widened.coord_type(), CoordType::XYZ);
        assert_eq!(widened.z(), 5.0);

        // absent arguments are no-ops
        let same = p.copy_with(Some(7.0), None, None, None);
        assert_eq!(same.coord_type(), CoordType::XY);
        assert_eq!(same.x(), 7.0);
        assert_eq!(same.y(), 2.0);
    }

    #[test]
    fn copy_by_type_widen_then_narrow() {
        for p in [
            Position::xy(1.0, 2.0),
            Position::xyz(1.0, 2.0, 3.0),
            Position::xym(1.0, 2.0, 4.0),
            Position::xyzm(1.0, 2.0, 3.0, 4.0),
        ] {
            let via_xyzm = p.copy_by_type(CoordType::XYZM).copy_by_type(CoordType::XY);
            assert_eq!(via_xyzm, p.copy_by_type(CoordType::XY));
        }

        let p = Position::xy(1.0, 2.0);
        let widened = p.copy_by_type(CoordType::XYZM);
        assert_eq!(widened.z(), 0.0);
        assert_eq!(widened.m(), 0.0);
    }

    #[test]
    fn packed_detaches_sub_views() {
        let buf = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let view = Position::view(&buf, CoordType::XY, 2).unwrap();
        let packed = view.packed();
        assert_eq!(packed.as_slice(), &[3.0, 4.0]);
        assert_eq!(packed.as_slice().len(), 2);

        let tight = Position::xy(1.0, 2.0);
        let same = tight.clone().packed();
        assert_eq!(same, tight);
    }

    #[test]
    fn arithmetic_is_axis_wise() {
        let a = Position::xyz(1.0, 2.0, 3.0);
        let b = Position::xyz(10.0, 20.0, 30.0);
        assert_eq!(&a + &b, Position::xyz(11.0, 22.0, 33.0));
        assert_eq!(&b - &a, Position::xyz(9.0, 18.0, 27.0));
        assert_eq!(&a * 2.0, Position::xyz(2.0, 4.0, 6.0));
        assert_eq!(&b / &a, Position::xyz(10.0, 10.0, 10.0));
        assert_eq!(&b % &a, Position::xyz(0.0, 0.0, 0.0));
        assert_eq!(-&a, Position::xyz(-1.0, -2.0, -3.0));

        // mixed types keep only the common axes
        let xy = Position::xy(1.0, 1.0);
        assert_eq!((&a + &xy).coord_type(), CoordType::XY);
    }

    #[test]
    fn cartesian_math() {
        let origin = Position::xy(0.0, 0.0);
        let p = Position::xy(3.0, 4.0);
        assert_eq!(origin.distance_to_2d(&p), 5.0);

        let q = Position::xyz(1.0, 2.0, 2.0);
        assert_eq!(Position::xyz(0.0, 0.0, 0.0).distance_to_3d(&q), 3.0);

        assert_relative_eq!(origin.bearing_to_2d(&Position::xy(0.0, 1.0)), 0.0);
        assert_relative_eq!(origin.bearing_to_2d(&Position::xy(1.0, 0.0)), 90.0);
        assert_relative_eq!(origin.bearing_to_2d(&Position::xy(0.0, -1.0)), 180.0);
        assert_relative_eq!(origin.bearing_to_2d(&Position::xy(-1.0, 0.0)), 270.0);

        let mid = origin.mid_point_to(&p);
        assert_eq!(mid, Position::xy(1.5, 2.0));
        let quarter = origin.intermediate_point_to(&p, 0.25);
        assert_eq!(quarter, Position::xy(0.75, 1.0));

        let dest = origin.destination_point_2d(10.0, 90.0);
        assert_relative_eq!(dest.x(), 10.0);
        assert_relative_eq!(dest.y(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn tolerance_equality() {
        let a = Position::xy(1.0, 2.0);
        let b = Position::xy(1.05, 2.05);
        assert!(a.equals_2d(&b, 0.1).unwrap());
        assert!(!a.equals_2d(&b, 0.01).unwrap());

        // symmetry
        assert_eq!(
            a.equals_2d(&b, 0.1).unwrap(),
            b.equals_2d(&a, 0.1).unwrap()
        );

        assert!(matches!(
            a.equals_2d(&b, -0.1),
            Err(GeoScalarError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn equals_3d_requires_z() {
        let a = Position::xyz(1.0, 2.0, 3.0);
        let b = Position::xyz(1.0, 2.0, 3.001);
        assert!(a.equals_3d(&b, 0.01, 0.01).unwrap());
        assert!(!a.equals_3d(&b, 0.01, 0.0001).unwrap());

        let flat = Position::xy(1.0, 2.0);
        assert!(!a.equals_3d(&flat, 0.01, 0.01).unwrap());
    }

    #[test]
    fn exact_equality_is_bit_exact() {
        assert_eq!(Position::xy(1.0, 2.0), Position::xy(1.0, 2.0));
        assert_ne!(Position::xy(1.0, 2.0), Position::xyz(1.0, 2.0, 0.0));
        assert_ne!(Position::xyz(1.0, 2.0, 3.0), Position::xym(1.0, 2.0, 3.0));

        // the empty sentinel never equals itself
        let empty = Position::empty(CoordType::XY);
        assert_ne!(empty, Position::empty(CoordType::XY));
        assert!(empty.is_empty());
    }
}
