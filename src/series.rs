//! Fixed-length sequences of positions sharing one coordinate type.

use std::borrow::Cow;

use crate::coord_type::CoordType;
use crate::error::{GeoScalarError, GeoScalarResult};
use crate::position::Position;
use crate::projection::Projection;
use crate::scheme::PositionScheme;
use crate::util::check_tolerance;

#[derive(Debug, Clone)]
enum SeriesData<'a> {
    /// One flat coordinate buffer, stride = the series' coordinate
    /// dimension.
    Flat(Cow<'a, [f64]>),
    /// Individual position objects, widened/narrowed to the series'
    /// nominal type on access.
    Positions(Vec<Position<'a>>),
}

/// An ordered, fixed-length, random-access sequence of positions.
///
/// A series is backed either by a single flat coordinate buffer (owned or
/// borrowed, zero-copy) or by an array of [Position] objects. All positions
/// report the series' nominal [CoordType] when read through the series:
/// object-backed positions of a different native type are widened or
/// narrowed transparently, with missing z/m read as 0.0.
///
/// Series are never mutated in place; operations producing a modified
/// series return a new one.
#[derive(Debug, Clone)]
pub struct PositionSeries<'a> {
    data: SeriesData<'a>,
    coord_type: CoordType,
}

static EMPTY: PositionSeries<'static> = PositionSeries {
    data: SeriesData::Flat(Cow::Borrowed(&[])),
    coord_type: CoordType::XY,
};

impl PositionSeries<'static> {
    /// The shared empty series. Immutable and safe to reference from any
    /// thread.
    pub fn empty() -> &'static PositionSeries<'static> {
        &EMPTY
    }

    /// Creates a series owning a flat coordinate buffer with stride
    /// `coord_type.dim()`.
    pub fn from_coords(coords: Vec<f64>, coord_type: CoordType) -> GeoScalarResult<Self> {
        if coords.len() % coord_type.dim() != 0 {
            return Err(GeoScalarError::MalformedCoordinates(format!(
                "flat buffer of {} values is not a multiple of the {} stride {}",
                coords.len(),
                coord_type,
                coord_type.dim()
            )));
        }
        Ok(Self {
            data: SeriesData::Flat(Cow::Owned(coords)),
            coord_type,
        })
    }
}

impl<'a> PositionSeries<'a> {
    /// Creates a zero-copy series view over a caller-owned flat buffer.
    ///
    /// The buffer length must be a multiple of `coord_type.dim()`; the
    /// series length is `buf.len() / coord_type.dim()`.
    pub fn view(buf: &'a [f64], coord_type: CoordType) -> GeoScalarResult<Self> {
        if buf.len() % coord_type.dim() != 0 {
            return Err(GeoScalarError::MalformedCoordinates(format!(
                "flat buffer of {} values is not a multiple of the {} stride {}",
                buf.len(),
                coord_type,
                coord_type.dim()
            )));
        }
        Ok(Self {
            data: SeriesData::Flat(Cow::Borrowed(buf)),
            coord_type,
        })
    }

    /// Creates a series over position objects.
    ///
    /// When `coord_type` is not given, the nominal type carries the axes
    /// common to every position (XY for an empty vector).
    pub fn from_positions(
        positions: Vec<Position<'a>>,
        coord_type: Option<CoordType>,
    ) -> Self {
        let coord_type = coord_type.unwrap_or_else(|| {
            let is_3d = !positions.is_empty()
                && positions.iter().all(|p| p.coord_type().is_3d());
            let is_measured = !positions.is_empty()
                && positions.iter().all(|p| p.coord_type().is_measured());
            CoordType::select(is_3d, is_measured)
        });
        Self {
            data: SeriesData::Positions(positions),
            coord_type,
        }
    }

    /// The coordinate type of this series.
    pub fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    /// The number of positions in this series.
    pub fn len(&self) -> usize {
        match &self.data {
            SeriesData::Flat(coords) => coords.len() / self.coord_type.dim(),
            SeriesData::Positions(positions) => positions.len(),
        }
    }

    /// True if this series holds no positions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of positions in this series (alias of [len](Self::len)).
    pub fn position_count(&self) -> usize {
        self.len()
    }

    /// The x coordinate of position `i`. The index must be in
    /// `[0, len)`; out-of-range access panics like slice indexing.
    pub fn x(&self, i: usize) -> f64 {
        match &self.data {
            SeriesData::Flat(coords) => coords[i * self.coord_type.dim()],
            SeriesData::Positions(positions) => positions[i].x(),
        }
    }

    /// The y coordinate of position `i`.
    pub fn y(&self, i: usize) -> f64 {
        match &self.data {
            SeriesData::Flat(coords) => coords[i * self.coord_type.dim() + 1],
            SeriesData::Positions(positions) => positions[i].y(),
        }
    }

    /// The z coordinate of position `i`, or 0.0 if the series is not 3D.
    pub fn z(&self, i: usize) -> f64 {
        self.opt_z(i).unwrap_or(0.0)
    }

    /// The z coordinate of position `i`, if the series is 3D.
    pub fn opt_z(&self, i: usize) -> Option<f64> {
        if !self.coord_type.is_3d() {
            return None;
        }
        Some(match &self.data {
            SeriesData::Flat(coords) => coords[i * self.coord_type.dim() + 2],
            SeriesData::Positions(positions) => positions[i].z(),
        })
    }

    /// The m value of position `i`, or 0.0 if the series is not measured.
    pub fn m(&self, i: usize) -> f64 {
        self.opt_m(i).unwrap_or(0.0)
    }

    /// The m value of position `i`, if the series is measured.
    pub fn opt_m(&self, i: usize) -> Option<f64> {
        let m_index = self.coord_type.index_for_m()?;
        Some(match &self.data {
            SeriesData::Flat(coords) => coords[i * self.coord_type.dim() + m_index],
            SeriesData::Positions(positions) => positions[i].m(),
        })
    }

    /// Materializes position `i` in the series' nominal coordinate type.
    ///
    /// For flat-backed series this is a zero-copy sub-view into the
    /// shared buffer; keep [`Position::packed`] in mind before retaining
    /// one long-term.
    pub fn get(&self, i: usize) -> Position<'_> {
        match &self.data {
            SeriesData::Flat(coords) => {
                Position::view_unchecked(coords, self.coord_type, i * self.coord_type.dim())
            }
            SeriesData::Positions(positions) => {
                let position = &positions[i];
                if position.coord_type() == self.coord_type {
                    position.clone()
                } else {
                    position.copy_by_type(self.coord_type)
                }
            }
        }
    }

    /// Materializes position `i` through the given scheme's position
    /// factory.
    pub fn get_with(&self, i: usize, scheme: &PositionScheme) -> Position<'static> {
        let position = self.get(i);
        scheme.make_position(
            position.x(),
            position.y(),
            position.opt_z(),
            position.opt_m(),
        )
    }

    /// The flat coordinate sequence of this series
    /// (`position_count * dim` values). Zero-copy for flat-backed series.
    pub fn values(&self) -> Cow<'_, [f64]> {
        self.values_by_type(self.coord_type)
    }

    /// The flat coordinate sequence widened or narrowed to the requested
    /// type, with missing z/m read as 0.0. Zero-copy when the requested
    /// type matches a flat backing.
    pub fn values_by_type(&self, coord_type: CoordType) -> Cow<'_, [f64]> {
        match &self.data {
            SeriesData::Flat(coords) if coord_type == self.coord_type => {
                Cow::Borrowed(coords.as_ref())
            }
            _ => {
                let mut out = Vec::with_capacity(self.len() * coord_type.dim());
                for i in 0..self.len() {
                    self.get(i).push_by_type(&mut out, coord_type);
                }
                Cow::Owned(out)
            }
        }
    }

    /// Returns a new flat-backed series with every position converted to
    /// the given coordinate type.
    pub fn copy_by_type(&self, coord_type: CoordType) -> PositionSeries<'static> {
        PositionSeries {
            data: SeriesData::Flat(Cow::Owned(self.values_by_type(coord_type).into_owned())),
            coord_type,
        }
    }

    /// Copies this series into owned storage, ending any borrow.
    pub fn into_owned(self) -> PositionSeries<'static> {
        self.copy_by_type(self.coord_type)
    }

    /// True iff the series has at least two positions and the first
    /// equals the last in 2D (exact comparison).
    pub fn is_closed(&self) -> bool {
        self.len() >= 2
            && self.x(0) == self.x(self.len() - 1)
            && self.y(0) == self.y(self.len() - 1)
    }

    /// True iff the series has at least two positions and the first
    /// equals the last in 2D within the given tolerance.
    pub fn is_closed_by(&self, tolerance: f64) -> GeoScalarResult<bool> {
        check_tolerance(tolerance)?;
        let last = match self.len() {
            0 | 1 => return Ok(false),
            len => len - 1,
        };
        Ok((self.x(0) - self.x(last)).abs() <= tolerance
            && (self.y(0) - self.y(last)).abs() <= tolerance)
    }

    /// True iff both series have the same length and coordinate type and
    /// every axis value is bit-equal pairwise.
    ///
    /// NaN is never equal to itself, so a series containing the
    /// empty-point sentinel never compares equal through this method.
    pub fn equals_coords(&self, other: &PositionSeries<'_>) -> bool {
        self.len() == other.len()
            && self.coord_type == other.coord_type()
            && self.values() == other.values()
    }

    /// Returns a new series with the position order reversed.
    pub fn reversed(&self) -> PositionSeries<'static> {
        let dim = self.coord_type.dim();
        let values = self.values();
        let mut out = Vec::with_capacity(values.len());
        for chunk in values.chunks(dim).rev() {
            out.extend_from_slice(chunk);
        }
        PositionSeries {
            data: SeriesData::Flat(Cow::Owned(out)),
            coord_type: self.coord_type,
        }
    }

    /// Returns a new series with every position projected through
    /// `projection`, preserving z and m.
    ///
    /// Flat-backed series are projected in bulk directly on the
    /// coordinate buffer.
    pub fn project(&self, projection: &impl Projection) -> PositionSeries<'static> {
        let mut coords = self.values().into_owned();
        projection.project_slice(&mut coords, self.coord_type.dim());
        PositionSeries {
            data: SeriesData::Flat(Cow::Owned(coords)),
            coord_type: self.coord_type,
        }
    }

    /// Returns a new series with every position mapped through `f`.
    pub fn transform(
        &self,
        f: impl Fn(&Position<'_>) -> Position<'static>,
    ) -> PositionSeries<'static> {
        let positions = (0..self.len()).map(|i| f(&self.get(i))).collect();
        PositionSeries::from_positions(positions, None)
    }

    /// Computes the minimum bounding box of this series, constructing the
    /// result through the given scheme. Returns `None` for an empty
    /// series.
    pub fn calculate_bounds(&self, scheme: &PositionScheme) -> Option<crate::bbox::BBox<'static>> {
        if self.is_empty() {
            return None;
        }
        let mut min = [f64::INFINITY; 4];
        let mut max = [f64::NEG_INFINITY; 4];
        for i in 0..self.len() {
            let p = self.get(i);
            for (axis, value) in p.as_slice().iter().enumerate() {
                min[axis] = min[axis].min(*value);
                max[axis] = max[axis].max(*value);
            }
        }
        let coord_type = self.coord_type;
        let (z_at, m_at) = (
            coord_type.is_3d().then_some(2),
            coord_type.index_for_m(),
        );
        let min = scheme.make_position(min[0], min[1], z_at.map(|i| min[i]), m_at.map(|i| min[i]));
        let max = scheme.make_position(max[0], max[1], z_at.map(|i| max[i]), m_at.map(|i| max[i]));
        Some(scheme.make_bbox(&min, &max))
    }
}

/// Same semantics as [`PositionSeries::equals_coords`].
impl PartialEq for PositionSeries<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.equals_coords(other)
    }
}

impl<'a> FromIterator<Position<'a>> for PositionSeries<'a> {
    fn from_iter<T: IntoIterator<Item = Position<'a>>>(iter: T) -> Self {
        PositionSeries::from_positions(iter.into_iter().collect(), None)
    }
}
