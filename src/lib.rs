//! Scalar geospatial positions, bounding boxes and position series with
//! zero-copy views over flat coordinate buffers, plus streaming WKT, WKB
//! and GeoJSON codecs built on a writer-replay interface.
//!
//! The data model is polymorphic over four coordinate types (XY, XYZ, XYM,
//! XYZM) without dynamic dispatch: [CoordType] is a closed enum, and
//! [Position], [BBox] and [PositionSeries] each store either owned values
//! or a borrowed view into a caller-owned flat `f64` buffer.
//!
//! The codec layer decouples parsing from output: every decoder replays
//! parsed content as calls on a [GeometryWriter], and every encoder is one
//! such writer. Feeding a decoder one format's input and another format's
//! writer transcodes directly, with no intermediate geometry graph:
//!
//! ```
//! use geoscalar::io::wkb::read_wkb;
//! use geoscalar::io::wkt::WktWriter;
//! use geoscalar::Geometry;
//!
//! let wkb = Geometry::from_wkt("POINT(1 2)").unwrap().to_wkb().unwrap();
//! let mut writer = WktWriter::new();
//! read_wkb(&wkb, &mut writer).unwrap();
//! assert_eq!(writer.finish(), "POINT(1.0 2.0)");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod bbox;
pub mod coord_type;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod io;
pub mod position;
pub mod projection;
pub mod scheme;
pub mod series;
#[cfg(test)]
pub(crate) mod test;
mod util;

pub use bbox::{Alignment, BBox};
pub use coord_type::CoordType;
pub use error::{GeoScalarError, GeoScalarResult};
pub use feature::{Feature, FeatureCollection};
pub use geometry::{Geometry, GeometryKind};
pub use io::writer::GeometryWriter;
pub use position::Position;
pub use projection::Projection;
pub use scheme::PositionScheme;
pub use series::PositionSeries;
