//! WKT (and EWKT) encoding and decoding.

mod reader;
mod writer;

pub use reader::read_wkt;
pub use writer::{WktOptions, WktWriter};
