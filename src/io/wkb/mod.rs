//! WKB (and EWKB) encoding and decoding.

mod common;
mod reader;
mod writer;

pub use common::{Endianness, WkbType};
pub use reader::read_wkb;
pub use writer::{WkbOptions, WkbWriter};
