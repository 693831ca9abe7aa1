//! Coordinate number formatting shared by the text formats.

use std::fmt::Write;

/// Appends one coordinate value to `out`.
///
/// With `decimals` set, the value is written with exactly that many
/// fraction digits (trailing zeros kept). Otherwise the shortest
/// representation that round-trips the double is used; integral values get
/// a trailing `.0` unless `compact` strips it.
pub(crate) fn write_coord(out: &mut String, value: f64, decimals: Option<usize>, compact: bool) {
    match decimals {
        Some(precision) => {
            // infallible for String
            let _ = write!(out, "{value:.precision$}");
        }
        None => {
            let start = out.len();
            let _ = write!(out, "{value}");
            if !compact && value.is_finite() && !out[start..].contains('.') {
                out.push_str(".0");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fmt(value: f64, decimals: Option<usize>, compact: bool) -> String {
        let mut out = String::new();
        write_coord(&mut out, value, decimals, compact);
        out
    }

    #[test]
    fn shortest_round_trip() {
        assert_eq!(fmt(2.1, None, false), "2.1");
        assert_eq!(fmt(-3.4, None, false), "-3.4");
        assert_eq!(fmt(0.2, None, false), "0.2");
        assert_eq!(fmt(1.0 / 3.0, None, false).parse::<f64>().unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn integral_values() {
        assert_eq!(fmt(35.0, None, false), "35.0");
        assert_eq!(fmt(35.0, None, true), "35");
        assert_eq!(fmt(-10.0, None, true), "-10");
    }

    #[test]
    fn fixed_decimals_keep_trailing_zeros() {
        assert_eq!(fmt(35.0, Some(0), false), "35");
        assert_eq!(fmt(-3.4, Some(0), false), "-3");
        assert_eq!(fmt(2.1, Some(3), false), "2.100");
        assert_eq!(fmt(2.0, Some(2), true), "2.00");
    }
}
