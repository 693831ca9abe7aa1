use crate::error::{GeoScalarError, GeoScalarResult};

/// Validates a tolerance argument for the `equals_*` and `is_closed_by`
/// family of comparisons. Tolerances must be non-negative.
pub(crate) fn check_tolerance(tolerance: f64) -> GeoScalarResult<()> {
    if !(tolerance >= 0.0) {
        return Err(GeoScalarError::InvalidTolerance(tolerance));
    }
    Ok(())
}
