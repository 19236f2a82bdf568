//! Conformal latitude projection used to space grid rows evenly on screen
//!
//! Rows are cut in projected space so every row has the same apparent height
//! on a Mercator map. Longitude needs no projection.

use crate::errors::{GridError, Result};

/// Convert a latitude in degrees to projected Y: `ln(tan φ + sec φ)`.
///
/// Fails at the poles, where the transform diverges.
pub fn to_projected_y(latitude_degrees: f64) -> Result<f64> {
    if !latitude_degrees.is_finite() || latitude_degrees.abs() >= 90.0 {
        return Err(GridError::ProjectionDomain {
            latitude: latitude_degrees,
        });
    }

    let lat_rad = latitude_degrees.to_radians();
    let y = (lat_rad.tan() + 1.0 / lat_rad.cos()).ln();

    if !y.is_finite() {
        return Err(GridError::ProjectionDomain {
            latitude: latitude_degrees,
        });
    }
    Ok(y)
}

/// Inverse of [`to_projected_y`]: `atan(sinh y)`, returned in degrees
pub fn from_projected_y(y: f64) -> f64 {
    y.sinh().atan().to_degrees()
}
