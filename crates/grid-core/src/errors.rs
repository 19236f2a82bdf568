//! Error types for grid math and painted-cell bookkeeping

use thiserror::Error;

/// Failures raised while validating inputs or resolving a coordinate to a cell
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Coordinate ({latitude}, {longitude}) is outside the bounding region")]
    OutOfBounds { latitude: f64, longitude: f64 },

    #[error("Latitude {latitude} cannot be projected")]
    ProjectionDomain { latitude: f64 },

    #[error("Invalid coordinate ({latitude}, {longitude}): {message}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        message: String,
    },

    #[error("Invalid bounding region: {message}")]
    InvalidRegion { message: String },

    #[error("Invalid grid dimensions {rows}x{columns}")]
    InvalidDimensions { rows: u32, columns: u32 },

    #[error("Grid position row {row}, column {column} is outside the grid")]
    PositionOutOfRange { row: u32, column: u32 },
}

impl GridError {
    /// True for the errors a tap handler drops silently instead of reporting.
    ///
    /// A projection failure can only come from a latitude at a pole, which is
    /// never inside a usable region, so it is handled like an out-of-bounds tap.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            GridError::OutOfBounds { .. } | GridError::ProjectionDomain { .. }
        )
    }
}

/// Result type alias for grid operations
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_classification() {
        let oob = GridError::OutOfBounds {
            latitude: 10.0,
            longitude: 139.0,
        };
        let pole = GridError::ProjectionDomain { latitude: 90.0 };
        let dims = GridError::InvalidDimensions {
            rows: 0,
            columns: 10,
        };

        assert!(oob.is_out_of_bounds());
        assert!(pole.is_out_of_bounds());
        assert!(!dims.is_out_of_bounds());
    }

    #[test]
    fn test_error_messages() {
        let err = GridError::OutOfBounds {
            latitude: 10.0,
            longitude: 139.5,
        };
        assert!(err.to_string().contains("outside the bounding region"));
        assert!(err.to_string().contains("139.5"));
    }
}
