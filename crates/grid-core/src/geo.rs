//! Geographic value types: coordinates, the bounding region and grid dimensions

use crate::errors::{GridError, Result};
use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Build a validated coordinate. Latitude must be within [-90, 90] and
    /// longitude within [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GridError::InvalidCoordinate {
                latitude,
                longitude,
                message: "latitude must be within [-90, 90]".to_string(),
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GridError::InvalidCoordinate {
                latitude,
                longitude,
                message: "longitude must be within [-180, 180]".to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Euclidean distance in degree space, used for geometric comparisons
    pub fn degree_distance(&self, other: &GeoCoordinate) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

/// The rectangle of the globe subdivided by the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingRegion {
    /// The region covering the Japanese archipelago
    pub const JAPAN: BoundingRegion = BoundingRegion {
        min_latitude: 17.10,
        max_latitude: 45.85,
        min_longitude: 122.93,
        max_longitude: 157.14,
    };

    pub fn new(
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> Result<Self> {
        let region = Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        };
        region.validate()?;
        Ok(region)
    }

    /// Check ordering and ranges. Poles are rejected because the row
    /// projection is undefined there.
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.min_latitude,
            self.max_latitude,
            self.min_longitude,
            self.max_longitude,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GridError::InvalidRegion {
                message: "bounds must be finite".to_string(),
            });
        }
        if self.min_latitude >= self.max_latitude {
            return Err(GridError::InvalidRegion {
                message: format!(
                    "min_latitude {} must be below max_latitude {}",
                    self.min_latitude, self.max_latitude
                ),
            });
        }
        if self.min_longitude >= self.max_longitude {
            return Err(GridError::InvalidRegion {
                message: format!(
                    "min_longitude {} must be below max_longitude {}",
                    self.min_longitude, self.max_longitude
                ),
            });
        }
        if self.min_latitude <= -90.0 || self.max_latitude >= 90.0 {
            return Err(GridError::InvalidRegion {
                message: "latitude bounds must stay strictly inside the poles".to_string(),
            });
        }
        if self.min_longitude < -180.0 || self.max_longitude > 180.0 {
            return Err(GridError::InvalidRegion {
                message: "longitude bounds must be within [-180, 180]".to_string(),
            });
        }
        Ok(())
    }

    /// Inclusive containment test
    pub fn contains(&self, coordinate: &GeoCoordinate) -> bool {
        coordinate.latitude >= self.min_latitude
            && coordinate.latitude <= self.max_latitude
            && coordinate.longitude >= self.min_longitude
            && coordinate.longitude <= self.max_longitude
    }

    pub fn longitude_span(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }
}

impl Default for BoundingRegion {
    fn default() -> Self {
        Self::JAPAN
    }
}

/// Number of rows and columns the region is cut into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: u32,
    pub columns: u32,
}

impl GridDimensions {
    pub fn new(rows: u32, columns: u32) -> Result<Self> {
        let dims = Self { rows, columns };
        dims.validate()?;
        Ok(dims)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(GridError::InvalidDimensions {
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }

    pub fn cell_count(&self) -> u64 {
        self.rows as u64 * self.columns as u64
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            rows: 100,
            columns: 100,
        }
    }
}
