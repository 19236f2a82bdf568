//! Cell identity and cell geometry

use crate::geo::GeoCoordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits kept when formatting a cell origin into its id
pub const CELL_ID_PRECISION: usize = 6;

/// Stable key of a grid cell, `"<lat6>-<lon6>"` of its bottom-left corner.
///
/// Rounding to six decimals absorbs floating-point drift so that every tap
/// landing in the same row and column produces the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn from_origin(origin: &GeoCoordinate) -> Self {
        CellId(format!(
            "{}-{}",
            format_fixed(origin.latitude),
            format_fixed(origin.longitude)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CellId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Values that round to zero would otherwise print as "-0.000000"
fn format_fixed(value: f64) -> String {
    let formatted = format!("{:.*}", CELL_ID_PRECISION, value);
    match formatted.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => formatted,
    }
}

/// Index of the bottom-left vertex in a boundary
pub const BOTTOM_LEFT: usize = 0;
/// Index of the top-left vertex in a boundary
pub const TOP_LEFT: usize = 1;
/// Index of the top-right vertex in a boundary
pub const TOP_RIGHT: usize = 2;
/// Index of the bottom-right vertex in a boundary
pub const BOTTOM_RIGHT: usize = 3;

/// One quadrilateral of the grid.
///
/// The boundary is closed (first vertex repeated last) and always wound
/// bottom-left, top-left, top-right, bottom-right. Rehydration rebuilds cells
/// from stored corners in this order, so every producer must follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub boundary: [GeoCoordinate; 5],
}

impl Cell {
    /// Build a cell from its four corners in winding order
    pub fn from_corners(corners: [GeoCoordinate; 4]) -> Self {
        let id = CellId::from_origin(&corners[BOTTOM_LEFT]);
        Self {
            id,
            boundary: [corners[0], corners[1], corners[2], corners[3], corners[0]],
        }
    }

    pub fn origin(&self) -> GeoCoordinate {
        self.boundary[BOTTOM_LEFT]
    }

    /// The four distinct vertices, without the closing repeat
    pub fn corners(&self) -> [GeoCoordinate; 4] {
        [
            self.boundary[BOTTOM_LEFT],
            self.boundary[TOP_LEFT],
            self.boundary[TOP_RIGHT],
            self.boundary[BOTTOM_RIGHT],
        ]
    }

    /// Whether two boundaries match vertex by vertex within `tolerance` degrees
    pub fn same_geometry(&self, other: &Cell, tolerance: f64) -> bool {
        self.boundary
            .iter()
            .zip(other.boundary.iter())
            .all(|(a, b)| {
                (a.latitude - b.latitude).abs() <= tolerance
                    && (a.longitude - b.longitude).abs() <= tolerance
            })
    }
}
