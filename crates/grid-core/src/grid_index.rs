//! Coordinate to cell resolution over a projected grid
//!
//! Rows are equally spaced in projected Y, columns equally spaced in degrees
//! of longitude. Spacing is recomputed from the region and dimensions on every
//! call, so a cell rebuilt from its stored origin is identical to the cell the
//! original tap produced.

use crate::cell::{Cell, CellId};
use crate::errors::{GridError, Result};
use crate::geo::{BoundingRegion, GeoCoordinate, GridDimensions};
use crate::projection::{from_projected_y, to_projected_y};
use crate::telemetry::{log_event, Stopwatch};
use serde::{Deserialize, Serialize};

/// Row and column spacing derived from a region and its dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpacing {
    pub projected_min: f64,
    pub projected_max: f64,
    /// Row height in projected units
    pub row: f64,
    /// Column width in degrees
    pub column: f64,
}

impl GridSpacing {
    pub fn compute(region: &BoundingRegion, dimensions: &GridDimensions) -> Result<Self> {
        let projected_min = to_projected_y(region.min_latitude)?;
        let projected_max = to_projected_y(region.max_latitude)?;

        Ok(Self {
            projected_min,
            projected_max,
            row: (projected_max - projected_min) / dimensions.rows as f64,
            column: region.longitude_span() / dimensions.columns as f64,
        })
    }
}

/// Zero-based row and column of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: u32,
    pub column: u32,
}

/// A straight two-point segment of the debug grid overlay
pub type GridLine = [GeoCoordinate; 2];

/// Every row and column boundary of the grid
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridLines {
    /// Constant-longitude lines, west to east
    pub meridians: Vec<GridLine>,
    /// Constant-latitude lines, south to north
    pub parallels: Vec<GridLine>,
}

impl GridLines {
    pub fn len(&self) -> usize {
        self.meridians.len() + self.parallels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridLine> {
        self.meridians.iter().chain(self.parallels.iter())
    }
}

/// The grid laid over a bounding region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridIndex {
    region: BoundingRegion,
    dimensions: GridDimensions,
}

impl GridIndex {
    pub fn new(region: BoundingRegion, dimensions: GridDimensions) -> Result<Self> {
        region.validate()?;
        dimensions.validate()?;
        Ok(Self { region, dimensions })
    }

    pub fn region(&self) -> &BoundingRegion {
        &self.region
    }

    pub fn dimensions(&self) -> &GridDimensions {
        &self.dimensions
    }

    pub fn spacing(&self) -> Result<GridSpacing> {
        GridSpacing::compute(&self.region, &self.dimensions)
    }

    /// Row and column containing `coordinate`.
    ///
    /// Indices are floored. A coordinate on the max latitude or max longitude
    /// edge is clamped into the last row or column.
    pub fn locate(&self, coordinate: &GeoCoordinate) -> Result<GridPosition> {
        if !self.region.contains(coordinate) {
            return Err(GridError::OutOfBounds {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            });
        }

        let spacing = self.spacing()?;
        let projected = to_projected_y(coordinate.latitude)?;

        let row = ((projected - spacing.projected_min) / spacing.row).floor();
        let column = ((coordinate.longitude - self.region.min_longitude) / spacing.column).floor();

        Ok(GridPosition {
            row: clamp_index(row, self.dimensions.rows),
            column: clamp_index(column, self.dimensions.columns),
        })
    }

    /// Resolve a tapped coordinate to its cell
    pub fn resolve_cell(&self, coordinate: &GeoCoordinate) -> Result<Cell> {
        let position = self.locate(coordinate)?;
        self.cell_at(position)
    }

    /// Cell at a row and column
    pub fn cell_at(&self, position: GridPosition) -> Result<Cell> {
        if position.row >= self.dimensions.rows || position.column >= self.dimensions.columns {
            return Err(GridError::PositionOutOfRange {
                row: position.row,
                column: position.column,
            });
        }

        let spacing = self.spacing()?;
        let origin_projected = spacing.projected_min + position.row as f64 * spacing.row;
        let origin = GeoCoordinate {
            latitude: from_projected_y(origin_projected),
            longitude: self.region.min_longitude + position.column as f64 * spacing.column,
        };

        build_cell(origin, &spacing)
    }

    /// Rebuild a cell from its bottom-left corner.
    ///
    /// Shares the corner-to-boundary step with [`GridIndex::resolve_cell`], so
    /// the result matches the tapped cell for the same origin.
    pub fn cell_from_origin(&self, origin: &GeoCoordinate) -> Result<Cell> {
        let spacing = self.spacing()?;
        build_cell(*origin, &spacing)
    }

    /// Id of the cell containing `coordinate`
    pub fn cell_id_at(&self, coordinate: &GeoCoordinate) -> Result<CellId> {
        Ok(self.resolve_cell(coordinate)?.id)
    }

    /// All row and column boundaries for the debug overlay
    pub fn grid_lines(&self) -> Result<GridLines> {
        let watch = Stopwatch::start();
        log_event("GRID_LINE_CALC", "START", None, None);

        let spacing = self.spacing()?;
        let region = &self.region;

        let meridians = (0..=self.dimensions.columns)
            .map(|i| {
                let longitude = region.min_longitude + i as f64 * spacing.column;
                [
                    GeoCoordinate {
                        latitude: region.min_latitude,
                        longitude,
                    },
                    GeoCoordinate {
                        latitude: region.max_latitude,
                        longitude,
                    },
                ]
            })
            .collect();

        let parallels = (0..=self.dimensions.rows)
            .map(|i| {
                let latitude = from_projected_y(spacing.projected_min + i as f64 * spacing.row);
                [
                    GeoCoordinate {
                        latitude,
                        longitude: region.min_longitude,
                    },
                    GeoCoordinate {
                        latitude,
                        longitude: region.max_longitude,
                    },
                ]
            })
            .collect();

        let lines = GridLines {
            meridians,
            parallels,
        };

        log_event(
            "GRID_LINE_CALC",
            "END",
            Some(watch.elapsed_secs()),
            Some(&lines.len()),
        );
        Ok(lines)
    }
}

fn clamp_index(index: f64, count: u32) -> u32 {
    if index <= 0.0 {
        0
    } else {
        (index as u32).min(count - 1)
    }
}

// The top edge comes from re-projecting origin + one row height, never from
// adding degrees, so rows keep equal projected height.
fn build_cell(origin: GeoCoordinate, spacing: &GridSpacing) -> Result<Cell> {
    let top = from_projected_y(to_projected_y(origin.latitude)? + spacing.row);
    let east = origin.longitude + spacing.column;

    Ok(Cell::from_corners([
        origin,
        GeoCoordinate {
            latitude: top,
            longitude: origin.longitude,
        },
        GeoCoordinate {
            latitude: top,
            longitude: east,
        },
        GeoCoordinate {
            latitude: origin.latitude,
            longitude: east,
        },
    ]))
}
