//! Geospatial grid indexing for the paint-a-cell map
//!
//! This crate holds everything that runs on the session's owner thread:
//! the latitude projection, coordinate to cell resolution, the painted-cell
//! set and the shape sources built from it. Nothing in here suspends.

pub mod cell;
pub mod color;
pub mod errors;
pub mod geo;
pub mod grid_index;
pub mod painted_set;
pub mod projection;
pub mod render;
pub mod telemetry;

pub use cell::{Cell, CellId};
pub use color::{PaintColor, UnknownColor};
pub use errors::{GridError, Result};
pub use geo::{BoundingRegion, GeoCoordinate, GridDimensions};
pub use grid_index::{GridIndex, GridLine, GridLines, GridPosition, GridSpacing};
pub use painted_set::{CellSetEvent, PaintedCellRecord, PaintedCellSet, Transition};
pub use projection::{from_projected_y, to_projected_y};
