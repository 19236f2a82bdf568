//! Paint session orchestration
//!
//! Ties the grid, the painted-cell set and the sync gateway together behind a
//! single owner. Taps are handled synchronously; persistence runs on the
//! tokio runtime the session was built on.

pub mod config;
pub mod logging;
pub mod session;

use paint_grid_core::GridError;
use paint_grid_sync::SyncError;
use thiserror::Error;

pub use config::{EngineConfig, LoggingConfig, PaintingConfig, StoreConfig};
pub use logging::init_tracing;
pub use session::{PaintSession, TapOutcome, TapPhase, REPORT_BUFFER_CAPACITY};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
