//! Tap handling: bounds check, cell resolution, toggle and sync dispatch
//!
//! The session is the single owner of the painted-cell set and the grid. All
//! mutation goes through `&mut self`; network work runs on spawned tasks and
//! its reports come back over a bounded channel that the owner drains.

use crate::config::EngineConfig;
use crate::{Result, SessionError};
use paint_grid_core::telemetry::{log_event, Stopwatch};
use paint_grid_core::{
    render, BoundingRegion, Cell, CellId, CellSetEvent, GeoCoordinate, GridIndex, PaintColor,
    PaintedCellRecord, PaintedCellSet, Transition,
};
use paint_grid_sync::{PersistReport, SyncGateway};
use serde_json::Value;
use std::collections::HashMap;
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// Completed sync reports held until the owner drains them. Reports arriving
/// while the buffer is full are logged and dropped.
pub const REPORT_BUFFER_CAPACITY: usize = 256;

/// Steps of one tap cycle, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapPhase {
    Idle,
    BoundsCheck,
    OutOfBounds,
    InBounds,
    GridResolve,
    ToggleApply,
    SyncDispatch,
}

impl TapPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TapPhase::Idle => "IDLE",
            TapPhase::BoundsCheck => "BOUNDS_CHECK",
            TapPhase::OutOfBounds => "OUT_OF_BOUNDS",
            TapPhase::InBounds => "IN_BOUNDS",
            TapPhase::GridResolve => "GRID_RESOLVE",
            TapPhase::ToggleApply => "TOGGLE_APPLY",
            TapPhase::SyncDispatch => "SYNC_DISPATCH",
        }
    }
}

/// How a tap ended
#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    /// Painting mode is off; the tap was ignored
    PaintingDisabled,
    /// Outside the region (or unprojectable); nothing changed
    OutOfBounds,
    /// The cell was toggled and a sync task dispatched
    Applied { cell: Cell, transition: Transition },
}

pub struct PaintSession {
    grid: GridIndex,
    cells: PaintedCellSet,
    gateway: SyncGateway,
    runtime: Handle,
    selected_color: PaintColor,
    painting_enabled: bool,
    // Latest sync task per cell; each task waits for the one it replaced
    in_flight: HashMap<CellId, JoinHandle<()>>,
    reports_tx: mpsc::Sender<PersistReport>,
    reports_rx: mpsc::Receiver<PersistReport>,
}

impl PaintSession {
    /// Build a session on the current tokio runtime
    pub fn new(grid: GridIndex, gateway: SyncGateway) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| SessionError::Runtime(e.to_string()))?;
        let (reports_tx, reports_rx) = mpsc::channel(REPORT_BUFFER_CAPACITY);

        Ok(Self {
            grid,
            cells: PaintedCellSet::new(),
            gateway,
            runtime,
            selected_color: PaintColor::default(),
            painting_enabled: true,
            in_flight: HashMap::new(),
            reports_tx,
            reports_rx,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut session = Self::new(config.grid_index()?, config.gateway()?)?;
        session.selected_color = config.default_color()?;
        session.painting_enabled = config.painting.enabled_on_start;
        Ok(session)
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    pub fn painted(&self) -> &PaintedCellSet {
        &self.cells
    }

    pub fn gateway(&self) -> &SyncGateway {
        &self.gateway
    }

    pub fn selected_color(&self) -> PaintColor {
        self.selected_color
    }

    pub fn select_color(&mut self, color: PaintColor) {
        self.selected_color = color;
        log_event("COLOR_PICKER", "CHANGED", None, Some(&color));
    }

    pub fn painting_enabled(&self) -> bool {
        self.painting_enabled
    }

    pub fn set_painting_enabled(&mut self, enabled: bool) {
        self.painting_enabled = enabled;
        log_event(
            "PAINT_MODE",
            "CHANGED",
            None,
            Some(&if enabled { "enabled" } else { "disabled" }),
        );
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CellSetEvent> {
        self.cells.subscribe()
    }

    /// Run one full tap cycle.
    ///
    /// The sync step is dispatched, not awaited, so the next tap can start
    /// right away. Repeated taps on one cell are not coalesced; their writes
    /// reach the store in tap order.
    pub fn handle_tap(&mut self, coordinate: GeoCoordinate) -> TapOutcome {
        if !self.painting_enabled {
            return TapOutcome::PaintingDisabled;
        }

        let watch = Stopwatch::start();
        log_event(
            "TAP_HANDLER",
            "START",
            None,
            Some(&format_args!("{}, {}", coordinate.latitude, coordinate.longitude)),
        );

        log_event("TAP_HANDLER", TapPhase::BoundsCheck.as_str(), None, None);
        if !self.grid.region().contains(&coordinate) {
            return self.drop_tap(&watch, "outside bounding region");
        }
        log_event("TAP_HANDLER", TapPhase::InBounds.as_str(), None, None);

        let grid_watch = Stopwatch::start();
        let cell = match self.grid.resolve_cell(&coordinate) {
            Ok(cell) => cell,
            Err(err) if err.is_out_of_bounds() => return self.drop_tap(&watch, &err.to_string()),
            Err(err) => {
                error!("Grid resolution failed: {}", err);
                return self.drop_tap(&watch, &err.to_string());
            }
        };
        log_event(
            "TAP_HANDLER",
            TapPhase::GridResolve.as_str(),
            Some(grid_watch.elapsed_secs()),
            Some(&cell.id),
        );

        let before = self.cells.len();
        let transition = self.cells.toggle(&cell, self.selected_color);
        log_event(
            "TAP_HANDLER",
            TapPhase::ToggleApply.as_str(),
            None,
            Some(&format_args!(
                "{:?} {} ({} -> {})",
                transition,
                cell.id,
                before,
                self.cells.len()
            )),
        );

        self.dispatch_sync(&cell, transition);
        log_event(
            "TAP_HANDLER",
            TapPhase::SyncDispatch.as_str(),
            None,
            Some(&cell.id),
        );

        log_event(
            "TAP_HANDLER",
            "END",
            Some(watch.elapsed_secs()),
            Some(&TapPhase::Idle.as_str()),
        );
        TapOutcome::Applied { cell, transition }
    }

    fn drop_tap(&self, watch: &Stopwatch, reason: &str) -> TapOutcome {
        log_event(
            "TAP_HANDLER",
            TapPhase::OutOfBounds.as_str(),
            Some(watch.elapsed_secs()),
            Some(&reason),
        );
        TapOutcome::OutOfBounds
    }

    // Added cells are upserted; removed cells have their document deleted.
    // Work for one cell is chained behind the previous task for that cell, so
    // the store ends up holding the last toggle's intent.
    fn dispatch_sync(&mut self, cell: &Cell, transition: Transition) {
        self.in_flight.retain(|_, task| !task.is_finished());

        let previous = self.in_flight.remove(&cell.id);
        let gateway = self.gateway.clone();
        let reports = self.reports_tx.clone();
        let record = PaintedCellRecord::new(cell, self.selected_color);

        let task = self.runtime.spawn(async move {
            if let Some(previous) = previous {
                if let Err(err) = previous.await {
                    error!("Sync task failed: {}", err);
                }
            }

            let report = match transition {
                Transition::Added => gateway.persist(&[record]).await,
                Transition::Removed => gateway.retract(&[record.id]).await,
            };
            deliver_report(&reports, report);
        });
        self.in_flight.insert(cell.id.clone(), task);
    }

    /// Sync tasks that have not finished yet
    pub fn pending_sync(&self) -> usize {
        self.in_flight
            .values()
            .filter(|task| !task.is_finished())
            .count()
    }

    /// Reports of sync tasks that completed since the last call
    pub fn drain_sync_reports(&mut self) -> Vec<PersistReport> {
        let mut reports = Vec::new();
        while let Ok(report) = self.reports_rx.try_recv() {
            reports.push(report);
        }
        reports
    }

    /// Wait for every dispatched sync task, then drain their reports
    pub async fn flush_sync(&mut self) -> Vec<PersistReport> {
        for (_, task) in self.in_flight.drain() {
            if let Err(err) = task.await {
                error!("Sync task failed: {}", err);
            }
        }
        self.drain_sync_reports()
    }

    /// Replace the painted set with the store's contents.
    ///
    /// On a transport error the current set is left as it was and the error
    /// is returned; retrying is up to the caller.
    pub async fn rehydrate(&mut self) -> Result<usize> {
        let records = match self.gateway.fetch_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!("Keeping {} painted cells, fetch failed: {}", self.cells.len(), err);
                return Err(err.into());
            }
        };

        let count = records.len();
        self.cells.replace_all(records);
        Ok(count)
    }

    /// Swap in a new bounding region.
    ///
    /// Cell ids computed under the old region no longer line up with the new
    /// grid; painted cells are kept as they are.
    pub fn set_region(&mut self, region: BoundingRegion) -> Result<()> {
        let grid = GridIndex::new(region, *self.grid.dimensions())?;
        self.grid = grid;
        log_event(
            "REGION_ADJUST",
            "END",
            None,
            Some(&format_args!("{:?}", region)),
        );
        if !self.cells.is_empty() {
            warn!(
                "Region changed with {} painted cells; their ids no longer match the grid",
                self.cells.len()
            );
        }
        Ok(())
    }

    /// Fill layer source for the painted cells
    pub fn painted_cells_source(&self) -> Value {
        render::painted_cells_source(&self.cells.snapshot())
    }

    /// Line layer source for the debug grid overlay
    pub fn grid_lines_source(&self) -> Result<Value> {
        Ok(render::grid_lines_source(&self.grid.grid_lines()?))
    }
}

fn deliver_report(reports: &mpsc::Sender<PersistReport>, report: PersistReport) {
    for (id, err) in &report.failed {
        warn!("Sync for cell {} failed: {}", id, err);
    }

    match reports.try_send(report) {
        Ok(()) => {}
        Err(TrySendError::Full(report)) => warn!(
            "Sync report buffer full, dropping report for {} cells",
            report.attempted()
        ),
        Err(TrySendError::Closed(_)) => {}
    }
}
