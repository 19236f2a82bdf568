//! The session's set of painted cells

use crate::cell::{Cell, CellId};
use crate::color::PaintColor;
use crate::geo::GeoCoordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A painted cell as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintedCellRecord {
    pub id: CellId,
    /// Bottom-left, top-left, top-right, bottom-right
    pub corners: [GeoCoordinate; 4],
    pub color: PaintColor,
    /// Assigned by the store; `None` until the record has been written
    pub written_at: Option<DateTime<Utc>>,
}

impl PaintedCellRecord {
    pub fn new(cell: &Cell, color: PaintColor) -> Self {
        Self {
            id: cell.id.clone(),
            corners: cell.corners(),
            color,
            written_at: None,
        }
    }

    /// The closed cell this record describes
    pub fn to_cell(&self) -> Cell {
        Cell::from_corners(self.corners)
    }
}

/// Outcome of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Added,
    Removed,
}

/// Change notifications for renderers
#[derive(Debug, Clone, PartialEq)]
pub enum CellSetEvent {
    Toggled { id: CellId, transition: Transition },
    Replaced { count: usize },
}

/// Painted cells keyed by id.
///
/// Owned by a single session and mutated only through `&mut self`, so a
/// rehydrating replace can never interleave with a toggle.
#[derive(Debug)]
pub struct PaintedCellSet {
    cells: HashMap<CellId, PaintedCellRecord>,
    events: broadcast::Sender<CellSetEvent>,
}

impl PaintedCellSet {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            cells: HashMap::new(),
            events,
        }
    }

    /// Paint `cell` if absent, unpaint it if present
    pub fn toggle(&mut self, cell: &Cell, color: PaintColor) -> Transition {
        let transition = if self.cells.remove(&cell.id).is_some() {
            Transition::Removed
        } else {
            self.cells
                .insert(cell.id.clone(), PaintedCellRecord::new(cell, color));
            Transition::Added
        };

        self.notify(CellSetEvent::Toggled {
            id: cell.id.clone(),
            transition,
        });
        transition
    }

    /// Discard everything and install `records`. Later duplicates win.
    pub fn replace_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = PaintedCellRecord>,
    {
        self.cells = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();

        self.notify(CellSetEvent::Replaced {
            count: self.cells.len(),
        });
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.cells.contains_key(id)
    }

    pub fn get(&self, id: &CellId) -> Option<&PaintedCellRecord> {
        self.cells.get(id)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Copy of every record, in no particular order
    pub fn snapshot(&self) -> Vec<PaintedCellRecord> {
        self.cells.values().cloned().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CellSetEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: CellSetEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Default for PaintedCellSet {
    fn default() -> Self {
        Self::new()
    }
}
