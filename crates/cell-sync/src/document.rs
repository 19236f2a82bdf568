//! Mapping between painted-cell records and stored documents
//!
//! ```text
//! {
//!   "coordinates": [ {"latitude": .., "longitude": ..} x 4 ],
//!   "color": "Green",
//!   "timestamp": <server assigned>
//! }
//! ```

use crate::errors::{Result, SyncError};
use crate::store::Fields;
use chrono::{DateTime, TimeZone, Utc};
use paint_grid_core::{CellId, GeoCoordinate, PaintColor, PaintedCellRecord};
use serde_json::{json, Value};
use tracing::warn;

pub const FIELD_COORDINATES: &str = "coordinates";
pub const FIELD_COLOR: &str = "color";
pub const FIELD_TIMESTAMP: &str = "timestamp";

/// Build the stored document for `record`
pub fn encode_record(record: &PaintedCellRecord, timestamp: Value) -> Fields {
    let coordinates: Vec<Value> = record
        .corners
        .iter()
        .map(|c| json!({ "latitude": c.latitude, "longitude": c.longitude }))
        .collect();

    let mut fields = Fields::new();
    fields.insert(FIELD_COORDINATES.to_string(), Value::Array(coordinates));
    fields.insert(
        FIELD_COLOR.to_string(),
        Value::String(record.color.name().to_string()),
    );
    fields.insert(FIELD_TIMESTAMP.to_string(), timestamp);
    fields
}

/// Rebuild a record from a stored document.
///
/// The four corners are required. A missing or unknown color falls back to
/// the default palette color, and an unreadable timestamp is dropped. The id
/// is derived from the first (bottom-left) corner.
pub fn decode_record(fields: &Fields) -> Result<PaintedCellRecord> {
    let coordinates = fields
        .get(FIELD_COORDINATES)
        .and_then(Value::as_array)
        .ok_or_else(|| SyncError::malformed("missing coordinates"))?;

    if coordinates.len() != 4 {
        return Err(SyncError::malformed(format!(
            "expected 4 coordinates, found {}",
            coordinates.len()
        )));
    }

    let mut corners = [GeoCoordinate {
        latitude: 0.0,
        longitude: 0.0,
    }; 4];
    for (slot, value) in corners.iter_mut().zip(coordinates) {
        *slot = decode_coordinate(value)?;
    }

    let color = match fields.get(FIELD_COLOR).and_then(Value::as_str) {
        Some(name) => name.parse().unwrap_or_else(|err| {
            warn!("{}, using {}", err, PaintColor::default());
            PaintColor::default()
        }),
        None => PaintColor::default(),
    };

    Ok(PaintedCellRecord {
        id: CellId::from_origin(&corners[0]),
        corners,
        color,
        written_at: fields.get(FIELD_TIMESTAMP).and_then(decode_timestamp),
    })
}

fn decode_coordinate(value: &Value) -> Result<GeoCoordinate> {
    let latitude = value["latitude"]
        .as_f64()
        .ok_or_else(|| SyncError::malformed("corner without latitude"))?;
    let longitude = value["longitude"]
        .as_f64()
        .ok_or_else(|| SyncError::malformed("corner without longitude"))?;

    GeoCoordinate::new(latitude, longitude).map_err(|e| SyncError::malformed(e.to_string()))
}

/// RFC 3339 strings or epoch milliseconds
fn decode_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}
