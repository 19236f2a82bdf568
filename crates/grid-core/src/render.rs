//! GeoJSON shape sources handed to the map widget

use crate::grid_index::GridLines;
use crate::painted_set::PaintedCellRecord;
use serde_json::{json, Value};

/// Fill layer source: one polygon feature per painted cell.
///
/// Rings are closed and use GeoJSON `[longitude, latitude]` order.
pub fn painted_cells_source(records: &[PaintedCellRecord]) -> Value {
    let features: Vec<Value> = records
        .iter()
        .map(|record| {
            let cell = record.to_cell();
            let ring: Vec<[f64; 2]> = cell
                .boundary
                .iter()
                .map(|c| [c.longitude, c.latitude])
                .collect();

            json!({
                "type": "Feature",
                "id": record.id.as_str(),
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [ring],
                },
                "properties": {
                    "id": record.id.as_str(),
                    "color": record.color.name(),
                    "fillColor": record.color.hex(),
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Line layer source for the debug grid overlay
pub fn grid_lines_source(lines: &GridLines) -> Value {
    let segments: Vec<Vec<[f64; 2]>> = lines
        .iter()
        .map(|line| line.iter().map(|c| [c.longitude, c.latitude]).collect())
        .collect();

    json!({
        "type": "Feature",
        "geometry": {
            "type": "MultiLineString",
            "coordinates": segments,
        },
        "properties": {},
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PaintColor;
    use crate::geo::{BoundingRegion, GeoCoordinate, GridDimensions};
    use crate::grid_index::GridIndex;

    #[test]
    fn test_painted_cells_source() {
        let grid = GridIndex::new(BoundingRegion::JAPAN, GridDimensions::default()).unwrap();
        let cell = grid
            .resolve_cell(&GeoCoordinate::new(35.681236, 139.767125).unwrap())
            .unwrap();
        let record = PaintedCellRecord::new(&cell, PaintColor::Blue);

        let source = painted_cells_source(&[record]);
        let feature = &source["features"][0];

        assert_eq!(source["type"], "FeatureCollection");
        assert_eq!(feature["properties"]["id"], cell.id.as_str());
        assert_eq!(feature["properties"]["color"], "Blue");
        assert_eq!(feature["properties"]["fillColor"], "#007aff");

        let ring = feature["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[0][0].as_f64().unwrap(), cell.origin().longitude);
        assert_eq!(ring[0][1].as_f64().unwrap(), cell.origin().latitude);
    }

    #[test]
    fn test_empty_source() {
        let source = painted_cells_source(&[]);
        assert!(source["features"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_grid_lines_source() {
        let region = BoundingRegion::new(30.0, 40.0, 130.0, 140.0).unwrap();
        let grid = GridIndex::new(region, GridDimensions::new(2, 3).unwrap()).unwrap();
        let source = grid_lines_source(&grid.grid_lines().unwrap());

        let segments = source["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(segments.len(), 4 + 3);
        assert_eq!(segments[0][0][0].as_f64().unwrap(), 130.0);
        assert_eq!(segments[0][0][1].as_f64().unwrap(), 30.0);
    }
}
