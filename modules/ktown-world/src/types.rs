use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coords::Coord;
use crate::normalize::Record;
use crate::source::SourceLabel;

/// A written work, tagged with the export it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrittenContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    /// `style`, falling back to `form`; `null` when neither is present.
    pub style: Value,
    pub raw: Record,
    pub source: SourceLabel,
}

/// An entry from the separate books export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    pub raw: Record,
}

/// A site as placed on the map.
///
/// Unlike regions, the two exports' records are kept side by side rather
/// than merged field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedSite {
    pub id: Option<Value>,
    #[serde(rename = "fromFile1")]
    pub from_file1: Option<Record>,
    #[serde(rename = "fromFile2")]
    pub from_file2: Option<Record>,
    /// file2's `structures`, or file1's when file2 has none.
    pub structures: Value,
    /// Figure ids inferred from `structures`.
    pub inhabitants: Vec<String>,
    pub historical_figures: Vec<Record>,
    pub written_contents: Vec<WrittenContent>,
}

/// The per-coordinate unit of the world model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub key: String,
    pub x: i64,
    pub y: i64,
    pub region: Option<Record>,
    #[serde(rename = "undergroundRegions")]
    pub underground_regions: Vec<Record>,
    pub sites: Vec<MergedSite>,
    pub historical_figures: Vec<Record>,
    pub written_contents: Vec<WrittenContent>,
}

impl Cell {
    pub fn new(coord: Coord) -> Self {
        Self {
            key: coord.key(),
            x: coord.x,
            y: coord.y,
            region: None,
            underground_regions: Vec::new(),
            sites: Vec::new(),
            historical_figures: Vec::new(),
            written_contents: Vec::new(),
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// The emitted world model: every cell, ordered by `x` then `y`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    pub cells: Vec<Cell>,
}

impl WorldData {
    pub fn cell_at(&self, x: i64, y: i64) -> Option<&Cell> {
        self.cells
            .binary_search_by_key(&(x, y), |c| (c.x, c.y))
            .ok()
            .map(|i| &self.cells[i])
    }
}
