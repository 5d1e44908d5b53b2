use std::collections::HashSet;

use serde_json::Value;
use tracing::info;

use crate::assembler::{strip_coords, CellAssembler};
use crate::error::Result;
use crate::normalize::scalar_key;
use crate::source::{BooksDocument, SourceDocument, SourceLabel};
use crate::types::{Cell, WorldData};

/// Merge two world exports (and an optional books export) into the cell
/// model the map renders.
///
/// Either the whole model is built or an error is returned; nothing partial
/// escapes.
pub fn build_world_data(
    file1: Option<&Value>,
    file2: Option<&Value>,
    books: Option<&Value>,
) -> Result<WorldData> {
    let file1 = SourceDocument::from_value(SourceLabel::File1, file1)?;
    let file2 = SourceDocument::from_value(SourceLabel::File2, file2)?;
    let books = BooksDocument::from_value(books);

    let cells = CellAssembler::new(file1, file2, books).assemble()?;
    let world = emit(cells);

    let stats = world.stats();
    info!(
        cells = stats.cells,
        sites = stats.sites,
        figures = stats.historical_figures,
        written_contents = stats.written_contents,
        "Built world data"
    );
    Ok(world)
}

/// Order cells by `x`, then `y`, and drop the raw coordinate strings that
/// the cell position already encodes. Nothing is filtered out.
pub fn emit(mut cells: Vec<Cell>) -> WorldData {
    cells.sort_by_key(|c| (c.x, c.y));
    for cell in &mut cells {
        if let Some(region) = cell.region.as_mut() {
            strip_coords(region);
        }
        for region in &mut cell.underground_regions {
            strip_coords(region);
        }
    }
    WorldData { cells }
}

/// Summary counts for one built world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub cells: usize,
    pub sites: usize,
    /// Distinct figure ids attached to any cell.
    pub historical_figures: usize,
    /// Distinct written content ids attached to any cell.
    pub written_contents: usize,
}

impl WorldData {
    pub fn stats(&self) -> WorldStats {
        let mut figures = HashSet::new();
        let mut contents = HashSet::new();
        let mut sites = 0;
        for cell in &self.cells {
            sites += cell.sites.len();
            figures.extend(
                cell.historical_figures
                    .iter()
                    .filter_map(|f| f.get("id").and_then(scalar_key)),
            );
            contents.extend(
                cell.written_contents
                    .iter()
                    .filter_map(|w| w.id.as_ref().and_then(scalar_key)),
            );
        }
        WorldStats {
            cells: self.cells.len(),
            sites,
            historical_figures: figures.len(),
            written_contents: contents.len(),
        }
    }
}
