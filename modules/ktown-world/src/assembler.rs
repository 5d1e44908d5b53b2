use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::debug;

use crate::coords::{parse_coords_value, Coord};
use crate::error::Result;
use crate::inhabitants::infer_inhabitants;
use crate::merge::{BooksByAuthor, FigureMap, OverlayIndex, SiteIndex, WrittenByAuthor};
use crate::normalize::{is_truthy, scalar_key, Record};
use crate::source::{BooksDocument, SourceDocument};
use crate::types::{Cell, MergedSite, WrittenContent};

/// Every lookup table the placement passes read from.
#[derive(Debug, Clone)]
pub struct Lookups<'a> {
    pub figures: FigureMap,
    pub written_by_author: WrittenByAuthor,
    pub books_by_author: BooksByAuthor,
    pub regions: OverlayIndex<'a>,
    pub underground_regions: OverlayIndex<'a>,
    pub sites: SiteIndex<'a>,
}

impl<'a> Lookups<'a> {
    pub fn build(
        file1: &SourceDocument<'a>,
        file2: &SourceDocument<'a>,
        books: &BooksDocument<'a>,
    ) -> Self {
        let regions = OverlayIndex::new(file2.regions());
        let underground_regions = OverlayIndex::new(file2.underground_regions());
        debug!(
            regions = regions.len(),
            underground_regions = underground_regions.len(),
            "Indexed file2 regions"
        );
        Self {
            figures: FigureMap::build(file1, file2),
            written_by_author: WrittenByAuthor::build(file1, file2),
            books_by_author: BooksByAuthor::build(books),
            regions,
            underground_regions,
            sites: SiteIndex::new(file1.sites()),
        }
    }
}

/// Places regions, underground regions and sites onto grid cells.
///
/// Cells are created the first time any pass touches their coordinate.
/// The passes must run in order: regions, underground regions, sites.
pub struct CellAssembler<'a> {
    file1: SourceDocument<'a>,
    file2: SourceDocument<'a>,
    lookups: Lookups<'a>,
    cells: HashMap<Coord, CellBuilder>,
}

impl<'a> CellAssembler<'a> {
    pub fn new(
        file1: SourceDocument<'a>,
        file2: SourceDocument<'a>,
        books: BooksDocument<'a>,
    ) -> Self {
        let lookups = Lookups::build(&file1, &file2, &books);
        Self {
            file1,
            file2,
            lookups,
            cells: HashMap::new(),
        }
    }

    /// Run all three passes and hand back the cells, unordered.
    pub fn assemble(mut self) -> Result<Vec<Cell>> {
        self.place_regions();
        self.place_underground_regions();
        self.place_sites()?;
        Ok(self.cells.into_values().map(|b| b.cell).collect())
    }

    fn builder(&mut self, coord: Coord) -> &mut CellBuilder {
        self.cells
            .entry(coord)
            .or_insert_with(|| CellBuilder::new(coord))
    }

    fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        &mut self.builder(coord).cell
    }

    /// Each file1 region, overlaid with its file2 counterpart, becomes the
    /// region of every cell it covers. Where regions overlap the last one
    /// in file1 order wins.
    pub fn place_regions(&mut self) {
        for region in self.file1.regions() {
            let coords = parse_coords_value(region.get("coords"));
            if coords.is_empty() {
                debug!(id = ?region.get("id"), "Region has no coordinates");
                continue;
            }
            let merged = self.lookups.regions.merge(region);
            for coord in coords {
                self.cell_mut(coord).region = Some(merged.clone());
            }
        }
    }

    /// Underground regions stack: each covered cell gets the merged record
    /// appended, without deduplication.
    pub fn place_underground_regions(&mut self) {
        for region in self.file1.underground_regions() {
            let coords = parse_coords_value(region.get("coords"));
            if coords.is_empty() {
                debug!(id = ?region.get("id"), "Underground region has no coordinates");
                continue;
            }
            let merged = self.lookups.underground_regions.merge(region);
            for coord in coords {
                self.cell_mut(coord).underground_regions.push(merged.clone());
            }
        }
    }

    /// file2 sites land on the first coordinate they list. Their inhabitants
    /// and those inhabitants' works are folded into the cell as well.
    pub fn place_sites(&mut self) -> Result<()> {
        for site in self.file2.sites() {
            if !site.get("coords").is_some_and(is_truthy) {
                debug!(id = ?site.get("id"), "Site has no coordinates, dropping");
                continue;
            }
            let Some(&coord) = parse_coords_value(site.get("coords")).first() else {
                debug!(id = ?site.get("id"), "Site coordinates did not decode, dropping");
                continue;
            };

            let merged = self.build_site(site)?;
            let builder = self.builder(coord);
            builder.add_historical_figures(&merged.historical_figures);
            builder.add_written_contents(&merged.written_contents);
            builder.cell.sites.push(merged);
        }
        Ok(())
    }

    fn build_site(&self, site: &Record) -> Result<MergedSite> {
        let sources = self.lookups.sites.pair(site);
        let structures = sources.structures();
        let inhabitants = infer_inhabitants(&structures, &self.lookups.figures);

        let mut historical_figures = Vec::with_capacity(inhabitants.len());
        for id in &inhabitants {
            if let Some(figure) = self.resolve_figure(id)? {
                historical_figures.push(figure);
            }
        }

        let written_contents: Vec<WrittenContent> = inhabitants
            .iter()
            .flat_map(|id| self.lookups.written_by_author.by_author(id))
            .cloned()
            .collect();

        Ok(MergedSite {
            id: site.get("id").cloned(),
            from_file1: sources.from_file1,
            from_file2: sources.from_file2,
            structures,
            inhabitants,
            historical_figures,
            written_contents,
        })
    }

    /// The merged figure for `id`, carrying its books when any are known.
    fn resolve_figure(&self, id: &str) -> Result<Option<Record>> {
        let Some(figure) = self.lookups.figures.get(id) else {
            return Ok(None);
        };
        let mut figure = figure.clone();
        if let Some(books) = self.lookups.books_by_author.by_author(id) {
            figure.insert("books".to_string(), serde_json::to_value(books)?);
        }
        Ok(Some(figure))
    }
}

/// A cell being assembled, plus the ids already unioned into its figure
/// and written content lists.
struct CellBuilder {
    cell: Cell,
    figure_ids: HashSet<Option<String>>,
    content_ids: HashSet<Option<String>>,
}

impl CellBuilder {
    fn new(coord: Coord) -> Self {
        Self {
            cell: Cell::new(coord),
            figure_ids: HashSet::new(),
            content_ids: HashSet::new(),
        }
    }

    /// Union figures into the cell by `id`; already-present ids are skipped.
    fn add_historical_figures<'a>(&mut self, figures: impl IntoIterator<Item = &'a Record>) {
        for figure in figures {
            if self.figure_ids.insert(union_key(figure.get("id"))) {
                self.cell.historical_figures.push(figure.clone());
            }
        }
    }

    /// Union written contents into the cell by `id`.
    fn add_written_contents<'a>(&mut self, contents: impl IntoIterator<Item = &'a WrittenContent>) {
        for content in contents {
            if self.content_ids.insert(union_key(content.id.as_ref())) {
                self.cell.written_contents.push(content.clone());
            }
        }
    }
}

/// Identity of an id value for unioning: numbers compare by value, a
/// string id never equals a numeric one, and all missing ids are one key.
fn union_key(id: Option<&Value>) -> Option<String> {
    match id? {
        number @ Value::Number(_) => scalar_key(number),
        other => Some(other.to_string()),
    }
}

/// Drop the raw coordinate string from a placed region record.
pub(crate) fn strip_coords(record: &mut Record) {
    record.remove("coords");
}
