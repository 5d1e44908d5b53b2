//! Display-ready entities for a click on the map.
//!
//! Everything here is read straight off an emitted [`Cell`]; no
//! relationship is re-derived beyond matching a structure's `inhabitant`
//! field against its site's resolved figures.

use serde::Serialize;
use serde_json::Value;

use crate::coords::Coord;
use crate::normalize::{normalize_to_array, scalar_key, Record};
use crate::types::{Cell, MergedSite, WrittenContent};

/// What was clicked inside a cell. Indices address the cell's own lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Cell,
    Region,
    Site { site: usize },
    Structure { site: usize, structure: usize },
    /// A figure resolved on a site.
    Figure { site: usize, figure: usize },
    /// A figure from the cell's own figure list.
    CellFigure { figure: usize },
    UndergroundRegion { index: usize },
    /// A written content from the cell's own list.
    WrittenContent { index: usize },
    /// A written content attributed to one of a site's inhabitants.
    Book { site: usize, content: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Cell,
    Site,
    Structure,
    Figure,
    UndergroundRegion,
    WrittenContent,
    Book,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedEntity<'a> {
    pub kind: EntityKind,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    pub cell_coords: Coord,
    pub cell: &'a Cell,
    pub region: Option<&'a Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<&'a MergedSite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figure: Option<&'a Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_content: Option<&'a WrittenContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underground_region: Option<&'a Record>,
    /// For structures: the site's figures listed in the structure's
    /// `inhabitant` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inhabitants: Option<Vec<&'a Record>>,
}

impl<'a> SelectedEntity<'a> {
    fn new(kind: EntityKind, name: String, cell: &'a Cell) -> Self {
        Self {
            kind,
            name,
            entity_type: None,
            cell_coords: cell.coord(),
            cell,
            region: cell.region.as_ref(),
            site: None,
            structure: None,
            figure: None,
            written_content: None,
            underground_region: None,
            inhabitants: None,
        }
    }

    fn with_type(mut self, entity_type: Option<String>) -> Self {
        self.entity_type = entity_type;
        self
    }
}

/// Compose the entity for `selection` in `cell`. Out-of-range indices
/// select nothing.
pub fn compose(cell: &Cell, selection: Selection) -> Option<SelectedEntity<'_>> {
    let region_type = cell.region.as_ref().and_then(|r| text(r.get("type")));
    let entity = match selection {
        Selection::Cell => {
            let name = format!("Cell ({}, {})", cell.x, cell.y);
            SelectedEntity::new(EntityKind::Cell, name, cell).with_type(region_type)
        }
        Selection::Region => {
            let name = format!("Region: {}", region_type.as_deref().unwrap_or("Unknown"));
            SelectedEntity::new(EntityKind::Cell, name, cell).with_type(region_type)
        }
        Selection::Site { site } => {
            let site = cell.sites.get(site)?;
            let mut entity = SelectedEntity::new(EntityKind::Site, site_name(site), cell)
                .with_type(Some(site_type(site)));
            entity.site = Some(site);
            entity
        }
        Selection::Structure { site, structure } => {
            let site = cell.sites.get(site)?;
            let structure = *site_structures(site).get(structure)?;
            let name = [structure.get("name"), structure.get("type")]
                .into_iter()
                .find_map(text)
                .unwrap_or_else(|| "Structure".to_string());
            let mut entity = SelectedEntity::new(EntityKind::Structure, name, cell)
                .with_type(text(structure.get("type")));
            entity.site = Some(site);
            entity.structure = Some(structure);
            entity.inhabitants = Some(structure_inhabitants(site, structure));
            entity
        }
        Selection::Figure { site, figure } => {
            let site = cell.sites.get(site)?;
            let figure = site.historical_figures.get(figure)?;
            let mut entity = figure_entity(cell, figure);
            entity.site = Some(site);
            entity
        }
        Selection::CellFigure { figure } => figure_entity(cell, cell.historical_figures.get(figure)?),
        Selection::UndergroundRegion { index } => {
            let region = cell.underground_regions.get(index)?;
            let name = text(region.get("name")).unwrap_or_else(|| "Underground Region".to_string());
            let mut entity = SelectedEntity::new(EntityKind::UndergroundRegion, name, cell)
                .with_type(text(region.get("type")));
            entity.underground_region = Some(region);
            entity
        }
        Selection::WrittenContent { index } => {
            let content = cell.written_contents.get(index)?;
            content_entity(EntityKind::WrittenContent, cell, content)
        }
        Selection::Book { site, content } => {
            let site = cell.sites.get(site)?;
            let content = site.written_contents.get(content)?;
            let mut entity = content_entity(EntityKind::Book, cell, content);
            entity.site = Some(site);
            entity
        }
    };
    Some(entity)
}

fn figure_entity<'a>(cell: &'a Cell, figure: &'a Record) -> SelectedEntity<'a> {
    let name = [figure.get("name"), figure.get("id")]
        .into_iter()
        .find_map(text)
        .unwrap_or_else(|| "Unknown figure".to_string());
    let mut entity = SelectedEntity::new(EntityKind::Figure, name, cell);
    entity.figure = Some(figure);
    entity
}

fn content_entity<'a>(
    kind: EntityKind,
    cell: &'a Cell,
    content: &'a WrittenContent,
) -> SelectedEntity<'a> {
    let name = text(content.title.as_ref()).unwrap_or_else(|| "Written Content".to_string());
    let mut entity = SelectedEntity::new(kind, name, cell);
    entity.written_content = Some(content);
    entity
}

/// A site's display name: file2's, then file1's.
pub fn site_name(site: &MergedSite) -> String {
    site_field(site, "name").unwrap_or_else(|| "Unknown site".to_string())
}

/// A site's type: file2's, then file1's, else `"default"`.
pub fn site_type(site: &MergedSite) -> String {
    site_field(site, "type").unwrap_or_else(|| "default".to_string())
}

fn site_field(site: &MergedSite, key: &str) -> Option<String> {
    [&site.from_file2, &site.from_file1]
        .into_iter()
        .flatten()
        .find_map(|r| text(r.get(key)))
}

/// The individual structures of a site. Exports nest them as
/// `structures.structure`, which may itself be one object or a list.
pub fn site_structures(site: &MergedSite) -> Vec<&Value> {
    let top = normalize_to_array(Some(&site.structures));
    if let &[only] = top.as_slice() {
        if let Some(nested) = only.get("structure") {
            return normalize_to_array(Some(nested));
        }
    }
    top
}

fn structure_inhabitants<'a>(site: &'a MergedSite, structure: &Value) -> Vec<&'a Record> {
    let ids: Vec<String> = normalize_to_array(structure.get("inhabitant"))
        .into_iter()
        .filter_map(scalar_key)
        .collect();
    site.historical_figures
        .iter()
        .filter(|f| {
            f.get("id")
                .and_then(scalar_key)
                .is_some_and(|id| ids.contains(&id))
        })
        .collect()
}

/// Non-empty display text for a scalar field.
fn text(value: Option<&Value>) -> Option<String> {
    scalar_key(value?).filter(|s| !s.is_empty())
}
