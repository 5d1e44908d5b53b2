//! Id-indexed lookup tables built from both exports.
//!
//! Figures are shallow-merged across exports, regions and underground
//! regions are overlaid file2-on-file1 at placement time, and sites keep
//! both exports' records side by side. The asymmetry is what the map
//! renderer expects: it reads `fromFile1`/`fromFile2` of a site
//! independently.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::normalize::{first_truthy, id_key, is_truthy, scalar_key, shallow_merge, Record};
use crate::source::{BooksDocument, SourceDocument};
use crate::types::{Book, WrittenContent};

const WRITTEN_AUTHOR_KEYS: [&str; 3] = ["author_hfid", "author_hf_id", "author_hfid_id"];
const BOOK_AUTHOR_KEYS: [&str; 4] = ["author_hfid", "author_hf_id", "author", "author_id"];

/// Historical figures by id, file2 fields overlaid on file1's.
#[derive(Debug, Clone, Default)]
pub struct FigureMap {
    by_id: HashMap<String, Record>,
}

impl FigureMap {
    pub fn build(file1: &SourceDocument<'_>, file2: &SourceDocument<'_>) -> Self {
        let mut by_id: HashMap<String, Record> = HashMap::new();
        for figure in file1
            .historical_figures()
            .into_iter()
            .chain(file2.historical_figures())
        {
            let Some(id) = id_key(figure.get("id")) else {
                continue;
            };
            let merged = shallow_merge(by_id.get(&id), Some(figure));
            by_id.insert(id, merged);
        }
        debug!(figures = by_id.len(), "Built historical figure map");
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Written contents grouped by authoring figure id, file1's works first.
#[derive(Debug, Clone, Default)]
pub struct WrittenByAuthor {
    by_author: HashMap<String, Vec<WrittenContent>>,
}

impl WrittenByAuthor {
    pub fn build(file1: &SourceDocument<'_>, file2: &SourceDocument<'_>) -> Self {
        let mut by_author: HashMap<String, Vec<WrittenContent>> = HashMap::new();
        for doc in [file1, file2] {
            for wc in doc.written_contents() {
                let Some(author) = first_truthy(wc, &WRITTEN_AUTHOR_KEYS).and_then(scalar_key)
                else {
                    continue;
                };
                let normalized = WrittenContent {
                    id: wc.get("id").cloned(),
                    title: wc.get("title").cloned(),
                    style: wc
                        .get("style")
                        .filter(|v| !v.is_null())
                        .or_else(|| wc.get("form").filter(|v| !v.is_null()))
                        .cloned()
                        .unwrap_or(Value::Null),
                    raw: wc.clone(),
                    source: doc.label(),
                };
                by_author.entry(author).or_default().push(normalized);
            }
        }
        debug!(authors = by_author.len(), "Built written content author map");
        Self { by_author }
    }

    pub fn by_author(&self, author_id: &str) -> &[WrittenContent] {
        self.by_author
            .get(author_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Books from the separate books export, grouped by author id.
#[derive(Debug, Clone, Default)]
pub struct BooksByAuthor {
    by_author: HashMap<String, Vec<Book>>,
}

impl BooksByAuthor {
    pub fn build(books: &BooksDocument<'_>) -> Self {
        let mut by_author: HashMap<String, Vec<Book>> = HashMap::new();
        for book in books.books() {
            let Some(author) = first_truthy(book, &BOOK_AUTHOR_KEYS).and_then(scalar_key) else {
                continue;
            };
            by_author.entry(author).or_default().push(Book {
                id: book.get("id").cloned(),
                title: book.get("title").cloned(),
                raw: (*book).clone(),
            });
        }
        debug!(authors = by_author.len(), "Built books author map");
        Self { by_author }
    }

    pub fn by_author(&self, author_id: &str) -> Option<&[Book]> {
        self.by_author.get(author_id).map(Vec::as_slice)
    }
}

/// file2 records by id, overlaid onto file1 records as they are placed.
///
/// Used for regions and underground regions. A later duplicate id in file2
/// replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct OverlayIndex<'a> {
    by_id: HashMap<String, &'a Record>,
}

impl<'a> OverlayIndex<'a> {
    pub fn new(overlay: Vec<&'a Record>) -> Self {
        let by_id = overlay
            .into_iter()
            .filter_map(|r| id_key(r.get("id")).map(|id| (id, r)))
            .collect();
        Self { by_id }
    }

    /// `base` with its same-id counterpart's top-level fields laid over it.
    pub fn merge(&self, base: &Record) -> Record {
        let overlay = id_key(base.get("id")).and_then(|id| self.by_id.get(&id).copied());
        shallow_merge(Some(base), overlay)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Both exports' raw records for one site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSources {
    pub from_file1: Option<Record>,
    pub from_file2: Option<Record>,
}

impl SiteSources {
    /// file2's `structures` when present, else file1's, else `null`.
    pub fn structures(&self) -> Value {
        [&self.from_file2, &self.from_file1]
            .into_iter()
            .flatten()
            .filter_map(|r| r.get("structures"))
            .find(|v| is_truthy(v))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// file1 sites by id, paired with the file2 sites being placed.
#[derive(Debug, Clone, Default)]
pub struct SiteIndex<'a> {
    file1_by_id: HashMap<String, &'a Record>,
}

impl<'a> SiteIndex<'a> {
    pub fn new(file1_sites: Vec<&'a Record>) -> Self {
        let file1_by_id = file1_sites
            .into_iter()
            .filter_map(|s| id_key(s.get("id")).map(|id| (id, s)))
            .collect();
        Self { file1_by_id }
    }

    /// Keep a file2 site and its file1 counterpart side by side.
    pub fn pair(&self, site2: &Record) -> SiteSources {
        let from_file1 = id_key(site2.get("id"))
            .and_then(|id| self.file1_by_id.get(&id))
            .map(|s| (*s).clone());
        SiteSources {
            from_file1,
            from_file2: Some(site2.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceLabel;
    use serde_json::json;

    fn docs<'a>(a: &'a Value, b: &'a Value) -> (SourceDocument<'a>, SourceDocument<'a>) {
        (
            SourceDocument::from_value(SourceLabel::File1, Some(a)).unwrap(),
            SourceDocument::from_value(SourceLabel::File2, Some(b)).unwrap(),
        )
    }

    #[test]
    fn figure_fields_overlay_across_exports() {
        let f1 = json!({"df_world": {"historical_figures": {"historical_figure": {"id": 5, "name": "A"}}}});
        let f2 = json!({"df_world": {"historical_figures": {"historical_figure": [{"id": 5, "race": "elf"}]}}});
        let (a, b) = docs(&f1, &f2);
        let map = FigureMap::build(&a, &b);
        assert_eq!(
            Value::Object(map.get("5").cloned().unwrap()),
            json!({"id": 5, "name": "A", "race": "elf"})
        );
    }

    #[test]
    fn figures_without_ids_are_skipped() {
        let f1 = json!({"df_world": {"historical_figures": {"historical_figure": [{"name": "nobody"}, {"id": 0}, {"id": ""}]}}});
        let f2 = json!({});
        let (a, b) = docs(&f1, &f2);
        assert!(FigureMap::build(&a, &b).is_empty());
    }

    #[test]
    fn written_contents_group_by_author_in_source_order() {
        let f1 = json!({"df_world": {"written_contents": {"written_content": [
            {"id": 1, "title": "First", "author_hfid": 7, "form": "poem"},
            {"id": 2, "title": "Orphan"}
        ]}}});
        let f2 = json!({"df_world": {"written_contents": {"written_content": {
            "id": 3, "title": "Second", "author_hf_id": "7", "style": "terse"
        }}}});
        let (a, b) = docs(&f1, &f2);
        let by_author = WrittenByAuthor::build(&a, &b);
        let works = by_author.by_author("7");
        assert_eq!(works.len(), 2);
        assert_eq!(works[0].style, json!("poem"));
        assert_eq!(works[0].source, SourceLabel::File1);
        assert_eq!(works[1].style, json!("terse"));
        assert_eq!(works[1].source, SourceLabel::File2);
        assert!(by_author.by_author("8").is_empty());
    }

    #[test]
    fn books_group_by_first_author_field() {
        let books = json!([
            {"id": 1, "title": "A", "author": 9},
            {"id": 2, "title": "B", "author_id": "9"},
            {"id": 3, "title": "C"}
        ]);
        let doc = BooksDocument::from_value(Some(&books));
        let by_author = BooksByAuthor::build(&doc);
        assert_eq!(by_author.by_author("9").map(<[Book]>::len), Some(2));
        assert!(by_author.by_author("3").is_none());
    }

    #[test]
    fn overlay_index_merges_same_id_only() {
        let file2 = vec![json!({"id": 1, "type": "Forest"}), json!({"id": 2, "type": "Lake"})];
        let records: Vec<&Record> = file2.iter().filter_map(Value::as_object).collect();
        let index = OverlayIndex::new(records);
        let base = json!({"id": 1, "coords": "0,0", "type": "Hills"});
        assert_eq!(
            Value::Object(index.merge(base.as_object().unwrap())),
            json!({"id": 1, "coords": "0,0", "type": "Forest"})
        );
        let unmatched = json!({"id": 3, "coords": "1,1"});
        assert_eq!(
            Value::Object(index.merge(unmatched.as_object().unwrap())),
            unmatched
        );
    }

    #[test]
    fn sites_keep_both_sources() {
        let f1 = json!({"df_world": {"sites": {"site": {"id": 4, "name": "old", "structures": {"structure": {"id": 0}}}}}});
        let f2 = json!({"df_world": {"sites": {"site": [{"id": 4, "coords": "1,1"}, {"id": 5, "coords": "2,2"}]}}});
        let (a, b) = docs(&f1, &f2);
        let index = SiteIndex::new(a.sites());
        let sites2 = b.sites();

        let both = index.pair(sites2[0]);
        assert_eq!(both.from_file1.as_ref().unwrap()["name"], json!("old"));
        assert_eq!(both.from_file2.as_ref().unwrap()["coords"], json!("1,1"));
        assert!(both.from_file2.as_ref().unwrap().get("name").is_none());

        assert!(index.pair(sites2[1]).from_file1.is_none());
    }

    #[test]
    fn structures_prefer_file2() {
        let s1 = json!({"id": 1, "structures": {"from": 1}});
        let s2 = json!({"id": 1, "structures": {"from": 2}});
        let index = SiteIndex::new(vec![s1.as_object().unwrap()]);
        assert_eq!(index.pair(s2.as_object().unwrap()).structures(), json!({"from": 2}));

        let bare = json!({"id": 1});
        assert_eq!(index.pair(bare.as_object().unwrap()).structures(), json!({"from": 1}));

        let unknown = json!({"id": 2});
        assert_eq!(index.pair(unknown.as_object().unwrap()).structures(), Value::Null);
    }
}
