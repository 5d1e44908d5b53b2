use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WorldError};
use crate::normalize::{is_truthy, records, Record};

/// Which of the two exports a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLabel {
    File1,
    File2,
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLabel::File1 => write!(f, "file1"),
            SourceLabel::File2 => write!(f, "file2"),
        }
    }
}

/// Root objects the entity lists hang off. The exporter writes `df_world`;
/// older exports use `world`.
const ROOT_KEYS: [&str; 2] = ["df_world", "world"];

/// One parsed world export, borrowed from the request body.
///
/// Every accessor goes through the array normalizer, so callers always get
/// a plain sequence of object records whatever shape the export used.
#[derive(Debug, Clone, Copy)]
pub struct SourceDocument<'a> {
    label: SourceLabel,
    world: Option<&'a Record>,
}

impl<'a> SourceDocument<'a> {
    /// Validate a raw document. Absent or falsy documents are a missing
    /// input; anything else that is not an object is malformed.
    pub fn from_value(label: SourceLabel, value: Option<&'a Value>) -> Result<Self> {
        let value = match value {
            Some(v) if is_truthy(v) => v,
            _ => return Err(WorldError::MissingInput { which: label }),
        };
        let Some(doc) = value.as_object() else {
            return Err(WorldError::MalformedSource {
                which: label,
                found: json_kind(value),
            });
        };
        let world = ROOT_KEYS
            .iter()
            .find_map(|key| doc.get(*key).and_then(Value::as_object));
        Ok(Self { label, world })
    }

    pub fn label(&self) -> SourceLabel {
        self.label
    }

    /// Records at `<root>.<group>.<item>`.
    fn section(&self, group: &str, item: &str) -> Vec<&'a Record> {
        let field = self
            .world
            .and_then(|w| w.get(group))
            .and_then(Value::as_object)
            .and_then(|g| g.get(item));
        records(field)
    }

    pub fn regions(&self) -> Vec<&'a Record> {
        self.section("regions", "region")
    }

    pub fn underground_regions(&self) -> Vec<&'a Record> {
        self.section("underground_regions", "underground_region")
    }

    pub fn sites(&self) -> Vec<&'a Record> {
        self.section("sites", "site")
    }

    pub fn historical_figures(&self) -> Vec<&'a Record> {
        self.section("historical_figures", "historical_figure")
    }

    pub fn written_contents(&self) -> Vec<&'a Record> {
        self.section("written_contents", "written_content")
    }
}

/// The optional books export: a flat list (or single object) of books.
#[derive(Debug, Clone, Default)]
pub struct BooksDocument<'a> {
    books: Vec<&'a Record>,
}

impl<'a> BooksDocument<'a> {
    pub fn from_value(value: Option<&'a Value>) -> Self {
        Self {
            books: records(value),
        }
    }

    pub fn books(&self) -> &[&'a Record] {
        &self.books
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
