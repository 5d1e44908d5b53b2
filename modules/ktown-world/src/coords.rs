use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?[0-9]+").unwrap());

/// A grid coordinate on the world map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The `"x,y"` key cells are addressed by.
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

/// Extract `(x, y)` pairs from a free-form coordinate string such as
/// `"(3, -4) (10,20)"`.
///
/// Integer tokens (ASCII digits only) are paired left to right and a
/// trailing unpaired token is ignored. A pair with a token that does not
/// fit an `i64` is dropped whole.
pub fn parse_coords(input: &str) -> Vec<Coord> {
    let tokens: Vec<&str> = INTEGER_RE.find_iter(input).map(|m| m.as_str()).collect();
    tokens
        .chunks_exact(2)
        .filter_map(|pair| {
            let x = pair[0].parse::<i64>().ok()?;
            let y = pair[1].parse::<i64>().ok()?;
            Some(Coord { x, y })
        })
        .collect()
}

/// [`parse_coords`] over a raw `coords` field; non-strings decode to nothing.
pub fn parse_coords_value(value: Option<&Value>) -> Vec<Coord> {
    match value {
        Some(Value::String(s)) => parse_coords(s),
        _ => Vec::new(),
    }
}
