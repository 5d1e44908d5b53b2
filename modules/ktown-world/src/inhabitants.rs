//! Inferred site inhabitants.
//!
//! Exports never say who lives at a site. The only trace is figure ids
//! scattered somewhere inside the site's `structures` subtree, so every
//! string or number leaf that equals a known figure id is taken as an
//! inhabitant.
//!
//! This is a heuristic. Any unrelated value that happens to equal a figure
//! id (a count, another entity's id under some other field) is reported as
//! an inhabitant too.

use std::collections::HashSet;

use serde_json::Value;

use crate::merge::FigureMap;
use crate::normalize::scalar_key;

/// Figure ids found anywhere in `structures`, each reported once, in
/// depth-first discovery order. Object keys are never inspected.
pub fn infer_inhabitants(structures: &Value, figures: &FigureMap) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    collect(structures, figures, &mut seen, &mut found);
    found
}

fn collect(
    value: &Value,
    figures: &FigureMap,
    seen: &mut HashSet<String>,
    found: &mut Vec<String>,
) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect(item, figures, seen, found);
            }
        }
        Value::Object(fields) => {
            for item in fields.values() {
                collect(item, figures, seen, found);
            }
        }
        leaf => {
            let Some(key) = scalar_key(leaf) else {
                return;
            };
            if figures.contains(&key) && seen.insert(key.clone()) {
                found.push(key);
            }
        }
    }
}
