//! Merges two overlapping world exports into one per-cell world model.
//!
//! The pipeline is pure and synchronous: every call to [`build_world_data`]
//! builds its own lookup tables and cell map, so concurrent requests share
//! nothing.

pub mod assembler;
pub mod coords;
pub mod error;
pub mod inhabitants;
pub mod merge;
pub mod normalize;
pub mod selection;
pub mod source;
pub mod types;
pub mod world;

pub use coords::{parse_coords, Coord};
pub use error::{Result, WorldError};
pub use normalize::{normalize_to_array, Record};
pub use selection::{compose, EntityKind, SelectedEntity, Selection};
pub use source::{BooksDocument, SourceDocument, SourceLabel};
pub use types::*;
pub use world::{build_world_data, WorldStats};
