use thiserror::Error;

use crate::source::SourceLabel;

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("{which} is missing from the request")]
    MissingInput { which: SourceLabel },

    #[error("{which} must be a JSON object, found {found}")]
    MalformedSource {
        which: SourceLabel,
        found: &'static str,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorldError>;
