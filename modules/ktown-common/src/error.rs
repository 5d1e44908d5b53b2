use thiserror::Error;

use ktown_world::WorldError;

#[derive(Error, Debug)]
pub enum KtownError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
