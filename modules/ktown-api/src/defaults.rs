//! The default exports kept under the public directory, used when a client
//! asks for the world without uploading anything.

use std::path::Path;

use anyhow::anyhow;
use serde_json::Value;
use tracing::debug;

use ktown_common::{Config, KtownError};

/// Which default exports exist on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFilesStatus {
    pub has_file1: bool,
    pub has_file2: bool,
    pub has_books: bool,
}

impl DefaultFilesStatus {
    pub fn all_present(&self) -> bool {
        self.has_file1 && self.has_file2 && self.has_books
    }
}

/// The parsed default exports.
#[derive(Debug, Clone)]
pub struct DefaultDocuments {
    pub file1: Value,
    pub file2: Value,
    pub books: Value,
}

pub async fn check(config: &Config) -> DefaultFilesStatus {
    DefaultFilesStatus {
        has_file1: exists(&config.file1()).await,
        has_file2: exists(&config.file2()).await,
        has_books: exists(&config.books()).await,
    }
}

/// Read and parse all three default exports. Any missing file fails the
/// whole load.
pub async fn load(config: &Config) -> Result<DefaultDocuments, KtownError> {
    let status = check(config).await;
    if !status.all_present() {
        return Err(KtownError::Anyhow(anyhow!(
            "Default files missing. file1: {}, file2: {}, books: {}",
            status.has_file1,
            status.has_file2,
            status.has_books
        )));
    }
    Ok(DefaultDocuments {
        file1: read_json(&config.file1()).await?,
        file2: read_json(&config.file2()).await?,
        books: read_json(&config.books()).await?,
    })
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn read_json(path: &Path) -> Result<Value, KtownError> {
    let raw = tokio::fs::read_to_string(path).await?;
    debug!(path = %path.display(), bytes = raw.len(), "Read default export");
    Ok(serde_json::from_str(&raw)?)
}
