use std::env;
use std::path::PathBuf;

use crate::error::KtownError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Web server
    pub web_host: String,
    pub web_port: u16,
    pub body_limit_bytes: usize,

    // Default exports served without a request body
    pub public_dir: PathBuf,
    pub file1_path: PathBuf,
    pub file2_path: PathBuf,
    pub books_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_host: "0.0.0.0".to_string(),
            web_port: 3001,
            body_limit_bytes: 50 * 1024 * 1024,
            public_dir: PathBuf::from("public"),
            file1_path: PathBuf::from("big/map_plus.json"),
            file2_path: PathBuf::from("big/map.json"),
            books_path: PathBuf::from("big/books.json"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Every variable is
    /// optional; malformed numbers are an error.
    pub fn from_env() -> Result<Self, KtownError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, KtownError> {
        let defaults = Self::default();
        let body_limit_mb: usize = parse_var(&lookup, "BODY_LIMIT_MB")?.unwrap_or(50);
        Ok(Self {
            web_host: lookup("WEB_HOST").unwrap_or(defaults.web_host),
            web_port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.web_port),
            body_limit_bytes: body_limit_mb * 1024 * 1024,
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            file1_path: lookup("FILE1_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.file1_path),
            file2_path: lookup("FILE2_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.file2_path),
            books_path: lookup("BOOKS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.books_path),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }

    pub fn file1(&self) -> PathBuf {
        self.public_dir.join(&self.file1_path)
    }

    pub fn file2(&self) -> PathBuf {
        self.public_dir.join(&self.file2_path)
    }

    pub fn books(&self) -> PathBuf {
        self.public_dir.join(&self.books_path)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, KtownError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| KtownError::Config(format!("{key} must be a number, got {raw:?}"))),
    }
}
