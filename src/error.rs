use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Search backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Solution catalog not found at {0}")]
    CatalogNotFound(PathBuf),

    #[error("Failed to read solution catalog from {path}: {source}")]
    CatalogRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse solution catalog: {0}")]
    CatalogParse(String),

    #[error("Failed to read rules from {path}: {source}")]
    RulesRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse rules: {0}")]
    RulesParse(String),

    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
