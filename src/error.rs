//! Error types for loading data, reading configuration and writing the site.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised outside the view-model transforms, which never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to access {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("unable to process JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unable to parse CSV in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("unable to parse {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported data format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl Error {
    pub fn io(path: &Path, source: io::Error) -> Error {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Error {
        Error::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
