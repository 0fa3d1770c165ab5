use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort the scan before any tree exists.
///
/// Anything below the root (unreadable files, permission errors in a
/// subdirectory, a missing `git`) is absorbed by the collaborators and
/// never shows up here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path does not exist: {path}")]
    RootNotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {details}")]
    Parse { path: PathBuf, details: String },

    #[error("invalid configuration: {details}")]
    Invalid { details: String },
}
