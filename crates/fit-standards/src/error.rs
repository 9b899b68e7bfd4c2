use std::path::PathBuf;

use fit_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("duplicate catalog id in manifest: {id}")]
    DuplicateId { id: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("invalid manifest path {path}: {message}")]
    InvalidPath { path: PathBuf, message: String },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("unexpected file present under standards/: {path}")]
    UnexpectedFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("invalid row in {path}: {source}")]
    Row {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("unknown catalog: {id}")]
    UnknownCatalog { id: String },

    #[error("catalog {id} holds {actual}, not {expected}")]
    WrongRole {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Csv {
            path: path.into(),
            message: message.into(),
        }
    }
}
