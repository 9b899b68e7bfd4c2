//! Catalogs of target and candidate tables.
//!
//! A standards directory holds a `manifest.toml` listing every catalog with
//! its role and pinned sha256, plus the CSV files themselves. Files not
//! listed in the manifest are rejected.

pub mod error;
pub mod hash;
pub mod manifest;
pub mod paths;
pub mod registry;
pub mod tables;

pub use crate::error::CatalogError;
pub use crate::manifest::{CatalogEntry, CatalogRole, Manifest};
pub use crate::paths::{STANDARDS_ENV_VAR, standards_root};
pub use crate::registry::{CatalogRegistry, CatalogSummary, VerifySummary};
pub use crate::tables::{parse_candidates_csv, parse_targets_csv};
