use serde::{Deserialize, Serialize};

pub const MANIFEST_SCHEMA: &str = "fitgrid.catalog-manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub notes: Option<ManifestNotes>,
    #[serde(default)]
    pub catalogs: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNotes {
    pub summary: Option<String>,
}

/// What a catalog file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogRole {
    Targets,
    Candidates,
}

impl CatalogRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Targets => "targets",
            Self::Candidates => "candidates",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub role: CatalogRole,
    pub path: String,
    pub sha256: String,
    #[serde(default)]
    pub description: Option<String>,
}
