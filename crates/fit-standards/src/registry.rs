use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use fit_model::{CandidateSet, TargetSet};
use serde::Serialize;
use tracing::debug;

use crate::error::CatalogError;
use crate::hash::sha256_hex;
use crate::manifest::{
    CatalogEntry, CatalogRole, MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest,
};
use crate::tables::{parse_candidates, parse_targets};

const MANIFEST_FILE: &str = "manifest.toml";

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub id: String,
    pub role: CatalogRole,
    pub path: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifySummary {
    pub standards_dir: PathBuf,
    pub catalog_count: usize,
    pub target_count: usize,
    pub candidate_count: usize,
    pub catalogs: Vec<CatalogSummary>,
}

/// A standards directory whose manifest has been read and validated.
///
/// File contents are checked against their pinned sha256 every time a
/// catalog is loaded.
#[derive(Debug, Clone)]
pub struct CatalogRegistry {
    root: PathBuf,
    manifest: Manifest,
}

impl CatalogRegistry {
    pub fn open(standards_dir: &Path) -> Result<Self, CatalogError> {
        let manifest = load_manifest(&standards_dir.join(MANIFEST_FILE))?;
        validate_manifest(&manifest, standards_dir)?;
        debug!(
            dir = %standards_dir.display(),
            catalogs = manifest.catalogs.len(),
            "opened catalog manifest"
        );
        Ok(Self {
            root: standards_dir.to_path_buf(),
            manifest,
        })
    }

    /// Opens the registry and checks every catalog's hash and contents.
    pub fn verify_and_load(standards_dir: &Path) -> Result<(Self, VerifySummary), CatalogError> {
        let registry = Self::open(standards_dir)?;
        let summary = registry.verify()?;
        Ok((registry, summary))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.manifest.catalogs
    }

    pub fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.manifest.catalogs.iter().find(|c| c.id == id)
    }

    pub fn verify(&self) -> Result<VerifySummary, CatalogError> {
        let mut catalogs = Vec::with_capacity(self.manifest.catalogs.len());
        let (mut target_count, mut candidate_count) = (0, 0);
        for entry in &self.manifest.catalogs {
            let (bytes, path) = self.read_verified(entry)?;
            let rows = match entry.role {
                CatalogRole::Targets => {
                    let rows = parse_targets(&bytes, &path)?.len();
                    target_count += rows;
                    rows
                }
                CatalogRole::Candidates => {
                    let rows = parse_candidates(&bytes, &path)?.len();
                    candidate_count += rows;
                    rows
                }
            };
            catalogs.push(CatalogSummary {
                id: entry.id.clone(),
                role: entry.role,
                path: entry.path.clone(),
                rows,
            });
        }
        Ok(VerifySummary {
            standards_dir: self.root.clone(),
            catalog_count: catalogs.len(),
            target_count,
            candidate_count,
            catalogs,
        })
    }

    pub fn load_targets(&self, id: &str) -> Result<TargetSet, CatalogError> {
        let entry = self.entry_with_role(id, CatalogRole::Targets)?;
        let (bytes, path) = self.read_verified(entry)?;
        parse_targets(&bytes, &path)
    }

    pub fn load_candidates(&self, id: &str) -> Result<CandidateSet, CatalogError> {
        let entry = self.entry_with_role(id, CatalogRole::Candidates)?;
        let (bytes, path) = self.read_verified(entry)?;
        parse_candidates(&bytes, &path)
    }

    fn entry_with_role(&self, id: &str, role: CatalogRole) -> Result<&CatalogEntry, CatalogError> {
        let entry = self.entry(id).ok_or_else(|| CatalogError::UnknownCatalog {
            id: id.to_string(),
        })?;
        if entry.role != role {
            return Err(CatalogError::WrongRole {
                id: id.to_string(),
                expected: role.as_str(),
                actual: entry.role.as_str(),
            });
        }
        Ok(entry)
    }

    fn read_verified(&self, entry: &CatalogEntry) -> Result<(Vec<u8>, PathBuf), CatalogError> {
        let full_path = self.root.join(&entry.path);
        let bytes = std::fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::MissingFile {
                    path: full_path.clone(),
                }
            } else {
                CatalogError::io(full_path.clone(), e)
            }
        })?;

        let actual = sha256_hex(&bytes);
        let expected = entry.sha256.to_ascii_lowercase();
        if actual != expected {
            return Err(CatalogError::Sha256Mismatch {
                path: full_path,
                expected,
                actual,
            });
        }
        Ok((bytes, full_path))
    }
}

fn load_manifest(path: &Path) -> Result<Manifest, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| CatalogError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest, standards_dir: &Path) -> Result<(), CatalogError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(CatalogError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(CatalogError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut ids: BTreeSet<&str> = BTreeSet::new();
    let mut manifest_paths: BTreeSet<PathBuf> = BTreeSet::new();
    for entry in &manifest.catalogs {
        if entry.id.trim().is_empty() {
            return Err(CatalogError::InvalidManifest {
                message: format!("empty catalog id for {}", entry.path),
            });
        }
        if !ids.insert(entry.id.as_str()) {
            return Err(CatalogError::DuplicateId {
                id: entry.id.clone(),
            });
        }
        validate_sha(&entry.sha256, &entry.path)?;
        manifest_paths.insert(normalize_path(&validate_path(&entry.path)?));
    }

    for path in list_files_under(standards_dir)? {
        if path == Path::new(MANIFEST_FILE) {
            continue;
        }
        if !manifest_paths.contains(&normalize_path(&path)) {
            return Err(CatalogError::UnexpectedFile {
                path: standards_dir.join(path),
            });
        }
    }
    Ok(())
}

fn validate_sha(sha: &str, path: &str) -> Result<(), CatalogError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CatalogError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "sha256 must be 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<PathBuf, CatalogError> {
    if path.contains('\\') {
        return Err(CatalogError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }
    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(CatalogError::InvalidPath {
            path: p,
            message: "manifest path must be relative".to_string(),
        });
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(CatalogError::InvalidPath {
            path: p,
            message: "manifest path must not traverse out of standards/".to_string(),
        });
    }
    Ok(p)
}

fn list_files_under(root: &Path) -> Result<BTreeSet<PathBuf>, CatalogError> {
    let mut stack = vec![root.to_path_buf()];
    let mut files = BTreeSet::new();
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| CatalogError::io(&dir, e))? {
            let path = entry.map_err(|e| CatalogError::io(&dir, e))?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                let rel = path
                    .strip_prefix(root)
                    .map_err(|e| CatalogError::InvalidPath {
                        path: path.clone(),
                        message: format!("failed to relativize path: {e}"),
                    })?
                    .to_path_buf();
                files.insert(rel);
            }
        }
    }
    Ok(files)
}

fn normalize_path(p: &Path) -> PathBuf {
    p.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
