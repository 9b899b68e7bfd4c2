use std::fs;
use std::path::Path;

use fit_model::CandidateKind;
use fit_standards::hash::sha256_hex;
use fit_standards::{CatalogError, CatalogRegistry, CatalogRole, standards_root};

const TARGETS_CSV: &[u8] = b"\"Name\",\"Value\",\"Unit\",\"Group\"\n\"He4\",\"7.074\",\"MeV\",\"nuclear\"\n";
const CANDIDATES_CSV: &[u8] = b"\"Name\",\"Value\",\"Kind\"\n\"LZ0\",\"0.8934691018292812\",\"seed\"\n";

fn write(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn write_manifest(dir: &Path, targets_sha: &str, candidates_sha: &str) {
    let manifest = format!(
        r#"[manifest]
schema = "fitgrid.catalog-manifest"
schema_version = 1

[[catalogs]]
id = "nuclear"
role = "targets"
path = "catalogs/nuclear.csv"
sha256 = "{targets_sha}"

[[catalogs]]
id = "levels"
role = "candidates"
path = "./catalogs/levels.csv"
sha256 = "{candidates_sha}"
"#
    );
    write(&dir.join("manifest.toml"), manifest.as_bytes());
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("catalogs/nuclear.csv"), TARGETS_CSV);
    write(&dir.path().join("catalogs/levels.csv"), CANDIDATES_CSV);
    write_manifest(
        dir.path(),
        &sha256_hex(TARGETS_CSV),
        &sha256_hex(CANDIDATES_CSV),
    );
    dir
}

#[test]
fn verify_and_load_counts_rows() {
    let dir = fixture();
    let (registry, summary) = CatalogRegistry::verify_and_load(dir.path()).unwrap();
    assert_eq!(summary.catalog_count, 2);
    assert_eq!(summary.target_count, 1);
    assert_eq!(summary.candidate_count, 1);
    assert_eq!(registry.entry("levels").map(|e| e.role), Some(CatalogRole::Candidates));

    let targets = registry.load_targets("nuclear").unwrap();
    assert_eq!(targets.get("He4").map(|t| t.value), Some(7.074));
    let candidates = registry.load_candidates("levels").unwrap();
    assert_eq!(candidates.get("LZ0").map(|c| c.kind), Some(CandidateKind::Seed));
}

#[test]
fn tampered_file_fails_verification() {
    let dir = fixture();
    write(
        &dir.path().join("catalogs/nuclear.csv"),
        b"\"Name\",\"Value\"\n\"He4\",\"7.5\"\n",
    );
    let registry = CatalogRegistry::open(dir.path()).unwrap();
    assert!(matches!(
        registry.load_targets("nuclear"),
        Err(CatalogError::Sha256Mismatch { .. })
    ));
    assert!(registry.verify().is_err());
}

#[test]
fn unlisted_file_is_rejected() {
    let dir = fixture();
    write(&dir.path().join("catalogs/extra.csv"), b"Name,Value\n");
    assert!(matches!(
        CatalogRegistry::open(dir.path()),
        Err(CatalogError::UnexpectedFile { .. })
    ));
}

#[test]
fn role_and_id_are_checked() {
    let dir = fixture();
    let registry = CatalogRegistry::open(dir.path()).unwrap();
    assert!(matches!(
        registry.load_targets("levels"),
        Err(CatalogError::WrongRole { .. })
    ));
    assert!(matches!(
        registry.load_candidates("missing"),
        Err(CatalogError::UnknownCatalog { .. })
    ));
}

#[test]
fn malformed_sha_is_rejected() {
    let dir = fixture();
    write_manifest(dir.path(), "not-a-sha", &sha256_hex(CANDIDATES_CSV));
    assert!(matches!(
        CatalogRegistry::open(dir.path()),
        Err(CatalogError::InvalidSha256 { .. })
    ));
}

#[test]
fn bundled_standards_verify() {
    let (registry, summary) = CatalogRegistry::verify_and_load(&standards_root()).unwrap();
    assert_eq!(summary.catalog_count, registry.entries().len());
    let codata = registry.load_targets("codata").unwrap();
    assert_eq!(codata.len(), 34);
    assert_eq!(
        codata.get("fine_structure_constant").map(|t| t.value),
        Some(0.007_297_352_569_3)
    );
    let nuclear = registry.load_targets("nuclear_binding").unwrap();
    assert_eq!(nuclear.get("Fe56").and_then(|t| t.unit.clone()).as_deref(), Some("MeV/nucleon"));
    let levels = registry.load_candidates("lz_levels").unwrap();
    assert_eq!(levels.len(), 46);
}
