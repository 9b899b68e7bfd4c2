//! CSV readers for target and candidate tables.
//!
//! Targets: `"Name","Value","Unit","Group"` (unit and group optional).
//! Candidates: `"Name","Value","Kind"` (kind optional, defaults to literal).

use std::path::Path;

use fit_model::{Candidate, CandidateKind, CandidateSet, Target, TargetSet};

use crate::error::CatalogError;

struct Table {
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
}

impl Table {
    fn read(bytes: &[u8], path: &Path) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);
        let headers = reader
            .headers()
            .map_err(|e| CatalogError::csv(path, e.to_string()))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::csv(path, e.to_string()))?;
        Ok(Self { headers, rows })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &str, path: &Path) -> Result<usize, CatalogError> {
        self.column(name)
            .ok_or_else(|| CatalogError::csv(path, format!("missing column {name}")))
    }
}

fn cell(row: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| row.get(i))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_value(raw: &str, line: usize, path: &Path) -> Result<f64, CatalogError> {
    raw.parse::<f64>()
        .map_err(|e| CatalogError::csv(path, format!("row {line}: invalid value '{raw}': {e}")))
}

pub fn parse_targets(bytes: &[u8], path: &Path) -> Result<TargetSet, CatalogError> {
    let table = Table::read(bytes, path)?;
    let name_col = table.require("Name", path)?;
    let value_col = table.require("Value", path)?;
    let unit_col = table.column("Unit");
    let group_col = table.column("Group");

    let mut targets = TargetSet::new();
    for (i, row) in table.rows.iter().enumerate() {
        let line = i + 2;
        let name = cell(row, Some(name_col))
            .ok_or_else(|| CatalogError::csv(path, format!("row {line}: missing Name")))?;
        let value = parse_value(row.get(value_col).unwrap_or(""), line, path)?;
        let mut target = Target::new(name, value);
        target.unit = cell(row, unit_col);
        target.group = cell(row, group_col);
        targets.push(target).map_err(|source| CatalogError::Row {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(targets)
}

pub fn parse_candidates(bytes: &[u8], path: &Path) -> Result<CandidateSet, CatalogError> {
    let table = Table::read(bytes, path)?;
    let name_col = table.require("Name", path)?;
    let value_col = table.require("Value", path)?;
    let kind_col = table.column("Kind");

    let mut candidates = CandidateSet::new();
    for (i, row) in table.rows.iter().enumerate() {
        let line = i + 2;
        let name = cell(row, Some(name_col))
            .ok_or_else(|| CatalogError::csv(path, format!("row {line}: missing Name")))?;
        let value = parse_value(row.get(value_col).unwrap_or(""), line, path)?;
        let row_error = |source| CatalogError::Row {
            path: path.to_path_buf(),
            source,
        };
        let kind = cell(row, kind_col)
            .map(|k| k.parse::<CandidateKind>())
            .transpose()
            .map_err(row_error)?
            .unwrap_or(CandidateKind::Literal);
        candidates
            .push(Candidate::new(name, value, kind))
            .map_err(row_error)?;
    }
    Ok(candidates)
}

pub fn parse_targets_csv(path: &Path) -> Result<TargetSet, CatalogError> {
    let bytes = std::fs::read(path).map_err(|e| CatalogError::io(path, e))?;
    parse_targets(&bytes, path)
}

pub fn parse_candidates_csv(path: &Path) -> Result<CandidateSet, CatalogError> {
    let bytes = std::fs::read(path).map_err(|e| CatalogError::io(path, e))?;
    parse_candidates(&bytes, path)
}
