//! Search options from a TOML file, overridden by command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use fit_model::{RangeFilter, SearchOptions};

use crate::cli::{LevelsArgs, SearchArgs};

/// Reads `path` as a (possibly partial) [`SearchOptions`] document, or
/// returns the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<SearchOptions> {
    let Some(path) = path else {
        return Ok(SearchOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let options = parse_options(&text).with_context(|| format!("parse config {}", path.display()))?;
    Ok(options)
}

pub fn parse_options(text: &str) -> Result<SearchOptions> {
    let options: SearchOptions = toml::from_str(text)?;
    options.validate()?;
    Ok(options)
}

/// `--min`/`--max` replace the configured range with `(min, max]`; a single
/// bound leaves the other side open.
pub fn apply_search_args(options: &mut SearchOptions, args: &SearchArgs) -> Result<()> {
    if let Some(preset) = args.preset {
        options.preset = preset.into();
    }
    if let Some(thresholds) = args.thresholds {
        options.thresholds = thresholds.into();
    }
    if args.min.is_some() || args.max.is_some() {
        options.plausibility = Some(RangeFilter {
            min: args.min,
            min_inclusive: false,
            max: args.max,
            max_inclusive: true,
        });
    }
    options.validate().context("invalid search options")?;
    Ok(())
}

pub fn apply_levels_args(options: &mut SearchOptions, args: &LevelsArgs) -> Result<()> {
    if let Some(rule) = args.rule {
        options.rule = rule.into();
    }
    if let Some(count) = args.count {
        options.level_count = count;
    }
    if let Some(depth) = args.depth {
        options.ascent.depth = depth;
    }
    options.validate().context("invalid search options")?;
    Ok(())
}
