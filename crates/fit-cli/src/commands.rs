use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use fit_core::{
    CurvedNumber, GeometricCalculator, TransformSet, build_candidates, classical_limit,
};
use fit_match::MatchEngine;
use fit_model::constants::{CURVATURE, QUANTUM_BOUNDARY};
use fit_model::{CandidateSet, SearchOptions, TargetSet};
use fit_standards::{
    CatalogEntry, CatalogRegistry, VerifySummary, parse_candidates_csv, parse_targets_csv,
};
use tracing::{debug, info, info_span};

use crate::cli::{CurvedArgs, GridArgs, LevelsArgs, MatchArgs, SearchArgs};
use crate::config::{apply_levels_args, apply_search_args};
use crate::types::{CurvedRun, GridRun, LevelsRun, MatchRun, TargetRanking};

/// Options and locations shared by every command.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub options: SearchOptions,
    pub standards_dir: PathBuf,
}

pub fn run_match(args: &MatchArgs, ctx: &RunContext) -> Result<MatchRun> {
    let span = info_span!("match", targets = %args.targets);
    let _guard = span.enter();
    let start = Instant::now();

    let mut options = ctx.options.clone();
    apply_search_args(&mut options, &args.search)?;
    let mut targets = resolve_targets(&args.targets, &ctx.standards_dir)?;
    if let Some(group) = &args.group {
        targets = targets.filter_group(group);
        if targets.is_empty() {
            bail!("no targets in group '{group}' of {}", args.targets);
        }
    }
    let engine = build_engine(&options, &args.search, &ctx.standards_dir)?;
    let outcomes = engine.match_all(&targets);

    let rankings = match args.top {
        Some(limit) if limit > 0 => targets
            .iter()
            .map(|target| TargetRanking {
                target: target.name.clone(),
                target_value: target.value,
                pairs: engine.rank(target.value, limit),
            })
            .collect(),
        _ => Vec::new(),
    };

    info!(
        targets = outcomes.len(),
        matched = outcomes.matched_count(),
        duration_ms = start.elapsed().as_millis(),
        "match complete"
    );
    Ok(MatchRun {
        preset: options.preset,
        candidate_count: engine.candidates().len(),
        transform_count: engine.transforms().len(),
        thresholds: *engine.thresholds(),
        outcomes,
        rankings,
    })
}

pub fn run_grid(args: &GridArgs, ctx: &RunContext) -> Result<GridRun> {
    let span = info_span!("grid");
    let _guard = span.enter();
    let start = Instant::now();

    let mut options = ctx.options.clone();
    apply_search_args(&mut options, &args.search)?;
    let engine = build_engine(&options, &args.search, &ctx.standards_dir)?;

    let run = match args.tolerance {
        Some(tolerance) => {
            if !tolerance.is_finite() || tolerance < 0.0 {
                bail!("tolerance must be a non-negative number, got {tolerance}");
            }
            let source = args
                .targets
                .as_deref()
                .ok_or_else(|| anyhow!("--tolerance requires --targets"))?;
            let targets = resolve_targets(source, &ctx.standards_dir)?;
            GridRun::WithinTolerance {
                tolerance,
                hits: engine.within_tolerance(&targets, tolerance),
            }
        }
        None => GridRun::Entries {
            entries: engine.grid(),
        },
    };
    info!(duration_ms = start.elapsed().as_millis(), "grid complete");
    Ok(run)
}

pub fn run_curved(args: &CurvedArgs) -> Result<CurvedRun> {
    let curvature = args.curvature.unwrap_or(CURVATURE);
    if !curvature.is_finite() || curvature <= 0.0 {
        bail!("curvature must be a positive number, got {curvature}");
    }
    if !args.a.is_finite() || !args.b.is_finite() {
        bail!("operands must be finite");
    }
    let calculator = GeometricCalculator::new(curvature, QUANTUM_BOUNDARY);
    let sum = calculator.add(args.a, args.b);
    let product = calculator.multiply(args.a, args.b);
    let tracked = CurvedNumber::with_curvature(args.a, curvature)
        + CurvedNumber::with_curvature(args.b, curvature);
    debug!(
        regime = sum.regime().label(),
        energy = sum.energy(),
        "curved sum"
    );
    Ok(CurvedRun {
        a: args.a,
        b: args.b,
        curvature,
        boundary: calculator.boundary(),
        classical_limit: classical_limit(curvature),
        sum,
        product,
        sum_display: tracked.to_string(),
    })
}

pub fn run_levels(args: &LevelsArgs, ctx: &RunContext) -> Result<LevelsRun> {
    let mut options = ctx.options.clone();
    apply_levels_args(&mut options, args)?;
    let candidates = build_candidates(&options).context("generate levels")?;
    Ok(LevelsRun {
        seed: options.seed,
        rule: options.rule,
        depth: options.ascent.depth,
        candidates,
    })
}

pub fn run_catalogs(standards_dir: &Path) -> Result<Vec<CatalogEntry>> {
    let registry = open_registry(standards_dir)?;
    Ok(registry.entries().to_vec())
}

pub fn run_verify(standards_dir: &Path) -> Result<VerifySummary> {
    let span = info_span!("verify", dir = %standards_dir.display());
    let _guard = span.enter();
    let start = Instant::now();
    let (_, summary) = CatalogRegistry::verify_and_load(standards_dir)
        .with_context(|| format!("verify standards in {}", standards_dir.display()))?;
    info!(
        catalogs = summary.catalog_count,
        duration_ms = start.elapsed().as_millis(),
        "standards verified"
    );
    Ok(summary)
}

/// Targets from a CSV file when `source` names one, else from the catalog
/// with that id.
pub fn resolve_targets(source: &str, standards_dir: &Path) -> Result<TargetSet> {
    let path = Path::new(source);
    if path.is_file() {
        return parse_targets_csv(path)
            .with_context(|| format!("load targets from {}", path.display()));
    }
    open_registry(standards_dir)?
        .load_targets(source)
        .with_context(|| format!("load target catalog '{source}'"))
}

/// Candidates from a CSV file when `source` names one, else from the catalog
/// with that id.
pub fn resolve_candidates(source: &str, standards_dir: &Path) -> Result<CandidateSet> {
    let path = Path::new(source);
    if path.is_file() {
        return parse_candidates_csv(path)
            .with_context(|| format!("load candidates from {}", path.display()));
    }
    open_registry(standards_dir)?
        .load_candidates(source)
        .with_context(|| format!("load candidate catalog '{source}'"))
}

fn build_engine(
    options: &SearchOptions,
    search: &SearchArgs,
    standards_dir: &Path,
) -> Result<MatchEngine> {
    let engine = match &search.candidates {
        Some(source) => {
            let candidates = resolve_candidates(source, standards_dir)?;
            MatchEngine::new(candidates, TransformSet::from_preset(options.preset))
                .with_filter(options.plausibility)
                .with_thresholds(options.thresholds.thresholds())
        }
        None => MatchEngine::from_options(options).context("build candidate table")?,
    };
    debug!(
        candidates = engine.candidates().len(),
        transforms = engine.transforms().len(),
        "search grid ready"
    );
    Ok(engine)
}

fn open_registry(standards_dir: &Path) -> Result<CatalogRegistry> {
    CatalogRegistry::open(standards_dir)
        .with_context(|| format!("open standards in {}", standards_dir.display()))
}
