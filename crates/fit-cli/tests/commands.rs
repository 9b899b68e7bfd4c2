//! Integration tests for the command layer.

use std::fs;
use std::path::{Path, PathBuf};

use fit_cli::cli::{
    CurvedArgs, GridArgs, LevelsArgs, MatchArgs, OutputFormatArg, PresetArg, SearchArgs,
};
use fit_cli::commands::{
    RunContext, run_catalogs, run_curved, run_grid, run_levels, run_match, run_verify,
};
use fit_cli::summary::{NO_MATCH, match_table, status_line};
use fit_cli::types::GridRun;
use fit_core::Regime;
use fit_model::{CandidateKind, SearchOptions};
use tempfile::TempDir;

fn bundled_standards() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

fn context(standards_dir: &Path) -> RunContext {
    RunContext {
        options: SearchOptions::default(),
        standards_dir: standards_dir.to_path_buf(),
    }
}

fn write_tables(dir: &TempDir) -> (String, String) {
    let targets = dir.path().join("targets.csv");
    fs::write(&targets, "Name,Value,Unit\nfour,4.0,m\nnine,9.0,\n").unwrap();
    let candidates = dir.path().join("candidates.csv");
    fs::write(&candidates, "Name,Value\na,2.0\nb,3.0\n").unwrap();
    (
        targets.to_string_lossy().into_owned(),
        candidates.to_string_lossy().into_owned(),
    )
}

fn literal_search(candidates: &str) -> SearchArgs {
    SearchArgs {
        preset: Some(PresetArg::Scaling),
        candidates: Some(candidates.to_string()),
        ..SearchArgs::default()
    }
}

fn match_args(targets: &str, search: SearchArgs) -> MatchArgs {
    MatchArgs {
        targets: targets.to_string(),
        group: None,
        search,
        top: None,
        format: OutputFormatArg::Table,
    }
}

#[test]
fn match_with_literal_candidates_finds_exact_squares() {
    let dir = TempDir::new().unwrap();
    let (targets, candidates) = write_tables(&dir);
    let ctx = context(dir.path());

    let run = run_match(&match_args(&targets, literal_search(&candidates)), &ctx).unwrap();

    assert_eq!(run.candidate_count, 2);
    assert_eq!(run.transform_count, 15);
    let four = run.outcomes.get("four").unwrap().result.as_ref().unwrap();
    assert_eq!((four.candidate.as_str(), four.transform.as_str()), ("a", "x²"));
    assert_eq!(four.error, 0.0);
    assert_eq!(four.candidate_kind, CandidateKind::Literal);
    let nine = run.outcomes.get("nine").unwrap().result.as_ref().unwrap();
    assert_eq!((nine.candidate.as_str(), nine.transform.as_str()), ("b", "x²"));
    assert_eq!(run.outcomes.get("four").unwrap().unit.as_deref(), Some("m"));

    insta::assert_snapshot!(
        status_line(&run.outcomes),
        @"matched 2 of 2: EXCELLENT 2, VERY GOOD 0, GOOD 0, CLOSE 0, no match 0"
    );
}

#[test]
fn top_rankings_start_with_the_best_pair() {
    let dir = TempDir::new().unwrap();
    let (targets, candidates) = write_tables(&dir);
    let mut args = match_args(&targets, literal_search(&candidates));
    args.top = Some(3);

    let run = run_match(&args, &context(dir.path())).unwrap();

    assert_eq!(run.rankings.len(), 2);
    for ranking in &run.rankings {
        assert_eq!(ranking.pairs.len(), 3);
        assert_eq!(ranking.pairs[0].rank, 1);
        let best = run.outcomes.get(&ranking.target).unwrap().result.as_ref().unwrap();
        assert_eq!(&ranking.pairs[0].result, best);
    }
}

#[test]
fn implausible_grid_reports_no_match_in_table_and_json() {
    let dir = TempDir::new().unwrap();
    let (targets, candidates) = write_tables(&dir);
    let mut search = literal_search(&candidates);
    search.min = Some(1e6);
    search.max = Some(1e7);

    let run = run_match(&match_args(&targets, search), &context(dir.path())).unwrap();

    assert_eq!(run.outcomes.matched_count(), 0);
    insta::assert_snapshot!(
        status_line(&run.outcomes),
        @"matched 0 of 2: EXCELLENT 0, VERY GOOD 0, GOOD 0, CLOSE 0, no match 2"
    );
    let mut table = match_table(&run.outcomes);
    table.force_no_tty();
    let rendered = table.to_string();
    assert!(rendered.contains(NO_MATCH));
    assert!(rendered.contains("TOTAL"));

    let json = serde_json::to_value(&run).unwrap();
    assert!(json["outcomes"][0]["result"].is_null());
    assert_eq!(json["outcomes"][1]["target"], "nine");
    assert!(json.get("rankings").is_none());
}

#[test]
fn match_reads_bundled_catalog_by_id() {
    let standards = bundled_standards();
    let run = run_match(
        &match_args("cosmology", SearchArgs::default()),
        &context(&standards),
    )
    .unwrap();

    assert_eq!(run.outcomes.len(), 6);
    // Constant golden fractions always evaluate, so nothing goes unmatched.
    assert_eq!(run.outcomes.matched_count(), 6);
    assert_eq!(run.candidate_count, 228);
}

#[test]
fn unknown_catalog_and_empty_group_are_errors() {
    let standards = bundled_standards();
    let ctx = context(&standards);

    let err = run_match(&match_args("no_such_catalog", SearchArgs::default()), &ctx).unwrap_err();
    assert!(format!("{err:#}").contains("no_such_catalog"));

    let mut args = match_args("cosmology", SearchArgs::default());
    args.group = Some("leptons".to_string());
    let err = run_match(&args, &ctx).unwrap_err();
    assert!(err.to_string().contains("leptons"));
}

#[test]
fn grid_lists_every_pair_or_tolerance_hits() {
    let dir = TempDir::new().unwrap();
    let (targets, candidates) = write_tables(&dir);
    let ctx = context(dir.path());

    let mut args = GridArgs {
        search: literal_search(&candidates),
        tolerance: None,
        targets: None,
        format: OutputFormatArg::Table,
    };
    match run_grid(&args, &ctx).unwrap() {
        GridRun::Entries { entries } => assert_eq!(entries.len(), 30),
        GridRun::WithinTolerance { .. } => panic!("expected a full listing"),
    }

    args.tolerance = Some(0.5);
    args.targets = Some(targets);
    match run_grid(&args, &ctx).unwrap() {
        GridRun::WithinTolerance { hits, .. } => {
            assert!(
                hits.iter()
                    .any(|h| h.candidate == "a" && h.transform == "x²" && h.target == "four")
            );
            assert!(hits.iter().all(|h| h.error < 0.5));
        }
        GridRun::Entries { .. } => panic!("expected tolerance hits"),
    }

    args.tolerance = Some(-1.0);
    assert!(run_grid(&args, &ctx).is_err());
}

#[test]
fn curved_regimes_follow_the_boundary() {
    let small = run_curved(&CurvedArgs {
        a: 0.1,
        b: 0.2,
        curvature: None,
        format: OutputFormatArg::Json,
    })
    .unwrap();
    assert_eq!(small.sum.regime(), Regime::Classical);
    assert!(small.sum_display.starts_with("CurvedNumber("));

    let large = run_curved(&CurvedArgs {
        a: 1.0,
        b: 1.0,
        curvature: None,
        format: OutputFormatArg::Json,
    })
    .unwrap();
    assert_eq!(large.sum.regime(), Regime::Quantum);

    let invalid = run_curved(&CurvedArgs {
        a: 1.0,
        b: 1.0,
        curvature: Some(0.0),
        format: OutputFormatArg::Table,
    });
    assert!(invalid.is_err());
}

#[test]
fn levels_honour_count_and_depth() {
    let ctx = context(&bundled_standards());
    let run = run_levels(
        &LevelsArgs {
            rule: None,
            count: Some(3),
            depth: Some(1),
            format: OutputFormatArg::Table,
        },
        &ctx,
    )
    .unwrap();

    assert_eq!(run.depth, 1);
    assert_eq!(run.candidates.len(), 3 + 13);
    assert_eq!(run.candidates.get("L2").unwrap().kind, CandidateKind::Seed);
    assert_eq!(
        run.candidates.get("L-1_mag").unwrap().kind,
        CandidateKind::Magnitude
    );
}

#[test]
fn bundled_catalogs_list_and_verify() {
    let standards = bundled_standards();
    let entries = run_catalogs(&standards).unwrap();
    assert_eq!(entries.len(), 10);
    assert!(entries.iter().any(|e| e.id == "codata"));

    let summary = run_verify(&standards).unwrap();
    assert_eq!(summary.catalog_count, 10);
    assert_eq!(summary.candidate_count, 46);
}

#[test]
fn verify_fails_on_a_missing_manifest() {
    let dir = TempDir::new().unwrap();
    let err = run_verify(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("verify standards"));
}
