//! Table rendering for command results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fit_core::{CurvedOutcome, Regime, render_formula};
use fit_match::{MatchOutcome, MatchReport};
use fit_model::{Candidate, CandidateKind, MatchStatus, Scalar};
use fit_standards::{CatalogEntry, VerifySummary};

use crate::types::{CurvedRun, GridRun, LevelsRun, MatchRun};

pub const NO_MATCH: &str = "no plausible match";

const STATUSES: [MatchStatus; 4] = [
    MatchStatus::Excellent,
    MatchStatus::VeryGood,
    MatchStatus::Good,
    MatchStatus::Close,
];

pub fn print_match(run: &MatchRun) {
    println!(
        "Grid: {} candidates x {} transformations ({:?} preset)",
        run.candidate_count, run.transform_count, run.preset
    );
    println!("{}", match_table(&run.outcomes));
    println!("{}", status_line(&run.outcomes));
    for ranking in &run.rankings {
        println!();
        println!(
            "Top {} for {} = {}:",
            ranking.pairs.len(),
            ranking.target,
            format_value(ranking.target_value)
        );
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("#"),
            header_cell("Formula"),
            header_cell("Derived"),
            header_cell("Error"),
            header_cell("Status"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 0, CellAlignment::Right);
        align_column(&mut table, 2, CellAlignment::Right);
        align_column(&mut table, 3, CellAlignment::Right);
        for pair in &ranking.pairs {
            let result = &pair.result;
            table.add_row(vec![
                Cell::new(pair.rank),
                Cell::new(render_formula(&result.transform, &result.candidate)),
                Cell::new(format_value(result.derived)),
                Cell::new(format_error(result.error)),
                status_cell(result.status),
            ]);
        }
        println!("{table}");
    }
}

/// One row per target plus a TOTAL row. Unmatched targets say so in place
/// of a formula.
pub fn match_table(report: &MatchReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Target"),
        header_cell("Value"),
        header_cell("Formula"),
        header_cell("Level"),
        header_cell("Derived"),
        header_cell("Error"),
        header_cell("Rel. error"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    for index in [1, 4, 5, 6] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);

    for outcome in report {
        table.add_row(outcome_row(outcome));
    }
    let mean = report.mean_error().map_or_else(|| "-".to_string(), format_error);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} targets", report.len())).add_attribute(Attribute::Bold),
        Cell::new(format!("{} matched", report.matched_count())).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("mean"),
        Cell::new(mean).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table
}

fn outcome_row(outcome: &MatchOutcome) -> Vec<Cell> {
    let value = match &outcome.unit {
        Some(unit) => format!("{} {unit}", format_value(outcome.target_value)),
        None => format_value(outcome.target_value),
    };
    let Some(result) = &outcome.result else {
        return vec![
            Cell::new(&outcome.target),
            Cell::new(value),
            Cell::new(NO_MATCH).fg(Color::Yellow),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ];
    };
    vec![
        Cell::new(&outcome.target)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(value),
        Cell::new(render_formula(&result.transform, &result.candidate)),
        Cell::new(result.level_type().label()),
        Cell::new(format_value(result.derived)),
        Cell::new(format_error(result.error)),
        result
            .relative_error
            .map_or_else(|| dim_cell("-"), |r| Cell::new(format_percent(r))),
        status_cell(result.status),
    ]
}

/// `matched M of N: EXCELLENT a, VERY GOOD b, GOOD c, CLOSE d, no match e`
pub fn status_line(report: &MatchReport) -> String {
    let counts = report.count_by_status();
    let mut parts: Vec<String> = STATUSES
        .iter()
        .map(|status| {
            format!(
                "{} {}",
                status.label(),
                counts.get(status).copied().unwrap_or(0)
            )
        })
        .collect();
    parts.push(format!("no match {}", report.unmatched().len()));
    format!(
        "matched {} of {}: {}",
        report.matched_count(),
        report.len(),
        parts.join(", ")
    )
}

pub fn print_grid(run: &GridRun) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    match run {
        GridRun::Entries { entries } => {
            table.set_header(vec![
                header_cell("Candidate"),
                header_cell("Kind"),
                header_cell("Formula"),
                header_cell("Value"),
            ]);
            align_column(&mut table, 3, CellAlignment::Right);
            for entry in entries {
                table.add_row(vec![
                    Cell::new(&entry.candidate),
                    Cell::new(kind_label(entry.kind)),
                    Cell::new(render_formula(&entry.transform, &entry.candidate)),
                    Cell::new(format_value(entry.value)),
                ]);
            }
            println!("{table}");
            println!("{} pairs", entries.len());
        }
        GridRun::WithinTolerance { tolerance, hits } => {
            table.set_header(vec![
                header_cell("Formula"),
                header_cell("Value"),
                header_cell("Target"),
                header_cell("Target value"),
                header_cell("Error"),
            ]);
            for index in [1, 3, 4] {
                align_column(&mut table, index, CellAlignment::Right);
            }
            for hit in hits {
                table.add_row(vec![
                    Cell::new(render_formula(&hit.transform, &hit.candidate)),
                    Cell::new(format_value(hit.value)),
                    Cell::new(&hit.target).fg(Color::Blue),
                    Cell::new(format_value(hit.target_value)),
                    Cell::new(format_error(hit.error)),
                ]);
            }
            println!("{table}");
            println!("{} pairs within {tolerance} of a target", hits.len());
        }
    }
}

pub fn curved_table(run: &CurvedRun) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Quantity"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut row = |label: &str, value: String| {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    };
    row("curvature", format_value(run.curvature));
    row("classical limit", format_value(run.classical_limit));
    row("a ⊕ b", run.sum_display.clone());
    match run.sum {
        CurvedOutcome::Classical { value, energy } => {
            row("sum regime", Regime::Classical.label().to_string());
            row("sum", format_value(value));
            row("sum energy", format_value(energy));
        }
        CurvedOutcome::Quantum {
            real,
            imaginary,
            magnitude,
            phase,
            energy,
        } => {
            row("sum regime", Regime::Quantum.label().to_string());
            row("sum", format_complex(real, imaginary));
            row("sum magnitude", format_value(magnitude));
            row("sum phase", format_value(phase));
            row("sum energy", format_value(energy));
        }
    }
    let product = &run.product;
    row("product regime", product.regime.label().to_string());
    row("product", format_complex(product.value.re, product.value.im));
    row("product magnitude", format_value(product.value.norm()));
    row("product energy", format_value(product.energy));
    row(
        "attractor level",
        product
            .level
            .map_or_else(|| "-".to_string(), |level| level.to_string()),
    );
    table
}

pub fn levels_table(run: &LevelsRun) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Kind"),
        header_cell("Level"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for candidate in &run.candidates {
        table.add_row(candidate_row(candidate));
    }
    table
}

fn candidate_row(candidate: &Candidate) -> Vec<Cell> {
    let value = match candidate.value {
        Scalar::Real(value) => format_value(value),
        Scalar::Complex(value) => format_complex(value.re, value.im),
    };
    vec![
        Cell::new(&candidate.name),
        Cell::new(kind_label(candidate.kind)),
        dim_cell(candidate.kind.level_type().label()),
        Cell::new(value),
    ]
}

pub fn catalogs_table(entries: &[CatalogEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Catalog"),
        header_cell("Role"),
        header_cell("Path"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(entry.role.as_str()),
            dim_cell(&entry.path),
            Cell::new(entry.description.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

pub fn verify_table(summary: &VerifySummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Catalog"),
        header_cell("Role"),
        header_cell("Rows"),
        header_cell("sha256"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for catalog in &summary.catalogs {
        table.add_row(vec![
            Cell::new(&catalog.id),
            Cell::new(catalog.role.as_str()),
            Cell::new(catalog.rows),
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} targets, {} candidates",
            summary.target_count, summary.candidate_count
        )),
        Cell::new(summary.target_count + summary.candidate_count).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

pub fn kind_label(kind: CandidateKind) -> String {
    match kind {
        CandidateKind::Seed => "seed".to_string(),
        CandidateKind::Literal => "literal".to_string(),
        CandidateKind::Complex => "complex".to_string(),
        other => other.suffix().unwrap_or_default(),
    }
}

/// Fixed-point for ordinary magnitudes, scientific otherwise.
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1e-4..1e7).contains(&magnitude) {
        format!("{value:.10}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        format!("{value:.6e}")
    }
}

pub fn format_error(error: f64) -> String {
    format!("{error:.3e}")
}

fn format_percent(ratio: f64) -> String {
    format!("{:.4}%", ratio * 100.0)
}

fn format_complex(re: f64, im: f64) -> String {
    if im < 0.0 {
        format!("{} - {}i", format_value(re), format_value(-im))
    } else {
        format!("{} + {}i", format_value(re), format_value(im))
    }
}

fn status_cell(status: MatchStatus) -> Cell {
    let color = match status {
        MatchStatus::Excellent => Color::Green,
        MatchStatus::VeryGood => Color::Cyan,
        MatchStatus::Good => Color::Yellow,
        MatchStatus::Close => Color::DarkGrey,
    };
    Cell::new(status.label()).fg(color)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(165);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
