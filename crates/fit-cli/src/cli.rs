//! CLI argument definitions for `fitgrid`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use fit_model::{GeneratingRule, ThresholdPreset, TransformPreset};

#[derive(Parser)]
#[command(
    name = "fitgrid",
    version,
    about = "Best-fit grid search of derived values against reference constants",
    long_about = "Search a grid of candidate values and named transformations for the \
                  pair that lands closest to each target.\n\n\
                  Candidates come from a generated sequence and its complex arcsine \
                  ascent, or from a literal catalog. Targets come from a bundled catalog \
                  or any CSV with Name and Value columns."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Search options file (TOML). Command-line flags override its values.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Standards directory (default: $FIT_STANDARDS_DIR, then the bundled one).
    #[arg(long = "standards-dir", value_name = "DIR", global = true)]
    pub standards_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Find the best (candidate, transformation) pair for every target.
    Match(MatchArgs),

    /// List every evaluated pair, or the pairs close to some target.
    Grid(GridArgs),

    /// Curved addition and multiplication of two numbers.
    Curved(CurvedArgs),

    /// Print the generated candidate table.
    Levels(LevelsArgs),

    /// List the bundled catalogs.
    Catalogs,

    /// Verify catalog hashes and contents.
    Verify,
}

/// Options shared by every command that runs a search.
#[derive(Args, Clone, Default)]
pub struct SearchArgs {
    /// Transformation table.
    #[arg(long = "preset", value_enum)]
    pub preset: Option<PresetArg>,

    /// Exclusive lower bound on transformed values.
    #[arg(long = "min", value_name = "X", allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Inclusive upper bound on transformed values.
    #[arg(long = "max", value_name = "Y", allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Status thresholds applied to match errors.
    #[arg(long = "thresholds", value_enum)]
    pub thresholds: Option<ThresholdArg>,

    /// Literal candidate table (catalog id or CSV path) instead of the
    /// generated one.
    #[arg(long = "candidates", value_name = "CATALOG|PATH")]
    pub candidates: Option<String>,
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Target table: a catalog id or a CSV path.
    #[arg(long = "targets", value_name = "CATALOG|PATH")]
    pub targets: String,

    /// Only match targets in this group.
    #[arg(long = "group", value_name = "NAME")]
    pub group: Option<String>,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Also list the N best pairs for every target.
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct GridArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Only list pairs within this absolute distance of a target.
    #[arg(long = "tolerance", value_name = "T", requires = "targets")]
    pub tolerance: Option<f64>,

    /// Target table used with --tolerance.
    #[arg(long = "targets", value_name = "CATALOG|PATH")]
    pub targets: Option<String>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct CurvedArgs {
    #[arg(value_name = "A", allow_negative_numbers = true)]
    pub a: f64,

    #[arg(value_name = "B", allow_negative_numbers = true)]
    pub b: f64,

    /// Curvature of the arithmetic (default: the built-in constant).
    #[arg(long = "curvature", value_name = "K")]
    pub curvature: Option<f64>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct LevelsArgs {
    /// Generating rule of the real sequence.
    #[arg(long = "rule", value_enum)]
    pub rule: Option<RuleArg>,

    /// Number of real levels, seed included.
    #[arg(long = "count", value_name = "N")]
    pub count: Option<usize>,

    /// Number of complex ascent steps (0 disables the ascent).
    #[arg(long = "depth", value_name = "D")]
    pub depth: Option<usize>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    Golden,
    Scaling,
    Extended,
}

impl From<PresetArg> for TransformPreset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Golden => Self::Golden,
            PresetArg::Scaling => Self::Scaling,
            PresetArg::Extended => Self::Extended,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ThresholdArg {
    Absolute,
    Relative,
    Percent,
    Coarse,
}

impl From<ThresholdArg> for ThresholdPreset {
    fn from(value: ThresholdArg) -> Self {
        match value {
            ThresholdArg::Absolute => Self::Absolute,
            ThresholdArg::Relative => Self::Relative,
            ThresholdArg::Percent => Self::Percent,
            ThresholdArg::Coarse => Self::Coarse,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RuleArg {
    Sine,
    SineExp,
}

impl From<RuleArg> for GeneratingRule {
    fn from(value: RuleArg) -> Self {
        match value {
            RuleArg::Sine => Self::Sine,
            RuleArg::SineExp => Self::SineExp,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
