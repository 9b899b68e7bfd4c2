//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! Library crates only emit events and spans; this module installs the
//! subscriber for the `fitgrid` binary.
//!
//! # Log Levels
//!
//! - `error`: Fatal errors
//! - `warn`: Empty grids, truncated ascents
//! - `info`: Command progress, summary counts, durations
//! - `debug`: Table sizes and per-target results
//! - `trace`: Every skipped (candidate, transformation) pair
//!
//! # Usage
//!
//! ```ignore
//! use fit_cli::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::default().with_level_filter(LevelFilter::DEBUG);
//! init_logging(&config).expect("init logging");
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::ColorChoice;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::cli::{Cli, LogFormatArg, LogLevelArg};

/// Crates whose events follow the configured level by default.
const WORKSPACE_CRATES: [&str; 5] = [
    "fit_cli",
    "fit_core",
    "fit_match",
    "fit_model",
    "fit_standards",
];

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Maximum level emitted by the workspace crates.
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the default filter.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    /// Whether to include target (module path) in log output.
    pub with_target: bool,
    /// Emit an event when a span closes (JSON format only).
    pub with_spans: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Optional log file path. When set, logs are appended to the file.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_spans: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, enable: bool) -> Self {
        self.use_env_filter = enable;
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.with_timestamps = enable;
        self
    }

    #[must_use]
    pub fn with_target(mut self, enable: bool) -> Self {
        self.with_target = enable;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log file path (writes to stderr when None).
    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Settings for the `fitgrid` global flags.
    ///
    /// `--log-level` beats `-v`/`-q`, and either one switches `RUST_LOG` off.
    /// ANSI follows `--color`; under `auto` it needs a terminal on stderr and
    /// no log file.
    pub fn from_cli(cli: &Cli, stderr_is_terminal: bool) -> Self {
        let explicit = cli.verbosity.is_present() || cli.log_level.is_some();
        let level_filter = cli
            .log_level
            .map_or_else(|| cli.verbosity.tracing_level_filter(), LevelFilter::from);
        let with_ansi = match cli.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => cli.log_file.is_none() && stderr_is_terminal,
        };
        Self::default()
            .with_level_filter(level_filter)
            .with_env_filter(!explicit)
            .with_format(cli.log_format.into())
            .with_log_file(cli.log_file.clone())
            .with_ansi(with_ansi)
    }
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Initialize the global tracing subscriber with the given configuration.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, SharedFileWriter::new(file));
    } else {
        init_logging_with_writer(config, io::stderr);
    }
    Ok(())
}

/// Initialize logging with a custom writer (useful for testing).
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config.level_filter, config.use_env_filter);
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);

    let layer: Box<dyn Layer<Registry> + Send + Sync> =
        match (config.format, config.with_timestamps) {
            (LogFormat::Json, _) => base
                .json()
                .with_span_events(if config.with_spans {
                    FmtSpan::CLOSE
                } else {
                    FmtSpan::NONE
                })
                .with_filter(filter)
                .boxed(),
            (LogFormat::Compact, true) => base
                .compact()
                .with_ansi(config.with_ansi)
                .with_filter(filter)
                .boxed(),
            (LogFormat::Compact, false) => base
                .compact()
                .without_time()
                .with_ansi(config.with_ansi)
                .with_filter(filter)
                .boxed(),
            (LogFormat::Pretty, true) => base
                .with_ansi(config.with_ansi)
                .with_filter(filter)
                .boxed(),
            (LogFormat::Pretty, false) => base
                .without_time()
                .with_ansi(config.with_ansi)
                .with_filter(filter)
                .boxed(),
        };

    tracing_subscriber::registry().with(layer).init();
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<File>>,
}

impl SharedFileWriter {
    fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Default filter directive: `level` for the workspace crates, `warn` for
/// everything else.
pub fn default_directive(level_filter: LevelFilter) -> String {
    let level = level_filter.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(WORKSPACE_CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

fn build_env_filter(level_filter: LevelFilter, use_env_filter: bool) -> EnvFilter {
    if use_env_filter && let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(default_directive(level_filter))
}
