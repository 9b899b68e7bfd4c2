//! `fitgrid` binary.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::Parser;
use fit_cli::cli::{Cli, Command, OutputFormatArg};
use fit_cli::commands::{
    RunContext, run_catalogs, run_curved, run_grid, run_levels, run_match, run_verify,
};
use fit_cli::config::load_options;
use fit_cli::logging::{LogConfig, init_logging};
use fit_cli::summary::{
    catalogs_table, curved_table, levels_table, print_grid, print_match, verify_table,
};
use fit_standards::standards_root;
use serde::Serialize;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = LogConfig::from_cli(&cli, io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let standards_dir = cli.standards_dir.clone().unwrap_or_else(standards_root);
    let ctx = RunContext {
        options: load_options(cli.config.as_deref())?,
        standards_dir,
    };
    match &cli.command {
        Command::Match(args) => {
            let run = run_match(args, &ctx)?;
            emit(args.format, &run, || print_match(&run))
        }
        Command::Grid(args) => {
            let run = run_grid(args, &ctx)?;
            emit(args.format, &run, || print_grid(&run))
        }
        Command::Curved(args) => {
            let run = run_curved(args)?;
            emit(args.format, &run, || println!("{}", curved_table(&run)))
        }
        Command::Levels(args) => {
            let run = run_levels(args, &ctx)?;
            emit(args.format, &run, || {
                println!("{}", levels_table(&run));
                println!("{} candidates", run.candidates.len());
            })
        }
        Command::Catalogs => {
            let entries = run_catalogs(&ctx.standards_dir)?;
            println!("{}", catalogs_table(&entries));
            Ok(())
        }
        Command::Verify => {
            let summary = run_verify(&ctx.standards_dir)?;
            println!("Standards: {}", summary.standards_dir.display());
            println!("{}", verify_table(&summary));
            Ok(())
        }
    }
}

fn emit<T: Serialize>(format: OutputFormatArg, value: &T, table: impl FnOnce()) -> Result<()> {
    match format {
        OutputFormatArg::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormatArg::Table => table(),
    }
    Ok(())
}
