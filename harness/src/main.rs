//! Command-line entry point: `harness run <CANDIDATE> <SUITE>`.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error};

use harness::batch::BatchRunner;
use harness::core::types::BatchReport;
use harness::exit_codes;
use harness::io::config::load_config;
use harness::io::probe::ProcProbe;
use harness::io::report::write_report;
use harness::io::suite::load_suite;
use harness::registry::Registry;

#[derive(Parser)]
#[command(
    name = "harness",
    version,
    about = "Run a candidate solution against a test suite and report per-case results"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every test case and print the JSON report to stdout.
    Run {
        /// Built-in candidate name, or a path whose file stem names one.
        candidate: String,
        /// JSON test suite file.
        suite: PathBuf,
        /// Harness config (TOML). Defaults apply when the file is missing.
        #[arg(long, default_value = "harness.toml")]
        config: PathBuf,
        /// Print the report on a single line.
        #[arg(long)]
        compact: bool,
    },
    /// List built-in candidates with their arity.
    List,
}

fn main() {
    harness::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::FATAL);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            candidate,
            suite,
            config,
            compact,
        } => cmd_run(&candidate, &suite, &config, compact),
        Command::List => cmd_list(),
    }
}

fn cmd_run(candidate: &str, suite_path: &Path, config_path: &Path, compact: bool) -> Result<()> {
    let cfg = load_config(config_path).context("load harness config")?;
    let suite = load_suite(suite_path)?;
    debug!(cases = suite.len(), "suite loaded");

    let mut candidate = match Registry::builtin().resolve(candidate) {
        Ok(candidate) => candidate,
        Err(err) => {
            if cfg.placeholder_on_fatal {
                error!("candidate unavailable, emitting placeholder report");
                write_report(io::stdout().lock(), &BatchReport::placeholder(&suite), compact)?;
            }
            return Err(err).context("resolve candidate");
        }
    };

    let runner = BatchRunner::new(ProcProbe::new(&cfg.proc_dir))
        .capture(cfg.capture_settings())
        .tick_policy(cfg.tick_policy);
    let report = runner.run(&suite, candidate.as_mut());

    write_report(io::stdout().lock(), &report, compact)
}

fn cmd_list() -> Result<()> {
    let registry = Registry::builtin();
    for name in registry.names() {
        let candidate = registry.resolve(name)?;
        println!("{}\t{}", candidate.name(), candidate.arity());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_with_defaults() {
        let cli = Cli::parse_from(["harness", "run", "sum", "suite.json"]);
        match cli.command {
            Command::Run {
                candidate,
                suite,
                config,
                compact,
            } => {
                assert_eq!(candidate, "sum");
                assert_eq!(suite, PathBuf::from("suite.json"));
                assert_eq!(config, PathBuf::from("harness.toml"));
                assert!(!compact);
            }
            Command::List => panic!("expected run"),
        }
    }

    #[test]
    fn run_requires_both_paths() {
        assert!(Cli::try_parse_from(["harness", "run", "sum"]).is_err());
    }

    #[test]
    fn parse_list() {
        let cli = Cli::parse_from(["harness", "list"]);
        assert!(matches!(cli.command, Command::List));
    }
}
