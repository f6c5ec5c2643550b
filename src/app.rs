//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the term search (or a fixed-term probe)
//! - prints reports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{CandidatesArgs, Command, FitArgs, ProbeArgs, parse_term};
use crate::domain::{ProbeConfig, SelectConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `rgr` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` values feed clap's `env` fallbacks, so load it before parsing.
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Candidates(args) => handle_candidates(args),
        Command::Probe(args) => handle_probe(args),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. from an embedding binary) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = select_config_from_args(&args);
    let output = pipeline::run_selection(&config)?;
    println!("{}", crate::report::format_run_summary(&output, &config));
    Ok(())
}

fn handle_candidates(args: CandidatesArgs) -> Result<(), AppError> {
    let labels = crate::fit::candidate_labels(&args.variables.variables)?;
    print!("{}", crate::report::format_candidates(&labels));
    Ok(())
}

fn handle_probe(args: ProbeArgs) -> Result<(), AppError> {
    let config = probe_config_from_args(&args)?;
    let run = pipeline::run_probe(&config)?;
    print!("{}", crate::report::format_probe(&run));
    Ok(())
}

pub fn select_config_from_args(args: &FitArgs) -> SelectConfig {
    SelectConfig {
        data_path: args.data.data.clone(),
        rows: args.data.rows,
        check_rows: args.check_rows,
        responses: args.responses.clone(),
        variables: args.variables.variables.clone(),
        intercept: args.data.intercept,
        max_terms: args.max_terms,
    }
}

pub fn probe_config_from_args(args: &ProbeArgs) -> Result<ProbeConfig, AppError> {
    let terms = args
        .terms
        .iter()
        .map(|raw| parse_term(raw).map_err(|msg| AppError::new(2, msg)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProbeConfig {
        data_path: args.data.data.clone(),
        rows: args.data.rows,
        response: args.response.clone(),
        terms,
        intercept: args.data.intercept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn select_config_carries_every_flag() {
        let cli = Cli::try_parse_from([
            "rgr",
            "fit",
            "--data",
            "bench.csv",
            "--check-rows",
            "12..18",
            "--intercept",
            "--max-terms",
            "2",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = select_config_from_args(&args);
        assert_eq!(config.data_path.to_str(), Some("bench.csv"));
        assert_eq!(config.check_rows.map(|r| r.to_string()), Some("12..18".to_string()));
        assert!(config.intercept);
        assert_eq!(config.max_terms, Some(2));
    }

    #[test]
    fn probe_config_splits_terms() {
        let cli = Cli::try_parse_from(["rgr", "probe", "-r", "Py", "--term", "T", "--term", "D:S"])
            .unwrap();
        let Command::Probe(args) = cli.command else {
            panic!("expected probe");
        };
        let config = probe_config_from_args(&args).unwrap();
        assert_eq!(config.response, "Py");
        assert_eq!(
            config.terms,
            vec![vec!["T".to_string()], vec!["D".to_string(), "S".to_string()]]
        );
    }

    #[test]
    fn probe_config_rejects_empty_member() {
        let cli = Cli::try_parse_from(["rgr", "probe", "--term", "D:"]).unwrap();
        let Command::Probe(args) = cli.command else {
            panic!("expected probe");
        };
        let err = probe_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
