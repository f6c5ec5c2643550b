//! Command-line parsing for the `rgr` term search.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the selection/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::RowRange;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "rgr",
    version,
    about = "Forward-selection linear regression over interaction terms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search interaction terms for each response and print the fitted equations.
    Fit(FitArgs),
    /// List candidate terms in search order.
    Candidates(CandidatesArgs),
    /// Fit a fixed list of terms without searching.
    Probe(ProbeArgs),
}

/// Where the data comes from.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV file with a header row.
    #[arg(short = 'd', long, env = "RGR_DATA", default_value = "rgr.csv")]
    pub data: PathBuf,

    /// Data rows used for fitting (0-based, header excluded, end exclusive).
    #[arg(long, default_value = "0..12")]
    pub rows: RowRange,

    /// Seed every equation with a constant term.
    #[arg(long)]
    pub intercept: bool,
}

/// Options for `rgr fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Hold-out rows for checking the fitted equations.
    #[arg(long, value_name = "A..B")]
    pub check_rows: Option<RowRange>,

    /// Response columns to fit.
    #[arg(
        short = 'r',
        long = "response",
        env = "RGR_RESPONSES",
        value_delimiter = ',',
        default_values_t = [String::from("PX"), String::from("Py"), String::from("Pz")]
    )]
    pub responses: Vec<String>,

    #[command(flatten)]
    pub variables: VariableArgs,

    /// Stop after committing this many terms.
    #[arg(long)]
    pub max_terms: Option<usize>,
}

/// Base variable selection.
#[derive(Debug, Args, Clone)]
pub struct VariableArgs {
    /// Base variable columns; every non-empty subset is a candidate term.
    #[arg(
        short = 'v',
        long,
        env = "RGR_VARIABLES",
        value_delimiter = ',',
        default_values_t = [
            String::from("T"),
            String::from("t"),
            String::from("n"),
            String::from("D"),
            String::from("S"),
        ]
    )]
    pub variables: Vec<String>,
}

/// Options for `rgr candidates`.
#[derive(Debug, Args, Clone)]
pub struct CandidatesArgs {
    #[command(flatten)]
    pub variables: VariableArgs,
}

/// Options for `rgr probe`.
#[derive(Debug, Args, Clone)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Response column to fit.
    #[arg(short = 'r', long, default_value = "PX")]
    pub response: String,

    /// A term to include; join interaction members with ':' (e.g. `D:S`). Repeatable.
    #[arg(short = 't', long = "term", value_name = "NAME[:NAME...]", required = true)]
    pub terms: Vec<String>,
}

/// Split a `--term` value into member names.
pub fn parse_term(raw: &str) -> Result<Vec<String>, String> {
    let members: Vec<String> = raw.split(':').map(|m| m.trim().to_string()).collect();
    if members.iter().any(String::is_empty) {
        return Err(format!("Invalid term '{raw}': empty member name"));
    }
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults() {
        let cli = Cli::try_parse_from(["rgr", "fit"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.data.rows, RowRange::new(0, 12));
        assert_eq!(args.check_rows, None);
        assert_eq!(args.responses, vec!["PX", "Py", "Pz"]);
        assert_eq!(args.variables.variables, vec!["T", "t", "n", "D", "S"]);
        assert!(!args.data.intercept);
    }

    #[test]
    fn fit_accepts_lists_and_ranges() {
        let cli = Cli::try_parse_from([
            "rgr",
            "fit",
            "--rows",
            "2..10",
            "--check-rows",
            "12..18",
            "--response",
            "PX,Pz",
            "--variables",
            "T,D",
            "--max-terms",
            "3",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.data.rows, RowRange::new(2, 10));
        assert_eq!(args.check_rows, Some(RowRange::new(12, 18)));
        assert_eq!(args.responses, vec!["PX", "Pz"]);
        assert_eq!(args.variables.variables, vec!["T", "D"]);
        assert_eq!(args.max_terms, Some(3));
    }

    #[test]
    fn bad_range_is_rejected() {
        assert!(Cli::try_parse_from(["rgr", "fit", "--rows", "4..4"]).is_err());
    }

    #[test]
    fn probe_requires_a_term() {
        assert!(Cli::try_parse_from(["rgr", "probe"]).is_err());
        let cli = Cli::try_parse_from(["rgr", "probe", "--term", "T", "--term", "D:S"]).unwrap();
        let Command::Probe(args) = cli.command else {
            panic!("expected probe");
        };
        assert_eq!(args.terms, vec!["T", "D:S"]);
    }

    #[test]
    fn term_members_split_on_colon() {
        assert_eq!(parse_term("D:S").unwrap(), vec!["D", "S"]);
        assert_eq!(parse_term("T").unwrap(), vec!["T"]);
        assert!(parse_term("D::S").is_err());
    }
}
