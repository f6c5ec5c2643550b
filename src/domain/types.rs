//! Shared domain types.
//!
//! These types are intentionally plain data so they can be:
//!
//! - built once from the loaded table (`Variable`, `Candidate`)
//! - handed to the equation builder and the search (`Term`, `TermSet`)
//! - rendered by the reporting code (`SelectionStep`, `SelectConfig`)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};

use crate::error::ModelError;

/// A predictor usable in a linear equation.
///
/// Interactions are kept as their member vectors and only multiplied out when
/// a product sum or a prediction is computed.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A single measured column.
    Vector(Vec<f64>),
    /// Elementwise product of all member vectors.
    Interaction(Vec<Vec<f64>>),
    /// Arbitrary nesting of terms; behaves like the interaction of all leaves.
    Group(Vec<Term>),
}

impl Term {
    /// Build a term from member vectors, collapsing a single member to `Term::Vector`.
    pub fn from_members(mut members: Vec<Vec<f64>>) -> Self {
        if members.len() == 1 {
            if let Some(only) = members.pop() {
                return Term::Vector(only);
            }
        }
        Term::Interaction(members)
    }
}

/// Ordered name → term mapping with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermSet {
    entries: Vec<(String, Term)>,
}

impl TermSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding exactly one term.
    pub(crate) fn with_first(name: impl Into<String>, term: Term) -> Self {
        Self {
            entries: vec![(name.into(), term)],
        }
    }

    /// Register a term; fails if the name is already taken.
    pub fn add(&mut self, name: impl Into<String>, term: Term) -> Result<(), ModelError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(ModelError::DuplicateTerm(name));
        }
        self.entries.push((name, term));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.entries.iter().map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }
}

/// Normal equations `M · a = V` for the active terms of an equation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalSystem {
    pub matrix: DMatrix<f64>,
    pub vector: DVector<f64>,
}

impl NormalSystem {
    /// Number of unknown coefficients (`N`).
    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}

/// A named base variable (one measured column).
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub values: Vec<f64>,
}

impl Variable {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A candidate predictor produced by subset enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Concatenated member names, e.g. `"TtnDS"`.
    pub label: String,
    /// Base variable names in canonical order.
    pub members: Vec<String>,
    pub term: Term,
}

/// One committed step of forward selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionStep {
    pub label: String,
    pub metric: f64,
}

/// Half-open range of data rows (0-based, header excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end
    }
}

impl FromStr for RowRange {
    type Err = String;

    /// Parse `START..END`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| format!("Expected START..END, got '{s}'"))?;
        let start: usize = start
            .trim()
            .parse()
            .map_err(|e| format!("Invalid range start '{start}': {e}"))?;
        let end: usize = end
            .trim()
            .parse()
            .map_err(|e| format!("Invalid range end '{end}': {e}"))?;
        if end <= start {
            return Err(format!("Empty row range {start}..{end}"));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A full selection run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct SelectConfig {
    pub data_path: PathBuf,
    /// Rows used for fitting.
    pub rows: RowRange,
    /// Optional hold-out rows for checking the fitted equation.
    pub check_rows: Option<RowRange>,
    pub responses: Vec<String>,
    pub variables: Vec<String>,
    /// Seed every equation with a constant term.
    pub intercept: bool,
    /// Cap on committed terms (excluding the constant).
    pub max_terms: Option<usize>,
}

/// Configuration for fitting a fixed list of terms.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub data_path: PathBuf,
    pub rows: RowRange,
    pub response: String,
    /// Each inner list is one term's member variable names.
    pub terms: Vec<Vec<String>>,
    pub intercept: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_set_rejects_duplicate_names() {
        let mut set = TermSet::new();
        set.add("T", Term::Vector(vec![1.0])).unwrap();
        let err = set.add("T", Term::Vector(vec![2.0])).unwrap_err();
        assert_eq!(err, ModelError::DuplicateTerm("T".to_string()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("T"), Some(&Term::Vector(vec![1.0])));
    }

    #[test]
    fn term_set_keeps_insertion_order() {
        let mut set = TermSet::new();
        set.add("t", Term::Vector(vec![1.0])).unwrap();
        set.add("T", Term::Vector(vec![1.0])).unwrap();
        set.add("DS", Term::Interaction(vec![vec![1.0], vec![2.0]])).unwrap();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["t", "T", "DS"]);
    }

    #[test]
    fn single_member_collapses_to_vector() {
        assert_eq!(Term::from_members(vec![vec![1.0, 2.0]]), Term::Vector(vec![1.0, 2.0]));
        assert!(matches!(
            Term::from_members(vec![vec![1.0], vec![2.0]]),
            Term::Interaction(_)
        ));
    }

    #[test]
    fn row_range_parses_and_rejects_empty() {
        let r: RowRange = "0..12".parse().unwrap();
        assert_eq!(r, RowRange::new(0, 12));
        assert_eq!(r.len(), 12);
        assert_eq!(r.to_string(), "0..12");
        assert!("5..5".parse::<RowRange>().is_err());
        assert!("12".parse::<RowRange>().is_err());
        assert!("a..3".parse::<RowRange>().is_err());
    }
}
