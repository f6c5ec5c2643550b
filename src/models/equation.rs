//! Linear equation over a growing set of named terms.
//!
//! An `EquationModel` describes
//!
//! ```text
//! a0·x0 + a1·x1 + … + a(N-1)·x(N-1) = P
//! ```
//!
//! where each `x_k` is a term (a column or an interaction of columns) and `P`
//! is the response. Coefficients come from the normal equations
//!
//! ```text
//! M[k][i] = Σ x_k·x_i      V[k] = Σ P·x_k
//! ```
//!
//! solved through a pseudo-inverse. Fit quality is the relative error
//!
//! ```text
//! δ = sqrt( Σ(P̂ − P)² / Σ P̂² )
//! ```
//!
//! Probing a candidate term goes through the same free functions on a borrowed
//! list of terms, so the model itself is never touched.

use nalgebra::{DMatrix, DVector};

use crate::domain::{NormalSystem, Term, TermSet};
use crate::error::ModelError;
use crate::math::{combine, effective_values, flatten, solve_pseudo_inverse};

/// Name of the constant term seeded by [`EquationModel::with_intercept`].
pub const INTERCEPT_NAME: &str = "1";

/// Solved equation: coefficients, fitted values and relative error.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    pub coefficients: Vec<f64>,
    pub predicted: Vec<f64>,
    pub metric: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquationModel {
    response: Vec<f64>,
    terms: TermSet,
    /// Number of unknown coefficients; always equals `terms.len()`.
    coefficient_count: usize,
}

impl EquationModel {
    /// An equation with no terms yet.
    pub fn new(response: Vec<f64>) -> Self {
        Self {
            response,
            terms: TermSet::new(),
            coefficient_count: 0,
        }
    }

    /// An equation seeded with a constant term (a column of ones).
    pub fn with_intercept(response: Vec<f64>) -> Self {
        let ones = vec![1.0; response.len()];
        let terms = TermSet::with_first(INTERCEPT_NAME, Term::Vector(ones));
        Self {
            response,
            terms,
            coefficient_count: 1,
        }
    }

    pub fn response(&self) -> &[f64] {
        &self.response
    }

    pub fn terms(&self) -> &TermSet {
        &self.terms
    }

    /// `N`: the number of coefficients the solved equation will have.
    pub fn coefficient_count(&self) -> usize {
        self.coefficient_count
    }

    pub fn has_term(&self, name: &str) -> bool {
        self.terms.contains(name)
    }

    /// Register a new active term.
    pub fn add_term(&mut self, name: impl Into<String>, term: Term) -> Result<(), ModelError> {
        check_term_length(&term, self.response.len())?;
        self.terms.add(name, term)?;
        self.coefficient_count += 1;
        Ok(())
    }

    pub fn build_normal_system(&self) -> Result<NormalSystem, ModelError> {
        normal_system(&self.response, &self.active_terms())
    }

    /// Least-squares coefficients, one per active term.
    pub fn solve(&self) -> Result<Vec<f64>, ModelError> {
        solve_terms(&self.response, &self.active_terms())
    }

    /// Fitted values for the given coefficients.
    pub fn predict(&self, coefficients: &[f64]) -> Result<Vec<f64>, ModelError> {
        predict_terms(self.response.len(), &self.active_terms(), coefficients)
    }

    pub fn residual_metric(&self) -> Result<f64, ModelError> {
        Ok(self.fit()?.metric)
    }

    /// Solve once and return coefficients, fitted values and metric together.
    pub fn fit(&self) -> Result<Fit, ModelError> {
        fit_terms(&self.response, &self.active_terms())
    }

    /// Relative error of this equation with `extra` appended, without adding it.
    pub fn probe(&self, extra: &Term) -> Result<f64, ModelError> {
        check_term_length(extra, self.response.len())?;
        let mut terms = self.active_terms();
        terms.push(extra);
        Ok(fit_terms(&self.response, &terms)?.metric)
    }

    /// `T + t + DS = P`
    pub fn describe(&self) -> String {
        let lhs: Vec<&str> = self.terms.names().collect();
        format!("{} = P", lhs.join(" + "))
    }

    fn active_terms(&self) -> Vec<&Term> {
        self.terms.terms().collect()
    }
}

/// Relative error `sqrt(Σ(P̂ − P)² / Σ P̂²)`.
///
/// When every prediction is zero the ratio is undefined; the result is `0.0`
/// if the observations are zero too and `+∞` otherwise.
pub fn relative_error(predicted: &[f64], observed: &[f64]) -> f64 {
    let sse: f64 = predicted
        .iter()
        .zip(observed.iter())
        .map(|(p, y)| (p - y) * (p - y))
        .sum();
    let scale: f64 = predicted.iter().map(|p| p * p).sum();

    if scale == 0.0 {
        return if sse == 0.0 { 0.0 } else { f64::INFINITY };
    }
    (sse / scale).sqrt()
}

fn check_term_length(term: &Term, m: usize) -> Result<(), ModelError> {
    let leaves = flatten(&[term])?;
    match leaves.first() {
        None => Err(ModelError::MalformedInput("term has no member vectors".to_string())),
        Some(first) if first.len() != m => Err(ModelError::MalformedInput(format!(
            "term has {} observations, response has {m}",
            first.len()
        ))),
        Some(_) => Ok(()),
    }
}

fn normal_system(response: &[f64], terms: &[&Term]) -> Result<NormalSystem, ModelError> {
    let n = terms.len();
    if n == 0 {
        return Err(ModelError::EmptyModel);
    }

    let p = Term::Vector(response.to_vec());
    let mut matrix = DMatrix::<f64>::zeros(n, n);
    let mut vector = DVector::<f64>::zeros(n);

    for k in 0..n {
        vector[k] = combine(&p, &[terms[k]])?;
        for i in k..n {
            let value = combine(terms[k], &[terms[i]])?;
            matrix[(k, i)] = value;
            matrix[(i, k)] = value;
        }
    }

    Ok(NormalSystem { matrix, vector })
}

fn solve_terms(response: &[f64], terms: &[&Term]) -> Result<Vec<f64>, ModelError> {
    let system = normal_system(response, terms)?;
    let coefficients =
        solve_pseudo_inverse(&system.matrix, &system.vector).ok_or(ModelError::SingularSystem)?;
    debug_assert_eq!(coefficients.len(), terms.len());
    Ok(coefficients.iter().copied().collect())
}

fn predict_terms(m: usize, terms: &[&Term], coefficients: &[f64]) -> Result<Vec<f64>, ModelError> {
    if coefficients.len() != terms.len() {
        return Err(ModelError::MalformedInput(format!(
            "{} coefficients for {} terms",
            coefficients.len(),
            terms.len()
        )));
    }

    let mut predicted = vec![0.0; m];
    for (term, &a) in terms.iter().zip(coefficients.iter()) {
        let values = effective_values(term)?;
        if values.len() != m {
            return Err(ModelError::MalformedInput(format!(
                "term has {} observations, expected {m}",
                values.len()
            )));
        }
        for (acc, x) in predicted.iter_mut().zip(values.iter()) {
            *acc += a * x;
        }
    }
    Ok(predicted)
}

fn fit_terms(response: &[f64], terms: &[&Term]) -> Result<Fit, ModelError> {
    let coefficients = solve_terms(response, terms)?;
    let predicted = predict_terms(response.len(), terms, &coefficients)?;
    let metric = relative_error(&predicted, response);
    Ok(Fit {
        coefficients,
        predicted,
        metric,
    })
}
