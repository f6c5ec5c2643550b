//! Greedy forward selection of predictor terms.
//!
//! Starting from an empty equation (or one holding only the constant term),
//! each round probes every unused candidate and keeps the one with the lowest
//! relative error. The search stops at the first round that fails to improve
//! on the best committed error, when no candidates remain, or when the
//! configured term cap is reached.
//!
//! Selection rules:
//! 1. A candidate is committed only if its error is strictly below every
//!    previously committed error, so committed errors strictly decrease.
//! 2. Ties go to the candidate enumerated first.
//! 3. At most `2^k - 1` terms can ever be committed.

use tracing::{debug, info};

use crate::domain::{Candidate, SelectionStep, Variable};
use crate::error::ModelError;
use crate::fit::candidates::enumerate_candidates;
use crate::models::{EquationModel, INTERCEPT_NAME};

/// Knobs for a forward-selection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Seed the equation with a constant term.
    pub intercept: bool,
    /// Stop after this many committed terms (the constant is not counted).
    pub max_terms: Option<usize>,
}

/// Result of probing one round of candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe<'a> {
    /// Position of the winner in the candidate list.
    pub index: usize,
    pub candidate: &'a Candidate,
    pub metric: f64,
}

/// Output of forward selection.
#[derive(Debug, Clone)]
pub struct Selection {
    pub model: EquationModel,
    /// Committed candidates in commit order.
    pub committed: Vec<Candidate>,
    pub steps: Vec<SelectionStep>,
    pub intercept: bool,
}

impl Selection {
    /// Error of the last committed step.
    pub fn best_metric(&self) -> Option<f64> {
        self.steps.last().map(|s| s.metric)
    }
}

/// Find the unused candidate whose addition gives the lowest error.
///
/// The model is only read. A candidate whose probe fails is skipped as long as
/// another one succeeds; if every unused candidate fails, the last error is
/// returned. `Ok(None)` means nothing was left to probe.
pub fn best_single_addition<'a>(
    model: &EquationModel,
    candidates: &'a [Candidate],
) -> Result<Option<Probe<'a>>, ModelError> {
    let mut best: Option<Probe<'a>> = None;
    let mut last_err = None;

    for (index, candidate) in candidates.iter().enumerate() {
        if model.has_term(&candidate.label) {
            continue;
        }

        let metric = match model.probe(&candidate.term) {
            Ok(metric) if !metric.is_nan() => metric,
            Ok(_) => {
                debug!(term = %candidate.label, "probe produced NaN error, skipping");
                continue;
            }
            Err(err) => {
                debug!(term = %candidate.label, error = %err, "probe failed, skipping");
                last_err = Some(err);
                continue;
            }
        };
        debug!(term = %candidate.label, metric, "probed candidate");

        if best.as_ref().is_none_or(|b| metric < b.metric) {
            best = Some(Probe {
                index,
                candidate,
                metric,
            });
        }
    }

    match (best, last_err) {
        (None, Some(err)) => Err(err),
        (best, _) => Ok(best),
    }
}

/// Fit `response` by forward selection over all subsets of `base`.
pub fn forward_select(
    base: &[Variable],
    response: &[f64],
    options: &SelectOptions,
) -> Result<EquationModel, ModelError> {
    Ok(forward_select_traced(base, response, options)?.model)
}

/// Like [`forward_select`], also returning the committed steps.
pub fn forward_select_traced(
    base: &[Variable],
    response: &[f64],
    options: &SelectOptions,
) -> Result<Selection, ModelError> {
    if let Some(obs) = response.iter().position(|x| !x.is_finite()) {
        return Err(ModelError::MalformedInput(format!(
            "response has a non-finite value at observation {obs}"
        )));
    }
    if let Some(v) = base.iter().find(|v| v.values.len() != response.len()) {
        return Err(ModelError::MalformedInput(format!(
            "variable '{}' has {} observations, response has {}",
            v.name,
            v.values.len(),
            response.len()
        )));
    }

    if options.intercept && base.iter().any(|v| v.name == INTERCEPT_NAME) {
        return Err(ModelError::DuplicateTerm(INTERCEPT_NAME.to_string()));
    }

    let candidates = enumerate_candidates(base)?;
    let mut model = if options.intercept {
        EquationModel::with_intercept(response.to_vec())
    } else {
        EquationModel::new(response.to_vec())
    };

    let mut committed = Vec::new();
    let mut steps: Vec<SelectionStep> = Vec::new();
    let mut best_metric = f64::INFINITY;

    loop {
        if options.max_terms.is_some_and(|max| steps.len() >= max) {
            debug!(terms = steps.len(), "term cap reached");
            break;
        }

        let Some(probe) = best_single_addition(&model, &candidates)? else {
            debug!("no candidates left to probe");
            break;
        };

        if probe.metric >= best_metric {
            debug!(
                term = %probe.candidate.label,
                metric = probe.metric,
                best = best_metric,
                "no improvement, stopping"
            );
            break;
        }

        model.add_term(probe.candidate.label.clone(), probe.candidate.term.clone())?;
        best_metric = probe.metric;
        info!(
            step = steps.len() + 1,
            term = %probe.candidate.label,
            metric = probe.metric,
            "committed term"
        );
        committed.push(probe.candidate.clone());
        steps.push(SelectionStep {
            label: probe.candidate.label.clone(),
            metric: probe.metric,
        });
    }

    Ok(Selection {
        model,
        committed,
        steps,
        intercept: options.intercept,
    })
}
