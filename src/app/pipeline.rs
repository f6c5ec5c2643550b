//! Shared "selection pipeline" logic used by the CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV load -> base variables -> forward selection per response -> hold-out check
//!
//! The CLI can then focus on presentation.

use rayon::prelude::*;
use tracing::info;

use crate::domain::{ProbeConfig, SelectConfig, Term};
use crate::error::AppError;
use crate::fit::{HoldoutCheck, SelectOptions, Selection, evaluate_holdout, forward_select_traced};
use crate::io::{Dataset, load_dataset};
use crate::models::{EquationModel, Fit};

/// Outputs of fitting one response.
#[derive(Debug, Clone)]
pub struct ResponseRun {
    pub response: String,
    pub selection: Selection,
    pub fit: Fit,
    pub holdout: Option<HoldoutCheck>,
}

/// All computed outputs of a single `rgr fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub check: Option<Dataset>,
    pub runs: Vec<ResponseRun>,
}

/// Outputs of fitting a fixed list of terms.
#[derive(Debug, Clone)]
pub struct ProbeRun {
    pub response: String,
    pub model: EquationModel,
    pub fit: Fit,
}

/// Execute the full selection pipeline and return the computed outputs.
pub fn run_selection(config: &SelectConfig) -> Result<RunOutput, AppError> {
    let dataset = load_dataset(&config.data_path, config.rows)?;
    let check = config
        .check_rows
        .map(|rows| load_dataset(&config.data_path, rows))
        .transpose()?;

    let runs = run_selection_on(config, &dataset, check.as_ref())?;
    Ok(RunOutput {
        dataset,
        check,
        runs,
    })
}

/// Run selection for every configured response on already loaded data.
///
/// Responses are independent, so they are fitted in parallel; output order
/// follows `config.responses`.
pub fn run_selection_on(
    config: &SelectConfig,
    dataset: &Dataset,
    check: Option<&Dataset>,
) -> Result<Vec<ResponseRun>, AppError> {
    if config.responses.is_empty() {
        return Err(AppError::new(2, "No response columns requested."));
    }
    let base = dataset.variables(&config.variables)?;
    let options = SelectOptions {
        intercept: config.intercept,
        max_terms: config.max_terms,
    };

    config
        .responses
        .par_iter()
        .map(|response| -> Result<ResponseRun, AppError> {
            let observed = dataset.column(response)?;
            let selection = forward_select_traced(&base, observed, &options)?;
            let fit = selection.model.fit()?;
            info!(
                response = %response,
                equation = %selection.model.describe(),
                metric = fit.metric,
                "selection finished"
            );

            let holdout = check
                .map(|check| evaluate_holdout(&selection, &fit.coefficients, check, response))
                .transpose()?;

            Ok(ResponseRun {
                response: response.clone(),
                selection,
                fit,
                holdout,
            })
        })
        .collect()
}

/// Fit a fixed list of terms, bypassing the search.
pub fn run_probe(config: &ProbeConfig) -> Result<ProbeRun, AppError> {
    let dataset = load_dataset(&config.data_path, config.rows)?;
    run_probe_on(config, &dataset)
}

pub fn run_probe_on(config: &ProbeConfig, dataset: &Dataset) -> Result<ProbeRun, AppError> {
    if config.terms.is_empty() {
        return Err(AppError::new(2, "No terms given; use --term NAME[:NAME...]."));
    }

    let observed = dataset.column(&config.response)?.to_vec();
    let mut model = if config.intercept {
        EquationModel::with_intercept(observed)
    } else {
        EquationModel::new(observed)
    };

    for members in &config.terms {
        let vectors = members
            .iter()
            .map(|name| dataset.column(name).map(<[f64]>::to_vec))
            .collect::<Result<Vec<_>, _>>()?;
        model.add_term(members.concat(), Term::from_members(vectors))?;
    }

    let fit = model.fit()?;
    Ok(ProbeRun {
        response: config.response.clone(),
        model,
        fit,
    })
}
