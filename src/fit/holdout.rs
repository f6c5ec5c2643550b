//! Check a fitted equation on rows it was not fitted on.
//!
//! The committed terms are rebuilt from the check rows by member name, the
//! fitted coefficients are kept frozen, and the same relative error as the
//! search is reported.

use crate::domain::Term;
use crate::error::AppError;
use crate::fit::selection::Selection;
use crate::io::Dataset;
use crate::models::{EquationModel, relative_error};

/// Hold-out outcome for one response.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutCheck {
    pub n_rows: usize,
    pub predicted: Vec<f64>,
    pub observed: Vec<f64>,
    pub metric: f64,
}

/// Evaluate `coefficients` of `selection` on `check` rows for `response`.
pub fn evaluate_holdout(
    selection: &Selection,
    coefficients: &[f64],
    check: &Dataset,
    response: &str,
) -> Result<HoldoutCheck, AppError> {
    let observed = check.column(response)?.to_vec();
    let mut model = if selection.intercept {
        EquationModel::with_intercept(observed.clone())
    } else {
        EquationModel::new(observed.clone())
    };

    for candidate in &selection.committed {
        let members = candidate
            .members
            .iter()
            .map(|name| check.column(name).map(<[f64]>::to_vec))
            .collect::<Result<Vec<_>, _>>()?;
        model.add_term(candidate.label.clone(), Term::from_members(members))?;
    }

    let predicted = model.predict(coefficients)?;
    let metric = relative_error(&predicted, &observed);
    Ok(HoldoutCheck {
        n_rows: check.n_rows(),
        predicted,
        observed,
        metric,
    })
}
