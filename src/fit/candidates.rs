//! Candidate term generation.
//!
//! Every non-empty subset of the base variables is a candidate predictor:
//! single variables are plain terms, larger subsets are interactions.
//!
//! Order is deterministic: by subset size, then lexicographically by base
//! variable order within a size. For `T, t, n, D, S` this gives
//! `T, t, n, D, S, Tt, Tn, …, TtnDS` (31 candidates).

use std::collections::HashSet;

use crate::domain::{Candidate, Term, Variable};
use crate::error::ModelError;
use crate::math::flatten;

/// Upper bound on base variables (`2^16 - 1` candidates).
pub const MAX_BASE_VARIABLES: usize = 16;

/// Index subsets of `0..k`, ordered by size then lexicographically.
pub fn subsets(k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    for size in 1..=k {
        let mut combo: Vec<usize> = (0..size).collect();
        loop {
            out.push(combo.clone());

            // Advance to the next combination in lexicographic order.
            let Some(pos) = (0..size).rev().find(|&i| combo[i] < k - size + i) else {
                break;
            };
            combo[pos] += 1;
            for i in (pos + 1)..size {
                combo[i] = combo[i - 1] + 1;
            }
        }
    }
    out
}

/// Labels and member names of every candidate, without building terms.
pub fn candidate_labels(names: &[String]) -> Result<Vec<(String, Vec<String>)>, ModelError> {
    if names.len() > MAX_BASE_VARIABLES {
        return Err(ModelError::TooManyVariables {
            count: names.len(),
            max: MAX_BASE_VARIABLES,
        });
    }

    let mut seen_names = HashSet::new();
    for name in names {
        if !seen_names.insert(name.as_str()) {
            return Err(ModelError::DuplicateTerm(name.clone()));
        }
    }

    let mut seen_labels = HashSet::new();
    let mut out = Vec::new();
    for subset in subsets(names.len()) {
        let members: Vec<String> = subset.iter().map(|&i| names[i].clone()).collect();
        let label = members.concat();
        if !seen_labels.insert(label.clone()) {
            return Err(ModelError::DuplicateTerm(label));
        }
        out.push((label, members));
    }
    Ok(out)
}

/// Build all `2^k - 1` candidates from the base variables.
pub fn enumerate_candidates(base: &[Variable]) -> Result<Vec<Candidate>, ModelError> {
    let names: Vec<String> = base.iter().map(|v| v.name.clone()).collect();
    let labels = candidate_labels(&names)?;

    // Validate lengths once up front; candidates reuse the same columns.
    let columns: Vec<Term> = base.iter().map(|v| Term::Vector(v.values.clone())).collect();
    let column_refs: Vec<&Term> = columns.iter().collect();
    flatten(&column_refs)?;

    let index_sets = subsets(base.len());
    let candidates = labels
        .into_iter()
        .zip(index_sets)
        .map(|((label, members), subset)| {
            let vectors = subset.iter().map(|&i| base[i].values.clone()).collect();
            Candidate {
                label,
                members,
                term: Term::from_members(vectors),
            }
        })
        .collect();

    Ok(candidates)
}
