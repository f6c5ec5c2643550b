//! Sums of elementwise products over (nested) terms.
//!
//! Every entry of a normal system is a product sum:
//!
//! ```text
//! Σ_obs Π_v v[obs]
//! ```
//!
//! taken over a flat list of vectors. A plain term contributes one vector, an
//! interaction contributes all of its members, and groups are flattened
//! left-to-right. This lets one routine cover "sum of a column", "dot product
//! of two columns" and "sum of a triple interaction".
//!
//! An empty vector list yields `0.0`: there are no observations to sum over.
//! The empty-product identity (1) is never used.

use crate::domain::Term;
use crate::error::ModelError;

/// Flatten nested terms into their leaf vectors, preserving traversal order.
///
/// Fails if the leaves have different lengths or contain non-finite values.
pub fn flatten<'a>(terms: &[&'a Term]) -> Result<Vec<&'a [f64]>, ModelError> {
    let mut out = Vec::new();
    for &term in terms {
        collect_leaves(term, &mut out);
    }
    validate(&out)?;
    Ok(out)
}

/// `Σ_obs Π_v v[obs]` over equally sized vectors.
pub fn product_sum(vectors: &[&[f64]]) -> Result<f64, ModelError> {
    validate(vectors)?;
    Ok(product_sum_unchecked(vectors))
}

/// Product sum of `primary` and every term in `extra`.
///
/// A plain vector with no extra terms is simply summed.
pub fn combine(primary: &Term, extra: &[&Term]) -> Result<f64, ModelError> {
    if let (Term::Vector(v), true) = (primary, extra.is_empty()) {
        validate(&[v.as_slice()])?;
        return Ok(v.iter().sum());
    }

    let mut all = Vec::with_capacity(extra.len() + 1);
    all.push(primary);
    all.extend_from_slice(extra);
    let vectors = flatten(&all)?;
    Ok(product_sum_unchecked(&vectors))
}

/// Per-observation product of all leaves of `term`.
pub fn effective_values(term: &Term) -> Result<Vec<f64>, ModelError> {
    let vectors = flatten(&[term])?;
    let Some(first) = vectors.first() else {
        return Err(ModelError::MalformedInput("term has no member vectors".to_string()));
    };

    let mut out = first.to_vec();
    for v in &vectors[1..] {
        for (acc, x) in out.iter_mut().zip(v.iter()) {
            *acc *= x;
        }
    }
    Ok(out)
}

fn collect_leaves<'a>(term: &'a Term, out: &mut Vec<&'a [f64]>) {
    match term {
        Term::Vector(v) => out.push(v.as_slice()),
        Term::Interaction(members) => out.extend(members.iter().map(Vec::as_slice)),
        Term::Group(children) => {
            for child in children {
                collect_leaves(child, out);
            }
        }
    }
}

fn validate(vectors: &[&[f64]]) -> Result<(), ModelError> {
    let Some(first) = vectors.first() else {
        return Ok(());
    };
    let m = first.len();

    for (idx, v) in vectors.iter().enumerate() {
        if v.len() != m {
            return Err(ModelError::MalformedInput(format!(
                "vector {idx} has length {} (expected {m})",
                v.len()
            )));
        }
        if let Some(obs) = v.iter().position(|x| !x.is_finite()) {
            return Err(ModelError::MalformedInput(format!(
                "vector {idx} has a non-finite value at observation {obs}"
            )));
        }
    }
    Ok(())
}

fn product_sum_unchecked(vectors: &[&[f64]]) -> f64 {
    let Some(first) = vectors.first() else {
        return 0.0;
    };
    (0..first.len())
        .map(|obs| vectors.iter().map(|v| v[obs]).product::<f64>())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn a1() -> Term {
        Term::Vector(vec![1.0, 2.0, 3.0])
    }

    fn a2() -> Term {
        Term::Interaction(vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]])
    }

    #[test]
    fn plain_vector_is_summed() {
        assert_relative_eq!(combine(&a1(), &[]).unwrap(), 6.0);
        assert_eq!(combine(&Term::Vector(vec![]), &[]).unwrap(), 0.0);
    }

    #[test]
    fn interaction_alone_is_a_dot_product() {
        assert_relative_eq!(combine(&a2(), &[]).unwrap(), 14.0);
        assert_relative_eq!(combine(&a1(), &[&a1()]).unwrap(), 14.0);
    }

    #[test]
    fn vector_with_interaction_is_a_triple_product() {
        assert_relative_eq!(combine(&a1(), &[&a2()]).unwrap(), 36.0);
        assert_relative_eq!(combine(&a2(), &[&a1()]).unwrap(), 36.0);
        assert_relative_eq!(combine(&a2(), &[&a2()]).unwrap(), 98.0);
    }

    #[test]
    fn dot_product_is_symmetric() {
        let v1 = Term::Vector(vec![0.5, -2.0, 4.0, 1.5]);
        let v2 = Term::Vector(vec![3.0, 1.0, -1.0, 2.0]);
        let ab = combine(&v1, &[&v2]).unwrap();
        let ba = combine(&v2, &[&v1]).unwrap();
        assert_relative_eq!(ab, ba);
        assert_relative_eq!(ab, 1.5 - 2.0 - 4.0 + 3.0);
    }

    #[test]
    fn nesting_shape_does_not_matter() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 0.5, -1.0];
        let c = vec![4.0, 1.0, 3.0];

        let grouped = Term::Group(vec![Term::Vector(a.clone()), Term::Vector(b.clone())]);
        let deep = Term::Group(vec![
            Term::Group(vec![Term::Vector(a.clone())]),
            Term::Interaction(vec![b.clone(), c.clone()]),
        ]);
        let flat = product_sum(&[a.as_slice(), b.as_slice(), c.as_slice()]).unwrap();

        let c_term = Term::Vector(c.clone());
        assert_relative_eq!(combine(&grouped, &[&c_term]).unwrap(), flat);
        assert_relative_eq!(combine(&deep, &[]).unwrap(), flat);
        assert_relative_eq!(
            combine(&Term::Vector(a), &[&Term::Vector(b), &c_term]).unwrap(),
            flat
        );
    }

    #[test]
    fn flatten_preserves_order() {
        let nested = Term::Group(vec![
            Term::Vector(vec![1.0]),
            Term::Group(vec![Term::Interaction(vec![vec![2.0], vec![3.0]])]),
            Term::Vector(vec![4.0]),
        ]);
        let leaves = flatten(&[&nested]).unwrap();
        let firsts: Vec<f64> = leaves.iter().map(|v| v[0]).collect();
        assert_eq!(firsts, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let short = Term::Vector(vec![1.0, 2.0]);
        let err = combine(&a1(), &[&short]).unwrap_err();
        assert!(matches!(err, ModelError::MalformedInput(_)));
        let ragged: [&[f64]; 2] = [&[1.0, 2.0], &[1.0]];
        assert!(product_sum(&ragged).is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let bad = Term::Vector(vec![1.0, f64::NAN]);
        assert!(matches!(combine(&bad, &[]), Err(ModelError::MalformedInput(_))));
    }

    #[test]
    fn empty_inputs_sum_to_zero() {
        assert_eq!(product_sum(&[]).unwrap(), 0.0);
        assert_eq!(combine(&Term::Group(vec![]), &[]).unwrap(), 0.0);
        let no_obs: [&[f64]; 2] = [&[], &[]];
        assert_eq!(product_sum(&no_obs).unwrap(), 0.0);
    }

    #[test]
    fn effective_values_multiply_members() {
        assert_eq!(effective_values(&a2()).unwrap(), vec![1.0, 4.0, 9.0]);
        assert_eq!(effective_values(&a1()).unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(effective_values(&Term::Interaction(vec![])).is_err());
    }
}
