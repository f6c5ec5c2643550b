//! Reporting utilities: per-observation residuals and formatted terminal output.

pub mod format;

pub use format::*;

/// Fitted value and residual for one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualRow {
    /// Row index within the loaded range.
    pub row: usize,
    pub observed: f64,
    pub predicted: f64,
    pub residual: f64,
}

/// Pair observed and predicted values into residual rows.
pub fn compute_residuals(observed: &[f64], predicted: &[f64]) -> Vec<ResidualRow> {
    observed
        .iter()
        .zip(predicted.iter())
        .enumerate()
        .map(|(row, (&y, &y_fit))| ResidualRow {
            row,
            observed: y,
            predicted: y_fit,
            residual: y - y_fit,
        })
        .collect()
}

/// Rows with the largest absolute residuals, largest first.
pub fn worst_residuals(rows: &[ResidualRow], top_n: usize) -> Vec<ResidualRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        b.residual
            .abs()
            .partial_cmp(&a.residual.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_residuals_basic() {
        let rows = compute_residuals(&[10.0, 20.0], &[9.5, 21.0]);
        assert_eq!(rows.len(), 2);
        assert!((rows[0].residual - 0.5).abs() < 1e-12);
        assert!((rows[1].residual + 1.0).abs() < 1e-12);
        assert_eq!(rows[1].row, 1);
    }

    #[test]
    fn worst_residuals_sorts_by_magnitude() {
        let rows = compute_residuals(&[1.0, 2.0, 3.0], &[1.1, 4.0, 2.5]);
        let worst = worst_residuals(&rows, 2);
        assert_eq!(worst.len(), 2);
        assert_eq!(worst[0].row, 1);
        assert_eq!(worst[1].row, 2);
    }
}
