//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/selection code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::{ProbeRun, ResponseRun, RunOutput};
use crate::domain::SelectConfig;
use crate::report::{ResidualRow, compute_residuals, worst_residuals};

/// Residual rows shown per response.
const TOP_RESIDUALS: usize = 5;

/// Format the full run summary (dataset + per-response selection).
pub fn format_run_summary(output: &RunOutput, config: &SelectConfig) -> String {
    let mut out = String::new();

    out.push_str("=== rgr - forward selection ===\n");
    out.push_str(&format!("Data: {}\n", config.data_path.display()));
    out.push_str(&format!(
        "Rows: {} (n={})\n",
        output.dataset.rows(),
        output.dataset.n_rows()
    ));
    if let Some(check) = &output.check {
        out.push_str(&format!("Check rows: {} (n={})\n", check.rows(), check.n_rows()));
    }
    out.push_str(&format!("Variables: {}\n", config.variables.join(", ")));
    if config.intercept {
        out.push_str("Constant term: on\n");
    }
    out.push('\n');

    for run in &output.runs {
        out.push_str(&format_response(run));
        out.push('\n');
    }

    out
}

/// Format one response's selection steps, equation and residuals.
pub fn format_response(run: &ResponseRun) -> String {
    let mut out = String::new();

    out.push_str(&format!("[{}]\n", run.response));
    out.push_str("Steps:\n");
    if run.selection.steps.is_empty() {
        out.push_str("  (no term improved the fit)\n");
    }
    for (i, step) in run.selection.steps.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {:<12} delta={:.6}\n", i + 1, step.label, step.metric));
    }

    out.push_str(&format!("Equation: {}\n", run.selection.model.describe()));
    out.push_str(&format!("Coefficients: {}\n", fmt_vec(&run.fit.coefficients)));
    out.push_str(&format!("Delta: {}\n", fmt_metric(run.fit.metric)));
    if let Some(check) = &run.holdout {
        out.push_str(&format!(
            "Check delta: {} (n={})\n",
            fmt_metric(check.metric),
            check.n_rows
        ));
    }

    let rows = compute_residuals(run.selection.model.response(), &run.fit.predicted);
    let worst = worst_residuals(&rows, TOP_RESIDUALS);
    if !worst.is_empty() {
        out.push_str("Largest residuals:\n");
        out.push_str(&format_table(&worst));
    }

    out
}

/// Format a fixed-term fit.
pub fn format_probe(run: &ProbeRun) -> String {
    let mut out = String::new();
    out.push_str(&format!("[{}]\n", run.response));
    out.push_str(&format!("Equation: {}\n", run.model.describe()));
    out.push_str(&format!("Coefficients: {}\n", fmt_vec(&run.fit.coefficients)));
    out.push_str(&format!("Delta: {}\n", fmt_metric(run.fit.metric)));
    out
}

/// One candidate label per line, numbered in enumeration order.
pub fn format_candidates(labels: &[(String, Vec<String>)]) -> String {
    let mut out = String::new();
    for (i, (label, members)) in labels.iter().enumerate() {
        out.push_str(&format!("{:>3}. {:<16} [{}]\n", i + 1, label, members.join(" * ")));
    }
    out
}

fn format_table(rows: &[ResidualRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {:>5} {:>14} {:>14} {:>14}\n",
        "row", "observed", "predicted", "residual"
    ));
    out.push_str(&format!("  {:->5} {:->14} {:->14} {:->14}\n", "", "", "", ""));
    for r in rows {
        out.push_str(&format!(
            "  {:>5} {:>14.6} {:>14.6} {:>14.6}\n",
            r.row, r.observed, r.predicted, r.residual
        ));
    }
    out
}

fn fmt_metric(v: f64) -> String {
    if v.is_finite() { format!("{v:.6}") } else { "inf".to_string() }
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Term;
    use crate::models::EquationModel;

    #[test]
    fn probe_output_lists_equation_and_coefficients() {
        let mut model = EquationModel::new(vec![2.0, 4.0]);
        model.add_term("T", Term::Vector(vec![1.0, 2.0])).unwrap();
        let fit = model.fit().unwrap();
        let text = format_probe(&ProbeRun {
            response: "PX".to_string(),
            model,
            fit,
        });

        assert!(text.starts_with("[PX]\n"));
        assert!(text.contains("Equation: T = P"));
        assert!(text.contains("Coefficients: [2.000000]"));
        assert!(text.contains("Delta: 0.000000"));
    }

    #[test]
    fn candidates_are_numbered() {
        let labels = vec![
            ("T".to_string(), vec!["T".to_string()]),
            ("TD".to_string(), vec!["T".to_string(), "D".to_string()]),
        ];
        let text = format_candidates(&labels);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("TD"));
        assert!(lines[1].contains("[T * D]"));
    }

    #[test]
    fn infinite_metric_is_printed_as_inf() {
        assert_eq!(fmt_metric(f64::INFINITY), "inf");
        assert_eq!(fmt_vec(&[1.0, -0.5]), "[1.000000, -0.500000]");
    }
}
