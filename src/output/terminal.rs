//! Terminal output formatting with colors and box drawing.
//!
//! Renders the two forest plots of a BEST analysis: per-group posterior
//! locations, and per-group differences from the reference with a zero
//! guide. Both plots share one horizontal scale per section so intervals
//! are visually comparable.

use colored::Colorize;

use crate::analysis::Summary;
use crate::report::{ConvergenceQuality, Diagnostics, Report};

/// Character width of the forest plot axis.
const PLOT_WIDTH: usize = 40;

/// Format a full report for human-readable terminal output.
///
/// Shows run context, the group-estimate forest plot and the difference
/// forest plot. The diagnostics section is appended when
/// `BESTIMATE_VERBOSE` is set.
pub fn format_report(report: &Report) -> String {
    let mut out = String::new();
    let sep = "\u{2500}".repeat(62);

    out.push_str("bestimate\n");
    out.push_str(&sep);
    out.push_str("\n\n");

    out.push_str(&format!(
        "  Observations: {} across {} groups   Reference: {}\n",
        report.metadata.n_observations,
        report.groups.len(),
        report.reference.bold(),
    ));
    out.push_str(&format!(
        "  Chains: {} \u{00D7} {} draws   Convergence: {}\n\n",
        report.metadata.chains,
        report.metadata.draws_per_chain,
        format_quality(report.quality),
    ));

    out.push_str(&format!(
        "  Group means ({:.0}% HPD)\n\n",
        report.hpd_mass * 100.0
    ));
    out.push_str(&format_group_forest(report));

    if !report.differences.is_empty() {
        out.push_str(&format!(
            "\n  Differences vs {} ({:.0}% HPD)\n\n",
            report.reference,
            report.hpd_mass * 100.0
        ));
        out.push_str(&format_difference_forest(report));
    }

    out.push_str(&format!(
        "\n  Normality \u{03BD}: {:.1} [{:.1}, {:.1}]\n",
        report.normality.median, report.normality.hpd_low, report.normality.hpd_high,
    ));

    if !report.diagnostics.warnings.is_empty() {
        out.push_str(&format!("\n  {} Warnings\n", "\u{26A0}".yellow()));
        for warning in &report.diagnostics.warnings {
            out.push_str(&format!("    \u{2022} {}\n", warning));
        }
    }

    if super::is_verbose() {
        out.push_str(&format_diagnostics_section(&report.diagnostics));
    }

    out
}

/// Format the sampler diagnostics section for verbose output.
pub fn format_diagnostics_section(diagnostics: &Diagnostics) -> String {
    let mut out = String::new();
    let sep = "\u{2500}".repeat(62);

    out.push('\n');
    out.push_str(&sep);
    out.push_str("\n\n");
    out.push_str("  Sampler Diagnostics\n\n");

    out.push_str(&format!(
        "    {:<16} {:>8} {:>10}\n",
        "parameter", "R-hat", "ESS"
    ));
    for p in &diagnostics.parameters {
        let rhat = format!("{:.3}", p.rhat);
        let rhat = if p.rhat > crate::constants::RHAT_WARN {
            rhat.red().to_string()
        } else {
            rhat
        };
        out.push_str(&format!(
            "    {:<16} {:>8} {:>10.0}\n",
            p.name, rhat, p.ess
        ));
    }

    let rates: Vec<String> = diagnostics
        .acceptance_rates
        .iter()
        .map(|r| format!("{:.0}%", r * 100.0))
        .collect();
    out.push_str(&format!("\n    Acceptance:   {}\n", rates.join(", ")));

    out
}

fn format_quality(quality: ConvergenceQuality) -> String {
    match quality {
        ConvergenceQuality::Good => "Good".green().to_string(),
        ConvergenceQuality::Fair => "Fair".yellow().to_string(),
        ConvergenceQuality::Poor => "Poor".red().bold().to_string(),
    }
}

fn format_group_forest(report: &Report) -> String {
    let summaries: Vec<(&str, &Summary)> = report
        .groups
        .iter()
        .map(|g| (g.label.as_str(), &g.location))
        .collect();
    format_forest(&summaries, None, |s| {
        format!(
            "{:>10.2} [{:>8.2}, {:>8.2}]",
            s.median, s.hpd_low, s.hpd_high
        )
    })
}

fn format_difference_forest(report: &Report) -> String {
    let summaries: Vec<(&str, &Summary)> = report
        .differences
        .iter()
        .map(|d| (d.label.as_str(), &d.difference))
        .collect();

    let mut out = format_forest(&summaries, Some(0.0), |s| {
        format!(
            "{:>+9.2} [{:>+8.2}, {:>+8.2}]",
            s.median, s.hpd_low, s.hpd_high
        )
    });

    // Probability-of-direction column, appended per row.
    let mut rows: Vec<String> = out.lines().map(str::to_string).collect();
    for (row, diff) in rows.iter_mut().zip(&report.differences) {
        let pd = format!("  P(>0) {:>5.1}%", diff.prob_positive * 100.0);
        if diff.excludes_zero() {
            row.push_str(&pd.yellow().to_string());
        } else {
            row.push_str(&pd);
        }
    }
    out = rows.join("\n");
    out.push('\n');
    out
}

/// Render labeled HPD intervals on a shared axis.
///
/// Every row gets `├──●──┤` spanning its interval, positioned on a common
/// scale covering all intervals. `guide` marks a vertical reference value
/// (the zero line of the difference plot) where it falls inside the axis.
fn format_forest(
    summaries: &[(&str, &Summary)],
    guide: Option<f64>,
    numbers: impl Fn(&Summary) -> String,
) -> String {
    if summaries.is_empty() {
        return String::new();
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &(_, s) in summaries {
        lo = lo.min(s.hpd_low);
        hi = hi.max(s.hpd_high);
    }
    if let Some(g) = guide {
        lo = lo.min(g);
        hi = hi.max(g);
    }
    // Guard a degenerate axis (all intervals identical points).
    if hi - lo < f64::EPSILON {
        hi = lo + 1.0;
    }
    let pad = (hi - lo) * 0.05;
    lo -= pad;
    hi += pad;

    let position = |x: f64| -> usize {
        (((x - lo) / (hi - lo)) * (PLOT_WIDTH - 1) as f64).round() as usize
    };

    let label_width = summaries
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for &(label, s) in summaries {
        let mut cells = vec![' '; PLOT_WIDTH];

        if let Some(g) = guide {
            cells[position(g)] = '\u{250A}'; // ┊
        }

        let a = position(s.hpd_low);
        let b = position(s.hpd_high);
        for cell in cells.iter_mut().take(b).skip(a + 1) {
            *cell = '\u{2500}'; // ─
        }
        cells[a] = '\u{251C}'; // ├
        cells[b] = '\u{2524}'; // ┤
        cells[position(s.median)] = '\u{25CF}'; // ●

        let bar: String = cells.into_iter().collect();
        out.push_str(&format!(
            "    {:<width$}  {}  {}\n",
            label,
            bar,
            numbers(s),
            width = label_width,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        DifferenceEstimate, GroupEstimate, ParameterDiagnostic, RunMetadata,
    };

    fn summary(lo: f64, mid: f64, hi: f64) -> Summary {
        Summary {
            mean: mid,
            sd: 1.0,
            median: mid,
            hpd_low: lo,
            hpd_high: hi,
        }
    }

    fn make_report() -> Report {
        Report {
            groups: vec![
                GroupEstimate {
                    label: "control".to_string(),
                    index: 0,
                    n: 30,
                    location: summary(99.0, 100.0, 101.0),
                    scale: summary(1.5, 2.0, 2.5),
                },
                GroupEstimate {
                    label: "treatment".to_string(),
                    index: 1,
                    n: 30,
                    location: summary(102.0, 103.0, 104.0),
                    scale: summary(1.5, 2.0, 2.5),
                },
            ],
            differences: vec![DifferenceEstimate {
                label: "treatment".to_string(),
                reference: "control".to_string(),
                difference: summary(1.5, 3.0, 4.5),
                effect_size: summary(0.7, 1.5, 2.3),
                prob_positive: 0.998,
            }],
            normality: summary(5.0, 18.0, 45.0),
            reference: "control".to_string(),
            hpd_mass: 0.95,
            quality: ConvergenceQuality::Good,
            diagnostics: Diagnostics {
                rhat_max: 1.01,
                ess_min: 1500.0,
                parameters: vec![ParameterDiagnostic {
                    name: "mu[control]".to_string(),
                    rhat: 1.01,
                    ess: 1500.0,
                }],
                acceptance_rates: vec![0.44, 0.45],
                warnings: Vec::new(),
            },
            metadata: RunMetadata {
                chains: 2,
                draws_per_chain: 1000,
                warmup: 500,
                thin: 1,
                seed: 42,
                n_observations: 60,
                source: None,
                runtime_secs: 0.5,
            },
        }
    }

    #[test]
    fn test_format_report_contains_both_plots() {
        let output = format_report(&make_report());

        assert!(output.contains("bestimate"));
        assert!(output.contains("Group means"));
        assert!(output.contains("Differences vs control"));
        assert!(output.contains("treatment"));
        assert!(output.contains("P(>0)"));
        assert!(output.contains("\u{25CF}"));
    }

    #[test]
    fn test_difference_plot_has_zero_guide() {
        let output = format_report(&make_report());
        assert!(output.contains('\u{250A}'));
    }

    #[test]
    fn test_forest_rows_align() {
        let report = make_report();
        let plot = format_group_forest(&report);
        let lines: Vec<&str> = plot.lines().collect();

        assert_eq!(lines.len(), 2);
        // Bars occupy the same columns in every row.
        let bar_start = |l: &str| l.find('\u{251C}').unwrap();
        assert!(bar_start(lines[0]) < bar_start(lines[1]));
    }

    #[test]
    fn test_diagnostics_section() {
        let report = make_report();
        let output = format_diagnostics_section(&report.diagnostics);

        assert!(output.contains("Sampler Diagnostics"));
        assert!(output.contains("mu[control]"));
        assert!(output.contains("Acceptance"));
    }

    #[test]
    fn test_degenerate_axis_does_not_panic() {
        let s = summary(5.0, 5.0, 5.0);
        let rendered = format_forest(&[("only", &s)], None, |_| String::new());
        assert!(rendered.contains('\u{25CF}'));
    }
}
