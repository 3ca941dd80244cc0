//! JSON serialization for analysis reports.

use crate::report::Report;

/// Serialize a Report to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for Report).
pub fn to_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a Report to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for Report).
pub fn to_json_pretty(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Summary;
    use crate::report::{
        ConvergenceQuality, Diagnostics, DifferenceEstimate, GroupEstimate, Report, RunMetadata,
    };

    fn summary(mid: f64) -> Summary {
        Summary {
            mean: mid,
            sd: 1.0,
            median: mid,
            hpd_low: mid - 1.0,
            hpd_high: mid + 1.0,
        }
    }

    fn make_report() -> Report {
        Report {
            groups: vec![GroupEstimate {
                label: "control".to_string(),
                index: 0,
                n: 10,
                location: summary(100.0),
                scale: summary(2.0),
            }],
            differences: vec![DifferenceEstimate {
                label: "treatment".to_string(),
                reference: "control".to_string(),
                difference: summary(3.0),
                effect_size: summary(1.5),
                prob_positive: 0.99,
            }],
            normality: summary(20.0),
            reference: "control".to_string(),
            hpd_mass: 0.95,
            quality: ConvergenceQuality::Good,
            diagnostics: Diagnostics {
                rhat_max: 1.0,
                ess_min: 900.0,
                parameters: Vec::new(),
                acceptance_rates: vec![0.44],
                warnings: Vec::new(),
            },
            metadata: RunMetadata {
                chains: 1,
                draws_per_chain: 1000,
                warmup: 500,
                thin: 1,
                seed: 42,
                n_observations: 20,
                source: Some("trial.csv".to_string()),
                runtime_secs: 0.1,
            },
        }
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&make_report()).unwrap();

        assert!(json.contains("\"reference\":\"control\""));
        assert!(json.contains("\"prob_positive\":0.99"));
        assert!(json.contains("\"quality\":\"Good\""));
    }

    #[test]
    fn test_json_round_trip() {
        let report = make_report();
        let json = to_json_pretty(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(back.reference, report.reference);
        assert_eq!(back.groups.len(), 1);
        assert_eq!(back.differences[0].prob_positive, 0.99);
        assert_eq!(back.metadata.seed, 42);
    }
}
