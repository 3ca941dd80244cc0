//! CSV-to-report pipeline tests and the two rendered plots.

use std::io::Write;

use tempfile::NamedTempFile;

use bestimate::data::load_csv;
use bestimate::output;
use bestimate::{BestEstimator, Config};

fn write_trial_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "subject,group,response").unwrap();

    // Deterministic pseudo-noise; treatment shifted by +5.
    for i in 0..40 {
        let noise = ((i * 37) % 11) as f64 * 0.3;
        writeln!(file, "s{},control,{:.2}", i, 50.0 + noise).unwrap();
        writeln!(file, "t{},treatment,{:.2}", i, 55.0 + noise).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn csv_to_report() {
    let file = write_trial_csv();
    let data = load_csv(file.path(), "group", "response").unwrap();

    assert_eq!(data.len(), 80);
    assert_eq!(data.n_groups(), 2);

    let report = BestEstimator::with_config(Config::quick())
        .seed(3)
        .analyze(&data)
        .unwrap();

    let diff = report.difference("treatment").unwrap();
    assert!(
        diff.difference.median > 3.0 && diff.difference.median < 7.0,
        "difference was {}",
        diff.difference.median
    );
    assert!(diff.excludes_zero());
    assert_eq!(report.metadata.source, Some(file.path().to_string_lossy().to_string()));
}

#[test]
fn rendered_report_contains_both_forest_plots() {
    let file = write_trial_csv();
    let data = load_csv(file.path(), "group", "response").unwrap();
    let report = BestEstimator::with_config(Config::quick())
        .seed(4)
        .analyze(&data)
        .unwrap();

    let rendered = output::format_report(&report);

    assert!(rendered.contains("Group means"));
    assert!(rendered.contains("Differences vs control"));
    // One interval bar per group in the first plot, one per difference
    // in the second.
    let bars = rendered.matches('\u{251C}').count();
    assert_eq!(bars, report.groups.len() + report.differences.len());
}

#[test]
fn json_report_parses_back() {
    let file = write_trial_csv();
    let data = load_csv(file.path(), "group", "response").unwrap();
    let report = BestEstimator::with_config(Config::quick())
        .seed(5)
        .analyze(&data)
        .unwrap();

    let json = output::to_json_pretty(&report).unwrap();
    let back: bestimate::Report = serde_json::from_str(&json).unwrap();

    assert_eq!(back.groups.len(), 2);
    assert_eq!(back.reference, "control");
}
