use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use ecograde::{ClassLabel, ObservationRecord, StrategyRegistry, assess};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Case {
    subsystem: String,
    sample: String,
    target: ClassLabel,
    groups: BTreeMap<String, ClassLabel>,
}

fn cases() -> Vec<Case> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let path = root
        .join("..")
        .join("..")
        .join("data")
        .join("grading")
        .join("builtin_grades.json");
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
}

fn sample_values(registry: &StrategyRegistry, subsystem: &str, label: &str) -> Vec<f64> {
    registry
        .strategy(subsystem)
        .unwrap_or_else(|e| panic!("{subsystem}: {e}"))
        .samples
        .iter()
        .find(|s| s.label == label)
        .map(|s| s.values.clone())
        .unwrap_or_else(|| panic!("{subsystem}: no sample {label}"))
}

#[test]
fn builtin_samples_grade_as_recorded() {
    let registry = StrategyRegistry::builtin().unwrap_or_else(|e| panic!("builtin: {e}"));
    let cases = cases();
    assert_eq!(cases.len(), 15);

    for case in cases {
        let values = sample_values(&registry, &case.subsystem, &case.sample);
        let report = registry
            .evaluate(&case.subsystem, &values)
            .unwrap_or_else(|e| panic!("{} {}: {e}", case.subsystem, case.sample));

        assert_eq!(
            report.target, case.target,
            "{} {}: target label",
            case.subsystem, case.sample
        );
        assert_eq!(report.groups.len(), case.groups.len());
        for (group, expected) in &case.groups {
            assert_eq!(
                report.group(group),
                Some(*expected),
                "{} {}: group {group}",
                case.subsystem,
                case.sample
            );
        }
        assert_eq!(report.indicators.len(), values.len());
        assert!(report.attention.len() <= ecograde::DEFAULT_ATTENTION_LIMIT);
    }
}

#[test]
fn latest_year_assessed_across_subsystems() {
    let registry = StrategyRegistry::builtin().unwrap_or_else(|e| panic!("builtin: {e}"));
    let record: ObservationRecord = ["synergy", "resource", "service"]
        .into_iter()
        .map(|name| (name.to_string(), sample_values(&registry, name, "2024")))
        .collect();

    let reports = assess(&registry, &record).unwrap_or_else(|e| panic!("assess: {e}"));
    let targets: Vec<_> = reports.iter().map(|(name, r)| (name.as_str(), r.target)).collect();
    assert_eq!(
        targets,
        [
            ("resource", ClassLabel::Medium),
            ("service", ClassLabel::Excellent),
            ("synergy", ClassLabel::Good),
        ]
    );
}
