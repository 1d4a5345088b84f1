use std::collections::BTreeMap;

use ecograde_sort::GradeReport;
use ecograde_strategy::{StrategyError, StrategyRegistry};

/// One observation across subsystems: subsystem name → raw indicator vector.
pub type ObservationRecord = BTreeMap<String, Vec<f64>>;

/// Grades every subsystem present in `record`, stopping at the first unknown
/// subsystem or malformed vector.
pub fn assess(
    registry: &StrategyRegistry,
    record: &ObservationRecord,
) -> Result<BTreeMap<String, GradeReport>, StrategyError> {
    let reports = record
        .iter()
        .map(|(name, values)| Ok((name.clone(), registry.evaluate(name, values)?)))
        .collect::<Result<BTreeMap<_, _>, StrategyError>>()?;
    tracing::debug!(subsystems = reports.len(), "ecosystem assessed");
    Ok(reports)
}
