use ecograde_core::{ClassLabel, IndicatorGrade};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupGrade {
    pub name: String,
    pub label: ClassLabel,
}

/// Full grading of one observation of one subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub subsystem: String,
    pub target: ClassLabel,
    /// Criterion-layer labels in configuration order.
    pub groups: Vec<GroupGrade>,
    pub indicators: Vec<IndicatorGrade>,
    /// Indicators graded medium or worse, worst first.
    pub attention: Vec<IndicatorGrade>,
}

impl GradeReport {
    pub fn group(&self, name: &str) -> Option<ClassLabel> {
        self.groups.iter().find(|g| g.name == name).map(|g| g.label)
    }
}
