use std::fmt;

use serde::{Deserialize, Serialize};

/// Crisp points delimiting the five classes of one indicator.
pub const BOUNDARY_POINTS: usize = 6;

pub const DEFAULT_ATTENTION_LIMIT: usize = 5;

/// Ordinal health class, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLabel {
    Poor,
    Fair,
    Medium,
    Good,
    Excellent,
}

impl ClassLabel {
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Poor,
        Self::Fair,
        Self::Medium,
        Self::Good,
        Self::Excellent,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Medium => "medium",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorGrade {
    pub code: String,
    pub label: ClassLabel,
    pub value: f64,
}

/// Grades one direction-unified value against its boundary row without any
/// fuzzy machinery. Each class needs the value strictly above its lower
/// boundary.
pub fn grade_indicator(value: f64, bounds: &[f64; BOUNDARY_POINTS]) -> ClassLabel {
    let [_, b1, b2, b3, b4, _] = *bounds;
    if value > b4 {
        ClassLabel::Excellent
    } else if value > b3 {
        ClassLabel::Good
    } else if value > b2 {
        ClassLabel::Medium
    } else if value > b1 {
        ClassLabel::Fair
    } else {
        ClassLabel::Poor
    }
}

/// Indicators graded medium or worse, worst first, at most `limit` of them.
/// Indicators sharing a class keep their input order.
pub fn attention_list(grades: &[IndicatorGrade], limit: usize) -> Vec<IndicatorGrade> {
    let mut flagged: Vec<IndicatorGrade> = grades
        .iter()
        .filter(|g| g.label <= ClassLabel::Medium)
        .cloned()
        .collect();
    flagged.sort_by_key(|g| g.label);
    flagged.truncate(limit);
    flagged
}
