use std::collections::HashSet;

use ecograde_core::BOUNDARY_POINTS;
use serde::{Deserialize, Serialize};

use crate::error::SortError;

/// Allowed drift of the weight total from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Direction-unification rule turning one raw indicator into benefit type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    #[default]
    Identity,
    /// Cost-type indicator: `max - value`.
    CostInvert { max: f64 },
    /// Centered indicator: `peak - |value - best|`, `peak` defaulting to `best`.
    Center {
        best: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        peak: Option<f64>,
    },
}

impl Transform {
    pub const fn center(best: f64) -> Self {
        Self::Center { best, peak: None }
    }

    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Self::Identity => value,
            Self::CostInvert { max } => max - value,
            Self::Center { best, peak } => peak.unwrap_or(best) - (value - best).abs(),
        }
    }

    fn is_finite(&self) -> bool {
        match *self {
            Self::Identity => true,
            Self::CostInvert { max } => max.is_finite(),
            Self::Center { best, peak } => best.is_finite() && peak.is_none_or(f64::is_finite),
        }
    }
}

/// Which crisp span the threshold fractions are taken of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSpan {
    /// One class width, a fifth of the boundary range.
    #[default]
    ClassWidth,
    FullRange,
}

/// Indifference, preference and veto offsets as fractions of a span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub indifference: f64,
    pub preference: f64,
    pub veto: f64,
    #[serde(default)]
    pub span: ThresholdSpan,
}

impl ThresholdPolicy {
    pub const fn new() -> Self {
        Self {
            indifference: 0.25,
            preference: 0.5,
            veto: 0.75,
            span: ThresholdSpan::ClassWidth,
        }
    }

    /// Share of the full boundary range one unit of fraction stands for.
    #[allow(clippy::cast_precision_loss)]
    pub const fn span_factor(&self) -> f64 {
        match self.span {
            ThresholdSpan::ClassWidth => 1.0 / (BOUNDARY_POINTS - 1) as f64,
            ThresholdSpan::FullRange => 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), SortError> {
        let Self {
            indifference: q,
            preference: p,
            veto: v,
            ..
        } = *self;
        let finite = q.is_finite() && p.is_finite() && v.is_finite();
        if !finite || q < 0.0 || v > 1.0 || !(q < p && p < v) {
            return Err(SortError::InvalidConfig(format!(
                "thresholds need 0 <= indifference < preference < veto <= 1, got {q}/{p}/{v}"
            )));
        }
        Ok(())
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Named subset of indicators graded on its own (criterion layer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionGroup {
    pub name: String,
    pub indices: Vec<usize>,
}

impl CriterionGroup {
    pub fn new(name: impl Into<String>, indices: impl Into<Vec<usize>>) -> Self {
        Self {
            name: name.into(),
            indices: indices.into(),
        }
    }
}

/// Read-only grading table of one subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub name: String,
    /// Indicator codes; empty means positional codes `I1`, `I2`, ...
    #[serde(default)]
    pub codes: Vec<String>,
    pub boundaries: Vec<[f64; BOUNDARY_POINTS]>,
    pub weights: Vec<f64>,
    #[serde(default)]
    pub groups: Vec<CriterionGroup>,
    pub theta: f64,
    pub transforms: Vec<Transform>,
    #[serde(default)]
    pub thresholds: ThresholdPolicy,
}

impl EvaluationConfig {
    /// Config with identity transforms, no groups and default thresholds.
    pub fn new(
        name: impl Into<String>,
        boundaries: Vec<[f64; BOUNDARY_POINTS]>,
        weights: Vec<f64>,
        theta: f64,
    ) -> Self {
        let transforms = vec![Transform::Identity; boundaries.len()];
        Self {
            name: name.into(),
            codes: Vec::new(),
            boundaries,
            weights,
            groups: Vec::new(),
            theta,
            transforms,
            thresholds: ThresholdPolicy::new(),
        }
    }

    #[must_use]
    pub fn with_groups(mut self, groups: Vec<CriterionGroup>) -> Self {
        self.groups = groups;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, index: usize, transform: Transform) -> Self {
        if let Some(slot) = self.transforms.get_mut(index) {
            *slot = transform;
        }
        self
    }

    #[must_use]
    pub fn with_codes(mut self, codes: Vec<String>) -> Self {
        self.codes = codes;
        self
    }

    pub fn indicator_count(&self) -> usize {
        self.boundaries.len()
    }

    pub fn code(&self, index: usize) -> String {
        self.codes
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("I{}", index + 1))
    }

    pub fn group(&self, name: &str) -> Option<&CriterionGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Sizes of the groups when they tile the indicators contiguously in
    /// order, otherwise `None`.
    pub fn contiguous_group_sizes(&self) -> Option<Vec<usize>> {
        let mut next = 0;
        let mut sizes = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            if group.indices.iter().copied().ne(next..next + group.indices.len()) {
                return None;
            }
            next += group.indices.len();
            sizes.push(group.indices.len());
        }
        (next == self.indicator_count() && !sizes.is_empty()).then_some(sizes)
    }

    pub fn validate(&self) -> Result<(), SortError> {
        let n = self.indicator_count();
        if n == 0 {
            return Err(invalid("at least one indicator is required"));
        }

        for (i, row) in self.boundaries.iter().enumerate() {
            if row.iter().any(|b| !b.is_finite()) {
                return Err(invalid(format!("boundary row {i} has a non-finite point")));
            }
            if row.windows(2).any(|w| matches!(w, [a, b] if b < a)) {
                return Err(invalid(format!("boundary row {i} is not non-decreasing")));
            }
        }

        if self.weights.len() != n {
            return Err(invalid(format!(
                "{} weights for {n} indicators",
                self.weights.len()
            )));
        }
        if let Some(i) = self.weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid(format!("weight {i} is negative or non-finite")));
        }
        let total: f64 = self.weights.iter().sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("weights sum to {total}, expected 1")));
        }

        if !(self.theta > 0.0 && self.theta < 1.0) {
            return Err(invalid(format!("theta must lie in (0, 1), got {}", self.theta)));
        }

        if self.transforms.len() != n {
            return Err(invalid(format!(
                "{} transforms for {n} indicators",
                self.transforms.len()
            )));
        }
        if let Some(i) = self.transforms.iter().position(|t| !t.is_finite()) {
            return Err(invalid(format!("transform {i} has a non-finite parameter")));
        }

        if !self.codes.is_empty() && self.codes.len() != n {
            return Err(invalid(format!(
                "{} indicator codes for {n} indicators",
                self.codes.len()
            )));
        }

        let mut names = HashSet::new();
        let mut seen = HashSet::new();
        for group in &self.groups {
            if !names.insert(group.name.as_str()) {
                return Err(invalid(format!("duplicate group {}", group.name)));
            }
            if group.indices.is_empty() {
                return Err(invalid(format!("group {} is empty", group.name)));
            }
            for &index in &group.indices {
                if index >= n {
                    return Err(invalid(format!(
                        "group {} references indicator {index} of {n}",
                        group.name
                    )));
                }
                if !seen.insert(index) {
                    return Err(invalid(format!(
                        "indicator {index} belongs to more than one group"
                    )));
                }
            }
        }

        self.thresholds.validate()
    }
}

fn invalid(message: impl Into<String>) -> SortError {
    SortError::InvalidConfig(message.into())
}
