//! Interval-valued Fermatean fuzzy outranking (ELECTRE-TRI style) sorting.
//!
//! Each indicator value is min-max normalised against its own boundary row
//! and fuzzified as `([s, s], [1 - s, 1 - s])`. For every class boundary the
//! engine builds concordance and discordance degrees, folds them into a
//! credibility and assigns the best class whose credibility reaches the
//! fuzzified acceptance threshold.

use ecograde_core::{
    BOUNDARY_POINTS, ClassLabel, DEFAULT_ATTENTION_LIMIT, FFN_EPSILON, Ffn, IndicatorGrade,
    attention_list, grade_indicator,
};
use rayon::prelude::*;

use crate::config::{EvaluationConfig, ThresholdPolicy, Transform};
use crate::error::SortError;
use crate::types::{GradeReport, GroupGrade};

/// Min-max normalisation into `[0, 1]`. A degenerate range maps the minimum
/// itself to 0.5, anything above to 1 and anything below to 0.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let s = if max - min < FFN_EPSILON {
        if (value - min).abs() < f64::EPSILON {
            0.5
        } else if value > min {
            1.0
        } else {
            0.0
        }
    } else {
        (value - min) / (max - min)
    };
    s.clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
struct PreparedIndicator {
    min: f64,
    max: f64,
    transform: Transform,
    crisp_bounds: [f64; BOUNDARY_POINTS],
    bounds: [Ffn; BOUNDARY_POINTS],
    indifference: Ffn,
    preference: Ffn,
    veto: Ffn,
}

impl PreparedIndicator {
    fn new(row: [f64; BOUNDARY_POINTS], transform: Transform, policy: &ThresholdPolicy) -> Self {
        let min = row.first().copied().unwrap_or_default();
        let max = row.last().copied().unwrap_or_default();
        let range = max - min;
        let offset = |fraction: f64| {
            if range < FFN_EPSILON {
                Ffn::ZERO
            } else {
                Ffn::crisp(normalize(fraction * policy.span_factor() * range, 0.0, range))
            }
        };

        Self {
            min,
            max,
            transform,
            crisp_bounds: row,
            bounds: row.map(|b| Ffn::crisp(normalize(b, min, max))),
            indifference: offset(policy.indifference),
            preference: offset(policy.preference),
            veto: offset(policy.veto),
        }
    }

    fn fuzzify(&self, unified: f64) -> Ffn {
        Ffn::crisp(normalize(unified, self.min, self.max))
    }

    /// Degree to which `x` supports outranking `b`.
    fn concordance(&self, x: Ffn, b: Ffn) -> Ffn {
        let x_p = x.add(self.preference);
        if x_p < b {
            return Ffn::ZERO;
        }
        if x.add(self.indifference) >= b {
            return Ffn::ONE;
        }
        let denominator = self.preference.subtract(self.indifference);
        if denominator.is_zero() {
            return Ffn::ZERO;
        }
        x_p.subtract(b).divide(denominator).clamp()
    }

    /// Degree to which `x` vetoes outranking `b`.
    fn discordance(&self, x: Ffn, b: Ffn) -> Ffn {
        let x_p = x.add(self.preference);
        if x_p >= b {
            return Ffn::ZERO;
        }
        if x.add(self.veto) < b {
            return Ffn::ONE;
        }
        let denominator = self.veto.subtract(self.preference);
        if denominator.is_zero() {
            return Ffn::ZERO;
        }
        b.subtract(x_p).divide(denominator).clamp()
    }
}

#[derive(Debug, Clone, Copy)]
struct Member {
    index: usize,
    weight: f64,
}

#[derive(Debug, Clone)]
struct PreparedGroup {
    name: String,
    members: Vec<Member>,
}

/// Validated, pre-fuzzified grading table of one subsystem.
#[derive(Debug, Clone)]
pub struct SortingEngine {
    config: EvaluationConfig,
    indicators: Vec<PreparedIndicator>,
    target: Vec<Member>,
    groups: Vec<PreparedGroup>,
    threshold: Ffn,
}

impl SortingEngine {
    pub fn new(config: EvaluationConfig) -> Result<Self, SortError> {
        config.validate()?;

        let indicators = config
            .boundaries
            .iter()
            .zip(&config.transforms)
            .map(|(row, transform)| PreparedIndicator::new(*row, *transform, &config.thresholds))
            .collect();
        let target = config
            .weights
            .iter()
            .enumerate()
            .map(|(index, &weight)| Member { index, weight })
            .collect();
        let groups = config
            .groups
            .iter()
            .map(|group| {
                let raw: Vec<f64> = group
                    .indices
                    .iter()
                    .map(|&i| config.weights.get(i).copied().unwrap_or_default())
                    .collect();
                let total: f64 = raw.iter().sum();
                if total <= 0.0 {
                    tracing::warn!(
                        subsystem = %config.name,
                        group = %group.name,
                        "criterion group has zero total weight"
                    );
                }
                let members = group
                    .indices
                    .iter()
                    .zip(raw)
                    .map(|(&index, w)| Member {
                        index,
                        weight: if total > 0.0 { w / total } else { 0.0 },
                    })
                    .collect();
                PreparedGroup {
                    name: group.name.clone(),
                    members,
                }
            })
            .collect();
        let threshold = Ffn::crisp(config.theta);

        Ok(Self {
            config,
            indicators,
            target,
            groups,
            threshold,
        })
    }

    pub const fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators.len()
    }

    /// Applies each indicator's transform after checking the vector shape.
    pub fn preprocess(&self, values: &[f64]) -> Result<Vec<f64>, SortError> {
        if values.len() != self.indicators.len() {
            return Err(SortError::DimensionMismatch {
                expected: self.indicators.len(),
                actual: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SortError::NonFiniteValue { index });
        }
        Ok(values
            .iter()
            .zip(&self.indicators)
            .map(|(&v, ind)| ind.transform.apply(v))
            .collect())
    }

    pub fn fuzzify(&self, values: &[f64]) -> Result<Vec<Ffn>, SortError> {
        Ok(self
            .preprocess(values)?
            .into_iter()
            .zip(&self.indicators)
            .map(|(v, ind)| ind.fuzzify(v))
            .collect())
    }

    /// Target-layer credibility for every class boundary, worst first.
    pub fn credibilities(&self, values: &[f64]) -> Result<Vec<Ffn>, SortError> {
        let sample = self.fuzzify(values)?;
        Ok(self.credibility_profile(&sample, &self.target))
    }

    /// Target-layer class over the full indicator set.
    pub fn classify(&self, values: &[f64]) -> Result<ClassLabel, SortError> {
        let sample = self.fuzzify(values)?;
        let label = self.assign(&sample, &self.target);
        tracing::debug!(subsystem = %self.config.name, %label, "target layer graded");
        Ok(label)
    }

    /// Criterion-layer classes in configuration order.
    pub fn classify_groups(&self, values: &[f64]) -> Result<Vec<GroupGrade>, SortError> {
        let sample = self.fuzzify(values)?;
        Ok(self
            .groups
            .iter()
            .map(|group| GroupGrade {
                name: group.name.clone(),
                label: self.assign(&sample, &group.members),
            })
            .collect())
    }

    pub fn classify_group(&self, values: &[f64], name: &str) -> Result<ClassLabel, SortError> {
        let group = self
            .groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| SortError::UnknownGroup(name.to_string()))?;
        let sample = self.fuzzify(values)?;
        Ok(self.assign(&sample, &group.members))
    }

    /// Target-layer classes of many observations, in input order.
    pub fn classify_many(&self, vectors: &[Vec<f64>]) -> Result<Vec<ClassLabel>, SortError> {
        vectors.par_iter().map(|v| self.classify(v)).collect()
    }

    /// Crisp per-indicator grades on the direction-unified values.
    pub fn grade_indicators(&self, values: &[f64]) -> Result<Vec<IndicatorGrade>, SortError> {
        Ok(self
            .preprocess(values)?
            .into_iter()
            .zip(&self.indicators)
            .enumerate()
            .map(|(i, (value, ind))| IndicatorGrade {
                code: self.config.code(i),
                label: grade_indicator(value, &ind.crisp_bounds),
                value,
            })
            .collect())
    }

    pub fn classify_record(&self, values: &[f64]) -> Result<GradeReport, SortError> {
        let indicators = self.grade_indicators(values)?;
        let attention = attention_list(&indicators, DEFAULT_ATTENTION_LIMIT);
        Ok(GradeReport {
            subsystem: self.config.name.clone(),
            target: self.classify(values)?,
            groups: self.classify_groups(values)?,
            indicators,
            attention,
        })
    }

    fn assign(&self, sample: &[Ffn], members: &[Member]) -> ClassLabel {
        let profile = self.credibility_profile(sample, members);
        profile
            .iter()
            .enumerate()
            .rev()
            .find(|(_, kappa)| **kappa >= self.threshold)
            .and_then(|(h, _)| ClassLabel::from_index(h))
            .unwrap_or(ClassLabel::Poor)
    }

    fn credibility_profile(&self, sample: &[Ffn], members: &[Member]) -> Vec<Ffn> {
        (0..ClassLabel::COUNT)
            .map(|h| {
                let kappa = self.credibility(sample, members, h);
                tracing::trace!(class = h, %kappa, "credibility");
                kappa
            })
            .collect()
    }

    fn credibility(&self, sample: &[Ffn], members: &[Member], h: usize) -> Ffn {
        let mut phi_global = Ffn::new(0.0, 0.0, 0.0, 0.0);
        let mut sigmas = Vec::with_capacity(members.len());

        for member in members {
            let (Some(ind), Some(&x)) = (self.indicators.get(member.index), sample.get(member.index))
            else {
                continue;
            };
            let Some(&b) = ind.bounds.get(h) else {
                continue;
            };
            sigmas.push(ind.discordance(x, b));
            if x >= b {
                phi_global = accumulate(phi_global, ind.concordance(x, b), member.weight);
            }
        }

        let complement = Ffn::ONE.subtract(phi_global);
        let degenerate = complement.is_zero()
            || (complement.alpha_l() < FFN_EPSILON && complement.alpha_u() < FFN_EPSILON);
        let veto = if degenerate {
            Ffn::ONE
        } else {
            sigmas
                .iter()
                .filter(|sigma| **sigma > phi_global)
                .fold(Ffn::ONE, |acc, sigma| {
                    acc.multiply(Ffn::ONE.subtract(*sigma).divide(complement))
                })
        };
        phi_global.multiply(veto).clamp()
    }
}

/// Component-wise `acc + weight * phi`, clamped.
fn accumulate(acc: Ffn, phi: Ffn, weight: f64) -> Ffn {
    Ffn::new(
        weight.mul_add(phi.alpha_l(), acc.alpha_l()),
        weight.mul_add(phi.alpha_u(), acc.alpha_u()),
        weight.mul_add(phi.beta_l(), acc.beta_l()),
        weight.mul_add(phi.beta_u(), acc.beta_u()),
    )
    .clamp()
}

/// Target-layer class of `values` under `config`.
pub fn classify(values: &[f64], config: &EvaluationConfig) -> Result<ClassLabel, SortError> {
    SortingEngine::new(config.clone())?.classify(values)
}

/// Criterion-layer classes of `values` under `config`.
pub fn classify_groups(
    values: &[f64],
    config: &EvaluationConfig,
) -> Result<Vec<GroupGrade>, SortError> {
    SortingEngine::new(config.clone())?.classify_groups(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CriterionGroup;

    const UNIT: [f64; BOUNDARY_POINTS] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

    fn engine(weights: Vec<f64>, theta: f64) -> SortingEngine {
        let config = EvaluationConfig::new("demo", vec![UNIT; weights.len()], weights, theta);
        SortingEngine::new(config).unwrap_or_else(|e| panic!("engine: {e}"))
    }

    #[test]
    fn normalisation_handles_degenerate_ranges() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(12.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
        assert_eq!(normalize(3.5, 3.0, 3.0), 1.0);
        assert_eq!(normalize(2.5, 3.0, 3.0), 0.0);
    }

    #[test]
    fn class_width_thresholds_are_fractions_of_a_fifth() {
        let ind = PreparedIndicator::new([0.0, 4.0, 8.0, 12.0, 16.0, 20.0], Transform::Identity, &ThresholdPolicy::new());
        assert!((ind.indifference.alpha_l() - 0.05).abs() < 1e-12);
        assert!((ind.preference.alpha_l() - 0.1).abs() < 1e-12);
        assert!((ind.veto.alpha_l() - 0.15).abs() < 1e-12);

        let flat = PreparedIndicator::new([1.0; BOUNDARY_POINTS], Transform::Identity, &ThresholdPolicy::new());
        assert!(flat.preference.is_zero());
    }

    #[test]
    fn best_upper_boundary_grades_excellent() {
        for theta in [0.55, 0.8, 0.99] {
            let e = engine(vec![0.1, 0.2, 0.3, 0.4], theta);
            assert_eq!(e.classify(&[1.0; 4]), Ok(ClassLabel::Excellent));
        }
    }

    #[test]
    fn worst_lower_boundary_grades_poor() {
        let e = engine(vec![0.5, 0.5], 0.6);
        assert_eq!(e.classify(&[0.0, 0.0]), Ok(ClassLabel::Poor));
    }

    #[test]
    fn values_on_a_boundary_reach_its_class() {
        let e = engine(vec![0.3, 0.3, 0.4], 0.7);
        for (h, &b) in UNIT.iter().enumerate().take(ClassLabel::COUNT) {
            let label = e.classify(&[b, b, b]).unwrap_or(ClassLabel::Poor);
            assert!(label.index() >= h, "boundary {b} graded {label}");
        }
    }

    #[test]
    fn outranking_is_non_compensatory() {
        let e = engine(vec![0.4, 0.6], 0.6);
        // the heavy indicator alone clears theta; the light one does not
        assert_eq!(e.classify(&[0.5, 0.9]), Ok(ClassLabel::Excellent));
        assert_eq!(e.classify(&[0.9, 0.5]), Ok(ClassLabel::Medium));
    }

    #[test]
    fn criterion_groups_use_local_weights() {
        let config = EvaluationConfig::new("demo", vec![UNIT; 3], vec![0.2, 0.3, 0.5], 0.6)
            .with_groups(vec![
                CriterionGroup::new("left", [0, 1]),
                CriterionGroup::new("right", [2]),
            ]);
        let e = SortingEngine::new(config).unwrap_or_else(|err| panic!("engine: {err}"));
        let grades = e.classify_groups(&[0.9, 0.3, 0.5]).unwrap_or_default();
        let names: Vec<&str> = grades.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["left", "right"]);
        assert_eq!(grades[0].label, ClassLabel::Fair);
        assert_eq!(grades[1].label, ClassLabel::Medium);
        assert_eq!(e.classify_group(&[0.9, 0.3, 0.5], "right"), Ok(ClassLabel::Medium));
        assert_eq!(
            e.classify_group(&[0.9, 0.3, 0.5], "middle"),
            Err(SortError::UnknownGroup("middle".to_string()))
        );
    }

    #[test]
    fn zero_weight_group_grades_poor() {
        let config = EvaluationConfig::new("demo", vec![UNIT; 2], vec![1.0, 0.0], 0.6)
            .with_groups(vec![CriterionGroup::new("idle", [1])]);
        let e = SortingEngine::new(config).unwrap_or_else(|err| panic!("engine: {err}"));
        assert_eq!(e.classify_group(&[0.5, 1.0], "idle"), Ok(ClassLabel::Poor));
    }

    #[test]
    fn transforms_apply_before_fuzzifying() {
        let config = EvaluationConfig::new("demo", vec![UNIT; 2], vec![0.5, 0.5], 0.6)
            .with_transform(0, Transform::CostInvert { max: 1.0 })
            .with_transform(1, Transform::center(1.0));
        let e = SortingEngine::new(config).unwrap_or_else(|err| panic!("engine: {err}"));
        let unified = e.preprocess(&[0.1, 0.95]).unwrap_or_default();
        assert!((unified[0] - 0.9).abs() < 1e-12 && (unified[1] - 0.95).abs() < 1e-12);
        assert_eq!(e.classify(&[0.1, 0.95]), Ok(ClassLabel::Excellent));
        assert_eq!(e.classify(&[0.9, 0.95]), Ok(ClassLabel::Poor));
    }

    #[test]
    fn shape_errors_fail_fast() {
        let e = engine(vec![0.5, 0.5], 0.6);
        assert_eq!(
            e.classify(&[0.5]),
            Err(SortError::DimensionMismatch { expected: 2, actual: 1 })
        );
        assert_eq!(e.classify(&[0.5, f64::NAN]), Err(SortError::NonFiniteValue { index: 1 }));
    }

    #[test]
    fn batch_grading_keeps_order() {
        let e = engine(vec![0.5, 0.5], 0.6);
        let vectors = vec![vec![1.0, 1.0], vec![0.0, 0.0], vec![0.5, 0.5]];
        assert_eq!(
            e.classify_many(&vectors),
            Ok(vec![ClassLabel::Excellent, ClassLabel::Poor, ClassLabel::Medium])
        );
    }

    #[test]
    fn record_report_carries_every_layer() {
        let config = EvaluationConfig::new("demo", vec![UNIT; 3], vec![0.2, 0.3, 0.5], 0.6)
            .with_codes(vec!["A".into(), "B".into(), "C".into()])
            .with_groups(vec![CriterionGroup::new("all", [0, 1, 2])]);
        let e = SortingEngine::new(config).unwrap_or_else(|err| panic!("engine: {err}"));
        let report = e.classify_record(&[0.9, 0.1, 0.5]).unwrap_or_else(|err| panic!("record: {err}"));
        assert_eq!(report.subsystem, "demo");
        assert_eq!(report.group("all"), Some(report.target));
        let labels: Vec<ClassLabel> = report.indicators.iter().map(|g| g.label).collect();
        assert_eq!(labels, [ClassLabel::Excellent, ClassLabel::Poor, ClassLabel::Medium]);
        let flagged: Vec<&str> = report.attention.iter().map(|g| g.code.as_str()).collect();
        assert_eq!(flagged, ["B", "C"]);
    }

    #[test]
    fn free_functions_validate_config() {
        let bad = EvaluationConfig::new("bad", vec![UNIT], vec![0.5], 0.6);
        assert!(matches!(classify(&[0.5], &bad), Err(SortError::InvalidConfig(_))));
        let good = EvaluationConfig::new("good", vec![UNIT], vec![1.0], 0.6);
        assert_eq!(classify(&[0.5], &good), Ok(ClassLabel::Medium));
        assert_eq!(classify_groups(&[0.5], &good), Ok(Vec::new()));
    }
}
