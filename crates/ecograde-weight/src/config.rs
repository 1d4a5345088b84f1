use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WeightError;

pub const DEFAULT_OWA_A: f64 = 0.3;
pub const DEFAULT_OWA_B: f64 = 0.7;
pub const DEFAULT_PCA_CUMULATIVE: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingMethodKind {
    Critic,
    Entropy,
    PrincipalComponent,
    Independence,
    CoefficientOfVariation,
}

impl WeightingMethodKind {
    pub const ALL: [Self; 5] = [
        Self::Critic,
        Self::Entropy,
        Self::PrincipalComponent,
        Self::Independence,
        Self::CoefficientOfVariation,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critic => "critic",
            Self::Entropy => "entropy",
            Self::PrincipalComponent => "principal_component",
            Self::Independence => "independence",
            Self::CoefficientOfVariation => "coefficient_of_variation",
        }
    }
}

impl fmt::Display for WeightingMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightingMethodKind {
    type Err = WeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critic" | "dispersion" => Ok(Self::Critic),
            "entropy" => Ok(Self::Entropy),
            "pca" | "principal_component" => Ok(Self::PrincipalComponent),
            "independence" | "regression" => Ok(Self::Independence),
            "cv" | "coefficient_of_variation" => Ok(Self::CoefficientOfVariation),
            other => Err(WeightError::InvalidParameter(format!(
                "unknown weighting method: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipalComponentConfig {
    /// Cumulative contribution rate at which component selection stops.
    pub cumulative_threshold: f64,
}

impl PrincipalComponentConfig {
    pub const fn new() -> Self {
        Self {
            cumulative_threshold: DEFAULT_PCA_CUMULATIVE,
        }
    }
}

impl Default for PrincipalComponentConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndependenceConfig {
    /// Contiguous block sizes; empty means a single block over all columns.
    pub blocks: Vec<usize>,
}

impl IndependenceConfig {
    pub fn blocked(blocks: impl Into<Vec<usize>>) -> Self {
        Self {
            blocks: blocks.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum WeightingMethodConfig {
    Critic,
    Entropy,
    PrincipalComponent(PrincipalComponentConfig),
    Independence(IndependenceConfig),
    CoefficientOfVariation,
}

impl WeightingMethodConfig {
    pub const fn kind(&self) -> WeightingMethodKind {
        match self {
            Self::Critic => WeightingMethodKind::Critic,
            Self::Entropy => WeightingMethodKind::Entropy,
            Self::PrincipalComponent(_) => WeightingMethodKind::PrincipalComponent,
            Self::Independence(_) => WeightingMethodKind::Independence,
            Self::CoefficientOfVariation => WeightingMethodKind::CoefficientOfVariation,
        }
    }
}

impl From<WeightingMethodKind> for WeightingMethodConfig {
    fn from(kind: WeightingMethodKind) -> Self {
        match kind {
            WeightingMethodKind::Critic => Self::Critic,
            WeightingMethodKind::Entropy => Self::Entropy,
            WeightingMethodKind::PrincipalComponent => {
                Self::PrincipalComponent(PrincipalComponentConfig::new())
            }
            WeightingMethodKind::Independence => Self::Independence(IndependenceConfig::default()),
            WeightingMethodKind::CoefficientOfVariation => Self::CoefficientOfVariation,
        }
    }
}

/// Trapezoidal soft-quantifier parameters for OWA fusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    pub a: f64,
    pub b: f64,
}

impl FusionConfig {
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Reads `ECOGRADE_OWA_A` / `ECOGRADE_OWA_B`, keeping the default for
    /// unset, blank or malformed values.
    pub fn from_env() -> Self {
        Self {
            a: env_f64("ECOGRADE_OWA_A", DEFAULT_OWA_A),
            b: env_f64("ECOGRADE_OWA_B", DEFAULT_OWA_B),
        }
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !unit(self.a) || !unit(self.b) {
            return Err(WeightError::InvalidParameter(format!(
                "quantifier bounds must lie in [0, 1], got a={} b={}",
                self.a, self.b
            )));
        }
        if self.a > self.b {
            return Err(WeightError::InvalidParameter(format!(
                "quantifier needs a <= b, got a={} b={}",
                self.a, self.b
            )));
        }
        Ok(())
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OWA_A, DEFAULT_OWA_B)
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    let Some(raw) = std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    else {
        return default;
    };
    raw.parse::<f64>().unwrap_or_else(|_| {
        tracing::warn!(variable = name, value = %raw, default, "malformed number, using default");
        default
    })
}
