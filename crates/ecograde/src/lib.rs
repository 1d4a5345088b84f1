pub mod assess;

pub use assess::*;
pub use ecograde_core::*;
pub use ecograde_sort::{
    CriterionGroup, EvaluationConfig, GradeReport, GroupGrade, SortError, SortingEngine,
    ThresholdPolicy, ThresholdSpan, Transform, classify, classify_groups, normalize,
};
pub use ecograde_strategy::{
    BUILTIN_SUBSYSTEMS, HistoricalSample, STRATEGY_DIR_ENV, StrategyError, StrategyRegistry,
    SubsystemStrategy,
};
pub use ecograde_weight::{
    DEFAULT_OWA_A, DEFAULT_OWA_B, DEFAULT_PCA_CUMULATIVE, FUSED_METHODS, FusionConfig,
    IndependenceConfig, PrincipalComponentConfig, SampleMatrix, WeightError, WeightReport,
    WeightingMethod, WeightingMethodConfig, WeightingMethodKind, blocked_independence_weights,
    build_weighting_method, compute_weights, critic_weights, derive_weights, entropy_weights,
    fuse_weights, independence_weights, owa_position_weights, principal_component_weights,
    variation_weights,
};
