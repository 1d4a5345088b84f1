use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ecograde_sort::{EvaluationConfig, GradeReport, SortError, SortingEngine};

use crate::builtin::builtin_payloads;
use crate::error::StrategyError;
use crate::types::SubsystemStrategy;

pub const STRATEGY_DIR_ENV: &str = "ECOGRADE_STRATEGY_DIR";

#[derive(Debug, Clone)]
struct Registered {
    strategy: SubsystemStrategy,
    engine: SortingEngine,
}

/// Subsystem name → validated grading table, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    entries: BTreeMap<String, Registered>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three shipped subsystems: synergy, resource and service.
    pub fn builtin() -> Result<Self, StrategyError> {
        let mut registry = Self::new();
        for (_, json) in builtin_payloads() {
            registry.insert(SubsystemStrategy::from_json(json)?)?;
        }
        Ok(registry)
    }

    /// Built-ins, overridden or extended by every `*.json` file in the
    /// directory named by `ECOGRADE_STRATEGY_DIR` when it is set.
    pub fn from_env() -> Result<Self, StrategyError> {
        let mut registry = Self::builtin()?;
        if let Some(dir) = std::env::var(STRATEGY_DIR_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            registry.load_dir(dir)?;
        }
        Ok(registry)
    }

    /// Registers `strategy` under its own name, replacing any previous table.
    pub fn insert(
        &mut self,
        strategy: SubsystemStrategy,
    ) -> Result<Option<SubsystemStrategy>, StrategyError> {
        let name = strategy.name().trim().to_string();
        if name.is_empty() {
            return Err(StrategyError::Invalid(SortError::InvalidConfig(
                "subsystem name must not be empty".to_string(),
            )));
        }
        let engine = SortingEngine::new(strategy.config.clone())?;
        let previous = self
            .entries
            .insert(name, Registered { strategy, engine })
            .map(|r| r.strategy);
        Ok(previous)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<String, StrategyError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let strategy = SubsystemStrategy::from_json(&text)?;
        let name = strategy.name().trim().to_string();
        if self.insert(strategy)?.is_some() {
            tracing::debug!(subsystem = %name, path = %path.display(), "strategy overridden");
        }
        Ok(name)
    }

    /// Loads every `*.json` file of `dir` in file-name order.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<Vec<String>, StrategyError> {
        let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();
        paths.iter().map(|p| self.load_file(p)).collect()
    }

    pub fn strategy(&self, name: &str) -> Result<&SubsystemStrategy, StrategyError> {
        self.entries
            .get(name)
            .map(|r| &r.strategy)
            .ok_or_else(|| StrategyError::UnknownSubsystem(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Result<&EvaluationConfig, StrategyError> {
        self.strategy(name).map(|s| &s.config)
    }

    pub fn engine(&self, name: &str) -> Result<&SortingEngine, StrategyError> {
        self.entries
            .get(name)
            .map(|r| &r.engine)
            .ok_or_else(|| StrategyError::UnknownSubsystem(name.to_string()))
    }

    /// Grades one raw indicator vector. Shape or value problems of `values`
    /// come back as [`StrategyError::Observation`].
    pub fn evaluate(&self, name: &str, values: &[f64]) -> Result<GradeReport, StrategyError> {
        self.engine(name)?
            .classify_record(values)
            .map_err(|source| StrategyError::Observation {
                subsystem: name.to_string(),
                source,
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ecograde_core::ClassLabel;
    use ecograde_weight::FusionConfig;

    use super::*;

    static TEMP_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_dir() -> std::path::PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "ecograde-strategy-test-{}-{seq}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("temp dir: {e}"));
        dir
    }

    fn registry() -> StrategyRegistry {
        StrategyRegistry::builtin().unwrap_or_else(|e| panic!("builtin: {e}"))
    }

    #[test]
    fn builtin_tables_validate() {
        let r = registry();
        assert_eq!(r.names().collect::<Vec<_>>(), ["resource", "service", "synergy"]);
        assert_eq!(r.get("synergy").map(EvaluationConfig::indicator_count).ok(), Some(14));
        assert_eq!(r.get("resource").map(EvaluationConfig::indicator_count).ok(), Some(11));
        assert_eq!(r.get("service").map(EvaluationConfig::indicator_count).ok(), Some(12));
        for name in ["synergy", "resource", "service"] {
            assert_eq!(r.strategy(name).map(|s| s.samples.len()).ok(), Some(5));
        }
    }

    #[test]
    fn unknown_subsystem_fails_fast() {
        assert!(matches!(
            registry().get("wetland"),
            Err(StrategyError::UnknownSubsystem(name)) if name == "wetland"
        ));
        assert!(registry().evaluate("wetland", &[]).is_err());
    }

    #[test]
    fn malformed_vectors_blame_the_observation() {
        let r = registry();
        let err = r.evaluate("synergy", &[0.5, 0.5]).err();
        assert!(matches!(
            &err,
            Some(StrategyError::Observation {
                subsystem,
                source: SortError::DimensionMismatch { expected: 14, actual: 2 },
            }) if subsystem == "synergy"
        ));
        let message = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(message.starts_with("rejected synergy observation"), "{message}");

        let mut values = vec![0.5; 11];
        values[3] = f64::NAN;
        assert!(matches!(
            r.evaluate("resource", &values),
            Err(StrategyError::Observation {
                source: SortError::NonFiniteValue { index: 3 },
                ..
            })
        ));
    }

    #[test]
    fn evaluate_grades_latest_synergy_sample() {
        let r = registry();
        let latest = r
            .strategy("synergy")
            .ok()
            .and_then(|s| s.samples.first())
            .map(|s| s.values.clone())
            .unwrap_or_default();
        let report = r.evaluate("synergy", &latest).unwrap_or_else(|e| panic!("evaluate: {e}"));
        assert_eq!(report.target, ClassLabel::Good);
        assert_eq!(report.group("service"), Some(ClassLabel::Excellent));
    }

    #[test]
    fn directory_overrides_and_extends() {
        let dir = temp_dir();
        let mut custom = registry()
            .strategy("service")
            .cloned()
            .unwrap_or_else(|e| panic!("service: {e}"));
        custom.config.name = "service".to_string();
        custom.config.theta = 0.9;
        let mut wetland = custom.clone();
        wetland.config.name = "wetland".to_string();

        for (file, strategy) in [("a-service.json", &custom), ("b-wetland.json", &wetland)] {
            let json = serde_json::to_string_pretty(strategy).unwrap_or_default();
            fs::write(dir.join(file), json).unwrap_or_else(|e| panic!("write: {e}"));
        }
        fs::write(dir.join("notes.txt"), "ignored").unwrap_or_else(|e| panic!("write: {e}"));

        let mut r = registry();
        let loaded = r.load_dir(&dir).unwrap_or_else(|e| panic!("load: {e}"));
        assert_eq!(loaded, ["service", "wetland"]);
        assert_eq!(r.len(), 4);
        assert_eq!(r.get("service").map(|c| c.theta).ok(), Some(0.9));
        assert!(r.engine("wetland").is_ok());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn invalid_files_are_rejected() {
        let dir = temp_dir();
        fs::write(dir.join("broken.json"), "{ \"name\": \"x\" }").unwrap_or_else(|e| panic!("write: {e}"));
        let mut r = StrategyRegistry::new();
        assert!(matches!(r.load_dir(&dir), Err(StrategyError::Serde(_))));
        assert!(r.is_empty());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn rederived_weights_stay_on_the_simplex() {
        let r = registry();
        for name in ["synergy", "resource", "service"] {
            let strategy = r.strategy(name).unwrap_or_else(|e| panic!("{name}: {e}"));
            let report = strategy
                .derive_weights(&FusionConfig::default())
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(report.fused.len(), strategy.config.indicator_count());
            let total: f64 = report.fused.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "{name}: {total}");
        }
    }
}
