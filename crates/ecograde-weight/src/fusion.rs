//! Order-weighted-average consensus over the five method estimates.

use crate::config::FusionConfig;
use crate::error::WeightError;

/// Number of method estimates the fusion step combines.
pub const FUSED_METHODS: usize = 5;

/// Trapezoidal regular increasing monotone quantifier; `S(0) = 0`.
pub fn quantifier(s: f64, config: &FusionConfig) -> f64 {
    let FusionConfig { a, b } = *config;
    if s <= 0.0 || s < a {
        0.0
    } else if s > b || (b - a).abs() < f64::EPSILON {
        1.0
    } else {
        (s - a) / (b - a)
    }
}

/// Position weights `w_k = S(k/5) - S((k-1)/5)`.
#[allow(clippy::cast_precision_loss)]
pub fn owa_position_weights(config: &FusionConfig) -> [f64; FUSED_METHODS] {
    let step = FUSED_METHODS as f64;
    std::array::from_fn(|i| {
        let k = i as f64;
        quantifier((k + 1.0) / step, config) - quantifier(k / step, config)
    })
}

/// Fuses five weight vectors over the same indicators: each indicator's
/// estimates are sorted descending and dotted with the position weights,
/// then the result is normalised. A zero total is returned unnormalised.
pub fn fuse_weights(rows: &[Vec<f64>], config: &FusionConfig) -> Result<Vec<f64>, WeightError> {
    config.validate()?;
    if rows.len() != FUSED_METHODS {
        return Err(WeightError::MethodCount {
            expected: FUSED_METHODS,
            actual: rows.len(),
        });
    }
    let n = rows.first().map_or(0, Vec::len);
    if n == 0 {
        return Err(WeightError::InvalidShape(
            "fusion input has no indicators".to_string(),
        ));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n {
            return Err(WeightError::InvalidShape(format!(
                "weight vector {i} has {} entries, expected {n}",
                row.len()
            )));
        }
        if let Some(j) = row.iter().position(|w| !w.is_finite()) {
            return Err(WeightError::NonFinite { row: i, column: j });
        }
    }

    let positions = owa_position_weights(config);
    let fused: Vec<f64> = (0..n)
        .map(|j| {
            let mut estimates: Vec<f64> = rows
                .iter()
                .filter_map(|row| row.get(j).copied())
                .collect();
            estimates.sort_by(|x, y| y.total_cmp(x));
            positions.iter().zip(&estimates).map(|(w, e)| w * e).sum()
        })
        .collect();

    let total: f64 = fused.iter().sum();
    if total == 0.0 {
        tracing::warn!(a = config.a, b = config.b, "fused weights sum to zero, returning unnormalised");
        return Ok(fused);
    }
    Ok(fused.into_iter().map(|w| w / total).collect())
}
