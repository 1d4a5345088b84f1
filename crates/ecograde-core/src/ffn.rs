//! Interval-valued Fermatean fuzzy numbers.
//!
//! A value carries a membership interval `[alpha_l, alpha_u]` and a
//! non-membership interval `[beta_l, beta_u]`. Every operation returns a new
//! value; callers clamp after steps that can leave `[0, 1]`.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance for the score chain and the near-zero guards.
pub const FFN_EPSILON: f64 = 1e-9;

/// Deserialised values pass through [`Ffn::clamp`], so every decoded number
/// lies in the unit box with ordered intervals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawFfn")]
pub struct Ffn {
    alpha_l: f64,
    alpha_u: f64,
    beta_l: f64,
    beta_u: f64,
}

impl Ffn {
    /// Fuzzy zero: no membership, full non-membership.
    pub const ZERO: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    /// Fuzzy one: full membership, no non-membership.
    pub const ONE: Self = Self::new(1.0, 1.0, 0.0, 0.0);

    pub const fn new(alpha_l: f64, alpha_u: f64, beta_l: f64, beta_u: f64) -> Self {
        Self {
            alpha_l,
            alpha_u,
            beta_l,
            beta_u,
        }
    }

    /// Degenerate-interval number `([s, s], [1 - s, 1 - s])` for a crisp
    /// degree `s` already scaled into `[0, 1]`.
    pub fn crisp(s: f64) -> Self {
        Self::new(s, s, 1.0 - s, 1.0 - s)
    }

    pub const fn alpha_l(&self) -> f64 {
        self.alpha_l
    }

    pub const fn alpha_u(&self) -> f64 {
        self.alpha_u
    }

    pub const fn beta_l(&self) -> f64 {
        self.beta_l
    }

    pub const fn beta_u(&self) -> f64 {
        self.beta_u
    }

    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(
            fermatean_union(self.alpha_l, other.alpha_l),
            fermatean_union(self.alpha_u, other.alpha_u),
            self.beta_l * other.beta_l,
            self.beta_u * other.beta_u,
        )
    }

    #[must_use]
    pub fn multiply(self, other: Self) -> Self {
        Self::new(
            self.alpha_l * other.alpha_l,
            self.alpha_u * other.alpha_u,
            fermatean_union(self.beta_l, other.beta_l),
            fermatean_union(self.beta_u, other.beta_u),
        )
    }

    /// Scalar multiple `lambda * x`.
    ///
    /// `lambda == -1` swaps membership and non-membership (the negation used
    /// by [`Ffn::subtract`]). Any other negative `lambda` is taken in absolute
    /// value; this is not a negative-power fuzzy operator.
    #[must_use]
    pub fn scale(self, lambda: f64) -> Self {
        let lambda = if lambda < 0.0 {
            if (lambda + 1.0).abs() < f64::EPSILON {
                return self.negate();
            }
            lambda.abs()
        } else {
            lambda
        };

        Self::new(
            complement_power(self.alpha_l, lambda),
            complement_power(self.alpha_u, lambda),
            self.beta_l.powf(lambda),
            self.beta_u.powf(lambda),
        )
    }

    /// Power `x ^ lambda`. Negative exponents need a non-zero membership;
    /// otherwise the neutral [`Ffn::ONE`] is returned and a warning logged.
    #[must_use]
    pub fn power(self, lambda: f64) -> Self {
        if lambda.abs() < f64::EPSILON {
            return Self::ONE;
        }
        if lambda < 0.0 && (self.alpha_l < FFN_EPSILON || self.alpha_u < FFN_EPSILON) {
            tracing::warn!(ffn = %self, exponent = lambda, "negative power of near-zero membership, using ONE");
            return Self::ONE;
        }

        let magnitude = lambda.abs();
        Self::new(
            self.alpha_l.powf(lambda),
            self.alpha_u.powf(lambda),
            complement_power(self.beta_l, magnitude),
            complement_power(self.beta_u, magnitude),
        )
    }

    /// `x - y`, realised as `x + (-1) * y`.
    #[must_use]
    pub fn subtract(self, other: Self) -> Self {
        self.add(other.scale(-1.0))
    }

    /// `x / y`, realised as `x * y^-1`. A divisor with near-zero membership
    /// yields [`Ffn::ONE`] and a warning.
    #[must_use]
    pub fn divide(self, other: Self) -> Self {
        if other.alpha_l < FFN_EPSILON && other.alpha_u < FFN_EPSILON {
            tracing::warn!(divisor = %other, "division by near-zero FFN, using ONE");
            return Self::ONE;
        }
        self.multiply(other.power(-1.0))
    }

    #[must_use]
    pub const fn negate(self) -> Self {
        Self::new(self.beta_l, self.beta_u, self.alpha_l, self.alpha_u)
    }

    pub fn score_s(&self) -> f64 {
        (cube(self.alpha_l) + cube(self.alpha_u) - cube(self.beta_l) - cube(self.beta_u) + 2.0) / 4.0
    }

    pub fn score_h(&self) -> f64 {
        (cube(self.alpha_l) + cube(self.alpha_u) + cube(self.beta_l) + cube(self.beta_u)) / 2.0
    }

    pub fn score_mu(&self) -> f64 {
        (cube(self.alpha_u) - cube(self.alpha_l) - cube(self.beta_u) + cube(self.beta_l) + 1.0) / 2.0
    }

    pub fn score_hu(&self) -> f64 {
        cube(self.alpha_u) + cube(self.beta_u) - cube(self.alpha_l) - cube(self.beta_l)
    }

    /// Orders two numbers by S, then H, then MU, then HU, moving to the next
    /// score only while the current one ties within [`FFN_EPSILON`].
    ///
    /// The HU step is inverted: the wider hesitancy ranks lower.
    pub fn compare(&self, other: &Self) -> Ordering {
        let chain = [
            (self.score_s(), other.score_s()),
            (self.score_h(), other.score_h()),
            (self.score_mu(), other.score_mu()),
        ];
        for (lhs, rhs) in chain {
            if (lhs - rhs).abs() > FFN_EPSILON {
                return if lhs > rhs {
                    Ordering::Greater
                } else {
                    Ordering::Less
                };
            }
        }

        let (lhs, rhs) = (self.score_hu(), other.score_hu());
        if (lhs - rhs).abs() > FFN_EPSILON {
            return if lhs > rhs {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        Ordering::Equal
    }

    pub fn is_zero(&self) -> bool {
        self.compare(&Self::ZERO) == Ordering::Equal
    }

    /// Clips every component into `[0, 1]` and collapses an inverted
    /// interval onto its upper bound.
    #[must_use]
    pub fn clamp(self) -> Self {
        let unit = |v: f64| v.clamp(0.0, 1.0);
        let alpha_u = unit(self.alpha_u);
        let beta_u = unit(self.beta_u);
        Self::new(
            unit(self.alpha_l).min(alpha_u),
            alpha_u,
            unit(self.beta_l).min(beta_u),
            beta_u,
        )
    }
}

#[derive(Deserialize)]
struct RawFfn {
    alpha_l: f64,
    alpha_u: f64,
    beta_l: f64,
    beta_u: f64,
}

impl From<RawFfn> for Ffn {
    fn from(raw: RawFfn) -> Self {
        Self::new(raw.alpha_l, raw.alpha_u, raw.beta_l, raw.beta_u).clamp()
    }
}

impl PartialEq for Ffn {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl PartialOrd for Ffn {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl fmt::Display for Ffn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FFN(([{:.4}, {:.4}], [{:.4}, {:.4}]))",
            self.alpha_l, self.alpha_u, self.beta_l, self.beta_u
        )
    }
}

fn cube(x: f64) -> f64 {
    x * x * x
}

fn fermatean_union(a: f64, b: f64) -> f64 {
    let (a3, b3) = (cube(a), cube(b));
    (a3 + b3 - a3 * b3).cbrt()
}

fn complement_power(x: f64, lambda: f64) -> f64 {
    (1.0 - (1.0 - cube(x)).powf(lambda)).cbrt()
}
