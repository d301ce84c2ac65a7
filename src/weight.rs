//! Arc weights
//!
//! Weights form a semiring (`plus`, `times`, `zero`, `one`). Pushing weights
//! additionally needs division, so [`DivisionWeight`] is a separate trait:
//! a semiring without inverses simply cannot be handed to the push
//! algorithms. [`CostWeight`] exposes the underlying real-valued cost that
//! pushing toward the start rewrites arithmetically.
//!
//! Both provided weights store costs (negative log probabilities), with
//! `+inf` as zero and `0` as one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semiring weight attached to an arc.
pub trait Weight: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Additive identity, annihilator for `times`
    fn zero() -> Self;

    /// Multiplicative identity
    fn one() -> Self;

    fn is_zero(&self) -> bool;

    fn is_one(&self) -> bool;

    /// `self = self ⊕ other`
    fn plus_by(&mut self, other: &Self);

    /// `self = self ⊗ other`
    fn times_by(&mut self, other: &Self);

    fn set_zero(&mut self) {
        *self = Self::zero();
    }

    fn plus(&self, other: &Self) -> Self {
        let mut w = self.clone();
        w.plus_by(other);
        w
    }

    fn times(&self, other: &Self) -> Self {
        let mut w = self.clone();
        w.times_by(other);
        w
    }
}

/// Semiring with multiplicative inverses for non-zero elements.
pub trait DivisionWeight: Weight {
    /// `self = self ⊘ divisor`. `divisor` must not be zero.
    fn divide_by(&mut self, divisor: &Self);
}

/// Weight backed by a real-valued cost.
pub trait CostWeight: DivisionWeight {
    fn from_cost(cost: f64) -> Self;

    fn cost(&self) -> f64;

    fn set_cost(&mut self, cost: f64);
}

// ============================================================================
// Viterbi (tropical) weight
// ============================================================================

/// Tropical cost: `plus` keeps the cheaper, `times` adds costs.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViterbiWeight(pub f64);

impl Weight for ViterbiWeight {
    fn zero() -> Self {
        ViterbiWeight(f64::INFINITY)
    }

    fn one() -> Self {
        ViterbiWeight(0.0)
    }

    fn is_zero(&self) -> bool {
        self.0 == f64::INFINITY
    }

    fn is_one(&self) -> bool {
        self.0 == 0.0
    }

    fn plus_by(&mut self, other: &Self) {
        if other.0 < self.0 {
            self.0 = other.0;
        }
    }

    fn times_by(&mut self, other: &Self) {
        self.0 += other.0;
    }
}

impl DivisionWeight for ViterbiWeight {
    fn divide_by(&mut self, divisor: &Self) {
        if !self.is_zero() {
            self.0 -= divisor.0;
        }
    }
}

impl CostWeight for ViterbiWeight {
    fn from_cost(cost: f64) -> Self {
        ViterbiWeight(cost)
    }

    fn cost(&self) -> f64 {
        self.0
    }

    fn set_cost(&mut self, cost: f64) {
        self.0 = cost;
    }
}

impl fmt::Display for ViterbiWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for ViterbiWeight {
    fn from(cost: f64) -> Self {
        ViterbiWeight(cost)
    }
}

// ============================================================================
// Log weight
// ============================================================================

/// Negative-log probability: `plus` is log-sum-exp on costs.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogWeight(pub f64);

impl Weight for LogWeight {
    fn zero() -> Self {
        LogWeight(f64::INFINITY)
    }

    fn one() -> Self {
        LogWeight(0.0)
    }

    fn is_zero(&self) -> bool {
        self.0 == f64::INFINITY
    }

    fn is_one(&self) -> bool {
        self.0 == 0.0
    }

    fn plus_by(&mut self, other: &Self) {
        if other.is_zero() {
            return;
        }
        if self.is_zero() {
            self.0 = other.0;
            return;
        }
        let (lo, hi) = if self.0 <= other.0 {
            (self.0, other.0)
        } else {
            (other.0, self.0)
        };
        self.0 = lo - (-(hi - lo)).exp().ln_1p();
    }

    fn times_by(&mut self, other: &Self) {
        self.0 += other.0;
    }
}

impl DivisionWeight for LogWeight {
    fn divide_by(&mut self, divisor: &Self) {
        if !self.is_zero() {
            self.0 -= divisor.0;
        }
    }
}

impl CostWeight for LogWeight {
    fn from_cost(cost: f64) -> Self {
        LogWeight(cost)
    }

    fn cost(&self) -> f64 {
        self.0
    }

    fn set_cost(&mut self, cost: f64) {
        self.0 = cost;
    }
}

impl fmt::Display for LogWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for LogWeight {
    fn from(cost: f64) -> Self {
        LogWeight(cost)
    }
}
