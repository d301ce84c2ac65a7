//! Transform chain specification types.
//!
//! A [`TransformChainSpec`] lists single-graph transforms to run in order.
//! Transforms taking a second graph (sub-union, standard union) are built
//! in code instead.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "transforms": [
//!     { "type": "isolate_start_state" },
//!     { "type": "push_weights", "push_to_final": false }
//!   ]
//! }
//! ```

use crate::errors::{HypergraphError, Result};
use crate::graph::MutableHypergraph;
use crate::ops::{IsolateStartState, PushWeights};
use crate::transform::runner::inplace;
use crate::weight::CostWeight;
use serde::{Deserialize, Serialize};

/// Current spec version.
pub const SPEC_VERSION: u32 = 1;

/// One configured transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformSpec {
    PushWeights(PushWeights),
    IsolateStartState,
}

impl TransformSpec {
    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PushWeights(_) => "push_weights",
            Self::IsolateStartState => "isolate_start_state",
        }
    }

    /// Apply in place; returns whether the transform ran.
    pub fn apply_inplace<W: CostWeight>(&self, hg: &mut MutableHypergraph<W>) -> Result<bool> {
        match self {
            Self::PushWeights(t) => inplace(hg, t),
            Self::IsolateStartState => inplace(hg, &IsolateStartState),
        }
    }
}

/// An ordered list of transforms (v1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformChainSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    #[serde(default)]
    pub transforms: Vec<TransformSpec>,
}

impl Default for TransformChainSpec {
    fn default() -> Self {
        Self {
            v: SPEC_VERSION,
            transforms: Vec::new(),
        }
    }
}

impl TransformChainSpec {
    /// Parse and validate a JSON chain.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.v != SPEC_VERSION {
            return Err(HypergraphError::config(
                "TransformChain",
                format!("unsupported spec version {} (expected {SPEC_VERSION})", self.v),
            ));
        }
        Ok(())
    }

    /// Run every transform in order, stopping at the first error.
    ///
    /// Returns, per transform, whether it ran.
    pub fn apply_inplace<W: CostWeight>(&self, hg: &mut MutableHypergraph<W>) -> Result<Vec<bool>> {
        self.validate()?;
        self.transforms
            .iter()
            .map(|t| t.apply_inplace(hg))
            .collect()
    }
}
