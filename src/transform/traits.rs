//! The transform trait.
//!
//! A transform declares what it needs from its input (indices, mutability),
//! what it guarantees about its output, whether it has anything to do at
//! all, and provides an in-place algorithm, an input→output algorithm, or
//! both. The dispatch functions in [`crate::transform::runner`] pick the
//! right algorithm and handle copying, property forcing and vocabulary
//! propagation so individual transforms never repeat that logic.

use crate::errors::{HypergraphError, Result};
use crate::graph::{Hypergraph, MutableHypergraph};
use crate::types::Properties;
use crate::vocab::VocabularyPtr;
use crate::weight::Weight;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// TransformMode
// ============================================================================

/// Which algorithms a transform implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    /// Only `inout`: always builds a new output graph
    Inout,
    /// Only `inplace`: input→output runs as copy-then-mutate
    Inplace,
    /// Both; in-place is preferred unless the graph must be copied
    OptionalInplace,
}

impl TransformMode {
    pub fn supports_inplace(self) -> bool {
        matches!(self, Self::Inplace | Self::OptionalInplace)
    }

    pub fn supports_inout(self) -> bool {
        matches!(self, Self::Inout | Self::OptionalInplace)
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inout => "inout",
            Self::Inplace => "inplace",
            Self::OptionalInplace => "optional_inplace",
        })
    }
}

// ============================================================================
// Transform
// ============================================================================

/// A hypergraph transform.
///
/// # Contract
///
/// - **`needs`**: `false` means the input already satisfies the transform's
///   postcondition; the dispatcher then only adjusts output properties.
///   Must be cheap and must not mutate.
/// - **`needs_copy`**: `true` when running in place would read the graph
///   being modified (for example when the input is also the transform's
///   second operand).
/// - **Properties**: `in_add_props` are built on the input before the
///   algorithm runs; `out_add_props` / `out_sub_props` are forced on the
///   output afterwards. New output graphs hold
///   [`Transform::new_out_add_props`].
/// - **`inplace`** receives a graph that already holds `in_add_props`.
/// - **`inout`** receives an input holding `in_add_props` and an empty
///   output whose vocabulary is already set; it must not touch the input.
/// - A transform never needs to call `needs` itself: the dispatcher has.
pub trait Transform<W: Weight> {
    /// Name used in errors and log spans.
    fn name(&self) -> &'static str;

    fn mode(&self) -> TransformMode {
        TransformMode::Inout
    }

    fn in_add_props(&self) -> Properties {
        Properties::NONE
    }

    fn out_add_props(&self) -> Properties {
        Properties::NONE
    }

    fn out_sub_props(&self) -> Properties {
        Properties::NONE
    }

    /// Indices held by output graphs the dispatcher creates.
    fn new_out_add_props(&self) -> Properties {
        Properties::STORE_IN_ARCS | self.out_add_props()
    }

    fn needs(&self, _hg: &dyn Hypergraph<W>) -> bool {
        true
    }

    fn needs_copy(&self, _hg: &dyn Hypergraph<W>) -> bool {
        false
    }

    /// Vocabulary for output graphs; `None` keeps the input's.
    fn vocabulary(&self) -> Option<&VocabularyPtr> {
        None
    }

    /// The configured vocabulary if any, otherwise `input`.
    fn output_vocabulary(&self, input: &VocabularyPtr) -> VocabularyPtr {
        Arc::clone(self.vocabulary().unwrap_or(input))
    }

    fn inplace(&self, _hg: &mut MutableHypergraph<W>) -> Result<()> {
        Err(HypergraphError::unimplemented(self.name(), "inplace"))
    }

    fn inout(&self, _input: &dyn Hypergraph<W>, _output: &mut MutableHypergraph<W>) -> Result<()> {
        Err(HypergraphError::unimplemented(self.name(), "inout"))
    }
}

/// Transform that is never needed. Dispatching it only forces properties
/// and propagates the vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransform;

impl<W: Weight> Transform<W> for NoopTransform {
    fn name(&self) -> &'static str {
        "Noop"
    }

    fn mode(&self) -> TransformMode {
        TransformMode::OptionalInplace
    }

    fn needs(&self, _hg: &dyn Hypergraph<W>) -> bool {
        false
    }

    #[inline]
    fn inplace(&self, _hg: &mut MutableHypergraph<W>) -> Result<()> {
        Ok(())
    }

    fn inout(&self, input: &dyn Hypergraph<W>, output: &mut MutableHypergraph<W>) -> Result<()> {
        output.assign_from(input);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Vocabulary;
    use crate::weight::ViterbiWeight;

    struct Bare;

    impl Transform<ViterbiWeight> for Bare {
        fn name(&self) -> &'static str {
            "Bare"
        }
    }

    #[test]
    fn test_defaults() {
        let t = Bare;
        let hg = MutableHypergraph::<ViterbiWeight>::new();
        assert_eq!(t.mode(), TransformMode::Inout);
        assert!(t.needs(&hg));
        assert!(!t.needs_copy(&hg));
        assert_eq!(t.new_out_add_props(), Properties::STORE_IN_ARCS);
        assert!(t.vocabulary().is_none());
    }

    #[test]
    fn test_unimplemented_modes_error() {
        let t = Bare;
        let mut hg = MutableHypergraph::<ViterbiWeight>::new();
        let err = t.inplace(&mut hg).unwrap_err();
        assert!(matches!(err, HypergraphError::Unimplemented { mode: "inplace", .. }));

        let input = MutableHypergraph::<ViterbiWeight>::new();
        let err = t.inout(&input, &mut hg).unwrap_err();
        assert_eq!(err.transform(), Some("Bare"));
    }

    #[test]
    fn test_output_vocabulary_falls_back_to_input() {
        let input = Vocabulary::shared();
        let out = <Bare as Transform<ViterbiWeight>>::output_vocabulary(&Bare, &input);
        assert!(Arc::ptr_eq(&out, &input));
    }

    #[test]
    fn test_mode_support() {
        assert!(TransformMode::OptionalInplace.supports_inplace());
        assert!(TransformMode::OptionalInplace.supports_inout());
        assert!(!TransformMode::Inout.supports_inplace());
        assert!(!TransformMode::Inplace.supports_inout());
        assert_eq!(TransformMode::Inplace.to_string(), "inplace");
    }
}
