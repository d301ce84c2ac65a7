//! # hyperforest
//!
//! Weighted hypergraphs (derivation forests and automata) and the transforms
//! that rewrite them.
//!
//! A [`Transform`] declares the indices it needs, whether it has anything
//! to do, and an in-place and/or input→output algorithm; the dispatch
//! functions in [`transform`] choose between them, copying only when
//! required.
//!
//! ## Transforms
//!
//! - [`PushWeights`]: move costs toward the start state, or weight mass
//!   toward the final state, without changing any derivation's total
//! - [`SubUnion`]: union two forests at the level of matching source spans
//! - [`StandardUnion`]: plain union sharing final and start states
//! - [`IsolateStartState`]: give an automaton a start state with no
//!   incoming arcs
//!
//! ## Features
//!
//! - `tracing`: emit a `transform` span per dispatch and debug events from
//!   the algorithms

#[macro_use]
mod macros;

pub mod errors;
pub mod graph;
pub mod ops;
pub mod transform;
pub mod types;
pub mod vocab;
pub mod weight;

// Re-export commonly used types
pub use errors::{HypergraphError, Result};
pub use graph::{
    FrozenHypergraph, HyperArc, Hypergraph, HypergraphPtr, MutableHypergraph, StateLabels,
};
pub use types::{ArcId, Properties, Span, StateId};
pub use vocab::{Sym, SymbolKind, Vocabulary, VocabularyPtr};
pub use weight::{CostWeight, DivisionWeight, LogWeight, ViterbiWeight, Weight};

// Re-export main functionality
pub use ops::{
    infer_spans, push_costs_to_start, push_weights_to_final, sub_union, union_into,
    IsolateStartState, PushWeights, PushWeightsToFinal, StandardUnion, SubUnion, SubUnionOptions,
};
pub use transform::{
    inout, inplace, transformed, DispatchPlan, NoopTransform, Transform, TransformChainSpec,
    TransformMode, TransformSpec,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
