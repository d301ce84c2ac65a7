//! Weighted hypergraphs
//!
//! A hypergraph is a set of states plus arcs `head <- tails... / weight`.
//! Finite-state automata are the special case where every arc has exactly
//! one structural tail (its source state); an arc's input label, if any, is
//! a second tail pointing at a lexical leaf state.
//!
//! Read access goes through the object-safe [`Hypergraph`] trait so that
//! transforms can accept both [`MutableHypergraph`] and the structurally
//! immutable [`FrozenHypergraph`]. Structural mutation is only available on
//! [`MutableHypergraph`].

pub mod algorithms;
pub mod frozen;
pub mod mutable;
pub mod tree;

pub use frozen::FrozenHypergraph;
pub use mutable::MutableHypergraph;

use crate::types::{ArcId, Properties, StateId};
use crate::vocab::{Sym, VocabularyPtr};
use crate::weight::Weight;
use std::fmt;
use std::sync::Arc;

/// Shared, read-only handle to any hypergraph.
pub type HypergraphPtr<W> = Arc<dyn Hypergraph<W>>;

/// Iterator over the arc ids of a graph, in insertion order.
pub type ArcIds = std::iter::Map<std::ops::Range<u32>, fn(u32) -> ArcId>;

// ============================================================================
// Arcs and state labels
// ============================================================================

/// A weighted hyperarc. Head and tails are fixed at construction; only the
/// weight may change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperArc<W> {
    head: StateId,
    tails: Vec<StateId>,
    weight: W,
}

impl<W> HyperArc<W> {
    pub fn new(head: StateId, tails: Vec<StateId>, weight: W) -> Self {
        Self {
            head,
            tails,
            weight,
        }
    }

    #[inline]
    pub fn head(&self) -> StateId {
        self.head
    }

    #[inline]
    pub fn tails(&self) -> &[StateId] {
        &self.tails
    }

    /// The structural source of a finite-state arc
    #[inline]
    pub fn first_tail(&self) -> Option<StateId> {
        self.tails.first().copied()
    }

    #[inline]
    pub fn weight(&self) -> &W {
        &self.weight
    }

    #[inline]
    pub fn weight_mut(&mut self) -> &mut W {
        &mut self.weight
    }

    /// Copy of this arc with every tail equal to `from` replaced by `to`.
    pub fn with_replaced_tail(&self, from: StateId, to: StateId) -> Self
    where
        W: Clone,
    {
        Self {
            head: self.head,
            tails: self
                .tails
                .iter()
                .map(|&t| if t == from { to } else { t })
                .collect(),
            weight: self.weight.clone(),
        }
    }

    /// `(tails..., head)`: the identity used to de-duplicate arcs
    pub fn structure_key(&self) -> Vec<StateId> {
        let mut key = Vec::with_capacity(self.tails.len() + 1);
        key.extend_from_slice(&self.tails);
        key.push(self.head);
        key
    }
}

/// Input and output labels of a state. Unlabelled states are anonymous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StateLabels {
    pub input: Option<Sym>,
    pub output: Option<Sym>,
}

impl StateLabels {
    /// Same symbol on both sides
    pub fn both(sym: Sym) -> Self {
        Self {
            input: Some(sym),
            output: Some(sym),
        }
    }
}

// ============================================================================
// Hypergraph trait
// ============================================================================

/// Read access to a weighted hypergraph.
///
/// # Contract
///
/// - State ids are dense in `[0, size())`; arc ids in `[0, num_arcs())`.
///   Passing an out-of-range id is a caller bug and panics.
/// - The per-state arc lists (`in_arc_ids`, `first_tail_out_arc_ids`,
///   `out_arc_ids`) are empty unless the matching [`Properties`] flag is
///   held. Algorithms check with
///   [`algorithms::require_properties`] before relying on them.
/// - "Immutable" is structural: arc weights may be rewritten through
///   [`Hypergraph::weight_mut`] on any graph, but only graphs returning
///   `Some` from [`Hypergraph::as_mutable`] can gain or lose states and arcs.
/// - Graphs are `Send + Sync`, so shared handles and the transforms holding
///   them can move across threads.
pub trait Hypergraph<W: Weight>: Send + Sync {
    fn properties(&self) -> Properties;

    fn vocabulary(&self) -> &VocabularyPtr;

    fn start(&self) -> Option<StateId>;

    fn final_state(&self) -> Option<StateId>;

    /// Number of states
    fn size(&self) -> usize;

    fn num_arcs(&self) -> usize;

    fn arc(&self, id: ArcId) -> &HyperArc<W>;

    fn weight_mut(&mut self, id: ArcId) -> &mut W;

    fn labels(&self, state: StateId) -> StateLabels;

    fn in_arc_ids(&self, state: StateId) -> &[ArcId];

    fn first_tail_out_arc_ids(&self, state: StateId) -> &[ArcId];

    fn out_arc_ids(&self, state: StateId) -> &[ArcId];

    fn is_mutable(&self) -> bool;

    fn as_mutable(&mut self) -> Option<&mut MutableHypergraph<W>>;

    /// Upper bound on state ids that can be arc heads
    fn size_for_heads(&self) -> usize {
        self.size()
    }

    fn arc_ids(&self) -> ArcIds {
        (0..self.num_arcs() as u32).map(ArcId as fn(u32) -> ArcId)
    }

    fn for_arcs(&self, visit: &mut dyn FnMut(ArcId, &HyperArc<W>)) {
        for id in self.arc_ids() {
            visit(id, self.arc(id));
        }
    }

    fn input_label(&self, state: StateId) -> Option<Sym> {
        self.labels(state).input
    }

    fn output_label(&self, state: StateId) -> Option<Sym> {
        self.labels(state).output
    }

    /// Text of the input label
    fn label_text(&self, state: StateId) -> Option<Arc<str>> {
        self.input_label(state)
            .and_then(|sym| self.vocabulary().text(sym))
    }

    fn has_lexical_label(&self, state: StateId) -> bool {
        self.input_label(state).is_some_and(|sym| sym.is_lexical())
    }

    fn has_in_arcs(&self, state: StateId) -> bool {
        if self.properties().contains(Properties::STORE_IN_ARCS) {
            !self.in_arc_ids(state).is_empty()
        } else {
            self.arc_ids().any(|id| self.arc(id).head() == state)
        }
    }

    /// Leaf of the derivation structure: lexical, or never an arc head.
    fn is_axiom(&self, state: StateId) -> bool {
        self.has_lexical_label(state) || !self.has_in_arcs(state)
    }

    /// Base case of inside computations. Lexical leaves and the start state
    /// always qualify; without a start state every axiom does.
    fn is_source_leaf(&self, state: StateId) -> bool {
        if self.has_lexical_label(state) {
            return true;
        }
        match self.start() {
            Some(start) => start == state,
            None => !self.has_in_arcs(state),
        }
    }

    /// Every arc has exactly one structural tail, its first; any further
    /// tails are lexical leaves.
    fn is_graph(&self) -> bool {
        self.arc_ids().all(|id| {
            let tails = self.arc(id).tails();
            !tails.is_empty() && tails[1..].iter().all(|&t| self.has_lexical_label(t))
        })
    }

    /// True when no derivation of the final state with non-zero weight
    /// exists (including the canonical empty graph with no final state).
    fn pruned_empty(&self) -> bool {
        let Some(final_state) = self.final_state() else {
            return true;
        };
        let n = self.size();
        if final_state as usize >= n {
            return true;
        }
        let mut derivable: Vec<bool> = (0..n as StateId).map(|s| self.is_source_leaf(s)).collect();
        let mut changed = true;
        while changed {
            changed = false;
            for id in self.arc_ids() {
                let arc = self.arc(id);
                let head = arc.head() as usize;
                if derivable[head] || arc.weight().is_zero() {
                    continue;
                }
                if arc.tails().iter().all(|&t| derivable[t as usize]) {
                    derivable[head] = true;
                    changed = true;
                }
            }
        }
        !derivable[final_state as usize]
    }
}

// ─── Text dump ──────────────────────────────────────────────────────────────

fn write_state<W: Weight, H: Hypergraph<W> + ?Sized>(
    hg: &H,
    state: StateId,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    write!(f, "{state}")?;
    if let Some(text) = hg.label_text(state) {
        write!(f, "({text})")?;
    }
    Ok(())
}

/// Line-oriented dump used by the `Display` impls:
///
/// ```text
/// START <- 0
/// FINAL <- 3
/// 3 <- 1 2(b) / 0.4
/// ```
pub(crate) fn write_hypergraph<W: Weight, H: Hypergraph<W> + ?Sized>(
    hg: &H,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    if let Some(start) = hg.start() {
        writeln!(f, "START <- {start}")?;
    }
    if let Some(final_state) = hg.final_state() {
        writeln!(f, "FINAL <- {final_state}")?;
    }
    for id in hg.arc_ids() {
        let arc = hg.arc(id);
        write_state(hg, arc.head(), f)?;
        f.write_str(" <-")?;
        for &t in arc.tails() {
            f.write_str(" ")?;
            write_state(hg, t, f)?;
        }
        writeln!(f, " / {}", arc.weight())?;
    }
    Ok(())
}
