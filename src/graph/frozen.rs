//! Structurally immutable hypergraph view

use crate::graph::{write_hypergraph, HyperArc, Hypergraph, MutableHypergraph, StateLabels};
use crate::types::{ArcId, Properties, StateId};
use crate::vocab::VocabularyPtr;
use crate::weight::Weight;
use std::fmt;

/// A graph whose states and arcs can no longer change.
///
/// Arc weights can still be rewritten, which is what in-place weight
/// pushing needs; anything that would add, remove or collapse structure
/// (for example emptying a graph with no finite paths) is refused because
/// [`Hypergraph::as_mutable`] returns `None`.
#[derive(Debug, Clone)]
pub struct FrozenHypergraph<W> {
    inner: MutableHypergraph<W>,
}

impl<W: Weight> FrozenHypergraph<W> {
    pub fn new(inner: MutableHypergraph<W>) -> Self {
        Self { inner }
    }

    /// Give structural mutability back
    pub fn thaw(self) -> MutableHypergraph<W> {
        self.inner
    }
}

impl<W: Weight> From<MutableHypergraph<W>> for FrozenHypergraph<W> {
    fn from(inner: MutableHypergraph<W>) -> Self {
        Self::new(inner)
    }
}

impl<W: Weight> Hypergraph<W> for FrozenHypergraph<W> {
    fn properties(&self) -> Properties {
        self.inner.properties()
    }

    fn vocabulary(&self) -> &VocabularyPtr {
        self.inner.vocabulary()
    }

    fn start(&self) -> Option<StateId> {
        self.inner.start()
    }

    fn final_state(&self) -> Option<StateId> {
        self.inner.final_state()
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn num_arcs(&self) -> usize {
        self.inner.num_arcs()
    }

    fn arc(&self, id: ArcId) -> &HyperArc<W> {
        self.inner.arc(id)
    }

    fn weight_mut(&mut self, id: ArcId) -> &mut W {
        self.inner.weight_mut(id)
    }

    fn labels(&self, state: StateId) -> StateLabels {
        self.inner.labels(state)
    }

    fn in_arc_ids(&self, state: StateId) -> &[ArcId] {
        self.inner.in_arc_ids(state)
    }

    fn first_tail_out_arc_ids(&self, state: StateId) -> &[ArcId] {
        self.inner.first_tail_out_arc_ids(state)
    }

    fn out_arc_ids(&self, state: StateId) -> &[ArcId] {
        self.inner.out_arc_ids(state)
    }

    fn is_mutable(&self) -> bool {
        false
    }

    fn as_mutable(&mut self) -> Option<&mut MutableHypergraph<W>> {
        None
    }
}

impl<W: Weight> fmt::Display for FrozenHypergraph<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hypergraph(self, f)
    }
}
