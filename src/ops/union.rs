//! Standard union of two hypergraphs.
//!
//! The second graph's states are added to the first with its final state
//! identified with the first's final (and likewise for the start state).
//! Lexical leaves are shared by label, so identical words are one state.
//! Arcs whose structure already exists in the result are skipped.

use crate::errors::Result;
use crate::graph::{HyperArc, Hypergraph, HypergraphPtr, MutableHypergraph};
use crate::transform::{Transform, TransformMode};
use crate::types::StateId;
use crate::weight::Weight;
use rustc_hash::FxHashSet;

const NAME: &str = "StandardUnion";

/// Add every derivation of `src` to `result`.
///
/// An empty `src` leaves `result` unchanged; an empty `result` becomes a
/// copy of `src` (keeping its own vocabulary and indices).
pub fn union_into<W: Weight, H: Hypergraph<W> + ?Sized>(src: &H, result: &mut MutableHypergraph<W>) {
    let Some(src_final) = src.final_state() else {
        return;
    };
    if result.final_state().is_none() {
        result.assign_from(src);
        return;
    }

    let mut existing: FxHashSet<Vec<StateId>> =
        result.arc_ids().map(|id| result.arc(id).structure_key()).collect();

    let result_final = result.final_state();
    let shared_start = result.start().filter(|_| src.start().is_some());
    let mut mapped: Vec<StateId> = Vec::with_capacity(src.size());
    for s in 0..src.size() as StateId {
        let target = match (s == src_final, shared_start) {
            (true, _) => result_final,
            (false, Some(start)) if src.start() == Some(s) => Some(start),
            _ => None,
        };
        let target = match (target, src.label_text(s)) {
            (Some(t), _) => t,
            (None, Some(text)) if src.has_lexical_label(s) => result.add_lexical_state(&text),
            (None, _) => {
                let labels = result.import_labels(src, s);
                result.add_state_with_labels(labels)
            }
        };
        mapped.push(target);
    }

    let mut added = 0usize;
    for id in src.arc_ids() {
        let arc = src.arc(id);
        let tails: Vec<StateId> = arc.tails().iter().map(|&t| mapped[t as usize]).collect();
        let copy = HyperArc::new(mapped[arc.head() as usize], tails, arc.weight().clone());
        if existing.insert(copy.structure_key()) {
            result.add_arc(copy);
            added += 1;
        }
    }
    hg_debug!("union added {} of {} arcs", added, src.num_arcs());
}

/// Union with a fixed second operand.
#[derive(Clone)]
pub struct StandardUnion<W: Weight> {
    other: HypergraphPtr<W>,
}

impl<W: Weight> StandardUnion<W> {
    pub fn new(other: HypergraphPtr<W>) -> Self {
        Self { other }
    }

    pub fn other(&self) -> &HypergraphPtr<W> {
        &self.other
    }
}

impl<W: Weight> Transform<W> for StandardUnion<W> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn mode(&self) -> TransformMode {
        TransformMode::OptionalInplace
    }

    fn needs(&self, _hg: &dyn Hypergraph<W>) -> bool {
        self.other.final_state().is_some()
    }

    fn needs_copy(&self, hg: &dyn Hypergraph<W>) -> bool {
        same_graph(hg, self.other.as_ref())
    }

    fn inplace(&self, hg: &mut MutableHypergraph<W>) -> Result<()> {
        union_into(self.other.as_ref(), hg);
        Ok(())
    }

    fn inout(&self, input: &dyn Hypergraph<W>, output: &mut MutableHypergraph<W>) -> Result<()> {
        output.assign_from(input);
        union_into(self.other.as_ref(), output);
        Ok(())
    }
}

/// Whether two graph references point at the same object.
pub(crate) fn same_graph<W: Weight>(a: &dyn Hypergraph<W>, b: &dyn Hypergraph<W>) -> bool {
    std::ptr::eq(
        a as *const dyn Hypergraph<W> as *const u8,
        b as *const dyn Hypergraph<W> as *const u8,
    )
}
