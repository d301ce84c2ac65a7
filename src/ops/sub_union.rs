//! Span-level union of two derivation forests.
//!
//! Plain union only joins two forests at the root. Sub-union additionally
//! identifies states of the second forest with states of the first that
//! cover the same source span, so a subtree of one can combine with a
//! sibling subtree of the other. The result always starts as a copy of the
//! first forest; states and arcs of the second are grafted onto it
//! bottom-up.

use crate::errors::Result;
use crate::graph::{HyperArc, Hypergraph, HypergraphPtr, MutableHypergraph, StateLabels};
use crate::ops::spans::{infer_spans, StateSpans};
use crate::ops::union::{same_graph, union_into};
use crate::transform::{Transform, TransformMode};
use crate::types::{Properties, Span, StateId};
use crate::weight::Weight;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const NAME: &str = "SubUnion";

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubUnionOptions {
    /// Only reuse a first-forest state when some path below it was itself
    /// matched; otherwise a fresh state is created.
    pub require_path_overlap: bool,
    /// Also add the plain union of the two forests.
    pub add_standard_union: bool,
}

impl Default for SubUnionOptions {
    fn default() -> Self {
        Self {
            require_path_overlap: false,
            add_standard_union: true,
        }
    }
}

impl SubUnionOptions {
    pub fn with_require_path_overlap(mut self, value: bool) -> Self {
        self.require_path_overlap = value;
        self
    }

    pub fn with_add_standard_union(mut self, value: bool) -> Self {
        self.add_standard_union = value;
        self
    }
}

// ============================================================================
// Algorithm
// ============================================================================

/// Result states standing for one second-forest state.
#[derive(Debug, Clone, Default)]
struct Equivalents {
    /// Matched an existing state along every tail of some arc
    is_union: bool,
    states: Vec<StateId>,
}

struct Grafter<'a, W, H: ?Sized> {
    hg: &'a H,
    spans: &'a StateSpans,
    result: &'a mut MutableHypergraph<W>,
    result_by_span: &'a BTreeMap<Span, Vec<StateId>>,
    result_arcs: FxHashSet<Vec<StateId>>,
    memo: Vec<Option<Equivalents>>,
    options: &'a SubUnionOptions,
}

/// One second-forest state whose in-arcs are being grafted.
struct Frame {
    head: StateId,
    span: Span,
    lexical: bool,
    /// Position in `in_arc_ids(head)`
    arc: usize,
    /// Position in the current arc's tails
    tail: usize,
    all_union: bool,
    is_union: bool,
    slots: Vec<Vec<StateId>>,
    tails_per_arc: Vec<Vec<Vec<StateId>>>,
}

impl<W: Weight, H: Hypergraph<W> + ?Sized> Grafter<'_, W, H> {
    fn frame(&self, head: StateId, parent: Span) -> Frame {
        let lexical = self.hg.has_lexical_label(head);
        let found = self.spans.get(head);
        let mut span = found.unwrap_or(Span::NULL);
        if found.is_some() && !lexical && !span.within(&parent) {
            span = Span::NULL;
        }
        Frame {
            head,
            span,
            lexical,
            arc: 0,
            tail: 0,
            all_union: true,
            is_union: false,
            slots: Vec::new(),
            tails_per_arc: Vec::new(),
        }
    }

    /// Post-order walk below `root`. A state's span is checked against the
    /// first parent that reaches it; later parents reuse the memo.
    fn graft(&mut self, root: StateId, parent: Span) -> Equivalents {
        let hg = self.hg;
        if self.memo[root as usize].is_none() {
            let mut stack = vec![self.frame(root, parent)];
            while let Some(top) = stack.last_mut() {
                let arcs = hg.in_arc_ids(top.head);
                if let Some(&id) = arcs.get(top.arc) {
                    let tails = hg.arc(id).tails();
                    if let Some(&t) = tails.get(top.tail) {
                        match &self.memo[t as usize] {
                            Some(eq) => {
                                top.all_union &= eq.is_union;
                                top.slots.push(eq.states.clone());
                                top.tail += 1;
                            }
                            None => {
                                let child = self.frame(t, top.span);
                                stack.push(child);
                            }
                        }
                    } else {
                        top.is_union |= top.all_union;
                        let slots = std::mem::take(&mut top.slots);
                        top.tails_per_arc.push(slots);
                        top.arc += 1;
                        top.tail = 0;
                        top.all_union = true;
                    }
                    continue;
                }
                if let Some(done) = stack.pop() {
                    let (head, eq) = self.finish(done);
                    self.memo[head as usize] = Some(eq);
                }
            }
        }
        self.memo[root as usize].clone().unwrap_or_default()
    }

    /// Match or create the result states for a fully visited frame and add
    /// its arcs.
    fn finish(&mut self, frame: Frame) -> (StateId, Equivalents) {
        let Frame {
            head,
            span: head_span,
            lexical,
            mut is_union,
            tails_per_arc,
            ..
        } = frame;
        if head_span.is_null() {
            return (head, Equivalents::default());
        }

        let head_text = self.hg.label_text(head);
        let mut states = Vec::new();
        if let Some(candidates) = self.result_by_span.get(&head_span) {
            for &s in candidates {
                if self.result.has_lexical_label(s) {
                    if lexical && self.result.label_text(s) == head_text {
                        is_union = true;
                        states.push(s);
                    }
                } else if !lexical {
                    states.push(s);
                }
            }
        }

        if states.is_empty() || (self.options.require_path_overlap && !is_union) {
            let labels = match head_text.as_deref() {
                Some(text) if lexical => StateLabels::both(self.result.vocabulary().add_terminal(text)),
                _ => StateLabels::both(
                    self.result
                        .vocabulary()
                        .add_nonterminal(&head_span.to_string()),
                ),
            };
            states = vec![self.result.add_state_with_labels(labels)];
            hg_debug!("state {} ({}): new state {}", head, head_span, states[0]);
        }

        for &new_head in &states {
            for slots in &tails_per_arc {
                for tails in cartesian_product(slots) {
                    let mut key = tails.clone();
                    key.push(new_head);
                    if self.result_arcs.insert(key) {
                        self.result.add_arc(HyperArc::new(new_head, tails, W::one()));
                    }
                }
            }
        }

        hg_debug!(
            "state {} ({}): {} equivalents{}",
            head,
            head_span,
            states.len(),
            if is_union { ", union" } else { "" }
        );
        (head, Equivalents { is_union, states })
    }
}

/// Every choice of one state per slot. An empty slot yields nothing.
fn cartesian_product(slots: &[Vec<StateId>]) -> Vec<Vec<StateId>> {
    let mut out: Vec<Vec<StateId>> = vec![Vec::with_capacity(slots.len())];
    for slot in slots {
        out = out
            .iter()
            .flat_map(|prefix| {
                slot.iter().map(move |&s| {
                    let mut next = prefix.clone();
                    next.push(s);
                    next
                })
            })
            .collect();
        if out.is_empty() {
            break;
        }
    }
    out
}

/// Union `hg1` and `hg2` at the level of matching source spans into
/// `result`.
///
/// `result` is replaced by a copy of `hg1` (keeping its own vocabulary and
/// gaining an in-arc index), then every state of `hg2` below its final is
/// either matched to first-forest states covering the same span or added
/// fresh. Grafted arcs carry weight one. Both inputs must be acyclic; the
/// in-arc index is built on a temporary copy when an input lacks it.
pub fn sub_union<W: Weight>(
    hg1: &dyn Hypergraph<W>,
    hg2: &dyn Hypergraph<W>,
    result: &mut MutableHypergraph<W>,
    options: &SubUnionOptions,
) -> Result<()> {
    let copy1;
    let hg1 = if hg1.properties().contains(Properties::STORE_IN_ARCS) {
        hg1
    } else {
        copy1 = MutableHypergraph::copy_from(hg1, hg1.properties() | Properties::STORE_IN_ARCS);
        &copy1 as &dyn Hypergraph<W>
    };
    let copy2;
    let hg2 = if hg2.properties().contains(Properties::STORE_IN_ARCS) {
        hg2
    } else {
        copy2 = MutableHypergraph::copy_from(hg2, hg2.properties() | Properties::STORE_IN_ARCS);
        &copy2 as &dyn Hypergraph<W>
    };

    let spans1 = infer_spans(hg1)?;
    let spans2 = infer_spans(hg2)?;
    let by_span1 = spans1.by_span();
    hg_debug!("sub-union: {} spans in first, {} in second", spans1.len(), spans2.len());

    result.assign_from(hg1);
    result.force_properties(Properties::STORE_IN_ARCS);

    if let Some(final2) = hg2.final_state() {
        let result_arcs = result
            .arc_ids()
            .map(|id| result.arc(id).structure_key())
            .collect();
        let mut grafter = Grafter {
            hg: hg2,
            spans: &spans2,
            result: &mut *result,
            result_by_span: &by_span1,
            result_arcs,
            memo: vec![None; hg2.size()],
            options,
        };
        grafter.graft(final2, Span::NULL);
    }

    if options.add_standard_union {
        union_into(hg2, result);
    }
    Ok(())
}

// ============================================================================
// Transform
// ============================================================================

/// Sub-union of the input with a fixed second forest.
#[derive(Clone)]
pub struct SubUnion<W: Weight> {
    other: HypergraphPtr<W>,
    options: SubUnionOptions,
}

impl<W: Weight> SubUnion<W> {
    pub fn new(other: HypergraphPtr<W>, options: SubUnionOptions) -> Self {
        Self { other, options }
    }

    pub fn options(&self) -> &SubUnionOptions {
        &self.options
    }
}

impl<W: Weight> Transform<W> for SubUnion<W> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn mode(&self) -> TransformMode {
        TransformMode::Inout
    }

    fn in_add_props(&self) -> Properties {
        Properties::STORE_IN_ARCS
    }

    fn needs_copy(&self, hg: &dyn Hypergraph<W>) -> bool {
        same_graph(hg, self.other.as_ref())
    }

    fn inout(&self, input: &dyn Hypergraph<W>, output: &mut MutableHypergraph<W>) -> Result<()> {
        sub_union(input, self.other.as_ref(), output, &self.options)
    }
}
