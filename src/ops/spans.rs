//! Source span inference
//!
//! Assigns each state in a derivation forest the source interval it covers.
//! Spans come from two places: the cover of an arc's tail spans, and the
//! state's own label, which by convention reads like `"2-3"` or `"2-3.NP"`.
//! The pass runs bottom-up (tail covers vote on each bound, falling back to
//! the label when the votes are not unanimous), then top-down (an arc's
//! first and last tails inherit a missing left or right bound from the
//! head), and finally drops spans that would make a tail indistinguishable
//! from its head.

use crate::errors::{HypergraphError, Result};
use crate::graph::algorithms::{derivation_states, require_acyclic, require_properties};
use crate::graph::Hypergraph;
use crate::types::{Properties, Span, StateId};
use crate::weight::Weight;
use std::collections::BTreeMap;

const NAME: &str = "SubUnion";

/// Inferred spans, one optional entry per state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSpans {
    spans: Vec<Option<Span>>,
}

impl StateSpans {
    pub fn get(&self, state: StateId) -> Option<Span> {
        self.spans.get(state as usize).copied().flatten()
    }

    /// States with a span, in id order
    pub fn iter(&self) -> impl Iterator<Item = (StateId, Span)> + '_ {
        self.spans
            .iter()
            .enumerate()
            .filter_map(|(s, span)| span.map(|span| (s as StateId, span)))
    }

    /// Number of states with a span
    pub fn len(&self) -> usize {
        self.spans.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inverse mapping: every span to the states carrying it, in id order.
    pub fn by_span(&self) -> BTreeMap<Span, Vec<StateId>> {
        let mut out: BTreeMap<Span, Vec<StateId>> = BTreeMap::new();
        for (state, span) in self.iter() {
            out.entry(span).or_default().push(state);
        }
        out
    }
}

/// Span read from a state's input label, [`Span::NULL`] if it has none.
pub fn span_from_label<W: Weight, H: Hypergraph<W> + ?Sized>(hg: &H, state: StateId) -> Span {
    hg.label_text(state)
        .map_or(Span::NULL, |text| Span::parse(&text))
}

/// Infer spans for every state below the final state.
///
/// Requires `STORE_IN_ARCS` and an acyclic graph. A graph without a final
/// state yields no spans.
pub fn infer_spans<W: Weight, H: Hypergraph<W> + ?Sized>(hg: &H) -> Result<StateSpans> {
    let mut spans = vec![None; hg.size()];
    if hg.final_state().is_none() {
        return Ok(StateSpans { spans });
    }
    require_properties(hg, Properties::STORE_IN_ARCS, NAME)?;
    let order = require_acyclic(hg, NAME)?;
    let below = derivation_states(hg);

    bubble_up(hg, &order, &below, &mut spans);
    bubble_down(hg, &order, &below, &mut spans)?;
    remove_invalid(hg, &mut spans);
    Ok(StateSpans { spans })
}

#[derive(Debug, Default)]
struct BoundVotes {
    counts: BTreeMap<u32, usize>,
    undefined: usize,
}

impl BoundVotes {
    fn add(&mut self, bound: Option<u32>) {
        match bound {
            Some(b) => *self.counts.entry(b).or_insert(0) += 1,
            None => self.undefined += 1,
        }
    }

    fn is_unanimous(&self) -> bool {
        self.counts.len() == 1
    }

    /// Most voted bound. Ties go to the smallest; "undefined" only wins
    /// with a strictly larger count.
    fn winner(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for (&bound, &count) in &self.counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((bound, count));
            }
        }
        match best {
            Some((bound, count)) if count >= self.undefined => Some(bound),
            _ => None,
        }
    }
}

fn bubble_up<W: Weight, H: Hypergraph<W> + ?Sized>(
    hg: &H,
    order: &[StateId],
    below: &[bool],
    spans: &mut [Option<Span>],
) {
    for &s in order {
        if !below[s as usize] {
            continue;
        }
        if hg.has_lexical_label(s) {
            spans[s as usize] = Some(Span::NULL);
            continue;
        }

        let mut left = BoundVotes::default();
        let mut right = BoundVotes::default();
        for &id in hg.in_arc_ids(s) {
            let mut cover = Span::NULL;
            for &t in hg.arc(id).tails() {
                if let Some(span) = &spans[t as usize] {
                    cover.grow_if_defined(span);
                }
            }
            if let Some(l) = cover.left {
                left.add(Some(l));
            }
            if let Some(r) = cover.right {
                right.add(Some(r));
            }
        }

        if !left.is_unanimous() || !right.is_unanimous() {
            let labelled = span_from_label(hg, s);
            left.add(labelled.left);
            right.add(labelled.right);
        }

        spans[s as usize] = Some(Span {
            left: left.winner(),
            right: right.winner(),
        });
    }
}

fn bubble_down<W: Weight, H: Hypergraph<W> + ?Sized>(
    hg: &H,
    order: &[StateId],
    below: &[bool],
    spans: &mut [Option<Span>],
) -> Result<()> {
    for &s in order.iter().rev() {
        if !below[s as usize] {
            continue;
        }
        let head = spans[s as usize].unwrap_or(Span::NULL);
        for &id in hg.in_arc_ids(s) {
            let tails = hg.arc(id).tails();
            let last = tails.len().saturating_sub(1);
            for (i, &t) in tails.iter().enumerate() {
                let span = spans[t as usize].as_mut().ok_or_else(|| {
                    HypergraphError::internal(format!("state {t} should have had a span stored"))
                })?;
                if i == 0 && span.left.is_none() {
                    span.left = head.left;
                }
                if i == last && span.right.is_none() {
                    span.right = head.right;
                }
            }
        }
    }
    Ok(())
}

fn remove_invalid<W: Weight, H: Hypergraph<W> + ?Sized>(hg: &H, spans: &mut [Option<Span>]) {
    for id in hg.arc_ids() {
        let arc = hg.arc(id);
        let Some(head) = spans[arc.head() as usize] else {
            continue;
        };
        for &t in arc.tails() {
            if !hg.has_lexical_label(t) && spans[t as usize] == Some(head) {
                spans[t as usize] = None;
            }
        }
    }
    for span in spans.iter_mut() {
        if span.is_some_and(|s| s.is_null()) {
            *span = None;
        }
    }
}
