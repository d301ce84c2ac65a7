//! Mutable hypergraph
//!
//! States and arcs live in plain vectors (the arc arena); optional
//! per-state indices are maintained incrementally and can be built or
//! dropped on demand with [`MutableHypergraph::force_properties_on_off`].
//! The held [`Properties`] are derived from which indices exist, so they
//! can never disagree with the representation.

use crate::graph::frozen::FrozenHypergraph;
use crate::graph::{write_hypergraph, HyperArc, Hypergraph, StateLabels};
use crate::types::{ArcId, Properties, StateId};
use crate::vocab::{Sym, Vocabulary, VocabularyPtr};
use crate::weight::Weight;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

type ArcIndex = Option<Vec<Vec<ArcId>>>;

/// A hypergraph that can gain states and arcs.
#[derive(Debug, Clone)]
pub struct MutableHypergraph<W> {
    states: Vec<StateLabels>,
    arcs: Vec<HyperArc<W>>,
    in_arcs: ArcIndex,
    first_tail_out_arcs: ArcIndex,
    out_arcs: ArcIndex,
    start: Option<StateId>,
    final_state: Option<StateId>,
    vocab: VocabularyPtr,
    /// Canonical leaf state per terminal symbol
    lexical_states: FxHashMap<Sym, StateId>,
}

impl<W: Weight> Default for MutableHypergraph<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Weight> MutableHypergraph<W> {
    /// Create an empty graph holding an in-arc index and a fresh vocabulary
    pub fn new() -> Self {
        Self::with_properties(Properties::STORE_IN_ARCS)
    }

    /// Create an empty graph holding exactly the indices in `props`
    pub fn with_properties(props: Properties) -> Self {
        Self::with_vocabulary(Vocabulary::shared(), props)
    }

    /// Create an empty graph over a shared vocabulary
    pub fn with_vocabulary(vocab: VocabularyPtr, props: Properties) -> Self {
        let index = |flag: Properties| props.contains(flag).then(Vec::new);
        Self {
            states: Vec::new(),
            arcs: Vec::new(),
            in_arcs: index(Properties::STORE_IN_ARCS),
            first_tail_out_arcs: index(Properties::STORE_FIRST_TAIL_OUT_ARCS),
            out_arcs: index(Properties::STORE_OUT_ARCS),
            start: None,
            final_state: None,
            vocab,
            lexical_states: FxHashMap::default(),
        }
    }

    /// Deep copy of any hypergraph, holding the indices in `props`.
    ///
    /// The copy shares the source's vocabulary handle.
    pub fn copy_from<H: Hypergraph<W> + ?Sized>(src: &H, props: Properties) -> Self {
        let mut hg = Self::with_vocabulary(Arc::clone(src.vocabulary()), props);
        hg.fill_from(src);
        hg
    }

    /// Replace this graph's contents with a deep copy of `src`, keeping this
    /// graph's vocabulary handle and held indices. Labels are re-interned
    /// when the vocabularies differ.
    pub fn assign_from<H: Hypergraph<W> + ?Sized>(&mut self, src: &H) {
        let mut hg = Self::with_vocabulary(Arc::clone(&self.vocab), self.properties());
        hg.fill_from(src);
        *self = hg;
    }

    fn fill_from<H: Hypergraph<W> + ?Sized>(&mut self, src: &H) {
        self.states.reserve(src.size());
        self.arcs.reserve(src.num_arcs());
        for state in 0..src.size() as StateId {
            let labels = self.import_labels(src, state);
            self.add_state_with_labels(labels);
        }
        for id in src.arc_ids() {
            self.add_arc(src.arc(id).clone());
        }
        self.start = src.start();
        self.final_state = src.final_state();
    }

    /// Switch to `vocab`, re-interning every state label into it.
    pub fn set_vocabulary(&mut self, vocab: VocabularyPtr) {
        if Arc::ptr_eq(&vocab, &self.vocab) {
            return;
        }
        let old = std::mem::replace(&mut self.vocab, vocab);
        let vocab = &self.vocab;
        let reintern = |sym: Option<Sym>| {
            let sym = sym?;
            let text = old.text(sym)?;
            Some(vocab.add(&text, sym.kind))
        };
        self.lexical_states.clear();
        for (id, labels) in self.states.iter_mut().enumerate() {
            labels.input = reintern(labels.input);
            labels.output = reintern(labels.output);
            if let Some(sym) = labels.input.filter(Sym::is_lexical) {
                self.lexical_states.entry(sym).or_insert(id as StateId);
            }
        }
    }

    /// `src`'s labels for `state`, re-interned into this graph's vocabulary.
    pub fn import_labels<H: Hypergraph<W> + ?Sized>(&self, src: &H, state: StateId) -> StateLabels {
        let labels = src.labels(state);
        if Arc::ptr_eq(src.vocabulary(), &self.vocab) {
            return labels;
        }
        let import = |sym: Option<Sym>| {
            let sym = sym?;
            let text = src.vocabulary().text(sym)?;
            Some(self.vocab.add(&text, sym.kind))
        };
        StateLabels {
            input: import(labels.input),
            output: import(labels.output),
        }
    }

    // ─── States ─────────────────────────────────────────────────────────────

    /// Add an unlabelled state
    pub fn add_state(&mut self) -> StateId {
        self.add_state_with_labels(StateLabels::default())
    }

    pub fn add_state_with_labels(&mut self, labels: StateLabels) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(labels);
        for index in [
            &mut self.in_arcs,
            &mut self.first_tail_out_arcs,
            &mut self.out_arcs,
        ]
        .into_iter()
        .flatten()
        {
            index.push(Vec::new());
        }
        if let Some(sym) = labels.input.filter(Sym::is_lexical) {
            self.lexical_states.entry(sym).or_insert(id);
        }
        id
    }

    /// The canonical leaf for terminal `text`, created on first use
    pub fn add_lexical_state(&mut self, text: &str) -> StateId {
        let sym = self.vocab.add_terminal(text);
        if let Some(&state) = self.lexical_states.get(&sym) {
            return state;
        }
        self.add_state_with_labels(StateLabels::both(sym))
    }

    /// A fresh state labelled with nonterminal `text`
    pub fn add_nonterminal_state(&mut self, text: &str) -> StateId {
        let sym = self.vocab.add_nonterminal(text);
        self.add_state_with_labels(StateLabels::both(sym))
    }

    pub fn set_start(&mut self, state: StateId) {
        debug_assert!((state as usize) < self.states.len());
        self.start = Some(state);
    }

    pub fn set_final(&mut self, state: StateId) {
        debug_assert!((state as usize) < self.states.len());
        self.final_state = Some(state);
    }

    // ─── Arcs ───────────────────────────────────────────────────────────────

    pub fn add_arc(&mut self, arc: HyperArc<W>) -> ArcId {
        debug_assert!((arc.head() as usize) < self.states.len());
        debug_assert!(arc.tails().iter().all(|&t| (t as usize) < self.states.len()));
        let id = ArcId(self.arcs.len() as u32);
        Self::index_arc(
            &mut self.in_arcs,
            &mut self.first_tail_out_arcs,
            &mut self.out_arcs,
            id,
            &arc,
        );
        self.arcs.push(arc);
        id
    }

    /// Add the automaton arc `source --label/weight--> dest`.
    ///
    /// The label becomes a second tail on the canonical lexical leaf; an
    /// unlabelled arc is an epsilon arc with the single tail `source`.
    pub fn add_fsm_arc(
        &mut self,
        source: StateId,
        dest: StateId,
        label: Option<&str>,
        weight: W,
    ) -> ArcId {
        let mut tails = vec![source];
        if let Some(text) = label {
            tails.push(self.add_lexical_state(text));
        }
        self.add_arc(HyperArc::new(dest, tails, weight))
    }

    fn index_arc(
        in_arcs: &mut ArcIndex,
        first_tail_out_arcs: &mut ArcIndex,
        out_arcs: &mut ArcIndex,
        id: ArcId,
        arc: &HyperArc<W>,
    ) {
        if let Some(index) = in_arcs {
            index[arc.head() as usize].push(id);
        }
        if let (Some(index), Some(first)) = (first_tail_out_arcs.as_mut(), arc.first_tail()) {
            index[first as usize].push(id);
        }
        if let Some(index) = out_arcs {
            for &t in arc.tails() {
                let list = &mut index[t as usize];
                if list.last() != Some(&id) {
                    list.push(id);
                }
            }
        }
    }

    // ─── Properties ─────────────────────────────────────────────────────────

    /// Build every index in `props` that is not already held
    pub fn force_properties(&mut self, props: Properties) {
        let missing = props.difference(self.properties());
        if missing.is_empty() {
            return;
        }
        let n = self.states.len();
        let fresh = |flag: Properties| missing.contains(flag).then(|| vec![Vec::new(); n]);
        let mut in_arcs = fresh(Properties::STORE_IN_ARCS);
        let mut first_tail_out_arcs = fresh(Properties::STORE_FIRST_TAIL_OUT_ARCS);
        let mut out_arcs = fresh(Properties::STORE_OUT_ARCS);
        for (i, arc) in self.arcs.iter().enumerate() {
            Self::index_arc(
                &mut in_arcs,
                &mut first_tail_out_arcs,
                &mut out_arcs,
                ArcId(i as u32),
                arc,
            );
        }
        if in_arcs.is_some() {
            self.in_arcs = in_arcs;
        }
        if first_tail_out_arcs.is_some() {
            self.first_tail_out_arcs = first_tail_out_arcs;
        }
        if out_arcs.is_some() {
            self.out_arcs = out_arcs;
        }
    }

    /// Build the indices in `on`, then drop those in `off` (unless also in `on`)
    pub fn force_properties_on_off(&mut self, on: Properties, off: Properties) {
        self.force_properties(on);
        let drop = off.difference(on);
        if drop.contains(Properties::STORE_IN_ARCS) {
            self.in_arcs = None;
        }
        if drop.contains(Properties::STORE_FIRST_TAIL_OUT_ARCS) {
            self.first_tail_out_arcs = None;
        }
        if drop.contains(Properties::STORE_OUT_ARCS) {
            self.out_arcs = None;
        }
    }

    pub fn force_first_tail_out_arcs(&mut self) {
        self.force_properties(Properties::STORE_FIRST_TAIL_OUT_ARCS);
    }

    /// Collapse to the canonical empty-language graph: no states, no arcs,
    /// no start or final. Held indices and the vocabulary are kept.
    pub fn set_empty(&mut self) {
        self.states.clear();
        self.arcs.clear();
        for index in [
            &mut self.in_arcs,
            &mut self.first_tail_out_arcs,
            &mut self.out_arcs,
        ]
        .into_iter()
        .flatten()
        {
            index.clear();
        }
        self.start = None;
        self.final_state = None;
        self.lexical_states.clear();
    }

    /// Structurally immutable view of this graph
    pub fn freeze(self) -> FrozenHypergraph<W> {
        FrozenHypergraph::new(self)
    }
}

impl<W: Weight> Hypergraph<W> for MutableHypergraph<W> {
    fn properties(&self) -> Properties {
        let mut props = Properties::NONE;
        if self.in_arcs.is_some() {
            props |= Properties::STORE_IN_ARCS;
        }
        if self.first_tail_out_arcs.is_some() {
            props |= Properties::STORE_FIRST_TAIL_OUT_ARCS;
        }
        if self.out_arcs.is_some() {
            props |= Properties::STORE_OUT_ARCS;
        }
        props
    }

    fn vocabulary(&self) -> &VocabularyPtr {
        &self.vocab
    }

    fn start(&self) -> Option<StateId> {
        self.start
    }

    fn final_state(&self) -> Option<StateId> {
        self.final_state
    }

    fn size(&self) -> usize {
        self.states.len()
    }

    fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    fn arc(&self, id: ArcId) -> &HyperArc<W> {
        &self.arcs[id.index()]
    }

    fn weight_mut(&mut self, id: ArcId) -> &mut W {
        self.arcs[id.index()].weight_mut()
    }

    fn labels(&self, state: StateId) -> StateLabels {
        self.states[state as usize]
    }

    fn in_arc_ids(&self, state: StateId) -> &[ArcId] {
        self.in_arcs
            .as_ref()
            .map_or(&[], |index| index[state as usize].as_slice())
    }

    fn first_tail_out_arc_ids(&self, state: StateId) -> &[ArcId] {
        self.first_tail_out_arcs
            .as_ref()
            .map_or(&[], |index| index[state as usize].as_slice())
    }

    fn out_arc_ids(&self, state: StateId) -> &[ArcId] {
        self.out_arcs
            .as_ref()
            .map_or(&[], |index| index[state as usize].as_slice())
    }

    fn is_mutable(&self) -> bool {
        true
    }

    fn as_mutable(&mut self) -> Option<&mut MutableHypergraph<W>> {
        Some(self)
    }
}

impl<W: Weight> fmt::Display for MutableHypergraph<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hypergraph(self, f)
    }
}
