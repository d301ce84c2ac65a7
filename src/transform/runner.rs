//! Transform dispatch.
//!
//! Every entry point first decides a [`DispatchPlan`] from the transform's
//! declared mode, `needs` and `needs_copy`, then executes it. Planning never
//! mutates anything, so a plan can be inspected (and logged) before any
//! graph is touched.
//!
//! | entry point          | input                  | output                         |
//! |----------------------|------------------------|--------------------------------|
//! | [`inplace`]          | `&mut MutableHypergraph` | same graph                   |
//! | [`try_inplace`]      | `&mut dyn Hypergraph`  | same graph, error if immutable |
//! | [`inout`]            | `&dyn Hypergraph`      | caller's `MutableHypergraph`   |
//! | [`transformed`]      | shared handle          | same handle if not needed      |
//! | [`transformed_copy`] | `&dyn Hypergraph`      | always a new graph             |
//! | [`inplace_shared`]   | `&mut` shared handle   | mutated or replaced handle     |
//! | [`inplace_batch`]    | slice of graphs        | each mutated, in parallel      |

use crate::errors::{HypergraphError, Result};
use crate::graph::{Hypergraph, HypergraphPtr, MutableHypergraph};
use crate::transform::traits::{Transform, TransformMode};
use crate::types::Properties;
use crate::weight::Weight;
use rayon::prelude::*;
use std::sync::Arc;

// ============================================================================
// Planning
// ============================================================================

/// What dispatch will do for one transform application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPlan {
    /// `needs` is false: only output properties (and vocabulary) change.
    AlreadySatisfied,
    /// Run the transform's in-place algorithm on the graph itself.
    MutateInPlace,
    /// Copy the input (holding `input_props`) into the output, then run the
    /// in-place algorithm on the copy.
    CopyThenMutate { input_props: Properties },
    /// Run the input→output algorithm into a fresh graph. The input is
    /// copied first only if it cannot provide `input_props` itself.
    TransformIntoNew { input_props: Properties },
}

/// Plan for mutating `hg` in place.
///
/// Fails with [`HypergraphError::SelfModify`] when the transform is
/// in-place only but would have to read a copy of its own operand.
pub fn plan_inplace<W: Weight, T: Transform<W> + ?Sized>(
    t: &T,
    hg: &dyn Hypergraph<W>,
) -> Result<DispatchPlan> {
    if !t.needs(hg) {
        return Ok(DispatchPlan::AlreadySatisfied);
    }
    plan_needed_inplace(t, hg)
}

fn plan_needed_inplace<W: Weight, T: Transform<W> + ?Sized>(
    t: &T,
    hg: &dyn Hypergraph<W>,
) -> Result<DispatchPlan> {
    let input_props = t.in_add_props();
    match t.mode() {
        TransformMode::Inplace if t.needs_copy(hg) => Err(HypergraphError::self_modify(t.name())),
        TransformMode::Inplace => Ok(DispatchPlan::MutateInPlace),
        TransformMode::OptionalInplace if t.needs_copy(hg) => {
            Ok(DispatchPlan::TransformIntoNew { input_props })
        }
        TransformMode::OptionalInplace => Ok(DispatchPlan::MutateInPlace),
        TransformMode::Inout => Ok(DispatchPlan::TransformIntoNew { input_props }),
    }
}

/// Plan for transforming `input` into a separate output graph.
pub fn plan_inout<W: Weight, T: Transform<W> + ?Sized>(t: &T, input: &dyn Hypergraph<W>) -> DispatchPlan {
    if !t.needs(input) {
        return DispatchPlan::AlreadySatisfied;
    }
    match t.mode() {
        TransformMode::Inplace => DispatchPlan::CopyThenMutate {
            input_props: t.in_add_props() | t.new_out_add_props(),
        },
        TransformMode::Inout | TransformMode::OptionalInplace => DispatchPlan::TransformIntoNew {
            input_props: t.in_add_props(),
        },
    }
}

// ============================================================================
// Execution
// ============================================================================

fn force_out_props<W: Weight, T: Transform<W> + ?Sized>(hg: &mut MutableHypergraph<W>, t: &T) {
    hg.force_properties_on_off(t.out_add_props(), t.out_sub_props());
}

fn new_output<W: Weight, T: Transform<W> + ?Sized>(
    t: &T,
    input: &dyn Hypergraph<W>,
    props: Properties,
) -> MutableHypergraph<W> {
    MutableHypergraph::with_vocabulary(
        t.output_vocabulary(input.vocabulary()),
        (props | t.new_out_add_props()).difference(t.out_sub_props()),
    )
}

fn execute_inplace<W: Weight, T: Transform<W> + ?Sized>(
    hg: &mut MutableHypergraph<W>,
    t: &T,
    plan: DispatchPlan,
) -> Result<bool> {
    hg_debug!("{} in place: {:?}", t.name(), plan);
    match plan {
        DispatchPlan::AlreadySatisfied => {
            let vocab = t.output_vocabulary(hg.vocabulary());
            hg.set_vocabulary(vocab);
            force_out_props(hg, t);
            Ok(false)
        }
        DispatchPlan::MutateInPlace => {
            let vocab = t.output_vocabulary(hg.vocabulary());
            hg.set_vocabulary(vocab);
            hg.force_properties(t.in_add_props());
            t.inplace(hg)?;
            force_out_props(hg, t);
            Ok(true)
        }
        DispatchPlan::CopyThenMutate { input_props }
        | DispatchPlan::TransformIntoNew { input_props } => {
            hg.force_properties(input_props);
            let mut out = new_output(t, &*hg, Properties::NONE);
            t.inout(&*hg, &mut out)?;
            *hg = out;
            force_out_props(hg, t);
            Ok(true)
        }
    }
}

fn execute_inout<W: Weight, T: Transform<W> + ?Sized>(
    input: &dyn Hypergraph<W>,
    output: &mut MutableHypergraph<W>,
    t: &T,
    plan: DispatchPlan,
) -> Result<bool> {
    hg_debug!("{} input->output: {:?}", t.name(), plan);
    let vocab = t.output_vocabulary(input.vocabulary());
    match plan {
        DispatchPlan::AlreadySatisfied => {
            let props = (output.properties() | t.out_add_props()).difference(t.out_sub_props());
            *output = MutableHypergraph::with_vocabulary(vocab, props);
            output.assign_from(input);
            Ok(false)
        }
        DispatchPlan::MutateInPlace => execute_inout(
            input,
            output,
            t,
            DispatchPlan::CopyThenMutate {
                input_props: t.in_add_props(),
            },
        ),
        DispatchPlan::CopyThenMutate { input_props } => {
            *output = MutableHypergraph::with_vocabulary(vocab, output.properties() | input_props);
            output.assign_from(input);
            let plan = plan_needed_inplace(t, &*output)?;
            execute_inplace(output, t, plan)?;
            Ok(true)
        }
        DispatchPlan::TransformIntoNew { input_props } => {
            let copy;
            let source: &dyn Hypergraph<W> = if input.properties().contains(input_props) {
                input
            } else {
                copy = MutableHypergraph::copy_from(input, input.properties() | input_props);
                &copy
            };
            *output = new_output(t, source, output.properties());
            force_out_props(output, t);
            t.inout(source, output)?;
            force_out_props(output, t);
            Ok(true)
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Apply `t` to `hg` in place. Returns whether the transform ran.
///
/// When not needed, only output properties are forced. Inout-only
/// transforms run into a fresh graph that replaces `hg` on success; on
/// error `hg` keeps its original contents.
pub fn inplace<W: Weight, T: Transform<W> + ?Sized>(hg: &mut MutableHypergraph<W>, t: &T) -> Result<bool> {
    trace_transform!(t.name());
    let plan = plan_inplace(t, &*hg)?;
    execute_inplace(hg, t, plan)
}

/// Apply `t` in place even if `needs` says the input already satisfies it.
pub fn inplace_always<W: Weight, T: Transform<W> + ?Sized>(
    hg: &mut MutableHypergraph<W>,
    t: &T,
) -> Result<()> {
    trace_transform!(t.name());
    let plan = plan_needed_inplace(t, &*hg)?;
    execute_inplace(hg, t, plan).map(|_| ())
}

/// Apply `t` in place, failing with [`HypergraphError::Immutable`] if `hg`
/// is structurally immutable.
pub fn try_inplace<W: Weight, T: Transform<W> + ?Sized>(hg: &mut dyn Hypergraph<W>, t: &T) -> Result<bool> {
    let name = t.name();
    let mutable = hg
        .as_mutable()
        .ok_or_else(|| HypergraphError::immutable(name))?;
    inplace(mutable, t)
}

/// Transform `input` into `output`, never touching `input`.
///
/// `output`'s previous contents are replaced. Its vocabulary becomes the
/// transform's configured vocabulary, else `input`'s, on every path.
pub fn inout<W: Weight, T: Transform<W> + ?Sized>(
    input: &dyn Hypergraph<W>,
    output: &mut MutableHypergraph<W>,
    t: &T,
) -> Result<bool> {
    trace_transform!(t.name());
    let plan = plan_inout(t, input);
    execute_inout(input, output, t, plan)
}

/// The transformed graph as a shared handle; the *same* handle when the
/// transform is not needed.
pub fn transformed<W: Weight, T: Transform<W> + ?Sized>(
    hg: &HypergraphPtr<W>,
    t: &T,
) -> Result<HypergraphPtr<W>> {
    trace_transform!(t.name());
    let plan = plan_inout(t, hg.as_ref());
    if plan == DispatchPlan::AlreadySatisfied {
        return Ok(Arc::clone(hg));
    }
    let mut out = MutableHypergraph::with_properties(t.new_out_add_props());
    execute_inout(hg.as_ref(), &mut out, t, plan)?;
    Ok(Arc::new(out))
}

/// The transformed graph, always as a new graph.
pub fn transformed_copy<W: Weight, T: Transform<W> + ?Sized>(
    hg: &dyn Hypergraph<W>,
    t: &T,
) -> Result<MutableHypergraph<W>> {
    let mut out = MutableHypergraph::with_properties(t.new_out_add_props());
    inout(hg, &mut out, t)?;
    Ok(out)
}

/// Apply `t` through a shared handle.
///
/// A uniquely owned mutable graph is modified in place. Otherwise the
/// handle is pointed at a new graph; when the transform is not needed this
/// only happens if the output properties or vocabulary differ from the
/// input's.
pub fn inplace_shared<W: Weight, T: Transform<W> + ?Sized>(
    hg: &mut HypergraphPtr<W>,
    t: &T,
) -> Result<bool> {
    if let Some(mutable) = Arc::get_mut(hg).and_then(|h| h.as_mutable()) {
        return inplace(mutable, t);
    }

    trace_transform!(t.name());
    let input: &dyn Hypergraph<W> = hg.as_ref();
    let plan = plan_inout(t, input);
    if plan == DispatchPlan::AlreadySatisfied {
        let props = input.properties();
        let wanted = (props | t.out_add_props()).difference(t.out_sub_props());
        let vocab = t.output_vocabulary(input.vocabulary());
        if props != wanted || !Arc::ptr_eq(&vocab, input.vocabulary()) {
            let mut replacement = MutableHypergraph::with_vocabulary(vocab, wanted);
            replacement.assign_from(input);
            *hg = Arc::new(replacement);
        }
        return Ok(false);
    }

    let mut out = MutableHypergraph::with_properties(t.new_out_add_props());
    execute_inout(input, &mut out, t, plan)?;
    *hg = Arc::new(out);
    Ok(true)
}

/// Apply `t` in place to many independent graphs in parallel.
///
/// Results are in the same order as `graphs`; a failure leaves only that
/// graph unchanged.
pub fn inplace_batch<W, T>(graphs: &mut [MutableHypergraph<W>], t: &T) -> Vec<Result<bool>>
where
    W: Weight,
    T: Transform<W> + Sync + ?Sized,
{
    graphs.par_iter_mut().map(|hg| inplace(hg, t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FrozenHypergraph;
    use crate::transform::traits::NoopTransform;
    use crate::types::ArcId;
    use crate::vocab::{Vocabulary, VocabularyPtr};
    use crate::weight::ViterbiWeight;

    /// Multiplies every arc cost; in place only.
    struct ScaleCosts {
        factor: f64,
        needs_copy: bool,
    }

    impl ScaleCosts {
        fn by(factor: f64) -> Self {
            Self {
                factor,
                needs_copy: false,
            }
        }
    }

    impl Transform<ViterbiWeight> for ScaleCosts {
        fn name(&self) -> &'static str {
            "ScaleCosts"
        }

        fn mode(&self) -> TransformMode {
            TransformMode::Inplace
        }

        fn in_add_props(&self) -> Properties {
            Properties::STORE_FIRST_TAIL_OUT_ARCS
        }

        fn needs(&self, hg: &dyn Hypergraph<ViterbiWeight>) -> bool {
            hg.num_arcs() > 0
        }

        fn needs_copy(&self, _hg: &dyn Hypergraph<ViterbiWeight>) -> bool {
            self.needs_copy
        }

        fn inplace(&self, hg: &mut MutableHypergraph<ViterbiWeight>) -> Result<()> {
            if !hg.properties().contains(self.in_add_props()) {
                return Err(HypergraphError::internal("input properties were not forced"));
            }
            for id in hg.arc_ids() {
                hg.weight_mut(id).0 *= self.factor;
            }
            Ok(())
        }
    }

    /// Copies the input and adds one state; input→output only.
    struct AppendState {
        vocab: Option<VocabularyPtr>,
    }

    impl Transform<ViterbiWeight> for AppendState {
        fn name(&self) -> &'static str {
            "AppendState"
        }

        fn out_add_props(&self) -> Properties {
            Properties::STORE_OUT_ARCS
        }

        fn vocabulary(&self) -> Option<&VocabularyPtr> {
            self.vocab.as_ref()
        }

        fn inout(
            &self,
            input: &dyn Hypergraph<ViterbiWeight>,
            output: &mut MutableHypergraph<ViterbiWeight>,
        ) -> Result<()> {
            output.assign_from(input);
            output.add_state();
            Ok(())
        }
    }

    /// Never needed; drops the in-arc index and adds out-arcs.
    struct Satisfied;

    impl Transform<ViterbiWeight> for Satisfied {
        fn name(&self) -> &'static str {
            "Satisfied"
        }

        fn out_add_props(&self) -> Properties {
            Properties::STORE_OUT_ARCS
        }

        fn out_sub_props(&self) -> Properties {
            Properties::STORE_IN_ARCS
        }

        fn needs(&self, _hg: &dyn Hypergraph<ViterbiWeight>) -> bool {
            false
        }
    }

    /// In place only, with a configured vocabulary; optionally not needed.
    struct Revocab {
        vocab: VocabularyPtr,
        needed: bool,
    }

    impl Transform<ViterbiWeight> for Revocab {
        fn name(&self) -> &'static str {
            "Revocab"
        }

        fn mode(&self) -> TransformMode {
            TransformMode::Inplace
        }

        fn needs(&self, _hg: &dyn Hypergraph<ViterbiWeight>) -> bool {
            self.needed
        }

        fn vocabulary(&self) -> Option<&VocabularyPtr> {
            Some(&self.vocab)
        }

        fn inplace(&self, _hg: &mut MutableHypergraph<ViterbiWeight>) -> Result<()> {
            Ok(())
        }
    }

    fn words<H: Hypergraph<ViterbiWeight> + ?Sized>(hg: &H) -> Vec<String> {
        (0..hg.size() as u32)
            .filter(|&s| hg.has_lexical_label(s))
            .filter_map(|s| hg.label_text(s).map(|t| t.to_string()))
            .collect()
    }

    fn two_arcs() -> MutableHypergraph<ViterbiWeight> {
        let mut hg = MutableHypergraph::new();
        let s0 = hg.add_state();
        let s1 = hg.add_state();
        let s2 = hg.add_state();
        hg.add_fsm_arc(s0, s1, Some("a"), ViterbiWeight(1.0));
        hg.add_fsm_arc(s1, s2, Some("b"), ViterbiWeight(2.0));
        hg.set_start(s0);
        hg.set_final(s2);
        hg
    }

    #[test]
    fn test_plan_inplace() {
        let hg = two_arcs();
        assert_eq!(
            plan_inplace(&ScaleCosts::by(2.0), &hg).unwrap(),
            DispatchPlan::MutateInPlace
        );
        assert_eq!(
            plan_inplace(&Satisfied, &hg).unwrap(),
            DispatchPlan::AlreadySatisfied
        );
        assert_eq!(
            plan_inplace(&AppendState { vocab: None }, &hg).unwrap(),
            DispatchPlan::TransformIntoNew {
                input_props: Properties::NONE
            }
        );

        let self_reading = ScaleCosts {
            factor: 2.0,
            needs_copy: true,
        };
        let err = plan_inplace(&self_reading, &hg).unwrap_err();
        assert!(matches!(err, HypergraphError::SelfModify { .. }));
    }

    #[test]
    fn test_plan_inout() {
        let hg = two_arcs();
        assert!(matches!(
            plan_inout(&ScaleCosts::by(2.0), &hg),
            DispatchPlan::CopyThenMutate { input_props } if input_props.contains(Properties::STORE_FIRST_TAIL_OUT_ARCS)
        ));
        assert_eq!(plan_inout(&Satisfied, &hg), DispatchPlan::AlreadySatisfied);
    }

    #[test]
    fn test_inplace_forces_input_props_and_runs() {
        let mut hg = two_arcs();
        assert!(!hg.properties().contains(Properties::STORE_FIRST_TAIL_OUT_ARCS));

        assert!(inplace(&mut hg, &ScaleCosts::by(3.0)).unwrap());
        assert_eq!(hg.arc(ArcId(0)).weight(), &ViterbiWeight(3.0));
        assert_eq!(hg.arc(ArcId(1)).weight(), &ViterbiWeight(6.0));
    }

    #[test]
    fn test_inplace_not_needed_forces_output_props() {
        let mut hg = two_arcs();
        assert!(!inplace(&mut hg, &Satisfied).unwrap());
        assert_eq!(hg.properties(), Properties::STORE_OUT_ARCS);
        assert_eq!(hg.num_arcs(), 2);
    }

    #[test]
    fn test_inplace_self_modify_leaves_graph_alone() {
        let mut hg = two_arcs();
        let t = ScaleCosts {
            factor: 3.0,
            needs_copy: true,
        };
        assert!(inplace(&mut hg, &t).is_err());
        assert_eq!(hg.arc(ArcId(0)).weight(), &ViterbiWeight(1.0));
    }

    #[test]
    fn test_inplace_runs_inout_only_transform() {
        let mut hg = two_arcs();
        let before = hg.size();
        assert!(inplace(&mut hg, &AppendState { vocab: None }).unwrap());
        assert_eq!(hg.size(), before + 1);
        assert!(hg.properties().contains(Properties::STORE_OUT_ARCS));
    }

    #[test]
    fn test_inout_copies_then_mutates() {
        let input = two_arcs();
        let mut output = MutableHypergraph::new();
        assert!(inout(&input, &mut output, &ScaleCosts::by(2.0)).unwrap());

        assert_eq!(input.arc(ArcId(0)).weight(), &ViterbiWeight(1.0));
        assert_eq!(output.arc(ArcId(0)).weight(), &ViterbiWeight(2.0));
        assert_eq!(output.final_state(), input.final_state());
    }

    #[test]
    fn test_inout_vocabulary_propagation() {
        let input = two_arcs();
        let configured = Vocabulary::shared();

        let mut output = MutableHypergraph::new();
        inout(
            &input,
            &mut output,
            &AppendState {
                vocab: Some(Arc::clone(&configured)),
            },
        )
        .unwrap();
        assert!(Arc::ptr_eq(output.vocabulary(), &configured));

        let mut output = MutableHypergraph::new();
        assert!(!inout(&input, &mut output, &Satisfied).unwrap());
        assert!(Arc::ptr_eq(output.vocabulary(), input.vocabulary()));
        assert!(output.properties().contains(Properties::STORE_OUT_ARCS));
        assert!(!output.properties().contains(Properties::STORE_IN_ARCS));
    }

    #[test]
    fn test_configured_vocabulary_keeps_labels() {
        let input = two_arcs();
        for needed in [true, false] {
            let t = Revocab {
                vocab: Vocabulary::shared(),
                needed,
            };
            t.vocab.add_terminal("padding");

            let mut output = MutableHypergraph::new();
            inout(&input, &mut output, &t).unwrap();
            assert!(Arc::ptr_eq(output.vocabulary(), &t.vocab));
            assert_eq!(words(&output), vec!["a", "b"]);

            let mut hg = two_arcs();
            inplace(&mut hg, &t).unwrap();
            assert!(Arc::ptr_eq(hg.vocabulary(), &t.vocab));
            assert_eq!(words(&hg), vec!["a", "b"]);

            let mut shared: HypergraphPtr<ViterbiWeight> = Arc::new(FrozenHypergraph::new(two_arcs()));
            inplace_shared(&mut shared, &t).unwrap();
            assert!(Arc::ptr_eq(shared.vocabulary(), &t.vocab));
            assert_eq!(words(shared.as_ref()), vec!["a", "b"]);
        }
    }

    #[test]
    fn test_inout_on_frozen_input() {
        let frozen = FrozenHypergraph::new(two_arcs());
        let mut output = MutableHypergraph::new();
        assert!(inout(&frozen, &mut output, &ScaleCosts::by(2.0)).unwrap());
        assert_eq!(output.arc(ArcId(1)).weight(), &ViterbiWeight(4.0));
        assert_eq!(frozen.arc(ArcId(1)).weight(), &ViterbiWeight(2.0));
    }

    #[test]
    fn test_transformed_returns_same_handle_when_not_needed() {
        let hg: HypergraphPtr<ViterbiWeight> = Arc::new(two_arcs());
        let out = transformed(&hg, &NoopTransform).unwrap();
        assert!(Arc::ptr_eq(&hg, &out));

        let out = transformed(&hg, &ScaleCosts::by(2.0)).unwrap();
        assert!(!Arc::ptr_eq(&hg, &out));
        assert_eq!(hg.arc(ArcId(0)).weight(), &ViterbiWeight(1.0));
        assert_eq!(out.arc(ArcId(0)).weight(), &ViterbiWeight(2.0));
    }

    #[test]
    fn test_transformed_copy_always_new() {
        let hg = two_arcs();
        let copy = transformed_copy(&hg, &NoopTransform).unwrap();
        assert_eq!(copy.num_arcs(), hg.num_arcs());
    }

    #[test]
    fn test_inplace_shared_unique_handle_is_mutated() {
        let mut hg: HypergraphPtr<ViterbiWeight> = Arc::new(two_arcs());
        let before = Arc::as_ptr(&hg) as *const u8;
        assert!(inplace_shared(&mut hg, &ScaleCosts::by(2.0)).unwrap());
        assert_eq!(Arc::as_ptr(&hg) as *const u8, before);
        assert_eq!(hg.arc(ArcId(0)).weight(), &ViterbiWeight(2.0));
    }

    #[test]
    fn test_inplace_shared_aliased_handle_is_replaced() {
        let mut hg: HypergraphPtr<ViterbiWeight> = Arc::new(two_arcs());
        let other = Arc::clone(&hg);
        assert!(inplace_shared(&mut hg, &ScaleCosts::by(2.0)).unwrap());
        assert!(!Arc::ptr_eq(&hg, &other));
        assert_eq!(other.arc(ArcId(0)).weight(), &ViterbiWeight(1.0));
        assert_eq!(hg.arc(ArcId(0)).weight(), &ViterbiWeight(2.0));
    }

    #[test]
    fn test_inplace_shared_frozen_not_needed_keeps_handle() {
        let mut hg: HypergraphPtr<ViterbiWeight> = Arc::new(FrozenHypergraph::new(two_arcs()));
        let other = Arc::clone(&hg);
        assert!(!inplace_shared(&mut hg, &NoopTransform).unwrap());
        assert!(Arc::ptr_eq(&hg, &other));
    }

    #[test]
    fn test_try_inplace_on_frozen_fails() {
        let mut frozen = FrozenHypergraph::new(two_arcs());
        let err = try_inplace(&mut frozen, &ScaleCosts::by(2.0)).unwrap_err();
        assert!(matches!(err, HypergraphError::Immutable { .. }));

        let mut hg = two_arcs();
        assert!(try_inplace(&mut hg, &ScaleCosts::by(2.0)).unwrap());
    }

    #[test]
    fn test_inplace_always_ignores_needs() {
        let mut hg = MutableHypergraph::<ViterbiWeight>::new();
        hg.add_state();
        // ScaleCosts is not needed on a graph without arcs
        assert!(!inplace(&mut hg, &ScaleCosts::by(2.0)).unwrap());
        inplace_always(&mut hg, &ScaleCosts::by(2.0)).unwrap();
        assert!(hg.properties().contains(Properties::STORE_FIRST_TAIL_OUT_ARCS));
    }

    #[test]
    fn test_inplace_batch() {
        let mut graphs: Vec<_> = (0..8).map(|_| two_arcs()).collect();
        let results = inplace_batch(&mut graphs, &ScaleCosts::by(2.0));
        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| matches!(r, Ok(true))));
        assert!(graphs
            .iter()
            .all(|hg| hg.arc(ArcId(1)).weight() == &ViterbiWeight(4.0)));
    }
}
