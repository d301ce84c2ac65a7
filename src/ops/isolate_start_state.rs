//! Give an automaton a start state with no incoming arcs.

use crate::errors::Result;
use crate::graph::{Hypergraph, MutableHypergraph};
use crate::transform::{Transform, TransformMode};
use crate::types::{ArcId, Properties};
use crate::weight::Weight;
use serde::{Deserialize, Serialize};

/// Adds a fresh start state when the current one has incoming arcs.
///
/// Every arc leaving the old start (having it among its tails) is cloned
/// with the new start in its place, so the accepted language and path
/// weights are unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsolateStartState;

impl<W: Weight> Transform<W> for IsolateStartState {
    fn name(&self) -> &'static str {
        "IsolateStartState"
    }

    fn mode(&self) -> TransformMode {
        TransformMode::Inplace
    }

    fn needs(&self, hg: &dyn Hypergraph<W>) -> bool {
        hg.start().is_some_and(|start| hg.has_in_arcs(start))
    }

    fn inplace(&self, hg: &mut MutableHypergraph<W>) -> Result<()> {
        let Some(old_start) = hg.start() else {
            return Ok(());
        };

        let mut leaving: Vec<ArcId> = if hg.properties().contains(Properties::STORE_OUT_ARCS) {
            hg.out_arc_ids(old_start).to_vec()
        } else {
            hg.arc_ids()
                .filter(|&id| hg.arc(id).tails().contains(&old_start))
                .collect()
        };
        leaving.sort_unstable();
        leaving.dedup();

        let new_start = hg.add_state();
        hg.set_start(new_start);
        for id in leaving {
            let arc = hg.arc(id).with_replaced_tail(old_start, new_start);
            hg.add_arc(arc);
        }
        hg_debug!("isolated start state {} -> {}", old_start, new_start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::inplace;
    use crate::weight::ViterbiWeight;

    fn needs(hg: &MutableHypergraph<ViterbiWeight>) -> bool {
        Transform::<ViterbiWeight>::needs(&IsolateStartState, hg)
    }

    /// 0 --a--> 1 --b--> 0, 1 --c--> 2; start 0, final 2
    fn looping() -> MutableHypergraph<ViterbiWeight> {
        let mut hg = MutableHypergraph::new();
        let s0 = hg.add_state();
        let s1 = hg.add_state();
        let s2 = hg.add_state();
        hg.add_fsm_arc(s0, s1, Some("a"), ViterbiWeight(1.0));
        hg.add_fsm_arc(s1, s0, Some("b"), ViterbiWeight(2.0));
        hg.add_fsm_arc(s1, s2, Some("c"), ViterbiWeight(3.0));
        hg.set_start(s0);
        hg.set_final(s2);
        hg
    }

    #[test]
    fn test_not_needed_without_in_arcs() {
        let mut hg = MutableHypergraph::<ViterbiWeight>::new();
        let s0 = hg.add_state();
        let s1 = hg.add_state();
        hg.add_fsm_arc(s0, s1, Some("a"), ViterbiWeight(1.0));
        hg.set_start(s0);
        assert!(!needs(&hg));

        let before = hg.num_arcs();
        assert!(!inplace(&mut hg, &IsolateStartState).unwrap());
        assert_eq!(hg.num_arcs(), before);
        assert_eq!(hg.start(), Some(s0));
    }

    #[test]
    fn test_not_needed_without_start() {
        let hg = MutableHypergraph::<ViterbiWeight>::new();
        assert!(!needs(&hg));
    }

    #[test]
    fn test_isolates_start() {
        let mut hg = looping();
        assert!(needs(&hg));
        let old_arcs = hg.num_arcs();

        assert!(inplace(&mut hg, &IsolateStartState).unwrap());
        let start = hg.start().unwrap();
        assert_ne!(start, 0);
        assert!(!hg.has_in_arcs(start));
        // one arc left the old start
        assert_eq!(hg.num_arcs(), old_arcs + 1);
        let clone = hg.arc(ArcId(old_arcs as u32));
        assert_eq!(clone.first_tail(), Some(start));
        assert_eq!(clone.head(), 1);
        assert_eq!(clone.weight(), &ViterbiWeight(1.0));
        assert!(!needs(&hg));
    }

    #[test]
    fn test_uses_out_arc_index_when_held() {
        let mut hg = looping();
        hg.force_properties(Properties::STORE_OUT_ARCS);
        assert!(inplace(&mut hg, &IsolateStartState).unwrap());
        assert!(!hg.has_in_arcs(hg.start().unwrap()));
        assert_eq!(hg.num_arcs(), 4);
    }
}
