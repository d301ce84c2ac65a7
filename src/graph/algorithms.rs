//! Graph algorithms shared by the transforms
//!
//! Topological ordering, inside/outside passes and reachability. All of
//! them are single passes over an acyclic graph; cyclic input is rejected
//! by [`require_acyclic`] before any weights are touched.

use crate::errors::{HypergraphError, Result};
use crate::graph::Hypergraph;
use crate::types::{Properties, StateId};
use crate::weight::{CostWeight, Weight};
use std::collections::VecDeque;

/// Fail with [`HypergraphError::MissingProperties`] unless `hg` holds `props`.
pub fn require_properties<W: Weight, H: Hypergraph<W> + ?Sized>(
    hg: &H,
    props: Properties,
    transform: &str,
) -> Result<()> {
    let missing = props.difference(hg.properties());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(HypergraphError::missing_properties(transform, missing))
    }
}

/// States ordered so that every arc's tails come before its head.
///
/// Returns `None` if the graph has a cycle (including an arc whose head is
/// one of its own tails). Ties are broken by state id.
pub fn topological_order<W: Weight, H: Hypergraph<W> + ?Sized>(hg: &H) -> Option<Vec<StateId>> {
    let n = hg.size();
    let mut pending = vec![0usize; n];
    let mut dependents: Vec<Vec<StateId>> = vec![Vec::new(); n];
    for id in hg.arc_ids() {
        let arc = hg.arc(id);
        for &t in arc.tails() {
            pending[arc.head() as usize] += 1;
            dependents[t as usize].push(arc.head());
        }
    }

    let mut queue: VecDeque<StateId> = (0..n as StateId)
        .filter(|&s| pending[s as usize] == 0)
        .collect();
    let mut order = Vec::with_capacity(n);
    while let Some(s) = queue.pop_front() {
        order.push(s);
        for &head in &dependents[s as usize] {
            pending[head as usize] -= 1;
            if pending[head as usize] == 0 {
                queue.push_back(head);
            }
        }
    }

    (order.len() == n).then_some(order)
}

/// Topological order, or a configuration error naming `transform`.
pub fn require_acyclic<W: Weight, H: Hypergraph<W> + ?Sized>(
    hg: &H,
    transform: &str,
) -> Result<Vec<StateId>> {
    topological_order(hg)
        .ok_or_else(|| HypergraphError::config(transform, "requires an acyclic hypergraph"))
}

/// Semiring inside weights: the sum over derivations of each state.
///
/// Requires `STORE_IN_ARCS` and an `order` from [`topological_order`].
pub fn inside_weights<W: Weight, H: Hypergraph<W> + ?Sized>(hg: &H, order: &[StateId]) -> Vec<W> {
    let mut inside = vec![W::zero(); hg.size()];
    for &s in order {
        let mut sum = if hg.is_source_leaf(s) {
            W::one()
        } else {
            W::zero()
        };
        for &id in hg.in_arc_ids(s) {
            let arc = hg.arc(id);
            let mut w = arc.weight().clone();
            for &t in arc.tails() {
                w.times_by(&inside[t as usize]);
            }
            sum.plus_by(&w);
        }
        inside[s as usize] = sum;
    }
    inside
}

/// Best (minimum) derivation cost of each state; `+inf` if underivable.
///
/// Requires `STORE_IN_ARCS` and an `order` from [`topological_order`].
pub fn inside_costs<W: CostWeight, H: Hypergraph<W> + ?Sized>(hg: &H, order: &[StateId]) -> Vec<f64> {
    let mut inside = vec![f64::INFINITY; hg.size()];
    for &s in order {
        let mut best = if hg.is_source_leaf(s) {
            0.0
        } else {
            f64::INFINITY
        };
        for &id in hg.in_arc_ids(s) {
            let arc = hg.arc(id);
            let cost = arc
                .tails()
                .iter()
                .fold(arc.weight().cost(), |acc, &t| acc + inside[t as usize]);
            best = best.min(cost);
        }
        inside[s as usize] = best;
    }
    inside
}

/// Minimum cost from each state to the final state along graph arcs.
///
/// The first tail of an arc is its structural source; the inside costs of
/// the remaining (lexical) tails are added to the arc. Requires
/// `STORE_FIRST_TAIL_OUT_ARCS`. `outside[final]` is `0`.
pub fn outside_costs<W: CostWeight, H: Hypergraph<W> + ?Sized>(
    hg: &H,
    order: &[StateId],
    inside: &[f64],
) -> Vec<f64> {
    let mut outside = vec![f64::INFINITY; hg.size()];
    let final_state = hg.final_state();
    if let Some(f) = final_state {
        outside[f as usize] = 0.0;
    }
    for &s in order.iter().rev() {
        if Some(s) == final_state {
            continue;
        }
        let mut best = f64::INFINITY;
        for &id in hg.first_tail_out_arc_ids(s) {
            let arc = hg.arc(id);
            let cost = arc.tails()[1..]
                .iter()
                .fold(arc.weight().cost() + outside[arc.head() as usize], |acc, &t| {
                    acc + inside[t as usize]
                });
            best = best.min(cost);
        }
        outside[s as usize] = best;
    }
    outside
}

/// Marks the states that appear in some derivation of the final state,
/// i.e. those reachable from it by walking in-arcs down to their tails.
///
/// Requires `STORE_IN_ARCS`.
pub fn derivation_states<W: Weight, H: Hypergraph<W> + ?Sized>(hg: &H) -> Vec<bool> {
    let mut seen = vec![false; hg.size()];
    let Some(final_state) = hg.final_state() else {
        return seen;
    };
    seen[final_state as usize] = true;
    let mut stack = vec![final_state];
    while let Some(s) = stack.pop() {
        for &id in hg.in_arc_ids(s) {
            for &t in hg.arc(id).tails() {
                if !seen[t as usize] {
                    seen[t as usize] = true;
                    stack.push(t);
                }
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{HyperArc, MutableHypergraph};
    use crate::weight::{LogWeight, ViterbiWeight};

    /// 0 --a/0.7--> 1 --b/0.4--> 2, 0 --c/0.9--> 2
    fn triangle() -> MutableHypergraph<ViterbiWeight> {
        let mut hg = MutableHypergraph::with_properties(
            Properties::STORE_IN_ARCS | Properties::STORE_FIRST_TAIL_OUT_ARCS,
        );
        let s0 = hg.add_state();
        let s1 = hg.add_state();
        let s2 = hg.add_state();
        hg.add_fsm_arc(s0, s1, Some("a"), ViterbiWeight(0.7));
        hg.add_fsm_arc(s1, s2, Some("b"), ViterbiWeight(0.4));
        hg.add_fsm_arc(s0, s2, Some("c"), ViterbiWeight(0.9));
        hg.set_start(s0);
        hg.set_final(s2);
        hg
    }

    #[test]
    fn test_topological_order() {
        let hg = triangle();
        let order = topological_order(&hg).unwrap();
        let pos = |s: StateId| order.iter().position(|&x| x == s).unwrap();
        assert_eq!(order.len(), hg.size());
        assert!(pos(0) < pos(1));
        assert!(pos(1) < pos(2));
    }

    #[test]
    fn test_cycle_detected() {
        let mut hg = MutableHypergraph::<ViterbiWeight>::new();
        let s0 = hg.add_state();
        let s1 = hg.add_state();
        hg.add_fsm_arc(s0, s1, None, ViterbiWeight(1.0));
        hg.add_fsm_arc(s1, s0, None, ViterbiWeight(1.0));
        assert!(topological_order(&hg).is_none());
        let err = require_acyclic(&hg, "PushWeights").unwrap_err();
        assert_eq!(err.transform(), Some("PushWeights"));
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let mut hg = MutableHypergraph::<ViterbiWeight>::new();
        let s0 = hg.add_state();
        hg.add_arc(HyperArc::new(s0, vec![s0], ViterbiWeight(1.0)));
        assert!(topological_order(&hg).is_none());
    }

    #[test]
    fn test_inside_outside_costs() {
        let hg = triangle();
        let order = topological_order(&hg).unwrap();
        let inside = inside_costs(&hg, &order);
        assert_eq!(inside[0], 0.0);
        assert!((inside[1] - 0.7).abs() < 1e-12);
        assert!((inside[2] - 0.9).abs() < 1e-12);

        let outside = outside_costs(&hg, &order, &inside);
        assert_eq!(outside[2], 0.0);
        assert!((outside[1] - 0.4).abs() < 1e-12);
        assert!((outside[0] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_inside_weights_log_sums_paths() {
        let mut hg = MutableHypergraph::<LogWeight>::new();
        let s0 = hg.add_state();
        let s1 = hg.add_state();
        let half = LogWeight(std::f64::consts::LN_2);
        hg.add_fsm_arc(s0, s1, Some("x"), half);
        hg.add_fsm_arc(s0, s1, Some("y"), half);
        hg.set_start(s0);
        hg.set_final(s1);

        let order = topological_order(&hg).unwrap();
        let inside = inside_weights(&hg, &order);
        assert!(inside[s1 as usize].0.abs() < 1e-12);
    }

    #[test]
    fn test_require_properties() {
        let hg = MutableHypergraph::<ViterbiWeight>::with_properties(Properties::NONE);
        let err = require_properties(&hg, Properties::STORE_IN_ARCS, "SubUnion").unwrap_err();
        assert!(matches!(
            err,
            HypergraphError::MissingProperties { missing, .. } if missing == Properties::STORE_IN_ARCS
        ));
        assert!(require_properties(&hg, Properties::NONE, "SubUnion").is_ok());
    }

    #[test]
    fn test_derivation_states() {
        let mut hg = triangle();
        let dead = hg.add_state();
        hg.add_fsm_arc(2, dead, None, ViterbiWeight(0.1));
        let below = derivation_states(&hg);
        assert!(below[0] && below[1] && below[2]);
        assert!(!below[dead as usize]);
    }
}
