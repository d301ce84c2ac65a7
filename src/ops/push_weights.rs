//! Weight pushing.
//!
//! Both variants redistribute arc weights without changing the total weight
//! of any complete start→final derivation:
//!
//! - [`push_costs_to_start`] moves cost toward the start state of an
//!   acyclic automaton, so that the best continuation out of every state
//!   costs nothing and the arcs leaving the start carry the best total.
//! - [`push_weights_to_final`] moves mass toward the final state of any
//!   acyclic hypergraph by dividing out each head's inside weight and
//!   multiplying in the inside weights of the tails.
//!
//! Arcs on no complete derivation end up with zero weight.

use crate::errors::{HypergraphError, Result};
use crate::graph::algorithms::{
    derivation_states, inside_costs, inside_weights, outside_costs, require_acyclic,
    require_properties,
};
use crate::graph::{Hypergraph, MutableHypergraph};
use crate::transform::{Transform, TransformMode};
use crate::types::Properties;
use crate::weight::{CostWeight, DivisionWeight, Weight};
use serde::{Deserialize, Serialize};

const NAME: &str = "PushWeights";

// ============================================================================
// Transform
// ============================================================================

/// Weight-pushing transform. Defaults to pushing costs toward the start.
///
/// The direction is chosen at run time, so both directions require a
/// [`CostWeight`]. Semirings that only implement [`DivisionWeight`] push
/// toward the final state with [`PushWeightsToFinal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PushWeights {
    /// Push toward the final state instead of the start state.
    pub push_to_final: bool,
}

impl PushWeights {
    pub fn to_start() -> Self {
        Self {
            push_to_final: false,
        }
    }

    pub fn to_final() -> Self {
        Self {
            push_to_final: true,
        }
    }
}

impl<W: CostWeight> Transform<W> for PushWeights {
    fn name(&self) -> &'static str {
        NAME
    }

    fn mode(&self) -> TransformMode {
        TransformMode::Inplace
    }

    fn in_add_props(&self) -> Properties {
        if self.push_to_final {
            Properties::STORE_IN_ARCS
        } else {
            Properties::STORE_IN_ARCS | Properties::STORE_FIRST_TAIL_OUT_ARCS
        }
    }

    fn inplace(&self, hg: &mut MutableHypergraph<W>) -> Result<()> {
        if self.push_to_final {
            push_weights_to_final(hg).map(|_| ())
        } else {
            push_costs_to_start(hg).map(|_| ())
        }
    }
}

/// Push toward the final state for any semiring with division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushWeightsToFinal;

impl<W: DivisionWeight> Transform<W> for PushWeightsToFinal {
    fn name(&self) -> &'static str {
        NAME
    }

    fn mode(&self) -> TransformMode {
        TransformMode::Inplace
    }

    fn in_add_props(&self) -> Properties {
        Properties::STORE_IN_ARCS
    }

    fn inplace(&self, hg: &mut MutableHypergraph<W>) -> Result<()> {
        push_weights_to_final(hg).map(|_| ())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Costs computed while pushing toward the start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushCostsResult {
    /// Best cost of reaching each state from the start
    pub inside: Vec<f64>,
    /// Best cost from each state to the final state; the start state's
    /// entry holds the best total path cost
    pub outside: Vec<f64>,
    /// The graph had no finite-cost path and was collapsed to empty
    pub emptied: bool,
}

impl PushCostsResult {
    fn emptied() -> Self {
        Self {
            emptied: true,
            ..Self::default()
        }
    }
}

/// Inside weights computed while pushing toward the final state.
#[derive(Debug, Clone, PartialEq)]
pub struct PushWeightsResult<W> {
    pub inside: Vec<W>,
    /// The graph had no non-zero derivation and was collapsed to empty
    pub emptied: bool,
}

impl<W> PushWeightsResult<W> {
    fn emptied() -> Self {
        Self {
            inside: Vec::new(),
            emptied: true,
        }
    }
}

/// Collapse a graph with no usable derivation, or refuse if it is immutable.
fn collapse_or_fail<W: Weight, H: Hypergraph<W> + ?Sized>(hg: &mut H) -> Result<()> {
    match hg.as_mutable() {
        Some(mutable) => {
            hg_debug!("{}: no finite-weight derivation; emptying graph", NAME);
            mutable.set_empty();
            Ok(())
        }
        None => Err(HypergraphError::config(
            NAME,
            "immutable hypergraph has no finite-weight path from start to final; cannot push",
        )),
    }
}

// ============================================================================
// Push toward start
// ============================================================================

/// Push costs toward the start state of an acyclic automaton.
///
/// Afterwards the cheapest arc out of every state on a complete path costs
/// `0`, except for arcs out of the start state which carry the best total.
/// Applying it twice gives the same weights as applying it once.
///
/// # Errors
///
/// - `Config` if the graph is not a graph (see [`Hypergraph::is_graph`]),
///   has no start state, or is cyclic.
/// - `MissingProperties` without in-arc and first-tail out-arc indices.
/// - `Config` if it has no finite-cost path and is immutable (a mutable
///   graph is collapsed to empty instead).
pub fn push_costs_to_start<W: CostWeight, H: Hypergraph<W> + ?Sized>(
    hg: &mut H,
) -> Result<PushCostsResult> {
    let Some(final_state) = hg.final_state() else {
        return Ok(PushCostsResult::default());
    };
    let Some(start) = hg.start().filter(|_| hg.is_graph()) else {
        return Err(HypergraphError::config(
            NAME,
            "pushing to start requires an acyclic graph with a start state",
        ));
    };
    require_properties(
        hg,
        Properties::STORE_IN_ARCS | Properties::STORE_FIRST_TAIL_OUT_ARCS,
        NAME,
    )?;
    let order = require_acyclic(hg, NAME)?;

    let inside = inside_costs(hg, &order);
    let total = inside[final_state as usize];
    if total.is_infinite() {
        collapse_or_fail(hg)?;
        return Ok(PushCostsResult::emptied());
    }

    let mut outside = outside_costs(hg, &order, &inside);
    debug_assert_eq!(outside[final_state as usize], 0.0);
    outside[start as usize] = total;

    let ids: Vec<_> = hg.arc_ids().collect();
    for id in ids {
        let arc = hg.arc(id);
        let head = arc.head() as usize;
        let Some(tail) = arc.first_tail() else {
            continue;
        };
        let cost = arc.weight().cost();
        let on_path = outside[head].is_finite() && inside[tail as usize].is_finite();
        let pushed = if on_path && cost.is_finite() {
            let from = if tail == start {
                0.0
            } else {
                outside[tail as usize]
            };
            cost + outside[head] - from
        } else {
            f64::INFINITY
        };
        hg.weight_mut(id).set_cost(pushed);
    }
    hg_debug!("{}: pushed to start, best total {}", NAME, total);

    Ok(PushCostsResult {
        inside,
        outside,
        emptied: false,
    })
}

// ============================================================================
// Push toward final
// ============================================================================

/// Push weights toward the final state of an acyclic hypergraph.
///
/// Each arc becomes `w / inside[head] * Π inside[t]` over its non-axiom
/// tails (no division for arcs into the final state), so the inside weight
/// of every non-final state becomes one and all mass sits on arcs into the
/// final state.
///
/// # Errors
///
/// - `MissingProperties` without an in-arc index; `Config` if cyclic.
/// - `Config` if the final state's inside weight is zero and the graph is
///   immutable (a mutable graph is collapsed to empty instead).
pub fn push_weights_to_final<W: DivisionWeight, H: Hypergraph<W> + ?Sized>(
    hg: &mut H,
) -> Result<PushWeightsResult<W>> {
    let Some(final_state) = hg.final_state() else {
        return Ok(PushWeightsResult {
            inside: Vec::new(),
            emptied: false,
        });
    };
    require_properties(hg, Properties::STORE_IN_ARCS, NAME)?;
    let order = require_acyclic(hg, NAME)?;

    let inside = inside_weights(hg, &order);
    if inside[final_state as usize].is_zero() {
        collapse_or_fail(hg)?;
        return Ok(PushWeightsResult::emptied());
    }

    let useful = derivation_states(hg);
    let ids: Vec<_> = hg.arc_ids().collect();
    for id in ids {
        let arc = hg.arc(id);
        let head = arc.head();
        let dead = !useful[head as usize]
            || arc.tails().iter().any(|&t| inside[t as usize].is_zero())
            || (head != final_state && inside[head as usize].is_zero());

        let mut w = arc.weight().clone();
        if dead {
            w.set_zero();
        } else {
            if head != final_state {
                w.divide_by(&inside[head as usize]);
            }
            for &t in arc.tails() {
                if !hg.is_axiom(t) {
                    w.times_by(&inside[t as usize]);
                }
            }
        }
        *hg.weight_mut(id) = w;
    }
    hg_debug!(
        "{}: pushed to final, total {}",
        NAME,
        inside[final_state as usize]
    );

    Ok(PushWeightsResult {
        inside,
        emptied: false,
    })
}
