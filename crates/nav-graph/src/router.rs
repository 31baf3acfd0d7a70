//! Routing trait, route value type, and the default cost-biased router.
//!
//! # Pluggability
//!
//! `nav-npc` plans through the [`LaneRouter`] trait, so the decision layer
//! can be tested against a fake router and applications can swap the search
//! (A*, contraction hierarchies) without touching the manager.  The default
//! [`CostRouter`] is a Dijkstra over the CSR relation arrays.
//!
//! # Cost model
//!
//! The cost of entering lanelet `t` via relation `r`:
//!
//! ```text
//! length(t) + base_cost_no_curve    (if t's turn class is not straight)
//!           + base_cost_besides_lane (if r is a lateral lane change)
//! ```
//!
//! which biases the search toward routes that stay within-lane and avoid
//! unneeded maneuvering.  Costs accumulate in fixed-point milli-units (u64)
//! so heap ordering is exact and tie-breaking deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use nav_core::LaneletId;

use crate::network::{LaneGraph, TurnClass};
use crate::{GraphError, GraphResult};

// ── RouteCost ─────────────────────────────────────────────────────────────────

/// Weights of the routing cost model.  Defaults follow the testbed tuning:
/// detour penalty 10.0, off-lane penalty 3.0.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteCost {
    /// Added cost for traversing a lanelet that curves (turn class left or
    /// right) — penalizes unnecessary detours through junction arms.
    pub base_cost_no_curve: f64,

    /// Added cost for reaching a lanelet by lateral movement outside the
    /// nominal lane (left/right relation).
    pub base_cost_besides_lane: f64,
}

impl Default for RouteCost {
    fn default() -> Self {
        Self {
            base_cost_no_curve: 10.0,
            base_cost_besides_lane: 3.0,
        }
    }
}

// ── LaneRoute ─────────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered lanelet sequence from start to
/// goal.
///
/// Invariant: consecutive entries are graph-adjacent.  A route is immutable
/// once planned; replanning replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneRoute {
    /// Lanelets to traverse in order.
    pub lanelets: Vec<LaneletId>,
}

impl LaneRoute {
    pub fn new(lanelets: Vec<LaneletId>) -> Self {
        Self { lanelets }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lanelets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lanelets.is_empty()
    }

    /// `true` when start and goal localized to the same lanelet.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.lanelets.len() <= 1
    }

    #[inline]
    pub fn as_slice(&self) -> &[LaneletId] {
        &self.lanelets
    }

    pub fn contains(&self, id: LaneletId) -> bool {
        self.lanelets.contains(&id)
    }

    /// Position of `id` within the route.
    pub fn position_of(&self, id: LaneletId) -> Option<usize> {
        self.lanelets.iter().position(|&l| l == id)
    }

    /// The lanelet following `id` in the route, if `id` is on the route and
    /// not its last entry.
    pub fn successor_after(&self, id: LaneletId) -> Option<LaneletId> {
        let pos = self.position_of(id)?;
        self.lanelets.get(pos + 1).copied()
    }
}

// ── LaneRouter trait ──────────────────────────────────────────────────────────

/// Pluggable lane-graph search.
///
/// Implementations must be `Send + Sync` so a future concurrent runtime can
/// share the router across query threads.
pub trait LaneRouter: Send + Sync {
    /// Compute the cheapest lanelet sequence from `from` to `to` under the
    /// given cost weights.
    ///
    /// `from == to` yields the single-lanelet trivial route rather than an
    /// error.
    fn shortest_path(
        &self,
        graph: &LaneGraph,
        from: LaneletId,
        to: LaneletId,
        cost: &RouteCost,
    ) -> GraphResult<LaneRoute>;
}

// ── CostRouter ────────────────────────────────────────────────────────────────

/// Dijkstra over the CSR relation arrays with the detour/off-lane cost
/// model.
pub struct CostRouter;

impl LaneRouter for CostRouter {
    fn shortest_path(
        &self,
        graph: &LaneGraph,
        from: LaneletId,
        to: LaneletId,
        cost: &RouteCost,
    ) -> GraphResult<LaneRoute> {
        dijkstra(graph, from, to, cost)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Fixed-point conversion: 1 cost unit = 1000 milli-units.
#[inline]
fn milli(c: f64) -> u64 {
    (c * 1000.0).round() as u64
}

fn dijkstra(
    graph: &LaneGraph,
    from: LaneletId,
    to: LaneletId,
    cost: &RouteCost,
) -> GraphResult<LaneRoute> {
    if !graph.contains(from) {
        return Err(GraphError::LaneletNotFound(from));
    }
    if !graph.contains(to) {
        return Err(GraphError::LaneletNotFound(to));
    }
    if from == to {
        return Ok(LaneRoute::new(vec![from]));
    }

    let n = graph.lanelet_count();
    // dist[v] = best known cost (milli-units) to reach v.
    let mut dist = vec![u64::MAX; n];
    // prev[v] = lanelet we reached v from; INVALID for unreached lanelets.
    let mut prev = vec![LaneletId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap via Reverse; secondary key LaneletId gives deterministic
    // tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, LaneletId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((c, lane))) = heap.pop() {
        if lane == to {
            return Ok(reconstruct(prev, from, to));
        }

        // Skip stale heap entries.
        if c > dist[lane.index()] {
            continue;
        }

        for (next, rel) in graph.successors(lane) {
            let mut step = graph.lanelet_length(next);
            if graph.turn_class(next) != TurnClass::Straight {
                step += cost.base_cost_no_curve;
            }
            if rel.is_lateral() {
                step += cost.base_cost_besides_lane;
            }
            let new_cost = c.saturating_add(milli(step));

            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev[next.index()] = lane;
                heap.push(Reverse((new_cost, next)));
            }
        }
    }

    Err(GraphError::NoRoute { from, to })
}

fn reconstruct(prev: Vec<LaneletId>, from: LaneletId, to: LaneletId) -> LaneRoute {
    let mut lanelets = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        lanelets.push(cur);
    }
    lanelets.reverse();
    LaneRoute::new(lanelets)
}
