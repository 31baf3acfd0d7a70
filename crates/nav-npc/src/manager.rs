//! The route manager: planning entry points and per-cycle decisions.

use std::sync::Arc;

use log::{info, warn};
use rustc_hash::FxHashMap;

use nav_core::{LaneFollowDirection, LaneletId, Pose};
use nav_graph::{CostRouter, LaneGraph, LaneRoute, LaneRouter, TurnClass};

use crate::{MapMessage, NpcError, NpcObservation, NpcParams, NpcResult, NpcState};

// ── Goal arrival ──────────────────────────────────────────────────────────────

/// Goal-arrival predicate: planar distance within `thresh_dist` and heading
/// deviation within `thresh_delta_yaw`.
///
/// With the default tolerance of π the heading check always passes, so
/// arrival is detected regardless of final orientation.  `_npc_vel` is
/// accepted for a future near-zero-speed arrival requirement and currently
/// ignored.
pub fn is_goal(
    goal: &Pose,
    npc_pose: &Pose,
    _npc_vel: f64,
    thresh_dist: f64,
    thresh_delta_yaw: f64,
) -> bool {
    goal.planar_distance(npc_pose) <= thresh_dist
        && goal.yaw_difference(npc_pose).abs() <= thresh_delta_yaw
}

// ── NpcRouteManager ───────────────────────────────────────────────────────────

/// Route management for every NPC in the scenario.
///
/// Owns the lane graph (rebuilt wholesale on each map message), the routing
/// algorithm, and one [`NpcState`] record per NPC name.
///
/// # Type parameter
///
/// `R` must implement [`LaneRouter`]; swap it at compile time for a
/// different search with no runtime overhead.  [`NpcRouteManager::new`]
/// uses the default [`CostRouter`].
///
/// # Concurrency
///
/// Single-threaded cooperative model: the external dispatcher serializes
/// map ingestion and per-cycle queries, so no internal locking is needed.
/// The graph lives behind an `Arc` so a concurrent port can hand read
/// snapshots to in-flight queries while ingestion swaps in a new graph.
pub struct NpcRouteManager<R: LaneRouter = CostRouter> {
    graph: Option<Arc<LaneGraph>>,
    router: R,
    params: NpcParams,
    npcs: FxHashMap<String, NpcState>,
}

impl NpcRouteManager<CostRouter> {
    /// Manager with the default cost-biased router.
    pub fn new(params: NpcParams) -> Self {
        Self::with_router(CostRouter, params)
    }
}

impl<R: LaneRouter> NpcRouteManager<R> {
    pub fn with_router(router: R, params: NpcParams) -> Self {
        Self {
            graph: None,
            router,
            params,
            npcs: FxHashMap::default(),
        }
    }

    /// `true` once a map has been ingested.  Planning and localization
    /// calls made earlier fail with [`NpcError::NotReady`].
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.graph.is_some()
    }

    /// Shared handle to the current lane graph, if ready.
    pub fn graph(&self) -> Option<Arc<LaneGraph>> {
        self.graph.clone()
    }

    #[inline]
    pub fn params(&self) -> &NpcParams {
        &self.params
    }

    /// The record for `name`, if it has ever been registered.
    pub fn npc(&self, name: &str) -> Option<&NpcState> {
        self.npcs.get(name)
    }

    // ── Map ingestion ─────────────────────────────────────────────────────

    /// Rebuild the lane graph from a map message and flip readiness.
    ///
    /// Each message replaces the graph wholesale; a malformed message
    /// leaves the previous graph (and readiness) untouched.
    pub fn ingest_map(&mut self, msg: &MapMessage) -> NpcResult<()> {
        let graph = msg.build_graph()?;
        info!(
            "lane map ingested: {} lanelets, {} relations",
            graph.lanelet_count(),
            graph.relation_count()
        );
        self.graph = Some(Arc::new(graph));
        Ok(())
    }

    // ── Checkpoints & planning ────────────────────────────────────────────

    /// Append a required waypoint for `name`'s next `plan_route`, creating
    /// the NPC record if this is the first call for that name.
    ///
    /// Never disturbs an already-assigned route; only a subsequent
    /// [`plan_route`](Self::plan_route) recomputes.
    pub fn set_checkpoint(&mut self, name: &str, checkpoint_pose: Pose) -> NpcResult<()> {
        self.npcs
            .entry(name.to_owned())
            .or_default()
            .checkpoints
            .push(checkpoint_pose);
        Ok(())
    }

    /// Plan a route for `name` from `initial_pose` to `goal_pose` through
    /// the NPC's stored checkpoints, in insertion order.
    ///
    /// On success the NPC's route and goal are replaced and its stop latch
    /// reset.  On any failure (`NotReady`, unlocalizable waypoint,
    /// unreachable goal) the NPC's previous route and goal stay intact.
    pub fn plan_route(
        &mut self,
        name: &str,
        initial_pose: &Pose,
        goal_pose: &Pose,
    ) -> NpcResult<LaneRoute> {
        let Some(graph) = self.graph.clone() else {
            warn!("plan_route for {name:?} before map ingestion");
            return Err(NpcError::NotReady);
        };

        let mut waypoints: Vec<Pose> = Vec::new();
        waypoints.push(*initial_pose);
        if let Some(state) = self.npcs.get(name) {
            waypoints.extend(state.checkpoints.iter().copied());
        }
        waypoints.push(*goal_pose);

        let mut lanelets: Vec<LaneletId> = Vec::new();
        for leg in waypoints.windows(2) {
            let path = self.plan_leg(&graph, &leg[0], &leg[1]).map_err(|e| {
                warn!("route planning for {name:?} failed: {e}");
                e
            })?;
            // Consecutive legs share their boundary lanelet.
            for id in path.lanelets {
                if lanelets.last() != Some(&id) {
                    lanelets.push(id);
                }
            }
        }

        let route = LaneRoute::new(lanelets);
        let state = self.npcs.entry(name.to_owned()).or_default();
        state.route = Some(route.clone());
        state.goal = Some(*goal_pose);
        state.stop_latched = false;
        Ok(route)
    }

    /// Plan one leg between consecutive checkpoints: localize both poses,
    /// then search the graph under the configured cost weights.
    pub fn plan_leg(
        &self,
        graph: &LaneGraph,
        start_checkpoint: &Pose,
        goal_checkpoint: &Pose,
    ) -> NpcResult<LaneRoute> {
        let p = &self.params;
        let from = graph
            .closest_lanelet(start_checkpoint, p.locate_max_dist, p.locate_max_delta_yaw)
            .ok_or(NpcError::NoMatchingLane(*start_checkpoint))?;
        let to = graph
            .closest_lanelet(goal_checkpoint, p.locate_max_dist, p.locate_max_delta_yaw)
            .ok_or(NpcError::NoMatchingLane(*goal_checkpoint))?;
        Ok(self.router.shortest_path(graph, from, to, &p.route_cost)?)
    }

    /// Goal pose of `name`'s current route.
    ///
    /// Fails for names that never planned — state is never fabricated for
    /// unknown NPCs.
    pub fn get_npc_goal(&self, name: &str) -> NpcResult<Pose> {
        self.npcs
            .get(name)
            .and_then(|s| s.goal)
            .ok_or_else(|| NpcError::UnknownNpc(name.to_owned()))
    }

    // ── Per-cycle decisions ───────────────────────────────────────────────

    /// Decide the lane-follow direction for every observed NPC.
    ///
    /// Pure per-cycle function of current state; stored routes are never
    /// mutated.  NPCs with no resolvable route or lanelet come back as
    /// [`LaneFollowDirection::Straight`].
    pub fn update_lane_follow_state(
        &self,
        npc_infos: &FxHashMap<String, NpcObservation>,
    ) -> FxHashMap<String, LaneFollowDirection> {
        let mut out = FxHashMap::default();
        for (name, obs) in npc_infos {
            let dir = match &self.graph {
                Some(graph) => self.lane_follow_dir(graph, name, obs),
                None => LaneFollowDirection::Straight,
            };
            out.insert(name.clone(), dir);
        }
        out
    }

    fn lane_follow_dir(
        &self,
        graph: &LaneGraph,
        name: &str,
        obs: &NpcObservation,
    ) -> LaneFollowDirection {
        let p = &self.params;
        let Some(route) = self.npcs.get(name).and_then(|s| s.route.as_ref()) else {
            return LaneFollowDirection::Straight;
        };

        // Re-localize against the stored route; fall back to a full-graph
        // search when the NPC has drifted beyond the on-route thresholds.
        let matched = graph
            .closest_lanelet_on_route(
                &obs.pose,
                route.as_slice(),
                p.route_locate_max_dist,
                p.route_locate_max_delta_yaw,
            )
            .or_else(|| {
                warn!("npc {name:?} not on its route; falling back to full-graph search");
                graph.closest_lanelet(&obs.pose, p.locate_max_dist, p.locate_max_delta_yaw)
            });
        let Some(current) = matched else {
            return LaneFollowDirection::Straight;
        };

        // The maneuver comes from the turn attribute of the next lanelet in
        // the route.  Off-route matches and the final lanelet have no
        // successor and default to straight.
        match route.successor_after(current) {
            Some(next) if graph.contains(next) => match graph.turn_class(next) {
                TurnClass::Left => LaneFollowDirection::TurnLeft,
                TurnClass::Right => LaneFollowDirection::TurnRight,
                TurnClass::Straight => LaneFollowDirection::Straight,
            },
            _ => LaneFollowDirection::Straight,
        }
    }

    /// Decide the stop flag for every observed NPC.
    ///
    /// The flag is latched: once raised it stays raised across cycles until
    /// goal arrival is confirmed or a new route is planned, so a single
    /// noisy distance reading near the threshold cannot unlatch it.
    pub fn update_stop_state(
        &mut self,
        npc_infos: &FxHashMap<String, NpcObservation>,
    ) -> FxHashMap<String, bool> {
        let mut out = FxHashMap::default();
        for (name, obs) in npc_infos {
            let Some(state) = self.npcs.get_mut(name) else {
                // Unknown NPC: report the default rather than fabricate state.
                out.insert(name.clone(), false);
                continue;
            };
            let Some(goal) = state.goal else {
                out.insert(name.clone(), false);
                continue;
            };

            let p = &self.params;
            let arrived = is_goal(
                &goal,
                &obs.pose,
                obs.velocity_mps,
                p.goal_thresh_dist,
                p.goal_thresh_delta_yaw,
            );
            if arrived {
                state.stop_latched = false;
            }

            let required = p.required_stop_distance(obs.velocity_mps);
            let (longitudinal, lateral) = obs.pose.heading_frame_offset(goal.point2());
            let triggered = if longitudinal > 0.0 {
                // Goal still ahead: compare remaining distance against the
                // braking distance.
                obs.pose.planar_distance(&goal) <= required
            } else {
                // Goal alongside or behind: the lateral window applies
                // regardless of longitudinal separation.
                lateral.abs() <= p.min_lateral_stop_dist
            };
            if triggered && !arrived {
                state.stop_latched = true;
            }

            out.insert(name.clone(), state.stop_latched || triggered);
        }
        out
    }
}
