//! Closest-lanelet localization.
//!
//! Two variants with different default thresholds:
//!
//! - [`LaneGraph::closest_lanelet`] searches the whole graph with strict
//!   thresholds — used when planning from scratch.
//! - [`LaneGraph::closest_lanelet_on_route`] restricts the search to a
//!   candidate route with loose thresholds — used for drift-tolerant
//!   re-localization of an NPC already assumed to be on-route.
//!
//! Both return `None` when no lanelet satisfies the distance *and* heading
//! thresholds.  "No match" is a recoverable outcome, not an error; callers
//! fall back (e.g. the decision engine defaults to straight).

use std::f64::consts::{FRAC_PI_4, PI};

use nav_core::{normalize_angle, LaneletId, Pose};

use crate::network::LaneGraph;

/// Default full-graph search thresholds: 10 units, 45°.
pub const DEFAULT_MAX_DIST: f64 = 10.0;
pub const DEFAULT_MAX_DELTA_YAW: f64 = FRAC_PI_4;

/// Default on-route search thresholds: 20 units, heading unchecked (π).
pub const ROUTE_MAX_DIST: f64 = 20.0;
pub const ROUTE_MAX_DELTA_YAW: f64 = PI;

impl LaneGraph {
    /// Find the lanelet whose centerline is nearest `pose`, accepting only
    /// candidates within `max_dist` of the centerline and `max_delta_yaw`
    /// of heading alignment at the nearest centerline segment.
    ///
    /// Ties break to the smaller distance, then the smaller id, so results
    /// are deterministic.
    pub fn closest_lanelet(
        &self,
        pose: &Pose,
        max_dist: f64,
        max_delta_yaw: f64,
    ) -> Option<LaneletId> {
        let p = pose.point2();
        let candidates = self.candidates_near(p, max_dist);
        self.best_match(pose, candidates.into_iter(), max_dist, max_delta_yaw)
    }

    /// Like [`closest_lanelet`](Self::closest_lanelet) but restricted to
    /// the lanelets of `route`.
    ///
    /// Skips the spatial index entirely — routes are short enough that a
    /// linear scan wins.
    pub fn closest_lanelet_on_route(
        &self,
        pose: &Pose,
        route: &[LaneletId],
        max_dist: f64,
        max_delta_yaw: f64,
    ) -> Option<LaneletId> {
        self.best_match(pose, route.iter().copied(), max_dist, max_delta_yaw)
    }

    fn best_match(
        &self,
        pose: &Pose,
        candidates: impl Iterator<Item = LaneletId>,
        max_dist: f64,
        max_delta_yaw: f64,
    ) -> Option<LaneletId> {
        let p = pose.point2();
        let yaw = pose.yaw();
        let mut best: Option<(f64, LaneletId)> = None;
        for id in candidates {
            if !self.contains(id) {
                continue;
            }
            let Some((dist, heading)) = self.centerline_distance(id, p) else {
                continue;
            };
            if dist > max_dist {
                continue;
            }
            if normalize_angle(heading - yaw).abs() > max_delta_yaw {
                continue;
            }
            let better = match best {
                None => true,
                Some((bd, bid)) => dist < bd || (dist == bd && id < bid),
            };
            if better {
                best = Some((dist, id));
            }
        }
        best.map(|(_, id)| id)
    }
}
