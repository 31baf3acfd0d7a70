//! Route-manager tuning parameters.

use std::f64::consts::PI;

use nav_graph::locate;
use nav_graph::RouteCost;

/// Every tunable threshold and weight of the route manager, with the
/// testbed's defaults.
///
/// Typically the application keeps the defaults; scenario configs can
/// deserialize an override.  The permissive heading tolerances (π for goal
/// arrival and on-route localization) are deliberate — arrival is detected
/// regardless of final heading — and kept configurable rather than
/// tightened.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NpcParams {
    /// Deceleration assumed for the stop-distance model.
    pub stop_accel: f64,

    /// Extra travel-time margin at current speed added to the braking
    /// distance.
    pub stop_margin_time: f64,

    /// Upper cap on the required stopping distance.
    pub max_stop_dist: f64,

    /// Lateral window around stop-triggering geometry (the goal point) that
    /// raises the stop flag once the goal is no longer ahead.
    pub min_lateral_stop_dist: f64,

    /// Goal-arrival planar distance threshold.
    pub goal_thresh_dist: f64,

    /// Goal-arrival heading tolerance.  π means orientation is effectively
    /// unchecked.
    pub goal_thresh_delta_yaw: f64,

    /// Full-graph localization thresholds (initial planning).
    pub locate_max_dist: f64,
    pub locate_max_delta_yaw: f64,

    /// On-route localization thresholds (per-cycle re-localization; looser,
    /// the NPC is assumed to already be on-route).
    pub route_locate_max_dist: f64,
    pub route_locate_max_delta_yaw: f64,

    /// Routing cost weights (detour and off-lane penalties).
    pub route_cost: RouteCost,
}

impl NpcParams {
    /// Braking distance from `velocity` under the configured deceleration
    /// plus the margin-time travel, capped at `max_stop_dist`.
    pub fn required_stop_distance(&self, velocity: f64) -> f64 {
        let v = velocity.abs();
        let dist = v * v / (2.0 * self.stop_accel) + v * self.stop_margin_time;
        dist.min(self.max_stop_dist)
    }
}

impl Default for NpcParams {
    fn default() -> Self {
        Self {
            stop_accel: 3.0,
            stop_margin_time: 0.1,
            max_stop_dist: 40.0,
            min_lateral_stop_dist: 3.0,
            goal_thresh_dist: 0.5,
            goal_thresh_delta_yaw: PI,
            locate_max_dist: locate::DEFAULT_MAX_DIST,
            locate_max_delta_yaw: locate::DEFAULT_MAX_DELTA_YAW,
            route_locate_max_dist: locate::ROUTE_MAX_DIST,
            route_locate_max_delta_yaw: locate::ROUTE_MAX_DELTA_YAW,
            route_cost: RouteCost::default(),
        }
    }
}
