//! Per-NPC records and per-cycle observations.

use nav_core::Pose;
use nav_graph::LaneRoute;

/// Everything the manager tracks for one named NPC, in a single record so
/// creation and replanning can never leave the fields inconsistent.
///
/// Records are created implicitly on the first `set_checkpoint` or
/// `plan_route` call for a name and persist for the simulation's lifetime.
#[derive(Debug, Clone, Default)]
pub struct NpcState {
    /// Latched stop flag.  Raised by the stop-state decision, held across
    /// cycles until goal arrival is confirmed or a new route is planned.
    pub stop_latched: bool,

    /// Goal pose of the current route.  `None` until `plan_route` succeeds.
    pub goal: Option<Pose>,

    /// The assigned route.  Replaced wholesale on replan; a failed replan
    /// leaves it untouched.
    pub route: Option<LaneRoute>,

    /// Required waypoints for the next `plan_route`, in insertion order.
    pub checkpoints: Vec<Pose>,
}

impl NpcState {
    /// `true` once a route has been planned for this NPC.
    #[inline]
    pub fn has_route(&self) -> bool {
        self.route.is_some()
    }
}

/// Per-cycle observation of one NPC, as delivered by the external
/// messaging layer.
#[derive(Debug, Clone, Copy)]
pub struct NpcObservation {
    /// Current map-frame pose.
    pub pose: Pose,

    /// Current forward speed in map units per second.
    pub velocity_mps: f64,
}

impl NpcObservation {
    pub fn new(pose: Pose, velocity_mps: f64) -> Self {
        Self { pose, velocity_mps }
    }
}
