//! Lane-follow direction codes emitted by the decision engine.

/// The maneuver an NPC should perform at its current point in the route.
///
/// A small closed enumeration; [`code`](LaneFollowDirection::code) gives the
/// 8-bit wire encoding consumed by the simulation controller.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneFollowDirection {
    /// Keep following the current lane (also the fallback when no route or
    /// lanelet can be resolved).
    #[default]
    Straight,
    /// The upcoming lane transition turns left.
    TurnLeft,
    /// The upcoming lane transition turns right.
    TurnRight,
}

impl LaneFollowDirection {
    /// 8-bit wire code: 0 = straight, 1 = turn-left, 2 = turn-right.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            LaneFollowDirection::Straight => 0,
            LaneFollowDirection::TurnLeft => 1,
            LaneFollowDirection::TurnRight => 2,
        }
    }

    /// Human-readable label, useful for logging and test output.
    pub fn as_str(self) -> &'static str {
        match self {
            LaneFollowDirection::Straight => "straight",
            LaneFollowDirection::TurnLeft => "turn_left",
            LaneFollowDirection::TurnRight => "turn_right",
        }
    }
}

impl std::fmt::Display for LaneFollowDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
