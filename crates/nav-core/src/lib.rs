//! `nav-core` — foundational types for the `npc_nav` route-management
//! workspace.
//!
//! This crate is a dependency of every other `nav-*` crate.  It has no
//! `nav-*` dependencies and no required external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | [`pose`]      | `Pose`, `Quaternion`, `Point2`, `normalize_angle` |
//! | [`ids`]       | `LaneletId`                                       |
//! | [`direction`] | `LaneFollowDirection` enum                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod direction;
pub mod ids;
pub mod pose;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use direction::LaneFollowDirection;
pub use ids::LaneletId;
pub use pose::{normalize_angle, Point2, Pose, Quaternion};
