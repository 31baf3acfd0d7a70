//! `nav-npc` — per-NPC route management and driving decisions.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`manager`] | `NpcRouteManager<R>` — planning, lane-follow and stop decisions |
//! | [`state`]   | `NpcState` record, `NpcObservation` per-cycle input             |
//! | [`params`]  | `NpcParams` — every tunable threshold and weight                |
//! | [`msg`]     | `MapMessage` ingestion (external map transport boundary)        |
//! | [`error`]   | `NpcError`, `NpcResult<T>`                                      |
//!
//! # Cycle model
//!
//! The component is driven by an external dispatcher that serializes map
//! ingestion and per-cycle queries:
//!
//! 1. A map message arrives → [`NpcRouteManager::ingest_map`] rebuilds the
//!    lane graph wholesale and flips readiness.
//! 2. The scenario controller registers checkpoints
//!    ([`NpcRouteManager::set_checkpoint`]) and plans routes
//!    ([`NpcRouteManager::plan_route`]).
//! 3. Every simulation cycle the controller passes the current NPC poses
//!    and velocities to [`NpcRouteManager::update_lane_follow_state`] and
//!    [`NpcRouteManager::update_stop_state`] and applies the returned
//!    direction codes and stop flags.
//!
//! Everything fails soft: queries before readiness, unlocalizable poses,
//! and unreachable goals all come back as `Err`/default values, never
//! panics.

pub mod error;
pub mod manager;
pub mod msg;
pub mod params;
pub mod state;


pub use error::{NpcError, NpcResult};
pub use manager::{is_goal, NpcRouteManager};
pub use msg::{ConnectionMsg, LaneletMsg, MapError, MapMessage};
pub use params::NpcParams;
pub use state::{NpcObservation, NpcState};
