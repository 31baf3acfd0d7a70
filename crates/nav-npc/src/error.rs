//! Route-manager error type.

use thiserror::Error;

use nav_core::Pose;
use nav_graph::GraphError;

use crate::msg::MapError;

/// Errors produced by `nav-npc`.
///
/// All of these are recoverable: the caller is expected to retry or fall
/// back to a default behavior (e.g. hold position).
#[derive(Debug, Error)]
pub enum NpcError {
    /// No map has been ingested yet.
    #[error("lane map not ready")]
    NotReady,

    /// A pose could not be matched to any lanelet within thresholds.
    #[error("no lanelet matches pose {0}")]
    NoMatchingLane(Pose),

    /// Query for a name that never planned a route.
    #[error("no route is planned for npc {0:?}")]
    UnknownNpc(String),

    #[error("routing failed: {0}")]
    Routing(#[from] GraphError),

    #[error("map ingestion failed: {0}")]
    Map(#[from] MapError),
}

pub type NpcResult<T> = Result<T, NpcError>;
