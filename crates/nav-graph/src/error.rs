//! Lane-graph error type.

use thiserror::Error;

use nav_core::LaneletId;

/// Errors produced by `nav-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: LaneletId, to: LaneletId },

    #[error("lanelet {0} not found in graph")]
    LaneletNotFound(LaneletId),
}

pub type GraphResult<T> = Result<T, GraphError>;
