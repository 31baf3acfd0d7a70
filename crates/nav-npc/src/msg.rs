//! Map-message ingestion.
//!
//! The transport delivers one message type carrying the full lane map.
//! Lanelets and their connections arrive with the map's own (external,
//! sparse) ids and string attributes; ingestion validates the message,
//! applies the traffic-rules filter (connections marked illegal never
//! become graph relations), and builds a fresh [`LaneGraph`].
//!
//! Internal [`LaneletId`]s are assigned sequentially in message order, so
//! the n-th lanelet of the message becomes `LaneletId(n)`.

use rustc_hash::FxHashMap;

use log::debug;
use thiserror::Error;

use nav_core::{LaneletId, Point2};
use nav_graph::{LaneGraph, LaneGraphBuilder, Relation, TurnClass};

// ── Message types ─────────────────────────────────────────────────────────────

/// One lanelet as carried by the map message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LaneletMsg {
    /// External map id (sparse, e.g. a lanelet2 primitive id).
    pub id: i64,

    /// Centerline vertices as `[x, y, z]`; `z` is ignored by the planar
    /// graph.  At least two vertices required.
    pub centerline: Vec<[f64; 3]>,

    /// Lane width.
    #[serde(default = "default_lane_width")]
    pub width: f64,

    /// Turn-direction attribute: `"straight"`, `"left"`, or `"right"`.
    #[serde(default = "default_turn")]
    pub turn: String,
}

/// One directed lane connection as carried by the map message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConnectionMsg {
    pub from: i64,
    pub to: i64,

    /// Relation kind: `"follows"`, `"left"`, or `"right"`.
    pub relation: String,

    /// Whether the applicable traffic rules permit this connection.
    /// Illegal connections are dropped at ingestion.
    #[serde(default = "default_legal")]
    pub legal: bool,
}

/// The full lane-map message.  Each received message replaces the previous
/// graph wholesale.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MapMessage {
    pub lanelets: Vec<LaneletMsg>,
    pub connections: Vec<ConnectionMsg>,
}

fn default_lane_width() -> f64 {
    3.5
}

fn default_turn() -> String {
    "straight".to_owned()
}

fn default_legal() -> bool {
    true
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// A malformed map message.  The previous graph (if any) stays in place.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("duplicate lanelet id {0} in map message")]
    DuplicateLanelet(i64),

    #[error("lanelet {0} has a degenerate centerline ({1} vertices)")]
    DegenerateCenterline(i64, usize),

    #[error("lanelet {0} has unknown turn class {1:?}")]
    UnknownTurnClass(i64, String),

    #[error("connection references unknown lanelet {0}")]
    DanglingConnection(i64),

    #[error("connection {from} -> {to} has unknown relation {value:?}")]
    UnknownRelation { from: i64, to: i64, value: String },
}

// ── Ingestion ─────────────────────────────────────────────────────────────────

impl MapMessage {
    /// Validate the message and build a [`LaneGraph`] from it.
    ///
    /// Connections with `legal == false` are dropped (the traffic-rules
    /// filter); everything else malformed is an error so a broken map never
    /// half-loads.
    pub fn build_graph(&self) -> Result<LaneGraph, MapError> {
        let mut builder = LaneGraphBuilder::with_capacity(self.lanelets.len(), self.connections.len());
        let mut by_ext: FxHashMap<i64, LaneletId> = FxHashMap::default();

        for lanelet in &self.lanelets {
            if lanelet.centerline.len() < 2 {
                return Err(MapError::DegenerateCenterline(lanelet.id, lanelet.centerline.len()));
            }
            let turn = TurnClass::from_attr(&lanelet.turn)
                .ok_or_else(|| MapError::UnknownTurnClass(lanelet.id, lanelet.turn.clone()))?;
            let centerline: Vec<Point2> = lanelet
                .centerline
                .iter()
                .map(|&[x, y, _z]| Point2::new(x, y))
                .collect();
            let internal = builder.add_lanelet(centerline, lanelet.width, turn);
            if by_ext.insert(lanelet.id, internal).is_some() {
                return Err(MapError::DuplicateLanelet(lanelet.id));
            }
        }

        let mut dropped = 0usize;
        for conn in &self.connections {
            if !conn.legal {
                dropped += 1;
                continue;
            }
            let from = *by_ext.get(&conn.from).ok_or(MapError::DanglingConnection(conn.from))?;
            let to = *by_ext.get(&conn.to).ok_or(MapError::DanglingConnection(conn.to))?;
            let kind = parse_relation(&conn.relation).ok_or_else(|| MapError::UnknownRelation {
                from: conn.from,
                to: conn.to,
                value: conn.relation.clone(),
            })?;
            builder.connect(from, to, kind);
        }
        if dropped > 0 {
            debug!("traffic rules dropped {dropped} lane connections");
        }

        Ok(builder.build())
    }
}

fn parse_relation(s: &str) -> Option<Relation> {
    match s {
        "follows" => Some(Relation::Follows),
        "left" => Some(Relation::Left),
        "right" => Some(Relation::Right),
        _ => None,
    }
}
