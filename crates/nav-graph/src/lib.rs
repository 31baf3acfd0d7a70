//! `nav-graph` — lane graph, localization, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`network`] | `LaneGraph` (CSR + R-tree), `LaneGraphBuilder`, `TurnClass`, `Relation` |
//! | [`locate`]  | closest-lanelet search with distance/heading thresholds      |
//! | [`router`]  | `LaneRouter` trait, `LaneRoute`, `RouteCost`, `CostRouter`   |
//! | [`geom`]    | polyline distance/heading helpers                            |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                             |
//! |---------|----------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types. |

pub mod error;
pub mod geom;
pub mod locate;
pub mod network;
pub mod router;


pub use error::{GraphError, GraphResult};
pub use network::{LaneGraph, LaneGraphBuilder, Relation, TurnClass};
pub use router::{CostRouter, LaneRoute, LaneRouter, RouteCost};
