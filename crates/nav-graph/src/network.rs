//! Lane graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing lane
//! relations.  Given a `LaneletId n`, its outgoing relations occupy the
//! slice:
//!
//! ```text
//! rel_to[ lane_out_start[n] .. lane_out_start[n+1] ]
//! ```
//!
//! Relation arrays (`rel_from`, `rel_to`, `rel_kind`) are sorted by source
//! lanelet, so iterating a lanelet's successors is a contiguous memory scan
//! — ideal for the routing inner loop.
//!
//! Relations are inserted **already filtered by traffic rules**: a
//! connection the rules forbid never becomes a relation, so every traversal
//! the router considers is legal by construction.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over resampled centerline points maps a planar
//! position to nearby lanelets.  Used as the candidate generator for
//! closest-lanelet localization (see [`locate`](crate::locate)).

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use nav_core::{LaneletId, Point2};

use crate::geom;

/// Spacing of the resampled centerline points fed to the R-tree.  Bounds
/// the gap between the true centerline and its nearest sampled point, which
/// in turn bounds the extra search radius candidate queries must add.
const SAMPLE_SPACING: f64 = 5.0;

// ── Attributes & relations ────────────────────────────────────────────────────

/// Per-lanelet turn classification, carried as a graph attribute.
///
/// The decision layer reads the maneuver from this attribute; it is never
/// recomputed from geometry.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnClass {
    #[default]
    Straight,
    Left,
    Right,
}

impl TurnClass {
    /// Parse the map attribute value ("straight" / "left" / "right").
    pub fn from_attr(s: &str) -> Option<TurnClass> {
        match s {
            "straight" => Some(TurnClass::Straight),
            "left" => Some(TurnClass::Left),
            "right" => Some(TurnClass::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TurnClass::Straight => "straight",
            TurnClass::Left => "left",
            TurnClass::Right => "right",
        }
    }
}

/// How one lanelet connects to the next.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    /// Longitudinal successor — the lane continues.
    Follows,
    /// Left lateral neighbor (lane change).
    Left,
    /// Right lateral neighbor (lane change).
    Right,
}

impl Relation {
    /// `true` for lane-change relations, which leave the nominal lane.
    #[inline]
    pub fn is_lateral(self) -> bool {
        !matches!(self, Relation::Follows)
    }
}

// ── R-tree centerline entry ───────────────────────────────────────────────────

/// Entry stored in the R-tree: a resampled centerline point with the
/// lanelet it belongs to.
#[derive(Clone)]
struct CenterlineEntry {
    point: [f64; 2],
    id: LaneletId,
}

impl RTreeObject for CenterlineEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CenterlineEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── LaneGraph ─────────────────────────────────────────────────────────────────

/// Routable lane graph: per-lanelet geometry/attributes plus CSR adjacency
/// and a spatial index.
///
/// All lanelet arrays are indexed by `LaneletId`.  Do not construct
/// directly; use [`LaneGraphBuilder`].
pub struct LaneGraph {
    // ── Lanelet data ──────────────────────────────────────────────────────
    /// Centerline polyline of each lanelet (≥ 2 vertices).
    pub centerline: Vec<Vec<Point2>>,

    /// Lane width of each lanelet.
    pub width: Vec<f64>,

    /// Precomputed centerline arc length.  Base routing cost.
    pub length: Vec<f64>,

    /// Turn classification attribute of each lanelet.
    pub turn: Vec<TurnClass>,

    // ── CSR relation adjacency ────────────────────────────────────────────
    /// CSR row pointer.  Outgoing relations of lanelet `n` are at indices
    /// `lane_out_start[n] .. lane_out_start[n+1]`.  Length = lanelet count + 1.
    pub lane_out_start: Vec<u32>,

    /// Source lanelet of each relation (redundant with CSR, kept for
    /// debugging and invariant checks).
    pub rel_from: Vec<LaneletId>,

    /// Target lanelet of each relation.
    pub rel_to: Vec<LaneletId>,

    /// Kind of each relation.
    pub rel_kind: Vec<Relation>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<CenterlineEntry>,
}

impl LaneGraph {
    /// Construct an empty graph with no lanelets.  Any localization or
    /// routing query against it fails with "no match" / `NoRoute`.
    pub fn empty() -> Self {
        LaneGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn lanelet_count(&self) -> usize {
        self.centerline.len()
    }

    pub fn relation_count(&self) -> usize {
        self.rel_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centerline.is_empty()
    }

    /// `true` if `id` names a lanelet in this graph.
    #[inline]
    pub fn contains(&self, id: LaneletId) -> bool {
        id.index() < self.centerline.len()
    }

    // ── Attributes ────────────────────────────────────────────────────────

    #[inline]
    pub fn turn_class(&self, id: LaneletId) -> TurnClass {
        self.turn[id.index()]
    }

    #[inline]
    pub fn lanelet_length(&self, id: LaneletId) -> f64 {
        self.length[id.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Indices into the relation arrays for all outgoing relations of
    /// `lanelet`.  A contiguous range — no heap allocation.
    #[inline]
    pub fn out_relations(&self, lanelet: LaneletId) -> impl Iterator<Item = usize> + '_ {
        let start = self.lane_out_start[lanelet.index()] as usize;
        let end = self.lane_out_start[lanelet.index() + 1] as usize;
        start..end
    }

    /// Iterator over `(target, relation)` pairs reachable from `lanelet`.
    #[inline]
    pub fn successors(
        &self,
        lanelet: LaneletId,
    ) -> impl Iterator<Item = (LaneletId, Relation)> + '_ {
        self.out_relations(lanelet)
            .map(|i| (self.rel_to[i], self.rel_kind[i]))
    }

    /// Out-degree of `lanelet` (number of outgoing relations).
    #[inline]
    pub fn out_degree(&self, lanelet: LaneletId) -> usize {
        let start = self.lane_out_start[lanelet.index()] as usize;
        let end = self.lane_out_start[lanelet.index() + 1] as usize;
        end - start
    }

    /// `true` if some relation connects `from` directly to `to`.
    pub fn is_adjacent(&self, from: LaneletId, to: LaneletId) -> bool {
        self.successors(from).any(|(t, _)| t == to)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Lanelets with a centerline sample within `max_dist` of `p`, deduped
    /// and sorted by id.
    ///
    /// The query radius is widened by the resampling spacing so a lanelet
    /// whose true centerline passes within `max_dist` is never missed.
    pub fn candidates_near(&self, p: Point2, max_dist: f64) -> Vec<LaneletId> {
        let r = max_dist + SAMPLE_SPACING;
        let mut ids: Vec<LaneletId> = self
            .spatial_idx
            .locate_within_distance([p.x, p.y], r * r)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Exact distance from `p` to the centerline of `id`, with the heading
    /// of the nearest centerline segment.
    #[inline]
    pub fn centerline_distance(&self, id: LaneletId, p: Point2) -> Option<(f64, f64)> {
        geom::nearest_segment(&self.centerline[id.index()], p)
    }
}

// ── LaneGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`LaneGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts lanelets and relations in any order.  `build()`
/// sorts relations by source lanelet, constructs the CSR arrays, and
/// bulk-loads the R-tree from resampled centerline points.
///
/// # Example
///
/// ```
/// use nav_core::Point2;
/// use nav_graph::{LaneGraphBuilder, Relation, TurnClass};
///
/// let mut b = LaneGraphBuilder::new();
/// let a = b.add_lanelet(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)], 3.5, TurnClass::Straight);
/// let c = b.add_lanelet(vec![Point2::new(10.0, 0.0), Point2::new(20.0, 0.0)], 3.5, TurnClass::Straight);
/// b.connect(a, c, Relation::Follows);
/// let graph = b.build();
/// assert_eq!(graph.lanelet_count(), 2);
/// assert!(graph.is_adjacent(a, c));
/// ```
pub struct LaneGraphBuilder {
    centerline: Vec<Vec<Point2>>,
    width: Vec<f64>,
    turn: Vec<TurnClass>,
    raw_rels: Vec<RawRelation>,
}

struct RawRelation {
    from: LaneletId,
    to: LaneletId,
    kind: Relation,
}

impl LaneGraphBuilder {
    pub fn new() -> Self {
        Self {
            centerline: Vec::new(),
            width: Vec::new(),
            turn: Vec::new(),
            raw_rels: Vec::new(),
        }
    }

    /// Pre-allocate for the expected number of lanelets and relations.
    pub fn with_capacity(lanelets: usize, relations: usize) -> Self {
        Self {
            centerline: Vec::with_capacity(lanelets),
            width: Vec::with_capacity(lanelets),
            turn: Vec::with_capacity(lanelets),
            raw_rels: Vec::with_capacity(relations),
        }
    }

    /// Add a lanelet and return its `LaneletId` (sequential from 0).
    ///
    /// `centerline` must have at least two vertices; map ingestion rejects
    /// degenerate lanelets before they reach the builder.
    pub fn add_lanelet(
        &mut self,
        centerline: Vec<Point2>,
        width: f64,
        turn: TurnClass,
    ) -> LaneletId {
        debug_assert!(centerline.len() >= 2, "degenerate centerline");
        let id = LaneletId(self.centerline.len() as u32);
        self.centerline.push(centerline);
        self.width.push(width);
        self.turn.push(turn);
        id
    }

    /// Add a **directed** relation from `from` to `to`.
    pub fn connect(&mut self, from: LaneletId, to: LaneletId, kind: Relation) {
        self.raw_rels.push(RawRelation { from, to, kind });
    }

    pub fn lanelet_count(&self) -> usize {
        self.centerline.len()
    }

    /// Consume the builder and produce a [`LaneGraph`].
    ///
    /// Time complexity: O(R log R) for the relation sort + O(S log S) for
    /// the R-tree bulk load over S resampled centerline points.
    pub fn build(self) -> LaneGraph {
        let lanelet_count = self.centerline.len();
        let rel_count = self.raw_rels.len();

        // Sort relations by source lanelet for CSR construction.
        let mut raw = self.raw_rels;
        raw.sort_by_key(|r| (r.from, r.to));

        let rel_from: Vec<LaneletId> = raw.iter().map(|r| r.from).collect();
        let rel_to: Vec<LaneletId> = raw.iter().map(|r| r.to).collect();
        let rel_kind: Vec<Relation> = raw.iter().map(|r| r.kind).collect();

        // Build CSR row pointer.
        let mut lane_out_start = vec![0u32; lanelet_count + 1];
        for r in &raw {
            lane_out_start[r.from.index() + 1] += 1;
        }
        for i in 1..=lanelet_count {
            lane_out_start[i] += lane_out_start[i - 1];
        }
        debug_assert_eq!(lane_out_start[lanelet_count] as usize, rel_count);

        let length: Vec<f64> = self.centerline.iter().map(|c| geom::polyline_length(c)).collect();

        // Bulk-load R-tree from resampled centerlines.
        let mut entries = Vec::new();
        for (i, line) in self.centerline.iter().enumerate() {
            let id = LaneletId(i as u32);
            for p in resample(line, SAMPLE_SPACING) {
                entries.push(CenterlineEntry { point: [p.x, p.y], id });
            }
        }
        let spatial_idx = RTree::bulk_load(entries);

        LaneGraph {
            centerline: self.centerline,
            width: self.width,
            length,
            turn: self.turn,
            lane_out_start,
            rel_from,
            rel_to,
            rel_kind,
            spatial_idx,
        }
    }
}

impl Default for LaneGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resample a polyline so consecutive emitted points are at most `spacing`
/// apart.  Original vertices are always kept.
fn resample(points: &[Point2], spacing: f64) -> Vec<Point2> {
    let mut out = Vec::new();
    if points.is_empty() {
        return out;
    }
    out.push(points[0]);
    for w in points.windows(2) {
        let seg_len = w[0].distance_to(w[1]);
        let steps = (seg_len / spacing).ceil().max(1.0) as usize;
        for k in 1..=steps {
            let t = k as f64 / steps as f64;
            out.push(Point2::new(
                w[0].x + t * (w[1].x - w[0].x),
                w[0].y + t * (w[1].y - w[0].y),
            ));
        }
    }
    out
}
