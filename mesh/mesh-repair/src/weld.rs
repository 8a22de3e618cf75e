//! Vertex welding on half-edge surfaces.

use mesh_halfedge::{HalfEdgeId, PositionIndex, Surface, TwinMatch, VertexId};
use mesh_types::VertexAttributes;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Normals closer than this dot product are considered equal (~0.8°).
const NORMAL_MATCH_DOT: f64 = 0.9999;

/// Texture coordinates closer than this are considered equal.
const UV_MATCH_DISTANCE: f64 = 1e-9;

/// Which vertex attributes must agree for two coincident vertices to merge.
///
/// Vertices that share a position but differ in a required attribute (a
/// texture seam, a batch border) stay separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeMatch {
    /// Texture coordinates must match.
    pub uv: bool,
    /// Normals must match.
    pub normal: bool,
    /// Colors must match.
    pub color: bool,
    /// Batch ids must match.
    pub batch_id: bool,
}

impl Default for AttributeMatch {
    /// Texture coordinate, color and batch id must match; normals may differ.
    fn default() -> Self {
        Self {
            uv: true,
            normal: false,
            color: true,
            batch_id: true,
        }
    }
}

impl AttributeMatch {
    /// Every attribute must match.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            uv: true,
            normal: true,
            color: true,
            batch_id: true,
        }
    }

    /// Only positions matter.
    #[must_use]
    pub const fn position_only() -> Self {
        Self {
            uv: false,
            normal: false,
            color: false,
            batch_id: false,
        }
    }

    /// Check whether two attribute sets agree on every required attribute.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_repair::AttributeMatch;
    /// use mesh_types::Vertex;
    ///
    /// let a = Vertex::from_coords(0.0, 0.0, 0.0).with_uv(0.0, 0.0);
    /// let b = Vertex::from_coords(0.0, 0.0, 0.0).with_uv(1.0, 0.0);
    ///
    /// assert!(!AttributeMatch::default().matches(&a.attributes, &b.attributes));
    /// assert!(AttributeMatch::position_only().matches(&a.attributes, &b.attributes));
    /// ```
    #[must_use]
    pub fn matches(&self, a: &VertexAttributes, b: &VertexAttributes) -> bool {
        if self.batch_id && a.batch_id != b.batch_id {
            return false;
        }
        if self.color && a.color != b.color {
            return false;
        }
        if self.uv {
            let same = match (a.uv, b.uv) {
                (None, None) => true,
                (Some(p), Some(q)) => (p - q).norm() <= UV_MATCH_DISTANCE,
                _ => false,
            };
            if !same {
                return false;
            }
        }
        if self.normal {
            let same = match (a.normal, b.normal) {
                (None, None) => true,
                (Some(n), Some(m)) => n.dot(&m) >= NORMAL_MATCH_DOT,
                _ => false,
            };
            if !same {
                return false;
            }
        }
        true
    }
}

/// Parameters for [`weld_vertices`].
///
/// # Example
///
/// ```
/// use mesh_repair::{AttributeMatch, WeldParams};
///
/// let params = WeldParams::default()
///     .with_tolerance(0.001)
///     .with_matching(AttributeMatch::position_only());
/// assert_eq!(params.tolerance, 0.001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeldParams {
    /// Maximum distance between merged vertices.
    ///
    /// `0.0` merges bit-identical positions only.
    /// Default: `1e-6`
    pub tolerance: f64,

    /// Attributes that must agree.
    /// Default: [`AttributeMatch::default`]
    pub matching: AttributeMatch,
}

impl Default for WeldParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            matching: AttributeMatch::default(),
        }
    }
}

impl WeldParams {
    /// Merge bit-identical positions with matching attributes.
    #[must_use]
    pub fn exact() -> Self {
        Self {
            tolerance: 0.0,
            ..Self::default()
        }
    }

    /// Merge by position only, ignoring attributes.
    ///
    /// Suited to geometry without texture seams, such as raw soups from
    /// exporters that duplicate every corner.
    #[must_use]
    pub fn geometry_only(tolerance: f64) -> Self {
        Self {
            tolerance,
            matching: AttributeMatch::position_only(),
        }
    }

    /// Set the weld tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the attribute matching rule.
    #[must_use]
    pub const fn with_matching(mut self, matching: AttributeMatch) -> Self {
        self.matching = matching;
        self
    }
}

/// Merge live vertices that lie within tolerance and agree on the required
/// attributes.
///
/// Vertices are visited in id order; each one merges into the earliest
/// surviving representative that qualifies, so groups never chain beyond
/// the tolerance and the pass is idempotent for a fixed tolerance.
///
/// Half-edge origins are rewritten to the representative, merged vertices
/// are tombstoned, faces that end up with a repeated corner are tombstoned,
/// twins are re-derived by position (within the same tolerance), and outgoing
/// references are refreshed. The surface is not compacted.
///
/// A negative or non-finite tolerance is treated as `0.0`.
///
/// Returns the number of vertices merged away.
///
/// # Example
///
/// ```
/// use mesh_halfedge::build_topology;
/// use mesh_repair::{weld_vertices, WeldParams};
/// use mesh_types::unit_cube;
///
/// // Every corner of the soup is duplicated per triangle
/// let mut surface = build_topology(&unit_cube().to_soup()).unwrap();
/// assert_eq!(surface.frontier_count(), 36);
///
/// let merged = weld_vertices(&mut surface, &WeldParams::exact());
/// assert_eq!(merged, 28);
/// assert_eq!(surface.vertex_count(), 8);
/// assert_eq!(surface.frontier_count(), 0);
/// ```
pub fn weld_vertices(surface: &mut Surface, params: &WeldParams) -> usize {
    let tolerance = if params.tolerance.is_finite() && params.tolerance >= 0.0 {
        params.tolerance
    } else {
        warn!(tolerance = params.tolerance, "Invalid weld tolerance, using exact matching");
        0.0
    };

    let slots = surface.vertices().len();
    let mut remap: Vec<VertexId> = (0..slots).map(VertexId::from_index).collect();
    let mut index = PositionIndex::new(tolerance);
    let mut merged = 0usize;

    for i in 0..slots {
        let vertex = &surface.vertices()[i];
        if !vertex.is_live() {
            continue;
        }
        let found = index.find(&vertex.position, |rep| {
            params
                .matching
                .matches(&surface.vertices()[rep as usize].attributes, &vertex.attributes)
        });
        match found {
            Some(rep) => {
                remap[i] = VertexId(rep);
                merged += 1;
            }
            None => index.insert(VertexId::from_index(i).0, vertex.position),
        }
    }

    if merged == 0 {
        return 0;
    }

    // Rewrite origins
    let edge_slots = surface.half_edges().len();
    for i in 0..edge_slots {
        let e = HalfEdgeId::from_index(i);
        if surface[e].is_live() {
            let origin = surface[e].origin;
            surface[e].origin = remap[origin.index()];
        }
    }

    for (i, target) in remap.iter().enumerate() {
        if target.index() != i {
            surface.tombstone_vertex(VertexId::from_index(i));
        }
    }

    let collapsed: Vec<_> = surface
        .live_faces()
        .map(|(f, _)| f)
        .filter(|&f| {
            let [a, b, c] = surface.face_vertices(f);
            a == b || b == c || c == a
        })
        .collect();
    for &f in &collapsed {
        surface.tombstone_face(f);
    }

    surface.repair_twins(TwinMatch::Position { tolerance });
    surface.refresh_outgoing();

    debug!(
        merged,
        collapsed_faces = collapsed.len(),
        tolerance,
        "Welded vertices"
    );

    merged
}
