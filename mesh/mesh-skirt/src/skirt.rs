//! Skirt generation along tile-boundary chains.
//!
//! A skirt is a strip of triangles hanging off the tile boundary. It hides
//! the cracks that open between neighbouring tiles simplified to different
//! levels of detail.

use hashbrown::HashMap;
use mesh_halfedge::{BoundaryClass, FaceKind, HalfEdgeId, PositionIndex, Surface, VertexId};
use mesh_types::{Axis, Vector3};
use tracing::{debug, info};

use crate::error::SkirtResult;
use crate::params::SkirtParams;
use crate::result::SkirtSummary;

/// A run of boundary half-edges where each one starts where the previous
/// one ends.
#[derive(Debug, Clone)]
struct Chain {
    edges: Vec<HalfEdgeId>,
    closed: bool,
}

/// Extrude skirts along the frontier edges tagged with the given classes.
///
/// For each class, live frontier half-edges of normal faces carrying that
/// class id are chained by shared endpoints (same vertex or same position).
/// Each chain vertex gets a direction: the negated average normal of the one
/// or two adjacent boundary faces, with the component along the side's axis
/// removed (Y for South/North, X for West/East) so walls stay in the side's
/// plane. Normals that cancel give no direction.
///
/// Every boundary edge `a -> b` then gets a quad of two
/// [`FaceKind::Skirt`] triangles `(b, a, a')` and `(b, a', b')`, where
/// `a'`/`b'` are copies of `a`/`b` moved `height` along the directions.
/// Each boundary vertex is copied once per chain, so the quads of a chain
/// form a ladder; duplicates on a texture seam get a copy each. Only the
/// quad's inner diagonal is twinned. Quads with an end lacking a direction
/// are skipped.
///
/// # Errors
///
/// Returns [`SkirtError`](crate::SkirtError) for an invalid height or
/// epsilon.
///
/// # Example
///
/// ```
/// use mesh_cut::classify_tile_boundary;
/// use mesh_halfedge::{build_topology, BoundaryClass, FaceKind};
/// use mesh_skirt::{make_skirt, SkirtParams};
/// use mesh_types::{grid_plane, MeshBounds};
///
/// let mut surface = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
/// let bounds = surface.bounds();
/// classify_tile_boundary(&mut surface, &bounds, 1e-9);
///
/// let summary = make_skirt(&mut surface, &[BoundaryClass::South], &SkirtParams::new(0.5)).unwrap();
/// assert_eq!(summary.faces_added, 4);
/// assert_eq!(summary.vertices_added, 3);
/// assert!((surface.area_of(FaceKind::Skirt) - 1.0).abs() < 1e-12);
/// ```
pub fn make_skirt(
    surface: &mut Surface,
    classes: &[BoundaryClass],
    params: &SkirtParams,
) -> SkirtResult<SkirtSummary> {
    params.validate()?;

    info!(
        classes = classes.len(),
        height = params.height,
        "Generating skirt"
    );

    let positions: Vec<_> = surface.vertices().iter().map(|v| v.position).collect();
    let groups = PositionIndex::group(&positions, 0.0);
    let key = |v: VertexId| groups.get(v.index()).copied().unwrap_or(v.0);

    let mut summary = SkirtSummary::default();
    for &class in classes {
        let edges = boundary_edges(surface, class);
        if edges.is_empty() {
            continue;
        }
        summary.boundary_edges += edges.len();

        let chains = build_chains(surface, &edges, &key);
        debug!(class = ?class, edges = edges.len(), chains = chains.len(), "Chained boundary");
        summary.chains += chains.len();

        for chain in &chains {
            extrude_chain(surface, chain, class, params, &mut summary);
        }
    }

    info!(%summary, "Skirt complete");
    Ok(summary)
}

/// Live frontier half-edges of normal faces tagged with `class`.
fn boundary_edges(surface: &Surface, class: BoundaryClass) -> Vec<HalfEdgeId> {
    surface
        .live_half_edges()
        .filter(|(_, he)| {
            he.is_frontier()
                && he.class_id == class.id()
                && surface[he.face].kind == FaceKind::Normal
        })
        .map(|(e, _)| e)
        .collect()
}

/// Order boundary edges into chains, starting from chain heads (edges whose
/// start no other edge ends at) so open runs are walked in one piece.
fn build_chains(
    surface: &Surface,
    edges: &[HalfEdgeId],
    key: &impl Fn(VertexId) -> u32,
) -> Vec<Chain> {
    let mut by_start: HashMap<u32, Vec<usize>> = HashMap::new();
    let mut end_count: HashMap<u32, usize> = HashMap::new();
    for (i, &e) in edges.iter().enumerate() {
        by_start.entry(key(surface[e].origin)).or_default().push(i);
        *end_count.entry(key(surface.end(e))).or_default() += 1;
    }

    let (heads, rest): (Vec<usize>, Vec<usize>) = (0..edges.len())
        .partition(|&i| !end_count.contains_key(&key(surface[edges[i]].origin)));

    let mut used = vec![false; edges.len()];
    let mut chains = Vec::new();
    for start in heads.into_iter().chain(rest) {
        if used[start] {
            continue;
        }
        let mut chain = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            chain.push(edges[current]);
            let end = key(surface.end(edges[current]));
            let next = by_start
                .get(&end)
                .and_then(|list| list.iter().copied().find(|&i| !used[i]));
            match next {
                Some(n) => current = n,
                None => break,
            }
        }

        let first = key(surface[chain[0]].origin);
        let last = key(surface.end(chain[chain.len() - 1]));
        chains.push(Chain {
            closed: first == last && chain.len() > 1,
            edges: chain,
        });
    }
    chains
}

/// Skirt direction at a boundary vertex from the normals of its one or two
/// adjacent boundary faces.
///
/// Returns `None` when the normals cancel or nothing is left after removing
/// the component along `axis`.
fn skirt_direction(
    normals: &[Vector3<f64>],
    axis: Axis,
    cancel_epsilon: f64,
) -> Option<Vector3<f64>> {
    if normals.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let average = normals.iter().sum::<Vector3<f64>>() / normals.len() as f64;
    if average.norm() <= cancel_epsilon {
        return None;
    }
    let mut direction = -average;
    direction[axis.index()] = 0.0;
    direction.try_normalize(cancel_epsilon.max(f64::EPSILON))
}

fn extrude_chain(
    surface: &mut Surface,
    chain: &Chain,
    class: BoundaryClass,
    params: &SkirtParams,
    summary: &mut SkirtSummary,
) {
    let n = chain.edges.len();
    let face_normal = |surface: &Surface, i: usize| surface[surface[chain.edges[i]].face].normal;

    // Chain vertex i sits between edge i-1 and edge i
    let vertex_count = if chain.closed { n } else { n + 1 };
    let directions: Vec<Option<Vector3<f64>>> = (0..vertex_count)
        .map(|i| {
            let mut normals = Vec::with_capacity(2);
            if i > 0 {
                normals.push(face_normal(surface, i - 1));
            } else if chain.closed {
                normals.push(face_normal(surface, n - 1));
            }
            if i < n {
                normals.push(face_normal(surface, i));
            }
            skirt_direction(&normals, class.axis(), params.cancel_epsilon)
        })
        .collect();

    // Neighbouring quads share their extruded vertex unless the boundary
    // vertices differ (a texture seam)
    let mut lowered: HashMap<VertexId, VertexId> = HashMap::new();
    let mut lower = |surface: &mut Surface, v: VertexId, direction: Vector3<f64>| {
        *lowered
            .entry(v)
            .or_insert_with(|| extruded_vertex(surface, v, direction * params.height, class))
    };

    for (i, &e) in chain.edges.iter().enumerate() {
        let (Some(dir_a), Some(dir_b)) = (directions[i], directions[(i + 1) % vertex_count]) else {
            summary.folded_skipped += 1;
            continue;
        };

        let a = surface[e].origin;
        let b = surface.end(e);
        let a_low = lower(surface, a, dir_a);
        let b_low = lower(surface, b, dir_b);

        let upper = surface.add_face([b, a, a_low], FaceKind::Skirt);
        let lower = surface.add_face([b, a_low, b_low], FaceKind::Skirt);
        surface[upper].class_id = class.id();
        surface[lower].class_id = class.id();

        // (b, a, a') ends with a' -> b; (b, a', b') starts with b -> a'
        let [_, _, upper_diagonal] = surface.face_half_edges(upper);
        let [lower_diagonal, _, _] = surface.face_half_edges(lower);
        surface.set_twins(upper_diagonal, lower_diagonal);

        summary.faces_added += 2;
    }
    summary.vertices_added += lowered.len();
}

fn extruded_vertex(
    surface: &mut Surface,
    from: VertexId,
    offset: Vector3<f64>,
    class: BoundaryClass,
) -> VertexId {
    let source = &surface[from];
    let position = source.position + offset;
    let attributes = source.attributes.clone();
    let v = surface.add_vertex(position, attributes);
    surface[v].class_id = class.id();
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_cut::classify_tile_boundary;
    use mesh_halfedge::{TwinMatch, build_topology, build_topology_with};
    use mesh_types::{MeshBounds, grid_plane, unit_cube};

    fn classified_grid(n: usize, soup: bool) -> Surface {
        let grid = grid_plane(n, n as f64, 0.0);
        let mut s = if soup {
            build_topology_with(&grid.to_soup(), TwinMatch::Position { tolerance: 0.0 }).unwrap()
        } else {
            build_topology(&grid).unwrap()
        };
        let bounds = s.bounds();
        classify_tile_boundary(&mut s, &bounds, 1e-9);
        s
    }

    #[test]
    fn south_skirt_hangs_down() {
        let mut s = classified_grid(2, false);
        let before = s.vertices().len();
        let summary = make_skirt(&mut s, &[BoundaryClass::South], &SkirtParams::new(1.0)).unwrap();

        assert_eq!(summary.chains, 1);
        assert_eq!(summary.boundary_edges, 2);
        assert_eq!(summary.faces_added, 4);
        assert_eq!(summary.vertices_added, 3);
        assert_eq!(s.vertices().len(), before + 3);
        for v in &s.vertices()[before..] {
            assert_relative_eq!(v.position.z, -1.0);
            assert_relative_eq!(v.position.y, 0.0);
        }
        assert_relative_eq!(s.area_of(FaceKind::Skirt), 2.0, epsilon = 1e-12);
        assert!(s.validate().is_valid());
    }

    #[test]
    fn skirt_quads_twin_only_on_diagonal() {
        let mut s = classified_grid(1, false);
        let frontier = s.frontier_count();
        make_skirt(&mut s, &[BoundaryClass::West], &SkirtParams::default()).unwrap();
        // One quad: 6 new half-edges, 2 of them paired
        assert_eq!(s.frontier_count(), frontier + 4);
        assert_eq!(s.face_count_of(FaceKind::Skirt), 2);
    }

    #[test]
    fn all_sides_give_closed_chains_per_side() {
        let mut s = classified_grid(3, false);
        let summary = make_skirt(&mut s, &BoundaryClass::ALL, &SkirtParams::new(0.5)).unwrap();
        assert_eq!(summary.chains, 4);
        assert_eq!(summary.faces_added, 24);
        // Corners get one copy per side
        assert_eq!(summary.vertices_added, 16);
        assert_eq!(summary.folded_skipped, 0);
        assert_relative_eq!(s.area_of(FaceKind::Skirt), 4.0 * 3.0 * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn seam_duplicates_chain_by_position() {
        let mut s = classified_grid(3, true);
        let summary = make_skirt(&mut s, &[BoundaryClass::North], &SkirtParams::new(1.0)).unwrap();
        assert_eq!(summary.boundary_edges, 3);
        assert_eq!(summary.chains, 1);
        // Every soup corner is its own vertex, so no copy is shared
        assert_eq!(summary.vertices_added, 6);
    }

    #[test]
    fn neighbouring_quads_share_extruded_vertices() {
        let mut s = classified_grid(4, false);
        let summary = make_skirt(&mut s, &[BoundaryClass::East], &SkirtParams::new(1.0)).unwrap();
        assert_eq!(summary.faces_added, 8);
        assert_eq!(summary.vertices_added, 5);

        // Consecutive quads meet along a shared vertical edge
        let skirt_vertices: Vec<_> = s
            .live_faces()
            .filter(|(_, f)| f.kind == FaceKind::Skirt)
            .flat_map(|(f, _)| s.face_vertices(f))
            .filter(|&v| s[v].position.z < -0.5)
            .collect();
        let mut distinct = skirt_vertices.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 5);
        assert!(s.validate().is_valid());
    }

    #[test]
    fn unclassified_surface_gets_no_skirt() {
        let mut s = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
        let summary = make_skirt(&mut s, &BoundaryClass::ALL, &SkirtParams::default()).unwrap();
        assert!(!summary.had_changes());

        let mut cube = build_topology(&unit_cube()).unwrap();
        let summary = make_skirt(&mut cube, &BoundaryClass::ALL, &SkirtParams::default()).unwrap();
        assert_eq!(summary.boundary_edges, 0);
    }

    #[test]
    fn invalid_height_is_rejected() {
        let mut s = classified_grid(1, false);
        assert!(make_skirt(&mut s, &[BoundaryClass::South], &SkirtParams::new(0.0)).is_err());
        assert_eq!(s.face_count_of(FaceKind::Skirt), 0);
    }

    #[test]
    fn cancelling_normals_give_no_direction() {
        let up = Vector3::z();
        assert_eq!(skirt_direction(&[up, -up], Axis::Y, 1e-6), None);
        assert_eq!(skirt_direction(&[], Axis::Y, 1e-6), None);

        // A wall facing -Y on the South side has nothing left once Y is removed
        assert_eq!(skirt_direction(&[-Vector3::y()], Axis::Y, 1e-6), None);

        let tilted = Vector3::new(0.0, -1.0, 1.0).normalize();
        let dir = skirt_direction(&[tilted], Axis::Y, 1e-6).unwrap();
        assert_relative_eq!(dir, -Vector3::z(), epsilon = 1e-12);
    }
}
