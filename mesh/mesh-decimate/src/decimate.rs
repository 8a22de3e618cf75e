//! Shortest-edge-first sweeps of quality-gated edge collapses.

use mesh_halfedge::{HalfEdgeId, Surface, SweepIndex, TwinMatch};
use mesh_repair::{WeldParams, remove_collapsed_faces, remove_unreferenced_vertices, weld_vertices};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, trace};

use crate::collapse::{Declined, EdgeClass, Evaluator, apply};
use crate::error::DecimateResult;
use crate::params::{DecimateParams, Thresholds};
use crate::result::{DecimationStats, RejectionCounts};

/// Simplify a surface in place by collapsing short edges.
///
/// Each sweep visits live half-edges from shortest to longest and collapses
/// every one that passes the topology, frontier and face quality gates,
/// then cleans up: collapsed faces are removed, twins re-derived, stray
/// vertices dropped, near-coincident vertices welded and the arenas
/// compacted. Sweeps repeat until one collapses nothing or
/// `params.iterations` is reached.
///
/// Frontier edges only move along their own line (within
/// `frontier_max_diff_angle_deg`), so tile borders stay where neighbouring
/// tiles expect them. Skirt faces are never collapsed across; they follow
/// their boundary vertex.
///
/// # Arguments
///
/// * `surface` - Surface to decimate (compacted on return if anything collapsed)
/// * `params` - Thresholds and limits
///
/// # Errors
///
/// Returns [`DecimateError`](crate::DecimateError) if the parameters are
/// invalid. Rejected collapses are counted, not reported as errors.
///
/// # Example
///
/// ```
/// use mesh_decimate::{decimate, DecimateParams};
/// use mesh_halfedge::build_topology;
/// use mesh_types::grid_plane;
///
/// let mut surface = build_topology(&grid_plane(8, 8.0, 0.0)).unwrap();
/// let stats = decimate(&mut surface, &DecimateParams::default()).unwrap();
///
/// assert!(stats.was_decimated());
/// assert!(surface.face_count() < 128);
/// assert!(surface.validate().is_valid());
/// ```
pub fn decimate(surface: &mut Surface, params: &DecimateParams) -> DecimateResult<DecimationStats> {
    params.validate()?;

    let initial_faces = surface.face_count();
    if initial_faces == 0 {
        return Ok(DecimationStats::default());
    }

    info!(
        faces = initial_faces,
        iterations = params.iterations,
        max_diff_angle_deg = params.max_diff_angle_deg,
        hedge_min_length = params.hedge_min_length,
        "Starting decimation"
    );

    let mut rng = params.shuffle_seed.map(StdRng::seed_from_u64);
    let mut budget = params.max_collapses;
    let mut stats = DecimationStats {
        initial_faces,
        ..Default::default()
    };

    for iteration in 0..params.iterations {
        if budget == Some(0) {
            break;
        }

        let thresholds = params.thresholds(iteration);
        let sweep = run_sweep(surface, &thresholds, rng.as_mut(), &mut budget);

        if sweep.collapses > 0 {
            clean_up(surface, params);
        }

        debug!(
            iteration,
            collapses = sweep.collapses,
            rejected = sweep.rejected.total(),
            faces = surface.face_count(),
            "Sweep complete"
        );

        stats.rejected.add(&sweep.rejected);
        stats.collapses_per_iteration.push(sweep.collapses);
        stats.boundary_collapses += sweep.boundary_collapses;
        if sweep.collapses == 0 {
            break;
        }
    }

    stats.hit_collapse_cap = budget == Some(0);
    stats.final_faces = surface.face_count();

    info!(%stats, "Decimation complete");

    Ok(stats)
}

#[derive(Debug, Default)]
struct SweepOutcome {
    collapses: usize,
    boundary_collapses: usize,
    rejected: RejectionCounts,
}

fn run_sweep(
    surface: &mut Surface,
    thresholds: &Thresholds,
    rng: Option<&mut StdRng>,
    budget: &mut Option<usize>,
) -> SweepOutcome {
    let order = candidate_order(surface, rng);
    let mut index = SweepIndex::build(surface);
    let mut consumed = vec![false; surface.half_edges().len()];
    let mut outcome = SweepOutcome::default();

    for e in order {
        if *budget == Some(0) {
            break;
        }
        if consumed[e.index()] || surface[e].twin.is_some_and(|t| consumed[t.index()]) {
            continue;
        }

        let verdict = Evaluator {
            surface,
            index: &index,
            thresholds,
        }
        .evaluate(e);

        match verdict {
            Ok(collapse) => {
                trace!(
                    edge = %collapse.edge,
                    doomed = %collapse.doomed,
                    survivor = %collapse.survivor,
                    class = ?collapse.class,
                    "Collapsing edge"
                );
                apply(surface, &mut index, &mut consumed, &collapse);
                outcome.collapses += 1;
                if collapse.class == EdgeClass::Boundary {
                    outcome.boundary_collapses += 1;
                }
                if let Some(remaining) = budget.as_mut() {
                    *remaining -= 1;
                }
            }
            Err(Declined::Reject(reason)) => reason.record(&mut outcome.rejected),
            Err(Declined::Skip) => {}
        }
    }

    outcome
}

/// Live half-edges ordered by length, ties broken by the optional shuffle.
fn candidate_order(surface: &Surface, rng: Option<&mut StdRng>) -> Vec<HalfEdgeId> {
    let mut edges: Vec<HalfEdgeId> = surface.live_half_edges().map(|(e, _)| e).collect();
    if let Some(rng) = rng {
        edges.shuffle(rng);
    }

    let mut keyed: Vec<(f64, HalfEdgeId)> = edges
        .into_iter()
        .map(|e| (surface.half_edge_length_sq(e), e))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, e)| e).collect()
}

fn clean_up(surface: &mut Surface, params: &DecimateParams) {
    let collapsed = remove_collapsed_faces(surface);
    surface.repair_twins(TwinMatch::Position { tolerance: 0.0 });
    let unreferenced = remove_unreferenced_vertices(surface);
    let welded = weld_vertices(
        surface,
        &WeldParams::default().with_tolerance(params.weld_tolerance),
    );
    surface.compact();
    surface.recompute_face_normals();

    debug!(collapsed, unreferenced, welded, "Cleaned up after sweep");
}
