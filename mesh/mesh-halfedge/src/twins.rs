//! Twin pairing.
//!
//! Two half-edges are twinable when one's start matches the other's end and
//! vice versa. "Matches" is either vertex identity or membership in the same
//! welded position group (see [`TwinMatch`]). Every half-edge pairs at most
//! once; whatever stays unpaired is frontier.

use hashbrown::HashMap;
use tracing::debug;

use crate::element::{HalfEdgeId, VertexId};
use crate::position::{PositionIndex, TwinMatch};
use crate::surface::Surface;

impl Surface {
    /// Clear every twin reference and pair all live half-edges from scratch.
    ///
    /// Returns the number of twin pairs formed.
    pub fn link_twins(&mut self, matching: TwinMatch) -> usize {
        for e in &mut self.half_edges {
            e.twin = None;
        }
        let groups = self.endpoint_groups(matching);
        let paired = self.pair_open_half_edges(&groups);
        debug!(
            pairs = paired,
            frontier = self.frontier_count(),
            "Linked twins"
        );
        paired
    }

    /// Keep twin pairs that are still valid, drop stale ones, and pair the
    /// leftovers.
    ///
    /// A pair is stale when either side is dead, the back-reference is
    /// missing, or the endpoints no longer match under `matching`. This is
    /// the cheap way to restore twins after local rewrites that move
    /// half-edge origins.
    ///
    /// Returns the number of new twin pairs formed.
    pub fn repair_twins(&mut self, matching: TwinMatch) -> usize {
        let groups = self.endpoint_groups(matching);

        let stale: Vec<bool> = (0..self.half_edges.len())
            .map(|i| {
                let e = HalfEdgeId::from_index(i);
                let he = &self.half_edges[i];
                let Some(t) = he.twin else {
                    return false;
                };
                if !he.is_live() {
                    return true;
                }
                let Some(partner) = self.half_edges.get(t.index()) else {
                    return true;
                };
                if !partner.is_live() || partner.twin != Some(e) {
                    return true;
                }
                let (a, b) = self.endpoint_key(e, &groups);
                self.endpoint_key(t, &groups) != (b, a)
            })
            .collect();

        let mut dropped = 0usize;
        for (he, is_stale) in self.half_edges.iter_mut().zip(stale) {
            if is_stale {
                he.twin = None;
                dropped += 1;
            }
        }

        let paired = self.pair_open_half_edges(&groups);
        debug!(dropped, pairs = paired, "Repaired twins");
        paired
    }

    /// Group id per vertex slot under the given matching rule.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation is acceptable: surfaces address vertices with u32 ids
    pub(crate) fn endpoint_groups(&self, matching: TwinMatch) -> Vec<u32> {
        match matching {
            TwinMatch::Identity => (0..self.vertices.len() as u32).collect(),
            TwinMatch::Position { tolerance } => {
                let positions: Vec<_> = self.vertices.iter().map(|v| v.position).collect();
                PositionIndex::group(&positions, tolerance)
            }
        }
    }

    fn endpoint_key(&self, e: HalfEdgeId, groups: &[u32]) -> (u32, u32) {
        let group = |v: VertexId| groups.get(v.index()).copied().unwrap_or(v.0);
        (group(self.half_edges[e.index()].origin), group(self.end(e)))
    }

    fn pair_open_half_edges(&mut self, groups: &[u32]) -> usize {
        let mut open: HashMap<(u32, u32), Vec<HalfEdgeId>> = HashMap::new();
        let mut paired = 0;

        for i in 0..self.half_edges.len() {
            let he = &self.half_edges[i];
            if !he.is_live() || he.twin.is_some() {
                continue;
            }
            let e = HalfEdgeId::from_index(i);
            let (a, b) = self.endpoint_key(e, groups);
            if a == b {
                // Zero-length edges never pair
                continue;
            }

            if let Some(t) = open.get_mut(&(b, a)).and_then(Vec::pop) {
                self.half_edges[i].twin = Some(t);
                self.half_edges[t.index()].twin = Some(e);
                paired += 1;
            } else {
                open.entry((a, b)).or_default().push(e);
            }
        }

        paired
    }
}
