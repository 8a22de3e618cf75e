//! Quality-gated edge-collapse decimation for half-edge surfaces.
//!
//! Decimation runs in sweeps. Each sweep visits half-edges shortest first
//! and collapses the ones whose collapse keeps the surface manifold, keeps
//! tile borders straight and keeps every surviving triangle close to its
//! original orientation and shape. A cleanup between sweeps removes the
//! faces that vanished and welds what came together.
//!
//! # Features
//!
//! - **Shortest-edge-first**: Length-ordered sweeps with optional seeded tie shuffling
//! - **Border preservation**: Frontier edges slide only along their own line
//! - **Skirt awareness**: Skirt faces follow the border and get a tighter angle limit
//! - **Quality gates**: Normal deviation, aspect ratio and collapsed-area checks
//! - **Per-sweep schedules**: Override thresholds for individual iterations
//! - **Collapse cap**: Stop after a fixed number of collapses
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Other game engines
//!
//! # Example
//!
//! ```
//! use mesh_decimate::{decimate, DecimateParams, IterationOverride};
//! use mesh_halfedge::build_topology;
//! use mesh_types::grid_plane;
//!
//! let mut surface = build_topology(&grid_plane(16, 16.0, 0.0)).unwrap();
//!
//! // Loosen the normal limit from the third sweep on
//! let params = DecimateParams::default()
//!     .with_override(IterationOverride::new(2).with_max_diff_angle_deg(20.0));
//!
//! let stats = decimate(&mut surface, &params).unwrap();
//! println!("{stats}");
//! assert!(stats.final_faces < stats.initial_faces);
//! ```
//!
//! # Algorithm
//!
//! A half-edge collapse moves its origin, together with every vertex at the
//! same position, onto its end. A candidate is accepted when:
//!
//! 1. The endpoints share no more neighbours than the faces that vanish
//!    (two for interior edges, one for frontier edges)
//! 2. Frontier edges around the moved vertex keep their direction
//! 3. No surviving face collapses to zero area, turns too far, or becomes a sliver
//!
//! Edges shorter than `hedge_min_length` skip the angle and shape gates;
//! edges shorter than `small_hedge_size` get a proportionally looser angle.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod collapse;
mod decimate;
mod error;
mod params;
mod result;

pub use decimate::decimate;
pub use error::{DecimateError, DecimateResult};
pub use params::{DecimateParams, IterationOverride, Thresholds};
pub use result::{DecimationStats, RejectionCounts};
