//! Texture atlas repacking for half-edge surfaces.
//!
//! After simplification a tile typically samples only scattered parts of
//! its source texture. This crate cuts those parts out and packs them into
//! a new, smaller atlas, rewriting texture coordinates to match.
//!
//! # Features
//!
//! - **Face grouping**: Faces sharing vertices move together; groups whose
//!   texture regions touch are merged
//! - **Guillotine packing**: Growing atlas that never rejects a rectangle
//! - **Border expansion**: Padding filled with repeated edge pixels
//! - **UV remap**: Coordinates moved with their region and clamped inside it
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
//! use image::RgbaImage;
//! use mesh_atlas::{pack_texture_atlas, AtlasParams};
//! use mesh_halfedge::build_topology;
//! use mesh_types::grid_plane;
//!
//! let mut surface = build_topology(&grid_plane(4, 4.0, 0.0)).unwrap();
//! let source = RgbaImage::new(256, 256);
//!
//! let atlas = pack_texture_atlas(&mut surface, &source, &AtlasParams::tight()).unwrap();
//! println!("{atlas}");
//! assert_eq!(atlas.rects.len(), 1);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod atlas;
mod error;
mod group;
mod packer;
mod params;
mod rect;
mod union_find;

pub use atlas::{PackedAtlas, TextureScissorRect, pack_texture_atlas};
pub use error::{AtlasError, AtlasResult};
pub use packer::GuillotinePacker;
pub use params::AtlasParams;
pub use rect::PixelRect;
