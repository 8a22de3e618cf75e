//! Element ids and the records stored in the surface arenas.

use mesh_types::{Axis, Point3, Vector3, VertexAttributes};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Position of the element in its arena.
            #[inline]
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Id for an arena position.
            ///
            /// Arenas never exceed `u32::MAX` slots; the builder rejects
            /// larger meshes up front.
            #[inline]
            #[must_use]
            #[allow(clippy::cast_possible_truncation)]
            pub const fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

element_id!(
    /// Stable id of a vertex slot.
    VertexId
);
element_id!(
    /// Stable id of a half-edge slot.
    HalfEdgeId
);
element_id!(
    /// Stable id of a face slot.
    FaceId
);

/// Liveness of an arena slot.
///
/// Editing operations tombstone elements; only
/// [`Surface::compact`](crate::Surface::compact) removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    /// Element is part of the surface.
    #[default]
    Live,
    /// Element is tombstoned and awaits compaction.
    Deleted,
}

impl Status {
    /// True for [`Status::Live`].
    #[inline]
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Whether a face is part of the model or a generated skirt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaceKind {
    /// Model geometry.
    #[default]
    Normal,
    /// Vertical curtain hiding cracks between neighbouring tiles.
    Skirt,
}

/// Classification id meaning "not on any tile boundary".
pub const UNCLASSIFIED: u32 = 0;

/// Side of a tile a frontier edge lies on.
///
/// Stored on vertices, half-edges and faces as a plain classification id
/// (see [`BoundaryClass::id`]); `0` means unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoundaryClass {
    /// Minimum Y side.
    South,
    /// Maximum X side.
    East,
    /// Maximum Y side.
    North,
    /// Minimum X side.
    West,
}

impl BoundaryClass {
    /// All four sides in id order.
    pub const ALL: [Self; 4] = [Self::South, Self::East, Self::North, Self::West];

    /// Classification id of this side (`1..=4`).
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::South => 1,
            Self::East => 2,
            Self::North => 3,
            Self::West => 4,
        }
    }

    /// Side for a classification id, `None` for unclassified or unknown ids.
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::South),
            2 => Some(Self::East),
            3 => Some(Self::North),
            4 => Some(Self::West),
            _ => None,
        }
    }

    /// Axis perpendicular to this side.
    ///
    /// South and North sides are planes of constant Y, East and West sides
    /// planes of constant X.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::South | Self::North => Axis::Y,
            Self::East | Self::West => Axis::X,
        }
    }

    /// True for the sides at the minimum coordinate (South, West).
    #[must_use]
    pub const fn is_min_side(self) -> bool {
        matches!(self, Self::South | Self::West)
    }
}

/// A vertex record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeVertex {
    /// Position.
    pub position: Point3<f64>,
    /// Normal, texture coordinate, color, batch id.
    pub attributes: VertexAttributes,
    /// One live half-edge starting here, if any.
    pub outgoing: Option<HalfEdgeId>,
    /// Classification id ([`UNCLASSIFIED`] or a [`BoundaryClass`] id).
    pub class_id: u32,
    /// Liveness.
    pub status: Status,
}

impl HeVertex {
    /// Live, unclassified vertex without outgoing half-edge.
    #[must_use]
    pub const fn new(position: Point3<f64>, attributes: VertexAttributes) -> Self {
        Self {
            position,
            attributes,
            outgoing: None,
            class_id: UNCLASSIFIED,
            status: Status::Live,
        }
    }

    /// True when the vertex is live.
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.status.is_live()
    }
}

/// A directed edge of one triangle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HalfEdge {
    /// Start vertex.
    pub origin: VertexId,
    /// Next half-edge of the face cycle.
    pub next: HalfEdgeId,
    /// Oppositely directed half-edge of the neighbouring face.
    pub twin: Option<HalfEdgeId>,
    /// Owning face.
    pub face: FaceId,
    /// Classification id.
    pub class_id: u32,
    /// Liveness.
    pub status: Status,
}

impl HalfEdge {
    /// True when the half-edge is live.
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// A live half-edge without twin lies on the surface frontier.
    #[inline]
    #[must_use]
    pub const fn is_frontier(&self) -> bool {
        self.twin.is_none()
    }
}

/// A triangle record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    /// One half-edge of the face cycle.
    pub half_edge: HalfEdgeId,
    /// Model or skirt face.
    pub kind: FaceKind,
    /// Classification id.
    pub class_id: u32,
    /// Liveness.
    pub status: Status,
    /// Cached unit plane normal.
    pub normal: Vector3<f64>,
}

impl Face {
    /// True when the face is live.
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.status.is_live()
    }
}
