//! Closed set of collider shapes
//!
//! Every pairwise operation matches exhaustively on [`ColliderShape`], so a
//! new shape kind does not compile until each pair combination is handled.

use std::fmt;

use super::primitives::{Aabb, Obb};
use super::sat::{aabb_vs_aabb, aabb_vs_obb, obb_vs_obb};
use crate::foundation::math::Vec3;

/// Shape discriminant used for dispatch and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Axis-aligned box
    Aabb,
    /// Oriented box
    Obb,
}

impl ShapeKind {
    /// Display name for overlays and logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aabb => "AABB",
            Self::Obb => "OBB",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// World-space collider shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box
    Aabb(Aabb),
    /// Oriented box
    Obb(Obb),
}

impl ColliderShape {
    /// Discriminant of this shape
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Aabb(_) => ShapeKind::Aabb,
            Self::Obb(_) => ShapeKind::Obb,
        }
    }

    /// Center position
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Aabb(aabb) => aabb.center(),
            Self::Obb(obb) => obb.center,
        }
    }

    /// Half extents (world axes for AABB, local axes for OBB)
    pub fn half_size(&self) -> Vec3 {
        match self {
            Self::Aabb(aabb) => aabb.half_size(),
            Self::Obb(obb) => obb.half_size,
        }
    }

    /// Same shape moved so its center sits at `center`
    pub fn recentered(&self, center: Vec3) -> Self {
        match self {
            Self::Aabb(aabb) => Self::Aabb(aabb.recentered(center)),
            Self::Obb(obb) => Self::Obb(obb.recentered(center)),
        }
    }

    /// The shape as an oriented box (an AABB becomes an identity-rotation OBB)
    pub fn to_obb(&self) -> Obb {
        match self {
            Self::Aabb(aabb) => Obb::from(*aabb),
            Self::Obb(obb) => *obb,
        }
    }

    /// Static overlap test at the current poses
    ///
    /// The mixed pair always runs with the AABB as the first operand.
    pub fn intersects(&self, other: &ColliderShape, epsilon: f32) -> bool {
        match (self, other) {
            (Self::Aabb(a), Self::Aabb(b)) => aabb_vs_aabb(a, b),
            (Self::Obb(a), Self::Obb(b)) => obb_vs_obb(a, b, epsilon),
            (Self::Aabb(aabb), Self::Obb(obb)) | (Self::Obb(obb), Self::Aabb(aabb)) => {
                aabb_vs_obb(aabb, obb, epsilon)
            }
        }
    }
}
