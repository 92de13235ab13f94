//! Separating Axis Theorem narrow-phase tests
//!
//! Two convex volumes are disjoint iff some axis exists onto which their
//! projections do not overlap. Each test below enumerates the candidate axes
//! for its shape pair and exits on the first separating one.
//!
//! Degenerate candidate axes (near-zero length, e.g. the cross product of two
//! parallel edges) carry no information and are skipped, never treated as
//! separating. Bounds are inclusive: touching faces count as overlap.

use super::primitives::{Aabb, Obb};
use crate::foundation::math::Vec3;

/// Default squared-length threshold for degenerate axes
pub const DEFAULT_AXIS_EPSILON: f32 = 1e-6;

/// Normalize a candidate axis, or `None` if it is too short to be informative
pub(crate) fn normalized_axis(axis: &Vec3, epsilon: f32) -> Option<Vec3> {
    let length_squared = axis.norm_squared();
    if length_squared <= epsilon || !length_squared.is_finite() {
        return None;
    }
    Some(axis / length_squared.sqrt())
}

/// The 15 candidate axes for a box pair: 3 + 3 face normals, 9 edge cross products
pub(crate) fn obb_pair_axes(a: &Obb, b: &Obb) -> [Vec3; 15] {
    let axes_a = a.axes();
    let axes_b = b.axes();
    let mut axes = [Vec3::zeros(); 15];

    axes[..3].copy_from_slice(&axes_a);
    axes[3..6].copy_from_slice(&axes_b);
    for (i, axis_a) in axes_a.iter().enumerate() {
        for (j, axis_b) in axes_b.iter().enumerate() {
            axes[6 + i * 3 + j] = axis_a.cross(axis_b);
        }
    }
    axes
}

/// Signed overlap of the two projections on a unit axis; negative means separated
pub(crate) fn overlap_on_axis(a: &Obb, b: &Obb, axis: &Vec3) -> f32 {
    let distance = (b.center - a.center).dot(axis).abs();
    a.projected_radius(axis) + b.projected_radius(axis) - distance
}

fn separated_on_any(a: &Obb, b: &Obb, axes: &[Vec3], epsilon: f32) -> bool {
    axes.iter()
        .filter_map(|axis| normalized_axis(axis, epsilon))
        .any(|axis| overlap_on_axis(a, b, &axis) < 0.0)
}

/// World-axis interval overlap of two AABBs
pub fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> bool {
    (0..3).all(|i| a.min[i] <= b.max[i] && b.min[i] <= a.max[i])
}

/// Full 15-axis SAT between two oriented boxes
pub fn obb_vs_obb(a: &Obb, b: &Obb, epsilon: f32) -> bool {
    !separated_on_any(a, b, &obb_pair_axes(a, b), epsilon)
}

/// Mixed SAT: the 3 world axes (the AABB's face normals) plus the 3 OBB axes
///
/// Edge-edge axes are not tested, so a box pair that is only separated along
/// an edge cross product is reported as touching. Callers treat this as a
/// conservative hit.
pub fn aabb_vs_obb(a: &Aabb, b: &Obb, epsilon: f32) -> bool {
    let a = Obb::from(*a);
    let axes = b.axes();
    let candidates = [Vec3::x(), Vec3::y(), Vec3::z(), axes[0], axes[1], axes[2]];
    !separated_on_any(&a, b, &candidates, epsilon)
}
