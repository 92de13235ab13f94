//! Minimum translation vector extraction
//!
//! Runs the 15-axis box SAT without early exit and keeps the axis of least
//! overlap. Used by gameplay push-out ("stand on the obstacle, don't sink
//! into it"), not by the contact lifecycle.

use super::primitives::Obb;
use super::sat::{normalized_axis, obb_pair_axes, overlap_on_axis};
use crate::foundation::math::Vec3;

/// Least-overlap separation between two overlapping boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit axis of least overlap, oriented from A's center toward B's center
    pub axis: Vec3,
    /// Overlap along `axis`
    pub depth: f32,
}

impl Penetration {
    /// Translation that moves A just clear of B
    pub fn push_for_a(&self) -> Vec3 {
        -self.axis * self.depth
    }

    /// Translation that moves B just clear of A
    pub fn push_for_b(&self) -> Vec3 {
        self.axis * self.depth
    }
}

/// Compute the least-overlap axis for a box pair
///
/// Returns `None` when the boxes are separated or only touching, i.e. when
/// there is nothing to push out.
pub fn penetration(a: &Obb, b: &Obb, epsilon: f32) -> Option<Penetration> {
    let offset = b.center - a.center;
    let mut best: Option<Penetration> = None;

    for candidate in obb_pair_axes(a, b) {
        let Some(axis) = normalized_axis(&candidate, epsilon) else {
            continue;
        };

        let depth = overlap_on_axis(a, b, &axis);
        if depth <= 0.0 {
            return None;
        }

        if best.map_or(true, |current| depth < current.depth) {
            let axis = if axis.dot(&offset) < 0.0 { -axis } else { axis };
            best = Some(Penetration { axis, depth });
        }
    }

    best
}

/// Translation to apply to A so it no longer overlaps B
pub fn minimum_translation(a: &Obb, b: &Obb, epsilon: f32) -> Option<Vec3> {
    penetration(a, b, epsilon).map(|p| p.push_for_a())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform};
    use crate::physics::collision::sat::{obb_vs_obb, DEFAULT_AXIS_EPSILON};
    use approx::assert_relative_eq;

    #[test]
    fn test_mtv_pushes_a_away_from_b() {
        let a = Obb::axis_aligned(Vec3::zeros(), Vec3::repeat(1.0));
        let b = Obb::axis_aligned(Vec3::new(1.5, 0.2, 0.0), Vec3::repeat(1.0));

        let mtv = minimum_translation(&a, &b, DEFAULT_AXIS_EPSILON).unwrap();
        assert!(mtv.x < 0.0);
        assert_relative_eq!(mtv, Vec3::new(-0.5, 0.0, 0.0), epsilon = 1e-5);

        // Applying it leaves the pair exactly touching
        let moved = a.recentered(a.center + mtv);
        assert!(penetration(&moved, &b, DEFAULT_AXIS_EPSILON).is_none());
        assert!(obb_vs_obb(&moved, &b, DEFAULT_AXIS_EPSILON));
    }

    #[test]
    fn test_mtv_picks_vertical_axis_for_shallow_landing() {
        let platform = Obb::axis_aligned(Vec3::zeros(), Vec3::new(4.0, 0.5, 4.0));
        let character = Obb::axis_aligned(Vec3::new(0.3, 1.4, -0.2), Vec3::new(0.5, 1.0, 0.5));

        let hit = penetration(&character, &platform, DEFAULT_AXIS_EPSILON).unwrap();
        let push = hit.push_for_a();
        assert_relative_eq!(hit.depth, 0.1, epsilon = 1e-5);
        assert_relative_eq!(push, Vec3::new(0.0, 0.1, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_separated_boxes_have_no_mtv() {
        let a = Obb::axis_aligned(Vec3::zeros(), Vec3::repeat(1.0));
        let b = Obb::axis_aligned(Vec3::new(0.0, 0.0, 3.0), Vec3::repeat(1.0));
        assert!(penetration(&a, &b, DEFAULT_AXIS_EPSILON).is_none());
    }

    #[test]
    fn test_mtv_on_rotated_obstacle_separates_pair() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 0.5);
        let obstacle = Obb::from_transform(
            &Transform::from_position_rotation(Vec3::new(1.2, 0.0, 0.3), rotation),
            Vec3::new(1.0, 1.0, 0.5),
        );
        let mover = Obb::axis_aligned(Vec3::zeros(), Vec3::repeat(0.5));
        assert!(obb_vs_obb(&mover, &obstacle, DEFAULT_AXIS_EPSILON));

        let hit = penetration(&mover, &obstacle, DEFAULT_AXIS_EPSILON).unwrap();
        assert!(hit.axis.dot(&(obstacle.center - mover.center)) >= 0.0);

        // Nudge slightly past the MTV to step off the shared face
        let cleared = mover.recentered(mover.center + hit.push_for_a() * 1.01);
        assert!(!obb_vs_obb(&cleared, &obstacle, DEFAULT_AXIS_EPSILON));
    }
}
