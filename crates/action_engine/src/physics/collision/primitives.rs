//! Primitive collision volumes
//!
//! Plain value types rebuilt from the owner's transform every frame. Neither
//! type has a lifecycle of its own.

use crate::foundation::math::{Mat3, Transform, Vec3};

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two corners (reordered component-wise so `min <= max`)
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Create a box from its center and half extents
    pub fn from_center_half_size(center: Vec3, half_size: Vec3) -> Self {
        let half_size = half_size.abs();
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half extents along the world axes
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Same box moved so its center sits at `center`
    pub fn recentered(&self, center: Vec3) -> Self {
        Self::from_center_half_size(center, self.half_size())
    }

    /// Grow the box by `amount` on every side
    pub fn expanded(&self, amount: Vec3) -> Self {
        let amount = amount.abs();
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    /// Whether `other` lies entirely inside this box (shared faces count)
    pub fn contains(&self, other: &Aabb) -> bool {
        (0..3).all(|i| self.min[i] <= other.min[i] && other.max[i] <= self.max[i])
    }
}

/// Oriented bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    /// Center point
    pub center: Vec3,
    /// Orientation; column `i` is the box's local axis `i` in world space
    pub rotation: Mat3,
    /// Half extents along the local axes
    pub half_size: Vec3,
}

impl Obb {
    /// Create an oriented box
    pub fn new(center: Vec3, rotation: Mat3, half_size: Vec3) -> Self {
        Self {
            center,
            rotation,
            half_size: half_size.abs(),
        }
    }

    /// Create an axis-aligned oriented box (identity rotation)
    pub fn axis_aligned(center: Vec3, half_size: Vec3) -> Self {
        Self::new(center, Mat3::identity(), half_size)
    }

    /// Build from a transform: local half extents are scaled and rotated by it
    pub fn from_transform(transform: &Transform, half_extents: Vec3) -> Self {
        Self::new(
            transform.position,
            transform.rotation_matrix(),
            transform.scale.component_mul(&half_extents),
        )
    }

    /// Local axis `index` (0..3) in world space
    pub fn axis(&self, index: usize) -> Vec3 {
        self.rotation.column(index).into_owned()
    }

    /// All three local axes in world space
    pub fn axes(&self) -> [Vec3; 3] {
        [self.axis(0), self.axis(1), self.axis(2)]
    }

    /// Projection radius of the box onto `axis`
    ///
    /// Sum over the local axes of `|axis . (local_axis_i * half_size_i)|`.
    pub fn projected_radius(&self, axis: &Vec3) -> f32 {
        (0..3)
            .map(|i| axis.dot(&(self.axis(i) * self.half_size[i])).abs())
            .sum()
    }

    /// Smallest world-axis-aligned box enclosing this one
    pub fn world_aabb(&self) -> Aabb {
        let extent = Vec3::new(
            self.projected_radius(&Vec3::x()),
            self.projected_radius(&Vec3::y()),
            self.projected_radius(&Vec3::z()),
        );
        Aabb::from_center_half_size(self.center, extent)
    }

    /// Same box moved so its center sits at `center`
    pub fn recentered(&self, center: Vec3) -> Self {
        Self { center, ..*self }
    }
}

impl From<Aabb> for Obb {
    fn from(aabb: Aabb) -> Self {
        Obb::axis_aligned(aabb.center(), aabb.half_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants::QUARTER_PI, Quat};
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_new_orders_corners() {
        let aabb = Aabb::new(Vec3::new(1.0, -1.0, 3.0), Vec3::new(-1.0, 2.0, 0.0));

        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(aabb.center(), Vec3::new(0.0, 0.5, 1.5));
        assert_relative_eq!(aabb.half_size(), Vec3::new(1.0, 1.5, 1.5));
    }

    #[test]
    fn test_aabb_contains_itself() {
        let aabb = Aabb::from_center_half_size(Vec3::new(2.0, 0.0, 0.0), Vec3::repeat(0.5));
        assert!(aabb.contains(&aabb));
        assert!(aabb.expanded(Vec3::repeat(0.1)).contains(&aabb));
        assert!(!aabb.contains(&aabb.expanded(Vec3::repeat(0.1))));
    }

    #[test]
    fn test_obb_world_aabb_of_rotated_cube() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), QUARTER_PI);
        let transform = Transform::from_position_rotation(Vec3::zeros(), rotation);
        let obb = Obb::from_transform(&transform, Vec3::repeat(1.0));
        let bounds = obb.world_aabb();

        // A unit-half cube rotated 45 degrees about Y reaches sqrt(2) along X and Z
        let diagonal = 2.0_f32.sqrt();
        assert_relative_eq!(bounds.half_size(), Vec3::new(diagonal, 1.0, diagonal), epsilon = 1e-5);
    }

    #[test]
    fn test_obb_from_transform_scales_half_extents() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(Vec3::new(2.0, 3.0, 4.0));
        let obb = Obb::from_transform(&transform, Vec3::repeat(0.5));

        assert_eq!(obb.center, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(obb.half_size, Vec3::new(1.0, 1.5, 2.0));
        assert_relative_eq!(obb.axis(2), Vec3::z());
    }
}
