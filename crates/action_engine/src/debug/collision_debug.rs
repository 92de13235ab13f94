//! Collision-specific diagnostics
//!
//! Counters an on-screen overlay or a periodic log line can show: how many
//! colliders are registered, of which kind, and how many pairs are touching.

use std::fmt;

/// Snapshot of the collision world's registry and contact state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Registered colliders
    pub collider_count: usize,

    /// Pairs touching after the last pass
    pub touching_pairs: usize,

    /// Registered axis-aligned box colliders
    pub aabb_count: usize,

    /// Registered oriented box colliders
    pub obb_count: usize,

    /// Colliders with substep testing enabled
    pub swept_count: usize,
}

impl CollisionStats {
    /// Number of unordered pairs the all-pairs broad phase visits
    pub fn broad_phase_pairs(&self) -> usize {
        self.collider_count * self.collider_count.saturating_sub(1) / 2
    }
}

impl fmt::Display for CollisionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "colliders: {} (AABB {}, OBB {}, swept {}) | touching pairs: {} | broad-phase pairs: {}",
            self.collider_count,
            self.aabb_count,
            self.obb_count,
            self.swept_count,
            self.touching_pairs,
            self.broad_phase_pairs()
        )
    }
}
