//! Collision geometry and narrow-phase algorithms
//!
//! # Module Organization
//!
//! - [`primitives`] - AABB and OBB value types
//! - [`shape`] - Closed shape enum and static pair dispatch
//! - [`sat`] - Separating Axis Theorem tests per shape pair
//! - [`sweep`] - Substep (continuous) tests for fast movers
//! - [`penetration`] - Minimum translation vector for push-out

pub mod primitives;
pub mod shape;
pub mod sat;
pub mod sweep;
pub mod penetration;

// Re-export commonly used types
pub use primitives::{Aabb, Obb};
pub use shape::{ColliderShape, ShapeKind};
pub use sweep::{SweepHit, SweepSettings, SweptShape};
pub use penetration::{minimum_translation, penetration, Penetration};
