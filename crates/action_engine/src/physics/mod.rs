//! Physics module for collision detection and response
//!
//! Provides box colliders, SAT narrow-phase tests, substep sweeps for fast
//! movers, minimum-translation push-out, and the per-frame collision world
//! that turns overlaps into enter/stay/exit notifications.

pub mod collision;
pub mod collider;
pub mod collision_layers;
pub mod collision_system;

pub use collision::{Aabb, ColliderShape, Obb, ShapeKind};
pub use collider::{Collider, ColliderHandle, Contact, ContactCallback};
pub use collision_layers::CollisionLayers;
pub use collision_system::{CollisionCommands, CollisionPair, CollisionWorld, DeferredCommand};
