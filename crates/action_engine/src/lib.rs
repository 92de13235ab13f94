//! # Action Engine
//!
//! Collision core of a real-time 3D action game.
//!
//! ## Features
//!
//! - **Box Colliders**: AABB and OBB colliders rebuilt from their owner's transform every frame
//! - **SAT Narrow Phase**: interval, 15-axis and mixed separating-axis tests
//! - **Continuous Collision**: substep sweeps so fast projectiles cannot tunnel
//! - **Contact Lifecycle**: enter / stay / exit callbacks with a deferred command queue
//! - **Push-out**: minimum translation vector and grounding detection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use action_engine::prelude::*;
//!
//! let mut stage = Stage::default();
//! let wall = stage.spawn("wall", Transform::from_position(Vec3::new(2.5, 0.0, 0.0)));
//! let bullet = stage.spawn("bullet", Transform::identity());
//!
//! stage.attach_collider(wall, Collider::obb(Vec3::new(0.1, 2.0, 2.0))).unwrap();
//! stage
//!     .attach_collider(
//!         bullet,
//!         Collider::aabb(Vec3::repeat(0.1))
//!             .with_sweep(true)
//!             .on_enter(move |_contact, commands| commands.deactivate(bullet)),
//!     )
//!     .unwrap();
//!
//! stage.begin_frame();
//! stage.object_mut(bullet).unwrap().transform.position.x = 5.0;
//! stage.end_frame();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod physics;
pub mod scene;
pub mod debug;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        debug::CollisionStats,
        foundation::math::{Quat, Transform, Vec3},
        physics::{
            Aabb, Collider, ColliderHandle, ColliderShape, CollisionCommands, CollisionLayers,
            CollisionWorld, Contact, Obb, ShapeKind,
        },
        scene::{GameObject, GameObjectKey, SceneError, Stage, TransformSource},
    };
}
