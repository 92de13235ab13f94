//! Debug and diagnostic utilities
//!
//! Advisory only: nothing here affects collision results.

pub mod collision_debug;

pub use collision_debug::CollisionStats;
