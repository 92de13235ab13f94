//! Scene module: game objects and the stage that owns them
//!
//! The collision core only sees game objects through [`TransformSource`];
//! [`Stage`] is the concrete owner used by games and tests.

pub mod game_object;
pub mod stage;

pub use game_object::{GameObject, GameObjectKey, TransformSource};
pub use stage::{SceneError, Stage};
