//! Stage: the top-level owner of game objects and their collision world
//!
//! The stage ties object lifetimes to collider registration (attaching a
//! collider registers it, despawning an object unregisters all of its
//! colliders) and enforces the per-frame ordering:
//!
//! ```text
//! begin_frame()      record sweep start points, clear grounded flags
//! ...gameplay moves objects...
//! end_frame()        collision pass, then apply deferred commands
//! ```

use slotmap::SlotMap;

use super::game_object::{GameObject, GameObjectKey};
use crate::config::CollisionConfig;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::collision::minimum_translation;
use crate::physics::{Collider, ColliderHandle, CollisionWorld, DeferredCommand};

/// Scene operation errors
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// No game object with this key
    #[error("Unknown game object: {0:?}")]
    UnknownObject(GameObjectKey),

    /// No registered collider with this handle
    #[error("Unknown collider: {0:?}")]
    UnknownCollider(ColliderHandle),

    /// The collider is registered but has no owning object
    #[error("Collider {0:?} has no owner")]
    NoOwner(ColliderHandle),

    /// The collider exists but belongs to another object (or none)
    #[error("Collider {collider:?} is not attached to {object:?}")]
    NotAttached {
        /// Object the caller named
        object: GameObjectKey,
        /// Collider the caller named
        collider: ColliderHandle,
    },
}

/// Game objects plus the collision world that watches them
pub struct Stage {
    objects: SlotMap<GameObjectKey, GameObject>,
    collision: CollisionWorld,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

impl Stage {
    /// Create an empty stage
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            objects: SlotMap::with_key(),
            collision: CollisionWorld::new(config),
        }
    }

    /// Add a game object
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> GameObjectKey {
        self.objects.insert(GameObject::new(name, transform))
    }

    /// Look up a game object
    pub fn object(&self, key: GameObjectKey) -> Option<&GameObject> {
        self.objects.get(key)
    }

    /// Look up a game object mutably (gameplay moves objects through this)
    pub fn object_mut(&mut self, key: GameObjectKey) -> Option<&mut GameObject> {
        self.objects.get_mut(key)
    }

    /// All game objects
    pub fn objects(&self) -> impl Iterator<Item = (GameObjectKey, &GameObject)> {
        self.objects.iter()
    }

    /// The collision world
    pub fn collision(&self) -> &CollisionWorld {
        &self.collision
    }

    /// The collision world, mutably (e.g. to swap callbacks)
    pub fn collision_mut(&mut self) -> &mut CollisionWorld {
        &mut self.collision
    }

    /// Attach a collider to an object and register it
    ///
    /// The shape is built from the object's current transform and the sweep
    /// start point is set to its current position, so the first frame does not
    /// see a phantom displacement.
    pub fn attach_collider(&mut self, key: GameObjectKey, mut collider: Collider) -> Result<ColliderHandle, SceneError> {
        let object = self.objects.get_mut(key).ok_or(SceneError::UnknownObject(key))?;

        collider.set_owner(Some(key));
        collider.update(&object.transform);
        collider.set_previous_position(object.transform.position);

        let handle = self.collision.register(collider);
        object.push_collider(handle);
        log::debug!("Attached collider {:?} to '{}'", handle, object.name);
        Ok(handle)
    }

    /// Detach a collider from its object and unregister it
    pub fn detach_collider(&mut self, key: GameObjectKey, handle: ColliderHandle) -> Result<Collider, SceneError> {
        let object = self.objects.get_mut(key).ok_or(SceneError::UnknownObject(key))?;
        if !object.remove_collider(handle) {
            return Err(SceneError::NotAttached { object: key, collider: handle });
        }
        self.collision.unregister(handle).ok_or(SceneError::UnknownCollider(handle))
    }

    /// Remove an object and unregister every collider it owns
    pub fn despawn(&mut self, key: GameObjectKey) -> Result<GameObject, SceneError> {
        let mut object = self.objects.remove(key).ok_or(SceneError::UnknownObject(key))?;
        for handle in object.take_colliders() {
            self.collision.unregister(handle);
        }
        log::debug!("Despawned '{}'", object.name);
        Ok(object)
    }

    /// Activate or deactivate an object; inactive objects are skipped by collision
    pub fn set_active(&mut self, key: GameObjectKey, active: bool) -> Result<(), SceneError> {
        let object = self.objects.get_mut(key).ok_or(SceneError::UnknownObject(key))?;
        object.active = active;
        Ok(())
    }

    /// Start of frame: record sweep start points and clear grounded flags
    ///
    /// Must run before any transform is mutated this frame.
    pub fn begin_frame(&mut self) {
        for object in self.objects.values_mut() {
            object.grounded = false;
        }
        self.collision.update_previous_positions(&self.objects);
    }

    /// End of frame: run the collision pass, then apply what callbacks queued
    ///
    /// Returns the number of deferred commands applied. Commands naming
    /// objects or colliders that are already gone are skipped.
    pub fn end_frame(&mut self) -> usize {
        let commands = self.collision.check_collisions(&self.objects);
        let mut applied = 0;
        for command in commands {
            match self.apply(command) {
                Ok(()) => applied += 1,
                Err(error) => log::trace!("Skipping deferred {:?}: {}", command, error),
            }
        }
        applied
    }

    fn apply(&mut self, command: DeferredCommand) -> Result<(), SceneError> {
        match command {
            DeferredCommand::RemoveCollider(handle) => {
                let owner = self
                    .collision
                    .get(handle)
                    .ok_or(SceneError::UnknownCollider(handle))?
                    .owner();
                if let Some(object) = owner.and_then(|key| self.objects.get_mut(key)) {
                    object.remove_collider(handle);
                }
                self.collision.unregister(handle);
                Ok(())
            }
            DeferredCommand::Deactivate(key) => self.set_active(key, false),
            DeferredCommand::Despawn(key) => self.despawn(key).map(|_| ()),
            DeferredCommand::PushOut { collider, obstacle } => {
                self.resolve_penetration(collider, obstacle).map(|_| ())
            }
        }
    }

    /// Push `collider`'s owner out of `obstacle` along the minimum translation vector
    ///
    /// Both shapes are treated as oriented boxes. If the push has an upward
    /// component above the configured threshold the owner is marked grounded.
    /// Returns the applied translation, or `None` if the pair was not
    /// penetrating.
    pub fn resolve_penetration(
        &mut self,
        collider: ColliderHandle,
        obstacle: ColliderHandle,
    ) -> Result<Option<Vec3>, SceneError> {
        let mover = self.collision.get(collider).ok_or(SceneError::UnknownCollider(collider))?;
        let blocker = self.collision.get(obstacle).ok_or(SceneError::UnknownCollider(obstacle))?;
        let owner = mover.owner().ok_or(SceneError::NoOwner(collider))?;

        let config = self.collision.config();
        let Some(push) = minimum_translation(&mover.shape().to_obb(), &blocker.shape().to_obb(), config.axis_epsilon)
        else {
            return Ok(None);
        };
        let grounded = push.y > config.grounded_threshold;

        let object = self.objects.get_mut(owner).ok_or(SceneError::UnknownObject(owner))?;
        object.transform.position += push;
        object.grounded |= grounded;

        let transform = object.transform;
        for &handle in object.colliders() {
            if let Some(attached) = self.collision.get_mut(handle) {
                attached.update(&transform);
            }
        }

        log::trace!("Pushed '{}' by {:?} (grounded: {})", object.name, push, grounded);
        Ok(Some(push))
    }
}
