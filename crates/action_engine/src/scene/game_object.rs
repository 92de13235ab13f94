//! Game objects as seen by the collision core
//!
//! Only the pieces the collision core touches live here: the transform it
//! reads, the flags gameplay reads back, and the handles of attached colliders.

use slotmap::SlotMap;

use crate::foundation::math::Transform;
use crate::physics::collider::ColliderHandle;

slotmap::new_key_type! {
    /// Stable identifier of a game object
    pub struct GameObjectKey;
}

/// Read-only access to owner poses
///
/// This is the whole coupling between colliders and the game-object system:
/// colliders look up their owner's world transform once per update. `None`
/// means "unknown or inactive owner" and makes the collider inert this frame.
pub trait TransformSource {
    /// World transform of `owner`, if it exists and is active
    fn world_transform(&self, owner: GameObjectKey) -> Option<Transform>;
}

/// A scene object that can own colliders
#[derive(Debug, Clone)]
pub struct GameObject {
    /// Display name used in logs
    pub name: String,

    /// World transform
    pub transform: Transform,

    /// Inactive objects are skipped by collision detection
    pub active: bool,

    /// Set when push-out lifted this object onto something this frame
    pub grounded: bool,

    colliders: Vec<ColliderHandle>,
}

impl GameObject {
    /// Create an active, ungrounded object
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            active: true,
            grounded: false,
            colliders: Vec::new(),
        }
    }

    /// Handles of the colliders attached to this object, in attach order
    pub fn colliders(&self) -> &[ColliderHandle] {
        &self.colliders
    }

    /// First attached collider, if any
    pub fn collider(&self) -> Option<ColliderHandle> {
        self.colliders.first().copied()
    }

    pub(crate) fn push_collider(&mut self, handle: ColliderHandle) {
        self.colliders.push(handle);
    }

    pub(crate) fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|&h| h != handle);
        self.colliders.len() != before
    }

    pub(crate) fn take_colliders(&mut self) -> Vec<ColliderHandle> {
        std::mem::take(&mut self.colliders)
    }
}

impl TransformSource for SlotMap<GameObjectKey, GameObject> {
    fn world_transform(&self, owner: GameObjectKey) -> Option<Transform> {
        self.get(owner)
            .filter(|object| object.active)
            .map(|object| object.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_inactive_objects_have_no_transform() {
        let mut objects: SlotMap<GameObjectKey, GameObject> = SlotMap::with_key();
        let key = objects.insert(GameObject::new("crate", Transform::from_position(Vec3::new(1.0, 0.0, 0.0))));

        assert_eq!(objects.world_transform(key).map(|t| t.position.x), Some(1.0));

        objects[key].active = false;
        assert!(objects.world_transform(key).is_none());

        objects.remove(key);
        assert!(objects.world_transform(key).is_none());
    }
}
