//! Collider component
//!
//! A collider is a box attached to a game object. Its world shape is rebuilt
//! from the owner's transform on every update and it remembers where the owner
//! stood at the start of the frame, which is where a sweep begins.
//!
//! `collision_position` is a coarse contact point: the collider's own center
//! (or its interpolated center for swept hits), not a point on the contact
//! surface. It is good enough for effect placement and grounding heuristics
//! and nothing more.

use std::fmt;

use slotmap::new_key_type;

use super::collision::{Aabb, ColliderShape, Obb, ShapeKind};
use super::collision_layers::CollisionLayers;
use super::collision_system::CollisionCommands;
use crate::foundation::math::{Transform, Vec3};
use crate::scene::GameObjectKey;

new_key_type! {
    /// Stable identifier of a registered collider
    pub struct ColliderHandle;
}

/// What a contact callback is told about the pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The collider whose callback is running
    pub this: ColliderHandle,
    /// The other collider of the pair
    pub other: ColliderHandle,
    /// Owner of the other collider
    pub other_owner: Option<GameObjectKey>,
    /// Shape kind of the other collider
    pub other_kind: ShapeKind,
    /// This collider's last recorded collision position
    pub position: Vec3,
}

/// Contact notification closure
///
/// Callbacks run synchronously inside the collision pass. They must not (and
/// cannot) touch the collider registry; removals and deactivations go through
/// the supplied [`CollisionCommands`] queue and are applied after the pass.
pub type ContactCallback = Box<dyn FnMut(&Contact, &mut CollisionCommands)>;

/// Box collider attached to a game object
pub struct Collider {
    owner: Option<GameObjectKey>,
    kind: ShapeKind,
    half_extents: Vec3,
    offset: Vec3,
    shape: ColliderShape,
    position: Vec3,
    previous_position: Option<Vec3>,
    collision_position: Vec3,
    use_sweep: bool,
    layer: CollisionLayers,
    mask: CollisionLayers,
    on_enter: Option<ContactCallback>,
    on_stay: Option<ContactCallback>,
    on_exit: Option<ContactCallback>,
}

impl Collider {
    fn with_kind(kind: ShapeKind, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        let shape = match kind {
            ShapeKind::Aabb => ColliderShape::Aabb(Aabb::from_center_half_size(Vec3::zeros(), half_extents)),
            ShapeKind::Obb => ColliderShape::Obb(Obb::axis_aligned(Vec3::zeros(), half_extents)),
        };

        Self {
            owner: None,
            kind,
            half_extents,
            offset: Vec3::zeros(),
            shape,
            position: Vec3::zeros(),
            previous_position: None,
            collision_position: Vec3::zeros(),
            use_sweep: false,
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::ALL,
            on_enter: None,
            on_stay: None,
            on_exit: None,
        }
    }

    /// Axis-aligned box collider with the given local half extents
    ///
    /// The owner's rotation is ignored; its scale multiplies the extents.
    pub fn aabb(half_extents: Vec3) -> Self {
        Self::with_kind(ShapeKind::Aabb, half_extents)
    }

    /// Oriented box collider with the given local half extents
    pub fn obb(half_extents: Vec3) -> Self {
        Self::with_kind(ShapeKind::Obb, half_extents)
    }

    /// Opt into substep (continuous) testing
    pub fn with_sweep(mut self, use_sweep: bool) -> Self {
        self.use_sweep = use_sweep;
        self
    }

    /// Set collision layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Offset of the box center in owner space
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Set the owning game object
    pub fn with_owner(mut self, owner: GameObjectKey) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Recompute the world shape from the owner's transform
    ///
    /// A collider that has never had a sweep start point takes the first pose
    /// it sees, so its first frame has no displacement.
    pub fn update(&mut self, owner: &Transform) {
        self.position = owner.position;
        self.previous_position.get_or_insert(owner.position);
        let half_size = owner.scale.component_mul(&self.half_extents);

        self.shape = match self.kind {
            ShapeKind::Aabb => {
                let center = owner.position + owner.scale.component_mul(&self.offset);
                ColliderShape::Aabb(Aabb::from_center_half_size(center, half_size))
            }
            ShapeKind::Obb => {
                let center = owner.position + owner.transform_vector(self.offset);
                ColliderShape::Obb(Obb::new(center, owner.rotation_matrix(), half_size))
            }
        };
    }

    /// Owner position the sweep starts from
    pub fn previous_position(&self) -> Vec3 {
        self.previous_position.unwrap_or(self.position)
    }

    /// Record the sweep start point (once per frame, before anything moves)
    pub fn set_previous_position(&mut self, position: Vec3) {
        self.previous_position = Some(position);
    }

    /// Owner movement between the previous position and the last update
    pub fn displacement(&self) -> Vec3 {
        self.position - self.previous_position()
    }

    /// Shape discriminant
    pub fn collider_type(&self) -> ShapeKind {
        self.kind
    }

    /// "AABB" or "OBB"
    pub fn type_name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Current world shape
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Owning game object
    pub fn owner(&self) -> Option<GameObjectKey> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<GameObjectKey>) {
        self.owner = owner;
    }

    /// Whether substep testing is enabled
    pub fn use_sweep(&self) -> bool {
        self.use_sweep
    }

    /// Enable or disable substep testing
    pub fn set_use_sweep(&mut self, use_sweep: bool) {
        self.use_sweep = use_sweep;
    }

    /// Where the last hit was detected (coarse, see module docs)
    pub fn collision_position(&self) -> Vec3 {
        self.collision_position
    }

    pub(crate) fn set_collision_position(&mut self, position: Vec3) {
        self.collision_position = position;
    }

    /// Layers this collider sits on
    pub fn layer(&self) -> CollisionLayers {
        self.layer
    }

    /// Layers this collider wants to touch
    pub fn mask(&self) -> CollisionLayers {
        self.mask
    }

    /// Called on the first frame of overlap
    pub fn set_on_enter(&mut self, callback: impl FnMut(&Contact, &mut CollisionCommands) + 'static) {
        self.on_enter = Some(Box::new(callback));
    }

    /// Called on every following frame of overlap
    pub fn set_on_stay(&mut self, callback: impl FnMut(&Contact, &mut CollisionCommands) + 'static) {
        self.on_stay = Some(Box::new(callback));
    }

    /// Called on the first frame after overlap ends
    pub fn set_on_exit(&mut self, callback: impl FnMut(&Contact, &mut CollisionCommands) + 'static) {
        self.on_exit = Some(Box::new(callback));
    }

    /// Builder form of [`Collider::set_on_enter`]
    pub fn on_enter(mut self, callback: impl FnMut(&Contact, &mut CollisionCommands) + 'static) -> Self {
        self.set_on_enter(callback);
        self
    }

    /// Builder form of [`Collider::set_on_stay`]
    pub fn on_stay(mut self, callback: impl FnMut(&Contact, &mut CollisionCommands) + 'static) -> Self {
        self.set_on_stay(callback);
        self
    }

    /// Builder form of [`Collider::set_on_exit`]
    pub fn on_exit(mut self, callback: impl FnMut(&Contact, &mut CollisionCommands) + 'static) -> Self {
        self.set_on_exit(callback);
        self
    }

    pub(crate) fn callback_mut(&mut self, phase: ContactPhase) -> Option<&mut ContactCallback> {
        match phase {
            ContactPhase::Enter => self.on_enter.as_mut(),
            ContactPhase::Stay => self.on_stay.as_mut(),
            ContactPhase::Exit => self.on_exit.as_mut(),
        }
    }
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("owner", &self.owner)
            .field("shape", &self.shape)
            .field("previous_position", &self.previous_position)
            .field("use_sweep", &self.use_sweep)
            .field("layer", &self.layer)
            .field("mask", &self.mask)
            .finish_non_exhaustive()
    }
}

/// Which lifecycle callback is being dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// First frame of overlap
    Enter,
    /// Continued overlap
    Stay,
    /// First frame after overlap
    Exit,
}
