//! Core collision detection system
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! [`CollisionWorld`] owns the registry of active colliders. Once per frame it
//! enumerates every unordered pair (all-pairs broad phase, the expected scale
//! is tens of colliders), runs the static or swept narrow phase for the pair's
//! shape kinds, and drives a two-state Touching / Not-touching machine per
//! pair that fires enter, stay and exit callbacks.
//!
//! # Frame ordering
//!
//! 1. [`CollisionWorld::update_previous_positions`] before anything moves
//! 2. gameplay mutates transforms
//! 3. [`CollisionWorld::check_collisions`] after all movement, before rendering

use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;

use super::collider::{Collider, ColliderHandle, Contact, ContactPhase};
use super::collision::sweep::{self, SweepSettings, SweptShape};
use super::collision::ShapeKind;
use super::collision_layers::CollisionLayers;
use crate::config::CollisionConfig;
use crate::debug::CollisionStats;
use crate::foundation::math::Vec3;
use crate::scene::{GameObjectKey, TransformSource};

/// Unordered pair of colliders
///
/// The smaller handle is always stored first, so `new(a, b) == new(b, a)` and
/// both orders hash the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller handle
    pub first: ColliderHandle,
    /// Larger handle
    pub second: ColliderHandle,
}

impl CollisionPair {
    /// Create a normalized pair
    pub fn new(a: ColliderHandle, b: ColliderHandle) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Whether `handle` is one of the two members
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.first == handle || self.second == handle
    }
}

/// Work requested by contact callbacks, applied after the collision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredCommand {
    /// Unregister a collider
    RemoveCollider(ColliderHandle),
    /// Mark a game object inactive
    Deactivate(GameObjectKey),
    /// Remove a game object and all of its colliders
    Despawn(GameObjectKey),
    /// Push `collider`'s owner out of `obstacle` along the minimum translation vector
    PushOut {
        /// Collider whose owner is moved
        collider: ColliderHandle,
        /// Collider it is pushed out of
        obstacle: ColliderHandle,
    },
}

/// Deferred-destruction queue handed to contact callbacks
#[derive(Debug, Default)]
pub struct CollisionCommands {
    commands: Vec<DeferredCommand>,
}

impl CollisionCommands {
    /// Queue removal of a collider
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.commands.push(DeferredCommand::RemoveCollider(handle));
    }

    /// Queue deactivation of a game object
    pub fn deactivate(&mut self, object: GameObjectKey) {
        self.commands.push(DeferredCommand::Deactivate(object));
    }

    /// Queue removal of a game object
    pub fn despawn(&mut self, object: GameObjectKey) {
        self.commands.push(DeferredCommand::Despawn(object));
    }

    /// Queue a push-out of `collider`'s owner from `obstacle`
    pub fn push_out(&mut self, collider: ColliderHandle, obstacle: ColliderHandle) {
        self.commands.push(DeferredCommand::PushOut { collider, obstacle });
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Queued commands in the order they were issued
    pub fn iter(&self) -> impl Iterator<Item = &DeferredCommand> {
        self.commands.iter()
    }
}

impl IntoIterator for CollisionCommands {
    type Item = DeferredCommand;
    type IntoIter = std::vec::IntoIter<DeferredCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

/// A lifecycle event for one pair, members in broad-phase order
#[derive(Debug, Clone, Copy)]
struct PairEvent {
    phase: ContactPhase,
    first: ColliderHandle,
    second: ColliderHandle,
    /// Where each member was when this pair's hit was found
    positions: (Vec3, Vec3),
}

/// Collider registry and per-frame collision pass
pub struct CollisionWorld {
    config: CollisionConfig,

    /// Registered colliders
    colliders: SlotMap<ColliderHandle, Collider>,

    /// Registration order; this is the broad-phase iteration order
    order: Vec<ColliderHandle>,

    /// Pairs that overlapped during the last completed pass
    touching: HashSet<CollisionPair>,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

impl CollisionWorld {
    /// Create an empty world
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            colliders: SlotMap::with_key(),
            order: Vec::new(),
            touching: HashSet::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    fn sweep_settings(&self) -> SweepSettings {
        SweepSettings {
            max_step_distance: self.config.max_step_distance,
            max_substeps: self.config.max_substeps,
            axis_epsilon: self.config.axis_epsilon,
        }
    }

    /// Register a collider for the rest of its lifetime
    pub fn register(&mut self, collider: Collider) -> ColliderHandle {
        let kind = collider.type_name();
        let handle = self.colliders.insert(collider);
        self.order.push(handle);
        log::trace!("Registered {} collider {:?} ({} total)", kind, handle, self.order.len());
        handle
    }

    /// Unregister a collider
    ///
    /// Removes it from the registry and from every persisted touching pair, so
    /// no later pass fires a callback that mentions it. Unknown handles are a
    /// no-op.
    pub fn unregister(&mut self, handle: ColliderHandle) -> Option<Collider> {
        let collider = self.colliders.remove(handle)?;
        self.order.retain(|&h| h != handle);
        self.touching.retain(|pair| !pair.contains(handle));
        log::trace!("Unregistered {} collider {:?}", collider.type_name(), handle);
        Some(collider)
    }

    /// Look up a collider
    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// Look up a collider mutably (e.g. to change callbacks or the sweep flag)
    pub fn get_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.colliders.get_mut(handle)
    }

    /// Whether `handle` is registered
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.colliders.contains_key(handle)
    }

    /// Number of registered colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Registered colliders in broad-phase order
    pub fn handles(&self) -> &[ColliderHandle] {
        &self.order
    }

    /// Pairs that overlapped during the last pass
    pub fn touching_pairs(&self) -> impl Iterator<Item = &CollisionPair> {
        self.touching.iter()
    }

    /// Number of pairs that overlapped during the last pass
    pub fn touching_count(&self) -> usize {
        self.touching.len()
    }

    /// Whether `a` and `b` overlapped during the last pass
    pub fn is_touching(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.touching.contains(&CollisionPair::new(a, b))
    }

    /// Record each collider's sweep start point
    ///
    /// Call once per frame before any transform is mutated. Colliders without a
    /// live owner keep their old value.
    pub fn update_previous_positions(&mut self, source: &impl TransformSource) {
        for collider in self.colliders.values_mut() {
            if let Some(transform) = collider.owner().and_then(|owner| source.world_transform(owner)) {
                collider.set_previous_position(transform.position);
            }
        }
    }

    /// Refresh shapes from owners; returns which colliders take part this frame
    fn refresh_shapes(&mut self, source: &impl TransformSource) -> Vec<bool> {
        let mut live = Vec::with_capacity(self.order.len());
        for &handle in &self.order {
            let Some(collider) = self.colliders.get_mut(handle) else {
                live.push(false);
                continue;
            };
            match collider.owner().and_then(|owner| source.world_transform(owner)) {
                Some(transform) => {
                    collider.update(&transform);
                    live.push(true);
                }
                None => {
                    log::trace!("Collider {:?} has no live owner, skipping this frame", handle);
                    live.push(false);
                }
            }
        }
        live
    }

    /// Narrow (or swept) phase for one pair; returns each collider's contact position
    fn test_pair(&self, a: &Collider, b: &Collider) -> Option<(Vec3, Vec3)> {
        if a.use_sweep() || b.use_sweep() {
            let swept_a = SweptShape::new(*a.shape(), a.displacement());
            let swept_b = SweptShape::new(*b.shape(), b.displacement());
            sweep::sweep(&swept_a, &swept_b, &self.sweep_settings())
                .map(|hit| (hit.position_a, hit.position_b))
        } else {
            a.shape()
                .intersects(b.shape(), self.config.axis_epsilon)
                .then(|| (a.shape().center(), b.shape().center()))
        }
    }

    /// Broad + narrow phase over all registered pairs
    ///
    /// Returns this frame's hits (as pair events in broad-phase order) without
    /// firing anything.
    fn detect(&mut self, live: &[bool]) -> (HashSet<CollisionPair>, Vec<PairEvent>) {
        let mut hits = HashSet::new();
        let mut events = Vec::new();
        let mut positions = Vec::new();

        for i in 0..self.order.len() {
            if !live[i] {
                continue;
            }
            for j in (i + 1)..self.order.len() {
                if !live[j] {
                    continue;
                }

                let (handle_a, handle_b) = (self.order[i], self.order[j]);
                let (Some(a), Some(b)) = (self.colliders.get(handle_a), self.colliders.get(handle_b)) else {
                    continue;
                };
                if !CollisionLayers::should_collide(a.layer(), a.mask(), b.layer(), b.mask()) {
                    continue;
                }

                let Some((position_a, position_b)) = self.test_pair(a, b) else {
                    continue;
                };

                let pair = CollisionPair::new(handle_a, handle_b);
                let phase = if self.touching.contains(&pair) {
                    ContactPhase::Stay
                } else {
                    ContactPhase::Enter
                };
                hits.insert(pair);
                events.push(PairEvent {
                    phase,
                    first: handle_a,
                    second: handle_b,
                    positions: (position_a, position_b),
                });
                positions.push((handle_a, position_a));
                positions.push((handle_b, position_b));
            }
        }

        for (handle, position) in positions {
            if let Some(collider) = self.colliders.get_mut(handle) {
                collider.set_collision_position(position);
            }
        }

        (hits, events)
    }

    /// Run `this`'s callback for `phase`, if it has one
    ///
    /// `position` is where `this` was for this pair's hit; exits pass `None`
    /// and report the last recorded collision position.
    fn fire(
        &mut self,
        phase: ContactPhase,
        this: ColliderHandle,
        other: ColliderHandle,
        position: Option<Vec3>,
        commands: &mut CollisionCommands,
    ) {
        let Some(other_collider) = self.colliders.get(other) else {
            return;
        };
        let (other_owner, other_kind) = (other_collider.owner(), other_collider.collider_type());

        let Some(collider) = self.colliders.get_mut(this) else {
            return;
        };
        let contact = Contact {
            this,
            other,
            other_owner,
            other_kind,
            position: position.unwrap_or_else(|| collider.collision_position()),
        };
        if let Some(callback) = collider.callback_mut(phase) {
            callback(&contact, commands);
        }
    }

    /// Perform the per-frame collision pass
    ///
    /// Refreshes every shape from its owner, tests all pairs, fires enter/stay
    /// for this frame's hits in broad-phase order, then exit for every pair
    /// that touched last frame but not this one. The touching set is replaced
    /// wholesale at the end. Commands queued by callbacks are returned for the
    /// caller to apply once the pass is over.
    pub fn check_collisions(&mut self, source: &impl TransformSource) -> CollisionCommands {
        let live = self.refresh_shapes(source);
        let (hits, events) = self.detect(&live);
        let mut commands = CollisionCommands::default();

        for event in &events {
            if self.config.log_contacts && event.phase == ContactPhase::Enter {
                log::debug!("Contact enter: {:?} <-> {:?}", event.first, event.second);
            }
            let (position_first, position_second) = event.positions;
            self.fire(event.phase, event.first, event.second, Some(position_first), &mut commands);
            self.fire(event.phase, event.second, event.first, Some(position_second), &mut commands);
        }

        let rank: HashMap<ColliderHandle, usize> =
            self.order.iter().enumerate().map(|(index, &handle)| (handle, index)).collect();
        let mut exits: Vec<(usize, usize)> = self
            .touching
            .difference(&hits)
            .filter_map(|pair| {
                let (a, b) = (*rank.get(&pair.first)?, *rank.get(&pair.second)?);
                Some((a.min(b), a.max(b)))
            })
            .collect();
        exits.sort_unstable();

        for (i, j) in exits {
            let (first, second) = (self.order[i], self.order[j]);
            if self.config.log_contacts {
                log::debug!("Contact exit: {:?} <-> {:?}", first, second);
            }
            self.fire(ContactPhase::Exit, first, second, None, &mut commands);
            self.fire(ContactPhase::Exit, second, first, None, &mut commands);
        }

        self.touching = hits;
        commands
    }

    /// Snapshot of registry and contact counts
    pub fn stats(&self) -> CollisionStats {
        let mut stats = CollisionStats {
            collider_count: self.colliders.len(),
            touching_pairs: self.touching.len(),
            ..CollisionStats::default()
        };
        for collider in self.colliders.values() {
            match collider.collider_type() {
                ShapeKind::Aabb => stats.aabb_count += 1,
                ShapeKind::Obb => stats.obb_count += 1,
            }
            if collider.use_sweep() {
                stats.swept_count += 1;
            }
        }
        stats
    }

    /// One-line description of a collider for overlays and logs
    pub fn describe(&self, handle: ColliderHandle) -> Option<String> {
        let collider = self.colliders.get(handle)?;
        let owner = collider
            .owner()
            .map_or_else(|| "none".to_string(), |owner| format!("{owner:?}"));
        let center = collider.shape().center();
        Some(format!(
            "{} owner={} center=({:.2}, {:.2}, {:.2}) sweep={}",
            collider.type_name(),
            owner,
            center.x,
            center.y,
            center.z,
            collider.use_sweep()
        ))
    }

    /// Drop every collider and all contact state
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.order.clear();
        self.touching.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform};
    use crate::scene::GameObject;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Objects = SlotMap<GameObjectKey, GameObject>;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Counts {
        enter: usize,
        stay: usize,
        exit: usize,
    }

    fn counted(collider: Collider, counts: &Rc<RefCell<Counts>>) -> Collider {
        let (enter, stay, exit) = (counts.clone(), counts.clone(), counts.clone());
        collider
            .on_enter(move |_, _| enter.borrow_mut().enter += 1)
            .on_stay(move |_, _| stay.borrow_mut().stay += 1)
            .on_exit(move |_, _| exit.borrow_mut().exit += 1)
    }

    fn spawn(objects: &mut Objects, x: f32) -> GameObjectKey {
        objects.insert(GameObject::new("box", Transform::from_position(Vec3::new(x, 0.0, 0.0))))
    }

    fn frame(world: &mut CollisionWorld, objects: &Objects) -> CollisionCommands {
        world.check_collisions(objects)
    }

    #[test]
    fn test_enter_stay_exit_lifecycle() {
        crate::foundation::logging::init();
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::new(CollisionConfig {
            log_contacts: true,
            ..Default::default()
        });
        let counts_a = Rc::new(RefCell::new(Counts::default()));
        let counts_b = Rc::new(RefCell::new(Counts::default()));

        let a = spawn(&mut objects, 0.0);
        let b = spawn(&mut objects, 1.5);
        world.register(counted(Collider::aabb(Vec3::repeat(1.0)).with_owner(a), &counts_a));
        world.register(counted(Collider::aabb(Vec3::repeat(1.0)).with_owner(b), &counts_b));

        // Frame 1: overlapping
        frame(&mut world, &objects);
        assert_eq!(*counts_a.borrow(), Counts { enter: 1, stay: 0, exit: 0 });
        assert_eq!(*counts_b.borrow(), Counts { enter: 1, stay: 0, exit: 0 });
        assert_eq!(world.touching_count(), 1);

        // Frame 2: still overlapping
        frame(&mut world, &objects);
        assert_eq!(*counts_a.borrow(), Counts { enter: 1, stay: 1, exit: 0 });

        // Frame 3: separated
        objects[b].transform.position.x = 10.0;
        frame(&mut world, &objects);
        assert_eq!(*counts_a.borrow(), Counts { enter: 1, stay: 1, exit: 1 });
        assert_eq!(*counts_b.borrow(), Counts { enter: 1, stay: 1, exit: 1 });
        assert_eq!(world.touching_count(), 0);

        // Frame 4: still apart, nothing fires
        frame(&mut world, &objects);
        assert_eq!(*counts_a.borrow(), Counts { enter: 1, stay: 1, exit: 1 });

        // Frame 5: re-entry
        objects[b].transform.position.x = 0.5;
        frame(&mut world, &objects);
        assert_eq!(counts_b.borrow().enter, 2);
    }

    #[test]
    fn test_contact_names_the_other_side() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = spawn(&mut objects, 0.0);
        let b = spawn(&mut objects, 0.5);
        let log_a = seen.clone();
        let handle_a = world.register(
            Collider::aabb(Vec3::repeat(0.5))
                .with_owner(a)
                .on_enter(move |contact, _| log_a.borrow_mut().push(("a", contact.other_owner, contact.other_kind))),
        );
        let log_b = seen.clone();
        let handle_b = world.register(
            Collider::obb(Vec3::repeat(0.5))
                .with_owner(b)
                .on_enter(move |contact, _| log_b.borrow_mut().push(("b", contact.other_owner, contact.other_kind))),
        );

        frame(&mut world, &objects);
        assert_eq!(
            *seen.borrow(),
            vec![("a", Some(b), ShapeKind::Obb), ("b", Some(a), ShapeKind::Aabb)]
        );
        assert!(world.is_touching(handle_b, handle_a));
    }

    #[test]
    fn test_callbacks_fire_in_registration_order() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        let keys: Vec<_> = (0..3).map(|i| spawn(&mut objects, i as f32 * 0.5)).collect();
        for (index, &key) in keys.iter().enumerate() {
            let log = order.clone();
            world.register(
                Collider::aabb(Vec3::repeat(0.5))
                    .with_owner(key)
                    .on_enter(move |_, _| log.borrow_mut().push(index)),
            );
        }

        frame(&mut world, &objects);
        // Pairs (0,1), (0,2), (1,2), each firing first then second
        assert_eq!(*order.borrow(), vec![0, 1, 0, 2, 1, 2]);
    }

    #[test]
    fn test_unregister_purges_touching_pairs() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();
        let counts = Rc::new(RefCell::new(Counts::default()));

        let a = spawn(&mut objects, 0.0);
        let b = spawn(&mut objects, 0.5);
        world.register(counted(Collider::aabb(Vec3::repeat(1.0)).with_owner(a), &counts));
        let doomed = world.register(Collider::aabb(Vec3::repeat(1.0)).with_owner(b));

        frame(&mut world, &objects);
        assert_eq!(world.touching_count(), 1);

        assert!(world.unregister(doomed).is_some());
        assert_eq!(world.touching_count(), 0);
        assert_eq!(world.collider_count(), 1);

        frame(&mut world, &objects);
        frame(&mut world, &objects);
        assert_eq!(*counts.borrow(), Counts { enter: 1, stay: 0, exit: 0 });

        // Second removal is a no-op
        assert!(world.unregister(doomed).is_none());
    }

    #[test]
    fn test_ownerless_and_inactive_colliders_are_inert() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();
        let counts = Rc::new(RefCell::new(Counts::default()));

        let a = spawn(&mut objects, 0.0);
        let b = spawn(&mut objects, 0.0);
        world.register(counted(Collider::aabb(Vec3::repeat(1.0)).with_owner(a), &counts));
        world.register(Collider::aabb(Vec3::repeat(1.0)));
        world.register(Collider::aabb(Vec3::repeat(1.0)).with_owner(b));

        frame(&mut world, &objects);
        assert_eq!(counts.borrow().enter, 1);

        // Deactivating the owner ends the contact like a separation would
        objects[b].active = false;
        frame(&mut world, &objects);
        assert_eq!(*counts.borrow(), Counts { enter: 1, stay: 0, exit: 1 });
    }

    #[test]
    fn test_layer_filtering() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();

        let a = spawn(&mut objects, 0.0);
        let b = spawn(&mut objects, 0.5);
        world.register(
            Collider::aabb(Vec3::repeat(1.0))
                .with_owner(a)
                .with_layers(CollisionLayers::PLAYER, CollisionLayers::ENEMY),
        );
        world.register(
            Collider::aabb(Vec3::repeat(1.0))
                .with_owner(b)
                .with_layers(CollisionLayers::ENVIRONMENT, CollisionLayers::ALL),
        );

        frame(&mut world, &objects);
        assert_eq!(world.touching_count(), 0);
    }

    #[test]
    fn test_swept_bullet_hits_thin_target() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();
        let counts = Rc::new(RefCell::new(Counts::default()));

        let bullet = spawn(&mut objects, 0.0);
        let target = spawn(&mut objects, 2.5);
        let bullet_collider = world.register(Collider::aabb(Vec3::repeat(0.1)).with_owner(bullet).with_sweep(true));
        world.register(counted(Collider::aabb(Vec3::repeat(0.1)).with_owner(target), &counts));

        world.update_previous_positions(&objects);
        objects[bullet].transform.position.x = 5.0;
        frame(&mut world, &objects);

        assert_eq!(counts.borrow().enter, 1);
        let hit = world.get(bullet_collider).unwrap().collision_position();
        assert!((hit.x - 2.5).abs() <= 0.2 + 1e-5);
    }

    #[test]
    fn test_each_contact_reports_its_own_hit_position() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let bullet = spawn(&mut objects, 0.0);
        let near = spawn(&mut objects, 2.0);
        let far = spawn(&mut objects, 4.0);
        let log = seen.clone();
        let bullet_collider = world.register(
            Collider::aabb(Vec3::repeat(0.1))
                .with_owner(bullet)
                .with_sweep(true)
                .on_enter(move |contact, _| log.borrow_mut().push((contact.other_owner, contact.position.x))),
        );
        let thin = || Collider::aabb(Vec3::new(0.05, 1.0, 1.0));
        world.register(thin().with_owner(near));
        world.register(thin().with_owner(far));

        world.update_previous_positions(&objects);
        objects[bullet].transform.position.x = 5.0;
        frame(&mut world, &objects);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, Some(near));
        assert!((seen[0].1 - 2.0).abs() <= 0.15 + 1e-5);
        assert_eq!(seen[1].0, Some(far));
        assert!((seen[1].1 - 4.0).abs() <= 0.15 + 1e-5);

        // The collider keeps the last hit of the frame
        assert_relative_eq!(world.get(bullet_collider).unwrap().collision_position().x, seen[1].1);
    }

    #[test]
    fn test_registration_without_sweep_start_has_no_phantom_motion() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();

        // Swept body already far from the origin, obstacle between it and the origin
        let bullet = spawn(&mut objects, 10.0);
        let obstacle = spawn(&mut objects, 5.0);
        let bullet_collider = world.register(Collider::aabb(Vec3::repeat(0.1)).with_owner(bullet).with_sweep(true));
        world.register(Collider::aabb(Vec3::repeat(0.1)).with_owner(obstacle));

        frame(&mut world, &objects);
        assert_eq!(world.touching_count(), 0);
        assert_eq!(world.get(bullet_collider).unwrap().displacement(), Vec3::zeros());

        // Real motion measured from the seeded start still sweeps
        objects[bullet].transform.position.x = 0.0;
        frame(&mut world, &objects);
        assert_eq!(world.touching_count(), 1);
    }

    #[test]
    fn test_unswept_bullet_tunnels() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();

        let bullet = spawn(&mut objects, 0.0);
        let target = spawn(&mut objects, 2.5);
        world.register(Collider::aabb(Vec3::repeat(0.1)).with_owner(bullet));
        world.register(Collider::aabb(Vec3::repeat(0.1)).with_owner(target));

        world.update_previous_positions(&objects);
        objects[bullet].transform.position.x = 5.0;
        frame(&mut world, &objects);
        assert_eq!(world.touching_count(), 0);
    }

    #[test]
    fn test_commands_are_returned_not_applied() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();

        let a = spawn(&mut objects, 0.0);
        let b = spawn(&mut objects, 0.5);
        let bullet = world.register(
            Collider::aabb(Vec3::repeat(1.0))
                .with_owner(a)
                .on_enter(move |contact, commands| {
                    commands.remove_collider(contact.this);
                    if let Some(owner) = contact.other_owner {
                        commands.deactivate(owner);
                    }
                }),
        );
        world.register(Collider::obb(Vec3::repeat(1.0)).with_owner(b));

        let commands = frame(&mut world, &objects);
        assert!(world.contains(bullet));
        assert_eq!(
            commands.into_iter().collect::<Vec<_>>(),
            vec![DeferredCommand::RemoveCollider(bullet), DeferredCommand::Deactivate(b)]
        );
    }

    #[test]
    fn test_obb_pair_writes_centers_as_collision_positions() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();

        let a = spawn(&mut objects, 0.0);
        let b = objects.insert(GameObject::new(
            "tilted",
            Transform::from_position_rotation(Vec3::new(1.0, 0.0, 0.0), Quat::from_axis_angle(&Vec3::y_axis(), 0.6)),
        ));
        let handle_a = world.register(Collider::obb(Vec3::repeat(0.5)).with_owner(a));
        let handle_b = world.register(Collider::obb(Vec3::repeat(0.5)).with_owner(b));

        frame(&mut world, &objects);
        assert!(world.is_touching(handle_a, handle_b));
        assert_eq!(world.get(handle_a).unwrap().collision_position(), Vec3::zeros());
        assert_eq!(world.get(handle_b).unwrap().collision_position(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_stats_and_describe() {
        let mut objects = Objects::with_key();
        let mut world = CollisionWorld::default();

        let a = spawn(&mut objects, 0.0);
        let handle = world.register(Collider::aabb(Vec3::repeat(1.0)).with_owner(a).with_sweep(true));
        let loose = world.register(Collider::obb(Vec3::repeat(1.0)));
        frame(&mut world, &objects);

        let stats = world.stats();
        assert_eq!(stats.collider_count, 2);
        assert_eq!(stats.aabb_count, 1);
        assert_eq!(stats.obb_count, 1);
        assert_eq!(stats.swept_count, 1);
        assert_eq!(stats.touching_pairs, 0);

        assert!(world.describe(handle).unwrap().starts_with("AABB owner="));
        assert!(world.describe(loose).unwrap().contains("owner=none"));
    }
}
