//! Arena Collision Demo
//!
//! Runs a short scripted scene against the collision core and logs what
//! happens each frame:
//! - A fast bullet crosses a thin wall in one frame (caught by the substep sweep)
//! - A character falls onto a platform and is pushed out and grounded
//! - A crate is despawned while still touching the character
//!
//! Usage: `arena_demo [collision.toml|collision.ron]`

use std::cell::Cell;
use std::rc::Rc;

use action_engine::config::{CollisionConfig, Config, ConfigError};
use action_engine::physics::{Collider, CollisionCommands, CollisionLayers, Contact};
use action_engine::prelude::{Quat, Transform, Vec3};
use action_engine::scene::{SceneError, Stage};

// Scene layout
const WALL_X: f32 = 6.0;
const BULLET_SPEED: f32 = 9.0; // world units per frame
const GRAVITY_STEP: f32 = 0.35; // world units per frame
const FRAMES: usize = 8;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("object '{0}' vanished from the stage")]
    Missing(&'static str),
}

fn load_config() -> Result<CollisionConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading collision config from {}", path);
            CollisionConfig::load_from_file(&path)?
        }
        None => CollisionConfig {
            log_contacts: true,
            ..Default::default()
        },
    };
    config.validate()?;
    Ok(config)
}

fn push_out(contact: &Contact, commands: &mut CollisionCommands) {
    commands.push_out(contact.this, contact.other);
}

fn run() -> Result<(), DemoError> {
    let mut stage = Stage::new(load_config()?);
    let wall_hits = Rc::new(Cell::new(0_u32));

    // Thin wall, slightly turned
    let wall = stage.spawn(
        "wall",
        Transform::from_position_rotation(Vec3::new(WALL_X, 0.0, 0.0), Quat::from_axis_angle(&Vec3::y_axis(), 0.1)),
    );
    stage.attach_collider(
        wall,
        Collider::obb(Vec3::new(0.05, 2.0, 2.0)).with_layers(CollisionLayers::ENVIRONMENT, CollisionLayers::ALL),
    )?;

    // Bullet that would tunnel without the sweep
    let bullet = stage.spawn("bullet", Transform::identity());
    let hits = wall_hits.clone();
    stage.attach_collider(
        bullet,
        Collider::aabb(Vec3::repeat(0.1))
            .with_sweep(true)
            .with_layers(CollisionLayers::PROJECTILE, CollisionLayers::ENVIRONMENT)
            .on_enter(move |contact, commands| {
                hits.set(hits.get() + 1);
                log::info!("Bullet hit at {:?}", contact.position);
                commands.deactivate(bullet);
            }),
    )?;

    // Character dropping onto a platform, next to a crate
    let platform = stage.spawn("platform", Transform::from_position(Vec3::new(-6.0, 0.0, 0.0)));
    stage.attach_collider(
        platform,
        Collider::obb(Vec3::new(4.0, 0.5, 4.0)).with_layers(CollisionLayers::ENVIRONMENT, CollisionLayers::ALL),
    )?;

    let character = stage.spawn("character", Transform::from_position(Vec3::new(-6.0, 2.0, 0.0)));
    stage.attach_collider(
        character,
        Collider::obb(Vec3::new(0.4, 0.9, 0.4))
            .with_layers(CollisionLayers::PLAYER, CollisionLayers::ENVIRONMENT | CollisionLayers::PICKUP)
            .on_enter(push_out)
            .on_stay(push_out),
    )?;

    let crate_box = stage.spawn("crate", Transform::from_position(Vec3::new(-5.3, 1.2, 0.0)));
    stage.attach_collider(
        crate_box,
        Collider::aabb(Vec3::repeat(0.3))
            .with_layers(CollisionLayers::PICKUP, CollisionLayers::PLAYER)
            .on_exit(|_, _| log::warn!("crate exit fired after despawn")),
    )?;

    for frame in 0..FRAMES {
        stage.begin_frame();

        if let Some(object) = stage.object_mut(bullet).filter(|object| object.active) {
            object.transform.position.x += BULLET_SPEED;
        }
        stage
            .object_mut(character)
            .ok_or(DemoError::Missing("character"))?
            .transform
            .position
            .y -= GRAVITY_STEP;

        let applied = stage.end_frame();

        if frame == 3 {
            stage.despawn(crate_box)?;
        }

        let body = stage.object(character).ok_or(DemoError::Missing("character"))?;
        log::info!(
            "frame {}: character y = {:.2} grounded = {} | {} deferred | {}",
            frame,
            body.transform.position.y,
            body.grounded,
            applied,
            stage.collision().stats()
        );
    }

    log::info!("Bullet registered {} wall hit(s)", wall_hits.get());
    for &handle in stage.collision().handles() {
        if let Some(line) = stage.collision().describe(handle) {
            log::info!("  {}", line);
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(error) = run() {
        log::error!("arena demo failed: {}", error);
        std::process::exit(1);
    }
}
