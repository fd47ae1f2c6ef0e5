//! Collaborator contracts between the simulation core and its host
//!
//! The core never owns the player, the scene graph or the effects layer. Each
//! tick the host lends them through a [`Frame`]; the core reads player state
//! and issues fire-and-forget requests.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collectible::PowerUpKind;
use super::hazard::{Population, SpeedTier};

/// Stable identifier for anything the core asks the scene to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Monotonic id allocator shared by every field
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next = self.next.wrapping_add(1).max(1);
        EntityId(id)
    }
}

/// Player kinematics as seen by the core for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    /// Lateral (x/y) velocity
    pub velocity: Vec2,
    /// Forward speed (units per second, always along -z)
    pub speed: f32,
    /// Unit-ish steering direction (x/y), zero when idle
    pub movement_direction: Vec2,
    pub invincible: bool,
    /// Axis-aligned hitbox extents (width, height, depth)
    pub hitbox: Vec3,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec2::ZERO,
            speed: crate::consts::BASE_PLAYER_SPEED,
            movement_direction: Vec2::ZERO,
            invincible: false,
            hitbox: Vec3::new(1.6, 0.8, 2.4),
        }
    }
}

impl PlayerState {
    /// Replace corrupted components with safe values.
    ///
    /// Returns `None` when the position itself is unusable, since nothing can
    /// be placed relative to it.
    pub fn sanitized(mut self) -> Option<Self> {
        if !self.position.is_finite() {
            return None;
        }
        if !self.velocity.is_finite() {
            self.velocity = Vec2::ZERO;
        }
        if !self.movement_direction.is_finite() {
            self.movement_direction = Vec2::ZERO;
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            self.speed = crate::consts::BASE_PLAYER_SPEED;
        }
        if !self.hitbox.is_finite() {
            self.hitbox = Self::default().hitbox;
        }
        Some(self)
    }

    /// Forward speed normalized to the starting speed
    #[inline]
    pub fn speed_factor(&self) -> f32 {
        self.speed / crate::consts::BASE_PLAYER_SPEED
    }
}

/// A live player projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub position: Vec3,
}

/// What a scene entity represents, so the host can pick a model/material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Hazard {
        population: Population,
        tier: SpeedTier,
        tint: u32,
    },
    Collectible {
        kind: PowerUpKind,
    },
    LaserBeam,
    GravityField,
}

/// Descriptor handed to the scene when an entity becomes visible
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
    pub scale: Vec3,
}

/// Explosion flavour (color/particle budget is up to the host)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplosionKind {
    /// Hazard rammed the player
    Collision,
    /// Hazard destroyed by a projectile
    Destroyed,
    /// Projectile chipped a durable hazard
    Chipped,
}

/// Player/world collaborator
pub trait World {
    /// Current player kinematics, `None` while the ship is not spawned
    fn player(&self) -> Option<PlayerState>;
    /// Snapshot of active projectiles
    fn projectiles(&self) -> Vec<Projectile>;
    /// Deactivate a projectile after it hit something
    fn consume_projectile(&mut self, id: u32);
    fn take_damage(&mut self, amount: u32);
    fn add_health(&mut self, amount: u32);
    fn add_ammo(&mut self, amount: u32);
    fn enable_laser(&mut self);
    fn disable_laser(&mut self);
    fn activate_invincibility(&mut self, duration: f32);
}

/// Scene graph collaborator
pub trait Scene {
    fn add(&mut self, entity: SceneEntity);
    fn remove(&mut self, id: EntityId);
    /// Reposition an entity that follows something the host moves
    fn move_to(&mut self, id: EntityId, position: Vec3);
}

/// Effects/feedback collaborator
pub trait Fx {
    fn spawn_explosion(&mut self, position: Vec3, size: f32, kind: ExplosionKind);
    fn apply_screen_shake(&mut self, intensity: f32, duration: f32);
    fn add_score(&mut self, amount: u64);
    /// Power-up effect just went live (notification banner, sound)
    fn power_up_activated(&mut self, _kind: PowerUpKind) {}
}

/// Collaborators lent to the simulation for a single tick
pub struct Frame<'a> {
    pub world: &'a mut dyn World,
    pub scene: &'a mut dyn Scene,
    pub fx: &'a mut dyn Fx,
}

impl<'a> Frame<'a> {
    pub fn new(world: &'a mut dyn World, scene: &'a mut dyn Scene, fx: &'a mut dyn Fx) -> Self {
        Self { world, scene, fx }
    }
}
