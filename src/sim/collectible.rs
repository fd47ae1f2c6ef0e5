//! Power-up collectibles
//!
//! Collectibles sit still in world space (the player flies into them), bob
//! and spin for visibility, and are never pooled. Picking one up starts a
//! short reveal; the effect itself activates when the reveal finishes.

use std::f32::consts::PI;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::aabb_overlap;
use super::spawn::{SpawnContext, SpawnPlanner, rand_range};
use super::world::{EntityId, EntityIds, EntityKind, Frame, SceneEntity};
use crate::tuning::Tuning;

/// Power-up effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Indestructible,
    Health,
    Ammo,
    Laser,
    GravityShift,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Indestructible,
        PowerUpKind::Health,
        PowerUpKind::Ammo,
        PowerUpKind::Laser,
        PowerUpKind::GravityShift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Indestructible => "Indestructible",
            PowerUpKind::Health => "Health",
            PowerUpKind::Ammo => "Ammo",
            PowerUpKind::Laser => "Laser",
            PowerUpKind::GravityShift => "Gravity Shift",
        }
    }
}

/// A live collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub position: Vec3,
    /// Y the bob oscillates around
    pub base_y: f32,
    /// Field time at spawn, drives the bob and glow phase
    pub spawn_time: f32,
    pub rotation_speed: f32,
    pub rotation: f32,
    /// 0.4..1.0 emissive intensity
    pub glow: f32,
    pub hitbox: Vec3,
    pub scale: f32,
}

impl Collectible {
    pub fn scene_entity(&self) -> SceneEntity {
        SceneEntity {
            id: self.id,
            kind: EntityKind::Collectible { kind: self.kind },
            position: self.position,
            scale: Vec3::splat(self.scale),
        }
    }
}

/// Pickup waiting for its reveal to finish
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    pub kind: PowerUpKind,
    pub elapsed: f32,
}

impl Reveal {
    /// Icon the host should show right now while the reveal spins
    pub fn frame(&self, frame_interval: f32) -> PowerUpKind {
        let step = if frame_interval > 0.0 {
            (self.elapsed / frame_interval) as usize
        } else {
            0
        };
        PowerUpKind::ALL[step % PowerUpKind::ALL.len()]
    }
}

/// Owns the live collectibles and pending reveals
#[derive(Debug, Clone)]
pub struct CollectibleField {
    collectibles: Vec<Collectible>,
    reveals: Vec<Reveal>,
    spawn_timer: f32,
    game_time: f32,
    rng: Pcg32,

    spawn_interval: f32,
    despawn_distance: f32,
    scale: f32,
    hitbox: Vec3,
    bob_height: f32,
    bob_frequency: f32,
    reveal_duration: f32,
    reveal_frame_interval: f32,
}

impl CollectibleField {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            collectibles: Vec::new(),
            reveals: Vec::new(),
            spawn_timer: 0.0,
            game_time: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            spawn_interval: tuning.collectible_spawn_interval,
            despawn_distance: tuning.collectible_despawn_distance,
            scale: tuning.collectible_scale,
            hitbox: tuning.collectible_model_extent * tuning.collectible_scale,
            bob_height: tuning.bob_height,
            bob_frequency: tuning.bob_frequency,
            reveal_duration: tuning.reveal_duration,
            reveal_frame_interval: tuning.reveal_frame_interval,
        }
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn reveals(&self) -> &[Reveal] {
        &self.reveals
    }

    pub fn reveal_frame_interval(&self) -> f32 {
        self.reveal_frame_interval
    }

    /// Place a collectible and show it
    pub fn spawn(
        &mut self,
        kind: PowerUpKind,
        position: Vec3,
        ids: &mut EntityIds,
        frame: &mut Frame,
    ) -> EntityId {
        let collectible = Collectible {
            id: ids.next_id(),
            kind,
            position,
            base_y: position.y,
            spawn_time: self.game_time,
            rotation_speed: rand_range(&mut self.rng, 0.8, 1.2),
            rotation: 0.0,
            glow: 1.0,
            hitbox: self.hitbox,
            scale: self.scale,
        };
        let id = collectible.id;
        frame.scene.add(collectible.scene_entity());
        self.collectibles.push(collectible);
        id
    }

    /// Advance one tick.
    ///
    /// Returns the power-ups whose reveal finished this tick; each pickup
    /// shows up here exactly once.
    pub fn update(
        &mut self,
        dt: f32,
        ctx: &SpawnContext,
        planner: &SpawnPlanner,
        ids: &mut EntityIds,
        frame: &mut Frame,
    ) -> Vec<PowerUpKind> {
        self.game_time += dt;
        let player = ctx.player;

        self.spawn_timer += dt;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0.0;
            let (position, kind) = planner.plan_collectible(ctx, &mut self.rng);
            let id = self.spawn(kind, position, ids, frame);
            log::debug!("Spawned {} collectible {:?} at {position}", kind.as_str(), id);
        }

        for i in (0..self.collectibles.len()).rev() {
            let collectible = &mut self.collectibles[i];
            if !collectible.position.is_finite() {
                log::warn!("Dropping corrupted collectible {:?}", collectible.id);
                let removed = self.collectibles.remove(i);
                frame.scene.remove(removed.id);
                continue;
            }

            let age = self.game_time - collectible.spawn_time;
            collectible.rotation += collectible.rotation_speed * dt;
            collectible.position.y = collectible.base_y + (age * self.bob_frequency).sin() * self.bob_height;
            collectible.glow = 0.7 + (age * 3.0 * PI).sin() * 0.3;

            if collectible.position.z > player.position.z + self.despawn_distance {
                let removed = self.collectibles.remove(i);
                frame.scene.remove(removed.id);
                continue;
            }

            if aabb_overlap(
                collectible.position,
                collectible.hitbox,
                player.position,
                player.hitbox,
            ) {
                let removed = self.collectibles.remove(i);
                frame.scene.remove(removed.id);
                log::info!("Picked up {} power-up", removed.kind.as_str());
                self.reveals.push(Reveal {
                    kind: removed.kind,
                    elapsed: 0.0,
                });
            }
        }

        let mut finished = Vec::new();
        for reveal in &mut self.reveals {
            reveal.elapsed += dt;
        }
        let reveal_duration = self.reveal_duration;
        self.reveals.retain(|reveal| {
            if reveal.elapsed >= reveal_duration {
                finished.push(reveal.kind);
                false
            } else {
                true
            }
        });
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostFrame;
    use crate::sim::difficulty::Tunables;
    use crate::sim::world::PlayerState;
    use glam::Vec2;

    fn field() -> CollectibleField {
        let tuning = Tuning {
            // Keep the interval spawner out of the way
            collectible_spawn_interval: 1000.0,
            ..Default::default()
        };
        CollectibleField::new(3, &tuning)
    }

    fn step(
        field: &mut CollectibleField,
        host: &mut HostFrame,
        ids: &mut EntityIds,
        dt: f32,
    ) -> Vec<PowerUpKind> {
        let player = host.world.player.unwrap_or_default();
        let tunables = Tunables::default();
        let ctx = SpawnContext {
            player: &player,
            trend: Vec2::ZERO,
            tunables: &tunables,
        };
        let planner = SpawnPlanner::new(&Tuning::default());
        let mut frame = host.frame();
        field.update(dt, &ctx, &planner, ids, &mut frame)
    }

    fn place(field: &mut CollectibleField, host: &mut HostFrame, ids: &mut EntityIds, kind: PowerUpKind, at: Vec3) {
        let mut frame = host.frame();
        field.spawn(kind, at, ids, &mut frame);
    }

    #[test]
    fn test_pickup_activates_exactly_once() {
        let mut field = field();
        let mut host = HostFrame::new(Some(PlayerState::default()));
        let mut ids = EntityIds::default();
        place(&mut field, &mut host, &mut ids, PowerUpKind::Laser, Vec3::ZERO);
        assert_eq!(host.scene.visible().len(), 1);

        // Pickup tick: removed immediately, reveal pending
        let fired = step(&mut field, &mut host, &mut ids, 0.1);
        assert!(fired.is_empty());
        assert!(field.collectibles().is_empty());
        assert_eq!(field.reveals().len(), 1);
        assert!(host.scene.visible().is_empty());

        let mut activations = Vec::new();
        for _ in 0..40 {
            activations.extend(step(&mut field, &mut host, &mut ids, 0.1));
        }
        assert_eq!(activations, vec![PowerUpKind::Laser]);
        assert!(field.reveals().is_empty());
    }

    #[test]
    fn test_despawn_removes_without_activation() {
        let mut field = field();
        let mut host = HostFrame::new(Some(PlayerState::default()));
        let mut ids = EntityIds::default();
        place(&mut field, &mut host, &mut ids, PowerUpKind::Health, Vec3::new(0.0, 0.0, 60.0));

        let mut activations = Vec::new();
        for _ in 0..30 {
            activations.extend(step(&mut field, &mut host, &mut ids, 0.1));
        }
        assert!(activations.is_empty());
        assert!(field.collectibles().is_empty());
        assert!(field.reveals().is_empty());
        assert!(host.scene.visible().is_empty());
    }

    #[test]
    fn test_bob_stays_within_height() {
        let mut field = field();
        let mut host = HostFrame::new(Some(PlayerState::default()));
        let mut ids = EntityIds::default();
        place(&mut field, &mut host, &mut ids, PowerUpKind::Ammo, Vec3::new(0.0, 5.0, -500.0));
        for _ in 0..50 {
            step(&mut field, &mut host, &mut ids, 0.05);
            let c = &field.collectibles()[0];
            assert!((c.position.y - 5.0).abs() <= 0.5 + 1e-5);
            assert!((0.4 - 1e-5..=1.0 + 1e-5).contains(&c.glow));
        }
    }

    #[test]
    fn test_interval_spawns_ahead() {
        let mut field = CollectibleField::new(3, &Tuning::default());
        let mut host = HostFrame::new(Some(PlayerState::default()));
        let mut ids = EntityIds::default();
        for _ in 0..10 {
            step(&mut field, &mut host, &mut ids, 0.5);
        }
        assert_eq!(field.collectibles().len(), 1);
        assert!(field.collectibles()[0].position.z < -600.0);
        assert_eq!(host.scene.visible().len(), 1);
    }

    #[test]
    fn test_reveal_frames_cycle() {
        let reveal = Reveal {
            kind: PowerUpKind::Ammo,
            elapsed: 0.0,
        };
        assert_eq!(reveal.frame(0.15), PowerUpKind::Indestructible);
        let later = Reveal { elapsed: 0.31, ..reveal };
        assert_eq!(later.frame(0.15), PowerUpKind::Ammo);
        let wrapped = Reveal { elapsed: 0.76, ..reveal };
        assert_eq!(wrapped.frame(0.15), PowerUpKind::Indestructible);
    }
}
