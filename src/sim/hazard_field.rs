//! Hazard field
//!
//! Owns every live hazard across the three populations. Each tick it runs the
//! spawn timers, then walks the hazards back to front: motion, tier jitter,
//! homing, distance sizing, despawn, boundary acceleration, rotation, player
//! collision and finally projectile hits. Removed records go back to the pool.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{ScaleCurve, aabb_overlap, beam_hits, projectile_hits};
use super::hazard::{FAST_SPEED, Hazard, HazardPlan, Population, SpeedTier, rotation_multiplier};
use super::pool::ObjectPool;
use super::spawn::{SpawnContext, SpawnPlanner};
use super::world::{EntityId, EntityIds, ExplosionKind, Frame, PlayerState};
use crate::tuning::Tuning;

/// Chance per tick that an ultra-fast hazard nudges toward the player
const HOMING_CHANCE: f64 = 0.05;
const HOMING_NUDGE: f32 = 0.2;
/// Tracking pull is `strength * dt * TRACKING_RATE`
const TRACKING_RATE: f32 = 10.0;

/// Score for chipping or destroying a hazard with a projectile
const SCORE_HIT: u64 = 100;
const SCORE_FAST_KILL: u64 = 200;
const SCORE_LASER: u64 = 50;

/// What happened during one field update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardTickStats {
    pub spawned: u32,
    pub despawned: u32,
    pub collided: u32,
    pub destroyed: u32,
    pub chipped: u32,
    pub recycled_corrupt: u32,
}

/// Owns live hazards and their recycle pool
#[derive(Debug, Clone)]
pub struct HazardField {
    hazards: Vec<Hazard>,
    pool: ObjectPool<Hazard>,
    ambient_timer: f32,
    boundary_timer: f32,
    path_timer: f32,
    game_time: f32,
    rng: Pcg32,

    despawn_distance: f32,
    boundary_spawn_interval: f32,
    path_spawn_interval: f32,
    model_extent: Vec3,
    hitbox_ratio: f32,
    base_damage: f32,
    boundary_speed_cap: f32,
    boundary_speed_ramp: f32,
    scale_curve: ScaleCurve,
}

impl HazardField {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            hazards: Vec::new(),
            pool: ObjectPool::new(tuning.pool_capacity),
            ambient_timer: 0.0,
            boundary_timer: 0.0,
            path_timer: 0.0,
            game_time: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            despawn_distance: tuning.despawn_distance,
            boundary_spawn_interval: tuning.boundary_spawn_interval,
            path_spawn_interval: tuning.path_spawn_interval,
            model_extent: tuning.hazard_model_extent,
            hitbox_ratio: tuning.hitbox_ratio,
            base_damage: tuning.base_damage,
            boundary_speed_cap: tuning.boundary_speed_cap,
            boundary_speed_ramp: tuning.boundary_speed_ramp,
            scale_curve: tuning.scale_curve(),
        }
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    /// Mutable access for area effects (gravity shift repulsion)
    pub fn hazards_mut(&mut self) -> &mut [Hazard] {
        &mut self.hazards
    }

    pub fn pool(&self) -> &ObjectPool<Hazard> {
        &self.pool
    }

    pub fn count(&self, population: Population) -> usize {
        self.hazards.iter().filter(|h| h.population == population).count()
    }

    /// Ambient and path-filler hazards share the `max_hazards` cap
    fn capped_count(&self) -> usize {
        self.hazards
            .iter()
            .filter(|h| h.population != Population::Boundary)
            .count()
    }

    /// Materialize a plan: take a record from the pool, configure it, show it
    pub fn spawn_plan(
        &mut self,
        plan: &HazardPlan,
        player: &PlayerState,
        ids: &mut EntityIds,
        frame: &mut Frame,
    ) -> EntityId {
        let mut hazard = self.pool.acquire(|| Hazard::new(ids.next_id()));
        hazard.configure(plan, self.model_extent, self.hitbox_ratio);
        hazard.apply_scale_factor(self.scale_curve.factor(player.position.z - hazard.position.z));
        let id = hazard.id;
        frame.scene.add(hazard.scene_entity());
        self.hazards.push(hazard);
        id
    }

    /// Remove the hazard at `index`, hide it and hand the record to the pool
    fn recycle(&mut self, index: usize, frame: &mut Frame) -> Hazard {
        let hazard = self.hazards.remove(index);
        frame.scene.remove(hazard.id);
        let snapshot = hazard.clone();
        if let Some(rejected) = self.pool.release(hazard) {
            log::debug!("Hazard pool full, discarding {:?}", rejected.id);
        }
        snapshot
    }

    fn run_spawners(
        &mut self,
        dt: f32,
        ctx: &SpawnContext,
        planner: &SpawnPlanner,
        ids: &mut EntityIds,
        frame: &mut Frame,
    ) -> u32 {
        let tunables = ctx.tunables;
        let player = ctx.player;
        let max_hazards = tunables.max_hazards as usize;
        let mut spawned = 0;

        self.ambient_timer += dt;
        self.boundary_timer += dt;
        self.path_timer += dt;

        if self.ambient_timer >= tunables.spawn_interval {
            self.ambient_timer = 0.0;
            let active = self.capped_count();
            let count = (tunables.spawn_count as usize).min(max_hazards.saturating_sub(active));
            for _ in 0..count {
                let plan = planner.plan_ambient(ctx, &mut self.rng);
                self.spawn_plan(&plan, player, ids, frame);
                spawned += 1;
            }
        }

        if self.boundary_timer >= self.boundary_spawn_interval {
            self.boundary_timer = 0.0;
            if self.count(Population::Boundary) < max_hazards / 2 {
                let lateral_speed = player.velocity.length();
                let surge = (1.0 + lateral_speed * 2.5).min(2.0);
                let count = (4.0 * tunables.boundary_density * surge).ceil().max(0.0) as usize;
                for _ in 0..count {
                    let plan = planner.plan_boundary(ctx, &mut self.rng);
                    self.spawn_plan(&plan, player, ids, frame);
                    spawned += 1;
                }
            }
        }

        if self.path_timer >= self.path_spawn_interval {
            self.path_timer = 0.0;
            let remaining = max_hazards.saturating_sub(self.capped_count());
            let count = ((2.0 * player.speed_factor()).ceil().max(0.0) as usize).min(remaining);
            for _ in 0..count {
                let plan = planner.plan_path_filler(ctx, &mut self.rng);
                self.spawn_plan(&plan, player, ids, frame);
                spawned += 1;
            }
        }

        if spawned > 0 {
            log::debug!("Spawned {spawned} hazards ({} live)", self.hazards.len());
        }
        spawned
    }

    /// Advance every hazard by one tick
    pub fn update(
        &mut self,
        dt: f32,
        ctx: &SpawnContext,
        planner: &SpawnPlanner,
        ids: &mut EntityIds,
        frame: &mut Frame,
    ) -> HazardTickStats {
        self.game_time += dt;
        let mut stats = HazardTickStats {
            spawned: self.run_spawners(dt, ctx, planner, ids, frame),
            ..Default::default()
        };

        let player = ctx.player;
        let boundary_reach = ctx.tunables.boundary_distance * 0.5;
        let mut projectiles = frame.world.projectiles();

        for i in (0..self.hazards.len()).rev() {
            if !self.hazards[i].is_sane() {
                let hazard = self.recycle(i, frame);
                log::warn!("Recycled malformed hazard {:?}", hazard.id);
                stats.recycled_corrupt += 1;
                continue;
            }

            let game_time = self.game_time;
            let hazard = &mut self.hazards[i];

            hazard.position.z += hazard.speed * dt;
            hazard.position.x += hazard.lateral.x * dt;
            hazard.position.y += hazard.lateral.y * dt;

            let tier = hazard.tier();
            if tier >= SpeedTier::Fast {
                let offset = hazard.oscillation.offset(game_time);
                hazard.position.x += offset.x;
                hazard.position.y += offset.y;
                if tier == SpeedTier::UltraFast && self.rng.random_bool(HOMING_CHANCE) {
                    let toward = (player.position.truncate() - hazard.position.truncate()).normalize_or_zero();
                    hazard.position.x += toward.x * HOMING_NUDGE;
                    hazard.position.y += toward.y * HOMING_NUDGE;
                }
            }

            if let Some(strength) = hazard.tracking {
                let toward: Vec2 = (player.position.truncate() - hazard.position.truncate()).normalize_or_zero();
                let pull = strength * dt * TRACKING_RATE;
                hazard.position.x += toward.x * pull;
                hazard.position.y += toward.y * pull;
            }

            let ahead = player.position.z - hazard.position.z;
            hazard.apply_scale_factor(self.scale_curve.factor(ahead));

            if hazard.position.z > player.position.z + self.despawn_distance {
                self.recycle(i, frame);
                stats.despawned += 1;
                continue;
            }

            if hazard.population == Population::Boundary {
                let lateral_dist_sq = hazard.position.truncate().distance_squared(player.position.truncate());
                if lateral_dist_sq < boundary_reach * boundary_reach && hazard.speed < self.boundary_speed_cap {
                    hazard.speed = (hazard.speed * self.boundary_speed_ramp).min(self.boundary_speed_cap);
                }
            }

            hazard.rotation += hazard.rotation_speed * dt * rotation_multiplier(hazard.speed);

            if !player.invincible
                && aabb_overlap(hazard.position, hazard.hitbox, player.position, player.hitbox)
            {
                let multiplier = hazard.tier().damage_multiplier();
                let damage = (self.base_damage * multiplier).ceil() as u32;
                frame.world.take_damage(damage);
                frame.fx.apply_screen_shake(0.2 * multiplier, 0.2 * multiplier);
                let hazard = self.recycle(i, frame);
                frame
                    .fx
                    .spawn_explosion(hazard.position, multiplier, ExplosionKind::Collision);
                stats.collided += 1;
                continue;
            }

            // A chip is not terminal: keep spending projectiles until one kills
            let mut killed = false;
            while let Some(slot) = projectiles
                .iter()
                .position(|p| projectile_hits(p.position, hazard.position, hazard.hitbox))
            {
                let projectile = projectiles.swap_remove(slot);
                frame.world.consume_projectile(projectile.id);

                let remaining = hazard.hit_points.map(|hp| hp.saturating_sub(1));
                hazard.hit_points = remaining;
                if matches!(remaining, Some(hp) if hp > 0) {
                    hazard.damaged = true;
                    frame
                        .fx
                        .spawn_explosion(hazard.position, 0.5, ExplosionKind::Chipped);
                    frame.fx.add_score(SCORE_HIT);
                    stats.chipped += 1;
                    continue;
                }
                killed = true;
                break;
            }
            if !killed {
                continue;
            }

            let fast = hazard.speed > FAST_SPEED;
            let hazard = self.recycle(i, frame);
            let size = if fast { 1.5 } else { 1.0 };
            frame
                .fx
                .spawn_explosion(hazard.position, size, ExplosionKind::Destroyed);
            frame.fx.apply_screen_shake(0.15 * size, 0.2 * size);
            frame.fx.add_score(if fast { SCORE_FAST_KILL } else { SCORE_HIT });
            stats.destroyed += 1;
        }

        stats
    }

    /// Destroy every hazard the laser beam passes through.
    ///
    /// The beam starts at `origin` and runs `range` units ahead. Destroyed
    /// hazards go back to the pool like any other kill. Returns the kill count.
    pub fn laser_sweep(&mut self, origin: Vec3, range: f32, frame: &mut Frame) -> u32 {
        let mut kills = 0;
        for i in (0..self.hazards.len()).rev() {
            let hazard = &self.hazards[i];
            if !beam_hits(origin, range, hazard.position, hazard.hitbox) {
                continue;
            }
            let hazard = self.recycle(i, frame);
            frame
                .fx
                .spawn_explosion(hazard.position, 1.0, ExplosionKind::Destroyed);
            frame.fx.add_score(SCORE_LASER);
            kills += 1;
        }
        kills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCommand, HostFrame};
    use crate::sim::difficulty::Tunables;
    use crate::sim::hazard::Oscillation;
    use crate::sim::world::Projectile;

    /// Tuning with every interval spawner pushed out of reach
    fn quiet_tuning() -> Tuning {
        Tuning {
            boundary_spawn_interval: 1.0e6,
            path_spawn_interval: 1.0e6,
            ..Default::default()
        }
    }

    fn quiet_tunables() -> Tunables {
        Tunables {
            spawn_interval: 1.0e6,
            ..Default::default()
        }
    }

    fn plan(position: Vec3, speed: f32) -> HazardPlan {
        HazardPlan {
            population: Population::Ambient,
            position,
            speed,
            lateral: Vec2::ZERO,
            rotation_speed: Vec3::ZERO,
            base_scale: Vec3::splat(0.5),
            oscillation: Oscillation::default(),
            tracking: None,
            hit_points: SpeedTier::classify(speed).hit_points(),
            tint: 0xffffff,
        }
    }

    struct Rig {
        field: HazardField,
        host: HostFrame,
        ids: EntityIds,
        planner: SpawnPlanner,
        tunables: Tunables,
    }

    impl Rig {
        fn new(tuning: &Tuning) -> Self {
            Self {
                field: HazardField::new(11, tuning),
                host: HostFrame::new(Some(PlayerState::default())),
                ids: EntityIds::default(),
                planner: SpawnPlanner::new(tuning),
                tunables: quiet_tunables(),
            }
        }

        fn quiet() -> Self {
            Self::new(&quiet_tuning())
        }

        fn player(&self) -> PlayerState {
            self.host.world.player.unwrap_or_default()
        }

        fn add(&mut self, plan: &HazardPlan) -> EntityId {
            let player = self.player();
            let mut frame = self.host.frame();
            self.field.spawn_plan(plan, &player, &mut self.ids, &mut frame)
        }

        fn step(&mut self, dt: f32) -> HazardTickStats {
            let player = self.player();
            let ctx = SpawnContext {
                player: &player,
                trend: Vec2::ZERO,
                tunables: &self.tunables,
            };
            let mut frame = self.host.frame();
            self.field
                .update(dt, &ctx, &self.planner, &mut self.ids, &mut frame)
        }

        fn fire_at(&mut self, id: u32, position: Vec3) {
            self.host.world.projectiles.push(Projectile { id, position });
        }
    }

    #[test]
    fn test_despawn_behind_player() {
        let mut rig = Rig::quiet();
        rig.add(&plan(Vec3::new(0.0, 50.0, 45.0), 10.0));
        let stats = rig.step(1.0);
        assert_eq!(stats.despawned, 1);
        assert!(rig.field.hazards().is_empty());
        assert_eq!(rig.field.pool().len(), 1);
        assert!(rig.host.scene.visible().is_empty());
    }

    #[test]
    fn test_player_collision_damages_and_recycles() {
        let mut rig = Rig::quiet();
        // Ultra-fast: damage 20, shake 0.4
        rig.add(&plan(Vec3::new(0.0, 0.0, -1.0), 40.0));
        let stats = rig.step(0.01);
        assert_eq!(stats.collided, 1);
        let commands = rig.host.drain();
        assert!(commands.contains(&HostCommand::TakeDamage { amount: 20 }));
        assert!(commands.iter().any(|c| matches!(
            c,
            HostCommand::ScreenShake { intensity, .. } if (*intensity - 0.4).abs() < 1e-6
        )));
        assert!(commands.iter().any(|c| matches!(
            c,
            HostCommand::SpawnExplosion { kind: ExplosionKind::Collision, .. }
        )));
        assert_eq!(rig.field.pool().len(), 1);
    }

    #[test]
    fn test_invincible_player_is_not_hit() {
        let mut rig = Rig::quiet();
        if let Some(player) = rig.host.world.player.as_mut() {
            player.invincible = true;
        }
        rig.add(&plan(Vec3::new(0.0, 0.0, -1.0), 10.0));
        let stats = rig.step(0.01);
        assert_eq!(stats.collided, 0);
        assert_eq!(rig.field.hazards().len(), 1);
    }

    #[test]
    fn test_durable_hazard_survives_first_hit() {
        let mut rig = Rig::quiet();
        let mut durable = plan(Vec3::new(0.0, 0.0, -300.0), 40.0);
        durable.hit_points = Some(2);
        let id = rig.add(&durable);

        rig.fire_at(1, Vec3::new(0.0, 0.0, -300.0));
        let stats = rig.step(0.016);
        assert_eq!(stats.chipped, 1);
        assert_eq!(stats.destroyed, 0);

        let hazard = &rig.field.hazards()[0];
        assert_eq!(hazard.id, id);
        assert_eq!(hazard.hit_points, Some(1));
        assert!(hazard.damaged);
        assert!(rig.field.pool().is_empty());
        assert!(rig.host.world.projectiles.is_empty());
        assert_eq!(rig.host.fx.score, SCORE_HIT);

        // Second hit finishes it
        let at = hazard.position;
        rig.fire_at(2, at);
        let stats = rig.step(0.016);
        assert_eq!(stats.destroyed, 1);
        assert!(rig.field.hazards().is_empty());
        assert_eq!(rig.field.pool().len(), 1);

        let commands = rig.host.drain();
        assert!(commands.contains(&HostCommand::ConsumeProjectile { id: 2 }));
        assert!(commands.iter().any(|c| matches!(
            c,
            HostCommand::SpawnExplosion { kind: ExplosionKind::Destroyed, size, .. } if *size == 1.5
        )));
        assert_eq!(rig.host.fx.score, SCORE_HIT + SCORE_FAST_KILL);
    }

    #[test]
    fn test_one_projectile_per_hazard_per_tick() {
        let mut rig = Rig::quiet();
        rig.add(&plan(Vec3::new(0.0, 0.0, -300.0), 10.0));
        rig.add(&plan(Vec3::new(0.0, 0.0, -300.0), 10.0));
        rig.fire_at(7, Vec3::new(0.0, 0.0, -300.0));
        let stats = rig.step(0.016);
        // The single projectile is spent on the first hazard it meets
        assert_eq!(stats.destroyed, 1);
        assert_eq!(rig.field.hazards().len(), 1);
    }

    #[test]
    fn test_two_projectiles_chip_then_kill_in_one_tick() {
        let mut rig = Rig::quiet();
        let mut durable = plan(Vec3::new(0.0, 0.0, -300.0), 40.0);
        durable.hit_points = Some(2);
        rig.add(&durable);
        rig.fire_at(1, Vec3::new(0.0, 0.0, -300.0));
        rig.fire_at(2, Vec3::new(0.0, 0.0, -300.0));

        let stats = rig.step(0.016);
        assert_eq!(stats.chipped, 1);
        assert_eq!(stats.destroyed, 1);
        assert!(rig.field.hazards().is_empty());
        assert!(rig.host.world.projectiles.is_empty());
        assert_eq!(rig.host.fx.score, SCORE_HIT + SCORE_FAST_KILL);
    }

    #[test]
    fn test_player_collision_wins_over_projectile() {
        let mut rig = Rig::quiet();
        rig.add(&plan(Vec3::new(0.0, 0.0, -1.0), 10.0));
        rig.fire_at(5, Vec3::new(0.0, 0.0, -1.0));

        let stats = rig.step(0.01);
        assert_eq!(stats.collided, 1);
        assert_eq!(stats.destroyed, 0);
        // Projectile untouched, no score for ramming
        assert_eq!(rig.host.world.projectiles.len(), 1);
        let commands = rig.host.drain();
        assert!(commands.contains(&HostCommand::TakeDamage { amount: 10 }));
        assert!(!commands.contains(&HostCommand::ConsumeProjectile { id: 5 }));
        assert_eq!(rig.host.fx.score, 0);
    }

    #[test]
    fn test_tracking_pulls_toward_player() {
        let mut rig = Rig::quiet();
        let mut tracker = plan(Vec3::new(100.0, 0.0, -800.0), 10.0);
        tracker.tracking = Some(0.5);
        rig.add(&tracker);

        rig.step(0.1);
        // strength 0.5 * dt 0.1 * 10
        let h = &rig.field.hazards()[0];
        assert!((h.position.x - 99.5).abs() < 1e-4, "x = {}", h.position.x);
        assert_eq!(h.position.y, 0.0);
    }

    #[test]
    fn test_oscillation_only_moves_fast_tiers() {
        let mut rig = Rig::quiet();
        let wobble = Oscillation {
            x_freq: 1.0,
            y_freq: 1.0,
            x_amp: 0.2,
            y_amp: 0.3,
            phase: 0.0,
        };
        let mut fast = plan(Vec3::new(50.0, 0.0, -800.0), 30.0);
        fast.oscillation = wobble;
        let mut normal = plan(Vec3::new(-50.0, 0.0, -800.0), 20.0);
        normal.oscillation = wobble;
        let fast_id = rig.add(&fast);
        rig.add(&normal);

        rig.step(0.5);
        for h in rig.field.hazards() {
            if h.id == fast_id {
                assert!((h.position.x - (50.0 + 0.5f32.sin() * 0.2)).abs() < 1e-4);
                assert!((h.position.y - 0.5f32.cos() * 0.3).abs() < 1e-4);
            } else {
                assert_eq!(h.position.truncate(), Vec2::new(-50.0, 0.0));
            }
        }
    }

    #[test]
    fn test_laser_sweep_recycles_hazards_in_beam() {
        let mut rig = Rig::quiet();
        rig.add(&plan(Vec3::new(0.0, 0.0, -500.0), 10.0));
        rig.add(&plan(Vec3::new(2.0, 1.0, -900.0), 10.0));
        // Off to the side and behind the ship
        rig.add(&plan(Vec3::new(150.0, 0.0, -500.0), 10.0));
        rig.add(&plan(Vec3::new(0.0, 0.0, 30.0), 10.0));

        let kills = {
            let mut frame = rig.host.frame();
            rig.field.laser_sweep(Vec3::ZERO, 1000.0, &mut frame)
        };
        assert_eq!(kills, 2);
        assert_eq!(rig.field.hazards().len(), 2);
        assert_eq!(rig.field.pool().len(), 2);
        assert_eq!(rig.field.pool().live(), 2);
        assert_eq!(rig.host.scene.visible().len(), 2);
        assert_eq!(rig.host.fx.score, 2 * SCORE_LASER);
    }

    #[test]
    fn test_malformed_hazard_is_recycled() {
        let mut rig = Rig::quiet();
        rig.add(&plan(Vec3::new(0.0, 0.0, -300.0), 10.0));
        rig.field.hazards_mut()[0].position.x = f32::NAN;
        let stats = rig.step(0.016);
        assert_eq!(stats.recycled_corrupt, 1);
        assert!(rig.field.hazards().is_empty());
    }

    #[test]
    fn test_boundary_speed_ratchets_up_only() {
        let mut rig = Rig::quiet();
        let mut fence = plan(Vec3::new(10.0, 0.0, -800.0), 20.0);
        fence.population = Population::Boundary;
        rig.add(&fence);
        let mut last = 20.0;
        for _ in 0..60 {
            rig.step(0.016);
            let speed = rig.field.hazards()[0].speed;
            assert!(speed >= last);
            assert!(speed <= 30.0);
            last = speed;
        }
        assert_eq!(last, 30.0);

        // Already faster than the cap: left alone
        let mut fast = plan(Vec3::new(10.0, 0.0, -1200.0), 45.0);
        fast.population = Population::Boundary;
        rig.add(&fast);
        rig.step(0.016);
        let fast_speed = rig.field.hazards().iter().map(|h| h.speed).fold(0.0, f32::max);
        assert_eq!(fast_speed, 45.0);
    }

    #[test]
    fn test_hitbox_tracks_distance_scale() {
        let mut rig = Rig::quiet();
        rig.add(&plan(Vec3::new(30.0, 30.0, -1400.0), 12.0));
        let curve = Tuning::default().scale_curve();
        for _ in 0..100 {
            rig.step(0.1);
            let h = &rig.field.hazards()[0];
            let factor = curve.factor(-h.position.z);
            assert!((h.hitbox - h.base_hitbox * factor).abs().max_element() < 1e-4);
            assert!((h.scale - h.base_scale * factor).abs().max_element() < 1e-6);
        }
    }

    #[test]
    fn test_spawn_caps_respected() {
        let tuning = Tuning::default();
        let mut rig = Rig::new(&tuning);
        rig.tunables = Tunables {
            max_hazards: 20,
            spawn_interval: 0.1,
            spawn_count: 10,
            ..Default::default()
        };
        for _ in 0..200 {
            rig.step(0.05);
            assert!(rig.field.capped_count() <= 20);
        }
        assert!(rig.field.count(Population::Boundary) <= 10 + 8);
        assert!(rig.field.capped_count() > 0);
    }

    #[test]
    fn test_pool_live_count_matches_field() {
        let tuning = Tuning {
            pool_capacity: 5,
            ..Default::default()
        };
        let mut rig = Rig::new(&tuning);
        rig.tunables = Tunables::default();
        for _ in 0..600 {
            rig.step(0.05);
            assert_eq!(rig.field.pool().live(), rig.field.hazards().len() as u64);
            assert!(rig.field.pool().len() <= 5);
            let visible = rig.host.scene.visible();
            assert_eq!(visible.len(), rig.field.hazards().len());
        }
    }
}
