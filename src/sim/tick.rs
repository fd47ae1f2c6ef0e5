//! Simulation tick
//!
//! `Simulation` owns every field and runs them in a fixed order:
//! difficulty, hazards, collectibles, then effects. Collaborators are lent
//! per tick through a [`Frame`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collectible::{Collectible, CollectibleField, PowerUpKind};
use super::difficulty::{DifficultyDirector, DifficultyState};
use super::effects::{EffectCoordinator, EffectState};
use super::hazard::Hazard;
use super::hazard_field::{HazardField, HazardTickStats};
use super::spawn::{SpawnContext, SpawnPlanner, TrendTracker};
use super::world::{EntityId, EntityIds, Frame};
use crate::tuning::Tuning;

/// Offset mixed into the seed so collectibles draw from their own stream
const COLLECTIBLE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// False when the tick was skipped (no player, bad dt)
    pub advanced: bool,
    pub hazards: HazardTickStats,
    /// Hazards the laser beam destroyed this tick
    pub laser_kills: u32,
    /// Indices of distance checkpoints crossed this tick
    pub checkpoints: Vec<usize>,
    /// Power-ups whose effect started this tick
    pub activations: Vec<PowerUpKind>,
}

/// A pending reveal as the host should display it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealView {
    pub kind: PowerUpKind,
    /// Icon currently shown by the cycling reveal
    pub showing: PowerUpKind,
    pub elapsed: f32,
}

/// Serializable view of the whole simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub seed: u64,
    pub ticks: u64,
    pub distance: f32,
    pub difficulty: DifficultyState,
    pub effects: EffectState,
    pub hazards: Vec<Hazard>,
    pub collectibles: Vec<Collectible>,
    pub reveals: Vec<RevealView>,
}

/// The racer core
#[derive(Debug, Clone)]
pub struct Simulation {
    seed: u64,
    tuning: Tuning,
    ids: EntityIds,
    trend: TrendTracker,
    planner: SpawnPlanner,
    difficulty: DifficultyDirector,
    hazards: HazardField,
    collectibles: CollectibleField,
    effects: EffectCoordinator,
    distance: f32,
    ticks: u64,
}

impl Simulation {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            ids: EntityIds::default(),
            trend: TrendTracker::new(tuning.history_len, tuning.history_sample_interval),
            planner: SpawnPlanner::new(&tuning),
            difficulty: DifficultyDirector::new(&tuning),
            hazards: HazardField::new(seed, &tuning),
            collectibles: CollectibleField::new(seed ^ COLLECTIBLE_STREAM, &tuning),
            effects: EffectCoordinator::new(&tuning),
            distance: 0.0,
            ticks: 0,
            tuning,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total distance traveled
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn difficulty(&self) -> &DifficultyDirector {
        &self.difficulty
    }

    pub fn hazards(&self) -> &HazardField {
        &self.hazards
    }

    pub fn collectibles(&self) -> &CollectibleField {
        &self.collectibles
    }

    pub fn effects(&self) -> &EffectCoordinator {
        &self.effects
    }

    /// Place a specific power-up outside the interval spawner
    pub fn spawn_collectible(&mut self, kind: PowerUpKind, position: Vec3, frame: &mut Frame) -> EntityId {
        self.collectibles.spawn(kind, position, &mut self.ids, frame)
    }

    /// Advance the core by `dt` seconds
    pub fn tick(&mut self, frame: &mut Frame, dt: f32) -> TickReport {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("Skipping tick with invalid dt {dt}");
            return TickReport::default();
        }
        let dt = dt.min(self.tuning.max_frame_dt);

        let Some(raw) = frame.world.player() else {
            log::debug!("No player this frame, skipping tick");
            return TickReport::default();
        };
        let Some(player) = raw.sanitized() else {
            log::warn!("Player position is not finite, skipping tick");
            return TickReport::default();
        };
        if player != raw {
            log::warn!("Reset corrupted player kinematics");
        }

        self.ticks += 1;
        self.distance += player.speed * dt;
        self.trend.observe(dt, player.position.truncate());

        let checkpoints = self.difficulty.advance(dt, self.distance);
        let tunables = *self.difficulty.tunables();
        let ctx = SpawnContext {
            player: &player,
            trend: self.trend.trend(),
            tunables: &tunables,
        };

        let hazards = self
            .hazards
            .update(dt, &ctx, &self.planner, &mut self.ids, frame);
        let activations = self
            .collectibles
            .update(dt, &ctx, &self.planner, &mut self.ids, frame);
        for &kind in &activations {
            self.effects.activate(kind, &player, &mut self.ids, frame);
        }
        let laser_kills = self
            .effects
            .update(dt, &player, &mut self.hazards, frame);

        TickReport {
            advanced: true,
            hazards,
            laser_kills,
            checkpoints,
            activations,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let frame_interval = self.collectibles.reveal_frame_interval();
        Snapshot {
            seed: self.seed,
            ticks: self.ticks,
            distance: self.distance,
            difficulty: self.difficulty.state().clone(),
            effects: *self.effects.state(),
            hazards: self.hazards.hazards().to_vec(),
            collectibles: self.collectibles.collectibles().to_vec(),
            reveals: self
                .collectibles
                .reveals()
                .iter()
                .map(|r| RevealView {
                    kind: r.kind,
                    showing: r.frame(frame_interval),
                    elapsed: r.elapsed,
                })
                .collect(),
        }
    }
}
