//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a balance pass can be loaded
//! from JSON without a rebuild. Missing keys fall back to the shipped values.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::collision::ScaleCurve;
use crate::sim::difficulty::{DistanceCheckpoint, TimePhase, TunableOverrides, Tunables};

/// Rejected tuning table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{name}` = {value} must be {expected}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
    #[error("distance checkpoint {index} must be positive and beyond the previous one")]
    CheckpointOrder { index: usize },
    #[error("time phase {index} must start after the previous one")]
    PhaseOrder { index: usize },
}

/// Game balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Hazard field ===
    /// Z offset of new hazards relative to the player (negative = ahead)
    pub spawn_distance: f32,
    /// Hazards this far behind the player are recycled
    pub despawn_distance: f32,
    pub boundary_spawn_interval: f32,
    pub path_spawn_interval: f32,
    /// Hazard records kept for reuse
    pub pool_capacity: usize,
    /// Unscaled size of the hazard model
    pub hazard_model_extent: Vec3,
    /// Hitbox as a fraction of the visual size
    pub hitbox_ratio: f32,
    /// Collision damage before the tier multiplier
    pub base_damage: f32,
    /// Boundary hazards near the player accelerate up to this speed
    pub boundary_speed_cap: f32,
    pub boundary_speed_ramp: f32,
    /// Half extents of the playable field (x, y)
    pub field_half_width: f32,
    pub field_half_height: f32,

    // === Distance-based sizing ===
    pub min_scale_factor: f32,
    pub max_scale_factor: f32,
    pub scaling_start_distance: f32,
    pub scaling_end_distance: f32,

    // === Player trend ===
    pub history_len: usize,
    pub history_sample_interval: f32,

    // === Difficulty ===
    pub initial_tunables: Tunables,
    pub time_phases: Vec<TimePhase>,
    pub distance_checkpoints: Vec<DistanceCheckpoint>,

    // === Collectibles ===
    pub collectible_spawn_distance: f32,
    pub collectible_despawn_distance: f32,
    pub collectible_spawn_interval: f32,
    pub collectible_scale: f32,
    pub collectible_model_extent: Vec3,
    pub reveal_duration: f32,
    pub reveal_frame_interval: f32,
    pub bob_height: f32,
    /// Bob cycles per second times 2π
    pub bob_frequency: f32,

    // === Power-up effects ===
    pub indestructible_duration: f32,
    pub laser_duration: f32,
    /// How far ahead of the ship the beam destroys hazards
    pub laser_range: f32,
    /// Beam artifact sits this far ahead of the ship (along -z)
    pub laser_offset: f32,
    pub gravity_shift_duration: f32,
    pub gravity_radius: f32,
    pub gravity_base_force: f32,
    pub health_bonus: u32,
    pub ammo_bonus: u32,

    /// Longest frame delta the simulation will integrate
    pub max_frame_dt: f32,
}

fn phase(after_secs: f32, set: TunableOverrides) -> TimePhase {
    TimePhase { after_secs, set }
}

fn checkpoint(distance: f32, ratchet: TunableOverrides) -> DistanceCheckpoint {
    DistanceCheckpoint { distance, ratchet }
}

fn default_time_phases() -> Vec<TimePhase> {
    vec![
        phase(
            30.0,
            TunableOverrides {
                spawn_count: Some(3),
                tracking_chance: Some(0.12),
                boundary_density: Some(0.6),
                ..Default::default()
            },
        ),
        phase(
            60.0,
            TunableOverrides {
                spawn_count: Some(4),
                spawn_interval: Some(0.9),
                tracking_chance: Some(0.15),
                direct_path_chance: Some(0.25),
                boundary_density: Some(0.7),
                ..Default::default()
            },
        ),
        phase(
            120.0,
            TunableOverrides {
                spawn_count: Some(5),
                spawn_interval: Some(0.8),
                tracking_chance: Some(0.17),
                boundary_density: Some(0.8),
                ..Default::default()
            },
        ),
        phase(
            180.0,
            TunableOverrides {
                spawn_count: Some(6),
                spawn_interval: Some(0.7),
                boundary_density: Some(0.9),
                boundary_distance: Some(30.0),
                ..Default::default()
            },
        ),
    ]
}

fn default_checkpoints() -> Vec<DistanceCheckpoint> {
    // (distance, count, interval, tracking, direct, max hazards, density)
    let table: [(f32, u32, Option<f32>, f32, Option<f32>, Option<u32>, f32); 7] = [
        (500.0, 3, None, 0.15, None, None, 0.6),
        (1000.0, 4, Some(0.85), 0.18, Some(0.25), Some(60), 0.7),
        (2000.0, 5, Some(0.8), 0.2, Some(0.28), Some(70), 0.8),
        (3000.0, 6, Some(0.7), 0.22, Some(0.3), Some(80), 0.9),
        (5000.0, 7, Some(0.6), 0.25, Some(0.32), Some(90), 1.0),
        (7500.0, 8, Some(0.5), 0.28, Some(0.35), Some(100), 1.0),
        (10000.0, 10, Some(0.4), 0.3, Some(0.4), Some(110), 1.0),
    ];
    table
        .iter()
        .map(|&(distance, count, interval, tracking, direct, max, density)| {
            checkpoint(
                distance,
                TunableOverrides {
                    spawn_count: Some(count),
                    spawn_interval: interval,
                    tracking_chance: Some(tracking),
                    direct_path_chance: direct,
                    max_hazards: max,
                    boundary_density: Some(density),
                    boundary_distance: None,
                },
            )
        })
        .collect()
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_distance: -1600.0,
            despawn_distance: 50.0,
            boundary_spawn_interval: 1.0,
            path_spawn_interval: 0.3,
            pool_capacity: 100,
            hazard_model_extent: Vec3::splat(40.0),
            hitbox_ratio: 0.8,
            base_damage: 10.0,
            boundary_speed_cap: 30.0,
            boundary_speed_ramp: 1.02,
            field_half_width: 200.0,
            field_half_height: 120.0,

            min_scale_factor: 0.2,
            max_scale_factor: 1.0,
            scaling_start_distance: 1500.0,
            scaling_end_distance: 200.0,

            history_len: 10,
            history_sample_interval: 0.5,

            initial_tunables: Tunables::default(),
            time_phases: default_time_phases(),
            distance_checkpoints: default_checkpoints(),

            collectible_spawn_distance: -800.0,
            collectible_despawn_distance: 50.0,
            collectible_spawn_interval: 5.0,
            collectible_scale: 8.0,
            collectible_model_extent: Vec3::ONE,
            reveal_duration: 1.5,
            reveal_frame_interval: 0.15,
            bob_height: 0.5,
            bob_frequency: 1.5 * std::f32::consts::PI,

            indestructible_duration: 7.0,
            laser_duration: 7.0,
            laser_range: 1000.0,
            laser_offset: 2.0,
            gravity_shift_duration: 7.0,
            gravity_radius: 150.0,
            gravity_base_force: 20.0,
            health_bonus: 10,
            ammo_bonus: 10,

            max_frame_dt: crate::consts::MAX_FRAME_DT,
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            expected: "positive",
        })
    }
}

impl Tuning {
    /// Parse and validate a JSON balance table
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.spawn_distance.is_finite() && self.spawn_distance < 0.0) {
            return Err(TuningError::OutOfRange {
                name: "spawn_distance",
                value: self.spawn_distance,
                expected: "negative (ahead of the player)",
            });
        }
        if !(self.collectible_spawn_distance.is_finite() && self.collectible_spawn_distance < 0.0) {
            return Err(TuningError::OutOfRange {
                name: "collectible_spawn_distance",
                value: self.collectible_spawn_distance,
                expected: "negative (ahead of the player)",
            });
        }
        positive("despawn_distance", self.despawn_distance)?;
        positive("collectible_despawn_distance", self.collectible_despawn_distance)?;
        positive("boundary_spawn_interval", self.boundary_spawn_interval)?;
        positive("path_spawn_interval", self.path_spawn_interval)?;
        positive("collectible_spawn_interval", self.collectible_spawn_interval)?;
        positive("history_sample_interval", self.history_sample_interval)?;
        positive("reveal_frame_interval", self.reveal_frame_interval)?;
        positive("spawn_interval", self.initial_tunables.spawn_interval)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        positive("laser_range", self.laser_range)?;
        positive("gravity_radius", self.gravity_radius)?;
        positive("field_half_width", self.field_half_width)?;
        positive("field_half_height", self.field_half_height)?;

        if self.pool_capacity == 0 {
            return Err(TuningError::OutOfRange {
                name: "pool_capacity",
                value: 0.0,
                expected: "at least 1",
            });
        }
        if self.history_len < 3 {
            return Err(TuningError::OutOfRange {
                name: "history_len",
                value: self.history_len as f32,
                expected: "at least 3",
            });
        }
        if self.scaling_start_distance <= self.scaling_end_distance {
            return Err(TuningError::OutOfRange {
                name: "scaling_start_distance",
                value: self.scaling_start_distance,
                expected: "greater than scaling_end_distance",
            });
        }
        if self.min_scale_factor > self.max_scale_factor {
            return Err(TuningError::OutOfRange {
                name: "min_scale_factor",
                value: self.min_scale_factor,
                expected: "no larger than max_scale_factor",
            });
        }

        let mut previous = 0.0;
        for (index, checkpoint) in self.distance_checkpoints.iter().enumerate() {
            if !(checkpoint.distance.is_finite() && checkpoint.distance > previous) {
                return Err(TuningError::CheckpointOrder { index });
            }
            if let Some(interval) = checkpoint.ratchet.spawn_interval {
                positive("checkpoint spawn_interval", interval)?;
            }
            previous = checkpoint.distance;
        }

        let mut previous = f32::NEG_INFINITY;
        for (index, phase) in self.time_phases.iter().enumerate() {
            if !(phase.after_secs.is_finite() && phase.after_secs > previous) {
                return Err(TuningError::PhaseOrder { index });
            }
            if let Some(interval) = phase.set.spawn_interval {
                positive("phase spawn_interval", interval)?;
            }
            previous = phase.after_secs;
        }
        Ok(())
    }

    pub fn scale_curve(&self) -> ScaleCurve {
        ScaleCurve {
            min_factor: self.min_scale_factor,
            max_factor: self.max_scale_factor,
            start_distance: self.scaling_start_distance,
            end_distance: self.scaling_end_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.distance_checkpoints.len(), 7);
        assert_eq!(tuning.time_phases.len(), 4);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let tuning = Tuning::from_json(r#"{ "pool_capacity": 5, "laser_duration": 3.0 }"#).unwrap();
        assert_eq!(tuning.pool_capacity, 5);
        assert_eq!(tuning.laser_duration, 3.0);
        assert_eq!(tuning.spawn_distance, -1600.0);
        assert_eq!(tuning.distance_checkpoints, Tuning::default().distance_checkpoints);
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = Tuning::from_json(r#"{ "pool_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { name: "pool_capacity", .. }));

        let err = Tuning::from_json(r#"{ "path_spawn_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { name: "path_spawn_interval", .. }));

        let err = Tuning::from_json(
            r#"{ "scaling_start_distance": 100.0, "scaling_end_distance": 200.0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { .. }));
    }

    #[test]
    fn test_rejects_unordered_checkpoints() {
        let mut tuning = Tuning::default();
        tuning.distance_checkpoints.swap(1, 2);
        assert!(matches!(tuning.validate(), Err(TuningError::CheckpointOrder { index: 2 })));

        let mut tuning = Tuning::default();
        tuning.time_phases.swap(0, 3);
        assert!(matches!(tuning.validate(), Err(TuningError::PhaseOrder { index: 1 })));
    }
}
