//! Difficulty progression
//!
//! Two drivers write into one set of tunables:
//! - Time phases set values directly once the run is old enough
//! - Distance checkpoints fire once each and ratchet values (max for floors,
//!   min for ceilings)
//!
//! Every ratchet is also folded into a persistent floor that is re-applied
//! after the time phases, so distance-earned difficulty never loosens.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Parameters consumed by the spawn planner and hazard field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    /// Ambient hazards per spawn wave (floor)
    pub spawn_count: u32,
    /// Seconds between ambient waves (ceiling)
    pub spawn_interval: f32,
    /// Probability an ambient hazard tracks the player (floor)
    pub tracking_chance: f32,
    /// Probability an ambient hazard lands on the predicted path (floor)
    pub direct_path_chance: f32,
    /// Cap on ambient + path-filler hazards (floor)
    pub max_hazards: u32,
    /// 0-1 density of the boundary fence (floor)
    pub boundary_density: f32,
    /// Fence distance from the player (ceiling)
    pub boundary_distance: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            spawn_count: 5,
            spawn_interval: 0.5,
            tracking_chance: 0.1,
            direct_path_chance: 0.2,
            max_hazards: 300,
            boundary_density: 1.0,
            boundary_distance: 100.0,
        }
    }
}

/// Partial parameter set; `None` leaves a tunable untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunableOverrides {
    pub spawn_count: Option<u32>,
    pub spawn_interval: Option<f32>,
    pub tracking_chance: Option<f32>,
    pub direct_path_chance: Option<f32>,
    pub max_hazards: Option<u32>,
    pub boundary_density: Option<f32>,
    pub boundary_distance: Option<f32>,
}

fn tighter<T: PartialOrd + Copy>(current: Option<T>, new: Option<T>, floor: bool) -> Option<T> {
    match (current, new) {
        (Some(a), Some(b)) => {
            let keep_new = if floor { b > a } else { b < a };
            Some(if keep_new { b } else { a })
        }
        (a, None) => a,
        (None, b) => b,
    }
}

impl TunableOverrides {
    /// Fold another ratchet into this one, keeping the tighter value per field
    pub fn merge_tighter(&mut self, other: &TunableOverrides) {
        self.spawn_count = tighter(self.spawn_count, other.spawn_count, true);
        self.spawn_interval = tighter(self.spawn_interval, other.spawn_interval, false);
        self.tracking_chance = tighter(self.tracking_chance, other.tracking_chance, true);
        self.direct_path_chance = tighter(self.direct_path_chance, other.direct_path_chance, true);
        self.max_hazards = tighter(self.max_hazards, other.max_hazards, true);
        self.boundary_density = tighter(self.boundary_density, other.boundary_density, true);
        self.boundary_distance = tighter(self.boundary_distance, other.boundary_distance, false);
    }
}

impl Tunables {
    /// Direct assignment (time phases)
    pub fn apply_direct(&mut self, set: &TunableOverrides) {
        if let Some(v) = set.spawn_count {
            self.spawn_count = v;
        }
        if let Some(v) = set.spawn_interval {
            self.spawn_interval = v;
        }
        if let Some(v) = set.tracking_chance {
            self.tracking_chance = v;
        }
        if let Some(v) = set.direct_path_chance {
            self.direct_path_chance = v;
        }
        if let Some(v) = set.max_hazards {
            self.max_hazards = v;
        }
        if let Some(v) = set.boundary_density {
            self.boundary_density = v;
        }
        if let Some(v) = set.boundary_distance {
            self.boundary_distance = v;
        }
    }

    /// Max/min ratchet (distance checkpoints)
    pub fn apply_ratchet(&mut self, set: &TunableOverrides) {
        if let Some(v) = set.spawn_count {
            self.spawn_count = self.spawn_count.max(v);
        }
        if let Some(v) = set.spawn_interval {
            self.spawn_interval = self.spawn_interval.min(v);
        }
        if let Some(v) = set.tracking_chance {
            self.tracking_chance = self.tracking_chance.max(v);
        }
        if let Some(v) = set.direct_path_chance {
            self.direct_path_chance = self.direct_path_chance.max(v);
        }
        if let Some(v) = set.max_hazards {
            self.max_hazards = self.max_hazards.max(v);
        }
        if let Some(v) = set.boundary_density {
            self.boundary_density = self.boundary_density.max(v);
        }
        if let Some(v) = set.boundary_distance {
            self.boundary_distance = self.boundary_distance.min(v);
        }
    }
}

/// Direct parameter set that applies once the run is older than `after_secs`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePhase {
    pub after_secs: f32,
    pub set: TunableOverrides,
}

/// Ratchet that fires once when the distance traveled reaches `distance`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceCheckpoint {
    pub distance: f32,
    pub ratchet: TunableOverrides,
}

/// Progress through the run plus the live tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    pub elapsed: f32,
    pub distance: f32,
    pub tunables: Tunables,
    /// Distance of the most recent checkpoint fired (0 = none)
    pub last_distance_checkpoint: f32,
    /// Accumulated distance ratchet, re-applied after time phases
    pub floor: TunableOverrides,
}

/// Advances `DifficultyState` once per tick
#[derive(Debug, Clone)]
pub struct DifficultyDirector {
    state: DifficultyState,
    time_phases: Vec<TimePhase>,
    checkpoints: Vec<DistanceCheckpoint>,
}

impl DifficultyDirector {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            state: DifficultyState {
                elapsed: 0.0,
                distance: 0.0,
                tunables: tuning.initial_tunables,
                last_distance_checkpoint: 0.0,
                floor: TunableOverrides::default(),
            },
            time_phases: tuning.time_phases.clone(),
            checkpoints: tuning.distance_checkpoints.clone(),
        }
    }

    pub fn state(&self) -> &DifficultyState {
        &self.state
    }

    pub fn tunables(&self) -> &Tunables {
        &self.state.tunables
    }

    /// Advance the clock and apply both drivers.
    ///
    /// `distance` is the total distance traveled so far. Returns the indices of
    /// the checkpoints that fired during this call.
    pub fn advance(&mut self, dt: f32, distance: f32) -> Vec<usize> {
        let state = &mut self.state;
        state.elapsed += dt;
        if distance.is_finite() && distance > state.distance {
            state.distance = distance;
        }

        for phase in &self.time_phases {
            if state.elapsed > phase.after_secs {
                state.tunables.apply_direct(&phase.set);
            }
        }

        let mut fired = Vec::new();
        for (index, checkpoint) in self.checkpoints.iter().enumerate() {
            if state.distance >= checkpoint.distance
                && state.last_distance_checkpoint < checkpoint.distance
            {
                state.last_distance_checkpoint = checkpoint.distance;
                state.floor.merge_tighter(&checkpoint.ratchet);
                log::info!(
                    "Distance checkpoint {} reached ({:.0} traveled): difficulty up",
                    checkpoint.distance,
                    state.distance
                );
                fired.push(index);
            }
        }

        let floor = state.floor;
        state.tunables.apply_ratchet(&floor);
        fired
    }
}
