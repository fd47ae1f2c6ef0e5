//! Spawn planning
//!
//! Pure placement math: given the player's kinematics, the movement trend and
//! the current difficulty, decide where a new hazard or collectible goes and
//! how it moves. Planning never touches the scene; it only consumes the RNG.

use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_3, TAU};

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use super::collectible::PowerUpKind;
use super::difficulty::Tunables;
use super::hazard::{HazardPlan, Oscillation, Population, SpeedTier};
use super::world::PlayerState;
use crate::tuning::Tuning;

/// Uniform sample in `[min, max)`, or `min` when the range is empty
#[inline]
pub(crate) fn rand_range(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min { rng.random_range(min..max) } else { min }
}

#[inline]
fn spread(rng: &mut Pcg32, half: f32) -> f32 {
    rand_range(rng, -half, half)
}

fn rand_vec3(rng: &mut Pcg32, half: f32) -> Vec3 {
    Vec3::new(spread(rng, half), spread(rng, half), spread(rng, half))
}

/// Rolling window of player positions used to estimate where the player is
/// heading
#[derive(Debug, Clone)]
pub struct TrendTracker {
    samples: VecDeque<(f32, Vec2)>,
    capacity: usize,
    interval: f32,
    clock: f32,
    last_sample: Option<f32>,
}

impl TrendTracker {
    pub fn new(capacity: usize, interval: f32) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            interval,
            clock: 0.0,
            last_sample: None,
        }
    }

    /// Advance the clock and record a sample when one is due
    pub fn observe(&mut self, dt: f32, position: Vec2) {
        self.clock += dt;
        let due = match self.last_sample {
            Some(t) => self.clock - t >= self.interval,
            None => true,
        };
        if !due || !position.is_finite() {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back((self.clock, position));
        self.last_sample = Some(self.clock);
    }

    /// Average xy velocity across the window (zero until 3 samples exist)
    pub fn trend(&self) -> Vec2 {
        if self.samples.len() < 3 {
            return Vec2::ZERO;
        }
        let (Some(&(t0, oldest)), Some(&(t1, newest))) = (self.samples.front(), self.samples.back())
        else {
            return Vec2::ZERO;
        };
        let dt = t1 - t0;
        if dt > 0.0 { (newest - oldest) / dt } else { Vec2::ZERO }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Inputs shared by every plan made during one tick
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub player: &'a PlayerState,
    pub trend: Vec2,
    pub tunables: &'a Tunables,
}

impl SpawnContext<'_> {
    fn speed_factor(&self) -> f32 {
        self.player.speed_factor()
    }

    fn predicted(&self, lookahead: f32) -> Vec2 {
        self.player.position.truncate() + self.trend * lookahead
    }
}

/// Wall a boundary hazard spawns in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryZone {
    Left,
    Right,
    Top,
    Bottom,
    FarAhead,
}

impl BoundaryZone {
    const ALL: [BoundaryZone; 5] = [
        BoundaryZone::Left,
        BoundaryZone::Right,
        BoundaryZone::Top,
        BoundaryZone::Bottom,
        BoundaryZone::FarAhead,
    ];

    /// Is the player steering into this wall?
    fn targeted_by(self, velocity: Vec2) -> bool {
        match self {
            BoundaryZone::Left => velocity.x < -0.3,
            BoundaryZone::Right => velocity.x > 0.3,
            BoundaryZone::Top => velocity.y > 0.3,
            BoundaryZone::Bottom => velocity.y < -0.3,
            BoundaryZone::FarAhead => false,
        }
    }
}

/// Bluish tag for boundary hazards that did not roll a fast tier
const BOUNDARY_TINT: u32 = 0xc8d4ff;
const TRACKING_TINT: u32 = 0xff6666;
const PATH_TRACKING_TINT: u32 = 0xb3b9ff;
const PATH_TINT: u32 = 0xaaccff;

/// Where and what to spawn next
#[derive(Debug, Clone)]
pub struct SpawnPlanner {
    spawn_distance: f32,
    field_half: Vec2,
    collectible_spawn_distance: f32,
}

/// Result of the speed-tier roll
#[derive(Debug, Clone, Copy)]
struct SpeedRoll {
    speed: f32,
    fast: bool,
}

impl SpawnPlanner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn_distance: tuning.spawn_distance,
            field_half: Vec2::new(tuning.field_half_width, tuning.field_half_height),
            collectible_spawn_distance: tuning.collectible_spawn_distance,
        }
    }

    /// Draw a speed from the tier table.
    ///
    /// `normal_range` lets boundary hazards in a targeted wall roll faster
    /// normals; `normal_boost` is the speed-factor coefficient for that tier.
    fn roll_speed(rng: &mut Pcg32, sf: f32, normal_range: (f32, f32), normal_boost: f32) -> SpeedRoll {
        let roll: f32 = rng.random();
        if roll < 0.12 {
            SpeedRoll {
                speed: rand_range(rng, 36.0, 60.0) * (sf * 0.4).max(1.0),
                fast: true,
            }
        } else if roll < 0.35 {
            SpeedRoll {
                speed: rand_range(rng, 26.0, 35.0) * (sf * 0.3).max(1.0),
                fast: true,
            }
        } else if roll < 0.70 {
            SpeedRoll {
                speed: rand_range(rng, normal_range.0, normal_range.1) * (sf * normal_boost).max(1.0),
                fast: false,
            }
        } else {
            SpeedRoll {
                speed: rand_range(rng, 6.0, 12.0) * (sf * 0.05).max(1.0),
                fast: false,
            }
        }
    }

    fn roll_oscillation(rng: &mut Pcg32, tier: SpeedTier) -> Oscillation {
        let (freq, amp) = if tier == SpeedTier::UltraFast {
            ((0.5, 2.0), (0.1, 0.4))
        } else {
            ((0.3, 1.0), (0.05, 0.2))
        };
        Oscillation {
            x_freq: rand_range(rng, freq.0, freq.1),
            y_freq: rand_range(rng, freq.0, freq.1),
            x_amp: rand_range(rng, amp.0, amp.1),
            y_amp: rand_range(rng, amp.0, amp.1),
            phase: rand_range(rng, 0.0, TAU),
        }
    }

    /// Plan one ambient hazard
    pub fn plan_ambient(&self, ctx: &SpawnContext, rng: &mut Pcg32) -> HazardPlan {
        let player = ctx.player;
        let sf = ctx.speed_factor();
        let adjusted_distance = self.spawn_distance * (0.8 * sf).max(1.0);
        let predicted = ctx.predicted(3.0 * sf);
        let half = self.field_half;
        let direct = ctx.tunables.direct_path_chance;

        let roll: f32 = rng.random();
        let position = if roll < direct {
            Vec3::new(
                predicted.x + spread(rng, 35.0),
                predicted.y + spread(rng, 35.0),
                player.position.z + adjusted_distance * 0.7,
            )
        } else if roll < direct + 0.3 {
            let dir = player.movement_direction;
            Vec3::new(
                predicted.x + dir.x * half.x * 0.7 + spread(rng, 30.0),
                predicted.y + dir.y * half.y * 0.7 + spread(rng, 30.0),
                player.position.z + adjusted_distance,
            )
        } else if roll < direct + 0.7 {
            const COLUMNS: u32 = 6;
            const ROWS: u32 = 4;
            let column = if rng.random_bool(0.7) {
                if rng.random_bool(0.5) { 0 } else { COLUMNS - 1 }
            } else {
                rng.random_range(0..COLUMNS)
            };
            let row = rng.random_range(0..ROWS);
            let cell = Vec2::new(half.x * 2.0 / COLUMNS as f32, half.y * 2.0 / ROWS as f32);
            Vec3::new(
                predicted.x - half.x + column as f32 * cell.x + rand_range(rng, 0.0, cell.x),
                predicted.y - half.y + row as f32 * cell.y + rand_range(rng, 0.0, cell.y),
                player.position.z + adjusted_distance,
            )
        } else {
            let radius = rand_range(rng, 40.0, 100.0);
            let angle = rand_range(rng, 0.0, TAU);
            Vec3::new(
                predicted.x + angle.cos() * radius,
                predicted.y + angle.sin() * radius,
                player.position.z - rand_range(rng, 40.0, 120.0),
            )
        };

        let rolled = Self::roll_speed(rng, sf, (12.0, 22.0), 0.1);
        let mut speed = rolled.speed;

        let mut lateral = Vec2::new(spread(rng, 12.0), spread(rng, 8.0));
        let offset = position.truncate() - predicted;
        if offset.x.abs() > half.x * 0.6 {
            lateral.x = if offset.x > 0.0 {
                rand_range(rng, -15.0, -5.0)
            } else {
                rand_range(rng, 5.0, 15.0)
            };
        }
        if offset.y.abs() > half.y * 0.6 {
            lateral.y = if offset.y > 0.0 {
                rand_range(rng, -10.0, -4.0)
            } else {
                rand_range(rng, 4.0, 10.0)
            };
        }

        let tracking = if rng.random::<f32>() < ctx.tunables.tracking_chance {
            speed *= 0.8;
            Some(0.5)
        } else {
            None
        };

        let tier = SpeedTier::classify(speed);
        let base_scale = Vec3::splat(rand_range(rng, 0.015, 0.055)) * tier.scale_adjustment();
        let rotation_speed = rand_vec3(rng, 0.5);
        let oscillation = Self::roll_oscillation(rng, tier);
        let tint = if tracking.is_some() && !rolled.fast {
            TRACKING_TINT
        } else {
            tier.tint()
        };

        HazardPlan {
            population: Population::Ambient,
            position,
            speed,
            lateral,
            rotation_speed,
            base_scale,
            oscillation,
            tracking,
            hit_points: tier.hit_points(),
            tint,
        }
    }

    /// Zone weights for the boundary fence, skewed toward where the player is
    /// heading
    pub fn boundary_weights(trend: Vec2, speed_factor: f32) -> [f32; 5] {
        let mut weights = [0.25, 0.25, 0.25, 0.25, 0.0];
        if trend.x.abs() <= 0.2 && trend.y.abs() <= 0.2 {
            return weights;
        }
        let norm = trend.normalize_or_zero();
        if norm.x < -0.3 {
            weights[0] += 0.4;
        } else if norm.x > 0.3 {
            weights[1] += 0.4;
        }
        if norm.y > 0.3 {
            weights[2] += 0.4;
        } else if norm.y < -0.3 {
            weights[3] += 0.4;
        }
        weights[4] = 0.3 * speed_factor;

        let total: f32 = weights.iter().sum();
        if total > 0.0 {
            for w in &mut weights {
                *w /= total;
            }
        }
        weights
    }

    fn pick_zone(rng: &mut Pcg32, weights: &[f32; 5]) -> BoundaryZone {
        let roll: f32 = rng.random();
        let mut cumulative = 0.0;
        for (zone, weight) in BoundaryZone::ALL.iter().zip(weights) {
            cumulative += weight;
            if roll < cumulative {
                return *zone;
            }
        }
        BoundaryZone::Left
    }

    /// Plan one boundary (fence) hazard
    pub fn plan_boundary(&self, ctx: &SpawnContext, rng: &mut Pcg32) -> HazardPlan {
        let player = ctx.player;
        let sf = ctx.speed_factor();
        let weights = Self::boundary_weights(ctx.trend, sf);
        let zone = Self::pick_zone(rng, &weights);

        let predicted = ctx.predicted(2.5 * sf);
        let boundary_distance = ctx.tunables.boundary_distance;
        let dist = boundary_distance * (1.5 + 0.5 * sf) * rand_range(rng, 1.0, 1.8);
        let inward = (0.5 * sf).max(1.0);
        let wall_z = player.position.z + rand_range(rng, -220.0 * sf, 20.0);

        let (position, lateral) = match zone {
            BoundaryZone::Left => (
                Vec3::new(predicted.x - dist, predicted.y + spread(rng, dist), wall_z),
                Vec2::new(rand_range(rng, 5.0, 12.0) * inward, 0.0),
            ),
            BoundaryZone::Right => (
                Vec3::new(predicted.x + dist, predicted.y + spread(rng, dist), wall_z),
                Vec2::new(rand_range(rng, -12.0, -5.0) * inward, 0.0),
            ),
            BoundaryZone::Top => (
                Vec3::new(predicted.x + spread(rng, dist), predicted.y + dist, wall_z),
                Vec2::new(0.0, rand_range(rng, -12.0, -5.0) * inward),
            ),
            BoundaryZone::Bottom => (
                Vec3::new(predicted.x + spread(rng, dist), predicted.y - dist, wall_z),
                Vec2::new(0.0, rand_range(rng, 5.0, 12.0) * inward),
            ),
            BoundaryZone::FarAhead => {
                let xy = predicted + Vec2::new(spread(rng, 80.0), spread(rng, 80.0));
                let z = player.position.z + self.spawn_distance * (2.2 + 0.6 * sf);
                let toward = (predicted - xy).normalize_or_zero();
                let pull = (0.6 * sf).max(1.0);
                let lateral = Vec2::new(
                    toward.x * rand_range(rng, 3.0, 6.0) * pull,
                    toward.y * rand_range(rng, 3.0, 6.0) * pull,
                );
                (xy.extend(z), lateral)
            }
        };

        let distance_factor = if boundary_distance > 0.0 {
            1.0 + (dist / boundary_distance - 1.0) * 0.7
        } else {
            1.0
        };
        let raw_scale = rand_range(rng, 0.02, 0.06) * distance_factor;
        let rotation_speed = rand_vec3(rng, 0.6);

        let rolled = if zone.targeted_by(player.velocity) {
            Self::roll_speed(rng, sf, (14.0, 22.0), 0.2)
        } else {
            Self::roll_speed(rng, sf, (12.0, 18.0), 0.1)
        };
        let tier = SpeedTier::classify(rolled.speed);
        let oscillation = Self::roll_oscillation(rng, tier);
        let tint = if rolled.fast { tier.tint() } else { BOUNDARY_TINT };

        HazardPlan {
            population: Population::Boundary,
            position,
            speed: rolled.speed,
            lateral,
            rotation_speed,
            base_scale: Vec3::splat(raw_scale) * tier.scale_adjustment(),
            oscillation,
            tracking: None,
            hit_points: tier.hit_points(),
            tint,
        }
    }

    /// Plan one path-filler hazard
    pub fn plan_path_filler(&self, ctx: &SpawnContext, rng: &mut Pcg32) -> HazardPlan {
        let player = ctx.player;
        let sf = ctx.speed_factor();
        let dir = player.movement_direction;
        let position = Vec3::new(
            player.position.x + dir.x * 0.7 * 20.0 + spread(rng, 350.0),
            player.position.y + dir.y * 0.7 * 10.0 + spread(rng, 350.0),
            player.position.z + self.spawn_distance * (0.5 * sf).max(1.0),
        );
        let base_scale = Vec3::splat(rand_range(rng, 0.05, 0.2));
        let speed = rand_range(rng, 15.0, 25.0) * sf;
        let rotation_speed = rand_vec3(rng, 0.3);
        let lateral = Vec2::new(spread(rng, 2.0), spread(rng, 1.0));

        let tracking = if rng.random::<f32>() < 0.25 + 0.05 * sf {
            Some(rand_range(rng, 0.2, 0.5))
        } else {
            None
        };
        let tier = SpeedTier::classify(speed);
        let oscillation = Self::roll_oscillation(rng, tier);

        HazardPlan {
            population: Population::PathFiller,
            position,
            speed,
            lateral,
            rotation_speed,
            base_scale,
            oscillation,
            tracking,
            hit_points: tier.hit_points(),
            tint: if tracking.is_some() { PATH_TRACKING_TINT } else { PATH_TINT },
        }
    }

    /// Position and kind for the next collectible
    pub fn plan_collectible(&self, ctx: &SpawnContext, rng: &mut Pcg32) -> (Vec3, PowerUpKind) {
        let player = ctx.player;
        let sf = ctx.speed_factor();
        let distance = self.collectible_spawn_distance * (0.6 * sf).max(1.0);
        let predicted = ctx.predicted(1.5);

        let roll: f32 = rng.random();
        let position = if roll < 0.35 {
            Vec3::new(
                predicted.x + spread(rng, 3.0),
                predicted.y + spread(rng, 2.0),
                player.position.z + distance * 0.8,
            )
        } else if roll < 0.7 {
            let angle = ctx.trend.y.atan2(ctx.trend.x) + spread(rng, FRAC_PI_3);
            let offset = rand_range(rng, 4.0, 8.0);
            Vec3::new(
                predicted.x + angle.cos() * offset,
                predicted.y + angle.sin() * offset,
                player.position.z + distance * 0.9,
            )
        } else {
            let mut xy = Vec2::new(spread(rng, 12.0), spread(rng, 4.5));
            if ctx.trend.length() > 1.0 {
                xy += ctx.trend * rand_range(rng, 0.5, 1.5);
            }
            Vec3::new(xy.x, xy.y, player.position.z + distance)
        };

        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        (position, kind)
    }
}
