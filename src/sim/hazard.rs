//! Hazard (asteroid) records and speed tiers

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::world::{EntityId, EntityKind, SceneEntity};

/// Speed above which a hazard is ultra-fast
pub const ULTRA_FAST_SPEED: f32 = 35.0;
/// Speed above which a hazard is fast
pub const FAST_SPEED: f32 = 25.0;
/// Speed at or above which a hazard is normal (below is slow)
pub const NORMAL_SPEED: f32 = 12.0;
/// Speed above which rotation doubles
pub const BRISK_ROTATION_SPEED: f32 = 18.0;

/// Spawn policy a hazard was created under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Population {
    /// General field scatter
    Ambient,
    /// Wall-forming fence at the field edges
    Boundary,
    /// Dense filler straight ahead of the player
    PathFiller,
}

/// Speed-based classification driving visuals, damage and durability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTier {
    Slow,
    Normal,
    Fast,
    UltraFast,
}

impl SpeedTier {
    pub fn classify(speed: f32) -> Self {
        if speed > ULTRA_FAST_SPEED {
            SpeedTier::UltraFast
        } else if speed > FAST_SPEED {
            SpeedTier::Fast
        } else if speed >= NORMAL_SPEED {
            SpeedTier::Normal
        } else {
            SpeedTier::Slow
        }
    }

    /// Multiplier applied to collision damage and shake
    pub fn damage_multiplier(self) -> f32 {
        match self {
            SpeedTier::UltraFast => 2.0,
            SpeedTier::Fast => 1.5,
            _ => 1.0,
        }
    }

    /// Projectile hits needed to destroy a hazard of this tier (`None` = one)
    pub fn hit_points(self) -> Option<u8> {
        match self {
            SpeedTier::UltraFast => Some(3),
            SpeedTier::Fast => Some(2),
            _ => None,
        }
    }

    /// Visual tag color
    pub fn tint(self) -> u32 {
        match self {
            SpeedTier::UltraFast => 0xff4400,
            SpeedTier::Fast => 0xffbb44,
            SpeedTier::Normal => 0xffffff,
            SpeedTier::Slow => 0xd0d0d0,
        }
    }

    /// Size adjustment relative to the rolled base scale
    pub fn scale_adjustment(self) -> Vec3 {
        match self {
            // Elongated along the direction of travel
            SpeedTier::UltraFast => Vec3::new(0.8, 0.8, 1.2),
            SpeedTier::Fast => Vec3::splat(0.9),
            SpeedTier::Normal => Vec3::ONE,
            SpeedTier::Slow => Vec3::splat(1.15),
        }
    }
}

/// Rotation multiplier for a given forward speed
#[inline]
pub fn rotation_multiplier(speed: f32) -> f32 {
    if speed > FAST_SPEED {
        3.0
    } else if speed > BRISK_ROTATION_SPEED {
        2.0
    } else {
        1.0
    }
}

/// Per-hazard sinusoidal jitter, only applied to fast tiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub x_freq: f32,
    pub y_freq: f32,
    pub x_amp: f32,
    pub y_amp: f32,
    pub phase: f32,
}

impl Oscillation {
    /// Offset for this tick at simulation time `t`
    #[inline]
    pub fn offset(&self, t: f32) -> Vec2 {
        Vec2::new(
            (t * self.x_freq + self.phase).sin() * self.x_amp,
            (t * self.y_freq + self.phase).cos() * self.y_amp,
        )
    }
}

/// Everything the spawn planner decides about a new hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardPlan {
    pub population: Population,
    pub position: Vec3,
    pub speed: f32,
    pub lateral: Vec2,
    pub rotation_speed: Vec3,
    pub base_scale: Vec3,
    pub oscillation: Oscillation,
    pub tracking: Option<f32>,
    pub hit_points: Option<u8>,
    pub tint: u32,
}

/// A hazard record. Render handles live on the host, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: EntityId,
    pub population: Population,
    pub position: Vec3,
    /// Forward speed toward the player (+z)
    pub speed: f32,
    /// Lateral drift (units/sec)
    pub lateral: Vec2,
    pub rotation: Vec3,
    pub rotation_speed: Vec3,
    pub base_scale: Vec3,
    pub scale: Vec3,
    pub base_hitbox: Vec3,
    pub hitbox: Vec3,
    pub oscillation: Oscillation,
    /// Homing strength, if this hazard tracks the player
    pub tracking: Option<f32>,
    /// Remaining projectile hits before destruction
    pub hit_points: Option<u8>,
    pub tint: u32,
    /// Chipped by a projectile but still flying
    pub damaged: bool,
}

impl Hazard {
    /// Blank record, only meaningful after `configure`
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            population: Population::Ambient,
            position: Vec3::ZERO,
            speed: 0.0,
            lateral: Vec2::ZERO,
            rotation: Vec3::ZERO,
            rotation_speed: Vec3::ZERO,
            base_scale: Vec3::ONE,
            scale: Vec3::ONE,
            base_hitbox: Vec3::ONE,
            hitbox: Vec3::ONE,
            oscillation: Oscillation::default(),
            tracking: None,
            hit_points: None,
            tint: SpeedTier::Normal.tint(),
            damaged: false,
        }
    }

    /// Reset a fresh or recycled record from a plan. Keeps the id.
    pub fn configure(&mut self, plan: &HazardPlan, model_extent: Vec3, hitbox_ratio: f32) {
        self.population = plan.population;
        self.position = plan.position;
        self.speed = plan.speed;
        self.lateral = plan.lateral;
        self.rotation = Vec3::ZERO;
        self.rotation_speed = plan.rotation_speed;
        self.base_scale = plan.base_scale;
        self.scale = plan.base_scale;
        self.base_hitbox = model_extent * plan.base_scale * hitbox_ratio;
        self.hitbox = self.base_hitbox;
        self.oscillation = plan.oscillation;
        self.tracking = plan.tracking;
        self.hit_points = plan.hit_points;
        self.tint = plan.tint;
        self.damaged = false;
    }

    pub fn tier(&self) -> SpeedTier {
        SpeedTier::classify(self.speed)
    }

    /// Apply a size factor to both the visual scale and the hitbox
    pub fn apply_scale_factor(&mut self, factor: f32) {
        self.scale = self.base_scale * factor;
        self.hitbox = self.base_hitbox * factor;
    }

    /// Corrupted records are recycled rather than simulated
    pub fn is_sane(&self) -> bool {
        self.position.is_finite() && self.speed.is_finite() && self.lateral.is_finite()
    }

    pub fn scene_entity(&self) -> SceneEntity {
        SceneEntity {
            id: self.id,
            kind: EntityKind::Hazard {
                population: self.population,
                tier: self.tier(),
                tint: self.tint,
            },
            position: self.position,
            scale: self.scale,
        }
    }
}
