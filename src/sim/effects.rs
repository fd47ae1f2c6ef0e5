//! Power-up effects
//!
//! Instant effects (invincibility grant, health, ammo) go straight to the
//! world. Timed effects (laser, gravity shift) keep a countdown here, own a
//! scene artifact that follows the ship while active and revert on expiry.
//! The laser burns through every hazard in its beam each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collectible::PowerUpKind;
use super::hazard::Hazard;
use super::hazard_field::HazardField;
use super::world::{EntityId, EntityIds, EntityKind, Frame, PlayerState, SceneEntity};
use crate::tuning::Tuning;

/// Reference frame rate the repulsion force was tuned at
const REPULSION_REFERENCE_FPS: f32 = 60.0;
/// Inner zone (fraction of the radius) with the stronger falloff
const INNER_ZONE: f32 = 0.4;
const INNER_BOOST: f32 = 1.8;
const INNER_EXPONENT: f32 = 0.6;
/// Extra forward push for hazards still ahead of the player
const FORWARD_PUSH: f32 = 0.8;

/// Remaining time on each timed effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectState {
    pub laser_remaining: Option<f32>,
    pub gravity_remaining: Option<f32>,
}

/// Repulsion force magnitude at `distance` from the player
pub fn repulsion_force(distance: f32, radius: f32, base_force: f32) -> f32 {
    if distance >= radius {
        return 0.0;
    }
    let inner = radius * INNER_ZONE;
    if distance < inner {
        base_force * INNER_BOOST * (1.0 - (distance / inner).powf(INNER_EXPONENT))
    } else {
        base_force * (1.0 - (distance / radius).min(1.0))
    }
}

/// Applies power-up effects and runs their timers
#[derive(Debug, Clone)]
pub struct EffectCoordinator {
    state: EffectState,
    laser_artifact: Option<EntityId>,
    gravity_artifact: Option<EntityId>,

    indestructible_duration: f32,
    laser_duration: f32,
    laser_range: f32,
    laser_offset: f32,
    gravity_shift_duration: f32,
    gravity_radius: f32,
    gravity_base_force: f32,
    health_bonus: u32,
    ammo_bonus: u32,
}

impl EffectCoordinator {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            state: EffectState::default(),
            laser_artifact: None,
            gravity_artifact: None,
            indestructible_duration: tuning.indestructible_duration,
            laser_duration: tuning.laser_duration,
            laser_range: tuning.laser_range,
            laser_offset: tuning.laser_offset,
            gravity_shift_duration: tuning.gravity_shift_duration,
            gravity_radius: tuning.gravity_radius,
            gravity_base_force: tuning.gravity_base_force,
            health_bonus: tuning.health_bonus,
            ammo_bonus: tuning.ammo_bonus,
        }
    }

    pub fn state(&self) -> &EffectState {
        &self.state
    }

    pub fn laser_active(&self) -> bool {
        self.state.laser_remaining.is_some()
    }

    pub fn gravity_active(&self) -> bool {
        self.state.gravity_remaining.is_some()
    }

    /// Where the beam artifact sits for a ship at `position`
    fn laser_anchor(&self, position: Vec3) -> Vec3 {
        position - Vec3::Z * self.laser_offset
    }

    /// Start a power-up effect
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        player: &PlayerState,
        ids: &mut EntityIds,
        frame: &mut Frame,
    ) {
        match kind {
            PowerUpKind::Indestructible => {
                frame.world.activate_invincibility(self.indestructible_duration);
            }
            PowerUpKind::Health => frame.world.add_health(self.health_bonus),
            PowerUpKind::Ammo => frame.world.add_ammo(self.ammo_bonus),
            PowerUpKind::Laser => {
                frame.world.enable_laser();
                if self.laser_artifact.is_none() {
                    let id = ids.next_id();
                    frame.scene.add(SceneEntity {
                        id,
                        kind: EntityKind::LaserBeam,
                        position: self.laser_anchor(player.position),
                        scale: Vec3::ONE,
                    });
                    self.laser_artifact = Some(id);
                }
                self.state.laser_remaining = Some(self.laser_duration);
            }
            PowerUpKind::GravityShift => {
                if self.gravity_artifact.is_none() {
                    let id = ids.next_id();
                    frame.scene.add(SceneEntity {
                        id,
                        kind: EntityKind::GravityField,
                        position: player.position,
                        scale: Vec3::splat(self.gravity_radius),
                    });
                    self.gravity_artifact = Some(id);
                }
                self.state.gravity_remaining = Some(self.gravity_shift_duration);
                frame.fx.apply_screen_shake(0.3, 0.5);
            }
        }
        log::info!("{} activated", kind.as_str());
        frame.fx.power_up_activated(kind);
    }

    /// Push hazards away from the player
    fn repel(&self, dt: f32, player: &PlayerState, hazards: &mut [Hazard]) {
        let scale = dt * REPULSION_REFERENCE_FPS;
        for hazard in hazards {
            let offset = hazard.position - player.position;
            let distance = offset.length();
            if distance >= self.gravity_radius || distance <= 0.0 {
                continue;
            }
            let force = repulsion_force(distance, self.gravity_radius, self.gravity_base_force) * scale;
            hazard.position += offset / distance * force;
            if hazard.position.z < player.position.z {
                hazard.position.z -= force * FORWARD_PUSH;
            }
        }
    }

    /// Advance timers and continuous effects. Returns hazards the laser destroyed.
    pub fn update(
        &mut self,
        dt: f32,
        player: &PlayerState,
        hazards: &mut HazardField,
        frame: &mut Frame,
    ) -> u32 {
        let mut laser_kills = 0;
        if let Some(remaining) = self.state.laser_remaining {
            laser_kills = hazards.laser_sweep(player.position, self.laser_range, frame);
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.state.laser_remaining = None;
                frame.world.disable_laser();
                if let Some(id) = self.laser_artifact.take() {
                    frame.scene.remove(id);
                }
                log::info!("Laser expired");
            } else {
                self.state.laser_remaining = Some(remaining);
                if let Some(id) = self.laser_artifact {
                    frame.scene.move_to(id, self.laser_anchor(player.position));
                }
            }
        }

        if let Some(remaining) = self.state.gravity_remaining {
            self.repel(dt, player, hazards.hazards_mut());
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.state.gravity_remaining = None;
                if let Some(id) = self.gravity_artifact.take() {
                    frame.scene.remove(id);
                }
                log::info!("Gravity shift expired");
            } else {
                self.state.gravity_remaining = Some(remaining);
                if let Some(id) = self.gravity_artifact {
                    frame.scene.move_to(id, player.position);
                }
            }
        }

        if laser_kills > 0 {
            log::debug!("Laser destroyed {laser_kills} hazards");
        }
        laser_kills
    }
}
