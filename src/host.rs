//! Command-buffer host
//!
//! Implements the collaborator traits by recording every request as a
//! serializable [`HostCommand`]. The browser bridge ships the buffer to the
//! JavaScript scene each frame; the headless runner and tests inspect it.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::{
    EntityId, ExplosionKind, Frame, Fx, PlayerState, PowerUpKind, Projectile, Scene,
    SceneEntity, World,
};

/// One request from the simulation to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostCommand {
    AddEntity { entity: SceneEntity },
    RemoveEntity { id: EntityId },
    MoveEntity { id: EntityId, position: Vec3 },
    ConsumeProjectile { id: u32 },
    TakeDamage { amount: u32 },
    AddHealth { amount: u32 },
    AddAmmo { amount: u32 },
    EnableLaser,
    DisableLaser,
    ActivateInvincibility { duration: f32 },
    SpawnExplosion { position: Vec3, size: f32, kind: ExplosionKind },
    ScreenShake { intensity: f32, duration: f32 },
    AddScore { amount: u64 },
    PowerUpActivated { kind: PowerUpKind },
}

/// Player-side collaborator backed by host-supplied state
#[derive(Debug, Clone, Default)]
pub struct HostWorld {
    pub player: Option<PlayerState>,
    pub projectiles: Vec<Projectile>,
    /// Seconds left on the current invincibility grant
    invincible_remaining: Option<f32>,
    commands: Vec<HostCommand>,
}

impl HostWorld {
    pub fn invincible_remaining(&self) -> Option<f32> {
        self.invincible_remaining
    }

    /// Run host-side timers; call once per simulation step
    pub fn advance(&mut self, dt: f32) {
        let Some(remaining) = self.invincible_remaining else {
            return;
        };
        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.invincible_remaining = Some(remaining);
            return;
        }
        self.invincible_remaining = None;
        if let Some(player) = self.player.as_mut() {
            player.invincible = false;
        }
        log::info!("Invincibility expired");
    }
}

impl World for HostWorld {
    fn player(&self) -> Option<PlayerState> {
        self.player
    }

    fn projectiles(&self) -> Vec<Projectile> {
        self.projectiles.clone()
    }

    fn consume_projectile(&mut self, id: u32) {
        self.projectiles.retain(|p| p.id != id);
        self.commands.push(HostCommand::ConsumeProjectile { id });
    }

    fn take_damage(&mut self, amount: u32) {
        self.commands.push(HostCommand::TakeDamage { amount });
    }

    fn add_health(&mut self, amount: u32) {
        self.commands.push(HostCommand::AddHealth { amount });
    }

    fn add_ammo(&mut self, amount: u32) {
        self.commands.push(HostCommand::AddAmmo { amount });
    }

    fn enable_laser(&mut self) {
        self.commands.push(HostCommand::EnableLaser);
    }

    fn disable_laser(&mut self) {
        self.commands.push(HostCommand::DisableLaser);
    }

    fn activate_invincibility(&mut self, duration: f32) {
        if let Some(player) = self.player.as_mut() {
            player.invincible = true;
        }
        // A second grant restarts the countdown
        self.invincible_remaining = Some(duration);
        self.commands.push(HostCommand::ActivateInvincibility { duration });
    }
}

/// Scene collaborator that tracks which ids are currently displayed
#[derive(Debug, Clone, Default)]
pub struct HostScene {
    visible: BTreeSet<EntityId>,
    commands: Vec<HostCommand>,
}

impl HostScene {
    pub fn visible(&self) -> &BTreeSet<EntityId> {
        &self.visible
    }
}

impl Scene for HostScene {
    fn add(&mut self, entity: SceneEntity) {
        self.visible.insert(entity.id);
        self.commands.push(HostCommand::AddEntity { entity });
    }

    fn remove(&mut self, id: EntityId) {
        self.visible.remove(&id);
        self.commands.push(HostCommand::RemoveEntity { id });
    }

    fn move_to(&mut self, id: EntityId, position: Vec3) {
        if self.visible.contains(&id) {
            self.commands.push(HostCommand::MoveEntity { id, position });
        }
    }
}

/// Feedback collaborator with a running score
#[derive(Debug, Clone, Default)]
pub struct HostFx {
    pub score: u64,
    commands: Vec<HostCommand>,
}

impl Fx for HostFx {
    fn spawn_explosion(&mut self, position: Vec3, size: f32, kind: ExplosionKind) {
        self.commands.push(HostCommand::SpawnExplosion {
            position,
            size,
            kind,
        });
    }

    fn apply_screen_shake(&mut self, intensity: f32, duration: f32) {
        self.commands.push(HostCommand::ScreenShake {
            intensity,
            duration,
        });
    }

    fn add_score(&mut self, amount: u64) {
        self.score += amount;
        self.commands.push(HostCommand::AddScore { amount });
    }

    fn power_up_activated(&mut self, kind: PowerUpKind) {
        self.commands.push(HostCommand::PowerUpActivated { kind });
    }
}

/// All three collaborators plus their pending command buffers
#[derive(Debug, Clone, Default)]
pub struct HostFrame {
    pub world: HostWorld,
    pub scene: HostScene,
    pub fx: HostFx,
}

impl HostFrame {
    pub fn new(player: Option<PlayerState>) -> Self {
        Self {
            world: HostWorld {
                player,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Lend the collaborators to one simulation tick
    pub fn frame(&mut self) -> Frame<'_> {
        Frame::new(&mut self.world, &mut self.scene, &mut self.fx)
    }

    /// Commands recorded so far, without clearing them
    pub fn pending(&self) -> impl Iterator<Item = &HostCommand> {
        self.world
            .commands
            .iter()
            .chain(self.scene.commands.iter())
            .chain(self.fx.commands.iter())
    }

    /// Take every recorded command: world, then scene, then fx requests
    pub fn drain(&mut self) -> Vec<HostCommand> {
        let mut out = std::mem::take(&mut self.world.commands);
        out.append(&mut self.scene.commands);
        out.append(&mut self.fx.commands);
        out
    }
}
