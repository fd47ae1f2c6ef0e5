//! Browser bridge
//!
//! The JavaScript side owns rendering, input and the player ship. Each
//! animation frame it pushes the player state, calls `tick` with the frame
//! delta and applies the returned command batch to its scene graph.

use glam::{Vec2, Vec3};
use wasm_bindgen::prelude::*;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::host::HostFrame;
use crate::sim::{PlayerState, Projectile, Simulation};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Space Racer core loaded");
}

/// Simulation handle exported to JavaScript
#[wasm_bindgen]
pub struct WebSimulation {
    sim: Simulation,
    host: HostFrame,
    accumulator: f32,
}

#[wasm_bindgen]
impl WebSimulation {
    /// Create a run. `tuning_json` overrides any subset of the balance table.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>, tuning_json: Option<String>) -> Result<WebSimulation, JsError> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::default(),
        };
        let seed = seed.unwrap_or_else(rand::random);
        log::info!("Run initialized with seed: {}", seed);
        Ok(Self {
            sim: Simulation::new(seed, tuning),
            host: HostFrame::new(None),
            accumulator: 0.0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.sim.seed()
    }

    /// Update the player kinematics for the next tick
    #[allow(clippy::too_many_arguments)]
    pub fn set_player(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        velocity_x: f32,
        velocity_y: f32,
        speed: f32,
        direction_x: f32,
        direction_y: f32,
        invincible: bool,
    ) {
        let hitbox = self.host.world.player.map(|p| p.hitbox).unwrap_or(PlayerState::default().hitbox);
        self.host.world.player = Some(PlayerState {
            position: Vec3::new(x, y, z),
            velocity: Vec2::new(velocity_x, velocity_y),
            speed,
            movement_direction: Vec2::new(direction_x, direction_y),
            invincible,
            hitbox,
        });
    }

    pub fn set_player_hitbox(&mut self, width: f32, height: f32, depth: f32) {
        if let Some(player) = self.host.world.player.as_mut() {
            player.hitbox = Vec3::new(width, height, depth);
        }
    }

    /// Ship destroyed or not yet spawned; ticks are skipped until it returns
    pub fn clear_player(&mut self) {
        self.host.world.player = None;
    }

    /// Replace the active projectile list (`[{"id":1,"position":[x,y,z]}, ...]`)
    pub fn set_projectiles(&mut self, json: &str) -> Result<(), JsError> {
        let projectiles: Vec<Projectile> = serde_json::from_str(json)?;
        self.host.world.projectiles = projectiles;
        Ok(())
    }

    /// Run fixed substeps for a frame delta and return the command batch as JSON
    pub fn tick(&mut self, frame_dt: f32) -> Result<String, JsError> {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt.min(self.sim.tuning().max_frame_dt);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let mut frame = self.host.frame();
            self.sim.tick(&mut frame, SIM_DT);
            self.host.world.advance(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        let commands = self.host.drain();
        Ok(serde_json::to_string(&commands)?)
    }

    /// Hazards, collectibles, reveals and timers as JSON
    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.sim.snapshot())?)
    }

    pub fn distance(&self) -> f32 {
        self.sim.distance()
    }

    pub fn score(&self) -> f64 {
        self.host.fx.score as f64
    }
}
