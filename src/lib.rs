//! Space Racer - core of an endless 3D space racer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hazard/collectible fields, difficulty, effects)
//! - `tuning`: Data-driven game balance
//! - `host`: Command-buffer implementation of the host collaborators
//! - `web`: Browser bridge (wasm32 only)

pub mod host;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use host::{HostCommand, HostFrame};
pub use sim::Simulation;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta integrated in one tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player forward speed at the start of a run; speed factors are relative to it
    pub const BASE_PLAYER_SPEED: f32 = 20.0;
}
