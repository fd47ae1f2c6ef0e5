//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (one stream per field)
//! - Stable iteration order (back to front over owned vectors)
//! - No rendering or platform dependencies; the host is reached only through
//!   the `World`, `Scene` and `Fx` traits

pub mod collectible;
pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod hazard;
pub mod hazard_field;
pub mod pool;
pub mod spawn;
pub mod tick;
pub mod world;

pub use collectible::{Collectible, CollectibleField, PowerUpKind, Reveal};
pub use collision::{ScaleCurve, aabb_overlap, beam_hits, projectile_hits};
pub use difficulty::{
    DifficultyDirector, DifficultyState, DistanceCheckpoint, TimePhase, TunableOverrides, Tunables,
};
pub use effects::{EffectCoordinator, EffectState};
pub use hazard::{Hazard, HazardPlan, Oscillation, Population, SpeedTier};
pub use hazard_field::{HazardField, HazardTickStats};
pub use pool::{ObjectPool, PoolStats};
pub use spawn::{SpawnContext, SpawnPlanner, TrendTracker};
pub use tick::{RevealView, Simulation, Snapshot, TickReport};
pub use world::{
    EntityId, EntityIds, EntityKind, ExplosionKind, Frame, Fx, PlayerState, Projectile, Scene,
    SceneEntity, World,
};
