//! Space Racer headless runner
//!
//! Flies an autopilot ship through the hazard field for a fixed number of
//! seconds and logs what the core asked the host to do.
//!
//! Usage: `space-racer [seed] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::{Vec2, Vec3};
    use space_racer::Simulation;
    use space_racer::consts::SIM_DT;
    use space_racer::sim::{PlayerState, Projectile};

    /// Hazards closer than this (along z) are worth dodging
    const LOOKAHEAD: f32 = 250.0;
    const STRAFE_SPEED: f32 = 40.0;
    const FIRE_INTERVAL: f32 = 0.4;
    const PROJECTILE_SPEED: f32 = 400.0;
    const PROJECTILE_RANGE: f32 = 1200.0;

    /// Demo pilot: dodge the most dangerous hazard, otherwise chase power-ups
    #[derive(Debug, Default)]
    pub struct Pilot {
        fire_cooldown: f32,
        next_projectile: u32,
        time: f32,
    }

    impl Pilot {
        /// Pick a lateral target for this tick
        fn target(&self, sim: &Simulation, player: &PlayerState) -> Vec2 {
            let here = player.position.truncate();

            // Closest hazard ahead that overlaps our lane
            let threat = sim
                .hazards()
                .hazards()
                .iter()
                .filter(|h| {
                    let ahead = player.position.z - h.position.z;
                    (0.0..LOOKAHEAD).contains(&ahead)
                        && (h.position.truncate() - here).length() < h.hitbox.max_element() + 10.0
                })
                .min_by(|a, b| {
                    b.position
                        .z
                        .partial_cmp(&a.position.z)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });

            if let Some(hazard) = threat {
                let away = (here - hazard.position.truncate()).normalize_or(Vec2::X);
                return here + away * 40.0;
            }

            let pickup = sim
                .collectibles()
                .collectibles()
                .iter()
                .filter(|c| c.position.z < player.position.z)
                .min_by(|a, b| {
                    let da = a.position.distance_squared(player.position);
                    let db = b.position.distance_squared(player.position);
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                });

            match pickup {
                Some(c) => c.position.truncate(),
                // Wander with a slow oscillation so the trend tracker sees motion
                None => Vec2::new((self.time * 0.3).sin() * 60.0, (self.time * 0.2).cos() * 30.0),
            }
        }

        /// Move the ship and its projectiles one fixed step
        pub fn fly(&mut self, sim: &Simulation, player: &mut PlayerState, projectiles: &mut Vec<Projectile>) {
            self.time += SIM_DT;
            let bounds = Vec2::new(sim.tuning().field_half_width, sim.tuning().field_half_height);

            let here = player.position.truncate();
            let to_target = self.target(sim, player) - here;
            let step = to_target.clamp_length_max(STRAFE_SPEED * SIM_DT);
            let next = (here + step).clamp(-bounds, bounds);

            player.velocity = (next - here) / SIM_DT;
            player.movement_direction = player.velocity.normalize_or_zero();
            player.position = Vec3::new(next.x, next.y, player.position.z - player.speed * SIM_DT);

            for projectile in projectiles.iter_mut() {
                projectile.position.z -= PROJECTILE_SPEED * SIM_DT;
            }
            let limit = player.position.z - PROJECTILE_RANGE;
            projectiles.retain(|p| p.position.z > limit);

            self.fire_cooldown -= SIM_DT;
            if self.fire_cooldown <= 0.0 {
                self.fire_cooldown = FIRE_INTERVAL;
                self.next_projectile += 1;
                projectiles.push(Projectile {
                    id: self.next_projectile,
                    position: player.position,
                });
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use space_racer::consts::{BASE_PLAYER_SPEED, SIM_DT};
    use space_racer::sim::PlayerState;
    use space_racer::{HostCommand, HostFrame, Simulation, Tuning};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(120.0);

    log::info!("Space Racer (native) starting with seed: {}", seed);

    let mut sim = Simulation::new(seed, Tuning::default());
    let mut host = HostFrame::new(Some(PlayerState {
        speed: BASE_PLAYER_SPEED,
        ..Default::default()
    }));
    let mut pilot = autopilot::Pilot::default();

    let ticks = (seconds / SIM_DT).ceil() as u64;
    let mut damage = 0u32;
    let mut hits = 0u32;
    let mut kills = 0u32;
    let mut activations = 0u32;

    for step in 0..ticks {
        if let Some(player) = host.world.player.as_mut() {
            // Gentle acceleration so difficulty checkpoints arrive over a run
            player.speed = BASE_PLAYER_SPEED * (1.0 + step as f32 * SIM_DT / 60.0);
            let mut ship = *player;
            pilot.fly(&sim, &mut ship, &mut host.world.projectiles);
            *player = ship;
        }

        let report = {
            let mut frame = host.frame();
            sim.tick(&mut frame, SIM_DT)
        };
        host.world.advance(SIM_DT);
        kills += report.hazards.destroyed + report.laser_kills;
        activations += report.activations.len() as u32;
        for index in &report.checkpoints {
            log::info!("t={:.1}s checkpoint {} at distance {:.0}", step as f32 * SIM_DT, index, sim.distance());
        }

        for command in host.drain() {
            if let HostCommand::TakeDamage { amount } = command {
                damage += amount;
                hits += 1;
            }
        }

        if step % 600 == 0 {
            log::debug!(
                "t={:.0}s hazards={} collectibles={} score={}",
                step as f32 * SIM_DT,
                sim.hazards().hazards().len(),
                sim.collectibles().collectibles().len(),
                host.fx.score
            );
        }
    }

    let pool = sim.hazards().pool();
    let stats = pool.stats();
    log::info!(
        "Run finished: distance={:.0} score={} hits={} damage={} kills={} power-ups={}",
        sim.distance(),
        host.fx.score,
        hits,
        damage,
        kills,
        activations
    );
    log::info!(
        "Hazard pool: live={} pooled={}/{} created={} discarded={}",
        pool.live(),
        pool.len(),
        pool.capacity(),
        stats.created,
        stats.discarded
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `space_racer::web::start`, this is just to satisfy the compiler
}
