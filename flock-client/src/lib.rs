use flock_core::{ConfigError, FlockConfig, FlockStd};
use flock_shared::{BoidPose, FlockSettings, FrameSnapshot, PopulationUpdate, Position, StatusResponse};

/// Owns a flock and drives it tick by tick, translating between the
/// simulation types and the shared driver messages.
pub struct SimRunner {
    flock: FlockStd,
    tick: u64,
}

impl SimRunner {
    pub fn new(config: FlockConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            flock: FlockStd::new(config)?,
            tick: 0,
        })
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &FlockConfig {
        &self.flock.config
    }

    pub fn flock(&self) -> &FlockStd {
        &self.flock
    }

    /// Apply a rule/speed/sight update; takes effect on the next tick.
    pub fn apply_settings(&mut self, settings: &FlockSettings) {
        let config = &mut self.flock.config;
        config.enable_alignment = settings.enable_alignment;
        config.enable_cohesion = settings.enable_cohesion;
        config.enable_separation = settings.enable_separation;
        config.strength_alignment = settings.strength_alignment;
        config.strength_cohesion = settings.strength_cohesion;
        config.strength_separation = settings.strength_separation;
        config.max_speed = settings.max_speed;
        config.sight_range = settings.sight_range;
    }

    /// Request a new population size; the flock reaches it on the next tick.
    pub fn apply_population(&mut self, update: PopulationUpdate) {
        self.flock.config.target_count = update.target_count;
    }

    /// Advance the simulation by one fixed timestep.
    pub fn step(&mut self, dt: f32) {
        self.flock.tick(dt);
        self.tick += 1;
    }

    /// Render output for the current state: one pose per live boid.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            poses: self
                .flock
                .boids
                .iter()
                .map(|boid| BoidPose {
                    position: Position::new(boid.position.x, boid.position.y),
                    heading_degrees: boid.velocity.heading_degrees(),
                })
                .collect(),
        }
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            boid_count: self.flock.boids.len(),
            tick: self.tick,
        }
    }
}
