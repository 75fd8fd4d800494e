#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
use rand::Rng;

/// A 2D vector used for positions, velocities and forces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn magnitude(&self) -> f32 {
        #[cfg(feature = "std")]
        {
            (self.x * self.x + self.y * self.y).sqrt()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::sqrtf(self.x * self.x + self.y * self.y)
        }
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn limit(&self, max: f32) -> Self {
        let mag = self.magnitude();
        if mag > max {
            let normalized = self.normalize();
            Self {
                x: normalized.x * max,
                y: normalized.y * max,
            }
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        #[cfg(feature = "std")]
        {
            (dx * dx + dy * dy).sqrt()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::sqrtf(dx * dx + dy * dy)
        }
    }

    /// Screen-space heading in degrees for a velocity vector.
    ///
    /// Uses the sprite convention `atan2(-x, y)`: a boid moving along +y
    /// faces 0 degrees, one moving along +x faces -90 degrees.
    pub fn heading_degrees(&self) -> f32 {
        #[cfg(feature = "std")]
        {
            (-self.x).atan2(self.y).to_degrees()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::atan2f(-self.x, self.y).to_degrees()
        }
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

/// What happens to a boid that leaves the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeBehavior {
    /// Re-enter on the opposite side.
    Wrap,
    /// Clamp position to the world rectangle; velocity is left untouched.
    Collide,
}

/// Rejected simulation configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// World extents must be strictly positive on both axes.
    InvalidWorldSize { width: f32, height: f32 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidWorldSize { width, height } => {
                write!(f, "world size must be positive on both axes, got {}x{}", width, height)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Configuration for the flock simulation
///
/// Everything here may be changed between ticks; only the world size is
/// checked once, when a flock is constructed.
#[derive(Debug, Clone, Copy)]
pub struct FlockConfig {
    pub world_size: Vector2D,
    pub edge: EdgeBehavior,
    pub target_count: usize,
    /// Neighbor radius shared by all three rules.
    pub sight_range: f32,
    pub max_speed: f32,
    pub enable_alignment: bool,
    pub enable_cohesion: bool,
    pub enable_separation: bool,
    pub strength_alignment: f32,
    pub strength_cohesion: f32,
    pub strength_separation: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            world_size: Vector2D::new(100.0, 100.0),
            edge: EdgeBehavior::Wrap,
            target_count: 10,
            sight_range: 10.0,
            max_speed: 20.0,
            enable_alignment: false,
            enable_cohesion: false,
            enable_separation: false,
            strength_alignment: 1.0,
            strength_cohesion: 1.0,
            strength_separation: 1.0,
        }
    }
}

impl FlockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_size.x > 0.0 && self.world_size.y > 0.0) {
            return Err(ConfigError::InvalidWorldSize {
                width: self.world_size.x,
                height: self.world_size.y,
            });
        }
        Ok(())
    }
}

/// A single boid entity
///
/// The boid only accumulates force; the owning flock performs integration,
/// wipes the accumulator and resolves world edges once per tick.
#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub force: Vector2D,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            force: Vector2D::zero(),
        }
    }

    /// Add a force to this tick's accumulator. Additive and commutative;
    /// may be called any number of times before integration consumes it.
    pub fn apply_force(&mut self, force: Vector2D) {
        self.force += force;
    }
}

/// Source of freshly spawned boids, supplied at flock construction
pub trait BoidFactory {
    fn spawn(&mut self, world_size: Vector2D, max_speed: f32) -> Boid;
}

/// Spawns boids at a random position inside the world (one unit away from
/// every edge) with a full-speed velocity at a uniformly random heading.
#[cfg(feature = "std")]
#[derive(Debug, Default)]
pub struct RandomFactory;

#[cfg(feature = "std")]
impl BoidFactory for RandomFactory {
    fn spawn(&mut self, world_size: Vector2D, max_speed: f32) -> Boid {
        let mut rng = rand::thread_rng();
        let position = Vector2D::new(
            spawn_coord(&mut rng, world_size.x),
            spawn_coord(&mut rng, world_size.y),
        );
        let angle = rng.gen_range(0.0..core::f32::consts::TAU);
        let velocity = Vector2D::new(angle.cos() * max_speed, angle.sin() * max_speed);
        Boid::new(position, velocity)
    }
}

// Worlds narrower than the two-unit margin sample the full extent instead.
#[cfg(feature = "std")]
fn spawn_coord(rng: &mut impl Rng, extent: f32) -> f32 {
    if extent > 2.0 {
        rng.gen_range(1.0..extent - 1.0)
    } else {
        rng.gen_range(0.0..extent)
    }
}

/// Visualization hooks driven by [`FlockStd::tick_observed`].
///
/// Observers read simulation state but never write it; a headless flock
/// runs with [`NullObserver`] and skips all drawing work.
pub trait FlockObserver {
    /// Called once per tick with the world extent.
    fn world_bounds(&mut self, _size: Vector2D) {}
    /// Called for every neighbor query with its center and radius.
    fn range_query(&mut self, _center: Vector2D, _radius: f32) {}
    /// Called for every boid matched by a neighbor query.
    fn neighbor_found(&mut self, _from: Vector2D, _to: Vector2D) {}
}

/// Observer that draws nothing.
#[derive(Debug, Default)]
pub struct NullObserver;

impl FlockObserver for NullObserver {}

/// The three local steering rules.
///
/// Each consumes one boid plus the neighbor set produced by the shared
/// range query and returns a force; an empty neighbor set yields zero.
pub mod rules {
    use super::{Boid, Vector2D};

    /// Steer toward the mean velocity of the neighbors.
    pub fn alignment<'a, I>(boid: &Boid, neighbors: I, strength: f32) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0;
        for other in neighbors {
            sum += other.velocity;
            count += 1;
        }
        if count == 0 {
            return Vector2D::zero();
        }
        (sum / count as f32 - boid.velocity) * strength
    }

    /// Steer toward the mean position of the neighbors.
    pub fn cohesion<'a, I>(boid: &Boid, neighbors: I, strength: f32) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0;
        for other in neighbors {
            sum += other.position;
            count += 1;
        }
        if count == 0 {
            return Vector2D::zero();
        }
        (sum / count as f32 - boid.position) * strength
    }

    /// Steer away from each neighbor, weighted by how close it is.
    ///
    /// The per-neighbor weight is `sight_range - distance`, so the push
    /// grows for near neighbors and fades to zero at the query boundary.
    pub fn separation<'a, I>(boid: &Boid, neighbors: I, sight_range: f32, strength: f32) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let mut sum = Vector2D::zero();
        for other in neighbors {
            let closeness = sight_range - boid.position.distance(&other.position);
            sum += (boid.position - other.position) * closeness;
        }
        sum * strength
    }
}

// Exhaustive pairwise scan. Identity (index), not position, decides what
// counts as "another" boid, so co-located boids still see each other.
fn scan_neighbors(
    boids: &[Boid],
    self_index: usize,
    point: Vector2D,
    range: f32,
    mut found: impl FnMut(usize),
) {
    if range <= 0.0 {
        return;
    }
    for (i, boid) in boids.iter().enumerate() {
        if i != self_index && point.distance(&boid.position) <= range {
            found(i);
        }
    }
}

// Euler integration: force into velocity, capped velocity into position.
// The force accumulator is wiped for the next tick.
fn integrate(boid: &mut Boid, dt: f32, max_speed: f32) {
    boid.velocity += boid.force * dt;
    boid.velocity = boid.velocity.limit(max_speed);
    boid.position += boid.velocity * dt;
    boid.force = Vector2D::zero();
}

fn resolve_edges(boid: &mut Boid, world: Vector2D, edge: EdgeBehavior) {
    match edge {
        // Single-step correction; assumes one tick never moves a boid more
        // than a full world span.
        EdgeBehavior::Wrap => {
            if boid.position.x < 0.0 {
                boid.position.x += world.x;
            }
            if boid.position.y < 0.0 {
                boid.position.y += world.y;
            }
            if boid.position.x >= world.x {
                boid.position.x -= world.x;
            }
            if boid.position.y >= world.y {
                boid.position.y -= world.y;
            }
        }
        EdgeBehavior::Collide => {
            boid.position.x = boid.position.x.clamp(0.0, world.x);
            boid.position.y = boid.position.y.clamp(0.0, world.y);
        }
    }
}

/// A fixed-capacity flock for embedded (no_std) environments
///
/// Same tick pipeline as [`FlockStd`], but the population lives in a
/// `heapless::Vec` and the boid factory is passed into every tick, since
/// embedded targets bring their own entropy source.
pub struct Flock<const N: usize> {
    pub boids: heapless::Vec<Boid, N>,
    pub config: FlockConfig,
}

impl<const N: usize> Flock<N> {
    pub fn new(config: FlockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            boids: heapless::Vec::new(),
            config,
        })
    }

    /// Advance the simulation by one fixed timestep.
    pub fn tick(&mut self, dt: f32, factory: &mut dyn BoidFactory) {
        self.reconcile(factory);

        let config = self.config;

        // Force pass: every rule reads the same start-of-tick state.
        let mut forces = heapless::Vec::<Vector2D, N>::new();
        for (i, boid) in self.boids.iter().enumerate() {
            let mut neighbors = heapless::Vec::<usize, N>::new();
            scan_neighbors(&self.boids, i, boid.position, config.sight_range, |j| {
                let _ = neighbors.push(j);
            });

            let mut total = Vector2D::zero();
            if config.enable_alignment {
                total += rules::alignment(
                    boid,
                    neighbors.iter().map(|&j| &self.boids[j]),
                    config.strength_alignment,
                );
            }
            if config.enable_cohesion {
                total += rules::cohesion(
                    boid,
                    neighbors.iter().map(|&j| &self.boids[j]),
                    config.strength_cohesion,
                );
            }
            if config.enable_separation {
                total += rules::separation(
                    boid,
                    neighbors.iter().map(|&j| &self.boids[j]),
                    config.sight_range,
                    config.strength_separation,
                );
            }
            let _ = forces.push(total);
        }

        // Apply pass: integrate and resolve edges for every boid.
        for (boid, force) in self.boids.iter_mut().zip(forces.iter()) {
            boid.apply_force(*force);
            integrate(boid, dt, config.max_speed);
            resolve_edges(boid, config.world_size, config.edge);
        }
    }

    /// All boids other than `self_index` within `range` of `point`,
    /// in population order. The boundary is inclusive.
    pub fn neighbors_in_range(
        &self,
        self_index: usize,
        point: Vector2D,
        range: f32,
    ) -> heapless::Vec<usize, N> {
        let mut found = heapless::Vec::new();
        scan_neighbors(&self.boids, self_index, point, range, |j| {
            let _ = found.push(j);
        });
        found
    }

    // Spawn up to the target (bounded by capacity) or drop from the tail.
    fn reconcile(&mut self, factory: &mut dyn BoidFactory) {
        let target = self.config.target_count.min(N);
        while self.boids.len() < target {
            let boid = factory.spawn(self.config.world_size, self.config.max_speed);
            let _ = self.boids.push(boid);
        }
        self.boids.truncate(target);
    }
}

/// A flock for std environments
///
/// Owns the population and the boid factory, and drives the whole per-tick
/// pipeline: population reconciliation, neighbor queries, rule evaluation,
/// integration and edge resolution.
#[cfg(feature = "std")]
pub struct FlockStd {
    pub boids: Vec<Boid>,
    pub config: FlockConfig,
    factory: Box<dyn BoidFactory>,
}

#[cfg(feature = "std")]
impl FlockStd {
    pub fn new(config: FlockConfig) -> Result<Self, ConfigError> {
        Self::with_factory(config, Box::new(RandomFactory))
    }

    pub fn with_factory(
        config: FlockConfig,
        factory: Box<dyn BoidFactory>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            boids: Vec::new(),
            config,
            factory,
        })
    }

    /// Advance the simulation by one fixed timestep.
    pub fn tick(&mut self, dt: f32) {
        self.tick_observed(dt, &mut NullObserver);
    }

    /// Like [`tick`](Self::tick), but reports world bounds, neighbor
    /// queries and matches to `observer` as it goes.
    pub fn tick_observed(&mut self, dt: f32, observer: &mut dyn FlockObserver) {
        observer.world_bounds(self.config.world_size);

        self.reconcile();

        let config = self.config;

        // Force pass: every rule reads the same start-of-tick state.
        let mut forces = Vec::with_capacity(self.boids.len());
        for (i, boid) in self.boids.iter().enumerate() {
            observer.range_query(boid.position, config.sight_range);
            let mut neighbors = Vec::new();
            scan_neighbors(&self.boids, i, boid.position, config.sight_range, |j| {
                observer.neighbor_found(boid.position, self.boids[j].position);
                neighbors.push(j);
            });

            let mut total = Vector2D::zero();
            if config.enable_alignment {
                total += rules::alignment(
                    boid,
                    neighbors.iter().map(|&j| &self.boids[j]),
                    config.strength_alignment,
                );
            }
            if config.enable_cohesion {
                total += rules::cohesion(
                    boid,
                    neighbors.iter().map(|&j| &self.boids[j]),
                    config.strength_cohesion,
                );
            }
            if config.enable_separation {
                total += rules::separation(
                    boid,
                    neighbors.iter().map(|&j| &self.boids[j]),
                    config.sight_range,
                    config.strength_separation,
                );
            }
            forces.push(total);
        }

        // Apply pass: integrate and resolve edges for every boid.
        for (boid, force) in self.boids.iter_mut().zip(forces.iter()) {
            boid.apply_force(*force);
            integrate(boid, dt, config.max_speed);
            resolve_edges(boid, config.world_size, config.edge);
        }
    }

    /// All boids other than `self_index` within `range` of `point`,
    /// in population order. The boundary is inclusive.
    pub fn neighbors_in_range(&self, self_index: usize, point: Vector2D, range: f32) -> Vec<usize> {
        let mut found = Vec::new();
        scan_neighbors(&self.boids, self_index, point, range, |j| found.push(j));
        found
    }

    // Spawn up to the target or drop from the tail, in one pass, before
    // the physics runs, so fresh boids take part in the current tick.
    fn reconcile(&mut self) {
        let target = self.config.target_count;
        while self.boids.len() < target {
            let boid = self
                .factory
                .spawn(self.config.world_size, self.config.max_speed);
            self.boids.push(boid);
        }
        self.boids.truncate(target);
    }
}
