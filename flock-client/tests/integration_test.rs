use flock_client::SimRunner;
use flock_core::{EdgeBehavior, FlockConfig, Vector2D};
use flock_shared::{FlockSettings, FrameSnapshot, PopulationUpdate};

fn runner_with_count(count: usize) -> SimRunner {
    let mut runner = SimRunner::new(FlockConfig::default()).unwrap();
    runner.apply_population(PopulationUpdate {
        target_count: count,
    });
    runner
}

#[test]
fn test_runner_reaches_target_population() {
    let mut runner = runner_with_count(25);
    runner.step(0.02);

    assert_eq!(runner.status().boid_count, 25);
    assert_eq!(runner.tick_count(), 1);
}

#[test]
fn test_runner_rejects_invalid_world() {
    let config = FlockConfig {
        world_size: Vector2D::new(0.0, 100.0),
        ..FlockConfig::default()
    };
    assert!(SimRunner::new(config).is_err());
}

#[test]
fn test_settings_update_takes_effect() {
    let mut runner = runner_with_count(5);
    runner.apply_settings(&FlockSettings {
        enable_cohesion: true,
        max_speed: 12.5,
        sight_range: 30.0,
        ..FlockSettings::default()
    });

    assert!(runner.config().enable_cohesion);
    assert_eq!(runner.config().max_speed, 12.5);
    assert_eq!(runner.config().sight_range, 30.0);
}

#[test]
fn test_long_run_respects_speed_cap_and_bounds() {
    let mut runner = runner_with_count(30);
    runner.apply_settings(&FlockSettings {
        enable_alignment: true,
        enable_cohesion: true,
        enable_separation: true,
        ..FlockSettings::default()
    });

    for _ in 0..200 {
        runner.step(0.02);
    }

    let world = runner.config().world_size;
    let max_speed = runner.config().max_speed;
    for boid in &runner.flock().boids {
        assert!(boid.velocity.magnitude() <= max_speed + 1e-3);
        assert!(boid.position.x >= 0.0 && boid.position.x < world.x);
        assert!(boid.position.y >= 0.0 && boid.position.y < world.y);
    }
}

#[test]
fn test_collide_world_keeps_boids_inside() {
    let config = FlockConfig {
        edge: EdgeBehavior::Collide,
        ..FlockConfig::default()
    };
    let mut runner = SimRunner::new(config).unwrap();
    runner.apply_population(PopulationUpdate { target_count: 20 });

    for _ in 0..200 {
        runner.step(0.05);
    }

    let world = runner.config().world_size;
    for boid in &runner.flock().boids {
        assert!(boid.position.x >= 0.0 && boid.position.x <= world.x);
        assert!(boid.position.y >= 0.0 && boid.position.y <= world.y);
    }
}

#[test]
fn test_snapshot_covers_population_and_round_trips() {
    let mut runner = runner_with_count(8);
    runner.step(0.02);

    let snapshot = runner.snapshot();
    assert_eq!(snapshot.tick, 1);
    assert_eq!(snapshot.poses.len(), 8);
    for pose in &snapshot.poses {
        assert!(pose.heading_degrees.is_finite());
    }

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.poses, snapshot.poses);
}
