#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};

/// Represents a 2D position in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

/// Flock rule configuration that a driver may change between ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlockSettings {
    pub enable_alignment: bool,
    pub enable_cohesion: bool,
    pub enable_separation: bool,
    pub strength_alignment: f32,
    pub strength_cohesion: f32,
    pub strength_separation: f32,
    pub max_speed: f32,
    pub sight_range: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            enable_alignment: false,
            enable_cohesion: false,
            enable_separation: false,
            strength_alignment: 1.0,
            strength_cohesion: 1.0,
            strength_separation: 1.0,
            max_speed: 20.0,
            sight_range: 10.0,
        }
    }
}

/// Settings update message sent from a controller to the simulation driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub settings: FlockSettings,
}

/// Population update message; the simulation converges on the requested
/// count within a single tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PopulationUpdate {
    pub target_count: usize,
}

/// Per-boid render output: where to place the transform and which way the
/// sprite faces
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidPose {
    pub position: Position,
    pub heading_degrees: f32,
}

/// One tick's worth of render output
#[cfg(feature = "std")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub poses: Vec<BoidPose>,
}

/// Status response from the simulation driver
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusResponse {
    pub boid_count: usize,
    pub tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let p1 = Position::new(0.0, 0.0);
        let p2 = Position::new(3.0, 4.0);
        assert_eq!(p1.distance_to(&p2), 5.0);
    }

    #[test]
    fn test_default_settings_disable_all_rules() {
        let settings = FlockSettings::default();
        assert!(!settings.enable_alignment);
        assert!(!settings.enable_cohesion);
        assert!(!settings.enable_separation);
        assert_eq!(settings.max_speed, 20.0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = FrameSnapshot {
            tick: 7,
            poses: vec![BoidPose {
                position: Position::new(1.5, 2.5),
                heading_degrees: -90.0,
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tick, 7);
        assert_eq!(back.poses, snapshot.poses);
    }
}
