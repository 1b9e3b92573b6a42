use super::math::AU_TO_WORLD;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Starting look angles, in radians.
    pub horizontal_angle: f32,
    pub vertical_angle: f32,
    pub render_distance: f32,
    pub movement_speed: f32,
    pub sprint_multiplier: f32,
    /// Radians of turn per pixel of pointer travel.
    pub look_sensitivity: f32,
    /// Distance kept from an anchored body, in multiples of its radius.
    pub anchor_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            position: [0.0, 60.0, -450.0],
            horizontal_angle: 0.0,
            vertical_angle: -0.12,
            render_distance: 20000.0,
            movement_speed: 0.5,
            sprint_multiplier: 10.0,
            look_sensitivity: 0.005,
            anchor_distance: 4.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OrreryConfig {
    pub bodies_path: String,
    pub au_to_world: f32,
    pub fps_cap: u32,
    /// Simulated hours per real second at a speed factor of 1.
    pub hours_per_second: f32,
    pub speed_factor: f32,
    pub speed_step: f32,
    pub ring_segments: usize,
    pub show_trajectories: bool,
    pub star_count: usize,
    pub star_seed: u64,
    pub camera: CameraConfig,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        OrreryConfig {
            bodies_path: "/assets/bodies.json".to_string(),
            au_to_world: AU_TO_WORLD,
            fps_cap: 60,
            hours_per_second: 24.0,
            speed_factor: 1.0,
            speed_step: 2.0,
            ring_segments: 200,
            show_trajectories: true,
            star_count: 800,
            star_seed: 0x5EED_57A2,
            camera: CameraConfig::default(),
        }
    }
}

impl OrreryConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
