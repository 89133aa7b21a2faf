//! Environment configuration
//!
//! Persisted as JSON next to the level files. Missing keys fall back to
//! defaults so a config file only needs to name what it changes.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::consts::*;

/// Environment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    // === Room ===
    /// Square window size in pixels
    pub screen_size: u32,
    /// Pixels per meter
    pub ppm: f32,
    /// Thickness of the four boundary walls (meters)
    pub wall_thickness: f32,

    // === Stepping ===
    /// Step budget per episode
    pub max_steps: u32,
    /// Target frame rate; the fixed timestep is 1 / fps
    pub fps: u32,
    /// Solver velocity iterations per step
    pub velocity_iterations: usize,
    /// Solver position (stabilization) iterations per step
    pub position_iterations: usize,
    /// Vertical gravity (m/s², negative is down)
    pub gravity: f32,

    // === Detection ===
    /// Extra inset of the success region beyond the target radius
    pub tolerance: f32,

    // === Frontend ===
    /// Record every step through the mesh recorder (runner only)
    pub render: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            screen_size: SCREEN_SIZE,
            ppm: PIXELS_PER_METER,
            wall_thickness: WALL_THICKNESS,

            max_steps: MAX_STEPS,
            fps: TARGET_FPS,
            velocity_iterations: VELOCITY_ITERATIONS,
            position_iterations: POSITION_ITERATIONS,
            gravity: GRAVITY_Y,

            tolerance: SUCCESS_TOLERANCE,

            render: false,
        }
    }
}

impl EnvConfig {
    /// Headless preset: no frontend calls
    pub fn headless() -> Self {
        Self::default()
    }

    /// Fixed physics timestep (seconds)
    pub fn time_step(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Room extent in meters (width, height)
    pub fn room_size(&self) -> Vec2 {
        let side = self.screen_size as f32 / self.ppm;
        Vec2::new(side, side)
    }

    /// Screen extent in pixels (width, height)
    pub fn screen_extent(&self) -> Vec2 {
        Vec2::splat(self.screen_size as f32)
    }

    /// Gravity vector
    pub fn gravity_vec(&self) -> Vec2 {
        Vec2::new(0.0, self.gravity)
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save the config as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}
