//! Phyre 2D - a physics puzzle environment
//!
//! Core modules:
//! - `sim`: Scene objects, basket geometry, success detection, episode control
//! - `renderer`: Debug-draw vertex generation for a rendering frontend
//! - `settings`: Environment configuration
//! - `error`: Error taxonomy shared by every module

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{PhyreError, Result};
pub use settings::EnvConfig;

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Basket width per unit of scale
    pub const BASKET_WIDTH_RATIO: f32 = 1.083;
    /// Basket wall height per unit of scale
    pub const BASKET_HEIGHT_RATIO: f32 = 1.67;
    /// Outward lean of the basket side walls (degrees)
    pub const BASKET_WALL_TILT_DEG: f32 = 5.0;
    /// Wall thickness of a basket at scale 0
    pub const BASKET_BASE_THICKNESS: f32 = 0.05;
    /// Thickness added per sqrt(scale)
    pub const BASKET_THICKNESS_GROWTH: f32 = 0.1;
    /// The one name a basket may carry
    pub const BASKET_NAME: &str = "basket";

    /// Platform thickness when a scene file omits it
    pub const PLATFORM_THICKNESS: f32 = 0.2;

    /// Material defaults
    pub const DEFAULT_FRICTION: f32 = 0.5;
    pub const DEFAULT_RESTITUTION: f32 = 0.5;
    pub const DEFAULT_DENSITY: f32 = 1.0;

    /// Room and stepping defaults
    pub const SCREEN_SIZE: u32 = 600;
    pub const PIXELS_PER_METER: f32 = 60.0;
    pub const TARGET_FPS: u32 = 60;
    pub const MAX_STEPS: u32 = 1000;
    pub const VELOCITY_ITERATIONS: usize = 6;
    pub const POSITION_ITERATIONS: usize = 2;
    pub const GRAVITY_Y: f32 = -10.0;
    pub const WALL_THICKNESS: f32 = 0.5;

    /// Inset applied to the success region on top of the target radius
    pub const SUCCESS_TOLERANCE: f32 = 0.02;

    /// Names of the four boundary walls
    pub const WALL_NAMES: [&str; 4] = ["left_wall", "right_wall", "top_wall", "bottom_wall"];
}

/// Convert a world position (meters, y up, origin at room center) to
/// screen pixels (y down, origin at top-left)
#[inline]
pub fn world_to_screen(pos: Vec2, screen: Vec2, ppm: f32) -> Vec2 {
    Vec2::new(pos.x * ppm + screen.x / 2.0, -pos.y * ppm + screen.y / 2.0)
}

/// Inverse of [`world_to_screen`]
#[inline]
pub fn screen_to_world(px: Vec2, screen: Vec2, ppm: f32) -> Vec2 {
    Vec2::new((px.x - screen.x / 2.0) / ppm, -(px.y - screen.y / 2.0) / ppm)
}
