//! Vertex types for 2D debug drawing

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (screen pixels) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const RED: [f32; 4] = [0.9, 0.15, 0.15, 1.0];
    pub const GREEN: [f32; 4] = [0.15, 0.75, 0.25, 1.0];
    pub const BLUE: [f32; 4] = [0.2, 0.35, 0.9, 1.0];
    pub const YELLOW: [f32; 4] = [0.95, 0.85, 0.2, 1.0];
    pub const PURPLE: [f32; 4] = [0.55, 0.25, 0.75, 1.0];
    pub const GRAY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const SENSOR: [f32; 4] = [0.5, 0.5, 0.5, 0.25];
    pub const SUCCESS_REGION: [f32; 4] = [0.2, 0.9, 0.3, 0.6];
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Color for a scene-file color name; unknown names draw black
    pub fn by_name(name: &str) -> [f32; 4] {
        match name.to_ascii_lowercase().as_str() {
            "white" => WHITE,
            "red" => RED,
            "green" => GREEN,
            "blue" => BLUE,
            "yellow" => YELLOW,
            "purple" => PURPLE,
            "gray" | "grey" => GRAY,
            _ => BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let verts = [Vertex::new(1.0, 2.0, colors::RED); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 72);
    }

    #[test]
    fn test_color_names() {
        assert_eq!(colors::by_name("Green"), colors::GREEN);
        assert_eq!(colors::by_name("grey"), colors::GRAY);
        assert_eq!(colors::by_name("mauve"), colors::BLACK);
    }
}
