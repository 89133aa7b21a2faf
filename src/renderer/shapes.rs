//! Shape generation for 2D primitives
//!
//! Inputs are world coordinates (meters); output vertices are screen pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{BodyView, Frame, Level, ShapeView, SuccessRegion};
use crate::world_to_screen;

/// Pixel mapping for one screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub screen: Vec2,
    pub ppm: f32,
}

impl Viewport {
    pub fn new(screen: Vec2, ppm: f32) -> Self {
        Self { screen, ppm }
    }

    #[inline]
    pub fn map(&self, world: Vec2) -> Vec2 {
        world_to_screen(world, self.screen, self.ppm)
    }
}

/// Triangle list for fills and line list for outlines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Vertex>,
    pub lines: Vec<Vertex>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
    }
}

/// Generate vertices for a filled circle
pub fn circle(view: &Viewport, center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let c = view.map(center);
    let r = radius * view.ppm;

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(c.x, c.y, color));
        vertices.push(Vertex::new(c.x + r * theta1.cos(), c.y + r * theta1.sin(), color));
        vertices.push(Vertex::new(c.x + r * theta2.cos(), c.y + r * theta2.sin(), color));
    }

    vertices
}

/// Closed outline as a line list (two vertices per edge)
pub fn polygon_outline(view: &Viewport, polygon: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if polygon.len() < 2 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(polygon.len() * 2);
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        let (pa, pb) = (view.map(*a), view.map(b));
        vertices.push(Vertex::new(pa.x, pa.y, color));
        vertices.push(Vertex::new(pb.x, pb.y, color));
    }
    vertices
}

/// Draw color of a body: its scene color, or the wall color for boundaries
fn body_color(level: &Level, name: &str) -> [f32; 4] {
    level
        .object(name)
        .map(|object| colors::by_name(object.color()))
        .unwrap_or(colors::WALL)
}

/// Append one body's fixtures to `mesh`
pub fn body(view: &Viewport, body: &BodyView, color: [f32; 4], mesh: &mut Mesh) {
    for shape in &body.shapes {
        match shape {
            ShapeView::Circle { center, radius } => {
                mesh.triangles.extend(circle(view, *center, *radius, color, 24));
                // Spoke so rotation is visible
                let spoke = *center + Vec2::from_angle(body.angle) * *radius;
                mesh.lines.extend(polygon_outline(view, &[*center, spoke], colors::BLACK));
            }
            ShapeView::Polygon { vertices, sensor } => {
                let color = if *sensor { colors::SENSOR } else { color };
                mesh.lines.extend(polygon_outline(view, vertices, color));
            }
        }
    }
}

/// Outline of the success region; a collapsed region draws nothing
pub fn success_region(view: &Viewport, region: &SuccessRegion) -> Vec<Vertex> {
    if region.is_empty() {
        return Vec::new();
    }
    polygon_outline(view, &region.corners, colors::SUCCESS_REGION)
}

/// Full debug mesh for one frame
pub fn frame(view: &Viewport, frame: &Frame<'_>) -> Mesh {
    let mut mesh = Mesh::default();
    for view_body in &frame.bodies {
        body(view, view_body, body_color(frame.level, &view_body.name), &mut mesh);
    }
    if let Some(region) = &frame.region {
        mesh.lines.extend(success_region(view, region));
    }
    mesh
}
