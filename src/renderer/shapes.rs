//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Ball;

/// Segment count that keeps a circle of `radius` pixels looking round
pub fn segments_for_radius(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(16, 64)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Triangles for every ball, in collection order (later balls draw on top)
pub fn balls(balls: &[Ball]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for ball in balls {
        let segments = segments_for_radius(ball.radius);
        vertices.extend(circle(ball.pos, ball.radius, ball.color.rgba(), segments));
    }
    vertices
}
