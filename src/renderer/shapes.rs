//! Shape generation for 2D primitives
//!
//! Everything returns a plain triangle list so callers can just `extend`.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
        Vertex::new(a.x, a.y, color),
    ]
}

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    quad(
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        color,
    )
    .to_vec()
}

/// Thick line from `from` to `to`
pub fn line(from: Vec2, to: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let half = Vec2::new(-dir.y, dir.x) * (thickness / 2.0);
    quad(from + half, to + half, to - half, from - half, color).to_vec()
}

/// Rectangle of `length` x `width` starting at `origin` and pointing along `angle`
pub fn rotated_rect(
    origin: Vec2,
    angle: f32,
    length: f32,
    width: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let tip = origin + Vec2::from_angle(angle) * length;
    line(origin, tip, width, color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

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

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        let inner1 = center + Vec2::from_angle(theta1) * inner_radius;
        let outer1 = center + Vec2::from_angle(theta1) * outer_radius;
        let inner2 = center + Vec2::from_angle(theta2) * inner_radius;
        let outer2 = center + Vec2::from_angle(theta2) * outer_radius;

        vertices.extend(quad(inner1, outer1, outer2, inner2, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    fn max_dist(vertices: &[Vertex], center: Vec2) -> f32 {
        vertices
            .iter()
            .map(|v| Vec2::from(v.position).distance(center))
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let c = Vec2::new(10.0, 20.0);
        let v = circle(c, 5.0, WHITE, 16);
        assert_eq!(v.len(), 48);
        assert!((max_dist(&v, c) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_ring_between_radii() {
        let c = Vec2::ZERO;
        let v = ring(c, 8.0, 10.0, WHITE, 12);
        assert_eq!(v.len(), 72);
        for vert in &v {
            let d = Vec2::from(vert.position).length();
            assert!(d > 7.99 && d < 10.01);
        }
    }

    #[test]
    fn test_rotated_rect_points_along_angle() {
        let v = rotated_rect(Vec2::ZERO, std::f32::consts::FRAC_PI_2, 25.0, 6.0, WHITE);
        assert_eq!(v.len(), 6);
        let max_y = v.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        let max_x = v.iter().map(|v| v.position[0].abs()).fold(0.0, f32::max);
        assert!((max_y - 25.0).abs() < 1e-4);
        assert!((max_x - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, WHITE).is_empty());
    }
}
