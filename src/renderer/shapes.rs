//! Shape generation for the bucket and raindrops
//!
//! Everything is tessellated in world space into triangle lists; the
//! pipeline maps to clip space through the camera.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{GameState, Rect};

/// Segments used for the round bottom of a raindrop
const DROP_SEGMENTS: u32 = 16;

fn push_triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

fn push_quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [bl, br, tr, tl] = corners;
    push_triangle(out, bl, br, tr, color);
    push_triangle(out, tr, tl, bl, color);
}

/// Bucket: a trapezoid narrowing toward the bottom, water inside, a rim on top
pub fn bucket(rect: &Rect, out: &mut Vec<Vertex>) {
    let min = rect.min();
    let max = rect.max();
    let w = rect.width;
    let h = rect.height;
    let taper = w * 0.12;
    let rim = h * 0.12;

    // Body
    push_quad(
        out,
        [
            Vec2::new(min.x + taper, min.y),
            Vec2::new(max.x - taper, min.y),
            Vec2::new(max.x, max.y - rim),
            Vec2::new(min.x, max.y - rim),
        ],
        colors::BUCKET,
    );

    // Water surface just under the rim
    let water_top = max.y - rim * 1.5;
    let water_inset = taper * 0.8;
    push_quad(
        out,
        [
            Vec2::new(min.x + water_inset, water_top - rim),
            Vec2::new(max.x - water_inset, water_top - rim),
            Vec2::new(max.x - water_inset * 0.5, water_top),
            Vec2::new(min.x + water_inset * 0.5, water_top),
        ],
        colors::WATER,
    );

    // Rim
    push_quad(
        out,
        [
            Vec2::new(min.x, max.y - rim),
            Vec2::new(max.x, max.y - rim),
            max,
            Vec2::new(min.x, max.y),
        ],
        colors::BUCKET_RIM,
    );
}

/// Raindrop: a teardrop with the point at the top and a small highlight
pub fn raindrop(rect: &Rect, out: &mut Vec<Vertex>) {
    let center = rect.center();
    let radius = rect.width.min(rect.height) * 0.3;
    let bulb = Vec2::new(center.x, rect.y + radius);
    let tip = Vec2::new(center.x, rect.y + rect.height);

    // Round bottom (fan around the bulb center)
    for i in 0..DROP_SEGMENTS {
        let a0 = PI + PI * i as f32 / DROP_SEGMENTS as f32;
        let a1 = PI + PI * (i + 1) as f32 / DROP_SEGMENTS as f32;
        let p0 = bulb + Vec2::new(a0.cos(), a0.sin()) * radius;
        let p1 = bulb + Vec2::new(a1.cos(), a1.sin()) * radius;
        push_triangle(out, bulb, p0, p1, colors::RAINDROP);
    }

    // Tapered top
    push_triangle(
        out,
        bulb + Vec2::new(-radius, 0.0),
        bulb + Vec2::new(radius, 0.0),
        tip,
        colors::RAINDROP,
    );

    // Highlight
    let glint = bulb + Vec2::new(-radius * 0.4, radius * 0.1);
    let size = radius * 0.25;
    push_quad(
        out,
        [
            glint + Vec2::new(-size, -size),
            glint + Vec2::new(size, -size),
            glint + Vec2::new(size, size),
            glint + Vec2::new(-size, size),
        ],
        colors::RAINDROP_HIGHLIGHT,
    );
}

/// All geometry for one frame: bucket first, then raindrops in spawn order
pub fn scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(18 + state.raindrops.len() * 60);
    bucket(&state.bucket.rect, &mut vertices);
    for entity in &state.raindrops {
        raindrop(&entity.rect, &mut vertices);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(rect: &Rect, v: &Vertex) -> bool {
        let eps = 1e-3;
        v.position[0] >= rect.x - eps
            && v.position[0] <= rect.x + rect.width + eps
            && v.position[1] >= rect.y - eps
            && v.position[1] <= rect.y + rect.height + eps
    }

    #[test]
    fn test_bucket_within_rect() {
        let rect = Rect::new(368.0, 20.0, 64.0, 64.0);
        let mut out = Vec::new();
        bucket(&rect, &mut out);
        assert_eq!(out.len() % 3, 0);
        assert!(!out.is_empty());
        assert!(out.iter().all(|v| inside(&rect, v)));
    }

    #[test]
    fn test_raindrop_within_rect() {
        let rect = Rect::new(100.0, 300.0, 64.0, 64.0);
        let mut out = Vec::new();
        raindrop(&rect, &mut out);
        assert_eq!(out.len() % 3, 0);
        assert!(out.iter().all(|v| inside(&rect, v)));
        // Tip touches the top edge
        assert!(out.iter().any(|v| (v.position[1] - 364.0).abs() < 1e-3));
    }

    #[test]
    fn test_scene_scales_with_raindrops() {
        let mut state = GameState::new(1, 0.0);
        let one = scene(&state).len();
        crate::sim::spawn_raindrop(&mut state, 2.0);
        let two = scene(&state).len();

        let mut per_drop = Vec::new();
        raindrop(&state.raindrops[0].rect, &mut per_drop);
        assert_eq!(two - one, per_drop.len());
    }
}
