//! Scene building
//!
//! Turns a [`WorldState`] into a triangle list in field coordinates. Pure read,
//! so it can be tested without a GPU.

use bytemuck::{Pod, Zeroable};
use glam::{DVec2, Vec2};

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::angle_to;
use crate::consts::*;
use crate::sim::state::WorldState;
use crate::tuning::Tuning;

const DISC_SEGMENTS: u32 = 24;
const SMALL_DISC_SEGMENTS: u32 = 10;
const GRID_LINE_WIDTH: f32 = 1.0;
const CROSSHAIR_LINE_WIDTH: f32 = 2.0;

#[inline]
fn v2(p: DVec2) -> Vec2 {
    p.as_vec2()
}

/// Build every vertex for one frame, back to front
pub fn build_scene(world: &WorldState, tuning: &Tuning) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let field = Vec2::new(tuning.field_width as f32, tuning.field_height as f32);

    // Background and grid
    vertices.extend(shapes::rect(Vec2::ZERO, field, colors::BACKGROUND));
    let pitch = GRID_PITCH as f32;
    let mut x = 0.0;
    while x <= field.x {
        vertices.extend(shapes::line(
            Vec2::new(x, 0.0),
            Vec2::new(x, field.y),
            GRID_LINE_WIDTH,
            colors::GRID,
        ));
        x += pitch;
    }
    let mut y = 0.0;
    while y <= field.y {
        vertices.extend(shapes::line(
            Vec2::new(0.0, y),
            Vec2::new(field.x, y),
            GRID_LINE_WIDTH,
            colors::GRID,
        ));
        y += pitch;
    }

    for enemy in &world.enemies {
        vertices.extend(shapes::circle(
            v2(enemy.body.pos),
            enemy.body.radius as f32,
            colors::ENEMY,
            DISC_SEGMENTS,
        ));
    }

    for projectile in &world.projectiles {
        let color = tuning.weapons.get(projectile.weapon).rgba();
        vertices.extend(shapes::circle(
            v2(projectile.body.pos),
            projectile.body.radius as f32,
            color,
            SMALL_DISC_SEGMENTS,
        ));
    }

    for flash in &world.hit_flashes {
        vertices.extend(shapes::circle(
            v2(*flash),
            HIT_FLASH_RADIUS as f32,
            colors::HIT_FLASH,
            SMALL_DISC_SEGMENTS,
        ));
    }

    // Player with barrel toward the aim point
    let player = &world.player.body;
    vertices.extend(shapes::circle(
        v2(player.pos),
        player.radius as f32,
        colors::PLAYER,
        DISC_SEGMENTS,
    ));
    vertices.extend(shapes::rotated_rect(
        v2(player.pos),
        angle_to(player.pos, world.aim) as f32,
        BARREL_LENGTH as f32,
        BARREL_WIDTH as f32,
        colors::BARREL,
    ));

    // Crosshair in the active weapon's color
    let aim = v2(world.aim);
    let color = tuning.weapons.get(world.player.weapon).rgba();
    let r = CROSSHAIR_RADIUS as f32;
    let arm = CROSSHAIR_ARM as f32;
    let half = CROSSHAIR_LINE_WIDTH / 2.0;
    vertices.extend(shapes::ring(aim, r - half, r + half, color, DISC_SEGMENTS));
    vertices.extend(shapes::line(
        aim - Vec2::X * arm,
        aim + Vec2::X * arm,
        CROSSHAIR_LINE_WIDTH,
        color,
    ));
    vertices.extend(shapes::line(
        aim - Vec2::Y * arm,
        aim + Vec2::Y * arm,
        CROSSHAIR_LINE_WIDTH,
        color,
    ));

    vertices
}

/// Affine field -> NDC map, `ndc = pos * scale + offset`.
///
/// Letterboxes the field to keep its aspect ratio; field y grows downward,
/// NDC y grows upward. Uploaded as-is to the vertex shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ViewTransform {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

impl ViewTransform {
    pub fn letterbox(field: Vec2, viewport: (u32, u32)) -> Self {
        let (w, h) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);
        let fit = (w / field.x).min(h / field.y);
        let sx = field.x * fit / w;
        let sy = field.y * fit / h;
        Self {
            scale: [2.0 * sx / field.x, -2.0 * sy / field.y],
            offset: [-sx, sy],
        }
    }

    pub fn apply(&self, pos: [f32; 2]) -> [f32; 2] {
        [
            pos[0] * self.scale[0] + self.offset[0],
            pos[1] * self.scale[1] + self.offset[1],
        ]
    }
}

/// Map a single field-space point to NDC
pub fn field_to_ndc(pos: [f32; 2], field: Vec2, viewport: (u32, u32)) -> [f32; 2] {
    ViewTransform::letterbox(field, viewport).apply(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WeaponKind;

    fn has_color(vertices: &[Vertex], color: [f32; 4]) -> bool {
        vertices.iter().any(|v| v.color == color)
    }

    #[test]
    fn test_empty_world_draws_background_player_and_crosshair() {
        let tuning = Tuning::default();
        let world = WorldState::new(&tuning);
        let v = build_scene(&world, &tuning);

        assert_eq!(v[0].color, colors::BACKGROUND);
        assert!(has_color(&v, colors::GRID));
        assert!(has_color(&v, colors::PLAYER));
        assert!(!has_color(&v, colors::ENEMY));
        assert!(!has_color(&v, colors::HIT_FLASH));
        // Crosshair is drawn last, in the SMG color
        let smg = tuning.weapons.get(WeaponKind::Smg).rgba();
        assert_eq!(v.last().map(|v| v.color), Some(smg));
    }

    #[test]
    fn test_entities_are_drawn() {
        let tuning = Tuning::default();
        let mut world = WorldState::new(&tuning);
        world.spawn_enemy(DVec2::new(100.0, 100.0), &tuning);
        world.hit_flashes.push(DVec2::new(50.0, 50.0));
        world.player.weapon = WeaponKind::Shotgun;
        world.aim = DVec2::new(700.0, 400.0);

        let v = build_scene(&world, &tuning);
        assert!(has_color(&v, colors::ENEMY));
        assert!(has_color(&v, colors::HIT_FLASH));
        let shotgun = tuning.weapons.get(WeaponKind::Shotgun).rgba();
        assert_eq!(v.last().map(|v| v.color), Some(shotgun));

        // Barrel extends to the right of the player toward the aim point
        let barrel_max_x = v
            .iter()
            .filter(|v| v.color == colors::BARREL)
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert!((barrel_max_x - (600.0 + BARREL_LENGTH as f32)).abs() < 1e-3);
    }

    #[test]
    fn test_rendering_does_not_mutate_world() {
        let tuning = Tuning::default();
        let mut world = WorldState::new(&tuning);
        world.spawn_enemy(DVec2::new(10.0, 10.0), &tuning);
        let before = serde_json::to_string(&world).unwrap();
        build_scene(&world, &tuning);
        assert_eq!(serde_json::to_string(&world).unwrap(), before);
    }

    #[test]
    fn test_field_to_ndc_corners_and_letterbox() {
        let field = Vec2::new(1200.0, 800.0);
        // Matching aspect: corners map to the NDC corners
        assert_eq!(field_to_ndc([0.0, 0.0], field, (1200, 800)), [-1.0, 1.0]);
        assert_eq!(field_to_ndc([1200.0, 800.0], field, (600, 400)), [1.0, -1.0]);

        // Square viewport: horizontal fills, vertical is letterboxed
        let [x, y] = field_to_ndc([1200.0, 0.0], field, (800, 800));
        assert!((x - 1.0).abs() < 1e-6);
        assert!((y - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_transform_matches_field_to_ndc() {
        let field = Vec2::new(1200.0, 800.0);
        let view = ViewTransform::letterbox(field, (1000, 400));
        // Wide viewport: vertical fills, horizontal is pillarboxed
        let [x, y] = view.apply([0.0, 0.0]);
        assert!((x + 0.6).abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
        let [x, y] = view.apply([600.0, 400.0]);
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
        assert_eq!(
            view.apply([300.0, 700.0]),
            field_to_ndc([300.0, 700.0], field, (1000, 400))
        );
    }
}
