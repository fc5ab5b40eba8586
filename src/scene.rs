//! Scene rendering
//!
//! Scene-wide light and fog parameters, plus the macroquad drawing of the
//! ground, obstacle cubes, the active character and the HUD. Shading is
//! flat: one light factor per triangle, then a linear blend towards the fog
//! colour by distance from the camera.

use std::collections::HashMap;
use macroquad::prelude as mq;
use macroquad::prelude::{Color, FilterMode, Mesh, Texture2D, Vertex};
use macroquad::ui::{hash, root_ui, widgets};
use crate::asset::{ResourceKind, ResourcePool};
use crate::config::SceneConfig;
use crate::game::jump::JumpState;
use crate::game::shadow::{character_shadow, obstacle_shadow, BlobShadow};
use crate::game::{Character, ViewerSession};
use crate::math::{mat4_transform_point, Vec3};

/// Directional plus hemisphere intensity that renders a lit face unscaled
const FULL_BRIGHT: f32 = 7.5;
/// Direction the directional light shines from (towards the scene origin)
const LIGHT_FROM: Vec3 = Vec3::new(0.0, 200.0, 100.0);

const OBSTACLE_COLOR: [u8; 4] = [0x41, 0x69, 0xE1, 255];
const CONTACT_COLOR: [u8; 4] = [0xE1, 0x41, 0x41, 255];
const GROUND_COLOR: [u8; 4] = [0x20, 0x20, 0x20, 255];
const GRID_DIVISIONS: u32 = 20;

const LIGHT_RANGE: std::ops::Range<f32> = 0.0..10.0;
const FOG_RANGE: std::ops::Range<f32> = 100.0..3000.0;
const PANEL_POS: mq::Vec2 = mq::Vec2::new(10.0, 40.0);
const PANEL_SIZE: mq::Vec2 = mq::Vec2::new(260.0, 80.0);

/// Triangles per macroquad mesh (keeps each draw call under the batch limit)
const TRIANGLES_PER_MESH: usize = 1000;

/// Rim vertices of a blob shadow disc
const SHADOW_SEGMENTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    pub light_intensity: f32,
    pub hemisphere_intensity: f32,
    pub fog_near: f32,
    pub fog_far: f32,
    pub fog_color: [u8; 3],
}

impl SceneParams {
    pub fn new(config: &SceneConfig) -> Self {
        let [_, r, g, b] = config.fog_color.to_be_bytes();
        let mut params = Self {
            light_intensity: 0.0,
            hemisphere_intensity: 0.0,
            fog_near: config.fog_distance * 0.5,
            fog_far: config.fog_distance,
            fog_color: [r, g, b],
        };
        params.set_light_intensity(config.light_intensity);
        params
    }

    /// Light slider: directional gets `value`, hemisphere half of it
    pub fn set_light_intensity(&mut self, value: f32) {
        self.light_intensity = value.max(0.0);
        self.hemisphere_intensity = self.light_intensity * 0.5;
    }

    /// Fog slider: `value` becomes the far distance
    pub fn set_fog_distance(&mut self, value: f32) {
        self.fog_far = value.max(0.0);
        self.fog_near = self.fog_far * 0.0005;
    }

    /// 0.0 (no fog) to 1.0 (fully fogged)
    pub fn fog_factor(&self, distance: f32) -> f32 {
        if distance <= self.fog_near {
            0.0
        } else if self.fog_far <= self.fog_near {
            1.0
        } else {
            ((distance - self.fog_near) / (self.fog_far - self.fog_near)).min(1.0)
        }
    }

    /// Brightness multiplier for a face with the given normal
    pub fn light_factor(&self, normal: Vec3) -> f32 {
        let diffuse = normal.normalize().dot(LIGHT_FROM.normalize()).max(0.0);
        ((self.hemisphere_intensity + self.light_intensity * diffuse) / FULL_BRIGHT).clamp(0.0, 2.0)
    }

    /// Lit and fogged colour of a face `distance` away from the camera
    pub fn shade(&self, color: [u8; 4], normal: Vec3, distance: f32) -> [u8; 4] {
        let light = self.light_factor(normal);
        let fog = self.fog_factor(distance);
        let mut out = color;
        for i in 0..3 {
            let lit = (color[i] as f32 * light).min(255.0);
            out[i] = (lit * (1.0 - fog) + self.fog_color[i] as f32 * fog) as u8;
        }
        out
    }

    pub fn background(&self) -> Color {
        let [r, g, b] = self.fog_color;
        Color::from_rgba(r, g, b, 255)
    }
}

fn mq_vec(v: Vec3) -> mq::Vec3 {
    mq::vec3(v.x, v.y, v.z)
}

fn mq_color(c: [u8; 4]) -> Color {
    Color::from_rgba(c[0], c[1], c[2], c[3])
}

/// Draws a [`ViewerSession`]. Holds GPU textures keyed by resource handle id.
#[derive(Default)]
pub struct SceneRenderer {
    textures: HashMap<u64, Texture2D>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, session: &ViewerSession) {
        self.prune_textures(&session.resources);

        let params = &session.scene;
        let camera = &session.camera;
        mq::clear_background(params.background());
        mq::set_camera(&mq::Camera3D {
            position: mq_vec(camera.position),
            target: mq_vec(camera.target),
            up: mq_vec(camera.up),
            fovy: camera.fov.to_radians(),
            aspect: Some(camera.aspect),
            ..Default::default()
        });

        let ground = session.config.scene.ground_size * 0.5;
        let ground_color = params.shade(GROUND_COLOR, Vec3::UP, 0.0);
        mq::draw_plane(mq::Vec3::ZERO, mq::vec2(ground, ground), None, mq_color(ground_color));
        mq::draw_grid(
            GRID_DIVISIONS,
            session.config.scene.ground_size / GRID_DIVISIONS as f32,
            mq::Color::from_rgba(0, 0, 0, 80),
            mq::Color::from_rgba(0, 0, 0, 50),
        );

        for obstacle in &session.obstacles {
            if (obstacle.position - camera.position).len() <= camera.far {
                if let Some(shadow) = obstacle_shadow(obstacle) {
                    draw_shadow(&shadow);
                }
            }
        }
        if let Some(shadow) = session.swapper.character().and_then(character_shadow) {
            draw_shadow(&shadow);
        }

        for obstacle in &session.obstacles {
            let distance = (obstacle.position - camera.position).len();
            if distance > camera.far {
                continue;
            }
            let base = if session.contacts.contains(&obstacle.id) { CONTACT_COLOR } else { OBSTACLE_COLOR };
            let color = params.shade(base, Vec3::UP, distance);
            let size = mq::vec3(obstacle.size, obstacle.size, obstacle.size);
            mq::draw_cube(mq_vec(obstacle.position), size, None, mq_color(color));
        }

        if let Some(character) = session.swapper.character() {
            self.draw_character(character, params, camera.position);
        }

        mq::set_default_camera();
        draw_hud(session);
    }

    fn draw_character(&mut self, character: &Character, params: &SceneParams, eye: Vec3) {
        let matrix = character.transform.to_matrix();

        for (index, part) in character.parts.iter().enumerate() {
            let offset = character.part_offset(index);
            let world: Vec<Vec3> = part
                .positions
                .iter()
                .map(|&p| mat4_transform_point(&matrix, p + offset))
                .collect();

            let texture = match (part.texture_id(), &part.texture_data) {
                (Some(id), Some(data)) if part.uvs.len() == part.positions.len() => {
                    Some(self.textures.entry(id).or_insert_with(|| {
                        let texture = Texture2D::from_rgba8(data.width, data.height, &data.rgba);
                        texture.set_filter(FilterMode::Nearest);
                        texture
                    }).clone())
                }
                _ => None,
            };

            for chunk in part.indices.chunks(TRIANGLES_PER_MESH * 3) {
                let mut vertices = Vec::with_capacity(chunk.len());
                for tri in chunk.chunks_exact(3) {
                    let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                    let normal = (world[b] - world[a]).cross(world[c] - world[a]);
                    let center = (world[a] + world[b] + world[c]) * (1.0 / 3.0);
                    let color = mq_color(params.shade(part.color, normal, (center - eye).len()));

                    for i in [a, b, c] {
                        let p = world[i];
                        let [u, v] = if texture.is_some() { part.uvs[i] } else { [0.0, 0.0] };
                        vertices.push(Vertex::new(p.x, p.y, p.z, u, v, color));
                    }
                }
                let indices = (0..vertices.len() as u16).collect();
                mq::draw_mesh(&Mesh { vertices, indices, texture: texture.clone() });
            }
        }
    }

    /// Drop GPU textures whose resource handle was released
    fn prune_textures(&mut self, pool: &ResourcePool) {
        self.textures.retain(|id, _| pool.is_live(*id));
    }
}

/// Flat translucent disc on the floor, drawn as a triangle fan
fn draw_shadow(shadow: &BlobShadow) {
    let color = Color::from_rgba(0, 0, 0, shadow.alpha);
    let c = shadow.center;
    let mut vertices = Vec::with_capacity(SHADOW_SEGMENTS + 1);
    vertices.push(Vertex::new(c.x, c.y, c.z, 0.0, 0.0, color));
    for i in 0..SHADOW_SEGMENTS {
        let angle = i as f32 / SHADOW_SEGMENTS as f32 * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        vertices.push(Vertex::new(c.x + shadow.radius * cos, c.y, c.z + shadow.radius * sin, 0.0, 0.0, color));
    }

    let mut indices = Vec::with_capacity(SHADOW_SEGMENTS * 3);
    for i in 0..SHADOW_SEGMENTS as u16 {
        indices.extend_from_slice(&[0, 1 + i, 1 + (i + 1) % SHADOW_SEGMENTS as u16]);
    }
    mq::draw_mesh(&Mesh { vertices, indices, texture: None });
}

/// Sliders for light intensity and fog distance
pub fn draw_controls(params: &mut SceneParams) {
    let mut light = params.light_intensity;
    let mut fog = params.fog_far;

    widgets::Window::new(hash!(), PANEL_POS, PANEL_SIZE)
        .label("Scene")
        .movable(false)
        .ui(&mut *root_ui(), |ui| {
            ui.slider(hash!(), "light", LIGHT_RANGE, &mut light);
            ui.slider(hash!(), "fog", FOG_RANGE, &mut fog);
        });

    if light != params.light_intensity {
        params.set_light_intensity(light);
    }
    if fog != params.fog_far {
        params.set_fog_distance(fog);
    }
}

/// Whether the pointer is over the slider panel
pub fn controls_hovered() -> bool {
    let (x, y) = mq::mouse_position();
    mq::Rect::new(PANEL_POS.x, PANEL_POS.y, PANEL_SIZE.x, PANEL_SIZE.y).contains(mq::vec2(x, y))
}

/// Text lines describing the active character, jump and collisions
fn hud_lines(session: &ViewerSession) -> Vec<String> {
    let mut lines = Vec::new();

    match session.swapper.character() {
        Some(character) => {
            let clip = character.animation.as_ref().and_then(|player| {
                let index = player.current_clip()?;
                let clip = player.clip(index)?;
                let state = if player.is_playing() { "playing" } else { "held" };
                Some(format!("{} {:.2}s/{:.2}s {}", clip.name, player.time(), clip.duration, state))
            });
            lines.push(format!("{}: {}", character.name, clip.unwrap_or_else(|| "no clip".to_string())));
        }
        None => lines.push("no character".to_string()),
    }

    let jump = match session.jump.state() {
        JumpState::Ready => "ready",
        JumpState::Active { .. } => "airborne",
        JumpState::Complete => "landed",
    };
    lines.push(format!("jump: {}  loads in flight: {}", jump, session.swapper.in_flight()));

    let hits: Vec<String> = session.events.collision.iter().map(|e| e.obstacle.0.to_string()).collect();
    lines.push(format!("contacts ({}): {}", session.events.collision.len(), hits.join(" ")));

    let pool = &session.resources;
    lines.push(format!(
        "resources: {} (geometry {} material {} texture {})",
        pool.live_count(),
        pool.live_count_of(ResourceKind::Geometry),
        pool.live_count_of(ResourceKind::Material),
        pool.live_count_of(ResourceKind::Texture),
    ));

    if let Some(home) = session.swapper.idle_reference() {
        lines.push(format!("idle reference: ({:.0}, {:.0}, {:.0})", home.x, home.y, home.z));
    }
    lines
}

fn draw_hud(session: &ViewerSession) {
    mq::draw_text(&format!("{} FPS", mq::get_fps()), 10.0, 24.0, 24.0, mq::WHITE);
    let right = mq::screen_width() - 420.0;
    for (i, line) in hud_lines(session).iter().enumerate() {
        mq::draw_text(line, right, 24.0 + i as f32 * 20.0, 18.0, mq::WHITE);
    }
    mq::draw_text(&session.status, 10.0, mq::screen_height() - 40.0, 20.0, mq::WHITE);
    mq::draw_text(
        "WASD move  arrows pan  space jump  1-5 animations  drag orbit",
        10.0,
        mq::screen_height() - 16.0,
        18.0,
        mq::LIGHTGRAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use crate::asset::cube_asset;
    use crate::config::ViewerConfig;
    use crate::game::swapper::tests::ManualSource;

    #[test]
    fn test_defaults_follow_config() {
        let params = SceneParams::new(&SceneConfig::default());
        assert_eq!(params.light_intensity, 5.0);
        assert_eq!(params.hemisphere_intensity, 2.5);
        assert_eq!(params.fog_near, 500.0);
        assert_eq!(params.fog_far, 1000.0);
        assert_eq!(params.fog_color, [0xa0, 0xa0, 0xa0]);
    }

    #[test]
    fn test_sliders() {
        let mut params = SceneParams::new(&SceneConfig::default());
        params.set_light_intensity(2.0);
        assert_eq!(params.hemisphere_intensity, 1.0);

        params.set_fog_distance(2000.0);
        assert_eq!(params.fog_far, 2000.0);
        assert!((params.fog_near - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fog_blend() {
        let params = SceneParams::new(&SceneConfig::default());
        assert_eq!(params.fog_factor(100.0), 0.0);
        assert!((params.fog_factor(750.0) - 0.5).abs() < 1e-6);
        assert_eq!(params.fog_factor(5000.0), 1.0);

        let far = params.shade([0, 0, 255, 255], Vec3::UP, 5000.0);
        assert_eq!(far, [0xa0, 0xa0, 0xa0, 255]);
    }

    #[test]
    fn test_faces_away_from_light_get_ambient_only() {
        let params = SceneParams::new(&SceneConfig::default());
        let lit = params.light_factor(LIGHT_FROM);
        let dark = params.light_factor(-LIGHT_FROM);
        assert!((lit - 1.0).abs() < 1e-5);
        assert!((dark - 2.5 / FULL_BRIGHT).abs() < 1e-5);
    }

    #[test]
    fn test_zero_fog_distance_is_fully_fogged() {
        let mut params = SceneParams::new(&SceneConfig::default());
        params.set_fog_distance(0.0);
        assert_eq!(params.fog_factor(1.0), 1.0);
    }

    #[test]
    fn test_hud_describes_session() {
        let source = Rc::new(ManualSource::default());
        let mut session = ViewerSession::new(ViewerConfig::default(), Box::new(Rc::clone(&source)), 1);
        session.obstacles.clear();
        assert_eq!(hud_lines(&session)[0], "no character");

        session.start();
        assert!(hud_lines(&session)[1].ends_with("loads in flight: 1"));

        source.complete(0, Ok(cube_asset(2, false)));
        session.tick(0.0, 0.0);
        let lines = hud_lines(&session);
        assert!(lines[0].starts_with("Idle: "), "{}", lines[0]);
        assert!(lines[0].ends_with("playing"), "{}", lines[0]);
        assert_eq!(lines[1], "jump: ready  loads in flight: 0");
        assert_eq!(lines[2], "contacts (0): ");
        assert_eq!(lines[4], "idle reference: (0, 0, 0)");
    }
}
