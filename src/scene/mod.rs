//! Per-frame rendering pipeline.
//!
//! [`Scene::render`] runs one frame to completion, single-threaded and
//! synchronous: backdrop, then one ray per screen column (walls + depth
//! buffer), then billboard sprites occluded against that depth buffer.
//! Foreground overlays (weapon, HUD) are the caller's business and happen
//! after `render` returns, ignoring depth entirely.

mod sprites;
mod walls;

use crate::renderer::{Layer, Surface};
use crate::world::camera::Camera;
use crate::world::grid::{GridMap, SpriteId};
use crate::world::texture::{TextureBank, TextureId};

/// Perpendicular distances this close to zero are degenerate geometry —
/// skipped or clamped, never propagated as errors.
const MIN_PERP: f32 = 1e-3;

/// Immutable view parameters, fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct ViewConfig {
    /// Horizontal resolution; also the length of both per-column buffers.
    pub width: usize,
    pub height: usize,
    /// Horizontal field of view, degrees.
    pub fov_deg: f32,
}

impl ViewConfig {
    pub fn new(width: usize, height: usize, fov_deg: f32) -> Self {
        assert!(width > 0 && height > 0);
        assert!(fov_deg > 0.0 && fov_deg < 180.0);
        Self { width, height, fov_deg }
    }

    /// Distance from the eye to the projection plane, in pixels:
    ///
    /// ```text
    /// proj = (width / 2) / tan(fov / 2)
    /// ```
    #[inline]
    pub fn proj_dist(&self) -> f32 {
        (self.width as f32 * 0.5) / (self.fov_deg * 0.5).to_radians().tan()
    }

    /// Angular spacing between adjacent column rays, degrees.
    #[inline]
    pub fn ray_step_deg(&self) -> f32 {
        self.fov_deg / self.width as f32
    }
}

/// One renderer instance: owns the per-column buffers and orchestrates a
/// frame. Both buffers are exactly `width` long and fully rebuilt every
/// frame before anything reads them; entries never survive across frames.
pub struct Scene {
    cfg: ViewConfig,
    proj_dist: f32,
    backdrop: TextureId,
    /// Perpendicular wall distance per screen column. Written once by the
    /// wall pass, read (never mutated) by the sprite pass.
    depth: Vec<f32>,
    /// Which sprite last drew into each column, for crosshair targeting.
    owner: Vec<Option<SpriteId>>,
}

impl Scene {
    /// `backdrop` is the flat floor/ceiling image blitted depth-independent
    /// behind everything.
    pub fn new(cfg: ViewConfig, backdrop: TextureId) -> Self {
        Self {
            cfg,
            proj_dist: cfg.proj_dist(),
            backdrop,
            depth: vec![0.0; cfg.width],
            owner: vec![None; cfg.width],
        }
    }

    #[inline]
    pub fn config(&self) -> ViewConfig {
        self.cfg
    }

    /// Render one complete frame into `surface`.
    ///
    /// `map` is mutable only for the sprite lifecycle hooks; tiles and
    /// camera are read-only throughout.
    pub fn render<S: Surface>(
        &mut self,
        map: &mut GridMap,
        camera: &Camera,
        bank: &TextureBank,
        surface: &mut S,
    ) {
        self.owner.fill(None);

        surface.draw_image(bank, self.backdrop, 0.0, 0.0, Layer::Background);
        self.draw_walls(map, camera, bank, surface);
        self.draw_sprites(&mut map.sprites, camera, bank, surface);
    }

    /// Which sprite, if any, is the topmost visible object at `column`.
    ///
    /// Stable between the end of one `render` call and the start of the
    /// next; the input layer typically asks about the centre column.
    pub fn sprite_at(&self, column: usize) -> Option<SpriteId> {
        self.owner.get(column).copied().flatten()
    }

    /// Per-column perpendicular wall distances of the last rendered frame.
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;
    use glam::vec2;

    #[test]
    fn proj_dist_matches_fov() {
        let cfg = ViewConfig::new(640, 480, 60.0);
        // 320 / tan(30°)
        assert!((cfg.proj_dist() - 554.2563).abs() < 1e-3);
        assert!((cfg.ray_step_deg() - 0.09375).abs() < 1e-6);
    }

    #[test]
    fn frame_order_is_backdrop_walls_sprites() {
        let (mut map, bank) = fixture();
        let spr = bank.id("SPR").unwrap();
        map.sprites.push(crate::world::Sprite::still(vec2(200.0, 96.0), spr));

        let camera = Camera::new(vec2(96.0, 96.0), 0.0, 0.5);
        let mut scene = Scene::new(ViewConfig::new(64, 48, 60.0), NO_BACKDROP);
        let mut rec = Recording::default();
        scene.render(&mut map, &camera, &bank, &mut rec);

        assert_eq!(rec.images, vec![(NO_BACKDROP, Layer::Background)]);
        let first_sprite = rec.strips.iter().position(|s| s.layer == Layer::Sprites);
        let last_wall = rec.strips.iter().rposition(|s| s.layer == Layer::Walls);
        assert!(last_wall.unwrap() < first_sprite.unwrap());
    }

    const NO_BACKDROP: TextureId = 0;

    #[test]
    fn owner_buffer_is_rebuilt_each_frame() {
        let (mut map, bank) = fixture();
        let spr = bank.id("SPR").unwrap();
        map.sprites.push(crate::world::Sprite::still(vec2(200.0, 96.0), spr));

        let camera = Camera::new(vec2(96.0, 96.0), 0.0, 0.5);
        let mut scene = Scene::new(ViewConfig::new(64, 48, 60.0), NO_BACKDROP);
        let mut rec = Recording::default();
        scene.render(&mut map, &camera, &bank, &mut rec);
        assert!(scene.sprite_at(32).is_some());

        // sprite removed: stale ownership must not leak into the next frame
        map.sprites.clear();
        scene.render(&mut map, &camera, &bank, &mut rec);
        assert!((0..64).all(|c| scene.sprite_at(c).is_none()));
    }
}
