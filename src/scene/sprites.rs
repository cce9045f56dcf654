use crate::renderer::{Layer, Surface, WHITE};
use crate::scene::{MIN_PERP, Scene};
use crate::world::camera::Camera;
use crate::world::grid::wrap_signed_deg;
use crate::world::sprite::Sprite;
use crate::world::texture::TextureBank;

impl Scene {
    /// Project every sprite as a camera-facing billboard, occluded per
    /// texel column against the wall depth buffer.
    ///
    /// Sprites are deliberately *not* sorted by distance: visibility is
    /// decided per column against the walls, so draw order only matters
    /// where two sprites overlap at similar depth (last drawn wins, which
    /// also holds for the owner buffer).
    pub(crate) fn draw_sprites<S: Surface>(
        &mut self,
        sprites: &mut [Sprite],
        camera: &Camera,
        bank: &TextureBank,
        surface: &mut S,
    ) {
        let width = self.cfg.width as f32;
        let height = self.cfg.height as f32;

        for (id, sprite) in sprites.iter_mut().enumerate() {
            let Sprite { state, behavior } = sprite;
            behavior.before_draw(state);

            // Rejections skip the rest of the sprite, post-draw hook
            // included, exactly like walking on to the next sprite.
            'project: {
                // dy mirrored: grid rows grow downward
                let dx = state.pos.x - camera.pos().x;
                let dy = -(state.pos.y - camera.pos().y);
                let distance = (dx * dx + dy * dy).sqrt();

                // relative bearing, mirrored for the same reason
                let rel =
                    wrap_signed_deg(-(dy.atan2(dx).to_degrees() - camera.angle_deg()));

                let perp = distance * rel.to_radians().cos();
                if perp <= MIN_PERP {
                    break 'project; // behind the camera (or on top of it)
                }

                let tex = bank.get(state.tex);
                // screen pixels covered by one texel at this depth
                let factor = self.proj_dist / perp;
                let size_w = factor * tex.w as f32;
                let size_h = factor * tex.h as f32;

                let x = rel.to_radians().tan() * self.proj_dist + (width - size_w) * 0.5;
                if x + size_w < 0.0 || x >= width {
                    break 'project; // fully off-screen
                }
                let y = (height - size_h) * 0.5;

                for texel in 0..tex.w {
                    let sx = x + texel as f32 * factor;
                    if sx < 0.0 || sx >= width {
                        continue;
                    }
                    let column = sx.floor() as usize;
                    if perp >= self.depth[column] {
                        continue; // a nearer wall owns this column
                    }

                    surface.draw_strip(
                        bank,
                        state.tex,
                        texel,
                        sx,
                        y,
                        Layer::Sprites,
                        factor,
                        factor,
                        WHITE,
                    );

                    // Half-open column range [sx, x + (texel+1)*factor) so
                    // oblique scale factors neither skip nor double-mark
                    // boundary columns; the tested column is always owned.
                    let next = (x + (texel + 1) as f32 * factor).floor() as usize;
                    for owned in column..next.max(column + 1).min(self.cfg.width) {
                        self.owner[owned] = Some(id);
                    }
                }

                behavior.after_draw(state);
            }
        }
    }
}
