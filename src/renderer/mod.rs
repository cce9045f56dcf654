//! Rendering abstraction layer.
//!
//! *The scene pipeline never touches a pixel buffer directly.* It issues
//! [`Surface`] draw commands — scaled textured strips and flat images — and
//! any backend that implements the trait can rasterise them. The bundled
//! [`software`] backend draws into a CPU framebuffer; a GPU backend could
//! batch the same calls without the pipeline changing.

pub mod software;

pub use software::Software;

use crate::world::texture::{TextureBank, TextureId};

/// Pixel format of the software frame-buffer (`0xAARRGGBB`).
pub type Rgba = u32;

/// Neutral tint: draw texels unmodified.
pub const WHITE: Rgba = 0xFFFF_FFFF;

/// Z-order of a draw command. Backends that rasterise immediately rely on
/// the caller issuing commands back-to-front; the layer is still carried so
/// batching backends can sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Walls,
    Sprites,
    Weapon,
    Hud,
}

/// An abstract drawable target.
///
/// A *strip* is one texel-wide vertical column of a texture, scaled to
/// `x_scale` screen pixels wide and `y_scale` times its pixel height.
/// Walls draw one strip per screen column; sprites draw one per texel.
pub trait Surface {
    #[allow(clippy::too_many_arguments)]
    fn draw_strip(
        &mut self,
        bank: &TextureBank,
        tex: TextureId,
        texel_col: usize,
        x: f32,
        y: f32,
        layer: Layer,
        x_scale: f32,
        y_scale: f32,
        tint: Rgba,
    );

    /// Blit a full texture unscaled at `(x, y)` (backdrops, HUD plates).
    fn draw_image(&mut self, bank: &TextureBank, tex: TextureId, x: f32, y: f32, layer: Layer);
}
