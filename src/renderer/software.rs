use crate::renderer::{Layer, Rgba, Surface, WHITE};
use crate::world::texture::{TextureBank, TextureId};

/// CPU rasteriser: owns a scratch framebuffer for the whole frame and hands
/// it out through [`Software::end_frame`].
///
/// Rasterises commands immediately in call order, so the caller's
/// back-to-front ordering *is* the z-order.
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Software {
    pub fn new(width: usize, height: usize) -> Self {
        Self { scratch: vec![0; width * height], width, height }
    }

    /// Clear the scratch buffer to dark grey.
    pub fn begin_frame(&mut self) {
        self.scratch.fill(0xFF_20_20_20);
    }

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Window callers pass `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    pub fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, px: Rgba) {
        if (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y) {
            self.scratch[y as usize * self.width + x as usize] = px;
        }
    }

    #[cfg(test)]
    fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.scratch[y * self.width + x]
    }
}

/// Per-channel modulation; the common `WHITE` tint short-circuits.
fn modulate(px: Rgba, tint: Rgba) -> Rgba {
    if tint == WHITE {
        return px;
    }
    let mut out = 0u32;
    for shift in [0, 8, 16, 24] {
        let c = (px >> shift) & 0xFF;
        let t = (tint >> shift) & 0xFF;
        out |= (c * t / 255) << shift;
    }
    out
}

impl Surface for Software {
    fn draw_strip(
        &mut self,
        bank: &TextureBank,
        tex: TextureId,
        texel_col: usize,
        x: f32,
        y: f32,
        _layer: Layer,
        x_scale: f32,
        y_scale: f32,
        tint: Rgba,
    ) {
        let tex = bank.get(tex);
        if texel_col >= tex.w || x_scale <= 0.0 || y_scale <= 0.0 {
            return;
        }

        let x0 = x.floor() as i32;
        // at least one pixel wide so sub-pixel strips stay visible
        let x1 = ((x + x_scale).ceil() as i32).max(x0 + 1);
        let y0 = y.floor() as i32;
        let dst_h = ((tex.h as f32 * y_scale).round() as i32).max(1);

        for sx in x0.max(0)..x1.min(self.width as i32) {
            for dy in 0..dst_h {
                let sy = y0 + dy;
                if sy < 0 || sy >= self.height as i32 {
                    continue;
                }
                let v = ((dy as f32 / y_scale) as usize).min(tex.h - 1);
                let px = tex.pixels[v * tex.w + texel_col];
                if px >> 24 == 0 {
                    continue; // transparent texel
                }
                self.put(sx, sy, modulate(px, tint));
            }
        }
    }

    fn draw_image(
        &mut self,
        bank: &TextureBank,
        tex: TextureId,
        x: f32,
        y: f32,
        _layer: Layer,
    ) {
        let tex = bank.get(tex);
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        for ty in 0..tex.h {
            for tx in 0..tex.w {
                let px = tex.pixels[ty * tex.w + tx];
                if px >> 24 == 0 {
                    continue;
                }
                self.put(x0 + tx as i32, y0 + ty as i32, px);
            }
        }
    }
}
