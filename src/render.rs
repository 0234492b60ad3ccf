// render.rs - Encode draw calls to output buffer
//
// The host owns the 2D context and the decoded images. Each frame the
// engine records what to draw into a flat f64 buffer which the host replays.
//
// Record layout (STRIDE values per command):
//   op, asset, owner, sx, sy, sw, sh, dx, dy, dw, dh
//
//   op 1 = fill rect      asset = packed 0xRRGGBB, owner = alpha, rect in dx..dh
//   op 2 = background     whole image scaled into dx..dh
//   op 3 = sprite         sheet crop sx..sh into dx..dh, owner = particle id

use crate::error::DrawError;

pub const STRIDE: usize = 11;

pub const OP_FILL: f64 = 1.0;
pub const OP_BACKGROUND: f64 = 2.0;
pub const OP_SPRITE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: width as f64, height: height as f64 }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Which decoded image a blit reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Background,
    Sheet { owner: u32 },
}

/// A decoded image as the surface sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef {
    pub asset: Asset,
    pub width: u32,
    pub height: u32,
}

pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: u32) {
        self.shade_rect(rect, color, 1.0);
    }

    /// Fills `rect` with `color` at opacity `alpha`, blending over what is below.
    fn shade_rect(&mut self, rect: Rect, color: u32, alpha: f64);

    /// Copies `src` of `image` into `dst`.
    fn draw_image(&mut self, image: ImageRef, src: Rect, dst: Rect) -> Result<(), DrawError>;
}

pub struct Encoder {
    out: Vec<f64>,
    w: u32,
    h: u32,
}

impl Encoder {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            out: Vec::with_capacity(64 * STRIDE),
            w,
            h,
        }
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.out.clear();
    }

    pub fn clear(&mut self) {
        self.out.clear();
    }

    pub fn ptr(&self) -> *const f64 {
        self.out.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    /// Number of recorded commands.
    pub fn commands(&self) -> usize {
        self.out.len() / STRIDE
    }

    /// Recorded commands, one slice per command.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.out.chunks_exact(STRIDE)
    }

    #[inline]
    fn push(&mut self, op: f64, asset: f64, owner: f64, src: Rect, dst: Rect) {
        self.out.extend_from_slice(&[
            op, asset, owner, src.x, src.y, src.w, src.h, dst.x, dst.y, dst.w, dst.h,
        ]);
    }
}

impl Surface for Encoder {
    fn shade_rect(&mut self, rect: Rect, color: u32, alpha: f64) {
        let alpha = alpha.clamp(0.0, 1.0);
        self.push(OP_FILL, (color & 0xFF_FF_FF) as f64, alpha, Rect::default(), rect);
    }

    fn draw_image(&mut self, image: ImageRef, src: Rect, dst: Rect) -> Result<(), DrawError> {
        let sheet_w = image.width as f64;
        let sheet_h = image.height as f64;

        let valid = src.is_finite()
            && dst.is_finite()
            && src.x >= 0.0
            && src.y >= 0.0
            && src.w > 0.0
            && src.h > 0.0
            && src.x + src.w <= sheet_w
            && src.y + src.h <= sheet_h;

        if !valid {
            return Err(DrawError {
                src,
                dst,
                sheet_width: image.width,
                sheet_height: image.height,
            });
        }

        match image.asset {
            Asset::Background => self.push(OP_BACKGROUND, 0.0, 0.0, src, dst),
            Asset::Sheet { owner } => self.push(OP_SPRITE, 1.0, owner as f64, src, dst),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(width: u32, height: u32) -> ImageRef {
        ImageRef { asset: Asset::Sheet { owner: 7 }, width, height }
    }

    #[test]
    fn sprite_command_layout() {
        let mut enc = Encoder::new(800, 600);
        enc.draw_image(
            sheet(282, 94),
            Rect::new(188.0, 0.0, 94.0, 94.0),
            Rect::new(10.0, -35.0, 35.0, 35.0),
        )
        .unwrap();

        let cmd: Vec<&[f64]> = enc.iter().collect();
        assert_eq!(cmd.len(), 1);
        assert_eq!(cmd[0], &[OP_SPRITE, 1.0, 7.0, 188.0, 0.0, 94.0, 94.0, 10.0, -35.0, 35.0, 35.0]);
    }

    #[test]
    fn crop_past_sheet_edge_is_refused() {
        let mut enc = Encoder::new(800, 600);
        let err = enc
            .draw_image(sheet(100, 94), Rect::new(94.0, 0.0, 94.0, 94.0), Rect::new(0.0, 0.0, 35.0, 35.0))
            .unwrap_err();
        assert_eq!(err.sheet_width, 100);
        assert!(enc.is_empty());
    }

    #[test]
    fn non_finite_destination_is_refused() {
        let mut enc = Encoder::new(800, 600);
        let res = enc.draw_image(
            sheet(94, 94),
            Rect::new(0.0, 0.0, 94.0, 94.0),
            Rect::new(f64::NAN, 0.0, 35.0, 35.0),
        );
        assert!(res.is_err());
    }

    #[test]
    fn fill_packs_color() {
        let mut enc = Encoder::new(800, 600);
        enc.fill_rect(Rect::new(0.0, 0.0, 800.0, 600.0), 0x29_45_52);
        let cmd = enc.iter().next().unwrap();
        assert_eq!(cmd[0], OP_FILL);
        assert_eq!(cmd[1] as u32, 0x29_45_52);
        assert_eq!(cmd[2], 1.0);
        assert_eq!(enc.commands(), 1);
    }

    #[test]
    fn shade_carries_alpha() {
        let mut enc = Encoder::new(800, 600);
        enc.shade_rect(Rect::new(0.0, 0.0, 800.0, 600.0), 0x00_07_0A, 0.4);
        enc.shade_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 0x00_07_0A, 3.0);
        let alphas: Vec<f64> = enc.iter().map(|cmd| cmd[2]).collect();
        assert_eq!(alphas, vec![0.4, 1.0]);
    }
}
