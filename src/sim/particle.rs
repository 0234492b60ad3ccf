// particle.rs - One falling decorative sprite
//
// A particle always renders the same frame of its theme's sheet. It owns
// its sheet handle: decode results are delivered by id through the
// population, and a failed particle keeps falling but never draws again.

use super::EnvironmentType;
use crate::config::Config;
use crate::render::{Asset, Canvas, ImageRef, Rect, Surface};

pub type ParticleId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Sheet requested, no answer yet.
    Pending,
    /// Sheet decoded with these natural dimensions.
    Loaded { width: u32, height: u32 },
    /// Decode or draw failed. Terminal.
    Failed,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub id: ParticleId,
    pub kind: EnvironmentType,

    // Position (canvas space, top-left of the drawn square)
    pub x: f64,
    pub y: f64,
    pub drift: f64,

    // Sheet geometry
    pub frame: u32,
    pub frames: u32,
    pub frame_width: u32,
    pub frame_height: Option<u32>,

    pub size: f64,
    gravity: f64,
    state: LoadState,
}

impl Particle {
    pub fn new(
        id: ParticleId,
        kind: EnvironmentType,
        config: &Config,
        canvas: Canvas,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let sheet = config.sheet(kind);
        let frames = sheet.frame_count();

        Self {
            id,
            kind,
            x: rng.f64() * canvas.width,
            y: -config.draw_size,
            drift: rng.f64() * 2.0 * config.drift - config.drift,
            frame: rng.u32(..frames),
            frames,
            frame_width: sheet.frame_width,
            frame_height: sheet.frame_height,
            size: config.draw_size,
            gravity: config.gravity,
            state: LoadState::Pending,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded { .. })
    }

    /// The sheet finished decoding.
    pub fn on_decoded(&mut self, width: u32, height: u32) {
        if self.state != LoadState::Pending {
            return;
        }
        self.state = LoadState::Loaded { width, height };

        match self.frame_height {
            None if height > 0 => self.frame_height = Some(height),
            Some(fh) if fh > height => log::warn!(
                "{} sheet is {}px tall but frames are configured {}px tall",
                self.kind,
                height,
                fh
            ),
            _ => {}
        }
        if u64::from(width) < u64::from(self.frame_width) * u64::from(self.frames) {
            log::warn!(
                "{} sheet is {}px wide, {} frames of {}px do not fit",
                self.kind,
                width,
                self.frames,
                self.frame_width
            );
        }

        log::debug!(
            "particle {} sheet decoded ({}), frame {}x{}",
            self.id,
            self.kind,
            self.frame_width,
            self.frame_height.unwrap_or(0)
        );
    }

    pub fn on_decode_failed(&mut self) {
        if self.state != LoadState::Failed {
            log::error!("particle {} failed to decode {} sheet", self.id, self.kind);
        }
        self.state = LoadState::Failed;
    }

    /// The host could not draw this particle.
    pub fn on_draw_failed(&mut self) {
        if self.state == LoadState::Failed {
            return;
        }
        let (sheet_width, sheet_height) = match self.state {
            LoadState::Loaded { width, height } => (width, height),
            _ => (0, 0),
        };
        let src = self.source_rect().unwrap_or_default();
        self.report_draw_failure("host failed to draw", src, sheet_width, sheet_height);
    }

    /// Move one frame, then draw.
    pub fn advance(&mut self, surface: &mut dyn Surface, canvas: Canvas) {
        self.step(canvas);
        self.draw(surface);
    }

    fn step(&mut self, canvas: Canvas) {
        self.y += self.gravity;
        self.x += self.drift;

        // Horizontal wrap only; vertical exit is the population's business
        if self.x > canvas.width {
            self.x = -self.size;
        } else if self.x < -self.size {
            self.x = canvas.width;
        }
    }

    /// Crop rectangle of this particle's frame, once the frame height is known.
    pub fn source_rect(&self) -> Option<Rect> {
        let fh = self.frame_height?;
        let fw = self.frame_width as f64;
        Some(Rect::new(fw * self.frame as f64, 0.0, fw, fh as f64))
    }

    pub fn dest_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let LoadState::Loaded { width, height } = self.state else { return };
        if width == 0 {
            return;
        }
        let Some(src) = self.source_rect() else { return };
        let dst = self.dest_rect();

        let image = ImageRef {
            asset: Asset::Sheet { owner: self.id },
            width,
            height,
        };
        if surface.draw_image(image, src, dst).is_err() {
            self.report_draw_failure("surface refused the blit", src, width, height);
        }
    }

    fn report_draw_failure(&mut self, reason: &str, src: Rect, sheet_width: u32, sheet_height: u32) {
        let dst = self.dest_rect();
        log::error!(
            "error drawing {} particle {}: {reason} (sx={}, sy={}, sw={}, sh={}, dx={}, dy={}, dw={}, dh={}, sheet={}x{})",
            self.kind,
            self.id,
            src.x,
            src.y,
            src.w,
            src.h,
            dst.x,
            dst.y,
            dst.w,
            dst.h,
            sheet_width,
            sheet_height
        );
        self.state = LoadState::Failed;
    }
}
