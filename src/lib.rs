use wasm_bindgen::prelude::*;

// ============================================================================
// ARENA FX - Fight scene backdrop with falling decorative particles
// ============================================================================

pub mod config;
pub mod error;
pub mod hud;
pub mod render;
pub mod scene;
pub mod sim;

#[cfg(not(target_arch = "wasm32"))]
pub mod assets;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{ArenaError, DrawError, Result};
pub use hud::{HealthBars, Hud, Winner};
pub use render::{Canvas, Encoder, Rect, Surface};
pub use sim::{EnvironmentType, Level, Particle, RoundState, Signal};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

fn seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * u64::MAX as f64) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        fastrand::u64(..)
    }
}

#[wasm_bindgen]
pub struct Arena {
    level: Level,
    encoder: Encoder,
}

impl Arena {
    fn build(config: Config, w: u32, h: u32, background: Option<String>) -> Result<Self> {
        let rng = fastrand::Rng::with_seed(seed());
        Ok(Self {
            level: Level::new(config, Canvas::new(w, h), background.as_deref(), rng)?,
            encoder: Encoder::new(w, h),
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }
}

#[wasm_bindgen]
impl Arena {
    #[wasm_bindgen(constructor)]
    pub fn new(w: u32, h: u32, background: Option<String>) -> std::result::Result<Arena, JsError> {
        Ok(Self::build(Config::default(), w, h, background)?)
    }

    /// Same as the constructor with a JSON config overriding the defaults.
    pub fn with_config(w: u32, h: u32, background: Option<String>, config: &str) -> std::result::Result<Arena, JsError> {
        let config = Config::from_json(config)?;
        Ok(Self::build(config, w, h, background)?)
    }

    /// Runs one frame. Returns `undefined`, "timeUp", "player", "bot" or "paused".
    pub fn tick(&mut self, player_health: f64, bot_health: f64, paused: bool) -> Option<String> {
        self.encoder.clear();
        self.level
            .step(&mut self.encoder, player_health, bot_health, paused)
            .map(|signal| signal.name().to_string())
    }

    pub fn reset(&mut self) {
        self.level.reset();
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.encoder.resize(w, h);
        self.level.resize(Canvas::new(w, h));
    }

    pub fn environment(&self) -> String {
        self.level.environment().to_string()
    }

    pub fn sheet_path(&self) -> String {
        self.level.sheet_path()
    }

    pub fn background_path(&self) -> String {
        self.level.background().path()
    }

    pub fn background_decoded(&mut self, w: u32, h: u32) {
        self.level.background_decoded(w, h);
    }

    /// True when the host should decode `background_path()` again.
    pub fn background_decode_failed(&mut self) -> bool {
        self.level.background_decode_failed()
    }

    /// Particle ids waiting for their sheet.
    pub fn take_decode_requests(&mut self) -> Vec<u32> {
        self.level.take_decode_requests()
    }

    pub fn particle_decoded(&mut self, id: u32, w: u32, h: u32) {
        self.level.particle_decoded(id, w, h);
    }

    pub fn particle_decode_failed(&mut self, id: u32) {
        self.level.particle_decode_failed(id);
    }

    pub fn particle_draw_failed(&mut self, id: u32) {
        self.level.particle_draw_failed(id);
    }

    pub fn paused(&self) -> bool {
        self.level.is_paused()
    }

    pub fn remaining(&self) -> u32 {
        self.level.remaining()
    }

    pub fn particle_count(&self) -> usize {
        self.level.particles().len()
    }

    // Accessors for the command buffer
    pub fn output_ptr(&self) -> *const f64 { self.encoder.ptr() }
    pub fn output_len(&self) -> usize { self.encoder.len() }
    pub fn width(&self) -> u32 { self.encoder.width() }
    pub fn height(&self) -> u32 { self.encoder.height() }
}
