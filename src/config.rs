// config.rs - Tunables for the arena scene
//
// Built once by the host and shared by reference with the level, its
// particles and the HUD. Every field has a default, so a JSON document
// only needs to carry what it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::sim::EnvironmentType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Downward speed added to every particle each frame.
    pub gravity: f64,
    /// Horizontal drift is drawn uniformly from `[-drift, drift)`.
    pub drift: f64,
    /// Particles are scaled to a `draw_size` square on the canvas.
    pub draw_size: f64,
    /// One spawn roll in `spawn_probability` succeeds.
    pub spawn_probability: u32,
    /// Round length in frames.
    pub max_time: u32,
    /// Extra distance below the canvas a particle must fall before it is culled.
    pub cull_margin: f64,
    /// Optional cap on live particles. `None` lets every spawn roll through.
    pub max_particles: Option<usize>,

    pub image_path: String,
    pub default_background: String,
    /// Allowed background names. Empty accepts any well-formed image file name.
    pub backgrounds: Vec<String>,
    pub background_fill: u32,

    /// Forces the environment instead of picking one at random.
    pub environment: Option<String>,
    pub sheets: Sheets,
    pub hud: HudConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            drift: 0.4,
            draw_size: 35.0,
            spawn_probability: 45,
            max_time: 60 * 120,
            cull_margin: 10.0,
            max_particles: None,
            image_path: "frontend/assets/images/".into(),
            default_background: "china-bg.jpg".into(),
            backgrounds: Vec::new(),
            background_fill: 0x29_45_52,
            environment: None,
            sheets: Sheets::default(),
            hud: HudConfig::default(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.spawn_probability == 0 {
            return Err(ArenaError::InvalidConfig("spawn_probability must be at least 1".into()));
        }
        if self.max_particles == Some(0) {
            return Err(ArenaError::InvalidConfig("max_particles must be at least 1 when set".into()));
        }
        if !(0.0..=1.0).contains(&self.hud.pause_alpha) {
            return Err(ArenaError::InvalidConfig(format!(
                "hud.pause_alpha must be within 0..=1, got {}",
                self.hud.pause_alpha
            )));
        }
        for (name, value) in [
            ("gravity", self.gravity),
            ("drift", self.drift),
            ("draw_size", self.draw_size),
            ("cull_margin", self.cull_margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ArenaError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        for kind in EnvironmentType::ALL {
            let sheet = self.sheet(kind);
            if sheet.frame_width == 0 {
                return Err(ArenaError::InvalidConfig(format!(
                    "{} sheet has zero frame width",
                    kind.name()
                )));
            }
            if sheet.frame_height == Some(0) {
                return Err(ArenaError::InvalidConfig(format!(
                    "{} sheet has zero frame height",
                    kind.name()
                )));
            }
            if sheet.frames == 0 {
                log::warn!("{} sheet declares no frames, treating it as one", kind.name());
            }
        }
        Ok(())
    }

    pub fn sheet(&self, kind: EnvironmentType) -> &SheetSpec {
        match kind {
            EnvironmentType::Sakura => &self.sheets.sakura,
            EnvironmentType::Snowflake => &self.sheets.snowflake,
            EnvironmentType::Thunder => &self.sheets.thunder,
            EnvironmentType::RedThunder => &self.sheets.red_thunder,
            EnvironmentType::Water => &self.sheets.water,
        }
    }

    pub fn sheet_path(&self, kind: EnvironmentType) -> String {
        format!("{}{}", self.image_path, self.sheet(kind).file)
    }
}

/// A sprite sheet laid out as a single row of equal-width frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub file: String,
    pub frames: u32,
    pub frame_width: u32,
    /// `None` takes the height of the decoded sheet.
    pub frame_height: Option<u32>,
}

impl SheetSpec {
    fn new(file: &str, frames: u32, frame_width: u32, frame_height: u32) -> Self {
        Self {
            file: file.into(),
            frames,
            frame_width,
            frame_height: Some(frame_height),
        }
    }

    /// Frame count with the floor of one applied.
    pub fn frame_count(&self) -> u32 {
        self.frames.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sheets {
    pub sakura: SheetSpec,
    pub snowflake: SheetSpec,
    pub thunder: SheetSpec,
    pub red_thunder: SheetSpec,
    pub water: SheetSpec,
}

impl Default for Sheets {
    fn default() -> Self {
        Self {
            sakura: SheetSpec::new("sakura.png", 3, 94, 94),
            snowflake: SheetSpec::new("snowflake.png", 8, 94, 94),
            thunder: SheetSpec::new("thunder.jpg", 4, 100, 150),
            red_thunder: SheetSpec::new("red-thunder.jpg", 6, 110, 160),
            water: SheetSpec::new("water.jpg", 6, 80, 80),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    pub max_health: f64,
    pub bar_width: f64,
    pub bar_height: f64,
    pub timer_radius: f64,
    pub offset: f64,
    pub frames_per_second: u32,
    pub bar_back: u32,
    pub bar_front: u32,
    pub timer_fill: u32,
    pub pause_fill: u32,
    /// Opacity of the pause overlay.
    pub pause_alpha: f64,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            max_health: 200.0,
            bar_width: 400.0,
            bar_height: 20.0,
            timer_radius: 45.0,
            offset: 20.0,
            frames_per_second: 120,
            bar_back: 0x00_07_0A,
            bar_front: 0x9E_B9_B3,
            timer_fill: 0x59_78_84,
            pause_fill: 0x00_07_0A,
            pause_alpha: 0.4,
        }
    }
}
