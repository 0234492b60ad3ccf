// host.rs - Plays the browser's part: decodes images, answers decode
// requests between frames, replays nothing but counts what was drawn.

use std::path::PathBuf;

use arena_fx::assets::{self, Decoded};
use arena_fx::render::OP_SPRITE;
use arena_fx::{Encoder, Level, Signal};

#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub commands: u64,
    pub sprites: u64,
}

pub struct Host {
    level: Level,
    encoder: Encoder,
    assets: PathBuf,

    // The level's sheet never changes, decode it once
    sheet: Option<Option<Decoded>>,
    stats: Stats,
}

impl Host {
    pub fn new(level: Level, assets: PathBuf) -> Self {
        let canvas = level.canvas();
        Self {
            encoder: Encoder::new(canvas.width as u32, canvas.height as u32),
            level,
            assets,
            sheet: None,
            stats: Stats::default(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn load_background(&mut self) {
        loop {
            let path = self.assets.join(self.level.background().file());
            match assets::decode(&path) {
                Ok(img) => {
                    self.level.background_decoded(img.width, img.height);
                    return;
                }
                Err(err) => {
                    log::debug!("{err}");
                    if !self.level.background_decode_failed() {
                        return;
                    }
                }
            }
        }
    }

    fn sheet(&mut self) -> Option<Decoded> {
        if let Some(sheet) = self.sheet {
            return sheet;
        }
        let file = self.level.config().sheet(self.level.environment()).file.clone();
        let decoded = assets::decode(&self.assets.join(file))
            .map_err(|err| log::debug!("{err}"))
            .ok();
        self.sheet = Some(decoded);
        decoded
    }

    pub fn frame(&mut self, player_health: f64, bot_health: f64, paused: bool) -> Option<Signal> {
        for id in self.level.take_decode_requests() {
            match self.sheet() {
                Some(img) => self.level.particle_decoded(id, img.width, img.height),
                None => self.level.particle_decode_failed(id),
            }
        }

        self.encoder.clear();
        let signal = self.level.step(&mut self.encoder, player_health, bot_health, paused);

        self.stats.commands += self.encoder.commands() as u64;
        self.stats.sprites += self.encoder.iter().filter(|cmd| cmd[0] == OP_SPRITE).count() as u64;
        signal
    }
}
