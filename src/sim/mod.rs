// sim/ - Per-frame level driver
//
// The host calls `Level::step` once per animation frame. Everything mutates
// synchronously inside that call; decode results arrive between frames as
// events keyed by particle id.

mod environment;
mod particle;
mod population;
mod timer;

pub use environment::EnvironmentType;
pub use particle::{LoadState, Particle, ParticleId};
pub use population::Population;
pub use timer::RoundTimer;

use std::fmt;

use crate::config::Config;
use crate::error::Result;
use crate::hud::{HealthBars, Hud, Winner};
use crate::render::{Canvas, Surface};
use crate::scene::Background;

/// What a frame reports back to the host. `None` from `step` means carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    TimeUp,
    Winner(Winner),
    Paused,
}

impl Signal {
    pub const fn name(self) -> &'static str {
        match self {
            Self::TimeUp => "timeUp",
            Self::Winner(winner) => winner.name(),
            Self::Paused => "paused",
        }
    }

    /// The round is over.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::TimeUp | Self::Winner(_))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    #[default]
    Running,
    Paused,
    Ended,
}

pub struct Level<H: Hud = HealthBars> {
    config: Config,
    canvas: Canvas,

    // Fixed for the level's lifetime
    environment: EnvironmentType,

    background: Background,
    particles: Population,
    timer: RoundTimer,
    hud: H,

    paused: bool,
    state: RoundState,
    rng: fastrand::Rng,
}

impl Level<HealthBars> {
    pub fn new(config: Config, canvas: Canvas, background: Option<&str>, rng: fastrand::Rng) -> Result<Self> {
        let hud = HealthBars::new(config.hud.clone(), canvas);
        Self::with_hud(config, canvas, background, hud, rng)
    }

    pub fn resize(&mut self, canvas: Canvas) {
        self.hud.resize(canvas);
        self.canvas = canvas;
        self.particles.clear();
    }
}

impl<H: Hud> Level<H> {
    /// Fails if `config` does not validate.
    pub fn with_hud(
        config: Config,
        canvas: Canvas,
        background: Option<&str>,
        hud: H,
        mut rng: fastrand::Rng,
    ) -> Result<Self> {
        config.validate()?;

        let environment = match config.environment.as_deref() {
            Some(name) => EnvironmentType::parse_or_default(name),
            None => EnvironmentType::random(&mut rng),
        };
        log::info!("selected environment type for this level: {environment}");

        Ok(Self {
            background: Background::new(&config, background),
            particles: Population::new(config.max_particles),
            timer: RoundTimer::new(config.max_time),
            environment,
            config,
            canvas,
            hud,
            paused: false,
            state: RoundState::Running,
            rng,
        })
    }

    /// One animation frame.
    pub fn step(&mut self, surface: &mut dyn Surface, player_health: f64, bot_health: f64, paused: bool) -> Option<Signal> {
        self.background.draw(surface, self.canvas);

        self.particles
            .maybe_spawn(self.environment, &self.config, self.canvas, &mut self.rng);
        self.particles
            .update(surface, self.canvas, self.config.cull_margin);

        let time_up = self.timer.tick();
        self.hud.draw_timer(surface, self.timer.remaining());
        let winner = self.hud.draw_health(surface, player_health, bot_health);
        self.hud.draw_names(surface);

        self.paused = paused;
        self.hud.draw_pause(surface, paused);

        let signal = if time_up {
            Some(Signal::TimeUp)
        } else if let Some(winner) = winner {
            Some(Signal::Winner(winner))
        } else if self.paused {
            Some(Signal::Paused)
        } else {
            None
        };

        self.state = match signal {
            Some(s) if s.is_terminal() => {
                log::info!("round over: {s}");
                self.particles.clear();
                RoundState::Ended
            }
            Some(Signal::Paused) => RoundState::Paused,
            _ => RoundState::Running,
        };

        signal
    }

    /// Starts a new round in place. The environment stays.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.particles.clear();
        self.paused = false;
        self.state = RoundState::Running;
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn environment(&self) -> EnvironmentType {
        self.environment
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn remaining(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn particles(&self) -> &Population {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut Population {
        &mut self.particles
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn sheet_path(&self) -> String {
        self.config.sheet_path(self.environment)
    }

    // Decode events

    pub fn take_decode_requests(&mut self) -> Vec<ParticleId> {
        self.particles.take_requests()
    }

    pub fn particle_decoded(&mut self, id: ParticleId, width: u32, height: u32) {
        self.particles.on_decoded(id, width, height);
    }

    pub fn particle_decode_failed(&mut self, id: ParticleId) {
        self.particles.on_decode_failed(id);
    }

    pub fn particle_draw_failed(&mut self, id: ParticleId) {
        if !self.particles.on_draw_failed(id) {
            log::debug!("draw failure for unknown particle {id} ignored");
        }
    }

    pub fn background_decoded(&mut self, width: u32, height: u32) {
        self.background.on_decoded(width, height);
    }

    pub fn background_decode_failed(&mut self) -> bool {
        self.background.on_decode_failed()
    }
}
