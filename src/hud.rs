// hud.rs - Timer, health bars, name labels and pause overlay
//
// Text (timer digits, names) is drawn by the host; this side only lays out
// the shapes and decides whether a combatant has won.

use std::fmt;

use crate::config::HudConfig;
use crate::render::{Canvas, Rect, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    Player,
    Bot,
}

impl Winner {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait Hud {
    fn draw_timer(&mut self, surface: &mut dyn Surface, remaining: u32);

    /// Draws both bars and reports a winner once either side is out of health.
    fn draw_health(&mut self, surface: &mut dyn Surface, player: f64, bot: f64) -> Option<Winner>;

    fn draw_names(&mut self, _surface: &mut dyn Surface) {}

    fn draw_pause(&mut self, surface: &mut dyn Surface, paused: bool);
}

pub struct HealthBars {
    config: HudConfig,
    canvas: Canvas,
}

impl HealthBars {
    pub fn new(config: HudConfig, canvas: Canvas) -> Self {
        Self { config, canvas }
    }

    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    /// Bars hang off either side of the timer disc. The player's bar grows
    /// leftwards from the disc, the bot's rightwards.
    fn bar_top(&self) -> f64 {
        self.config.timer_radius - self.config.bar_height + 5.0
    }

    fn player_bar(&self, fraction: f64) -> Rect {
        let right = self.canvas.width / 2.0 - self.config.timer_radius;
        let w = self.config.bar_width * fraction;
        Rect::new(right - w, self.bar_top(), w, self.config.bar_height)
    }

    fn bot_bar(&self, fraction: f64) -> Rect {
        let left = self.canvas.width / 2.0 + self.config.timer_radius;
        Rect::new(left, self.bar_top(), self.config.bar_width * fraction, self.config.bar_height)
    }

    fn fraction(&self, health: f64) -> f64 {
        if self.config.max_health <= 0.0 {
            return 0.0;
        }
        (health / self.config.max_health).clamp(0.0, 1.0)
    }
}

impl Hud for HealthBars {
    fn draw_timer(&mut self, surface: &mut dyn Surface, _remaining: u32) {
        let r = self.config.timer_radius;
        let cx = self.canvas.width / 2.0;
        surface.fill_rect(Rect::new(cx - r, self.config.offset - r / 2.0, r * 2.0, r * 2.0), self.config.timer_fill);
    }

    fn draw_health(&mut self, surface: &mut dyn Surface, player: f64, bot: f64) -> Option<Winner> {
        surface.fill_rect(self.player_bar(1.0), self.config.bar_back);
        surface.fill_rect(self.bot_bar(1.0), self.config.bar_back);
        surface.fill_rect(self.player_bar(self.fraction(player)), self.config.bar_front);
        surface.fill_rect(self.bot_bar(self.fraction(bot)), self.config.bar_front);

        if player <= 0.0 {
            Some(Winner::Bot)
        } else if bot <= 0.0 {
            Some(Winner::Player)
        } else {
            None
        }
    }

    fn draw_pause(&mut self, surface: &mut dyn Surface, paused: bool) {
        if paused {
            surface.shade_rect(self.canvas.bounds(), self.config.pause_fill, self.config.pause_alpha);
        }
    }
}
