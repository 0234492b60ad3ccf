// timer.rs - Round countdown, one tick per frame

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimer {
    remaining: u32,
    max: u32,
}

impl RoundTimer {
    pub fn new(max: u32) -> Self {
        Self { remaining: max, max }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Counts down one frame. Returns true when time runs out, at which
    /// point the timer has already been refilled for the next round.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = self.max;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.remaining = self.max;
    }
}
