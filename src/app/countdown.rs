#![allow(dead_code)]
//! Reveal countdown driven by the one-second UI tick

/// One-shot countdown. Reports expiry exactly once, however many ticks or
/// skips arrive afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    total: u32,
    remaining: u32,
    fired: bool,
}

impl Countdown {
    pub fn new(secs: u32) -> Self {
        Self {
            total: secs,
            remaining: secs,
            fired: false,
        }
    }

    /// Advance one second. Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        self.fire_if_done()
    }

    /// Jump to zero. Returns true if this caused the expiry.
    pub fn skip(&mut self) -> bool {
        self.remaining = 0;
        self.fire_if_done()
    }

    fn fire_if_done(&mut self) -> bool {
        if self.remaining == 0 && !self.fired {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_running(&self) -> bool {
        !self.fired
    }

    /// Fraction of time left, for gauges.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.remaining) / f64::from(self.total)
    }
}
