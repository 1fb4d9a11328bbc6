//! Round clock.

use serde::{Deserialize, Serialize};

use crate::constants::Millis;

/// Counts a round down in milliseconds and reports whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    duration_ms: Millis,
    remaining_ms: Millis,
    running: bool,
}

impl RoundTimer {
    pub fn new(seconds: u32) -> Self {
        let duration_ms = Millis::from(seconds) * 1000;
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Full duration, stopped.
    pub fn reset(&mut self) {
        self.remaining_ms = self.duration_ms;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_ms == 0
    }

    pub fn remaining_ms(&self) -> Millis {
        self.remaining_ms
    }

    /// Seconds shown on the clock, rounded up.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_ms.div_ceil(1000) as u32
    }

    /// Count down by `dt`. Returns true when the displayed seconds changed.
    pub fn advance(&mut self, dt: Millis) -> bool {
        if !self.running || self.is_finished() {
            return false;
        }
        let shown = self.remaining_secs();
        self.remaining_ms = self.remaining_ms.saturating_sub(dt);
        if self.is_finished() {
            self.running = false;
        }
        self.remaining_secs() != shown
    }
}
