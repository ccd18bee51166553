//! Gravity clock - a restartable periodic timer driven by elapsed time
//!
//! The host never hands the engine a real timer. Instead it reports elapsed
//! milliseconds and the clock answers how many gravity steps fell due. Arming
//! always restarts the phase, so a cadence change never carries a partial
//! interval over. Disarming guarantees no further steps until re-armed.

use crate::types::BASE_DROP_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravityClock {
    interval_ms: u32,
    elapsed_ms: u32,
    armed: bool,
    /// Bumped on every arm/disarm so hosts with their own timers can tell a
    /// stale schedule from the current one.
    generation: u32,
}

impl GravityClock {
    /// A disarmed clock at the base cadence
    pub fn new() -> Self {
        Self {
            interval_ms: BASE_DROP_MS,
            elapsed_ms: 0,
            armed: false,
            generation: 0,
        }
    }

    /// Cancel any running cadence and start a new one at `interval_ms`
    pub fn arm(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.elapsed_ms = 0;
        self.armed = true;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Stop delivering steps
    pub fn disarm(&mut self) {
        if self.armed {
            self.generation = self.generation.wrapping_add(1);
        }
        self.armed = false;
        self.elapsed_ms = 0;
    }

    /// Feed elapsed time; returns how many steps are due
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.armed {
            return 0;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        let due = self.elapsed_ms / self.interval_ms;
        self.elapsed_ms %= self.interval_ms;
        due
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Time until the next step, `None` while disarmed
    pub fn remaining_ms(&self) -> Option<u32> {
        self.armed.then(|| self.interval_ms - self.elapsed_ms)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Default for GravityClock {
    fn default() -> Self {
        Self::new()
    }
}
