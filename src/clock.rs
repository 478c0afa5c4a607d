//! Frame clock
//!
//! Turns host timestamps into per-tick deltas, capped so a long pause (window
//! hidden, debugger stop) cannot produce an oversized physics step.

use crate::consts::MAX_FRAME_DT;

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta in seconds since the previous call, capped at `MAX_FRAME_DT`
    ///
    /// The first call only primes the clock and returns 0. Timestamps that go
    /// backwards also yield 0.
    pub fn advance(&mut self, now_secs: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (now_secs - last).clamp(0.0, MAX_FRAME_DT as f64) as f32,
            None => 0.0,
        };
        self.last = Some(now_secs);
        dt
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
