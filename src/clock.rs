//! Simulation clock.
//!
//! Every timer in the core (cooldowns, invulnerability, animations) is a
//! timestamp compared against `GameClock::now_ms`. The clock only moves when
//! the engine ticks, so a paused game freezes every timer with it.

/// Game time in milliseconds since the session started
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    pub now_ms: u64,
}

impl GameClock {
    pub fn new() -> Self {
        Self { now_ms: 0 }
    }

    /// Advance by one frame and return the context systems update with
    pub fn advance(&mut self, dt_ms: u64) -> FrameContext {
        self.now_ms += dt_ms;
        FrameContext {
            now_ms: self.now_ms,
            dt_ms,
        }
    }

    pub fn frame(&self, dt_ms: u64) -> FrameContext {
        FrameContext {
            now_ms: self.now_ms,
            dt_ms,
        }
    }
}

/// Timing for a single simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    pub now_ms: u64,
    pub dt_ms: u64,
}

impl FrameContext {
    pub fn at(now_ms: u64) -> Self {
        Self { now_ms, dt_ms: 16 }
    }

    /// Milliseconds elapsed since `since`, saturating at zero
    pub fn since(&self, since: u64) -> u64 {
        self.now_ms.saturating_sub(since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut clock = GameClock::new();
        clock.advance(16);
        let ctx = clock.advance(17);
        assert_eq!(ctx.now_ms, 33);
        assert_eq!(ctx.dt_ms, 17);
    }

    #[test]
    fn test_since_saturates() {
        let ctx = FrameContext::at(100);
        assert_eq!(ctx.since(40), 60);
        assert_eq!(ctx.since(500), 0);
    }
}
