use std::collections::BTreeSet;
use std::time::Duration;

/// Handle of one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameToken(pub u64);

/// Host frame scheduler
///
/// Each `request_frame` schedules exactly one callback; the host later hands
/// the returned token back to its owner. `cancel_frame` is synchronous: a
/// cancelled token is never delivered.
pub trait FrameClock {
    fn request_frame(&mut self) -> FrameToken;

    fn cancel_frame(&mut self, token: FrameToken);

    /// Monotonic time since the clock started
    fn now(&self) -> Duration;
}

/// Deterministic clock driven by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
    next_token: u64,
    pending: BTreeSet<FrameToken>,
    requested: u64,
    cancelled: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward and returns every due token, oldest first
    pub fn advance(&mut self, dt: Duration) -> Vec<FrameToken> {
        self.now += dt;
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        self.requested += 1;
        let token = FrameToken(self.next_token);
        self.pending.insert(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending.remove(&token) {
            self.cancelled += 1;
        }
    }

    fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn clock_delivers_requested_frames() {
        let mut clock = ManualClock::new();
        let a = clock.request_frame();
        let b = clock.request_frame();
        assert_ne!(a, b);
        assert_eq!(clock.pending(), 2);

        assert_eq!(clock.advance(FRAME), vec![a, b]);
        assert_eq!(clock.pending(), 0);
        assert!(clock.advance(FRAME).is_empty());
        assert_eq!(clock.now(), FRAME * 2);
    }

    #[test]
    fn cancelled_frame_is_never_delivered() {
        let mut clock = ManualClock::new();
        let token = clock.request_frame();
        clock.cancel_frame(token);

        assert!(clock.advance(FRAME).is_empty());
        assert_eq!(clock.cancelled(), 1);

        // Cancelling twice is a no-op
        clock.cancel_frame(token);
        assert_eq!(clock.cancelled(), 1);
    }

    #[test]
    fn clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.requested(), 0);
    }
}
