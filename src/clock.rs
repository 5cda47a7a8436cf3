use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Idle,
    Scheduled,
    Cancelled,
}

/// Drives a mounted game: one `frame` per display tick while scheduled.
///
/// After `cancel` the loop never yields again, so late ticks cannot touch a
/// game that has been torn down.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    last: Option<Instant>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            last: None,
        }
    }

    /// Arm the loop. `now` becomes the reference point for the next `dt`.
    pub fn schedule(&mut self, now: Instant) {
        if self.state == LoopState::Idle {
            self.state = LoopState::Scheduled;
            self.last = Some(now);
        }
    }

    /// Stop producing frames until scheduled again.
    pub fn park(&mut self) {
        if self.state == LoopState::Scheduled {
            self.state = LoopState::Idle;
            self.last = None;
        }
    }

    pub fn cancel(&mut self) {
        self.state = LoopState::Cancelled;
        self.last = None;
    }

    #[cfg(test)]
    pub fn is_scheduled(&self) -> bool {
        self.state == LoopState::Scheduled
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == LoopState::Cancelled
    }

    /// Time since the previous frame, or `None` when not scheduled.
    pub fn frame(&mut self, now: Instant) -> Option<Duration> {
        if self.state != LoopState::Scheduled {
            return None;
        }
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);
        Some(dt)
    }
}

/// Fixed-period repeating timer fed with elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period: Duration,
    acc: Duration,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            acc: Duration::ZERO,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Returns how many times the timer fired during `dt`.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        self.acc += dt;
        let mut fired = 0;
        while self.acc >= self.period {
            self.acc -= self.period;
            fired += 1;
        }
        fired
    }
}

/// One-shot timer.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeout {
    remaining: Duration,
    done: bool,
}

impl Timeout {
    pub fn new(delay: Duration) -> Self {
        Self {
            remaining: delay,
            done: false,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// True exactly once, on the advance that crosses the deadline.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.done {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.done = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_loop_yields_only_when_scheduled() {
        let t0 = Instant::now();
        let mut lp = FrameLoop::new();
        assert!(lp.frame(t0).is_none());

        lp.schedule(t0);
        let dt = lp.frame(t0 + Duration::from_millis(16)).unwrap();
        assert_eq!(dt, Duration::from_millis(16));

        lp.park();
        assert!(lp.frame(t0 + Duration::from_millis(32)).is_none());
    }

    #[test]
    fn test_frame_loop_cancel_is_permanent() {
        let t0 = Instant::now();
        let mut lp = FrameLoop::new();
        lp.schedule(t0);
        lp.cancel();
        lp.schedule(t0);
        assert!(lp.is_cancelled());
        assert!(lp.frame(t0 + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_reschedule_resets_reference_point() {
        let t0 = Instant::now();
        let mut lp = FrameLoop::new();
        lp.schedule(t0);
        lp.park();
        lp.schedule(t0 + Duration::from_secs(5));
        let dt = lp.frame(t0 + Duration::from_millis(5010)).unwrap();
        assert_eq!(dt, Duration::from_millis(10));
    }

    #[test]
    fn test_interval_counts_multiple_fires() {
        let mut iv = Interval::from_millis(150);
        assert_eq!(iv.advance(Duration::from_millis(100)), 0);
        assert_eq!(iv.advance(Duration::from_millis(100)), 1);
        assert_eq!(iv.advance(Duration::from_millis(400)), 3);
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut t = Timeout::from_millis(500);
        assert!(!t.advance(Duration::from_millis(300)));
        assert!(t.advance(Duration::from_millis(300)));
        assert!(!t.advance(Duration::from_millis(300)));
        assert!(t.done);
    }
}
