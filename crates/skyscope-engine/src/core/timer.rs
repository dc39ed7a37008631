//! Virtual-time timers driven by the host frame loop.
//!
//! Times are milliseconds on the engine's monotonic clock (the sum of all
//! `tick` deltas). Nothing here reads a real clock.

/// One-shot timer whose deadline restarts on every `schedule` call.
/// Only the most recent schedule survives.
#[derive(Debug, Clone, Default)]
pub struct DebounceTimer {
    deadline: Option<f64>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) the timer to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64) {
        self.deadline = Some(now_ms + delay_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the deadline has passed, disarming
    /// the timer.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Repeating timer. Accumulates frame time and reports how many periods
/// elapsed, capped so a stalled frame cannot trigger a burst of catch-up
/// ticks.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: f64,
    accumulator: f64,
    max_per_frame: u32,
}

impl IntervalTimer {
    pub fn new(period_ms: f64, max_per_frame: u32) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            accumulator: 0.0,
            max_per_frame: max_per_frame.max(1),
        }
    }

    /// Add frame time. Returns the number of whole periods to run.
    pub fn accumulate(&mut self, dt_ms: f64) -> u32 {
        self.accumulator += dt_ms.max(0.0);
        self.accumulator = self
            .accumulator
            .min(self.period_ms * f64::from(self.max_per_frame));
        let ticks = (self.accumulator / self.period_ms) as u32;
        self.accumulator -= f64::from(ticks) * self.period_ms;
        ticks
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_fires_once_after_deadline() {
        let mut t = DebounceTimer::new();
        t.schedule(0.0, 100.0);
        assert!(!t.poll(99.0));
        assert!(t.poll(100.0));
        assert!(!t.poll(200.0));
        assert!(!t.is_pending());
    }

    #[test]
    fn reschedule_pushes_deadline_out() {
        let mut t = DebounceTimer::new();
        t.schedule(0.0, 100.0);
        t.schedule(80.0, 100.0);
        assert!(!t.poll(150.0));
        assert!(t.poll(180.0));
    }

    #[test]
    fn cancel_disarms() {
        let mut t = DebounceTimer::new();
        t.schedule(0.0, 100.0);
        t.cancel();
        assert!(!t.poll(500.0));
    }

    #[test]
    fn interval_accumulates_partial_frames() {
        let mut t = IntervalTimer::new(500.0, 4);
        assert_eq!(t.accumulate(300.0), 0);
        assert_eq!(t.accumulate(300.0), 1);
        assert_eq!(t.accumulate(400.0), 1);
    }

    #[test]
    fn interval_caps_catch_up() {
        let mut t = IntervalTimer::new(250.0, 4);
        assert_eq!(t.accumulate(60_000.0), 4);
        assert_eq!(t.accumulate(0.0), 0);
    }
}
