//! Glide the pan offset back to the origin.

use glam::Vec2;

use crate::core::timer::IntervalTimer;

/// One frame of the glide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterStep {
    pub pan: Vec2,
    /// The glide ends with this step; `pan` is exactly zero.
    pub last: bool,
}

/// Stepped offsets from a starting pan towards `(0, 0)`.
///
/// Each step removes `pan / remaining_steps`. Once both axes are below
/// `epsilon`, or the step budget is used up, the offset snaps to zero and
/// the iterator ends.
#[derive(Debug, Clone)]
pub struct AutoCenter {
    pan: Vec2,
    remaining: u32,
    epsilon: f32,
    finished: bool,
}

impl AutoCenter {
    pub fn new(start: Vec2, steps: u32, epsilon: f32) -> Self {
        Self {
            pan: start,
            remaining: steps.max(1),
            epsilon,
            finished: false,
        }
    }
}

impl Iterator for AutoCenter {
    type Item = CenterStep;

    fn next(&mut self) -> Option<CenterStep> {
        if self.finished {
            return None;
        }
        self.pan -= self.pan / self.remaining as f32;
        self.remaining -= 1;

        let settled = self.pan.x.abs() < self.epsilon && self.pan.y.abs() < self.epsilon;
        if settled || self.remaining == 0 {
            self.pan = Vec2::ZERO;
            self.finished = true;
        }
        Some(CenterStep { pan: self.pan, last: self.finished })
    }
}

/// Runs an `AutoCenter` at a fixed frame interval. The first step is
/// taken immediately.
#[derive(Debug, Clone)]
pub struct AutoCenterDriver {
    steps: AutoCenter,
    frames: IntervalTimer,
    started: bool,
    cancelled: bool,
}

impl AutoCenterDriver {
    pub fn new(steps: AutoCenter, frame_ms: f64) -> Self {
        Self {
            steps,
            frames: IntervalTimer::new(frame_ms, 1),
            started: false,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Advance by `dt_ms`; returns the step due this frame, if any.
    pub fn tick(&mut self, dt_ms: f64) -> Option<CenterStep> {
        if self.cancelled {
            return None;
        }
        if !self.started {
            self.started = true;
            return self.steps.next();
        }
        if self.frames.accumulate(dt_ms) > 0 {
            self.steps.next()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glides_to_origin_in_at_most_ten_steps() {
        let steps: Vec<CenterStep> = AutoCenter::new(Vec2::new(100.0, 100.0), 10, 2.0).collect();
        assert!(steps.len() <= 10);
        let last = steps.last().unwrap();
        assert!(last.last);
        assert_eq!(last.pan, Vec2::ZERO);
        assert_eq!(steps.iter().filter(|s| s.last).count(), 1);
        assert!((steps[0].pan.x - 90.0).abs() < 1e-4);
    }

    #[test]
    fn small_offset_snaps_immediately() {
        let mut it = AutoCenter::new(Vec2::new(1.5, -1.0), 10, 2.0);
        assert_eq!(it.next(), Some(CenterStep { pan: Vec2::ZERO, last: true }));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn offsets_shrink_monotonically() {
        let steps: Vec<f32> = AutoCenter::new(Vec2::new(-300.0, 40.0), 10, 2.0)
            .map(|s| s.pan.length())
            .collect();
        assert!(steps.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn driver_steps_once_per_frame_interval() {
        let mut d = AutoCenterDriver::new(AutoCenter::new(Vec2::new(100.0, 0.0), 10, 2.0), 30.0);
        assert!(d.tick(0.0).is_some());
        assert!(d.tick(16.0).is_none());
        assert!(d.tick(16.0).is_some());
        // A long stall still yields a single step.
        assert!(d.tick(500.0).is_some());
        assert!(d.tick(0.0).is_none());
    }

    #[test]
    fn cancelled_driver_stops() {
        let mut d = AutoCenterDriver::new(AutoCenter::new(Vec2::new(100.0, 0.0), 10, 2.0), 30.0);
        d.tick(0.0);
        d.cancel();
        assert!(d.tick(1000.0).is_none());
    }
}
