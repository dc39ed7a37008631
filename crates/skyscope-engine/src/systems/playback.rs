//! Timed advancement of the simulated clock.

use crate::core::time::{ClockTime, TimeUnit, WallClock};
use crate::core::timer::IntervalTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Follow the wall clock.
    Realtime,
    Day,
    Month,
    Year,
}

impl PlaybackMode {
    pub fn interval_ms(self) -> f64 {
        match self {
            PlaybackMode::Realtime => 1000.0,
            PlaybackMode::Day => 500.0,
            PlaybackMode::Month => 333.0,
            PlaybackMode::Year => 250.0,
        }
    }

    /// Stable numeric code for the host bridge. 0 means stopped.
    pub fn code(self) -> u32 {
        match self {
            PlaybackMode::Realtime => 1,
            PlaybackMode::Day => 2,
            PlaybackMode::Month => 3,
            PlaybackMode::Year => 4,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(PlaybackMode::Realtime),
            2 => Some(PlaybackMode::Day),
            3 => Some(PlaybackMode::Month),
            4 => Some(PlaybackMode::Year),
            _ => None,
        }
    }

    fn unit(self) -> Option<TimeUnit> {
        match self {
            PlaybackMode::Realtime => None,
            PlaybackMode::Day => Some(TimeUnit::Day),
            PlaybackMode::Month => Some(TimeUnit::Month),
            PlaybackMode::Year => Some(TimeUnit::Year),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    /// `rate` calendar units per tick; negative plays backwards.
    Playing { mode: PlaybackMode, rate: i32 },
}

#[derive(Debug, Clone)]
pub struct PlaybackController {
    state: PlaybackState,
    timer: Option<IntervalTimer>,
    max_ticks_per_frame: u32,
}

impl PlaybackController {
    pub fn new(max_ticks_per_frame: u32) -> Self {
        Self {
            state: PlaybackState::Stopped,
            timer: None,
            max_ticks_per_frame,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state != PlaybackState::Stopped
    }

    /// Start `mode` at `rate`, or stop if exactly that is already playing.
    pub fn toggle(&mut self, mode: PlaybackMode, rate: i32) -> PlaybackState {
        let requested = PlaybackState::Playing { mode, rate };
        if self.state == requested {
            self.stop();
        } else {
            // Any previous interval is dropped before the new one starts.
            self.timer = Some(IntervalTimer::new(mode.interval_ms(), self.max_ticks_per_frame));
            self.state = requested;
            log::info!("playback {mode:?} x{rate}");
        }
        self.state
    }

    pub fn stop(&mut self) {
        if self.is_playing() {
            log::info!("playback stopped");
        }
        self.timer = None;
        self.state = PlaybackState::Stopped;
    }

    /// Number of playback ticks due after `dt_ms`.
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        self.timer.as_mut().map_or(0, |t| t.accumulate(dt_ms))
    }

    /// The clock after one tick.
    pub fn step(&self, clock: ClockTime, wall: &dyn WallClock) -> ClockTime {
        match self.state {
            PlaybackState::Stopped => clock,
            PlaybackState::Playing { mode, rate } => match mode.unit() {
                None => wall.now(),
                Some(unit) => clock.advance(unit, rate),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;

    fn start() -> ClockTime {
        ClockTime::from_ymd_hms(2024, 1, 31, 12, 0, 0).unwrap()
    }

    #[test]
    fn toggle_same_mode_twice_stops() {
        let mut p = PlaybackController::new(4);
        p.toggle(PlaybackMode::Day, 1);
        assert!(p.is_playing());
        assert_eq!(p.toggle(PlaybackMode::Day, 1), PlaybackState::Stopped);
        assert_eq!(p.advance(10_000.0), 0);
    }

    #[test]
    fn switching_mode_replaces_timer() {
        let mut p = PlaybackController::new(4);
        p.toggle(PlaybackMode::Day, 1);
        p.advance(400.0);
        p.toggle(PlaybackMode::Year, 1);
        assert_eq!(p.advance(200.0), 0);
        assert_eq!(p.advance(50.0), 1);
    }

    #[test]
    fn different_rate_restarts_instead_of_stopping() {
        let mut p = PlaybackController::new(4);
        p.toggle(PlaybackMode::Day, 1);
        assert_eq!(
            p.toggle(PlaybackMode::Day, -1),
            PlaybackState::Playing { mode: PlaybackMode::Day, rate: -1 }
        );
    }

    #[test]
    fn step_advances_by_mode() {
        let wall = FixedClock(ClockTime::from_ymd_hms(2030, 6, 1, 0, 0, 0).unwrap());
        let mut p = PlaybackController::new(4);

        p.toggle(PlaybackMode::Day, -2);
        assert_eq!(p.step(start(), &wall).to_string(), "2024/01/29 12:00:00");

        p.toggle(PlaybackMode::Month, 1);
        assert_eq!(p.step(start(), &wall).to_string(), "2024/03/02 12:00:00");

        p.toggle(PlaybackMode::Realtime, 1);
        assert_eq!(p.step(start(), &wall), wall.0);

        p.stop();
        assert_eq!(p.step(start(), &wall), start());
    }

    #[test]
    fn mode_codes_round_trip() {
        for mode in [PlaybackMode::Realtime, PlaybackMode::Day, PlaybackMode::Month, PlaybackMode::Year] {
            assert_eq!(PlaybackMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(PlaybackMode::from_code(0), None);
    }
}
