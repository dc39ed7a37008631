use glam::Vec2;

use crate::core::timer::IntervalTimer;

const GROWTH_PER_FRAME: f32 = 1.0;
const FADE_PER_FRAME: f32 = 0.05;

/// Expanding, fading ring drawn where a tap selected something.
#[derive(Debug, Clone)]
pub struct TapPulse {
    pub center: Vec2,
    pub radius: f32,
    pub opacity: f32,
    frames: IntervalTimer,
}

impl TapPulse {
    pub fn new(center: Vec2, radius: f32, opacity: f32, frame_ms: f64) -> Self {
        Self {
            center,
            radius,
            opacity,
            frames: IntervalTimer::new(frame_ms, 8),
        }
    }

    /// Advance the animation. Returns `false` once the ring has faded out.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        let frames = self.frames.accumulate(dt_ms) as f32;
        self.radius += GROWTH_PER_FRAME * frames;
        self.opacity = (self.opacity - FADE_PER_FRAME * frames).max(0.0);
        self.is_visible()
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}
