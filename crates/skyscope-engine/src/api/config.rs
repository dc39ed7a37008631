use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::PointerKind;
use crate::core::scale::{LevelRange, ZOOM_MAX, ZOOM_MIN};

/// Rejected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("initial zoom {0} outside {min}..={max}", min = ZOOM_MIN, max = ZOOM_MAX)]
    ZoomOutOfRange(i32),
}

/// Click tolerance around a body, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub mouse: f32,
    pub touch: f32,
}

impl Margin {
    pub const fn new(mouse: f32, touch: f32) -> Self {
        Self { mouse, touch }
    }

    pub fn for_pointer(&self, pointer: PointerKind) -> f32 {
        match pointer {
            PointerKind::Mouse => self.mouse,
            PointerKind::Touch => self.touch,
        }
    }
}

/// Hit-test margins per level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitMargins {
    /// Sun at the solar-system level.
    pub solar_center: Margin,
    /// Planets, added to their point radius.
    pub solar_body: Margin,
    /// Sun and stars at the Milky Way level.
    pub milky_way: Margin,
    /// Home galaxy and neighbours.
    pub galaxies: Margin,
    /// Allowed `|distance - ring radius|` for the orbit-ring fallback.
    pub ring_tolerance: f32,
}

impl Default for HitMargins {
    fn default() -> Self {
        Self {
            solar_center: Margin::new(10.0, 15.0),
            solar_body: Margin::new(5.0, 8.0),
            milky_way: Margin::new(8.0, 12.0),
            galaxies: Margin::new(10.0, 15.0),
            ring_tolerance: 8.0,
        }
    }
}

impl HitMargins {
    /// Margin around the center body of `level`.
    pub fn center(&self, level: LevelRange, pointer: PointerKind) -> f32 {
        match level {
            LevelRange::SolarSystem => self.solar_center.for_pointer(pointer),
            LevelRange::MilkyWay => self.milky_way.for_pointer(pointer),
            LevelRange::Galaxies => self.galaxies.for_pointer(pointer),
        }
    }

    /// Margin around the other bodies of `level`.
    pub fn body(&self, level: LevelRange, pointer: PointerKind) -> f32 {
        match level {
            LevelRange::SolarSystem => self.solar_body.for_pointer(pointer),
            LevelRange::MilkyWay => self.milky_way.for_pointer(pointer),
            LevelRange::Galaxies => self.galaxies.for_pointer(pointer),
        }
    }
}

/// Tunables for the view controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Canvas width in pixels.
    pub canvas_width: f32,
    /// Canvas height in pixels.
    pub canvas_height: f32,
    /// Zoom level at startup.
    pub initial_zoom: i32,
    /// Quiet period before a sync request is issued (ms).
    pub debounce_ms: f64,
    /// Cumulative pointer travel that turns a press into a drag (px).
    pub drag_threshold: f32,
    /// Longest touch press that still counts as a tap (ms).
    pub tap_window_ms: f64,
    /// Maximum auto-center frames.
    pub auto_center_steps: u32,
    /// Auto-center snaps to zero once both axes are below this (px).
    pub auto_center_epsilon: f32,
    /// Delay between auto-center frames (ms).
    pub auto_center_frame_ms: f64,
    pub hit_margins: HitMargins,
    /// Cap on playback ticks processed in one frame.
    pub max_playback_ticks_per_frame: u32,
    /// Starting radius of the tap feedback ring (px).
    pub feedback_radius: f32,
    /// Starting opacity of the tap feedback ring.
    pub feedback_opacity: f32,
    /// Feedback ring frame interval (ms).
    pub feedback_frame_ms: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            canvas_width: 600.0,
            canvas_height: 600.0,
            initial_zoom: -10,
            debounce_ms: 100.0,
            drag_threshold: 10.0,
            tap_window_ms: 300.0,
            auto_center_steps: 10,
            auto_center_epsilon: 2.0,
            auto_center_frame_ms: 30.0,
            hit_margins: HitMargins::default(),
            max_playback_ticks_per_frame: 4,
            feedback_radius: 20.0,
            feedback_opacity: 0.8,
            feedback_frame_ms: 16.0,
        }
    }
}

impl ViewConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", f64::from(self.canvas_width)),
            ("canvas_height", f64::from(self.canvas_height)),
            ("debounce_ms", self.debounce_ms),
            ("drag_threshold", f64::from(self.drag_threshold)),
            ("tap_window_ms", self.tap_window_ms),
            ("auto_center_steps", f64::from(self.auto_center_steps)),
            ("auto_center_frame_ms", self.auto_center_frame_ms),
            ("max_playback_ticks_per_frame", f64::from(self.max_playback_ticks_per_frame)),
            ("feedback_frame_ms", self.feedback_frame_ms),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(ZOOM_MIN..=ZOOM_MAX).contains(&self.initial_zoom) {
            return Err(ConfigError::ZoomOutOfRange(self.initial_zoom));
        }
        Ok(())
    }

    /// Canvas center. Centering moves the selected body here.
    pub fn canvas_center(&self) -> Vec2 {
        Vec2::new(self.canvas_width / 2.0, self.canvas_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = ViewConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.canvas_center(), Vec2::new(300.0, 300.0));
    }

    #[test]
    fn partial_override() {
        let json = r#"{ "debounce_ms": 250, "hit_margins": { "ring_tolerance": 4 } }"#;
        let config = ViewConfig::from_json(json).unwrap();
        assert_eq!(config.debounce_ms, 250.0);
        assert_eq!(config.hit_margins.ring_tolerance, 4.0);
        assert_eq!(config.hit_margins.solar_body, Margin::new(5.0, 8.0));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ViewConfig::from_json(r#"{ "drag_threshold": 0 }"#),
            Err(ConfigError::NotPositive { field: "drag_threshold", .. })
        ));
        assert!(matches!(
            ViewConfig::from_json(r#"{ "initial_zoom": 21 }"#),
            Err(ConfigError::ZoomOutOfRange(21))
        ));
        assert!(matches!(ViewConfig::from_json("[1]"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn touch_margins_are_larger() {
        let m = HitMargins::default();
        for level in [LevelRange::SolarSystem, LevelRange::MilkyWay, LevelRange::Galaxies] {
            assert!(m.center(level, PointerKind::Touch) > m.center(level, PointerKind::Mouse));
            assert!(m.body(level, PointerKind::Touch) > m.body(level, PointerKind::Mouse));
        }
    }
}
