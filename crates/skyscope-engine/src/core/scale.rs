//! Zoom level → scale level mapping and the per-level rendering parameters.
//!
//! Everything here is a pure function of the zoom level.

use serde::{Deserialize, Serialize};

/// Smallest zoom level (farthest out).
pub const ZOOM_MIN: i32 = -30;
/// Largest zoom level (closest in).
pub const ZOOM_MAX: i32 = 20;

/// Zoom levels at or above this value show the solar system.
const SOLAR_SYSTEM_FLOOR: i32 = -10;
/// Zoom levels at or above this value (and below the solar system) show the Milky Way.
const MILKY_WAY_FLOOR: i32 = -20;

/// Multiplicative zoom per level when zooming out.
const ZOOM_STEP_OUT: f64 = 1.1;
/// Multiplicative zoom per level when zooming into the solar system.
const ZOOM_STEP_IN: f64 = 1.5;

/// One of the three mutually exclusive visualization scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelRange {
    SolarSystem,
    MilkyWay,
    Galaxies,
}

impl LevelRange {
    /// Resolve the scale level for a zoom level.
    ///
    /// Boundary values belong to the closer range: `-10` is still the solar
    /// system and `-20` is still the Milky Way.
    pub fn resolve(zoom_level: i32) -> Self {
        if zoom_level >= SOLAR_SYSTEM_FLOOR {
            LevelRange::SolarSystem
        } else if zoom_level >= MILKY_WAY_FLOOR {
            LevelRange::MilkyWay
        } else {
            LevelRange::Galaxies
        }
    }

    /// Name of the body drawn at the center of this level.
    pub fn center_name(self) -> &'static str {
        match self {
            LevelRange::SolarSystem | LevelRange::MilkyWay => "Sonne",
            LevelRange::Galaxies => "Milchstraße",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LevelRange::SolarSystem => "solar_system",
            LevelRange::MilkyWay => "milky_way",
            LevelRange::Galaxies => "galaxies",
        }
    }

    /// Zoom level relative to the top of this level's band. Counts up from
    /// 0 as the view zooms out, so `-11..=-20` and `-21..=-30` both map onto
    /// `0..=9`. The solar system keeps the raw zoom level.
    fn relative_level(self, zoom_level: i32) -> i32 {
        match self {
            LevelRange::SolarSystem => zoom_level,
            LevelRange::MilkyWay => -(zoom_level + 11),
            LevelRange::Galaxies => -(zoom_level + 21),
        }
    }
}

/// Display hint for how true-to-scale the solar system is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Didactic,
    Transition,
    Realistic,
    MaxRealism,
    Stellar,
    Intergalactic,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Didactic => "DIDACTIC",
            ViewMode::Transition => "TRANSITION",
            ViewMode::Realistic => "REALISTIC",
            ViewMode::MaxRealism => "MAX REALISM",
            ViewMode::Stellar => "MILKY WAY",
            ViewMode::Intergalactic => "LOCAL GROUP",
        }
    }
}

/// Rendering parameters derived from a zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelParams {
    pub zoom_level: i32,
    pub level: LevelRange,
    /// Zoom level relative to the start of the level's band (0..=9 outside the solar system).
    pub relative_level: i32,
    /// Radius multiplier applied to orbit and distance rings.
    pub orbit_scale: f64,
    pub mode: ViewMode,
    pub show_zodiac: bool,
    pub show_outer_orbits: bool,
    pub show_spiral_arms: bool,
    pub show_spiral_arm_labels: bool,
    pub show_star_labels: bool,
    pub show_galaxy_labels: bool,
}

impl LevelParams {
    pub fn for_zoom(zoom_level: i32) -> Self {
        let level = LevelRange::resolve(zoom_level);
        let relative_level = level.relative_level(zoom_level);

        let orbit_scale = match level {
            LevelRange::SolarSystem if zoom_level <= 0 => 1.0,
            LevelRange::SolarSystem => ZOOM_STEP_IN.powi(zoom_level),
            LevelRange::MilkyWay => ZOOM_STEP_OUT.powi(-relative_level * 2),
            LevelRange::Galaxies => ZOOM_STEP_OUT.powi(-relative_level * 3),
        };

        let mode = match level {
            LevelRange::SolarSystem if zoom_level <= -5 => ViewMode::Didactic,
            LevelRange::SolarSystem if zoom_level <= 0 => ViewMode::Transition,
            LevelRange::SolarSystem if zoom_level <= 10 => ViewMode::Realistic,
            LevelRange::SolarSystem => ViewMode::MaxRealism,
            LevelRange::MilkyWay => ViewMode::Stellar,
            LevelRange::Galaxies => ViewMode::Intergalactic,
        };

        let solar = level == LevelRange::SolarSystem;
        let milky = level == LevelRange::MilkyWay;

        Self {
            zoom_level,
            level,
            relative_level,
            orbit_scale,
            mode,
            show_zodiac: solar && zoom_level <= 3,
            show_outer_orbits: solar && zoom_level <= 15,
            show_spiral_arms: milky && relative_level >= 5,
            show_spiral_arm_labels: milky && relative_level >= 7,
            show_star_labels: milky && relative_level <= 4,
            show_galaxy_labels: level == LevelRange::Galaxies && zoom_level >= -25,
        }
    }
}
