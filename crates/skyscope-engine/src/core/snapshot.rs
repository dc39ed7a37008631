//! Server-computed scene for one scale level.
//!
//! A `Snapshot` is immutable once received. The engine replaces it
//! wholesale and never patches individual bodies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::scale::LevelRange;

fn default_color() -> String {
    "white".to_string()
}

/// The body drawn at the center of the level (the Sun or the home galaxy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterBody {
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub selected: bool,
}

impl CenterBody {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A planet, star or galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub radius: f32,
    /// Drawn dot radius. Planets carry one; stars and galaxies use `radius`.
    #[serde(default)]
    pub point_radius: Option<f32>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub selected: bool,
    /// Heliocentric ecliptic longitude in radians (planets only).
    #[serde(default)]
    pub longitude_rad: Option<f32>,
}

impl Body {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Radius used for drawing and hit testing.
    pub fn hit_radius(&self) -> f32 {
        self.point_radius.unwrap_or(self.radius)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitRing {
    #[serde(default)]
    pub name: String,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZodiacSign {
    pub name: String,
    /// Start of the sign on the ecliptic, counter-clockwise from +x.
    pub degrees: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zodiac {
    pub radius: f32,
    #[serde(default)]
    pub signs: Vec<ZodiacSign>,
    #[serde(default)]
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiralArm {
    pub name: String,
    pub distance_ly: f32,
}

/// Scale of the milky-way drawing. The server's `relative_level` is not
/// read; the view derives its own from the zoom (`LevelParams`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomInfo {
    pub max_distance_ly: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: LevelRange,
    pub center: CenterBody,
    #[serde(default)]
    pub bodies: Vec<Body>,
    /// SolarSystem only. Index `i` is the orbit of canonical body `i + 1`.
    #[serde(default)]
    pub orbits: Vec<OrbitRing>,
    #[serde(default)]
    pub zodiac: Option<Zodiac>,
    /// MilkyWay only.
    #[serde(default)]
    pub spiral_arms: Vec<SpiralArm>,
    #[serde(default)]
    pub zoom_info: Option<ZoomInfo>,
}

impl Snapshot {
    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Position of a named entity, center body included.
    pub fn position_of(&self, name: &str) -> Option<Vec2> {
        if name == self.center_name() {
            return Some(self.center.position());
        }
        self.body(name).map(Body::position)
    }

    /// Name of the center body, falling back to the level's canonical name.
    pub fn center_name(&self) -> &str {
        if self.center.name.is_empty() {
            self.level.center_name()
        } else {
            &self.center.name
        }
    }
}

/// A snapshot together with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFrame {
    pub snapshot: Snapshot,
    /// Pan offset sent with the request. Positions in the snapshot already
    /// include it.
    pub pan_basis: Vec2,
    pub seq: u64,
}

impl SnapshotFrame {
    pub fn new(snapshot: Snapshot, pan_basis: Vec2, seq: u64) -> Self {
        Self { snapshot, pan_basis, seq }
    }

    /// Translation to apply on top of the snapshot for the live pan offset.
    pub fn predicted_translation(&self, pan: Vec2) -> Vec2 {
        pan - self.pan_basis
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_snapshot() {
        let json = r#"{
            "level": "milky_way",
            "center": {"x": 300, "y": 300, "radius": 8},
            "bodies": [{"name": "Sirius", "x": 310, "y": 290, "radius": 3, "color": "white"}],
            "zoom_info": {"max_distance_ly": 100, "relative_level": 2}
        }"#;
        let snap: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.level, LevelRange::MilkyWay);
        assert_eq!(snap.center_name(), "Sonne");
        assert_eq!(snap.bodies[0].hit_radius(), 3.0);
        assert!(snap.orbits.is_empty());
        assert_eq!(snap.zoom_info, Some(ZoomInfo { max_distance_ly: 100.0 }));
    }

    #[test]
    fn position_of_includes_center() {
        let snap = fixtures::solar();
        assert_eq!(snap.position_of("Sonne"), Some(Vec2::new(300.0, 300.0)));
        assert_eq!(snap.position_of("Erde"), Some(Vec2::new(320.0, 300.0)));
        assert_eq!(snap.position_of("Mars"), None);
    }

    #[test]
    fn predicted_translation_is_pan_minus_basis() {
        let frame = SnapshotFrame::new(fixtures::solar(), Vec2::new(10.0, 5.0), 1);
        assert_eq!(frame.predicted_translation(Vec2::new(40.0, -5.0)), Vec2::new(30.0, -10.0));
    }
}
