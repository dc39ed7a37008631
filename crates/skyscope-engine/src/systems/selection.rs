//! Hit testing of pointer positions against a snapshot.

use glam::Vec2;

use crate::api::config::HitMargins;
use crate::api::types::{EntityId, PointerKind};
use crate::core::scale::LevelRange;
use crate::core::snapshot::Snapshot;

/// Orbit ring `i` belongs to `SOLAR_BODIES[i + 1]`.
pub const SOLAR_BODIES: [&str; 10] = [
    "Sonne", "Merkur", "Venus", "Erde", "Mars", "Jupiter", "Saturn", "Uranus", "Neptun", "Pluto",
];

/// Find the body under `point` (snapshot coordinates).
///
/// Priority is center body, then the nearest body, then (solar system only)
/// the nearest orbit ring. Equal distances keep the earlier candidate in
/// snapshot order; which one that is depends on the order the source sent.
pub fn hit_test(
    snapshot: &Snapshot,
    point: Vec2,
    pointer: PointerKind,
    margins: &HitMargins,
) -> Option<EntityId> {
    let level = snapshot.level;
    let center = snapshot.center.position();

    if point.distance(center) < snapshot.center.radius + margins.center(level, pointer) {
        return Some(EntityId::new(snapshot.center_name()));
    }

    let body_margin = margins.body(level, pointer);
    let nearest = snapshot
        .bodies
        .iter()
        .map(|b| (b, point.distance(b.position())))
        .filter(|(b, d)| *d < b.hit_radius() + body_margin)
        .fold(None::<(&str, f32)>, |best, (b, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((b.name.as_str(), d)),
        });
    if let Some((name, _)) = nearest {
        return Some(EntityId::new(name));
    }

    if level == LevelRange::SolarSystem {
        return hit_orbit_ring(snapshot, point.distance(center), margins.ring_tolerance);
    }
    None
}

fn hit_orbit_ring(snapshot: &Snapshot, distance: f32, tolerance: f32) -> Option<EntityId> {
    snapshot
        .orbits
        .iter()
        .enumerate()
        .filter_map(|(i, ring)| {
            let name = SOLAR_BODIES.get(i + 1)?;
            let off = (distance - ring.radius).abs();
            (off < tolerance).then_some((*name, off))
        })
        .fold(None::<(&str, f32)>, |best, (name, off)| match best {
            Some((_, best_off)) if best_off <= off => best,
            _ => Some((name, off)),
        })
        .map(|(name, _)| EntityId::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::fixtures;

    fn hit(snapshot: &Snapshot, x: f32, y: f32) -> Option<EntityId> {
        hit_test(snapshot, Vec2::new(x, y), PointerKind::Mouse, &HitMargins::default())
    }

    #[test]
    fn center_wins_over_nearby_planet() {
        let snap = fixtures::solar();
        assert_eq!(hit(&snap, 310.0, 300.0), Some(EntityId::new("Sonne")));
    }

    #[test]
    fn planet_wins_when_center_out_of_reach() {
        let mut snap = fixtures::solar();
        snap.center.radius = 2.0;
        assert_eq!(hit(&snap, 315.0, 300.0), Some(EntityId::new("Erde")));
    }

    #[test]
    fn nearest_planet_wins() {
        let mut snap = fixtures::solar();
        snap.center.radius = 2.0;
        snap.bodies.push(fixtures::body("Mars", 330.0, 300.0, 4.0));
        assert_eq!(hit(&snap, 327.0, 300.0), Some(EntityId::new("Mars")));
    }

    #[test]
    fn orbit_ring_fallback() {
        let snap = fixtures::solar();
        assert_eq!(hit(&snap, 448.0, 300.0), Some(EntityId::new("Erde")));
        assert_eq!(hit(&snap, 300.0, 470.0), None);
    }

    #[test]
    fn ring_tolerance_is_strict() {
        let snap = fixtures::solar();
        // 8 px off the Erde ring at 150.
        assert_eq!(hit(&snap, 458.0, 300.0), None);
    }

    #[test]
    fn touch_margins_reach_further() {
        let mut snap = fixtures::solar();
        snap.center.radius = 2.0;
        let p = Vec2::new(320.0, 311.0);
        let m = HitMargins::default();
        assert_eq!(hit_test(&snap, p, PointerKind::Mouse, &m), None);
        assert_eq!(hit_test(&snap, p, PointerKind::Touch, &m), Some(EntityId::new("Erde")));
    }

    #[test]
    fn no_ring_fallback_outside_solar_system() {
        let mut snap = fixtures::solar();
        snap.level = LevelRange::MilkyWay;
        assert_eq!(hit(&snap, 448.0, 300.0), None);
    }

    #[test]
    fn galaxies_use_home_galaxy_name() {
        let mut snap = fixtures::solar();
        snap.level = LevelRange::Galaxies;
        snap.center.name.clear();
        assert_eq!(hit(&snap, 305.0, 300.0), Some(EntityId::new("Milchstraße")));
    }

    #[test]
    fn miss_returns_none() {
        let snap = fixtures::solar();
        assert_eq!(hit(&snap, 10.0, 10.0), None);
    }
}
