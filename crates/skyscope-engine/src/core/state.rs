use glam::Vec2;

use crate::api::types::{EntityId, Selection};
use crate::core::scale::{LevelRange, ZOOM_MAX, ZOOM_MIN};
use crate::core::snapshot::{Snapshot, SnapshotFrame};
use crate::core::time::ClockTime;

/// The client-side view state.
///
/// Fields are private so the zoom clamp and the level-scoped selection
/// cannot be bypassed.
#[derive(Debug, Clone)]
pub struct ViewportState {
    zoom_level: i32,
    pan: Vec2,
    selection: Option<Selection>,
    clock: ClockTime,
    last_snapshot: Option<SnapshotFrame>,
}

impl ViewportState {
    pub fn new(zoom_level: i32, clock: ClockTime) -> Self {
        Self {
            zoom_level: zoom_level.clamp(ZOOM_MIN, ZOOM_MAX),
            pan: Vec2::ZERO,
            selection: None,
            clock,
            last_snapshot: None,
        }
    }

    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    pub fn level(&self) -> LevelRange {
        LevelRange::resolve(self.zoom_level)
    }

    /// Apply `delta` only if the result stays in range. Returns whether the
    /// zoom changed.
    pub fn try_change_zoom(&mut self, delta: i32) -> bool {
        let target = self.zoom_level.saturating_add(delta);
        if delta == 0 || !(ZOOM_MIN..=ZOOM_MAX).contains(&target) {
            return false;
        }
        self.zoom_level = target;
        true
    }

    /// Jump to `level`. Out-of-range values are rejected.
    pub fn set_zoom(&mut self, level: i32) -> bool {
        if !(ZOOM_MIN..=ZOOM_MAX).contains(&level) {
            return false;
        }
        self.zoom_level = level;
        true
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn clock(&self) -> ClockTime {
        self.clock
    }

    pub fn set_clock(&mut self, clock: ClockTime) {
        self.clock = clock;
    }

    /// The stored selection, regardless of level.
    pub fn stored_selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The selection if it belongs to the active level.
    pub fn active_selection(&self) -> Option<&EntityId> {
        let level = self.level();
        self.selection
            .as_ref()
            .filter(|s| s.level == level)
            .map(|s| &s.id)
    }

    /// Select `id` at the active level. Returns whether the active selection changed.
    pub fn select(&mut self, id: EntityId) -> bool {
        let changed = self.active_selection() != Some(&id);
        self.selection = Some(Selection::new(id, self.level()));
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.take().is_some()
    }

    pub fn snapshot(&self) -> Option<&SnapshotFrame> {
        self.last_snapshot.as_ref()
    }

    /// Replace the live snapshot wholesale.
    pub fn replace_snapshot(&mut self, frame: SnapshotFrame) {
        self.last_snapshot = Some(frame);
    }

    /// Translation between the live pan and the snapshot's pan basis.
    pub fn predicted_translation(&self) -> Vec2 {
        self.last_snapshot
            .as_ref()
            .map(|f| f.predicted_translation(self.pan))
            .unwrap_or(Vec2::ZERO)
    }

    /// Snapshot usable for hit testing at the active level.
    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        let level = self.level();
        self.last_snapshot
            .as_ref()
            .map(|f| &f.snapshot)
            .filter(|s| s.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::fixtures;

    fn state(zoom: i32) -> ViewportState {
        ViewportState::new(zoom, ClockTime::from_unix_seconds(0))
    }

    #[test]
    fn zoom_stays_in_range() {
        let mut s = state(19);
        assert!(s.try_change_zoom(1));
        assert!(!s.try_change_zoom(1));
        assert_eq!(s.zoom_level(), 20);

        let mut s = state(-30);
        assert!(!s.try_change_zoom(-1));
        assert!(!s.set_zoom(-31));
        assert_eq!(s.zoom_level(), -30);
        assert_eq!(state(99).zoom_level(), 20);
    }

    #[test]
    fn selection_survives_zoom_within_level() {
        let mut s = state(-10);
        s.select(EntityId::new("Erde"));
        for _ in 0..5 {
            s.try_change_zoom(1);
        }
        assert_eq!(s.active_selection(), Some(&EntityId::new("Erde")));
    }

    #[test]
    fn selection_inactive_on_other_level_but_kept() {
        let mut s = state(-10);
        s.select(EntityId::new("Erde"));
        s.try_change_zoom(-1);
        assert_eq!(s.level(), LevelRange::MilkyWay);
        assert_eq!(s.active_selection(), None);
        assert!(s.stored_selection().is_some());
        s.try_change_zoom(1);
        assert_eq!(s.active_selection(), Some(&EntityId::new("Erde")));
    }

    #[test]
    fn select_reports_change() {
        let mut s = state(0);
        assert!(s.select(EntityId::new("Mars")));
        assert!(!s.select(EntityId::new("Mars")));
        assert!(s.clear_selection());
        assert!(!s.clear_selection());
    }

    #[test]
    fn stale_level_snapshot_is_not_current() {
        let mut s = state(0);
        s.replace_snapshot(SnapshotFrame::new(fixtures::solar(), Vec2::ZERO, 1));
        assert!(s.current_snapshot().is_some());
        s.set_zoom(-15);
        assert!(s.current_snapshot().is_none());
        assert!(s.snapshot().is_some());
    }

    #[test]
    fn predicted_translation_tracks_pan() {
        let mut s = state(0);
        assert_eq!(s.predicted_translation(), Vec2::ZERO);
        s.replace_snapshot(SnapshotFrame::new(fixtures::solar(), Vec2::new(5.0, 5.0), 1));
        s.pan_by(Vec2::new(20.0, -5.0));
        assert_eq!(s.predicted_translation(), Vec2::new(15.0, -10.0));
    }
}
