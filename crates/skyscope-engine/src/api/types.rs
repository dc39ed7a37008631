use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::core::scale::LevelRange;

/// Name of a selectable body. Unique within its level's snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A selected body together with the level it was picked at.
/// Only meaningful while that level is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: EntityId,
    pub level: LevelRange,
}

impl Selection {
    pub fn new(id: impl Into<EntityId>, level: LevelRange) -> Self {
        Self { id: id.into(), level }
    }
}

/// Source of a pointer event. Touch uses larger hit margins and a tap window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

impl PointerKind {
    pub fn from_code(code: u32) -> Self {
        if code == 1 {
            PointerKind::Touch
        } else {
            PointerKind::Mouse
        }
    }
}

/// A view event communicated from Rust to the host page.
/// `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ViewEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl ViewEvent {
    pub const FLOATS: usize = 4;

    /// The last snapshot should be redrawn. `a/b` = predicted translation.
    pub const REDRAW: f32 = 1.0;
    /// Status line changed. `a` = zoom level, `b` = 1 when it is a fallback.
    pub const STATUS: f32 = 2.0;
    /// Selection changed. `a` = 1 when something is selected.
    pub const SELECTION: f32 = 3.0;
    /// Clock changed. `a/b/c` = year, month, day.
    pub const CLOCK: f32 = 4.0;
    /// A sync failed. `a` = sequence number.
    pub const SYNC_FAILED: f32 = 5.0;
    /// Playback state changed. `a` = mode code (0 stopped), `b` = rate.
    pub const PLAYBACK: f32 = 6.0;
    /// Tap feedback started at `a/b`.
    pub const TOUCH_FEEDBACK: f32 = 7.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
