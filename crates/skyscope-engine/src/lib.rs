pub mod api;
pub mod core;
pub mod systems;
#[cfg(feature = "vectors")]
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, HitMargins, Margin, ViewConfig};
pub use api::types::{EntityId, PointerKind, Selection, ViewEvent};
pub use api::view::{DataSource, SkyView};
pub use core::scale::{LevelParams, LevelRange, ViewMode, ZOOM_MAX, ZOOM_MIN};
pub use core::snapshot::{Body, CenterBody, Snapshot, SnapshotFrame};
pub use core::state::ViewportState;
pub use core::time::{ClockTime, FixedClock, TimeInput, TimeParseError, TimeUnit, WallClock};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::{
    decode_response, error_message, EntityInfo, StatusSummary, SyncError, SyncRequest, SyncResponse,
    EVENT_FLOATS, VERTEX_FLOATS,
};
pub use systems::playback::{PlaybackMode, PlaybackState};
pub use systems::sync::{StatusLine, StatusSource};

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorState, VectorVertex, VectorColor};
#[cfg(feature = "vectors")]
pub use renderer::{Label, SkyRenderer};
