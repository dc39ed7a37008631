pub mod auto_center;
pub mod feedback;
pub mod playback;
pub mod selection;
pub mod sync;
#[cfg(feature = "vectors")]
pub mod vector;
