pub mod scale;
pub mod snapshot;
pub mod state;
pub mod time;
pub mod timer;
