pub mod palette;
pub mod sky;

pub use sky::{Label, SkyRenderer};
