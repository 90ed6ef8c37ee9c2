pub mod annotate;
pub mod components;
pub mod locate;

pub use annotate::{annotate, draw_geometry};
pub use locate::locate;
