pub mod color;
pub mod consts;
pub mod detection;
pub mod error;
pub mod filters;
pub mod fit;
pub mod frame;
pub mod io;
pub mod physics;
pub mod segment;
pub mod tracker;
pub mod transform;
