pub mod export;
pub mod image_io;
pub mod sequence;
pub mod ser;
pub mod source;
pub mod thresholds;

pub use sequence::ImageSequenceSource;
pub use ser::SerSource;
pub use source::{InMemorySource, VideoSource};
