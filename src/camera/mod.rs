pub mod capture;

pub use capture::{VideoFileWriter, VideoSource};
