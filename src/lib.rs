#[cfg(feature = "desktop")]
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod pose;
pub mod render;
