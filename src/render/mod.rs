pub mod angle;
pub mod canvas;
pub mod font;
pub mod framebuffer;
#[cfg(feature = "desktop")]
pub mod mat_canvas;
pub mod markers;
pub mod segments;
pub mod style;
#[cfg(feature = "desktop")]
pub mod window;

pub use angle::{measure_angle, render_angle, AngleReading, SkipReason};
pub use canvas::{Canvas, Color};
pub use framebuffer::FrameBuffer;
#[cfg(feature = "desktop")]
pub use mat_canvas::MatCanvas;
pub use markers::render_markers;
pub use segments::render_connections;
pub use style::{ArcStyle, LineStyle, MarkerStyle, OverlayStyle};
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;
