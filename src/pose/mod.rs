pub mod body_parts;
#[cfg(feature = "desktop")]
pub mod detector;
pub mod filter;
pub mod landmark;
#[cfg(feature = "desktop")]
pub mod preprocess;
pub mod replay;

pub use body_parts::{AngleJoint, Segment};
#[cfg(feature = "desktop")]
pub use detector::PoseDetector;
pub use filter::filter_landmarks;
pub use landmark::{Landmark, LandmarkIndex, LandmarkMap, PixelCoord};
#[cfg(feature = "desktop")]
pub use preprocess::{preprocess_for_blazepose, LetterboxInfo};
pub use replay::LandmarkReplay;
