// Pose estimation platform integration
// Provides the estimator bridge and camera frame sources

pub mod camera;
pub mod estimator;

pub use camera::{FrameSource, SyntheticCamera};
pub use estimator::{DummyEstimator, PoseEstimator, ReplayEstimator, ReplayScript};
