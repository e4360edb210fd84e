//! Pose overlay: joint angles, motion trails and squat counting on top of a
//! camera feed.
//!
//! The pipeline per frame is estimator → [`core::frame_processor`] →
//! [`core::overlay`]. [`core::pose_tracker::PoseTracker`] runs it on a timer
//! against a [`platform::pose::PoseEstimator`] and a
//! [`platform::pose::FrameSource`].

pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::config::{Config, DisplaySettings, OverlayStyle};
pub use crate::core::frame_processor::{FrameProcessor, SessionState};
pub use crate::core::overlay::{build_overlay, Overlay};
pub use crate::core::pose_tracker::PoseTracker;
pub use crate::models::frame::{AngleResult, FrameResult, OverlayUpdate, RepEvent, RepPhase, RepState};
pub use crate::models::pose::{BodyLandmark, JointId, Keypoint, Pose, PoseError, PoseResult};
