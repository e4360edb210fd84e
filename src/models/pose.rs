// Data models for body keypoints, tracked joints and the errors shared by the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// Keypoints (17 MoveNet landmarks)
// ==============================================================================

/// MoveNet body landmark indices (17 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl BodyLandmark {
    pub const COUNT: usize = 17;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        use BodyLandmark::*;
        const ALL: [BodyLandmark; BodyLandmark::COUNT] = [
            Nose,
            LeftEye,
            RightEye,
            LeftEar,
            RightEar,
            LeftShoulder,
            RightShoulder,
            LeftElbow,
            RightElbow,
            LeftWrist,
            RightWrist,
            LeftHip,
            RightHip,
            LeftKnee,
            RightKnee,
            LeftAnkle,
            RightAnkle,
        ];
        ALL.get(index).copied()
    }
}

/// A 2D keypoint with confidence score, in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub score: f32, // Detection confidence [0, 1]
}

impl Keypoint {
    pub fn new(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, score }
    }

    /// Strictly above the threshold; a score equal to it counts as lost.
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.score > threshold
    }

    pub fn position(&self) -> Point {
        Point { x: self.x, y: self.y }
    }
}

/// Plain 2D position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// All keypoints of one detected subject in one frame, in landmark order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Missing trailing keypoints are reported as `None` rather than panicking.
    pub fn keypoint(&self, landmark: BodyLandmark) -> Option<&Keypoint> {
        self.keypoints.get(landmark.index())
    }

    pub fn is_confident(&self, landmark: BodyLandmark, threshold: f32) -> bool {
        self.keypoint(landmark)
            .map(|kp| kp.is_confident(threshold))
            .unwrap_or(false)
    }
}

// ==============================================================================
// Tracked Joints
// ==============================================================================

/// The eight bilateral joints whose angles and trails are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointId {
    LeftKnee,
    RightKnee,
    LeftHip,
    RightHip,
    LeftElbow,
    RightElbow,
    LeftShoulder,
    RightShoulder,
}

impl JointId {
    pub const ALL: [JointId; 8] = [
        JointId::LeftKnee,
        JointId::RightKnee,
        JointId::LeftHip,
        JointId::RightHip,
        JointId::LeftElbow,
        JointId::RightElbow,
        JointId::LeftShoulder,
        JointId::RightShoulder,
    ];

    /// Keypoint at which the angle is measured
    pub fn vertex(self) -> BodyLandmark {
        match self {
            JointId::LeftKnee => BodyLandmark::LeftKnee,
            JointId::RightKnee => BodyLandmark::RightKnee,
            JointId::LeftHip => BodyLandmark::LeftHip,
            JointId::RightHip => BodyLandmark::RightHip,
            JointId::LeftElbow => BodyLandmark::LeftElbow,
            JointId::RightElbow => BodyLandmark::RightElbow,
            JointId::LeftShoulder => BodyLandmark::LeftShoulder,
            JointId::RightShoulder => BodyLandmark::RightShoulder,
        }
    }

    /// The two neighbouring keypoints spanning the angle, same side only
    pub fn neighbors(self) -> (BodyLandmark, BodyLandmark) {
        use BodyLandmark as L;
        match self {
            JointId::LeftKnee => (L::LeftHip, L::LeftAnkle),
            JointId::RightKnee => (L::RightHip, L::RightAnkle),
            JointId::LeftHip => (L::LeftShoulder, L::LeftKnee),
            JointId::RightHip => (L::RightShoulder, L::RightKnee),
            JointId::LeftElbow => (L::LeftShoulder, L::LeftWrist),
            JointId::RightElbow => (L::RightShoulder, L::RightWrist),
            JointId::LeftShoulder => (L::LeftHip, L::LeftElbow),
            JointId::RightShoulder => (L::RightHip, L::RightElbow),
        }
    }

    pub fn is_knee(self) -> bool {
        matches!(self, JointId::LeftKnee | JointId::RightKnee)
    }

    pub fn to_str(self) -> &'static str {
        match self {
            JointId::LeftKnee => "left_knee",
            JointId::RightKnee => "right_knee",
            JointId::LeftHip => "left_hip",
            JointId::RightHip => "right_hip",
            JointId::LeftElbow => "left_elbow",
            JointId::RightElbow => "right_elbow",
            JointId::LeftShoulder => "left_shoulder",
            JointId::RightShoulder => "right_shoulder",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        JointId::ALL
            .iter()
            .copied()
            .find(|joint| joint.to_str() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown joint: {}", s))
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Per-joint session controls: whether its angle and its trail are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointDisplay {
    #[serde(default)]
    pub show_angle: bool,
    #[serde(default)]
    pub show_trail: bool,
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Pose estimator not initialized")]
    NotInitialized,

    #[error("Pose tracking already running")]
    AlreadyRunning,

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Frame capture failed: {0}")]
    CaptureFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid replay script: {0}")]
    InvalidReplay(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PoseResult<T> = Result<T, PoseError>;
