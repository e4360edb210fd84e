// Pose estimator bridge
// Abstraction over whatever model turns a camera frame into body keypoints

use crate::models::capture::CameraFrame;
use crate::models::pose::{BodyLandmark, Pose, PoseError, PoseResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Pose estimator trait
/// Implement this to plug a model backend into the tracker
#[async_trait]
pub trait PoseEstimator: Send + Sync {
    /// Run inference on a frame. Zero poses means nobody was detected.
    async fn estimate_poses(&self, frame: &CameraFrame) -> PoseResult<Vec<Pose>>;

    /// Check if the model is loaded
    fn is_initialized(&self) -> bool;

    /// Get model info
    fn get_model_info(&self) -> String;
}

// ==============================================================================
// Replay Implementation (scripted poses)
// ==============================================================================

/// On-disk format of a recorded or synthetic pose sequence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Poses detected on each successive frame
    pub frames: Vec<Vec<Pose>>,
    /// Start over after the last frame instead of reporting nothing
    #[serde(default)]
    pub looping: bool,
}

/// Estimator that ignores the image and replays a fixed pose sequence
pub struct ReplayEstimator {
    script: ReplayScript,
    cursor: AtomicUsize,
}

impl ReplayEstimator {
    pub fn new(script: ReplayScript) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn load(path: &Path) -> PoseResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let script: ReplayScript = serde_json::from_str(&contents)?;

        if script.frames.is_empty() {
            return Err(PoseError::InvalidReplay(format!(
                "{} contains no frames",
                path.display()
            )));
        }

        let bad_pose = script
            .frames
            .iter()
            .flatten()
            .position(|pose| pose.keypoints.len() > BodyLandmark::COUNT);
        if let Some(index) = bad_pose {
            return Err(PoseError::InvalidReplay(format!(
                "pose {} has more than {} keypoints",
                index,
                BodyLandmark::COUNT
            )));
        }

        info!(frames = script.frames.len(), looping = script.looping, "loaded pose replay");
        Ok(Self::new(script))
    }

    /// Frames handed out so far
    pub fn frames_served(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    pub fn is_exhausted(&self) -> bool {
        !self.script.looping && self.frames_served() >= self.script.frames.len()
    }
}

#[async_trait]
impl PoseEstimator for ReplayEstimator {
    async fn estimate_poses(&self, _frame: &CameraFrame) -> PoseResult<Vec<Pose>> {
        let total = self.script.frames.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let slot = if self.script.looping { index % total } else { index };

        Ok(self.script.frames.get(slot).cloned().unwrap_or_default())
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn get_model_info(&self) -> String {
        format!(
            "Replay estimator ({} frames, looping: {})",
            self.script.frames.len(),
            self.script.looping
        )
    }
}

// ==============================================================================
// Dummy Implementation (no model wired)
// ==============================================================================

pub struct DummyEstimator;

#[async_trait]
impl PoseEstimator for DummyEstimator {
    async fn estimate_poses(&self, _frame: &CameraFrame) -> PoseResult<Vec<Pose>> {
        Ok(Vec::new())
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn get_model_info(&self) -> String {
        "Dummy estimator (no inference)".to_string()
    }
}
