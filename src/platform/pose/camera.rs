// Camera frame sources feeding the pose estimator

use crate::models::capture::CameraFrame;
use crate::models::pose::{PoseError, PoseResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Source of video frames
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Latest frame, or `Ok(None)` while the camera is not ready
    async fn next_frame(&self) -> PoseResult<Option<CameraFrame>>;
}

/// Produces blank frames of a fixed size; stands in for a webcam
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    ready: AtomicBool,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ready: AtomicBool::new(true),
        }
    }

    /// Simulate the video element not being ready yet
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

#[async_trait]
impl FrameSource for SyntheticCamera {
    async fn next_frame(&self) -> PoseResult<Option<CameraFrame>> {
        if !self.ready.load(Ordering::SeqCst) {
            return Ok(None);
        }

        if self.width == 0 || self.height == 0 {
            return Err(PoseError::CaptureFailed(format!(
                "camera reported a {}x{} frame",
                self.width, self.height
            )));
        }

        Ok(Some(CameraFrame::blank(
            self.width,
            self.height,
            chrono::Utc::now().timestamp_millis(),
        )))
    }
}
