// Pose Tracker - timed camera polling feeding the frame processor and renderer

use crate::core::config::{Config, DisplaySettings};
use crate::core::frame_processor::FrameProcessor;
use crate::core::overlay::{build_overlay, Overlay};
use crate::models::frame::{FrameResult, OverlayUpdate, RepState};
use crate::models::pose::{JointId, PoseError, PoseResult};
use crate::platform::pose::{FrameSource, PoseEstimator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ==============================================================================
// Pose Tracker
// ==============================================================================

/// Drives the camera → estimator → frame processor loop on a fixed cadence.
///
/// Exactly one tick is in flight at a time. Results that come back from the
/// estimator after [`PoseTracker::stop`] are discarded.
///
/// Overlay updates never block the loop: while the renderer's channel is full
/// new frames are dropped. The renderer must clear on either
/// [`OverlayUpdate::Clear`] or the channel closing.
pub struct PoseTracker {
    config: Config,
    estimator: Arc<dyn PoseEstimator>,
    camera: Arc<dyn FrameSource>,
    processor: Arc<Mutex<FrameProcessor>>,
    current_run: Arc<RwLock<Option<String>>>,
    update_tx: Arc<RwLock<Option<mpsc::Sender<OverlayUpdate>>>>,
}

impl PoseTracker {
    pub fn new(
        config: Config,
        estimator: Arc<dyn PoseEstimator>,
        camera: Arc<dyn FrameSource>,
    ) -> PoseResult<Self> {
        config.validate()?;

        Ok(Self {
            processor: Arc::new(Mutex::new(FrameProcessor::new(&config))),
            config,
            estimator,
            camera,
            current_run: Arc::new(RwLock::new(None)),
            update_tx: Arc::new(RwLock::new(None)),
        })
    }

    /// Turn the camera on. Overlay updates arrive on the returned channel.
    pub async fn start(&self) -> PoseResult<mpsc::Receiver<OverlayUpdate>> {
        if !self.estimator.is_initialized() {
            return Err(PoseError::NotInitialized);
        }

        let mut current_run = self.current_run.write().await;
        if current_run.is_some() {
            return Err(PoseError::AlreadyRunning);
        }

        let run_id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel::<OverlayUpdate>(100);
        *self.update_tx.write().await = Some(tx);
        *current_run = Some(run_id.clone());
        drop(current_run);

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let estimator = self.estimator.clone();
        let camera = self.camera.clone();
        let processor = self.processor.clone();
        let current_run = self.current_run.clone();
        let update_tx = self.update_tx.clone();

        info!(
            %run_id,
            poll_ms = self.config.poll_interval_ms,
            model = %self.estimator.get_model_info(),
            "started pose tracking"
        );

        tokio::spawn(async move {
            Self::run_loop(run_id, poll_interval, estimator, camera, processor, current_run, update_tx).await;
        });

        Ok(rx)
    }

    /// Turn the camera off and tell the renderer to clear. Calling it twice is harmless.
    ///
    /// Never waits on the renderer, so it may be called from the task draining
    /// the channel. If the channel is full the `Clear` is not queued and the
    /// renderer sees the channel close once the backlog drains.
    pub async fn stop(&self) -> PoseResult<()> {
        let mut current_run = self.current_run.write().await;
        let run_id = match current_run.take() {
            Some(id) => id,
            None => return Ok(()),
        };

        let tx = self.update_tx.write().await.take();
        drop(current_run);

        if let Some(tx) = tx {
            match tx.try_send(OverlayUpdate::Clear) {
                Ok(()) | Err(TrySendError::Closed(_)) => {}
                Err(TrySendError::Full(_)) => {
                    debug!(%run_id, "overlay channel full, closing it without a clear");
                }
            }
        }

        info!(%run_id, "stopped pose tracking");
        Ok(())
    }

    pub async fn is_active(&self) -> bool {
        self.current_run.read().await.is_some()
    }

    pub async fn rep_state(&self) -> RepState {
        self.processor.lock().await.rep_state()
    }

    /// Frames processed in the current session
    pub async fn frames_processed(&self) -> u64 {
        self.processor.lock().await.session().frame_index
    }

    pub async fn session_id(&self) -> String {
        self.processor.lock().await.session().session_id.clone()
    }

    /// Explicit new-session action: zero reps and empty trails
    pub async fn new_session(&self) {
        self.processor.lock().await.new_session();
    }

    pub async fn display_settings(&self) -> DisplaySettings {
        self.processor.lock().await.display_settings()
    }

    pub async fn set_skeleton_overlay(&self, enabled: bool) {
        self.processor.lock().await.set_skeleton_overlay(enabled);
    }

    pub async fn set_show_angle(&self, joint: JointId, show: bool) {
        self.processor.lock().await.set_show_angle(joint, show);
    }

    pub async fn set_show_trail(&self, joint: JointId, show: bool) {
        self.processor.lock().await.set_show_trail(joint, show);
    }

    /// Overlay primitives for `result` under the current session controls
    pub async fn overlay_for(&self, result: &FrameResult) -> Overlay {
        let display = self.display_settings().await;
        build_overlay(result, &display, &self.config.style, self.config.confidence_threshold)
    }

    async fn run_loop(
        run_id: String,
        poll_interval: Duration,
        estimator: Arc<dyn PoseEstimator>,
        camera: Arc<dyn FrameSource>,
        processor: Arc<Mutex<FrameProcessor>>,
        current_run: Arc<RwLock<Option<String>>>,
        update_tx: Arc<RwLock<Option<mpsc::Sender<OverlayUpdate>>>>,
    ) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if current_run.read().await.as_deref() != Some(run_id.as_str()) {
                break;
            }

            let frame = match camera.next_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, "camera capture failed, skipping frame");
                    continue;
                }
            };

            let poses = match estimator.estimate_poses(&frame).await {
                Ok(poses) => poses,
                Err(e) => {
                    warn!(error = %e, "pose estimation failed, skipping frame");
                    continue;
                }
            };

            // Results are queued under the run guard so stop() can't slip its
            // Clear in ahead of a frame from this run. Nothing awaits the
            // renderer while the guard is held.
            let run_guard = current_run.read().await;
            if run_guard.as_deref() != Some(run_id.as_str()) {
                debug!(%run_id, "dropping pose result that arrived after the camera stopped");
                break;
            }

            let results = processor.lock().await.process_next(&poses);
            let mut receiver_gone = false;
            {
                let update_tx = update_tx.read().await;
                let tx = match update_tx.as_ref() {
                    Some(tx) => tx,
                    None => break,
                };

                for result in results {
                    match tx.try_send(OverlayUpdate::Frame(result)) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            debug!(%run_id, "renderer lagging, dropping overlay frame");
                        }
                        Err(TrySendError::Closed(_)) => {
                            receiver_gone = true;
                            break;
                        }
                    }
                }
            }
            drop(run_guard);

            if receiver_gone {
                warn!(%run_id, "overlay receiver dropped, stopping pose tracking");
                Self::abandon_run(&run_id, &current_run, &update_tx).await;
                break;
            }
        }
    }

    async fn abandon_run(
        run_id: &str,
        current_run: &RwLock<Option<String>>,
        update_tx: &RwLock<Option<mpsc::Sender<OverlayUpdate>>>,
    ) {
        let mut current = current_run.write().await;
        if current.as_deref() == Some(run_id) {
            *current = None;
            *update_tx.write().await = None;
        }
    }
}
