// Frame orchestration - runs trails, angles and rep detection for each pose frame

use crate::core::angle_evaluator::evaluate_joint;
use crate::core::config::{Config, DisplaySettings};
use crate::core::rep_counter::RepetitionDetector;
use crate::core::trail::{TrailBuffer, TrailSettings};
use crate::models::frame::{AngleResult, FrameResult, RepState, TrailSnapshot};
use crate::models::pose::{JointDisplay, JointId, Pose};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

// ==============================================================================
// Session State
// ==============================================================================

/// Display flags and trail history of one tracked joint
#[derive(Debug, Clone)]
pub struct JointState {
    pub show_angle: bool,
    pub show_trail: bool,
    pub trail: TrailBuffer,
}

/// All mutable state of a tracking session.
///
/// Only [`FrameProcessor`] mutates this, and only through `&mut self`.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: String,
    pub started_at: i64,
    /// Index of the most recently processed frame
    pub frame_index: u64,
    pub skeleton_overlay: bool,
    pub joints: BTreeMap<JointId, JointState>,
    pub reps: RepetitionDetector,
}

impl SessionState {
    pub fn new(config: &Config) -> Self {
        let trail_settings = config.trail_settings();
        let joints = JointId::ALL
            .iter()
            .map(|&joint| {
                let display = config.display.joint(joint);
                (
                    joint,
                    JointState {
                        show_angle: display.show_angle,
                        show_trail: display.show_trail,
                        trail: TrailBuffer::new(trail_settings),
                    },
                )
            })
            .collect();

        Self {
            session_id: Uuid::new_v4().to_string(),
            started_at: chrono::Utc::now().timestamp_millis(),
            frame_index: 0,
            skeleton_overlay: config.display.skeleton_overlay,
            joints,
            reps: RepetitionDetector::new(config.rep_knee_threshold_degrees),
        }
    }

    /// Current session controls, in the same shape as the configuration
    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            skeleton_overlay: self.skeleton_overlay,
            joints: self
                .joints
                .iter()
                .map(|(&joint, state)| {
                    (
                        joint,
                        JointDisplay {
                            show_angle: state.show_angle,
                            show_trail: state.show_trail,
                        },
                    )
                })
                .collect(),
        }
    }
}

// ==============================================================================
// Frame Processor
// ==============================================================================

pub struct FrameProcessor {
    confidence_threshold: f32,
    trail_settings: TrailSettings,
    knee_threshold_degrees: f32,
    session: SessionState,
}

impl FrameProcessor {
    pub fn new(config: &Config) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            trail_settings: config.trail_settings(),
            knee_threshold_degrees: config.rep_knee_threshold_degrees,
            session: SessionState::new(config),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn rep_state(&self) -> RepState {
        self.session.reps.state()
    }

    /// Advance the internal frame counter and process the poses of the new frame.
    ///
    /// The counter advances even when no pose was detected, so trail
    /// decimation follows wall-clock ticks rather than detections.
    pub fn process_next(&mut self, poses: &[Pose]) -> Vec<FrameResult> {
        let frame_index = self.session.frame_index + 1;
        self.process_frame(poses, frame_index)
    }

    /// Process every pose detected in frame `frame_index`, one result per pose.
    ///
    /// Poses are applied in order against the same session, so a second pose
    /// sees the trails and rep state left by the first. On a decimation
    /// boundary every pose appends to the shared trails, so one boundary with
    /// N poses pushes N points.
    pub fn process_frame(&mut self, poses: &[Pose], frame_index: u64) -> Vec<FrameResult> {
        self.session.frame_index = frame_index;
        poses
            .iter()
            .map(|pose| self.process_pose(pose, frame_index))
            .collect()
    }

    fn process_pose(&mut self, pose: &Pose, frame_index: u64) -> FrameResult {
        let threshold = self.confidence_threshold;

        // Trails track the vertex keypoint of each joint; off-boundary frames are no-ops
        for (joint, state) in self.session.joints.iter_mut() {
            state.trail.update(pose.keypoint(joint.vertex()), frame_index);
        }

        // Knee angles feed the rep counter, so they are evaluated even with the overlay off
        let skeleton_overlay = self.session.skeleton_overlay;
        let angles: Vec<AngleResult> = JointId::ALL
            .iter()
            .map(|&joint| {
                if skeleton_overlay || joint.is_knee() {
                    evaluate_joint(pose, joint, threshold)
                } else {
                    AngleResult::invalid(joint)
                }
            })
            .collect();

        let knee = |id: JointId| {
            angles
                .iter()
                .find(|a| a.joint == id)
                .copied()
                .unwrap_or_else(|| AngleResult::invalid(id))
        };
        let rep_event = self
            .session
            .reps
            .update(&knee(JointId::LeftKnee), &knee(JointId::RightKnee));

        let trails = self
            .session
            .joints
            .iter()
            .map(|(&joint, state)| TrailSnapshot {
                joint,
                points: state.trail.points(),
            })
            .collect();

        FrameResult {
            session_id: self.session.session_id.clone(),
            frame_index,
            timestamp: chrono::Utc::now().timestamp_millis(),
            pose: pose.clone(),
            angles,
            trails,
            rep_state: self.session.reps.state(),
            rep_event,
        }
    }

    /// Start a fresh session: new id, empty trails, zero reps. Display flags carry over.
    pub fn new_session(&mut self) {
        let display = self.session.display_settings();
        let previous_reps = self.session.reps.count();

        let config = Config {
            confidence_threshold: self.confidence_threshold,
            trail_length: self.trail_settings.length,
            trail_update_interval: self.trail_settings.update_interval,
            rep_knee_threshold_degrees: self.knee_threshold_degrees,
            display,
            ..Config::default()
        };
        self.session = SessionState::new(&config);

        info!(
            session_id = %self.session.session_id,
            previous_reps,
            "started new pose session"
        );
    }

    pub fn display_settings(&self) -> DisplaySettings {
        self.session.display_settings()
    }

    pub fn set_skeleton_overlay(&mut self, enabled: bool) {
        self.session.skeleton_overlay = enabled;
    }

    pub fn set_show_angle(&mut self, joint: JointId, show: bool) {
        if let Some(state) = self.session.joints.get_mut(&joint) {
            state.show_angle = show;
        }
    }

    pub fn set_show_trail(&mut self, joint: JointId, show: bool) {
        if let Some(state) = self.session.joints.get_mut(&joint) {
            state.show_trail = show;
        }
    }
}
