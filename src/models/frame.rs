// Per-frame analysis results handed to the rendering layer

use super::pose::{JointId, Point, Pose};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Joint Angles
// ==============================================================================

/// Angle at one joint for one frame.
///
/// `degrees` is `None` whenever a defining keypoint was not confident enough or
/// the geometry was degenerate. The stored value is unrounded; use
/// [`AngleResult::display_degrees`] for labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleResult {
    pub joint: JointId,
    pub degrees: Option<f32>,
}

impl AngleResult {
    pub fn valid(joint: JointId, degrees: f32) -> Self {
        Self {
            joint,
            degrees: Some(degrees),
        }
    }

    pub fn invalid(joint: JointId) -> Self {
        Self {
            joint,
            degrees: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.degrees.is_some()
    }

    /// Nearest whole degree
    pub fn display_degrees(&self) -> Option<i32> {
        self.degrees.map(|d| d.round() as i32)
    }
}

// ==============================================================================
// Repetitions
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    #[default]
    NotInRep,
    InRep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepState {
    pub phase: RepPhase,
    pub count: u32,
}

/// Transition fired by the repetition detector on a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepEvent {
    /// Both knees went to or below the threshold
    Entered,
    /// The subject rose out of the squat; carries the new total
    Completed { count: u32 },
}

// ==============================================================================
// Trails
// ==============================================================================

/// Chronological copy of one joint's trail (oldest first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailSnapshot {
    pub joint: JointId,
    pub points: Vec<Point>,
}

// ==============================================================================
// Frame Result
// ==============================================================================

/// Everything the renderer needs for one detected pose in one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameResult {
    pub session_id: String,
    pub frame_index: u64,
    pub timestamp: i64,
    pub pose: Pose,
    pub angles: Vec<AngleResult>,
    pub trails: Vec<TrailSnapshot>,
    pub rep_state: RepState,
    pub rep_event: Option<RepEvent>,
}

impl FrameResult {
    pub fn angle(&self, joint: JointId) -> Option<&AngleResult> {
        self.angles.iter().find(|a| a.joint == joint)
    }

    pub fn trail(&self, joint: JointId) -> Option<&TrailSnapshot> {
        self.trails.iter().find(|t| t.joint == joint)
    }
}

/// Message pushed from the tracker loop to the rendering surface
#[derive(Debug, Clone)]
pub enum OverlayUpdate {
    Frame(FrameResult),
    /// Camera stopped; wipe everything drawn so far
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_degrees_rounds_to_nearest() {
        assert_eq!(AngleResult::valid(JointId::LeftKnee, 89.5).display_degrees(), Some(90));
        assert_eq!(AngleResult::valid(JointId::LeftKnee, 90.4).display_degrees(), Some(90));
        assert_eq!(AngleResult::invalid(JointId::LeftKnee).display_degrees(), None);
    }

    #[test]
    fn test_rep_state_default() {
        let state = RepState::default();
        assert_eq!(state.phase, RepPhase::NotInRep);
        assert_eq!(state.count, 0);
    }

    #[test]
    fn test_rep_event_serialization() {
        let json = serde_json::to_string(&RepEvent::Completed { count: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"completed","count":3}"#);
    }
}
