// Repetition detection - edge-triggered squat counter driven by both knee angles

use crate::models::frame::{AngleResult, RepEvent, RepPhase, RepState};
use tracing::debug;

/// Two-state machine over the bilateral knee condition.
///
/// The subject is "in a rep" while both knees are at or below the threshold.
/// A rep is counted on the way back up. Frames where either knee angle is
/// invalid leave the state untouched. There is no debounce: readings that
/// hover around the threshold will count every crossing.
#[derive(Debug, Clone)]
pub struct RepetitionDetector {
    state: RepState,
    knee_threshold_degrees: f32,
}

impl RepetitionDetector {
    pub fn new(knee_threshold_degrees: f32) -> Self {
        Self {
            state: RepState::default(),
            knee_threshold_degrees,
        }
    }

    pub fn state(&self) -> RepState {
        self.state
    }

    pub fn count(&self) -> u32 {
        self.state.count
    }

    /// Feed one frame's knee angles; returns the transition it caused, if any.
    ///
    /// Compares the unrounded angles so a 90.4° knee is not mistaken for 90°.
    pub fn update(&mut self, left_knee: &AngleResult, right_knee: &AngleResult) -> Option<RepEvent> {
        let (left, right) = match (left_knee.degrees, right_knee.degrees) {
            (Some(left), Some(right)) => (left, right),
            _ => return None,
        };

        let in_rep = left <= self.knee_threshold_degrees && right <= self.knee_threshold_degrees;

        match (self.state.phase, in_rep) {
            (RepPhase::NotInRep, true) => {
                self.state.phase = RepPhase::InRep;
                debug!(left, right, "entered rep");
                Some(RepEvent::Entered)
            }
            (RepPhase::InRep, false) => {
                self.state.phase = RepPhase::NotInRep;
                self.state.count += 1;
                debug!(left, right, count = self.state.count, "completed rep");
                Some(RepEvent::Completed {
                    count: self.state.count,
                })
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = RepState::default();
    }
}

impl Default for RepetitionDetector {
    fn default() -> Self {
        Self::new(90.0)
    }
}
