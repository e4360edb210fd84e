// Overlay building - turns a frame result into primitives for the drawing surface

use crate::core::config::{DisplaySettings, OverlayStyle};
use crate::core::trail::{segments_for, TrailSegment};
use crate::models::frame::FrameResult;
use crate::models::pose::{BodyLandmark, JointId, Point};

/// MoveNet skeleton edges (pairs of landmark indices)
pub const SKELETON_EDGES: [(BodyLandmark, BodyLandmark); 16] = {
    use BodyLandmark::*;
    [
        (Nose, LeftEye),
        (Nose, RightEye),
        (LeftEye, LeftEar),
        (RightEye, RightEar),
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightElbow),
        (RightShoulder, RightHip),
        (LeftElbow, LeftWrist),
        (RightElbow, RightWrist),
        (LeftHip, RightHip),
        (LeftHip, LeftKnee),
        (RightHip, RightKnee),
        (LeftKnee, LeftAnkle),
        (RightKnee, RightAnkle),
    ]
};

#[derive(Debug, Clone, PartialEq)]
pub struct KeypointMarker {
    pub landmark: BodyLandmark,
    pub center: Point,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonLine {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AngleLabel {
    pub joint: JointId,
    pub anchor: Point,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrailStroke {
    pub joint: JointId,
    pub color: [u8; 3],
    pub segments: Vec<TrailSegment>,
}

/// Everything to draw for one pose; the renderer only rasterises this
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub keypoints: Vec<KeypointMarker>,
    pub skeleton: Vec<SkeletonLine>,
    pub angle_labels: Vec<AngleLabel>,
    pub trails: Vec<TrailStroke>,
    pub rep_count: u32,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
            && self.skeleton.is_empty()
            && self.angle_labels.is_empty()
            && self.trails.is_empty()
    }
}

/// Build the overlay for `result` under the current session controls.
///
/// Keypoints, skeleton and angle labels need the skeleton overlay; trails are
/// drawn whenever their own flag is set.
pub fn build_overlay(
    result: &FrameResult,
    display: &DisplaySettings,
    style: &OverlayStyle,
    confidence_threshold: f32,
) -> Overlay {
    let mut overlay = Overlay {
        rep_count: result.rep_state.count,
        ..Overlay::default()
    };

    for snapshot in &result.trails {
        if !display.joint(snapshot.joint).show_trail {
            continue;
        }
        let segments = segments_for(&snapshot.points);
        if segments.is_empty() {
            continue;
        }
        overlay.trails.push(TrailStroke {
            joint: snapshot.joint,
            color: style.trail_color,
            segments,
        });
    }

    if !display.skeleton_overlay {
        return overlay;
    }

    let pose = &result.pose;

    overlay.keypoints = pose
        .keypoints
        .iter()
        .enumerate()
        .filter(|(_, kp)| kp.is_confident(confidence_threshold))
        .filter_map(|(i, kp)| {
            BodyLandmark::from_index(i).map(|landmark| KeypointMarker {
                landmark,
                center: kp.position(),
                radius: style.keypoint_radius,
            })
        })
        .collect();

    overlay.skeleton = SKELETON_EDGES
        .iter()
        .filter_map(|&(a, b)| {
            let from = pose.keypoint(a)?;
            let to = pose.keypoint(b)?;
            if from.is_confident(confidence_threshold) && to.is_confident(confidence_threshold) {
                Some(SkeletonLine {
                    from: from.position(),
                    to: to.position(),
                })
            } else {
                None
            }
        })
        .collect();

    overlay.angle_labels = result
        .angles
        .iter()
        .filter(|angle| display.joint(angle.joint).show_angle)
        .filter_map(|angle| {
            let degrees = angle.display_degrees()?;
            let anchor = pose.keypoint(angle.joint.vertex())?.position();
            Some(AngleLabel {
                joint: angle.joint,
                anchor,
                text: format!(" {}°", degrees),
            })
        })
        .collect();

    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::frame::{AngleResult, RepState, TrailSnapshot};
    use crate::models::pose::{Keypoint, Pose};

    fn frame(pose: Pose, angles: Vec<AngleResult>, trails: Vec<TrailSnapshot>) -> FrameResult {
        FrameResult {
            session_id: "test".to_string(),
            frame_index: 10,
            timestamp: 0,
            pose,
            angles,
            trails,
            rep_state: RepState { count: 2, ..RepState::default() },
            rep_event: None,
        }
    }

    fn visible_pose() -> Pose {
        Pose::new(
            (0..BodyLandmark::COUNT)
                .map(|i| Keypoint::new(i as f32 * 10.0, i as f32 * 5.0, 0.9))
                .collect(),
        )
    }

    #[test]
    fn test_overlay_off_draws_only_enabled_trails() {
        let trails = vec![
            TrailSnapshot {
                joint: JointId::LeftKnee,
                points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
            },
            TrailSnapshot {
                joint: JointId::RightKnee,
                points: vec![Point::new(5.0, 5.0), Point::new(6.0, 6.0)],
            },
        ];
        let result = frame(visible_pose(), vec![AngleResult::valid(JointId::LeftKnee, 88.6)], trails);

        let mut display = DisplaySettings::default();
        display.set_show_trail(JointId::LeftKnee, true);
        display.set_show_angle(JointId::LeftKnee, true);

        let overlay = build_overlay(&result, &display, &OverlayStyle::default(), 0.5);

        assert_eq!(overlay.trails.len(), 1);
        assert_eq!(overlay.trails[0].joint, JointId::LeftKnee);
        assert_eq!(overlay.trails[0].segments.len(), 2);
        assert_eq!(overlay.trails[0].color, [255, 255, 255]);
        assert!(overlay.keypoints.is_empty());
        assert!(overlay.angle_labels.is_empty());
        assert_eq!(overlay.rep_count, 2);
    }

    #[test]
    fn test_skeleton_and_labels() {
        let angles = vec![
            AngleResult::valid(JointId::LeftKnee, 88.6),
            AngleResult::invalid(JointId::RightKnee),
            AngleResult::valid(JointId::LeftElbow, 120.0),
        ];
        let result = frame(visible_pose(), angles, Vec::new());

        let mut display = DisplaySettings {
            skeleton_overlay: true,
            ..DisplaySettings::default()
        };
        display.set_show_angle(JointId::LeftKnee, true);
        display.set_show_angle(JointId::RightKnee, true);

        let overlay = build_overlay(&result, &display, &OverlayStyle::default(), 0.5);

        assert_eq!(overlay.keypoints.len(), BodyLandmark::COUNT);
        assert_eq!(overlay.skeleton.len(), SKELETON_EDGES.len());
        assert_eq!(overlay.angle_labels.len(), 1);
        assert_eq!(overlay.angle_labels[0].text, " 89°");
        assert_eq!(overlay.angle_labels[0].anchor, Point::new(130.0, 65.0));
    }

    #[test]
    fn test_hidden_keypoints_break_skeleton_edges() {
        let mut pose = visible_pose();
        pose.keypoints[BodyLandmark::LeftKnee.index()].score = 0.5;
        let result = frame(pose, Vec::new(), Vec::new());

        let display = DisplaySettings {
            skeleton_overlay: true,
            ..DisplaySettings::default()
        };
        let overlay = build_overlay(&result, &display, &OverlayStyle::default(), 0.5);

        assert_eq!(overlay.keypoints.len(), BodyLandmark::COUNT - 1);
        // Left hip-knee and left knee-ankle disappear
        assert_eq!(overlay.skeleton.len(), SKELETON_EDGES.len() - 2);
    }

    #[test]
    fn test_empty_overlay() {
        let result = frame(Pose::default(), Vec::new(), Vec::new());
        let overlay = build_overlay(&result, &DisplaySettings::all_enabled(), &OverlayStyle::default(), 0.5);
        assert!(overlay.is_empty());
    }
}
