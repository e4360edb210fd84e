// Angle evaluation - confidence-gated joint angles from a single pose

use crate::core::geometry::joint_angle;
use crate::models::frame::AngleResult;
use crate::models::pose::{JointId, Pose};

/// Angle at `joint`, or an invalid result if any of its three defining
/// keypoints is missing or scores at or below `threshold`.
pub fn evaluate_joint(pose: &Pose, joint: JointId, threshold: f32) -> AngleResult {
    let (neighbor_a, neighbor_b) = joint.neighbors();

    let keypoints = (
        pose.keypoint(neighbor_a),
        pose.keypoint(joint.vertex()),
        pose.keypoint(neighbor_b),
    );

    let (a, b, c) = match keypoints {
        (Some(a), Some(b), Some(c))
            if a.is_confident(threshold) && b.is_confident(threshold) && c.is_confident(threshold) =>
        {
            (a, b, c)
        }
        _ => return AngleResult::invalid(joint),
    };

    match joint_angle(a.position(), b.position(), c.position()) {
        Some(degrees) => AngleResult::valid(joint, degrees),
        None => AngleResult::invalid(joint),
    }
}

/// All eight joints, in [`JointId::ALL`] order
pub fn evaluate_all(pose: &Pose, threshold: f32) -> Vec<AngleResult> {
    JointId::ALL
        .iter()
        .map(|&joint| evaluate_joint(pose, joint, threshold))
        .collect()
}
