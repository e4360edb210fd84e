//! End-to-end tests of the per-frame pose pipeline
//!
//! Feeds synthetic squat sequences through the frame processor and checks
//! angles, trails, rep counts and the overlay built from the results.

use pose_overlay_lib::core::overlay::build_overlay;
use pose_overlay_lib::{
    BodyLandmark, Config, DisplaySettings, FrameProcessor, JointId, Keypoint, Pose, RepEvent,
    RepPhase,
};

/// Side-on subject at `offset` with both knees bent to `knee_angle` degrees
fn squat_pose(knee_angle: f32, offset: f32, score: f32) -> Pose {
    let mut keypoints = vec![Keypoint::new(offset, 50.0, score); BodyLandmark::COUNT];
    let shin = knee_angle.to_radians();

    let sides = [
        (
            [
                BodyLandmark::LeftShoulder,
                BodyLandmark::LeftElbow,
                BodyLandmark::LeftWrist,
                BodyLandmark::LeftHip,
                BodyLandmark::LeftKnee,
                BodyLandmark::LeftAnkle,
            ],
            offset + 200.0,
        ),
        (
            [
                BodyLandmark::RightShoulder,
                BodyLandmark::RightElbow,
                BodyLandmark::RightWrist,
                BodyLandmark::RightHip,
                BodyLandmark::RightKnee,
                BodyLandmark::RightAnkle,
            ],
            offset + 260.0,
        ),
    ];

    for (landmarks, x) in sides {
        let positions = [
            (x, 100.0),
            (x + 30.0, 170.0),
            (x + 60.0, 230.0),
            (x, 300.0),
            (x, 400.0),
            (x + 100.0 * shin.sin(), 400.0 - 100.0 * shin.cos()),
        ];
        for (landmark, (px, py)) in landmarks.iter().zip(positions) {
            keypoints[landmark.index()] = Keypoint::new(px, py, score);
        }
    }

    Pose::new(keypoints)
}

fn overlay_config() -> Config {
    Config {
        display: DisplaySettings::all_enabled(),
        ..Config::default()
    }
}

#[test]
fn test_alternating_squats_over_fifty_frames() {
    let mut processor = FrameProcessor::new(&overlay_config());
    let mut completed = Vec::new();
    let mut last = None;

    // Frames 1-10 standing, 11-20 squatting, ... 41-50 standing
    for frame in 1..=50u64 {
        let squatting = ((frame - 1) / 10) % 2 == 1;
        let knee = if squatting { 70.0 } else { 170.0 };
        let pose = squat_pose(knee, frame as f32, 0.9);

        let results = processor.process_frame(&[pose], frame);
        assert_eq!(results.len(), 1);

        let result = results.into_iter().next().unwrap();
        if let Some(RepEvent::Completed { count }) = result.rep_event {
            completed.push((frame, count));
        }
        last = Some(result);
    }

    assert_eq!(completed, vec![(21, 1), (41, 2)]);

    let last = last.unwrap();
    assert_eq!(last.rep_state.count, 2);
    assert_eq!(last.rep_state.phase, RepPhase::NotInRep);
    assert_eq!(last.trails.len(), JointId::ALL.len());
    for trail in &last.trails {
        assert_eq!(trail.points.len(), 5, "{} trail should be full", trail.joint);
    }

    // Oldest point first: left knee x was offset + 200 on frames 10, 20, ..., 50
    let knee_xs: Vec<f32> = last
        .trail(JointId::LeftKnee)
        .unwrap()
        .points
        .iter()
        .map(|p| p.x)
        .collect();
    assert_eq!(knee_xs, vec![210.0, 220.0, 230.0, 240.0, 250.0]);
}

#[test]
fn test_trails_stay_capped_on_long_runs() {
    let mut processor = FrameProcessor::new(&overlay_config());

    for frame in 1..=200u64 {
        processor.process_next(&[squat_pose(170.0, frame as f32, 0.9)]);
    }

    let session = processor.session();
    assert_eq!(session.frame_index, 200);
    assert!(session.joints.values().all(|j| j.trail.len() == 5));
}

#[test]
fn test_occlusion_mid_rep_keeps_counting() {
    let mut processor = FrameProcessor::new(&overlay_config());

    processor.process_next(&[squat_pose(170.0, 0.0, 0.9)]);
    processor.process_next(&[squat_pose(70.0, 0.0, 0.9)]);

    // Subject briefly occluded: knees invalid, state held
    let occluded = processor.process_next(&[squat_pose(170.0, 0.0, 0.2)]);
    assert_eq!(occluded[0].rep_state.phase, RepPhase::InRep);
    assert!(occluded[0].rep_event.is_none());

    // No pose at all on one tick
    assert!(processor.process_next(&[]).is_empty());

    let risen = processor.process_next(&[squat_pose(170.0, 0.0, 0.9)]);
    assert_eq!(risen[0].rep_event, Some(RepEvent::Completed { count: 1 }));
}

#[test]
fn test_overlay_from_pipeline_result() {
    let config = overlay_config();
    let mut processor = FrameProcessor::new(&config);

    let mut last = Vec::new();
    for frame in 1..=30u64 {
        last = processor.process_next(&[squat_pose(70.0, frame as f32, 0.9)]);
    }
    let result = &last[0];

    let overlay = build_overlay(
        result,
        &processor.display_settings(),
        &config.style,
        config.confidence_threshold,
    );

    assert_eq!(overlay.keypoints.len(), BodyLandmark::COUNT);
    assert_eq!(overlay.angle_labels.len(), JointId::ALL.len());
    let knee_label = overlay
        .angle_labels
        .iter()
        .find(|label| label.joint == JointId::LeftKnee)
        .unwrap();
    assert_eq!(knee_label.text, " 70°");

    // Three trail points per joint make two segments each
    assert_eq!(overlay.trails.len(), JointId::ALL.len());
    assert!(overlay.trails.iter().all(|t| t.segments.len() == 2));
    assert_eq!(overlay.trails[0].segments[0].opacity, 1.0);
}

#[test]
fn test_multiple_poses_share_one_session() {
    let mut processor = FrameProcessor::new(&overlay_config());

    let standing = squat_pose(170.0, 0.0, 0.9);
    let squatting = squat_pose(70.0, 0.0, 0.9);

    let results = processor.process_frame(&[squatting, standing], 1);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].rep_event, Some(RepEvent::Entered));
    assert_eq!(results[1].rep_event, Some(RepEvent::Completed { count: 1 }));
    assert!(results.iter().all(|r| r.frame_index == 1));
}
