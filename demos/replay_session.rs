/// Replays a pose sequence through the tracker and prints what would be drawn
/// Run with: cargo run --example replay_session [path/to/replay.json]
///
/// Without a path, a synthetic subject does three squats.

use pose_overlay_lib::platform::pose::{ReplayEstimator, ReplayScript, SyntheticCamera};
use pose_overlay_lib::{
    BodyLandmark, Config, DisplaySettings, Keypoint, OverlayUpdate, Pose, PoseTracker, RepEvent,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn synthetic_squats(reps: usize) -> ReplayScript {
    let mut frames = Vec::new();

    for _ in 0..reps {
        // Ten frames standing, ten frames down
        for knee_angle in [170.0f32, 70.0] {
            for step in 0..10 {
                frames.push(vec![subject(knee_angle, step as f32 * 2.0)]);
            }
        }
    }
    frames.push(vec![subject(170.0, 0.0)]);

    ReplayScript {
        frames,
        looping: false,
    }
}

fn subject(knee_angle: f32, sway: f32) -> Pose {
    let mut keypoints = vec![Keypoint::new(320.0, 60.0, 0.8); BodyLandmark::COUNT];
    let shin = knee_angle.to_radians();
    let drop = (180.0 - knee_angle) * 0.8;

    for (side, x) in [(0usize, 280.0 + sway), (1usize, 360.0 + sway)] {
        let pick = |left: BodyLandmark, right: BodyLandmark| if side == 0 { left } else { right };
        let mut set = |landmark: BodyLandmark, px: f32, py: f32| {
            keypoints[landmark.index()] = Keypoint::new(px, py, 0.9);
        };

        set(pick(BodyLandmark::LeftShoulder, BodyLandmark::RightShoulder), x, 120.0 + drop);
        set(pick(BodyLandmark::LeftElbow, BodyLandmark::RightElbow), x + 10.0, 190.0 + drop);
        set(pick(BodyLandmark::LeftWrist, BodyLandmark::RightWrist), x + 20.0, 250.0 + drop);
        set(pick(BodyLandmark::LeftHip, BodyLandmark::RightHip), x, 260.0 + drop);
        set(pick(BodyLandmark::LeftKnee, BodyLandmark::RightKnee), x, 360.0);
        set(
            pick(BodyLandmark::LeftAnkle, BodyLandmark::RightAnkle),
            x + 100.0 * shin.sin(),
            360.0 - 100.0 * shin.cos(),
        );
    }

    Pose::new(keypoints)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let script = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!("Loading replay from {:?}", path);
            ReplayEstimator::load(&path)?
        }
        None => ReplayEstimator::new(synthetic_squats(3)),
    };
    let estimator = Arc::new(script);

    let config = Config {
        display: DisplaySettings::all_enabled(),
        ..Config::default()
    };

    let tracker = PoseTracker::new(config, estimator.clone(), Arc::new(SyntheticCamera::default()))?;
    let mut rx = tracker.start().await?;

    loop {
        // Trailing empty frames produce no results, so also poll for the end of the script
        let update = match tokio::time::timeout(Duration::from_millis(500), rx.recv()).await {
            Ok(Some(update)) => update,
            // A closed channel means the camera stopped with the backlog full
            Ok(None) => {
                println!("Overlay cleared");
                break;
            }
            Err(_) => {
                if estimator.is_exhausted() {
                    tracker.stop().await?;
                }
                continue;
            }
        };

        let result = match update {
            OverlayUpdate::Frame(result) => result,
            OverlayUpdate::Clear => {
                println!("Overlay cleared");
                break;
            }
        };

        let overlay = tracker.overlay_for(&result).await;
        let labels: Vec<String> = overlay
            .angle_labels
            .iter()
            .map(|label| format!("{}:{}", label.joint, label.text.trim()))
            .collect();

        println!(
            "frame {:>3}  reps {}  keypoints {:>2}  bones {:>2}  trails {}  [{}]",
            result.frame_index,
            overlay.rep_count,
            overlay.keypoints.len(),
            overlay.skeleton.len(),
            overlay.trails.len(),
            labels.join(" ")
        );

        if let Some(RepEvent::Completed { count }) = result.rep_event {
            info!("Rep {} completed", count);
        }

        if estimator.is_exhausted() {
            tracker.stop().await?;
        }
    }

    println!("\nTotal reps: {}", tracker.rep_state().await.count);
    Ok(())
}
