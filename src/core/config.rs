use crate::core::trail::TrailSettings;
use crate::models::pose::{JointDisplay, JointId, PoseError, PoseResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which overlays are drawn: the skeleton toggle plus 8 joints × {angle, trail}
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    #[serde(default)]
    pub skeleton_overlay: bool,
    /// Joints missing from the map show nothing
    #[serde(default)]
    pub joints: BTreeMap<JointId, JointDisplay>,
}

impl DisplaySettings {
    pub fn joint(&self, joint: JointId) -> JointDisplay {
        self.joints.get(&joint).copied().unwrap_or_default()
    }

    pub fn set_show_angle(&mut self, joint: JointId, show: bool) {
        self.joints.entry(joint).or_default().show_angle = show;
    }

    pub fn set_show_trail(&mut self, joint: JointId, show: bool) {
        self.joints.entry(joint).or_default().show_trail = show;
    }

    /// Everything on; handy for demos and tests
    pub fn all_enabled() -> Self {
        let joints = JointId::ALL
            .iter()
            .map(|&joint| {
                (
                    joint,
                    JointDisplay {
                        show_angle: true,
                        show_trail: true,
                    },
                )
            })
            .collect();

        Self {
            skeleton_overlay: true,
            joints,
        }
    }
}

/// Colours and sizes used when turning a frame into overlay primitives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayStyle {
    /// RGB colour of trail segments
    pub trail_color: [u8; 3],
    /// Radius of keypoint markers in pixels
    pub keypoint_radius: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            trail_color: [255, 255, 255],
            keypoint_radius: 5.0,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Keypoints must score strictly above this to be used (0.0-1.0)
    pub confidence_threshold: f32,
    /// Maximum positions kept per trail
    pub trail_length: usize,
    /// Trails are updated once every this many frames
    pub trail_update_interval: u64,
    /// Both knees at or below this angle means the subject is in a squat
    pub rep_knee_threshold_degrees: f32,
    /// Delay between pose estimation ticks in milliseconds
    pub poll_interval_ms: u64,
    /// Initial state of the session controls
    pub display: DisplaySettings,
    pub style: OverlayStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            trail_length: 5,
            trail_update_interval: 10,
            rep_knee_threshold_degrees: 90.0,
            poll_interval_ms: 10,
            display: DisplaySettings::default(),
            style: OverlayStyle::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it with defaults if it doesn't exist
    pub fn load() -> PoseResult<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> PoseResult<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> PoseResult<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> PoseResult<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> PoseResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(PoseError::InvalidConfig(format!(
                "confidence threshold {} must be between 0.0 and 1.0",
                self.confidence_threshold
            )));
        }

        if self.trail_length == 0 || self.trail_length > 100 {
            return Err(PoseError::InvalidConfig(format!(
                "trail length {} must be between 1 and 100",
                self.trail_length
            )));
        }

        if self.trail_update_interval == 0 || self.trail_update_interval > 1000 {
            return Err(PoseError::InvalidConfig(format!(
                "trail update interval {} must be between 1 and 1000 frames",
                self.trail_update_interval
            )));
        }

        if !(0.0..=180.0).contains(&self.rep_knee_threshold_degrees) {
            return Err(PoseError::InvalidConfig(format!(
                "knee threshold {} must be between 0 and 180 degrees",
                self.rep_knee_threshold_degrees
            )));
        }

        if self.poll_interval_ms == 0 || self.poll_interval_ms > 1000 {
            return Err(PoseError::InvalidConfig(format!(
                "poll interval {} must be between 1 and 1000 ms",
                self.poll_interval_ms
            )));
        }

        if self.style.keypoint_radius.is_nan() || self.style.keypoint_radius <= 0.0 {
            return Err(PoseError::InvalidConfig(format!(
                "keypoint radius {} must be positive",
                self.style.keypoint_radius
            )));
        }

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> PoseResult<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn trail_settings(&self) -> TrailSettings {
        TrailSettings {
            length: self.trail_length,
            update_interval: self.trail_update_interval,
            confidence_threshold: self.confidence_threshold,
        }
    }

    /// Get the configuration file path
    fn get_config_path() -> PoseResult<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| PoseError::InvalidConfig("could not determine home directory".to_string()))?;

        let mut path = PathBuf::from(home);
        path.push(".pose_overlay");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}
