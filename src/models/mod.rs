// Data models for camera capture, body keypoints and per-frame analysis results

pub mod capture;
pub mod frame;
pub mod pose;
