// Platform integration: pose estimator backends and camera frame sources

pub mod pose;
