pub mod config;

// Pose analysis pipeline
pub mod geometry;
pub mod trail;
pub mod angle_evaluator;
pub mod rep_counter;
pub mod frame_processor;

// Rendering hand-off and runtime
pub mod overlay;
pub mod pose_tracker;
