// Data structures for camera capture

use serde::{Deserialize, Serialize};

/// A captured video frame handed to the pose estimator
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub timestamp: i64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl CameraFrame {
    /// Opaque black frame
    pub fn blank(width: u32, height: u32, timestamp: i64) -> Self {
        let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
        for alpha in data.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }

        Self {
            timestamp,
            width,
            height,
            data,
            format: PixelFormat::RGBA8,
        }
    }
}

/// Pixel format of captured frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    RGBA8,
    BGRA8,
}
