// Trail buffer - bounded, decimated position history of one keypoint

use crate::models::pose::{Keypoint, Point};
use std::collections::VecDeque;

/// Sizing and gating shared by every trail in a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSettings {
    /// Maximum retained positions
    pub length: usize,
    /// Only frames whose index is a multiple of this update the trail
    pub update_interval: u64,
    /// Keypoints at or below this score clear the trail
    pub confidence_threshold: f32,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            length: 5,
            update_interval: 10,
            confidence_threshold: 0.5,
        }
    }
}

/// One line segment of a rendered trail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    pub from: Point,
    pub to: Point,
    /// 1.0 for the newest segment, fading towards the oldest
    pub opacity: f32,
}

/// Outcome of feeding one keypoint to a trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailUpdate {
    /// Not a decimation boundary, trail untouched
    Skipped,
    Appended,
    /// Keypoint lost, history dropped
    Cleared,
}

/// FIFO of recent positions, oldest at the front
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    positions: VecDeque<Point>,
    settings: TrailSettings,
}

impl TrailBuffer {
    pub fn new(settings: TrailSettings) -> Self {
        Self {
            positions: VecDeque::with_capacity(settings.length),
            settings,
        }
    }

    pub fn is_update_frame(&self, frame_index: u64) -> bool {
        self.settings.update_interval > 0 && frame_index % self.settings.update_interval == 0
    }

    /// Feed the keypoint seen on `frame_index`.
    ///
    /// A missing keypoint is handled like a low-confidence one.
    pub fn update(&mut self, keypoint: Option<&Keypoint>, frame_index: u64) -> TrailUpdate {
        if !self.is_update_frame(frame_index) {
            return TrailUpdate::Skipped;
        }

        match keypoint {
            Some(kp) if kp.is_confident(self.settings.confidence_threshold) => {
                self.positions.push_back(kp.position());
                while self.positions.len() > self.settings.length {
                    self.positions.pop_front();
                }
                TrailUpdate::Appended
            }
            _ => {
                self.positions.clear();
                TrailUpdate::Cleared
            }
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Chronological copy, oldest first
    pub fn points(&self) -> Vec<Point> {
        self.positions.iter().copied().collect()
    }

    pub fn newest(&self) -> Option<Point> {
        self.positions.back().copied()
    }

    /// Line segments for drawing, newest first.
    ///
    /// Counting points from the newest (`i = 0`), segment `i` joins point `i`
    /// to point `i + 1` with opacity `1 - i / len`.
    pub fn segments(&self) -> Vec<TrailSegment> {
        segments_for(&self.points())
    }
}

/// Segments for an oldest-first list of points, newest segment first
pub fn segments_for(points: &[Point]) -> Vec<TrailSegment> {
    let len = points.len();
    if len < 2 {
        return Vec::new();
    }

    let newest_first: Vec<Point> = points.iter().rev().copied().collect();
    newest_first
        .windows(2)
        .enumerate()
        .map(|(i, pair)| TrailSegment {
            from: pair[0],
            to: pair[1],
            opacity: 1.0 - (i as f32 / len as f32),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confident(x: f32) -> Keypoint {
        Keypoint::new(x, x * 2.0, 0.9)
    }

    #[test]
    fn test_only_updates_on_boundary() {
        let mut trail = TrailBuffer::new(TrailSettings::default());

        for frame in 1..10 {
            assert_eq!(trail.update(Some(&confident(frame as f32)), frame), TrailUpdate::Skipped);
        }
        assert!(trail.is_empty());

        assert_eq!(trail.update(Some(&confident(10.0)), 10), TrailUpdate::Appended);
        assert_eq!(trail.points(), vec![Point::new(10.0, 20.0)]);
    }

    #[test]
    fn test_fills_to_capacity_and_evicts_oldest() {
        let mut trail = TrailBuffer::new(TrailSettings::default());

        for frame in 1..=70 {
            trail.update(Some(&confident(frame as f32)), frame);
        }

        assert_eq!(trail.len(), 5);
        let xs: Vec<f32> = trail.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![30.0, 40.0, 50.0, 60.0, 70.0]);
    }

    #[test]
    fn test_low_confidence_boundary_clears() {
        let mut trail = TrailBuffer::new(TrailSettings::default());
        for frame in 1..=30 {
            trail.update(Some(&confident(frame as f32)), frame);
        }
        assert_eq!(trail.len(), 3);

        // Off-boundary frames ignore the lost keypoint
        let lost = Keypoint::new(0.0, 0.0, 0.5);
        assert_eq!(trail.update(Some(&lost), 31), TrailUpdate::Skipped);
        assert_eq!(trail.len(), 3);

        assert_eq!(trail.update(Some(&lost), 40), TrailUpdate::Cleared);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_missing_keypoint_clears() {
        let mut trail = TrailBuffer::new(TrailSettings::default());
        trail.update(Some(&confident(1.0)), 10);
        assert_eq!(trail.update(None, 20), TrailUpdate::Cleared);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_segment_opacity_fades_from_newest() {
        let points: Vec<Point> = (0..5).map(|i| Point::new(i as f32, 0.0)).collect();
        let segments = segments_for(&points);

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].from, Point::new(4.0, 0.0));
        assert_eq!(segments[0].to, Point::new(3.0, 0.0));
        assert_eq!(segments[0].opacity, 1.0);
        assert!((segments[1].opacity - 0.8).abs() < 1e-6);
        assert!((segments[3].opacity - 0.4).abs() < 1e-6);
        assert_eq!(segments[3].to, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_single_point_has_no_segments() {
        let mut trail = TrailBuffer::new(TrailSettings::default());
        trail.update(Some(&confident(3.0)), 10);
        assert!(trail.segments().is_empty());
        assert_eq!(trail.newest(), Some(Point::new(3.0, 6.0)));
    }
}
