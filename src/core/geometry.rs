//! Joint angle calculation using the dot product
//!
//! The angle at vertex `b` is measured between the vectors `b→a` and `b→c`.

use crate::models::pose::Point;

/// Vectors shorter than this are treated as zero length
const MIN_SEGMENT_LENGTH: f32 = 1e-4;

/// Angle at `b` in degrees, in `[0, 180]`.
///
/// Uses `cos(θ) = (v1 · v2) / (|v1| × |v2|)`. Returns `None` when `a` or `c`
/// coincides with `b`, since the angle is undefined there.
pub fn joint_angle(a: Point, b: Point, c: Point) -> Option<f32> {
    let v1 = (a.x - b.x, a.y - b.y);
    let v2 = (c.x - b.x, c.y - b.y);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    if mag1 < MIN_SEGMENT_LENGTH || mag2 < MIN_SEGMENT_LENGTH || !(mag1 * mag2).is_finite() {
        return None;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;

    // Rounding can push the cosine slightly outside [-1, 1]
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);

    Some(cos_angle.acos().to_degrees().clamp(0.0, 180.0))
}
