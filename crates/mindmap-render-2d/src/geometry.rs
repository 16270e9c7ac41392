//! Ray and rectangle helpers for anchoring connectors.

use glam::DVec2;

/// Where the ray from `center` along `direction` leaves the axis-aligned
/// rectangle with half extents `half`.
///
/// A direction within 1e-9 of zero returns the center unchanged.
pub fn rect_edge_point(center: DVec2, half: DVec2, direction: DVec2) -> DVec2 {
    const EPSILON: f64 = 1e-9;
    if direction.x.abs() < EPSILON && direction.y.abs() < EPSILON {
        return center;
    }

    let mut t = f64::INFINITY;
    if direction.x != 0.0 {
        let tx = half.x.copysign(direction.x) / direction.x;
        if tx > 0.0 {
            t = t.min(tx);
        }
    }
    if direction.y != 0.0 {
        let ty = half.y.copysign(direction.y) / direction.y;
        if ty > 0.0 {
            t = t.min(ty);
        }
    }

    if t.is_finite() {
        center + direction * t
    } else {
        center
    }
}
