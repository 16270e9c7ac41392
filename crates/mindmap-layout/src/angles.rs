//! Angle assignment for the root's children.
//!
//! Angles are in degrees with 0° straight up, increasing clockwise. Angles up
//! to 180° fall in the right column, the rest in the left column.

use mindmap_core::Direction;

/// Angle for each of `n` root children, in child order.
///
/// One to four children use fixed angles. From five on, the first
/// `ceil(n/2)` are spread evenly over (0°, 180°) and the remaining
/// `floor(n/2)` over (180°, 360°). `n = 0` yields no angles; callers skip
/// placement in that case.
pub fn compute_root_child_angles(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![90.0],
        2 => vec![60.0, 120.0],
        3 => vec![60.0, 120.0, 240.0],
        4 => vec![60.0, 120.0, 240.0, 300.0],
        _ => {
            let right_count = n.div_ceil(2);
            let left_count = n / 2;
            let right_step = 180.0 / (right_count + 1) as f64;
            let left_step = 180.0 / (left_count + 1) as f64;

            let right = (1..=right_count).map(|k| k as f64 * right_step);
            let left = (1..=left_count).map(|k| 180.0 + k as f64 * left_step);
            right.chain(left).collect()
        }
    }
}

/// Split child indices into (right, left) columns, each in top-to-bottom
/// order: increasing angle on the right, decreasing angle on the left.
pub fn column_order(angles: &[f64]) -> (Vec<usize>, Vec<usize>) {
    let (mut right, mut left): (Vec<_>, Vec<_>) = (0..angles.len())
        .partition(|&i| Direction::from_angle(angles[i]) == Direction::Right);
    right.sort_by(|&a, &b| angles[a].total_cmp(&angles[b]));
    left.sort_by(|&a, &b| angles[b].total_cmp(&angles[a]));
    (right, left)
}
