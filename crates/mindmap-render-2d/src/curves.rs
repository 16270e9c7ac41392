//! Bézier sampling for connectors.

use glam::DVec2;
use lyon::geom::{point, CubicBezierSegment};

/// Sample a cubic Bézier at `steps + 1` evenly spaced parameters, `t = 0..=1`.
///
/// A `steps` of 0 is treated as 1.
pub fn cubic_bezier_points(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, steps: usize) -> Vec<DVec2> {
    let steps = steps.max(1);
    let segment = CubicBezierSegment {
        from: point(p0.x, p0.y),
        ctrl1: point(p1.x, p1.y),
        ctrl2: point(p2.x, p2.y),
        to: point(p3.x, p3.y),
    };
    (0..=steps)
        .map(|i| {
            let p = segment.sample(i as f64 / steps as f64);
            DVec2::new(p.x, p.y)
        })
        .collect()
}

/// Control points of a tapered connector: 40% and 60% of the way across,
/// both at the end's height unless the ends are level.
pub fn tapered_controls(start: DVec2, end: DVec2) -> (DVec2, DVec2) {
    let dx = end.x - start.x;
    let control_y = if (end.y - start.y).abs() > 1.0 { end.y } else { start.y };
    (
        DVec2::new(start.x + dx * 0.4, control_y),
        DVec2::new(start.x + dx * 0.6, control_y),
    )
}

/// A sampled polyline with a stroke width per segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaperedCurve {
    /// `widths.len() + 1` points
    pub points: Vec<DVec2>,
    pub widths: Vec<f64>,
}

impl TaperedCurve {
    /// Same width along every segment.
    pub fn uniform(points: Vec<DVec2>, width: f64) -> Self {
        let widths = vec![width; points.len().saturating_sub(1)];
        Self { points, widths }
    }

    /// Width interpolated linearly from `start_width` at the first segment
    /// toward `end_width`, segment `i` getting `t = i / segments`.
    pub fn tapered(points: Vec<DVec2>, start_width: f64, end_width: f64) -> Self {
        let segments = points.len().saturating_sub(1);
        let widths = (0..segments)
            .map(|i| {
                let t = i as f64 / segments as f64;
                start_width + (end_width - start_width) * t
            })
            .collect();
        Self { points, widths }
    }

    /// Iterate `(from, to, width)` per segment.
    pub fn segments(&self) -> impl Iterator<Item = (DVec2, DVec2, f64)> + '_ {
        self.points
            .windows(2)
            .zip(&self.widths)
            .map(|(pair, &w)| (pair[0], pair[1], w))
    }
}

/// A connector from `start` to `end` whose stroke narrows from `start_width`
/// to `end_width`, with controls from [`tapered_controls`].
pub fn tapered_bezier(start: DVec2, end: DVec2, start_width: f64, end_width: f64, steps: usize) -> TaperedCurve {
    let (cp1, cp2) = tapered_controls(start, end);
    TaperedCurve::tapered(cubic_bezier_points(start, cp1, cp2, end, steps), start_width, end_width)
}
