//! Boundary point generation (component A): produces the interior and
//! exterior point rings that bracket a rectangular map before it is handed
//! to the triangulator. Purely deterministic — no randomness lives here;
//! any jitter of *interior* sample points is the caller's concern (see the
//! demo binary).

use glam::DVec2;

const CURVATURE: f64 = 1.0;
const EPSILON: f64 = 1e-4;

/// An axis-aligned rectangle a map is generated over.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// The two point rings produced for a given rectangle and spacing.
#[derive(Debug, Clone)]
pub struct BoundaryPoints {
    /// Points just inside each edge. This MUST be the prefix of the point
    /// array handed to the triangulator.
    pub interior: Vec<DVec2>,
    /// Points just outside each edge, plus the four corners.
    pub exterior: Vec<DVec2>,
}

impl BoundaryPoints {
    /// Number of interior boundary points, i.e. `NumBoundaryRegions`.
    pub fn num_boundary_points(&self) -> usize {
        self.interior.len()
    }
}

fn inset(t: f64) -> f64 {
    EPSILON + CURVATURE * 4.0 * (t - 0.5).powi(2)
}

/// Evenly spaced samples of `t` in `[0, 1]`, `n` of them (`n >= 1`).
fn sample_ts(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![0.5];
    }
    (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
}

pub fn generate_boundary_points(bounds: &Bounds, spacing: f64) -> BoundaryPoints {
    let nx = (((bounds.width - 2.0 * CURVATURE) / spacing).ceil() as usize).max(1);
    let ny = (((bounds.height - 2.0 * CURVATURE) / spacing).ceil() as usize).max(1);

    let mut interior = Vec::with_capacity(2 * (nx + ny));

    // Top edge, left to right.
    for t in sample_ts(nx) {
        let x = bounds.left + CURVATURE + t * (bounds.width - 2.0 * CURVATURE);
        let y = bounds.top + inset(t);
        interior.push(DVec2::new(x, y));
    }
    // Right edge, top to bottom.
    for t in sample_ts(ny) {
        let x = bounds.left + bounds.width - inset(t);
        let y = bounds.top + CURVATURE + t * (bounds.height - 2.0 * CURVATURE);
        interior.push(DVec2::new(x, y));
    }
    // Bottom edge, right to left.
    for t in sample_ts(nx) {
        let x = bounds.left + bounds.width - CURVATURE - t * (bounds.width - 2.0 * CURVATURE);
        let y = bounds.top + bounds.height - inset(t);
        interior.push(DVec2::new(x, y));
    }
    // Left edge, bottom to top.
    for t in sample_ts(ny) {
        let x = bounds.left + inset(t);
        let y = bounds.top + bounds.height - CURVATURE - t * (bounds.height - 2.0 * CURVATURE);
        interior.push(DVec2::new(x, y));
    }

    let offset = spacing / std::f64::consts::SQRT_2;
    let half_offset = spacing / 2.0;
    let mut exterior = Vec::new();

    let mut x = bounds.left + half_offset;
    while x < bounds.left + bounds.width {
        exterior.push(DVec2::new(x, bounds.top - offset));
        x += offset;
    }
    let mut y = bounds.top + half_offset;
    while y < bounds.top + bounds.height {
        exterior.push(DVec2::new(bounds.left + bounds.width + offset, y));
        y += offset;
    }
    let mut x = bounds.left + bounds.width - half_offset;
    while x > bounds.left {
        exterior.push(DVec2::new(x, bounds.top + bounds.height + offset));
        x -= offset;
    }
    let mut y = bounds.top + bounds.height - half_offset;
    while y > bounds.top {
        exterior.push(DVec2::new(bounds.left - offset, y));
        y -= offset;
    }

    exterior.push(DVec2::new(bounds.left - offset, bounds.top - offset));
    exterior.push(DVec2::new(bounds.left + bounds.width + offset, bounds.top - offset));
    exterior.push(DVec2::new(
        bounds.left + bounds.width + offset,
        bounds.top + bounds.height + offset,
    ));
    exterior.push(DVec2::new(bounds.left - offset, bounds.top + bounds.height + offset));

    BoundaryPoints { interior, exterior }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_points_lie_within_bounds() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let pts = generate_boundary_points(&bounds, 10.0);
        for p in &pts.interior {
            assert!(p.x >= bounds.left && p.x <= bounds.left + bounds.width);
            assert!(p.y >= bounds.top && p.y <= bounds.top + bounds.height);
        }
    }

    #[test]
    fn exterior_points_lie_outside_bounds() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let pts = generate_boundary_points(&bounds, 10.0);
        for p in &pts.exterior {
            let outside = p.x < bounds.left
                || p.x > bounds.left + bounds.width
                || p.y < bounds.top
                || p.y > bounds.top + bounds.height;
            assert!(outside);
        }
    }

    #[test]
    fn num_boundary_points_matches_interior_len() {
        let bounds = Bounds::new(0.0, 0.0, 50.0, 30.0);
        let pts = generate_boundary_points(&bounds, 5.0);
        assert_eq!(pts.num_boundary_points(), pts.interior.len());
        assert!(pts.num_boundary_points() > 0);
    }
}
