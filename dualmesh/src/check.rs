//! Component F: the structural-invariant checker. Run against a freshly
//! built mesh to confirm the hard invariants from §3 and §8 hold, returning
//! a `Result` rather than aborting so it can be driven from tests and from
//! the demo binary's `--verify` flag alike.

use crate::error::CheckError;
use crate::ids::RegionId;
use crate::mesh::DualMesh;

/// Advisory (non-fatal) report: a histogram of triangles with a thin
/// interior angle, bucketed by degrees.
#[derive(Debug, Default)]
pub struct SkinnyTriangleReport {
    pub below_10_degrees: usize,
    pub below_20_degrees: usize,
    pub below_30_degrees: usize,
}

pub fn check_mesh(mesh: &DualMesh) -> Result<SkinnyTriangleReport, CheckError> {
    for s in 0..mesh.num_sides() {
        let s = crate::ids::SideId(s);
        let opposite = mesh.s_opposite(s);
        let back = mesh.s_opposite(opposite);
        if back != s {
            return Err(CheckError::NotInvolution { s, opposite, back });
        }
        if mesh.r_begin(s) != mesh.r_end(opposite) {
            return Err(CheckError::RegionMismatch {
                s,
                expected: mesh.r_begin(s),
                got: mesh.r_end(opposite),
            });
        }
        if mesh.t_inner(s) != mesh.t_outer(opposite) {
            return Err(CheckError::TriangleMismatch {
                s,
                expected: mesh.t_inner(s),
                got: mesh.t_outer(opposite),
            });
        }
        if mesh.r_begin(s.next()) != mesh.r_begin(opposite) {
            return Err(CheckError::PrimalDualMismatch { s });
        }
    }

    for t in 0..mesh.num_triangles() {
        let t = crate::ids::TriangleId(t);
        for s in mesh.s_around_t(t) {
            if mesh.t_inner(s) != t {
                return Err(CheckError::TriangleMismatch { s, expected: t, got: mesh.t_inner(s) });
            }
        }
    }

    const MAX_STEPS: usize = 100;
    for r in 0..mesh.num_regions() {
        let r = RegionId(r);
        if mesh.is_ghost_r(r) {
            continue;
        }
        let steps = mesh.s_around_r(r).take(MAX_STEPS + 1).count();
        if steps > MAX_STEPS {
            return Err(CheckError::CirculationDidNotClose { region: r, steps });
        }
        for s in mesh.s_around_r(r) {
            if mesh.r_begin(s) != r {
                return Err(CheckError::RegionMismatch { s, expected: r, got: mesh.r_begin(s) });
            }
        }
    }

    Ok(skinny_triangle_histogram(mesh))
}

fn interior_angles_degrees(mesh: &DualMesh, t: crate::ids::TriangleId) -> [f64; 3] {
    let verts = mesh.r_around_t(t).map(|r| mesh.pos_of_r(r));
    let mut angles = [0.0; 3];
    for i in 0..3 {
        let prev = verts[(i + 2) % 3];
        let here = verts[i];
        let next = verts[(i + 1) % 3];
        let a = prev - here;
        let b = next - here;
        let cos_theta = a.dot(b) / (a.length() * b.length());
        angles[i] = cos_theta.clamp(-1.0, 1.0).acos().to_degrees();
    }
    angles
}

fn skinny_triangle_histogram(mesh: &DualMesh) -> SkinnyTriangleReport {
    let mut report = SkinnyTriangleReport::default();
    for t in 0..mesh.num_solid_triangles() {
        let t = crate::ids::TriangleId(t);
        let min_angle = interior_angles_degrees(mesh, t).into_iter().fold(f64::MAX, f64::min);
        if min_angle < 10.0 {
            report.below_10_degrees += 1;
        }
        if min_angle < 20.0 {
            report.below_20_degrees += 1;
        }
        if min_angle < 30.0 {
            report.below_30_degrees += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn tiny_square() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(100.0, 100.0),
            DVec2::new(0.0, 100.0),
            DVec2::new(25.0, 25.0),
            DVec2::new(75.0, 25.0),
            DVec2::new(75.0, 75.0),
            DVec2::new(25.0, 75.0),
            DVec2::new(50.0, 50.0),
        ]
    }

    #[test]
    fn a_freshly_built_mesh_passes_every_invariant() {
        let mesh = DualMesh::build(tiny_square(), 4).unwrap();
        assert!(check_mesh(&mesh).is_ok());
    }

    #[test]
    fn larger_random_mesh_passes_too() {
        let mut points = Vec::new();
        points.push(DVec2::new(0.0, 0.0));
        points.push(DVec2::new(1000.0, 0.0));
        points.push(DVec2::new(1000.0, 1000.0));
        points.push(DVec2::new(0.0, 1000.0));
        let mut state = 0x2545F4914F6CDD1Du64;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 1000) as f64
        };
        for _ in 0..120 {
            points.push(DVec2::new(next(), next()));
        }
        let mesh = DualMesh::build(points, 4).unwrap();
        assert!(check_mesh(&mesh).is_ok());
    }
}
