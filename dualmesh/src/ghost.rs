//! Component C: the ghost-structure builder. Closes every unpaired half-edge
//! left by the triangulator with a synthetic triangle incident to a single
//! new ghost region, so the mesh satisfies `halfedges[halfedges[s]] = s`
//! everywhere.

use glam::DVec2;
use tracing::info_span;

use crate::delaunay::RawTriangulation;
use crate::ids::{RegionId, SideId};

/// Arrays for a fully closed mesh: every side has an opposite.
pub struct ClosedArrays {
    pub points: Vec<DVec2>,
    pub triangles: Vec<RegionId>,
    pub halfedges: Vec<SideId>,
    pub num_solid_sides: usize,
}

fn r_begin(triangles: &[RegionId], s: SideId) -> RegionId {
    triangles[s.0]
}

fn r_end(triangles: &[RegionId], s: SideId) -> RegionId {
    triangles[s.next().0]
}

/// Closes the boundary of `raw`, appending one ghost region and `k` ghost
/// triangles where `k` is the length of the convex hull.
pub fn close_boundary(raw: RawTriangulation) -> ClosedArrays {
    let _span = info_span!("close_boundary", num_solid_sides = raw.num_solid_sides()).entered();

    let num_solid_sides = raw.num_solid_sides();
    let num_solid_regions = raw.points.len();

    // unpaired[r] = the unpaired side that begins at region r, if any.
    let mut unpaired: Vec<Option<SideId>> = vec![None; num_solid_regions];
    let mut s_first = None;
    let mut k = 0usize;
    for s in 0..num_solid_sides {
        let s = SideId(s);
        if raw.halfedges[s.0].is_none() {
            unpaired[r_begin(&raw.triangles, s).0] = Some(s);
            if s_first.is_none() {
                s_first = Some(s);
            }
            k += 1;
        }
    }

    let mut points = raw.points;
    let r_ghost = RegionId(points.len());
    points.push(DVec2::new(f64::NAN, f64::NAN));

    let total_sides = num_solid_sides + 3 * k;
    let mut triangles: Vec<RegionId> = vec![RegionId(0); total_sides];
    let mut halfedges: Vec<SideId> = vec![SideId(0); total_sides];

    triangles[..num_solid_sides].copy_from_slice(&raw.triangles);
    for s in 0..num_solid_sides {
        if let Some(opposite) = raw.halfedges[s] {
            halfedges[s] = opposite;
        }
    }

    if k == 0 {
        return ClosedArrays { points, triangles, halfedges, num_solid_sides };
    }

    // Walk the unpaired sides around the hull.
    let mut walk = Vec::with_capacity(k);
    let mut current = s_first.expect("k > 0 implies at least one unpaired side");
    for _ in 0..k {
        walk.push(current);
        current = unpaired[r_end(&triangles, current).0]
            .expect("every hull vertex has exactly one unpaired outgoing side");
    }

    for (i, &s_current) in walk.iter().enumerate() {
        let s_ghost = SideId(num_solid_sides + 3 * i);

        triangles[s_ghost.0] = r_end(&triangles, s_current);
        triangles[s_ghost.0 + 1] = r_begin(&triangles, s_current);
        triangles[s_ghost.0 + 2] = r_ghost;

        halfedges[s_current.0] = s_ghost;
        halfedges[s_ghost.0] = s_current;

        let k_prime = SideId(num_solid_sides + (3 * i + 4) % (3 * k));
        halfedges[s_ghost.0 + 2] = k_prime;
        halfedges[k_prime.0] = SideId(s_ghost.0 + 2);
    }

    ClosedArrays { points, triangles, halfedges, num_solid_sides }
}
