//! Component B: the Delaunay adapter. A thin contract over the `delaunator`
//! crate, converting its `usize`/`EMPTY` convention into this crate's
//! `RegionId`/`Option<SideId>` types and turning triangulation failure into
//! [`MeshError`] instead of a panic. This module does not reimplement or
//! second-guess the triangulation itself.

use delaunator::{triangulate, Point};
use glam::DVec2;

use crate::error::MeshError;
use crate::ids::{RegionId, SideId};

/// Pre-ghost-closure output of the external triangulator, already translated
/// into this crate's id types.
pub struct RawTriangulation {
    pub points: Vec<DVec2>,
    /// `triangles[s]` is the region at which side `s` begins. Length `3T`.
    pub triangles: Vec<RegionId>,
    /// `halfedges[s]` is the opposite side, or `None` on the convex hull.
    /// Length `3T`.
    pub halfedges: Vec<Option<SideId>>,
}

impl RawTriangulation {
    pub fn num_solid_sides(&self) -> usize {
        self.triangles.len()
    }
}

pub fn triangulate_points(points: Vec<DVec2>) -> Result<RawTriangulation, MeshError> {
    if points.len() < 3 {
        return Err(MeshError::TooFewPoints { got: points.len() });
    }

    let delaunator_points: Vec<Point> = points.iter().map(|p| Point { x: p.x, y: p.y }).collect();

    let triangulation =
        triangulate(&delaunator_points).ok_or(MeshError::TriangulationFailed)?;

    let triangles = triangulation.triangles.iter().map(|&r| RegionId(r)).collect();
    let halfedges = triangulation
        .halfedges
        .iter()
        .map(|&h| if h == delaunator::EMPTY { None } else { Some(SideId(h)) })
        .collect();

    Ok(RawTriangulation { points, triangles, halfedges })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_and_center() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(0.5, 0.5),
        ]
    }

    #[test]
    fn triangulates_a_small_point_set() {
        let raw = triangulate_points(square_and_center()).unwrap();
        assert_eq!(raw.triangles.len() % 3, 0);
        assert!(!raw.triangles.is_empty());
    }

    #[test]
    fn opposite_of_opposite_holds_wherever_paired() {
        let raw = triangulate_points(square_and_center()).unwrap();
        for (s, opposite) in raw.halfedges.iter().enumerate() {
            if let Some(o) = opposite {
                assert_eq!(raw.halfedges[o.0], Some(SideId(s)));
            }
        }
    }

    #[test]
    fn too_few_points_is_an_error() {
        let err = triangulate_points(vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)]);
        assert!(matches!(err, Err(MeshError::TooFewPoints { got: 2 })));
    }
}
