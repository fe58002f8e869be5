//! Component D: the dual mesh. Owns the closed arrays from the ghost builder
//! and exposes the index algebra, scalar accessors, and circulators that the
//! rest of the crate is built on.
//!
//! The mesh is a cyclic index graph: regions, sides, and triangles are dense
//! integer indices into flat arrays owned by one `DualMesh` value, not owning
//! objects that point at each other. Circulators are iterators over those
//! arrays, not heap-allocated walks.

use glam::DVec2;
use tracing::info_span;

use crate::delaunay::triangulate_points;
use crate::error::MeshError;
use crate::ghost::close_boundary;
use crate::ids::{RegionId, SideId, TriangleId};

pub struct DualMesh {
    points: Vec<DVec2>,
    triangles: Vec<RegionId>,
    halfedges: Vec<SideId>,
    vertex_t: Vec<DVec2>,
    s_of_r: Vec<Option<SideId>>,
    num_solid_sides: usize,
    num_boundary_regions: usize,
}

impl DualMesh {
    /// Builds a mesh from a point set (interior boundary points first, then
    /// exterior boundary points, then any interior samples) and the count of
    /// points that are boundary regions.
    pub fn build(points: Vec<DVec2>, num_boundary_regions: usize) -> Result<Self, MeshError> {
        let _span = info_span!("DualMesh::build", num_points = points.len()).entered();

        let raw = triangulate_points(points)?;
        let closed = close_boundary(raw);

        let mut mesh = DualMesh {
            points: closed.points,
            triangles: closed.triangles,
            halfedges: closed.halfedges,
            vertex_t: Vec::new(),
            s_of_r: Vec::new(),
            num_solid_sides: closed.num_solid_sides,
            num_boundary_regions,
        };
        mesh.update();
        Ok(mesh)
    }

    fn update(&mut self) {
        let _span = info_span!("DualMesh::update").entered();

        let num_regions = self.points.len();
        let mut s_of_r = vec![None; num_regions];
        for s in 0..self.num_sides() {
            let s = SideId(s);
            let r = self.r_end(s);
            if s_of_r[r.0].is_none() {
                s_of_r[r.0] = Some(s);
            }
        }
        self.s_of_r = s_of_r;

        let num_triangles = self.num_sides() / 3;
        let mut vertex_t = Vec::with_capacity(num_triangles);
        for t in 0..num_triangles {
            let t = TriangleId(t);
            let [s0, s1, s2] = t.sides();
            let a = self.points[self.triangles[s0]];
            let b = self.points[self.triangles[s1]];
            if self.is_ghost_t(t) {
                let midpoint = (a + b) * 0.5;
                let d = b - a;
                let perp = DVec2::new(d.y, -d.x);
                let out = if perp.length_squared() > 0.0 { perp.normalize() } else { DVec2::ZERO };
                vertex_t.push(midpoint + out * 10.0);
            } else {
                let c = self.points[self.triangles[s2]];
                vertex_t.push((a + b + c) / 3.0);
            }
        }
        self.vertex_t = vertex_t;
    }

    // -- counts -----------------------------------------------------------

    pub fn num_regions(&self) -> usize {
        self.points.len()
    }

    pub fn num_solid_regions(&self) -> usize {
        self.num_regions() - 1
    }

    pub fn num_boundary_regions(&self) -> usize {
        self.num_boundary_regions
    }

    pub fn num_sides(&self) -> usize {
        self.triangles.len()
    }

    pub fn num_solid_sides(&self) -> usize {
        self.num_solid_sides
    }

    pub fn num_triangles(&self) -> usize {
        self.num_sides() / 3
    }

    pub fn num_solid_triangles(&self) -> usize {
        self.num_solid_sides / 3
    }

    pub fn ghost_region(&self) -> RegionId {
        RegionId(self.num_regions() - 1)
    }

    // -- scalar accessors ---------------------------------------------------

    pub fn r_begin(&self, s: SideId) -> RegionId {
        self.triangles[s]
    }

    pub fn r_end(&self, s: SideId) -> RegionId {
        self.triangles[s.next()]
    }

    pub fn t_inner(&self, s: SideId) -> TriangleId {
        s.triangle()
    }

    pub fn t_outer(&self, s: SideId) -> TriangleId {
        self.s_opposite(s).triangle()
    }

    pub fn s_opposite(&self, s: SideId) -> SideId {
        self.halfedges[s]
    }

    pub fn x_of_r(&self, r: RegionId) -> f64 {
        self.points[r].x
    }

    pub fn y_of_r(&self, r: RegionId) -> f64 {
        self.points[r].y
    }

    pub fn pos_of_r(&self, r: RegionId) -> DVec2 {
        self.points[r]
    }

    pub fn x_of_t(&self, t: TriangleId) -> f64 {
        self.vertex_t[t.0].x
    }

    pub fn y_of_t(&self, t: TriangleId) -> f64 {
        self.vertex_t[t.0].y
    }

    pub fn pos_of_t(&self, t: TriangleId) -> DVec2 {
        self.vertex_t[t.0]
    }

    // -- predicates ---------------------------------------------------------

    pub fn is_ghost_s(&self, s: SideId) -> bool {
        s.0 >= self.num_solid_sides
    }

    pub fn is_ghost_t(&self, t: TriangleId) -> bool {
        3 * t.0 >= self.num_solid_sides
    }

    pub fn is_ghost_r(&self, r: RegionId) -> bool {
        r == self.ghost_region()
    }

    pub fn is_boundary_s(&self, s: SideId) -> bool {
        self.is_ghost_s(s) && s.0 % 3 == 0
    }

    pub fn is_boundary_r(&self, r: RegionId) -> bool {
        r.0 < self.num_boundary_regions
    }

    // -- triangle circulators (O(1), exactly 3 elements) ---------------------

    pub fn s_around_t(&self, t: TriangleId) -> [SideId; 3] {
        t.sides()
    }

    pub fn r_around_t(&self, t: TriangleId) -> [RegionId; 3] {
        let [s0, s1, s2] = t.sides();
        [self.triangles[s0], self.triangles[s1], self.triangles[s2]]
    }

    pub fn t_around_t(&self, t: TriangleId) -> [TriangleId; 3] {
        let [s0, s1, s2] = t.sides();
        [self.t_outer(s0), self.t_outer(s1), self.t_outer(s2)]
    }

    // -- region circulators ---------------------------------------------------

    /// The shared walk driving all three region circulators: yields the
    /// `incoming` side at each step, starting from `s_of_r[r]` and advancing
    /// via `halfedges[s_next(incoming)]` until it returns to the start.
    fn incoming_walk(&self, r: RegionId) -> IncomingWalk<'_> {
        let start = self.s_of_r[r.0];
        IncomingWalk { mesh: self, start, current: start }
    }

    pub fn s_around_r(&self, r: RegionId) -> impl Iterator<Item = SideId> + '_ {
        self.incoming_walk(r).map(move |incoming| self.s_opposite(incoming))
    }

    pub fn r_around_r(&self, r: RegionId) -> impl Iterator<Item = RegionId> + '_ {
        self.incoming_walk(r).map(move |incoming| self.r_begin(incoming))
    }

    pub fn t_around_r(&self, r: RegionId) -> impl Iterator<Item = TriangleId> + '_ {
        self.incoming_walk(r).map(|incoming| incoming.triangle())
    }
}

struct IncomingWalk<'m> {
    mesh: &'m DualMesh,
    start: Option<SideId>,
    current: Option<SideId>,
}

impl Iterator for IncomingWalk<'_> {
    type Item = SideId;

    fn next(&mut self) -> Option<SideId> {
        let incoming = self.current?;
        let outgoing = incoming.next();
        let candidate = self.mesh.s_opposite(outgoing);
        self.current = if Some(candidate) == self.start { None } else { Some(candidate) };
        Some(incoming)
    }
}
