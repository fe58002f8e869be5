//! S5: after ghost closure, the three region circulators agree in length and
//! in the triangles they visit, for every non-ghost region.

use dualmesh::DualMesh;
use glam::DVec2;
use std::collections::HashSet;

fn square_with_jittered_interior() -> Vec<DVec2> {
    let mut points = vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(200.0, 0.0),
        DVec2::new(200.0, 200.0),
        DVec2::new(0.0, 200.0),
    ];
    let mut state = 0xC2B2AE3D27D4EB4Fu64;
    let mut next_f64 = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    for _ in 0..60 {
        points.push(DVec2::new(10.0 + next_f64() * 180.0, 10.0 + next_f64() * 180.0));
    }
    points
}

#[test]
fn s5_circulators_agree_on_every_solid_region() {
    let mesh = DualMesh::build(square_with_jittered_interior(), 4).unwrap();

    for r in 0..mesh.num_solid_regions() {
        let r = dualmesh::RegionId(r);

        let s_list: Vec<_> = mesh.s_around_r(r).collect();
        let r_list: Vec<_> = mesh.r_around_r(r).collect();
        let t_list: Vec<_> = mesh.t_around_r(r).collect();

        assert_eq!(s_list.len(), r_list.len());
        assert_eq!(s_list.len(), t_list.len());

        let from_s: HashSet<_> = s_list.iter().map(|&s| s.triangle()).collect();
        let from_t: HashSet<_> = t_list.iter().copied().collect();
        assert_eq!(from_s, from_t);

        for &s in &s_list {
            assert_eq!(mesh.r_begin(s), r);
        }
    }
}
