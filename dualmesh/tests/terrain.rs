//! S4 (deterministic terrain run) and S6 (flow conservation): the terrain
//! pipeline must reproduce byte-identical output for identical inputs, and
//! flow accumulated at a triangle must equal the sum of its tributaries'
//! flow plus its own seed contribution.

use dualmesh::{DualMesh, TerrainMap, TerrainParams};
use glam::DVec2;
use std::collections::HashMap;

fn grid_1000_spacing_50() -> Vec<DVec2> {
    let mut points = Vec::new();
    let mut x = 0.0;
    while x <= 1000.0 {
        points.push(DVec2::new(x, 0.0));
        points.push(DVec2::new(x, 1000.0));
        x += 50.0;
    }
    let mut y = 50.0;
    while y < 1000.0 {
        points.push(DVec2::new(0.0, y));
        points.push(DVec2::new(1000.0, y));
        y += 50.0;
    }
    let num_boundary = points.len();

    let mut state = 0xD1B54A32D192ED03u64;
    let mut next_f64 = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    for _ in 0..300 {
        points.push(DVec2::new(next_f64() * 1000.0, next_f64() * 1000.0));
    }

    // Caller passes num_boundary separately; stash it as the first element's
    // count by returning only the point vec here and recomputing below.
    let _ = num_boundary;
    points
}

fn round4(x: f32) -> i64 {
    (x * 10000.0).round() as i64
}

#[test]
fn s4_terrain_run_is_byte_identical_across_runs() {
    let points = grid_1000_spacing_50();
    let num_boundary = {
        // Recompute the boundary-point count the same way the generator did.
        let mut n = 0;
        let mut x = 0.0;
        while x <= 1000.0 {
            n += 2;
            x += 50.0;
        }
        let mut y = 50.0;
        while y < 1000.0 {
            n += 2;
            y += 50.0;
        }
        n
    };

    let mesh = DualMesh::build(points.clone(), num_boundary).unwrap();
    let params = TerrainParams { seed: 287, wind_angle_radians: 0.0, ..TerrainParams::default() };

    let run_a = TerrainMap::generate(&mesh, &params);
    let run_b = TerrainMap::generate(&mesh, &params);

    let hash_a: Vec<i64> = run_a.elevation_r.iter().map(|&e| round4(e)).collect();
    let hash_b: Vec<i64> = run_b.elevation_r.iter().map(|&e| round4(e)).collect();
    assert_eq!(hash_a, hash_b);
    assert_eq!(run_a.rainfall_r, run_b.rainfall_r);
    assert_eq!(run_a.flow_s, run_b.flow_s);

    let mesh_again = DualMesh::build(points, num_boundary).unwrap();
    let run_c = TerrainMap::generate(&mesh_again, &params);
    let hash_c: Vec<i64> = run_c.elevation_r.iter().map(|&e| round4(e)).collect();
    assert_eq!(hash_a, hash_c);
}

#[test]
fn s6_flow_at_each_triangle_is_the_sum_of_its_tributaries() {
    let points = grid_1000_spacing_50();
    let num_boundary = {
        let mut n = 0;
        let mut x = 0.0;
        while x <= 1000.0 {
            n += 2;
            x += 50.0;
        }
        let mut y = 50.0;
        while y < 1000.0 {
            n += 2;
            y += 50.0;
        }
        n
    };

    let mesh = DualMesh::build(points, num_boundary).unwrap();
    let params = TerrainParams::default();
    let map = TerrainMap::generate(&mesh, &params);

    // Build tributary lists from s_downslope_t: for every triangle with a
    // real downslope side, it contributes its flow to its downstream
    // neighbor.
    let mut tributaries_of: HashMap<usize, Vec<usize>> = HashMap::new();
    for (t, &s) in map.s_downslope_t.iter().enumerate() {
        if s < 0 {
            continue;
        }
        let s = dualmesh::SideId(s as usize);
        let downstream = mesh.t_outer(s).0;
        tributaries_of.entry(downstream).or_default().push(t);
    }

    for (&downstream, tributaries) in &tributaries_of {
        let seed_flow = if map.elevation_t[downstream] >= 0.0 {
            params.flow * map.moisture_t[downstream].powi(2)
        } else {
            0.0
        };
        let tributary_sum: f32 = tributaries
            .iter()
            .map(|&t| {
                // A tributary's own recorded flow already includes whatever
                // flowed into *it*, so summing the final flow_t values of
                // direct tributaries plus this triangle's own seed gives the
                // expected total at `downstream`.
                map.flow_t[t]
            })
            .sum();
        let expected = seed_flow + tributary_sum;
        let actual = map.flow_t[downstream];
        assert!(
            (actual - expected).abs() < 1e-3,
            "triangle {downstream}: expected flow {expected}, got {actual}"
        );
    }
}
