//! Component E: the terrain pipeline. Elevation from fractal noise plus an
//! island mask, region elevation by averaging, a wind-ordered rainfall
//! sweep, a priority-flood downslope assignment, and a reverse-order flow
//! accumulation. Pure function of mesh + seed + parameters: no side effects,
//! no I/O.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::info_span;

use crate::ids::{RegionId, SideId, TriangleId};
use crate::mesh::DualMesh;
use crate::noise::TerrainNoise;

/// Sentinel meaning "not yet assigned a downslope side" in `s_downslope_t`.
const UNASSIGNED: i64 = -999;
/// Sentinel meaning "this triangle is a local minimum (ocean sink)".
const SINK: i64 = -1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TerrainParams {
    pub noisy_coastlines: f32,
    pub raininess: f32,
    pub evaporation: f32,
    pub rain_shadow: f32,
    pub flow: f32,
    pub island: f32,
    pub seed: u32,
    pub wind_angle_radians: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            noisy_coastlines: 0.01,
            raininess: 0.9,
            evaporation: 0.5,
            rain_shadow: 0.5,
            flow: 0.2,
            island: 0.5,
            seed: 187,
            wind_angle_radians: 0.0,
        }
    }
}

/// The per-element state arrays the pipeline produces, borrowing the mesh
/// for the duration of generation.
pub struct TerrainMap<'m> {
    mesh: &'m DualMesh,
    pub wind_order: Vec<RegionId>,
    pub elevation_t: Vec<f32>,
    pub elevation_r: Vec<f32>,
    pub humidity_r: Vec<f32>,
    pub rainfall_r: Vec<f32>,
    pub moisture_t: Vec<f32>,
    /// The outgoing side from triangle t toward its downstream neighbor, or
    /// `SINK` for ocean minima, or `UNASSIGNED` if never visited by the flood.
    pub s_downslope_t: Vec<i64>,
    pub t_order: Vec<TriangleId>,
    pub flow_t: Vec<f32>,
    pub flow_s: Vec<f32>,
}

impl<'m> TerrainMap<'m> {
    pub fn generate(mesh: &'m DualMesh, params: &TerrainParams) -> Self {
        let _span = info_span!("TerrainMap::generate", seed = params.seed).entered();

        let wind_order = compute_wind_order(mesh, params);
        let elevation_t = compute_triangle_elevation(mesh, params);
        let elevation_r = compute_region_elevation(mesh, &elevation_t);
        let (humidity_r, rainfall_r) =
            compute_rainfall(mesh, params, &wind_order, &elevation_r);
        let moisture_t = compute_moisture(mesh, &rainfall_r);

        let mut map = TerrainMap {
            mesh,
            wind_order,
            elevation_t,
            elevation_r,
            humidity_r,
            rainfall_r,
            moisture_t,
            s_downslope_t: Vec::new(),
            t_order: Vec::new(),
            flow_t: Vec::new(),
            flow_s: Vec::new(),
        };
        map.compute_downslope();
        map.compute_flow(params);
        map
    }

    fn compute_downslope(&mut self) {
        let _span = info_span!("compute_downslope").entered();

        let n = self.mesh.num_solid_triangles();
        self.s_downslope_t = vec![UNASSIGNED; n];
        self.t_order = Vec::with_capacity(n);

        let mut heap: BinaryHeap<FloodItem> = BinaryHeap::new();

        for t in 0..n {
            let t = TriangleId(t);
            if self.elevation_t[t.0] >= -0.1 {
                continue;
            }
            let mut best: Option<(SideId, f32)> = None;
            for s in self.mesh.s_around_t(t) {
                let neighbor = self.mesh.t_outer(s);
                if self.mesh.is_ghost_t(neighbor) {
                    continue;
                }
                let elev = self.elevation_t[neighbor.0];
                if best.map_or(true, |(_, best_elev)| elev < best_elev) {
                    best = Some((s, elev));
                }
            }
            self.s_downslope_t[t.0] = match best {
                Some((s, elev)) if elev < self.elevation_t[t.0] => s.0 as i64,
                _ => SINK,
            };
            self.t_order.push(t);
            heap.push(FloodItem { priority: self.elevation_t[t.0], triangle: t });
        }

        while let Some(FloodItem { triangle: t_current, .. }) = heap.pop() {
            for s in self.mesh.s_around_t(t_current) {
                let neighbor = self.mesh.t_outer(s);
                if self.mesh.is_ghost_t(neighbor) {
                    continue;
                }
                if self.s_downslope_t[neighbor.0] != UNASSIGNED {
                    continue;
                }
                let back = self.mesh.s_opposite(s);
                self.s_downslope_t[neighbor.0] = back.0 as i64;
                self.t_order.push(neighbor);
                heap.push(FloodItem { priority: self.elevation_t[neighbor.0], triangle: neighbor });
            }
        }
    }

    fn compute_flow(&mut self, params: &TerrainParams) {
        let _span = info_span!("compute_flow").entered();

        let n = self.mesh.num_solid_triangles();
        self.flow_t = vec![0.0; n];
        self.flow_s = vec![0.0; self.mesh.num_sides()];

        for t in 0..n {
            let t = TriangleId(t);
            self.flow_t[t.0] = if self.elevation_t[t.0] >= 0.0 {
                params.flow * self.moisture_t[t.0].powi(2)
            } else {
                0.0
            };
        }

        for &t_tributary in self.t_order.iter().rev() {
            let s = self.s_downslope_t[t_tributary.0];
            if s == SINK {
                continue;
            }
            let s = SideId(s as usize);
            let t_down = self.mesh.t_outer(s);

            self.flow_t[t_down.0] += self.flow_t[t_tributary.0];
            self.flow_s[s.0] += self.flow_t[t_tributary.0];

            if self.elevation_t[t_down.0] >= 0.0
                && self.elevation_t[t_tributary.0] >= 0.0
                && self.elevation_t[t_down.0] > self.elevation_t[t_tributary.0]
            {
                self.elevation_t[t_down.0] = self.elevation_t[t_tributary.0];
            }
        }
    }
}

struct FloodItem {
    priority: f32,
    triangle: TriangleId,
}

impl PartialEq for FloodItem {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.triangle == other.triangle
    }
}
impl Eq for FloodItem {}

impl PartialOrd for FloodItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloodItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse the elevation comparison to get
        // min-elevation-first, breaking ties on triangle id for determinism.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.triangle.cmp(&self.triangle))
    }
}

fn compute_wind_order(mesh: &DualMesh, params: &TerrainParams) -> Vec<RegionId> {
    let _span = info_span!("compute_wind_order").entered();

    let (cos_t, sin_t) = (params.wind_angle_radians.cos(), params.wind_angle_radians.sin());
    let priority = |r: RegionId| mesh.x_of_r(r) * cos_t + mesh.y_of_r(r) * sin_t;

    let mut order: Vec<RegionId> = (0..mesh.num_solid_regions()).map(RegionId).collect();
    order.sort_by(|&a, &b| priority(a).partial_cmp(&priority(b)).unwrap());
    order
}

fn desired_elevation(noise: &TerrainNoise, ridge_noise: &TerrainNoise, nx: f64, ny: f64, island: f32) -> f32 {
    let mut sum = 0.0f64;
    let mut sum_amplitude = 0.0f64;
    let mut amplitude = 1.0f64;
    for octave in 0..5 {
        let freq = 2f64.powi(octave);
        sum += amplitude * noise.sample(nx * freq, ny * freq) as f64;
        sum_amplitude += amplitude;
        amplitude *= 0.5;
    }
    let mut e = (sum / sum_amplitude) as f32;

    let island_term = island * (0.75 - 2.0 * (nx.abs() as f32).max(ny.abs() as f32).powi(2));
    e = 0.5 * (e + island_term);
    e = e.clamp(-1.0, 1.0);

    if e >= 0.0 {
        let m = ridge_noise.sample(nx, ny) + 0.5 * ridge_noise.sample(2.0 * nx, 2.0 * ny);
        let m = m as f32;
        e = e.max((3.0 * e).min((1.0f32).min(5.0 * e) * (1.0 - m.abs() / 0.5)));
    }

    e
}

fn compute_triangle_elevation(mesh: &DualMesh, params: &TerrainParams) -> Vec<f32> {
    let _span = info_span!("compute_triangle_elevation").entered();

    let noise = TerrainNoise::new(params.seed);
    let ridge_noise = TerrainNoise::new(params.seed.wrapping_add(1));

    (0..mesh.num_solid_triangles())
        .map(|t| {
            let t = TriangleId(t);
            let pos = mesh.pos_of_t(t);
            let (nx, ny) = (pos.x / 1000.0, pos.y / 1000.0);
            let e = desired_elevation(&noise, &ridge_noise, nx, ny, params.island);
            (e + params.noisy_coastlines * (1.0 - e.powi(4))).clamp(-1.0, 1.0)
        })
        .collect()
}

fn compute_region_elevation(mesh: &DualMesh, elevation_t: &[f32]) -> Vec<f32> {
    let _span = info_span!("compute_region_elevation").entered();

    (0..mesh.num_solid_regions())
        .map(|r| {
            let r = RegionId(r);
            let mut sum = 0.0f32;
            let mut count = 0usize;
            let mut any_under_water = false;
            for t in mesh.t_around_r(r) {
                if mesh.is_ghost_t(t) {
                    continue;
                }
                let e = elevation_t[t.0];
                sum += e;
                count += 1;
                if e < 0.0 {
                    any_under_water = true;
                }
            }
            let avg = if count > 0 { sum / count as f32 } else { 0.0 };
            if any_under_water && avg >= 0.0 {
                -0.001
            } else {
                avg
            }
        })
        .collect()
}

fn compute_rainfall(
    mesh: &DualMesh,
    params: &TerrainParams,
    wind_order: &[RegionId],
    elevation_r: &[f32],
) -> (Vec<f32>, Vec<f32>) {
    let _span = info_span!("compute_rainfall").entered();

    let num_regions = mesh.num_solid_regions();
    let mut humidity_r = vec![0.0f32; num_regions];
    let mut rainfall_r = vec![0.0f32; num_regions];
    let (cos_t, sin_t) = (params.wind_angle_radians.cos(), params.wind_angle_radians.sin());
    let wind_priority = |r: RegionId| mesh.x_of_r(r) * cos_t + mesh.y_of_r(r) * sin_t;

    for &r in wind_order {
        let own_priority = wind_priority(r);
        let mut sum = 0.0f32;
        let mut count = 0usize;
        for neighbor in mesh.r_around_r(r) {
            if mesh.is_ghost_r(neighbor) {
                continue;
            }
            if wind_priority(neighbor) < own_priority {
                sum += humidity_r[neighbor.0];
                count += 1;
            }
        }
        let mut humidity = if count > 0 { sum / count as f32 } else { 0.0 };

        if elevation_r[r.0] < 0.0 {
            humidity += params.evaporation * elevation_r[r.0].abs();
        }
        if mesh.is_boundary_r(r) {
            humidity = 1.0;
        }

        let mut rainfall = params.raininess * humidity;

        let threshold = 1.0 - elevation_r[r.0];
        if humidity > threshold {
            let excess = humidity - threshold;
            rainfall += params.raininess * params.rain_shadow * excess;
            humidity -= excess;
        }

        humidity_r[r.0] = humidity;
        rainfall_r[r.0] = rainfall;
    }

    (humidity_r, rainfall_r)
}

fn compute_moisture(mesh: &DualMesh, rainfall_r: &[f32]) -> Vec<f32> {
    let _span = info_span!("compute_moisture").entered();

    (0..mesh.num_solid_triangles())
        .map(|t| {
            let t = TriangleId(t);
            let mut sum = 0.0f32;
            let mut count = 0usize;
            for r in mesh.r_around_t(t) {
                if mesh.is_ghost_r(r) {
                    continue;
                }
                sum += rainfall_r[r.0];
                count += 1;
            }
            if count > 0 { sum / count as f32 } else { 0.0 }
        })
        .collect()
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
    fn terrain_generation_is_deterministic() {
        let mesh = DualMesh::build(tiny_square(), 4).unwrap();
        let params = TerrainParams { seed: 287, ..TerrainParams::default() };
        let a = TerrainMap::generate(&mesh, &params);
        let b = TerrainMap::generate(&mesh, &params);
        assert_eq!(a.elevation_r, b.elevation_r);
        assert_eq!(a.rainfall_r, b.rainfall_r);
        assert_eq!(a.flow_s, b.flow_s);
    }

    #[test]
    fn elevation_stays_clamped() {
        let mesh = DualMesh::build(tiny_square(), 4).unwrap();
        let params = TerrainParams::default();
        let map = TerrainMap::generate(&mesh, &params);
        for &e in &map.elevation_t {
            assert!((-1.0..=1.0).contains(&e));
        }
    }

    #[test]
    fn wind_order_is_sorted_ascending() {
        let mesh = DualMesh::build(tiny_square(), 4).unwrap();
        let params = TerrainParams::default();
        let map = TerrainMap::generate(&mesh, &params);
        let (cos_t, sin_t) =
            (params.wind_angle_radians.cos(), params.wind_angle_radians.sin());
        let priorities: Vec<f64> = map
            .wind_order
            .iter()
            .map(|&r| mesh.x_of_r(r) * cos_t + mesh.y_of_r(r) * sin_t)
            .collect();
        for w in priorities.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }
}
