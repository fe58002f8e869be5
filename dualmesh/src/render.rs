//! Component G (rendering contract): the three operations an external
//! drawing surface must provide. The core produces flat coordinate data and
//! calls these; it never depends on a concrete rendering backend. See the
//! demo binary for an SVG-backed implementation.

/// An RGBA color, channels in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// An opaque drawing surface. The mesh and terrain data are consumed by
/// iterating solid sides/regions/triangles and calling these methods with
/// flat coordinate data; the surface decides how (or whether) to render.
pub trait Canvas {
    fn draw_point(&mut self, color: Color, radius: f64, x: f64, y: f64);
    fn draw_line_segment(&mut self, color: Color, width: f64, x1: f64, y1: f64, x2: f64, y2: f64);
    fn draw_polygon(&mut self, color: Color, flat_xy_coords: &[f64]);
}
