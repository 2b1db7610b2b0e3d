//! Scanline triangle fill
//!
//! Every triangle is split into at most one flat-bottom and one flat-top half,
//! each walked one scanline at a time. Buffer y grows upward, so "bottom" is the
//! side with the smaller y.
//!
//! Fill convention: a scanline or column `n` is covered when its center `n + 0.5`
//! lies in `[start, end)`, giving first index `ceil(start - 0.5)` and an exclusive
//! last index `ceil(end - 0.5)`. Two triangles sharing an edge never both cover
//! a pixel on it.

use std::ops::{Add, Mul, Sub};
use super::buffer::PixelBuffer;
use super::pipeline::ScreenVertex;
use super::types::{Color, Texture};

/// What a triangle is painted with
#[derive(Debug, Clone, Copy)]
pub struct Surface<'a> {
    pub texture: &'a Texture,
    pub tint: Color,
}

impl<'a> Surface<'a> {
    pub fn new(texture: &'a Texture, tint: Color) -> Self {
        Self { texture, tint }
    }

    #[inline]
    fn shade(&self, at: Varyings) -> Color {
        self.texture.sample(at.u, at.v).modulate(self.tint).lit(at.light)
    }
}

/// Attributes interpolated across a triangle
#[derive(Debug, Clone, Copy, Default)]
struct Varyings {
    u: f32,
    v: f32,
    depth: f32,
    light: f32,
}

impl From<ScreenVertex> for Varyings {
    fn from(sv: ScreenVertex) -> Self {
        Self { u: sv.uv.x, v: sv.uv.y, depth: sv.depth, light: sv.light }
    }
}

impl Add for Varyings {
    type Output = Varyings;
    fn add(self, o: Varyings) -> Varyings {
        Varyings { u: self.u + o.u, v: self.v + o.v, depth: self.depth + o.depth, light: self.light + o.light }
    }
}

impl Sub for Varyings {
    type Output = Varyings;
    fn sub(self, o: Varyings) -> Varyings {
        Varyings { u: self.u - o.u, v: self.v - o.v, depth: self.depth - o.depth, light: self.light - o.light }
    }
}

impl Mul<f32> for Varyings {
    type Output = Varyings;
    fn mul(self, s: f32) -> Varyings {
        Varyings { u: self.u * s, v: self.v * s, depth: self.depth * s, light: self.light * s }
    }
}

/// First pixel index whose center is at or past `v`
#[inline]
fn first_covered(v: f32) -> i32 {
    (v - 0.5).ceil() as i32
}

/// State of one non-horizontal edge, walked from its lower to its upper vertex
#[derive(Debug, Clone, Copy)]
struct Edge {
    x: f32,
    dxdy: f32,
    attrs: Varyings,
    step: Varyings,
}

impl Edge {
    /// Edge positioned on the center of scanline `y`. Requires `to.y > from.y`.
    fn at_scanline(from: ScreenVertex, to: ScreenVertex, y: i32) -> Self {
        let dy = to.pos.y - from.pos.y;
        let dxdy = (to.pos.x - from.pos.x) / dy;
        let step = (Varyings::from(to) - Varyings::from(from)) * (1.0 / dy);
        let prestep = y as f32 + 0.5 - from.pos.y;
        Self {
            x: from.pos.x + dxdy * prestep,
            dxdy,
            attrs: Varyings::from(from) + step * prestep,
            step,
        }
    }

    #[inline]
    fn next(self) -> Self {
        Self {
            x: self.x + self.dxdy,
            attrs: self.attrs + self.step,
            ..self
        }
    }
}

/// Sort three vertices by ascending y with three compare-swaps
pub fn sort_by_y(a: ScreenVertex, b: ScreenVertex, c: ScreenVertex) -> [ScreenVertex; 3] {
    let (mut min, mut mid, mut max) = (a, b, c);
    if max.pos.y < mid.pos.y {
        std::mem::swap(&mut max, &mut mid);
    }
    if mid.pos.y < min.pos.y {
        std::mem::swap(&mut mid, &mut min);
    }
    if max.pos.y < mid.pos.y {
        std::mem::swap(&mut max, &mut mid);
    }
    [min, mid, max]
}

fn order_by_x(a: ScreenVertex, b: ScreenVertex) -> (ScreenVertex, ScreenVertex) {
    if b.pos.x < a.pos.x { (b, a) } else { (a, b) }
}

/// Rasterize a screen-space triangle. Returns the number of pixels written.
pub fn draw_triangle(
    fb: &mut PixelBuffer,
    surface: &Surface,
    a: ScreenVertex,
    b: ScreenVertex,
    c: ScreenVertex,
) -> usize {
    let [min, mid, max] = sort_by_y(a, b, c);

    if min.pos.y == mid.pos.y {
        let (left, right) = order_by_x(min, mid);
        fill_flat_bottom(fb, surface, left, right, max)
    } else if max.pos.y == mid.pos.y {
        let (left, right) = order_by_x(mid, max);
        fill_flat_top(fb, surface, left, right, min)
    } else {
        let alpha = (mid.pos.y - min.pos.y) / (max.pos.y - min.pos.y);
        let mut split = min.lerp(max, alpha);
        split.pos.y = mid.pos.y;

        let (left, right) = order_by_x(split, mid);
        fill_flat_bottom(fb, surface, left, right, max) + fill_flat_top(fb, surface, left, right, min)
    }
}

/// Horizontal edge at the bottom, apex above
fn fill_flat_bottom(
    fb: &mut PixelBuffer,
    surface: &Surface,
    left: ScreenVertex,
    right: ScreenVertex,
    top: ScreenVertex,
) -> usize {
    fill_between(fb, surface, (left, top), (right, top))
}

/// Horizontal edge at the top, apex below
fn fill_flat_top(
    fb: &mut PixelBuffer,
    surface: &Surface,
    left: ScreenVertex,
    right: ScreenVertex,
    bottom: ScreenVertex,
) -> usize {
    fill_between(fb, surface, (bottom, left), (bottom, right))
}

/// Fill the scanlines between two edges spanning the same y range
fn fill_between(
    fb: &mut PixelBuffer,
    surface: &Surface,
    left: (ScreenVertex, ScreenVertex),
    right: (ScreenVertex, ScreenVertex),
) -> usize {
    let y0 = left.0.pos.y;
    let y1 = left.1.pos.y;
    // zero height (or NaN) covers nothing
    if !(y1 - y0 > 0.0) || !(right.1.pos.y - right.0.pos.y > 0.0) {
        return 0;
    }

    let y_start = first_covered(y0).max(0);
    let y_end = first_covered(y1).min(fb.height() as i32);

    let mut l = Edge::at_scanline(left.0, left.1, y_start);
    let mut r = Edge::at_scanline(right.0, right.1, y_start);
    let mut written = 0;

    for y in y_start..y_end {
        written += fill_span(fb, surface, y, &l, &r);
        l = l.next();
        r = r.next();
    }

    written
}

fn fill_span(fb: &mut PixelBuffer, surface: &Surface, y: i32, l: &Edge, r: &Edge) -> usize {
    let span = r.x - l.x;
    if !(span > 0.0) {
        return 0;
    }

    let x_start = first_covered(l.x).max(0);
    let x_end = first_covered(r.x).min(fb.width() as i32);

    let step = (r.attrs - l.attrs) * (1.0 / span);
    let mut at = l.attrs + step * (x_start as f32 + 0.5 - l.x);
    let mut written = 0;

    for x in x_start..x_end {
        if fb.write_pixel(x, y, surface.shade(at), at.depth) {
            written += 1;
        }
        at = at + step;
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Vec2;

    fn sv(x: f32, y: f32, depth: f32) -> ScreenVertex {
        ScreenVertex::new(Vec2::new(x, y), Vec2::new(0.5, 0.5), depth, 1.0)
    }

    fn covered(fb: &PixelBuffer, background: Color) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.pixel(x, y) != Some(background) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn fresh(w: usize, h: usize) -> PixelBuffer {
        let mut fb = PixelBuffer::new(w, h);
        fb.clear(Color::BLACK);
        fb
    }

    #[test]
    fn test_sort_by_y_all_orders() {
        let a = sv(0.0, 1.0, 0.0);
        let b = sv(0.0, 2.0, 0.0);
        let c = sv(0.0, 3.0, 0.0);
        for [p, q, r] in [[a, b, c], [a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
            let [min, mid, max] = sort_by_y(p, q, r);
            assert_eq!((min.pos.y, mid.pos.y, max.pos.y), (1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_horizontal_line_writes_nothing() {
        let tex = Texture::new(1, 1);
        let surface = Surface::new(&tex, Color::WHITE);
        let mut fb = fresh(16, 16);
        let n = draw_triangle(&mut fb, &surface, sv(1.0, 4.5, 0.0), sv(9.0, 4.5, 0.0), sv(14.0, 4.5, 0.0));
        assert_eq!(n, 0);
        assert!(covered(&fb, Color::BLACK).is_empty());
    }

    #[test]
    fn test_collapsed_triangle_writes_nothing() {
        let tex = Texture::new(1, 1);
        let surface = Surface::new(&tex, Color::WHITE);
        let mut fb = fresh(16, 16);
        // all on one vertical line: every span has zero width
        let n = draw_triangle(&mut fb, &surface, sv(4.0, 1.0, 0.0), sv(4.0, 7.0, 0.0), sv(4.0, 12.0, 0.0));
        assert_eq!(n, 0);
        let n = draw_triangle(&mut fb, &surface, sv(4.0, 4.0, 0.0), sv(4.0, 4.0, 0.0), sv(4.0, 4.0, 0.0));
        assert_eq!(n, 0);
    }

    #[test]
    fn test_flat_bottom_row_counts() {
        let tex = Texture::new(1, 1);
        let surface = Surface::new(&tex, Color::WHITE);
        let mut fb = fresh(8, 8);
        // right triangle covering the lower-right half of an 8x8 square
        let n = draw_triangle(&mut fb, &surface, sv(0.0, 0.0, 0.0), sv(8.0, 0.0, 0.0), sv(8.0, 8.0, 0.0));
        assert_eq!(n, 8 + 7 + 6 + 5 + 4 + 3 + 2 + 1);
        for y in 0..8 {
            for x in 0..8 {
                let lit = fb.pixel(x, y) == Some(Color::WHITE);
                assert_eq!(lit, x >= y, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_shared_diagonal_is_covered_exactly_once() {
        let tex = Texture::new(1, 1);
        let surface = Surface::new(&tex, Color::WHITE);
        let mut lower = fresh(8, 8);
        let mut upper = fresh(8, 8);
        // diagonal passes through every pixel center (k + 0.5, k + 0.5)
        draw_triangle(&mut lower, &surface, sv(0.0, 0.0, 0.0), sv(8.0, 0.0, 0.0), sv(8.0, 8.0, 0.0));
        draw_triangle(&mut upper, &surface, sv(0.0, 0.0, 0.0), sv(8.0, 8.0, 0.0), sv(0.0, 8.0, 0.0));

        for y in 0..8 {
            for x in 0..8 {
                let a = lower.pixel(x, y) == Some(Color::WHITE);
                let b = upper.pixel(x, y) == Some(Color::WHITE);
                assert!(a ^ b, "pixel ({x}, {y}) lower={a} upper={b}");
            }
        }
    }

    #[test]
    fn test_general_split_matches_center_containment() {
        let tex = Texture::new(1, 1);
        let surface = Surface::new(&tex, Color::WHITE);
        let mut fb = fresh(32, 32);
        let (a, b, c) = (sv(3.37, 2.11, 0.0), sv(27.73, 9.29, 0.0), sv(11.41, 25.63, 0.0));
        let n = draw_triangle(&mut fb, &surface, a, b, c);

        let edge = |p: Vec2, q: Vec2, x: f32, y: f32| (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x);
        let mut expected = 0;
        for y in 0..32 {
            for x in 0..32 {
                let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
                let inside = edge(a.pos, b.pos, cx, cy) > 0.0
                    && edge(b.pos, c.pos, cx, cy) > 0.0
                    && edge(c.pos, a.pos, cx, cy) > 0.0;
                if inside {
                    expected += 1;
                }
                assert_eq!(fb.pixel(x, y) == Some(Color::WHITE), inside, "pixel ({x}, {y})");
            }
        }
        assert_eq!(n, expected);
    }

    #[test]
    fn test_depth_interpolates_across_triangle() {
        let tex = Texture::new(1, 1);
        let surface = Surface::new(&tex, Color::WHITE);
        let mut fb = fresh(8, 8);
        draw_triangle(&mut fb, &surface, sv(0.0, 0.0, 0.0), sv(8.0, 0.0, 1.0), sv(0.0, 8.0, 0.0));
        // depth grows with x only
        let d = fb.depth(2, 1).unwrap_or(f32::NAN);
        assert!((d - 2.5 / 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_offscreen_and_huge_triangles_are_clamped() {
        let tex = Texture::new(1, 1);
        let surface = Surface::new(&tex, Color::WHITE);
        let mut fb = fresh(4, 4);
        let n = draw_triangle(&mut fb, &surface, sv(-1.0e9, -1.0e9, 0.0), sv(1.0e9, -1.0e9, 0.0), sv(0.0, 1.0e9, 0.0));
        assert_eq!(n, 16);

        let mut fb = fresh(4, 4);
        let n = draw_triangle(&mut fb, &surface, sv(f32::NAN, 0.0, 0.0), sv(3.0, f32::INFINITY, 0.0), sv(0.0, 2.0, 0.0));
        assert!(n <= 16);
    }

    #[test]
    fn test_texture_and_light_applied() {
        let mut tex = Texture::new(2, 1);
        tex.pixels = vec![Color::new(100, 100, 100), Color::new(200, 200, 200)];
        let surface = Surface::new(&tex, Color::WHITE);
        let mut fb = fresh(4, 4);
        let mut v = [sv(0.0, 0.0, 0.0), sv(4.0, 0.0, 0.0), sv(0.0, 4.0, 0.0)];
        for p in &mut v {
            p.uv = Vec2::new(0.9, 0.5);
            p.light = 0.5;
        }
        draw_triangle(&mut fb, &surface, v[0], v[1], v[2]);
        assert_eq!(fb.pixel(0, 0), Some(Color::new(100, 100, 100)));
    }

    #[test]
    fn test_empty_texture_fills_black() {
        let tex = Texture::new(0, 0);
        let surface = Surface::new(&tex, Color::WHITE);
        let mut fb = PixelBuffer::new(8, 8);
        fb.clear(Color::BLUE);
        let n = draw_triangle(&mut fb, &surface, sv(0.0, 0.0, 0.0), sv(8.0, 0.0, 0.0), sv(8.0, 8.0, 0.0));
        assert_eq!(n, 36);
        assert_eq!(fb.pixel(7, 0), Some(Color::BLACK));
    }
}
