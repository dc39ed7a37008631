//! Lyon-based tessellation of the sky drawing primitives.
//!
//! Shapes are tessellated on the CPU into a flat triangle list (6 floats per
//! vertex) that the host uploads as-is. A translation can be set once per
//! frame and is applied to every vertex, so the last snapshot can be drawn
//! at the locally predicted pan offset.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use crate::bridge::protocol::VERTEX_FLOATS;

/// Arc length between polyline points when approximating dashed arcs.
const ARC_STEP_PX: f32 = 4.0;
const TOLERANCE: f32 = 0.25;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Straight (non-premultiplied) RGBA, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

/// Builds colored, translated vertices for both tessellators.
struct Painter {
    color: VectorColor,
    offset: Vec2,
}

impl Painter {
    fn vertex(&self, x: f32, y: f32) -> VectorVertex {
        VectorVertex {
            x: x + self.offset.x,
            y: y + self.offset.y,
            r: self.color.r,
            g: self.color.g,
            b: self.color.b,
            a: self.color.a,
        }
    }
}

impl FillVertexConstructor<VectorVertex> for Painter {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        let p = vertex.position();
        self.vertex(p.x, p.y)
    }
}

impl StrokeVertexConstructor<VectorVertex> for Painter {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        let p = vertex.position();
        self.vertex(p.x, p.y)
    }
}

/// Tessellators plus the frame's output buffer.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    offset: Vec2,
    /// Visible area in output coordinates, `(min, max)`.
    clip: Option<(Vec2, Vec2)>,
}

impl VectorState {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(8192 * VERTEX_FLOATS),
            offset: Vec2::ZERO,
            clip: None,
        }
    }

    /// Limit dashed circles to the output rectangle `min..max`.
    pub fn set_clip(&mut self, min: Vec2, max: Vec2) {
        self.clip = Some((min, max));
    }

    /// Start a new frame drawn with `offset` added to every vertex.
    pub fn begin_frame(&mut self, offset: Vec2) {
        self.buffer.clear();
        self.offset = offset;
    }

    /// Change the translation for subsequent shapes.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VERTEX_FLOATS
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Raw pointer to the flat float buffer (read by the host).
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    fn painter(&self, color: VectorColor) -> Painter {
        Painter { color, offset: self.offset }
    }

    /// Expand indexed geometry into the flat triangle list.
    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn fill_path(&mut self, path: &Path, color: VectorColor) {
        let painter = self.painter(color);
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, painter),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => log::warn!("fill tessellation failed: {e:?}"),
        }
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: VectorColor) {
        let painter = self.painter(color);
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, painter),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => log::warn!("stroke tessellation failed: {e:?}"),
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        self.fill_path(&builder.build(), color);
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: VectorColor) {
        if radius <= 0.0 || width <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        self.stroke_path(&builder.build(), width, color);
    }

    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if points.len() < 2 || width <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(false);
        self.stroke_path(&builder.build(), width, color);
    }

    pub fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: VectorColor) {
        self.stroke_polyline(&[from, to], width, color);
    }

    /// Segment drawn as `dash` px on, `gap` px off, starting with a dash.
    pub fn dashed_segment(
        &mut self,
        from: Vec2,
        to: Vec2,
        (dash, gap): (f32, f32),
        width: f32,
        color: VectorColor,
    ) {
        let length = from.distance(to);
        if length <= 0.0 || dash <= 0.0 {
            return;
        }
        let dir = (to - from) / length;
        let mut s = 0.0;
        while s < length {
            let end = (s + dash).min(length);
            self.stroke_segment(from + dir * s, from + dir * end, width, color);
            s += dash + gap.max(0.0);
        }
    }

    /// Circle drawn as `dash` px on, `gap` px off along its circumference.
    ///
    /// With a clip rectangle set, only the dashes that can reach it are
    /// tessellated, so the work stays bounded by the visible arc.
    pub fn dashed_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        (dash, gap): (f32, f32),
        width: f32,
        color: VectorColor,
    ) {
        if radius <= 0.0 || dash <= 0.0 {
            return;
        }
        let circumference = std::f32::consts::TAU * radius;
        let period = dash + gap.max(0.0);
        let Some((lo, hi)) = self.visible_arc(center, radius, width) else {
            return;
        };

        // A range running past one turn continues from zero.
        let ranges = if hi > circumference {
            [(lo, circumference), (0.0, hi - circumference)]
        } else {
            [(lo, hi), (0.0, 0.0)]
        };
        let mut arc = Vec::new();
        for (lo, hi) in ranges {
            let mut s = (lo / period).floor() * period;
            while s < hi.min(circumference) {
                let end = (s + dash).min(circumference);
                let pieces = ((end - s) / ARC_STEP_PX).ceil().max(1.0) as usize;
                arc.clear();
                arc.extend((0..=pieces).map(|i| {
                    let theta = (s + (end - s) * i as f32 / pieces as f32) / radius;
                    center + Vec2::new(theta.cos(), theta.sin()) * radius
                }));
                self.stroke_polyline(&arc, width, color);
                s += period;
            }
        }
    }

    /// Arc-length range `lo..hi` of a circle that can touch the clip
    /// rectangle. `hi` may exceed one turn. `None` when nothing is visible.
    fn visible_arc(&self, center: Vec2, radius: f32, width: f32) -> Option<(f32, f32)> {
        let circumference = std::f32::consts::TAU * radius;
        let Some((min, max)) = self.clip else {
            return Some((0.0, circumference));
        };
        // Clip rectangle in shape coordinates, grown by the stroke.
        let pad = Vec2::splat(width + ARC_STEP_PX);
        let min = min - self.offset - pad;
        let max = max - self.offset + pad;

        let nearest = center.clamp(min, max).distance(center);
        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        let farthest = corners.iter().map(|c| c.distance(center)).fold(0.0, f32::max);
        if nearest > radius || farthest < radius {
            return None;
        }
        if nearest == 0.0 {
            return Some((0.0, circumference));
        }

        // Center outside the rectangle: it subtends less than half a turn.
        let axis = ((min + max) * 0.5 - center).normalize_or_zero();
        let (lo, hi) = corners.iter().fold((f32::MAX, f32::MIN), |(lo, hi), c| {
            let a = axis.angle_to(*c - center);
            (lo.min(a), hi.max(a))
        });
        let base = axis.y.atan2(axis.x);
        let start = ((base + lo) * radius).rem_euclid(circumference);
        Some((start, start + (hi - lo) * radius))
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices(state: &VectorState) -> impl Iterator<Item = &[f32]> {
        state.buffer().chunks(VERTEX_FLOATS)
    }

    #[test]
    fn vertex_layout_matches_wire() {
        assert_eq!(std::mem::size_of::<VectorVertex>(), VERTEX_FLOATS * 4);
    }

    #[test]
    fn fill_circle_stays_inside_radius() {
        let mut state = VectorState::new();
        state.fill_circle(Vec2::new(50.0, 50.0), 10.0, VectorColor::WHITE);
        assert!(state.vertex_count() >= 3);
        assert_eq!(state.vertex_count() % 3, 0);
        for v in vertices(&state) {
            assert!(Vec2::new(v[0], v[1]).distance(Vec2::new(50.0, 50.0)) <= 10.01);
        }
    }

    #[test]
    fn offset_translates_every_vertex() {
        let mut state = VectorState::new();
        state.begin_frame(Vec2::new(100.0, 0.0));
        state.fill_circle(Vec2::ZERO, 5.0, VectorColor::WHITE);
        assert!(vertices(&state).all(|v| v[0] >= 94.9 && v[0] <= 105.1));
    }

    #[test]
    fn color_is_written_per_vertex() {
        let mut state = VectorState::new();
        let color = VectorColor::new(0.1, 0.2, 0.3, 0.4);
        state.stroke_segment(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, color);
        assert!(state.vertex_count() > 0);
        assert!(vertices(&state).all(|v| v[2..] == [0.1, 0.2, 0.3, 0.4]));
    }

    #[test]
    fn dashed_circle_differs_from_solid() {
        let mut solid = VectorState::new();
        solid.stroke_circle(Vec2::ZERO, 100.0, 1.0, VectorColor::WHITE);
        let mut dashed = VectorState::new();
        dashed.dashed_circle(Vec2::ZERO, 100.0, (2.0, 4.0), 1.0, VectorColor::WHITE);
        assert!(dashed.vertex_count() > 0);
        assert!(dashed.buffer().len() != solid.buffer().len());
    }

    #[test]
    fn huge_dashed_ring_is_clipped_to_the_canvas() {
        let mut state = VectorState::new();
        state.set_clip(Vec2::ZERO, Vec2::new(600.0, 600.0));
        // Crosses the canvas as a nearly straight arc near y = 300.
        state.dashed_circle(Vec2::new(300.0, 100_300.0), 100_000.0, (2.0, 4.0), 1.0, VectorColor::WHITE);
        assert!(state.vertex_count() > 0);
        assert!(state.vertex_count() < 20_000, "{}", state.vertex_count());
        for v in vertices(&state) {
            assert!((-20.0..=620.0).contains(&v[0]), "{v:?}");
        }
    }

    #[test]
    fn clip_follows_the_offset() {
        let mut state = VectorState::new();
        state.set_clip(Vec2::ZERO, Vec2::new(600.0, 600.0));
        state.begin_frame(Vec2::new(0.0, 1_000.0));
        // Only its lowest arc reaches the canvas once shifted by the offset.
        state.dashed_circle(Vec2::new(300.0, -1_500.0), 1_000.0, (2.0, 4.0), 1.0, VectorColor::WHITE);
        assert!(state.vertex_count() > 0);
        assert!(vertices(&state).all(|v| v[1] > 0.0), "arc above the canvas was drawn");
    }

    #[test]
    fn rings_off_canvas_are_skipped() {
        let mut state = VectorState::new();
        state.set_clip(Vec2::ZERO, Vec2::new(600.0, 600.0));
        // Encloses the whole canvas.
        state.dashed_circle(Vec2::new(300.0, 300.0), 5_000.0, (2.0, 4.0), 1.0, VectorColor::WHITE);
        // Entirely beside it.
        state.dashed_circle(Vec2::new(2_000.0, 300.0), 100.0, (2.0, 4.0), 1.0, VectorColor::WHITE);
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn clipped_ring_around_the_canvas_center_is_complete() {
        let mut clipped = VectorState::new();
        clipped.set_clip(Vec2::ZERO, Vec2::new(600.0, 600.0));
        clipped.dashed_circle(Vec2::new(300.0, 300.0), 100.0, (2.0, 4.0), 1.0, VectorColor::WHITE);
        let mut full = VectorState::new();
        full.dashed_circle(Vec2::new(300.0, 300.0), 100.0, (2.0, 4.0), 1.0, VectorColor::WHITE);
        assert_eq!(clipped.buffer(), full.buffer());
    }

    #[test]
    fn degenerate_shapes_produce_nothing() {
        let mut state = VectorState::new();
        state.fill_circle(Vec2::ZERO, 0.0, VectorColor::WHITE);
        state.stroke_polyline(&[Vec2::ZERO], 1.0, VectorColor::WHITE);
        state.dashed_segment(Vec2::ONE, Vec2::ONE, (1.0, 3.0), 1.0, VectorColor::WHITE);
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn begin_frame_clears() {
        let mut state = VectorState::new();
        state.fill_circle(Vec2::ZERO, 5.0, VectorColor::WHITE);
        state.begin_frame(Vec2::ZERO);
        assert_eq!(state.vertex_count(), 0);
    }
}
