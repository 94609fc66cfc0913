use bytemuck::{Pod, Zeroable};
use cubeshade_common::Rgba;

pub const FACE_COUNT: usize = 6;
pub const VERTICES_PER_FACE: usize = 4;
pub const VERTEX_COUNT: usize = FACE_COUNT * VERTICES_PER_FACE;
pub const INDEX_COUNT: usize = FACE_COUNT * 6;
/// Floats in the color buffer: one RGBA per vertex.
pub const COLOR_BUFFER_LEN: usize = VERTEX_COUNT * 4;

const FACE_COLOR_FLOATS: usize = VERTICES_PER_FACE * 4;

/// Geometry vertex: position and flat face normal.
///
/// Color lives in a separate buffer so it can be rewritten without touching
/// the static geometry.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

const fn v(position: [f32; 3], normal: [f32; 3]) -> Vertex {
    Vertex { position, normal }
}

const P: f32 = 0.5;

/// Unit cube, 4 vertices per face so every face carries its own normal.
/// Face order: +Y, +Z, -X, -Y, -Z, +X.
#[rustfmt::skip]
const VERTICES: [Vertex; VERTEX_COUNT] = [
    // +Y
    v([-P,  P,  P], [ 0.0,  1.0,  0.0]),
    v([ P,  P,  P], [ 0.0,  1.0,  0.0]),
    v([ P,  P, -P], [ 0.0,  1.0,  0.0]),
    v([-P,  P, -P], [ 0.0,  1.0,  0.0]),
    // +Z
    v([-P,  P,  P], [ 0.0,  0.0,  1.0]),
    v([-P, -P,  P], [ 0.0,  0.0,  1.0]),
    v([ P, -P,  P], [ 0.0,  0.0,  1.0]),
    v([ P,  P,  P], [ 0.0,  0.0,  1.0]),
    // -X
    v([-P,  P,  P], [-1.0,  0.0,  0.0]),
    v([-P,  P, -P], [-1.0,  0.0,  0.0]),
    v([-P, -P, -P], [-1.0,  0.0,  0.0]),
    v([-P, -P,  P], [-1.0,  0.0,  0.0]),
    // -Y
    v([-P, -P,  P], [ 0.0, -1.0,  0.0]),
    v([ P, -P,  P], [ 0.0, -1.0,  0.0]),
    v([ P, -P, -P], [ 0.0, -1.0,  0.0]),
    v([-P, -P, -P], [ 0.0, -1.0,  0.0]),
    // -Z
    v([ P,  P, -P], [ 0.0,  0.0, -1.0]),
    v([-P,  P, -P], [ 0.0,  0.0, -1.0]),
    v([-P, -P, -P], [ 0.0,  0.0, -1.0]),
    v([ P, -P, -P], [ 0.0,  0.0, -1.0]),
    // +X
    v([ P,  P,  P], [ 1.0,  0.0,  0.0]),
    v([ P,  P, -P], [ 1.0,  0.0,  0.0]),
    v([ P, -P, -P], [ 1.0,  0.0,  0.0]),
    v([ P, -P,  P], [ 1.0,  0.0,  0.0]),
];

/// Two counter-clockwise triangles per face, seen from outside.
#[rustfmt::skip]
const INDICES: [u16; INDEX_COUNT] = [
    0, 1, 2,    0, 2, 3,     // +Y
    4, 5, 6,    4, 6, 7,     // +Z
    8, 9, 10,   10, 11, 8,   // -X
    12, 14, 13, 12, 15, 14,  // -Y
    17, 16, 19, 17, 19, 18,  // -Z
    20, 22, 21, 20, 23, 22,  // +X
];

/// Host-side state of one unit cube: fixed geometry plus a mutable
/// per-vertex color buffer.
///
/// The device copy of the color buffer is always refreshed from
/// [`CubeMesh::colors`] in full, never patched.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeMesh {
    colors: [f32; COLOR_BUFFER_LEN],
}

impl CubeMesh {
    /// Build a cube whose six faces take the given colors, in face order.
    pub fn with_face_colors(faces: [Rgba; FACE_COUNT]) -> Self {
        let mut colors = [0.0; COLOR_BUFFER_LEN];
        for (face, color) in faces.iter().enumerate() {
            write_face(&mut colors, face, *color);
        }
        Self { colors }
    }

    /// Build a cube painted a single color on every face.
    pub fn uniform(color: Rgba) -> Self {
        Self::with_face_colors([color; FACE_COUNT])
    }

    pub fn vertices(&self) -> &'static [Vertex] {
        &VERTICES
    }

    pub fn indices(&self) -> &'static [u16] {
        &INDICES
    }

    pub fn index_count(&self) -> u32 {
        INDICES.len() as u32
    }

    /// Flat RGBA color buffer, 4 floats per vertex.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Color of a face, read from its first vertex.
    pub fn face_color(&self, face: usize) -> Option<Rgba> {
        if face >= FACE_COUNT {
            return None;
        }
        let base = face * FACE_COLOR_FLOATS;
        let c = &self.colors[base..base + 4];
        Some(Rgba::new(c[0], c[1], c[2], c[3]))
    }

    /// Overwrite the four color entries of one face.
    ///
    /// Out-of-range faces are ignored. Returns `true` when the buffer was
    /// written and needs to be re-uploaded.
    pub fn update_face_color(&mut self, face: usize, color: Rgba) -> bool {
        if face >= FACE_COUNT {
            tracing::debug!(face, "ignoring recolor of nonexistent face");
            return false;
        }
        write_face(&mut self.colors, face, color);
        tracing::debug!(face, ?color, "face recolored");
        true
    }
}

fn write_face(colors: &mut [f32; COLOR_BUFFER_LEN], face: usize, color: Rgba) {
    let rgba = color.to_array();
    let base = face * FACE_COLOR_FLOATS;
    for chunk in colors[base..base + FACE_COLOR_FLOATS].chunks_exact_mut(4) {
        chunk.copy_from_slice(&rgba);
    }
}
