/*
MIT License

Copyright (c) 2021, 2022, 2024, 2025 Vincent Hiribarren

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Four arrow heads fanning out of a white center, one per side of the
//! viewport. Every vertex is declared once and triangles are indexed.

use crate::draw_context::{DrawContext, DrawModeParams, Drawable, DrawableBuilder, IndexData};

use super::Vertex;
use super::color::{COLOR_BLUE, COLOR_CYAN, COLOR_GREEN, COLOR_RED, COLOR_WHITE};

#[rustfmt::skip]
pub const STAR_VERTICES: &[Vertex] = &[
    Vertex::new([ 0.0,  0.0, 0.0, 1.0], COLOR_WHITE),
    // Top
    Vertex::new([-0.2,  0.8, 0.0, 1.0], COLOR_GREEN),
    Vertex::new([ 0.2,  0.8, 0.0, 1.0], COLOR_BLUE),
    Vertex::new([ 0.0,  0.8, 0.0, 1.0], COLOR_CYAN),
    Vertex::new([ 0.0,  1.0, 0.0, 1.0], COLOR_RED),
    // Bottom
    Vertex::new([-0.2, -0.8, 0.0, 1.0], COLOR_BLUE),
    Vertex::new([ 0.2, -0.8, 0.0, 1.0], COLOR_GREEN),
    Vertex::new([ 0.0, -0.8, 0.0, 1.0], COLOR_CYAN),
    Vertex::new([ 0.0, -1.0, 0.0, 1.0], COLOR_RED),
    // Left
    Vertex::new([-0.8, -0.2, 0.0, 1.0], COLOR_GREEN),
    Vertex::new([-0.8,  0.2, 0.0, 1.0], COLOR_BLUE),
    Vertex::new([-0.8,  0.0, 0.0, 1.0], COLOR_CYAN),
    Vertex::new([-1.0,  0.0, 0.0, 1.0], COLOR_RED),
    // Right
    Vertex::new([ 0.8, -0.2, 0.0, 1.0], COLOR_BLUE),
    Vertex::new([ 0.8,  0.2, 0.0, 1.0], COLOR_GREEN),
    Vertex::new([ 0.8,  0.0, 0.0, 1.0], COLOR_CYAN),
    Vertex::new([ 1.0,  0.0, 0.0, 1.0], COLOR_RED),
];

#[rustfmt::skip]
pub const STAR_INDICES: &[u16] = &[
    // Top
    0, 1, 3,
    0, 3, 2,
    3, 1, 4,
    3, 4, 2,
    // Bottom
    0, 5, 7,
    0, 7, 6,
    7, 5, 8,
    7, 8, 6,
    // Left
    0, 9, 11,
    0, 11, 10,
    11, 9, 12,
    11, 12, 10,
    // Right
    0, 13, 15,
    0, 15, 14,
    15, 13, 16,
    15, 16, 14,
];

/// Triangles of the star mix both windings, so culling is disabled.
pub fn create_star(
    context: &DrawContext,
    shader_module: &wgpu::ShaderModule,
) -> anyhow::Result<Drawable> {
    let mut drawable_builder = DrawableBuilder::new(
        context,
        shader_module,
        shader_module,
        DrawModeParams::Indexed {
            index_data: IndexData::U16(STAR_INDICES),
        },
    );
    drawable_builder
        .set_cull_mode(None)
        .add_vertex_buffer(STAR_VERTICES, Vertex::STRIDE, &Vertex::ATTRIBUTES)?;
    drawable_builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixteen_triangles_over_seventeen_vertices() {
        assert_eq!(STAR_VERTICES.len(), 17);
        assert_eq!(STAR_INDICES.len(), 48);
        assert_eq!(IndexData::U16(STAR_INDICES).size(), 48);
    }

    #[test]
    fn every_vertex_is_referenced() {
        let max = usize::from(*STAR_INDICES.iter().max().unwrap());
        assert_eq!(max, STAR_VERTICES.len() - 1);
        for idx in 0..STAR_VERTICES.len() {
            assert!(
                STAR_INDICES.iter().any(|&i| usize::from(i) == idx),
                "vertex {idx} unused"
            );
        }
    }

    #[test]
    fn every_triangle_touches_the_center_or_an_arm_middle() {
        let hubs = [0u16, 3, 7, 11, 15];
        for triangle in STAR_INDICES.chunks(3) {
            assert!(triangle.iter().any(|i| hubs.contains(i)), "{triangle:?}");
        }
    }
}
