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

use crate::draw_context::{DrawContext, DrawModeParams, Drawable, DrawableBuilder, IndexData};

use super::color::{COLOR_BLUE, COLOR_GREEN, COLOR_MAGENTA, COLOR_RED, COLOR_WHITE, COLOR_YELLOW};
use super::{TransformUniforms, Vertex};

#[rustfmt::skip]
pub const CUBE_VERTICES: &[Vertex] = &[
    Vertex::new([-0.5, -0.5,  0.5, 1.0], COLOR_BLUE),
    Vertex::new([-0.5,  0.5,  0.5, 1.0], COLOR_RED),
    Vertex::new([ 0.5,  0.5,  0.5, 1.0], COLOR_GREEN),
    Vertex::new([ 0.5, -0.5,  0.5, 1.0], COLOR_YELLOW),
    Vertex::new([-0.5, -0.5, -0.5, 1.0], COLOR_WHITE),
    Vertex::new([-0.5,  0.5, -0.5, 1.0], COLOR_RED),
    Vertex::new([ 0.5,  0.5, -0.5, 1.0], COLOR_MAGENTA),
    Vertex::new([ 0.5, -0.5, -0.5, 1.0], COLOR_BLUE),
];

/// Two counter-clockwise triangles per face.
#[rustfmt::skip]
pub const CUBE_INDICES: &[u32] = &[
    0, 2, 1,  0, 3, 2,
    4, 3, 0,  4, 7, 3,
    4, 1, 5,  4, 0, 1,
    3, 6, 2,  3, 7, 6,
    1, 6, 5,  1, 2, 6,
    7, 5, 6,  7, 4, 5,
];

pub fn create_cube(
    context: &DrawContext,
    shader_module: &wgpu::ShaderModule,
    uniforms: &TransformUniforms,
) -> anyhow::Result<Drawable> {
    let mut drawable_builder = DrawableBuilder::new(
        context,
        shader_module,
        shader_module,
        DrawModeParams::Indexed {
            index_data: IndexData::U32(CUBE_INDICES),
        },
    );
    drawable_builder
        .set_cull_mode(Some(wgpu::Face::Back))
        .set_depth_compare(wgpu::CompareFunction::Less)
        .add_vertex_buffer(CUBE_VERTICES, Vertex::STRIDE, &Vertex::ATTRIBUTES)?;
    uniforms.bind(&mut drawable_builder)?;
    drawable_builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn position(idx: u32) -> Vector3<f32> {
        let [x, y, z, _] = CUBE_VERTICES[idx as usize].position;
        Vector3::new(x, y, z)
    }

    #[test]
    fn twelve_triangles() {
        assert_eq!(CUBE_VERTICES.len(), 8);
        assert_eq!(CUBE_INDICES.len(), 36);
        assert!(CUBE_INDICES.iter().all(|&i| (i as usize) < CUBE_VERTICES.len()));
    }

    #[test]
    fn triangles_face_outwards() {
        for triangle in CUBE_INDICES.chunks(3) {
            let (a, b, c) = (
                position(triangle[0]),
                position(triangle[1]),
                position(triangle[2]),
            );
            let normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(
                normal.dot(center) > 0.0,
                "triangle {triangle:?} is wound clockwise from outside"
            );
        }
    }
}
