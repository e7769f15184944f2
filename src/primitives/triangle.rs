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

use crate::draw_context::{DrawContext, DrawModeParams, Drawable, DrawableBuilder};

use super::color;

#[rustfmt::skip]
pub const TRIANGLE_POSITIONS: &[[f32; 4]] = &[
    [-0.8, -0.8, 0.0, 1.0],
    [ 0.0,  0.8, 0.0, 1.0],
    [ 0.8, -0.8, 0.0, 1.0],
];

pub const TRIANGLE_COLORS: &[[f32; 4]] = &[color::COLOR_RED, color::COLOR_GREEN, color::COLOR_BLUE];

pub const TRIANGLE_VERTEX_COUNT: u32 = super::count_u32(TRIANGLE_POSITIONS.len());

/// Positions and colors live in two distinct vertex buffers.
///
/// The vertices are listed clockwise, so culling is disabled.
pub fn create_triangle(
    context: &DrawContext,
    shader_module: &wgpu::ShaderModule,
) -> anyhow::Result<Drawable> {
    let mut drawable_builder = DrawableBuilder::new(
        context,
        shader_module,
        shader_module,
        DrawModeParams::Direct {
            vertex_count: TRIANGLE_VERTEX_COUNT,
        },
    );
    drawable_builder
        .set_cull_mode(None)
        .add_attribute(0, TRIANGLE_POSITIONS, wgpu::VertexFormat::Float32x4)?
        .add_attribute(1, TRIANGLE_COLORS, wgpu::VertexFormat::Float32x4)?;
    drawable_builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_color_per_vertex() {
        assert_eq!(TRIANGLE_VERTEX_COUNT, 3);
        assert_eq!(TRIANGLE_COLORS.len(), TRIANGLE_POSITIONS.len());
        assert!(TRIANGLE_POSITIONS.iter().all(|p| p[3] == 1.0));
    }
}
