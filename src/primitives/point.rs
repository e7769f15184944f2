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

use super::{Vertex, color};

pub const POINT_VERTICES: &[Vertex] = &[Vertex::new([0.0, 0.0, 0.0, 1.0], color::COLOR_WHITE)];

/// A single pixel wide point in the middle of the viewport.
pub fn create_point(
    context: &DrawContext,
    shader_module: &wgpu::ShaderModule,
) -> anyhow::Result<Drawable> {
    let mut drawable_builder = DrawableBuilder::new(
        context,
        shader_module,
        shader_module,
        DrawModeParams::Direct {
            vertex_count: super::count_u32(POINT_VERTICES.len()),
        },
    );
    drawable_builder
        .set_topology(wgpu::PrimitiveTopology::PointList)
        .set_cull_mode(None)
        .add_vertex_buffer(POINT_VERTICES, Vertex::STRIDE, &Vertex::ATTRIBUTES)?;
    drawable_builder.build()
}
