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

pub mod color;
pub mod cube;
pub mod point;
pub mod star;
pub mod triangle;

use bytemuck::{Pod, Zeroable};

use crate::draw_context::{BindingSlot, DrawContext, DrawableBuilder, Uniform};
use crate::math::Mat4;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];
    #[allow(clippy::cast_possible_truncation)]
    pub const STRIDE: wgpu::BufferAddress = size_of::<Self>() as wgpu::BufferAddress;

    #[must_use]
    pub const fn new(position: [f32; 4], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn count_u32(len: usize) -> u32 {
    assert!(len <= u32::MAX as usize, "Value exceeds u32::MAX");
    len as u32
}

/// Matrices consumed by the vertex stage, bound to group 0 as
/// model (0), view (1) and projection (2).
pub struct TransformUniforms {
    pub model: Uniform<Mat4>,
    pub view: Uniform<Mat4>,
    pub projection: Uniform<Mat4>,
}

impl TransformUniforms {
    pub const BIND_GROUP: u32 = 0;

    pub fn new(context: &DrawContext) -> Self {
        Self {
            model: Uniform::new(context, Mat4::IDENTITY),
            view: Uniform::new(context, Mat4::IDENTITY),
            projection: Uniform::new(context, Mat4::IDENTITY),
        }
    }

    pub fn bind<'a>(&'a self, builder: &mut DrawableBuilder<'a>) -> anyhow::Result<()> {
        for (binding, resource) in [&self.model, &self.view, &self.projection]
            .into_iter()
            .enumerate()
        {
            builder.add_binding_slot(&BindingSlot {
                bind_group: Self::BIND_GROUP,
                binding: count_u32(binding),
                resource,
            })?;
        }
        Ok(())
    }
}
