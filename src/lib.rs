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

mod launcher;
mod window;

pub(crate) mod draw_context;
pub(crate) mod render_loop;

pub mod cameras;
pub mod config;
pub mod fps;
pub mod math;
pub mod primitives;

pub use config::{LaunchConfig, RenderSettings};
pub use draw_context::*;
pub use launcher::launch_app;
pub use render_loop::{LaunchContext, RenderContext, RenderLoopHandler, TimeInfo};

pub use wgpu;
pub use winit::event::{ElementState, KeyEvent};
pub use winit::keyboard::{KeyCode, PhysicalKey};

/// Shader shared by the chapters drawing untransformed colored vertices.
pub const PASSTHROUGH_SHADER: &str = include_str!("../shaders/passthrough.wgsl");
