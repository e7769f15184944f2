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

use gfx_chapters::primitives::point::create_point;
use gfx_chapters::{
    Drawable, LaunchConfig, LaunchContext, PASSTHROUGH_SHADER, RenderContext, RenderLoopHandler,
    launch_app,
};

const WINDOW_TITLE: &str = "Chapter 1";

pub struct MainScenario {
    point: Drawable,
}

impl MainScenario {
    pub fn new(LaunchContext { draw_context, .. }: LaunchContext) -> anyhow::Result<Self> {
        let shader_module = draw_context.create_shader_module(PASSTHROUGH_SHADER)?;
        let point = create_point(draw_context, &shader_module)?;
        Ok(Self { point })
    }
}

impl RenderLoopHandler for MainScenario {
    fn on_render(
        &mut self,
        _render_context: &RenderContext,
        render_pass: &mut wgpu::RenderPass<'static>,
    ) {
        self.point.render(render_pass);
    }
}

fn main() -> anyhow::Result<()> {
    launch_app(LaunchConfig::new(WINDOW_TITLE), |context| {
        Ok(Box::new(MainScenario::new(context)?))
    })
}
