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

use cgmath::Deg;
use gfx_chapters::cameras::KeyboardCamera;
use gfx_chapters::config::shader_path;
use gfx_chapters::math::Mat4;
use gfx_chapters::primitives::TransformUniforms;
use gfx_chapters::primitives::cube::create_cube;
use gfx_chapters::{
    DrawContext, Drawable, ElementState, KeyCode, KeyEvent, LaunchConfig, LaunchContext,
    PhysicalKey, RenderContext, RenderLoopHandler, launch_app,
};
use log::info;
use std::time::Duration;

const WINDOW_TITLE: &str = "Chapter 4";
const FPS_REFRESH: Duration = Duration::from_secs(1);
const CUBE_SHADER: &str = "cube.wgsl";
const ROTATION_DEG_PER_S: f32 = 45.0;
const FOVY_DEG: f32 = 60.0;
const NEAR_PLANE: f32 = 1.0;
const FAR_PLANE: f32 = 100.0;

pub struct MainScenario {
    cube: Drawable,
    uniforms: TransformUniforms,
    camera: KeyboardCamera,
    cube_rotation: Deg<f32>,
    finished: bool,
}

impl MainScenario {
    pub fn new(LaunchContext { draw_context, .. }: LaunchContext) -> anyhow::Result<Self> {
        let shader_module = draw_context.load_shader_module(shader_path(CUBE_SHADER))?;
        let uniforms = TransformUniforms::new(draw_context);
        let cube = create_cube(draw_context, &shader_module, &uniforms)?;
        Ok(Self {
            cube,
            uniforms,
            camera: KeyboardCamera::default(),
            cube_rotation: Deg(0.0),
            finished: false,
        })
    }
}

impl RenderLoopHandler for MainScenario {
    fn on_keyboard_event(&mut self, event: &KeyEvent) {
        if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
            && event.state == ElementState::Pressed
        {
            info!("Escape pressed, closing");
            self.finished = true;
            return;
        }
        self.camera.keyboard_event_listener(event);
    }

    fn on_resize(&mut self, draw_context: &DrawContext) {
        let projection = Mat4::perspective(
            Deg(FOVY_DEG),
            draw_context.surface_ratio(),
            NEAR_PLANE,
            FAR_PLANE,
        );
        self.uniforms
            .projection
            .write_uniform(projection.to_wgpu_clip_space());
    }

    fn on_update(&mut self, render_context: &RenderContext) {
        let delta = render_context.time_info.processing_delta;
        self.camera.update(delta);
        self.cube_rotation += Deg(ROTATION_DEG_PER_S * delta.as_secs_f32());

        let mut model = Mat4::IDENTITY;
        model.rotate_y(self.cube_rotation);
        model.rotate_x(self.cube_rotation);
        self.uniforms.model.write_uniform(model);
        self.uniforms.view.write_uniform(self.camera.view_matrix());
    }

    fn on_render(
        &mut self,
        _render_context: &RenderContext,
        render_pass: &mut wgpu::RenderPass<'static>,
    ) {
        self.cube.render(render_pass);
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

fn main() -> anyhow::Result<()> {
    let config = LaunchConfig::new(WINDOW_TITLE).with_fps_interval(FPS_REFRESH);
    launch_app(config, |context| Ok(Box::new(MainScenario::new(context)?)))
}
