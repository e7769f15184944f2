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

use std::sync::Arc;

use anyhow::Context;
use log::{debug, error, info};
use pollster::FutureExt;
use web_time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::LaunchConfig;
use crate::draw_context::{Dimensions, DrawContext};
use crate::fps::{FpsCounter, format_title};
use crate::render_loop::{
    LaunchContext, RenderLoopBuilder, RenderLoopHandler, TimeInfo, render_frame,
};

struct WindowState {
    window: Arc<Window>,
    draw_context: DrawContext,
    handler: Box<dyn RenderLoopHandler>,
    time_info: TimeInfo,
    last_frame: Instant,
    fps_counter: Option<FpsCounter>,
}

impl WindowState {
    fn render(&mut self, title: &str) -> anyhow::Result<()> {
        let now = Instant::now();
        self.time_info.processing_delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        let rendered = render_frame(&mut *self.handler, &self.draw_context, &self.time_info)?;
        if !rendered {
            return Ok(());
        }
        if let Some(fps) = self
            .fps_counter
            .as_mut()
            .and_then(|counter| counter.record_frame(now))
        {
            let dimensions = self.draw_context.surface_dimensions();
            self.window
                .set_title(&format_title(title, fps, &dimensions));
        }
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        debug!("Resized: {}x{}", size.width, size.height);
        self.draw_context.resize(size.width, size.height);
        self.handler.on_resize(&self.draw_context);
    }
}

struct App {
    config: LaunchConfig,
    builder: Box<RenderLoopBuilder>,
    state: Option<WindowState>,
    error: Option<anyhow::Error>,
}

impl App {
    fn create_state(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<WindowState> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.as_str())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Could not create rendering window")?,
        );
        let size = window.inner_size();
        let dimensions = if size.width > 0 && size.height > 0 {
            Dimensions {
                width: size.width,
                height: size.height,
            }
        } else {
            Dimensions {
                width: self.config.width,
                height: self.config.height,
            }
        };
        let mut draw_context =
            DrawContext::new(Some(Arc::clone(&window)), dimensions, &self.config.render)
                .block_on()?;
        let mut handler = (self.builder)(LaunchContext {
            draw_context: &mut draw_context,
            config: &self.config,
        })?;
        handler.on_resize(&draw_context);
        let now = Instant::now();
        Ok(WindowState {
            window,
            draw_context,
            handler,
            time_info: TimeInfo::default(),
            last_frame: now,
            fps_counter: self
                .config
                .fps_interval
                .map(|interval| FpsCounter::new(interval, now)),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.create_state(event_loop) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::KeyboardInput { event, .. } => {
                state.handler.on_keyboard_event(&event);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = state.render(&self.config.title) {
                    self.fail(event_loop, err);
                    return;
                }
            }
            _ => {}
        }
        if self
            .state
            .as_ref()
            .is_some_and(|state| state.handler.is_finished())
        {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        match &self.state {
            Some(state) => info!(
                "Exiting after {:.1?}",
                state.time_info.init_start.elapsed()
            ),
            None => info!("Exiting..."),
        }
        // Release GPU resources before the window goes away.
        self.state = None;
    }
}

pub(crate) fn init_event_loop(
    config: LaunchConfig,
    builder: Box<RenderLoopBuilder>,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()
        .context("Could not create event loop")
        .inspect_err(|err| error!("{err:#}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App {
        config,
        builder,
        state: None,
        error: None,
    };
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated with error")
        .inspect_err(|err| error!("{err:#}"))?;
    app.error.map_or(Ok(()), Err)
}
