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

use log::{error, info};
use pollster::FutureExt;

use crate::{
    config::LaunchConfig,
    draw_context::{Dimensions, DrawContext},
    render_loop::{LaunchContext, RenderLoopHandler, TimeInfo, render_frame},
    window::init_event_loop,
};

const GLOBAL_LOG_FILTER: log::LevelFilter = log::LevelFilter::Info;

/// Opens the chapter window and runs `builder`'s handler until the window
/// is closed. With `HEADLESS` set, renders a single offscreen frame instead.
pub fn launch_app<F>(config: LaunchConfig, builder: F) -> anyhow::Result<()>
where
    F: Fn(LaunchContext) -> anyhow::Result<Box<dyn RenderLoopHandler>> + 'static,
{
    init_log();
    info!("Init {}", config.title);
    if config.headless {
        info!("Running in headless mode");
        init_headless(&config, &builder).inspect_err(|err| error!("{err:#}"))
    } else {
        init_event_loop(config, Box::new(builder))
    }
}

fn init_log() {
    use fern::colors::{Color, ColoredLevelConfig};
    let colors = ColoredLevelConfig::new()
        .info(Color::Blue)
        .debug(Color::Green);
    let result = fern::Dispatch::new()
        .level(GLOBAL_LOG_FILTER)
        .level_for(env!("CARGO_CRATE_NAME"), log::LevelFilter::Debug)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}:{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                colors.color(record.level()),
                record.target(),
                record.line().unwrap_or_default(),
                message
            ));
        })
        .chain(std::io::stdout())
        .apply();
    if result.is_err() {
        // A logger is already installed, keep it.
        log::debug!("Logger already initialized");
    }
}

fn init_headless<F>(config: &LaunchConfig, builder: &F) -> anyhow::Result<()>
where
    F: Fn(LaunchContext) -> anyhow::Result<Box<dyn RenderLoopHandler>>,
{
    let dimensions = Dimensions {
        width: config.width,
        height: config.height,
    };
    let mut draw_context = DrawContext::new(None, dimensions, &config.render).block_on()?;
    let mut handler = builder(LaunchContext {
        draw_context: &mut draw_context,
        config,
    })?;
    let time_info = TimeInfo::default();
    handler.on_resize(&draw_context);
    render_frame(&mut *handler, &draw_context, &time_info)?;
    info!("Exiting after {:.1?}", time_info.init_start.elapsed());
    Ok(())
}
