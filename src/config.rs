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

use std::env;
use std::path::PathBuf;

use web_time::Duration;

pub const ENV_HEADLESS: &str = "HEADLESS";
pub const ENV_SHADER_DIR: &str = "SHADER_DIR";

const DEFAULT_SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

pub struct RenderSettings {
    pub clear_color: wgpu::Color,
    /// 1 disables multisampling.
    pub multisample_count: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: wgpu::Color::TRANSPARENT,
            multisample_count: 4,
        }
    }
}

pub struct LaunchConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub headless: bool,
    pub fps_interval: Option<Duration>,
    pub render: RenderSettings,
}

impl LaunchConfig {
    pub const DEFAULT_WIDTH: u32 = 500;
    pub const DEFAULT_HEIGHT: u32 = 500;

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            headless: env::var(ENV_HEADLESS).is_ok(),
            fps_interval: None,
            render: RenderSettings::default(),
        }
    }

    #[must_use]
    pub fn with_fps_interval(mut self, interval: Duration) -> Self {
        self.fps_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_render_settings(mut self, render: RenderSettings) -> Self {
        self.render = render;
        self
    }
}

/// Location of a shader file shipped in the `shaders/` directory, which can
/// be moved elsewhere with the `SHADER_DIR` environment variable.
pub fn shader_path(file_name: &str) -> PathBuf {
    env::var_os(ENV_SHADER_DIR)
        .map_or_else(|| PathBuf::from(DEFAULT_SHADER_DIR), PathBuf::from)
        .join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_first_chapters() {
        let config = LaunchConfig::new("Chapter 1");
        assert_eq!(config.title, "Chapter 1");
        assert_eq!((config.width, config.height), (500, 500));
        assert!(config.fps_interval.is_none());
        assert_eq!(config.render.clear_color, wgpu::Color::TRANSPARENT);
        assert_eq!(config.render.multisample_count, 4);
    }

    #[test]
    fn builder_methods() {
        let config = LaunchConfig::new(String::from("Chapter 2"))
            .with_size(640, 480)
            .with_fps_interval(Duration::from_millis(250))
            .with_render_settings(RenderSettings {
                clear_color: wgpu::Color::WHITE,
                multisample_count: 1,
            });
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.fps_interval, Some(Duration::from_millis(250)));
        assert_eq!(config.render.multisample_count, 1);
    }

    #[test]
    fn shader_path_points_to_a_wgsl_file() {
        let path = shader_path("cube.wgsl");
        assert!(path.ends_with("cube.wgsl"));
        if env::var_os(ENV_SHADER_DIR).is_none() {
            assert!(path.exists(), "{} should exist", path.display());
        }
    }
}
