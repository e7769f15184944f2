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

use web_time::{Duration, Instant};

use crate::Dimensions;

pub struct FpsCounter {
    interval: Duration,
    frames: u32,
    window_start: Instant,
}

impl FpsCounter {
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            frames: 0,
            window_start: now,
        }
    }

    /// Counts one rendered frame. Once `interval` has elapsed, returns the
    /// average frame rate over that period and starts a new one.
    #[allow(clippy::cast_precision_loss)]
    pub fn record_frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval || elapsed.is_zero() {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

#[must_use]
pub fn format_title(prefix: &str, fps: f32, dimensions: &Dimensions) -> String {
    format!(
        "{prefix} ({fps:.2} fps @ {} x {})",
        dimensions.width, dimensions.height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_reported_before_interval() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(Duration::from_millis(250), start);
        assert_eq!(counter.record_frame(start + Duration::from_millis(10)), None);
        assert_eq!(counter.record_frame(start + Duration::from_millis(249)), None);
    }

    #[test]
    fn average_over_interval_then_reset() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(Duration::from_secs(1), start);
        for i in 1..50 {
            assert_eq!(counter.record_frame(start + Duration::from_millis(i * 20)), None);
        }
        let fps = counter
            .record_frame(start + Duration::from_secs(1))
            .expect("interval elapsed");
        assert!((fps - 50.0).abs() < 1e-3);

        let restart = start + Duration::from_secs(1);
        assert_eq!(counter.record_frame(restart + Duration::from_millis(500)), None);
        let fps = counter
            .record_frame(restart + Duration::from_secs(2))
            .expect("interval elapsed");
        assert!((fps - 1.0).abs() < 1e-3);
    }

    #[test]
    fn title_format() {
        let dimensions = Dimensions {
            width: 500,
            height: 400,
        };
        assert_eq!(
            format_title("Chapter 4", 59.876, &dimensions),
            "Chapter 4 (59.88 fps @ 500 x 400)"
        );
    }
}
