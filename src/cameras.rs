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

use std::collections::BTreeSet;

use log::warn;
use web_time::Duration;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::math::Mat4;

/// Camera moved on the horizontal plane with WASD or the arrow keys.
///
/// The viewport never moves: the world is translated the opposite way.
pub struct KeyboardCamera {
    view: Mat4,
    enabled_keys: BTreeSet<KeyCode>,
    speed: f32,
}

impl Default for KeyboardCamera {
    fn default() -> Self {
        let mut view = Mat4::IDENTITY;
        view.translate(0.0, 0.0, Self::DEFAULT_DISTANCE);
        Self::new(view)
    }
}

impl KeyboardCamera {
    pub const DEFAULT_DISTANCE: f32 = -2.0;
    /// World units per second.
    pub const DEFAULT_SPEED: f32 = 1.0;

    #[must_use]
    pub fn new(view: Mat4) -> Self {
        Self {
            view,
            enabled_keys: BTreeSet::new(),
            speed: Self::DEFAULT_SPEED,
        }
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn keyboard_event_listener(&mut self, input: &KeyEvent) {
        let PhysicalKey::Code(key_code) = input.physical_key else {
            warn!("Strange key pushed");
            return;
        };
        self.handle_key(key_code, input.state);
    }

    pub fn handle_key(&mut self, key_code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.enabled_keys.insert(key_code);
            }
            ElementState::Released => {
                self.enabled_keys.remove(&key_code);
            }
        }
    }

    fn is_down(&self, keys: [KeyCode; 2]) -> bool {
        keys.iter().any(|key| self.enabled_keys.contains(key))
    }

    pub fn update(&mut self, delta: Duration) {
        let mut dx = 0.0;
        let mut dz = 0.0;
        if self.is_down([KeyCode::KeyA, KeyCode::ArrowLeft]) {
            dx += 1.0;
        }
        if self.is_down([KeyCode::KeyD, KeyCode::ArrowRight]) {
            dx -= 1.0;
        }
        if self.is_down([KeyCode::KeyW, KeyCode::ArrowUp]) {
            dz += 1.0;
        }
        if self.is_down([KeyCode::KeyS, KeyCode::ArrowDown]) {
            dz -= 1.0;
        }
        if dx == 0.0 && dz == 0.0 {
            return;
        }
        let step = self.speed * delta.as_secs_f32();
        self.view.translate(dx * step, 0.0, dz * step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn offset(camera: &KeyboardCamera) -> [f32; 3] {
        let m = camera.view_matrix().m;
        [m[12], m[13], m[14]]
    }

    fn assert_offset(camera: &KeyboardCamera, expected: [f32; 3]) {
        let actual = offset(camera);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < EPSILON, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn starts_two_units_back() {
        let camera = KeyboardCamera::default();
        assert_offset(&camera, [0.0, 0.0, -2.0]);
    }

    #[test]
    fn no_key_no_movement() {
        let mut camera = KeyboardCamera::default();
        camera.update(Duration::from_secs(1));
        assert_offset(&camera, [0.0, 0.0, -2.0]);
    }

    #[test]
    fn forward_moves_world_towards_viewer() {
        let mut camera = KeyboardCamera::default();
        camera.handle_key(KeyCode::KeyW, ElementState::Pressed);
        camera.update(Duration::from_millis(500));
        assert_offset(&camera, [0.0, 0.0, -1.5]);
        camera.handle_key(KeyCode::KeyW, ElementState::Released);
        camera.update(Duration::from_millis(500));
        assert_offset(&camera, [0.0, 0.0, -1.5]);
    }

    #[test]
    fn strafing_is_proportional_to_elapsed_time() {
        let mut camera = KeyboardCamera::new(Mat4::IDENTITY);
        camera.set_speed(2.0);
        camera.handle_key(KeyCode::ArrowRight, ElementState::Pressed);
        camera.update(Duration::from_millis(250));
        camera.update(Duration::from_millis(250));
        assert_offset(&camera, [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let mut camera = KeyboardCamera::new(Mat4::IDENTITY);
        camera.handle_key(KeyCode::KeyA, ElementState::Pressed);
        camera.handle_key(KeyCode::KeyD, ElementState::Pressed);
        camera.handle_key(KeyCode::KeyS, ElementState::Pressed);
        camera.update(Duration::from_secs(1));
        assert_offset(&camera, [0.0, 0.0, -1.0]);
    }
}
