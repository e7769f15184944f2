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

//! Minimal affine matrix toolkit shared by the chapters.
//!
//! Matrices are stored column-major, `m[col * 4 + row]`, which is the layout
//! WGSL expects for a `mat4x4<f32>` uniform. No arithmetic checks are made:
//! a zero aspect ratio or identical near/far planes produce non-finite values.

use bytemuck::{Pod, Zeroable};
use cgmath::{Angle, Deg, Matrix4, Rad};

pub fn cotangent(angle: f32) -> f32 {
    Rad(angle).cot()
}

pub fn deg_to_rad(deg: f32) -> f32 {
    Rad::from(Deg(deg)).0
}

pub fn rad_to_deg(rad: f32) -> f32 {
    Deg::from(Rad(rad)).0
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Remaps OpenGL clip depth (-w..w) to the wgpu one (0..w).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU: Mat4 = Mat4 {
    m: [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.0,
        0.0, 0.0, 0.5, 1.0,
    ],
};

impl Mat4 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    #[must_use]
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Matrix product where `self` is applied first and `next` second.
    ///
    /// In the usual notation this is `next * self`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        let mut out = Self { m: [0.0; 16] };
        for col in 0..4 {
            for row in 0..4 {
                out.m[col * 4 + row] = (0..4)
                    .map(|k| next.m[k * 4 + row] * self.m[col * 4 + k])
                    .sum();
            }
        }
        out
    }

    pub fn rotate_x(&mut self, angle: impl Into<Rad<f32>>) {
        let (sine, cosine) = angle.into().sin_cos();
        let mut rot = Self::IDENTITY;
        rot.m[5] = cosine;
        rot.m[6] = sine;
        rot.m[9] = -sine;
        rot.m[10] = cosine;
        *self = self.then(&rot);
    }

    pub fn rotate_y(&mut self, angle: impl Into<Rad<f32>>) {
        let (sine, cosine) = angle.into().sin_cos();
        let mut rot = Self::IDENTITY;
        rot.m[0] = cosine;
        rot.m[2] = -sine;
        rot.m[8] = sine;
        rot.m[10] = cosine;
        *self = self.then(&rot);
    }

    pub fn rotate_z(&mut self, angle: impl Into<Rad<f32>>) {
        let (sine, cosine) = angle.into().sin_cos();
        let mut rot = Self::IDENTITY;
        rot.m[0] = cosine;
        rot.m[1] = sine;
        rot.m[4] = -sine;
        rot.m[5] = cosine;
        *self = self.then(&rot);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        let mut scale = Self::IDENTITY;
        scale.m[0] = x;
        scale.m[5] = y;
        scale.m[10] = z;
        *self = self.then(&scale);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        // Last column holds the offset.
        let mut translation = Self::IDENTITY;
        translation.m[12] = x;
        translation.m[13] = y;
        translation.m[14] = z;
        *self = self.then(&translation);
    }

    /// OpenGL style perspective projection, `fovy` being the full vertical
    /// field of view. Use [`Mat4::to_wgpu_clip_space`] before handing it to
    /// a wgpu pipeline.
    #[must_use]
    pub fn perspective(fovy: impl Into<Deg<f32>>, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let half_fovy = fovy.into().0 / 2.0;
        let y_scale = cotangent(deg_to_rad(half_fovy));
        let x_scale = y_scale / aspect_ratio;
        let frustum_length = far - near;

        let mut out = Self { m: [0.0; 16] };
        out.m[0] = x_scale;
        out.m[5] = y_scale;
        out.m[10] = -((far + near) / frustum_length);
        out.m[11] = -1.0;
        out.m[14] = -((2.0 * near * far) / frustum_length);
        out
    }

    #[must_use]
    pub fn to_wgpu_clip_space(&self) -> Self {
        self.then(&OPENGL_TO_WGPU)
    }

    #[must_use]
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        std::array::from_fn(|col| std::array::from_fn(|row| self.m[col * 4 + row]))
    }
}

impl From<Mat4> for Matrix4<f32> {
    fn from(value: Mat4) -> Self {
        Self::from(value.to_cols_array_2d())
    }
}

impl From<Matrix4<f32>> for Mat4 {
    fn from(value: Matrix4<f32>) -> Self {
        let cols: [[f32; 4]; 4] = value.into();
        Self::from_cols_array(std::array::from_fn(|i| cols[i / 4][i % 4]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector3, Vector4};
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-5;

    fn assert_mat_eq(actual: Mat4, expected: Matrix4<f32>) {
        let expected = Mat4::from(expected);
        for (idx, (a, e)) in actual.m.iter().zip(expected.m.iter()).enumerate() {
            assert!(
                (a - e).abs() < EPSILON,
                "element {idx} differs: {a} != {e}\nactual: {actual:?}\nexpected: {expected:?}"
            );
        }
    }

    fn transform(mat: Mat4, point: [f32; 4]) -> Vector4<f32> {
        Matrix4::from(mat) * Vector4::from(point)
    }

    #[test]
    fn angle_conversions() {
        assert!((deg_to_rad(180.0) - PI).abs() < EPSILON);
        assert!((rad_to_deg(FRAC_PI_2) - 90.0).abs() < EPSILON);
        assert!((rad_to_deg(deg_to_rad(33.0)) - 33.0).abs() < EPSILON);
        assert!((cotangent(PI / 4.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn identity_is_neutral() {
        let mut mat = Mat4::IDENTITY;
        mat.rotate_y(Deg(30.0));
        mat.translate(1.0, 2.0, 3.0);
        assert_eq!(mat.then(&Mat4::IDENTITY), mat);
        assert_eq!(Mat4::IDENTITY.then(&mat), mat);
        assert_mat_eq(Mat4::default(), Matrix4::identity());
    }

    #[test]
    fn then_applies_left_operand_first() {
        let mut first = Mat4::IDENTITY;
        first.rotate_z(Deg(90.0));
        let mut second = Mat4::IDENTITY;
        second.translate(5.0, 0.0, 0.0);
        // Rotating (1, 0, 0) gives (0, 1, 0), then shifted on x.
        let moved = transform(first.then(&second), [1.0, 0.0, 0.0, 1.0]);
        assert!((moved.x - 5.0).abs() < EPSILON);
        assert!((moved.y - 1.0).abs() < EPSILON);
        assert_mat_eq(
            first.then(&second),
            Matrix4::from(second) * Matrix4::from(first),
        );
    }

    #[test]
    fn rotations_match_right_handed_convention() {
        let angle = Rad(0.7);
        let mut x = Mat4::IDENTITY;
        x.rotate_x(angle);
        assert_mat_eq(x, Matrix4::from_angle_x(angle));
        let mut y = Mat4::IDENTITY;
        y.rotate_y(angle);
        assert_mat_eq(y, Matrix4::from_angle_y(angle));
        let mut z = Mat4::IDENTITY;
        z.rotate_z(angle);
        assert_mat_eq(z, Matrix4::from_angle_z(angle));
    }

    #[test]
    fn rotation_accepts_degrees() {
        let mut from_deg = Mat4::IDENTITY;
        from_deg.rotate_x(Deg(45.0));
        let mut from_rad = Mat4::IDENTITY;
        from_rad.rotate_x(Rad(deg_to_rad(45.0)));
        assert_mat_eq(from_deg, from_rad.into());
    }

    #[test]
    fn scale_and_translate() {
        let mut mat = Mat4::IDENTITY;
        mat.scale(2.0, 3.0, 4.0);
        assert_mat_eq(mat, Matrix4::from_nonuniform_scale(2.0, 3.0, 4.0));

        let mut mat = Mat4::IDENTITY;
        mat.translate(1.0, -2.0, 3.0);
        assert_mat_eq(mat, Matrix4::from_translation(Vector3::new(1.0, -2.0, 3.0)));
        assert_eq!(&mat.m[12..15], &[1.0, -2.0, 3.0]);
    }

    #[test]
    fn in_place_operations_append_after_current_transform() {
        let mut mat = Mat4::IDENTITY;
        mat.scale(2.0, 2.0, 2.0);
        mat.translate(0.0, 0.0, -2.0);
        let expected = Matrix4::from_translation(Vector3::new(0.0, 0.0, -2.0))
            * Matrix4::from_scale(2.0);
        assert_mat_eq(mat, expected);
    }

    #[test]
    fn cube_model_matrix_composition() {
        let angle = Deg(30.0);
        let mut model = Mat4::IDENTITY;
        model.rotate_y(angle);
        model.rotate_x(angle);
        assert_mat_eq(
            model,
            Matrix4::from_angle_x(angle) * Matrix4::from_angle_y(angle),
        );
    }

    #[test]
    fn perspective_matches_opengl_projection() {
        let projection = Mat4::perspective(Deg(60.0), 1.5, 1.0, 100.0);
        assert_mat_eq(projection, cgmath::perspective(Deg(60.0), 1.5, 1.0, 100.0));
        assert_eq!(projection.m[11], -1.0);
        assert_eq!(projection.m[15], 0.0);
    }

    #[test]
    fn wgpu_clip_space_maps_depth_to_unit_range() {
        let projection = Mat4::perspective(Deg(60.0), 1.0, 1.0, 100.0).to_wgpu_clip_space();
        let near = transform(projection, [0.0, 0.0, -1.0, 1.0]);
        let far = transform(projection, [0.0, 0.0, -100.0, 1.0]);
        assert!((near.z / near.w).abs() < EPSILON);
        assert!((far.z / far.w - 1.0).abs() < EPSILON);
    }

    #[test]
    fn flat_and_nested_column_layouts_agree() {
        let flat: [f32; 16] = std::array::from_fn(|i| i as f32);
        let mat = Mat4::from_cols_array(flat);
        let cols = mat.to_cols_array_2d();
        assert_eq!(cols[0], [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(cols[3], [12.0, 13.0, 14.0, 15.0]);
        assert_eq!(Mat4::from(Matrix4::from(cols)), mat);
    }

    #[test]
    fn cgmath_conversion_round_trip() {
        let mut mat = Mat4::IDENTITY;
        mat.rotate_z(Deg(12.0));
        mat.translate(4.0, 5.0, 6.0);
        let back = Mat4::from(Matrix4::from(mat));
        assert_eq!(back, mat);
        assert_eq!(mat.to_cols_array_2d()[3][..3], [4.0, 5.0, 6.0]);
    }
}
