use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec3};

/// The two interchangeable camera rigs. Picked at construction; the frame
/// loop only ever sees the view matrix seam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    /// Constant look-at. Input never moves it.
    Fixed { eye: Vec3, target: Vec3 },
    /// First-person rig driven by pointer deltas and move keys.
    /// `last_pointer` is the pointer sample from the previous frame.
    Free {
        eye: Vec3,
        yaw: f32,
        pitch: f32,
        last_pointer: Vec2,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub mode: CameraMode,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn fixed(eye: Vec3, target: Vec3, width: u32, height: u32) -> Self {
        Self {
            mode: CameraMode::Fixed { eye, target },
            up: Vec3::Y,
            fov_y: 45_f32.to_radians(),
            aspect: width as f32 / height as f32,
            z_near: 0.1,
            z_far: 100.0,
        }
    }

    pub fn free(eye: Vec3, width: u32, height: u32) -> Self {
        Self {
            mode: CameraMode::Free {
                eye,
                yaw: 0.0,
                pitch: 0.0,
                last_pointer: Vec2::ZERO,
            },
            up: Vec3::Y,
            fov_y: 45_f32.to_radians(),
            aspect: width as f32 / height as f32,
            z_near: 0.1,
            z_far: 100.0,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Aim a free camera at `target` by deriving yaw and pitch. No-op for a
    /// fixed camera, which already carries its target.
    pub fn set_look_at(&mut self, target: Vec3) {
        if let CameraMode::Free {
            eye, yaw, pitch, ..
        } = &mut self.mode
        {
            let dir = (target - *eye).normalize_or(Vec3::Z);
            *yaw = dir.x.atan2(dir.z);
            *pitch = dir.y.asin().clamp(-FRAC_PI_2, FRAC_PI_2);
        }
    }

    pub fn eye(&self) -> Vec3 {
        match self.mode {
            CameraMode::Fixed { eye, .. } => eye,
            CameraMode::Free { eye, .. } => eye,
        }
    }

    /// Unit look direction for a yaw/pitch pair, y-up.
    pub fn look_dir(yaw: f32, pitch: f32) -> Vec3 {
        Vec3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            yaw.cos() * pitch.cos(),
        )
    }

    pub fn view(&self) -> Mat4 {
        match self.mode {
            CameraMode::Fixed { eye, target } => Mat4::look_at_rh(eye, target, self.up),
            CameraMode::Free {
                eye, yaw, pitch, ..
            } => Mat4::look_at_rh(eye, eye + Self::look_dir(yaw, pitch), self.up),
        }
    }

    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_view_matches_explicit_look_at() {
        let camera = Camera::fixed(Vec3::new(0.0, 0.0, 4.5), Vec3::ZERO, 1280, 720);
        let expected = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 4.5), Vec3::ZERO, Vec3::Y);
        assert!(camera.view().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn look_dir_is_unit_and_matches_axes() {
        assert!(Camera::look_dir(0.0, 0.0).abs_diff_eq(Vec3::Z, 1e-6));
        assert!(Camera::look_dir(FRAC_PI_2, 0.0).abs_diff_eq(Vec3::X, 1e-6));
        assert!((Camera::look_dir(0.3, -1.1).length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn set_look_at_reproduces_direction() {
        let mut camera = Camera::free(Vec3::new(0.0, 0.0, 4.5), 1280, 720);
        camera.set_look_at(Vec3::ZERO);
        if let CameraMode::Free { yaw, pitch, .. } = camera.mode {
            let dir = Camera::look_dir(yaw, pitch);
            assert!(dir.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        } else {
            panic!("expected free camera");
        }
    }

    #[test]
    fn aspect_tracks_resize() {
        let mut camera = Camera::fixed(Vec3::ZERO, Vec3::NEG_Z, 1600, 900);
        camera.set_aspect(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }
}
