use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::controller::input::InputSnapshot;
use crate::model::camera::{Camera, CameraMode};

/// Handles free-camera movement and orientation. A fixed camera passes
/// through untouched.
pub struct CameraController {
    pub move_speed: f32,
    pub vertical_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            vertical_speed: 2.0,
            mouse_sensitivity: 0.002,
        }
    }
}

impl CameraController {
    /// Apply one frame of look and movement input, then return the view
    /// matrix for this frame.
    pub fn update(&self, camera: &mut Camera, dt: f32, input: &InputSnapshot) -> Mat4 {
        if let CameraMode::Free {
            eye,
            yaw,
            pitch,
            last_pointer,
        } = &mut camera.mode
        {
            if input.look_active {
                let delta = input.pointer - *last_pointer;
                *yaw -= delta.x * self.mouse_sensitivity;
                *pitch = (*pitch - delta.y * self.mouse_sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
            }
            // Refresh the stored sample even while look is inactive so the
            // next engaged frame sees only that frame's delta, not the whole
            // offset accumulated since release.
            *last_pointer = input.pointer;

            let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());
            let right = forward.cross(Vec3::Y);
            let step = self.move_speed * dt;

            if input.cam_forward {
                *eye += forward * step;
            }
            if input.cam_back {
                *eye -= forward * step;
            }
            if input.cam_left {
                *eye -= right * step;
            }
            if input.cam_right {
                *eye += right * step;
            }
            // Vertical motion ignores the yaw basis, it is a plain height
            // offset.
            if input.cam_up {
                eye.y += self.vertical_speed * dt;
            }
            if input.cam_down {
                eye.y -= self.vertical_speed * dt;
            }
        }

        camera.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn free_camera() -> Camera {
        Camera::free(Vec3::new(0.0, 0.0, 4.5), 1280, 720)
    }

    fn look_input(pointer: Vec2, active: bool) -> InputSnapshot {
        InputSnapshot {
            pointer,
            look_active: active,
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn pointer_delta_rotates_only_while_look_is_active() {
        let controller = CameraController::default();
        let mut camera = free_camera();

        let before = camera.mode;
        controller.update(&mut camera, 0.016, &look_input(Vec2::new(100.0, 50.0), false));
        if let (
            CameraMode::Free { yaw, pitch, .. },
            CameraMode::Free {
                yaw: yaw0,
                pitch: pitch0,
                ..
            },
        ) = (camera.mode, before)
        {
            assert_eq!(yaw, yaw0);
            assert_eq!(pitch, pitch0);
        } else {
            panic!("expected free camera");
        }
    }

    #[test]
    fn released_look_does_not_bank_a_jump_for_reengagement() {
        let controller = CameraController::default();
        let mut camera = free_camera();

        // Big pointer travel while released, then a tiny active move.
        controller.update(&mut camera, 0.016, &look_input(Vec2::new(500.0, 500.0), false));
        controller.update(&mut camera, 0.016, &look_input(Vec2::new(501.0, 500.0), true));

        if let CameraMode::Free { yaw, .. } = camera.mode {
            let expected = -1.0 * controller.mouse_sensitivity;
            assert!((yaw - expected).abs() < 1e-6, "yaw {yaw}, expected {expected}");
        } else {
            panic!("expected free camera");
        }
    }

    #[test]
    fn pitch_clamps_at_straight_up_and_down() {
        let controller = CameraController::default();
        let mut camera = free_camera();

        controller.update(&mut camera, 0.016, &look_input(Vec2::ZERO, false));
        controller.update(&mut camera, 0.016, &look_input(Vec2::new(0.0, -1e6), true));
        if let CameraMode::Free { pitch, .. } = camera.mode {
            assert_eq!(pitch, FRAC_PI_2);
        } else {
            panic!("expected free camera");
        }

        controller.update(&mut camera, 0.016, &look_input(Vec2::new(0.0, 1e6), true));
        if let CameraMode::Free { pitch, .. } = camera.mode {
            assert_eq!(pitch, -FRAC_PI_2);
        } else {
            panic!("expected free camera");
        }
    }

    #[test]
    fn planar_movement_follows_yaw_vertical_is_direct() {
        let controller = CameraController::default();
        let mut camera = free_camera();
        let input = InputSnapshot {
            cam_forward: true,
            cam_up: true,
            ..InputSnapshot::default()
        };

        // yaw 0 looks down +z, so forward motion increases eye.z.
        controller.update(&mut camera, 0.5, &input);
        let eye = camera.eye();
        assert!((eye.z - (4.5 + controller.move_speed * 0.5)).abs() < 1e-5);
        assert!((eye.y - controller.vertical_speed * 0.5).abs() < 1e-5);
        assert_eq!(eye.x, 0.0);
    }

    #[test]
    fn fixed_camera_ignores_all_input() {
        let controller = CameraController::default();
        let mut camera = Camera::fixed(Vec3::new(0.0, 0.0, 4.5), Vec3::ZERO, 1280, 720);
        let before = camera.view();

        let input = InputSnapshot {
            cam_forward: true,
            cam_up: true,
            look_active: true,
            pointer: Vec2::new(300.0, 300.0),
            ..InputSnapshot::default()
        };
        let view = controller.update(&mut camera, 0.1, &input);
        assert!(view.abs_diff_eq(before, 1e-6));
    }
}
