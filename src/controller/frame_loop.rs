use glam::Mat4;
use rand::Rng;
use tracing::debug;

use crate::controller::camera_controller::CameraController;
use crate::controller::input::InputSnapshot;
use crate::controller::physics::PhysicsSystem;
use crate::model::body::{round2, round2_vec, ArenaBounds, BodyState, Telemetry};
use crate::model::camera::{Camera, CameraMode};

/// Fixed tilt about X applied to the world transform so the directional
/// light reads on the sphere surface.
pub const WORLD_TILT: f32 = 0.25;

/// What the renderer needs from one simulation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub world: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
    pub wireframe: bool,
}

/// Owns the long-lived simulation state and drives one update per frame.
pub struct FrameContext {
    pub body: BodyState,
    pub camera: Camera,
    pub physics: PhysicsSystem,
    pub camera_controller: CameraController,
    pub bounds: ArenaBounds,
    pub tilt: f32,
}

impl FrameContext {
    pub fn new(camera: Camera, rng: &mut impl Rng) -> Self {
        let physics = PhysicsSystem::default();
        Self {
            body: BodyState::spawn(physics.gravity, rng),
            camera,
            physics,
            camera_controller: CameraController::default(),
            bounds: ArenaBounds::default(),
            tilt: WORLD_TILT,
        }
    }

    /// One frame: physics first, then the camera, then the transforms.
    pub fn advance(&mut self, dt: f32, input: &InputSnapshot) -> FrameOutput {
        self.body = self.physics.step(self.body, dt, input, &self.bounds);
        let view = self.camera_controller.update(&mut self.camera, dt, input);

        let world = Mat4::from_rotation_x(self.tilt) * Mat4::from_translation(self.body.position);

        FrameOutput {
            world,
            view,
            proj: self.camera.proj(),
            wireframe: input.wireframe,
        }
    }

    /// Rounded readout of the current state for the log stream and overlay.
    pub fn telemetry(&self) -> Telemetry {
        let (camera_eye, camera_yaw_pitch) = match self.camera.mode {
            CameraMode::Fixed { .. } => (None, None),
            CameraMode::Free {
                eye, yaw, pitch, ..
            } => (Some(round2_vec(eye)), Some((round2(yaw), round2(pitch)))),
        };

        Telemetry {
            position: round2_vec(self.body.position),
            velocity: round2_vec(self.body.velocity),
            acceleration: round2_vec(self.body.acceleration),
            camera_eye,
            camera_yaw_pitch,
        }
    }

    pub fn log_telemetry(&self) {
        let t = self.telemetry();
        match (t.camera_eye, t.camera_yaw_pitch) {
            (Some(eye), Some((yaw, pitch))) => debug!(
                pos = ?t.position,
                vel = ?t.velocity,
                accel = ?t.acceleration,
                cam_eye = ?eye,
                cam_yaw = yaw,
                cam_pitch = pitch,
                "frame"
            ),
            _ => debug!(
                pos = ?t.position,
                vel = ?t.velocity,
                accel = ?t.acceleration,
                "frame"
            ),
        }
    }
}
