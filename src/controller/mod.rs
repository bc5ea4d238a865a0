// CONTROLLER: input, physics, and the per-frame update loop
pub mod camera_controller;
pub mod frame_loop;
pub mod input;
pub mod physics;

pub use camera_controller::CameraController;
pub use frame_loop::{FrameContext, FrameOutput};
pub use input::{InputEvent, InputProcessor, InputSnapshot, InputState, KeyBindings};
pub use physics::PhysicsSystem;
