use egui::Context;

use crate::model::{CameraMode, Telemetry};

/// Per-frame numbers the overlay shows next to the telemetry.
pub struct OverlayStats {
    pub fps: f32,
    pub triangle_count: u32,
    pub wireframe: bool,
}

/// Draw the debug overlay: body telemetry, camera state and control hints.
pub fn draw_overlay(ctx: &Context, telemetry: &Telemetry, camera_mode: &CameraMode, stats: &OverlayStats) {
    draw_telemetry_window(ctx, telemetry, camera_mode, stats);
    draw_controls_window(ctx, camera_mode);
}

fn draw_telemetry_window(
    ctx: &Context,
    telemetry: &Telemetry,
    camera_mode: &CameraMode,
    stats: &OverlayStats,
) {
    egui::Window::new("Telemetry")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", stats.fps)).small());
            ui.label(egui::RichText::new(format!("Triangles: {}", stats.triangle_count)).small());
            if stats.wireframe {
                ui.label(egui::RichText::new("Wireframe").small());
            }
            ui.separator();
            let p = telemetry.position;
            let v = telemetry.velocity;
            let a = telemetry.acceleration;
            ui.label(egui::RichText::new(format!("Pos: {:.2} {:.2} {:.2}", p.x, p.y, p.z)).small());
            ui.label(egui::RichText::new(format!("Vel: {:.2} {:.2} {:.2}", v.x, v.y, v.z)).small());
            ui.label(egui::RichText::new(format!("Acc: {:.2} {:.2} {:.2}", a.x, a.y, a.z)).small());

            match camera_mode {
                CameraMode::Fixed { .. } => {
                    ui.label(egui::RichText::new("Camera: fixed").small());
                }
                CameraMode::Free { .. } => {
                    if let (Some(eye), Some((yaw, pitch))) =
                        (telemetry.camera_eye, telemetry.camera_yaw_pitch)
                    {
                        ui.label(
                            egui::RichText::new(format!(
                                "Camera: free  eye {:.2} {:.2} {:.2}",
                                eye.x, eye.y, eye.z
                            ))
                            .small(),
                        );
                        ui.label(
                            egui::RichText::new(format!("Yaw: {yaw:.2} Pitch: {pitch:.2}")).small(),
                        );
                    }
                }
            }
        });
}

fn draw_controls_window(ctx: &Context, camera_mode: &CameraMode) {
    egui::Window::new("Controls")
        .default_pos([8.0, 220.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("WASD - Push the sphere").small());
            ui.label(egui::RichText::new("Space - Jump (on the floor)").small());
            ui.label(egui::RichText::new("X - Wireframe").small());
            ui.label(egui::RichText::new("C - Toggle camera").small());
            ui.label(egui::RichText::new("Up/Down - Resize window").small());
            ui.label(egui::RichText::new("Esc - Quit").small());
            if matches!(camera_mode, CameraMode::Free { .. }) {
                ui.separator();
                ui.label(egui::RichText::new("IJKL - Move camera").small());
                ui.label(egui::RichText::new("U/O - Camera up/down").small());
                ui.label(egui::RichText::new("Left drag - Look").small());
            }
        });
}
