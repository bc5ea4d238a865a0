use glam::Vec3;
use rand::Rng;

/// Kinematic state of the bouncing sphere. This is a plain value: the frame
/// loop owns the single long-lived copy and the physics step takes it by
/// value and returns the successor state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

impl BodyState {
    /// Spawn at the arena center with a random integer lateral kick on x
    /// and z, in [-3, 3), and gravity already applied to the acceleration.
    pub fn spawn(gravity: f32, rng: &mut impl Rng) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::new(
                rng.random_range(-3..3) as f32,
                0.0,
                rng.random_range(-3..3) as f32,
            ),
            acceleration: Vec3::new(0.0, gravity, 0.0),
        }
    }
}

/// Axis-aligned arena the body bounces inside. Extents are half-widths
/// measured from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub half_x: f32,
    pub half_y: f32,
    pub half_z: f32,
}

impl ArenaBounds {
    /// Base half-extent sized to a 16:9 view frustum at the default camera
    /// distance.
    pub const DEFAULT_LIMIT: f32 = 16.0 / 9.0 * 1.4;

    /// The x axis gets a 1.5x wider berth than y and z, matching the
    /// wide-screen arena layout.
    pub fn from_limit(limit: f32) -> Self {
        Self {
            half_x: limit * 1.5,
            half_y: limit,
            half_z: limit,
        }
    }

    /// The y coordinate a sphere of `radius` is clamped to when it hits the
    /// floor.
    pub fn floor_contact_y(&self, radius: f32) -> f32 {
        -self.half_y - radius
    }
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self::from_limit(Self::DEFAULT_LIMIT)
    }
}

/// Per-frame readout for the log stream and the debug overlay, rounded to
/// two decimals so consecutive frames compare cleanly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub camera_eye: Option<Vec3>,
    pub camera_yaw_pitch: Option<(f32, f32)>,
}

pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

pub fn round2_vec(v: Vec3) -> Vec3 {
    Vec3::new(round2(v.x), round2(v.y), round2(v.z))
}
