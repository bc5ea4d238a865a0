use crate::controller::input::InputSnapshot;
use crate::model::body::{ArenaBounds, BodyState};

/// Discrete-time integrator for the bouncing sphere: gravity, exponential
/// damping, a lossy floor bounce and perfectly elastic side walls.
pub struct PhysicsSystem {
    pub gravity: f32,
    pub damping: f32,
    pub restitution: f32,
    pub lateral_accel: f32,
    pub jump_speed: f32,
    pub radius: f32,
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self {
            gravity: -9.8,
            damping: 0.995,
            restitution: 0.9,
            lateral_accel: 3.0,
            jump_speed: 7.5,
            radius: 0.25,
        }
    }
}

impl PhysicsSystem {
    /// Advance the body by `dt` seconds. Pure: takes the state by value and
    /// returns the successor. `dt` is applied as-is, a long frame simply
    /// produces a proportionally large step.
    pub fn step(
        &self,
        mut state: BodyState,
        dt: f32,
        input: &InputSnapshot,
        bounds: &ArenaBounds,
    ) -> BodyState {
        state.acceleration.x = self.axis_accel(input.move_left, input.move_right);
        state.acceleration.z = self.axis_accel(input.move_forward, input.move_back);
        state.acceleration.y = self.gravity;

        state.velocity += state.acceleration * dt;
        state.velocity *= self.damping;
        state.position += state.velocity * dt;

        let floor_y = bounds.floor_contact_y(self.radius);
        if state.position.y + self.radius < -bounds.half_y {
            state.position.y = floor_y;
            state.velocity.y *= -self.restitution;
        }

        if state.position.x + self.radius >= bounds.half_x
            || state.position.x - self.radius <= -bounds.half_x
        {
            state.velocity.x = -state.velocity.x;
        }
        if state.position.z + self.radius >= bounds.half_z
            || state.position.z - self.radius <= -bounds.half_z
        {
            state.velocity.z = -state.velocity.z;
        }

        // Bitwise equality on purpose: only a body the floor clamp pinned to
        // exactly this height counts as resting.
        if state.position.y == floor_y && input.jump {
            state.velocity.y = self.jump_speed;
        }

        state
    }

    /// Held opposite keys cancel to zero.
    fn axis_accel(&self, negative: bool, positive: bool) -> f32 {
        match (negative, positive) {
            (true, false) => -self.lateral_accel,
            (false, true) => self.lateral_accel,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn at_rest(system: &PhysicsSystem, bounds: &ArenaBounds) -> BodyState {
        BodyState {
            position: Vec3::new(0.0, bounds.floor_contact_y(system.radius), 0.0),
            velocity: Vec3::ZERO,
            acceleration: Vec3::new(0.0, system.gravity, 0.0),
        }
    }

    fn free_fall_start() -> BodyState {
        BodyState {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::new(0.0, -9.8, 0.0),
        }
    }

    #[test]
    fn free_fall_step_matches_hand_computation() {
        let system = PhysicsSystem::default();
        let bounds = ArenaBounds::default();
        let next = system.step(free_fall_start(), 0.1, &InputSnapshot::default(), &bounds);

        // vel = -9.8 * 0.1 * 0.995 = -0.9751, pos = vel * 0.1
        assert!((next.velocity.y - (-0.9751)).abs() < 1e-5);
        assert!((next.position.y - (-0.09751)).abs() < 1e-6);
        assert_eq!(next.velocity.x, 0.0);
        assert_eq!(next.position.x, 0.0);
    }

    #[test]
    fn floor_bounce_clamps_and_reverses_with_restitution() {
        let system = PhysicsSystem {
            gravity: 0.0,
            damping: 1.0,
            ..PhysicsSystem::default()
        };
        let bounds = ArenaBounds::from_limit(2.0);
        let state = BodyState {
            position: Vec3::new(0.0, -bounds.half_y - system.radius + 0.01, 0.0),
            velocity: Vec3::new(0.0, -2.0, 0.0),
            acceleration: Vec3::ZERO,
        };

        let next = system.step(state, 0.1, &InputSnapshot::default(), &bounds);
        assert_eq!(next.position.y, bounds.floor_contact_y(system.radius));
        assert!((next.velocity.y - 2.0 * system.restitution).abs() < 1e-6);
    }

    #[test]
    fn bounces_never_tunnel_and_decay() {
        let system = PhysicsSystem::default();
        let bounds = ArenaBounds::default();
        let floor_y = bounds.floor_contact_y(system.radius);
        let mut state = free_fall_start();
        let mut peak_speed: f32 = 0.0;

        for _ in 0..10_000 {
            state = system.step(state, 1.0 / 60.0, &InputSnapshot::default(), &bounds);
            assert!(state.position.y >= floor_y - 1e-5, "tunneled to {}", state.position.y);
            peak_speed = peak_speed.max(state.velocity.y.abs());
        }
        // After plenty of lossy bounces the vertical motion has died down.
        assert!(state.velocity.y.abs() < peak_speed * 0.5);
    }

    #[test]
    fn wall_contact_flips_lateral_velocity_elastically() {
        let system = PhysicsSystem {
            gravity: 0.0,
            damping: 1.0,
            ..PhysicsSystem::default()
        };
        let bounds = ArenaBounds::from_limit(2.0);
        let state = BodyState {
            position: Vec3::new(bounds.half_x - system.radius - 0.001, 0.0, 0.0),
            velocity: Vec3::new(1.0, 0.0, 0.0),
            acceleration: Vec3::ZERO,
        };

        let next = system.step(state, 0.1, &InputSnapshot::default(), &bounds);
        assert_eq!(next.velocity.x, -1.0);
        assert_eq!(next.velocity.z, 0.0);
    }

    #[test]
    fn x_walls_sit_farther_out_than_z_walls() {
        let system = PhysicsSystem {
            gravity: 0.0,
            damping: 1.0,
            ..PhysicsSystem::default()
        };
        let bounds = ArenaBounds::from_limit(2.0);
        let state = BodyState {
            position: Vec3::new(2.0, 0.0, 2.0),
            velocity: Vec3::new(1.0, 0.0, 1.0),
            acceleration: Vec3::ZERO,
        };

        // At |2.1| the z wall (half 2.0) reacts but the x wall (half 3.0)
        // does not.
        let next = system.step(state, 0.1, &InputSnapshot::default(), &bounds);
        assert_eq!(next.velocity.x, 1.0);
        assert_eq!(next.velocity.z, -1.0);
    }

    #[test]
    fn jump_fires_only_from_exact_floor_contact() {
        let system = PhysicsSystem {
            gravity: 0.0,
            damping: 1.0,
            ..PhysicsSystem::default()
        };
        let bounds = ArenaBounds::from_limit(2.0);
        let jump = InputSnapshot {
            jump: true,
            ..InputSnapshot::default()
        };

        let resting = at_rest(&system, &bounds);
        let next = system.step(resting, 0.1, &jump, &bounds);
        assert_eq!(next.velocity.y, system.jump_speed);

        // A hair above the contact height the same input does nothing.
        let mut hovering = at_rest(&system, &bounds);
        hovering.position.y += 1e-4;
        let next = system.step(hovering, 0.1, &jump, &bounds);
        assert_eq!(next.velocity.y, 0.0);
    }

    #[test]
    fn opposite_keys_cancel_lateral_acceleration() {
        let system = PhysicsSystem {
            gravity: 0.0,
            damping: 1.0,
            ..PhysicsSystem::default()
        };
        let bounds = ArenaBounds::default();
        let both = InputSnapshot {
            move_left: true,
            move_right: true,
            move_forward: true,
            move_back: true,
            ..InputSnapshot::default()
        };

        let next = system.step(free_fall_start(), 0.1, &both, &bounds);
        assert_eq!(next.acceleration.x, 0.0);
        assert_eq!(next.acceleration.z, 0.0);
        assert_eq!(next.velocity, Vec3::ZERO);
    }

    #[test]
    fn single_keys_steer_both_axes() {
        let system = PhysicsSystem {
            gravity: 0.0,
            damping: 1.0,
            ..PhysicsSystem::default()
        };
        let bounds = ArenaBounds::default();
        let input = InputSnapshot {
            move_right: true,
            move_forward: true,
            ..InputSnapshot::default()
        };

        let next = system.step(free_fall_start(), 0.1, &input, &bounds);
        assert_eq!(next.acceleration.x, system.lateral_accel);
        assert_eq!(next.acceleration.z, -system.lateral_accel);
        assert!(next.velocity.x > 0.0);
        assert!(next.velocity.z < 0.0);
    }
}
