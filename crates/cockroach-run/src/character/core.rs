//! Core character controller calculations.
//!
//! Pure functions that can be tested in isolation without Bevy dependencies.
//! Used by both the Bevy controller system and the headless sim binary.

use glam::{Quat, Vec3};

/// Tuning parameters for a single controller step.
///
/// All magnitudes are configuration, never derived at runtime.
#[derive(Clone, Debug)]
pub struct MovementParams {
    /// Forward/backward drive force magnitude (N).
    pub move_force: f32,
    /// Yaw torque magnitude about the up axis (N·m).
    pub turn_torque: f32,
    /// Upward jump impulse magnitude (N·s). Must give the body a takeoff
    /// speed far above `grounded_epsilon`.
    pub jump_impulse: f32,
    /// Vertical speed below which the body counts as grounded (m/s). Must
    /// stay below the per-step gravity decrement (g / step rate, ~0.16 at
    /// 60 Hz) or a fixed step near the flight apex can sample as grounded
    /// and re-fire a held jump mid-air.
    pub grounded_epsilon: f32,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            move_force: 12.0,
            turn_torque: 3.0,
            jump_impulse: 40.0,
            grounded_epsilon: 0.02,
        }
    }
}

/// Held-key state for a controller step.
///
/// Five independent flags. Opposing directions are both representable and
/// cancel through force composition, not through mutual exclusion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub jump: bool,
}

/// Forces to hand to the physics engine for one step.
///
/// The engine integrates and clears these; the controller never writes
/// position or orientation directly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepForces {
    /// Linear force, world space.
    pub force: Vec3,
    /// Torque about the world up axis.
    pub torque: Vec3,
    /// One-shot impulse (jump), world space.
    pub impulse: Vec3,
}

/// Whether a vertical velocity counts as grounded.
///
/// Jump eligibility proxy, not true contact detection: the body is treated as
/// grounded when its vertical speed is within `epsilon` of zero. The jump
/// impulse itself pushes vertical speed well past `epsilon`, which is what
/// debounces a held jump key without any extra latch state.
pub fn is_grounded(vertical_velocity: f32, epsilon: f32) -> bool {
    vertical_velocity.abs() < epsilon
}

/// Compute the forces for a single controller step.
///
/// Drive forces act along the body's local forward axis (`rotation * -Z`), so
/// turning changes the direction of subsequent thrust. Turn torque is about
/// world up, positive for left. Jump applies a single upward impulse only
/// while grounded.
pub fn controller_step(
    params: &MovementParams,
    input: StepInput,
    rotation: Quat,
    linear_velocity: Vec3,
) -> StepForces {
    let mut out = StepForces::default();

    let forward = rotation * Vec3::NEG_Z;

    if input.forward {
        out.force += forward * params.move_force;
    }
    if input.backward {
        out.force -= forward * params.move_force;
    }

    if input.turn_left {
        out.torque += Vec3::Y * params.turn_torque;
    }
    if input.turn_right {
        out.torque -= Vec3::Y * params.turn_torque;
    }

    if input.jump && is_grounded(linear_velocity.y, params.grounded_epsilon) {
        out.impulse = Vec3::Y * params.jump_impulse;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn params() -> MovementParams {
        MovementParams::default()
    }

    #[test]
    fn test_idle_input_produces_nothing() {
        let out = controller_step(&params(), StepInput::default(), Quat::IDENTITY, Vec3::ZERO);
        assert_eq!(out, StepForces::default());
    }

    #[test]
    fn test_forward_force_is_local_forward() {
        let p = params();
        let input = StepInput {
            forward: true,
            ..Default::default()
        };

        // Identity orientation: forward is -Z.
        let out = controller_step(&p, input, Quat::IDENTITY, Vec3::ZERO);
        assert!((out.force - Vec3::NEG_Z * p.move_force).length() < 1e-5);

        // Quarter turn left: forward is now -X.
        let turned = Quat::from_rotation_y(FRAC_PI_2);
        let out = controller_step(&p, input, turned, Vec3::ZERO);
        assert!((out.force - Vec3::NEG_X * p.move_force).length() < 1e-5);
    }

    #[test]
    fn test_forward_direction_tracks_any_yaw() {
        let p = params();
        let input = StepInput {
            forward: true,
            ..Default::default()
        };
        for i in 0..16 {
            let theta = (i as f32) * std::f32::consts::TAU / 16.0;
            let rotation = Quat::from_rotation_y(theta);
            let out = controller_step(&p, input, rotation, Vec3::ZERO);
            let expected = rotation * (Vec3::NEG_Z * p.move_force);
            assert!(
                (out.force - expected).length() < 1e-4,
                "yaw {theta}: {:?} vs {expected:?}",
                out.force
            );
        }
    }

    #[test]
    fn test_opposing_directions_cancel() {
        let p = params();
        let input = StepInput {
            forward: true,
            backward: true,
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };
        let out = controller_step(&p, input, Quat::from_rotation_y(0.3), Vec3::ZERO);
        assert!(out.force.length() < 1e-5);
        assert!(out.torque.length() < 1e-5);
    }

    #[test]
    fn test_turn_torque_signs() {
        let p = params();
        let left = controller_step(
            &p,
            StepInput {
                turn_left: true,
                ..Default::default()
            },
            Quat::IDENTITY,
            Vec3::ZERO,
        );
        assert!(left.torque.y > 0.0);

        let right = controller_step(
            &p,
            StepInput {
                turn_right: true,
                ..Default::default()
            },
            Quat::IDENTITY,
            Vec3::ZERO,
        );
        assert!(right.torque.y < 0.0);
    }

    #[test]
    fn test_jump_requires_grounded() {
        let p = MovementParams {
            grounded_epsilon: 0.1,
            ..MovementParams::default()
        };
        let input = StepInput {
            jump: true,
            ..Default::default()
        };

        // Vertical speed -0.2 with epsilon 0.1: airborne, no impulse.
        let out = controller_step(&p, input, Quat::IDENTITY, Vec3::new(0.0, -0.2, 0.0));
        assert_eq!(out.impulse, Vec3::ZERO);

        // Within epsilon: impulse applied.
        let out = controller_step(&p, input, Quat::IDENTITY, Vec3::new(0.0, -0.05, 0.0));
        assert_eq!(out.impulse, Vec3::Y * p.jump_impulse);
    }

    #[test]
    fn test_jump_held_applies_exactly_one_impulse_per_landing() {
        // Integrate a held jump under gravity at the fixed step rate with a
        // realistic body mass: the impulse fires when grounded, every
        // airborne sample (including the ones bracketing the flight apex)
        // stays outside the grounded band, and the next impulse waits for a
        // landing.
        let p = params();
        let mass = 13.44; // default 0.7 x 0.4 x 1.2 box at density 40
        let gravity = 9.81;
        let dt = 1.0 / 60.0;
        let input = StepInput {
            jump: true,
            ..Default::default()
        };

        let mut vertical_velocity = 0.0_f32;
        let mut height = 0.0_f32;
        let mut impulses = 0;
        let mut landings = 0;
        for _ in 0..240 {
            let out = controller_step(
                &p,
                input,
                Quat::IDENTITY,
                Vec3::new(0.0, vertical_velocity, 0.0),
            );
            if out.impulse != Vec3::ZERO {
                impulses += 1;
                vertical_velocity += out.impulse.y / mass;
            }

            vertical_velocity -= gravity * dt;
            height += vertical_velocity * dt;
            if height <= 0.0 {
                height = 0.0;
                if vertical_velocity < 0.0 {
                    vertical_velocity = 0.0;
                    landings += 1;
                }
            }
        }

        assert!(impulses >= 2, "jump never re-fired after landing");
        assert!(
            impulses <= landings + 1,
            "mid-air re-trigger: {impulses} impulses over {landings} landings"
        );
    }

    #[test]
    fn test_jump_combines_with_drive() {
        let p = params();
        let input = StepInput {
            forward: true,
            jump: true,
            ..Default::default()
        };
        let out = controller_step(&p, input, Quat::IDENTITY, Vec3::ZERO);
        assert!(out.force.length() > 0.0);
        assert_eq!(out.impulse, Vec3::Y * p.jump_impulse);
    }
}
