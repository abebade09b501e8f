//! Character controller systems.
//!
//! Input is sampled into [`ControllerInput`] once per render frame; the fixed
//! step feeds it through the pure [`core`](super::core) math and hands the
//! resulting forces to Avian. The controller never writes position or
//! orientation; integration is entirely the physics engine's.

use avian3d::prelude::*;
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use super::components::{CharacterBody, CharacterState, ControllerInput, MovementConfig};
use super::core::{self, StepInput};
use crate::input::PlayerAction;

/// Sample held actions into the character's [`ControllerInput`].
///
/// Runs before the fixed main loop so every physics step this frame sees the
/// same sampled flags.
pub fn capture_controller_input(
    action_query: Query<&ActionState<PlayerAction>>,
    mut query: Query<&mut ControllerInput, With<CharacterBody>>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    for mut input in &mut query {
        input.forward = action_state.pressed(&PlayerAction::Forward);
        input.backward = action_state.pressed(&PlayerAction::Backward);
        input.turn_left = action_state.pressed(&PlayerAction::TurnLeft);
        input.turn_right = action_state.pressed(&PlayerAction::TurnRight);
        input.jump = action_state.pressed(&PlayerAction::Jump);
    }
}

/// Apply one controller step to the character body.
///
/// Runs once per fixed timestep. Forces and torques are handed to Avian as
/// non-persistent accumulators, which the engine clears after integrating
/// each step; nothing here needs zeroing manually. If no body exists yet
/// (session not started, mid-reset), the query is empty and the step is a
/// silent no-op.
#[allow(clippy::type_complexity)]
pub fn controller_step_system(
    mut query: Query<
        (
            &ControllerInput,
            &MovementConfig,
            Forces,
            &mut CharacterState,
        ),
        With<CharacterBody>,
    >,
) {
    for (input, config, mut forces, mut state) in &mut query {
        let step_input = StepInput {
            forward: input.forward,
            backward: input.backward,
            turn_left: input.turn_left,
            turn_right: input.turn_right,
            jump: input.jump,
        };

        let rotation = forces.rotation().0;
        let velocity = forces.linear_velocity();
        let out = core::controller_step(&config.0, step_input, rotation, velocity);

        forces.apply_force(out.force);
        forces.apply_torque(out.torque);
        if out.impulse != Vec3::ZERO {
            forces.apply_linear_impulse(out.impulse);
        }

        state.grounded = core::is_grounded(velocity.y, config.0.grounded_epsilon);
        state.speed = velocity.length();
        state.vertical_velocity = velocity.y;
    }
}
