//! Centralized input action definitions.
//!
//! Defines all gameplay actions using `leafwing-input-manager` for
//! declarative, rebindable input mapping. One action entity is spawned at
//! startup; systems query its `ActionState` instead of reading devices or
//! globals directly.

use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

// ============================================================================
// Action enum
// ============================================================================

/// All player actions.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum PlayerAction {
    /// Drive forward (W).
    Forward,
    /// Drive backward (S).
    Backward,
    /// Turn left (A).
    TurnLeft,
    /// Turn right (D).
    TurnRight,
    /// Jump (Space).
    Jump,
    /// Toggle between follow and debug orbit camera (N).
    ToggleCameraMode,
    /// Mouse look in debug orbit mode.
    #[actionlike(DualAxis)]
    OrbitLook,
    /// Zoom the debug orbit camera with mouse scroll.
    #[actionlike(Axis)]
    OrbitZoom,
    /// Pause/resume the simulation (P).
    TogglePause,
    /// Reset the play session (R).
    ResetSession,
    /// Toggle the diagnostics overlay (Q).
    ToggleUi,
}

// ============================================================================
// Input map
// ============================================================================

/// Create the default input map for player actions.
pub fn default_input_map() -> InputMap<PlayerAction> {
    InputMap::default()
        .with(PlayerAction::Forward, KeyCode::KeyW)
        .with(PlayerAction::Forward, KeyCode::ArrowUp)
        .with(PlayerAction::Backward, KeyCode::KeyS)
        .with(PlayerAction::Backward, KeyCode::ArrowDown)
        .with(PlayerAction::TurnLeft, KeyCode::KeyA)
        .with(PlayerAction::TurnLeft, KeyCode::ArrowLeft)
        .with(PlayerAction::TurnRight, KeyCode::KeyD)
        .with(PlayerAction::TurnRight, KeyCode::ArrowRight)
        .with(PlayerAction::Jump, KeyCode::Space)
        .with(PlayerAction::ToggleCameraMode, KeyCode::KeyN)
        .with_dual_axis(PlayerAction::OrbitLook, MouseMove::default())
        .with_axis(PlayerAction::OrbitZoom, MouseScrollAxis::Y)
        .with(PlayerAction::TogglePause, KeyCode::KeyP)
        .with(PlayerAction::ResetSession, KeyCode::KeyR)
        .with(PlayerAction::ToggleUi, KeyCode::KeyQ)
}

// ============================================================================
// Plugin
// ============================================================================

/// Plugin that registers the action type and spawns the action entity.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<PlayerAction>::default())
            .add_systems(Startup, spawn_action_entity);
    }
}

/// Spawn the single entity holding the player action state.
fn spawn_action_entity(mut commands: Commands) {
    commands.spawn((
        default_input_map(),
        ActionState::<PlayerAction>::default(),
    ));
}
