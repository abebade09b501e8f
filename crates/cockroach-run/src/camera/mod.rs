//! Camera modes and the follow/debug-orbit state machine.
//!
//! Camera authority is an explicit two-state machine rather than a scattered
//! debug flag:
//!
//! - **Follow**: third-person follow camera, fully derived from the
//!   character's transform each frame. Initial/default state.
//! - **DebugOrbit**: free mouse orbit around the character for inspection.
//!
//! The states are mutually exclusive by construction: each mode's systems run
//! only under its own run condition. Mode changes go through
//! [`CameraModeTransitions`] so entry state is set up consistently.

mod follow;
mod orbit;

use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

pub use follow::{FollowCameraConfig, follow_pose};
pub use orbit::OrbitState;

use crate::character::VisualSyncSet;
use crate::input::PlayerAction;

// ============================================================================
// Camera mode
// ============================================================================

/// Camera authority.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(not(target_family = "wasm"), derive(clap::ValueEnum))]
pub enum CameraMode {
    /// Third-person follow camera (default).
    #[default]
    Follow,
    /// Free orbit camera for debugging.
    DebugOrbit,
}

/// Camera mode state machine.
#[derive(Resource, Default)]
pub struct CameraModeState {
    current: CameraMode,
}

impl CameraModeState {
    /// Get the current camera mode.
    pub fn current(&self) -> CameraMode {
        self.current
    }

    /// Check if the follow camera has authority.
    pub fn is_follow(&self) -> bool {
        self.current == CameraMode::Follow
    }

    /// Check if the debug orbit camera has authority.
    pub fn is_debug_orbit(&self) -> bool {
        self.current == CameraMode::DebugOrbit
    }
}

/// Pending camera mode transition requests.
#[derive(Resource, Default)]
pub struct CameraModeTransitions {
    pending: Vec<CameraMode>,
}

impl CameraModeTransitions {
    /// Request a transition to the given mode.
    pub fn request(&mut self, mode: CameraMode) {
        self.pending.push(mode);
    }

    /// Take all pending transitions for processing.
    fn take(&mut self) -> Vec<CameraMode> {
        std::mem::take(&mut self.pending)
    }
}

// ============================================================================
// Plugin
// ============================================================================

/// Plugin for camera control and mode management.
pub struct CameraControllerPlugin;

impl Plugin for CameraControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraModeState>()
            .init_resource::<CameraModeTransitions>()
            .init_resource::<OrbitState>()
            .add_systems(
                Update,
                (
                    toggle_camera_mode,
                    process_mode_transitions,
                    follow::follow_camera_system.run_if(is_follow_mode),
                    orbit::orbit_camera_system.run_if(is_debug_orbit_mode),
                )
                    .chain()
                    .after(VisualSyncSet),
            )
            .add_systems(PostStartup, apply_initial_camera_mode);
    }
}

/// Run condition: follow camera has authority.
fn is_follow_mode(state: Res<CameraModeState>) -> bool {
    state.is_follow()
}

/// Run condition: debug orbit camera has authority.
fn is_debug_orbit_mode(state: Res<CameraModeState>) -> bool {
    state.is_debug_orbit()
}

/// Apply the initial camera mode from launch params.
fn apply_initial_camera_mode(
    params: Res<crate::launch_params::LaunchParams>,
    mut transitions: ResMut<CameraModeTransitions>,
) {
    if params.camera_mode != CameraMode::default() {
        transitions.request(params.camera_mode);
    }
}

/// Toggle between the two camera modes with N.
fn toggle_camera_mode(
    action_query: Query<&ActionState<PlayerAction>>,
    state: Res<CameraModeState>,
    mut transitions: ResMut<CameraModeTransitions>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };
    if !action_state.just_pressed(&PlayerAction::ToggleCameraMode) {
        return;
    }

    match state.current() {
        CameraMode::Follow => transitions.request(CameraMode::DebugOrbit),
        CameraMode::DebugOrbit => transitions.request(CameraMode::Follow),
    }
}

/// Process camera mode transition requests.
///
/// Entering DebugOrbit seeds the orbit angles from the camera's current pose
/// so the handoff is seamless; entering Follow needs no setup, the follow
/// camera snaps to its derived pose on the next update.
fn process_mode_transitions(
    mut transitions: ResMut<CameraModeTransitions>,
    mut state: ResMut<CameraModeState>,
    mut orbit_state: ResMut<OrbitState>,
    camera_query: Query<&Transform, With<Camera3d>>,
    target_query: Query<&Transform, (With<crate::character::CharacterVisual>, Without<Camera3d>)>,
) {
    for mode in transitions.take() {
        if mode == state.current {
            continue;
        }

        if mode == CameraMode::DebugOrbit
            && let (Ok(camera), Ok(target)) = (camera_query.single(), target_query.single())
        {
            *orbit_state = OrbitState::from_poses(camera.translation, target.translation);
        }

        state.current = mode;
        tracing::info!("Camera mode: {:?}", mode);
    }
}
