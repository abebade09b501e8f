//! Physics integration using Avian 3D.
//!
//! Fixed 60 Hz stepping driven from Bevy's fixed main loop; frame deltas are
//! clamped so a suspended tab or halted debugger cannot produce a runaway
//! catch-up burst. Pausing suspends virtual time only: the frame loop keeps
//! scheduling every display frame and resume is instantaneous.

use std::time::Duration;

use avian3d::prelude::*;
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::input::PlayerAction;

/// Physics step rate (Hz).
pub const PHYSICS_HZ: f64 = 60.0;

/// Largest wall-clock delta a single frame may account for.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Ground plane half-extent (m).
const GROUND_HALF_EXTENT: f32 = 200.0;

/// Ground slab thickness (m).
const GROUND_THICKNESS: f32 = 1.0;

/// Marker component for the static ground plane.
#[derive(Component)]
pub struct Ground;

/// Plugin for physics setup and the pause gate.
pub struct PhysicsIntegrationPlugin;

impl Plugin for PhysicsIntegrationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PhysicsPlugins::default())
            .insert_resource(Gravity(Vec3::NEG_Y * 9.81))
            .insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ))
            .add_systems(Startup, clamp_frame_delta)
            .add_systems(Update, toggle_pause);
    }
}

/// Clamp per-frame virtual time so resume after a long suspension does not
/// replay seconds of catch-up steps.
fn clamp_frame_delta(mut time: ResMut<Time<Virtual>>) {
    time.set_max_delta(MAX_FRAME_DELTA);
}

/// Toggle pause with P.
///
/// Pausing virtual time suppresses the fixed-step work (controller, physics)
/// while the frame loop keeps running, so resuming has no delta
/// discontinuity.
fn toggle_pause(
    action_query: Query<&ActionState<PlayerAction>>,
    mut time: ResMut<Time<Virtual>>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };
    if !action_state.just_pressed(&PlayerAction::TogglePause) {
        return;
    }

    if time.is_paused() {
        time.unpause();
        tracing::info!("Resumed");
    } else {
        time.pause();
        tracing::info!("Paused");
    }
}

/// Spawn the static ground slab with its render mesh.
///
/// The slab top sits at y = 0.
pub fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Ground,
        RigidBody::Static,
        Collider::cuboid(
            GROUND_HALF_EXTENT * 2.0,
            GROUND_THICKNESS,
            GROUND_HALF_EXTENT * 2.0,
        ),
        Mesh3d(meshes.add(Cuboid::new(
            GROUND_HALF_EXTENT * 2.0,
            GROUND_THICKNESS,
            GROUND_HALF_EXTENT * 2.0,
        ))),
        MeshMaterial3d(materials.add(StandardMaterial::from(Color::srgb(0.25, 0.3, 0.2)))),
        Transform::from_translation(Vec3::new(0.0, -GROUND_THICKNESS / 2.0, 0.0)),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct FixedSteps(u32);

    fn count_fixed_steps(mut steps: ResMut<FixedSteps>) {
        steps.0 += 1;
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Startup, clamp_frame_delta);

        app.update();

        let time = app.world().resource::<Time<Virtual>>();
        assert_eq!(time.max_delta(), MAX_FRAME_DELTA);
    }

    /// Pausing virtual time must stop fixed-step work while the frame loop
    /// keeps updating, and fixed steps must resume after unpause.
    #[test]
    fn test_pause_suppresses_fixed_steps_while_frames_run() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ))
            .init_resource::<FixedSteps>()
            .add_systems(FixedUpdate, count_fixed_steps);

        app.update();
        app.world_mut().resource_mut::<Time<Virtual>>().pause();
        let baseline = app.world().resource::<FixedSteps>().0;

        for _ in 0..10 {
            std::thread::sleep(Duration::from_millis(5));
            app.update();
        }
        assert_eq!(
            app.world().resource::<FixedSteps>().0,
            baseline,
            "fixed step ran while paused"
        );

        app.world_mut().resource_mut::<Time<Virtual>>().unpause();
        for _ in 0..200 {
            std::thread::sleep(Duration::from_millis(5));
            app.update();
            if app.world().resource::<FixedSteps>().0 > baseline {
                break;
            }
        }
        assert!(
            app.world().resource::<FixedSteps>().0 > baseline,
            "fixed step did not resume after unpause"
        );
    }
}
