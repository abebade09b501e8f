//! Physics-driven cockroach sandbox with a third-person follow camera.
//!
//! The character is a dynamic rigid body driven by forces and torques; a
//! separate visual proxy mirrors it for rendering and the camera follows the
//! proxy. This library exposes the full module tree so the headless
//! controller simulator can reuse the same systems as the windowed app.
//!
//! Character models load from `assets/models/` when present. The repository
//! ships no model binaries; without them each character renders as its
//! placeholder box, which is the supported fallback, not an error.

pub mod camera;
pub mod character;
pub mod input;
pub mod launch_params;
pub mod physics;
pub mod ui;

use bevy::prelude::*;

use camera::{CameraControllerPlugin, FollowCameraConfig};
use character::CharacterPlugin;
use input::InputPlugin;
use physics::PhysicsIntegrationPlugin;
use ui::DebugUiPlugin;

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            InputPlugin,
            PhysicsIntegrationPlugin,
            CharacterPlugin,
            CameraControllerPlugin,
            DebugUiPlugin,
        ))
        .add_systems(Startup, setup_scene);
    }
}

/// Set up the initial 3D scene: camera, lights, and ground.
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // The follow camera snaps this transform on the first update; the initial
    // pose only matters for the frame before the character exists.
    commands.spawn((
        Camera3d::default(),
        FollowCameraConfig::default(),
        Transform::from_translation(Vec3::new(0.0, 3.0, 6.0)).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));

    commands.insert_resource(GlobalAmbientLight {
        brightness: 300.0,
        ..default()
    });

    physics::spawn_ground(&mut commands, &mut meshes, &mut materials);

    tracing::info!("Scene setup complete - WASD to move, Space to jump, N for debug camera");
}
