//! Physics-driven character: body, controller, visual proxy, session.
//!
//! One `CharacterController`-shaped module instead of per-file globals: the
//! body, its input, and its tuning are components on entities, constructed
//! with explicit dependencies and torn down when the session resets.

pub mod components;
pub mod controller;
pub mod core;
pub mod visual;

use avian3d::prelude::*;
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

pub use components::{
    CharacterBody, CharacterState, CharacterVisual, ControllerInput, MovementConfig, VisualModel,
};
pub use self::core::MovementParams;

use crate::input::PlayerAction;
use crate::launch_params::LaunchParams;

/// Character spawn height above the ground plane.
const SPAWN_HEIGHT: f32 = 1.0;

/// Linear damping on the character body; keeps drive forces from
/// accelerating without bound.
const LINEAR_DAMPING: f32 = 0.4;

/// Angular damping on the character body; settles yaw when turn keys are
/// released.
const ANGULAR_DAMPING: f32 = 2.0;

/// System set for the visual proxy sync, so the camera can order after it.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualSyncSet;

// ============================================================================
// Character definitions
// ============================================================================

/// A selectable character type.
#[derive(Clone)]
pub struct CharacterDefinition {
    /// Identifier used for selection from launch parameters.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Path to the GLTF model asset. The file is optional on disk; when it
    /// is absent the visual proxy keeps its placeholder box.
    pub model_path: &'static str,
    /// Scale multiplier for the model scene.
    pub model_scale: f32,
    /// Collision box half-extents (m).
    pub half_extents: Vec3,
    /// Mass density for the physics body.
    pub density: f32,
    /// Movement tuning.
    pub movement: MovementParams,
}

/// Available character definitions.
#[derive(Resource)]
pub struct CharacterDefinitions {
    pub characters: Vec<CharacterDefinition>,
}

impl Default for CharacterDefinitions {
    fn default() -> Self {
        Self {
            characters: vec![
                CharacterDefinition {
                    name: "scout",
                    description: "Light and quick, modest jump",
                    model_path: "models/roach_scout.glb",
                    model_scale: 1.0,
                    half_extents: Vec3::new(0.35, 0.2, 0.6),
                    density: 40.0,
                    movement: MovementParams::default(),
                },
                CharacterDefinition {
                    name: "bruiser",
                    description: "Heavy, slow to turn, strong jump",
                    model_path: "models/roach_bruiser.glb",
                    model_scale: 1.4,
                    half_extents: Vec3::new(0.45, 0.25, 0.8),
                    density: 70.0,
                    movement: MovementParams {
                        move_force: 28.0,
                        turn_torque: 5.0,
                        jump_impulse: 170.0,
                        grounded_epsilon: 0.02,
                    },
                },
            ],
        }
    }
}

/// Index of the character selected for this session.
#[derive(Resource, Default)]
pub struct SelectedCharacter(pub usize);

// ============================================================================
// Plugin
// ============================================================================

/// Plugin for the character controller and play session.
pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CharacterDefinitions>()
            .init_resource::<SelectedCharacter>()
            .add_systems(Startup, (select_character, spawn_session).chain())
            .add_systems(
                RunFixedMainLoop,
                controller::capture_controller_input
                    .in_set(RunFixedMainLoopSystems::BeforeFixedMainLoop),
            )
            .add_systems(FixedUpdate, controller::controller_step_system)
            .add_systems(
                Update,
                (
                    visual::sync_visual_proxy.in_set(VisualSyncSet),
                    visual::watch_model_load_failures,
                    reset_session,
                ),
            )
            .add_observer(visual::on_model_scene_ready);
    }
}

/// Resolve the launch-parameter character name to an index.
///
/// An unknown name is tolerated: warn and fall back to the first definition.
fn select_character(
    params: Res<LaunchParams>,
    definitions: Res<CharacterDefinitions>,
    mut selected: ResMut<SelectedCharacter>,
) {
    match definitions
        .characters
        .iter()
        .position(|def| def.name == params.character)
    {
        Some(index) => selected.0 = index,
        None => {
            tracing::warn!(
                "Unknown character '{}', using '{}'",
                params.character,
                definitions.characters[0].name
            );
            selected.0 = 0;
        }
    }
}

/// Spawn the character body and visual proxy pair.
fn spawn_session(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    definitions: Res<CharacterDefinitions>,
    selected: Res<SelectedCharacter>,
) {
    let def = &definitions.characters[selected.0];
    spawn_character(
        &mut commands,
        &mut meshes,
        &mut materials,
        &asset_server,
        def,
    );
    tracing::info!("Play session started with character '{}'", def.name);
}

/// Reset the play session with R: despawn the pair and respawn at origin.
#[allow(clippy::too_many_arguments)]
fn reset_session(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    definitions: Res<CharacterDefinitions>,
    selected: Res<SelectedCharacter>,
    action_query: Query<&ActionState<PlayerAction>>,
    body_query: Query<Entity, With<CharacterBody>>,
    visual_query: Query<Entity, With<CharacterVisual>>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };
    if !action_state.just_pressed(&PlayerAction::ResetSession) {
        return;
    }

    for entity in body_query.iter().chain(visual_query.iter()) {
        commands.entity(entity).despawn();
    }

    let def = &definitions.characters[selected.0];
    spawn_character(
        &mut commands,
        &mut meshes,
        &mut materials,
        &asset_server,
        def,
    );
    tracing::info!("Session reset");
}

/// Spawn a character body plus its visual proxy from a definition.
///
/// The body owns all physics state; the visual starts as a placeholder box
/// with the GLTF model loading into it as a child.
pub fn spawn_character(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    def: &CharacterDefinition,
) -> Entity {
    let spawn = Vec3::new(0.0, SPAWN_HEIGHT, 0.0);
    let he = def.half_extents;

    let body = commands
        .spawn((
            CharacterBody,
            ControllerInput::default(),
            MovementConfig(def.movement.clone()),
            CharacterState::default(),
            RigidBody::Dynamic,
            Collider::cuboid(he.x * 2.0, he.y * 2.0, he.z * 2.0),
            ColliderDensity(def.density),
            LinearDamping(LINEAR_DAMPING),
            AngularDamping(ANGULAR_DAMPING),
            Transform::from_translation(spawn),
            LinearVelocity::default(),
            AngularVelocity::default(),
        ))
        .id();

    let visual = commands
        .spawn((
            CharacterVisual { body },
            VisualModel::Placeholder,
            Mesh3d(meshes.add(Cuboid::new(he.x * 2.0, he.y * 2.0, he.z * 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial::from(Color::srgb(0.45, 0.27, 0.12)))),
            Transform::from_translation(spawn),
        ))
        .id();

    let handle: Handle<Scene> =
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(def.model_path));
    let model = commands
        .spawn((
            SceneRoot(handle.clone()),
            Transform::from_scale(Vec3::splat(def.model_scale)),
            visual::PendingModel { visual, handle },
        ))
        .id();
    commands.entity(visual).add_child(model);

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::core::{self, StepInput};
    use glam::Quat;

    /// Every shipped character must satisfy the held-jump contract under
    /// real gravity at the fixed step rate: one impulse per landing, no
    /// re-trigger at the flight apex. Guards the tuning constants, not just
    /// the step function; an epsilon at or above the per-step gravity
    /// decrement makes an apex sample read as grounded.
    #[test]
    fn test_roster_held_jump_fires_once_per_landing() {
        let gravity = 9.81;
        let dt = 1.0 / 60.0;
        let input = StepInput {
            jump: true,
            ..Default::default()
        };

        for def in CharacterDefinitions::default().characters {
            let he = def.half_extents;
            let mass = def.density * 8.0 * he.x * he.y * he.z;

            let mut vertical_velocity = 0.0_f32;
            let mut height = 0.0_f32;
            let mut impulses = 0;
            let mut landings = 0;
            for _ in 0..240 {
                let out = core::controller_step(
                    &def.movement,
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

            assert!(
                impulses >= 2,
                "{}: jump never re-fired after landing",
                def.name
            );
            assert!(
                impulses <= landings + 1,
                "{}: mid-air re-trigger, {impulses} impulses over {landings} landings",
                def.name
            );
        }
    }

    /// Takeoff speed must clear the grounded band by a wide margin, and the
    /// band must be narrower than the velocity change of a single fixed
    /// step.
    #[test]
    fn test_roster_tuning_margins() {
        let gravity_step = 9.81 / 60.0;

        for def in CharacterDefinitions::default().characters {
            let he = def.half_extents;
            let mass = def.density * 8.0 * he.x * he.y * he.z;
            let takeoff = def.movement.jump_impulse / mass;

            assert!(
                def.movement.grounded_epsilon < gravity_step / 2.0,
                "{}: grounded band {} too wide for a {} m/s gravity step",
                def.name,
                def.movement.grounded_epsilon,
                gravity_step
            );
            assert!(
                takeoff > 1.0,
                "{}: takeoff speed {takeoff} m/s is not a real jump",
                def.name
            );
        }
    }
}
