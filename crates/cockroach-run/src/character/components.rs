//! Character component definitions.

use bevy::prelude::*;

use super::core::MovementParams;

/// Marker for the character's physics body entity.
///
/// The body carries no mesh; rendering happens on the [`CharacterVisual`]
/// mirror entity.
#[derive(Component)]
pub struct CharacterBody;

/// Marker for the character's visual proxy entity.
///
/// Its transform is overwritten from the physics body every frame and is
/// never authoritative over physics.
#[derive(Component)]
pub struct CharacterVisual {
    /// The physics body this proxy mirrors.
    pub body: Entity,
}

/// Which renderable the visual proxy currently shows.
///
/// The proxy spawns with a placeholder box and swaps to the loaded model when
/// (and if) the asset resolves. Sync logic does not care which variant is
/// active.
#[derive(Component, Debug, PartialEq, Eq)]
pub enum VisualModel {
    /// Placeholder box mesh, shown until the model loads.
    Placeholder,
    /// Loaded GLTF scene, attached as a child entity.
    Loaded,
}

/// Held-key flags sampled from the action state once per frame.
///
/// The controller step consumes this value, never the input devices directly,
/// so the step stays pure and headless-testable.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct ControllerInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub jump: bool,
}

/// Movement tuning for the character.
///
/// Thin component wrapper over the pure [`MovementParams`] so the sim core
/// stays free of Bevy types.
#[derive(Component, Clone, Debug, Default)]
pub struct MovementConfig(pub MovementParams);

/// Runtime state for display and diagnostics.
#[derive(Component, Default)]
pub struct CharacterState {
    /// Whether the grounded check passed on the last controller step.
    pub grounded: bool,
    /// Speed magnitude (m/s).
    pub speed: f32,
    /// Vertical velocity (m/s).
    pub vertical_velocity: f32,
}
