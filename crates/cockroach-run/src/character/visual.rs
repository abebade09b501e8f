//! Visual proxy sync and model loading.
//!
//! The physics body is authoritative; the visual proxy entity mirrors its
//! transform every frame with a direct copy. The proxy starts as a
//! placeholder box and swaps to the character's GLTF model when the asset
//! resolves; a failed load keeps the placeholder indefinitely.

use avian3d::prelude::*;
use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use super::components::{CharacterVisual, VisualModel};

/// Tracks a model scene load in flight for a visual proxy.
#[derive(Component)]
pub struct PendingModel {
    /// The visual proxy entity the model belongs to.
    pub visual: Entity,
    /// Handle to the loading scene.
    pub handle: Handle<Scene>,
}

/// Copy the body transform onto the visual proxy, verbatim.
///
/// Direct copy every frame, no interpolation or smoothing: the proxy is a
/// pure read-only mirror of the physics state. Runs before the camera update
/// so the camera never sees a stale target.
#[allow(clippy::type_complexity)]
pub fn sync_visual_proxy(
    body_query: Query<(&Position, &Rotation)>,
    mut visual_query: Query<(&CharacterVisual, &mut Transform)>,
) {
    for (visual, mut transform) in &mut visual_query {
        let Ok((position, rotation)) = body_query.get(visual.body) else {
            continue;
        };
        transform.translation = position.0;
        transform.rotation = rotation.0;
    }
}

/// Observer called when a character model scene finishes loading.
///
/// Drops the placeholder box from the visual proxy and marks the model as
/// live. The physics binding is untouched; sync does not care which variant
/// is showing.
pub fn on_model_scene_ready(
    trigger: On<SceneInstanceReady>,
    mut commands: Commands,
    pending_query: Query<&PendingModel>,
    mut visual_query: Query<&mut VisualModel>,
) {
    let Ok(pending) = pending_query.get(trigger.event_target()) else {
        return;
    };

    let Ok(mut model) = visual_query.get_mut(pending.visual) else {
        return;
    };

    commands
        .entity(pending.visual)
        .remove::<(Mesh3d, MeshMaterial3d<StandardMaterial>)>();
    commands
        .entity(trigger.event_target())
        .remove::<PendingModel>();
    *model = VisualModel::Loaded;

    tracing::info!("Character model loaded, placeholder removed");
}

/// Watch pending model loads for failure.
///
/// A failed load is tolerated: log it and keep the placeholder box visible
/// for the rest of the session.
pub fn watch_model_load_failures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    pending_query: Query<(Entity, &PendingModel)>,
) {
    for (entity, pending) in &pending_query {
        if let LoadState::Failed(err) = asset_server.load_state(&pending.handle) {
            tracing::warn!("Character model failed to load, keeping placeholder: {err}");
            commands.entity(entity).remove::<PendingModel>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::components::CharacterBody;

    /// Visual proxy position/orientation after sync equals the body's exactly.
    #[test]
    fn test_sync_is_identity_copy() {
        let mut app = App::new();
        app.add_systems(Update, sync_visual_proxy);

        let body_position = Vec3::new(1.5, 0.25, -7.0);
        let body_rotation = Quat::from_rotation_y(1.1);

        let body = app
            .world_mut()
            .spawn((
                CharacterBody,
                Position(body_position),
                Rotation(body_rotation),
            ))
            .id();
        let visual = app
            .world_mut()
            .spawn((CharacterVisual { body }, Transform::default()))
            .id();

        app.update();

        let transform = app.world().get::<Transform>(visual).unwrap();
        assert_eq!(transform.translation, body_position);
        assert_eq!(transform.rotation, body_rotation);
    }

    /// Sync with no body is a silent no-op, not an error.
    #[test]
    fn test_sync_without_body_is_noop() {
        let mut app = App::new();
        app.add_systems(Update, sync_visual_proxy);

        let body = app.world_mut().spawn_empty().id();
        let visual = app
            .world_mut()
            .spawn((
                CharacterVisual { body },
                Transform::from_translation(Vec3::splat(3.0)),
            ))
            .id();

        app.update();

        let transform = app.world().get::<Transform>(visual).unwrap();
        assert_eq!(transform.translation, Vec3::splat(3.0));
    }
}
