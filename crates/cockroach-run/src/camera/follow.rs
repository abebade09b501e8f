//! Third-person follow camera.
//!
//! The camera pose is fully derived from the target's transform each frame:
//! position is the target plus an orientation-rotated offset, look-at is the
//! target raised by a small bias. Snap policy, no smoothing: the pose is
//! assigned exactly, so camera-to-target distance is constant for every
//! heading.

use bevy::prelude::*;
use glam::{Quat, Vec3};

use crate::character::CharacterVisual;

/// Configuration for the follow camera rig.
#[derive(Component, Clone, Debug)]
pub struct FollowCameraConfig {
    /// Camera offset in target-local space (x=right, y=up, z=backward).
    pub offset: Vec3,
    /// How far above the target's origin to aim the look-at point.
    pub look_height: f32,
}

impl Default for FollowCameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 3.0, 6.0),
            look_height: 0.5,
        }
    }
}

/// A derived camera pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowPose {
    /// World-space camera position.
    pub position: Vec3,
    /// World-space look-at point.
    pub look_target: Vec3,
}

/// Derive the follow camera pose for a target transform.
///
/// The offset is rotated by the target's orientation so the camera stays
/// behind the target regardless of heading.
pub fn follow_pose(
    target_position: Vec3,
    target_rotation: Quat,
    config: &FollowCameraConfig,
) -> FollowPose {
    FollowPose {
        position: target_position + target_rotation * config.offset,
        look_target: target_position + Vec3::Y * config.look_height,
    }
}

/// Place the camera behind the visual proxy, looking at it.
///
/// Reads the proxy (not the physics body) so the camera target is exactly
/// what is on screen, and runs after visual sync so it is never stale.
#[allow(clippy::type_complexity)]
pub(super) fn follow_camera_system(
    mut camera_query: Query<
        (&FollowCameraConfig, &mut Transform),
        (With<Camera3d>, Without<CharacterVisual>),
    >,
    target_query: Query<&Transform, (With<CharacterVisual>, Without<Camera3d>)>,
) {
    let Ok(target) = target_query.single() else {
        return;
    };

    for (config, mut camera_transform) in &mut camera_query {
        let pose = follow_pose(target.translation, target.rotation, config);
        camera_transform.translation = pose.position;
        camera_transform.look_at(pose.look_target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_rest_pose_scenario() {
        // Body at rest at origin, identity orientation, offset (0, 3, 6):
        // camera at (0, 3, 6) looking at (0, look_height, 0).
        let config = FollowCameraConfig::default();
        let pose = follow_pose(Vec3::ZERO, Quat::IDENTITY, &config);
        assert_eq!(pose.position, Vec3::new(0.0, 3.0, 6.0));
        assert_eq!(pose.look_target, Vec3::new(0.0, config.look_height, 0.0));
    }

    #[test]
    fn test_offset_rotates_with_heading() {
        let config = FollowCameraConfig::default();
        let target = Vec3::new(4.0, 0.5, -2.0);

        for i in 0..24 {
            let theta = (i as f32) * TAU / 24.0;
            let rotation = Quat::from_rotation_y(theta);
            let pose = follow_pose(target, rotation, &config);
            let expected = target + rotation * config.offset;
            assert!(
                (pose.position - expected).length() < 1e-4,
                "yaw {theta}: {:?} vs {expected:?}",
                pose.position
            );
        }
    }

    #[test]
    fn test_distance_to_target_is_constant() {
        // Snap policy property: |camera - target| == |offset| for all
        // orientations.
        let config = FollowCameraConfig::default();
        let expected = config.offset.length();

        for i in 0..24 {
            let theta = (i as f32) * TAU / 24.0;
            let rotation = Quat::from_rotation_y(theta) * Quat::from_rotation_x(theta * 0.3);
            let pose = follow_pose(Vec3::new(1.0, 2.0, 3.0), rotation, &config);
            let distance = (pose.position - Vec3::new(1.0, 2.0, 3.0)).length();
            assert!((distance - expected).abs() < 1e-4, "yaw {theta}: {distance}");
        }
    }

    #[test]
    fn test_look_target_tracks_position_not_heading() {
        let config = FollowCameraConfig::default();
        let target = Vec3::new(-3.0, 1.0, 9.0);
        let pose = follow_pose(target, Quat::from_rotation_y(1.2), &config);
        assert_eq!(pose.look_target, target + Vec3::Y * config.look_height);
    }
}
