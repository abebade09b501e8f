//! Debug orbit camera.
//!
//! Free mouse orbit around the character for inspection: mouse look adjusts
//! yaw/pitch, scroll adjusts distance. Active only while the mode state
//! machine grants it authority.

use bevy::prelude::*;
use glam::Vec3;
use leafwing_input_manager::prelude::*;

use crate::character::CharacterVisual;
use crate::input::PlayerAction;

/// Mouse sensitivity for orbit rotation (radians per pixel).
const ORBIT_SENSITIVITY: f32 = 0.005;

/// Pitch limits, kept away from the poles.
const PITCH_RANGE: (f32, f32) = (-1.2, 1.45);

/// Orbit distance limits (m).
const RADIUS_RANGE: (f32, f32) = (1.5, 40.0);

/// Spherical pose of the debug orbit camera around its target.
#[derive(Resource, Clone, Copy, Debug)]
pub struct OrbitState {
    /// Heading around the target (radians).
    pub yaw: f32,
    /// Elevation above the horizontal plane (radians).
    pub pitch: f32,
    /// Distance from the target (m).
    pub radius: f32,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.5,
            radius: 8.0,
        }
    }
}

impl OrbitState {
    /// Seed orbit angles from an existing camera/target pose so entering
    /// debug orbit does not jump.
    pub fn from_poses(camera_position: Vec3, target_position: Vec3) -> Self {
        let to_camera = camera_position - target_position;
        let radius = to_camera.length().clamp(RADIUS_RANGE.0, RADIUS_RANGE.1);
        let horizontal = Vec3::new(to_camera.x, 0.0, to_camera.z);
        let yaw = horizontal.x.atan2(horizontal.z);
        let pitch = if horizontal.length() > 1e-4 {
            (to_camera.y / to_camera.length()).asin()
        } else {
            PITCH_RANGE.1
        };
        Self { yaw, pitch, radius }
    }

    /// World-space offset from the target for the current angles.
    pub fn offset(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.pitch.cos() * self.yaw.sin(),
            self.radius * self.pitch.sin(),
            self.radius * self.pitch.cos() * self.yaw.cos(),
        )
    }
}

/// Orbit the camera around the visual proxy from mouse input.
#[allow(clippy::type_complexity)]
pub(super) fn orbit_camera_system(
    action_query: Query<&ActionState<PlayerAction>>,
    mut orbit: ResMut<OrbitState>,
    mut camera_query: Query<&mut Transform, (With<Camera3d>, Without<CharacterVisual>)>,
    target_query: Query<&Transform, (With<CharacterVisual>, Without<Camera3d>)>,
) {
    let Ok(target) = target_query.single() else {
        return;
    };

    if let Ok(action_state) = action_query.single() {
        let look = action_state.axis_pair(&PlayerAction::OrbitLook);
        orbit.yaw -= look.x * ORBIT_SENSITIVITY;
        orbit.pitch = (orbit.pitch + look.y * ORBIT_SENSITIVITY)
            .clamp(PITCH_RANGE.0, PITCH_RANGE.1);

        let scroll = action_state.clamped_value(&PlayerAction::OrbitZoom);
        if scroll != 0.0 {
            // Scale distance logarithmically for smooth zooming.
            let factor = 1.1_f32.powf(-scroll);
            orbit.radius = (orbit.radius * factor).clamp(RADIUS_RANGE.0, RADIUS_RANGE.1);
        }
    }

    for mut camera_transform in &mut camera_query {
        camera_transform.translation = target.translation + orbit.offset();
        camera_transform.look_at(target.translation, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_length_matches_radius() {
        let state = OrbitState {
            yaw: 0.7,
            pitch: 0.4,
            radius: 12.0,
        };
        assert!((state.offset().length() - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_from_poses_round_trips() {
        let target = Vec3::new(2.0, 1.0, -3.0);
        let camera = target + Vec3::new(0.0, 3.0, 6.0);
        let state = OrbitState::from_poses(camera, target);
        let reconstructed = target + state.offset();
        assert!((reconstructed - camera).length() < 1e-3);
    }
}
