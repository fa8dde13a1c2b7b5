//! Player-related small systems.
//!
//! This module contains small per-player systems kept separate so the
//! main application file remains compact.
use bevy::prelude::*;
use roomwalk::player::CameraController;

/// Marker for the point light that follows the camera.
#[derive(Component)]
pub struct PlayerFillLight;

/// Follow the player camera with a small local fill light.
///
/// This system moves the `PlayerFillLight` transform to match the camera
/// position each frame. It silently no-ops if there is no camera.
///
/// # Arguments
/// - `camera_query`: Query for the camera controller.
/// - `lights`: Query for transforms tagged with `PlayerFillLight` to update.
#[allow(clippy::needless_pass_by_value)]
pub fn update_player_fill_light(
    camera_query: Query<&CameraController>,
    mut lights: Query<&mut Transform, With<PlayerFillLight>>,
) {
    if let Ok(cam) = camera_query.get_single() {
        let pos = cam.position();
        for mut t in &mut lights {
            t.translation = pos;
        }
    }
}
