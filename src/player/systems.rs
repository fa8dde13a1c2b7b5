//! Bevy systems that drive the `CameraController` once per frame.
//!
//! Ordering inside `Update`: `gather_input` -> door interaction ->
//! `camera_update` -> `sync_camera_transform`. The grid is only ever borrowed
//! through `Res`, so the scheduler keeps the controller update from running
//! alongside anything holding `ResMut<OccupancyGrid>`.

use bevy::prelude::*;
use bevy::window::WindowFocused;

use crate::grid::OccupancyGrid;
use crate::player::controller::CameraController;
use crate::player::input::{KeyBindings, KeyboardInput};

/// Sample the bound keys into the controller and handle the mode toggle.
#[allow(clippy::needless_pass_by_value)]
pub fn gather_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut focus_events: EventReader<WindowFocused>,
    mut cameras: Query<&mut CameraController>,
) {
    let provider = KeyboardInput { keys: &keys, bindings: &bindings };
    let lost_focus = focus_events.read().any(|ev| !ev.focused);

    for mut controller in &mut cameras {
        if lost_focus {
            controller.on_focus_lost();
            continue;
        }
        if let Some(transition) = controller.read_input(&provider) {
            debug!("camera: mode -> {:?}", transition.mode);
        }
    }
}

/// Step every controller by the frame time against the shared grid.
#[allow(clippy::needless_pass_by_value)]
pub fn camera_update(time: Res<Time>, grid: Res<OccupancyGrid>, mut cameras: Query<&mut CameraController>) {
    let dt = time.delta_seconds();
    for mut controller in &mut cameras {
        controller.update(dt, &grid);
    }
}

/// Copy the controller pose into the camera transform.
pub fn sync_camera_transform(mut cameras: Query<(&CameraController, &mut Transform), Changed<CameraController>>) {
    for (controller, mut transform) in &mut cameras {
        transform.translation = controller.position();
        transform.look_to(controller.forward(), Vec3::Y);
    }
}
