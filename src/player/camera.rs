//! Camera pose, mouse-look and cursor helpers.
//!
//! Mouse look works by warping the cursor back to the window center after
//! every move and reading the offset of the next move from that center. The
//! host must support programmatic cursor warping; `MouseLook` only tells it
//! when to warp. The first cursor report after any reset (mode change, focus
//! loss) is measured from a stale anchor, so it is dropped and only triggers a
//! warp instead of turning into a large spurious rotation.

use bevy::math::{Vec2, Vec3};
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorMoved, PrimaryWindow, WindowResized};

use crate::player::controller::{CameraController, CameraMode};

/// Pitch is clamped to ±this many degrees so the view never flips.
pub const CAMERA_MAX_PITCH_DEG: f32 = 89.0;

/// Offsets smaller than this (pixels, both axes) count as "at the center".
const MIN_MOUSE_DELTA: f32 = 0.1;

/// Position and look angles of the camera. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraPose {
    /// Rotate by the given angles and clamp pitch.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-CAMERA_MAX_PITCH_DEG, CAMERA_MAX_PITCH_DEG);
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self { position: Vec3::new(0.0, 0.0, 5.0), yaw: -90.0, pitch: 0.0 }
    }
}

/// Result of feeding one cursor position to `MouseLook`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseLookOutcome {
    /// Rotation to apply, `(yaw, pitch)` in degrees.
    pub rotation: Option<Vec2>,
    /// Whether the host should warp the cursor back to the center.
    pub recenter: bool,
}

/// Cursor re-centering state for mouse look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseLook {
    window_size: Vec2,
    center: Vec2,
    /// False until the first cursor report after a reset.
    anchored: bool,
}

impl MouseLook {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        let mut look = Self { window_size: Vec2::ZERO, center: Vec2::ZERO, anchored: false };
        look.on_window_resize(width, height);
        look
    }

    /// Track the window size; a zero height is treated as one.
    pub fn on_window_resize(&mut self, width: f32, height: f32) {
        let height = if height == 0.0 { 1.0 } else { height };
        self.window_size = Vec2::new(width, height);
        self.center = (self.window_size / 2.0).floor();
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[must_use]
    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    #[must_use]
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Forget the anchor; the next report is dropped and only triggers a re-center.
    pub fn reset(&mut self) {
        self.anchored = false;
    }

    /// Turn a cursor position into a rotation.
    ///
    /// # Arguments
    /// * `position` - cursor position in window coordinates (Y down)
    /// * `sensitivity` - degrees per pixel
    /// * `invert_x`, `invert_y` - flip the respective axis
    #[must_use]
    pub fn on_mouse_move(&mut self, position: Vec2, sensitivity: f32, invert_x: bool, invert_y: bool) -> MouseLookOutcome {
        let mut delta = Vec2::new(position.x - self.center.x, self.center.y - position.y);
        let at_center = delta.x.abs() < MIN_MOUSE_DELTA && delta.y.abs() < MIN_MOUSE_DELTA;

        if !self.anchored {
            // first report after a reset is measured from a stale anchor
            self.anchored = true;
            return MouseLookOutcome { rotation: None, recenter: !at_center };
        }
        if at_center {
            return MouseLookOutcome::default();
        }
        if invert_x {
            delta.x = -delta.x;
        }
        if invert_y {
            delta.y = -delta.y;
        }

        MouseLookOutcome { rotation: Some(delta * sensitivity), recenter: true }
    }
}

impl Default for MouseLook {
    fn default() -> Self {
        Self::new(1024.0, 720.0)
    }
}

/// Feed cursor movement into the camera controller (walk mode only).
#[allow(clippy::needless_pass_by_value)]
pub fn camera_look(mut cursor_events: EventReader<CursorMoved>, mut cameras: Query<&mut CameraController>) {
    let Ok(mut controller) = cameras.get_single_mut() else {
        cursor_events.clear();
        return;
    };
    // positions are absolute, so only the latest one matters before the next warp
    if let Some(ev) = cursor_events.read().last() {
        controller.on_mouse_move(ev.position.x, ev.position.y);
    }
}

/// Keep the controller's notion of the window center up to date.
pub fn track_window_resize(mut resize_events: EventReader<WindowResized>, mut cameras: Query<&mut CameraController>) {
    for ev in resize_events.read() {
        for mut controller in &mut cameras {
            controller.on_window_resize(ev.width, ev.height);
        }
    }
}

/// Apply cursor visibility for the current mode and perform pending re-centers.
///
/// Walk mode hides and confines the cursor; fly mode releases it.
pub fn cursor_grab(
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut cameras: Query<&mut CameraController>,
) {
    let Ok(mut window) = windows.get_single_mut() else { return };
    let Ok(mut controller) = cameras.get_single_mut() else { return };

    let walking = controller.mode() == CameraMode::Walk;
    if window.cursor.visible == walking {
        window.cursor.visible = !walking;
        window.cursor.grab_mode = if walking { CursorGrabMode::Confined } else { CursorGrabMode::None };
    }

    if controller.take_recenter_request() && walking {
        let center = controller.mouse_look().center();
        window.set_cursor_position(Some(center));
    }
}
