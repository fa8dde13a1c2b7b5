//! First-person camera: input, orientation, smoothing, jumping and collision.
//!
//! The pure locomotion core lives in `controller` and the modules it composes;
//! `systems` and the cursor helpers in `camera` connect it to Bevy.
//!
//! # Example:
//!
//! ```ignore
//! commands.spawn((
//!     Camera3dBundle::default(),
//!     CameraController::new(CameraConfig::from_settings(&settings), 1280.0, 720.0),
//! ));
//! app.add_systems(Update, (gather_input, camera_update, sync_camera_transform).chain());
//! ```
pub mod camera;
pub mod collision;
pub mod controller;
pub mod input;
pub mod movement;
pub mod orientation;
pub mod physics;
pub mod systems;

pub use camera::{camera_look, cursor_grab, track_window_resize, CameraPose, MouseLook};
pub use controller::{CameraConfig, CameraController, CameraMode, ModeTransition};
pub use input::{Action, InputProvider, InputState, KeyBindings};
pub use orientation::OrientationBasis;
pub use systems::{camera_update, gather_input, sync_camera_transform};
