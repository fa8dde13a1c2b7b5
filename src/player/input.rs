//! Logical input actions, the held-input state and the keyboard provider.
//!
//! The controller never looks at key codes. Hosts either feed it discrete
//! `on_key_down`/`on_key_up` events or sample an [`InputProvider`] once per
//! frame; both paths end up in the same [`InputState`].

use bevy::input::ButtonInput;
use bevy::math::Vec2;
use bevy::prelude::{KeyCode, Resource};
use std::collections::HashMap;

use crate::settings::Settings;

/// Everything the player can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
    FlyUp,
    FlyDown,
    Sprint,
    Jump,
    ToggleMode,
    Interact,
    ToggleDebugGrid,
    DebugDump,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::LookUp,
        Action::LookDown,
        Action::LookLeft,
        Action::LookRight,
        Action::FlyUp,
        Action::FlyDown,
        Action::Sprint,
        Action::Jump,
        Action::ToggleMode,
        Action::Interact,
        Action::ToggleDebugGrid,
        Action::DebugDump,
    ];

    /// Name used for this action in `controls.keybinds`.
    #[must_use]
    pub fn binding_name(self) -> &'static str {
        match self {
            Action::MoveForward => "forward",
            Action::MoveBack => "back",
            Action::StrafeLeft => "left",
            Action::StrafeRight => "right",
            Action::LookUp => "look_up",
            Action::LookDown => "look_down",
            Action::LookLeft => "look_left",
            Action::LookRight => "look_right",
            Action::FlyUp => "fly_up",
            Action::FlyDown => "fly_down",
            Action::Sprint => "sprint",
            Action::Jump => "jump",
            Action::ToggleMode => "toggle_mode",
            Action::Interact => "interact",
            Action::ToggleDebugGrid => "toggle_grid",
            Action::DebugDump => "dump_debug",
        }
    }

    /// Key identifier written into fresh settings files.
    #[must_use]
    pub fn default_key_name(self) -> &'static str {
        match self {
            Action::MoveForward => "W",
            Action::MoveBack => "S",
            Action::StrafeLeft => "A",
            Action::StrafeRight => "D",
            Action::LookUp => "Up",
            Action::LookDown => "Down",
            Action::LookLeft => "Left",
            Action::LookRight => "Right",
            Action::FlyUp => "E",
            Action::FlyDown => "Q",
            Action::Sprint => "LShift",
            Action::Jump => "Space",
            Action::ToggleMode => "P",
            Action::Interact => "F",
            Action::ToggleDebugGrid => "F2",
            Action::DebugDump => "F3",
        }
    }

    #[must_use]
    pub fn default_key(self) -> KeyCode {
        match self {
            Action::MoveForward => KeyCode::KeyW,
            Action::MoveBack => KeyCode::KeyS,
            Action::StrafeLeft => KeyCode::KeyA,
            Action::StrafeRight => KeyCode::KeyD,
            Action::LookUp => KeyCode::ArrowUp,
            Action::LookDown => KeyCode::ArrowDown,
            Action::LookLeft => KeyCode::ArrowLeft,
            Action::LookRight => KeyCode::ArrowRight,
            Action::FlyUp => KeyCode::KeyE,
            Action::FlyDown => KeyCode::KeyQ,
            Action::Sprint => KeyCode::ShiftLeft,
            Action::Jump => KeyCode::Space,
            Action::ToggleMode => KeyCode::KeyP,
            Action::Interact => KeyCode::KeyF,
            Action::ToggleDebugGrid => KeyCode::F2,
            Action::DebugDump => KeyCode::F3,
        }
    }
}

/// Source of per-frame input, implemented per platform outside the core.
pub trait InputProvider {
    /// Level-triggered: is the action currently held.
    fn pressed(&self, action: Action) -> bool;
    /// Edge-triggered: did the action go down this frame.
    fn just_pressed(&self, action: Action) -> bool;
}

/// Held-input flags read by one `CameraController::update` call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub move_forward: bool,
    pub move_back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub look_up: bool,
    pub look_down: bool,
    pub look_left: bool,
    pub look_right: bool,
    pub fly_up: bool,
    pub fly_down: bool,
    pub sprint: bool,
    pub jump_requested: bool,
    /// Last cursor position reported by the host, window coordinates.
    pub mouse: Option<Vec2>,
}

impl InputState {
    /// Record a press or release of a held action.
    ///
    /// `Jump` is latched on press and consumed by the next update. Edge-only
    /// actions (`ToggleMode`, `Interact`, debug keys) carry no held state.
    pub fn set_action(&mut self, action: Action, down: bool) {
        match action {
            Action::MoveForward => self.move_forward = down,
            Action::MoveBack => self.move_back = down,
            Action::StrafeLeft => self.strafe_left = down,
            Action::StrafeRight => self.strafe_right = down,
            Action::LookUp => self.look_up = down,
            Action::LookDown => self.look_down = down,
            Action::LookLeft => self.look_left = down,
            Action::LookRight => self.look_right = down,
            Action::FlyUp => self.fly_up = down,
            Action::FlyDown => self.fly_down = down,
            Action::Sprint => self.sprint = down,
            Action::Jump => self.jump_requested |= down,
            Action::ToggleMode | Action::Interact | Action::ToggleDebugGrid | Action::DebugDump => {}
        }
    }

    /// Refresh every held flag from a provider and latch a jump press.
    pub fn sample<P: InputProvider + ?Sized>(&mut self, provider: &P) {
        for action in Action::ALL {
            if action == Action::Jump {
                self.jump_requested |= provider.just_pressed(Action::Jump);
            } else {
                self.set_action(action, provider.pressed(action));
            }
        }
    }

    #[must_use]
    pub fn has_horizontal_input(&self) -> bool {
        self.move_forward || self.move_back || self.strafe_left || self.strafe_right
    }

    #[must_use]
    pub fn has_vertical_input(&self) -> bool {
        self.fly_up || self.fly_down
    }

    /// Drop every held flag, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        *self = InputState { mouse: self.mouse, ..InputState::default() };
    }
}

/// Action → key mapping resolved from settings.
#[derive(Resource, Debug, Clone)]
pub struct KeyBindings(HashMap<Action, KeyCode>);

impl KeyBindings {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self(Action::ALL.iter().map(|a| (*a, settings.key_for(*a))).collect())
    }

    #[must_use]
    pub fn key(&self, action: Action) -> KeyCode {
        self.0.get(&action).copied().unwrap_or_else(|| action.default_key())
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// [`InputProvider`] backed by Bevy's keyboard state.
pub struct KeyboardInput<'a> {
    pub keys: &'a ButtonInput<KeyCode>,
    pub bindings: &'a KeyBindings,
}

impl InputProvider for KeyboardInput<'_> {
    fn pressed(&self, action: Action) -> bool {
        self.keys.pressed(self.bindings.key(action))
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.keys.just_pressed(self.bindings.key(action))
    }
}
