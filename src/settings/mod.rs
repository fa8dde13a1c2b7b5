//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! through the RON watcher utilities (see `ron::setup_ron_watcher`). Every field
//! carries a serde default so a partial file only overrides what it names.
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::player::input::Action;

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_x: bool, // Invert mouse X axis
    #[serde(default)]
    pub invert_y: bool, // Invert mouse Y axis
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Degrees of rotation per pixel of mouse travel
    #[serde(default = "ControlsSettings::default_look_speed")]
    pub look_speed: f32, // Arrow-key look rate in degrees per second (fly mode)
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 0.1 }
    fn default_look_speed() -> f32 { 90.0 }

    fn default_keybinds() -> HashMap<String, String> {
        Action::ALL
            .iter()
            .map(|a| (a.binding_name().to_string(), a.default_key_name().to_string()))
            .collect()
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_x: false,
            invert_y: false,
            mouse_sensitivity: Self::default_sensitivity(),
            look_speed: Self::default_look_speed(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Horizontal movement and smoothing rates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovementSettings {
    #[serde(default = "MovementSettings::default_walk_speed")]
    pub walk_speed: f32, // Base speed in walk mode (units/s)
    #[serde(default = "MovementSettings::default_fly_speed")]
    pub fly_speed: f32, // Base speed in fly mode (units/s)
    #[serde(default = "MovementSettings::default_acceleration")]
    pub acceleration: f32, // Blend rate toward the target velocity while keys are held
    #[serde(default = "MovementSettings::default_damping")]
    pub damping: f32, // Blend rate back to rest once keys are released
    #[serde(default = "MovementSettings::default_sprint_multiplier")]
    pub sprint_multiplier: f32, // Speed factor reached while sprint is held
    #[serde(default = "MovementSettings::default_sprint_acceleration")]
    pub sprint_acceleration: f32, // Blend rate of the sprint factor
    #[serde(default = "MovementSettings::default_max_frame_time")]
    pub max_frame_time: f32, // Upper bound on dt fed into integration (seconds)
}

impl MovementSettings {
    fn default_walk_speed() -> f32 { 3.0 }
    fn default_fly_speed() -> f32 { 8.0 }
    fn default_acceleration() -> f32 { 12.0 }
    fn default_damping() -> f32 { 10.0 }
    fn default_sprint_multiplier() -> f32 { 2.5 }
    fn default_sprint_acceleration() -> f32 { 10.0 }
    fn default_max_frame_time() -> f32 { 0.1 }
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            walk_speed: Self::default_walk_speed(),
            fly_speed: Self::default_fly_speed(),
            acceleration: Self::default_acceleration(),
            damping: Self::default_damping(),
            sprint_multiplier: Self::default_sprint_multiplier(),
            sprint_acceleration: Self::default_sprint_acceleration(),
            max_frame_time: Self::default_max_frame_time(),
        }
    }
}

/// Vertical physics and collision tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhysicsSettings {
    #[serde(default = "PhysicsSettings::default_gravity")]
    pub gravity: f32, // Vertical acceleration while airborne (negative is down)
    #[serde(default = "PhysicsSettings::default_jump_force")]
    pub jump_force: f32, // Upward velocity applied on jump
    #[serde(default = "PhysicsSettings::default_collision_padding")]
    pub collision_padding: f32, // Look-ahead distance used when testing grid cells
}

impl PhysicsSettings {
    fn default_gravity() -> f32 { crate::player::physics::GRAVITY }
    fn default_jump_force() -> f32 { crate::player::physics::JUMP_VELOCITY }
    fn default_collision_padding() -> f32 { crate::player::collision::COLLISION_PADDING }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            jump_force: Self::default_jump_force(),
            collision_padding: Self::default_collision_padding(),
        }
    }
}

/// Collision grid dimensions. Only read when the level is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridSettings {
    #[serde(default = "GridSettings::default_size")]
    pub size: f32, // World extent covered by the grid
    #[serde(default = "GridSettings::default_segments")]
    pub segments: usize, // Cells per axis
    #[serde(default = "GridSettings::default_level")]
    pub level: String, // Layout file name in data/levels, without extension
}

impl GridSettings {
    fn default_size() -> f32 { crate::grid::DEFAULT_GRID_SIZE }
    fn default_segments() -> usize { crate::grid::DEFAULT_GRID_SEGMENTS }
    fn default_level() -> String { "escape_room".into() }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self { size: Self::default_size(), segments: Self::default_segments(), level: Self::default_level() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DebugSettings {
    #[serde(default)]
    pub show_grid: bool, // Draw blocked cells at startup (F2 toggles)
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default)]
    pub physics: PhysicsSettings,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Resolve the key bound to `action`, falling back to the action's default
    /// when the binding is missing or does not name a known key.
    #[must_use]
    pub fn key_for(&self, action: Action) -> KeyCode {
        self.controls
            .keybinds
            .get(action.binding_name())
            .and_then(|s| Self::keycode_from_str(s))
            .unwrap_or_else(|| action.default_key())
    }

    /// Convert a key identifier (e.g. `"W"`, `"Space"`, `"LShift"`, `"F3"`) into a `KeyCode`.
    ///
    /// Matching is case-insensitive. Returns `None` for unknown names.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }

        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            return FUNCTION.get(n.checked_sub(1)?).copied();
        }

        Some(match s.as_str() {
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            _ => return None,
        })
    }
}

pub mod loader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keycode_names_resolve() {
        assert_eq!(Settings::keycode_from_str("w"), Some(KeyCode::KeyW));
        assert_eq!(Settings::keycode_from_str("7"), Some(KeyCode::Digit7));
        assert_eq!(Settings::keycode_from_str("f3"), Some(KeyCode::F3));
        assert_eq!(Settings::keycode_from_str("LShift"), Some(KeyCode::ShiftLeft));
        assert_eq!(Settings::keycode_from_str("ArrowUp"), Some(KeyCode::ArrowUp));
        assert_eq!(Settings::keycode_from_str("F0"), None);
        assert_eq!(Settings::keycode_from_str("F13"), None);
        assert_eq!(Settings::keycode_from_str("Banana"), None);
    }

    #[test]
    fn every_action_has_a_resolvable_default() {
        let settings = Settings::default();
        for action in Action::ALL {
            assert_eq!(settings.key_for(action), action.default_key(), "{action:?}");
        }
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let s: Settings = ron::from_str("(movement: (walk_speed: 4.5), controls: (invert_y: true))")
            .expect("parse partial settings");
        assert!((s.movement.walk_speed - 4.5).abs() < f32::EPSILON);
        assert!((s.movement.fly_speed - 8.0).abs() < f32::EPSILON);
        assert!(s.controls.invert_y);
        assert_eq!(s.controls.keybinds.len(), Action::ALL.len());
        assert_eq!(s.physics, PhysicsSettings::default());
    }

    #[test]
    fn rebinding_falls_back_on_unknown_key() {
        let mut s = Settings::default();
        s.controls.keybinds.insert("jump".into(), "J".into());
        s.controls.keybinds.insert("sprint".into(), "nonsense".into());
        assert_eq!(s.key_for(Action::Jump), KeyCode::KeyJ);
        assert_eq!(s.key_for(Action::Sprint), KeyCode::ShiftLeft);
    }

    #[test]
    fn settings_survive_ron_round_trip() {
        let s = Settings::default();
        let text = ron::ser::to_string_pretty(&s, ron::ser::PrettyConfig::default()).unwrap();
        let back: Settings = ron::from_str(&text).unwrap();
        assert_eq!(back, s);
    }
}
