//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present the first one (by file name) that parses is used; with no
//! usable file the defaults apply. Edits to the directory are picked up at runtime
//! and pushed into the live camera controller and key bindings.
use bevy::log::{info, warn};
use bevy::prelude::{DetectChanges, Query, Res, ResMut, Resource};

use crate::player::controller::{CameraConfig, CameraController};
use crate::player::input::KeyBindings;
use crate::ron::{load_ron_files, setup_ron_watcher, LoadError, RonWatcher};
use crate::settings::Settings;

/// Directory the game reads its settings from.
pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub RonWatcher);

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(RonWatcher::stub())
    }
}

/// Load settings from `path` (a directory).
///
/// # Returns
/// The first successfully parsed `Settings`, or `Settings::default()` if none parse.
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    match items.into_iter().next() {
        Some(first) => first,
        None => {
            warn!("no settings found in '{path}', using defaults");
            Settings::defaults()
        }
    }
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns a `LoadError::Watch` if the directory cannot be watched.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, LoadError> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Reload the `Settings` resource when the settings directory changes.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.0.take_changed() {
        let reloaded = load_settings_from_dir(SETTINGS_DIR);
        if reloaded != *settings {
            info!("settings changed, reloading");
            *settings = reloaded;
        }
    }
}

/// Push changed settings into the camera tuning and key bindings.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_settings(
    settings: Res<Settings>,
    mut bindings: ResMut<KeyBindings>,
    mut cameras: Query<&mut CameraController>,
) {
    if !settings.is_changed() {
        return;
    }
    *bindings = KeyBindings::from_settings(&settings);
    let config = CameraConfig::from_settings(&settings);
    for mut controller in &mut cameras {
        controller.apply_config(config.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_settings_match_defaults() {
        assert_eq!(load_settings_from_dir(SETTINGS_DIR), Settings::default());
    }

    #[test]
    fn missing_dir_falls_back_to_defaults() {
        assert_eq!(load_settings_from_dir("data/does-not-exist"), Settings::default());
    }

    #[test]
    fn stub_watcher_never_fires() {
        let watcher = SettingsWatcher::stub();
        assert!(!watcher.0.take_changed());
    }
}
