//! Level loading from `data/levels`.
use std::path::Path;

use bevy::log::{info, warn};

use crate::level::LevelLayout;
use crate::ron::{load_ron_file, load_ron_files, LoadError};

/// Directory the game reads level layouts from.
pub const LEVEL_DIR: &str = "data/levels";

/// Load one layout file.
///
/// # Errors
/// Returns `LoadError::Io` or `LoadError::Parse` if the file cannot be used.
pub fn load_level(path: &Path) -> Result<LevelLayout, LoadError> {
    let layout: LevelLayout = load_ron_file(path)?;
    info!("loaded level '{}' from {}", layout.name, path.display());
    Ok(layout)
}

/// Load the layout named `name` from `dir`, or the first layout there if no
/// name is given. Falls back to the built-in escape room.
#[must_use]
pub fn load_level_from_dir(dir: &str, name: Option<&str>) -> LevelLayout {
    if let Some(name) = name {
        let path = Path::new(dir).join(format!("{name}.ron"));
        match load_level(&path) {
            Ok(layout) => return layout,
            Err(e) => warn!("{e}; falling back"),
        }
    }
    let layouts: Vec<LevelLayout> = load_ron_files(dir);
    layouts.into_iter().next().unwrap_or_else(|| {
        warn!("no level found in '{dir}', using the built-in escape room");
        LevelLayout::escape_room()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("roomwalk-level-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn named_level_is_preferred() {
        let dir = temp_dir("named");
        fs::write(dir.join("a.ron"), "(name: \"a\", spawn: (1.0, 2.0))").expect("write");
        fs::write(dir.join("b.ron"), "(name: \"b\", ground_level: 0.5)").expect("write");

        let d = dir.to_str().expect("utf-8 path");
        assert_eq!(load_level_from_dir(d, Some("b")).name, "b");
        assert_eq!(load_level_from_dir(d, None).name, "a");
        assert_eq!(load_level_from_dir(d, Some("missing")).name, "a");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn shipped_layout_is_the_escape_room() {
        assert_eq!(load_level_from_dir(LEVEL_DIR, Some("escape_room")), LevelLayout::escape_room());
    }

    #[test]
    fn broken_file_reports_parse_error() {
        let dir = temp_dir("broken");
        let path = dir.join("bad.ron");
        fs::write(&path, "(walls: [oops])").expect("write");
        assert!(matches!(load_level(&path), Err(LoadError::Parse { .. })));
        assert_eq!(load_level_from_dir(dir.to_str().expect("utf-8 path"), None), LevelLayout::escape_room());
        let _ = fs::remove_dir_all(&dir);
    }
}
