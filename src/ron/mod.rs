//! Loading RON data files and watching their directories for changes.
//!
//! Settings and level layouts live as `.ron` files under `data/`. This module
//! reads them into serde types and provides a small filesystem watcher that
//! flips a shared flag when a watched directory is modified, so the game can
//! hot-reload tuning while running.

use bevy::log::warn;
use bevy::prelude::Resource;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Failure while reading a data file or setting up a watcher.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// File-watcher resource for RON hot-reload.
#[derive(Resource)]
pub struct RonWatcher {
    pub changed: Arc<Mutex<bool>>, // set to `true` when watched files change
    _watcher: Option<RecommendedWatcher>, // kept alive for the lifetime of the resource
}

impl RonWatcher {
    /// A watcher with no OS backing; `changed` never flips on its own.
    ///
    /// Used when the real watcher cannot be created (missing directory,
    /// unsupported platform) so the rest of the game runs unchanged.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(Mutex::new(false)),
            _watcher: None,
        }
    }

    /// Return whether a change was seen since the last call and clear the flag.
    ///
    /// A poisoned mutex is recovered rather than propagated; the flag is a
    /// plain bool so there is no invariant to protect.
    pub fn take_changed(&self) -> bool {
        let mut flag = match self.changed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("ron watcher mutex poisoned, recovering");
                poisoned.into_inner()
            }
        };
        std::mem::replace(&mut *flag, false)
    }
}

/// Read and deserialize a single RON file.
///
/// # Errors
/// Returns `LoadError::Io` if the file cannot be read and `LoadError::Parse`
/// if its contents do not deserialize into `T`.
pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str::<T>(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load all `.ron` files from a directory, in file-name order.
///
/// Files that fail to read or parse are skipped with a warning. A missing
/// directory yields an empty list.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(dir: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();

    paths
        .iter()
        .filter_map(|p| match load_ron_file::<T>(p) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("{e}");
                None
            }
        })
        .collect()
}

/// Watch a directory and flag modifications of anything inside it.
///
/// # Errors
/// Returns `LoadError::Watch` if the OS watcher cannot be created or the
/// directory cannot be registered.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, LoadError> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = Arc::clone(&changed);
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p)
                        .unwrap_or_else(|_| p.clone())
                        .starts_with(&watched_path)
                });
                if relevant {
                    match changed_clone.lock() {
                        Ok(mut flag) => *flag = true,
                        Err(poisoned) => *poisoned.into_inner() = true,
                    }
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        speed: f32,
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("roomwalk_ron_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_ron_file::<Sample>(Path::new("definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn bad_file_is_skipped_in_directory_load() {
        let dir = scratch_dir("skip");
        std::fs::write(dir.join("a.ron"), "(speed: 2.5)").unwrap();
        std::fs::write(dir.join("b.ron"), "(speed: ").unwrap();
        std::fs::write(dir.join("c.txt"), "(speed: 9.0)").unwrap();

        let items: Vec<Sample> = load_ron_files(dir.to_str().unwrap());
        assert_eq!(items, vec![Sample { speed: 2.5 }]);

        let err = load_ron_file::<Sample>(&dir.join("b.ron")).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn stub_watcher_reports_manual_flag_once() {
        let w = RonWatcher::stub();
        assert!(!w.take_changed());
        *w.changed.lock().unwrap() = true;
        assert!(w.take_changed());
        assert!(!w.take_changed());
    }
}
