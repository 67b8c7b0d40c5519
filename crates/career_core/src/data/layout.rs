//! Game directory layout.
//!
//! Resolution order for the root directory:
//! 1) an explicit path (CLI `--data`)
//! 2) `CAREER_DATA_DIR` if set
//! 3) the current directory

use std::env;
use std::path::{Path, PathBuf};

use crate::error::PathKind;

/// Env var overriding the game directory.
pub const DATA_DIR_ENV: &str = "CAREER_DATA_DIR";

pub const DATABASE_DIR: &str = "database/";
pub const SAVES_DIR: &str = "saves/";
pub const SETUPS_DIR: &str = "setups/";
pub const CUSTOMISATION_DIR: &str = "customisation/";
pub const NAMES_DIR: &str = "database/names/";

pub const NATIONS_FILE: &str = "database/nations.yaml";
pub const LEAGUES_FILE: &str = "database/leagues.yaml";
pub const POSITIONS_FILE: &str = "database/positions.yaml";
pub const TRAITS_FILE: &str = "database/traits.yaml";
pub const FRAMES_FILE: &str = "database/frames.yaml";
pub const SETTINGS_FILE: &str = "customisation/settings.yaml";
pub const STYLE_FILE: &str = "customisation/style.yaml";

/// A path ingestion checks before running any loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredPath {
    /// Relative to the game directory, as shown in error messages.
    pub relative: &'static str,
    pub kind: PathKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        if let Ok(path) = env::var(DATA_DIR_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Self::new(trimmed);
            }
        }
        Self::new(env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative.trim_end_matches('/'))
    }

    pub fn names_dir(&self) -> PathBuf {
        self.path(NAMES_DIR)
    }

    pub fn setups_dir(&self) -> PathBuf {
        self.path(SETUPS_DIR)
    }

    /// Directories first, then every reference file.
    pub fn required_paths() -> Vec<RequiredPath> {
        let dirs = [DATABASE_DIR, SAVES_DIR, SETUPS_DIR, CUSTOMISATION_DIR]
            .into_iter()
            .map(|relative| RequiredPath { relative, kind: PathKind::Directory });
        let files = [
            SETTINGS_FILE,
            STYLE_FILE,
            NATIONS_FILE,
            POSITIONS_FILE,
            TRAITS_FILE,
            FRAMES_FILE,
            LEAGUES_FILE,
        ]
        .into_iter()
        .map(|relative| RequiredPath { relative, kind: PathKind::File });
        dirs.chain(files).collect()
    }

    pub fn exists(&self, required: &RequiredPath) -> bool {
        let path = self.path(required.relative);
        match required.kind {
            PathKind::Directory => path.is_dir(),
            PathKind::File => path.is_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_path_wins() {
        let layout = DataLayout::resolve(Some(Path::new("/tmp/game")));
        assert_eq!(layout.root(), Path::new("/tmp/game"));
        assert_eq!(layout.path(NATIONS_FILE), Path::new("/tmp/game/database/nations.yaml"));
        assert_eq!(layout.path(SETUPS_DIR), Path::new("/tmp/game/setups"));
    }

    #[test]
    fn test_required_paths_list_dirs_then_files() {
        let paths = DataLayout::required_paths();
        assert_eq!(paths.len(), 11);
        assert_eq!(paths[0].kind, PathKind::Directory);
        assert_eq!(paths[4].relative, SETTINGS_FILE);
        assert!(paths[4..].iter().all(|p| p.kind == PathKind::File));
    }

    #[test]
    fn test_exists_checks_kind() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("database")).unwrap();
        std::fs::write(dir.path().join("saves"), "not a dir").unwrap();
        let layout = DataLayout::new(dir.path());
        let paths = DataLayout::required_paths();
        assert!(layout.exists(&paths[0]));
        assert!(!layout.exists(&paths[1]));
    }
}
