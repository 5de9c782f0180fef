//! Open a collection folder in the platform file manager.
//!
//! The only platform-conditional code in the crate: `explorer` on Windows,
//! `open` on macOS, `xdg-open` everywhere else. The launcher runs detached
//! from the viewer process.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum OpenError {
    #[error("Folder does not exist: {0}")]
    NotFound(PathBuf),
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: io::Error,
    },
}

/// File-manager launcher for the current platform.
pub fn opener_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Launch the file manager on `folder` and return without waiting.
pub fn open_folder(folder: &Path) -> Result<(), OpenError> {
    if !folder.is_dir() {
        return Err(OpenError::NotFound(folder.to_path_buf()));
    }
    debug!("opening {} with {}", folder.display(), opener_program());
    open::with_detached(folder, opener_program()).map_err(|source| OpenError::Spawn {
        program: opener_program(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn program_matches_platform() {
        let expected = if cfg!(windows) {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        assert_eq!(opener_program(), expected);
    }

    #[test]
    fn missing_folder_is_not_spawned() {
        let tmp = TempDir::new().unwrap();
        let result = open_folder(&tmp.path().join("gone"));
        assert!(matches!(result, Err(OpenError::NotFound(_))));
    }

    #[test]
    fn plain_file_is_not_a_folder() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("info.json");
        std::fs::write(&file, "{}").unwrap();
        assert!(matches!(open_folder(&file), Err(OpenError::NotFound(p)) if p == file));
    }
}
