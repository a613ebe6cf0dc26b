use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `~/.local/state/ponchie`, or the platform data dir without `HOME`
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("ponchie"),
            )
        } else {
            ProjectDirs::from("", "", "ponchie")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("ponchie.log"))
    }

    /// Where saved sketches go
    pub fn export_dir() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("sketches"))
    }
}
