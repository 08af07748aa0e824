//! Unified path management for confab configuration and history files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for confab.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/confab/            # Config directory
/// ├── config.toml              # Application configuration
/// └── history/                 # Durable key-value entries
///     └── conversations.json   # The persisted conversation list
/// ```
pub struct ConfabPaths;

impl ConfabPaths {
    /// Returns the confab configuration directory (`~/.config/confab`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join("confab"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the directory holding durable key-value entries.
    pub fn history_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("history"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_dir_is_under_config_dir() {
        let config = ConfabPaths::config_dir().unwrap();
        let history = ConfabPaths::history_dir().unwrap();
        assert!(history.starts_with(&config));
        assert!(history.ends_with("history"));
    }

    #[test]
    fn test_config_file_name() {
        let file = ConfabPaths::config_file().unwrap();
        assert!(file.ends_with("config.toml"));
    }
}
