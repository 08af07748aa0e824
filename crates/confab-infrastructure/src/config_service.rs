//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/confab/config.toml).

use crate::paths::ConfabPaths;
use confab_core::config::RootConfig;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variable overriding the relay base URL.
pub const ENV_BASE_URL: &str = "CONFAB_BASE_URL";

/// Environment variable overriding the model identifier.
pub const ENV_MODEL: &str = "CONFAB_MODEL";

/// Configuration service that loads and caches the root configuration.
///
/// This implementation reads the configuration from config.toml, writes a
/// default file when none exists, applies environment overrides, and caches
/// the result to avoid repeated file I/O operations.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<RootConfig>>>,
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Creates a new ConfigService using the default config file location.
    ///
    /// The configuration is loaded lazily on first access to avoid blocking
    /// during initialization.
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: None,
        }
    }

    /// Creates a ConfigService reading from an explicit file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: Some(path),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> RootConfig {
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let mut loaded = self.load_config().unwrap_or_default();
        apply_overrides(
            &mut loaded,
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_MODEL).ok(),
        );

        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    /// Loads RootConfig from the config file, creating it with defaults when
    /// missing.
    fn load_config(&self) -> Result<RootConfig, String> {
        let config_path = match &self.path {
            Some(path) => path.clone(),
            None => ConfabPaths::config_file().map_err(|e| e.to_string())?,
        };

        if !config_path.exists() {
            let default_config = RootConfig::default();
            if let Err(e) = Self::write_default(&config_path, &default_config) {
                tracing::warn!("Failed to write default config to {config_path:?}: {e}");
            }
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file {config_path:?}: {e}"))?;

        toml::from_str(&content).map_err(|e| {
            tracing::warn!("Malformed config file {config_path:?}: {e}");
            format!("Failed to parse config file: {e}")
        })
    }

    fn write_default(path: &PathBuf, config: &RootConfig) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = toml::to_string_pretty(config).map_err(|e| e.to_string())?;
        fs::write(path, content).map_err(|e| e.to_string())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies override values (from environment or CLI flags) on top of the
/// file-loaded configuration.
pub fn apply_overrides(config: &mut RootConfig, base_url: Option<String>, model: Option<String>) {
    if let Some(base_url) = base_url.filter(|v| !v.is_empty()) {
        config.chat.base_url = base_url;
    }
    if let Some(model) = model.filter(|v| !v.is_empty()) {
        config.chat.model = model;
    }
}
