//! Scroller configuration system
//!
//! This crate provides centralized configuration for the scroll engine and the
//! demo runner, loading settings from `scroller.toml` with environment variable
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScrollerConfig {
    /// CSS transition declared on every animated element
    pub transition: TransitionConfig,
    /// Demo runner settings
    pub demo: DemoConfig,
}

/// Smoothing transition applied by the browser between two scroll passes.
///
/// The engine never evaluates this curve itself; it only writes it into the
/// element's `transition` property when an actor is bound to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Transition duration in milliseconds
    pub duration_ms: u32,
    /// CSS timing function name (ease, ease-out, linear, cubic-bezier(...), ...)
    pub timing_function: String,
}

/// Demo runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Scene document to load (JSON or TOML). The built-in scene is used when unset.
    pub scene: Option<PathBuf>,
    /// Scroll distance between two simulated passes
    pub step: f64,
    /// Where the simulated sweep stops. Defaults to the tree length.
    pub end: Option<f64>,
    /// Viewport height reported by the in-memory document
    pub viewport_height: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 180,
            timing_function: "ease-out".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scene: None,
            step: 40.0,
            end: None,
            viewport_height: 800.0,
        }
    }
}

impl ScrollerConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the scroller.toml configuration file
    ///
    /// # Returns
    /// * `Ok(ScrollerConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (scroller.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("scroller.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("SCROLLER_TRANSITION_MS") {
            if let Ok(ms) = val.parse::<u32>() {
                self.transition.duration_ms = ms;
            }
        }
        if let Ok(func) = std::env::var("SCROLLER_TIMING_FUNCTION") {
            self.transition.timing_function = func;
        }

        if let Ok(scene) = std::env::var("SCROLLER_SCENE") {
            self.demo.scene = Some(PathBuf::from(scene));
        }
        if let Ok(val) = std::env::var("SCROLLER_DEMO_STEP") {
            if let Ok(step) = val.parse::<f64>() {
                self.demo.step = step;
            }
        }
        if let Ok(val) = std::env::var("SCROLLER_DEMO_END") {
            if let Ok(end) = val.parse::<f64>() {
                self.demo.end = Some(end);
            }
        }
        if let Ok(val) = std::env::var("SCROLLER_VIEWPORT_HEIGHT") {
            if let Ok(height) = val.parse::<f64>() {
                self.demo.viewport_height = height;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from scroller.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ScrollerConfig::default();
        assert_eq!(config.transition.duration_ms, 180);
        assert_eq!(config.transition.timing_function, "ease-out");
        assert!(config.demo.scene.is_none());
    }

    #[test]
    fn test_toml_serialization() {
        let config = ScrollerConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ScrollerConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.transition.duration_ms, 180);
        assert_eq!(parsed.demo.step, 40.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[transition]\nduration_ms = 250").unwrap();

        let config = ScrollerConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.transition.duration_ms, 250);
        assert_eq!(config.transition.timing_function, "ease-out");
        assert_eq!(config.demo.viewport_height, 800.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ScrollerConfig::load_from_file("does/not/exist.toml").unwrap_err();
        assert!(err.starts_with("Failed to read config file"));
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("SCROLLER_TRANSITION_MS", "90");
            std::env::set_var("SCROLLER_TIMING_FUNCTION", "linear");
            std::env::set_var("SCROLLER_DEMO_STEP", "not-a-number");
        }

        let mut config = ScrollerConfig::default();
        config.merge_with_env();

        assert_eq!(config.transition.duration_ms, 90);
        assert_eq!(config.transition.timing_function, "linear");
        assert_eq!(config.demo.step, 40.0);

        unsafe {
            std::env::remove_var("SCROLLER_TRANSITION_MS");
            std::env::remove_var("SCROLLER_TIMING_FUNCTION");
            std::env::remove_var("SCROLLER_DEMO_STEP");
        }
    }
}
