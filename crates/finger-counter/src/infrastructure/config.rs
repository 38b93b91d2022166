//! TOML-based configuration for the finger counter.
//!
//! The config file lives in the platform-appropriate directory:
//! - Windows:  `%APPDATA%\FingerCount\config.toml`
//! - Linux:    `~/.config/fingercount/config.toml`
//! - macOS:    `~/Library/Application Support/FingerCount/config.toml`
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [classifier]
//! thumb_threshold_degrees = 40.0
//! finger_threshold_degrees = 90.0
//!
//! [output]
//! format = "text"
//! on_error = "skip"
//! ```
//!
//! # Serde default values
//!
//! Every field has a default, and every section may be omitted.  An empty
//! file, or no file at all, gives the same behaviour as the built-in
//! classifier thresholds and text output.

use std::path::{Path, PathBuf};

use finger_core::{ExtensionThresholds, FingerClassifier, HandAggregator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::{ErrorPolicy, FrameProcessor, OutputFormat};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A threshold is outside `(0, 180]` degrees.
    #[error("{name} must be within (0, 180] degrees, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset, e.g. `"info"` or
    /// `"finger_core=trace,info"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Extension thresholds for the finger classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    #[serde(default = "default_thumb_threshold")]
    pub thumb_threshold_degrees: f64,
    #[serde(default = "default_finger_threshold")]
    pub finger_threshold_degrees: f64,
}

/// Output sink settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_thumb_threshold() -> f64 {
    ExtensionThresholds::default().thumb_degrees
}
fn default_finger_threshold() -> f64 {
    ExtensionThresholds::default().finger_degrees
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            thumb_threshold_degrees: default_thumb_threshold(),
            finger_threshold_degrees: default_finger_threshold(),
        }
    }
}

impl ClassifierConfig {
    pub fn thresholds(&self) -> ExtensionThresholds {
        ExtensionThresholds {
            thumb_degrees: self.thumb_threshold_degrees,
            finger_degrees: self.finger_threshold_degrees,
        }
    }
}

impl AppConfig {
    /// Checks values that serde cannot constrain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] when a threshold is not in `(0, 180]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold(
            "classifier.thumb_threshold_degrees",
            self.classifier.thumb_threshold_degrees,
        )?;
        check_threshold(
            "classifier.finger_threshold_degrees",
            self.classifier.finger_threshold_degrees,
        )
    }

    /// Builds the frame processor described by this config.
    pub fn processor(&self) -> FrameProcessor {
        let classifier = FingerClassifier::new(self.classifier.thresholds());
        FrameProcessor::new(HandAggregator::new(classifier), self.output.on_error)
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // Written so that NaN fails as well.
    if value > 0.0 && value <= 180.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads and validates `AppConfig` from `path`, returning
/// `AppConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::InvalidThreshold`] for out-of-range thresholds.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str::<AppConfig>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Loads `AppConfig` from the platform default location.
///
/// # Errors
///
/// See [`load_config_from`]; also [`ConfigError::NoPlatformConfigDir`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("FingerCount"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("fingercount"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("FingerCount")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
