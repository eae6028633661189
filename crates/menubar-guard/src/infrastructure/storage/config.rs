//! TOML-based configuration for the guard.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - macOS:    `~/Library/Application Support/MenubarGuard/config.toml`
//! - Linux:    `~/.config/menubar-guard/config.toml`
//!
//! Example:
//!
//! ```toml
//! [guard]
//! log_level = "info"
//!
//! [policy]
//! preset = "strict"
//! band_height = 15.0
//! span = "full-width"
//!
//! [runtime]
//! maintenance_interval_ms = 1000
//! refresh_display = true
//! ```
//!
//! Every section and field is optional; missing values fall back to their
//! defaults, so a missing file behaves exactly like an empty one.  The
//! per-behaviour fields under `[policy]` (`suppress_clicks`,
//! `one_shot_relocation`, `track_motion_only`, `rewrite_position`) override
//! the chosen preset when present.

use std::path::{Path, PathBuf};
use std::time::Duration;

use guard_core::{BandSpan, ClampPolicy, PolicyPreset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest allowed maintenance slice.
pub const MIN_MAINTENANCE_INTERVAL_MS: u64 = 50;

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

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuardConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Clamp policy settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    #[serde(default)]
    pub preset: PolicyPreset,
    /// Band height in points, measured down from the top of the primary display.
    #[serde(default = "default_band_height")]
    pub band_height: f64,
    #[serde(default)]
    pub span: BandSpan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppress_clicks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_shot_relocation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_motion_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite_position: Option<bool>,
}

/// Tap thread maintenance settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    /// Length of one run loop slice between health checks.
    #[serde(default = "default_maintenance_interval_ms")]
    pub maintenance_interval_ms: u64,
    /// Re-query the primary display after every slice.
    #[serde(default = "default_true")]
    pub refresh_display: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_band_height() -> f64 {
    ClampPolicy::DEFAULT_BAND_HEIGHT
}
fn default_maintenance_interval_ms() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            preset: PolicyPreset::default(),
            band_height: default_band_height(),
            span: BandSpan::default(),
            suppress_clicks: None,
            one_shot_relocation: None,
            track_motion_only: None,
            rewrite_position: None,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            maintenance_interval_ms: default_maintenance_interval_ms(),
            refresh_display: default_true(),
        }
    }
}

impl PolicyConfig {
    /// Builds the clamp policy: the preset first, then any explicit overrides.
    ///
    /// The result is not validated here; `ClampEngine::new` does that.
    pub fn to_policy(&self) -> ClampPolicy {
        let mut policy =
            ClampPolicy::from_preset(self.preset, self.band_height).with_span(self.span);
        if let Some(v) = self.suppress_clicks {
            policy.suppress_clicks = v;
        }
        if let Some(v) = self.one_shot_relocation {
            policy.one_shot_relocation = v;
        }
        if let Some(v) = self.track_motion_only {
            policy.track_motion_only = v;
        }
        if let Some(v) = self.rewrite_position {
            policy.rewrite_position = v;
        }
        policy
    }
}

impl RuntimeConfig {
    /// The maintenance slice, never shorter than
    /// [`MIN_MAINTENANCE_INTERVAL_MS`].
    pub fn maintenance_interval(&self) -> Duration {
        Duration::from_millis(self.maintenance_interval_ms.max(MIN_MAINTENANCE_INTERVAL_MS))
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

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Renders `config` as pretty TOML.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn render_config(config: &AppConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = render_config(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/MenubarGuard
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MenubarGuard")
        })
    }

    #[cfg(not(target_os = "macos"))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("menubar-guard"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
