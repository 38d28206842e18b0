//! # Configuration
//!
//! [`ClientConfig`] holds every option of a client run. It is built once,
//! before connecting, and handed to the [`Reporter`](crate::Reporter) by
//! value; nothing reads options from global state.
//!
//! ## Loading Priority
//!
//! 1. Explicit struct fields (programmatic construction, CLI flags)
//! 2. Environment variables (`MOCAP_HOSTS`, `MOCAP_AXIS_MAPPING`, `MOCAP_BUFFER_SIZE`)
//! 3. TOML config file at an explicit path
//! 4. `./mocap.toml` in the current directory
//! 5. `~/.config/mocap-stream/mocap.toml`
//!
//! Environment variables override file values. Every field has a default,
//! so an absent config file is not an error.

use serde::{Deserialize, Serialize};
#[cfg(feature = "config-toml")]
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::connection::join_hosts;
use crate::error::{MocapError, MocapResult};
use crate::poll::PollPolicy;
use crate::provider::AxisMapping;

/// Default axis mapping preset name.
pub const DEFAULT_AXIS_MAPPING: &str = "ZUp";

/// Default delay between connection attempts in milliseconds.
const DEFAULT_CONNECT_RETRY_INTERVAL_MS: u64 = 1000;

/// Default delay between frame polls in milliseconds.
const DEFAULT_FRAME_POLL_INTERVAL_MS: u64 = 200;

/// Configuration for one client run.
///
/// # Examples
///
/// ```
/// use mocap_stream::config::ClientConfig;
///
/// let mut config = ClientConfig::default();
/// config.hosts = vec!["vicon-a".into(), "vicon-b:801".into()];
/// config.axis_mapping = "YUp".into();
/// assert_eq!(config.host_spec(), "vicon-a;vicon-b:801");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server entries, `host[:port]`. Empty means `localhost:801`.
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Axis mapping preset: `ZUp`, `YUp` or `XUp`. Unknown names mean `ZUp`.
    #[serde(default = "default_axis_mapping")]
    pub axis_mapping: String,

    /// Client-side frame buffer size. 0 leaves the provider default.
    #[serde(default)]
    pub buffer_size: u32,

    /// Subjects to restrict the stream to.
    #[serde(default)]
    pub subject_filter: Vec<String>,

    /// Discard frame reports (connection diagnostics are still printed).
    #[serde(default)]
    pub quiet: bool,

    /// Ask the provider to tune the network stack for wireless links.
    #[serde(default)]
    pub optimize_wireless: bool,

    /// Stop after this many frames. 0 means run until cancelled.
    #[serde(default)]
    pub max_frames: u64,

    /// Stop when a line is entered on stdin.
    #[serde(default = "default_true")]
    pub stop_on_keypress: bool,

    /// Connection loop settings.
    #[serde(default)]
    pub connect: ConnectConfig,

    /// Frame wait loop settings.
    #[serde(default)]
    pub frames: FrameWaitConfig,
}

/// Connection retry loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Delay between attempts, in milliseconds.
    #[serde(default = "default_connect_retry_interval")]
    pub retry_interval_ms: u64,

    /// Maximum number of attempts. 0 means unlimited.
    #[serde(default)]
    pub max_attempts: u32,

    /// Give up after this many seconds. 0 means never.
    #[serde(default)]
    pub timeout_secs: u64,
}

/// Frame wait loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameWaitConfig {
    /// Delay between `get_frame` polls, in milliseconds.
    #[serde(default = "default_frame_poll_interval")]
    pub poll_interval_ms: u64,

    /// Maximum polls per frame. 0 means unlimited.
    #[serde(default)]
    pub max_attempts: u32,

    /// Give up waiting for a frame after this many seconds. 0 means never.
    #[serde(default)]
    pub timeout_secs: u64,
}

// ─── Defaults ───────────────────────────────────────────────────────────

fn default_axis_mapping() -> String {
    DEFAULT_AXIS_MAPPING.to_string()
}

fn default_true() -> bool {
    true
}

fn default_connect_retry_interval() -> u64 {
    DEFAULT_CONNECT_RETRY_INTERVAL_MS
}

fn default_frame_poll_interval() -> u64 {
    DEFAULT_FRAME_POLL_INTERVAL_MS
}

fn optional_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

// ─── Default impls ──────────────────────────────────────────────────────

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            axis_mapping: default_axis_mapping(),
            buffer_size: 0,
            subject_filter: Vec::new(),
            quiet: false,
            optimize_wireless: false,
            max_frames: 0,
            stop_on_keypress: true,
            connect: ConnectConfig::default(),
            frames: FrameWaitConfig::default(),
        }
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: DEFAULT_CONNECT_RETRY_INTERVAL_MS,
            max_attempts: 0,
            timeout_secs: 0,
        }
    }
}

impl Default for FrameWaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_FRAME_POLL_INTERVAL_MS,
            max_attempts: 0,
            timeout_secs: 0,
        }
    }
}

impl ConnectConfig {
    #[must_use]
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::custom(
            Duration::from_millis(self.retry_interval_ms),
            self.max_attempts,
            optional_secs(self.timeout_secs),
        )
    }
}

impl FrameWaitConfig {
    #[must_use]
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::custom(
            Duration::from_millis(self.poll_interval_ms),
            self.max_attempts,
            optional_secs(self.timeout_secs),
        )
    }
}

// ─── ClientConfig impl ─────────────────────────────────────────────────

impl ClientConfig {
    /// The `;`-joined connection target, `localhost:801` when no hosts are set.
    #[must_use]
    pub fn host_spec(&self) -> String {
        join_hosts(self.hosts.as_slice())
    }

    /// The resolved axis mapping preset.
    #[must_use]
    pub fn axis_mapping(&self) -> AxisMapping {
        AxisMapping::from_name(&self.axis_mapping)
    }

    /// Defaults plus environment variable overrides.
    ///
    /// Recognised: `MOCAP_HOSTS` (`;`-separated), `MOCAP_AXIS_MAPPING`,
    /// `MOCAP_BUFFER_SIZE`.
    ///
    /// # Errors
    /// Returns [`MocapError::ConfigError`] when `MOCAP_BUFFER_SIZE` is not a
    /// number.
    pub fn from_env() -> MocapResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> MocapResult<()> {
        if let Ok(hosts) = std::env::var("MOCAP_HOSTS") {
            self.hosts = hosts
                .split(';')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(mapping) = std::env::var("MOCAP_AXIS_MAPPING") {
            self.axis_mapping = mapping;
        }
        if let Ok(size) = std::env::var("MOCAP_BUFFER_SIZE") {
            self.buffer_size = size.trim().parse().map_err(|e| MocapError::ConfigError {
                reason: format!("MOCAP_BUFFER_SIZE '{size}' is not a frame count: {e}"),
            })?;
        }
        Ok(())
    }

    /// Load config from a TOML file, with environment variable overrides.
    ///
    /// # Errors
    /// Returns [`MocapError::ConfigError`] when the file cannot be read or
    /// parsed, or an environment override is invalid.
    #[cfg(feature = "config-toml")]
    pub fn from_file(path: impl AsRef<Path>) -> MocapResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| MocapError::ConfigError {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        let mut config: Self = toml::from_str(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Discover and load config from the standard search path:
    ///
    /// 1. Explicit path (if `Some`)
    /// 2. `MOCAP_CONFIG` environment variable
    /// 3. `./mocap.toml`
    /// 4. `~/.config/mocap-stream/mocap.toml`
    ///
    /// Falls back to [`from_env`](Self::from_env) if no file is found.
    ///
    /// # Errors
    /// Propagates [`from_file`](Self::from_file) and
    /// [`from_env`](Self::from_env) errors.
    #[cfg(feature = "config-toml")]
    pub fn discover(explicit_path: Option<&Path>) -> MocapResult<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var("MOCAP_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        let local_path = PathBuf::from("mocap.toml");
        if local_path.exists() {
            return Self::from_file(&local_path);
        }

        if let Some(config_path) = dirs_config_path() {
            if config_path.exists() {
                return Self::from_file(&config_path);
            }
        }

        Self::from_env()
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

/// Platform-appropriate config file path.
#[cfg(feature = "config-toml")]
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|dir| PathBuf::from(dir).join("mocap-stream").join("mocap.toml"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME").ok().map(|dir| {
            PathBuf::from(dir)
                .join(".config")
                .join("mocap-stream")
                .join("mocap.toml")
        })
    }
}
