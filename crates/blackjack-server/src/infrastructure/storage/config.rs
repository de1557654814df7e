//! TOML-based configuration for the server application.
//!
//! Reads `ServerConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Blackjack\server.toml`
//! - Linux:    `~/.config/blackjack/server.toml`
//! - macOS:    `~/Library/Application Support/Blackjack/server.toml`
//!
//! Example:
//!
//! ```toml
//! [server]
//! name = "Friday Night Table"
//!
//! [network]
//! tcp_port = 5000
//! discovery_port = 13117
//!
//! [session]
//! linger_ms = 1500
//! ```
//!
//! Every field carries a serde default, so a missing file, a missing section
//! or a missing key all fall back to working values.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::serve_session::SessionOptions;

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

    /// A value parsed but cannot be used.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub session: SessionSection,
}

/// Identity and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Name advertised in every OFFER (truncated to 32 bytes on the wire).
    #[serde(default = "default_name")]
    pub name: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Sockets and discovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSection {
    /// Address the TCP listener binds to.  `0.0.0.0` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    /// TCP port for game sessions.
    #[serde(default = "default_tcp_port")]
    pub tcp_port: u16,
    /// UDP port clients listen on for offers.
    #[serde(default = "default_discovery_port")]
    pub discovery_port: u16,
    /// Destination address for offers.
    #[serde(default = "default_broadcast_address")]
    pub broadcast_address: IpAddr,
    /// Milliseconds between offers.
    #[serde(default = "default_offer_interval_ms")]
    pub offer_interval_ms: u64,
}

/// Session pacing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSection {
    /// Pause between rounds in milliseconds.
    #[serde(default = "default_round_pause_ms")]
    pub round_pause_ms: u64,
    /// Delay before closing a finished session, in milliseconds.
    #[serde(default = "default_linger_ms")]
    pub linger_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_name() -> String {
    "blackjack-server".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
fn default_tcp_port() -> u16 {
    5000
}
fn default_discovery_port() -> u16 {
    13117
}
fn default_broadcast_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::BROADCAST)
}
fn default_offer_interval_ms() -> u64 {
    1000
}
fn default_round_pause_ms() -> u64 {
    100
}
fn default_linger_ms() -> u64 {
    1500
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            tcp_port: default_tcp_port(),
            discovery_port: default_discovery_port(),
            broadcast_address: default_broadcast_address(),
            offer_interval_ms: default_offer_interval_ms(),
        }
    }
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            round_pause_ms: default_round_pause_ms(),
            linger_ms: default_linger_ms(),
        }
    }
}

impl NetworkSection {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.tcp_port)
    }

    pub fn broadcast_target(&self) -> SocketAddr {
        SocketAddr::new(self.broadcast_address, self.discovery_port)
    }

    pub fn offer_interval(&self) -> Duration {
        Duration::from_millis(self.offer_interval_ms)
    }
}

impl ServerConfig {
    /// Rejects values that parse but would break a running server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.offer_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "network.offer_interval_ms",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

impl From<&SessionSection> for SessionOptions {
    fn from(section: &SessionSection) -> Self {
        Self {
            round_pause: Duration::from_millis(section.round_pause_ms),
            linger: Duration::from_millis(section.linger_ms),
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("server.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from `path`, or from the platform default location when
/// `path` is `None`.  A missing file yields `ServerConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::Invalid`] if a value fails [`ServerConfig::validate`].
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_file_path() {
            Ok(p) => p,
            Err(ConfigError::NoPlatformConfigDir) => return Ok(ServerConfig::default()),
            Err(e) => return Err(e),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let config: ServerConfig = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServerConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Resolves the platform config base directory including the `Blackjack`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Blackjack"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("blackjack"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Blackjack")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
