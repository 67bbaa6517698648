// SPDX-License-Identifier: GPL-3.0-only

//! Service configuration
//!
//! Settings come from three layers, later ones winning:
//! built-in defaults, a TOML file, and command-line overrides.

use crate::constants::{capture, cooldown, detection, encoding, server};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the user's config dir
const CONFIG_DIR_NAME: &str = "camera-scanner";

/// Config file name inside [`CONFIG_DIR_NAME`]
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Seconds after a successful scan during which results are withheld
    pub cooldown_secs: f64,
    /// Device index used when a start request names none
    pub default_camera_index: u32,
    /// Device indices probed by camera enumeration
    pub max_probe: u32,
    /// JPEG quality for returned frames (1-100)
    pub jpeg_quality: u8,
    /// Frames are downscaled to this size before symbol detection
    pub decoder_max_dimension: u32,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: server::DEFAULT_HOST.to_string(),
            port: server::DEFAULT_PORT,
            cooldown_secs: cooldown::DEFAULT_DURATION_SECS,
            default_camera_index: capture::DEFAULT_CAMERA_INDEX,
            max_probe: capture::DEFAULT_MAX_PROBE,
            jpeg_quality: encoding::DEFAULT_JPEG_QUALITY,
            decoder_max_dimension: detection::DEFAULT_MAX_DIMENSION,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Default config file location (`~/.config/camera-scanner/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(text)?;
        config.validated()
    }

    /// Load a config file
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load the explicit path if given, else the default file if it exists,
    /// else the built-in defaults
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject values the service cannot run with and clamp soft ones
    fn validated(mut self) -> AppResult<Self> {
        if !self.cooldown_secs.is_finite() || self.cooldown_secs < 0.0 {
            return Err(AppError::Config(format!(
                "cooldown_secs must be a non-negative number, got {}",
                self.cooldown_secs
            )));
        }
        if self.decoder_max_dimension == 0 {
            return Err(AppError::Config(
                "decoder_max_dimension must be greater than zero".to_string(),
            ));
        }
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        Ok(self)
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        cooldown_secs: Option<f64>,
    ) -> AppResult<Self> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(cooldown_secs) = cooldown_secs {
            self.cooldown_secs = cooldown_secs;
        }
        self.validated()
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid host '{}': {}", self.host, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
