//! Device configuration
//!
//! Named, independently settable options for one laser device: serial
//! connection, bed geometry, rates, raster margin, and the pre/post job
//! command blocks. Stored as JSON or TOML, chosen by file extension, in
//! the platform config directory.

use kerf_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one laser device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeviceConfig {
    /// Serial port name (e.g. "/dev/ttyACM0", "COM3").
    pub port: String,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Bed width in millimetres.
    pub bed_width_mm: f64,
    /// Bed height in millimetres.
    pub bed_height_mm: f64,
    /// X axis goes right to left: mirror emitted X coordinates.
    pub flip_x_axis: bool,
    /// Maximum seek (rapid) rate in mm/min.
    pub max_seek_rate: f64,
    /// Maximum marking rate in mm/min; speed percentages scale this.
    pub max_laser_rate: f64,
    /// Additional whitespace per raster line in millimetres.
    pub raster_margin_mm: f64,
    /// Commands sent before each job, `;`-separated.
    pub pre_gcode: String,
    /// Commands sent after each job, `;`-separated.
    pub post_gcode: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
            bed_width_mm: 250.0,
            bed_height_mm: 280.0,
            flip_x_axis: false,
            max_seek_rate: 2000.0,
            max_laser_rate: 2000.0,
            raster_margin_mm: 0.5,
            pre_gcode: "G28;G21;G90".to_string(),
            post_gcode: "G28".to_string(),
        }
    }
}

impl DeviceConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid JSON config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::config("Config file must be .json or .toml"));
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::config("Config file must be .json or .toml"));
        };

        std::fs::write(path, content)
            .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.port.is_empty() {
            return Err(Error::config("Port must not be empty"));
        }
        if self.baud_rate == 0 {
            return Err(Error::config("Baud rate must be > 0"));
        }
        if self.bed_width_mm <= 0.0 || self.bed_height_mm <= 0.0 {
            return Err(Error::config("Bed dimensions must be > 0"));
        }
        if self.max_seek_rate <= 0.0 || self.max_laser_rate <= 0.0 {
            return Err(Error::config("Rates must be > 0"));
        }
        if self.raster_margin_mm < 0.0 {
            return Err(Error::config("Raster margin must be >= 0"));
        }
        Ok(())
    }

    /// Default config file location in the platform config directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kerf")
            .join("config.toml")
    }

    /// Load from the given path, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
