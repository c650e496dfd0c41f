//! Application configuration: JSON file defaults, overridden by CLI flags

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::driver::DEFAULT_RATE;

/// Headless viewport used when neither the file nor the CLI sets one
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid colour '{0}', expected RRGGBB")]
    InvalidColor(String),

    #[error("invalid {field} {value}: rates must be finite and the grow rate non-negative")]
    InvalidRate { field: &'static str, value: f32 },
}

/// Parse `0xRRGGBB`, `#RRGGBB` or `RRGGBB` into a packed colour
pub fn parse_hex_color(input: &str) -> Result<u32, ConfigError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed);

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(input.to_string()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| ConfigError::InvalidColor(input.to_string()))
}

/// Which demo scene the binary builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    /// Nothing but the clear colour
    Empty,
    /// Box riding on a spinning, growing plane
    #[default]
    MeshAnimation,
    /// Lit meshes, a movable point light and fog
    Lighting,
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SceneKind::Empty => "empty",
            SceneKind::MeshAnimation => "mesh-animation",
            SceneKind::Lighting => "lighting",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub scene: SceneKind,
    #[serde(serialize_with = "write_color", deserialize_with = "read_color")]
    pub clear_color: u32,
    /// Radians added to the spinning node's yaw and roll per frame
    pub spin_rate: f32,
    /// Scale added to every node on the grow axis per frame
    pub grow_rate: f32,
    pub show_ui: bool,
    pub width: u32,
    pub height: u32,
    /// Tick limit for headless runs; unlimited when absent
    pub frames: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            clear_color: 0x000000,
            spin_rate: DEFAULT_RATE,
            grow_rate: DEFAULT_RATE,
            show_ui: true,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frames: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source, path)
    }

    /// Reject animation rates that would drive a transform non-finite or
    /// shrink a scale
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.spin_rate.is_finite() {
            return Err(ConfigError::InvalidRate {
                field: "spin_rate",
                value: self.spin_rate,
            });
        }
        if !self.grow_rate.is_finite() || self.grow_rate < 0.0 {
            return Err(ConfigError::InvalidRate {
                field: "grow_rate",
                value: self.grow_rate,
            });
        }
        Ok(())
    }
}

fn write_color<S: Serializer>(color: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("#{:06x}", color))
}

fn read_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_hex_color(&text).map_err(serde::de::Error::custom)
}
