// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::{parse_hex_color, AppConfig, ConfigError, SceneKind};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mesh-scenes")]
#[command(about = "Animated primitive-mesh scenes", long_about = None)]
pub struct Cli {
    /// Demo scene to build
    #[arg(long, value_enum)]
    pub scene: Option<SceneKind>,

    /// JSON file with base settings; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Background colour as 0xRRGGBB, #RRGGBB or RRGGBB
    #[arg(long = "clear-color", value_parser = parse_hex_color)]
    pub clear_color: Option<u32>,

    /// Disable UI elements (FPS readout and control panel)
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Render offscreen without opening a window
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Stop after this many frames (headless only)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Headless viewport width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Headless viewport height in pixels
    #[arg(long)]
    pub height: Option<u32>,
}

impl Cli {
    /// Load the config file (if any) and apply flag overrides
    pub fn resolve(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(scene) = self.scene {
            config.scene = scene;
        }
        if let Some(color) = self.clear_color {
            config.clear_color = color;
        }
        if self.no_ui {
            config.show_ui = false;
        }
        if let Some(frames) = self.frames {
            config.frames = Some(frames);
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "mesh-scenes",
            "--scene",
            "lighting",
            "--clear-color",
            "#ffffff",
            "--no-ui",
            "--headless",
            "--frames",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.scene, Some(SceneKind::Lighting));
        assert_eq!(cli.clear_color, Some(0xffffff));
        assert!(cli.no_ui);
        assert!(cli.headless);
        assert_eq!(cli.frames, Some(10));
    }

    #[test]
    fn test_bad_colour_is_rejected() {
        assert!(Cli::try_parse_from(["mesh-scenes", "--clear-color", "red"]).is_err());
        assert!(Cli::try_parse_from(["mesh-scenes", "--scene", "tunnel"]).is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli {
            scene: Some(SceneKind::Empty),
            no_ui: true,
            width: Some(64),
            ..Cli::default()
        };
        let config = cli.resolve().unwrap();

        assert_eq!(config.scene, SceneKind::Empty);
        assert!(!config.show_ui);
        assert_eq!(config.width, 64);
        assert_eq!(config.height, AppConfig::default().height);
    }
}
