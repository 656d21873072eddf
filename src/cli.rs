// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::SceneConfig;
use crate::error::Result;
use crate::scenes::ScenePreset;

#[derive(Parser, Debug, Clone)]
#[command(name = "liquid-scene")]
#[command(about = "Animated liquid sphere behind frosted glass", long_about = None)]
pub struct Cli {
    /// Built-in scene to show
    #[arg(long, env = "SCENE", value_enum, default_value_t = ScenePreset::Lakeside)]
    pub preset: ScenePreset,

    /// JSON scene config; replaces the preset
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Window or snapshot width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Window or snapshot height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Render one frame on the CPU to this PNG and exit
    #[arg(long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Animation ticks to advance before taking the snapshot
    #[arg(long, default_value_t = 0, requires = "snapshot")]
    pub snapshot_ticks: u64,

    /// HDR environment map overriding the scene's
    #[arg(long, value_name = "HDR", conflicts_with = "no_environment")]
    pub environment: Option<PathBuf>,

    /// Render without an environment map
    #[arg(long)]
    pub no_environment: bool,
}

impl Cli {
    /// Scene config selected by the flags.
    pub fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => self.preset.config(),
        };

        if self.no_environment {
            config.environment.path = None;
        } else if let Some(path) = &self.environment {
            config.environment.path = Some(path.clone());
        }

        Ok(config)
    }
}
