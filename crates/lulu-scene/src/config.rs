//! Game configuration.
//!
//! Provides window, simulation, player and debug settings. Configuration
//! can be loaded from and saved to a TOML file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lulu_common::Vec2;
use lulu_core::{FighterStats, Link};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "lulu.toml";

/// Errors that can occur while saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to write the file.
    #[error("Failed to write config file: {0}")]
    Io(#[from] io::Error),

    /// Failed to serialize TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Simulation settings
    pub simulation: SimulationConfig,
    /// Player defaults
    pub player: PlayerConfig,
    /// Debug settings
    pub debug: DebugConfig,
}

/// Window settings, kept for hosts that render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Ticks per second
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Legend of Lulu".to_string(),
            width: 800,
            height: 600,
            target_fps: 60,
        }
    }
}

/// Simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for AI (None = random)
    pub seed: Option<u64>,
    /// Upper bound on ticks in one headless run
    pub max_ticks: u64,
    /// Scene loaded at startup, relative to `assets_root`
    pub start_scene: String,
    /// Directory that scene, character and dialogue paths are relative to
    pub assets_root: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: 3600,
            start_scene: "dungeon/rooms/hall.json".to_string(),
            assets_root: PathBuf::from("assets"),
        }
    }
}

/// Player defaults used when a scene places Link without a definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Units per tick
    pub speed: f32,
    /// Starting health
    pub hp: f32,
    /// Damage per hit
    pub damage: f32,
    /// Hitbox width and height
    pub size: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            hp: 12.0,
            damage: 1.0,
            size: 32.0,
        }
    }
}

impl PlayerConfig {
    /// Builds a sprite-less Link from these defaults.
    #[must_use]
    pub fn link(&self) -> Link {
        Link::new(
            Vec2::splat(self.size),
            self.speed,
            FighterStats::new(self.hp, self.damage),
        )
    }
}

/// Debug settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log every collision list after each tick
    pub log_collisions: bool,
}

impl GameConfig {
    /// Load configuration from `lulu.toml` in the working directory.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.window.width = self.window.width.clamp(320, 7680);
        self.window.height = self.window.height.clamp(240, 4320);
        self.window.target_fps = self.window.target_fps.clamp(15, 240);

        self.simulation.max_ticks = self.simulation.max_ticks.max(1);

        self.player.speed = self.player.speed.clamp(0.0, 64.0);
        self.player.hp = self.player.hp.max(1.0);
        self.player.damage = self.player.damage.max(0.0);
        self.player.size = self.player.size.clamp(1.0, 512.0);
    }

    /// Resolves a path from a scene or definition file against the assets root.
    #[must_use]
    pub fn asset_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.simulation.assets_root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.target_fps, 60);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.player.hp, 12.0);
        assert!(!config.debug.log_collisions);
    }

    #[test]
    fn test_config_validation() {
        let mut config = GameConfig::default();
        config.window.width = 10;
        config.player.speed = -4.0;
        config.player.hp = 0.0;
        config.simulation.max_ticks = 0;

        config.validate();

        assert_eq!(config.window.width, 320);
        assert_eq!(config.player.speed, 0.0);
        assert_eq!(config.player.hp, 1.0);
        assert_eq!(config.simulation.max_ticks, 1);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("lulu.toml");

        let mut config = GameConfig::default();
        config.simulation.seed = Some(12345);
        config.simulation.start_scene = "overworld/field.json".to_string();
        config.debug.log_collisions = true;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = GameConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = GameConfig::load_from("/nonexistent/path/lulu.toml");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("lulu.toml");
        fs::write(&config_path, "[player]\nspeed = 5.0\n").expect("write config");

        let config = GameConfig::load_from(&config_path);
        assert_eq!(config.player.speed, 5.0);
        assert_eq!(config.player.hp, 12.0);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_config_invalid_toml_falls_back() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("lulu.toml");
        fs::write(&config_path, "[player\nspeed = ").expect("write config");
        assert_eq!(GameConfig::load_from(&config_path), GameConfig::default());
    }

    #[test]
    fn test_player_defaults_build_link() {
        let link = PlayerConfig::default().link();
        assert_eq!(link.base_size(), Vec2::splat(32.0));
    }
}
