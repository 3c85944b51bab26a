//! Simulation configuration.
//!
//! Every tunable of a run lives in one flat TOML file. Missing keys fall back
//! to their defaults, and a missing or broken file falls back to the whole
//! default config.

use sandfall_common::{SandfallError, SandfallResult};
use sandfall_gameplay::{BrushShape, SessionConfig};
use sandfall_kernel::{LifeTable, SimulationParams};
use sandfall_world::{GeneratorConfig, GeneratorMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "sandfall.toml";

/// Simulation configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World Settings ===
    /// World width in pixels
    pub world_width: u32,
    /// World height in pixels
    pub world_height: u32,
    /// Cell edge length in pixels
    pub cell_size: f32,
    /// World seed (None = random)
    pub world_seed: Option<u32>,
    /// Layout strategy
    pub generator_mode: GeneratorMode,
    /// Noise terrain scale (larger = smoother)
    pub terrain_scale: f64,

    // === Automaton Settings ===
    /// Probability a water cell sits out a tick
    pub water_viscosity: f32,
    /// Probability a lava cell sits out a tick
    pub lava_viscosity: f32,
    /// Per-neighbour fire spread probability
    pub ignite_chance: f32,
    /// Smoke drift probability
    pub smoke_drift_chance: f32,
    /// Water spread stamina
    pub water_life: i32,
    /// Lava spread stamina
    pub lava_life: i32,
    /// Fire burn countdown
    pub fire_life: i32,
    /// Smoke dissipation countdown
    pub smoke_life: i32,

    // === Player Settings ===
    /// Brush radius in cells
    pub brush_radius: u32,
    /// Brush neighbourhood
    pub brush_shape: BrushShape,
    /// Player speed in pixels per second
    pub player_speed: f32,
    /// Half the player's footprint edge in pixels
    pub player_half_extent: f32,
    /// Player speed multiplier in liquid (1.0 = none)
    pub liquid_drag: f32,

    // === Run Settings ===
    /// Automaton ticks per second
    pub tick_rate: u32,
    /// Frames to run before exiting
    pub frames: u32,
    /// Pace frames against the wall clock instead of running flat out
    pub realtime: bool,
    /// Frames between progress log lines (0 = disabled)
    pub report_interval: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        let params = SimulationParams::default();
        Self {
            // World
            world_width: 800,
            world_height: 600,
            cell_size: 4.0,
            world_seed: None,
            generator_mode: GeneratorMode::Noise,
            terrain_scale: 24.0,

            // Automaton
            water_viscosity: params.water_viscosity,
            lava_viscosity: params.lava_viscosity,
            ignite_chance: params.ignite_chance,
            smoke_drift_chance: params.smoke_drift_chance,
            water_life: params.lives.water,
            lava_life: params.lives.lava,
            fire_life: params.lives.fire,
            smoke_life: params.lives.smoke,

            // Player
            brush_radius: 2,
            brush_shape: BrushShape::Square,
            player_speed: 150.0,
            player_half_extent: 6.0,
            liquid_drag: 1.0,

            // Run
            tick_rate: 60,
            frames: 600,
            realtime: false,
            report_interval: 60,
        }
    }
}

impl SimConfig {
    /// Load configuration from `sandfall.toml` in the working directory.
    /// Returns default config if file doesn't exist.
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

        match Self::read_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            },
        }
    }

    /// Reads and parses a config file without any fallback.
    pub fn read_from<P: AsRef<Path>>(path: P) -> SandfallResult<Self> {
        let mut contents = String::new();
        fs::File::open(path)?.read_to_string(&mut contents)?;
        toml::from_str(&contents).map_err(|e| SandfallError::Config(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // World
        self.cell_size = if self.cell_size.is_finite() {
            self.cell_size.clamp(1.0, 64.0)
        } else {
            4.0
        };
        let min_extent = self.cell_size.ceil() as u32;
        self.world_width = self.world_width.clamp(min_extent, 8192);
        self.world_height = self.world_height.clamp(min_extent, 8192);
        self.terrain_scale = self.terrain_scale.clamp(1.0, 1000.0);

        // Automaton
        self.water_viscosity = self.water_viscosity.clamp(0.0, 1.0);
        self.lava_viscosity = self.lava_viscosity.clamp(0.0, 1.0);
        self.ignite_chance = self.ignite_chance.clamp(0.0, 1.0);
        self.smoke_drift_chance = self.smoke_drift_chance.clamp(0.0, 1.0);
        self.water_life = self.water_life.clamp(0, 10_000);
        self.lava_life = self.lava_life.clamp(0, 10_000);
        self.fire_life = self.fire_life.clamp(1, 10_000);
        self.smoke_life = self.smoke_life.clamp(1, 10_000);

        // Player
        self.brush_radius = self.brush_radius.min(8);
        self.player_speed = self.player_speed.clamp(0.0, 2000.0);
        self.player_half_extent = self.player_half_extent.clamp(0.5, 64.0);
        self.liquid_drag = self.liquid_drag.clamp(0.0, 1.0);

        // Run
        self.tick_rate = self.tick_rate.clamp(1, 240);

        debug!("Validated config: {:?}", self);
    }

    /// Grid width in cells.
    #[must_use]
    pub fn grid_width(&self) -> u32 {
        (self.world_width as f32 / self.cell_size) as u32
    }

    /// Grid height in cells.
    #[must_use]
    pub fn grid_height(&self) -> u32 {
        (self.world_height as f32 / self.cell_size) as u32
    }

    /// Automaton parameters.
    #[must_use]
    pub fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            water_viscosity: self.water_viscosity,
            lava_viscosity: self.lava_viscosity,
            ignite_chance: self.ignite_chance,
            smoke_drift_chance: self.smoke_drift_chance,
            lives: LifeTable {
                water: self.water_life,
                lava: self.lava_life,
                fire: self.fire_life,
                smoke: self.smoke_life,
            },
        }
    }

    /// Session settings for a run with the given seed.
    #[must_use]
    pub fn session_config(&self, seed: u32) -> SessionConfig {
        let params = self.simulation_params();
        SessionConfig {
            generator: GeneratorConfig {
                width: self.grid_width(),
                height: self.grid_height(),
                mode: self.generator_mode,
                terrain_scale: self.terrain_scale,
                lives: params.lives,
                ..Default::default()
            },
            cell_size: self.cell_size,
            seed,
            params,
            brush_radius: self.brush_radius,
            brush_shape: self.brush_shape,
            player_speed: self.player_speed,
            player_half_extent: self.player_half_extent,
            liquid_drag: self.liquid_drag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.grid_width(), 200);
        assert_eq!(config.grid_height(), 150);
        assert_eq!(config.brush_radius, 2);
        assert_eq!(config.world_seed, None);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig::default();

        // Set invalid values
        config.water_viscosity = 1.5;
        config.brush_radius = 40;
        config.tick_rate = 0;
        config.cell_size = f32::NAN;
        config.fire_life = -3;

        config.validate();

        // Should be clamped
        assert_eq!(config.water_viscosity, 1.0);
        assert_eq!(config.brush_radius, 8);
        assert_eq!(config.tick_rate, 1);
        assert_eq!(config.cell_size, 4.0);
        assert_eq!(config.fire_life, 1);
    }

    #[test]
    fn test_validation_keeps_grid_non_empty() {
        let mut config = SimConfig {
            world_width: 0,
            world_height: 1,
            cell_size: 8.0,
            ..Default::default()
        };

        config.validate();

        assert!(config.grid_width() >= 1);
        assert!(config.grid_height() >= 1);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("test_config.toml");

        // Create and save config
        let config = SimConfig {
            world_seed: Some(99),
            generator_mode: GeneratorMode::Arena,
            brush_shape: BrushShape::Diamond,
            lava_viscosity: 0.5,
            ..Default::default()
        };

        config.save_to(&config_path).expect("Failed to save config");

        // Load and verify
        let loaded = SimConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = SimConfig::load_from("/nonexistent/path/sandfall.toml");
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "frames = \"lots\"").expect("Failed to write");

        assert_eq!(SimConfig::load_from(&config_path), SimConfig::default());
    }

    #[test]
    fn test_read_from_reports_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);

        assert!(matches!(
            SimConfig::read_from(&config_path),
            Err(SandfallError::Io(_))
        ));

        fs::write(&config_path, "tick_rate = -").expect("Failed to write");
        assert!(matches!(
            SimConfig::read_from(&config_path),
            Err(SandfallError::Config(_))
        ));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "generator_mode = \"arena\"\nframes = 10\n")
            .expect("Failed to write");

        let config = SimConfig::load_from(&config_path);
        assert_eq!(config.generator_mode, GeneratorMode::Arena);
        assert_eq!(config.frames, 10);
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn test_session_config_mapping() {
        let config = SimConfig {
            fire_life: 7,
            cell_size: 8.0,
            ..Default::default()
        };

        let session = config.session_config(5);
        assert_eq!(session.seed, 5);
        assert_eq!(session.params.lives.fire, 7);
        assert_eq!(session.generator.lives.fire, 7);
        assert_eq!((session.generator.width, session.generator.height), (100, 75));
    }

    #[test]
    fn test_config_toml_serialization() {
        let config = SimConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("water_viscosity"));
        assert!(toml_str.contains("generator_mode = \"noise\""));
        // None seeds are omitted entirely
        assert!(!toml_str.contains("world_seed"));
    }
}
