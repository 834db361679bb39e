use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

use vsss_navigation::{DriveProfile, FieldGeometry, ObstacleStrategy};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Everything the match harness reads from configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldGeometry,
    pub drive: DriveProfile,
    pub sim: SimSettings,
    pub control: ControlGains,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Feed and control rate (Hz).
    pub tick_hz: u32,
    /// Match length (s).
    pub duration_s: f64,
    pub robots_per_team: u8,
    pub obstacle_strategy: ObstacleStrategy,
    /// Fraction of ball speed kept per second.
    pub ball_damping: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        SimSettings {
            tick_hz: 60,
            duration_s: 10.0,
            robots_per_team: 3,
            obstacle_strategy: ObstacleStrategy::Filtered,
            ball_damping: 0.6,
        }
    }
}

impl SimSettings {
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.tick_hz.max(1))
    }

    pub fn ticks(&self) -> u64 {
        (self.duration_s * f64::from(self.tick_hz)).max(0.0) as u64
    }
}

/// Gains of the go-to-target controller standing in for the strategy layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlGains {
    pub kp_linear: f64,
    pub kp_angular: f64,
    /// Obstacles closer than this (cm) bend the path.
    pub avoid_radius: f64,
    pub avoid_gain: f64,
    /// Cap on the commanded turn rate (rad/s), on top of the robot's own limit.
    pub max_turn_rate: f64,
}

impl Default for ControlGains {
    fn default() -> Self {
        ControlGains {
            kp_linear: 1.5,
            kp_angular: 6.0,
            avoid_radius: 15.0,
            avoid_gain: 8.0,
            max_turn_rate: 12.0,
        }
    }
}

impl ControlGains {
    /// Rejects gains the controller cannot clamp against.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gains = [self.kp_linear, self.kp_angular, self.avoid_gain];
        if gains.iter().any(|g| !g.is_finite()) {
            return Err(ConfigError::Message("control gains must be finite".into()));
        }
        // `!(x >= 0.0)` also rejects NaN.
        if !(self.max_turn_rate >= 0.0) {
            return Err(ConfigError::Message("control.max_turn_rate must be non-negative".into()));
        }
        if !(self.avoid_radius >= 0.0) {
            return Err(ConfigError::Message("control.avoid_radius must be non-negative".into()));
        }
        Ok(())
    }
}

impl Settings {
    /// Check every section before the match starts.
    pub fn validate(self) -> Result<Self, ConfigError> {
        self.field
            .validate()
            .map_err(|e| ConfigError::Message(format!("field: {}", e)))?;
        self.drive
            .validate()
            .map_err(|e| ConfigError::Message(format!("drive: {}", e)))?;
        self.control.validate()?;
        Ok(self)
    }
}

/// Load `config/default.toml`, then apply `VSSS__SECTION__KEY` environment overrides.
pub fn load_settings() -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("VSSS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(|config| config.try_deserialize::<Settings>())
        .and_then(Settings::validate);

    match settings {
        Ok(settings) => {
            info!(?settings.field, ?settings.sim, "Successfully loaded configuration");
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}
