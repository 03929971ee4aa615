//! Simulation settings.
//!
//! Every field has a default, so a config file only needs the fields it changes:
//! ```json
//! { "day_period_ms": 1000, "run_for_ms": 4000, "seed": 7 }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::TropismError;
use crate::sensor::{SensorConfig, SourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// How often the day-cycle attribute flips.
    pub day_period_ms: u64,

    /// How often every sensor is polled.
    pub sweep_period_ms: u64,

    /// How often the routine invokes its next action.
    pub act_period_ms: u64,

    /// How long the CLI lets the simulation run.
    pub run_for_ms: u64,

    /// World attribute the day cycle toggles between 1 and 0.
    pub day_attribute: String,

    /// Seeds sensor noise when set; otherwise every reading draws fresh randomness.
    pub seed: Option<u64>,

    /// Action names invoked round-robin. Empty disables the routine.
    pub routine: Vec<String>,

    pub sensors: Vec<SensorConfig>,
}

impl SimulationConfig {
    /// The sample scenario: a light sensor on the world and a power sensor on the agent.
    pub fn default_sample() -> Self {
        Self {
            day_period_ms: 5000,
            sweep_period_ms: 16,
            act_period_ms: 250,
            run_for_ms: 12_000,
            day_attribute: "isLightOutside".to_string(),
            seed: None,
            routine: vec![
                "lookOutside".to_string(),
                "photosynthesize".to_string(),
                "sitThere".to_string(),
            ],
            sensors: vec![
                SensorConfig::new("lightSensor", &["isLightOutside"]),
                SensorConfig::new("powerSensor", &["_energy"]).with_source(SourceKind::Agent),
            ],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, TropismError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TropismError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Periods must be non-zero; sensor tolerance and granularity must be finite and non-negative.
    pub fn validate(&self) -> Result<(), TropismError> {
        for (field, value) in [
            ("day_period_ms", self.day_period_ms),
            ("sweep_period_ms", self.sweep_period_ms),
            ("act_period_ms", self.act_period_ms),
        ] {
            if value == 0 {
                return Err(TropismError::InvalidConfig(format!("{field} must be > 0")));
            }
        }
        for sensor in &self.sensors {
            for (field, value) in [("tolerance", sensor.tolerance), ("granularity", sensor.granularity)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(TropismError::InvalidConfig(format!(
                        "sensor {}: {field} must be finite and >= 0 (got {value})",
                        sensor.label
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn day_period(&self) -> Duration {
        Duration::from_millis(self.day_period_ms)
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_millis(self.sweep_period_ms)
    }

    pub fn act_period(&self) -> Duration {
        Duration::from_millis(self.act_period_ms)
    }

    pub fn run_for(&self) -> Duration {
        Duration::from_millis(self.run_for_ms)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::default_sample()
    }
}
