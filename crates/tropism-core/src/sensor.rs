//! Sensors: noisy, quantized reads of world attributes.
//!
//! `granularity` is the width of the range one reported value stands for
//! (readings are rounded to the nearest multiple of it). `tolerance` is how
//! inconsistent the sensor is: every reading is offset by a uniform random
//! amount in `[-tolerance, +tolerance]` before rounding.
//!
//! For a world value of 8.531:
//! - granularity 3, tolerance 0.01 always reports 9
//! - granularity 0.01, tolerance 3 might report 6.23, 10.98 or 8.21
//! - granularity 1, tolerance 1 might report 8, 9 or 10

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::FactorMap;
use crate::ports::{NoiseSource, RandomNoise, World};

/// Sensor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub label: String,

    /// World attributes to read; each becomes a factor of the same name.
    /// A single string is accepted for one attribute.
    #[serde(default, deserialize_with = "one_or_many")]
    pub spectra: Vec<String>,

    #[serde(default)]
    pub tolerance: f64,

    /// `0` disables rounding.
    #[serde(default)]
    pub granularity: f64,

    #[serde(default)]
    pub source: SourceKind,
}

impl SensorConfig {
    pub fn new(label: impl Into<String>, spectra: &[&str]) -> Self {
        Self {
            label: label.into(),
            spectra: spectra.iter().map(|s| s.to_string()).collect(),
            tolerance: 0.0,
            granularity: 0.0,
            source: SourceKind::World,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_granularity(mut self, granularity: f64) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(spectrum) => vec![spectrum],
        OneOrMany::Many(spectra) => spectra,
    })
}

/// Serializable choice of where a configured sensor reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    World,
    Agent,
}

/// Where a sensor reads from.
#[derive(Clone)]
pub enum SensorSource {
    /// An external world shared with whatever drives it.
    World(Arc<dyn World>),
    /// The owning decider's own attributes.
    Agent,
}

impl fmt::Debug for SensorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorSource::World(_) => f.write_str("World"),
            SensorSource::Agent => f.write_str("Agent"),
        }
    }
}

pub struct Sensor {
    config: SensorConfig,
    source: SensorSource,
    noise: Box<dyn NoiseSource>,
}

impl Sensor {
    /// A sensor reading the owning decider's attributes.
    pub fn agent(config: SensorConfig) -> Self {
        Self::new(config, SensorSource::Agent)
    }

    /// A sensor reading an external world.
    pub fn world(config: SensorConfig, world: Arc<dyn World>) -> Self {
        Self::new(config, SensorSource::World(world))
    }

    pub fn new(config: SensorConfig, source: SensorSource) -> Self {
        Self {
            config,
            source,
            noise: Box::new(RandomNoise),
        }
    }

    pub fn with_noise(mut self, noise: Box<dyn NoiseSource>) -> Self {
        self.noise = noise;
        self
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn tolerance(&self) -> f64 {
        self.config.tolerance
    }

    pub fn granularity(&self) -> f64 {
        self.config.granularity
    }

    pub fn spectra(&self) -> &[String] {
        &self.config.spectra
    }

    pub fn source(&self) -> &SensorSource {
        &self.source
    }

    /// Read every spectrum from `world`.
    ///
    /// A missing attribute reads as NaN and stays NaN through noise and rounding.
    pub fn read(&mut self, world: &dyn World) -> FactorMap {
        let mut values = FactorMap::new();
        for spectrum in &self.config.spectra {
            let raw = world.sense(spectrum).unwrap_or(f64::NAN);
            let noisy = raw + self.config.tolerance * self.noise.jitter();
            values.insert(spectrum.clone(), quantize(noisy, self.config.granularity));
        }
        values
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("config", &self.config)
            .field("source", &self.source)
            .finish()
    }
}

/// Round `value` to the nearest multiple of `granularity`, halves toward +∞.
pub fn quantize(value: f64, granularity: f64) -> f64 {
    if granularity == 0.0 {
        value
    } else {
        (value / granularity + 0.5).floor() * granularity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{NoNoise, SeededNoise, SharedWorld};
    use rstest::rstest;

    fn world_with(attribute: &str, value: f64) -> Arc<dyn World> {
        let world = SharedWorld::new();
        world.set(attribute, value);
        Arc::new(world)
    }

    #[test]
    fn zero_tolerance_is_deterministic() {
        let world = world_with("light", 8.531);
        let mut sensor = Sensor::world(
            SensorConfig::new("lightSensor", &["light"]).with_granularity(5.0),
            Arc::clone(&world),
        );
        for _ in 0..100 {
            assert_eq!(sensor.read(world.as_ref())["light"], 10.0);
        }
    }

    #[rstest]
    #[case::coarse(3.0, 9.0)]
    #[case::unit(1.0, 9.0)]
    #[case::off(0.0, 8.531)]
    fn granularity_rounds_to_nearest_multiple(#[case] granularity: f64, #[case] expected: f64) {
        let world = world_with("x", 8.531);
        let mut sensor = Sensor::world(
            SensorConfig::new("s", &["x"]).with_granularity(granularity),
            Arc::clone(&world),
        );
        assert_eq!(sensor.read(world.as_ref())["x"], expected);
    }

    #[rstest]
    #[case(2.5, 1.0, 3.0)]
    #[case(-2.5, 1.0, -2.0)]
    #[case(-2.6, 1.0, -3.0)]
    fn halves_round_up(#[case] value: f64, #[case] granularity: f64, #[case] expected: f64) {
        assert_eq!(quantize(value, granularity), expected);
    }

    #[test]
    fn tolerance_bounds_the_offset() {
        let world = world_with("x", 8.531);
        let mut sensor = Sensor::world(
            SensorConfig::new("s", &["x"]).with_tolerance(3.0),
            Arc::clone(&world),
        )
        .with_noise(Box::new(SeededNoise::new(11)));

        for _ in 0..200 {
            let v = sensor.read(world.as_ref())["x"];
            assert!((5.531..=11.531).contains(&v), "reading out of tolerance: {v}");
        }
    }

    #[test]
    fn missing_attribute_reads_nan() {
        let world = world_with("x", 1.0);
        let mut sensor = Sensor::world(
            SensorConfig::new("s", &["x", "y"]).with_granularity(1.0),
            Arc::clone(&world),
        )
        .with_noise(Box::new(NoNoise));

        let values = sensor.read(world.as_ref());
        assert_eq!(values["x"], 1.0);
        assert!(values["y"].is_nan());
    }

    #[test]
    fn config_defaults_from_json() {
        let config: SensorConfig =
            serde_json::from_str(r#"{"label":"powerSensor","spectra":["_energy"],"source":"agent"}"#)
                .unwrap();
        assert_eq!(config.tolerance, 0.0);
        assert_eq!(config.granularity, 0.0);
        assert_eq!(config.source, SourceKind::Agent);
    }

    #[rstest]
    #[case::single(r#"{"label":"s","spectra":"x"}"#, vec!["x"])]
    #[case::list(r#"{"label":"s","spectra":["x","y"]}"#, vec!["x", "y"])]
    #[case::missing(r#"{"label":"s"}"#, vec![])]
    fn spectra_accepts_string_or_list(#[case] json: &str, #[case] expected: Vec<&str>) {
        let config: SensorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.spectra, expected);
    }

    #[test]
    fn spectra_rejects_other_shapes() {
        assert!(serde_json::from_str::<SensorConfig>(r#"{"label":"s","spectra":3}"#).is_err());
    }
}
