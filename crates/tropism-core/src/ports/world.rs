//! World port - センサーが読む外界
//!
//! 外界は Decider の外側にあり、周期タスク（昼夜の切り替えなど）が書き換える。
//! Sensor は読み取り時点の値をそのまま使う。

use std::sync::{Arc, RwLock};

use crate::domain::FactorMap;

/// World exposes named numeric attributes to sensors.
pub trait World: Send + Sync {
    /// Current value of `attribute`, or `None` when the world has no such attribute.
    fn sense(&self, attribute: &str) -> Option<f64>;
}

impl World for FactorMap {
    fn sense(&self, attribute: &str) -> Option<f64> {
        self.get(attribute).copied()
    }
}

/// A world shared between periodic writers and sensor readers.
///
/// Cloning shares the same underlying attributes.
#[derive(Debug, Clone, Default)]
pub struct SharedWorld {
    attributes: Arc<RwLock<FactorMap>>,
}

impl SharedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, attribute: impl Into<String>, value: f64) {
        // values are plain f64s; a poisoned lock still holds a consistent map
        let mut attributes = self.attributes.write().unwrap_or_else(|e| e.into_inner());
        attributes.insert(attribute.into(), value);
    }

    pub fn get(&self, attribute: &str) -> Option<f64> {
        let attributes = self.attributes.read().unwrap_or_else(|e| e.into_inner());
        attributes.get(attribute).copied()
    }

    /// Flip a boolean-valued attribute (`0` ↔ `1`) and return the new value.
    ///
    /// A missing attribute counts as `0` and becomes `1`.
    pub fn toggle(&self, attribute: &str) -> f64 {
        let mut attributes = self.attributes.write().unwrap_or_else(|e| e.into_inner());
        let entry = attributes.entry(attribute.to_string()).or_insert(0.0);
        *entry = if *entry != 0.0 { 0.0 } else { 1.0 };
        *entry
    }
}

impl World for SharedWorld {
    fn sense(&self, attribute: &str) -> Option<f64> {
        self.get(attribute)
    }
}
