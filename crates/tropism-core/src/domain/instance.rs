//! Instance model: one recorded execution of an action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::factors::FactorMap;

/// A single completed execution of an action.
///
/// Records:
/// - the factors right before the function ran (`before`)
/// - the factors right after it returned (`after`)
/// - when the execution was recorded
///
/// Both mappings are snapshots; later changes to live state never reach them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub before: FactorMap,
    pub after: FactorMap,
    pub recorded_at: DateTime<Utc>,
}

impl Instance {
    pub fn new(before: FactorMap, after: FactorMap, recorded_at: DateTime<Utc>) -> Self {
        Self {
            before,
            after,
            recorded_at,
        }
    }

    /// `after[f] - before[f]`, or `None` when `before` has no `f`.
    ///
    /// A factor removed during the execution has a NaN delta.
    pub fn delta(&self, factor: &str) -> Option<f64> {
        let before = self.before.get(factor)?;
        Some(self.after.get(factor).map_or(f64::NAN, |after| after - before))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(pairs: &[(&str, f64)]) -> FactorMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn delta_is_keyed_by_before() {
        let instance = Instance::new(
            factors(&[("energy", 0.25), ("light", 1.0)]),
            factors(&[("energy", 0.75), ("mood", 3.0)]),
            Utc::now(),
        );

        assert_eq!(instance.delta("energy"), Some(0.5));
        // removed during the execution
        assert!(instance.delta("light").unwrap().is_nan());
        // added during the execution
        assert_eq!(instance.delta("mood"), None);
    }
}
