//! Factor mappings and the snapshot helper.

use std::collections::BTreeMap;

/// Named numeric factors describing world or agent state at one point in time.
///
/// A `BTreeMap` keeps iteration sorted by factor name, so everything that walks
/// factors (aggregation, profiling, JSON output) sees the same order every run.
pub type FactorMap = BTreeMap<String, f64>;

/// Freeze a factor mapping.
///
/// Values are scalars, so one level of copying is enough: the result shares no
/// storage with `factors`.
pub fn snapshot(factors: &FactorMap) -> FactorMap {
    factors.clone()
}
