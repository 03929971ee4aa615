//! Aggregation: one pass, incremental per (instance, factor) pair.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Instance;

/// Which number an instance contributes for a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMode {
    /// `before[f]`
    #[default]
    Values,
    /// `after[f] - before[f]`, NaN when `after` has no `f`
    Deltas,
}

/// Running statistics for one factor.
///
/// Invariant: `mean == sum / count`, and `count >= 1` for every entry that exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl AggregateEntry {
    /// Entry for the first observed value.
    pub fn new(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            mean: value,
            max: value,
            min: value,
        }
    }

    pub fn observe(&mut self, value: f64) {
        if value > self.max {
            self.max = value;
        }
        if value < self.min {
            self.min = value;
        }
        self.count += 1;
        self.sum += value;
        self.mean = self.sum / self.count as f64;
    }
}

/// Per-factor statistics. Factors never observed are absent, never `count: 0`.
pub type Aggregate = BTreeMap<String, AggregateEntry>;

/// Options for `Action::aggregate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    pub mode: AggregateMode,

    /// Instance indices to restrict to. `None` means the whole history.
    /// Indices past the end of the history are skipped.
    pub subset: Option<Vec<usize>>,
}

impl AggregateOptions {
    pub fn values() -> Self {
        Self {
            mode: AggregateMode::Values,
            subset: None,
        }
    }

    pub fn deltas() -> Self {
        Self {
            mode: AggregateMode::Deltas,
            subset: None,
        }
    }

    pub fn with_subset(mut self, subset: Vec<usize>) -> Self {
        self.subset = Some(subset);
        self
    }
}

/// Aggregate `instances` in one pass.
///
/// Only factors present in an instance's `before` contribute, once per instance.
/// In `Deltas` mode a factor missing from `after` contributes NaN.
pub fn aggregate<'a, I>(instances: I, mode: AggregateMode) -> Aggregate
where
    I: IntoIterator<Item = &'a Instance>,
{
    let mut result = Aggregate::new();
    for instance in instances {
        for (factor, before) in &instance.before {
            let value = match mode {
                AggregateMode::Values => *before,
                AggregateMode::Deltas => instance.delta(factor).unwrap_or(f64::NAN),
            };
            result
                .entry(factor.clone())
                .and_modify(|entry| entry.observe(value))
                .or_insert_with(|| AggregateEntry::new(value));
        }
    }
    result
}
