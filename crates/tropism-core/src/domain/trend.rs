//! Trend classification against a historical distribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::TropismError;
use crate::stats::AggregateEntry;

/// Share of the distance between mean and extreme that still counts as normal.
pub const NORMAL_BAND: f64 = 0.1;

/// Where a value sits relative to its factor's history.
///
/// Serialized as `-1`, `0`, `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Trend {
    Below,
    Normal,
    Above,
}

/// Trend per factor name. The identity of a profile.
pub type TrendMap = BTreeMap<String, Trend>;

impl Trend {
    /// Classify `value` against `entry`.
    ///
    /// ```text
    /// upper = mean + 0.1 * (max - mean)
    /// lower = mean - 0.1 * (mean - min)
    /// ```
    /// Both bounds are exclusive: a value exactly on a bound is `Normal`.
    /// When `max == mean` the upper band collapses onto the mean (same for `min`).
    pub fn classify(value: f64, entry: &AggregateEntry) -> Self {
        let upper = entry.mean + NORMAL_BAND * (entry.max - entry.mean);
        let lower = entry.mean - NORMAL_BAND * (entry.mean - entry.min);
        if value > upper {
            Trend::Above
        } else if value < lower {
            Trend::Below
        } else {
            Trend::Normal
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Trend::Below => -1,
            Trend::Normal => 0,
            Trend::Above => 1,
        }
    }
}

impl From<Trend> for i8 {
    fn from(trend: Trend) -> Self {
        trend.as_i8()
    }
}

impl TryFrom<i8> for Trend {
    type Error = TropismError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Trend::Below),
            0 => Ok(Trend::Normal),
            1 => Ok(Trend::Above),
            other => Err(TropismError::InvalidTrend(other)),
        }
    }
}
