//! Summaries: what an action tends to do under each profile.

use serde::{Deserialize, Serialize};

use super::aggregate::{Aggregate, AggregateMode, aggregate};
use super::profile::{ProfileGranularity, profile};
use crate::domain::{Instance, TrendMap};

/// A profile paired with the deltas observed across its instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub profile: TrendMap,
    pub outcome: Aggregate,
    pub instances: Vec<usize>,
}

/// `Deltas` aggregate per profile, in the same order as [`profile`].
pub fn summarize(instances: &[Instance], granularity: ProfileGranularity) -> Vec<SummaryEntry> {
    profile(instances, granularity)
        .into_iter()
        .map(|p| {
            let members = p.instances.iter().filter_map(|&i| instances.get(i));
            SummaryEntry {
                outcome: aggregate(members, AggregateMode::Deltas),
                profile: p.profile,
                instances: p.instances,
            }
        })
        .collect()
}
