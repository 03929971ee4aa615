//! Profiling: cluster executions by how their starting factors compare to history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::aggregate::{AggregateMode, aggregate};
use crate::domain::{Instance, Trend, TrendMap};

/// What one comparison event covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileGranularity {
    /// One event per (instance, factor): every trend mapping has a single key.
    #[default]
    PerFactor,
    /// One event per instance: the mapping covers all of the instance's `before` factors.
    PerInstance,
}

/// A trend signature and the instances that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub profile: TrendMap,

    /// Indices into the history, ascending, without duplicates.
    pub instances: Vec<usize>,
}

/// Group `instances` by trend signature against their full-history `Values` aggregate.
///
/// Profiles come back in first-seen order: instances in execution order, factors
/// in name order. An empty history has no profiles.
pub fn profile(instances: &[Instance], granularity: ProfileGranularity) -> Vec<Profile> {
    let baseline = aggregate(instances, AggregateMode::Values);
    let mut grouping = Grouping::default();

    for (index, instance) in instances.iter().enumerate() {
        let trends = instance.before.iter().filter_map(|(factor, value)| {
            baseline
                .get(factor)
                .map(|entry| (factor.clone(), Trend::classify(*value, entry)))
        });

        match granularity {
            ProfileGranularity::PerFactor => {
                for (factor, trend) in trends {
                    grouping.record(TrendMap::from([(factor, trend)]), index);
                }
            }
            ProfileGranularity::PerInstance => {
                let signature: TrendMap = trends.collect();
                if !signature.is_empty() {
                    grouping.record(signature, index);
                }
            }
        }
    }

    grouping.profiles
}

#[derive(Default)]
struct Grouping {
    profiles: Vec<Profile>,
    by_signature: BTreeMap<TrendMap, usize>,
}

impl Grouping {
    fn record(&mut self, signature: TrendMap, index: usize) {
        match self.by_signature.get(&signature) {
            Some(&slot) => {
                let members = &mut self.profiles[slot].instances;
                if members.last() != Some(&index) {
                    members.push(index);
                }
            }
            None => {
                self.by_signature.insert(signature.clone(), self.profiles.len());
                self.profiles.push(Profile {
                    profile: signature,
                    instances: vec![index],
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FactorMap;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn factors(pairs: &[(&str, f64)]) -> FactorMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn instance(before: &[(&str, f64)]) -> Instance {
        let before = factors(before);
        Instance::new(before.clone(), before, Utc::now())
    }

    fn trends(pairs: &[(&str, Trend)]) -> TrendMap {
        pairs.iter().map(|(k, t)| (k.to_string(), *t)).collect()
    }

    #[test]
    fn empty_history_has_no_profiles() {
        assert!(profile(&[], ProfileGranularity::PerFactor).is_empty());
        assert!(profile(&[], ProfileGranularity::PerInstance).is_empty());
    }

    #[test]
    fn per_factor_groups_single_key_signatures_in_first_seen_order() {
        // energy: mean 0.5, max 0.9, min 0.1 -> band (0.46, 0.54)
        let instances = vec![
            instance(&[("energy", 0.1), ("light", 1.0)]),
            instance(&[("energy", 0.5), ("light", 0.0)]),
            instance(&[("energy", 0.9), ("light", 1.0)]),
        ];

        let profiles = profile(&instances, ProfileGranularity::PerFactor);
        let got: Vec<(TrendMap, Vec<usize>)> = profiles
            .into_iter()
            .map(|p| (p.profile, p.instances))
            .collect();

        // light: mean 2/3, max 1, min 0 -> 1.0 is above, 0.0 is below
        assert_eq!(
            got,
            vec![
                (trends(&[("energy", Trend::Below)]), vec![0]),
                (trends(&[("light", Trend::Above)]), vec![0, 2]),
                (trends(&[("energy", Trend::Normal)]), vec![1]),
                (trends(&[("light", Trend::Below)]), vec![1]),
                (trends(&[("energy", Trend::Above)]), vec![2]),
            ]
        );
    }

    #[test]
    fn per_factor_covers_every_instance_factor_pair_once() {
        let instances = vec![
            instance(&[("a", 1.0), ("b", 5.0)]),
            instance(&[("a", 2.0)]),
            instance(&[("b", 7.0), ("c", 0.0)]),
            instance(&[("a", 9.0), ("b", 6.0), ("c", 1.0)]),
        ];

        let mut seen: Vec<(usize, String)> = Vec::new();
        for p in profile(&instances, ProfileGranularity::PerFactor) {
            let factor = p.profile.keys().next().unwrap().clone();
            assert_eq!(p.profile.len(), 1);
            for i in p.instances {
                seen.push((i, factor.clone()));
            }
        }
        let expected: Vec<(usize, String)> = instances
            .iter()
            .enumerate()
            .flat_map(|(i, inst)| inst.before.keys().map(move |f| (i, f.clone())))
            .collect();

        let seen_set: BTreeSet<_> = seen.iter().cloned().collect();
        assert_eq!(seen.len(), seen_set.len(), "a pair landed in two profiles");
        assert_eq!(seen_set, expected.into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn per_instance_uses_whole_signature() {
        let instances = vec![
            instance(&[("energy", 0.1), ("light", 1.0)]),
            instance(&[("energy", 0.9), ("light", 1.0)]),
            instance(&[("energy", 0.1), ("light", 1.0)]),
            instance(&[]),
        ];

        let profiles = profile(&instances, ProfileGranularity::PerInstance);
        assert_eq!(profiles.len(), 2);
        assert_eq!(
            profiles[0].profile,
            trends(&[("energy", Trend::Below), ("light", Trend::Normal)])
        );
        assert_eq!(profiles[0].instances, vec![0, 2]);
        assert_eq!(
            profiles[1].profile,
            trends(&[("energy", Trend::Above), ("light", Trend::Normal)])
        );
        assert_eq!(profiles[1].instances, vec![1]);
    }

    #[test]
    fn single_instance_is_normal_everywhere() {
        let instances = vec![instance(&[("energy", 0.3)])];
        let profiles = profile(&instances, ProfileGranularity::PerFactor);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].profile, trends(&[("energy", Trend::Normal)]));
    }
}
