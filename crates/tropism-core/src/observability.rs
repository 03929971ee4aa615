use serde::{Deserialize, Serialize};

use crate::decider::Decider;
use crate::domain::FactorMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionStats {
    pub name: String,
    pub instances: usize,
}

/// Point-in-time view of a decider for logs and reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeciderStatus {
    pub factors: FactorMap,
    pub attributes: FactorMap,
    pub sensors: Vec<String>,
    pub actions: Vec<ActionStats>,
}

impl DeciderStatus {
    pub fn capture(decider: &Decider) -> Self {
        let actions = decider
            .action_names()
            .into_iter()
            .map(|name| ActionStats {
                instances: decider.action(&name).map_or(0, |a| a.len()),
                name,
            })
            .collect();
        Self {
            factors: decider.factors().clone(),
            attributes: decider.state().attributes.clone(),
            sensors: decider.sensors().iter().map(|s| s.label().to_string()).collect(),
            actions,
        }
    }
}
