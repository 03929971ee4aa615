use std::collections::HashMap;

use serde_json::Value;

use crate::action::{Action, HasFactors};
use crate::domain::{FactorMap, TropismError};
use crate::sensor::{Sensor, SensorSource};

/// Live state an action runs against.
///
/// - `factors`: the shared factor mapping sensors write and actions read/write.
/// - `attributes`: agent-internal values (e.g. `_energy`) that agent-sourced
///   sensors observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentState {
    pub factors: FactorMap,
    pub attributes: FactorMap,
}

impl AgentState {
    /// Add `delta` to an attribute, clamped to `[min, max]`, and return the new value.
    ///
    /// A missing attribute starts from `default`.
    pub fn adjust_attribute(&mut self, name: &str, default: f64, delta: f64, min: f64, max: f64) -> f64 {
        let value = self.attributes.entry(name.to_string()).or_insert(default);
        *value = (*value + delta).clamp(min, max);
        *value
    }
}

impl HasFactors for AgentState {
    fn factors(&self) -> &FactorMap {
        &self.factors
    }
}

/// Owner of the shared factor mapping, its actions and its sensors.
///
/// Design:
/// - Actions are looked up by name (`invoke`), never exposed as dynamic members.
/// - Sensors keep registration order; `read_sensors` merges in that order, so a
///   later sensor wins when two report the same factor.
#[derive(Debug, Default)]
pub struct Decider {
    state: AgentState,
    actions: HashMap<String, Action<AgentState>>,
    sensors: Vec<Sensor>,
}

impl Decider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under its name.
    pub fn add_action(&mut self, action: Action<AgentState>) -> Result<(), TropismError> {
        let name = action.name().to_string();
        if self.actions.contains_key(&name) {
            return Err(TropismError::DuplicateAction(name));
        }
        self.actions.insert(name, action);
        Ok(())
    }

    /// Register a sensor by label. Re-using a label replaces the sensor in place.
    pub fn add_sensor(&mut self, sensor: Sensor) {
        match self.sensors.iter().position(|s| s.label() == sensor.label()) {
            Some(slot) => self.sensors[slot] = sensor,
            None => self.sensors.push(sensor),
        }
    }

    /// Run a registered action against this decider's state.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<usize, TropismError> {
        let action = self
            .actions
            .get_mut(name)
            .ok_or_else(|| TropismError::UnknownAction(name.to_string()))?;
        Ok(action.invoke(&mut self.state, args)?)
    }

    /// Poll every sensor and merge its readings into `factors`.
    pub fn read_sensors(&mut self) {
        for sensor in &mut self.sensors {
            let readings = match sensor.source().clone() {
                SensorSource::World(world) => sensor.read(world.as_ref()),
                SensorSource::Agent => sensor.read(&self.state.attributes),
            };
            self.state.factors.extend(readings);
        }
        tracing::trace!(sensors = self.sensors.len(), "sensor sweep");
    }

    /// Refresh factors ahead of a decision. `bias` is accepted but not used yet.
    pub fn consider(&mut self, _bias: Option<&FactorMap>) {
        self.read_sensors();
    }

    pub fn action(&self, name: &str) -> Option<&Action<AgentState>> {
        self.actions.get(name)
    }

    /// Registered action names, sorted.
    pub fn action_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    pub fn factors(&self) -> &FactorMap {
        &self.state.factors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActionError;
    use crate::ports::{NoNoise, SharedWorld, World};
    use crate::sensor::SensorConfig;
    use crate::stats::AggregateOptions;
    use std::sync::Arc;

    fn noop(name: &str) -> Action<AgentState> {
        Action::new(name, |_: &mut AgentState, _: &[Value]| Ok(()))
    }

    #[test]
    fn later_sensor_wins_on_collision() {
        let a = SharedWorld::new();
        a.set("x", 1.0);
        let b = SharedWorld::new();
        b.set("x", 2.0);

        let mut decider = Decider::new();
        decider.add_sensor(Sensor::world(SensorConfig::new("A", &["x"]), Arc::new(a)));
        decider.add_sensor(Sensor::world(SensorConfig::new("B", &["x"]), Arc::new(b)));
        decider.read_sensors();

        assert_eq!(decider.factors()["x"], 2.0);
    }

    #[test]
    fn relabelled_sensor_keeps_its_position() {
        let a = SharedWorld::new();
        a.set("x", 1.0);
        let b = SharedWorld::new();
        b.set("x", 2.0);
        let c = SharedWorld::new();
        c.set("x", 3.0);

        let mut decider = Decider::new();
        decider.add_sensor(Sensor::world(SensorConfig::new("A", &["x"]), Arc::new(a)));
        decider.add_sensor(Sensor::world(SensorConfig::new("B", &["x"]), Arc::new(b)));
        decider.add_sensor(Sensor::world(SensorConfig::new("A", &["x"]), Arc::new(c)));
        decider.read_sensors();

        let labels: Vec<&str> = decider.sensors().iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(decider.factors()["x"], 2.0);
    }

    #[test]
    fn agent_sensor_reads_own_attributes() {
        let mut decider = Decider::new();
        decider.state_mut().attributes.insert("_energy".to_string(), 0.75);
        decider.add_sensor(
            Sensor::agent(SensorConfig::new("powerSensor", &["_energy"]))
                .with_noise(Box::new(NoNoise)),
        );

        decider.consider(None);
        assert_eq!(decider.factors()["_energy"], 0.75);
    }

    #[test]
    fn duplicate_action_is_rejected() {
        let mut decider = Decider::new();
        decider.add_action(noop("sitThere")).unwrap();
        let err = decider.add_action(noop("sitThere")).unwrap_err();
        assert!(matches!(err, TropismError::DuplicateAction(name) if name == "sitThere"));
        assert_eq!(decider.action_names(), vec!["sitThere".to_string()]);
    }

    #[test]
    fn invoke_unknown_action_errors() {
        let mut decider = Decider::new();
        let err = decider.invoke("fly", &[]).unwrap_err();
        assert!(err.to_string().contains("fly"));
    }

    #[test]
    fn invoke_uses_shared_factors() {
        let world = SharedWorld::new();
        world.set("isLightOutside", 1.0);
        let shared: Arc<dyn World> = Arc::new(world.clone());

        let mut decider = Decider::new();
        decider.add_sensor(Sensor::world(
            SensorConfig::new("lightSensor", &["isLightOutside"]),
            shared,
        ));
        decider
            .add_action(Action::new("lookOutside", move |state: &mut AgentState, _: &[Value]| {
                let light = world.get("isLightOutside").unwrap_or(0.0);
                state.factors.insert("isLightOutside".to_string(), light);
                Ok(())
            }))
            .unwrap();

        decider.read_sensors();
        assert_eq!(decider.invoke("lookOutside", &[]).unwrap(), 0);
        assert_eq!(decider.invoke("lookOutside", &[]).unwrap(), 1);

        let action = decider.action("lookOutside").unwrap();
        let agg = action.aggregate(&AggregateOptions::values());
        assert_eq!(agg["isLightOutside"].count, 2);
    }

    #[test]
    fn failing_action_propagates_and_records_nothing() {
        let mut decider = Decider::new();
        decider
            .add_action(Action::new("stumble", |_: &mut AgentState, _: &[Value]| {
                Err(ActionError::new("tripped"))
            }))
            .unwrap();

        let err = decider.invoke("stumble", &[]).unwrap_err();
        assert!(matches!(err, TropismError::Action(ref e) if e.message() == "tripped"));
        assert_eq!(err.to_string(), "tripped");
        assert!(decider.action("stumble").unwrap().is_empty());
    }

    #[test]
    fn adjust_attribute_clamps() {
        let mut state = AgentState::default();
        assert_eq!(state.adjust_attribute("_energy", 1.0, -0.1, 0.0, 1.0), 0.9);
        assert_eq!(state.adjust_attribute("_energy", 1.0, 0.5, 0.0, 1.0), 1.0);
        assert_eq!(state.adjust_attribute("_energy", 1.0, -5.0, 0.0, 1.0), 0.0);
    }
}
