use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::{ActionError, FactorMap, Instance, snapshot};
use crate::ports::{Clock, SystemClock};
use crate::stats::{
    self, Aggregate, AggregateOptions, Profile, ProfileGranularity, SummaryEntry,
};

/// Anything that owns the live factor mapping an action is snapshotted from.
pub trait HasFactors {
    fn factors(&self) -> &FactorMap;
}

impl HasFactors for FactorMap {
    fn factors(&self) -> &FactorMap {
        self
    }
}

/// The side-effecting body of an action.
///
/// Receives the execution context and free-form call arguments.
pub type ActionFn<C> = dyn Fn(&mut C, &[Value]) -> Result<(), ActionError> + Send + Sync;

/// A named operation plus the history of every completed execution.
///
/// Design:
/// - `invoke()` snapshots the context's factors around the function call.
/// - History is append-only; position = execution order.
/// - Analysis (`aggregate`, `profile`, `summarize`) only reads history.
pub struct Action<C> {
    name: String,
    func: Box<ActionFn<C>>,
    instances: Vec<Instance>,
    clock: Arc<dyn Clock>,
}

impl<C: HasFactors> Action<C> {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut C, &[Value]) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
            instances: Vec::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to timestamp instances.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Run the action against `ctx` and record the execution.
    ///
    /// Returns the index of the new instance. If the function fails its error is
    /// returned unchanged and history is left untouched; whatever the function
    /// already wrote to `ctx` stays there.
    pub fn invoke(&mut self, ctx: &mut C, args: &[Value]) -> Result<usize, ActionError> {
        let before = snapshot(ctx.factors());
        if let Err(err) = (self.func)(ctx, args) {
            tracing::warn!(action = %self.name, error = %err, "action failed; nothing recorded");
            return Err(err);
        }
        let after = snapshot(ctx.factors());

        let index = self.instances.len();
        self.instances
            .push(Instance::new(before, after, self.clock.now()));
        tracing::debug!(action = %self.name, index, "instance recorded");
        Ok(index)
    }

    /// Per-factor statistics over the selected instances.
    pub fn aggregate(&self, options: &AggregateOptions) -> Aggregate {
        match &options.subset {
            None => stats::aggregate(&self.instances, options.mode),
            Some(subset) => stats::aggregate(
                subset.iter().filter_map(|&i| self.instances.get(i)),
                options.mode,
            ),
        }
    }

    /// Profiles with one comparison event per (instance, factor).
    pub fn profile(&self) -> Vec<Profile> {
        self.profile_with(ProfileGranularity::PerFactor)
    }

    pub fn profile_with(&self, granularity: ProfileGranularity) -> Vec<Profile> {
        stats::profile(&self.instances, granularity)
    }

    /// Deltas per profile, in `profile()` order.
    pub fn summarize(&self) -> Vec<SummaryEntry> {
        self.summarize_with(ProfileGranularity::PerFactor)
    }

    pub fn summarize_with(&self, granularity: ProfileGranularity) -> Vec<SummaryEntry> {
        stats::summarize(&self.instances, granularity)
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("instances", &self.instances.len())
            .finish()
    }
}
