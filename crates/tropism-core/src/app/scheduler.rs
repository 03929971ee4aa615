use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::SimulationConfig;
use crate::decider::Decider;
use crate::domain::TropismError;
use crate::ports::SharedWorld;

/// Handle over the periodic tasks driving one decider.
///
/// - day cycle: flips `config.day_attribute` in the world every `day_period`
/// - sensor sweep: `read_sensors()` every `sweep_period`
/// - routine: invokes `config.routine` round-robin every `act_period` (if non-empty)
///
/// The decider sits behind one `tokio::sync::Mutex`; every factor merge and every
/// history append happens while holding it. Each task is a single interval loop,
/// so a sweep never overlaps the previous one.
pub struct Simulation {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl Simulation {
    pub fn spawn(
        config: &SimulationConfig,
        world: SharedWorld,
        decider: Arc<Mutex<Decider>>,
    ) -> Result<Self, TropismError> {
        config.validate()?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut joins = Vec::with_capacity(3);

        let attribute = config.day_attribute.clone();
        joins.push(spawn_periodic(
            "day_cycle",
            config.day_period(),
            shutdown_rx.clone(),
            move || {
                let value = world.toggle(&attribute);
                tracing::info!(attribute = %attribute, value, "day cycle");
                async {}
            },
        ));

        let sweep_target = Arc::clone(&decider);
        joins.push(spawn_periodic(
            "sensor_sweep",
            config.sweep_period(),
            shutdown_rx.clone(),
            move || {
                let decider = Arc::clone(&sweep_target);
                async move {
                    decider.lock().await.read_sensors();
                }
            },
        ));

        if !config.routine.is_empty() {
            let routine = config.routine.clone();
            let mut step = 0usize;
            joins.push(spawn_periodic(
                "routine",
                config.act_period(),
                shutdown_rx,
                move || {
                    let name = routine[step % routine.len()].clone();
                    step += 1;
                    let decider = Arc::clone(&decider);
                    async move {
                        if let Err(err) = decider.lock().await.invoke(&name, &[]) {
                            tracing::warn!(action = %name, error = %err, "routine step failed");
                        }
                    }
                },
            ));
        }

        Ok(Self { shutdown_tx, joins })
    }

    /// Ask every task to stop after its current tick.
    pub fn request_shutdown(&self) {
        // ignore send error: receivers may already be dropped
        let _ = self.shutdown_tx.send(true);
    }

    /// Shutdown and wait for all tasks.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for join in self.joins {
            let _ = join.await;
        }
    }
}

/// Run `on_tick` every `period` (first run one period after start) until shutdown.
fn spawn_periodic<F, Fut>(
    task: &'static str,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
    mut on_tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            if *shutdown_rx.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => on_tick().await,
            }
        }
        tracing::debug!(task, "periodic task stopped");
    })
}
