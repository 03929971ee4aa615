use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use tropism_core::app::{DeciderBuilder, Simulation};
use tropism_core::observability::DeciderStatus;
use tropism_core::ports::SharedWorld;
use tropism_core::stats::SummaryEntry;
use tropism_core::{Action, AgentState, SimulationConfig};

const ENERGY: &str = "_energy";

/// 実行後に出力するレポート
#[derive(Debug, Serialize)]
struct Report {
    status: DeciderStatus,
    summaries: BTreeMap<String, Vec<SummaryEntry>>,
}

fn sit_there() -> Action<AgentState> {
    Action::new("sitThere", |_: &mut AgentState, args: &[Value]| {
        match args.first().and_then(Value::as_str) {
            Some(companion) => tracing::info!("not doing anything with {companion}"),
            None => tracing::info!("not doing anything"),
        }
        Ok(())
    })
}

fn look_outside(world: SharedWorld, attribute: String) -> Action<AgentState> {
    Action::new("lookOutside", move |state: &mut AgentState, _: &[Value]| {
        let light = world.get(&attribute).unwrap_or(0.0);
        tracing::info!("It {} light out", if light != 0.0 { "is" } else { "isn't" });
        state.factors.insert(attribute.clone(), light);
        Ok(())
    })
}

fn photosynthesize(world: SharedWorld, attribute: String) -> Action<AgentState> {
    Action::new("photosynthesize", move |state: &mut AgentState, _: &[Value]| {
        let mut energy = state.adjust_attribute(ENERGY, 1.0, -0.1, 0.0, 1.0);
        if world.get(&attribute).is_some_and(|light| light != 0.0) {
            energy = state.adjust_attribute(ENERGY, 1.0, 0.5, 0.0, 1.0);
        }
        tracing::info!(energy, "photosynthesized");
        Ok(())
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tropism_core=info,tropism_cli=info")),
        )
        .init();

    // (A) 設定を読む（引数があれば JSON ファイル、なければサンプル設定）
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_path(&path)?,
        None => SimulationConfig::default_sample(),
    };
    tracing::info!(?config, "starting simulation");

    // (B) 外界と Decider を用意
    let world = SharedWorld::new();
    world.set(&config.day_attribute, 1.0);

    let mut state = AgentState::default();
    state.attributes.insert(ENERGY.to_string(), 1.0);

    let decider = DeciderBuilder::new()
        .state(state)
        .action(sit_there())?
        .action(look_outside(world.clone(), config.day_attribute.clone()))?
        .action(photosynthesize(world.clone(), config.day_attribute.clone()))?
        .sensors_from_config(&config.sensors, Arc::new(world.clone()), config.seed)
        .expect_actions(&["sitThere", "lookOutside", "photosynthesize"])
        .build()?;
    let decider = Arc::new(Mutex::new(decider));

    // (C) 周期タスクを起動して、run_for か Ctrl-C まで待つ
    let sim = Simulation::spawn(&config, world, Arc::clone(&decider))?;
    tokio::select! {
        _ = tokio::time::sleep(config.run_for()) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }
    sim.shutdown_and_join().await;

    // (D) 各 action の summarize() をまとめて出力
    let decider = decider.lock().await;
    let summaries = decider_summaries(&decider);
    let report = Report {
        status: DeciderStatus::capture(&decider),
        summaries,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn decider_summaries(decider: &tropism_core::Decider) -> BTreeMap<String, Vec<SummaryEntry>> {
    decider
        .action_names()
        .into_iter()
        .filter_map(|name| {
            let summary = decider.action(&name)?.summarize();
            Some((name, summary))
        })
        .collect()
}
