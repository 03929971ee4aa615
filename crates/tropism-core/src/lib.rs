//! tropism-core
//!
//! Core building blocks for the Tropism behavioural simulation.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（factors, instance, trend, errors）
//! - **stats**: 履歴の集計（aggregate, profile, summarize）
//! - **ports**: 抽象化レイヤー（World, NoiseSource, Clock）
//! - **action / sensor / decider**: 行動・センサー・意思決定者
//! - **app**: アプリケーション層（DeciderBuilder, Simulation）
//! - **config / observability**: 設定とステータスビュー

pub mod domain;
pub mod stats;
pub mod ports;
pub mod action;
pub mod sensor;
pub mod decider;
pub mod app;
pub mod config;
pub mod observability;

pub use action::{Action, HasFactors};
pub use config::SimulationConfig;
pub use decider::{AgentState, Decider};
pub use domain::{ActionError, FactorMap, Instance, Trend, TrendMap, TropismError};
pub use sensor::{Sensor, SensorConfig};
