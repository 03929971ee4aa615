//! DeciderBuilder - Decider の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 設定ファイルの SensorConfig から Sensor を組み立てる

use std::sync::Arc;

use crate::action::Action;
use crate::decider::{AgentState, Decider};
use crate::domain::TropismError;
use crate::ports::{SeededNoise, World};
use crate::sensor::{Sensor, SensorConfig, SourceKind};

/// DeciderBuilder は Decider を構築
///
/// # 使用例
/// ```ignore
/// let decider = DeciderBuilder::new()
///     .action(sit_there)?
///     .sensor(light_sensor)
///     .expect_actions(&["sitThere"])
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - expect_actions() で期待される action 名を登録
/// - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
/// - 不足があれば TropismError::MissingActions を返す
pub struct DeciderBuilder {
    decider: Decider,
    expected_actions: Option<Vec<String>>,
}

impl DeciderBuilder {
    pub fn new() -> Self {
        Self {
            decider: Decider::new(),
            expected_actions: None,
        }
    }

    /// 初期状態（factors / attributes）を設定
    pub fn state(mut self, state: AgentState) -> Self {
        *self.decider.state_mut() = state;
        self
    }

    /// Action を登録（同名は TropismError::DuplicateAction）
    pub fn action(mut self, action: Action<AgentState>) -> Result<Self, TropismError> {
        self.decider.add_action(action)?;
        Ok(self)
    }

    pub fn sensor(mut self, sensor: Sensor) -> Self {
        self.decider.add_sensor(sensor);
        self
    }

    /// 設定ファイルの SensorConfig から Sensor を登録
    ///
    /// `seed` があれば sensor ごとに `seed + index`（wrapping）でノイズを固定する。
    pub fn sensors_from_config(
        mut self,
        configs: &[SensorConfig],
        world: Arc<dyn World>,
        seed: Option<u64>,
    ) -> Self {
        for (index, config) in configs.iter().enumerate() {
            let sensor = match config.source {
                SourceKind::World => Sensor::world(config.clone(), Arc::clone(&world)),
                SourceKind::Agent => Sensor::agent(config.clone()),
            };
            let sensor = match seed {
                Some(seed) => sensor.with_noise(Box::new(SeededNoise::new(seed.wrapping_add(index as u64)))),
                None => sensor,
            };
            self.decider.add_sensor(sensor);
        }
        self
    }

    /// 期待される action 名のリストを設定
    pub fn expect_actions(mut self, names: &[&str]) -> Self {
        self.expected_actions = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Decider を生成
    ///
    /// # 検証
    /// - expect_actions() で設定された action が全て登録されているかチェック
    pub fn build(self) -> Result<Decider, TropismError> {
        if let Some(expected) = &self.expected_actions {
            let registered = self.decider.action_names();
            let missing: Vec<String> = expected
                .iter()
                .filter(|name| !registered.contains(name))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(TropismError::MissingActions(missing));
            }
        }
        Ok(self.decider)
    }
}

impl Default for DeciderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
