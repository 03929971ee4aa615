//! App - アプリケーション層
//!
//! Decider と周期タスクを組み合わせてシミュレーションを動かす。
//!
//! # 主要コンポーネント
//! - **DeciderBuilder**: Decider の構築とワイヤリング
//! - **Simulation**: 昼夜サイクル・センサースイープ・ルーチンの周期タスク

pub mod builder;
pub mod scheduler;

// 主要な型を再エクスポート
pub use self::builder::DeciderBuilder;
pub use self::scheduler::Simulation;
