//! Ports - 抽象化レイヤー
//!
//! Action / Sensor / Decider が外側に依存する箇所を trait で切り出す。
//! - **World**: センサーが読む外界
//! - **NoiseSource**: センサーの揺らぎ
//! - **Clock**: Instance の記録時刻

pub mod clock;
pub mod noise;
pub mod world;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::noise::{NoNoise, NoiseSource, RandomNoise, SeededNoise};
pub use self::world::{SharedWorld, World};
