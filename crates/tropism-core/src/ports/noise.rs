//! NoiseSource port - センサーの揺らぎの抽象化
//!
//! Sensor は tolerance に掛ける係数をここから受け取る。
//! 本番は RandomNoise、テストでは SeededNoise / NoNoise で決定的にする。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// NoiseSource は [-1.0, 1.0] の係数を返す
///
/// # Thread Safety
/// - Sensor ごと Decider に入り、Decider は tokio タスク間で共有されるため `Send` を要求
pub trait NoiseSource: Send {
    /// A factor in `[-1.0, 1.0]`, drawn fresh on every call.
    fn jitter(&mut self) -> f64;
}

/// Fresh randomness per reading from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNoise;

impl NoiseSource for RandomNoise {
    fn jitter(&mut self) -> f64 {
        2.0 * rand::random::<f64>() - 1.0
    }
}

/// Reproducible noise for tests and seeded runs.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn jitter(&mut self) -> f64 {
        self.rng.gen_range(-1.0..=1.0)
    }
}

/// Always zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn jitter(&mut self) -> f64 {
        0.0
    }
}
