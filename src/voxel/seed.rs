//! 世界种子与随机源

use bevy::prelude::*;

/// 世界种子 - 相同的种子生成相同的世界（树木位置与高度）
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSeed {
    pub seed: u64,
}

impl WorldSeed {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// 从字符串创建世界种子
    /// 通过简单的哈希算法将字符串转换为数字种子
    pub fn from_string(s: &str) -> Self {
        let seed = s
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        Self::new(seed)
    }

    /// 基于种子创建确定性的随机数生成器
    pub fn rng(&self) -> fastrand::Rng {
        fastrand::Rng::with_seed(self.seed)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// 地形生成使用的随机源，返回 [0, 1) 区间的浮点数
///
/// 测试中可以替换为固定序列
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl RandomSource for fastrand::Rng {
    fn next_f64(&mut self) -> f64 {
        self.f64()
    }
}
