//! 地形生成器

use bevy::prelude::*;

use crate::voxel::block_type::BlockType;
use crate::voxel::constants::{TREE_CHANCE, WORLD_SIZE};
use crate::voxel::seed::{RandomSource, WorldSeed};
use crate::voxel::world::WorldStore;

/// 一次地形生成的统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainStats {
    pub columns: usize,
    pub blocks: usize,
    pub trees: usize,
}

/// 地形生成器 - 在启动时一次性填充世界
///
/// 高度由固定的正弦/余弦公式决定，树木的位置和高度取决于注入的随机源
pub struct TerrainGenerator<R: RandomSource> {
    rng: R,
    size: i32,
}

impl TerrainGenerator<fastrand::Rng> {
    /// 使用世界种子创建生成器
    pub fn from_seed(seed: &WorldSeed) -> Self {
        Self::new(seed.rng())
    }
}

impl<R: RandomSource> TerrainGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            size: WORLD_SIZE,
        }
    }

    /// 修改生成区域边长（默认 WORLD_SIZE）
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    /// 生成整个区域的地形
    /// 按 x 外层、z 内层的顺序逐列处理，保证同一种子下随机数的消耗顺序固定
    pub fn generate(&mut self, world: &mut WorldStore) -> TerrainStats {
        let before = world.len();
        let mut stats = TerrainStats::default();

        for x in 0..self.size {
            for z in 0..self.size {
                let height = column_height(x, z);
                fill_column(world, x, z, height);
                stats.columns += 1;

                // 先抽随机数再判断高度，与每列消耗一次随机数的顺序保持一致
                if self.rng.next_f64() < TREE_CHANCE && height > 3 {
                    let tree_height = 4 + (self.rng.next_f64() * 2.0).floor() as i32;
                    plant_tree(world, x, z, height, tree_height);
                    stats.trees += 1;
                }
            }
        }

        stats.blocks = world.len() - before;
        stats
    }
}

/// 计算指定列的地形高度
pub fn column_height(x: i32, z: i32) -> i32 {
    let fx = x as f64;
    let fz = z as f64;
    (3.0 + (fx * 0.1).sin() * 2.0
        + (fz * 0.1).cos() * 2.0
        + (fx * 0.05).sin() * (fz * 0.05).cos() * 3.0)
        .floor() as i32
}

/// 填充一列：顶层为草，其下两层为泥土，再往下为石头
pub fn fill_column(world: &mut WorldStore, x: i32, z: i32, height: i32) {
    for y in 0..=height {
        let block = if y == height {
            BlockType::Grass
        } else if y >= height - 2 {
            BlockType::Dirt
        } else {
            BlockType::Stone
        };
        world.set(IVec3::new(x, y, z), block);
    }
}

/// 在地表高度为 `height` 的列上种一棵树
///
/// 树叶沿用草方块类型（方块类型集合中没有独立的树叶）
pub fn plant_tree(world: &mut WorldStore, x: i32, z: i32, height: i32, tree_height: i32) {
    // 树干
    for y in height + 1..height + tree_height {
        world.set(IVec3::new(x, y, z), BlockType::Wood);
    }

    // 树冠：下两层去掉四角，且不覆盖树干所在的列
    let canopy_base = height + tree_height - 1;
    for dx in -2..=2_i32 {
        for dz in -2..=2_i32 {
            for dy in 0..3 {
                if dx.abs() == 2 && dz.abs() == 2 && dy < 2 {
                    continue;
                }
                if dx == 0 && dz == 0 && dy < 2 {
                    continue;
                }
                world.set(
                    IVec3::new(x + dx, canopy_base + dy, z + dz),
                    BlockType::Grass,
                );
            }
        }
    }
}

/// 使用世界种子生成完整世界（阻塞调用）
pub fn generate_world(seed: &WorldSeed) -> (WorldStore, TerrainStats) {
    let mut world = WorldStore::new();
    let stats = TerrainGenerator::from_seed(seed).generate(&mut world);
    (world, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// 按顺序循环返回预设值的随机源
    struct Scripted {
        values: Vec<f64>,
        cursor: usize,
    }

    impl Scripted {
        fn new(values: Vec<f64>) -> Self {
            Self { values, cursor: 0 }
        }
    }

    impl RandomSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            let value = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            value
        }
    }

    fn snapshot(world: &WorldStore) -> HashMap<IVec3, BlockType> {
        world.iter().collect()
    }

    #[test]
    fn test_height_at_origin() {
        assert_eq!(column_height(0, 0), 5);
    }

    #[test]
    fn test_origin_column_layers() {
        // 永不生成树木
        let mut generator = TerrainGenerator::new(Scripted::new(vec![0.5])).with_size(1);
        let mut world = WorldStore::new();
        let stats = generator.generate(&mut world);

        assert_eq!(stats, TerrainStats { columns: 1, blocks: 6, trees: 0 });
        assert_eq!(world.get(IVec3::new(0, 5, 0)), Some(BlockType::Grass));
        assert_eq!(world.get(IVec3::new(0, 4, 0)), Some(BlockType::Dirt));
        assert_eq!(world.get(IVec3::new(0, 3, 0)), Some(BlockType::Dirt));
        for y in 0..=2 {
            assert_eq!(world.get(IVec3::new(0, y, 0)), Some(BlockType::Stone));
        }
        assert_eq!(world.get(IVec3::new(0, 6, 0)), None);
    }

    #[test]
    fn test_low_column_clips_dirt_band() {
        let mut world = WorldStore::new();
        fill_column(&mut world, 0, 0, 1);
        assert_eq!(world.get(IVec3::new(0, 1, 0)), Some(BlockType::Grass));
        assert_eq!(world.get(IVec3::new(0, 0, 0)), Some(BlockType::Dirt));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_tree_shape() {
        let mut world = WorldStore::new();
        plant_tree(&mut world, 10, 10, 5, 5);

        // 树干：y = 6..=9
        for y in 6..=9 {
            assert_eq!(world.get(IVec3::new(10, y, 10)), Some(BlockType::Wood));
        }
        // 树干正上方的第二层留空，第三层是树叶
        assert_eq!(world.get(IVec3::new(10, 10, 10)), None);
        assert_eq!(world.get(IVec3::new(10, 11, 10)), Some(BlockType::Grass));
        // 下两层四角为空，顶层四角有树叶
        assert_eq!(world.get(IVec3::new(8, 9, 8)), None);
        assert_eq!(world.get(IVec3::new(12, 10, 12)), None);
        assert_eq!(world.get(IVec3::new(12, 11, 8)), Some(BlockType::Grass));

        let wood = world.iter().filter(|(_, b)| *b == BlockType::Wood).count();
        let leaves = world.iter().filter(|(_, b)| *b == BlockType::Grass).count();
        assert_eq!(wood, 4);
        assert_eq!(leaves, 75 - 8 - 2);
    }

    #[test]
    fn test_tree_height_from_random_draw() {
        // 第一列：0.0 触发树木，0.99 选择高度 5；之后的列均不生成
        let mut generator =
            TerrainGenerator::new(Scripted::new(vec![0.0, 0.99, 0.5, 0.5, 0.5])).with_size(1);
        let mut world = WorldStore::new();
        let stats = generator.generate(&mut world);

        assert_eq!(stats.trees, 1);
        // 地表高度 5，树高 5：树干 y = 6..=9
        assert_eq!(world.get(IVec3::new(0, 9, 0)), Some(BlockType::Wood));
        assert_eq!(world.get(IVec3::new(0, 11, 0)), Some(BlockType::Grass));
    }

    #[test]
    fn test_no_tree_on_low_columns() {
        // 随机数总是命中，只有高度大于 3 的列会长树
        assert_eq!(column_height(31, 31), 1);
        let mut generator = TerrainGenerator::new(Scripted::new(vec![0.0]));
        let mut world = WorldStore::new();
        let stats = generator.generate(&mut world);

        assert!(stats.trees > 0);
        assert!(stats.trees < stats.columns);
        assert_ne!(world.get(IVec3::new(31, 2, 31)), Some(BlockType::Wood));
    }

    #[test]
    fn test_same_seed_same_world() {
        let (a, stats_a) = generate_world(&WorldSeed::new(99));
        let (b, stats_b) = generate_world(&WorldSeed::new(99));
        assert_eq!(stats_a, stats_b);
        assert_eq!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn test_every_column_has_grass_top() {
        let (world, stats) = generate_world(&WorldSeed::default());
        assert_eq!(stats.columns, (WORLD_SIZE * WORLD_SIZE) as usize);
        for x in 0..WORLD_SIZE {
            for z in 0..WORLD_SIZE {
                let height = column_height(x, z);
                assert!(world.contains(IVec3::new(x, height, z)));
            }
        }
    }
}
