//! 体素世界模块
//!
//! 这个模块包含了方块世界的数据层：
//!
//! - **constants**: 常量定义（世界大小、重力、交互距离等）
//! - **block_type**: 方块类型定义
//! - **change**: 方块变更通知
//! - **world**: 稀疏方块存储
//! - **seed**: 世界种子与随机源
//! - **terrain**: 地形生成器（地形列、树木）
//! - **snapshot**: 世界存档

pub mod block_type;
pub mod change;
pub mod constants;
pub mod seed;
pub mod snapshot;
pub mod terrain;
pub mod world;

// 重新导出常用类型，方便外部使用
pub use block_type::BlockType;
pub use change::BlockChange;
pub use constants::{BLOCK_SIZE, WORLD_SIZE};
pub use seed::{RandomSource, WorldSeed};
pub use snapshot::{SnapshotEntry, WorldSnapshot};
pub use terrain::{TerrainGenerator, TerrainStats, generate_world};
pub use world::WorldStore;
