//! 方块世界模拟核心
//!
//! - **voxel**: 方块类型、稀疏世界存储、地形生成与存档
//! - **player**: 玩家状态与视角
//! - **movement**: 重力、移动与地面碰撞
//! - **raycast**: 射线检测与方块放置/删除
//! - **input**: 键盘/鼠标输入适配
//! - **settings**: 模拟参数
//! - **plugin**: Bevy 插件，按固定步长驱动模拟（组合 `PlayerPlugin` 与 `RaycastPlugin`）

pub mod input;
pub mod movement;
pub mod player;
pub mod plugin;
pub mod raycast;
pub mod settings;
pub mod voxel;

pub use movement::{MovementFlags, PlayerInput};
pub use player::{Player, PlayerPlugin, Viewer};
pub use plugin::{SimulationClock, SimulationPlugin, SimulationSet};
pub use raycast::{ActionKind, ActionOutcome, BlockAction, Ray, RayHit, RaycastPlugin};
pub use settings::SimulationSettings;
pub use voxel::{BlockChange, BlockType, WorldSeed, WorldSnapshot, WorldStore};
