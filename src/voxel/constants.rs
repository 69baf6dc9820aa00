//! 世界与玩家常量定义

/// 方块边长（世界单位）
pub const BLOCK_SIZE: f32 = 1.0;

/// 世界边长（单位：方块）- 地形生成范围，也是玩家水平位置的限制范围
pub const WORLD_SIZE: i32 = 32;

/// 重力加速度（向下为负）
pub const GRAVITY: f32 = -20.0;

/// 跳跃初速度
pub const JUMP_FORCE: f32 = 8.0;

/// 水平移动速度（单位/秒）
pub const MOVE_SPEED: f32 = 5.0;

/// 玩家视点高度（相对于脚下地面）
pub const PLAYER_HEIGHT: f32 = 1.7;

/// 方块交互的最大射线距离
pub const REACH_DISTANCE: f32 = 5.0;

/// 地面检测的起始高度，从这里向下扫描到 y = 0
pub const GROUND_SCAN_CEILING: i32 = 20;

/// 每一列生成树木的概率
pub const TREE_CHANCE: f64 = 0.02;

/// 放置方块时与玩家所在方块的最小距离（小于等于此值则拒绝放置）
pub const MIN_PLACE_DISTANCE: f32 = 1.5;
