//! 模拟参数配置

use bevy::prelude::*;

use crate::voxel::constants::{
    GRAVITY, JUMP_FORCE, MOVE_SPEED, PLAYER_HEIGHT, REACH_DISTANCE, WORLD_SIZE,
};

/// 物理与交互参数，默认值取自常量模块
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    /// 重力加速度（负值向下）
    pub gravity: f32,
    pub jump_force: f32,
    pub move_speed: f32,
    /// 视点相对脚下地面的高度
    pub player_height: f32,
    /// 方块交互距离
    pub reach: f32,
    /// 玩家水平位置被限制在 [0, world_size]
    pub world_size: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            move_speed: MOVE_SPEED,
            player_height: PLAYER_HEIGHT,
            reach: REACH_DISTANCE,
            world_size: WORLD_SIZE as f32,
        }
    }
}
