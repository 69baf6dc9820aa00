use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use crate::input::read_keyboard;
use crate::movement::{MovementFlags, PlayerInput, integrate, try_jump};
use crate::plugin::SimulationSet;
use crate::settings::SimulationSettings;
use crate::voxel::constants::WORLD_SIZE;
use crate::voxel::{BlockType, WorldStore};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Player>()
            .init_resource::<Viewer>()
            .init_resource::<PlayerInput>()
            .add_systems(
                Update,
                read_keyboard.run_if(resource_exists::<ButtonInput<KeyCode>>),
            )
            .add_systems(FixedUpdate, apply_selection.in_set(SimulationSet::Input))
            .add_systems(FixedUpdate, move_player.in_set(SimulationSet::Movement));
    }
}

/// 玩家状态：连续位置、竖直速度、着地标志和当前选中的方块
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// 视点位置（脚下地面 + 玩家高度）
    pub position: Vec3,
    pub velocity_y: f32,
    pub grounded: bool,
    pub selected: BlockType,
}

impl Player {
    /// 出生点：世界中心上方
    pub fn spawn() -> Self {
        Self::at(Vec3::new(WORLD_SIZE as f32 / 2.0, 10.0, WORLD_SIZE as f32 / 2.0))
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity_y: 0.0,
            grounded: false,
            selected: BlockType::Grass,
        }
    }

    /// 玩家所在的方块坐标
    pub fn block_pos(&self) -> IVec3 {
        self.position.floor().as_ivec3()
    }

    pub fn select(&mut self, block: BlockType) {
        if self.selected != block {
            debug!("Selected block: {}", block);
        }
        self.selected = block;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::spawn()
    }
}

/// 视角朝向（由外部相机/鼠标控制）
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct Viewer {
    pub yaw: f32,
    pub pitch: f32,
}

impl Viewer {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::Y, self.yaw) * Quat::from_axis_angle(Vec3::X, self.pitch)
    }

    /// 视线方向（单位向量，-Z 为正前方）
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// 水平面内的前方，只受 yaw 影响
    pub fn flat_forward(&self) -> Vec3 {
        Quat::from_axis_angle(Vec3::Y, self.yaw) * Vec3::NEG_Z
    }

    pub fn flat_right(&self) -> Vec3 {
        Quat::from_axis_angle(Vec3::Y, self.yaw) * Vec3::X
    }

    /// 沿水平前方移动 `distance`，负值为后退
    pub fn move_forward(&self, position: &mut Vec3, distance: f32) {
        *position += self.flat_forward() * distance;
    }

    /// 沿水平右方移动 `distance`，负值为向左
    pub fn move_right(&self, position: &mut Vec3, distance: f32) {
        *position += self.flat_right() * distance;
    }
}

fn apply_selection(input: Res<PlayerInput>, mut player: ResMut<Player>) {
    if let Some(block) = input.select {
        player.select(block);
    }
}

/// 先处理跳跃，再用本步的固定时间推进移动
fn move_player(
    time: Res<Time>,
    input: Res<PlayerInput>,
    settings: Res<SimulationSettings>,
    viewer: Res<Viewer>,
    world: Res<WorldStore>,
    mut player: ResMut<Player>,
) {
    if input.flags.contains(MovementFlags::JUMP) && try_jump(&mut player, &settings) {
        debug!("Jump at {}", player.position);
    }
    integrate(
        &mut player,
        &viewer,
        &world,
        input.flags,
        &settings,
        time.delta_secs(),
    );
}
