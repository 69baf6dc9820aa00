//! 玩家移动与碰撞
//!
//! 每个模拟步执行：重力 → 水平移动 → 竖直积分 → 地面碰撞 → 世界边界限制

use bevy::prelude::*;
use bitflags::bitflags;

use crate::player::{Player, Viewer};
use crate::settings::SimulationSettings;
use crate::voxel::constants::{BLOCK_SIZE, GROUND_SCAN_CEILING};
use crate::voxel::{BlockType, WorldStore};

bitflags! {
    /// 当前按住的移动键；JUMP 表示本步内跳跃键刚被按下（上升沿）
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MovementFlags: u8 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const JUMP = 1 << 4;
    }
}

/// 外部输入端每一步提供的输入
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub flags: MovementFlags,
    /// 本步内选择的方块（数字键或选择面板）
    pub select: Option<BlockType>,
}

impl PlayerInput {
    pub fn new(flags: MovementFlags) -> Self {
        Self { flags, select: None }
    }

    /// 清除一次性输入（跳跃上升沿、方块选择），按住的方向键保留
    pub fn clear_edges(&mut self) {
        self.flags.remove(MovementFlags::JUMP);
        self.select = None;
    }
}

/// 计算相机空间内的水平方向（-Z 为前方，+X 为右方）
///
/// 没有按键或相反方向同时按下时返回零向量，不做归一化
pub fn horizontal_direction(flags: MovementFlags) -> Vec2 {
    let axis = |positive: MovementFlags, negative: MovementFlags| {
        flags.contains(positive) as i32 as f32 - flags.contains(negative) as i32 as f32
    };
    let front = axis(MovementFlags::BACKWARD, MovementFlags::FORWARD);
    let side = axis(MovementFlags::LEFT, MovementFlags::RIGHT);

    let direction = Vec2::new(-side, front);
    if direction == Vec2::ZERO {
        return direction;
    }
    direction.normalize()
}

/// 扫描玩家所在列，返回可站立的地面高度；没有方块时为 0
pub fn ground_height(world: &WorldStore, position: Vec3) -> f32 {
    let x = position.x.floor() as i32;
    let z = position.z.floor() as i32;
    world
        .highest_in_column(x, z, GROUND_SCAN_CEILING)
        .map_or(0.0, |y| (y + 1) as f32 * BLOCK_SIZE)
}

/// 着地时起跳，返回是否起跳成功
pub fn try_jump(player: &mut Player, settings: &SimulationSettings) -> bool {
    if !player.grounded {
        return false;
    }
    player.velocity_y = settings.jump_force;
    // 立即清除着地标志，避免下一次地面检测前重复起跳
    player.grounded = false;
    true
}

/// 推进一个模拟步
pub fn integrate(
    player: &mut Player,
    viewer: &Viewer,
    world: &WorldStore,
    flags: MovementFlags,
    settings: &SimulationSettings,
    delta: f32,
) {
    player.velocity_y += settings.gravity * delta;

    let direction = horizontal_direction(flags);
    let step = settings.move_speed * delta;
    if flags.intersects(MovementFlags::FORWARD | MovementFlags::BACKWARD) {
        viewer.move_forward(&mut player.position, -direction.y * step);
    }
    if flags.intersects(MovementFlags::LEFT | MovementFlags::RIGHT) {
        viewer.move_right(&mut player.position, direction.x * step);
    }

    player.position.y += player.velocity_y * delta;

    let standing = ground_height(world, player.position) + settings.player_height;
    if player.position.y <= standing {
        player.position.y = standing;
        player.velocity_y = 0.0;
        player.grounded = true;
    } else {
        player.grounded = false;
    }

    player.position.x = player.position.x.clamp(0.0, settings.world_size);
    player.position.z = player.position.z.clamp(0.0, settings.world_size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::constants::PLAYER_HEIGHT;
    use crate::voxel::terrain::fill_column;

    const DT: f32 = 0.016;

    fn settle(player: &mut Player, world: &WorldStore, settings: &SimulationSettings) {
        let viewer = Viewer::default();
        for _ in 0..1000 {
            integrate(player, &viewer, world, MovementFlags::empty(), settings, DT);
        }
    }

    #[test]
    fn test_direction_normalized() {
        let dir = horizontal_direction(MovementFlags::FORWARD | MovementFlags::RIGHT);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.y < 0.0);
    }

    #[test]
    fn test_direction_degenerate() {
        assert_eq!(horizontal_direction(MovementFlags::empty()), Vec2::ZERO);
        assert_eq!(
            horizontal_direction(MovementFlags::LEFT | MovementFlags::RIGHT),
            Vec2::ZERO
        );
    }

    #[test]
    fn test_ground_height_scan() {
        let mut world = WorldStore::new();
        assert_eq!(ground_height(&world, Vec3::new(3.2, 50.0, 3.9)), 0.0);

        fill_column(&mut world, 3, 3, 5);
        assert_eq!(ground_height(&world, Vec3::new(3.2, 50.0, 3.9)), 6.0);

        // 扫描上限以上的方块不计入
        world.set(IVec3::new(3, 21, 3), BlockType::Stone);
        assert_eq!(ground_height(&world, Vec3::new(3.2, 50.0, 3.9)), 6.0);
    }

    #[test]
    fn test_settles_on_column() {
        let mut world = WorldStore::new();
        fill_column(&mut world, 5, 5, 5);
        let settings = SimulationSettings::default();
        let mut player = Player::at(Vec3::new(5.5, 100.0, 5.5));

        settle(&mut player, &world, &settings);

        assert_eq!(player.position.y, 6.0 * BLOCK_SIZE + PLAYER_HEIGHT);
        assert!(player.grounded);
        assert_eq!(player.velocity_y, 0.0);
    }

    #[test]
    fn test_falls_to_zero_without_ground() {
        let world = WorldStore::new();
        let settings = SimulationSettings::default();
        let mut player = Player::at(Vec3::new(1.0, 3.0, 1.0));
        settle(&mut player, &world, &settings);
        assert_eq!(player.position.y, PLAYER_HEIGHT);
        assert!(player.grounded);
    }

    #[test]
    fn test_jump_requires_ground() {
        let settings = SimulationSettings::default();
        let mut player = Player::at(Vec3::new(1.0, 3.0, 1.0));
        assert!(!try_jump(&mut player, &settings));
        assert_eq!(player.velocity_y, 0.0);

        player.grounded = true;
        assert!(try_jump(&mut player, &settings));
        assert_eq!(player.velocity_y, settings.jump_force);
        assert!(!player.grounded);
        // 同一步内再次触发无效
        assert!(!try_jump(&mut player, &settings));
    }

    #[test]
    fn test_jump_leaves_ground_then_lands() {
        let mut world = WorldStore::new();
        fill_column(&mut world, 5, 5, 5);
        let settings = SimulationSettings::default();
        let viewer = Viewer::default();
        let mut player = Player::at(Vec3::new(5.5, 100.0, 5.5));
        settle(&mut player, &world, &settings);
        let rest = player.position.y;

        assert!(try_jump(&mut player, &settings));
        integrate(&mut player, &viewer, &world, MovementFlags::empty(), &settings, DT);
        assert!(player.position.y > rest);
        assert!(!player.grounded);

        settle(&mut player, &world, &settings);
        assert_eq!(player.position.y, rest);
    }

    #[test]
    fn test_forward_moves_along_view() {
        let world = WorldStore::new();
        let settings = SimulationSettings::default();
        let viewer = Viewer::default();
        let mut player = Player::at(Vec3::new(16.0, PLAYER_HEIGHT, 16.0));

        integrate(&mut player, &viewer, &world, MovementFlags::FORWARD, &settings, 0.1);
        // yaw = 0 时前方为 -Z
        assert!((player.position.z - (16.0 - settings.move_speed * 0.1)).abs() < 1e-4);
        assert!((player.position.x - 16.0).abs() < 1e-4);

        integrate(&mut player, &viewer, &world, MovementFlags::RIGHT, &settings, 0.1);
        assert!((player.position.x - (16.0 + settings.move_speed * 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_backward_and_left_follow_turned_view() {
        let world = WorldStore::new();
        let settings = SimulationSettings::default();
        // yaw 90°：前方 -X，右方 -Z
        let viewer = Viewer::new(std::f32::consts::FRAC_PI_2, 0.0);
        let mut player = Player::at(Vec3::new(16.0, PLAYER_HEIGHT, 16.0));

        integrate(&mut player, &viewer, &world, MovementFlags::BACKWARD, &settings, 0.1);
        assert!((player.position.x - (16.0 + settings.move_speed * 0.1)).abs() < 1e-4);
        assert!((player.position.z - 16.0).abs() < 1e-4);

        integrate(&mut player, &viewer, &world, MovementFlags::LEFT, &settings, 0.1);
        assert!((player.position.z - (16.0 + settings.move_speed * 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_clamps_to_world_bounds() {
        let world = WorldStore::new();
        let settings = SimulationSettings::default();
        let viewer = Viewer::new(std::f32::consts::FRAC_PI_2, 0.0);
        let mut player = Player::at(Vec3::new(1.0, 10.0, 1.0));

        // 一个超大的步长把玩家推到 -X 很远的地方
        integrate(&mut player, &viewer, &world, MovementFlags::FORWARD, &settings, 50.0);
        assert!((0.0..=settings.world_size).contains(&player.position.x));
        assert_eq!(player.position.x, 0.0);

        let viewer = Viewer::new(-std::f32::consts::FRAC_PI_2, 0.0);
        integrate(&mut player, &viewer, &world, MovementFlags::FORWARD, &settings, 50.0);
        assert_eq!(player.position.x, settings.world_size);
        assert!((0.0..=settings.world_size).contains(&player.position.z));
    }
}
