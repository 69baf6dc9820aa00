//! 键盘/鼠标输入适配
//!
//! 只在存在 Bevy 输入资源时运行；无头模式下由外部直接写入 `PlayerInput`

use bevy::input::keyboard::KeyCode;
use bevy::input::mouse::MouseButton;
use bevy::prelude::*;

use crate::movement::{MovementFlags, PlayerInput};
use crate::player::{Player, Viewer};
use crate::raycast::{ActionKind, BlockAction, Ray};
use crate::settings::SimulationSettings;
use crate::voxel::BlockType;

const MOVE_KEYS: [(KeyCode, MovementFlags); 4] = [
    (KeyCode::KeyW, MovementFlags::FORWARD),
    (KeyCode::KeyS, MovementFlags::BACKWARD),
    (KeyCode::KeyA, MovementFlags::LEFT),
    (KeyCode::KeyD, MovementFlags::RIGHT),
];

const BLOCK_KEYS: [KeyCode; 5] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
];

/// WASD 移动，空格跳跃，数字键 1-5 选择方块
pub fn read_keyboard(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    // 未被模拟消费的跳跃上升沿保留到下一步
    let mut flags = input.flags & MovementFlags::JUMP;
    for (key, flag) in MOVE_KEYS {
        if keys.pressed(key) {
            flags.insert(flag);
        }
    }
    if keys.just_pressed(KeyCode::Space) {
        flags.insert(MovementFlags::JUMP);
    }
    input.flags = flags;

    for (digit, key) in (1u8..).zip(BLOCK_KEYS) {
        if keys.just_pressed(key) {
            input.select = BlockType::from_hotkey(digit);
        }
    }
}

/// 左键删除方块，右键放置方块
pub fn read_mouse(
    buttons: Res<ButtonInput<MouseButton>>,
    player: Res<Player>,
    viewer: Res<Viewer>,
    settings: Res<SimulationSettings>,
    mut actions: MessageWriter<BlockAction>,
) {
    let ray = Ray::from_view(&player, &viewer);
    if buttons.just_pressed(MouseButton::Left) {
        actions.write(BlockAction {
            kind: ActionKind::Remove,
            ray,
            reach: settings.reach,
        });
    }
    if buttons.just_pressed(MouseButton::Right) {
        actions.write(BlockAction {
            kind: ActionKind::Place,
            ray,
            reach: settings.reach,
        });
    }
}
