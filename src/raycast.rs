use bevy::input::mouse::MouseButton;
use bevy::prelude::*;

use crate::input::read_mouse;
use crate::player::{Player, Viewer};
use crate::plugin::SimulationSet;
use crate::voxel::constants::MIN_PLACE_DISTANCE;
use crate::voxel::{BlockType, WorldStore};

pub struct RaycastPlugin;

impl Plugin for RaycastPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<BlockAction>()
            .add_systems(
                Update,
                read_mouse.run_if(resource_exists::<ButtonInput<MouseButton>>),
            )
            .add_systems(FixedUpdate, apply_block_actions.in_set(SimulationSet::Actions));
    }
}

/// 视线射线
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// 从玩家视点沿视线方向发出的射线
    pub fn from_view(player: &Player, viewer: &Viewer) -> Self {
        Self::new(player.position, viewer.forward())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// 被击中的方块坐标
    pub cell: IVec3,
    pub block: BlockType,
    /// 射线与方块表面的交点
    pub point: Vec3,
    /// 被击中面的法线（轴对齐单位向量）
    pub normal: Vec3,
    pub distance: f32,
}

/// 方块交互请求，由输入端在点击时发出
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct BlockAction {
    pub kind: ActionKind,
    pub ray: Ray,
    pub reach: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Place,
    Remove,
}

/// 交互结果；除 Placed / Removed 外都不修改世界
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Placed { pos: IVec3, block: BlockType },
    Removed { pos: IVec3, block: BlockType },
    /// 目标格子离玩家太近
    Rejected { pos: IVec3 },
    /// 射线没有命中，或命中点超出交互距离
    Missed,
}

/// DDA（数字微分分析）体素射线检测
///
/// 沿射线逐格前进，返回交互距离内最近的被占用格子。起点所在的格子不参与检测。
/// 只有距离严格小于 `reach` 的命中才有效；`reach` 为 NaN 或非正数时视为未命中。
///
/// 遍历被限制在世界的包围盒内：起点在盒外时直接跳到进入面，离开盒子即停止，
/// 因此无穷大的 `reach` 也总能返回。
pub fn raycast(world: &WorldStore, ray: Ray, reach: f32) -> Option<RayHit> {
    let dir = ray.direction.normalize_or_zero();
    let origin = ray.origin;
    if dir == Vec3::ZERO || !origin.is_finite() || reach.is_nan() || reach <= 0.0 {
        return None;
    }

    let (min, max) = world.bounds()?;
    let (t_enter, t_exit, entry_axis) =
        box_intersection(origin, dir, min.as_vec3(), max.as_vec3() + Vec3::ONE)?;
    let limit = reach.min(t_exit);
    if t_enter >= limit {
        return None;
    }

    // 每个轴的前进方向
    let step = IVec3::new(
        if dir.x >= 0.0 { 1 } else { -1 },
        if dir.y >= 0.0 { 1 } else { -1 },
        if dir.z >= 0.0 { 1 } else { -1 },
    );

    // 沿射线穿过一个格子所需的距离
    let delta = Vec3::new(axis_delta(dir.x), axis_delta(dir.y), axis_delta(dir.z));

    // 起始格子，以及到下一个格子边界的距离
    let (mut pos, mut t_max) = if t_enter > 0.0 {
        // 起点在包围盒外：从进入面所在的格子开始
        let entry = origin + dir * t_enter;
        let mut pos = entry.floor().as_ivec3().clamp(min, max);
        pos[entry_axis] = if step[entry_axis] > 0 {
            min[entry_axis]
        } else {
            max[entry_axis]
        };

        if let Some(block) = world.get(pos) {
            let mut normal = Vec3::ZERO;
            normal[entry_axis] = -step[entry_axis] as f32;
            return Some(RayHit {
                cell: pos,
                block,
                point: entry,
                normal,
                distance: t_enter,
            });
        }

        let t_max = Vec3::new(
            t_enter + axis_boundary(entry.x, pos.x, dir.x, delta.x),
            t_enter + axis_boundary(entry.y, pos.y, dir.y, delta.y),
            t_enter + axis_boundary(entry.z, pos.z, dir.z, delta.z),
        );
        (pos, t_max)
    } else {
        let pos = origin.floor().as_ivec3();
        let t_max = Vec3::new(
            axis_boundary(origin.x, pos.x, dir.x, delta.x),
            axis_boundary(origin.y, pos.y, dir.y, delta.y),
            axis_boundary(origin.z, pos.z, dir.z, delta.z),
        );
        (pos, t_max)
    };

    loop {
        // 沿 t_max 最小的轴前进，并记录穿过的面
        let (distance, normal) = if t_max.x < t_max.y && t_max.x < t_max.z {
            let distance = t_max.x;
            t_max.x += delta.x;
            pos.x += step.x;
            (distance, Vec3::new(-step.x as f32, 0.0, 0.0))
        } else if t_max.y < t_max.z {
            let distance = t_max.y;
            t_max.y += delta.y;
            pos.y += step.y;
            (distance, Vec3::new(0.0, -step.y as f32, 0.0))
        } else {
            let distance = t_max.z;
            t_max.z += delta.z;
            pos.z += step.z;
            (distance, Vec3::new(0.0, 0.0, -step.z as f32))
        };

        // 超出交互距离，或已离开包围盒
        if distance >= limit {
            return None;
        }

        if let Some(block) = world.get(pos) {
            return Some(RayHit {
                cell: pos,
                block,
                point: origin + dir * distance,
                normal,
                distance,
            });
        }
    }
}

/// 射线与轴对齐盒 `[lo, hi]` 的相交区间 `(t_enter, t_exit)` 以及进入面所在的轴
///
/// 射线完全错过盒子或盒子在起点之后时返回 None
fn box_intersection(origin: Vec3, dir: Vec3, lo: Vec3, hi: Vec3) -> Option<(f32, f32, usize)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut entry_axis = 0;

    for axis in 0..3 {
        if axis_delta(dir[axis]).is_infinite() {
            // 与该轴平行：起点必须已经在这一层里
            if origin[axis] < lo[axis] || origin[axis] > hi[axis] {
                return None;
            }
            continue;
        }
        let a = (lo[axis] - origin[axis]) / dir[axis];
        let b = (hi[axis] - origin[axis]) / dir[axis];
        let (near, far) = if a < b { (a, b) } else { (b, a) };
        if near > t_enter {
            t_enter = near;
            entry_axis = axis;
        }
        t_exit = t_exit.min(far);
    }

    (t_enter <= t_exit && t_exit > 0.0).then_some((t_enter, t_exit, entry_axis))
}

fn axis_delta(d: f32) -> f32 {
    if d.abs() < 1e-10 {
        f32::INFINITY
    } else {
        (1.0 / d).abs()
    }
}

fn axis_boundary(origin: f32, cell: i32, d: f32, delta: f32) -> f32 {
    if delta.is_infinite() {
        f32::INFINITY
    } else if d >= 0.0 {
        ((cell + 1) as f32 - origin) * delta
    } else {
        (origin - cell as f32) * delta
    }
}

/// 交点沿法线偏移半格后取整，得到目标格子
fn offset_cell(hit: &RayHit, sign: f32) -> IVec3 {
    (hit.point + hit.normal * (0.5 * sign)).floor().as_ivec3()
}

/// 删除射线命中的方块
pub fn remove_target(world: &mut WorldStore, ray: Ray, reach: f32) -> ActionOutcome {
    let Some(hit) = raycast(world, ray, reach) else {
        return ActionOutcome::Missed;
    };
    let pos = offset_cell(&hit, -1.0);
    match world.remove(pos) {
        Some(block) => ActionOutcome::Removed { pos, block },
        None => ActionOutcome::Missed,
    }
}

/// 在命中面的外侧放置玩家选中的方块
///
/// 目标格子与玩家所在格子的距离不超过 1.5 时拒绝放置
pub fn place_target(
    world: &mut WorldStore,
    player: &Player,
    ray: Ray,
    reach: f32,
) -> ActionOutcome {
    let Some(hit) = raycast(world, ray, reach) else {
        return ActionOutcome::Missed;
    };
    let pos = offset_cell(&hit, 1.0);
    if pos.as_vec3().distance(player.block_pos().as_vec3()) <= MIN_PLACE_DISTANCE {
        return ActionOutcome::Rejected { pos };
    }
    world.set(pos, player.selected);
    ActionOutcome::Placed {
        pos,
        block: player.selected,
    }
}

/// 处理本步收到的所有交互请求
pub fn apply_block_actions(
    mut actions: MessageReader<BlockAction>,
    mut world: ResMut<WorldStore>,
    player: Res<Player>,
) {
    for action in actions.read() {
        let outcome = match action.kind {
            ActionKind::Remove => remove_target(&mut world, action.ray, action.reach),
            ActionKind::Place => place_target(&mut world, &player, action.ray, action.reach),
        };
        match outcome {
            ActionOutcome::Placed { pos, block } => debug!("Placed {} at {}", block, pos),
            ActionOutcome::Removed { pos, block } => debug!("Removed {} at {}", block, pos),
            ActionOutcome::Rejected { pos } => {
                debug!("Placement at {} rejected: too close to player", pos)
            }
            ActionOutcome::Missed => debug!("{:?} action found no target", action.kind),
        }
    }
}
