//! 模拟插件 - 世界资源、模拟时钟与固定步长的系统顺序
//!
//! 玩家移动由 `PlayerPlugin` 注册，方块交互由 `RaycastPlugin` 注册

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;

use crate::movement::PlayerInput;
use crate::player::PlayerPlugin;
use crate::raycast::RaycastPlugin;
use crate::settings::SimulationSettings;
use crate::voxel::{BlockChange, TerrainStats, WorldSeed, WorldStore, generate_world};

/// 模拟系统执行顺序
///
/// 每个固定步依次执行，世界存储只在 Actions 阶段被修改
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// 1. 应用一次性输入（方块选择）
    Input,
    /// 2. 跳跃、重力、移动与碰撞
    Movement,
    /// 3. 方块放置/删除
    Actions,
    /// 4. 发布变更通知，结束本步
    Publish,
}

/// 模拟时钟 - 停止后不再执行新的模拟步
#[derive(Resource, Debug)]
pub struct SimulationClock {
    running: bool,
    ticks: u64,
}

impl SimulationClock {
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 已完成的模拟步数
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("Simulation stopped after {} ticks", self.ticks);
        }
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            running: true,
            ticks: 0,
        }
    }
}

/// 后台地形生成任务
#[derive(Component)]
pub struct TerrainTask(Task<(WorldStore, TerrainStats)>);

/// 世界、时钟与系统顺序；玩家和方块交互由各自的插件注册
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((PlayerPlugin, RaycastPlugin))
            .init_resource::<WorldSeed>()
            .init_resource::<SimulationSettings>()
            .init_resource::<SimulationClock>()
            .add_message::<BlockChange>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Input,
                    SimulationSet::Movement,
                    SimulationSet::Actions,
                    SimulationSet::Publish,
                )
                    .chain()
                    .run_if(resource_exists::<WorldStore>)
                    .run_if(clock_running),
            )
            .add_systems(Startup, spawn_terrain_task)
            .add_systems(Update, poll_terrain_task)
            .add_systems(
                FixedUpdate,
                (publish_block_changes, finish_tick)
                    .chain()
                    .in_set(SimulationSet::Publish),
            );
    }
}

/// 模拟时钟是否仍在运行
pub fn clock_running(clock: Res<SimulationClock>) -> bool {
    clock.is_running()
}

/// 启动时在后台任务池生成地形；已有世界（例如读取存档）时跳过
fn spawn_terrain_task(mut commands: Commands, seed: Res<WorldSeed>, world: Option<Res<WorldStore>>) {
    if let Some(world) = world {
        info!("World already present ({} blocks), skipping terrain generation", world.len());
        return;
    }

    let seed = *seed;
    info!("Generating terrain with seed {}", seed.seed);
    let task = AsyncComputeTaskPool::get().spawn(async move { generate_world(&seed) });
    commands.spawn(TerrainTask(task));
}

/// 非阻塞地检查地形任务是否完成，完成后一次性写入世界资源
fn poll_terrain_task(mut commands: Commands, mut tasks: Query<(Entity, &mut TerrainTask)>) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some((world, stats)) = future::block_on(future::poll_once(&mut task.0)) {
            info!(
                "Terrain ready: {} columns, {} blocks, {} trees",
                stats.columns, stats.blocks, stats.trees
            );
            commands.insert_resource(world);
            commands.entity(entity).despawn();
        }
    }
}

/// 将世界存储的变更日志按顺序发布为消息
pub fn publish_block_changes(
    mut world: ResMut<WorldStore>,
    mut changes: MessageWriter<BlockChange>,
) {
    if world.pending_changes().is_empty() {
        return;
    }
    for change in world.drain_changes() {
        changes.write(change);
    }
}

fn finish_tick(mut clock: ResMut<SimulationClock>, mut input: ResMut<PlayerInput>) {
    clock.ticks += 1;
    input.clear_edges();
}
