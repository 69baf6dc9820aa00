use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use blockworld::raycast::{ActionKind, BlockAction, Ray};
use blockworld::{
    MovementFlags, Player, PlayerInput, SimulationClock, SimulationPlugin, SimulationSet,
    SimulationSettings, Viewer, WorldSeed, WorldSnapshot, WorldStore,
};

/// 命令行参数
#[derive(Resource, Debug, Clone)]
struct RunOptions {
    /// 运行多少个模拟步后退出
    ticks: u64,
    save: Option<PathBuf>,
    load: Option<PathBuf>,
}

fn main() {
    let (seed, options) = parse_args();
    let load = options.load.clone();

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
    )
    .add_plugins(LogPlugin::default());

    if let Some(path) = load {
        match WorldSnapshot::load(&path) {
            Ok(snapshot) => {
                info!("Loaded {} blocks from {}", snapshot.blocks.len(), path.display());
                app.insert_resource(snapshot.to_world());
            }
            Err(err) => error!("Failed to load {}: {}", path.display(), err),
        }
    }

    app.insert_resource(seed)
        .insert_resource(options)
        .add_plugins(SimulationPlugin)
        .add_systems(
            FixedUpdate,
            (
                autopilot.before(SimulationSet::Input),
                stop_after_ticks.after(SimulationSet::Publish),
            )
                .run_if(resource_exists::<WorldStore>),
        )
        .run();
}

/// 无头模式下的自动驾驶：绕圈行走，着地后定期起跳，并试着挖掉和放回脚下的方块
fn autopilot(
    clock: Res<SimulationClock>,
    player: Res<Player>,
    settings: Res<SimulationSettings>,
    mut viewer: ResMut<Viewer>,
    mut input: ResMut<PlayerInput>,
    mut actions: MessageWriter<BlockAction>,
) {
    let tick = clock.ticks();
    viewer.yaw += 0.01;
    input.flags.insert(MovementFlags::FORWARD);
    if tick % 90 == 0 && player.grounded {
        input.flags.insert(MovementFlags::JUMP);
    }

    if tick % 60 == 0 {
        info!(
            "tick {}: position {} grounded {}",
            tick, player.position, player.grounded
        );
    }

    let kind = match tick % 240 {
        120 => ActionKind::Remove,
        180 => ActionKind::Place,
        _ => return,
    };
    actions.write(BlockAction {
        kind,
        ray: Ray::new(player.position, Vec3::NEG_Y),
        reach: settings.reach,
    });
}

fn stop_after_ticks(
    mut clock: ResMut<SimulationClock>,
    options: Res<RunOptions>,
    world: Res<WorldStore>,
    mut app_exit: MessageWriter<AppExit>,
) {
    if !clock.is_running() || clock.ticks() < options.ticks {
        return;
    }
    clock.stop();

    if let Some(path) = &options.save {
        match WorldSnapshot::from_world(&world).save(path) {
            Ok(()) => info!("Saved {} blocks to {}", world.len(), path.display()),
            Err(err) => error!("Failed to save {}: {}", path.display(), err),
        }
    }
    app_exit.write(AppExit::Success);
}

fn parse_args() -> (WorldSeed, RunOptions) {
    let args: Vec<String> = std::env::args().collect();
    let mut options = RunOptions {
        ticks: 600,
        save: None,
        load: None,
    };
    let mut seed = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--seed" | "-s", Some(value)) => seed = Some(parse_seed(value)),
            ("--ticks", Some(value)) => match value.parse() {
                Ok(ticks) => options.ticks = ticks,
                Err(_) => eprintln!("Invalid tick count '{}', using {}", value, options.ticks),
            },
            ("--save", Some(value)) => options.save = Some(PathBuf::from(value)),
            ("--load", Some(value)) => options.load = Some(PathBuf::from(value)),
            (flag, _) => {
                eprintln!("Ignoring argument '{}'", flag);
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    // 其次检查环境变量，最后使用当前时间
    let seed = seed
        .or_else(|| std::env::var("BLOCKWORLD_SEED").ok().map(|s| parse_seed(&s)))
        .unwrap_or_else(|| {
            let millis = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(12345);
            WorldSeed::new(millis)
        });

    (seed, options)
}

/// 数字按数值解析，其他字符串取哈希
fn parse_seed(value: &str) -> WorldSeed {
    value
        .parse::<u64>()
        .map(WorldSeed::new)
        .unwrap_or_else(|_| WorldSeed::from_string(value))
}
