//! 世界存档 - 稀疏方块表的 JSON 快照

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::voxel::block_type::BlockType;
use crate::voxel::world::WorldStore;

/// 单个方块条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub block: BlockType,
}

/// 世界快照；条目按 (x, y, z) 排序，保证同一世界的输出稳定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub blocks: Vec<SnapshotEntry>,
}

impl WorldSnapshot {
    pub fn from_world(world: &WorldStore) -> Self {
        let mut blocks: Vec<SnapshotEntry> = world
            .iter()
            .map(|(pos, block)| SnapshotEntry {
                x: pos.x,
                y: pos.y,
                z: pos.z,
                block,
            })
            .collect();
        blocks.sort_by_key(|e| (e.x, e.y, e.z));
        Self { blocks }
    }

    /// 通过逐条 `set` 写回世界，每条都会产生一条新增变更
    pub fn apply(&self, world: &mut WorldStore) {
        for entry in &self.blocks {
            world.set(IVec3::new(entry.x, entry.y, entry.z), entry.block);
        }
    }

    pub fn to_world(&self) -> WorldStore {
        let mut world = WorldStore::new();
        self.apply(&mut world);
        world
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self).map_err(io::Error::from)?;
        writer.flush()
    }

    /// 格式错误返回 `InvalidData`，文件被截断返回 `UnexpectedEof`，读取错误保留原来的类型
    pub fn load(path: &Path) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(io::Error::from)
    }
}
