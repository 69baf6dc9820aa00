//! 稀疏方块存储 - 世界占用情况的唯一数据来源

use bevy::prelude::*;
use std::collections::HashMap;

use crate::voxel::block_type::BlockType;
use crate::voxel::change::BlockChange;

/// 世界方块存储
///
/// 只保存被占用的格子，不存在的坐标即为空气。存储本身不限制坐标范围。
/// 每次修改都会在同一次调用中追加一条变更记录，修改与通知不可分割。
#[derive(Resource, Default, Debug)]
pub struct WorldStore {
    blocks: HashMap<IVec3, BlockType>,
    /// 尚未发布的变更日志，按修改顺序排列
    changes: Vec<BlockChange>,
    /// 占用格子的包围盒 (min, max)，删除时不收缩
    bounds: Option<(IVec3, IVec3)>,
}

impl WorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入方块（新增或覆盖），总是成功
    pub fn set(&mut self, pos: IVec3, block: BlockType) {
        self.blocks.insert(pos, block);
        self.changes.push(BlockChange::Added { pos, block });
        // 世界里只剩这一个方块时，旧包围盒作废
        self.bounds = Some(match self.bounds {
            Some((min, max)) if self.blocks.len() > 1 => (min.min(pos), max.max(pos)),
            _ => (pos, pos),
        });
    }

    pub fn get(&self, pos: IVec3) -> Option<BlockType> {
        self.blocks.get(&pos).copied()
    }

    /// 删除方块；空格子上调用是无操作，不会产生变更记录
    pub fn remove(&mut self, pos: IVec3) -> Option<BlockType> {
        let block = self.blocks.remove(&pos)?;
        self.changes.push(BlockChange::Removed { pos, block });
        Some(block)
    }

    pub fn contains(&self, pos: IVec3) -> bool {
        self.blocks.contains_key(&pos)
    }

    /// 已占用格子数
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// 遍历所有已占用格子（无序）
    pub fn iter(&self) -> impl Iterator<Item = (IVec3, BlockType)> + '_ {
        self.blocks.iter().map(|(pos, block)| (*pos, *block))
    }

    /// 包含所有已占用格子的包围盒（含两端）
    ///
    /// 删除方块后不会收缩，因此可能比实际占用范围大；世界为空时返回 None
    pub fn bounds(&self) -> Option<(IVec3, IVec3)> {
        if self.blocks.is_empty() {
            None
        } else {
            self.bounds
        }
    }

    /// 从 `ceiling` 向下扫描到 y = 0，返回该列第一个被占用的高度
    pub fn highest_in_column(&self, x: i32, z: i32, ceiling: i32) -> Option<i32> {
        (0..=ceiling)
            .rev()
            .find(|&y| self.contains(IVec3::new(x, y, z)))
    }

    /// 清空世界，每个被删除的格子都会记录一条删除变更
    pub fn clear(&mut self) {
        for (pos, block) in self.blocks.drain() {
            self.changes.push(BlockChange::Removed { pos, block });
        }
        self.bounds = None;
    }

    /// 尚未发布的变更
    pub fn pending_changes(&self) -> &[BlockChange] {
        &self.changes
    }

    /// 取出全部待发布变更，日志随之清空
    pub fn drain_changes(&mut self) -> Vec<BlockChange> {
        std::mem::take(&mut self.changes)
    }
}
