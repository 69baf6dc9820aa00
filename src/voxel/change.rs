/// 方块变更通知
///
/// 世界存储每次修改都会记录一条变更，渲染端以此作为唯一的可视数据来源
use bevy::prelude::*;

use super::block_type::BlockType;

/// 单个方块的变更
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockChange {
    /// 方块被写入（新增或覆盖），携带写入后的类型
    Added { pos: IVec3, block: BlockType },

    /// 方块被删除，携带删除前的类型
    Removed { pos: IVec3, block: BlockType },
}

impl BlockChange {
    /// 获取影响的方块坐标
    pub fn pos(&self) -> IVec3 {
        match self {
            BlockChange::Added { pos, .. } => *pos,
            BlockChange::Removed { pos, .. } => *pos,
        }
    }

    /// 变更后该位置的方块类型，删除时为 None
    pub fn resulting_block(&self) -> Option<BlockType> {
        match self {
            BlockChange::Added { block, .. } => Some(*block),
            BlockChange::Removed { .. } => None,
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, BlockChange::Removed { .. })
    }
}
