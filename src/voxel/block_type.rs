//! 方块类型定义

use serde::{Deserialize, Serialize};

/// 方块种类枚举 - 封闭集合，方块本身不携带任何额外状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Grass,
    Dirt,
    Stone,
    Wood,
    Sand,
}

impl BlockType {
    /// 所有方块类型，顺序与数字键 1-5 对应
    pub const ALL: [BlockType; 5] = [
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::Wood,
        BlockType::Sand,
    ];

    /// 小写名称，用于日志和存档
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Grass => "grass",
            BlockType::Dirt => "dirt",
            BlockType::Stone => "stone",
            BlockType::Wood => "wood",
            BlockType::Sand => "sand",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// 数字键选择（1 起始）
    pub fn from_hotkey(digit: u8) -> Option<Self> {
        let idx = usize::from(digit).checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    /// 方块主颜色（sRGB，0xRRGGBB），供渲染端使用
    pub fn color(self) -> u32 {
        match self {
            BlockType::Grass => 0x7CFC00,
            BlockType::Dirt => 0x8B7355,
            BlockType::Stone => 0x808080,
            BlockType::Wood => 0x8B4513,
            BlockType::Sand => 0xF4A460,
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
