// ==========================================
// 工业固废交换 - 化学成分主数据
// ==========================================
// 职责: 化学成分、危险等级、不相容组合（危险配对）
// 红线: 主数据只读，引擎不修改
// ==========================================

use crate::domain::types::HazardTier;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Chemical - 化学成分
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chemical {
    pub id: String,   // 短代码，唯一（如 SIO2 / PB）
    pub name: String, // 显示名称
    pub hazard_tier: HazardTier,
}

// ==========================================
// ChemicalPair - 无序成分对（规范化）
// ==========================================
/// 无序化学成分对
///
/// 构造时按标识符字典序排列，保证 (A,B) 与 (B,A) 得到同一个键。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChemicalPair {
    first: String,
    second: String,
}

impl ChemicalPair {
    /// 构造规范化成分对；两个标识符相同时返回 None
    pub fn new(a: &str, b: &str) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a.to_string(),
                second: b.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b.to_string(),
                second: a.to_string(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// 字典序较小的标识符
    pub fn first(&self) -> &str {
        &self.first
    }

    /// 字典序较大的标识符
    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for ChemicalPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.first, self.second)
    }
}

// ==========================================
// HazardPair - 危险配对（不相容）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardPair {
    pub pair: ChemicalPair,
    pub is_incompatible: bool,
}
