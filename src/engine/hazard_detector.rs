// ==========================================
// 工业固废交换 - 运输危险检测
// ==========================================
// 输入: 一个 OFFER 的成分表 + 不相容成分对表
// 输出: 成分表中出现的全部不相容成分对（无序对，每对只报一次）
// ==========================================

use crate::domain::chemical::{ChemicalPair, HazardPair};
use crate::domain::listing::CompositionEntry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ==========================================
// HazardTable - 不相容成分对
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct HazardTable {
    pairs: HashSet<ChemicalPair>,
}

impl HazardTable {
    /// 只收录 is_incompatible = true 的成分对
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = HazardPair>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .filter(|p| p.is_incompatible)
                .map(|p| p.pair)
                .collect(),
        }
    }

    /// 判断两种成分是否不相容（与参数顺序无关）
    pub fn is_incompatible(&self, a: &str, b: &str) -> bool {
        ChemicalPair::new(a, b).map_or(false, |pair| self.pairs.contains(&pair))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// 单个危险告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardFlag {
    pub pair: ChemicalPair,
    pub first_name: String,
    pub second_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardReport {
    pub flags: Vec<HazardFlag>,
}

impl HazardReport {
    pub fn has_hazard(&self) -> bool {
        !self.flags.is_empty()
    }
}

// ==========================================
// HazardDetector
// ==========================================
pub struct HazardDetector;

impl HazardDetector {
    /// 检测成分表中的不相容成分对
    ///
    /// # 返回
    /// - 按 (first, second) 升序，first < second
    pub fn detect(table: &HazardTable, composition: &[CompositionEntry]) -> HazardReport {
        if table.is_empty() {
            return HazardReport::default();
        }

        // 成分去重并排序: chemical_id → 名称
        let chemicals: BTreeMap<&str, &str> = composition
            .iter()
            .map(|entry| (entry.chemical_id.as_str(), entry.chemical_name.as_str()))
            .collect();
        let chemicals: Vec<(&str, &str)> = chemicals.into_iter().collect();

        let mut flags = Vec::new();
        for (i, &(first_id, first_name)) in chemicals.iter().enumerate() {
            for &(second_id, second_name) in &chemicals[i + 1..] {
                if !table.is_incompatible(first_id, second_id) {
                    continue;
                }
                if let Some(pair) = ChemicalPair::new(first_id, second_id) {
                    flags.push(HazardFlag {
                        pair,
                        first_name: first_name.to_string(),
                        second_name: second_name.to_string(),
                    });
                }
            }
        }

        HazardReport { flags }
    }
}
