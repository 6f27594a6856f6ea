// ==========================================
// 工业固废交换 - 处理能力
// ==========================================
// 一条处理能力 = 转化图中的一条有向边 (input -> output)
// ==========================================

use crate::domain::listing::Party;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessCapability {
    pub id: i64,
    pub processor: Party,
    pub input_chemical_id: String,
    pub input_chemical_name: String,
    pub output_chemical_id: String,
    pub output_chemical_name: String,
    pub efficiency: f64, // (0, 1]
}
