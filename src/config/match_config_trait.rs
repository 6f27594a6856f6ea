// ==========================================
// 工业固废交换 - 撮合配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use std::error::Error;

// ==========================================
// MatchConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait MatchConfigReader: Send + Sync {
    /// 是否在撮合前复核 OFFER 成分合计 ≤ 100%
    ///
    /// # 默认值
    /// - false（信任建档时的校验）
    fn get_verify_composition_sum(&self) -> Result<bool, Box<dyn Error>>;

    /// 复核成分合计时允许的浮点余量（百分点）
    ///
    /// # 默认值
    /// - 0.0
    fn get_composition_sum_tolerance(&self) -> Result<f64, Box<dyn Error>>;

    /// 检出危险配对时附带的提示文本
    fn get_hazard_note(&self) -> Result<String, Box<dyn Error>>;
}
