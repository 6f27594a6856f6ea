// ==========================================
// 工业固废交换 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 危险等级 (Hazard Tier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for HazardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl HazardTier {
    /// 从字符串解析危险等级（未知值返回 None）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Some(HazardTier::Low),
            "MEDIUM" => Some(HazardTier::Medium),
            "HIGH" => Some(HazardTier::High),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            HazardTier::Low => "LOW",
            HazardTier::Medium => "MEDIUM",
            HazardTier::High => "HIGH",
        }
    }
}

// ==========================================
// 挂牌类型 (Listing Kind)
// ==========================================
// OFFER 持有成分表, DEMAND 持有验收标准, 二者互斥
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingKind {
    Offer,  // 供给: 可外售的废料
    Demand, // 需求: 原料采购需求
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl ListingKind {
    /// 从字符串解析挂牌类型
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "OFFER" => Some(ListingKind::Offer),
            "DEMAND" => Some(ListingKind::Demand),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ListingKind::Offer => "OFFER",
            ListingKind::Demand => "DEMAND",
        }
    }
}

// ==========================================
// 挂牌状态 (Listing Status)
// ==========================================
// 引擎只关心 ACTIVE，其余状态统一视为非活跃
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Active,
    Closed,
    Other,
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl ListingStatus {
    /// 从字符串解析挂牌状态
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => ListingStatus::Active,
            "CLOSED" => ListingStatus::Closed,
            _ => ListingStatus::Other, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "ACTIVE",
            ListingStatus::Closed => "CLOSED",
            ListingStatus::Other => "OTHER",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ListingStatus::Active)
    }
}

// ==========================================
// 比较运算符 (Comparison Operator)
// ==========================================
// 成分筛选条件允许的运算符集合: < > <= >= =
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "=")]
    Eq,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_symbol())
    }
}

impl ComparisonOperator {
    /// 允许的运算符符号
    pub const ALLOWED: [&'static str; 5] = ["<", ">", "<=", ">=", "="];

    /// 从运算符符号解析（不在允许集合内返回 None）
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "<" => Some(ComparisonOperator::Lt),
            ">" => Some(ComparisonOperator::Gt),
            "<=" => Some(ComparisonOperator::Le),
            ">=" => Some(ComparisonOperator::Ge),
            "=" => Some(ComparisonOperator::Eq),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Ge => ">=",
            ComparisonOperator::Eq => "=",
        }
    }

    /// 计算 `value <op> threshold`
    pub fn evaluate(&self, value: f64, threshold: f64) -> bool {
        match self {
            ComparisonOperator::Lt => value < threshold,
            ComparisonOperator::Gt => value > threshold,
            ComparisonOperator::Le => value <= threshold,
            ComparisonOperator::Ge => value >= threshold,
            ComparisonOperator::Eq => value == threshold,
        }
    }
}
