// ==========================================
// 工业固废交换 - API 请求/响应 DTO
// ==========================================
// 约定: JSON 字段统一 camelCase
// ==========================================

use crate::domain::chemical::Chemical;
use crate::domain::listing::{AcceptanceCriterion, CompositionEntry, Listing};
use crate::engine::buyer_matcher::BuyerMatch;
use crate::engine::hazard_detector::HazardFlag;
use crate::engine::processor_pathfinder::{DirectRoute, TwoHopRoute};
use serde::{Deserialize, Serialize};

/// 对外展示的时间格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// 请求
// ==========================================

/// 单个筛选条件（运算符保留原始字符串，由 API 层校验）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClauseRequest {
    #[serde(alias = "chemId")]
    pub chemical_id: String,
    pub operator: String,
    #[serde(alias = "value")]
    pub threshold: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterListingsRequest {
    #[serde(default)]
    pub filters: Vec<FilterClauseRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBuyersRequest {
    #[serde(default)]
    pub supply_listing_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindProcessorsRequest {
    #[serde(default, alias = "inputChemId")]
    pub input_chemical_id: Option<String>,
    #[serde(default, alias = "outputChemId")]
    pub output_chemical_id: Option<String>,
}

// ==========================================
// 主数据
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalView {
    pub id: String,
    pub name: String,
    pub hazard_level: String,
}

impl From<&Chemical> for ChemicalView {
    fn from(chemical: &Chemical) -> Self {
        Self {
            id: chemical.id.clone(),
            name: chemical.name.clone(),
            hazard_level: chemical.hazard_tier.to_db_str().to_string(),
        }
    }
}

// ==========================================
// 挂牌
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionView {
    pub chemical_id: String,
    pub chemical_name: String,
    pub hazard_level: String,
    pub percentage: f64,
}

impl From<&CompositionEntry> for CompositionView {
    fn from(entry: &CompositionEntry) -> Self {
        Self {
            chemical_id: entry.chemical_id.clone(),
            chemical_name: entry.chemical_name.clone(),
            hazard_level: entry.hazard_tier.to_db_str().to_string(),
            percentage: entry.percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionView {
    pub chemical_id: String,
    pub chemical_name: String,
    pub min_percentage: Option<f64>,
    pub max_percentage: Option<f64>,
}

impl From<&AcceptanceCriterion> for CriterionView {
    fn from(criterion: &AcceptanceCriterion) -> Self {
        Self {
            chemical_id: criterion.chemical_id.clone(),
            chemical_name: criterion.chemical_name.clone(),
            min_percentage: criterion.min_percentage,
            max_percentage: criterion.max_percentage,
        }
    }
}

/// 挂牌详情（含挂牌方、成分表、验收标准）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub material_name: String,
    pub total_quantity: f64,
    pub status: String,
    pub created_at: String,
    pub owner_id: i64,
    pub owner_name: String,
    pub owner_industry: String,
    pub owner_location: String,
    pub composition: Vec<CompositionView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<CriterionView>,
}

impl ListingView {
    pub fn from_parts(
        listing: &Listing,
        composition: &[CompositionEntry],
        criteria: &[AcceptanceCriterion],
    ) -> Self {
        Self {
            id: listing.id,
            kind: listing.kind.to_db_str().to_string(),
            material_name: listing.material_name.clone(),
            total_quantity: listing.total_quantity,
            status: listing.status.to_db_str().to_string(),
            created_at: listing.created_at.format(DATETIME_FORMAT).to_string(),
            owner_id: listing.owner.id,
            owner_name: listing.owner.name.clone(),
            owner_industry: listing.owner.industry_type.clone(),
            owner_location: listing.owner.location.clone(),
            composition: composition.iter().map(CompositionView::from).collect(),
            criteria: criteria.iter().map(CriterionView::from).collect(),
        }
    }
}

// ==========================================
// 买方撮合
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerMatchView {
    pub demand_id: i64,
    pub demand_material: String,
    pub demand_quantity: f64,
    pub buyer_id: i64,
    pub buyer_name: String,
    pub buyer_industry: String,
    pub buyer_location: String,
    pub matched_criteria: usize,
    pub total_criteria: usize,
}

impl From<&BuyerMatch> for BuyerMatchView {
    fn from(m: &BuyerMatch) -> Self {
        Self {
            demand_id: m.demand.id,
            demand_material: m.demand.material_name.clone(),
            demand_quantity: m.demand.total_quantity,
            buyer_id: m.demand.owner.id,
            buyer_name: m.demand.owner.name.clone(),
            buyer_industry: m.demand.owner.industry_type.clone(),
            buyer_location: m.demand.owner.location.clone(),
            matched_criteria: m.tally.satisfied,
            total_criteria: m.tally.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardWarningView {
    pub chemical_a_id: String,
    pub chemical_b_id: String,
    pub chemical_a_name: String,
    pub chemical_b_name: String,
}

impl From<&HazardFlag> for HazardWarningView {
    fn from(flag: &HazardFlag) -> Self {
        Self {
            chemical_a_id: flag.pair.first().to_string(),
            chemical_b_id: flag.pair.second().to_string(),
            chemical_a_name: flag.first_name.clone(),
            chemical_b_name: flag.second_name.clone(),
        }
    }
}

/// 撮合结果 + 危险告警（告警只做提示，不影响撮合结果）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBuyersResponse {
    pub supply_listing_id: i64,
    pub matches: Vec<BuyerMatchView>,
    pub hazard_warnings: Vec<HazardWarningView>,
    pub has_hazard: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard_note: Option<String>,
}

// ==========================================
// 处理商路径
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectPathView {
    pub capability_id: i64,
    pub processor_id: i64,
    pub processor_name: String,
    pub processor_location: String,
    pub input_chemical_id: String,
    pub input_name: String,
    pub output_chemical_id: String,
    pub output_name: String,
    pub efficiency: f64,
    pub hops: u8,
}

impl From<&DirectRoute> for DirectPathView {
    fn from(route: &DirectRoute) -> Self {
        let c = &route.capability;
        Self {
            capability_id: c.id,
            processor_id: c.processor.id,
            processor_name: c.processor.name.clone(),
            processor_location: c.processor.location.clone(),
            input_chemical_id: c.input_chemical_id.clone(),
            input_name: c.input_chemical_name.clone(),
            output_chemical_id: c.output_chemical_id.clone(),
            output_name: c.output_chemical_name.clone(),
            efficiency: route.efficiency(),
            hops: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoHopPathView {
    pub step1_id: i64,
    pub processor1_id: i64,
    pub processor1_name: String,
    pub processor1_location: String,
    pub intermediate_chemical_id: String,
    pub intermediate_chemical: String,
    pub step1_efficiency: f64,
    pub step2_id: i64,
    pub processor2_id: i64,
    pub processor2_name: String,
    pub processor2_location: String,
    pub step2_efficiency: f64,
    pub total_efficiency: f64,
    pub hops: u8,
}

impl From<&TwoHopRoute> for TwoHopPathView {
    fn from(route: &TwoHopRoute) -> Self {
        Self {
            step1_id: route.first.id,
            processor1_id: route.first.processor.id,
            processor1_name: route.first.processor.name.clone(),
            processor1_location: route.first.processor.location.clone(),
            intermediate_chemical_id: route.intermediate_chemical_id().to_string(),
            intermediate_chemical: route.intermediate_chemical_name().to_string(),
            step1_efficiency: route.first.efficiency,
            step2_id: route.second.id,
            processor2_id: route.second.processor.id,
            processor2_name: route.second.processor.name.clone(),
            processor2_location: route.second.processor.location.clone(),
            step2_efficiency: route.second.efficiency,
            total_efficiency: route.total_efficiency(),
            hops: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindProcessorsResponse {
    pub input_chemical_id: String,
    pub output_chemical_id: String,
    pub direct_paths: Vec<DirectPathView>,
    pub two_hop_paths: Vec<TwoHopPathView>,
    pub total_routes: usize,
}
