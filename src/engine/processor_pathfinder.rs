// ==========================================
// 工业固废交换 - 处理商路径搜索
// ==========================================
// 模型: 每条处理能力是一条有向边 input → output（带转化效率）
// 输出:
// - 直达路径: 一条边 X → Y
// - 两跳路径: X → M → Y，两条边必须是不同的处理能力
// 效率: 两跳总效率 = e1 × e2（不做四舍五入）
// 约束: 最多两跳，不做更长路径搜索
// ==========================================

use crate::domain::process::ProcessCapability;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// CapabilityGraph - 转化图索引
// ==========================================
pub struct CapabilityGraph<'a> {
    by_input: HashMap<&'a str, Vec<&'a ProcessCapability>>,
    by_edge: HashMap<(&'a str, &'a str), Vec<&'a ProcessCapability>>,
}

impl<'a> CapabilityGraph<'a> {
    pub fn build(capabilities: &'a [ProcessCapability]) -> Self {
        let mut by_input: HashMap<&'a str, Vec<&'a ProcessCapability>> = HashMap::new();
        let mut by_edge: HashMap<(&'a str, &'a str), Vec<&'a ProcessCapability>> = HashMap::new();

        for capability in capabilities {
            by_input
                .entry(capability.input_chemical_id.as_str())
                .or_default()
                .push(capability);
            by_edge
                .entry((
                    capability.input_chemical_id.as_str(),
                    capability.output_chemical_id.as_str(),
                ))
                .or_default()
                .push(capability);
        }

        Self { by_input, by_edge }
    }

    /// 以 input 为起点的全部边
    pub fn outgoing(&self, input: &str) -> &[&'a ProcessCapability] {
        self.by_input.get(input).map(Vec::as_slice).unwrap_or(&[])
    }

    /// input → output 的全部边
    pub fn edges(&self, input: &'a str, output: &'a str) -> &[&'a ProcessCapability] {
        self.by_edge
            .get(&(input, output))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ==========================================
// 路径结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectRoute {
    pub capability: ProcessCapability,
}

impl DirectRoute {
    pub fn efficiency(&self) -> f64 {
        self.capability.efficiency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoHopRoute {
    pub first: ProcessCapability,
    pub second: ProcessCapability,
}

impl TwoHopRoute {
    pub fn intermediate_chemical_id(&self) -> &str {
        &self.first.output_chemical_id
    }

    pub fn intermediate_chemical_name(&self) -> &str {
        &self.first.output_chemical_name
    }

    pub fn total_efficiency(&self) -> f64 {
        self.first.efficiency * self.second.efficiency
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSet {
    pub direct: Vec<DirectRoute>,
    pub two_hop: Vec<TwoHopRoute>,
}

impl RouteSet {
    pub fn total_routes(&self) -> usize {
        self.direct.len() + self.two_hop.len()
    }
}

// ==========================================
// ProcessorPathfinder
// ==========================================
pub struct ProcessorPathfinder;

impl ProcessorPathfinder {
    /// 搜索 input → output 的直达和两跳路径
    ///
    /// # 返回
    /// - direct: 按 capability id 升序
    /// - two_hop: 按 (first.id, second.id) 升序
    pub fn find_routes(graph: &CapabilityGraph<'_>, input: &str, output: &str) -> RouteSet {
        let mut direct: Vec<DirectRoute> = graph
            .edges(input, output)
            .iter()
            .map(|&capability| DirectRoute {
                capability: capability.clone(),
            })
            .collect();
        direct.sort_by_key(|route| route.capability.id);

        let mut two_hop = Vec::new();
        for &first in graph.outgoing(input) {
            for &second in graph.edges(&first.output_chemical_id, output) {
                // 同一条处理能力不能同时充当两跳
                if first.id == second.id {
                    continue;
                }
                two_hop.push(TwoHopRoute {
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
        two_hop.sort_by_key(|route| (route.first.id, route.second.id));

        RouteSet { direct, two_hop }
    }
}
