// ==========================================
// 测试数据构建器
// ==========================================
// 用于快速写入挂牌及其成分表 / 验收标准
// ==========================================

#![allow(dead_code)]

use rusqlite::{params, Connection};

// ==========================================
// ListingBuilder
// ==========================================

pub struct ListingBuilder {
    owner_id: i64,
    kind: &'static str,
    material_name: String,
    total_quantity: f64,
    status: String,
    created_at: String,
    composition: Vec<(String, f64)>,
    criteria: Vec<(String, Option<f64>, Option<f64>)>,
}

impl ListingBuilder {
    /// 供给挂牌
    pub fn offer(owner_id: i64, material_name: &str) -> Self {
        Self::new(owner_id, "OFFER", material_name)
    }

    /// 需求挂牌
    pub fn demand(owner_id: i64, material_name: &str) -> Self {
        Self::new(owner_id, "DEMAND", material_name)
    }

    fn new(owner_id: i64, kind: &'static str, material_name: &str) -> Self {
        Self {
            owner_id,
            kind,
            material_name: material_name.to_string(),
            total_quantity: 100.0,
            status: "ACTIVE".to_string(),
            created_at: "2026-03-01 09:00:00".to_string(),
            composition: Vec::new(),
            criteria: Vec::new(),
        }
    }

    pub fn quantity(mut self, total_quantity: f64) -> Self {
        self.total_quantity = total_quantity;
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn created_at(mut self, created_at: &str) -> Self {
        self.created_at = created_at.to_string();
        self
    }

    pub fn component(mut self, chemical_id: &str, percentage: f64) -> Self {
        self.composition.push((chemical_id.to_string(), percentage));
        self
    }

    pub fn at_least(self, chemical_id: &str, min: f64) -> Self {
        self.criterion(chemical_id, Some(min), None)
    }

    pub fn at_most(self, chemical_id: &str, max: f64) -> Self {
        self.criterion(chemical_id, None, Some(max))
    }

    pub fn between(self, chemical_id: &str, min: f64, max: f64) -> Self {
        self.criterion(chemical_id, Some(min), Some(max))
    }

    fn criterion(mut self, chemical_id: &str, min: Option<f64>, max: Option<f64>) -> Self {
        self.criteria.push((chemical_id.to_string(), min, max));
        self
    }

    /// 写入数据库，返回挂牌 id
    pub fn insert(self, conn: &Connection) -> i64 {
        conn.execute(
            r#"INSERT INTO listings (user_id, type, material_name, total_quantity, status, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                self.owner_id,
                self.kind,
                self.material_name,
                self.total_quantity,
                self.status,
                self.created_at
            ],
        )
        .unwrap();
        let listing_id = conn.last_insert_rowid();

        for (chemical_id, percentage) in &self.composition {
            conn.execute(
                "INSERT INTO batch_composition (listing_id, chem_id, percentage) VALUES (?1, ?2, ?3)",
                params![listing_id, chemical_id, percentage],
            )
            .unwrap();
        }
        for (chemical_id, min, max) in &self.criteria {
            conn.execute(
                r#"INSERT INTO acceptance_criteria (listing_id, chem_id, min_percentage, max_percentage)
                   VALUES (?1, ?2, ?3, ?4)"#,
                params![listing_id, chemical_id, min, max],
            )
            .unwrap();
        }

        listing_id
    }
}
