// ==========================================
// 工业固废交换 - 挂牌数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: listings / batch_composition / acceptance_criteria 只读查询
// ==========================================

use crate::domain::listing::{AcceptanceCriterion, CompositionEntry, Listing, Party};
use crate::domain::types::{HazardTier, ListingKind, ListingStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult};
use std::collections::HashMap;

/// 单条 IN 查询的最大参数个数（低于 SQLite 默认上限）
const IN_CLAUSE_CHUNK: usize = 500;

const LISTING_COLUMNS: &str = r#"
    l.id, l.type, l.material_name, l.total_quantity, l.status, l.created_at,
    u.id, u.name, u.industry_type, u.location
"#;

/// 从库中读出的原始行（解码前）
struct ListingRow {
    id: i64,
    kind: String,
    material_name: String,
    total_quantity: f64,
    status: String,
    created_at: String,
    owner: Party,
}

// ==========================================
// ListingRepository - 挂牌仓储
// ==========================================
pub struct ListingRepository<'c> {
    conn: &'c Connection,
}

impl<'c> ListingRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// 按 id 查询挂牌（不限状态/类型）
    pub fn find_by_id(&self, listing_id: i64) -> RepositoryResult<Option<Listing>> {
        let sql = format!(
            "SELECT {} FROM listings l JOIN parties u ON u.id = l.user_id WHERE l.id = ?1",
            LISTING_COLUMNS
        );
        let row = self
            .conn
            .query_row(&sql, params![listing_id], map_listing_row)
            .optional()?;

        row.map(decode_listing).transpose()
    }

    /// 查询所有 ACTIVE 挂牌，可按类型过滤
    ///
    /// # 返回
    /// - 按 created_at 倒序、id 倒序
    pub fn list_active(&self, kind: Option<ListingKind>) -> RepositoryResult<Vec<Listing>> {
        let rows = match kind {
            Some(kind) => {
                let sql = format!(
                    r#"
                    SELECT {} FROM listings l
                    JOIN parties u ON u.id = l.user_id
                    WHERE l.status = 'ACTIVE' AND l.type = ?1
                    ORDER BY l.created_at DESC, l.id DESC
                    "#,
                    LISTING_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![kind.to_db_str()], map_listing_row)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
            None => {
                let sql = format!(
                    r#"
                    SELECT {} FROM listings l
                    JOIN parties u ON u.id = l.user_id
                    WHERE l.status = 'ACTIVE'
                    ORDER BY l.created_at DESC, l.id DESC
                    "#,
                    LISTING_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], map_listing_row)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
        };

        rows.into_iter().map(decode_listing).collect()
    }

    /// 查询某个挂牌方的所有 ACTIVE 挂牌
    pub fn list_active_by_owner(&self, owner_id: i64) -> RepositoryResult<Vec<Listing>> {
        let sql = format!(
            r#"
            SELECT {} FROM listings l
            JOIN parties u ON u.id = l.user_id
            WHERE l.user_id = ?1 AND l.status = 'ACTIVE'
            ORDER BY l.created_at DESC, l.id DESC
            "#,
            LISTING_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![owner_id], map_listing_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter().map(decode_listing).collect()
    }

    /// 判断挂牌方是否存在
    pub fn party_exists(&self, party_id: i64) -> RepositoryResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM parties WHERE id = ?1",
                params![party_id],
                |_row| Ok(true),
            )
            .optional()?;
        Ok(found.unwrap_or(false))
    }

    /// 批量读取成分表
    ///
    /// # 返回
    /// - listing_id → 成分行（按含量倒序，含量相同按成分代码）
    /// - 没有成分行的挂牌不会出现在结果中
    pub fn load_compositions(
        &self,
        listing_ids: &[i64],
    ) -> RepositoryResult<HashMap<i64, Vec<CompositionEntry>>> {
        let mut by_listing: HashMap<i64, Vec<CompositionEntry>> = HashMap::new();

        for chunk in listing_ids.chunks(IN_CLAUSE_CHUNK) {
            let sql = format!(
                r#"
                SELECT bc.listing_id, bc.chem_id, c.name, c.hazard_level, bc.percentage
                FROM batch_composition bc
                JOIN chemicals c ON c.id = bc.chem_id
                WHERE {}
                ORDER BY bc.listing_id ASC, bc.percentage DESC, bc.chem_id ASC
                "#,
                build_in_clause("bc.listing_id", chunk.len())
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter()), |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, f64>(4)?,
                    ))
                })?
                .collect::<SqliteResult<Vec<_>>>()?;

            for (listing_id, chemical_id, chemical_name, hazard_level, percentage) in rows {
                let hazard_tier = decode_hazard_tier(&hazard_level)?;
                by_listing.entry(listing_id).or_default().push(CompositionEntry {
                    listing_id,
                    chemical_id,
                    chemical_name,
                    hazard_tier,
                    percentage,
                });
            }
        }

        Ok(by_listing)
    }

    /// 读取单个挂牌的成分表
    pub fn load_composition(&self, listing_id: i64) -> RepositoryResult<Vec<CompositionEntry>> {
        Ok(self
            .load_compositions(&[listing_id])?
            .remove(&listing_id)
            .unwrap_or_default())
    }

    /// 批量读取验收标准
    ///
    /// # 返回
    /// - listing_id → 验收标准（按成分名称升序，名称相同按 id）
    pub fn load_criteria(
        &self,
        listing_ids: &[i64],
    ) -> RepositoryResult<HashMap<i64, Vec<AcceptanceCriterion>>> {
        let mut by_listing: HashMap<i64, Vec<AcceptanceCriterion>> = HashMap::new();

        for chunk in listing_ids.chunks(IN_CLAUSE_CHUNK) {
            let sql = format!(
                r#"
                SELECT ac.id, ac.listing_id, ac.chem_id, c.name, ac.min_percentage, ac.max_percentage
                FROM acceptance_criteria ac
                JOIN chemicals c ON c.id = ac.chem_id
                WHERE {}
                ORDER BY ac.listing_id ASC, c.name ASC, ac.id ASC
                "#,
                build_in_clause("ac.listing_id", chunk.len())
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter()), |row| {
                    Ok(AcceptanceCriterion {
                        id: row.get(0)?,
                        listing_id: row.get(1)?,
                        chemical_id: row.get(2)?,
                        chemical_name: row.get(3)?,
                        min_percentage: row.get(4)?,
                        max_percentage: row.get(5)?,
                    })
                })?
                .collect::<SqliteResult<Vec<_>>>()?;

            for criterion in rows {
                by_listing
                    .entry(criterion.listing_id)
                    .or_default()
                    .push(criterion);
            }
        }

        Ok(by_listing)
    }
}

// ==========================================
// 行映射 / 解码
// ==========================================

fn map_listing_row(row: &rusqlite::Row<'_>) -> SqliteResult<ListingRow> {
    Ok(ListingRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        material_name: row.get(2)?,
        total_quantity: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        owner: Party {
            id: row.get(6)?,
            name: row.get(7)?,
            industry_type: row.get(8)?,
            location: row.get(9)?,
        },
    })
}

fn decode_listing(row: ListingRow) -> RepositoryResult<Listing> {
    let kind = ListingKind::from_str(&row.kind).ok_or_else(|| RepositoryError::DataCorruption {
        field: "listings.type".to_string(),
        message: format!("listing_id={} 未知挂牌类型: {}", row.id, row.kind),
    })?;

    Ok(Listing {
        id: row.id,
        owner: row.owner,
        kind,
        material_name: row.material_name,
        total_quantity: row.total_quantity,
        status: ListingStatus::from_str(&row.status),
        created_at: parse_db_datetime(&row.created_at).map_err(|message| {
            RepositoryError::DataCorruption {
                field: "listings.created_at".to_string(),
                message: format!("listing_id={} {}", row.id, message),
            }
        })?,
    })
}

pub(crate) fn decode_hazard_tier(value: &str) -> RepositoryResult<HazardTier> {
    HazardTier::from_str(value).ok_or_else(|| RepositoryError::DataCorruption {
        field: "chemicals.hazard_level".to_string(),
        message: format!("未知危险等级: {}", value),
    })
}

/// 解析 SQLite datetime('now') 写入的时间（兼容带 T 分隔与小数秒）
fn parse_db_datetime(value: &str) -> Result<NaiveDateTime, String> {
    let trimmed = value.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| format!("时间格式错误: {}", value))
}

/// 构建 IN 子句（`column IN (?, ?, ?)`，空列表返回永假条件）
fn build_in_clause(column_name: &str, count: usize) -> String {
    if count == 0 {
        return "1 = 0".to_string();
    }
    let placeholders = vec!["?"; count].join(", ");
    format!("{} IN ({})", column_name, placeholders)
}
