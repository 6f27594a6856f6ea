// ==========================================
// 工业固废交换 - 化学成分主数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::chemical::Chemical;
use crate::repository::error::RepositoryResult;
use crate::repository::listing_repo::decode_hazard_tier;
use rusqlite::{Connection, Result as SqliteResult};

pub struct ChemicalRepository<'c> {
    conn: &'c Connection,
}

impl<'c> ChemicalRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// 查询全部化学成分（按名称升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Chemical>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, hazard_level FROM chemicals ORDER BY name ASC, id ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, name, hazard_level)| -> RepositoryResult<Chemical> {
                Ok(Chemical {
                    id,
                    name,
                    hazard_tier: decode_hazard_tier(&hazard_level)?,
                })
            })
            .collect()
    }
}
