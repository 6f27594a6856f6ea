// ==========================================
// 工业固废交换 - 危险配对仓储
// ==========================================
// 存储: hazard_matrix (chem_id_1 < chem_id_2)
// ==========================================

use crate::domain::chemical::{ChemicalPair, HazardPair};
use crate::repository::error::RepositoryResult;
use rusqlite::{Connection, Result as SqliteResult};

pub struct HazardRepository<'c> {
    conn: &'c Connection,
}

impl<'c> HazardRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// 查询全部不相容配对（is_incompatible = 1）
    ///
    /// 自身配对（chem_id_1 = chem_id_2）无意义，直接跳过
    pub fn list_incompatible(&self) -> RepositoryResult<Vec<HazardPair>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT chem_id_1, chem_id_2
            FROM hazard_matrix
            WHERE is_incompatible = 1
            ORDER BY chem_id_1 ASC, chem_id_2 ASC
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows
            .iter()
            .filter_map(|(a, b)| ChemicalPair::new(a, b))
            .map(|pair| HazardPair {
                pair,
                is_incompatible: true,
            })
            .collect())
    }
}
