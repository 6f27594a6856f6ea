// ==========================================
// 工业固废交换 - 处理能力仓储
// ==========================================
// 存储: process_capabilities ↔ parties ↔ chemicals
// ==========================================

use crate::domain::listing::Party;
use crate::domain::process::ProcessCapability;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, Result as SqliteResult};

pub struct CapabilityRepository<'c> {
    conn: &'c Connection,
}

impl<'c> CapabilityRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// 查询与一次路径查询相关的所有处理能力
    ///
    /// # 参数
    /// - input_chemical_id: 查询起点
    /// - output_chemical_id: 查询终点
    ///
    /// # 返回
    /// - 输入为起点 或 输出为终点 的全部边（两跳路径只可能由这些边组成）
    /// - 按 id 升序
    pub fn list_touching(
        &self,
        input_chemical_id: &str,
        output_chemical_id: &str,
    ) -> RepositoryResult<Vec<ProcessCapability>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                pc.id,
                u.id, u.name, u.industry_type, u.location,
                pc.input_chem_id, c_in.name,
                pc.output_chem_id, c_out.name,
                pc.conversion_efficiency
            FROM process_capabilities pc
            JOIN parties u       ON u.id = pc.processor_id
            JOIN chemicals c_in  ON c_in.id = pc.input_chem_id
            JOIN chemicals c_out ON c_out.id = pc.output_chem_id
            WHERE pc.input_chem_id = ?1 OR pc.output_chem_id = ?2
            ORDER BY pc.id ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![input_chemical_id, output_chemical_id], |row| {
                Ok(ProcessCapability {
                    id: row.get(0)?,
                    processor: Party {
                        id: row.get(1)?,
                        name: row.get(2)?,
                        industry_type: row.get(3)?,
                        location: row.get(4)?,
                    },
                    input_chemical_id: row.get(5)?,
                    input_chemical_name: row.get(6)?,
                    output_chemical_id: row.get(7)?,
                    output_chemical_name: row.get(8)?,
                    efficiency: row.get(9)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}
