// ==========================================
// 工业固废交换 - 快照读取
// ==========================================
// 职责: 为一次引擎调用提供一致的只读视图
// 约束: 一次操作的多次读取在同一个 SQLite 读事务内完成,
//       避免撮合过程中数据被并发修改导致结果错乱
// ==========================================

use crate::db::read_schema_version;
use crate::repository::capability_repo::CapabilityRepository;
use crate::repository::chemical_repo::ChemicalRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::hazard_repo::HazardRepository;
use crate::repository::listing_repo::ListingRepository;
use rusqlite::{Connection, TransactionBehavior};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// SnapshotStore - 快照读取入口
// ==========================================
pub struct SnapshotStore {
    conn: Arc<Mutex<Connection>>,
}

impl SnapshotStore {
    /// 从已有连接创建（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在一个读事务内执行 `f`
    ///
    /// # 说明
    /// - 事务以 DEFERRED 方式开启，首次读取时获得共享锁
    /// - `f` 返回后提交（只读事务提交即释放快照）
    /// - `f` 的错误原样返回，事务随 drop 回滚
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Snapshot<'_>) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let result = f(&Snapshot { conn: &tx })?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(result)
    }

    /// 读取库中的 schema 版本
    pub fn schema_version(&self) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        Ok(read_schema_version(&conn)?)
    }
}

// ==========================================
// Snapshot - 事务内的只读视图
// ==========================================
pub struct Snapshot<'c> {
    conn: &'c Connection,
}

impl<'c> Snapshot<'c> {
    pub fn listings(&self) -> ListingRepository<'c> {
        ListingRepository::new(self.conn)
    }

    pub fn chemicals(&self) -> ChemicalRepository<'c> {
        ChemicalRepository::new(self.conn)
    }

    pub fn hazards(&self) -> HazardRepository<'c> {
        HazardRepository::new(self.conn)
    }

    pub fn capabilities(&self) -> CapabilityRepository<'c> {
        CapabilityRepository::new(self.conn)
    }
}
