// ==========================================
// 工业固废交换 - 主数据 API
// ==========================================
// 职责: 化学成分主数据查询
// ==========================================

use std::sync::Arc;
use tracing::instrument;

use crate::api::dto::ChemicalView;
use crate::api::error::{report_failure, ApiResult};
use crate::repository::snapshot::SnapshotStore;

pub struct MasterApi {
    store: Arc<SnapshotStore>,
}

impl MasterApi {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    /// 查询全部化学成分（按名称升序）
    #[instrument(skip(self))]
    pub fn list_chemicals(&self) -> ApiResult<Vec<ChemicalView>> {
        self.store
            .read(|snapshot| -> ApiResult<_> {
                let chemicals = snapshot.chemicals().list_all()?;
                Ok(chemicals.iter().map(ChemicalView::from).collect())
            })
            .map_err(|e| report_failure("list_chemicals", e))
    }
}
