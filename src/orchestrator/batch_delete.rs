//! 批量删除 - 编排层
//!
//! 把选中的数据集 ID 交给 [`batch_runner`](super::batch_runner)，
//! 每个 ID 发起一次删除，并维护一个 [`BatchProgress`] 供调用方展示。

use thiserror::Error;
use tracing::warn;

use crate::error::StoreError;
use crate::models::BatchProgress;
use crate::orchestrator::batch_runner::{process_in_parallel, BatchError};
use crate::services::DatasetStore;
use crate::utils::logging::{log_batch_complete, log_batch_progress, log_batch_start};

/// 界面默认的批量删除并发数
pub const DEFAULT_DELETE_CONCURRENCY: usize = 3;

/// 批量删除失败，附带失败时的进度
#[derive(Debug, Error)]
#[error("批量删除失败 (进度 {}/{}): {source}", .progress.completed, .progress.total)]
pub struct BatchDeleteError {
    pub progress: BatchProgress,
    #[source]
    pub source: BatchError<StoreError>,
}

/// 批量删除数据集
///
/// # 参数
/// - `store`: 数据集存储
/// - `project_id`: 项目ID
/// - `ids`: 待删除的数据集 ID
/// - `concurrency`: 最大并发数
/// - `observer`: 每次进度更新后调用
///
/// # 返回
/// 全部删除成功时返回最终进度；任一删除失败时，等其余删除结束后返回错误
pub async fn batch_delete<F>(
    store: &dyn DatasetStore,
    project_id: &str,
    ids: Vec<String>,
    concurrency: usize,
    mut observer: F,
) -> Result<BatchProgress, BatchDeleteError>
where
    F: FnMut(&BatchProgress),
{
    let mut progress = BatchProgress::new(ids.len());
    if ids.is_empty() {
        return Ok(progress);
    }

    log_batch_start(project_id, ids.len(), concurrency);

    let result = process_in_parallel(
        ids,
        |id| async move {
            store.delete(project_id, &id).await.map_err(|e| {
                warn!("[项目 {}] ⚠️ 删除数据集 {} 失败: {}", project_id, id, e);
                e
            })
        },
        concurrency,
        |completed, total| {
            progress.update(completed, total);
            log_batch_progress(project_id, completed, total, progress.percentage);
            observer(&progress);
        },
    )
    .await;

    match result {
        Ok(_) => {
            log_batch_complete(project_id, progress.completed, 0);
            Ok(progress)
        }
        Err(source) => {
            let failed = match &source {
                BatchError::ItemFailed { failed, .. } => *failed,
                BatchError::InvalidConcurrency { .. } => 0,
            };
            log_batch_complete(project_id, progress.completed, failed);
            Err(BatchDeleteError { progress, source })
        }
    }
}
