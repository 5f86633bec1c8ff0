//! 数据集相关接口
//!
//! 所有接口都挂在 `/api/projects/:project_id/datasets` 下。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{BatchProgress, Dataset, DatasetId, DatasetListQuery, DatasetPage};
use crate::orchestrator::batch_delete;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;
use crate::workflow::OptimizeRequest;

/// 优化成功的响应
#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub success: bool,
    pub dataset: Dataset,
}

/// 列表响应：分页结果，或 `selectedAll=1` 时的 `[{"id": ...}]`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListResponse {
    Page(DatasetPage),
    Ids(Vec<DatasetId>),
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// `POST /optimize` - 按建议重写一条数据集的答案
///
/// 请求体不检查 Content-Type；无法解析时与其他失败一样返回 500
pub async fn optimize(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<OptimizeResponse>> {
    let request: OptimizeRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("[项目 {}] ⚠️ 优化请求体解析失败: {}", project_id, e);
        ApiError::internal(e.to_string())
    })?;
    let dataset = state.optimizer.optimize(&project_id, request).await?;
    Ok(Json(OptimizeResponse {
        success: true,
        dataset,
    }))
}

/// `GET /` - 分页列表
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    query: Result<Query<DatasetListQuery>, QueryRejection>,
) -> ApiResult<Json<ListResponse>> {
    let Query(query) = query?;
    debug!("[项目 {}] 查询数据集: {:?}", project_id, query);

    if query.wants_all_ids() {
        let ids = state.store.list_ids(&project_id, &query).await?;
        let ids = ids.into_iter().map(|id| DatasetId { id }).collect();
        return Ok(Json(ListResponse::Ids(ids)));
    }

    let page = state.store.list(&project_id, &query).await?;
    Ok(Json(ListResponse::Page(page)))
}

/// `GET /:dataset_id` - 读取单条
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path((project_id, dataset_id)): Path<(String, String)>,
) -> ApiResult<Json<Dataset>> {
    let dataset = state
        .store
        .get_by_id(&project_id, &dataset_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Dataset does not exist"))?;
    Ok(Json(dataset))
}

/// `PUT /:dataset_id` - 整条更新，路径中的 ID 优先于请求体
pub async fn update_one(
    State(state): State<Arc<AppState>>,
    Path((project_id, dataset_id)): Path<(String, String)>,
    payload: Result<Json<Dataset>, JsonRejection>,
) -> ApiResult<Json<Dataset>> {
    let Json(dataset) = payload?;
    let dataset = Dataset {
        id: dataset_id,
        project_id,
        ..dataset
    };
    let updated = state.store.update(dataset).await?;
    Ok(Json(updated))
}

/// `DELETE /?id=` - 删除单条
pub async fn delete_one(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Query(params) = params?;
    let id = params
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Dataset ID cannot be empty"))?;

    state.store.delete(&project_id, &id).await?;
    info!("[项目 {}] 🗑️ 已删除数据集 {}", project_id, id);
    Ok(Json(DeleteResponse { success: true }))
}

/// `POST /batch-delete` - 有界并发批量删除
///
/// 每一步进度只写日志，接口只返回最终的 `BatchProgress`
pub async fn batch_delete_many(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    payload: Result<Json<BatchDeleteRequest>, JsonRejection>,
) -> ApiResult<Json<BatchProgress>> {
    let Json(request) = payload?;

    let progress = batch_delete(
        state.store.as_ref(),
        &project_id,
        request.ids,
        state.batch_delete_concurrency,
        |_| {},
    )
    .await?;

    Ok(Json(progress))
}
