//! # Web API
//!
//! 基于 axum 的 HTTP 接口层，只做参数提取和错误映射，
//! 业务逻辑在 `workflow` / `orchestrator` 中。

pub mod errors;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use errors::{ApiError, ApiResult};
pub use state::AppState;

use handlers::{datasets, health};

/// 创建路由
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/projects/:project_id/datasets",
            get(datasets::list).delete(datasets::delete_one),
        )
        .route(
            "/api/projects/:project_id/datasets/optimize",
            post(datasets::optimize),
        )
        .route(
            "/api/projects/:project_id/datasets/batch-delete",
            post(datasets::batch_delete_many),
        )
        .route(
            "/api/projects/:project_id/datasets/:dataset_id",
            get(datasets::get_one).put(datasets::update_one),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
