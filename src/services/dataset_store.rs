//! 数据集存储 - 业务能力层
//!
//! 只描述"读 / 写 / 删数据集"的能力，不关心流程。
//!
//! - [`HttpDatasetStore`]：调用持久层 HTTP 接口
//! - [`MemoryDatasetStore`]：进程内存储，用于本地模式和测试

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::models::{Dataset, DatasetId, DatasetListQuery, DatasetPage};

/// 数据集持久层接口
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// 存储类型名称（仅用于日志）
    fn kind(&self) -> &'static str;

    /// 按 ID 读取，不存在时返回 `None`
    async fn get_by_id(&self, project_id: &str, id: &str) -> Result<Option<Dataset>, StoreError>;

    /// 整条更新，返回更新后的记录
    async fn update(&self, dataset: Dataset) -> Result<Dataset, StoreError>;

    /// 分页列表
    async fn list(
        &self,
        project_id: &str,
        query: &DatasetListQuery,
    ) -> Result<DatasetPage, StoreError>;

    /// 符合过滤条件的全部 ID（忽略分页）
    async fn list_ids(
        &self,
        project_id: &str,
        query: &DatasetListQuery,
    ) -> Result<Vec<String>, StoreError>;

    /// 删除单条记录
    async fn delete(&self, project_id: &str, id: &str) -> Result<(), StoreError>;
}

// ========== HTTP 实现 ==========

/// 通过持久层 HTTP 接口访问数据集
#[derive(Debug)]
pub struct HttpDatasetStore {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpDatasetStore {
    /// 创建 HTTP 存储，`base_url` 必须是合法的 http(s) 地址
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, StoreError> {
        let invalid = |reason: String| StoreError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let base_url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("不能作为基础地址".to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// `{base}/api/projects/{project_id}/datasets[/{extra}]`，每一段单独编码
    fn endpoint(&self, project_id: &str, extra: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: "不能作为基础地址".to_string(),
                })?;
            segments
                .pop_if_empty()
                .extend(["api", "projects", project_id, "datasets"]);
            if let Some(extra) = extra {
                segments.push(extra);
            }
        }
        Ok(url)
    }

    fn collection_url(&self, project_id: &str) -> Result<Url, StoreError> {
        self.endpoint(project_id, None)
    }

    fn item_url(&self, project_id: &str, id: &str) -> Result<Url, StoreError> {
        self.endpoint(project_id, Some(id))
    }

    /// 非 2xx 响应转换为 [`StoreError::BadResponse`]
    async fn check_status(endpoint: &str, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error);
        Err(StoreError::BadResponse {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        endpoint: &str,
        response: Response,
    ) -> Result<T, StoreError> {
        response
            .json::<T>()
            .await
            .map_err(|source| StoreError::DecodeFailed {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

#[async_trait]
impl DatasetStore for HttpDatasetStore {
    fn kind(&self) -> &'static str {
        "http"
    }

    async fn get_by_id(&self, project_id: &str, id: &str) -> Result<Option<Dataset>, StoreError> {
        let url = self.item_url(project_id, id)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| StoreError::request_failed(url.as_str(), e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_status(url.as_str(), response).await?;
        Self::decode::<Option<Dataset>>(url.as_str(), response).await
    }

    async fn update(&self, dataset: Dataset) -> Result<Dataset, StoreError> {
        let url = self.item_url(&dataset.project_id, &dataset.id)?;
        debug!("PUT {}", url);

        let response = self
            .client
            .put(url.clone())
            .json(&dataset)
            .send()
            .await
            .map_err(|e| StoreError::request_failed(url.as_str(), e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(&dataset.id));
        }
        Self::check_status(url.as_str(), response).await?;
        Ok(dataset)
    }

    async fn list(
        &self,
        project_id: &str,
        query: &DatasetListQuery,
    ) -> Result<DatasetPage, StoreError> {
        let url = self.collection_url(project_id)?;
        let response = self
            .client
            .get(url.clone())
            .query(&query.to_query_pairs())
            .send()
            .await
            .map_err(|e| StoreError::request_failed(url.as_str(), e))?;

        let response = Self::check_status(url.as_str(), response).await?;
        Self::decode(url.as_str(), response).await
    }

    async fn list_ids(
        &self,
        project_id: &str,
        query: &DatasetListQuery,
    ) -> Result<Vec<String>, StoreError> {
        let url = self.collection_url(project_id)?;
        let query = DatasetListQuery {
            selected_all: Some(1),
            ..query.clone()
        };
        let response = self
            .client
            .get(url.clone())
            .query(&query.to_query_pairs())
            .send()
            .await
            .map_err(|e| StoreError::request_failed(url.as_str(), e))?;

        let response = Self::check_status(url.as_str(), response).await?;
        let rows: Vec<DatasetId> = Self::decode(url.as_str(), response).await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    async fn delete(&self, project_id: &str, id: &str) -> Result<(), StoreError> {
        let url = self.collection_url(project_id)?;
        debug!("DELETE {}?id={}", url, id);

        let response = self
            .client
            .delete(url.clone())
            .query(&[("id", id)])
            .send()
            .await
            .map_err(|e| StoreError::request_failed(url.as_str(), e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(id));
        }
        Self::check_status(url.as_str(), response).await?;
        Ok(())
    }
}

// ========== 内存实现 ==========

/// 进程内数据集存储，按插入顺序保存
#[derive(Default)]
pub struct MemoryDatasetStore {
    datasets: RwLock<Vec<Dataset>>,
}

impl MemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datasets(datasets: Vec<Dataset>) -> Self {
        Self {
            datasets: RwLock::new(datasets),
        }
    }

    /// 插入或覆盖一条记录
    pub async fn insert(&self, dataset: Dataset) {
        let mut datasets = self.datasets.write().await;
        match datasets
            .iter_mut()
            .find(|d| d.project_id == dataset.project_id && d.id == dataset.id)
        {
            Some(existing) => *existing = dataset,
            None => datasets.push(dataset),
        }
    }

    pub async fn len(&self) -> usize {
        self.datasets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.datasets.read().await.is_empty()
    }

    async fn filtered(&self, project_id: &str, query: &DatasetListQuery) -> Vec<Dataset> {
        self.datasets
            .read()
            .await
            .iter()
            .filter(|d| d.project_id == project_id && query.matches(d))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DatasetStore for MemoryDatasetStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn get_by_id(&self, project_id: &str, id: &str) -> Result<Option<Dataset>, StoreError> {
        Ok(self
            .datasets
            .read()
            .await
            .iter()
            .find(|d| d.project_id == project_id && d.id == id)
            .cloned())
    }

    async fn update(&self, dataset: Dataset) -> Result<Dataset, StoreError> {
        let mut datasets = self.datasets.write().await;
        let existing = datasets
            .iter_mut()
            .find(|d| d.project_id == dataset.project_id && d.id == dataset.id)
            .ok_or_else(|| StoreError::not_found(&dataset.id))?;
        *existing = dataset.clone();
        Ok(dataset)
    }

    async fn list(
        &self,
        project_id: &str,
        query: &DatasetListQuery,
    ) -> Result<DatasetPage, StoreError> {
        let filtered = self.filtered(project_id, query).await;
        let total = filtered.len();
        let confirmed_count = filtered.iter().filter(|d| d.confirmed).count();

        let size = query.size.max(1) as usize;
        let skip = (query.page.max(1) as usize - 1) * size;
        let data = filtered.into_iter().skip(skip).take(size).collect();

        Ok(DatasetPage {
            data,
            total,
            confirmed_count,
        })
    }

    async fn list_ids(
        &self,
        project_id: &str,
        query: &DatasetListQuery,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self
            .filtered(project_id, query)
            .await
            .into_iter()
            .map(|d| d.id)
            .collect())
    }

    async fn delete(&self, project_id: &str, id: &str) -> Result<(), StoreError> {
        let mut datasets = self.datasets.write().await;
        let position = datasets
            .iter()
            .position(|d| d.project_id == project_id && d.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;
        datasets.remove(position);
        Ok(())
    }
}
