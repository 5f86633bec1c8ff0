//! 集成测试共用的测试服务和假模型
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use dataset_curator::error::LlmError;
use dataset_curator::web::{create_app, AppState};
use dataset_curator::{Dataset, LanguageModel, MemoryDatasetStore};

/// 固定返回同一段输出的模型
pub struct CannedModel {
    output: Result<String, ()>,
}

#[async_trait]
impl LanguageModel for CannedModel {
    async fn complete(&self, model: &str, _prompt: &str) -> Result<String, LlmError> {
        self.output.clone().map_err(|_| LlmError::EmptyContent {
            model: model.to_string(),
        })
    }
}

pub fn dataset(id: &str, confirmed: bool) -> Dataset {
    Dataset {
        id: id.to_string(),
        project_id: "p1".to_string(),
        question: format!("什么是 {}？", id),
        answer: format!("{} 的旧答案", id),
        cot: Some("旧的思考过程".to_string()),
        question_label: None,
        chunk_name: None,
        model: None,
        confirmed,
        create_at: None,
    }
}

/// 在随机端口上运行的测试服务
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub store: Arc<MemoryDatasetStore>,
    handle: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

impl TestServer {
    /// 用 d1（已确认）、d2、d3 三条数据启动完整服务
    pub async fn start(output: Result<&str, ()>) -> Self {
        let store = Arc::new(MemoryDatasetStore::with_datasets(vec![
            dataset("d1", true),
            dataset("d2", false),
            dataset("d3", false),
        ]));
        let llm = Arc::new(CannedModel {
            output: output.map(str::to_string),
        });
        let app = create_app(AppState::new(store.clone(), llm, 2));
        Self::serve(app, store).await
    }

    /// 启动任意路由
    pub async fn serve(app: Router, store: Arc<MemoryDatasetStore>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("测试服务启动失败");
        });

        Self {
            base_url,
            client: Client::new(),
            store,
            handle,
            shutdown_tx,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.unwrap();
        let status = response.status();
        let text = response.text().await.unwrap();
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };
        (status, value)
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .unwrap()
            .unwrap();
    }
}
