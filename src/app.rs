use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::services::{DatasetStore, HttpDatasetStore, LanguageModel, LlmService, MemoryDatasetStore};
use crate::utils::logging::{init_log_file, log_startup};
use crate::web::{create_app, AppState};

/// 应用主结构
pub struct App {
    config: Config,
    state: Arc<AppState>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        let store = build_store(&config)?;
        let llm: Arc<dyn LanguageModel> = Arc::new(LlmService::new(&config));

        log_startup(
            &config.bind_address,
            store.kind(),
            config.batch_delete_concurrency,
        );

        let state = AppState::new(store, llm, config.batch_delete_concurrency);
        Ok(Self { config, state })
    }

    /// 启动 HTTP 服务，收到 Ctrl-C 后优雅退出
    pub async fn run(self) -> AppResult<()> {
        let listener = TcpListener::bind(&self.config.bind_address).await?;
        info!("✅ 服务已就绪: http://{}", listener.local_addr()?);

        axum::serve(listener, create_app(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("👋 服务已停止");
        Ok(())
    }
}

fn build_store(config: &Config) -> AppResult<Arc<dyn DatasetStore>> {
    if config.uses_memory_store() {
        warn!("⚠️ 未配置 DATASETS_API_BASE_URL，使用内存存储（重启后数据丢失）");
        return Ok(Arc::new(MemoryDatasetStore::new()));
    }
    let store = HttpDatasetStore::new(config.datasets_api_base_url.trim())?;
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("⚠️ 监听 Ctrl-C 失败: {}", e);
        return;
    }
    info!("🛑 收到退出信号，等待进行中的请求结束");
}
