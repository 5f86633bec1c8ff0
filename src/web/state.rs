//! # Web API 共享状态

use std::sync::Arc;

use crate::services::{DatasetStore, LanguageModel};
use crate::workflow::AnswerOptimizer;

/// 所有 handler 共享的状态
pub struct AppState {
    pub store: Arc<dyn DatasetStore>,
    pub optimizer: AnswerOptimizer,
    /// 批量删除的最大并发数
    pub batch_delete_concurrency: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DatasetStore>,
        llm: Arc<dyn LanguageModel>,
        batch_delete_concurrency: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            optimizer: AnswerOptimizer::new(store.clone(), llm),
            store,
            batch_delete_concurrency,
        })
    }
}
