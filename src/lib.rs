//! # Dataset Curator
//!
//! 问答数据集的管理服务：列表、删除、批量删除、用 LLM 按建议优化答案
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条数据集
//! - `DatasetStore` - 数据集读写删（HTTP / 内存）
//! - `LanguageModel` - LLM 补全能力
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一条数据集"的完整处理流程
//! - `AnswerOptimizer` - 校验 → 读取 → 提示词 → LLM → 解析 → 写回
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_runner` - 有界并发批处理器，带进度回调
//! - `orchestrator/batch_delete` - 批量删除，维护 `BatchProgress`
//!
//! ### ④ 接口层（Web）
//! - `web/` - axum 路由、参数提取、错误映射
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod services;
pub mod utils;
pub mod web;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{BatchProgress, Dataset, DatasetListQuery, DatasetPage};
pub use orchestrator::{batch_delete, process_in_parallel, BatchError, BatchRunner};
pub use services::{DatasetStore, HttpDatasetStore, LanguageModel, LlmService, MemoryDatasetStore};
pub use web::create_app;
pub use workflow::{AnswerOptimizer, OptimizeError, OptimizeRequest};
