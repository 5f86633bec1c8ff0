//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量任务的调度和进度统计，不做具体业务判断。
//!
//! ## 模块划分
//!
//! ### `batch_runner` - 有界并发批处理器
//! - 按输入顺序启动任务，最多 N 个同时执行
//! - 每个任务结束后回调进度
//! - 失败后继续跑完剩余任务，再返回第一个错误
//!
//! ### `batch_delete` - 批量删除
//! - 每个数据集 ID 发起一次删除
//! - 维护 `BatchProgress`（total / completed / percentage）
//!
//! ## 层次关系
//!
//! ```text
//! web handlers
//!     ↓
//! batch_delete (处理 Vec<DatasetId>)
//!     ↓
//! batch_runner (通用的有界并发)
//!     ↓
//! services (能力层：DatasetStore)
//! ```

pub mod batch_delete;
pub mod batch_runner;

pub use batch_delete::{batch_delete, BatchDeleteError, DEFAULT_DELETE_CONCURRENCY};
pub use batch_runner::{process_in_parallel, BatchError, BatchReport, BatchRunner};
