//! 有界并发批处理器 - 编排层
//!
//! ## 职责
//!
//! 给定一组任务项、一个异步动作和并发上限，按输入顺序启动任务，
//! 任意时刻最多 `concurrency` 个动作处于未完成状态；每有一个动作结束
//! （成功或失败），立即调用进度回调并启动下一项。
//!
//! ## 调度模型
//!
//! 所有动作都在调用方所在的任务内通过 `FuturesUnordered` 轮询，
//! 属于单线程协作式并发，不会 `tokio::spawn`，因此动作不需要 `Send`。
//!
//! ## 错误策略：全部结束后再失败
//!
//! 第一个失败出现后，不会中止剩余任务：已启动的动作继续运行，
//! 未启动的任务项照常启动，每一项结束时都会回调进度。
//! 全部结束后，返回按结束顺序的第一个错误（[`BatchError::ItemFailed`]）。
//!
//! 进度回调如果 panic，panic 会直接穿过 `run`，整个批次中止。

use futures::stream::{FuturesUnordered, StreamExt};
use std::convert::Infallible;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

/// 批处理错误
#[derive(Debug, Error)]
pub enum BatchError<E> {
    /// 并发数必须至少为 1
    #[error("并发数必须大于 0 (当前: {concurrency})")]
    InvalidConcurrency { concurrency: usize },
    /// 有任务项失败（所有任务结束后才返回）
    #[error("批处理第 {index} 项失败 (共失败 {failed} 项): {source}")]
    ItemFailed {
        /// 第一个失败项在输入中的下标
        index: usize,
        /// 失败总数
        failed: usize,
        #[source]
        source: E,
    },
}

impl<E> BatchError<E> {
    /// 失败项的下标（参数错误时为 `None`）
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            BatchError::ItemFailed { index, .. } => Some(*index),
            BatchError::InvalidConcurrency { .. } => None,
        }
    }
}

/// 一次成功批处理的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub completed: usize,
}

/// 有界并发批处理器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRunner {
    concurrency: usize,
}

impl BatchRunner {
    /// 创建批处理器，`concurrency` 为 0 时返回参数错误
    pub fn new(concurrency: usize) -> Result<Self, BatchError<Infallible>> {
        if concurrency == 0 {
            return Err(BatchError::InvalidConcurrency { concurrency });
        }
        Ok(Self { concurrency })
    }

    /// 运行一批任务
    ///
    /// # 参数
    /// - `items`: 任务项，按顺序启动
    /// - `action`: 对单个任务项执行的异步动作
    /// - `on_progress`: 每个任务项结束后调用一次，参数为 `(已结束数量, 总数)`
    ///
    /// # 返回
    /// 全部成功时返回 [`BatchReport`]；有任务失败时，等所有任务结束后
    /// 返回第一个失败的错误
    pub async fn run<I, T, E, F, Fut, P>(
        &self,
        items: I,
        mut action: F,
        mut on_progress: P,
    ) -> Result<BatchReport, BatchError<E>>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        P: FnMut(usize, usize),
    {
        let items: Vec<T> = items.into_iter().collect();
        let total = items.len();
        if total == 0 {
            return Ok(BatchReport {
                total: 0,
                completed: 0,
            });
        }

        debug!("批处理开始: 共 {} 项, 并发 {}", total, self.concurrency);

        let mut pending = items.into_iter().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut completed = 0;
        let mut failed = 0;
        let mut first_error: Option<(usize, E)> = None;

        loop {
            // 补满并发槽位，按输入顺序启动
            while in_flight.len() < self.concurrency {
                let Some((index, item)) = pending.next() else {
                    break;
                };
                let fut = action(item);
                in_flight.push(async move { (index, fut.await) });
            }

            let Some((index, result)) = in_flight.next().await else {
                break;
            };
            completed += 1;

            if let Err(e) = result {
                failed += 1;
                warn!("批处理第 {} 项失败", index);
                if first_error.is_none() {
                    first_error = Some((index, e));
                }
            }

            on_progress(completed, total);
        }

        debug!("批处理结束: 完成 {}/{}, 失败 {}", completed, total, failed);

        match first_error {
            Some((index, source)) => Err(BatchError::ItemFailed {
                index,
                failed,
                source,
            }),
            None => Ok(BatchReport { total, completed }),
        }
    }
}

/// 一次性运行批处理，等价于 `BatchRunner::new(concurrency)?.run(...)`
pub async fn process_in_parallel<I, T, E, F, Fut, P>(
    items: I,
    action: F,
    concurrency: usize,
    on_progress: P,
) -> Result<BatchReport, BatchError<E>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    P: FnMut(usize, usize),
{
    let runner = match BatchRunner::new(concurrency) {
        Ok(runner) => runner,
        Err(BatchError::InvalidConcurrency { concurrency }) => {
            return Err(BatchError::InvalidConcurrency { concurrency });
        }
        Err(BatchError::ItemFailed { source, .. }) => match source {},
    };
    runner.run(items, action, on_progress).await
}
