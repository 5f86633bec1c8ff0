/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 debug / info。
/// 重复调用不会报错（测试中会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> io::Result<()> {
    let log_header = format!(
        "{}\n数据集管理服务日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
}

/// 记录程序启动信息
pub fn log_startup(bind_address: &str, store_kind: &str, concurrency: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 数据集管理服务启动");
    info!("🌐 监听地址: {}", bind_address);
    info!("🗄️ 数据集存储: {}", store_kind);
    info!("📊 批量删除并发数: {}", concurrency);
    info!("{}", "=".repeat(60));
}

/// 记录批量任务开始信息
///
/// # 参数
/// - `project_id`: 项目ID
/// - `total`: 任务总数
/// - `concurrency`: 最大并发数
pub fn log_batch_start(project_id: &str, total: usize, concurrency: usize) {
    info!("{}", "─".repeat(60));
    info!("📦 [项目 {}] 开始批量删除 {} 条数据集", project_id, total);
    info!("📋 最大并发数: {}", concurrency);
}

/// 记录批量任务进度
pub fn log_batch_progress(project_id: &str, completed: usize, total: usize, percentage: u8) {
    info!(
        "⏳ [项目 {}] 进度 {}/{} ({}%)",
        project_id, completed, total, percentage
    );
}

/// 记录批量任务完成信息
///
/// # 参数
/// - `project_id`: 项目ID
/// - `completed`: 已完成数量
/// - `failed`: 失败数量
pub fn log_batch_complete(project_id: &str, completed: usize, failed: usize) {
    info!(
        "✓ [项目 {}] 批量删除结束: 完成 {} 条, 失败 {} 条",
        project_id, completed, failed
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("你好世界", 2), "你好...");
        assert_eq!(truncate_text("abc", 3), "abc");
        assert_eq!(truncate_text("", 5), "");
    }

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }
}
