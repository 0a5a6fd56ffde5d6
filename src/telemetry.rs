//! 日志初始化

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// 安装全局 fmt 日志订阅者
///
/// `RUST_LOG` 优先于 `default_filter`。重复调用不会报错，返回是否由本次调用完成安装。
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .is_ok()
}
