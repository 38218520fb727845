//! # 诊断日志
//!
//! 初始化 `tracing` 订阅者，日志写入 stderr，不干扰 stdout 上的结果输出。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber` crate

use crate::error::{Result, SaneError};

use tracing_subscriber::EnvFilter;

/// 解析日志级别或过滤指令，例如 `warn` 或 `sanefile=debug`
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level.trim()).map_err(|e| {
        SaneError::InvalidArgument(format!("invalid log level '{}': {}", level, e))
    })
}

/// 安装全局订阅者
pub fn init_logging(level: &str) -> Result<()> {
    let filter = build_filter(level)?;

    // 测试中可能已经安装过订阅者，忽略重复安装
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_levels() {
        for level in ["error", "warn", "info", "debug", "trace", "sanefile=debug"] {
            assert!(build_filter(level).is_ok(), "level {}", level);
        }
    }
}
