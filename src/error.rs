//! # 统一错误处理模块
//!
//! 定义 sanefile 的致命错误类型，使用 `thiserror` 派生。
//!
//! 单个文件的失败不走这里：它们是 `RenameOutcome::failed` 值，
//! 只会计入批次统计，不会中断批次。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// sanefile 统一错误类型
#[derive(Error, Debug)]
pub enum SaneError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid or inaccessible directory: {path}")]
    InvalidRoot {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid sanitization policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 运行时错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to start worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SaneError>;
