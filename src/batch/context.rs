//! # 运行上下文
//!
//! 一次批次运行共享的只读配置与并发状态，显式传递给扫描器、调度器和执行器。
//!
//! ## 依赖关系
//! - 被 `batch/scanner.rs`, `batch/scheduler.rs` 使用
//! - 被 `commands/rename.rs` 构建

use crate::models::SanitizationPolicy;
use crate::rename::CollisionResolver;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 协作式取消令牌
///
/// 克隆共享同一标志；设置后不可撤销。
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// 是否已请求取消
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// 批次运行上下文
#[derive(Debug)]
pub struct RunContext {
    pub policy: SanitizationPolicy,
    pub resolver: CollisionResolver,
    pub cancel: CancelToken,
    pub dry_run: bool,
    pub backup: bool,
}

impl RunContext {
    pub fn new(policy: SanitizationPolicy, cancel: CancelToken) -> Self {
        RunContext {
            resolver: CollisionResolver::with_max_length(policy.max_length()),
            policy,
            cancel,
            dry_run: false,
            backup: false,
        }
    }

    /// 设置 dry-run 模式
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 设置备份模式
    pub fn backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
