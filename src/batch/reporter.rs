//! # 批次事件报告接口
//!
//! 核心只依赖 [`Reporter`] trait，不依赖具体的终端渲染库。
//! 所有方法都有空的默认实现，[`NoopReporter`] 即为默认实现。
//!
//! ## 依赖关系
//! - 被 `batch/scanner.rs`, `batch/scheduler.rs` 调用
//! - 终端实现见 `utils/progress.rs`

use crate::models::{BatchState, BatchSummary, FileEvent};

use std::path::Path;

/// 批次事件接收者
pub trait Reporter: Sync {
    /// 批次开始
    fn batch_started(&self, _root: &Path, _dry_run: bool) {}

    /// 批次状态变化
    fn state_changed(&self, _state: BatchState) {}

    /// 单个文件处理完成
    fn file_processed(&self, _event: &FileEvent) {}

    /// 目录无法读取（已跳过）
    fn scan_error(&self, _path: Option<&Path>, _message: &str) {}

    /// 批次结束，只调用一次
    fn batch_finished(&self, _summary: &BatchSummary) {}
}

/// 不输出任何内容的报告者
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}
