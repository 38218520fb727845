//! # 重命名结果与批次统计
//!
//! `RenameOutcome` 由执行器产生，创建后不再修改；
//! `BatchSummary` 由调度器逐条累加，批次结束时定稿一次。
//!
//! ## 依赖关系
//! - 被 `rename/executor.rs` 产生
//! - 被 `batch/scheduler.rs` 汇总
//! - 被 `utils/progress.rs`, `commands/rename.rs` 展示

use std::path::{Path, PathBuf};
use std::time::Duration;

/// 单个文件的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// 已重命名（或在 dry-run 中将被重命名）
    Renamed,
    /// 清洗后名称未变
    SkippedUnchanged,
    /// 任务开始前收到取消信号
    SkippedCancelled,
    /// 失败
    Failed,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeStatus::Renamed => write!(f, "renamed"),
            OutcomeStatus::SkippedUnchanged => write!(f, "skipped-unchanged"),
            OutcomeStatus::SkippedCancelled => write!(f, "skipped-cancelled"),
            OutcomeStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    status: OutcomeStatus,
    reason: Option<String>,
    target: Option<PathBuf>,
    backup: Option<PathBuf>,
}

impl RenameOutcome {
    pub fn renamed(target: impl Into<PathBuf>) -> Self {
        RenameOutcome {
            status: OutcomeStatus::Renamed,
            reason: None,
            target: Some(target.into()),
            backup: None,
        }
    }

    pub fn unchanged() -> Self {
        RenameOutcome {
            status: OutcomeStatus::SkippedUnchanged,
            reason: None,
            target: None,
            backup: None,
        }
    }

    pub fn cancelled() -> Self {
        RenameOutcome {
            status: OutcomeStatus::SkippedCancelled,
            reason: Some("batch cancelled before the task started".to_string()),
            target: None,
            backup: None,
        }
    }

    pub fn failed(reason: impl Into<String>, target: Option<PathBuf>) -> Self {
        RenameOutcome {
            status: OutcomeStatus::Failed,
            reason: Some(reason.into()),
            target,
            backup: None,
        }
    }

    /// 备份成功但移动到目标失败：文件留在备份路径
    pub fn stranded(reason: impl Into<String>, target: PathBuf, backup: PathBuf) -> Self {
        RenameOutcome {
            status: OutcomeStatus::Failed,
            reason: Some(format!(
                "{}; file left at backup path {}",
                reason.into(),
                backup.display()
            )),
            target: Some(target),
            backup: Some(backup),
        }
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// 解析后的目标路径
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// 文件当前所在的备份路径（仅部分失败时存在）
    pub fn backup(&self) -> Option<&Path> {
        self.backup.as_deref()
    }
}

/// 每个文件完成时发出的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// 原始路径
    pub path: PathBuf,
    pub outcome: RenameOutcome,
}

impl FileEvent {
    pub fn new(path: impl Into<PathBuf>, outcome: RenameOutcome) -> Self {
        FileEvent {
            path: path.into(),
            outcome,
        }
    }

    /// 目标文件名（若有）
    pub fn target_name(&self) -> Option<String> {
        self.outcome
            .target()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// 批次状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    /// 扫描并分发任务
    Dispatching,
    /// 等待已提交任务全部完成
    Draining,
    Completed,
    Cancelled,
}

impl BatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchState::Completed | BatchState::Cancelled)
    }
}

impl std::fmt::Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchState::Idle => write!(f, "idle"),
            BatchState::Dispatching => write!(f, "dispatching"),
            BatchState::Draining => write!(f, "draining"),
            BatchState::Completed => write!(f, "completed"),
            BatchState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// 失败详情
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub path: PathBuf,
    pub reason: String,
    pub backup: Option<PathBuf>,
}

/// 批次统计
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub root: PathBuf,
    pub dry_run: bool,
    /// 已提交处理的文件数
    pub scanned: usize,
    pub renamed: usize,
    pub unchanged: usize,
    pub cancelled: usize,
    pub failed: usize,
    /// 扫描时跳过的不可读目录数
    pub scan_errors: u64,
    pub elapsed: Duration,
    pub state: BatchState,
    pub failures: Vec<FailureRecord>,
}

impl BatchSummary {
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        BatchSummary {
            root: root.into(),
            dry_run,
            scanned: 0,
            renamed: 0,
            unchanged: 0,
            cancelled: 0,
            failed: 0,
            scan_errors: 0,
            elapsed: Duration::ZERO,
            state: BatchState::Idle,
            failures: Vec::new(),
        }
    }

    /// 合并单个文件结果
    pub fn merge(&mut self, event: &FileEvent) {
        match event.outcome.status() {
            OutcomeStatus::Renamed => self.renamed += 1,
            OutcomeStatus::SkippedUnchanged => self.unchanged += 1,
            OutcomeStatus::SkippedCancelled => self.cancelled += 1,
            OutcomeStatus::Failed => {
                self.failed += 1;
                self.failures.push(FailureRecord {
                    path: event.path.clone(),
                    reason: event.outcome.reason().unwrap_or("unknown error").to_string(),
                    backup: event.outcome.backup().map(Path::to_path_buf),
                });
            }
        }
    }

    /// 停留在备份路径上的失败文件数
    pub fn stranded(&self) -> usize {
        self.failures.iter().filter(|f| f.backup.is_some()).count()
    }

    /// 已汇总的结果数量
    pub fn processed(&self) -> usize {
        self.renamed + self.unchanged + self.cancelled + self.failed
    }

    /// 定稿：记录耗时与终态
    pub fn finalize(&mut self, elapsed: Duration, state: BatchState) {
        debug_assert!(state.is_terminal());
        self.elapsed = elapsed;
        self.state = state;
    }
}
