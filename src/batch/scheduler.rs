//! # 批次调度器
//!
//! 驱动一个批次（一个根目录）的完整流程：
//! `Idle → Dispatching → Draining → Completed | Cancelled`。
//!
//! ## 功能
//! - 基于 rayon 的固定大小工作线程池
//! - 每个条目一个任务：清洗 → 冲突解析 → 提交
//! - 结果经 crossbeam 通道回传，实时汇总并转发给报告者
//! - 在途任务数有上限，达到上限时等待结果
//! - 每次提交前检查取消信号；已提交任务总会执行完毕
//!
//! ## 依赖关系
//! - 被 `commands/rename.rs` 调用
//! - 使用 `batch/scanner.rs` 获取条目
//! - 使用 `rename/` 处理单个文件
//! - 使用 `rayon`, `crossbeam-channel`, `num_cpus`

use crate::batch::context::RunContext;
use crate::batch::reporter::Reporter;
use crate::batch::scanner::Scanner;
use crate::error::Result;
use crate::models::{
    BatchState, BatchSummary, FileEntry, FileEvent, OutcomeStatus, RenameOutcome, RenameTask,
};
use crate::rename::{executor, sanitize};

use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// 每个工作线程允许的在途任务数
pub const IN_FLIGHT_PER_WORKER: usize = 4;

/// 批次调度器
pub struct BatchScheduler {
    /// 并行作业数
    jobs: usize,
}

impl BatchScheduler {
    /// 创建新的调度器，`jobs` 为 0 时使用可用并行度
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 扫描目录并处理整个批次
    ///
    /// 根目录无效时在任何任务开始前返回错误。
    /// 返回的统计包含扫描时跳过的目录数。
    pub fn run_directory(
        &self,
        scanner: &Scanner,
        ctx: &RunContext,
        reporter: &dyn Reporter,
    ) -> Result<BatchSummary> {
        let mut entries = scanner.scan(&ctx.cancel, reporter)?;
        let root = entries.root().to_path_buf();
        let mut summary = self.run(&root, entries.by_ref(), ctx, reporter)?;
        summary.scan_errors = entries.errors();
        Ok(summary)
    }

    /// 并行处理条目流
    pub fn run<I>(
        &self,
        root: &Path,
        entries: I,
        ctx: &RunContext,
        reporter: &dyn Reporter,
    ) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = FileEntry>,
    {
        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("sanefile-worker-{}", i))
            .build()?;

        let start = Instant::now();
        let mut summary = BatchSummary::new(root, ctx.dry_run);
        let max_in_flight = self.jobs * IN_FLIGHT_PER_WORKER;

        info!(
            "starting batch in {} with {} workers (dry run: {}, backup: {})",
            root.display(),
            self.jobs,
            ctx.dry_run,
            ctx.backup
        );
        reporter.batch_started(root, ctx.dry_run);
        reporter.state_changed(BatchState::Dispatching);

        let (tx, rx) = crossbeam_channel::unbounded::<FileEvent>();

        let cancelled = pool.in_place_scope(|scope| {
            let mut in_flight: usize = 0;
            let mut entries = entries.into_iter();

            loop {
                if ctx.is_cancelled() {
                    info!("cancellation requested, no further tasks will be submitted");
                    break;
                }
                let Some(entry) = entries.next() else {
                    break;
                };

                while in_flight >= max_in_flight {
                    match rx.recv() {
                        Ok(event) => {
                            in_flight -= 1;
                            record(&mut summary, reporter, event);
                        }
                        Err(_) => break,
                    }
                }

                summary.scanned += 1;
                in_flight += 1;
                let task = RenameTask::new(entry, ctx.dry_run, ctx.backup);
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let event = process_task(ctx, task);
                    // 接收端只在全部结果收齐后才关闭
                    let _ = tx.send(event);
                });

                for event in rx.try_iter() {
                    in_flight -= 1;
                    record(&mut summary, reporter, event);
                }
            }

            reporter.state_changed(BatchState::Draining);
            drop(tx);
            for event in rx.iter() {
                record(&mut summary, reporter, event);
            }

            ctx.is_cancelled()
        });

        let state = if cancelled {
            BatchState::Cancelled
        } else {
            BatchState::Completed
        };
        summary.finalize(start.elapsed(), state);

        info!(
            "batch {}: {} scanned, {} renamed, {} unchanged, {} cancelled, {} failed in {:.2?}",
            state,
            summary.scanned,
            summary.renamed,
            summary.unchanged,
            summary.cancelled,
            summary.failed,
            summary.elapsed
        );
        debug!("{} paths still reserved", ctx.resolver.reserved_count());
        reporter.state_changed(state);
        reporter.batch_finished(&summary);

        Ok(summary)
    }
}

/// 合并单个结果并通知报告者
fn record(summary: &mut BatchSummary, reporter: &dyn Reporter, event: FileEvent) {
    summary.merge(&event);
    reporter.file_processed(&event);
}

/// 处理单个文件：清洗 → 冲突解析 → 提交
pub fn process_task(ctx: &RunContext, task: RenameTask) -> FileEvent {
    let source = task.entry.path.clone();

    if ctx.is_cancelled() {
        return FileEvent::new(source, RenameOutcome::cancelled());
    }

    let sanitized = sanitize(&task.entry.name, &ctx.policy);
    if sanitized == task.entry.name {
        debug!("unchanged: {}", source.display());
        return FileEvent::new(source, RenameOutcome::unchanged());
    }

    let desired = task.entry.parent().join(&sanitized);
    let reservation = ctx.resolver.reserve(&desired);
    let outcome = executor::execute(&task, reservation.path(), &ctx.resolver);

    // 成功时目标已被占用（dry-run 中视为已占用）；失败时释放预留
    if outcome.status() == OutcomeStatus::Renamed {
        reservation.commit();
    }

    FileEvent::new(source, outcome)
}
