//! # rename 命令实现
//!
//! 扫描目录，并行清洗并重命名文件，最后打印统计表。
//!
//! ## 功能
//! - Ctrl-C 触发协作式取消，已提交的任务会执行完毕
//! - 预演模式只报告计划，不修改文件系统
//! - 失败列表最多显示前 10 条
//!
//! ## 依赖关系
//! - 使用 `cli/rename.rs` 定义的参数
//! - 使用 `batch/` 调度批次
//! - 使用 `utils/progress.rs` 的 `ConsoleReporter`

use super::CommandStatus;
use crate::batch::{BatchScheduler, CancelToken, RunContext, Scanner};
use crate::cli::rename::RenameArgs;
use crate::error::Result;
use crate::models::outcome::FailureRecord;
use crate::models::{BatchState, BatchSummary};
use crate::utils::output;
use crate::utils::progress::ConsoleReporter;

use tabled::{Table, Tabled};
use tracing::warn;

/// 失败列表最多显示的条数
const MAX_LISTED_FAILURES: usize = 10;

/// 统计表格行
#[derive(Debug, Clone, Tabled)]
struct StatRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// 执行批量重命名
pub fn execute(args: RenameArgs) -> Result<CommandStatus> {
    let policy = args.policy.build_policy()?;

    output::print_header("Filename Sanitization");

    let scanner = Scanner::new(args.directory.clone())
        .recursive(args.recursive)
        .extensions(args.file_types.iter().cloned())
        .case_insensitive(!args.case_sensitive)
        .include_hidden(args.include_hidden);

    let cancel = CancelToken::new();
    install_interrupt_handler(&cancel);

    let ctx = RunContext::new(policy, cancel)
        .dry_run(args.dry_run)
        .backup(args.backup);
    let scheduler = BatchScheduler::new(args.threads);

    output::print_info(&format!(
        "Directory '{}'{}",
        args.directory.display(),
        if args.recursive { " (recursive)" } else { "" }
    ));
    if !args.file_types.is_empty() {
        output::print_info(&format!("File types: {}", args.file_types.join(", ")));
    }
    output::print_info(&format!("Using {} worker threads", scheduler.jobs()));
    if args.dry_run {
        output::print_warning("Dry run: no files will be renamed");
    }

    let reporter = ConsoleReporter::new(args.quiet);
    let summary = scheduler.run_directory(&scanner, &ctx, &reporter)?;
    drop(reporter);

    print_summary(&summary);
    Ok(status_of(&summary))
}

/// Ctrl-C 只设置取消标志
fn install_interrupt_handler(cancel: &CancelToken) {
    let token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!("failed to install Ctrl-C handler: {}", e);
    }
}

fn status_of(summary: &BatchSummary) -> CommandStatus {
    if summary.state == BatchState::Cancelled {
        CommandStatus::Cancelled
    } else if summary.failed > 0 {
        CommandStatus::Failures
    } else {
        CommandStatus::Success
    }
}

fn summary_rows(summary: &BatchSummary) -> Vec<StatRow> {
    let renamed_label = if summary.dry_run {
        "Would rename"
    } else {
        "Renamed"
    };
    vec![
        StatRow {
            item: "Root",
            value: summary.root.display().to_string(),
        },
        StatRow {
            item: "Scanned",
            value: summary.scanned.to_string(),
        },
        StatRow {
            item: "Processed",
            value: summary.processed().to_string(),
        },
        StatRow {
            item: renamed_label,
            value: summary.renamed.to_string(),
        },
        StatRow {
            item: "Unchanged",
            value: summary.unchanged.to_string(),
        },
        StatRow {
            item: "Cancelled",
            value: summary.cancelled.to_string(),
        },
        StatRow {
            item: "Failed",
            value: summary.failed.to_string(),
        },
        StatRow {
            item: "Left at backup path",
            value: summary.stranded().to_string(),
        },
        StatRow {
            item: "Scan errors",
            value: summary.scan_errors.to_string(),
        },
        StatRow {
            item: "State",
            value: summary.state.to_string(),
        },
        StatRow {
            item: "Elapsed",
            value: format!("{:.2}s", summary.elapsed.as_secs_f64()),
        },
    ]
}

/// 失败列表中的一行；备份位置已包含在失败原因中
fn failure_line(failure: &FailureRecord) -> String {
    format!("  {}: {}", failure.path.display(), failure.reason)
}

fn print_summary(summary: &BatchSummary) {
    output::print_separator();
    println!("{}", Table::new(summary_rows(summary)));

    if !summary.failures.is_empty() {
        output::print_warning("Failed files:");
        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            output::print_error(&failure_line(failure));
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            output::print_warning(&format!(
                "  ... and {} more",
                summary.failures.len() - MAX_LISTED_FAILURES
            ));
        }
    }

    let msg = format!(
        "Batch {}: {} renamed, {} unchanged, {} failed",
        summary.state, summary.renamed, summary.unchanged, summary.failed
    );
    match summary.state {
        BatchState::Cancelled => output::print_warning(&msg),
        _ => output::print_done(&msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileEvent, RenameOutcome};
    use std::path::PathBuf;
    use std::time::Duration;

    fn summary_with(events: &[FileEvent], state: BatchState) -> BatchSummary {
        let mut summary = BatchSummary::new("/data", false);
        for event in events {
            summary.scanned += 1;
            summary.merge(event);
        }
        summary.finalize(Duration::from_millis(5), state);
        summary
    }

    #[test]
    fn test_status_of_clean_batch() {
        let summary = summary_with(
            &[FileEvent::new("/data/a b", RenameOutcome::renamed("/data/a_b"))],
            BatchState::Completed,
        );
        assert_eq!(status_of(&summary), CommandStatus::Success);
    }

    #[test]
    fn test_status_of_failed_batch() {
        let summary = summary_with(
            &[FileEvent::new("/data/a b", RenameOutcome::failed("permission denied", None))],
            BatchState::Completed,
        );
        assert_eq!(status_of(&summary), CommandStatus::Failures);
        assert_eq!(status_of(&summary).exit_code(), 2);
    }

    #[test]
    fn test_status_cancel_wins_over_failures() {
        let summary = summary_with(
            &[
                FileEvent::new("/data/a b", RenameOutcome::failed("collision", None)),
                FileEvent::new("/data/c d", RenameOutcome::cancelled()),
            ],
            BatchState::Cancelled,
        );
        assert_eq!(status_of(&summary), CommandStatus::Cancelled);
        assert_eq!(status_of(&summary).exit_code(), 130);
    }

    #[test]
    fn test_failure_line_names_backup_once() {
        let summary = summary_with(
            &[FileEvent::new(
                "/data/a b.txt",
                RenameOutcome::stranded(
                    "target already exists",
                    PathBuf::from("/data/a_b.txt"),
                    PathBuf::from("/data/a b.txt.bak"),
                ),
            )],
            BatchState::Completed,
        );
        assert_eq!(summary.stranded(), 1);
        let line = failure_line(&summary.failures[0]);
        assert!(line.contains("target already exists"));
        assert_eq!(line.matches("a b.txt.bak").count(), 1);
    }

    #[test]
    fn test_summary_rows_dry_run_label() {
        let mut summary = BatchSummary::new("/data", true);
        summary.finalize(Duration::ZERO, BatchState::Completed);
        let rows = summary_rows(&summary);
        assert!(rows.iter().any(|r| r.item == "Would rename"));
        assert!(rows.iter().any(|r| r.item == "State" && r.value == "completed"));
    }
}
