//! # 进度显示
//!
//! 封装 `indicatif` spinner，并提供终端版的 [`Reporter`] 实现。
//! spinner 运行期间的所有输出都经由 `ProgressBar::suspend`，避免与进度行交错。
//!
//! ## 依赖关系
//! - 被 `commands/rename.rs` 使用
//! - 实现 `batch/reporter.rs` 的 `Reporter`
//! - 使用 `indicatif` crate

use crate::batch::Reporter;
use crate::models::{BatchState, BatchSummary, FileEvent, OutcomeStatus};
use crate::utils::output;

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 创建 spinner（用于不确定进度的任务）
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {elapsed_precise} [{pos}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// 终端报告者
///
/// 失败和扫描错误总会打印；`quiet` 时不打印成功和跳过的文件。
pub struct ConsoleReporter {
    spinner: ProgressBar,
    quiet: bool,
    dry_run: AtomicBool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            spinner: create_spinner("Scanning..."),
            quiet,
            dry_run: AtomicBool::new(false),
        }
    }

    /// 在 spinner 之上打印一行
    fn line<F: FnOnce()>(&self, f: F) {
        self.spinner.suspend(f);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 失败行；备份位置已包含在失败原因中
fn failure_message(from: &str, event: &FileEvent) -> String {
    format!(
        "{}: {}",
        from,
        event.outcome.reason().unwrap_or("unknown error")
    )
}

impl Reporter for ConsoleReporter {
    fn batch_started(&self, root: &Path, dry_run: bool) {
        self.dry_run.store(dry_run, Ordering::Relaxed);
        let mode = if dry_run { " (dry run)" } else { "" };
        self.spinner
            .set_message(format!("Processing '{}'{}", root.display(), mode));
    }

    fn state_changed(&self, state: BatchState) {
        match state {
            BatchState::Draining => self
                .spinner
                .set_message("Waiting for in-flight tasks...".to_string()),
            BatchState::Cancelled => self.line(|| {
                output::print_warning("Cancelled: queued files were not processed")
            }),
            _ => {}
        }
    }

    fn file_processed(&self, event: &FileEvent) {
        self.spinner.inc(1);

        let from = display_name(&event.path);
        match event.outcome.status() {
            OutcomeStatus::Renamed if !self.quiet => {
                let to = event.target_name().unwrap_or_default();
                let dry_run = self.dry_run.load(Ordering::Relaxed);
                self.line(|| output::print_rename(&from, &to, dry_run));
            }
            OutcomeStatus::SkippedUnchanged if !self.quiet => {
                self.line(|| output::print_skip(&from));
            }
            OutcomeStatus::Failed => {
                let msg = failure_message(&from, event);
                self.line(|| output::print_error(&msg));
            }
            _ => {}
        }
    }

    fn scan_error(&self, path: Option<&Path>, message: &str) {
        let msg = match path {
            Some(p) => format!("Skipped '{}': {}", p.display(), message),
            None => format!("Skipped entry: {}", message),
        };
        self.line(|| output::print_warning(&msg));
    }

    fn batch_finished(&self, _summary: &BatchSummary) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RenameOutcome;
    use std::path::PathBuf;

    #[test]
    fn test_failure_message_names_backup_once() {
        let event = FileEvent::new(
            "/data/a b.txt",
            RenameOutcome::stranded(
                "target already exists",
                PathBuf::from("/data/a_b.txt"),
                PathBuf::from("/data/a b.txt.bak"),
            ),
        );
        let msg = failure_message("a b.txt", &event);
        assert!(msg.starts_with("a b.txt: target already exists"));
        assert_eq!(msg.matches("a b.txt.bak").count(), 1);
    }

    #[test]
    fn test_failure_message_plain_reason() {
        let event = FileEvent::new(
            "/data/x",
            RenameOutcome::failed("permission denied: read-only", None),
        );
        assert_eq!(
            failure_message("x", &event),
            "x: permission denied: read-only"
        );
    }
}
