//! # 重命名执行器
//!
//! 提交单个文件的重命名：直接原子移动，或先移动到备份路径再移动到目标。
//! dry-run 模式下不修改文件系统。
//!
//! ## 备份约定
//! 备份路径为原文件名追加 [`BACKUP_SUFFIX`]（如 `My Photo.jpg.bak`），
//! 同样经过冲突解析。若第二次移动失败，文件留在备份路径，
//! 失败结果中记录该路径，执行器不做自动回滚。
//!
//! ## 依赖关系
//! - 被 `batch/scheduler.rs` 调用
//! - 使用 `rename/resolver.rs` 解析备份路径

use crate::models::{RenameOutcome, RenameTask};
use crate::rename::resolver::CollisionResolver;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 备份标记后缀
pub const BACKUP_SUFFIX: &str = ".bak";

/// 执行重命名
///
/// `target` 由调用方通过冲突解析器预留。
pub fn execute(task: &RenameTask, target: &Path, resolver: &CollisionResolver) -> RenameOutcome {
    let source = &task.entry.path;

    if task.dry_run {
        debug!("[dry-run] {} -> {}", source.display(), target.display());
        return RenameOutcome::renamed(target);
    }

    if !task.backup {
        return match move_file(source, target) {
            Ok(()) => {
                debug!("renamed {} -> {}", source.display(), target.display());
                RenameOutcome::renamed(target)
            }
            Err(e) => {
                warn!("failed to rename {}: {}", source.display(), e);
                RenameOutcome::failed(describe_error(&e, target), Some(target.to_path_buf()))
            }
        };
    }

    let backup = resolver.reserve(&backup_path(source));

    if let Err(e) = move_file(source, backup.path()) {
        warn!("failed to back up {}: {}", source.display(), e);
        return RenameOutcome::failed(
            format!("backup failed: {}", describe_error(&e, backup.path())),
            Some(target.to_path_buf()),
        );
    }

    match move_file(backup.path(), target) {
        Ok(()) => {
            debug!(
                "renamed {} -> {} via {}",
                source.display(),
                target.display(),
                backup.path().display()
            );
            RenameOutcome::renamed(target)
        }
        Err(e) => {
            // 文件此刻位于备份路径，保持该路径的预留
            let backup = backup.commit();
            warn!(
                "failed to move backup {} to {}: {}",
                backup.display(),
                target.display(),
                e
            );
            RenameOutcome::stranded(describe_error(&e, target), target.to_path_buf(), backup)
        }
    }
}

/// 原文件名追加备份后缀
pub fn backup_path(source: &Path) -> PathBuf {
    let mut name: OsString = source.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    source.with_file_name(name)
}

/// 不覆盖已存在目标的原子移动
///
/// `fs::rename` 在部分平台会静默替换目标，因此先检查目标是否存在；
/// 进程内的并发写入者由冲突解析器排除。
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if to.symlink_metadata().is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("target {} already exists", to.display()),
        ));
    }
    fs::rename(from, to)
}

fn describe_error(e: &io::Error, target: &Path) -> String {
    match e.kind() {
        io::ErrorKind::AlreadyExists => {
            format!("collision: {} appeared before commit", target.display())
        }
        io::ErrorKind::PermissionDenied => format!("permission denied: {}", e),
        io::ErrorKind::NotFound => format!("source vanished: {}", e),
        _ => e.to_string(),
    }
}
