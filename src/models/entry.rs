//! # 扫描条目与重命名任务
//!
//! ## 依赖关系
//! - 被 `batch/scanner.rs` 产生
//! - 被 `batch/scheduler.rs`, `rename/executor.rs` 使用

use std::path::{Path, PathBuf};

/// 隐藏文件前缀
pub const HIDDEN_PREFIX: &str = ".";

/// 扫描得到的文件条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// 绝对路径
    pub path: PathBuf,
    /// 文件名
    pub name: String,
    /// 扩展名（不含 `.`）
    pub extension: Option<String>,
    /// 是否为隐藏文件
    pub hidden: bool,
}

impl FileEntry {
    /// 从路径构建条目，路径没有文件名时返回 `None`
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().into_owned();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        let hidden = name.starts_with(HIDDEN_PREFIX);

        Some(FileEntry {
            path,
            name,
            extension,
            hidden,
        })
    }

    /// 所在目录
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// 单个文件的重命名任务
#[derive(Debug, Clone)]
pub struct RenameTask {
    pub entry: FileEntry,
    /// 仅模拟，不修改文件系统
    pub dry_run: bool,
    /// 先移动到备份路径再移动到目标
    pub backup: bool,
}

impl RenameTask {
    pub fn new(entry: FileEntry, dry_run: bool, backup: bool) -> Self {
        RenameTask {
            entry,
            dry_run,
            backup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_path() {
        let entry = FileEntry::from_path("/data/My Photo.JPG").unwrap();
        assert_eq!(entry.name, "My Photo.JPG");
        assert_eq!(entry.extension.as_deref(), Some("JPG"));
        assert!(!entry.hidden);
        assert_eq!(entry.parent(), Path::new("/data"));
    }

    #[test]
    fn test_hidden_entry() {
        let entry = FileEntry::from_path("/data/.profile").unwrap();
        assert!(entry.hidden);
        assert_eq!(entry.extension, None);
    }

    #[test]
    fn test_entry_without_name() {
        assert!(FileEntry::from_path("/").is_none());
    }
}
