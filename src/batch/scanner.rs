//! # 目录扫描器
//!
//! 惰性遍历根目录，产生待处理的文件条目流。
//!
//! ## 功能
//! - 迭代式遍历（`walkdir` 内部维护显式目录栈，无递归调用）
//! - 可选递归
//! - 跳过隐藏文件和隐藏目录
//! - 扩展名白名单（可选大小写不敏感）
//! - 无权限的子目录记录后跳过，不中断扫描
//! - 进入新目录前检查取消信号
//!
//! ## 依赖关系
//! - 被 `batch/scheduler.rs` 消费
//! - 使用 `walkdir` 遍历目录

use crate::batch::context::CancelToken;
use crate::batch::reporter::Reporter;
use crate::error::{Result, SaneError};
use crate::models::entry::{FileEntry, HIDDEN_PREFIX};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 目录扫描器
#[derive(Debug, Clone)]
pub struct Scanner {
    /// 根目录
    root: PathBuf,
    /// 是否递归
    recursive: bool,
    /// 扩展名白名单（不含 `.`）
    extensions: Option<HashSet<String>>,
    /// 扩展名匹配是否忽略大小写
    case_insensitive: bool,
    /// 是否包含隐藏条目
    include_hidden: bool,
}

impl Scanner {
    /// 创建新的扫描器
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            extensions: None,
            case_insensitive: true,
            include_hidden: false,
        }
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 设置扩展名白名单，空列表表示不过滤
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = extensions
            .into_iter()
            .map(|s| s.as_ref().trim().trim_start_matches('.').to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self.extensions = if set.is_empty() { None } else { Some(set) };
        self
    }

    /// 设置扩展名匹配是否忽略大小写
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// 设置是否包含隐藏条目
    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// 校验根目录并返回惰性条目流
    ///
    /// 根目录不存在、不是目录或无法读取时返回致命错误。
    pub fn scan<'a>(
        &self,
        cancel: &CancelToken,
        reporter: &'a dyn Reporter,
    ) -> Result<ScanIter<'a>> {
        let root = fs::canonicalize(&self.root).map_err(|e| SaneError::InvalidRoot {
            path: self.root.display().to_string(),
            source: Some(e),
        })?;

        if !root.is_dir() {
            return Err(SaneError::InvalidRoot {
                path: root.display().to_string(),
                source: None,
            });
        }

        fs::read_dir(&root).map_err(|e| SaneError::InvalidRoot {
            path: root.display().to_string(),
            source: Some(e),
        })?;

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        let extensions = self.extensions.as_ref().map(|set| {
            set.iter()
                .map(|ext| self.fold_case(ext))
                .collect::<HashSet<String>>()
        });

        debug!(
            "scanning {} (recursive: {}, filter: {:?})",
            root.display(),
            self.recursive,
            extensions
        );

        Ok(ScanIter {
            root,
            walker,
            extensions,
            case_insensitive: self.case_insensitive,
            include_hidden: self.include_hidden,
            cancel: cancel.clone(),
            reporter,
            errors: 0,
            finished: false,
        })
    }

    fn fold_case(&self, ext: &str) -> String {
        if self.case_insensitive {
            ext.to_lowercase()
        } else {
            ext.to_string()
        }
    }
}

/// 惰性文件条目流
pub struct ScanIter<'a> {
    root: PathBuf,
    walker: walkdir::IntoIter,
    extensions: Option<HashSet<String>>,
    case_insensitive: bool,
    include_hidden: bool,
    cancel: CancelToken,
    reporter: &'a dyn Reporter,
    errors: u64,
    finished: bool,
}

impl ScanIter<'_> {
    /// 规范化后的根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 已跳过的不可读目录数
    pub fn errors(&self) -> u64 {
        self.errors
    }

    fn matches_extension(&self, entry: &FileEntry) -> bool {
        let Some(filter) = &self.extensions else {
            return true;
        };
        match &entry.extension {
            Some(ext) if self.case_insensitive => filter.contains(&ext.to_lowercase()),
            Some(ext) => filter.contains(ext),
            None => false,
        }
    }
}

impl Iterator for ScanIter<'_> {
    type Item = FileEntry;

    fn next(&mut self) -> Option<FileEntry> {
        if self.finished {
            return None;
        }

        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.errors += 1;
                    let message = match err.io_error() {
                        Some(io) => io.to_string(),
                        None => err.to_string(),
                    };
                    warn!(
                        "skipping unreadable entry {}: {}",
                        err.path().map(|p| p.display().to_string()).unwrap_or_default(),
                        message
                    );
                    self.reporter.scan_error(err.path(), &message);
                    continue;
                }
            };

            let hidden = entry
                .file_name()
                .to_string_lossy()
                .starts_with(HIDDEN_PREFIX);

            if entry.file_type().is_dir() {
                if self.cancel.is_cancelled() {
                    debug!("scan cancelled before entering {}", entry.path().display());
                    self.finished = true;
                    return None;
                }
                if hidden && !self.include_hidden {
                    self.walker.skip_current_dir();
                }
                continue;
            }

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file) = FileEntry::from_path(entry.into_path()) else {
                continue;
            };
            if (file.hidden && !self.include_hidden) || !self.matches_extension(&file) {
                continue;
            }
            return Some(file);
        }
    }
}
