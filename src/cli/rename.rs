//! # rename 子命令 CLI 定义
//!
//! 批量清洗并重命名目录中的文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rename.rs`

use super::policy::PolicyArgs;
use clap::Args;
use std::path::PathBuf;

/// rename 子命令参数
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Target directory to process
    pub directory: PathBuf,

    /// Simulate changes without renaming files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Filter by file extensions, e.g. 'jpg,png,txt'
    #[arg(long, value_delimiter = ',')]
    pub file_types: Vec<String>,

    /// Make extension filtering case-sensitive
    #[arg(long, default_value_t = false)]
    pub case_sensitive: bool,

    /// Also process hidden files and directories
    #[arg(long, default_value_t = false)]
    pub include_hidden: bool,

    /// Move each file to a '.bak' path before the final rename
    #[arg(long, default_value_t = false)]
    pub backup: bool,

    /// Number of parallel workers (0 = auto)
    #[arg(short = 'j', long, env = "SANEFILE_THREADS", default_value_t = 0)]
    pub threads: usize,

    /// Only print failures and the final summary
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,
}
