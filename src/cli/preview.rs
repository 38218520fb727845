//! # preview 子命令 CLI 定义
//!
//! 预览名称的清洗结果
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/preview.rs`

use super::policy::PolicyArgs;
use clap::Args;

/// preview 子命令参数
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Filenames to sanitize
    #[arg(required = true)]
    pub names: Vec<String>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}
