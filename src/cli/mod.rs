//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `rename`: 批量清洗并重命名目录中的文件
//! - `preview`: 预览给定名称的清洗结果，不访问文件系统
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: policy, rename, preview

pub mod policy;
pub mod preview;
pub mod rename;

use clap::{Parser, Subcommand};

/// sanefile - 批量文件名清洗工具
#[derive(Parser)]
#[command(name = "sanefile")]
#[command(version)]
#[command(about = "Sanitize and rename filenames across a directory tree", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Diagnostic log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "SANEFILE_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Sanitize and rename files in a directory
    Rename(rename::RenameArgs),

    /// Show how names would be sanitized without touching any file
    Preview(preview::PreviewArgs),
}
