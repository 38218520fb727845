//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `rename/`, `utils/`
//! - 子模块: rename, preview

pub mod preview;
pub mod rename;

use crate::cli::Commands;
use crate::error::Result;

/// 命令正常结束后的状态，决定进程退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// 部分文件处理失败
    Failures,
    /// 被用户中断
    Cancelled,
}

impl CommandStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Success => 0,
            CommandStatus::Failures => 2,
            CommandStatus::Cancelled => 130,
        }
    }
}

/// 执行命令
pub fn run(cmd: Commands) -> Result<CommandStatus> {
    match cmd {
        Commands::Rename(args) => rename::execute(args),
        Commands::Preview(args) => preview::execute(args),
    }
}
