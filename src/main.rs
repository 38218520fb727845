//! # sanefile - 批量文件名清洗工具
//!
//! 将目录中的文件名清洗为可移植的安全名称，并以原子方式并行重命名。
//!
//! ## 子命令
//! - `rename`  - 清洗并重命名目录中的文件
//! - `preview` - 预览名称的清洗结果
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (扫描、调度、取消)
//!   │     ├── rename/    (清洗、冲突解析、执行)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、进度、日志)
//!   └── error.rs    (错误处理)
//! ```
//!
//! ## 退出码
//! - 0: 成功
//! - 1: 致命错误（根目录无效、策略无效等）
//! - 2: 部分文件处理失败
//! - 130: 被 Ctrl-C 中断

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod rename;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = utils::logging::init_logging(&cli.log_level) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }

    match commands::run(cli.command) {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            std::process::exit(1);
        }
    }
}
