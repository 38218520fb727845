//! # 批量处理模块
//!
//! 提供目录级的批量重命名能力。
//!
//! ## 功能
//! - 惰性扫描目录，过滤隐藏文件和扩展名
//! - 固定大小线程池并行处理
//! - 协作式取消
//! - 逐文件事件与批次统计
//!
//! ## 依赖关系
//! - 被 `commands/rename.rs` 使用
//! - 使用 `rename/` 处理单个文件
//! - 使用 `rayon` 进行并行处理

pub mod context;
pub mod reporter;
pub mod scanner;
pub mod scheduler;

pub use context::{CancelToken, RunContext};
pub use reporter::Reporter;
pub use scanner::Scanner;
pub use scheduler::BatchScheduler;
