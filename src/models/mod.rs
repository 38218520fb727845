//! # 数据模型模块
//!
//! 定义清洗策略、扫描条目、重命名任务与结果等数据模型。
//!
//! ## 依赖关系
//! - 被 `rename/`, `batch/` 和 `commands/` 使用
//! - 子模块: policy, entry, outcome

pub mod entry;
pub mod outcome;
pub mod policy;

pub use entry::{FileEntry, RenameTask};
pub use outcome::{BatchState, BatchSummary, FileEvent, OutcomeStatus, RenameOutcome};
pub use policy::SanitizationPolicy;
