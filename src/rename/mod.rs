//! # 重命名核心模块
//!
//! 单个文件的处理链：清洗 → 冲突解析 → 提交。
//!
//! ## 依赖关系
//! - 被 `batch/scheduler.rs` 使用
//! - 使用 `models/`
//! - 子模块: sanitizer, resolver, executor

pub mod executor;
pub mod resolver;
pub mod sanitizer;

pub use resolver::CollisionResolver;
pub use sanitizer::sanitize;
