//! # 清洗策略 CLI 参数
//!
//! `rename` 和 `preview` 共用的策略参数。
//!
//! ## 依赖关系
//! - 被 `cli/rename.rs`, `cli/preview.rs` 展开使用
//! - 构建 `models/policy.rs` 的 `SanitizationPolicy`

use crate::error::Result;
use crate::models::policy::{SanitizationPolicy, DEFAULT_MAX_LENGTH, DEFAULT_REPLACEMENT};

use clap::Args;

/// 策略参数
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Replacement token for spaces and invalid characters
    #[arg(long, env = "SANEFILE_REPLACEMENT", default_value = DEFAULT_REPLACEMENT)]
    pub replacement: String,

    /// Maximum filename length in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Skip Unicode NFKC normalization
    #[arg(long, default_value_t = false)]
    pub no_normalize: bool,

    /// Keep runs of repeated replacement tokens
    #[arg(long, default_value_t = false)]
    pub no_collapse: bool,

    /// Extra characters to treat as invalid, e.g. '#%&'
    #[arg(long)]
    pub extra_illegal: Option<String>,

    /// Replace the reserved device names, e.g. 'CON,PRN,AUX'
    #[arg(long, value_delimiter = ',')]
    pub reserved_names: Vec<String>,
}

impl PolicyArgs {
    /// 构建并校验清洗策略
    pub fn build_policy(&self) -> Result<SanitizationPolicy> {
        let extra = self.extra_illegal.as_deref().unwrap_or("");
        let mut builder = SanitizationPolicy::builder()
            .replacement(self.replacement.clone())
            .illegal_chars(extra.chars())
            .max_length(self.max_length)
            .normalize(!self.no_normalize)
            .collapse(!self.no_collapse);

        if !self.reserved_names.is_empty() {
            builder = builder.reserved_names(&self.reserved_names);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PolicyArgs {
        PolicyArgs {
            replacement: DEFAULT_REPLACEMENT.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            no_normalize: false,
            no_collapse: false,
            extra_illegal: None,
            reserved_names: Vec::new(),
        }
    }

    #[test]
    fn test_default_args_build_default_policy() {
        assert_eq!(args().build_policy().unwrap(), SanitizationPolicy::default());
    }

    #[test]
    fn test_flags_map_to_policy() {
        let mut a = args();
        a.no_normalize = true;
        a.no_collapse = true;
        a.replacement = "-".to_string();
        let policy = a.build_policy().unwrap();
        assert!(!policy.normalize());
        assert!(!policy.collapse());
        assert_eq!(policy.replacement(), "-");
    }

    #[test]
    fn test_extra_illegal_extends_defaults() {
        let mut a = args();
        a.extra_illegal = Some("#%".to_string());
        let policy = a.build_policy().unwrap();
        assert!(policy.is_illegal('#'));
        assert!(policy.is_illegal('%'));
        assert!(policy.is_illegal('?'));
    }

    #[test]
    fn test_extra_illegal_conflicts_with_replacement() {
        let mut a = args();
        a.replacement = "-".to_string();
        a.extra_illegal = Some("-".to_string());
        assert!(a.build_policy().is_err());
    }

    #[test]
    fn test_reserved_names_replace_defaults() {
        let mut a = args();
        a.reserved_names = vec!["desktop".to_string()];
        let policy = a.build_policy().unwrap();
        assert!(policy.is_reserved("DESKTOP"));
        assert!(!policy.is_reserved("CON"));
    }

    #[test]
    fn test_invalid_replacement_rejected() {
        let mut a = args();
        a.replacement = "?".to_string();
        assert!(a.build_policy().is_err());
    }
}
