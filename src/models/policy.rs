//! # 文件名清洗策略
//!
//! 描述一次运行中清洗规则的不可变配置。策略在运行开始时构建一次，
//! 之后只读共享给所有工作线程。
//!
//! ## 依赖关系
//! - 被 `rename/sanitizer.rs` 使用
//! - 被 `cli/mod.rs` 的 `PolicyArgs` 构建

use crate::error::{Result, SaneError};

use std::collections::BTreeSet;

/// 默认替换符
pub const DEFAULT_REPLACEMENT: &str = "_";

/// 默认非法字符集（跨平台不安全字符）
pub const DEFAULT_ILLEGAL_CHARS: &[char] = &['!', '"', '<', '>', ':', '\\', '/', '|', '?', '*'];

/// 默认最大文件名长度（字节）
pub const DEFAULT_MAX_LENGTH: usize = 255;

/// 允许的最小文件名长度上限（字节）
pub const MIN_MAX_LENGTH: usize = 32;

/// 替换符最多字符数
const MAX_REPLACEMENT_CHARS: usize = 4;

/// Windows 保留设备名
pub const DEFAULT_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// 文件名清洗策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationPolicy {
    replacement: String,
    illegal: BTreeSet<char>,
    normalize: bool,
    collapse: bool,
    max_length: usize,
    /// 全部大写存储
    reserved: BTreeSet<String>,
}

impl SanitizationPolicy {
    /// 从默认值开始构建策略
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn collapse(&self) -> bool {
        self.collapse
    }

    /// 最大文件名长度（字节）
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// 字符是否在非法字符集中
    pub fn is_illegal(&self, ch: char) -> bool {
        self.illegal.contains(&ch)
    }

    /// 基本名是否为保留名（不区分大小写）
    pub fn is_reserved(&self, base: &str) -> bool {
        !base.is_empty() && self.reserved.contains(&base.to_ascii_uppercase())
    }
}

impl Default for SanitizationPolicy {
    fn default() -> Self {
        SanitizationPolicy {
            replacement: DEFAULT_REPLACEMENT.to_string(),
            illegal: DEFAULT_ILLEGAL_CHARS.iter().copied().collect(),
            normalize: true,
            collapse: true,
            max_length: DEFAULT_MAX_LENGTH,
            reserved: DEFAULT_RESERVED_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// 策略构建器
///
/// `build()` 校验替换符和长度上限，保证清洗结果对同一策略幂等。
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    policy: SanitizationPolicy,
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        PolicyBuilder {
            policy: SanitizationPolicy::default(),
        }
    }
}

impl PolicyBuilder {
    /// 设置替换符
    pub fn replacement(mut self, replacement: impl Into<String>) -> Self {
        self.policy.replacement = replacement.into();
        self
    }

    /// 追加非法字符
    pub fn illegal_chars<I: IntoIterator<Item = char>>(mut self, chars: I) -> Self {
        self.policy.illegal.extend(chars);
        self
    }

    /// 是否进行 Unicode NFKC 归一化
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.policy.normalize = normalize;
        self
    }

    /// 是否合并连续替换符
    pub fn collapse(mut self, collapse: bool) -> Self {
        self.policy.collapse = collapse;
        self
    }

    /// 设置最大文件名长度（字节）
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.policy.max_length = max_length;
        self
    }

    /// 替换保留名集合
    pub fn reserved_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy.reserved = names
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// 校验并生成策略
    pub fn build(self) -> Result<SanitizationPolicy> {
        let policy = self.policy;
        let token = &policy.replacement;

        if token.is_empty() {
            return Err(SaneError::InvalidPolicy(
                "replacement token must not be empty".to_string(),
            ));
        }
        if token.chars().count() > MAX_REPLACEMENT_CHARS {
            return Err(SaneError::InvalidPolicy(format!(
                "replacement token '{}' is longer than {} characters",
                token, MAX_REPLACEMENT_CHARS
            )));
        }
        if let Some(bad) = token.chars().find(|&c| {
            !c.is_ascii()
                || c == '.'
                || c.is_alphanumeric()
                || c.is_whitespace()
                || c.is_control()
                || policy.illegal.contains(&c)
        }) {
            return Err(SaneError::InvalidPolicy(format!(
                "replacement token '{}' contains unsupported character {:?}",
                token, bad
            )));
        }
        if policy.max_length < MIN_MAX_LENGTH {
            return Err(SaneError::InvalidPolicy(format!(
                "max length {} is below the minimum of {} bytes",
                policy.max_length, MIN_MAX_LENGTH
            )));
        }

        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        let built = SanitizationPolicy::builder().build().unwrap();
        assert_eq!(built, SanitizationPolicy::default());
        assert_eq!(built.replacement(), "_");
        assert!(built.is_illegal('!'));
        assert!(built.is_illegal('"'));
        assert!(!built.is_illegal('_'));
    }

    #[test]
    fn test_reserved_is_case_insensitive() {
        let policy = SanitizationPolicy::default();
        assert!(policy.is_reserved("con"));
        assert!(policy.is_reserved("Lpt3"));
        assert!(!policy.is_reserved("console"));
        assert!(!policy.is_reserved(""));
    }

    #[test]
    fn test_rejects_bad_replacement() {
        for token in ["", ".", "a", " ", "?", "é", "-----"] {
            let result = SanitizationPolicy::builder().replacement(token).build();
            assert!(result.is_err(), "token {:?} should be rejected", token);
        }
        assert!(SanitizationPolicy::builder().replacement("-").build().is_ok());
        assert!(SanitizationPolicy::builder().replacement("~~").build().is_ok());
    }

    #[test]
    fn test_rejects_tiny_max_length() {
        assert!(SanitizationPolicy::builder().max_length(8).build().is_err());
        assert!(SanitizationPolicy::builder().max_length(MIN_MAX_LENGTH).build().is_ok());
    }

    #[test]
    fn test_custom_reserved_names() {
        let policy = SanitizationPolicy::builder()
            .reserved_names(["conin$"])
            .build()
            .unwrap();
        assert!(policy.is_reserved("CONIN$"));
        assert!(!policy.is_reserved("CON"));
    }
}
