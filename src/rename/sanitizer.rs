//! # 文件名清洗器
//!
//! 将任意文件名映射为跨平台安全的规范文件名。纯函数，无 I/O。
//!
//! ## 处理流程
//! 1. Unicode NFKC 归一化（可选）
//! 2. 替换非法字符、空白字符和控制字符
//! 3. 合并连续替换符（可选）
//! 4. 修剪首尾替换符以及末尾的点和空格
//! 5. 空结果使用回退名
//! 6. 保留名加前缀
//! 7. 超长时只截断主干，保留扩展名；截断出保留名时为前缀预留空间
//!
//! 对任意策略和输入，`sanitize(sanitize(x)) == sanitize(x)`。
//!
//! ## 依赖关系
//! - 被 `batch/scheduler.rs` 和 `commands/preview.rs` 使用
//! - 使用 `models/policy.rs`
//! - 使用 `unicode-normalization` crate

use crate::models::SanitizationPolicy;

use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

/// 清洗结果为空时使用的回退名
pub const FALLBACK_NAME: &str = "unnamed";

/// 清洗文件名
pub fn sanitize(name: &str, policy: &SanitizationPolicy) -> String {
    let token = policy.replacement();

    let normalized: Cow<'_, str> = if policy.normalize() {
        Cow::Owned(name.nfkc().collect())
    } else {
        Cow::Borrowed(name)
    };

    let mut replaced = String::with_capacity(normalized.len());
    for ch in normalized.chars() {
        if policy.is_illegal(ch) || ch.is_whitespace() || ch.is_control() {
            replaced.push_str(token);
        } else {
            replaced.push(ch);
        }
    }

    // 替换符与后续组合字符可能重新组合，再归一化一次
    if policy.normalize() {
        replaced = replaced.nfkc().collect();
    }

    if policy.collapse() {
        replaced = collapse_runs(&replaced, token);
    }

    let mut result = trim_name(&replaced, token, true);
    if result.is_empty() {
        result = FALLBACK_NAME.to_string();
    }

    let max = policy.max_length();
    let guarded = guard_reserved(result.clone(), policy);
    if guarded.len() <= max {
        return guarded;
    }

    // 截断不带前缀的名字，前缀只在截断后按需添加
    let truncated = truncate_name(&result, token, max);
    if !is_reserved_name(&truncated, policy) {
        return truncated;
    }
    guard_reserved(truncate_name(&result, token, max - token.len()), policy)
}

/// 将两个及以上连续替换符合并为一个
fn collapse_runs(s: &str, token: &str) -> String {
    let double = token.repeat(2);
    let mut out = s.to_string();
    while out.contains(&double) {
        out = out.replace(&double, token);
    }
    out
}

/// 修剪文件名
///
/// 去掉首尾替换符（`leading` 为 false 时保留开头）和末尾的点与空格，
/// 再去掉主干末尾和扩展名开头的替换符。
fn trim_name(name: &str, token: &str, leading: bool) -> String {
    let mut s = name;
    if leading {
        s = s.trim_start_matches(token);
    }
    loop {
        let next = s.trim_end_matches(token).trim_end_matches(['.', ' ']);
        if next.len() == s.len() {
            break;
        }
        s = next;
    }

    match split_extension(s) {
        (stem, Some(ext)) => {
            let stem_trimmed = stem.trim_end_matches(token);
            let ext_trimmed = ext.trim_start_matches(token);
            if stem_trimmed.is_empty() || ext_trimmed.is_empty() {
                s.to_string()
            } else {
                format!("{}.{}", stem_trimmed, ext_trimmed)
            }
        }
        (_, None) => s.to_string(),
    }
}

/// 基本名（首个 `.` 之前的部分）是否为保留名
fn is_reserved_name(name: &str, policy: &SanitizationPolicy) -> bool {
    policy.is_reserved(name.split('.').next().unwrap_or(""))
}

/// 保留名加替换符前缀
fn guard_reserved(name: String, policy: &SanitizationPolicy) -> String {
    if is_reserved_name(&name, policy) {
        format!("{}{}", policy.replacement(), name)
    } else {
        name
    }
}

/// 截断到 `max` 字节以内
///
/// 扩展名不超过上限一半时完整保留，只截断主干；否则整体截断。
fn truncate_name(name: &str, token: &str, max: usize) -> String {
    let (stem, ext) = match split_extension(name) {
        (stem, Some(ext)) if (ext.len() + 1) * 2 <= max => (stem, &name[stem.len()..]),
        _ => (name, ""),
    };

    let mut cut = (max - ext.len()).min(stem.len());
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }

    let truncated = format!("{}{}", &stem[..cut], ext);
    let trimmed = trim_name(&truncated, token, false);
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed
    }
}

/// 按最后一个 `.` 拆分为 (主干, 扩展名)；以 `.` 开头的名字视为无扩展名
pub(crate) fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}
