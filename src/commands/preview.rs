//! # preview 命令实现
//!
//! 对命令行给出的名称运行清洗器并以表格展示，不访问文件系统。
//!
//! ## 依赖关系
//! - 使用 `cli/preview.rs` 定义的参数
//! - 使用 `rename/sanitizer.rs`

use super::CommandStatus;
use crate::cli::preview::PreviewArgs;
use crate::error::Result;
use crate::models::SanitizationPolicy;
use crate::rename::sanitize;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 预览表格行
#[derive(Debug, Clone, Tabled)]
struct PreviewRow {
    #[tabled(rename = "Original")]
    original: String,
    #[tabled(rename = "Sanitized")]
    sanitized: String,
    #[tabled(rename = "Changed")]
    changed: &'static str,
}

fn preview_rows(names: &[String], policy: &SanitizationPolicy) -> Vec<PreviewRow> {
    names
        .iter()
        .map(|name| {
            let sanitized = sanitize(name, policy);
            let changed = if sanitized == *name { "no" } else { "yes" };
            PreviewRow {
                original: name.clone(),
                sanitized,
                changed,
            }
        })
        .collect()
}

/// 执行预览
pub fn execute(args: PreviewArgs) -> Result<CommandStatus> {
    let policy = args.policy.build_policy()?;

    output::print_header("Sanitization Preview");
    output::print_info(&format!(
        "Replacement '{}', max length {} bytes, normalize {}, collapse {}",
        policy.replacement(),
        policy.max_length(),
        policy.normalize(),
        policy.collapse()
    ));

    let rows = preview_rows(&args.names, &policy);
    let changed = rows.iter().filter(|r| r.changed == "yes").count();

    println!("{}", Table::new(&rows));
    output::print_done(&format!("{} of {} names would change", changed, rows.len()));

    Ok(CommandStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_rows() {
        let names = vec![
            "My Photo!!.JPG".to_string(),
            "clean.txt".to_string(),
            "CON".to_string(),
        ];
        let rows = preview_rows(&names, &SanitizationPolicy::default());

        assert_eq!(rows[0].sanitized, "My_Photo.JPG");
        assert_eq!(rows[0].changed, "yes");
        assert_eq!(rows[1].sanitized, "clean.txt");
        assert_eq!(rows[1].changed, "no");
        assert_ne!(rows[2].sanitized, "CON");
    }
}
