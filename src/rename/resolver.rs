//! # 冲突解析器
//!
//! 为期望的目标路径分配一个不冲突的最终路径，可被多个工作线程并发调用。
//!
//! 候选顺序：`name.ext`, `name_1.ext`, `name_2.ext`, ……
//! 每个候选先检查磁盘（不持锁），再在锁内检查并登记预留集合。
//! 已被消费（重命名已提交）的路径保持预留，直到运行结束。
//! 候选文件名不超过字节上限，超出时缩短主干，保留扩展名。
//!
//! ## 依赖关系
//! - 被 `rename/executor.rs`, `batch/scheduler.rs` 使用
//! - 使用 `parking_lot` 保护预留集合

use crate::models::policy::DEFAULT_MAX_LENGTH;

use parking_lot::Mutex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::trace;

/// 冲突后缀分隔符
pub const COLLISION_SEPARATOR: &str = "_";

/// 冲突解析器
#[derive(Debug)]
pub struct CollisionResolver {
    reserved: Mutex<HashSet<PathBuf>>,
    /// 候选文件名的字节上限
    max_length: usize,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::with_max_length(DEFAULT_MAX_LENGTH)
    }
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_length(max_length: usize) -> Self {
        CollisionResolver {
            reserved: Mutex::new(HashSet::new()),
            max_length,
        }
    }

    /// 预留一个不与磁盘文件和其他预留冲突的路径
    pub fn reserve(&self, desired: &Path) -> Reservation<'_> {
        let mut attempt: u64 = 0;
        loop {
            let candidate = candidate_path(desired, attempt, self.max_length);
            attempt += 1;

            if candidate.symlink_metadata().is_ok() {
                continue;
            }

            // 锁内只做集合操作，不做任何文件系统调用
            let inserted = self.reserved.lock().insert(candidate.clone());
            if inserted {
                trace!("reserved {}", candidate.display());
                return Reservation {
                    resolver: self,
                    path: candidate,
                    committed: false,
                };
            }
        }
    }

    /// 当前是否被预留
    #[cfg(test)]
    pub fn is_reserved(&self, path: &Path) -> bool {
        self.reserved.lock().contains(path)
    }

    /// 当前预留数量
    pub fn reserved_count(&self) -> usize {
        self.reserved.lock().len()
    }

    fn release(&self, path: &Path) {
        self.reserved.lock().remove(path);
        trace!("released {}", path.display());
    }
}

/// 预留凭证
///
/// `commit()` 后路径在本次运行中保持预留；未提交即丢弃时释放。
#[derive(Debug)]
pub struct Reservation<'a> {
    resolver: &'a CollisionResolver,
    path: PathBuf,
    committed: bool,
}

impl Reservation<'_> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 路径已被占用，保持预留
    pub fn commit(mut self) -> PathBuf {
        self.committed = true;
        self.path.clone()
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.resolver.release(&self.path);
        }
    }
}

/// 生成第 `attempt` 个候选路径（0 为原路径）
///
/// 后缀插入在最后一个扩展名之前：`report.txt` → `report_1.txt`。
/// 文件名超过 `max_length` 字节时按字符边界缩短主干；
/// 扩展名超过上限一半时整体缩短。
pub fn candidate_path(desired: &Path, attempt: u64, max_length: usize) -> PathBuf {
    let Some(file_name) = desired.file_name() else {
        return desired.to_path_buf();
    };

    let suffix = if attempt == 0 {
        String::new()
    } else {
        format!("{}{}", COLLISION_SEPARATOR, attempt)
    };
    let stem = desired.file_stem().unwrap_or(file_name);
    let ext = desired.extension();
    let ext_len = ext.map_or(0, |e| e.len() + 1);

    if stem.len() + suffix.len() + ext_len <= max_length {
        if attempt == 0 {
            return desired.to_path_buf();
        }
        let mut name: OsString = stem.to_os_string();
        name.push(&suffix);
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }
        return desired.with_file_name(name);
    }

    let kept_ext = ext.filter(|_| ext_len * 2 <= max_length);
    let head: Cow<'_, str> = match kept_ext {
        Some(_) => stem.to_string_lossy(),
        None => file_name.to_string_lossy(),
    };
    let budget = max_length.saturating_sub(suffix.len() + kept_ext.map_or(0, |e| e.len() + 1));

    let mut cut = budget.min(head.len());
    while !head.is_char_boundary(cut) {
        cut -= 1;
    }

    let mut name = OsString::from(head[..cut].trim_end_matches(COLLISION_SEPARATOR));
    name.push(&suffix);
    if let Some(ext) = kept_ext {
        name.push(".");
        name.push(ext);
    }
    desired.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_candidate_path() {
        let max = DEFAULT_MAX_LENGTH;
        let base = Path::new("/data/report.txt");
        assert_eq!(candidate_path(base, 0, max), PathBuf::from("/data/report.txt"));
        assert_eq!(candidate_path(base, 1, max), PathBuf::from("/data/report_1.txt"));
        assert_eq!(candidate_path(base, 12, max), PathBuf::from("/data/report_12.txt"));

        let gz = Path::new("/data/archive.tar.gz");
        assert_eq!(candidate_path(gz, 2, max), PathBuf::from("/data/archive.tar_2.gz"));

        let plain = Path::new("/data/README");
        assert_eq!(candidate_path(plain, 1, max), PathBuf::from("/data/README_1"));
    }

    #[test]
    fn test_candidate_path_stays_within_limit() {
        let long = PathBuf::from(format!("/data/{}.txt", "a".repeat(250)));
        let first = candidate_path(&long, 1, 255);
        assert_eq!(
            first,
            PathBuf::from(format!("/data/{}_1.txt", "a".repeat(249)))
        );
        assert_eq!(first.file_name().unwrap().len(), 255);

        let tenth = candidate_path(&long, 10, 255);
        assert_eq!(
            tenth,
            PathBuf::from(format!("/data/{}_10.txt", "a".repeat(248)))
        );

        let wide = PathBuf::from(format!("/data/{}.txt", "é".repeat(20)));
        let name = candidate_path(&wide, 1, 32);
        let name = name.file_name().unwrap().to_str().unwrap();
        assert!(name.len() <= 32);
        assert_eq!(name, format!("{}_1.txt", "é".repeat(13)));

        let long_ext = PathBuf::from(format!("/data/a.{}", "x".repeat(40)));
        let name = candidate_path(&long_ext, 1, 32);
        assert_eq!(name.file_name().unwrap().len(), 32);
        assert!(name.to_string_lossy().ends_with("_1"));
    }

    #[test]
    fn test_long_name_collision_resolves_within_limit() {
        let dir = tempfile::tempdir().unwrap();
        let name = format!("{}.txt", "a".repeat(250));
        fs::write(dir.path().join(&name), b"x").unwrap();

        let resolver = CollisionResolver::with_max_length(255);
        let path = resolver.reserve(&dir.path().join(&name)).commit();
        assert_eq!(path, dir.path().join(format!("{}_1.txt", "a".repeat(249))));
        assert!(path.file_name().unwrap().len() <= 255);
    }

    #[test]
    fn test_free_path_is_returned_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = CollisionResolver::new();
        let desired = dir.path().join("report.txt");

        let reservation = resolver.reserve(&desired);
        assert_eq!(reservation.path(), desired);
        assert!(resolver.is_reserved(&desired));
    }

    #[test]
    fn test_existing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("report.txt"), b"x").unwrap();
        fs::write(dir.path().join("report_1.txt"), b"x").unwrap();

        let resolver = CollisionResolver::new();
        let reservation = resolver.reserve(&dir.path().join("report.txt"));
        assert_eq!(reservation.path(), dir.path().join("report_2.txt"));
    }

    #[test]
    fn test_reserved_path_is_skipped_until_released() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = CollisionResolver::new();
        let desired = dir.path().join("report.txt");

        let first = resolver.reserve(&desired);
        let second = resolver.reserve(&desired);
        assert_eq!(first.path(), desired);
        assert_eq!(second.path(), dir.path().join("report_1.txt"));

        drop(first);
        assert!(!resolver.is_reserved(&desired));
        let third = resolver.reserve(&desired);
        assert_eq!(third.path(), desired);
        drop(second);
        drop(third);
        assert_eq!(resolver.reserved_count(), 0);
    }

    #[test]
    fn test_committed_reservation_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = CollisionResolver::new();
        let desired = dir.path().join("report.txt");

        let path = resolver.reserve(&desired).commit();
        assert_eq!(path, desired);
        assert!(resolver.is_reserved(&desired));

        let next = resolver.reserve(&desired);
        assert_eq!(next.path(), dir.path().join("report_1.txt"));
    }

    #[test]
    fn test_concurrent_reservations_are_unique() {
        const THREADS: usize = 16;
        const ROUNDS: usize = 20;

        for _ in 0..ROUNDS {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join("report.txt"), b"x").unwrap();

            let resolver = Arc::new(CollisionResolver::new());
            let barrier = Arc::new(Barrier::new(THREADS));
            let desired = dir.path().join("report.txt");

            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let resolver = Arc::clone(&resolver);
                    let barrier = Arc::clone(&barrier);
                    let desired = desired.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        resolver.reserve(&desired).commit()
                    })
                })
                .collect();

            let paths: Vec<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            let unique: HashSet<&PathBuf> = paths.iter().collect();

            assert_eq!(unique.len(), THREADS);
            assert!(!unique.contains(&desired));
            for n in 1..=THREADS {
                assert!(unique.contains(&dir.path().join(format!("report_{}.txt", n))));
            }
        }
    }
}
