use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use globset::{Glob, GlobMatcher};

use crate::domain::cmdline::CATCH_ALL_PATTERN;
use crate::domain::error::FindError;

/// 文件系统访问接口
///
/// 搜索引擎只通过这个接口接触文件系统，测试时可以替换为内存实现。
pub trait FileSystemTrait {
    /// 路径是否存在
    fn exists(&self, path: &Path) -> bool;
    /// 列出单个目录下匹配通配模式的文件名，不递归
    fn list_files(&self, dir: &Path, pattern: &str) -> Result<Vec<String>, FindError>;
    /// 列出单个目录下的直接子目录名
    ///
    /// 实现允许包含 `.` 与 `..` 伪条目，由调用方排除。
    fn list_directories(&self, dir: &Path) -> Result<Vec<String>, FindError>;
    /// 把路径规范化为绝对形式
    fn normalize(&self, path: &Path) -> Result<PathBuf, FindError>;
    /// 返回文件修改时间的原始字符串，格式 "月/日/年 时:分:秒"
    fn metadata_timestamp(&self, file: &Path) -> Result<String, FindError>;
}

/// 编译通配模式，匹配一切名称的 `*.*` 返回 None
///
/// `*.*` 沿用 DOS 语义作为通配所有名称的特例，
/// 按字面编译会漏掉无扩展名的文件。
pub fn compile_pattern(pattern: &str) -> Result<Option<GlobMatcher>, FindError> {
    if pattern == CATCH_ALL_PATTERN {
        return Ok(None);
    }
    let glob = Glob::new(pattern)
        .map_err(|err| FindError::InvalidPattern(pattern.to_string(), err))?;
    Ok(Some(glob.compile_matcher()))
}

/// 检查单个名称是否匹配通配模式
pub fn glob_match(pattern: &str, name: &str) -> Result<bool, FindError> {
    Ok(compile_pattern(pattern)?.map_or(true, |matcher| matcher.is_match(name)))
}

/// 基于 std::fs 的本地文件系统实现
pub struct LocalFileSystem;

impl FileSystemTrait for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, dir: &Path, pattern: &str) -> Result<Vec<String>, FindError> {
        let matcher = compile_pattern(pattern)?;
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if matcher.as_ref().map_or(true, |m| m.is_match(&name)) {
                names.push(name);
            }
        }
        // 排序保证枚举顺序稳定
        names.sort();
        Ok(names)
    }

    fn list_directories(&self, dir: &Path) -> Result<Vec<String>, FindError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn normalize(&self, path: &Path) -> Result<PathBuf, FindError> {
        match fs::canonicalize(path) {
            Ok(canonical) => Ok(canonical),
            // 路径不存在时退化为基于当前目录的绝对形式，存在性由调用方检查
            Err(_) => Ok(std::env::current_dir()?.join(path)),
        }
    }

    fn metadata_timestamp(&self, file: &Path) -> Result<String, FindError> {
        let modified = fs::metadata(file)?.modified()?;
        let local: DateTime<Local> = modified.into();
        Ok(local.format("%-m/%-d/%Y %H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn fixture() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("b.log")).unwrap();
        File::create(dir.path().join("README")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        dir
    }

    #[test]
    fn test_list_files_filters_by_pattern() {
        let dir = fixture();
        let fs = LocalFileSystem;

        let names = fs.list_files(dir.path(), "*.txt").unwrap();
        assert_eq!(names, ["a.txt".to_string()]);
    }

    #[test]
    fn test_catch_all_includes_extensionless_files() {
        let dir = fixture();
        let fs = LocalFileSystem;

        let names = fs.list_files(dir.path(), CATCH_ALL_PATTERN).unwrap();
        assert_eq!(
            names,
            ["README".to_string(), "a.txt".to_string(), "b.log".to_string()]
        );
    }

    #[test]
    fn test_list_files_excludes_directories() {
        let dir = fixture();
        let fs = LocalFileSystem;

        let names = fs.list_files(dir.path(), CATCH_ALL_PATTERN).unwrap();
        assert!(!names.contains(&"sub".to_string()));
    }

    #[test]
    fn test_list_directories() {
        let dir = fixture();
        let fs = LocalFileSystem;

        let names = fs.list_directories(dir.path()).unwrap();
        assert_eq!(names, ["sub".to_string()]);
    }

    #[test]
    fn test_exists() {
        let dir = fixture();
        let fs = LocalFileSystem;

        assert!(fs.exists(dir.path()));
        assert!(!fs.exists(&dir.path().join("missing")));
    }

    #[test]
    fn test_normalize_produces_absolute_path() {
        let fs = LocalFileSystem;
        let normalized = fs.normalize(Path::new(".")).unwrap();
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_metadata_timestamp_shape() {
        let dir = fixture();
        let fs = LocalFileSystem;

        // 原始格式: "月/日/年 时:分:秒"
        let raw = fs.metadata_timestamp(&dir.path().join("a.txt")).unwrap();
        let (date, time) = raw.split_once(' ').unwrap();
        assert_eq!(date.matches('/').count(), 2);
        assert_eq!(time.matches(':').count(), 2);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        assert!(matches!(
            glob_match("[", "a.txt"),
            Err(FindError::InvalidPattern(..))
        ));
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match("*.txt", "a.txt").unwrap());
        assert!(!glob_match("*.txt", "a.log").unwrap());
        assert!(glob_match(CATCH_ALL_PATTERN, "README").unwrap());
    }
}
