use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use crate::domain::cmdline::CmdLine;
use crate::domain::error::FindError;
use crate::domain::search::{reformat_timestamp, NameMatcher};
use crate::infrastructure::error_logging::{ErrorTally, ErrorType};
use crate::infrastructure::filesystem::FileSystemTrait;
use crate::infrastructure::logging::RunLog;

/// 递归深度的防御上限，超过即按枚举失败跳过该子树
const MAX_DEPTH: usize = 128;

/// 运行统计，遍历期间累积，结束后由调用方读取一次
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub processed_files: u64,
    pub processed_dirs: u64,
}

/// 递归时跳过的目录名集合
#[derive(Debug, Clone, Default)]
pub struct DirFilter {
    excluded_dirs: HashSet<String>,
}

impl DirFilter {
    pub fn new(excluded_dirs: Vec<String>) -> Self {
        Self {
            excluded_dirs: excluded_dirs.into_iter().collect(),
        }
    }

    /// 检查目录名是否被排除
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }
}

/// 单个匹配条目，按目录暂存，报告后即丢弃
struct MatchRecord {
    name: String,
    date: Option<String>,
}

/// 搜索引擎
///
/// 消费解析完成的命令行配置，通过文件系统接口执行单线程的
/// 深度优先遍历，把匹配项增量写入输出端口。可恢复的失败
/// (无法读取的子目录、无效模式、坏时间戳)计入错误统计并记录
/// 到运行日志，绝不中止整个运行。
pub struct SearchEngine<'a> {
    cmd: &'a CmdLine,
    root: &'a str,
    fs: &'a dyn FileSystemTrait,
    dir_filter: DirFilter,
    out: &'a mut dyn Write,
    log: &'a mut RunLog,
    errors: &'a mut ErrorTally,
    matcher: NameMatcher,
    stats: RunStats,
    reported: usize,
}

impl<'a> SearchEngine<'a> {
    /// 创建搜索引擎，正则无效时在任何遍历开始前报错
    pub fn new(
        cmd: &'a CmdLine,
        root: &'a str,
        fs: &'a dyn FileSystemTrait,
        dir_filter: DirFilter,
        out: &'a mut dyn Write,
        log: &'a mut RunLog,
        errors: &'a mut ErrorTally,
    ) -> Result<Self, FindError> {
        let matcher = NameMatcher::new(cmd.regex())?;
        Ok(Self {
            cmd,
            root,
            fs,
            dir_filter,
            out,
            log,
            errors,
            matcher,
            stats: RunStats::default(),
            reported: 0,
        })
    }

    /// 遍历结束后的统计
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// 执行搜索
    ///
    /// 起始路径不存在时在任何遍历工作之前返回
    /// [`FindError::PathNotFound`]，此时计数器保持为零。
    pub fn search(&mut self) -> Result<(), FindError> {
        let root = self.fs.normalize(Path::new(self.root))?;
        if !self.fs.exists(&root) {
            return Err(FindError::PathNotFound(root.display().to_string()));
        }

        if self.cmd.recurse {
            self.find(&root, 0)
        } else {
            self.search_single(&root)
        }
    }

    /// 非递归模式：报告根目录一次，然后是其中的匹配文件
    fn search_single(&mut self, root: &Path) -> Result<(), FindError> {
        writeln!(self.out, "  {}", root.display())?;
        if self.cmd.match_files {
            let matches = self.collect_matches(root);
            self.report_matches(&matches)?;
        }
        self.stats.processed_dirs += 1;
        Ok(())
    }

    /// 递归模式：深度优先遍历一个目录
    fn find(&mut self, dir: &Path, depth: usize) -> Result<(), FindError> {
        if depth > MAX_DEPTH {
            self.errors.record(ErrorType::DirRead);
            let _ = self
                .log
                .log_message(&format!("超过最大递归深度, 跳过: {}", dir.display()));
            return Ok(());
        }
        self.stats.processed_dirs += 1;

        let dir_display = dir.display().to_string();

        // 目录自身以完整路径参与正则匹配
        if self.cmd.match_dirs && !self.cap_reached() && self.matcher.is_match(&dir_display) {
            writeln!(self.out, "  {}", dir_display)?;
            self.reported += 1;
            let _ = self.log.log_match(&dir_display, "目录");
        }

        if self.cmd.match_files {
            let matches = self.collect_matches(dir);
            if !matches.is_empty() {
                writeln!(self.out, "  {}", dir_display)?;
                self.report_matches(&matches)?;
            }
        }

        let subdirs = match self.fs.list_directories(dir) {
            Ok(subdirs) => subdirs,
            Err(err) => {
                // 枚举失败只丢掉这棵子树，兄弟目录继续
                self.errors.record(ErrorType::DirRead);
                let _ = self
                    .log
                    .log_message(&format!("无法枚举子目录 {}: {}", dir_display, err));
                return Ok(());
            }
        };

        for name in subdirs {
            // 排除自身/上级伪条目
            if name == "." || name == ".." {
                continue;
            }
            if self.dir_filter.is_excluded(&name) {
                let _ = self
                    .log
                    .log_message(&format!("已跳过(目录排除): {}", dir.join(&name).display()));
                continue;
            }
            if self.cap_reached() {
                break;
            }
            self.find(&dir.join(&name), depth + 1)?;
        }
        Ok(())
    }

    /// 收集一个目录下的匹配文件，按模式顺序分组
    ///
    /// 同一文件被多个模式命中时重复出现，不做去重。
    fn collect_matches(&mut self, dir: &Path) -> Vec<MatchRecord> {
        let cmd = self.cmd;
        let mut matches = Vec::new();

        'patterns: for pattern in cmd.patterns() {
            let names = match self.fs.list_files(dir, pattern) {
                Ok(names) => names,
                Err(err) => {
                    let kind = match &err {
                        FindError::InvalidPattern(..) => ErrorType::BadPattern,
                        _ => ErrorType::DirRead,
                    };
                    self.errors.record(kind);
                    let _ = self.log.log_message(&format!(
                        "无法枚举 {} (模式 {}): {}",
                        dir.display(),
                        pattern,
                        err
                    ));
                    continue;
                }
            };

            for name in names {
                if self.cap_reached() {
                    break 'patterns;
                }
                if !self.matcher.is_match(&name) {
                    continue;
                }
                let date = if cmd.show_dates {
                    self.fetch_date(&dir.join(&name))
                } else {
                    None
                };
                self.stats.processed_files += 1;
                self.reported += 1;
                matches.push(MatchRecord { name, date });
            }
        }
        matches
    }

    /// 报告已收集的匹配条目
    fn report_matches(&mut self, matches: &[MatchRecord]) -> Result<(), FindError> {
        for record in matches {
            match &record.date {
                Some(date) => writeln!(self.out, "    {}  {}", date, record.name)?,
                None => writeln!(self.out, "    {}", record.name)?,
            }
            let _ = self.log.log_match(&record.name, "文件");
        }
        Ok(())
    }

    /// 取回并重排条目的修改时间，失败时只跳过该条目的日期标注
    fn fetch_date(&mut self, path: &Path) -> Option<String> {
        let raw = match self.fs.metadata_timestamp(path) {
            Ok(raw) => raw,
            Err(err) => {
                self.errors.record(ErrorType::MetadataRead);
                let _ = self
                    .log
                    .log_message(&format!("无法读取元数据 {}: {}", path.display(), err));
                return None;
            }
        };
        match reformat_timestamp(&raw) {
            Ok(date) => Some(date),
            Err(err) => {
                self.errors.record(ErrorType::BadTimestamp);
                let _ = self.log.log_message(&err.to_string());
                None
            }
        }
    }

    /// 报告条目数(文件 + 目录)是否已达 /n 上限
    fn cap_reached(&self) -> bool {
        self.cmd.max_items().map_or(false, |cap| self.reported >= cap)
    }
}
