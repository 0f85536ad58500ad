use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::domain::cmdline::CmdLine;
use crate::domain::engine::RunStats;

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 回显解析后的配置 (/v)
pub fn write_cmdline(out: &mut dyn Write, cmd: &CmdLine) -> Result<()> {
    writeln!(out, "\n解析后的配置:")?;
    writeln!(out, "  路径:     {}", cmd.path())?;
    writeln!(out, "  模式:     {}", cmd.patterns().join(" "))?;
    writeln!(out, "  正则:     {}", cmd.regex())?;
    if let Some(cap) = cmd.max_items() {
        writeln!(out, "  条目上限: {}", cap)?;
    }
    if let Some(log_file) = cmd.log_file() {
        writeln!(out, "  日志文件: {}", log_file)?;
    }

    let mut flags = Vec::new();
    if cmd.recurse {
        flags.push("递归");
    }
    if cmd.match_files {
        flags.push("匹配文件");
    }
    if cmd.match_dirs {
        flags.push("匹配目录");
    }
    if cmd.show_dates {
        flags.push("显示日期");
    }
    writeln!(out, "  开关:     {}", flags.join(" "))?;

    Ok(())
}

/// 搜索摘要
pub struct SearchSummary {
    start_time: Instant,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// 从开始到现在经过的时间
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 输出摘要块
    pub fn print(&self, stats: RunStats) -> Result<()> {
        println!("\n搜索摘要:");
        println!("----------------------------");
        println!("总用时: {}", format_duration(self.elapsed()));
        println!("处理文件: {}", stats.processed_files);
        println!("处理目录: {}", stats.processed_dirs);

        Ok(())
    }
}
