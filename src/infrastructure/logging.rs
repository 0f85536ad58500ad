use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;

/// 运行日志
///
/// 仅在命令行给出 /F 时启用；未启用的实例所有操作都是空操作。
/// 运行是单线程的，不需要锁。
pub struct RunLog {
    file: Option<File>,
    path: PathBuf,
}

impl RunLog {
    /// 创建运行日志，`path` 为 None 时返回禁用的实例
    pub fn new(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                file: None,
                path: PathBuf::new(),
            });
        };
        let path = PathBuf::from(path);

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        file.write_all(&[0xEF, 0xBB, 0xBF])?;

        let now = Local::now();
        writeln!(file, "# FindNames 运行日志")?;
        writeln!(file, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "# --------------------------------------------")?;

        println!("日志文件已创建: {}", path.display());

        Ok(Self {
            file: Some(file),
            path,
        })
    }

    /// 检查日志是否已启用
    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// 已启用时返回日志文件路径
    pub fn path(&self) -> Option<&Path> {
        self.file.is_some().then_some(self.path.as_path())
    }

    /// 记录一般消息
    pub fn log_message(&mut self, message: &str) -> Result<()> {
        if let Some(file) = &mut self.file {
            let now = Local::now();
            writeln!(file, "[{}] {}", now.format("%Y-%m-%d %H:%M:%S%.3f"), message)?;
            // 确保立即写入磁盘
            file.flush()?;
        }
        Ok(())
    }

    /// 记录一个匹配条目
    pub fn log_match(&mut self, name: &str, kind: &str) -> Result<()> {
        if let Some(file) = &mut self.file {
            writeln!(file, "{}, {}", name, kind)?;
            file.flush()?;
        }
        Ok(())
    }

    /// 写入结束统计
    pub fn finalize(
        &mut self,
        processed_files: u64,
        processed_dirs: u64,
        duration: Duration,
    ) -> Result<()> {
        if let Some(file) = &mut self.file {
            let now = Local::now();
            writeln!(file)?;
            writeln!(file, "# --------------------------------------------")?;
            writeln!(file, "# 搜索完成")?;
            writeln!(file, "# 结束时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
            writeln!(file, "# 处理文件数: {}", processed_files)?;
            writeln!(file, "# 处理目录数: {}", processed_dirs)?;
            writeln!(file, "# 总耗时: {:.3}秒", duration.as_secs_f64())?;
            file.flush()?;

            println!("完整日志已保存到: {}", self.path.display());
        }
        Ok(())
    }
}
