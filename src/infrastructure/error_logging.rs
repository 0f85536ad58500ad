use std::collections::HashMap;
use std::path::Path;

/// 可恢复错误的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 目录枚举失败
    DirRead,
    /// 元数据读取失败
    MetadataRead,
    /// 通配模式无效
    BadPattern,
    /// 时间戳格式无效
    BadTimestamp,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DirRead => "目录枚举",
            ErrorType::MetadataRead => "元数据读取",
            ErrorType::BadPattern => "通配模式",
            ErrorType::BadTimestamp => "时间戳格式",
        }
    }
}

/// 可恢复错误计数器
///
/// 遍历中跳过的子树和条目在这里按类别计数，
/// 运行结束后输出摘要，详细信息在运行日志里。
#[derive(Debug, Default)]
pub struct ErrorTally {
    counts: HashMap<ErrorType, usize>,
}

impl ErrorTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次可恢复错误
    pub fn record(&mut self, error_type: ErrorType) {
        *self.counts.entry(error_type).or_insert(0) += 1;
    }

    /// 某一类错误的次数
    pub fn count(&self, error_type: ErrorType) -> usize {
        self.counts.get(&error_type).copied().unwrap_or(0)
    }

    /// 总错误数
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// 检查是否有错误
    pub fn has_errors(&self) -> bool {
        self.total() > 0
    }

    /// 打印错误摘要到控制台
    pub fn print_summary(&self, log_path: Option<&Path>) {
        if !self.has_errors() {
            return;
        }

        println!("\n搜索过程中发现错误:");
        println!("----------------------------");
        for (error_type, count) in &self.counts {
            println!("  {}: {} 次", error_type.as_str(), count);
        }
        println!("  总计: {} 个错误", self.total());
        if let Some(path) = log_path {
            println!("  详细错误信息请查看: {}", path.display());
        }
    }
}
