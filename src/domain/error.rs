use thiserror::Error;

/// 查找过程中可能出现的错误
#[derive(Debug, Error)]
pub enum FindError {
    /// 起始路径不存在，搜索开始前检查
    #[error("路径不存在: {0}")]
    PathNotFound(String),

    /// 时间戳格式无效，跳过该条目的日期标注
    #[error("时间戳格式无效: {0}")]
    MalformedTimestamp(String),

    /// 正则表达式无效，搜索开始前报告
    #[error("无效的正则表达式: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// 通配符模式无效，跳过该模式
    #[error("无效的通配符模式 {0}: {1}")]
    InvalidPattern(String, #[source] globset::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FindError {
    /// 是否为致命错误（需要中止整个运行）
    pub fn is_fatal(&self) -> bool {
        matches!(self, FindError::PathNotFound(_) | FindError::InvalidRegex(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(FindError::PathNotFound("/tmp/missing".to_string()).is_fatal());
        assert!(!FindError::MalformedTimestamp("garbage".to_string()).is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = FindError::PathNotFound("/tmp/missing".to_string());
        assert_eq!(err.to_string(), "路径不存在: /tmp/missing");
    }
}
