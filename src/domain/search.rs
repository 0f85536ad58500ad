use regex::Regex;

use crate::domain::error::FindError;

/// 名称过滤器
///
/// 包装一个编译好的正则表达式，整次运行只编译一次。
/// 使用非锚定搜索：正则匹配名称中的任意位置即算命中。
#[derive(Debug, Clone)]
pub struct NameMatcher {
    regex: Regex,
}

impl NameMatcher {
    /// 从正则字符串创建过滤器，正则无效时在搜索开始前报告
    pub fn new(pattern: &str) -> Result<Self, FindError> {
        let regex = Regex::new(pattern)?;
        Ok(Self { regex })
    }

    /// 检查名称或路径是否命中
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// 把元数据时间戳从 "月/日/年 时:分:秒" 重排为 "年/月/日 时:分:秒"
///
/// 缺少空格或斜杠分隔符时返回 [`FindError::MalformedTimestamp`]，
/// 调用方跳过该条目的日期标注即可，不应中止遍历。
pub fn reformat_timestamp(raw: &str) -> Result<String, FindError> {
    let malformed = || FindError::MalformedTimestamp(raw.to_string());

    let (date, time) = raw.split_once(' ').ok_or_else(malformed)?;
    let (rest, year) = date.rsplit_once('/').ok_or_else(malformed)?;
    let (month, day) = rest.rsplit_once('/').ok_or_else(malformed)?;

    Ok(format!("{}/{}/{} {}", year, month, day, time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cmdline::MATCH_ALL_REGEX;

    #[test]
    fn test_default_regex_matches_everything() {
        let matcher = NameMatcher::new(MATCH_ALL_REGEX).unwrap();
        assert!(matcher.is_match("main.rs"));
        assert!(matcher.is_match(""));
    }

    #[test]
    fn test_substring_match() {
        let matcher = NameMatcher::new("test|bench").unwrap();
        assert!(matcher.is_match("my_test_file.rs"));
        assert!(matcher.is_match("bench.log"));
        assert!(!matcher.is_match("main.rs"));
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        assert!(matches!(
            NameMatcher::new("["),
            Err(FindError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_reformat_timestamp() {
        assert_eq!(
            reformat_timestamp("6/1/2019 10:30:00").unwrap(),
            "2019/6/1 10:30:00"
        );
        assert_eq!(
            reformat_timestamp("12/31/2023 23:59:59").unwrap(),
            "2023/12/31 23:59:59"
        );
    }

    #[test]
    fn test_reformat_rejects_missing_space() {
        assert!(matches!(
            reformat_timestamp("garbage"),
            Err(FindError::MalformedTimestamp(_))
        ));
    }

    #[test]
    fn test_reformat_rejects_missing_slashes() {
        // 日期部分没有斜杠
        assert!(reformat_timestamp("6-1-2019 10:30:00").is_err());
        // 只有一个斜杠
        assert!(reformat_timestamp("6/2019 10:30:00").is_err());
    }
}
