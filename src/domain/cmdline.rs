use std::io::{self, Write};

/// 选项记号的起始字符
const FLAG_MARKER: char = '/';
/// 未给出 /p 时使用的通配模式
pub const CATCH_ALL_PATTERN: &str = "*.*";
/// 未给出 /R 时使用的全匹配正则
pub const MATCH_ALL_REGEX: &str = ".*";

/// 解析后的命令行配置
///
/// 由 [`CmdLine::parse`] 在单次扫描中逐步构建，完成后不再变化。
/// 格式错误的输入不会导致解析失败，只会置位 `parse_error`，
/// 由调用方在搜索前检查。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CmdLine {
    path: Option<String>,
    patterns: Vec<String>,
    regex: Option<String>,
    max_items: Option<usize>,
    log_file: Option<String>,
    pub recurse: bool,
    pub match_files: bool,
    pub match_dirs: bool,
    pub show_dates: bool,
    pub verbose: bool,
    pub help: bool,
    parse_error: bool,
}

/// 记号扫描状态: 期待选项, 或期待指定选项的值
#[derive(Debug, Clone, Copy)]
enum ScanState {
    ExpectFlag,
    ExpectValue(char),
}

/// 取值选项与布尔选项的固定映射
fn takes_value(flag: char) -> bool {
    matches!(flag, 'P' | 'p' | 'n' | 'R' | 'F')
}

impl CmdLine {
    /// 从参数列表(不含程序名)解析出配置
    ///
    /// 每次调用独立扫描一份参数列表，重复解析同一列表得到相同结果。
    pub fn parse<S: AsRef<str>>(args: &[S]) -> CmdLine {
        let mut cmd = CmdLine::default();
        let mut state = ScanState::ExpectFlag;

        for token in args {
            let token = token.as_ref();
            match state {
                ScanState::ExpectValue(flag) => {
                    if token.starts_with(FLAG_MARKER) {
                        // 取值选项后面紧跟另一个选项，视为空值
                        cmd.apply_value(flag, "");
                        state = cmd.apply_flag_token(token);
                    } else {
                        cmd.apply_value(flag, token);
                        state = ScanState::ExpectFlag;
                    }
                }
                ScanState::ExpectFlag => {
                    if token.starts_with(FLAG_MARKER) {
                        state = cmd.apply_flag_token(token);
                    }
                    // 没有前导取值选项的多余记号被忽略
                }
            }
        }

        // 取值选项出现在末尾且没有值
        if let ScanState::ExpectValue(flag) = state {
            cmd.apply_value(flag, "");
        }

        cmd.finalize();
        cmd
    }

    /// 处理一个以 `/` 开头的选项记号，返回下一个扫描状态
    fn apply_flag_token(&mut self, token: &str) -> ScanState {
        let Some(flag) = token.chars().nth(1) else {
            // 只有 `/` 没有选项字符，忽略
            return ScanState::ExpectFlag;
        };

        if takes_value(flag) {
            return ScanState::ExpectValue(flag);
        }

        match flag {
            's' => self.recurse = true,
            'f' => self.match_files = true,
            'd' => self.match_dirs = true,
            'D' => self.show_dates = true,
            'v' => self.verbose = true,
            'h' => self.help = true,
            // 未识别的选项被忽略，保持向前兼容
            _ => {}
        }
        ScanState::ExpectFlag
    }

    /// 把值赋给对应的取值选项
    fn apply_value(&mut self, flag: char, value: &str) {
        if value.is_empty() {
            // /p 的空片段在拆分时跳过，其余取值选项空值视为格式错误
            if flag != 'p' {
                self.parse_error = true;
            }
            return;
        }

        match flag {
            'P' => self.path = Some(value.to_string()),
            'p' => {
                for patt in value.split(',').filter(|p| !p.is_empty()) {
                    self.add_pattern(patt);
                }
            }
            'n' => match value.parse::<usize>() {
                Ok(n) if n > 0 => self.max_items = Some(n),
                _ => self.parse_error = true,
            },
            'R' => self.regex = Some(value.to_string()),
            'F' => self.log_file = Some(value.to_string()),
            _ => {}
        }
    }

    /// 追加一个通配模式，首个显式模式会顶掉隐式的通配模式
    fn add_pattern(&mut self, patt: &str) {
        if self.patterns.len() == 1 && self.patterns[0] == CATCH_ALL_PATTERN {
            self.patterns.clear();
        }
        self.patterns.push(patt.to_string());
    }

    /// 扫描结束后补全默认值
    fn finalize(&mut self) {
        if self.patterns.is_empty() {
            self.patterns.push(CATCH_ALL_PATTERN.to_string());
        }
        if !self.match_files && !self.match_dirs && !self.parse_error {
            self.match_files = true;
        }
    }

    /// 起始路径，未指定时为当前目录
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(".")
    }

    /// 命令行上显式给出的起始路径
    pub fn explicit_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// 通配模式列表，完成后保证非空
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// 名称过滤正则，未指定时匹配所有
    pub fn regex(&self) -> &str {
        self.regex.as_deref().unwrap_or(MATCH_ALL_REGEX)
    }

    /// 报告条目数上限
    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    /// 运行日志文件路径
    pub fn log_file(&self) -> Option<&str> {
        self.log_file.as_deref()
    }

    /// 是否遇到格式错误的输入
    pub fn parse_error(&self) -> bool {
        self.parse_error
    }
}

/// 输出用法说明
pub fn usage(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "FindNames - 按名称查找文件或目录")?;
    writeln!(out)?;
    writeln!(
        out,
        "用法: FindNames [/P 路径] [/p 模式,模式,...] [/s] [/f] [/d] [/D] [/R 正则] [/n 数量] [/F 日志文件] [/v] [/h]"
    )?;
    writeln!(out, "  /P 路径       起始目录的相对或绝对路径 (默认 \".\")")?;
    writeln!(out, "  /p 模式       逗号分隔的通配模式, 如 *.rs,*.toml, 不含空格 (默认 *.*)")?;
    writeln!(out, "  /s            递归搜索子目录")?;
    writeln!(out, "  /f            匹配文件")?;
    writeln!(out, "  /d            匹配目录")?;
    writeln!(out, "  /D            显示文件日期")?;
    writeln!(out, "  /R 正则       用正则表达式过滤匹配项 (默认匹配所有)")?;
    writeln!(out, "  /n 数量       报告条目数上限")?;
    writeln!(out, "  /F 日志文件   运行日志的输出路径")?;
    writeln!(out, "  /v            搜索前回显解析后的配置")?;
    writeln!(out, "  /h            显示本帮助")?;
    writeln!(out)?;
    writeln!(out, "示例: FindNames /P ../.. /s /f /p *.rs,*.toml /R \"test|bench\"")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CmdLine {
        CmdLine::parse(args)
    }

    #[test]
    fn test_default_configuration() {
        let cmd = parse(&[]);
        assert_eq!(cmd.path(), ".");
        assert_eq!(cmd.patterns(), [CATCH_ALL_PATTERN.to_string()]);
        assert_eq!(cmd.regex(), MATCH_ALL_REGEX);
        assert!(cmd.match_files);
        assert!(!cmd.match_dirs);
        assert!(!cmd.recurse);
        assert!(!cmd.parse_error());
    }

    #[test]
    fn test_path_option() {
        let cmd = parse(&["/P", "../src"]);
        assert_eq!(cmd.path(), "../src");
        assert_eq!(cmd.explicit_path(), Some("../src"));
        assert!(!cmd.parse_error());
    }

    #[test]
    fn test_path_empty_value_is_error() {
        let cmd = parse(&["/P", ""]);
        assert!(cmd.parse_error());
    }

    #[test]
    fn test_patterns_split_on_comma() {
        let cmd = parse(&["/p", "a,b,c"]);
        assert_eq!(
            cmd.patterns(),
            ["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_patterns_accumulate_across_options() {
        let cmd = parse(&["/p", "*.rs", "/p", "*.toml"]);
        assert_eq!(cmd.patterns(), ["*.rs".to_string(), "*.toml".to_string()]);
    }

    #[test]
    fn test_empty_pattern_fragments_skipped() {
        // 空片段被跳过，列表在完成时恢复默认
        let cmd = parse(&["/p", ","]);
        assert_eq!(cmd.patterns(), [CATCH_ALL_PATTERN.to_string()]);
        assert!(!cmd.parse_error());
    }

    #[test]
    fn test_regex_option() {
        let cmd = parse(&["/R", "test|bench"]);
        assert_eq!(cmd.regex(), "test|bench");
    }

    #[test]
    fn test_regex_missing_value_is_error() {
        let cmd = parse(&["/R"]);
        assert!(cmd.parse_error());
    }

    #[test]
    fn test_regex_followed_by_flag_is_error() {
        let cmd = parse(&["/R", "/s"]);
        assert!(cmd.parse_error());
        // 后面的选项仍然生效
        assert!(cmd.recurse);
    }

    #[test]
    fn test_max_items() {
        let cmd = parse(&["/n", "42"]);
        assert_eq!(cmd.max_items(), Some(42));

        assert!(parse(&["/n", "abc"]).parse_error());
        assert!(parse(&["/n", "0"]).parse_error());
    }

    #[test]
    fn test_log_file() {
        let cmd = parse(&["/F", "run.log"]);
        assert_eq!(cmd.log_file(), Some("run.log"));
        assert!(parse(&["/F"]).parse_error());
    }

    #[test]
    fn test_boolean_flags() {
        let cmd = parse(&["/s", "/f", "/d", "/D", "/v", "/h"]);
        assert!(cmd.recurse);
        assert!(cmd.match_files);
        assert!(cmd.match_dirs);
        assert!(cmd.show_dates);
        assert!(cmd.verbose);
        assert!(cmd.help);
    }

    #[test]
    fn test_match_files_defaults_only_without_match_dirs() {
        let cmd = parse(&["/d"]);
        assert!(cmd.match_dirs);
        assert!(!cmd.match_files);
    }

    #[test]
    fn test_unrecognized_flag_ignored() {
        let cmd = parse(&["/z", "/s"]);
        assert!(cmd.recurse);
        assert!(!cmd.parse_error());
    }

    #[test]
    fn test_stray_value_ignored() {
        let cmd = parse(&["orphan", "/s"]);
        assert!(cmd.recurse);
        assert!(!cmd.parse_error());
    }

    #[test]
    fn test_bare_marker_ignored() {
        let cmd = parse(&["/"]);
        assert!(!cmd.parse_error());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let args = ["/P", "src", "/p", "*.rs,*.toml", "/s", "/R", "mod"];
        assert_eq!(CmdLine::parse(&args), CmdLine::parse(&args));
    }

    #[test]
    fn test_usage_mentions_every_flag() {
        let mut buf = Vec::new();
        usage(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        for flag in ["/P", "/p", "/s", "/f", "/d", "/D", "/R", "/n", "/F", "/v", "/h"] {
            assert!(text.contains(flag), "用法说明缺少 {}", flag);
        }
    }
}
