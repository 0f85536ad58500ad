use std::env;
use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};

use FindNames::application::Config;
use FindNames::domain::cmdline::{self, CmdLine};
use FindNames::domain::engine::{DirFilter, SearchEngine};
use FindNames::infrastructure::error_logging::ErrorTally;
use FindNames::infrastructure::filesystem::LocalFileSystem;
use FindNames::infrastructure::logging::RunLog;
use FindNames::presentation::display::{self, SearchSummary};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut out = io::stdout().lock();

    // 无参数或请求帮助时显示用法，以非零状态退出
    if args.is_empty() {
        cmdline::usage(&mut out)?;
        process::exit(1);
    }

    let cmd = CmdLine::parse(&args);
    if cmd.help {
        cmdline::usage(&mut out)?;
        process::exit(1);
    }
    if cmd.parse_error() {
        writeln!(out, "命令行解析失败")?;
        cmdline::usage(&mut out)?;
        process::exit(1);
    }

    // 配置文件提供命令行未覆盖的默认值
    let config = Config::load_or_create(&Config::default_config_path()?)?;
    config.validate()?;

    let root = cmd
        .explicit_path()
        .unwrap_or(&config.search.default_search_path)
        .to_string();

    if cmd.verbose {
        display::write_cmdline(&mut out, &cmd)?;
    }

    // 初始化运行日志并记录搜索参数
    let mut log = RunLog::new(cmd.log_file()).context("无法创建运行日志")?;
    if log.is_enabled() {
        let _ = log.log_message(&format!("起始路径: {}", root));
        let _ = log.log_message(&format!("通配模式: {}", cmd.patterns().join(",")));
        let _ = log.log_message(&format!("正则: {}", cmd.regex()));
    }

    let fs = LocalFileSystem;
    let mut errors = ErrorTally::new();
    let dir_filter = DirFilter::new(config.exclude.default_dirs.clone());
    let summary = SearchSummary::new();

    let mut engine = match SearchEngine::new(
        &cmd,
        &root,
        &fs,
        dir_filter,
        &mut out,
        &mut log,
        &mut errors,
    ) {
        Ok(engine) => engine,
        Err(err) => {
            writeln!(out, "{}", err)?;
            process::exit(1);
        }
    };

    let search_result = engine.search();
    let stats = engine.stats();
    drop(engine);

    if let Err(err) = search_result {
        writeln!(out, "{}", err)?;
        process::exit(1);
    }

    // 输出摘要与错误统计，写入日志尾部
    summary.print(stats)?;
    errors.print_summary(log.path());
    let _ = log.finalize(stats.processed_files, stats.processed_dirs, summary.elapsed());

    Ok(())
}
