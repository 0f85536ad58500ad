// 分层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{CmdLine, DirFilter, FindError, NameMatcher, RunStats, SearchEngine};
pub use application::Config;
pub use infrastructure::{ErrorTally, ErrorType, FileSystemTrait, LocalFileSystem, RunLog};
pub use presentation::SearchSummary;
