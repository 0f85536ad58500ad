use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用程序配置
///
/// 提供命令行未给出时的默认值，命令行选项始终优先。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 搜索相关配置
    pub search: SearchConfig,
    /// 排除规则配置
    pub exclude: ExcludeConfig,
}

/// 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// 未给出 /P 时使用的起始路径
    pub default_search_path: String,
}

/// 排除规则配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludeConfig {
    /// 递归时跳过的目录名
    pub default_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                default_search_path: ".".to_string(),
            },
            exclude: ExcludeConfig {
                default_dirs: vec![
                    ".git".to_string(),
                    "node_modules".to_string(),
                    "target".to_string(),
                ],
            },
        }
    }
}

impl Config {
    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            println!("已创建默认配置文件: {}", config_path.display());
            Ok(config)
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("无法获取程序路径")?;

        let exe_dir = exe_path.parent().context("无法获取程序目录")?;

        Ok(exe_dir.join("config.toml"))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.search.default_search_path.is_empty() {
            anyhow::bail!("default_search_path 不能为空");
        }

        for name in &self.exclude.default_dirs {
            if name.contains('/') || name.contains('\\') {
                anyhow::bail!("排除目录名不能包含路径分隔符: {}", name);
            }
        }

        Ok(())
    }
}
