//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `TAO__*` 覆盖（双下划线表示嵌套，如 `TAO__AGENT__MAX_ITERATIONS=5`）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::core::AgentError;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentSection,
    pub memory: MemorySection,
    pub parallel: ParallelSection,
    pub llm: LlmSection,
}

/// [agent] 段：迭代上限与工具超时
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSection {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// 单次工具调用超时（秒）；None 表示不限时
    #[serde(default)]
    pub tool_timeout_secs: Option<u64>,
}

fn default_max_iterations() -> usize {
    10
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tool_timeout_secs: None,
        }
    }
}

/// [memory] 段：短期窗口大小、长期缓存容量与命中阈值
#[derive(Debug, Clone, Deserialize)]
pub struct MemorySection {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

fn default_window() -> usize {
    5
}

fn default_cache_capacity() -> usize {
    crate::memory::DEFAULT_CACHE_CAPACITY
}

fn default_similarity_threshold() -> f64 {
    crate::memory::DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for MemorySection {
    fn default() -> Self {
        Self {
            window: default_window(),
            cache_capacity: default_cache_capacity(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

/// [parallel] 段：并行分支数
#[derive(Debug, Clone, Deserialize)]
pub struct ParallelSection {
    #[serde(default = "default_branches")]
    pub branches: usize,
}

fn default_branches() -> usize {
    3
}

impl Default for ParallelSection {
    fn default() -> Self {
        Self {
            branches: default_branches(),
        }
    }
}

/// [llm] 段：Reasoner 后端选择
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// mock / openai / deepseek
    #[serde(default = "default_provider")]
    pub provider: String,
    /// 不设置时按 provider 取默认模型（openai: gpt-4o-mini，deepseek: DEEPSEEK_MODEL 或 deepseek-chat）
    #[serde(default)]
    pub model: Option<String>,
    /// 不设置时按 provider 取默认地址
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "mock".to_string()
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
        }
    }
}

/// 从 config 目录加载配置，环境变量 TAO__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 TAO__*（双下划线表示嵌套键）
///
/// 解析或类型错误统一返回 AgentError::Config
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, AgentError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("TAO")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    Ok(c.try_deserialize()?)
}
