//! Agent 错误类型
//!
//! 只有「会中止本次 execute」的故障才是 AgentError；工具层故障（未注册、执行失败、超时）
//! 一律被吸收进 Observation，不会出现在这里。

use thiserror::Error;

/// 推理循环中会向调用方传播的错误
#[derive(Error, Debug)]
pub enum AgentError {
    /// Reasoner 输出不符合 `tool_name(input)` 格式
    #[error("Invalid action format: {0}")]
    ActionParse(String),

    /// 括号内的参数不是合法 JSON
    #[error("Invalid action input: {0}")]
    InvalidActionInput(String),

    /// Reasoner 本身调用失败（网络、鉴权等）
    #[error("Reasoner error: {0}")]
    Reasoner(String),

    /// 配置文件或 TAO__* 环境变量无法解析
    #[error("Config error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for AgentError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl AgentError {
    /// 是否属于 Action 解析类故障（格式或参数）
    pub fn is_parse_fault(&self) -> bool {
        matches!(self, Self::ActionParse(_) | Self::InvalidActionInput(_))
    }
}
