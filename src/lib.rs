//! Tao - Thought → Action → Observation 推理循环
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型
//! - **llm**: Reasoner 抽象与实现（OpenAI 兼容 / DeepSeek / Mock / 脚本化）
//! - **memory**: 短期窗口与长期答案缓存
//! - **observability**: 日志初始化
//! - **react**: TAO 主循环、记忆扩展、并行多分支探索
//! - **tools**: 工具契约、注册表、执行器与内置工具（search、database、echo）

pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod react;
pub mod tools;

pub use crate::core::AgentError;
pub use llm::Reasoner;
pub use react::{MemoryAgent, Orchestrator, ParallelExplorer, ParallelRunResult, RunResult};
pub use tools::{Tool, ToolRegistry};
