//! 推理层：TAO 数据模型、输出解析、prompt 渲染、主循环，以及记忆与并行两种扩展

pub mod context;
pub mod events;
pub mod loop_;
pub mod memory;
pub mod parallel;
pub mod planner;
pub mod prompt;
pub mod types;

pub use context::{ContextStrategy, TranscriptContext, WindowedContext};
pub use events::ReactEvent;
pub use loop_::{Orchestrator, DEFAULT_MAX_ITERATIONS};
pub use memory::{MemoryAgent, DEFAULT_MEMORY_WINDOW};
pub use parallel::{
    score_branch, select_best, ContextFactory, ParallelExplorer, ParallelRunResult,
    DEFAULT_PARALLEL_BRANCHES,
};
pub use planner::{extract_answer, is_final_answer, parse_action};
pub use types::{
    Action, Observation, RunResult, Step, Thought, ACTION_KIND_TOOL_CALL, MAX_ITERATIONS_ANSWER,
};
