//! 推理过程事件：用于向前端或日志推送思考、工具调用、观察与结论

use serde::Serialize;

/// 单步过程事件（可序列化为 JSON）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactEvent {
    /// 开始第几轮迭代
    IterationStarted { iteration: usize, max_iterations: usize },
    /// Reasoner 给出的思考原文
    Thought { text: String },
    /// 调用工具
    ToolCall {
        tool: String,
        input: serde_json::Value,
    },
    /// 工具返回（预览，避免过长）
    Observation {
        tool: String,
        success: bool,
        preview: String,
    },
    /// 得出最终答案
    FinalAnswer { answer: String },
    /// 用尽迭代次数
    MaxIterationsReached,
    /// 长期缓存命中，未调用 Reasoner
    CacheHit { question: String },
    /// 并行分支评分
    BranchScored { branch: usize, score: f64 },
}
