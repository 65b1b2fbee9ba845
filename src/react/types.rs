//! TAO 循环的数据模型：Thought / Action / Observation / Step / RunResult
//!
//! 全部创建后不可变；Step 按顺序追加，顺序会被回放进后续 prompt。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 达到最大迭代次数仍未得出结论时返回的固定答案
pub const MAX_ITERATIONS_ANSWER: &str = "达到最大迭代次数，未能完全解决问题";

/// Action 的唯一类型标签
pub const ACTION_KIND_TOOL_CALL: &str = "tool_call";

/// 一次思考：Reasoner 返回的原文与生成时间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Thought {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// 从 Reasoner 输出解析出的工具调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    pub tool: String,
    pub input: Value,
}

impl Action {
    pub fn tool_call(tool: impl Into<String>, input: Value) -> Self {
        Self {
            kind: ACTION_KIND_TOOL_CALL.to_string(),
            tool: tool.into(),
            input,
        }
    }

    /// 线格式 `tool(input)`，与解析器接受的格式一致
    pub fn render(&self) -> String {
        format!("{}({})", self.tool, self.input)
    }
}

/// 工具调用结果；失败时 result 为 None，error 带原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub result: Option<Value>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Observation {
    pub fn success(result: Value) -> Self {
        Self {
            result: Some(result),
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            result: None,
            success: false,
            error: Some(error.into()),
        }
    }

    /// result 的 JSON 文本；无结果时为 `null`
    pub fn render_result(&self) -> String {
        match &self.result {
            Some(v) => v.to_string(),
            None => "null".to_string(),
        }
    }
}

/// 一次完整（未终止）的 TAO 迭代
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub thought: Thought,
    pub action: Action,
    pub observation: Observation,
}

/// 一次 execute 的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub answer: String,
    pub steps: Vec<Step>,
    pub iterations: usize,
    /// 由长期缓存直接返回（未调用 Reasoner）
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub from_cache: bool,
}

impl RunResult {
    pub fn new(answer: impl Into<String>, steps: Vec<Step>, iterations: usize) -> Self {
        Self {
            answer: answer.into(),
            steps,
            iterations,
            from_cache: false,
        }
    }

    /// 是否以最大迭代哨兵答案结束
    pub fn hit_max_iterations(&self) -> bool {
        self.answer == MAX_ITERATIONS_ANSWER
    }

    pub fn successful_observations(&self) -> usize {
        self.steps.iter().filter(|s| s.observation.success).count()
    }
}
