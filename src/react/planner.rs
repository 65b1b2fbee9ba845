//! Reasoner 输出解析：终止判定、答案提取、Action 解析
//!
//! Action 线格式为 `tool_name(json)`，括号内为空时视为 `{}`；不符合格式或 JSON 非法时返回 AgentError（致命）。

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::core::AgentError;
use crate::react::Action;

/// 出现任一短语（小写比较）即视为最终答案
pub const FINAL_ANSWER_INDICATORS: [&str; 4] =
    ["final answer is", "therefore, the answer", "结论是", "最终答案"];

static ACTION_RE: OnceLock<Regex> = OnceLock::new();
static ANSWER_RE: OnceLock<Regex> = OnceLock::new();

fn action_re() -> &'static Regex {
    ACTION_RE.get_or_init(|| Regex::new(r"([A-Za-z0-9_]+)\((.*)\)").unwrap())
}

fn answer_re() -> &'static Regex {
    ANSWER_RE.get_or_init(|| Regex::new(r"(?i)(?:answer is|答案是)[:\s]*(.+)").unwrap())
}

pub fn is_final_answer(thought: &str) -> bool {
    let content = thought.to_lowercase();
    FINAL_ANSWER_INDICATORS
        .iter()
        .any(|indicator| content.contains(indicator))
}

/// 取 `answer is` / `答案是` 之后的内容（同一行，去首尾空白）；匹配不到则原样返回
pub fn extract_answer(thought: &str) -> String {
    answer_re()
        .captures(thought)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| thought.to_string())
}

pub fn parse_action(output: &str) -> Result<Action, AgentError> {
    let caps = action_re()
        .captures(output)
        .ok_or_else(|| AgentError::ActionParse(output.to_string()))?;
    let tool = caps[1].to_string();
    let raw = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    let input: Value = if raw.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(raw)
            .map_err(|e| AgentError::InvalidActionInput(format!("{}: {}", e, raw)))?
    };
    Ok(Action::tool_call(tool, input))
}
