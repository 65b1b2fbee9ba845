//! Prompt 渲染：历史只在 prompt 边界被格式化成文本

use crate::react::{Step, Thought};

/// 单个 Step 的三行文本（Thought / Action / Observation）
pub fn render_step(step: &Step) -> String {
    format!(
        "Thought: {}\nAction: {}\nObservation: {}",
        step.thought.content,
        step.action.render(),
        step.observation.render_result()
    )
}

/// 思考阶段 prompt：上下文 + 全部历史步骤
pub fn build_thought_prompt(context: &str, history: &[Step]) -> String {
    let mut prompt = format!(
        "Given the current context, think about what to do next.\n\nContext: {}\n\n",
        context
    );
    if !history.is_empty() {
        prompt.push_str("Previous steps:\n");
        for (i, step) in history.iter().enumerate() {
            prompt.push_str(&format!(
                "Step {}:\n  Thought: {}\n  Action: {}\n  Observation: {}\n",
                i + 1,
                step.thought.content,
                step.action.render(),
                step.observation.render_result()
            ));
        }
    }
    prompt.push_str("\nThought:");
    prompt
}

/// 行动阶段 prompt：本轮思考 + 可用工具列表
pub fn build_action_prompt(thought: &Thought, tools: &[(String, String)]) -> String {
    let tool_list = tools
        .iter()
        .map(|(name, description)| format!("- {}: {}", name, description))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Based on your thought, choose an action.\n\nThought: {}\n\nAvailable tools:\n{}\n\nAction (format: tool_name(input)):",
        thought.content, tool_list
    )
}
