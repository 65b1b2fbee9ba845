//! 短期记忆：最近 N 个 Step 的 FIFO 窗口
//!
//! 只用于把最近的思考渲染进 prompt；超出容量时淘汰最旧的一条。

use std::collections::VecDeque;

use crate::react::Step;

#[derive(Clone, Debug)]
pub struct ShortTermWindow {
    steps: VecDeque<Step>,
    capacity: usize,
}

impl ShortTermWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            steps: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push_back(step);
        while self.steps.len() > self.capacity {
            self.steps.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// 窗口内各 Step 的思考原文（旧 → 新）
    pub fn thoughts(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.thought.content.clone()).collect()
    }

    /// 渲染为 prompt 片段：每行 `Memory i: <thought>`
    pub fn to_prompt_section(&self) -> String {
        let mut s = String::from("Recent memory:\n");
        for (i, step) in self.steps.iter().enumerate() {
            s.push_str(&format!("Memory {}: {}\n", i + 1, step.thought.content));
        }
        s
    }
}

impl Default for ShortTermWindow {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::react::{Action, Observation, Thought};
    use serde_json::json;

    fn step(n: usize) -> Step {
        Step {
            thought: Thought::new(format!("t{}", n)),
            action: Action::tool_call("echo", json!({})),
            observation: Observation::success(json!(n)),
        }
    }

    #[test]
    fn test_evicts_oldest() {
        let mut w = ShortTermWindow::new(2);
        for n in 1..=4 {
            w.push(step(n));
        }
        assert_eq!(w.len(), 2);
        assert_eq!(w.thoughts(), vec!["t3", "t4"]);
    }

    #[test]
    fn test_prompt_section() {
        let mut w = ShortTermWindow::new(5);
        w.push(step(1));
        w.push(step(2));
        assert_eq!(
            w.to_prompt_section(),
            "Recent memory:\nMemory 1: t1\nMemory 2: t2\n"
        );
    }
}
