//! 测试 / 演示用 Reasoner（无需 API）
//!
//! - MockReasoner：第一轮思考就给出最终答案（回显问题首行）。
//! - ScriptedReasoner：按顺序返回预置回复，脚本用完后循环；记录每次收到的 prompt。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::Reasoner;

/// Mock：总是立即给出最终答案
#[derive(Debug, Default)]
pub struct MockReasoner;

#[async_trait]
impl Reasoner for MockReasoner {
    async fn generate(&self, prompt: &str) -> Result<String, String> {
        let question = prompt
            .lines()
            .find_map(|l| l.strip_prefix("Context: "))
            .unwrap_or("(no input)");
        Ok(format!("Final answer is: Echo from Mock: {}", question))
    }
}

/// 脚本化 Reasoner：第 n 次调用返回 script[n % len]
#[derive(Debug, Default)]
pub struct ScriptedReasoner {
    script: Vec<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedReasoner {
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: script.into_iter().map(Into::into).collect(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// 已被调用的次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 已收到的全部 prompt（按调用顺序）
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Reasoner for ScriptedReasoner {
    async fn generate(&self, prompt: &str) -> Result<String, String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.script.is_empty() {
            return Err("empty script".to_string());
        }
        Ok(self.script[n % self.script.len()].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_cycles_and_records() {
        let r = ScriptedReasoner::new(["a", "b"]);
        assert_eq!(r.generate("p1").await.unwrap(), "a");
        assert_eq!(r.generate("p2").await.unwrap(), "b");
        assert_eq!(r.generate("p3").await.unwrap(), "a");
        assert_eq!(r.calls(), 3);
        assert_eq!(r.prompts(), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_mock_answers_immediately() {
        let out = MockReasoner
            .generate("Given...\n\nContext: what is rust\n\nThought:")
            .await
            .unwrap();
        assert!(out.to_lowercase().contains("final answer is"));
        assert!(out.contains("what is rust"));
    }
}
