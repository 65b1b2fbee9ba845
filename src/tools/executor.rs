//! 工具执行器
//!
//! 持有 ToolRegistry 与可选超时，observe(action) 把一次工具调用变成 Observation：
//! 未注册、执行失败、超时都记为 success=false，从不向上抛错；每次调用输出结构化审计日志（JSON）。

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::core::{truncate_preview, PREVIEW_CHARS};
use crate::react::{Action, Observation};
use crate::tools::ToolRegistry;

/// 工具执行器：按名分发，并把结果映射为 Observation
#[derive(Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    timeout: Option<Duration>,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: None,
        }
    }

    /// 设置单次工具调用超时；默认不限时
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn observe(&self, action: &Action) -> Observation {
        let start = Instant::now();
        let tool_name = action.tool.as_str();

        let (observation, outcome) = match self.registry.get(tool_name) {
            None => (
                Observation::failure(format!("Tool {} not found", tool_name)),
                "not_found",
            ),
            Some(tool) => {
                let call = tool.execute(action.input.clone());
                let result = match self.timeout {
                    Some(limit) => timeout(limit, call).await.map_err(|_| limit),
                    None => Ok(call.await),
                };
                match result {
                    Ok(Ok(value)) => (Observation::success(value), "ok"),
                    Ok(Err(message)) => (Observation::failure(message), "error"),
                    Err(limit) => (
                        Observation::failure(format!(
                            "Tool {} timed out after {}s",
                            tool_name,
                            limit.as_secs()
                        )),
                        "timeout",
                    ),
                }
            }
        };

        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": tool_name,
            "ok": observation.success,
            "outcome": outcome,
            "duration_ms": start.elapsed().as_millis() as u64,
            "input_preview": truncate_preview(&action.input.to_string(), PREVIEW_CHARS),
        });
        tracing::info!(audit = %audit, "tool");
        if let Some(err) = &observation.error {
            tracing::warn!(tool = %tool_name, error = %err, "tool call failed");
        }

        observation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::tools::Tool;

    struct Failing;

    #[async_trait]
    impl Tool for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        async fn execute(&self, _input: Value) -> Result<Value, String> {
            Err("backend unavailable".to_string())
        }
    }

    struct Slow;

    #[async_trait]
    impl Tool for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        fn description(&self) -> &str {
            "sleeps"
        }

        async fn execute(&self, _input: Value) -> Result<Value, String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(json!("late"))
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failed_observation() {
        let exec = ToolExecutor::new(Arc::new(ToolRegistry::new()));
        let obs = exec.observe(&Action::tool_call("search", json!({}))).await;
        assert!(!obs.success);
        assert_eq!(obs.error.as_deref(), Some("Tool search not found"));
        assert!(obs.result.is_none());
    }

    #[tokio::test]
    async fn test_tool_error_message_captured() {
        let mut reg = ToolRegistry::new();
        reg.register(Failing);
        let exec = ToolExecutor::new(Arc::new(reg));
        let obs = exec.observe(&Action::tool_call("failing", json!({}))).await;
        assert!(!obs.success);
        assert_eq!(obs.error.as_deref(), Some("backend unavailable"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_failed_observation() {
        let mut reg = ToolRegistry::new();
        reg.register(Slow);
        let exec = ToolExecutor::new(Arc::new(reg)).with_timeout_secs(1);
        let obs = exec.observe(&Action::tool_call("slow", json!({}))).await;
        assert!(!obs.success);
        assert_eq!(obs.error.as_deref(), Some("Tool slow timed out after 1s"));
    }
}
