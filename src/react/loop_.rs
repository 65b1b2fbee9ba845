//! TAO 主循环
//!
//! Think -> (终止判定) -> Act -> Observe -> 追加 Step -> 更新 context；最多 max_iterations 轮。
//! 工具故障被吸收进 Observation 继续循环；Action 解析失败与 Reasoner 失败直接向上返回。
//! 可选 event_tx：向前端推送 IterationStarted / Thought / ToolCall / Observation / FinalAnswer 等事件。

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::Instrument;

use crate::config::AgentSection;
use crate::core::{truncate_preview, AgentError, PREVIEW_CHARS};
use crate::llm::Reasoner;
use crate::react::context::{ContextStrategy, TranscriptContext};
use crate::react::planner::{extract_answer, is_final_answer, parse_action};
use crate::react::prompt::{build_action_prompt, build_thought_prompt};
use crate::react::{ReactEvent, RunResult, Step, Thought, MAX_ITERATIONS_ANSWER};
use crate::tools::{Tool, ToolExecutor, ToolRegistry};

/// 默认最大迭代次数
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// 推理编排器：持有工具注册表与迭代上限；每次 execute 的步骤历史互相独立
#[derive(Clone)]
pub struct Orchestrator {
    registry: Arc<ToolRegistry>,
    max_iterations: usize,
    tool_timeout_secs: Option<u64>,
    event_tx: Option<UnboundedSender<ReactEvent>>,
}

impl Orchestrator {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            registry: Arc::new(ToolRegistry::new()),
            max_iterations,
            tool_timeout_secs: None,
            event_tx: None,
        }
    }

    pub fn from_config(section: &AgentSection) -> Self {
        let mut orchestrator = Self::new(section.max_iterations);
        orchestrator.tool_timeout_secs = section.tool_timeout_secs;
        orchestrator
    }

    /// 设置单次工具调用超时；默认不限时
    pub fn with_tool_timeout_secs(mut self, secs: u64) -> Self {
        self.tool_timeout_secs = Some(secs);
        self
    }

    /// 设置事件推送通道
    pub fn with_event_tx(mut self, tx: UnboundedSender<ReactEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// 注册工具；同名覆盖。应在任何 execute 开始前完成注册
    pub fn register_tool(&mut self, tool: impl Tool + 'static) {
        Arc::make_mut(&mut self.registry).register(tool);
    }

    pub fn register_tool_arc(&mut self, tool: Arc<dyn Tool>) {
        Arc::make_mut(&mut self.registry).register_arc(tool);
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(crate) fn emit(&self, ev: ReactEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(ev);
        }
    }

    fn executor(&self) -> ToolExecutor {
        let executor = ToolExecutor::new(self.registry.clone());
        match self.tool_timeout_secs {
            Some(secs) => executor.with_timeout_secs(secs),
            None => executor,
        }
    }

    /// 以默认的全量追加上下文执行一次
    pub async fn execute(
        &self,
        question: &str,
        reasoner: &dyn Reasoner,
    ) -> Result<RunResult, AgentError> {
        let mut context = TranscriptContext;
        self.execute_with(question, reasoner, &mut context).await
    }

    /// 使用指定的上下文策略执行一次
    pub async fn execute_with(
        &self,
        question: &str,
        reasoner: &dyn Reasoner,
        context_strategy: &mut dyn ContextStrategy,
    ) -> Result<RunResult, AgentError> {
        let span = tracing::info_span!("tao_run", run_id = %uuid::Uuid::new_v4());
        self.run_loop(question, reasoner, context_strategy)
            .instrument(span)
            .await
    }

    async fn run_loop(
        &self,
        question: &str,
        reasoner: &dyn Reasoner,
        context_strategy: &mut dyn ContextStrategy,
    ) -> Result<RunResult, AgentError> {
        let executor = self.executor();
        let tools = self.registry.tool_descriptions();
        let mut history: Vec<Step> = Vec::new();
        let mut context = question.to_string();
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            tracing::info!(iteration = iterations, max = self.max_iterations, "iteration started");
            self.emit(ReactEvent::IterationStarted {
                iteration: iterations,
                max_iterations: self.max_iterations,
            });

            // Think
            let prompt = build_thought_prompt(&context, &history);
            tracing::debug!(prompt = %prompt, "thought prompt");
            let thought = Thought::new(reasoner.generate(&prompt).await.map_err(AgentError::Reasoner)?);
            self.emit(ReactEvent::Thought {
                text: thought.content.clone(),
            });

            if is_final_answer(&thought.content) {
                let answer = extract_answer(&thought.content);
                tracing::info!(iterations, answer = %answer, "final answer");
                self.emit(ReactEvent::FinalAnswer {
                    answer: answer.clone(),
                });
                return Ok(RunResult::new(answer, history, iterations));
            }

            // Act
            let prompt = build_action_prompt(&thought, &tools);
            tracing::debug!(prompt = %prompt, "action prompt");
            let output = reasoner.generate(&prompt).await.map_err(AgentError::Reasoner)?;
            let action = parse_action(&output).inspect_err(|e| {
                tracing::warn!(error = %e, "action parse failed, aborting run");
            })?;
            self.emit(ReactEvent::ToolCall {
                tool: action.tool.clone(),
                input: action.input.clone(),
            });

            // Observe
            let observation = executor.observe(&action).await;
            self.emit(ReactEvent::Observation {
                tool: action.tool.clone(),
                success: observation.success,
                preview: truncate_preview(&observation_text(&observation), PREVIEW_CHARS),
            });

            let step = Step {
                thought,
                action,
                observation,
            };
            context = context_strategy.update(question, &context, &step);
            history.push(step);
        }

        tracing::warn!(iterations, "reached max iterations without a final answer");
        self.emit(ReactEvent::MaxIterationsReached);
        Ok(RunResult::new(MAX_ITERATIONS_ANSWER, history, iterations))
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

fn observation_text(observation: &crate::react::Observation) -> String {
    match &observation.error {
        Some(err) => format!("Error: {}", err),
        None => observation.render_result(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedReasoner;
    use crate::tools::EchoTool;

    #[tokio::test]
    async fn test_final_answer_on_first_iteration() {
        let orchestrator = Orchestrator::default();
        let reasoner = ScriptedReasoner::new(["Final answer is: 42"]);
        let result = orchestrator.execute("what?", &reasoner).await.unwrap();
        assert_eq!(result.answer, "42");
        assert_eq!(result.iterations, 1);
        assert!(result.steps.is_empty());
        assert_eq!(reasoner.calls(), 1);
    }

    #[tokio::test]
    async fn test_max_iterations_sentinel() {
        let mut orchestrator = Orchestrator::new(3);
        orchestrator.register_tool(EchoTool);
        let reasoner = ScriptedReasoner::new(["keep going", r#"echo({"text":"hi"})"#]);
        let result = orchestrator.execute("loop", &reasoner).await.unwrap();
        assert_eq!(result.answer, MAX_ITERATIONS_ANSWER);
        assert!(result.hit_max_iterations());
        assert_eq!(result.iterations, 3);
        assert_eq!(result.steps.len(), 3);
        assert_eq!(reasoner.calls(), 6);
        assert!(result.steps.iter().all(|s| s.observation.success));
    }

    #[tokio::test]
    async fn test_unknown_tool_does_not_stop_loop() {
        let orchestrator = Orchestrator::new(5);
        let reasoner = ScriptedReasoner::new([
            "I need to search",
            r#"search({"query":"x"})"#,
            "Therefore, the answer is unknown",
        ]);
        let result = orchestrator.execute("q", &reasoner).await.unwrap();
        assert_eq!(result.steps.len(), 1);
        let obs = &result.steps[0].observation;
        assert!(!obs.success);
        assert_eq!(obs.error.as_deref(), Some("Tool search not found"));
        assert_eq!(result.iterations, 2);
        assert_eq!(result.answer, "unknown");
    }

    #[tokio::test]
    async fn test_parse_failure_is_fatal() {
        let orchestrator = Orchestrator::default();
        let reasoner = ScriptedReasoner::new(["thinking", "I refuse to pick a tool"]);
        let err = orchestrator.execute("q", &reasoner).await.unwrap_err();
        assert!(matches!(err, AgentError::ActionParse(_)));
    }

    #[tokio::test]
    async fn test_reasoner_failure_propagates() {
        let orchestrator = Orchestrator::default();
        let reasoner = ScriptedReasoner::new(Vec::<String>::new());
        let err = orchestrator.execute("q", &reasoner).await.unwrap_err();
        assert!(matches!(err, AgentError::Reasoner(_)));
    }

    #[tokio::test]
    async fn test_events_emitted() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let orchestrator = Orchestrator::default().with_event_tx(tx);
        let reasoner = ScriptedReasoner::new(["Final answer is: yes"]);
        orchestrator.execute("q", &reasoner).await.unwrap();
        drop(orchestrator);

        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        assert_eq!(
            events,
            vec![
                ReactEvent::IterationStarted { iteration: 1, max_iterations: 10 },
                ReactEvent::Thought { text: "Final answer is: yes".to_string() },
                ReactEvent::FinalAnswer { answer: "yes".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_observation_event_preview_truncated() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut orchestrator = Orchestrator::default().with_event_tx(tx);
        orchestrator.register_tool(EchoTool);
        let long = "y".repeat(300);
        let action = format!(r#"echo({{"text":"{}"}})"#, long);
        let reasoner = ScriptedReasoner::new(["echo it", action.as_str(), "Final answer is: done"]);
        let result = orchestrator.execute("q", &reasoner).await.unwrap();
        drop(orchestrator);

        let mut preview = None;
        while let Some(ev) = rx.recv().await {
            if let ReactEvent::Observation { preview: p, .. } = ev {
                preview = Some(p);
            }
        }
        let preview = preview.unwrap();
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
        assert!(preview.starts_with("\"yyy"));
        assert!(preview.ends_with("..."));
        // Step 中保留完整结果
        assert_eq!(result.steps[0].observation.result, Some(serde_json::json!(long)));
    }

    #[tokio::test]
    async fn test_second_thought_prompt_contains_transcript() {
        let mut orchestrator = Orchestrator::default();
        orchestrator.register_tool(EchoTool);
        let reasoner = ScriptedReasoner::new([
            "call echo",
            r#"echo({"text":"hello"})"#,
            "Final answer is: hello",
        ]);
        orchestrator.execute("say hello", &reasoner).await.unwrap();
        let prompts = reasoner.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[1].contains("- echo: Echo text"));
        assert!(prompts[2].contains("Context: say hello\n\nThought: call echo"));
        assert!(prompts[2].contains("Step 1:\n  Thought: call echo"));
        assert!(prompts[2].contains("Observation: \"hello\""));
    }
}
