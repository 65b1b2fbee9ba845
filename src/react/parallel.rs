//! 多分支并行探索
//!
//! 对同一问题、同一 Reasoner 并发跑 N 个互相独立的 TAO 循环（各自的步骤历史与上下文策略），
//! 全部结束后按评分选出最佳分支：-0.1 × iterations + 成功观察数 + （非哨兵答案时）10；同分取最早的分支。
//! 任一分支返回错误时，等所有分支结束后返回序号最小的那个错误。

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::Instrument;

use crate::config::ParallelSection;
use crate::core::AgentError;
use crate::llm::Reasoner;
use crate::react::context::{ContextStrategy, TranscriptContext};
use crate::react::{Orchestrator, ReactEvent, RunResult};
use crate::tools::Tool;

/// 默认分支数
pub const DEFAULT_PARALLEL_BRANCHES: usize = 3;

/// 为每个分支创建一份独立的上下文策略
pub type ContextFactory = Arc<dyn Fn() -> Box<dyn ContextStrategy> + Send + Sync>;

/// 并行探索结果：最佳分支的结果 + 全部分支（调试用）
#[derive(Debug, Clone, Serialize)]
pub struct ParallelRunResult {
    #[serde(flatten)]
    pub best: RunResult,
    /// 最佳分支序号（0 起）
    pub best_branch: usize,
    pub total_branches: usize,
    pub all_branches: Vec<RunResult>,
}

/// 分支评分
pub fn score_branch(result: &RunResult) -> f64 {
    let mut score = -0.1 * result.iterations as f64;
    score += result.successful_observations() as f64;
    if !result.hit_max_iterations() {
        score += 10.0;
    }
    score
}

/// 严格最高分的分支序号；同分时保留最早的；空输入返回 None
pub fn select_best(branches: &[RunResult]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, branch) in branches.iter().enumerate() {
        let score = score_branch(branch);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

pub struct ParallelExplorer {
    orchestrator: Orchestrator,
    branches: usize,
    context_factory: ContextFactory,
}

impl ParallelExplorer {
    /// branches 至少为 1
    pub fn new(orchestrator: Orchestrator, branches: usize) -> Self {
        Self {
            orchestrator,
            branches: branches.max(1),
            context_factory: Arc::new(|| Box::new(TranscriptContext) as Box<dyn ContextStrategy>),
        }
    }

    pub fn from_config(orchestrator: Orchestrator, section: &ParallelSection) -> Self {
        Self::new(orchestrator, section.branches)
    }

    /// 替换每个分支的上下文策略（如 WindowedContext，使分支各自带短期记忆）
    pub fn with_context_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ContextStrategy> + Send + Sync + 'static,
    {
        self.context_factory = Arc::new(factory);
        self
    }

    pub fn register_tool(&mut self, tool: impl Tool + 'static) {
        self.orchestrator.register_tool(tool);
    }

    pub fn branches(&self) -> usize {
        self.branches
    }

    pub async fn execute(
        &self,
        question: &str,
        reasoner: &dyn Reasoner,
    ) -> Result<ParallelRunResult, AgentError> {
        tracing::info!(branches = self.branches, "parallel exploration started");
        let runs = (0..self.branches).map(move |branch| {
            let mut context = (self.context_factory)();
            let span = tracing::info_span!("branch", branch);
            async move {
                self.orchestrator
                    .execute_with(question, reasoner, context.as_mut())
                    .await
            }
            .instrument(span)
        });

        let all_branches = join_all(runs)
            .await
            .into_iter()
            .collect::<Result<Vec<RunResult>, AgentError>>()?;

        for (branch, result) in all_branches.iter().enumerate() {
            let score = score_branch(result);
            tracing::debug!(branch, score, iterations = result.iterations, "branch scored");
            self.orchestrator
                .emit(ReactEvent::BranchScored { branch, score });
        }

        let best_branch = select_best(&all_branches).unwrap_or_default();
        let best = all_branches[best_branch].clone();
        tracing::info!(best_branch, answer = %best.answer, "parallel exploration finished");

        Ok(ParallelRunResult {
            best,
            best_branch,
            total_branches: all_branches.len(),
            all_branches,
        })
    }
}

impl Default for ParallelExplorer {
    fn default() -> Self {
        Self::new(Orchestrator::default(), DEFAULT_PARALLEL_BRANCHES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedReasoner;
    use crate::react::{Action, Observation, Step, Thought, MAX_ITERATIONS_ANSWER};
    use serde_json::json;

    fn step(success: bool) -> Step {
        Step {
            thought: Thought::new("t"),
            action: Action::tool_call("search", json!({})),
            observation: if success {
                Observation::success(json!(1))
            } else {
                Observation::failure("x")
            },
        }
    }

    #[test]
    fn test_score_branch() {
        let answered = RunResult::new("42", vec![step(true), step(false)], 3);
        assert!((score_branch(&answered) - (10.0 + 1.0 - 0.3)).abs() < 1e-9);
        let exhausted = RunResult::new(MAX_ITERATIONS_ANSWER, vec![step(true)], 10);
        assert!((score_branch(&exhausted) - (1.0 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_select_best_prefers_first_on_tie() {
        let a = RunResult::new("a", vec![], 1);
        let b = RunResult::new("b", vec![step(true)], 2);
        let c = RunResult::new("c", vec![step(true)], 2);
        assert_eq!(select_best(&[a.clone(), b, c]), Some(1));
        assert_eq!(select_best(&[a.clone(), a]), Some(0));
        assert_eq!(select_best(&[]), None);
    }

    #[tokio::test]
    async fn test_all_branches_answer_immediately() {
        let explorer = ParallelExplorer::default();
        let reasoner = ScriptedReasoner::new(["Final answer is: 7"]);
        let result = explorer.execute("q", &reasoner).await.unwrap();
        assert_eq!(result.total_branches, 3);
        assert_eq!(result.all_branches.len(), 3);
        assert_eq!(result.best_branch, 0);
        assert_eq!(result.best.answer, "7");
        for b in &result.all_branches {
            assert!((score_branch(b) - 9.9).abs() < 1e-9);
        }
        assert_eq!(reasoner.calls(), 3);
    }

    #[test]
    fn test_zero_branches_clamped_to_one() {
        let explorer = ParallelExplorer::new(Orchestrator::default(), 0);
        assert_eq!(explorer.branches(), 1);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let r = ParallelRunResult {
            best: RunResult::new("x", vec![], 1),
            best_branch: 0,
            total_branches: 1,
            all_branches: vec![RunResult::new("x", vec![], 1)],
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["answer"], json!("x"));
        assert_eq!(v["total_branches"], json!(1));
        assert_eq!(v["all_branches"].as_array().unwrap().len(), 1);
    }
}
