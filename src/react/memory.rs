//! 带记忆的编排器
//!
//! 在 Orchestrator 外层加两件事：
//! - 短期：用 WindowedContext 替代全量追加，prompt 只带最近 N 步思考（跨多次 execute 保留，reset 清空）；
//! - 长期：按问题词集 Jaccard 相似度查缓存，命中则直接返回（iterations = 0，不调用 Reasoner），否则执行后写入缓存。
//!
//! 状态由 &mut self 串行修改；多调用方共享时由外层加锁。

use crate::config::MemorySection;
use crate::core::AgentError;
use crate::llm::Reasoner;
use crate::memory::AnswerCache;
use crate::react::context::WindowedContext;
use crate::react::{Orchestrator, ReactEvent, RunResult};
use crate::tools::Tool;

/// 默认短期记忆窗口
pub const DEFAULT_MEMORY_WINDOW: usize = 5;

pub struct MemoryAgent {
    orchestrator: Orchestrator,
    context: WindowedContext,
    cache: AnswerCache,
}

impl MemoryAgent {
    pub fn new(max_iterations: usize, memory_window: usize) -> Self {
        Self::with_orchestrator(
            Orchestrator::new(max_iterations),
            memory_window,
            AnswerCache::default(),
        )
    }

    pub fn with_orchestrator(
        orchestrator: Orchestrator,
        memory_window: usize,
        cache: AnswerCache,
    ) -> Self {
        Self {
            orchestrator,
            context: WindowedContext::new(memory_window),
            cache,
        }
    }

    pub fn from_config(orchestrator: Orchestrator, section: &MemorySection) -> Self {
        Self::with_orchestrator(
            orchestrator,
            section.window,
            AnswerCache::new(section.cache_capacity, section.similarity_threshold),
        )
    }

    pub fn register_tool(&mut self, tool: impl Tool + 'static) {
        self.orchestrator.register_tool(tool);
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub async fn execute(
        &mut self,
        question: &str,
        reasoner: &dyn Reasoner,
    ) -> Result<RunResult, AgentError> {
        if let Some((key, cached)) = self.cache.lookup(question) {
            tracing::info!(question = %question, cached_question = %key, "long-term cache hit");
            let mut result = cached.clone();
            result.iterations = 0;
            result.from_cache = true;
            self.orchestrator.emit(ReactEvent::CacheHit {
                question: key.to_string(),
            });
            return Ok(result);
        }

        let result = self
            .orchestrator
            .execute_with(question, reasoner, &mut self.context)
            .await?;
        self.cache.insert(question, result.clone());
        Ok(result)
    }

    /// 清空短期窗口与长期缓存
    pub fn reset(&mut self) {
        self.context.clear();
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// 短期窗口中的思考原文（旧 → 新）
    pub fn recent_thoughts(&self) -> Vec<String> {
        self.context.window().thoughts()
    }
}

impl Default for MemoryAgent {
    fn default() -> Self {
        Self::new(crate::react::DEFAULT_MAX_ITERATIONS, DEFAULT_MEMORY_WINDOW)
    }
}
