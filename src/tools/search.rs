//! Search 工具：把查询委托给 SearchBackend，只返回前 3 条结果与总数
//!
//! 真实的检索 I/O 由 SearchBackend 实现者负责；CannedSearchBackend 返回确定性的两条结果，供演示与测试。

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tools::Tool;

/// 返回给 Reasoner 的最大结果条数
const TOP_RESULTS: usize = 3;

/// 单条检索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// 检索后端：query → 全部命中
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, String>;
}

/// 固定结果后端：每个查询返回两条示例命中
#[derive(Debug, Default, Clone)]
pub struct CannedSearchBackend;

#[async_trait]
impl SearchBackend for CannedSearchBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, String> {
        Ok(vec![
            SearchHit {
                title: "Search Result 1".to_string(),
                snippet: format!("Relevant information about {}", query),
                url: "https://example.com/1".to_string(),
            },
            SearchHit {
                title: "Search Result 2".to_string(),
                snippet: format!("More details on {}", query),
                url: "https://example.com/2".to_string(),
            },
        ])
    }
}

/// Search 工具：input `{"query": "..."}`，output `{"results": [...≤3], "total": n}`
pub struct SearchTool {
    backend: Arc<dyn SearchBackend>,
}

impl SearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }
}

impl Default for SearchTool {
    fn default() -> Self {
        Self::new(Arc::new(CannedSearchBackend))
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search the web for information"
    }

    async fn execute(&self, input: Value) -> Result<Value, String> {
        let query = input
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim();
        if query.is_empty() {
            return Err("Missing query".to_string());
        }
        tracing::info!(query = %query, "search tool");
        let hits = self.backend.search(query).await?;
        let total = hits.len();
        let top: Vec<SearchHit> = hits.into_iter().take(TOP_RESULTS).collect();
        Ok(json!({
            "results": top,
            "total": total,
        }))
    }
}
