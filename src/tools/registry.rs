//! 工具注册表
//!
//! 所有工具实现 Tool trait（name / description / execute），由 ToolRegistry 按名注册与查找。
//! 同名重复注册会覆盖旧工具，但保留其在列表中的原始位置。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// 工具 trait：名称、描述（供 Reasoner 选择工具）、异步执行（输入输出均为 JSON）
#[async_trait]
pub trait Tool: Send + Sync {
    /// 工具名称（Action 中 `name(args)` 的 name）
    fn name(&self) -> &str;

    /// 工具描述（拼入 Action prompt）
    fn description(&self) -> &str;

    /// 执行工具；失败时返回可读错误信息
    async fn execute(&self, input: Value) -> Result<Value, String>;
}

/// 工具注册表：按名称存储 Arc<dyn Tool>，按注册顺序列出
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.register_arc(Arc::new(tool));
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        } else {
            tracing::debug!(tool = %name, "tool re-registered, previous entry replaced");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// 返回 (name, description) 列表，用于生成 prompt 中的 Available tools 段落
    pub fn tool_descriptions(&self) -> Vec<(String, String)> {
        self.order
            .iter()
            .filter_map(|name| {
                self.tools
                    .get(name)
                    .map(|t| (name.clone(), t.description().to_string()))
            })
            .collect()
    }
}
