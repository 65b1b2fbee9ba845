//! LLM 层：Reasoner 抽象与实现（OpenAI 兼容 / DeepSeek / Mock / 脚本化）

pub mod deepseek;
pub mod mock;
pub mod openai;
pub mod traits;

pub use deepseek::{create_deepseek_reasoner, DEEPSEEK_CHAT, DEEPSEEK_REASONER};
pub use mock::{MockReasoner, ScriptedReasoner};
pub use openai::OpenAiReasoner;
pub use traits::Reasoner;

use std::sync::Arc;

use crate::config::LlmSection;

/// openai provider 未指定 model 时的默认模型
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// 按 [llm].provider 创建 Reasoner；未知 provider 回退到 Mock
pub fn create_reasoner(section: &LlmSection) -> Arc<dyn Reasoner> {
    match remote_reasoner(section) {
        Some(reasoner) => Arc::new(reasoner),
        None => {
            if section.provider != "mock" {
                tracing::warn!(provider = %section.provider, "unknown llm provider, falling back to mock");
            }
            Arc::new(MockReasoner)
        }
    }
}

/// openai / deepseek 走 OpenAI 兼容客户端，[llm].model 与 [llm].base_url 对两者都生效；其余 provider 返回 None
fn remote_reasoner(section: &LlmSection) -> Option<OpenAiReasoner> {
    let model = section.model.as_deref();
    let base_url = section.base_url.as_deref();
    match section.provider.as_str() {
        "openai" => Some(OpenAiReasoner::new(
            base_url,
            model.unwrap_or(DEFAULT_OPENAI_MODEL),
            None,
        )),
        "deepseek" => Some(create_deepseek_reasoner(model, base_url)),
        _ => None,
    }
}
