//! Reasoner 抽象
//!
//! 推理循环只依赖「给 prompt，拿回文本」这一能力；后端可以是 OpenAI 兼容 API、脚本化回复或任意实现。

use async_trait::async_trait;

/// 文本生成能力：generate(prompt) → text，失败时返回可读错误信息
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, String>;
}

