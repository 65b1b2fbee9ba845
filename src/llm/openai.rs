//! OpenAI 兼容 API Reasoner
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（可配置 base_url）；每次 generate 发送单条 user 消息，取首条 choice 的 content。

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::Reasoner;

/// OpenAI 兼容 Reasoner：持有 Client、model 名与自定义端点
pub struct OpenAiReasoner {
    client: Client<OpenAIConfig>,
    model: String,
    base_url: Option<String>,
}

impl OpenAiReasoner {
    pub fn new(base_url: Option<&str>, model: &str, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_else(|| "sk-placeholder".to_string());

        let config = if let Some(url) = base_url {
            OpenAIConfig::new()
                .with_api_base(url)
                .with_api_key(api_key)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            base_url: base_url.map(String::from),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// None 表示 async-openai 的默认端点
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

#[async_trait]
impl Reasoner for OpenAiReasoner {
    async fn generate(&self, prompt: &str) -> Result<String, String> {
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.to_string())
            .build()
            .map_err(|e| e.to_string())?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(user)])
            .build()
            .map_err(|e| e.to_string())?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| e.to_string())?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "reasoner usage"
            );
        }

        Ok(response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}
