//! LLM API 客户端
//!
//! 只负责"把提示词发给模型、拿回文本"，不做重试和超时
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（如 Gemini, Azure, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;

/// LLM 调用能力
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 发送提示词并返回模型的原始文本
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

/// OpenAI 兼容接口的 LLM 客户端
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    max_tokens: u32,
}

impl OpenAiLlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            max_tokens: config.llm_max_tokens,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiLlmClient {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}, temperature: {}", model, temperature);
        debug!("提示词长度: {} 字符", prompt.len());

        let build_failed = |e: async_openai::error::OpenAIError| LlmError::RequestBuildFailed {
            model: model.to_string(),
            source: Box::new(e),
        };

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(build_failed)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(build_failed)?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::ApiCallFailed {
                model: model.to_string(),
                source: Box::new(e),
            }
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let choice = response
            .choices
            .first()
            .ok_or_else(|| LlmError::EmptyResponse {
                model: model.to_string(),
            })?;

        let content = choice
            .message
            .content
            .clone()
            .ok_or_else(|| LlmError::EmptyContent {
                model: model.to_string(),
            })?;

        debug!("LLM 响应长度: {} 字符", content.len());

        Ok(content)
    }
}
