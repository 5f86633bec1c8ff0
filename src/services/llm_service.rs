//! LLM 服务 - 业务能力层
//!
//! 只负责"给一段提示词，拿回模型输出"的能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点，模型由每次请求指定
//! - 兼容 OpenAI API 的服务（如 Azure, Qwen, Doubao 等）

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

/// 语言模型接口
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 使用指定模型补全提示词，返回去除首尾空白的文本
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError>;
}

/// 基于 OpenAI 兼容接口的 LLM 服务
pub struct LlmService {
    client: Client<OpenAIConfig>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }
}

#[async_trait]
impl LanguageModel for LlmService {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", model);
        debug!("提示词长度: {} 字符", prompt.chars().count());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::api_call_failed(model, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: model.to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 需要真实的 LLM 服务：
    /// ```bash
    /// LLM_API_KEY=... LLM_MODEL_NAME=... cargo test test_complete_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_complete_live() {
        crate::utils::logging::init(true);

        let config = Config::from_env().expect("读取环境变量失败");
        let model = std::env::var("LLM_MODEL_NAME").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let service = LlmService::new(&config);

        let response = service
            .complete(&model, "只返回 JSON：{\"answer\": \"ok\"}")
            .await
            .expect("LLM 调用失败");

        println!("LLM 响应: {}", response);
        assert!(!response.is_empty());
    }
}
