//! Groq 后端（OpenAI 兼容 API）
//!
//! 通过 async_openai 调用 Groq 的 OpenAI 兼容端点（base_url 可配置，也可指向
//! OpenAI 或自建代理）。每次调用在 system prompt 后追加固定的语言约束，保证
//! 回复只用印尼语、不带括号翻译。

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::ChatBackend;

/// 附加在所有 system prompt 之后的语言约束
const LANGUAGE_RIDER: &str = "Important: Never include translations or English text in parentheses.\nRespond naturally in Bahasa Indonesia only.";

/// Groq 客户端：持有 Client 与 model 名，complete 时取首条 choice 的 content
pub struct GroqBackend {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GroqBackend {
    pub fn new(base_url: &str, model: &str, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .unwrap_or_else(|| "gsk-placeholder".to_string());

        let config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(api_key);

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    fn build_request(
        &self,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<CreateChatCompletionRequest, String> {
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(format!("{}\n{}", system_prompt, LANGUAGE_RIDER))
                    .build()
                    .map_err(|e| e.to_string())?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt.to_string())
                    .build()
                    .map_err(|e| e.to_string())?,
            ),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(512u32)
            .build()
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ChatBackend for GroqBackend {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, String> {
        let request = self.build_request(system_prompt, prompt)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| e.to_string())?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.is_empty() {
            return Err("empty completion".to_string());
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_caps_tokens_and_sets_temperature() {
        let backend = GroqBackend::new("https://api.groq.com/openai/v1", "mixtral-8x7b-32768", Some("gsk-test"));
        let request = backend.build_request("sys", "halo").unwrap();

        assert_eq!(request.model, "mixtral-8x7b-32768");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(512));
        assert_eq!(request.messages.len(), 2);
    }

    #[test]
    fn test_system_prompt_carries_language_rider() {
        let backend = GroqBackend::new("https://api.groq.com/openai/v1", "mixtral-8x7b-32768", Some("gsk-test"));
        let request = backend.build_request("You are Sarah.", "halo").unwrap();

        match &request.messages[0] {
            ChatCompletionRequestMessage::System(system) => {
                let rendered = format!("{:?}", system.content);
                assert!(rendered.contains("You are Sarah."));
                assert!(rendered.contains("Bahasa Indonesia only"));
            }
            other => panic!("expected system message, got {:?}", other),
        }
    }
}
