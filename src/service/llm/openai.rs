//! Integration with OpenAI-compatible chat completion services.
//!
//! The bot talks to Gemini through its OpenAI-compatible endpoint, so the
//! `async-openai` client is pointed at the configured base URL instead of
//! the OpenAI default.

use std::{sync::Arc, time::Duration};

use crate::base::{config::Config, types::Res};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use tracing::{debug, instrument};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI-compatible LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI-compatible LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.google_api_key.clone()).with_api_base(config.completion_api_base.clone());

        // One attempt per request: the client would otherwise retry rate-limited calls.
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        Self {
            client: Client::with_config(cfg).with_backoff(backoff),
            model: config.completion_model.clone(),
        }
    }

    /// Build the two request messages: the system prompt, then the user text.
    fn build_messages(system_prompt: &str, user_text: &str) -> Vec<ChatCompletionRequestMessage> {
        vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(system_prompt.to_string()),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(user_text.to_string()),
                name: None,
            }),
        ]
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::get_completion", skip_all)]
    async fn get_completion(&self, system_prompt: &str, user_text: &str) -> Res<String> {
        debug!("Requesting completion from `{}` ...", self.model);

        let request = CreateChatCompletionRequestArgs::default().model(&self.model).messages(Self::build_messages(system_prompt, user_text)).build()?;

        let response = self.client.chat().create(request).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| anyhow::anyhow!("Completion response contained no choices."))?;
        let content = choice.message.content.ok_or_else(|| anyhow::anyhow!("Completion response choice contained no content."))?;

        Ok(content)
    }
}

// Tests.
