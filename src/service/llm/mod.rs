pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use tracing::{error, instrument};

use crate::base::{prompts::COMPLETION_FAILURE_REPLY, types::Res};

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the single completion call the bot makes. Implementing
/// it allows different completion providers to be used with the guard-bot.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Request one chat completion for a system prompt and a user message.
    ///
    /// Returns the content of the first choice, or an error if the request
    /// fails or the response carries no usable content.
    async fn get_completion(&self, system_prompt: &str, user_text: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }

    /// Request a completion, falling back to a fixed apology on any failure.
    ///
    /// Exactly one request is made; errors are logged and never returned.
    #[instrument(name = "LlmClient::complete", skip_all)]
    pub async fn complete(&self, system_prompt: &str, user_text: &str) -> String {
        match self.inner.get_completion(system_prompt, user_text).await {
            Ok(content) => content,
            Err(err) => {
                error!("Error calling completion API: {:#}", err);
                COMPLETION_FAILURE_REPLY.to_string()
            }
        }
    }
}

// Tests.
