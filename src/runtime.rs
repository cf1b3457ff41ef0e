//! Runtime services and shared state for the guard-bot.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        prompts,
        types::{Res, Void},
    },
    interaction::app_mention::MentionHandler,
    service::{chat::ChatClient, llm::LlmClient},
};

/// Runtime service context that can be shared across the application.
///
/// The mention handler and LLM client are owned by the chat client, which
/// dispatches mentions to them. It is designed to be trivially cloneable,
/// allowing it to be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Build the system prompt once; it is shared read-only by every mention.
        let system_prompt = prompts::build_system_prompt(&config.discount_code);

        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        // Initialize the mention handler.
        let handler = MentionHandler::new(system_prompt, llm);

        // Initialize the slack client.
        let chat = ChatClient::slack(&config, handler).await?;

        Ok(Self { chat })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
