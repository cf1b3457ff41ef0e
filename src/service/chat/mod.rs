pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Void;

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Slack. Implementing this trait allows different chat services to be used
/// with the guard-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Returns the unique identifier for the bot in the chat platform.
    fn bot_user_id(&self) -> &str;

    /// Start the chat client listener.
    ///
    /// This sets up event listeners for the chat platform and begins processing
    /// incoming mentions. Returns once the listener shuts down.
    async fn start(&self) -> Void;

    /// Post a reply into a conversation.
    ///
    /// An empty `thread_ts` posts at the top level of the channel; otherwise the
    /// reply goes into that thread.
    async fn send_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
