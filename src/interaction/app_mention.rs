//! Answers @-mentions of the bot.
//!
//! Every mention gets exactly one reply: a greeting when the mention carries no
//! text, the completion (or its apology) otherwise, and a generic apology if
//! producing the reply fails in any other way.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{Instrument, error, info, instrument};

use crate::{
    base::{
        prompts::{GREETING_REPLY, HANDLER_FAILURE_REPLY},
        types::MentionEvent,
    },
    service::{chat::ChatClient, llm::LlmClient},
};

/// A user reference token (e.g., `<@U1234567890>`) and the whitespace after it.
static MENTION_MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<@[^>]+>\s*").expect("mention markup pattern is valid"));

/// Removes every user reference from `text` and trims the remainder.
pub fn sanitize_mention_text(text: &str) -> String {
    MENTION_MARKUP.replace_all(text, "").trim().to_string()
}

/// The reply chosen for a single mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionReply {
    /// The mention carried no text.
    Greeting,
    /// The completion client's answer, or its own apology.
    Completion(String),
    /// Producing the reply failed unexpectedly.
    Failure,
}

impl MentionReply {
    /// The text posted back into the conversation.
    pub fn text(&self) -> &str {
        match self {
            MentionReply::Greeting => GREETING_REPLY,
            MentionReply::Completion(text) => text,
            MentionReply::Failure => HANDLER_FAILURE_REPLY,
        }
    }
}

/// Handles mention events.
///
/// Holds only immutable state, so it is cheap to clone and safe to use for
/// many mentions at once.
#[derive(Clone)]
pub struct MentionHandler {
    system_prompt: Arc<str>,
    llm: LlmClient,
}

impl MentionHandler {
    pub fn new(system_prompt: impl Into<Arc<str>>, llm: LlmClient) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            llm,
        }
    }

    /// Choose the reply for a mention without sending it.
    #[instrument(name = "MentionHandler::reply_for", skip_all)]
    pub async fn reply_for(&self, event: &MentionEvent) -> MentionReply {
        let text = sanitize_mention_text(event.text.as_deref().unwrap_or_default());

        if text.is_empty() {
            return MentionReply::Greeting;
        }

        MentionReply::Completion(self.llm.complete(&self.system_prompt, &text).await)
    }

    /// Answer a mention with exactly one reply.
    ///
    /// The reply is computed on its own task, so a panic there becomes the
    /// generic apology rather than a missing reply. A failed send is logged
    /// and not retried.
    ///
    /// Mentions posted inside a thread are answered in that thread; all other
    /// mentions are answered at the top level of the channel.
    #[instrument(name = "MentionHandler::handle", skip_all, fields(channel_id = %event.channel_id, ts = %event.ts))]
    pub async fn handle(&self, event: MentionEvent, chat: &ChatClient) -> MentionReply {
        info!("Bot mentioned by {}: {}", event.user_id, event.text.as_deref().unwrap_or_default());

        let handler = self.clone();
        let task_event = event.clone();
        let task = tokio::spawn(async move { handler.reply_for(&task_event).await }.in_current_span());

        let reply = match task.await {
            Ok(reply) => reply,
            Err(err) => {
                error!("Error processing mention: {}", err);
                MentionReply::Failure
            }
        };

        let thread_ts = event.thread_ts.as_deref().unwrap_or_default();

        if let Err(err) = chat.send_message(&event.channel_id, thread_ts, reply.text()).await {
            error!("Error sending reply: {:#}", err);
        }

        reply
    }
}

/// Handles an app mention on its own task.
#[instrument(skip_all)]
pub fn handle_app_mention(event: MentionEvent, handler: MentionHandler, chat: ChatClient) {
    tokio::spawn(
        async move {
            let _ = handler.handle(event, &chat).await;
        }
        .in_current_span(),
    );
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_every_mention() {
        assert_eq!(sanitize_mention_text("<@U123> <@U456>  hello world  "), "hello world");
    }

    #[test]
    fn test_sanitize_strips_interleaved_mentions() {
        assert_eq!(sanitize_mention_text("<@U123> ask <@U456> about it"), "ask about it");
    }

    #[test]
    fn test_sanitize_keeps_whitespace_before_mentions() {
        // Only the whitespace after a token is consumed.
        assert_eq!(sanitize_mention_text("hello <@U123>world"), "hello world");
        assert_eq!(sanitize_mention_text("hello<@U123> world"), "helloworld");
    }

    #[test]
    fn test_sanitize_mention_with_label() {
        assert_eq!(sanitize_mention_text("<@U123|guard-bot>\n\twhat's new?"), "what's new?");
    }

    #[test]
    fn test_sanitize_empty_results() {
        assert_eq!(sanitize_mention_text(""), "");
        assert_eq!(sanitize_mention_text("   \n "), "");
        assert_eq!(sanitize_mention_text("<@U123>"), "");
        assert_eq!(sanitize_mention_text("<@U123> <@U456>   "), "");
    }

    #[test]
    fn test_sanitize_leaves_other_markup() {
        assert_eq!(sanitize_mention_text("<@U123> see <#C123|general> and <https://example.com>"), "see <#C123|general> and <https://example.com>");
    }

    #[test]
    fn test_sanitize_unclosed_token_is_text() {
        assert_eq!(sanitize_mention_text("<@U123 hello"), "<@U123 hello");
    }

    #[test]
    fn test_mention_reply_text() {
        assert_eq!(MentionReply::Greeting.text(), GREETING_REPLY);
        assert_eq!(MentionReply::Failure.text(), HANDLER_FAILURE_REPLY);
        assert_eq!(MentionReply::Completion("answer".to_string()).text(), "answer");
    }
}
