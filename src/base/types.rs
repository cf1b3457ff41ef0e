//! Common types and result handling.

/// The error type used throughout the bot.
pub type Err = anyhow::Error;
/// A result carrying the bot's error type.
pub type Res<T> = Result<T, Err>;
/// A result with no value.
pub type Void = Res<()>;

/// A notification that the bot was referenced in a message.
///
/// Produced by the chat platform, read-only to the bot, and dropped once the
/// mention has been answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionEvent {
    /// The raw message text, including any mention markup.
    pub text: Option<String>,
    /// The user who sent the message.
    pub user_id: String,
    /// The conversation the message was posted in.
    pub channel_id: String,
    /// The message identifier.
    pub ts: String,
    /// The parent thread, when the mention was posted inside one.
    pub thread_ts: Option<String>,
}
