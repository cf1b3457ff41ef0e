//! Chat service integration for guard-bot.
//!
//! This module connects to Slack over socket mode:
//! - Receiving `app_mention` push events
//! - Handing each mention to the mention handler
//! - Posting replies back into the originating conversation

use crate::{
    base::{
        config::Config,
        types::{MentionEvent, Res, Void},
    },
    interaction::{self, app_mention::MentionHandler},
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client that dispatches mentions to `handler`.
    pub async fn slack(config: &Config, handler: MentionHandler) -> Res<Self> {
        let client = SlackChatClient::new(config, handler).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

impl From<&SlackAppMentionEvent> for MentionEvent {
    fn from(event: &SlackAppMentionEvent) -> Self {
        Self {
            text: event.content.text.clone(),
            user_id: event.user.0.clone(),
            channel_id: event.channel.0.clone(),
            ts: event.origin.ts.0.clone(),
            thread_ts: event.origin.thread_ts.as_ref().map(|ts| ts.0.clone()),
        }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    handler: MentionHandler,
    chat: ChatClient,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub bot_user_id: String,
    pub client: Arc<FullClient>,
    pub handler: MentionHandler,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, handler: MentionHandler) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID (this also verifies the bot token).

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            client,
            handler,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_command_events(handle_command_event)
            .with_interaction_events(handle_interaction_event)
            .with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            handler: self.handler.clone(),
            chat: ChatClient::from(self.clone()),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events,
        socket_mode_listener.listen_for(&self.app_token).await?;

        // Start WS connections calling Slack API to get WS url for the token,
        // and wait for Ctrl-C to shutdown.
        info!("Listening for mentions of {} ...", self.bot_user_id());
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let mut request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message);

        if !thread_ts.is_empty() {
            request = request.with_thread_ts(SlackTs(thread_ts.to_string()));
        }

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

// Socket mode listener callbacks for Slack.

/// Handles command events from Slack.
async fn handle_command_event(
    event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    warn!("[COMMAND] {}", event.command.0);
    Ok(SlackCommandEventResponse::new(SlackMessageContent::new().with_text("No app commands are currently supported.".into())))
}

/// Handles interaction events from Slack.
async fn handle_interaction_event(_event: SlackInteractionEvent, _client: Arc<SlackHyperClient>, _states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    warn!("[INTERACTION] Received unhandled interaction event.");
    Ok(())
}

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let event = event_callback.event;
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    match event {
        SlackEventCallbackBody::AppMention(slack_app_mention_event) => {
            info!("Received app mention event ...");

            let mention = MentionEvent::from(&slack_app_mention_event);
            interaction::app_mention::handle_app_mention(mention, user_state.handler.clone(), user_state.chat.clone());
        }
        _ => {
            warn!("Received unhandled push event.")
        }
    }

    Ok(())
}

// Tests.
