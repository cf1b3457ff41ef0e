//! Library root for `guard-bot`.
//!
//! Guard-bot is a Slack bot that answers @-mentions with an LLM while guarding
//! a secret discount code:
//! - Strips mention markup from the message text
//! - Forwards the remaining text to a Gemini chat completion endpoint
//! - Posts the model's reply back into the originating conversation
//!
//! The only protection for the discount code is the system prompt that tells
//! the model not to reveal it. The architecture is built around traits for the
//! chat and LLM services so that either can be swapped out or mocked.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::{info, warn};

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the guard-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the LLM and chat clients
/// - Starts the socket mode listener for mentions
pub async fn start(config: Config) -> Void {
    info!("Starting guard-bot ...");

    // Start the crypto provider.
    if crypto::ring::default_provider().install_default().is_err() {
        warn!("A crypto provider was already installed.");
    }

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
