//! Event handling and user interactions for guard-bot.
//!
//! This module turns @-mentions of the bot into replies, coordinating the
//! LLM and chat services.

pub mod app_mention;
